#[cfg(test)]
mod tests {
    use crate::attributes::Attr;
    use crate::battle::engine::perform_attack;
    use crate::battle::resolution::resolve_per_turn;
    use crate::battle::state::{BattleEvent, EventBus};
    use crate::battle::status_effects::StatusEffect;
    use crate::battle::tests::common::{
        always_proc_rng, create_duel, create_test_arena, d, predictable_rng, test_config,
        TestCombatantBuilder,
    };
    use crate::combatant::CombatantId;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use schema::{DotKind, TeamSide};

    fn attacker(skills: &[&str]) -> TestCombatantBuilder {
        TestCombatantBuilder::new("Striker", TeamSide::Attackers)
            .with_damage(200)
            .with_skills(skills)
    }

    fn target() -> TestCombatantBuilder {
        TestCombatantBuilder::new("Target", TeamSide::Defenders)
            .with_max_hp(500)
            .with_armor(20)
    }

    fn mate(name: &str) -> TestCombatantBuilder {
        TestCombatantBuilder::new(name, TeamSide::Defenders)
    }

    #[test]
    fn test_dot_is_capped_by_attacker_damage() {
        // Arrange: 3% of 10000 would be 300 per turn
        let (mut arena, a, b) = create_duel(
            attacker(&["Ember Touch"]).build(),
            target().with_max_hp(10000).build(),
        );

        // Act
        perform_attack(&mut arena, a, b, &mut always_proc_rng(), &test_config(), &mut EventBus::new());

        // Assert
        assert!(arena[b].has_status_effect("Burn"));
        assert_eq!(arena[b].status_effects[0].magnitude(), Some(d(200)));
    }

    #[test]
    fn test_dot_immune_target_is_never_afflicted() {
        // Arrange
        let (mut arena, a, b) = create_duel(
            attacker(&["Ember Touch"]).build(),
            target().with_skills(&["World Tree"]).build(),
        );

        // Act
        perform_attack(&mut arena, a, b, &mut always_proc_rng(), &test_config(), &mut EventBus::new());

        // Assert
        assert!(arena[b].status_effects.is_empty());
    }

    #[test]
    fn test_paralysis_stops_the_next_action() {
        // Arrange
        let (mut arena, a, b) = create_duel(attacker(&["Thunder Strike"]).build(), target().build());

        // Act
        perform_attack(&mut arena, a, b, &mut always_proc_rng(), &test_config(), &mut EventBus::new());

        // Assert
        assert!(!arena[b].can_act());
        resolve_per_turn(&mut arena, b);
        assert!(arena[b].can_act());
    }

    #[test]
    fn test_glacial_prison_holds_through_the_hit_that_casts_it() {
        // Arrange
        let mut arena = create_test_arena(vec![
            attacker(&["Glacial Prison"]).build(),
            TestCombatantBuilder::new("Brute", TeamSide::Attackers).with_damage(200).build(),
            target().build(),
        ]);
        let (frost, brute, b) = (CombatantId(0), CombatantId(1), CombatantId(2));
        let config = test_config();
        let mut bus = EventBus::new();

        // Act
        perform_attack(&mut arena, frost, b, &mut always_proc_rng(), &config, &mut bus);

        // Assert
        assert_eq!(arena[b].hp(), d(320));
        assert!(arena[b].has_status_effect("Freeze"));
        assert!(!arena[b].can_act());
        assert!(!bus
            .events()
            .iter()
            .any(|e| matches!(e, BattleEvent::Narration(line) if line.contains("shatters"))));

        // Act: one turn passes, the second turn of ice remains
        resolve_per_turn(&mut arena, b);

        // Assert
        assert!(!arena[b].can_act());

        // Act: a later blow breaks it
        perform_attack(&mut arena, brute, b, &mut always_proc_rng(), &config, &mut EventBus::new());

        // Assert
        assert_eq!(arena[b].hp(), d(140));
        assert!(arena[b].can_act());
    }

    #[test]
    fn test_armor_shred_lowers_then_restores_armor() {
        // Arrange
        let (mut arena, a, b) = create_duel(
            attacker(&["Hex"]).build(),
            target().with_armor(100).build(),
        );

        // Act
        perform_attack(&mut arena, a, b, &mut always_proc_rng(), &test_config(), &mut EventBus::new());

        // Assert: the shredding hit itself still met full armor
        assert_eq!(arena[b].hp(), d(400));
        assert_eq!(arena[b].stats.armor(), d(80));

        // Act
        resolve_per_turn(&mut arena, b);
        resolve_per_turn(&mut arena, b);

        // Assert
        assert!(!arena[b].has_status_effect("Armor Break"));
        assert_eq!(arena[b].stats.armor(), d(100));
    }

    #[test]
    fn test_heal_block_stops_regeneration() {
        // Arrange
        let victim = target().with_hp(200).with_skills(&["Photosynthesis"]).build();
        let (mut arena, a, b) = create_duel(attacker(&["Corrupting Touch"]).build(), victim);

        // Act
        perform_attack(&mut arena, a, b, &mut always_proc_rng(), &test_config(), &mut EventBus::new());
        resolve_per_turn(&mut arena, b);

        // Assert
        assert_eq!(arena[b].hp(), d(20));
        assert_eq!(arena[b].attrs.get_or_zero(Attr::HealBlockDuration), d(1));

        // Act: block runs out at the start of the next turn, regeneration resumes
        resolve_per_turn(&mut arena, b);

        // Assert
        assert_eq!(arena[b].hp(), d(45));
    }

    #[test]
    fn test_purge_strips_buffs_and_shield_before_the_hit() {
        // Arrange
        let (mut arena, a, b) = create_duel(attacker(&["Purifying Light"]).build(), target().build());
        arena[b].attrs.set(Attr::Shield, d(50));
        arena[b].add_status_effect(StatusEffect::empowered(d(10), 3));
        arena[b].add_status_effect(StatusEffect::weakened(d(10), 3));

        // Act
        perform_attack(&mut arena, a, b, &mut always_proc_rng(), &test_config(), &mut EventBus::new());

        // Assert
        assert_eq!(arena[b].hp(), d(320));
        assert!(!arena[b].has_status_effect("Empowerment"));
        assert!(arena[b].has_status_effect("Weakness"));
    }

    #[test]
    fn test_splash_hits_the_rest_of_the_team() {
        // Arrange
        let mut arena = create_test_arena(vec![
            attacker(&["Heat Wave"]).build(),
            target().build(),
            mate("Left").build(),
            mate("Right").build(),
        ]);

        // Act
        perform_attack(
            &mut arena,
            CombatantId(0),
            CombatantId(1),
            &mut predictable_rng(),
            &test_config(),
            &mut EventBus::new(),
        );

        // Assert
        assert_eq!(arena[CombatantId(1)].hp(), d(320));
        assert_eq!(arena[CombatantId(2)].hp(), d(964));
        assert_eq!(arena[CombatantId(3)].hp(), d(964));
    }

    #[test]
    fn test_chain_falls_off_per_hop() {
        // Arrange
        let mut arena = create_test_arena(vec![
            attacker(&["Chain Lightning"]).build(),
            target().build(),
            mate("Left").build(),
            mate("Right").build(),
        ]);

        // Act
        perform_attack(
            &mut arena,
            CombatantId(0),
            CombatantId(1),
            &mut always_proc_rng(),
            &test_config(),
            &mut EventBus::new(),
        );

        // Assert: 60% of 180, then 60% of that
        let chained = d(2000) - arena[CombatantId(2)].hp() - arena[CombatantId(3)].hp();
        assert_eq!(chained, Decimal::new(1728, 1));
    }

    #[test]
    fn test_double_strike_lands_twice() {
        // Arrange
        let (mut arena, a, b) = create_duel(attacker(&["Riptide"]).build(), target().build());
        let mut bus = EventBus::new();

        // Act
        let dealt = perform_attack(&mut arena, a, b, &mut always_proc_rng(), &test_config(), &mut bus);

        // Assert
        assert_eq!(dealt, d(360));
        assert_eq!(arena[b].hp(), d(140));
        let hits = bus
            .events()
            .iter()
            .filter(|e| matches!(e, BattleEvent::Attacked { .. }))
            .count();
        assert_eq!(hits, 2);
    }

    #[test]
    fn test_life_steal_heals_from_damage_dealt() {
        // Arrange
        let (mut arena, a, b) = create_duel(
            attacker(&["Energy Siphon"]).with_hp(500).build(),
            target().build(),
        );

        // Act
        perform_attack(&mut arena, a, b, &mut predictable_rng(), &test_config(), &mut EventBus::new());

        // Assert
        assert_eq!(arena[a].hp(), d(527));
    }

    #[test]
    fn test_execute_bonus_below_threshold() {
        // Arrange
        let (mut arena, a, b) = create_duel(
            attacker(&["Searing Brand"]).build(),
            target().with_max_hp(2000).with_hp(400).build(),
        );

        // Act
        perform_attack(&mut arena, a, b, &mut predictable_rng(), &test_config(), &mut EventBus::new());

        // Assert
        assert_eq!(arena[b].hp(), d(130));
    }

    #[test]
    fn test_overcharge_every_third_attack() {
        // Arrange
        let (mut arena, a, b) = create_duel(
            attacker(&["Overcharge"]).build(),
            target().with_max_hp(2000).build(),
        );
        let mut rng = predictable_rng();
        let config = test_config();

        // Act
        let hits: Vec<Decimal> = (0..3)
            .map(|_| perform_attack(&mut arena, a, b, &mut rng, &config, &mut EventBus::new()))
            .collect();

        // Assert
        assert_eq!(hits, vec![d(180), d(180), d(360)]);
    }

    #[test]
    fn test_momentum_builds_per_attack() {
        // Arrange
        let (mut arena, a, b) = create_duel(
            attacker(&["Superconductor"]).build(),
            target().with_max_hp(2000).build(),
        );
        let mut rng = predictable_rng();
        let config = test_config();

        // Act
        let hits: Vec<Decimal> = (0..3)
            .map(|_| perform_attack(&mut arena, a, b, &mut rng, &config, &mut EventBus::new()))
            .collect();

        // Assert
        assert_eq!(hits, vec![d(180), d(189), d(198)]);
        assert_eq!(arena[a].attrs.get_or_zero(Attr::MomentumStacks), d(3));
    }

    #[test]
    fn test_cooldown_strike_waits_out_its_cooldown() {
        // Arrange
        let (mut arena, a, b) = create_duel(
            attacker(&["Tempest Fury"]).build(),
            target().with_max_hp(5000).build(),
        );
        let mut rng = always_proc_rng();
        let config = test_config();

        // Act
        let hits: Vec<Decimal> = (0..4)
            .map(|_| perform_attack(&mut arena, a, b, &mut rng, &config, &mut EventBus::new()))
            .collect();

        // Assert
        assert_eq!(hits, vec![d(450), d(180), d(180), d(450)]);
    }

    #[test]
    fn test_contagion_skips_immune_allies() {
        // Arrange
        let mut arena = create_test_arena(vec![
            attacker(&["Plague Bearer"]).build(),
            target().build(),
            mate("Immune").with_skills(&["Null Field"]).build(),
            mate("Exposed").build(),
        ]);
        arena[CombatantId(1)].add_status_effect(StatusEffect::damage_over_time(DotKind::Poison, d(10), 3));

        // Act
        perform_attack(
            &mut arena,
            CombatantId(0),
            CombatantId(1),
            &mut always_proc_rng(),
            &test_config(),
            &mut EventBus::new(),
        );

        // Assert
        assert!(!arena[CombatantId(2)].has_status_effect("Poison"));
        assert!(arena[CombatantId(3)].has_status_effect("Poison"));
    }
}
