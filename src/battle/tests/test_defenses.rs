#[cfg(test)]
mod tests {
    use crate::attributes::Attr;
    use crate::battle::engine::perform_attack;
    use crate::battle::resolution::resolve_per_turn;
    use crate::battle::state::{BattleEvent, EventBus};
    use crate::battle::tests::common::{
        always_proc_rng, create_duel, create_test_arena, d, predictable_rng, test_config,
        TestCombatantBuilder,
    };
    use crate::combatant::CombatantId;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use schema::{CombatantKind, TeamSide};

    fn attacker() -> TestCombatantBuilder {
        TestCombatantBuilder::new("Raider", TeamSide::Attackers).with_damage(200)
    }

    fn defender(skills: &[&str]) -> TestCombatantBuilder {
        TestCombatantBuilder::new("Warden", TeamSide::Defenders)
            .with_max_hp(500)
            .with_armor(20)
            .with_skills(skills)
    }

    fn narrated(bus: &EventBus, needle: &str) -> bool {
        bus.events()
            .iter()
            .any(|e| matches!(e, BattleEvent::Narration(line) if line.contains(needle)))
    }

    #[test]
    fn test_dodge_negates_the_hit() {
        // Arrange
        let (mut arena, a, b) = create_duel(attacker().build(), defender(&["Wind Dance"]).build());
        let mut bus = EventBus::new();

        // Act
        let dealt = perform_attack(&mut arena, a, b, &mut always_proc_rng(), &test_config(), &mut bus);

        // Assert
        assert_eq!(dealt, d(0));
        assert_eq!(arena[b].hp(), d(500));
        assert!(narrated(&bus, "dodges"));
    }

    #[test]
    fn test_block_reflects_part_of_the_blow() {
        // Arrange
        let (mut arena, a, b) = create_duel(attacker().build(), defender(&["Static Field"]).build());
        let mut bus = EventBus::new();

        // Act
        perform_attack(&mut arena, a, b, &mut always_proc_rng(), &test_config(), &mut bus);

        // Assert
        bus.print_debug_with_message("Events for test_block_reflects_part_of_the_blow:");
        assert_eq!(arena[b].hp(), d(500));
        assert_eq!(arena[a].hp(), d(910));
    }

    #[test]
    fn test_physical_immunity_charges_run_out() {
        // Arrange
        let (mut arena, a, b) = create_duel(attacker().build(), defender(&["Eye of the Storm"]).build());
        let mut rng = predictable_rng();
        let config = test_config();

        // Act
        for _ in 0..3 {
            perform_attack(&mut arena, a, b, &mut rng, &config, &mut EventBus::new());
        }

        // Assert
        assert_eq!(arena[b].hp(), d(500));
        assert!(!arena[b].attrs.has(Attr::PhysicalImmunityCharges));

        // Act
        perform_attack(&mut arena, a, b, &mut rng, &config, &mut EventBus::new());

        // Assert
        assert_eq!(arena[b].hp(), d(320));
    }

    #[test]
    fn test_mana_shield_pool_drains() {
        // Arrange: pool is 15% of 500, each hit has 30% absorbed
        let (mut arena, a, b) = create_duel(attacker().build(), defender(&["Tidal Barrier"]).build());
        let mut rng = predictable_rng();
        let config = test_config();
        assert_eq!(arena[b].attrs.get_or_zero(Attr::ManaShieldPool), d(75));

        // Act
        perform_attack(&mut arena, a, b, &mut rng, &config, &mut EventBus::new());

        // Assert
        assert_eq!(arena[b].hp(), d(374));
        assert_eq!(arena[b].attrs.get_or_zero(Attr::ManaShieldPool), d(21));

        // Act
        perform_attack(&mut arena, a, b, &mut rng, &config, &mut EventBus::new());

        // Assert
        assert_eq!(arena[b].hp(), d(215));
        assert!(!arena[b].attrs.has(Attr::ManaShieldPool));
    }

    #[test]
    fn test_bodyguard_pet_takes_part_of_the_hit() {
        // Arrange
        let pet = TestCombatantBuilder::new("Hound", TeamSide::Defenders)
            .with_kind(CombatantKind::Pet)
            .with_skills(&["Lightning Rod"])
            .build();
        let mut arena = create_test_arena(vec![attacker().build(), defender(&[]).build(), pet]);
        let (a, owner, pet) = (CombatantId(0), CombatantId(1), CombatantId(2));
        arena[pet].owner = Some(owner);
        let mut bus = EventBus::new();

        // Act
        perform_attack(&mut arena, a, owner, &mut predictable_rng(), &test_config(), &mut bus);

        // Assert
        assert_eq!(arena[pet].hp(), d(928));
        assert_eq!(arena[owner].hp(), d(392));
        assert!(narrated(&bus, "leaps in front of Warden"));
    }

    #[test]
    fn test_reflect_returns_a_share_of_prevented_damage() {
        // Arrange: 12% of 180 is prevented, 40% of that comes back
        let (mut arena, a, b) =
            create_duel(attacker().build(), defender(&["Barbed Hide", "Bark Skin"]).build());

        // Act
        perform_attack(&mut arena, a, b, &mut predictable_rng(), &test_config(), &mut EventBus::new());

        // Assert
        assert_eq!(arena[b].hp(), Decimal::new(3416, 1));
        assert_eq!(arena[a].hp(), Decimal::new(99136, 2));
    }

    #[test]
    fn test_retaliation_hits_back_with_defender_damage() {
        // Arrange
        let (mut arena, a, b) = create_duel(attacker().build(), defender(&["Penance"]).build());

        // Act
        perform_attack(&mut arena, a, b, &mut always_proc_rng(), &test_config(), &mut EventBus::new());

        // Assert
        assert_eq!(arena[b].hp(), d(320));
        assert_eq!(arena[a].hp(), d(960));
    }

    #[rstest]
    #[case::retaliation(&["Penance"])]
    #[case::block(&["Static Field"])]
    #[case::thorns(&["Barbed Hide", "Bark Skin"])]
    fn test_defender_is_credited_when_punishment_kills(#[case] skills: &[&str]) {
        // Arrange
        let (mut arena, a, b) = create_duel(attacker().with_max_hp(5).build(), defender(skills).build());

        // Act
        perform_attack(&mut arena, a, b, &mut always_proc_rng(), &test_config(), &mut EventBus::new());

        // Assert
        assert!(!arena[a].is_alive());
        assert_eq!(arena[b].kills, 1);
        assert_eq!(arena[a].kills, 0);
    }

    #[test]
    fn test_attacker_is_credited_when_bodyguard_falls() {
        // Arrange
        let pet = TestCombatantBuilder::new("Hound", TeamSide::Defenders)
            .with_kind(CombatantKind::Pet)
            .with_max_hp(50)
            .with_skills(&["Lightning Rod"])
            .build();
        let mut arena = create_test_arena(vec![attacker().build(), defender(&[]).build(), pet]);
        let (a, owner, pet) = (CombatantId(0), CombatantId(1), CombatantId(2));
        arena[pet].owner = Some(owner);

        // Act
        perform_attack(&mut arena, a, owner, &mut predictable_rng(), &test_config(), &mut EventBus::new());

        // Assert
        assert!(!arena[pet].is_alive());
        assert_eq!(arena[owner].hp(), d(392));
        assert_eq!(arena[a].kills, 1);
    }

    #[test]
    fn test_reflect_ignores_damage_taken_by_bodyguard() {
        // Arrange: nothing is prevented, 40% of the hit just lands on the pet
        let pet = TestCombatantBuilder::new("Hound", TeamSide::Defenders)
            .with_kind(CombatantKind::Pet)
            .with_skills(&["Lightning Rod"])
            .build();
        let mut arena = create_test_arena(vec![attacker().build(), defender(&["Barbed Hide"]).build(), pet]);
        let (a, owner, pet) = (CombatantId(0), CombatantId(1), CombatantId(2));
        arena[pet].owner = Some(owner);

        // Act
        perform_attack(&mut arena, a, owner, &mut predictable_rng(), &test_config(), &mut EventBus::new());

        // Assert
        assert_eq!(arena[pet].hp(), d(928));
        assert_eq!(arena[owner].hp(), d(392));
        assert_eq!(arena[a].hp(), d(1000));
    }

    #[test]
    fn test_divine_invincibility_triggers_once() {
        // Arrange
        let target = defender(&["Divine Invincibility"]).with_hp(200).build();
        let (mut arena, a, b) = create_duel(attacker().build(), target);
        let mut rng = predictable_rng();
        let config = test_config();

        // Act: the hit that would drop it under 20% is negated
        perform_attack(&mut arena, a, b, &mut rng, &config, &mut EventBus::new());

        // Assert
        assert_eq!(arena[b].hp(), d(200));
        assert_eq!(arena[b].attrs.get_or_zero(Attr::InvincibleDuration), d(2));

        // Act: invincible for the window, then vulnerable again for good
        perform_attack(&mut arena, a, b, &mut rng, &config, &mut EventBus::new());
        resolve_per_turn(&mut arena, b);
        resolve_per_turn(&mut arena, b);
        perform_attack(&mut arena, a, b, &mut rng, &config, &mut EventBus::new());

        // Assert
        assert!(arena[b].attrs.has(Attr::DivineInvincibilityUsed));
        assert_eq!(arena[b].hp(), d(20));
    }

    #[test]
    fn test_ally_wards_are_capped() {
        // Arrange: six 10% wards stack to the 50% cap
        let mut combatants = vec![attacker().build(), defender(&[]).build()];
        for i in 0..6 {
            combatants.push(
                TestCombatantBuilder::new(&format!("Acolyte {}", i), TeamSide::Defenders)
                    .with_skills(&["Sanctuary"])
                    .build(),
            );
        }
        let mut arena = create_test_arena(combatants);

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
        assert_eq!(arena[CombatantId(1)].hp(), d(410));
    }

    #[test]
    fn test_fortify_only_below_threshold() {
        // Arrange
        let target = defender(&["Ancient Roots"]).with_max_hp(1000).with_hp(200).build();
        let (mut arena, a, b) = create_duel(attacker().build(), target);

        // Act
        perform_attack(&mut arena, a, b, &mut predictable_rng(), &test_config(), &mut EventBus::new());

        // Assert: 180 reduced by 40%
        assert_eq!(arena[b].hp(), d(92));
    }
}
