#[cfg(test)]
mod tests {
    use crate::attributes::Attr;
    use crate::battle::engine::perform_attack;
    use crate::battle::resolution::resolve_per_turn;
    use crate::battle::state::EventBus;
    use crate::battle::status_effects::StatusEffect;
    use crate::battle::tests::common::{
        always_proc_rng, create_test_arena, d, test_config, TestCombatantBuilder,
    };
    use crate::combatant::CombatantId;
    use crate::modifiers::{ModifierSource, Stat};
    use pretty_assertions::assert_eq;
    use schema::TeamSide;

    const LEADER: CombatantId = CombatantId(0);
    const SQUIRE: CombatantId = CombatantId(1);
    const DUMMY: CombatantId = CombatantId(2);

    fn rally_arena() -> crate::battle::state::BattleArena {
        create_test_arena(vec![
            TestCombatantBuilder::new("Leader", TeamSide::Attackers)
                .with_damage(100)
                .with_skills(&["Savage Roar"])
                .build(),
            TestCombatantBuilder::new("Squire", TeamSide::Attackers)
                .with_damage(80)
                .build(),
            TestCombatantBuilder::new("Dummy", TeamSide::Defenders)
                .with_max_hp(1_000_000)
                .build(),
        ])
    }

    #[test]
    fn test_rally_buffs_team_and_expires_exactly() {
        // Arrange
        let mut arena = rally_arena();
        let mut rng = always_proc_rng();

        // Act
        perform_attack(&mut arena, LEADER, DUMMY, &mut rng, &test_config(), &mut EventBus::new());

        // Assert
        assert_eq!(arena[LEADER].stats.damage(), d(115));
        assert_eq!(arena[SQUIRE].stats.damage(), d(92));

        // Act
        resolve_per_turn(&mut arena, SQUIRE);
        assert_eq!(arena[SQUIRE].stats.damage(), d(92));
        resolve_per_turn(&mut arena, SQUIRE);

        // Assert
        assert_eq!(arena[SQUIRE].stats.damage(), d(80));
        assert!(!arena[SQUIRE].attrs.has(Attr::RallyDuration));
        assert!(!arena[SQUIRE].stats.has(ModifierSource::TeamRally, Stat::Damage));
    }

    #[test]
    fn test_rally_refresh_does_not_stack() {
        // Arrange
        let mut arena = rally_arena();
        let mut rng = always_proc_rng();
        let config = test_config();

        // Act
        for _ in 0..5 {
            perform_attack(&mut arena, LEADER, DUMMY, &mut rng, &config, &mut EventBus::new());
        }

        // Assert
        assert_eq!(arena[SQUIRE].stats.damage(), d(92));
        assert_eq!(arena[SQUIRE].stats.modifier_count(), 1);
    }

    #[test]
    fn test_many_cycles_leave_no_drift() {
        // Arrange
        let mut arena = rally_arena();
        let mut rng = always_proc_rng();
        let config = test_config();

        // Act
        for _ in 0..100 {
            perform_attack(&mut arena, LEADER, DUMMY, &mut rng, &config, &mut EventBus::new());
            resolve_per_turn(&mut arena, LEADER);
            resolve_per_turn(&mut arena, LEADER);
            resolve_per_turn(&mut arena, SQUIRE);
            resolve_per_turn(&mut arena, SQUIRE);
        }

        // Assert
        assert_eq!(arena[LEADER].stats.damage(), d(100));
        assert_eq!(arena[SQUIRE].stats.damage(), d(80));
        assert_eq!(arena[SQUIRE].stats.modifier_count(), 0);
    }

    #[test]
    fn test_armor_break_and_rally_interleave_cleanly() {
        // Arrange
        let mut arena = rally_arena();
        arena[SQUIRE].stats = crate::modifiers::StatBlock::new(d(80), d(50), d(0));
        let mut rng = always_proc_rng();

        // Act
        arena[SQUIRE].add_status_effect(StatusEffect::armor_break(d(40), 1));
        perform_attack(&mut arena, LEADER, DUMMY, &mut rng, &test_config(), &mut EventBus::new());
        resolve_per_turn(&mut arena, SQUIRE);

        // Assert: armor break gone after one turn, rally still active
        assert_eq!(arena[SQUIRE].stats.armor(), d(50));
        assert_eq!(arena[SQUIRE].stats.damage(), d(92));

        // Act
        resolve_per_turn(&mut arena, SQUIRE);

        // Assert
        assert_eq!(arena[SQUIRE].stats.damage(), d(80));
        assert_eq!(arena[SQUIRE].stats.modifier_count(), 0);
    }
}
