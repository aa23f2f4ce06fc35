use crate::battle::state::{BattleArena, TurnRng};
use crate::combatant::{Combatant, CombatantId};
use crate::config::BattleConfig;
use crate::modifiers::StatBlock;
use crate::skills::apply_skill_effects;
use rust_decimal::Decimal;
use schema::{CombatantKind, Element, TeamSide};

/// A builder for test combatants with common defaults.
///
/// # Example
/// ```ignore
/// let guardian = TestCombatantBuilder::new("Warden", TeamSide::Defenders)
///     .with_kind(CombatantKind::Guardian)
///     .with_max_hp(5000)
///     .with_skills(&["Soul Harvest"])
///     .build();
/// ```
pub struct TestCombatantBuilder {
    name: String,
    side: TeamSide,
    kind: CombatantKind,
    max_hp: i64,
    hp: Option<i64>,
    damage: i64,
    armor: i64,
    luck: i64,
    element: Element,
    skills: Vec<String>,
}

impl TestCombatantBuilder {
    pub fn new(name: &str, side: TeamSide) -> Self {
        Self {
            name: name.to_string(),
            side,
            kind: CombatantKind::Player,
            max_hp: 1000,
            hp: None,
            damage: 100,
            armor: 0,
            luck: 0,
            element: Element::Unknown,
            skills: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: CombatantKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_max_hp(mut self, max_hp: i64) -> Self {
        self.max_hp = max_hp;
        self
    }

    /// Current HP. If not set, the combatant starts at max HP.
    pub fn with_hp(mut self, hp: i64) -> Self {
        self.hp = Some(hp);
        self
    }

    pub fn with_damage(mut self, damage: i64) -> Self {
        self.damage = damage;
        self
    }

    pub fn with_armor(mut self, armor: i64) -> Self {
        self.armor = armor;
        self
    }

    pub fn with_luck(mut self, luck: i64) -> Self {
        self.luck = luck;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_skills(mut self, skills: &[&str]) -> Self {
        self.skills = skills.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn build(self) -> Combatant {
        let stats = StatBlock::new(d(self.damage), d(self.armor), d(self.luck));
        let mut combatant = Combatant::new(
            self.name.to_lowercase(),
            self.name.clone(),
            self.kind,
            self.side,
            d(self.max_hp),
            stats,
        );
        combatant.element = self.element;
        apply_skill_effects(&mut combatant, &self.skills);
        if let Some(hp) = self.hp {
            combatant.set_hp(d(hp));
        }
        combatant
    }
}

pub fn d(value: i64) -> Decimal {
    Decimal::from(value)
}

/// Creates an arena from the given combatants, in roster order.
pub fn create_test_arena(combatants: Vec<Combatant>) -> BattleArena {
    BattleArena::new(combatants)
}

/// A one-on-one arena. Returns the attacker's and defender's ids.
pub fn create_duel(attacker: Combatant, defender: Combatant) -> (BattleArena, CombatantId, CombatantId) {
    let arena = create_test_arena(vec![attacker, defender]);
    (arena, CombatantId(0), CombatantId(1))
}

/// Creates a `TurnRng` instance with a long list of default values (50).
/// Useful for tests where the specific RNG outcome is not important, preventing panics from exhaustion.
pub fn predictable_rng() -> TurnRng {
    TurnRng::new_for_test(vec![50; 100])
}

/// Every proc fires.
pub fn always_proc_rng() -> TurnRng {
    TurnRng::constant(1)
}

/// Nothing short of a guaranteed proc fires.
pub fn never_proc_rng() -> TurnRng {
    TurnRng::constant(100)
}

/// Default rules without damage variance.
pub fn test_config() -> BattleConfig {
    BattleConfig::deterministic()
}
