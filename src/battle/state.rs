use crate::combatant::{Combatant, CombatantId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use schema::TeamSide;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::ops::{Index, IndexMut};

/// Terminal (or not yet terminal) state of a battle, seen from the attacking side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    Ongoing,
    Victory,
    Defeat,
    Timeout,
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            BattleOutcome::Ongoing => "ongoing",
            BattleOutcome::Victory => "victory",
            BattleOutcome::Defeat => "defeat",
            BattleOutcome::Timeout => "timeout",
        };
        write!(f, "{}", tag)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Round management
    RoundStarted {
        round: u32,
    },
    RoundEnded,

    // Actions
    TurnSkipped {
        actor: CombatantId,
    },
    Attacked {
        attacker: CombatantId,
        target: CombatantId,
        damage: Decimal,
    },
    /// Free-form line produced by effect resolution.
    Narration(String),

    // Results
    CombatantDefeated {
        combatant: CombatantId,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

impl BattleEvent {
    /// Human-readable text for this event, or `None` for silent bookkeeping.
    pub fn format(&self, arena: &BattleArena) -> Option<String> {
        let name = |id: &CombatantId| {
            arena
                .get(*id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| format!("combatant {}", id))
        };
        match self {
            BattleEvent::RoundStarted { round } => Some(format!("=== Round {} ===", round)),
            BattleEvent::RoundEnded => None,
            BattleEvent::TurnSkipped { actor } => {
                Some(format!("{} is unable to act!", name(actor)))
            }
            BattleEvent::Attacked {
                attacker,
                target,
                damage,
            } => Some(format!(
                "{} attacks {} for {} damage.",
                name(attacker),
                name(target),
                damage.round_dp(0)
            )),
            BattleEvent::Narration(line) => Some(line.clone()),
            BattleEvent::CombatantDefeated { combatant } => {
                Some(format!("{} has been defeated!", name(combatant)))
            }
            BattleEvent::BattleEnded { outcome } => match outcome {
                BattleOutcome::Victory => Some("The guardian has fallen. Victory!".to_string()),
                BattleOutcome::Defeat => Some("The party has been wiped out.".to_string()),
                BattleOutcome::Timeout => Some("The battle has dragged on too long.".to_string()),
                BattleOutcome::Ongoing => None,
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Push each line as a narration event.
    pub fn narrate(&mut self, lines: impl IntoIterator<Item = String>) {
        self.events
            .extend(lines.into_iter().map(BattleEvent::Narration));
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Print all events in debug format with indentation.
    pub fn print_debug(&self) {
        for event in &self.events {
            println!("  {:?}", event);
        }
    }

    /// Print all events in debug format with a custom prefix message.
    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        self.print_debug();
    }

    /// Print all events using their formatted text, falling back to debug
    /// format for silent events.
    pub fn print_formatted(&self, arena: &BattleArena) {
        for event in &self.events {
            match event.format(arena) {
                Some(formatted) => println!("  {}", formatted),
                None => println!("  {:?} (silent)", event),
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl fmt::Display for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "  {:?}", event)?;
        }
        Ok(())
    }
}

/// Bounded narration log. The oldest lines fall off once full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleLog {
    capacity: usize,
    lines: VecDeque<String>,
}

impl BattleLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            lines: VecDeque::new(),
        }
    }

    pub fn push(&mut self, line: String) {
        if self.lines.len() == self.capacity {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn lines(&self) -> impl Iterator<Item = &String> {
        self.lines.iter()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.lines.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[derive(Debug, Clone)]
enum RngSource {
    Scripted { outcomes: Vec<u8>, index: usize },
    Constant(u8),
    Seeded(StdRng),
}

/// Source of every random decision in a battle. Rolls are percentages in
/// `1..=100`; a proc with chance `c` fires when the roll is `<= c`.
#[derive(Debug, Clone)]
pub struct TurnRng {
    source: RngSource,
}

impl TurnRng {
    pub fn new_for_test(outcomes: Vec<u8>) -> Self {
        Self {
            source: RngSource::Scripted { outcomes, index: 0 },
        }
    }

    /// Every roll returns `outcome`. `1` makes every proc fire, `100` makes
    /// everything short of a guaranteed proc miss.
    pub fn constant(outcome: u8) -> Self {
        Self {
            source: RngSource::Constant(outcome.clamp(1, 100)),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn new_random() -> Self {
        Self {
            source: RngSource::Seeded(StdRng::from_os_rng()),
        }
    }

    pub fn next_outcome(&mut self, reason: &str) -> u8 {
        let outcome = match &mut self.source {
            RngSource::Scripted { outcomes, index } => {
                if *index >= outcomes.len() {
                    panic!(
                        "TurnRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                        reason
                    );
                }
                let outcome = outcomes[*index];
                *index += 1;
                outcome
            }
            RngSource::Constant(outcome) => *outcome,
            RngSource::Seeded(rng) => rng.random_range(1..=100),
        };

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", outcome, reason);
        tracing::trace!(outcome, reason, "rng roll");

        outcome
    }

    /// Rolls against a percentage chance. A zero chance never consumes a roll.
    pub fn roll(&mut self, chance: u8, reason: &str) -> bool {
        chance > 0 && self.next_outcome(reason) <= chance
    }

    /// A value in `0..len`. Panics on an empty range.
    pub fn index(&mut self, len: usize, reason: &str) -> usize {
        assert!(len > 0, "TurnRng::index called with an empty range for: '{}'", reason);
        if let RngSource::Seeded(rng) = &mut self.source {
            return rng.random_range(0..len);
        }
        let outcome = self.next_outcome(reason) as usize;
        ((outcome - 1) * len / 100).min(len - 1)
    }

    /// Index into `weights`, chosen proportionally. Falls back to a uniform
    /// pick when every weight is zero.
    pub fn weighted_index(&mut self, weights: &[Decimal], reason: &str) -> Option<usize> {
        if weights.is_empty() {
            return None;
        }
        let total: Decimal = weights.iter().map(|w| (*w).max(Decimal::ZERO)).sum();
        if total <= Decimal::ZERO {
            return Some(self.index(weights.len(), reason));
        }
        let point = total * Decimal::from(self.next_outcome(reason)) / Decimal::ONE_HUNDRED;
        let mut cumulative = Decimal::ZERO;
        for (i, weight) in weights.iter().enumerate() {
            cumulative += (*weight).max(Decimal::ZERO);
            if point <= cumulative {
                return Some(i);
            }
        }
        Some(weights.len() - 1)
    }

    /// Fraction in `[0, 1]` derived from one roll.
    pub fn fraction(&mut self, reason: &str) -> Decimal {
        Decimal::from(self.next_outcome(reason) - 1) / Decimal::from(99)
    }

    pub fn shuffle<T>(&mut self, items: &mut [T], reason: &str) {
        for i in (1..items.len()).rev() {
            let j = self.index(i + 1, reason);
            items.swap(i, j);
        }
    }
}

/// Every combatant of one fight. Relations between combatants are stored as
/// indices into this arena.
#[derive(Debug, Clone, Default)]
pub struct BattleArena {
    combatants: Vec<Combatant>,
}

impl BattleArena {
    pub fn new(combatants: Vec<Combatant>) -> Self {
        let mut arena = Self::default();
        for combatant in combatants {
            arena.push(combatant);
        }
        arena
    }

    pub fn push(&mut self, mut combatant: Combatant) -> CombatantId {
        let id = CombatantId(self.combatants.len());
        combatant.id = id;
        for effect in combatant.status_effects.iter_mut() {
            effect.holder = Some(id);
        }
        self.combatants.push(combatant);
        id
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.0)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Combatant> {
        self.combatants.iter_mut()
    }

    pub fn ids(&self) -> Vec<CombatantId> {
        (0..self.combatants.len()).map(CombatantId).collect()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn find_by_key(&self, key: &str) -> Option<CombatantId> {
        self.combatants.iter().find(|c| c.key == key).map(|c| c.id)
    }

    pub fn is_alive(&self, id: CombatantId) -> bool {
        self.get(id).is_some_and(|c| c.is_alive())
    }

    /// Living combatants on `side`.
    pub fn living_on(&self, side: TeamSide) -> Vec<CombatantId> {
        self.combatants
            .iter()
            .filter(|c| c.side == side && c.is_alive())
            .map(|c| c.id)
            .collect()
    }

    /// Living teammates of `id`, excluding `id` itself.
    pub fn allies_of(&self, id: CombatantId) -> Vec<CombatantId> {
        match self.get(id) {
            Some(me) => self
                .living_on(me.side)
                .into_iter()
                .filter(|other| *other != id)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Living teammates of `id`, including `id` if alive.
    pub fn team_of(&self, id: CombatantId) -> Vec<CombatantId> {
        self.get(id)
            .map(|me| self.living_on(me.side))
            .unwrap_or_default()
    }

    pub fn enemies_of(&self, id: CombatantId) -> Vec<CombatantId> {
        self.get(id)
            .map(|me| self.living_on(me.side.opponent()))
            .unwrap_or_default()
    }

    pub fn owner_of(&self, id: CombatantId) -> Option<CombatantId> {
        self.get(id).and_then(|c| c.owner)
    }

    /// Living pets linked to `owner`.
    pub fn pets_of(&self, owner: CombatantId) -> Vec<CombatantId> {
        self.combatants
            .iter()
            .filter(|c| c.owner == Some(owner) && c.is_alive())
            .map(|c| c.id)
            .collect()
    }

    pub fn side_alive(&self, side: TeamSide) -> bool {
        self.combatants.iter().any(|c| c.side == side && c.is_alive())
    }
}

impl Index<CombatantId> for BattleArena {
    type Output = Combatant;

    fn index(&self, id: CombatantId) -> &Combatant {
        &self.combatants[id.0]
    }
}

impl IndexMut<CombatantId> for BattleArena {
    fn index_mut(&mut self, id: CombatantId) -> &mut Combatant {
        &mut self.combatants[id.0]
    }
}

/// Live state of one fight.
#[derive(Debug, Clone)]
pub struct BattleState {
    pub battle_id: String,
    pub arena: BattleArena,
    pub round: u32,
    pub outcome: BattleOutcome,
    pub log: BattleLog,
}

impl BattleState {
    pub fn new(battle_id: impl Into<String>, arena: BattleArena, log_capacity: usize) -> Self {
        Self {
            battle_id: battle_id.into(),
            arena,
            round: 0,
            outcome: BattleOutcome::Ongoing,
            log: BattleLog::new(log_capacity),
        }
    }

    /// Format the bus into the log, returning the formatted lines.
    pub fn record(&mut self, bus: &EventBus) -> Vec<String> {
        let lines: Vec<String> = bus
            .events()
            .iter()
            .filter_map(|event| event.format(&self.arena))
            .collect();
        for line in &lines {
            self.log.push(line.clone());
        }
        lines
    }
}
