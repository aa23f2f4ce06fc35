use crate::attributes::{Attr, AttributeBag};
use crate::battle::status_effects::{EffectTag, StatusEffect};
use crate::modifiers::StatBlock;
use rust_decimal::Decimal;
use schema::{CombatantKind, Element, ResolutionPass, SkillEffect, TeamSide};
use std::fmt;

/// Index of a combatant inside its battle arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombatantId(pub usize);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A skill resolved from a learned-skill name.
#[derive(Debug, Clone, PartialEq)]
pub struct LearnedSkill {
    pub name: &'static str,
    pub effect: SkillEffect,
}

/// One participant of a battle with its live combat state.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub id: CombatantId,
    /// External identity: player id, pet id or guardian name.
    pub key: String,
    pub name: String,
    pub kind: CombatantKind,
    pub side: TeamSide,
    pub element: Element,
    /// Weak link from a pet to its owner inside the same arena.
    pub owner: Option<CombatantId>,
    hp: Decimal,
    max_hp: Decimal,
    pub stats: StatBlock,
    pub attrs: AttributeBag,
    pub status_effects: Vec<StatusEffect>,
    pub skills: Vec<LearnedSkill>,
    pub kills: u32,
}

impl Combatant {
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        kind: CombatantKind,
        side: TeamSide,
        max_hp: Decimal,
        stats: StatBlock,
    ) -> Self {
        let max_hp = max_hp.max(Decimal::ZERO);
        Self {
            id: CombatantId(0),
            key: key.into(),
            name: name.into(),
            kind,
            side,
            element: Element::Unknown,
            owner: None,
            hp: max_hp,
            max_hp,
            stats,
            attrs: AttributeBag::new(),
            status_effects: Vec::new(),
            skills: Vec::new(),
            kills: 0,
        }
    }

    pub fn hp(&self) -> Decimal {
        self.hp
    }

    pub fn max_hp(&self) -> Decimal {
        self.max_hp
    }

    /// Sets current HP, clamped to `0..=max_hp`.
    pub fn set_hp(&mut self, hp: Decimal) {
        self.hp = hp.max(Decimal::ZERO).min(self.max_hp);
    }

    pub fn hp_ratio(&self) -> Decimal {
        if self.max_hp.is_zero() {
            return Decimal::ZERO;
        }
        self.hp / self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > Decimal::ZERO
    }

    pub fn is_pet(&self) -> bool {
        self.kind == CombatantKind::Pet
    }

    /// Applies damage, draining the shield attribute first. Negative amounts
    /// are treated as zero. Returns the new HP.
    pub fn take_damage(&mut self, amount: Decimal) -> Decimal {
        let mut remaining = amount.max(Decimal::ZERO);
        let shield = self.attrs.get_or_zero(Attr::Shield);
        if shield > Decimal::ZERO {
            let absorbed = shield.min(remaining);
            self.attrs.set(Attr::Shield, shield - absorbed);
            remaining -= absorbed;
        }
        self.set_hp(self.hp - remaining);
        self.hp
    }

    /// Heals up to max HP. Returns the new HP.
    pub fn heal(&mut self, amount: Decimal) -> Decimal {
        self.set_hp(self.hp + amount.max(Decimal::ZERO));
        self.hp
    }

    /// Attaches an effect, merging into an existing one of the same family.
    pub fn add_status_effect(&mut self, mut effect: StatusEffect) {
        if let Some(existing) = self
            .status_effects
            .iter_mut()
            .find(|existing| existing.merges_with(&effect))
        {
            existing.on_remove(&mut self.stats);
            existing.merge(effect);
            existing.on_apply(&mut self.stats);
            return;
        }
        effect.holder = Some(self.id);
        effect.on_apply(&mut self.stats);
        self.status_effects.push(effect);
    }

    /// Detaches every effect with the given name.
    pub fn remove_status_effect(&mut self, name: &str) -> Vec<StatusEffect> {
        self.detach_where(|effect| effect.name() == name)
    }

    pub fn remove_effects_by_tag(&mut self, tag: EffectTag) -> Vec<StatusEffect> {
        self.detach_where(|effect| effect.has_tag(tag))
    }

    pub fn has_status_effect(&self, name: &str) -> bool {
        self.status_effects.iter().any(|effect| effect.name() == name)
    }

    fn detach_where(&mut self, predicate: impl Fn(&StatusEffect) -> bool) -> Vec<StatusEffect> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.status_effects)
            .into_iter()
            .partition(|effect| predicate(effect));
        self.status_effects = kept;
        for effect in &removed {
            effect.on_remove(&mut self.stats);
        }
        removed
    }

    /// Ticks every attached effect and detaches the expired ones.
    pub fn process_status_effects(&mut self) -> Vec<String> {
        for effect in self.status_effects.iter_mut() {
            effect.tick();
        }
        self.detach_where(|effect| effect.is_spent())
            .iter()
            .map(|effect| effect.expiry_notice(&self.name))
            .collect()
    }

    pub fn can_act(&self) -> bool {
        !self.status_effects.iter().any(|effect| effect.is_incapacitating())
    }

    pub fn get_outgoing_damage(&self, base: Decimal, target: &Combatant) -> Decimal {
        self.status_effects
            .iter()
            .fold(base, |amount, effect| effect.modify_outgoing(amount, target))
            .max(Decimal::ZERO)
    }

    pub fn get_incoming_damage(&self, amount: Decimal, source: Option<&Combatant>) -> Decimal {
        self.status_effects
            .iter()
            .fold(amount, |amount, effect| effect.modify_incoming(amount, source))
            .max(Decimal::ZERO)
    }

    pub fn on_attack(&mut self) -> Vec<String> {
        let name = self.name.clone();
        let messages = self
            .status_effects
            .iter_mut()
            .filter_map(|effect| effect.on_attack(&name))
            .collect();
        self.detach_where(|effect| effect.is_spent());
        messages
    }

    pub fn on_defend(&mut self) -> Vec<String> {
        let name = self.name.clone();
        let messages = self
            .status_effects
            .iter_mut()
            .filter_map(|effect| effect.on_defend(&name))
            .collect();
        self.detach_where(|effect| effect.is_spent());
        messages
    }

    /// Marks every attached effect as belonging to an earlier attack.
    pub fn settle_status_effects(&mut self) {
        for effect in self.status_effects.iter_mut() {
            effect.settled = true;
        }
    }

    /// Learned skills that the given resolution pass consumes.
    pub fn skills_for(&self, pass: ResolutionPass) -> Vec<LearnedSkill> {
        self.skills
            .iter()
            .filter(|skill| skill.effect.pass() == pass)
            .cloned()
            .collect()
    }

    pub fn skill_effects(&self) -> impl Iterator<Item = &SkillEffect> {
        self.skills.iter().map(|skill| &skill.effect)
    }

    pub fn learn(&mut self, name: &'static str, effect: SkillEffect) {
        if self.skills.iter().any(|skill| skill.name == name) {
            return;
        }
        self.skills.push(LearnedSkill { name, effect });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::{CrowdControl, DotKind};

    fn dummy(hp: i64) -> Combatant {
        Combatant::new(
            "dummy",
            "Dummy",
            CombatantKind::Player,
            TeamSide::Attackers,
            Decimal::from(hp),
            StatBlock::new(Decimal::from(10), Decimal::ZERO, Decimal::ZERO),
        )
    }

    #[test]
    fn test_shield_absorbs_partial_hit() {
        let mut combatant = dummy(100);
        combatant.attrs.set(Attr::Shield, Decimal::from(50));

        combatant.take_damage(Decimal::from(30));

        assert_eq!(combatant.attrs.get_or_zero(Attr::Shield), Decimal::from(20));
        assert_eq!(combatant.hp(), Decimal::from(100));
    }

    #[test]
    fn test_shield_overflow_hits_hp() {
        let mut combatant = dummy(100);
        combatant.attrs.set(Attr::Shield, Decimal::from(50));

        combatant.take_damage(Decimal::from(80));

        assert_eq!(combatant.attrs.get_or_zero(Attr::Shield), Decimal::ZERO);
        assert!(!combatant.attrs.has(Attr::Shield));
        assert_eq!(combatant.hp(), Decimal::from(70));
    }

    #[test]
    fn test_negative_damage_is_ignored() {
        let mut combatant = dummy(100);
        combatant.take_damage(Decimal::from(-40));
        assert_eq!(combatant.hp(), Decimal::from(100));
    }

    #[test]
    fn test_hp_clamps_both_ways() {
        let mut combatant = dummy(100);

        combatant.take_damage(Decimal::from(250));
        assert_eq!(combatant.hp(), Decimal::ZERO);
        assert!(!combatant.is_alive());

        combatant.heal(Decimal::from(500));
        assert_eq!(combatant.hp(), Decimal::from(100));
    }

    #[test]
    fn test_same_family_merges_without_growing_list() {
        let mut combatant = dummy(100);

        combatant.add_status_effect(StatusEffect::damage_over_time(DotKind::Poison, Decimal::from(4), 3));
        combatant.add_status_effect(StatusEffect::damage_over_time(DotKind::Poison, Decimal::from(4), 3));

        assert_eq!(combatant.status_effects.len(), 1);
        assert_eq!(combatant.status_effects[0].magnitude(), Some(Decimal::from(8)));
        assert_eq!(combatant.status_effects[0].holder, Some(combatant.id));
    }

    #[test]
    fn test_incapacitated_cannot_act_until_expiry() {
        let mut combatant = dummy(100);
        combatant.add_status_effect(StatusEffect::crowd_control(CrowdControl::Stun, 1));
        assert!(!combatant.can_act());

        let notices = combatant.process_status_effects();

        assert!(combatant.can_act());
        assert_eq!(notices, vec!["Dummy's Stun wore off.".to_string()]);
    }

    #[test]
    fn test_remove_by_tag_reverts_stats() {
        let mut combatant = dummy(100);
        combatant.stats = StatBlock::new(Decimal::from(10), Decimal::from(40), Decimal::ZERO);
        combatant.add_status_effect(StatusEffect::armor_break(Decimal::from(50), 3));
        combatant.add_status_effect(StatusEffect::empowered(Decimal::from(10), 3));
        assert_eq!(combatant.stats.armor(), Decimal::from(20));

        let removed = combatant.remove_effects_by_tag(EffectTag::Debuff);

        assert_eq!(removed.len(), 1);
        assert_eq!(combatant.stats.armor(), Decimal::from(40));
        assert_eq!(combatant.status_effects.len(), 1);
    }

    #[test]
    fn test_outgoing_fold_in_attachment_order() {
        let mut attacker = dummy(100);
        let target = dummy(100);
        attacker.add_status_effect(StatusEffect::empowered(Decimal::from(50), 2));
        attacker.add_status_effect(StatusEffect::weakened(Decimal::from(50), 2));

        // (100 * 1.5) * 0.5
        assert_eq!(attacker.get_outgoing_damage(Decimal::from(100), &target), Decimal::from(75));
    }

    #[test]
    fn test_frozen_target_shatters_when_hit() {
        let mut combatant = dummy(100);
        combatant.add_status_effect(StatusEffect::crowd_control(CrowdControl::Freeze, 3));
        combatant.settle_status_effects();

        let messages = combatant.on_defend();

        assert_eq!(messages.len(), 1);
        assert!(combatant.can_act());
    }

    #[test]
    fn test_fresh_ice_survives_the_blow_that_placed_it() {
        let mut combatant = dummy(100);
        combatant.add_status_effect(StatusEffect::crowd_control(CrowdControl::Freeze, 2));

        let messages = combatant.on_defend();

        assert!(messages.is_empty());
        assert!(!combatant.can_act());
    }
}
