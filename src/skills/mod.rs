// Skill registry: turns learned skill names into resolved effects on a combatant.

pub mod catalogue;

use crate::attributes::Attr;
use crate::combatant::Combatant;
use rust_decimal::Decimal;
use schema::{Element, SkillEffect};
use tracing::debug;

pub use self::catalogue::{find_entry, CatalogueEntry, SkillBuilder, CATALOGUE};

/// Resolves one learned skill name to its canonical name and effect.
pub fn lookup_skill(learned: &str, element: Element) -> Option<(&'static str, SkillEffect)> {
    find_entry(learned).map(|entry| (entry.name, entry.builder.build(element)))
}

/// Populates `combatant`'s skills from its learned skill names. Unknown
/// names are skipped. Returns how many names were recognized.
pub fn apply_skill_effects<S: AsRef<str>>(combatant: &mut Combatant, learned: &[S]) -> usize {
    let mut recognized = 0;
    for name in learned {
        let name = name.as_ref();
        match lookup_skill(name, combatant.element) {
            Some((canonical, effect)) => {
                combatant.learn(canonical, effect);
                prime_standing_attributes(combatant, &effect);
                recognized += 1;
            }
            None => debug!(combatant = %combatant.name, skill = name, "ignoring unknown skill"),
        }
    }
    recognized
}

/// Some skills set a standing attribute at setup instead of during combat.
fn prime_standing_attributes(combatant: &mut Combatant, effect: &SkillEffect) {
    match *effect {
        SkillEffect::FirstStrike => combatant.attrs.set_flag(Attr::FirstStrike),
        SkillEffect::PhysicalImmunity { charges } => {
            combatant
                .attrs
                .set(Attr::PhysicalImmunityCharges, Decimal::from(charges));
        }
        SkillEffect::ManaShield { pool_pct, .. } => {
            let pool = combatant.max_hp() * Decimal::from(pool_pct) / Decimal::ONE_HUNDRED;
            combatant.attrs.set(Attr::ManaShieldPool, pool);
        }
        SkillEffect::Ultimate { threshold_pct, .. } => {
            combatant.attrs.set(
                Attr::UltimateThreshold,
                Decimal::from(threshold_pct) / Decimal::ONE_HUNDRED,
            );
        }
        _ => {}
    }
}
