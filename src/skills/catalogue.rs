use schema::SkillEffect::*;
use schema::{CrowdControl, DotKind, Element, RevivalKind, SkillEffect, UltimateKind};

/// How a catalogue entry produces its effect.
#[derive(Debug, Clone, Copy)]
pub enum SkillBuilder {
    Fixed(SkillEffect),
    /// Resolved against the learner's element at application time.
    ByElement(fn(Element) -> SkillEffect),
}

impl SkillBuilder {
    pub fn build(&self, element: Element) -> SkillEffect {
        match self {
            SkillBuilder::Fixed(effect) => *effect,
            SkillBuilder::ByElement(build) => build(element),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CatalogueEntry {
    /// Lower-case substring searched for in the learned skill name.
    pub needle: &'static str,
    pub name: &'static str,
    pub builder: SkillBuilder,
}

const fn fixed(needle: &'static str, name: &'static str, effect: SkillEffect) -> CatalogueEntry {
    CatalogueEntry {
        needle,
        name,
        builder: SkillBuilder::Fixed(effect),
    }
}

/// "Storm Lord" exists in both the Electric and the Wind trees.
fn storm_lord(element: Element) -> SkillEffect {
    let kind = match element {
        Element::Wind => UltimateKind::TempestStormLord,
        _ => UltimateKind::ThunderStormLord,
    };
    Ultimate {
        threshold_pct: 30,
        kind,
    }
}

/// Every known skill, in match order. The first needle contained in a
/// learned name wins, so a needle that is a substring of another needle
/// must come after it ("static spark" before "spark").
pub static CATALOGUE: &[CatalogueEntry] = &[
    // ---------------- Fire ----------------
    // Blaze
    fixed("flame burst", "Flame Burst", ProcBonus { chance: 15, multiplier_pct: 150 }),
    fixed("heat wave", "Heat Wave", Splash { pct: 20 }),
    fixed("blazing fury", "Blazing Fury", LowHpFury { threshold_pct: 40, bonus_pct: 35 }),
    fixed("molten core", "Molten Core", ArmorPierce { pct: 30 }),
    fixed(
        "inferno apocalypse",
        "Inferno Apocalypse",
        Ultimate { threshold_pct: 30, kind: UltimateKind::InfernoApocalypse },
    ),
    // Cinder
    fixed(
        "ember touch",
        "Ember Touch",
        ApplyDot { kind: DotKind::Burn, chance: 25, pct_max_hp: 3, turns: 3 },
    ),
    fixed("scorched earth", "Scorched Earth", ArmorShred { chance: 20, pct: 15, turns: 2 }),
    fixed("wildfire", "Wildfire", ChainAttack { chance: 20, hops: 2, falloff_pct: 50 }),
    fixed("searing brand", "Searing Brand", Execute { threshold_pct: 25, multiplier_pct: 150 }),
    fixed("cinder storm", "Cinder Storm", AuraDamage { pct: 3 }),
    // Phoenix
    fixed("warm embers", "Warm Embers", Regeneration { pct: 3 }),
    fixed("fire ward", "Fire Ward", DamageReduction { pct: 10 }),
    fixed("rising flame", "Rising Flame", Growth { pct: 5, max_stacks: 5 }),
    fixed("flame shield", "Flame Shield", PeriodicShield { pct: 15, every: 4 }),
    fixed(
        "phoenix rebirth",
        "Phoenix Rebirth",
        DeathPrevention { revive_pct: 50, kind: RevivalKind::PhoenixRebirth },
    ),
    // ---------------- Water ----------------
    // Tide
    fixed("water jet", "Water Jet", ProcBonus { chance: 20, multiplier_pct: 140 }),
    fixed("riptide", "Riptide", DoubleStrike { chance: 15 }),
    fixed("undertow", "Undertow", Weaken { chance: 25, pct: 20, turns: 2 }),
    fixed("crashing wave", "Crashing Wave", Splash { pct: 30 }),
    fixed(
        "tsunami",
        "Tsunami",
        Ultimate { threshold_pct: 35, kind: UltimateKind::Tsunami },
    ),
    // Frost
    fixed(
        "chilling touch",
        "Chilling Touch",
        SkillEffect::CrowdControl { kind: CrowdControl::Freeze, chance: 10, turns: 1 },
    ),
    fixed(
        "frostbite",
        "Frostbite",
        ApplyDot { kind: DotKind::Frostbite, chance: 25, pct_max_hp: 3, turns: 3 },
    ),
    fixed("ice armor", "Ice Armor", DamageReduction { pct: 15 }),
    fixed(
        "glacial prison",
        "Glacial Prison",
        SkillEffect::CrowdControl { kind: CrowdControl::Freeze, chance: 20, turns: 2 },
    ),
    fixed("absolute zero", "Absolute Zero", Execute { threshold_pct: 30, multiplier_pct: 200 }),
    // Spring
    fixed("healing spring", "Healing Spring", Regeneration { pct: 4 }),
    fixed("purifying waters", "Purifying Waters", Cleanse { every: 3 }),
    fixed("tidal barrier", "Tidal Barrier", ManaShield { pool_pct: 15, absorb_pct: 30 }),
    fixed("ocean's blessing", "Ocean's Blessing", TeamHeal { pct: 5 }),
    fixed(
        "wellspring",
        "Wellspring of Life",
        DeathPrevention { revive_pct: 30, kind: RevivalKind::Wellspring },
    ),
    // ---------------- Electric ----------------
    // Static, ahead of Voltage's "spark"
    fixed("static spark", "Static Spark", Retaliate { chance: 20, pct: 30 }),
    // Voltage
    fixed("spark", "Spark", ProcBonus { chance: 20, multiplier_pct: 130 }),
    fixed("lightning reflexes", "Lightning Reflexes", Dodge { chance: 10 }),
    fixed("overcharge", "Overcharge", Overcharge { every: 3, multiplier_pct: 200 }),
    fixed(
        "thunder strike",
        "Thunder Strike",
        SkillEffect::CrowdControl { kind: CrowdControl::Paralyze, chance: 20, turns: 1 },
    ),
    CatalogueEntry {
        needle: "storm lord",
        name: "Storm Lord",
        builder: SkillBuilder::ByElement(storm_lord),
    },
    // Conduction
    fixed("chain lightning", "Chain Lightning", ChainAttack { chance: 25, hops: 3, falloff_pct: 60 }),
    fixed("conductive field", "Conductive Field", ArmorShred { chance: 25, pct: 10, turns: 3 }),
    fixed("arc flash", "Arc Flash", ArmorPierce { pct: 25 }),
    fixed("superconductor", "Superconductor", Momentum { stack_pct: 5, max_stacks: 5 }),
    fixed(
        "tesla cage",
        "Tesla Cage",
        SkillEffect::CrowdControl { kind: CrowdControl::Stun, chance: 20, turns: 2 },
    ),
    // Static
    fixed("static field", "Static Field", Block { chance: 15, reflect_pct: 50 }),
    fixed("magnetic shield", "Magnetic Shield", PeriodicShield { pct: 10, every: 3 }),
    fixed("energy siphon", "Energy Siphon", LifeSteal { pct: 15 }),
    fixed("lightning rod", "Lightning Rod", Bodyguard { redirect_pct: 40 }),
    // ---------------- Nature ----------------
    // Thorn
    fixed(
        "thorn whip",
        "Thorn Whip",
        ApplyDot { kind: DotKind::Bleed, chance: 25, pct_max_hp: 3, turns: 3 },
    ),
    fixed("barbed hide", "Barbed Hide", Reflect { pct: 40 }),
    fixed(
        "poison ivy",
        "Poison Ivy",
        ApplyDot { kind: DotKind::Poison, chance: 30, pct_max_hp: 4, turns: 3 },
    ),
    fixed(
        "strangling vines",
        "Strangling Vines",
        SkillEffect::CrowdControl { kind: CrowdControl::Root, chance: 25, turns: 1 },
    ),
    fixed(
        "gaia's wrath",
        "Gaia's Wrath",
        Ultimate { threshold_pct: 30, kind: UltimateKind::GaiasWrath },
    ),
    // Grove
    fixed("bark skin", "Bark Skin", DamageReduction { pct: 12 }),
    fixed("photosynthesis", "Photosynthesis", Regeneration { pct: 5 }),
    fixed("nature's embrace", "Nature's Embrace", TeamHeal { pct: 4 }),
    fixed("ancient roots", "Ancient Roots", Fortify { threshold_pct: 30, pct: 40 }),
    fixed("world tree", "World Tree", DotImmunity),
    // Wild
    fixed("feral instinct", "Feral Instinct", CriticalStrike { multiplier_pct: 175 }),
    fixed("pack tactics", "Pack Tactics", OwnerBond { bonus_pct: 20 }),
    fixed("savage roar", "Savage Roar", TeamRally { chance: 20, pct: 15, turns: 2 }),
    fixed("primal rage", "Primal Rage", Momentum { stack_pct: 8, max_stacks: 5 }),
    fixed("alpha predator", "Alpha Predator", Execute { threshold_pct: 25, multiplier_pct: 200 }),
    // ---------------- Wind ----------------
    // Gale
    fixed("tailwind", "Tailwind", FirstStrike),
    fixed("gale force", "Gale Force", ProcBonus { chance: 20, multiplier_pct: 150 }),
    fixed("cyclone", "Cyclone", Splash { pct: 25 }),
    fixed("razor wind", "Razor Wind", ArmorPierce { pct: 40 }),
    // Zephyr
    fixed("wind dance", "Wind Dance", Dodge { chance: 15 }),
    fixed("zephyr's grace", "Zephyr's Grace", Regeneration { pct: 3 }),
    fixed("air shield", "Air Shield", PeriodicShield { pct: 12, every: 3 }),
    fixed("mistral", "Mistral", Cleanse { every: 3 }),
    fixed("eye of the storm", "Eye of the Storm", PhysicalImmunity { charges: 3 }),
    // Tempest
    fixed("whirlwind", "Whirlwind", DoubleStrike { chance: 20 }),
    fixed("downdraft", "Downdraft", Weaken { chance: 25, pct: 15, turns: 2 }),
    fixed("vortex", "Vortex", ChainAttack { chance: 20, hops: 2, falloff_pct: 50 }),
    fixed(
        "hurricane",
        "Hurricane",
        SkillEffect::CrowdControl { kind: CrowdControl::Stun, chance: 15, turns: 1 },
    ),
    fixed(
        "tempest fury",
        "Tempest Fury",
        CooldownStrike { chance: 30, multiplier_pct: 250, cooldown: 3, area: false },
    ),
    // ---------------- Light ----------------
    // Radiance
    fixed("radiant strike", "Radiant Strike", ElementalMastery { bonus_pct: 25 }),
    fixed("blinding flash", "Blinding Flash", Weaken { chance: 20, pct: 25, turns: 1 }),
    fixed("holy light", "Holy Light", TeamHeal { pct: 5 }),
    fixed("purifying light", "Purifying Light", Purge { chance: 25 }),
    fixed(
        "divine judgment",
        "Divine Judgment",
        Ultimate { threshold_pct: 25, kind: UltimateKind::DivineJudgment },
    ),
    // Sanctuary
    fixed("divine shield", "Divine Shield", PeriodicShield { pct: 20, every: 5 }),
    fixed("sacred ward", "Sacred Ward", Block { chance: 20, reflect_pct: 0 }),
    fixed(
        "guardian angel",
        "Guardian Angel",
        DeathPrevention { revive_pct: 30, kind: RevivalKind::GuardianAngel },
    ),
    fixed("sanctuary", "Sanctuary", AllyWard { pct: 10 }),
    fixed(
        "divine invincibility",
        "Divine Invincibility",
        DivineInvincibility { threshold_pct: 20, turns: 2 },
    ),
    // Judgment
    fixed("smite", "Smite", ProcBonus { chance: 20, multiplier_pct: 140 }),
    fixed("penance", "Penance", Retaliate { chance: 25, pct: 40 }),
    fixed("righteous fury", "Righteous Fury", LowHpFury { threshold_pct: 50, bonus_pct: 30 }),
    fixed("lightbringer", "Lightbringer", CriticalStrike { multiplier_pct: 200 }),
    fixed("wrath of heaven", "Wrath of Heaven", Splash { pct: 50 }),
    // ---------------- Dark ----------------
    // Shadow
    fixed("shadow strike", "Shadow Strike", TrueDamageSplit { chance: 25, true_pct: 50 }),
    fixed("umbral cloak", "Umbral Cloak", Dodge { chance: 15 }),
    fixed("backstab", "Backstab", Execute { threshold_pct: 50, multiplier_pct: 130 }),
    fixed("shadow step", "Shadow Step", FirstStrike),
    fixed(
        "eternal night",
        "Eternal Night",
        Ultimate { threshold_pct: 30, kind: UltimateKind::EternalNight },
    ),
    // Abyss
    fixed("life leech", "Life Leech", LifeSteal { pct: 10 }),
    fixed("dread", "Dread", Weaken { chance: 25, pct: 20, turns: 2 }),
    fixed("soul harvest", "Soul Harvest", SoulHarvest { heal_pct: 10, bloodlust_pct: 5 }),
    fixed("abyssal pact", "Abyssal Pact", LowHpFury { threshold_pct: 30, bonus_pct: 60 }),
    fixed("soul reaper", "Soul Reaper", Execute { threshold_pct: 20, multiplier_pct: 300 }),
    // Nightmare
    fixed(
        "night terror",
        "Night Terror",
        SkillEffect::CrowdControl { kind: CrowdControl::Stun, chance: 10, turns: 1 },
    ),
    fixed(
        "curse of agony",
        "Curse of Agony",
        ApplyDot { kind: DotKind::Curse, chance: 25, pct_max_hp: 4, turns: 4 },
    ),
    fixed("hex", "Hex", ArmorShred { chance: 25, pct: 20, turns: 2 }),
    fixed("shadow veil", "Shadow Veil", PhysicalImmunity { charges: 2 }),
    fixed("nightmare realm", "Nightmare Realm", AuraDamage { pct: 4 }),
    // ---------------- Corrupted ----------------
    // Chaos
    fixed("chaos bolt", "Chaos Bolt", VolatileStrike { min_pct: 50, max_pct: 200 }),
    fixed("entropy", "Entropy", ArmorShred { chance: 30, pct: 15, turns: 3 }),
    fixed(
        "chaos storm",
        "Chaos Storm",
        CooldownStrike { chance: 30, multiplier_pct: 200, cooldown: 3, area: true },
    ),
    fixed("madness", "Madness", LowHpFury { threshold_pct: 50, bonus_pct: 50 }),
    fixed(
        "void annihilation",
        "Void Annihilation",
        Ultimate { threshold_pct: 30, kind: UltimateKind::VoidAnnihilation },
    ),
    // Void
    fixed("void touch", "Void Touch", ArmorPierce { pct: 20 }),
    fixed("null field", "Null Field", DotImmunity),
    fixed("void shell", "Void Shell", ManaShield { pool_pct: 20, absorb_pct: 40 }),
    fixed("event horizon", "Event Horizon", Reflect { pct: 50 }),
    fixed("void lord", "Void Lord", Fortify { threshold_pct: 40, pct: 50 }),
    // Plague
    fixed(
        "blight",
        "Blight",
        ApplyDot { kind: DotKind::Corruption, chance: 30, pct_max_hp: 3, turns: 3 },
    ),
    fixed("corrupting touch", "Corrupting Touch", HealBlock { chance: 25, turns: 2 }),
    fixed("plague bearer", "Plague Bearer", Contagion { chance: 30 }),
    fixed("withering decay", "Withering Decay", Weaken { chance: 30, pct: 25, turns: 2 }),
    fixed("pestilence", "Pestilence", AuraDamage { pct: 5 }),
];

/// First catalogue entry whose needle appears in `learned` (case-insensitive).
pub fn find_entry(learned: &str) -> Option<&'static CatalogueEntry> {
    let lowered = learned.to_lowercase();
    CATALOGUE.iter().find(|entry| lowered.contains(entry.needle))
}
