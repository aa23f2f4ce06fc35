use anyhow::Result;
use guardian_battle::{
    build_arena, BattleConfig, BattleRunner, CheckpointKey, CombatantKind, CombatantRow, Element,
    MemoryCheckpointStore, PetRow, TeamSide, TrustLevel,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn row(
    id: &str,
    name: &str,
    kind: CombatantKind,
    side: TeamSide,
    stats: (i64, i64, i64, i64),
    element: Element,
    skills: &[&str],
) -> CombatantRow {
    let (max_hp, damage, armor, luck) = stats;
    CombatantRow {
        id: id.to_string(),
        name: name.to_string(),
        kind,
        side,
        hp: Decimal::from(max_hp),
        max_hp: Decimal::from(max_hp),
        damage: Decimal::from(damage),
        armor: Decimal::from(armor),
        luck: Decimal::from(luck),
        element,
        owner_id: None,
        skills: skills.iter().map(|s| s.to_string()).collect(),
    }
}

fn sample_roster() -> Vec<CombatantRow> {
    let wolf = PetRow {
        id: "pet-1".to_string(),
        name: "Ashfang".to_string(),
        owner_id: "player-1".to_string(),
        level: 12,
        trust: TrustLevel::Loyal,
        max_hp: Decimal::from(400),
        damage: Decimal::from(60),
        armor: Decimal::from(15),
        luck: Decimal::from(10),
        element: Element::Fire,
        skills: vec!["Ember Touch".to_string(), "Pack Tactics".to_string()],
    };

    vec![
        row(
            "player-1",
            "Kaela",
            CombatantKind::Player,
            TeamSide::Attackers,
            (1200, 140, 40, 15),
            Element::Light,
            &["Radiant Strike", "Sanctuary"],
        ),
        row(
            "player-2",
            "Dorn",
            CombatantKind::Player,
            TeamSide::Attackers,
            (1500, 110, 60, 5),
            Element::Nature,
            &["Bark Skin", "Photosynthesis", "Gaia's Wrath"],
        ),
        wolf.to_combatant_row(TeamSide::Attackers),
        row(
            "guardian-abyss",
            "The Hollow Warden",
            CombatantKind::Guardian,
            TeamSide::Defenders,
            (6000, 220, 80, 20),
            Element::Dark,
            &["Shadow Strike", "Soul Harvest", "Eternal Night", "Umbral Cloak"],
        ),
    ]
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "guardian_battle=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => BattleConfig::load_or_default(&path),
        None => {
            warn!("No config path given, using defaults");
            BattleConfig::default()
        }
    };

    let arena = build_arena(&sample_roster())?;
    let store = Arc::new(MemoryCheckpointStore::new());
    let report = BattleRunner::new("demo-battle", arena, config)
        .with_checkpoint(store, CheckpointKey::new("party", "abyss"))
        .run()
        .await;

    for line in &report.narration {
        println!("{}", line);
    }
    info!(outcome = %report.outcome, rounds = report.rounds, "demo finished");
    println!("Outcome: {} after {} rounds", report.outcome, report.rounds);
    Ok(())
}
