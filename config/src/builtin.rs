//! Hardcoded tables used whenever configuration files are missing or malformed.

use std::collections::BTreeMap;

use crate::records::{BossRecord, EnemyRecord, PatternSpec, SpawnArrangement, WaveRecord};

pub(crate) fn enemies() -> BTreeMap<String, EnemyRecord> {
    let mut table = BTreeMap::new();
    let _ = table.insert(
        "scout".to_owned(),
        EnemyRecord {
            health: 20,
            asset_key: "enemy_scout".to_owned(),
            movement: PatternSpec::new("straight").with("speed", 150.0),
            attack: PatternSpec::new("none"),
            score_value: None,
        },
    );
    let _ = table.insert(
        "fighter".to_owned(),
        EnemyRecord {
            health: 40,
            asset_key: "enemy_fighter".to_owned(),
            movement: PatternSpec::new("sine_wave")
                .with("speed", 120.0)
                .with("amplitude", 80.0),
            attack: PatternSpec::new("single_shot_player")
                .with("bullet_speed", 250.0)
                .with("cooldown", 2.0),
            score_value: None,
        },
    );
    let _ = table.insert(
        "gunship".to_owned(),
        EnemyRecord {
            health: 80,
            asset_key: "enemy_gunship".to_owned(),
            movement: PatternSpec::new("straight").with("speed", 60.0),
            attack: PatternSpec::new("spread_shot")
                .with("spread_angle", 20.0)
                .with("cooldown", 2.5),
            score_value: None,
        },
    );
    let _ = table.insert(
        "interceptor".to_owned(),
        EnemyRecord {
            health: 30,
            asset_key: "enemy_interceptor".to_owned(),
            movement: PatternSpec::new("dive")
                .with("speed", 140.0)
                .with("dive_y", 150.0),
            attack: PatternSpec::new("burst_fire").with("cooldown", 3.0),
            score_value: None,
        },
    );
    let _ = table.insert(
        "bomber".to_owned(),
        EnemyRecord {
            health: 120,
            asset_key: "enemy_bomber".to_owned(),
            movement: PatternSpec::new("zigzag")
                .with("speed", 50.0)
                .with("zigzag_width", 120.0)
                .with("zigzag_frequency", 1.5),
            attack: PatternSpec::new("circular_shot").with("cooldown", 3.0),
            score_value: None,
        },
    );
    let _ = table.insert(
        "basic".to_owned(),
        EnemyRecord {
            health: 25,
            asset_key: "enemy".to_owned(),
            movement: PatternSpec::new("cosine_wave").with("speed", 100.0),
            attack: PatternSpec::new("single_shot_down").with("cooldown", 2.0),
            score_value: None,
        },
    );
    table
}

pub(crate) fn bosses() -> BTreeMap<String, BossRecord> {
    let mut table = BTreeMap::new();
    let _ = table.insert(
        "angry_migam".to_owned(),
        BossRecord {
            health: 1000,
            asset_key: "migamboss".to_owned(),
            phases: 3,
            movement: PatternSpec::new("boss_hover"),
            attack_phases: vec![
                PatternSpec::new("spread_shot_image")
                    .with("image", "jesus")
                    .with("bullet_count", 5.0)
                    .with("spread_angle", 30.0)
                    .with("cooldown", 1.5),
                PatternSpec::new("fast_forward_shot_image")
                    .with("image", "tang")
                    .with("bullet_speed", 600.0)
                    .with("cooldown", 0.5),
                PatternSpec::new("blue_screen_attack")
                    .with("num_points", 5.0)
                    .with("delay", 1.0)
                    .with("cooldown", 3.0),
            ],
            scale_factor: 2.0,
        },
    );
    let _ = table.insert(
        "handsome_gilgil".to_owned(),
        BossRecord {
            health: 1500,
            asset_key: "gilgilboss".to_owned(),
            phases: 1,
            movement: PatternSpec::new("boss_hover")
                .with("speed", 30.0)
                .with("amplitude", 120.0),
            attack_phases: vec![PatternSpec::new("circular_shot")
                .with("bullet_count", 16.0)
                .with("cooldown", 1.0)],
            scale_factor: 2.0,
        },
    );
    let _ = table.insert(
        "cyber_fortress".to_owned(),
        BossRecord {
            health: 2000,
            asset_key: "cyber_fortress".to_owned(),
            phases: 3,
            movement: PatternSpec::new("boss_fortress"),
            attack_phases: vec![
                PatternSpec::new("spread_shot")
                    .with("bullet_count", 5.0)
                    .with("spread_angle", 25.0)
                    .with("cooldown", 1.2),
                PatternSpec::new("circular_shot")
                    .with("bullet_count", 12.0)
                    .with("cooldown", 1.5),
                PatternSpec::new("burst_fire")
                    .with("burst_count", 5.0)
                    .with("cooldown", 1.0),
            ],
            scale_factor: 3.0,
        },
    );
    let _ = table.insert(
        "network_overlord".to_owned(),
        BossRecord {
            health: 1800,
            asset_key: "network_overlord".to_owned(),
            phases: 2,
            movement: PatternSpec::new("boss_teleport"),
            attack_phases: vec![
                PatternSpec::new("burst_fire").with("cooldown", 1.5),
                PatternSpec::new("blue_screen_attack")
                    .with("num_points", 7.0)
                    .with("cooldown", 2.5),
            ],
            scale_factor: 2.5,
        },
    );
    let _ = table.insert(
        "packet_storm".to_owned(),
        BossRecord {
            health: 1500,
            asset_key: "packet_storm".to_owned(),
            phases: 2,
            movement: PatternSpec::new("boss_hover").with("amplitude", 200.0),
            attack_phases: vec![
                PatternSpec::new("circular_shot")
                    .with("bullet_count", 12.0)
                    .with("cooldown", 1.2),
                PatternSpec::new("circular_shot")
                    .with("bullet_count", 20.0)
                    .with("cooldown", 0.8),
            ],
            scale_factor: 2.5,
        },
    );
    table
}

pub(crate) fn waves() -> BTreeMap<u32, WaveRecord> {
    let mut table = BTreeMap::new();
    let _ = table.insert(
        1,
        WaveRecord::new(
            "Scout Wave",
            quota(&[("scout", 8)]),
            1200,
            SpawnArrangement::Random,
        ),
    );
    let _ = table.insert(
        2,
        WaveRecord::new(
            "Fighter Squadron",
            quota(&[("fighter", 6), ("scout", 6)]),
            1000,
            SpawnArrangement::Random,
        ),
    );
    let _ = table.insert(
        3,
        WaveRecord::new(
            "Heavy Assault",
            quota(&[("gunship", 4), ("fighter", 8), ("interceptor", 3)]),
            800,
            SpawnArrangement::Formation,
        ),
    );
    let _ = table.insert(
        4,
        WaveRecord::new(
            "Bomber Wing",
            quota(&[("bomber", 3), ("interceptor", 6), ("gunship", 4), ("fighter", 6)]),
            700,
            SpawnArrangement::Waves,
        ),
    );
    let _ = table.insert(
        5,
        WaveRecord::new(
            "Elite Forces",
            quota(&[
                ("bomber", 4),
                ("interceptor", 8),
                ("gunship", 6),
                ("fighter", 10),
                ("scout", 5),
            ]),
            600,
            SpawnArrangement::Mixed,
        ),
    );
    table
}

fn quota(entries: &[(&str, u32)]) -> BTreeMap<String, u32> {
    entries
        .iter()
        .map(|(kind, count)| ((*kind).to_owned(), *count))
        .collect()
}
