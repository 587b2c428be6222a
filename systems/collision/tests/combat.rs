use std::time::Duration;

use packet_striker_config::CombatTuning;
use packet_striker_core::{Command, DestroyCause, Event, PlayerIntent, SpawnOrigin, Vec2};
use packet_striker_system_collision::{Collision, Config, Scoring};
use packet_striker_world::{self as world, query, World};

const FRAME: Duration = Duration::from_millis(16);

fn step(world: &mut World, collision: &Collision, scoring: &mut Scoring) -> Vec<Event> {
    let mut events = Vec::new();
    world::apply(world, Command::Tick { dt: FRAME }, &mut events);

    let mut commands = Vec::new();
    collision.handle(
        &query::player_snapshot(world),
        &query::enemy_view(world),
        &query::projectile_view(world),
        &query::power_up_view(world),
        &mut commands,
    );
    for command in commands {
        world::apply(world, command, &mut events);
    }

    let mut drops = Vec::new();
    scoring.handle(&events, &mut drops);
    for command in drops {
        world::apply(world, command, &mut events);
    }
    events
}

fn spawn(world: &mut World, kind: &str, position: Vec2) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SpawnEnemy {
            kind: kind.to_owned(),
            position,
            origin: SpawnOrigin::Wave { wave: 1 },
        },
        &mut events,
    );
}

fn hold_fire(world: &mut World) {
    let mut events = Vec::new();
    world::apply(
        world,
        Command::SetPlayerIntent {
            intent: PlayerIntent {
                direction: Vec2::ZERO,
                fire: true,
            },
        },
        &mut events,
    );
}

#[test]
fn one_heavy_shot_kills_a_scout_for_fifty_points() {
    let combat = CombatTuning {
        bullet_damage_enemy: 25,
        power_up_drop_chance: 0.0,
        ..CombatTuning::default()
    };
    let collision = Collision::new(Config::new(combat));
    let mut scoring = Scoring::new(&combat, 5);
    let mut world = World::default();
    spawn(&mut world, "scout", Vec2::new(600.0, 300.0));
    hold_fire(&mut world);

    let mut destroyed = None;
    for _ in 0..200 {
        let events = step(&mut world, &collision, &mut scoring);
        destroyed = events.into_iter().find(|event| matches!(event, Event::EnemyDestroyed { .. }));
        if destroyed.is_some() {
            break;
        }
    }

    assert!(matches!(
        destroyed,
        Some(Event::EnemyDestroyed {
            score_value: 50,
            cause: DestroyCause::PlayerFire,
            ..
        })
    ));
    assert_eq!(scoring.score(), 50);
    assert_eq!(query::enemy_count(&world), 0);
}

#[test]
fn ramming_costs_health_and_scores_nothing() {
    let combat = CombatTuning::default();
    let collision = Collision::new(Config::new(combat));
    let mut scoring = Scoring::new(&combat, 5);
    let mut world = World::default();
    spawn(&mut world, "scout", Vec2::new(600.0, 790.0));

    let events = step(&mut world, &collision, &mut scoring);
    assert!(events.contains(&Event::PlayerDamaged {
        amount: 30,
        remaining_health: 970
    }));
    assert!(events.iter().any(|event| matches!(
        event,
        Event::EnemyDestroyed {
            cause: DestroyCause::Contact,
            ..
        }
    )));
    assert_eq!(scoring.score(), 0);
    assert!(query::player(&world).is_invulnerable());
}
