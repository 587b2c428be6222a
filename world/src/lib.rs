#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Packet Striker.
//!
//! The world owns every live entity. Adapters and systems mutate it only
//! through [`apply`], and observe it through the read-only [`query`]
//! functions.

pub mod boss;
pub mod enemy;
pub mod player;
pub mod projectile;

use std::time::Duration;

use packet_striker_config::{CombatTuning, ConfigTables, PlayerTuning};
use packet_striker_core::{
    sprites::{
        SpriteCatalog, BLUE_SCREEN_SPRITE, ENEMY_BULLET_SPRITE, PLAYER_BULLET_SPRITE, PLAYER_SPRITE,
        WARNING_POINT_SPRITE,
    },
    Command, DestroyCause, EnemyId, Event, Playfield, PowerUpId, PowerUpKind, ProjectileId,
    ProjectileOwner, SoundCue, Vec2, WELCOME_BANNER,
};
use packet_striker_system_patterns::AttackEffect;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use boss::Boss;
use enemy::{DamageOutcome, Enemy};
use player::{Player, Shot};
use projectile::{PowerUp, Projectile, WarningPoint};

const DEFAULT_WORLD_SEED: u64 = 0x5eed_0f_9ac4_e75e;

/// Parameters used to build a [`World`].
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Size of the playfield.
    pub playfield: Playfield,
    /// Enemy, boss and wave tables.
    pub tables: ConfigTables,
    /// Known sprite sizes.
    pub sprites: SpriteCatalog,
    /// Player handling.
    pub player: PlayerTuning,
    /// Damage values; the world applies warning-point strikes itself.
    pub combat: CombatTuning,
    /// Seed for movement and attack randomness.
    pub seed: u64,
}

impl WorldConfig {
    /// Creates a configuration with builtin tables and tuning.
    #[must_use]
    pub fn new(tables: ConfigTables, seed: u64) -> Self {
        Self {
            playfield: Playfield::default(),
            tables,
            sprites: SpriteCatalog::builtin(),
            player: PlayerTuning::default(),
            combat: CombatTuning::default(),
            seed,
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self::new(ConfigTables::builtin(), DEFAULT_WORLD_SEED)
    }
}

/// Represents the authoritative Packet Striker world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    playfield: Playfield,
    tables: ConfigTables,
    sprites: SpriteCatalog,
    rng: ChaCha8Rng,
    player: Player,
    enemies: Vec<Enemy>,
    bosses: Vec<Boss>,
    projectiles: Vec<Projectile>,
    power_ups: Vec<PowerUp>,
    warning_points: Vec<WarningPoint>,
    warning_point_damage: i32,
    next_enemy_id: u32,
    next_projectile_id: u32,
    next_power_up_id: u32,
    tick_index: u64,
}

impl World {
    /// Creates a new world with the player at its spawn point.
    #[must_use]
    pub fn new(config: WorldConfig) -> Self {
        let WorldConfig {
            playfield,
            tables,
            mut sprites,
            player,
            combat,
            seed,
        } = config;
        let player_size = sprites.resolve(PLAYER_SPRITE).size;
        Self {
            banner: WELCOME_BANNER,
            playfield,
            tables,
            sprites,
            rng: ChaCha8Rng::seed_from_u64(seed),
            player: Player::new(player, playfield, player_size),
            enemies: Vec::new(),
            bosses: Vec::new(),
            projectiles: Vec::new(),
            power_ups: Vec::new(),
            warning_points: Vec::new(),
            warning_point_damage: combat.warning_point_damage,
            next_enemy_id: 0,
            next_projectile_id: 0,
            next_power_up_id: 0,
            tick_index: 0,
        }
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        id
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.wrapping_add(1);
        id
    }

    fn allocate_power_up_id(&mut self) -> PowerUpId {
        let id = PowerUpId::new(self.next_power_up_id);
        self.next_power_up_id = self.next_power_up_id.wrapping_add(1);
        id
    }

    fn player_target(&self) -> Option<Vec2> {
        self.player.is_alive().then(|| self.player.position())
    }

    fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let mut shots = Vec::new();
        self.player.update(dt, &mut shots, out_events);
        for shot in shots {
            self.spawn_player_bullet(shot);
        }

        let target = self.player_target();
        let playfield = self.playfield;
        let mut pending: Vec<(EnemyId, AttackEffect)> = Vec::new();
        let mut effects = Vec::new();

        for enemy in &mut self.enemies {
            let in_reach = enemy.update(dt, target, playfield, &mut effects, &mut self.rng);
            if !in_reach {
                enemy.stop_attack(&mut effects);
                enemy.kill();
                out_events.push(Event::EnemyLeftField { enemy: enemy.id() });
            }
            pending.extend(effects.drain(..).map(|effect| (enemy.id(), effect)));
        }
        self.enemies.retain(Enemy::is_alive);

        for boss in &mut self.bosses {
            boss.update(dt, target, playfield, &mut effects, out_events, &mut self.rng);
            pending.extend(effects.drain(..).map(|effect| (boss.id(), effect)));
        }
        self.bosses.retain(Boss::is_alive);

        for (owner, effect) in pending {
            self.apply_attack_effect(owner, effect, out_events);
        }

        self.projectiles
            .retain_mut(|projectile| projectile.update(dt, playfield));
        self.power_ups
            .retain_mut(|power_up| power_up.update(dt, playfield));
        self.advance_warning_points(dt, out_events);
    }

    fn advance_warning_points(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let player_bounds = self.player.is_alive().then(|| self.player.bounds());
        let blue_screen = self.sprites.resolve(BLUE_SCREEN_SPRITE);
        let mut strikes = 0;
        self.warning_points.retain_mut(|point| {
            let tick = point.update(dt, player_bounds, &blue_screen);
            if tick.armed {
                out_events.push(Event::SoundRequested {
                    cue: SoundCue::BlueScreen,
                });
            }
            if tick.strike {
                strikes += 1;
            }
            !tick.expired
        });
        for _ in 0..strikes {
            let _ = self
                .player
                .take_damage(self.warning_point_damage, out_events);
        }
    }

    fn spawn_player_bullet(&mut self, shot: Shot) {
        let id = self.allocate_projectile_id();
        let sprite = self.sprites.resolve(PLAYER_BULLET_SPRITE);
        self.projectiles.push(Projectile::new(
            id,
            ProjectileOwner::Player,
            shot.position,
            shot.velocity,
            sprite,
        ));
    }

    fn apply_attack_effect(&mut self, owner: EnemyId, effect: AttackEffect, out_events: &mut Vec<Event>) {
        match effect {
            AttackEffect::FireBullet {
                position,
                velocity,
                sprite,
            } => {
                let sprite = match sprite {
                    Some(key) => self.sprites.resolve_or(&key, ENEMY_BULLET_SPRITE),
                    None => self.sprites.resolve(ENEMY_BULLET_SPRITE),
                };
                let id = self.allocate_projectile_id();
                self.projectiles.push(Projectile::new(
                    id,
                    ProjectileOwner::Enemy,
                    position,
                    velocity,
                    sprite,
                ));
            }
            AttackEffect::SpawnWarningPoint { position, delay } => {
                let delay = Duration::try_from_secs_f32(delay).unwrap_or(Duration::ZERO);
                let sprite = self.sprites.resolve(WARNING_POINT_SPRITE);
                self.warning_points
                    .push(WarningPoint::new(owner, position, delay, sprite));
            }
            AttackEffect::PlaySound(cue) => out_events.push(Event::SoundRequested { cue }),
            AttackEffect::StopSound(cue) => out_events.push(Event::SoundStopped { cue }),
            AttackEffect::ClearWarningPoints => {
                self.warning_points.retain(|point| point.owner() != owner);
            }
        }
    }

    fn apply_all_effects(
        &mut self,
        owner: EnemyId,
        effects: Vec<AttackEffect>,
        out_events: &mut Vec<Event>,
    ) {
        for effect in effects {
            self.apply_attack_effect(owner, effect, out_events);
        }
    }

    fn damage_enemy(&mut self, id: EnemyId, amount: i32, out_events: &mut Vec<Event>) {
        let mut effects = Vec::new();
        if let Some(index) = self.enemies.iter().position(|enemy| enemy.id() == id) {
            match self.enemies[index].take_damage(amount) {
                DamageOutcome::Ignored => {}
                DamageOutcome::Hit(remaining_health) => out_events.push(Event::EnemyHit {
                    enemy: id,
                    remaining_health,
                }),
                DamageOutcome::Destroyed => {
                    let mut enemy = self.enemies.remove(index);
                    enemy.stop_attack(&mut effects);
                    push_enemy_destroyed(&enemy, DestroyCause::PlayerFire, out_events);
                }
            }
        } else if let Some(index) = self.bosses.iter().position(|boss| boss.id() == id) {
            match self.bosses[index].take_damage(amount, &mut effects) {
                DamageOutcome::Ignored => {}
                DamageOutcome::Hit(remaining_health) => out_events.push(Event::EnemyHit {
                    enemy: id,
                    remaining_health,
                }),
                DamageOutcome::Destroyed => {
                    let boss = self.bosses.remove(index);
                    push_boss_defeated(&boss, out_events);
                }
            }
        }
        self.apply_all_effects(id, effects, out_events);
    }

    fn destroy_enemy(&mut self, id: EnemyId, cause: DestroyCause, out_events: &mut Vec<Event>) {
        let mut effects = Vec::new();
        if let Some(index) = self.enemies.iter().position(|enemy| enemy.id() == id) {
            let mut enemy = self.enemies.remove(index);
            enemy.stop_attack(&mut effects);
            enemy.kill();
            push_enemy_destroyed(&enemy, cause, out_events);
        } else if let Some(index) = self.bosses.iter().position(|boss| boss.id() == id) {
            let mut boss = self.bosses.remove(index);
            boss.kill(&mut effects);
            push_boss_defeated(&boss, out_events);
        }
        self.apply_all_effects(id, effects, out_events);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

fn push_enemy_destroyed(enemy: &Enemy, cause: DestroyCause, out_events: &mut Vec<Event>) {
    debug!("enemy {} ({}) destroyed by {cause:?}", enemy.id().get(), enemy.kind());
    out_events.push(Event::EnemyDestroyed {
        enemy: enemy.id(),
        kind: enemy.kind().to_owned(),
        position: enemy.position(),
        score_value: enemy.score_value(),
        cause,
    });
}

fn push_boss_defeated(boss: &Boss, out_events: &mut Vec<Event>) {
    info!("boss {} defeated in phase {}", boss.kind(), boss.phase());
    out_events.push(Event::BossDefeated {
        boss: boss.id(),
        kind: boss.kind().to_owned(),
        position: boss.position(),
        score_value: boss.score_value(),
    });
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });
            world.advance(dt, out_events);
        }
        Command::SetPlayerIntent { intent } => world.player.set_intent(intent),
        Command::SpawnEnemy {
            kind,
            position,
            origin,
        } => {
            let id = world.allocate_enemy_id();
            debug!("spawning {kind} as enemy {} at {position}", id.get());
            let enemy = Enemy::new(
                id,
                kind.clone(),
                position,
                origin,
                &world.tables,
                &mut world.sprites,
            );
            world.enemies.push(enemy);
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind,
                position,
                origin,
            });
        }
        Command::SpawnBoss { kind, position } => {
            let id = world.allocate_enemy_id();
            let boss = Boss::new(id, kind.clone(), position, &world.tables, &mut world.sprites);
            info!("boss {kind} spawned with {} phases", boss.max_phases());
            out_events.push(Event::BossSpawned {
                boss: id,
                kind,
                position,
                max_phases: boss.max_phases(),
            });
            world.bosses.push(boss);
        }
        Command::SpawnPowerUp { kind, position } => {
            let id = world.allocate_power_up_id();
            let sprite = world.sprites.resolve(kind.key());
            world.power_ups.push(PowerUp::new(id, kind, position, sprite));
            out_events.push(Event::PowerUpSpawned {
                power_up: id,
                kind,
                position,
            });
        }
        Command::DamageEnemy { enemy, amount } => world.damage_enemy(enemy, amount, out_events),
        Command::DestroyEnemy { enemy, cause } => world.destroy_enemy(enemy, cause, out_events),
        Command::DestroyProjectile { projectile } => {
            world
                .projectiles
                .retain(|candidate| candidate.id() != projectile);
        }
        Command::DamagePlayer { amount } => {
            let _ = world.player.take_damage(amount, out_events);
        }
        Command::CollectPowerUp { power_up } => {
            let collected: Option<PowerUpKind> = world
                .power_ups
                .iter()
                .position(|candidate| candidate.id() == power_up)
                .map(|index| world.power_ups.remove(index).kind());
            if let Some(kind) = collected {
                world.player.apply_power_up(kind, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use packet_striker_core::{
        EnemyId, EnemySnapshot, EnemyView, Playfield, PlayerSnapshot, PowerUpSnapshot,
        PowerUpView, ProjectileSnapshot, ProjectileView,
    };

    use super::{
        boss::Boss,
        enemy::Enemy,
        player::Player,
        projectile::{PowerUp, Projectile, WarningPoint},
        World,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Size of the playfield.
    #[must_use]
    pub fn playfield(world: &World) -> Playfield {
        world.playfield
    }

    /// Number of ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Provides read-only access to the player ship.
    #[must_use]
    pub fn player(world: &World) -> &Player {
        &world.player
    }

    /// Captures the player state relevant to collision.
    #[must_use]
    pub fn player_snapshot(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            bounds: world.player.bounds(),
            invulnerable: world.player.is_invulnerable(),
            alive: world.player.is_alive(),
        }
    }

    /// Live regular enemies in spawn order.
    #[must_use]
    pub fn enemies(world: &World) -> &[Enemy] {
        &world.enemies
    }

    /// Live bosses in spawn order.
    #[must_use]
    pub fn bosses(world: &World) -> &[Boss] {
        &world.bosses
    }

    /// Looks up a live boss.
    #[must_use]
    pub fn boss(world: &World, id: EnemyId) -> Option<&Boss> {
        world.bosses.iter().find(|boss| boss.id() == id)
    }

    /// Reports whether an enemy or boss with the id is still live.
    #[must_use]
    pub fn is_enemy_alive(world: &World, id: EnemyId) -> bool {
        world.enemies.iter().any(|enemy| enemy.id() == id)
            || world.bosses.iter().any(|boss| boss.id() == id)
    }

    /// Number of live regular enemies.
    #[must_use]
    pub fn enemy_count(world: &World) -> usize {
        world.enemies.len()
    }

    /// Live bullets from both sides.
    #[must_use]
    pub fn projectiles(world: &World) -> &[Projectile] {
        &world.projectiles
    }

    /// Falling pickups.
    #[must_use]
    pub fn power_ups(world: &World) -> &[PowerUp] {
        &world.power_ups
    }

    /// Arming and active warning points.
    #[must_use]
    pub fn warning_points(world: &World) -> &[WarningPoint] {
        &world.warning_points
    }

    /// Captures a read-only view of enemies and bosses ordered by id.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let regular = world.enemies.iter().map(|enemy| EnemySnapshot {
            id: enemy.id(),
            bounds: enemy.bounds(),
            is_boss: false,
        });
        let bosses = world.bosses.iter().map(|boss| EnemySnapshot {
            id: boss.id(),
            bounds: boss.bounds(),
            is_boss: true,
        });
        EnemyView::from_snapshots(regular.chain(bosses).collect())
    }

    /// Captures a read-only view of live bullets ordered by id.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| ProjectileSnapshot {
                    id: projectile.id(),
                    owner: projectile.owner(),
                    bounds: projectile.bounds(),
                })
                .collect(),
        )
    }

    /// Captures a read-only view of falling pickups ordered by id.
    #[must_use]
    pub fn power_up_view(world: &World) -> PowerUpView {
        PowerUpView::from_snapshots(
            world
                .power_ups
                .iter()
                .map(|power_up| PowerUpSnapshot {
                    id: power_up.id(),
                    kind: power_up.kind(),
                    bounds: power_up.bounds(),
                })
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packet_striker_core::{PlayerIntent, SpawnOrigin};

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    fn spawn_enemy(world: &mut World, kind: &str, position: Vec2) -> EnemyId {
        let mut events = Vec::new();
        apply(
            world,
            Command::SpawnEnemy {
                kind: kind.to_owned(),
                position,
                origin: SpawnOrigin::Wave { wave: 1 },
            },
            &mut events,
        );
        match events.as_slice() {
            [Event::EnemySpawned { enemy, .. }] => *enemy,
            other => panic!("unexpected events {other:?}"),
        }
    }

    #[test]
    fn tick_reports_time_advanced() {
        let mut world = World::default();
        let events = tick(&mut world, 16);
        assert_eq!(
            events.first(),
            Some(&Event::TimeAdvanced {
                dt: Duration::from_millis(16)
            })
        );
        assert_eq!(query::tick_index(&world), 1);
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn scout_dies_to_a_single_heavy_hit() {
        let mut world = World::default();
        let scout = spawn_enemy(&mut world, "scout", Vec2::new(400.0, -60.0));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DamageEnemy {
                enemy: scout,
                amount: 25,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::EnemyDestroyed {
                enemy: scout,
                kind: "scout".to_owned(),
                position: Vec2::new(400.0, -60.0),
                score_value: 50,
                cause: DestroyCause::PlayerFire,
            }]
        );
        assert_eq!(query::enemy_count(&world), 0);
        assert!(!query::is_enemy_alive(&world, scout));
    }

    #[test]
    fn surviving_hits_report_remaining_health() {
        let mut world = World::default();
        let fighter = spawn_enemy(&mut world, "fighter", Vec2::new(400.0, 100.0));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DamageEnemy {
                enemy: fighter,
                amount: 5,
            },
            &mut events,
        );
        assert_eq!(
            events,
            vec![Event::EnemyHit {
                enemy: fighter,
                remaining_health: 35
            }]
        );
    }

    #[test]
    fn firing_spawns_player_bullets() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SetPlayerIntent {
                intent: PlayerIntent {
                    direction: Vec2::ZERO,
                    fire: true,
                },
            },
            &mut events,
        );
        let events = tick(&mut world, 16);
        assert!(events.contains(&Event::SoundRequested {
            cue: SoundCue::Shoot
        }));
        let view = query::projectile_view(&world);
        assert_eq!(view.owned_by(ProjectileOwner::Player).count(), 1);
    }

    #[test]
    fn enemies_and_bosses_share_the_view() {
        let mut world = World::default();
        let scout = spawn_enemy(&mut world, "scout", Vec2::new(400.0, -60.0));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnBoss {
                kind: "angry_migam".to_owned(),
                position: Vec2::new(600.0, -50.0),
            },
            &mut events,
        );
        let view = query::enemy_view(&world);
        assert_eq!(view.len(), 2);
        let ids: Vec<_> = view.iter().map(|snapshot| (snapshot.id, snapshot.is_boss)).collect();
        assert_eq!(ids, vec![(scout, false), (EnemyId::new(1), true)]);
        assert!(matches!(
            events.as_slice(),
            [Event::BossSpawned { max_phases: 3, .. }]
        ));
    }

    #[test]
    fn collecting_a_power_up_applies_it() {
        let mut world = World::default();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnPowerUp {
                kind: PowerUpKind::Shield,
                position: Vec2::new(100.0, 100.0),
            },
            &mut events,
        );
        let Some(Event::PowerUpSpawned { power_up, .. }) = events.pop() else {
            panic!("power-up was not spawned");
        };
        apply(&mut world, Command::CollectPowerUp { power_up }, &mut events);
        assert_eq!(
            events,
            vec![Event::PowerUpCollected {
                kind: PowerUpKind::Shield
            }]
        );
        assert!(query::power_ups(&world).is_empty());
        assert_eq!(query::player(&world).shield_charges(), 3);
    }

    #[test]
    fn contact_destruction_reports_its_cause() {
        let mut world = World::default();
        let scout = spawn_enemy(&mut world, "scout", Vec2::new(400.0, 100.0));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::DestroyEnemy {
                enemy: scout,
                cause: DestroyCause::Contact,
            },
            &mut events,
        );
        assert!(matches!(
            events.as_slice(),
            [Event::EnemyDestroyed {
                cause: DestroyCause::Contact,
                ..
            }]
        ));
    }

    #[test]
    fn enemies_leaving_the_field_are_discarded() {
        let mut world = World::default();
        let scout = spawn_enemy(&mut world, "scout", Vec2::new(400.0, 800.0));
        let mut left = false;
        for _ in 0..20 {
            let events = tick(&mut world, 100);
            left |= events.contains(&Event::EnemyLeftField { enemy: scout });
        }
        assert!(left);
        assert_eq!(query::enemy_count(&world), 0);
    }
}
