#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure systems that resolve overlaps and award score.
//!
//! [`Collision`] runs once per tick after every entity has moved and turns
//! bounding-box overlaps into world commands. [`Scoring`] reacts to the
//! destruction events those commands produce.

pub mod scoring;

pub use scoring::Scoring;

use packet_striker_config::CombatTuning;
use packet_striker_core::{
    Command, DestroyCause, EnemyView, PlayerSnapshot, PowerUpView, ProjectileOwner, ProjectileView,
};

/// Configuration parameters required to construct the collision system.
#[derive(Clone, Copy, Debug, Default)]
pub struct Config {
    combat: CombatTuning,
}

impl Config {
    /// Creates a new configuration from the combat tuning.
    #[must_use]
    pub const fn new(combat: CombatTuning) -> Self {
        Self { combat }
    }
}

/// Collision resolver that converts overlaps into damage and pickup commands.
#[derive(Debug)]
pub struct Collision {
    combat: CombatTuning,
}

impl Collision {
    /// Creates a new collision resolver.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            combat: config.combat,
        }
    }

    /// Emits commands for every overlap in the provided views.
    ///
    /// Views are ordered by id, so each pair is visited once and the outcome
    /// does not depend on spawn order within a tick.
    pub fn handle(
        &self,
        player: &PlayerSnapshot,
        enemies: &EnemyView,
        projectiles: &ProjectileView,
        power_ups: &PowerUpView,
        out: &mut Vec<Command>,
    ) {
        self.resolve_player_fire(enemies, projectiles, out);
        if !player.alive {
            return;
        }
        self.resolve_contact(player, enemies, out);
        self.resolve_enemy_fire(player, projectiles, out);
        for power_up in power_ups.iter() {
            if power_up.bounds.overlaps(&player.bounds) {
                out.push(Command::CollectPowerUp {
                    power_up: power_up.id,
                });
            }
        }
    }

    fn resolve_player_fire(
        &self,
        enemies: &EnemyView,
        projectiles: &ProjectileView,
        out: &mut Vec<Command>,
    ) {
        for bullet in projectiles.owned_by(ProjectileOwner::Player) {
            let mut hit = false;
            for enemy in enemies.iter() {
                if !bullet.bounds.overlaps(&enemy.bounds) {
                    continue;
                }
                hit = true;
                let amount = if enemy.is_boss {
                    self.combat.bullet_damage_boss
                } else {
                    self.combat.bullet_damage_enemy
                };
                out.push(Command::DamageEnemy {
                    enemy: enemy.id,
                    amount,
                });
            }
            if hit {
                out.push(Command::DestroyProjectile {
                    projectile: bullet.id,
                });
            }
        }
    }

    fn resolve_contact(&self, player: &PlayerSnapshot, enemies: &EnemyView, out: &mut Vec<Command>) {
        if player.invulnerable {
            return;
        }
        let mut touching = enemies
            .iter()
            .filter(|enemy| enemy.bounds.overlaps(&player.bounds))
            .peekable();
        if touching.peek().is_none() {
            return;
        }
        out.push(Command::DamagePlayer {
            amount: self.combat.contact_damage,
        });
        if let Some(rammed) = touching.find(|enemy| !enemy.is_boss) {
            out.push(Command::DestroyEnemy {
                enemy: rammed.id,
                cause: DestroyCause::Contact,
            });
        }
    }

    fn resolve_enemy_fire(
        &self,
        player: &PlayerSnapshot,
        projectiles: &ProjectileView,
        out: &mut Vec<Command>,
    ) {
        let mut hit = false;
        for bullet in projectiles.owned_by(ProjectileOwner::Enemy) {
            if bullet.bounds.overlaps(&player.bounds) {
                hit = true;
                out.push(Command::DestroyProjectile {
                    projectile: bullet.id,
                });
            }
        }
        if hit && !player.invulnerable {
            out.push(Command::DamagePlayer {
                amount: self.combat.enemy_bullet_damage,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packet_striker_core::{
        Aabb, EnemyId, EnemySnapshot, PowerUpId, PowerUpKind, PowerUpSnapshot, ProjectileId,
        ProjectileSnapshot, Vec2,
    };

    fn square(x: f32, y: f32, side: f32) -> Aabb {
        Aabb::from_center_size(Vec2::new(x, y), Vec2::splat(side))
    }

    fn player_at(x: f32, y: f32, invulnerable: bool) -> PlayerSnapshot {
        PlayerSnapshot {
            bounds: square(x, y, 48.0),
            invulnerable,
            alive: true,
        }
    }

    fn enemy(id: u32, x: f32, y: f32, is_boss: bool) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            bounds: square(x, y, 20.0),
            is_boss,
        }
    }

    fn bullet(id: u32, owner: ProjectileOwner, x: f32, y: f32) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: ProjectileId::new(id),
            owner,
            bounds: square(x, y, 6.0),
        }
    }

    fn resolve(
        player: PlayerSnapshot,
        enemies: Vec<EnemySnapshot>,
        projectiles: Vec<ProjectileSnapshot>,
        power_ups: Vec<PowerUpSnapshot>,
    ) -> Vec<Command> {
        let collision = Collision::new(Config::default());
        let mut out = Vec::new();
        collision.handle(
            &player,
            &EnemyView::from_snapshots(enemies),
            &ProjectileView::from_snapshots(projectiles),
            &PowerUpView::from_snapshots(power_ups),
            &mut out,
        );
        out
    }

    #[test]
    fn player_bullet_damages_every_overlapping_enemy_once() {
        let out = resolve(
            player_at(600.0, 800.0, false),
            vec![enemy(1, 100.0, 100.0, false), enemy(2, 105.0, 100.0, true)],
            vec![bullet(9, ProjectileOwner::Player, 102.0, 100.0)],
            Vec::new(),
        );
        assert_eq!(
            out,
            vec![
                Command::DamageEnemy {
                    enemy: EnemyId::new(1),
                    amount: 5
                },
                Command::DamageEnemy {
                    enemy: EnemyId::new(2),
                    amount: 10
                },
                Command::DestroyProjectile {
                    projectile: ProjectileId::new(9)
                },
            ]
        );
    }

    #[test]
    fn contact_damages_once_and_rams_the_first_regular_enemy() {
        let out = resolve(
            player_at(600.0, 800.0, false),
            vec![
                enemy(1, 600.0, 790.0, true),
                enemy(2, 610.0, 800.0, false),
                enemy(3, 590.0, 800.0, false),
            ],
            Vec::new(),
            Vec::new(),
        );
        assert_eq!(
            out,
            vec![
                Command::DamagePlayer { amount: 30 },
                Command::DestroyEnemy {
                    enemy: EnemyId::new(2),
                    cause: DestroyCause::Contact
                },
            ]
        );
    }

    #[test]
    fn invulnerable_player_still_absorbs_bullets() {
        let out = resolve(
            player_at(600.0, 800.0, true),
            vec![enemy(1, 600.0, 800.0, false)],
            vec![
                bullet(1, ProjectileOwner::Enemy, 600.0, 790.0),
                bullet(2, ProjectileOwner::Enemy, 610.0, 800.0),
            ],
            Vec::new(),
        );
        assert_eq!(
            out,
            vec![
                Command::DestroyProjectile {
                    projectile: ProjectileId::new(1)
                },
                Command::DestroyProjectile {
                    projectile: ProjectileId::new(2)
                },
            ]
        );
    }

    #[test]
    fn enemy_bullets_deal_damage_once_per_tick() {
        let out = resolve(
            player_at(600.0, 800.0, false),
            Vec::new(),
            vec![
                bullet(1, ProjectileOwner::Enemy, 600.0, 790.0),
                bullet(2, ProjectileOwner::Enemy, 610.0, 800.0),
            ],
            Vec::new(),
        );
        let damage: Vec<_> = out
            .iter()
            .filter(|command| matches!(command, Command::DamagePlayer { .. }))
            .collect();
        assert_eq!(damage, vec![&Command::DamagePlayer { amount: 15 }]);
    }

    #[test]
    fn overlapping_power_ups_are_collected() {
        let out = resolve(
            player_at(600.0, 800.0, false),
            Vec::new(),
            Vec::new(),
            vec![
                PowerUpSnapshot {
                    id: PowerUpId::new(4),
                    kind: PowerUpKind::RapidFire,
                    bounds: square(600.0, 780.0, 32.0),
                },
                PowerUpSnapshot {
                    id: PowerUpId::new(5),
                    kind: PowerUpKind::Shield,
                    bounds: square(100.0, 100.0, 32.0),
                },
            ],
        );
        assert_eq!(
            out,
            vec![Command::CollectPowerUp {
                power_up: PowerUpId::new(4)
            }]
        );
    }

    #[test]
    fn defeated_player_collides_with_nothing() {
        let mut player = player_at(600.0, 800.0, false);
        player.alive = false;
        let out = resolve(
            player,
            vec![enemy(1, 600.0, 800.0, false)],
            vec![bullet(1, ProjectileOwner::Enemy, 600.0, 800.0)],
            Vec::new(),
        );
        assert!(out.is_empty());
    }
}
