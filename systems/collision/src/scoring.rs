//! Score keeping and power-up drops.

use packet_striker_config::CombatTuning;
use packet_striker_core::{Command, DestroyCause, Event, PowerUpKind, Vec2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Awards score for kills and rolls power-up drops where they fell.
#[derive(Debug)]
pub struct Scoring {
    score: u64,
    kills: u32,
    drop_chance: f64,
    rng: ChaCha8Rng,
}

impl Scoring {
    /// Creates a scorer with zero points.
    #[must_use]
    pub fn new(combat: &CombatTuning, seed: u64) -> Self {
        Self {
            score: 0,
            kills: 0,
            drop_chance: combat.power_up_drop_chance,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Points earned so far.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Enemies and bosses destroyed by player fire.
    #[must_use]
    pub const fn kills(&self) -> u32 {
        self.kills
    }

    /// Consumes destruction events and emits drop spawns.
    ///
    /// Contact kills award nothing.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::EnemyDestroyed {
                    position,
                    score_value,
                    cause: DestroyCause::PlayerFire,
                    ..
                }
                | Event::BossDefeated {
                    position,
                    score_value,
                    ..
                } => self.award(*score_value, *position, out),
                _ => {}
            }
        }
    }

    fn award(&mut self, score_value: u32, position: Vec2, out: &mut Vec<Command>) {
        self.score = self.score.saturating_add(u64::from(score_value));
        self.kills = self.kills.saturating_add(1);
        if self.rng.gen::<f64>() < self.drop_chance {
            let kind = PowerUpKind::ALL[self.rng.gen_range(0..PowerUpKind::ALL.len())];
            debug!("dropping {} at {position}", kind.key());
            out.push(Command::SpawnPowerUp { kind, position });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use packet_striker_core::EnemyId;

    fn destroyed(score_value: u32, cause: DestroyCause) -> Event {
        Event::EnemyDestroyed {
            enemy: EnemyId::new(1),
            kind: "scout".to_owned(),
            position: Vec2::new(400.0, -60.0),
            score_value,
            cause,
        }
    }

    #[test]
    fn player_kills_score_and_contact_kills_do_not() {
        let mut scoring = Scoring::new(&CombatTuning::default(), 1);
        let mut out = Vec::new();
        scoring.handle(
            &[
                destroyed(50, DestroyCause::PlayerFire),
                destroyed(100, DestroyCause::Contact),
            ],
            &mut out,
        );
        assert_eq!(scoring.score(), 50);
        assert_eq!(scoring.kills(), 1);
    }

    #[test]
    fn boss_defeat_awards_its_value() {
        let mut scoring = Scoring::new(&CombatTuning::default(), 1);
        let mut out = Vec::new();
        scoring.handle(
            &[Event::BossDefeated {
                boss: EnemyId::new(2),
                kind: "angry_migam".to_owned(),
                position: Vec2::new(600.0, 100.0),
                score_value: 8000,
            }],
            &mut out,
        );
        assert_eq!(scoring.score(), 8000);
    }

    #[test]
    fn certain_drop_spawns_at_the_kill_site() {
        let combat = CombatTuning {
            power_up_drop_chance: 1.0,
            ..CombatTuning::default()
        };
        let mut scoring = Scoring::new(&combat, 1);
        let mut out = Vec::new();
        scoring.handle(&[destroyed(50, DestroyCause::PlayerFire)], &mut out);
        assert!(matches!(
            out.as_slice(),
            [Command::SpawnPowerUp { position, .. }] if *position == Vec2::new(400.0, -60.0)
        ));
    }

    #[test]
    fn drop_rate_tracks_the_configured_chance() {
        let mut scoring = Scoring::new(&CombatTuning::default(), 42);
        let mut out = Vec::new();
        let events: Vec<_> = (0..2000)
            .map(|_| destroyed(50, DestroyCause::PlayerFire))
            .collect();
        scoring.handle(&events, &mut out);
        assert!((120..=280).contains(&out.len()), "drops: {}", out.len());
    }
}
