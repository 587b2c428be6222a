//! Scripted pilot flying the ship in headless runs.

use packet_striker_core::Vec2;
use packet_striker_rendering::{FrameInput, Scene, SceneSprite, SpriteLayer};

const DODGE_RADIUS: f32 = 90.0;
const ALIGN_TOLERANCE: f32 = 8.0;

/// Steers towards the closest enemy column and sidesteps incoming bullets.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Autopilot;

impl Autopilot {
    /// Chooses the input for the next frame from the last presented scene.
    pub(crate) fn steer(&self, scene: &Scene) -> FrameInput {
        let Some(ship) = scene
            .sprites
            .iter()
            .find(|sprite| sprite.layer == SpriteLayer::Player)
        else {
            return FrameInput::default();
        };

        let horizontal = match incoming_bullet(scene, ship) {
            Some(bullet) if bullet.position.x >= ship.position.x => -1.0,
            Some(_) => 1.0,
            None => closest_target(scene, ship)
                .map(|target| target.position.x - ship.position.x)
                .filter(|offset| offset.abs() > ALIGN_TOLERANCE)
                .map_or(0.0, f32::signum),
        };

        FrameInput {
            direction: Vec2::new(horizontal, 0.0),
            fire: true,
        }
    }
}

fn incoming_bullet<'a>(scene: &'a Scene, ship: &SceneSprite) -> Option<&'a SceneSprite> {
    scene
        .sprites
        .iter()
        .filter(|sprite| sprite.layer == SpriteLayer::EnemyBullet)
        .filter(|bullet| bullet.position.y <= ship.position.y)
        .filter(|bullet| bullet.position.distance(ship.position) < DODGE_RADIUS)
        .min_by(|a, b| {
            a.position
                .distance_squared(ship.position)
                .total_cmp(&b.position.distance_squared(ship.position))
        })
}

fn closest_target<'a>(scene: &'a Scene, ship: &SceneSprite) -> Option<&'a SceneSprite> {
    scene
        .sprites
        .iter()
        .filter(|sprite| matches!(sprite.layer, SpriteLayer::Enemy | SpriteLayer::Boss))
        .filter(|sprite| sprite.position.y >= 0.0)
        .min_by(|a, b| {
            (a.position.x - ship.position.x)
                .abs()
                .total_cmp(&(b.position.x - ship.position.x).abs())
        })
}
