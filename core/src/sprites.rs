//! Sprite keys and the catalog that maps them to visual bounds.
//!
//! Collision uses visual bounds, so every entity resolves its sprite size on
//! construction. Keys missing from the catalog resolve to a generated
//! placeholder; the first miss per key is logged.

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use tracing::warn;

/// Sprite drawn for the player ship.
pub const PLAYER_SPRITE: &str = "player";
/// Sprite drawn for player bullets.
pub const PLAYER_BULLET_SPRITE: &str = "bullet";
/// Sprite drawn for plain enemy bullets.
pub const ENEMY_BULLET_SPRITE: &str = "enemy_bullet";
/// Generic enemy sprite used when a record's own sprite is missing.
pub const ENEMY_SPRITE: &str = "enemy";
/// Marker drawn while a warning point is arming.
pub const WARNING_POINT_SPRITE: &str = "warning_point";
/// Sprite drawn once a warning point becomes active.
pub const BLUE_SCREEN_SPRITE: &str = "bsod";

const PLACEHOLDER_SIZE: Vec2 = Vec2::new(24.0, 24.0);

const BUILTIN_SPRITES: [(&str, f32, f32); 18] = [
    (PLAYER_SPRITE, 48.0, 48.0),
    (PLAYER_BULLET_SPRITE, 4.0, 12.0),
    (ENEMY_BULLET_SPRITE, 6.0, 6.0),
    (ENEMY_SPRITE, 24.0, 24.0),
    ("enemy_scout", 20.0, 20.0),
    ("enemy_fighter", 28.0, 28.0),
    ("enemy_gunship", 32.0, 24.0),
    ("enemy_interceptor", 24.0, 16.0),
    ("enemy_bomber", 36.0, 32.0),
    ("migamboss", 60.0, 60.0),
    ("jesus", 100.0, 100.0),
    ("tang", 50.0, 50.0),
    (BLUE_SCREEN_SPRITE, 100.0, 100.0),
    (WARNING_POINT_SPRITE, 10.0, 10.0),
    ("shield", 32.0, 32.0),
    ("rapid_fire", 32.0, 32.0),
    ("spread_shot", 32.0, 32.0),
    ("boss", 80.0, 80.0),
];

/// Resolved sprite reference carried by entities.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteInfo {
    /// Key the renderer should draw.
    pub key: String,
    /// Visual size in pixels, also used for collision bounds.
    pub size: Vec2,
    /// Whether the size came from a generated placeholder.
    pub placeholder: bool,
}

/// Table of known sprite keys and their visual sizes.
#[derive(Clone, Debug)]
pub struct SpriteCatalog {
    sizes: BTreeMap<String, Vec2>,
    reported: BTreeSet<String>,
}

impl SpriteCatalog {
    /// Creates a catalog holding the builtin sprite table.
    #[must_use]
    pub fn builtin() -> Self {
        let sizes = BUILTIN_SPRITES
            .iter()
            .map(|(key, width, height)| ((*key).to_owned(), Vec2::new(*width, *height)))
            .collect();
        Self {
            sizes,
            reported: BTreeSet::new(),
        }
    }

    /// Registers or replaces the size of a sprite.
    pub fn insert(&mut self, key: impl Into<String>, size: Vec2) {
        let _ = self.sizes.insert(key.into(), size);
    }

    /// Size registered for `key`, if any.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<Vec2> {
        self.sizes.get(key).copied()
    }

    /// Resolves `key`, substituting a placeholder when it is unknown.
    pub fn resolve(&mut self, key: &str) -> SpriteInfo {
        match self.lookup(key) {
            Some(size) => SpriteInfo {
                key: key.to_owned(),
                size,
                placeholder: false,
            },
            None => self.placeholder(key),
        }
    }

    /// Resolves `key`, then `fallback`, then a placeholder.
    pub fn resolve_or(&mut self, key: &str, fallback: &str) -> SpriteInfo {
        if let Some(size) = self.lookup(key) {
            return SpriteInfo {
                key: key.to_owned(),
                size,
                placeholder: false,
            };
        }
        self.report_missing(key);
        self.resolve(fallback)
    }

    fn placeholder(&mut self, key: &str) -> SpriteInfo {
        self.report_missing(key);
        SpriteInfo {
            key: key.to_owned(),
            size: PLACEHOLDER_SIZE,
            placeholder: true,
        }
    }

    fn report_missing(&mut self, key: &str) {
        if self.reported.insert(key.to_owned()) {
            warn!("sprite '{key}' is missing; substituting a fallback");
        }
    }
}

impl Default for SpriteCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
