#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Movement and attack strategies composed per enemy and boss.
//!
//! Both pattern families are closed sum types selected by a configuration
//! key. Unknown movement keys fall back to [`MovementPattern::Straight`] and
//! unknown attack keys to an attack that never fires. Patterns never touch
//! shared state: movement mutates the position handed to it, and attacks
//! describe what they want spawned through [`AttackEffect`] values that the
//! owning world applies.

pub mod attack;
pub mod movement;

pub use attack::{AttackContext, AttackEffect, AttackPattern};
pub use movement::{MovementContext, MovementPattern};
