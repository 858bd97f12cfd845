//! Simulation core for a top-down arena shooter.
//!
//! The library owns every game rule; the `arena_shooter` binary only feeds
//! input into a [`session::Session`] and draws the resulting
//! [`entities::WorldState`].

pub mod catalog;
pub mod compute;
pub mod config;
pub mod driver;
pub mod effects;
pub mod entities;
pub mod error;
pub mod geometry;
pub mod input;
pub mod powerups;
pub mod schedule;
pub mod session;
pub mod shop;
pub mod spawn;
