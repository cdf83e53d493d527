//! Ember ECS - Entity Component System
//!
//! A custom ECS implementation for the Ember engine.
//! Entities are plain monotonic indices, components live in sparse-set
//! storage keyed by runtime type identity, and systems run sequentially
//! in phase-grouped schedules driven by [`App`].

mod any;
mod app;
mod component;
mod entity;
mod error;
mod query;
mod resource;
mod system;
mod world;

pub use any::AnyValue;
pub use app::{App, Phase, Platform};
pub use component::{Component, SparseSet};
pub use entity::Entity;
pub use error::EcsError;
pub use query::{QueryIter, WorldQuery};
pub use system::{Schedule, System};
pub use world::World;
