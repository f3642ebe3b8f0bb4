pub mod config;
pub mod demo;
pub mod ecs;
pub mod error;
pub mod logging;

pub use config::{Config, ConfigLoader, WorldConfig};
pub use ecs::{Component, ComponentType, Entity, Event, System, World, WorldBuilder};
pub use error::EcsError;
