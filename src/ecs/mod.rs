//! Entity Component System (ECS) implementation
//!
//! Associative storage: one `HashMap<Entity, T>` bucket per component kind, an
//! ordered list of systems run once per frame, and an event queue drained after
//! the last system.

pub mod component;
pub mod entity;
pub mod event;
pub mod registry;
pub mod system;
pub mod world;

pub use component::{Component, ComponentStorage, ComponentType, TypedComponentStorage};
pub use entity::{Entity, EntityIdPolicy, EntityManager};
pub use event::{CascadePolicy, Event, EventBus, EventPassReport, EventRecord, EventType};
pub use registry::{ComponentManager, ComponentSchemaPolicy};
pub use system::{AsAny, System, SystemRunReport};
pub use world::{FrameReport, World, WorldBuilder};
