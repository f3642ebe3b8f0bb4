use std::any::Any;

use super::World;

/// Upcast helper so registered systems can be inspected by concrete type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Per-frame logic unit.
///
/// A system queries the world for the entities it cares about and mutates their
/// components in place; later systems in the same frame see those writes. It
/// cannot stop the frame: a fatal condition is reported by queuing an event.
pub trait System: AsAny + 'static {
    fn name(&self) -> &str;
    fn update(&mut self, world: &mut World, dt: f64);
}

/// Wall-clock cost of one system in one frame.
#[derive(Clone, Debug)]
pub struct SystemRunReport {
    pub name: String,
    pub duration_ms: f64,
}
