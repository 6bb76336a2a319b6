//! # Outbound Ports (Driven Ports)

use crate::domain::Actor;
use shared_types::ActorId;

/// Actor persistence.
///
/// Testing: `InMemoryActorStore` (adapters/memory.rs)
pub trait ActorStore: Send + Sync {
    fn get(&self, id: &ActorId) -> Option<Actor>;

    /// Holder of `license`, if any.
    fn by_license(&self, license: &str) -> Option<ActorId>;

    /// Insert or replace by id, keeping the license index in step.
    fn put(&mut self, actor: Actor);

    /// Every actor, in registration order.
    fn all(&self) -> Vec<Actor>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
