//! # Outbound Ports (Driven Ports)

use crate::domain::Good;
use shared_types::GoodId;

/// Good persistence.
///
/// Testing: `InMemoryGoodStore` (adapters/memory.rs)
pub trait GoodStore: Send + Sync {
    /// Identifier the next registered good will receive.
    fn next_id(&self) -> GoodId;

    fn get(&self, id: GoodId) -> Option<Good>;

    fn by_code(&self, code: &str) -> Option<GoodId>;

    /// Insert or replace by id. Codes never change once stored.
    fn put(&mut self, good: Good);

    /// Every good, in id order.
    fn all(&self) -> Vec<Good>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
