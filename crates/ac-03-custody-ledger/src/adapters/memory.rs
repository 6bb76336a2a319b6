use crate::domain::Good;
use crate::ports::outbound::GoodStore;
use shared_types::GoodId;
use std::collections::{BTreeMap, HashMap};

/// In-memory good store for tests and single-process nodes.
#[derive(Debug, Default)]
pub struct InMemoryGoodStore {
    goods: BTreeMap<GoodId, Good>,
    codes: HashMap<String, GoodId>,
}

impl InMemoryGoodStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GoodStore for InMemoryGoodStore {
    fn next_id(&self) -> GoodId {
        // Ids start at 1.
        GoodId(self.goods.keys().next_back().map_or(1, |id| id.0 + 1))
    }

    fn get(&self, id: GoodId) -> Option<Good> {
        self.goods.get(&id).cloned()
    }

    fn by_code(&self, code: &str) -> Option<GoodId> {
        self.codes.get(code).copied()
    }

    fn put(&mut self, good: Good) {
        self.codes.insert(good.code.clone(), good.id);
        self.goods.insert(good.id, good);
    }

    fn all(&self) -> Vec<Good> {
        self.goods.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.goods.len()
    }
}
