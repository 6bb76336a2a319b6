use crate::domain::Actor;
use crate::ports::outbound::ActorStore;
use shared_types::ActorId;
use std::collections::HashMap;

/// In-memory actor store for tests and single-process nodes.
#[derive(Debug, Default)]
pub struct InMemoryActorStore {
    actors: HashMap<ActorId, Actor>,
    order: Vec<ActorId>,
    licenses: HashMap<String, ActorId>,
}

impl InMemoryActorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ActorStore for InMemoryActorStore {
    fn get(&self, id: &ActorId) -> Option<Actor> {
        self.actors.get(id).cloned()
    }

    fn by_license(&self, license: &str) -> Option<ActorId> {
        self.licenses.get(license).copied()
    }

    fn put(&mut self, actor: Actor) {
        match self.actors.get(&actor.id) {
            Some(previous) if previous.license != actor.license => {
                self.licenses.remove(&previous.license);
            }
            Some(_) => {}
            None => self.order.push(actor.id),
        }
        self.licenses.insert(actor.license.clone(), actor.id);
        self.actors.insert(actor.id, actor);
    }

    fn all(&self) -> Vec<Actor> {
        self.order
            .iter()
            .filter_map(|id| self.actors.get(id).cloned())
            .collect()
    }

    fn len(&self) -> usize {
        self.actors.len()
    }
}
