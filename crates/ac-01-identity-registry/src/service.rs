//! Identity Registry Service
//!
//! Owns every actor record. All mutations hold the store write lock from
//! the first check to the provenance append, so duplicate-license races
//! resolve in commit order.

use crate::domain::{
    Actor, IdentityConfig, IdentityError, IdentityResult, NewActor, ProfileUpdate,
    RoleStatistics, StatusChange,
};
use crate::ports::inbound::IdentityApi;
use crate::ports::outbound::ActorStore;
use parking_lot::RwLock;
use shared_types::capability::{require_active, require_active_role, require_party_or_admin};
use shared_types::{
    ActorDirectory, ActorId, ActorStanding, AuditScope, Component, EntityRef, OperationRecord,
    ProvenanceSink, Role, TimeSource,
};
use std::sync::Arc;
use tracing::{debug, info};

const ADMIN_ONLY: &[Role] = &[Role::Administrator];

/// Capability checks against the store while its lock is held.
struct StoreDirectory<'a, S>(&'a S);

impl<S: ActorStore> ActorDirectory for StoreDirectory<'_, S> {
    fn standing(&self, actor: &ActorId) -> Option<ActorStanding> {
        self.0.get(actor).map(|a| a.standing())
    }
}

/// Identity registry.
pub struct IdentityRegistry<S: ActorStore> {
    config: IdentityConfig,
    store: RwLock<S>,
    provenance: Arc<dyn ProvenanceSink>,
    clock: Arc<dyn TimeSource>,
}

impl<S: ActorStore> IdentityRegistry<S> {
    /// Build the registry and seed the bootstrap administrator if absent.
    pub fn new(
        config: IdentityConfig,
        store: S,
        provenance: Arc<dyn ProvenanceSink>,
        clock: Arc<dyn TimeSource>,
    ) -> IdentityResult<Self> {
        let registry = Self {
            config,
            store: RwLock::new(store),
            provenance,
            clock,
        };
        registry.bootstrap()?;
        Ok(registry)
    }

    fn bootstrap(&self) -> IdentityResult<()> {
        let admin = self.config.bootstrap_admin;
        let mut store = self.store.write();
        if store.get(&admin).is_some() {
            return Ok(());
        }
        if admin.is_zero() {
            return Err(IdentityError::InvalidInput {
                field: "bootstrap_admin",
                reason: "zero address",
            });
        }
        self.check_text("license", &self.config.bootstrap_license, true)?;
        self.check_text("name", &self.config.bootstrap_name, true)?;
        self.provenance.ensure_writable()?;

        let now = self.clock.now();
        let actor = Actor {
            id: admin,
            role: Role::Administrator,
            name: self.config.bootstrap_name.clone(),
            license: self.config.bootstrap_license.clone(),
            location: String::new(),
            certification: String::new(),
            active: true,
            blacklisted: false,
            registered_at: now,
            last_active_at: now,
        };
        let record = self
            .record("bootstrap_admin", admin)
            .field("license", &actor.license);
        self.commit(&mut *store, admin, actor, record)?;
        info!(admin = %admin, "Bootstrap administrator registered");
        Ok(())
    }

    fn record(&self, operation: &str, actor: ActorId) -> OperationRecord {
        OperationRecord::new(
            Component::Identity,
            operation,
            EntityRef::Actor(actor),
            self.clock.now(),
        )
    }

    fn check_text(&self, field: &'static str, value: &str, required: bool) -> IdentityResult<()> {
        if required && value.trim().is_empty() {
            return Err(IdentityError::InvalidInput {
                field,
                reason: "must not be empty",
            });
        }
        if value.len() > self.config.max_field_len {
            return Err(IdentityError::InvalidInput {
                field,
                reason: "too long",
            });
        }
        Ok(())
    }

    /// Append, then apply. Both happen under the caller's write lock.
    fn commit(
        &self,
        store: &mut S,
        caller: ActorId,
        actor: Actor,
        record: OperationRecord,
    ) -> IdentityResult<Actor> {
        self.provenance
            .append(AuditScope::Actor(actor.id), record.by(caller))?;
        store.put(actor.clone());
        Ok(actor)
    }

    fn load(store: &S, actor: &ActorId) -> IdentityResult<Actor> {
        store
            .get(actor)
            .ok_or(IdentityError::ActorNotFound { actor: *actor })
    }

    /// Refuse a change that removes the last governing administrator.
    fn guard_last_admin(store: &S, before: &Actor, after: &Actor) -> IdentityResult<()> {
        if before.is_governing_admin() && !after.is_governing_admin() {
            let governing = store.all().iter().filter(|a| a.is_governing_admin()).count();
            if governing <= 1 {
                return Err(IdentityError::LastAdministrator { actor: before.id });
            }
        }
        Ok(())
    }

    fn change_status(
        &self,
        caller: ActorId,
        actor: ActorId,
        change: StatusChange,
    ) -> IdentityResult<Actor> {
        self.provenance.ensure_writable()?;
        let mut store = self.store.write();
        require_active_role(&StoreDirectory(&*store), &caller, ADMIN_ONLY)?;

        let current = Self::load(&store, &actor)?;
        let mut updated = current.clone();
        if !change.apply(&mut updated) {
            return Err(IdentityError::already(actor, change.target_state()));
        }
        Self::guard_last_admin(&store, &current, &updated)?;
        updated.last_active_at = self.clock.now();

        let record = self
            .record(change.operation(), actor)
            .field("active", updated.active)
            .field("blacklisted", updated.blacklisted);
        let updated = self.commit(&mut *store, caller, updated, record)?;

        info!(
            actor = %actor,
            by = %caller,
            change = change.operation(),
            "Actor status changed"
        );
        Ok(updated)
    }
}

impl<S: ActorStore> IdentityApi for IdentityRegistry<S> {
    fn register(&self, caller: ActorId, request: NewActor) -> IdentityResult<Actor> {
        self.provenance.ensure_writable()?;
        let mut store = self.store.write();
        require_active_role(&StoreDirectory(&*store), &caller, ADMIN_ONLY)?;

        if request.id.is_zero() {
            return Err(IdentityError::InvalidInput {
                field: "actor",
                reason: "zero address",
            });
        }
        self.check_text("name", &request.name, true)?;
        self.check_text("license", &request.license, true)?;
        self.check_text("location", &request.location, false)?;
        self.check_text("certification", &request.certification, false)?;

        if store.get(&request.id).is_some() {
            return Err(IdentityError::DuplicateActor { actor: request.id });
        }
        if let Some(holder) = store.by_license(&request.license) {
            return Err(IdentityError::DuplicateLicense {
                license: request.license,
                holder,
            });
        }

        let now = self.clock.now();
        let actor = Actor {
            id: request.id,
            role: request.role,
            name: request.name,
            license: request.license,
            location: request.location,
            certification: request.certification,
            active: true,
            blacklisted: false,
            registered_at: now,
            last_active_at: now,
        };
        let record = self
            .record("register", actor.id)
            .field("role", actor.role)
            .field("license", &actor.license)
            .field("name", &actor.name);
        let actor = self.commit(&mut *store, caller, actor, record)?;

        info!(actor = %actor.id, role = %actor.role, by = %caller, "Actor registered");
        Ok(actor)
    }

    fn update_profile(
        &self,
        caller: ActorId,
        actor: ActorId,
        update: ProfileUpdate,
    ) -> IdentityResult<Actor> {
        self.provenance.ensure_writable()?;
        let mut store = self.store.write();
        {
            let directory = StoreDirectory(&*store);
            require_active(&directory, &caller)?;
            require_party_or_admin(&directory, &caller, &actor, "profile owner")?;
        }

        let current = Self::load(&store, &actor)?;
        self.check_text("name", &update.name, true)?;
        self.check_text("location", &update.location, false)?;
        self.check_text("certification", &update.certification, false)?;

        let updated = Actor {
            name: update.name,
            location: update.location,
            certification: update.certification,
            last_active_at: self.clock.now(),
            ..current
        };
        let record = self
            .record("update_profile", actor)
            .field("name", &updated.name)
            .field("location", &updated.location)
            .field("certification", &updated.certification);
        let updated = self.commit(&mut *store, caller, updated, record)?;

        info!(actor = %actor, by = %caller, "Actor profile updated");
        Ok(updated)
    }

    fn deactivate(&self, caller: ActorId, actor: ActorId) -> IdentityResult<Actor> {
        self.change_status(caller, actor, StatusChange::Deactivate)
    }

    fn reactivate(&self, caller: ActorId, actor: ActorId) -> IdentityResult<Actor> {
        self.change_status(caller, actor, StatusChange::Reactivate)
    }

    fn blacklist(&self, caller: ActorId, actor: ActorId) -> IdentityResult<Actor> {
        self.change_status(caller, actor, StatusChange::Blacklist)
    }

    fn unblacklist(&self, caller: ActorId, actor: ActorId) -> IdentityResult<Actor> {
        self.change_status(caller, actor, StatusChange::Unblacklist)
    }

    fn reassign_role(&self, caller: ActorId, actor: ActorId, role: Role) -> IdentityResult<Actor> {
        self.provenance.ensure_writable()?;
        let mut store = self.store.write();
        require_active_role(&StoreDirectory(&*store), &caller, ADMIN_ONLY)?;

        let current = Self::load(&store, &actor)?;
        if current.role == role {
            return Err(IdentityError::already_role(actor, role));
        }
        let updated = Actor {
            role,
            last_active_at: self.clock.now(),
            ..current.clone()
        };
        Self::guard_last_admin(&store, &current, &updated)?;

        let record = self
            .record("reassign_role", actor)
            .field("previous_role", current.role)
            .field("role", role);
        let updated = self.commit(&mut *store, caller, updated, record)?;

        info!(actor = %actor, from = %current.role, to = %role, by = %caller, "Actor role reassigned");
        Ok(updated)
    }

    fn get_actor(&self, actor: &ActorId) -> Option<Actor> {
        self.store.read().get(actor)
    }

    fn actor_by_license(&self, license: &str) -> Option<Actor> {
        let store = self.store.read();
        store.by_license(license).and_then(|id| store.get(&id))
    }

    fn list_by_role(&self, role: Role) -> Vec<Actor> {
        self.store
            .read()
            .all()
            .into_iter()
            .filter(|a| a.role == role)
            .collect()
    }

    fn search_by_name(&self, needle: &str) -> Vec<Actor> {
        let matches: Vec<Actor> = self
            .store
            .read()
            .all()
            .into_iter()
            .filter(|a| a.name.contains(needle))
            .collect();
        debug!(needle, found = matches.len(), "Actor name search");
        matches
    }

    fn role_statistics(&self) -> Vec<RoleStatistics> {
        let actors = self.store.read().all();
        Role::ALL
            .into_iter()
            .map(|role| {
                let of_role = actors.iter().filter(|a| a.role == role);
                RoleStatistics {
                    role,
                    total: of_role.clone().count(),
                    active: of_role.filter(|a| a.standing().in_good_standing()).count(),
                }
            })
            .collect()
    }

    fn actor_count(&self) -> usize {
        self.store.read().len()
    }
}

impl<S: ActorStore> ActorDirectory for IdentityRegistry<S> {
    fn standing(&self, actor: &ActorId) -> Option<ActorStanding> {
        self.store.read().get(actor).map(|a| a.standing())
    }
}
