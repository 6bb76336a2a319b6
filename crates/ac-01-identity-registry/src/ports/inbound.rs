//! # Inbound Ports (Driving Ports / API)

use crate::domain::{Actor, IdentityResult, NewActor, ProfileUpdate, RoleStatistics};
use shared_types::{ActorId, Role};

/// Identity registry API.
///
/// Every mutating call takes the authenticated caller and appends one
/// provenance entry scoped to the affected actor.
pub trait IdentityApi: Send + Sync {
    /// Administrator only.
    fn register(&self, caller: ActorId, request: NewActor) -> IdentityResult<Actor>;

    /// The actor itself or an administrator.
    fn update_profile(
        &self,
        caller: ActorId,
        actor: ActorId,
        update: ProfileUpdate,
    ) -> IdentityResult<Actor>;

    fn deactivate(&self, caller: ActorId, actor: ActorId) -> IdentityResult<Actor>;

    fn reactivate(&self, caller: ActorId, actor: ActorId) -> IdentityResult<Actor>;

    fn blacklist(&self, caller: ActorId, actor: ActorId) -> IdentityResult<Actor>;

    fn unblacklist(&self, caller: ActorId, actor: ActorId) -> IdentityResult<Actor>;

    /// Administrative role reassignment.
    fn reassign_role(&self, caller: ActorId, actor: ActorId, role: Role) -> IdentityResult<Actor>;

    fn get_actor(&self, actor: &ActorId) -> Option<Actor>;

    fn actor_by_license(&self, license: &str) -> Option<Actor>;

    fn list_by_role(&self, role: Role) -> Vec<Actor>;

    /// Case-sensitive substring match on display name.
    fn search_by_name(&self, needle: &str) -> Vec<Actor>;

    /// One entry per role, in [`Role::ALL`] order.
    fn role_statistics(&self) -> Vec<RoleStatistics>;

    fn actor_count(&self) -> usize;
}
