//! # Identity Entities
//!
//! Actors and the inputs that create or change them.

use serde::{Deserialize, Serialize};
use shared_types::{ActorId, ActorStanding, Role, Timestamp};

/// A registered participant. Never deleted, only deactivated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: ActorId,
    pub role: Role,
    pub name: String,
    /// Globally unique, non-empty.
    pub license: String,
    pub location: String,
    pub certification: String,
    pub active: bool,
    pub blacklisted: bool,
    pub registered_at: Timestamp,
    /// Last change to this actor's record.
    pub last_active_at: Timestamp,
}

impl Actor {
    pub fn standing(&self) -> ActorStanding {
        ActorStanding {
            actor: self.id,
            role: self.role,
            active: self.active,
            blacklisted: self.blacklisted,
        }
    }

    /// Active administrator that is not blacklisted.
    pub fn is_governing_admin(&self) -> bool {
        self.role == Role::Administrator && self.active && !self.blacklisted
    }
}

/// Registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewActor {
    pub id: ActorId,
    pub role: Role,
    pub name: String,
    pub license: String,
    pub location: String,
    pub certification: String,
}

/// Mutable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub location: String,
    pub certification: String,
}

/// Administrative status flips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusChange {
    Deactivate,
    Reactivate,
    Blacklist,
    Unblacklist,
}

impl StatusChange {
    pub fn operation(self) -> &'static str {
        match self {
            StatusChange::Deactivate => "deactivate",
            StatusChange::Reactivate => "reactivate",
            StatusChange::Blacklist => "blacklist",
            StatusChange::Unblacklist => "unblacklist",
        }
    }

    /// State the actor is left in, named for error messages.
    pub fn target_state(self) -> &'static str {
        match self {
            StatusChange::Deactivate => "inactive",
            StatusChange::Reactivate => "active",
            StatusChange::Blacklist => "blacklisted",
            StatusChange::Unblacklist => "not blacklisted",
        }
    }

    /// Apply to `actor`. Returns false if nothing would change.
    pub fn apply(self, actor: &mut Actor) -> bool {
        let (flag, value) = match self {
            StatusChange::Deactivate => (&mut actor.active, false),
            StatusChange::Reactivate => (&mut actor.active, true),
            StatusChange::Blacklist => (&mut actor.blacklisted, true),
            StatusChange::Unblacklist => (&mut actor.blacklisted, false),
        };
        if *flag == value {
            return false;
        }
        *flag = value;
        true
    }
}

/// Registered and in-good-standing counts for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleStatistics {
    pub role: Role,
    pub total: usize,
    pub active: usize,
}
