//! # Capability Checks
//!
//! Small composable permission checks called at the top of every operation.
//! Each returns the caller's standing on success so later checks can reuse
//! it without a second directory lookup.

use crate::entities::{ActorId, ActorStanding, Role};
use crate::errors::Denied;
use crate::ports::ActorDirectory;

/// Caller must be registered. Status is not checked.
pub fn require_registered<D>(directory: &D, actor: &ActorId) -> Result<ActorStanding, Denied>
where
    D: ActorDirectory + ?Sized,
{
    directory
        .standing(actor)
        .ok_or(Denied::Unregistered { actor: *actor })
}

/// Caller must be registered, active and not blacklisted.
pub fn require_active<D>(directory: &D, actor: &ActorId) -> Result<ActorStanding, Denied>
where
    D: ActorDirectory + ?Sized,
{
    let standing = require_registered(directory, actor)?;
    check_standing(&standing)?;
    Ok(standing)
}

/// Reject deactivated or blacklisted standings.
pub fn check_standing(standing: &ActorStanding) -> Result<(), Denied> {
    if standing.blacklisted {
        return Err(Denied::Blacklisted {
            actor: standing.actor,
        });
    }
    if !standing.active {
        return Err(Denied::Inactive {
            actor: standing.actor,
        });
    }
    Ok(())
}

/// Standing must hold one of `allowed`.
pub fn require_role(standing: &ActorStanding, allowed: &'static [Role]) -> Result<(), Denied> {
    if allowed.contains(&standing.role) {
        Ok(())
    } else {
        Err(Denied::WrongRole {
            actor: standing.actor,
            actual: standing.role,
            required: allowed,
        })
    }
}

/// Active caller holding one of `allowed`.
pub fn require_active_role<D>(
    directory: &D,
    actor: &ActorId,
    allowed: &'static [Role],
) -> Result<ActorStanding, Denied>
where
    D: ActorDirectory + ?Sized,
{
    let standing = require_active(directory, actor)?;
    require_role(&standing, allowed)?;
    Ok(standing)
}

/// Caller must be exactly `expected`.
pub fn require_party(actor: &ActorId, expected: &ActorId, party: &'static str) -> Result<(), Denied> {
    if actor == expected {
        Ok(())
    } else {
        Err(Denied::NotParty {
            actor: *actor,
            party,
        })
    }
}

/// Caller must be `expected` or an active administrator.
pub fn require_party_or_admin<D>(
    directory: &D,
    actor: &ActorId,
    expected: &ActorId,
    party: &'static str,
) -> Result<(), Denied>
where
    D: ActorDirectory + ?Sized,
{
    if actor == expected {
        return Ok(());
    }
    match directory.standing(actor) {
        Some(standing) if standing.role == Role::Administrator => check_standing(&standing),
        _ => Err(Denied::NotParty {
            actor: *actor,
            party,
        }),
    }
}

/// Whether `actor` is an administrator in good standing.
pub fn is_admin<D>(directory: &D, actor: &ActorId) -> bool
where
    D: ActorDirectory + ?Sized,
{
    directory
        .standing(actor)
        .map(|s| s.role == Role::Administrator && s.in_good_standing())
        .unwrap_or(false)
}
