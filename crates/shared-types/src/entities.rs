//! # Core Domain Entities
//!
//! Identifiers and enumerations shared by every subsystem.
//!
//! ## Clusters
//!
//! - **Identity**: `ActorId`, `Role`, `ActorStanding`
//! - **Custody**: `GoodId`, `Stage`, `StageEntry`, `GoodSummary`
//! - **Market & Logistics**: `OfferId`, `ShipmentId`, `OfferSettlement`,
//!   `CustodyTransfer`
//! - **Hashing**: `Hash`, `sha256`

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// The all-zero hash, used as the previous-link of the first chain entry.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Seconds since the Unix epoch.
pub type Timestamp = u64;

/// Compute the SHA-256 digest of `data`.
pub fn sha256(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// A 20-byte actor address.
///
/// The all-zero address is reserved as "unset" and is never a valid actor.
/// Serialized as a `0x`-prefixed hex string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId(pub [u8; 20]);

impl ActorId {
    /// The reserved unset address.
    pub const ZERO: ActorId = ActorId([0u8; 20]);

    /// Build an address whose every byte is `byte`. Handy for fixtures.
    pub const fn repeat(byte: u8) -> Self {
        ActorId([byte; 20])
    }

    /// Whether this is the reserved unset address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Treat the zero address as absent.
    pub fn non_zero(self) -> Option<Self> {
        if self.is_zero() {
            None
        } else {
            Some(self)
        }
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ActorId(0x{}..)", hex::encode(&self.0[..4]))
    }
}

/// Error returned when an address string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid actor address '{input}': {reason}")]
pub struct AddressParseError {
    pub input: String,
    pub reason: &'static str,
}

impl FromStr for ActorId {
    type Err = AddressParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(trimmed).map_err(|_| AddressParseError {
            input: s.to_string(),
            reason: "not hex",
        })?;
        let array: [u8; 20] = bytes.try_into().map_err(|_| AddressParseError {
            input: s.to_string(),
            reason: "expected 20 bytes",
        })?;
        Ok(ActorId(array))
    }
}

impl TryFrom<String> for ActorId {
    type Error = AddressParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> Self {
        id.to_string()
    }
}

/// The single role an actor holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Producer,
    Processor,
    Distributor,
    Carrier,
    Retailer,
    Administrator,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 6] = [
        Role::Producer,
        Role::Processor,
        Role::Distributor,
        Role::Carrier,
        Role::Retailer,
        Role::Administrator,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Producer => "producer",
            Role::Processor => "processor",
            Role::Distributor => "distributor",
            Role::Carrier => "carrier",
            Role::Retailer => "retailer",
            Role::Administrator => "administrator",
        }
    }

    /// The custody stage an actor of this role advances a good into.
    ///
    /// Only the three intermediate handlers move goods forward; producers
    /// create goods, carriers move them physically, administrators govern.
    pub fn target_stage(self) -> Option<Stage> {
        match self {
            Role::Processor => Some(Stage::Processing),
            Role::Distributor => Some(Stage::Distribution),
            Role::Retailer => Some(Stage::Retail),
            Role::Producer | Role::Carrier | Role::Administrator => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown role '{s}'"))
    }
}

/// Authorization-relevant view of an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorStanding {
    pub actor: ActorId,
    pub role: Role,
    pub active: bool,
    pub blacklisted: bool,
}

impl ActorStanding {
    /// Active and not blacklisted.
    pub fn in_good_standing(&self) -> bool {
        self.active && !self.blacklisted
    }
}

// =============================================================================
// CLUSTER B: CUSTODY
// =============================================================================

/// Identifier of a tracked good (batch or unit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GoodId(pub u64);

impl fmt::Display for GoodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "good#{}", self.0)
    }
}

/// Ordered custody stages plus the terminal `Deactivated` state.
///
/// ```text
/// Origin ──Processor──→ Processing ──Distributor──→ Distribution
///    │                                                   │
///    └──Producer──→ Deactivated              Retailer ───┘
///                                                 ↓
///                        Consumed ←──any──── Retail
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    Origin,
    Processing,
    Distribution,
    Retail,
    Consumed,
    Deactivated,
}

/// Who may move a good into a given stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEntry {
    /// An active actor holding exactly this role.
    Role(Role),
    /// Only the producer that registered the good.
    OriginatingProducer,
    /// Anyone, registered or not.
    AnyCaller,
}

impl Stage {
    /// The forward lifecycle, in order. `Deactivated` is not part of it.
    pub const LIFECYCLE: [Stage; 5] = [
        Stage::Origin,
        Stage::Processing,
        Stage::Distribution,
        Stage::Retail,
        Stage::Consumed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Origin => "origin",
            Stage::Processing => "processing",
            Stage::Distribution => "distribution",
            Stage::Retail => "retail",
            Stage::Consumed => "consumed",
            Stage::Deactivated => "deactivated",
        }
    }

    /// Successor in the forward lifecycle.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Origin => Some(Stage::Processing),
            Stage::Processing => Some(Stage::Distribution),
            Stage::Distribution => Some(Stage::Retail),
            Stage::Retail => Some(Stage::Consumed),
            Stage::Consumed | Stage::Deactivated => None,
        }
    }

    /// Required actor for entering this stage.
    pub fn entered_by(self) -> StageEntry {
        match self {
            Stage::Origin => StageEntry::Role(Role::Producer),
            Stage::Processing => StageEntry::Role(Role::Processor),
            Stage::Distribution => StageEntry::Role(Role::Distributor),
            Stage::Retail => StageEntry::Role(Role::Retailer),
            Stage::Consumed => StageEntry::AnyCaller,
            Stage::Deactivated => StageEntry::OriginatingProducer,
        }
    }

    /// Returns true if moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(self, next: Stage) -> bool {
        matches!(
            (self, next),
            (Stage::Origin, Stage::Processing)
                | (Stage::Processing, Stage::Distribution)
                | (Stage::Distribution, Stage::Retail)
                | (Stage::Retail, Stage::Consumed)
                | (Stage::Origin, Stage::Deactivated)
        )
    }

    /// No transition leaves this stage.
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Consumed | Stage::Deactivated)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only snapshot of a good, exported to other subsystems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodSummary {
    pub id: GoodId,
    pub code: String,
    pub name: String,
    pub producer: ActorId,
    pub holder: ActorId,
    pub stage: Stage,
    pub created_at: Timestamp,
    /// Number of stage records written so far.
    pub stage_count: usize,
}

impl GoodSummary {
    /// Not deactivated.
    pub fn is_active(&self) -> bool {
        self.stage != Stage::Deactivated
    }

    /// Custody can still change hands.
    pub fn is_tradeable(&self) -> bool {
        !self.stage.is_terminal()
    }
}

// =============================================================================
// CLUSTER C: MARKET & LOGISTICS
// =============================================================================

/// Identifier of a marketplace offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OfferId(pub u64);

impl fmt::Display for OfferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "offer#{}", self.0)
    }
}

/// Identifier of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ShipmentId(pub u64);

impl fmt::Display for ShipmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "shipment#{}", self.0)
    }
}

/// Identifier of an off-chain upload request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UploadRequestId(pub u64);

impl fmt::Display for UploadRequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "upload#{}", self.0)
    }
}

/// What logistics needs to know about an offer it links a shipment to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferSettlement {
    pub offer_id: OfferId,
    pub good_id: GoodId,
    pub creator: ActorId,
    pub acceptor: Option<ActorId>,
    pub accepted: bool,
}

impl OfferSettlement {
    /// Whether `a` and `b` are, in either order, the two settled parties.
    pub fn involves_pair(&self, a: &ActorId, b: &ActorId) -> bool {
        match self.acceptor {
            Some(acceptor) => {
                (self.creator == *a && acceptor == *b) || (self.creator == *b && acceptor == *a)
            }
            None => false,
        }
    }
}

/// Emitted by logistics on confirmed delivery; applied by the custody
/// ledger to move the holder from `sender` to `receiver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustodyTransfer {
    pub shipment_id: ShipmentId,
    pub good_id: GoodId,
    pub sender: ActorId,
    pub receiver: ActorId,
    pub confirmed_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_transitions() {
        assert!(Stage::Origin.can_transition_to(Stage::Processing));
        assert!(Stage::Origin.can_transition_to(Stage::Deactivated));
        assert!(Stage::Retail.can_transition_to(Stage::Consumed));
        assert!(!Stage::Origin.can_transition_to(Stage::Distribution));
        assert!(!Stage::Processing.can_transition_to(Stage::Deactivated));
        assert!(!Stage::Consumed.can_transition_to(Stage::Origin));
    }

    #[test]
    fn test_lifecycle_matches_next() {
        for pair in Stage::LIFECYCLE.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
            assert!(pair[0].can_transition_to(pair[1]));
        }
        assert_eq!(Stage::Consumed.next(), None);
        assert_eq!(Stage::Deactivated.next(), None);
    }

    #[test]
    fn test_role_target_stage_agrees_with_stage_entry() {
        for role in Role::ALL {
            if let Some(stage) = role.target_stage() {
                assert_eq!(stage.entered_by(), StageEntry::Role(role));
            }
        }
    }

    #[test]
    fn test_actor_id_hex_round_trip() {
        let id = ActorId::repeat(0xAB);
        let text = id.to_string();
        assert!(text.starts_with("0xabab"));
        assert_eq!(text.parse::<ActorId>().unwrap(), id);
        assert!("0x1234".parse::<ActorId>().is_err());
        assert!("zz".parse::<ActorId>().is_err());
    }

    #[test]
    fn test_actor_id_serde_as_string() {
        let id = ActorId::repeat(0x01);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id));
        let back: ActorId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_zero_actor() {
        assert!(ActorId::ZERO.is_zero());
        assert_eq!(ActorId::ZERO.non_zero(), None);
        assert_eq!(ActorId::repeat(1).non_zero(), Some(ActorId::repeat(1)));
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Processor".parse::<Role>().unwrap(), Role::Processor);
        assert!("farmer".parse::<Role>().is_err());
    }

    #[test]
    fn test_settlement_pair() {
        let settlement = OfferSettlement {
            offer_id: OfferId(1),
            good_id: GoodId(1),
            creator: ActorId::repeat(1),
            acceptor: Some(ActorId::repeat(2)),
            accepted: true,
        };
        assert!(settlement.involves_pair(&ActorId::repeat(2), &ActorId::repeat(1)));
        assert!(!settlement.involves_pair(&ActorId::repeat(1), &ActorId::repeat(3)));
    }
}
