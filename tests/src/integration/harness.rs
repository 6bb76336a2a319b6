//! Shared fixture: a wired node on a manual clock with one registered actor
//! per role.

use std::sync::Arc;

use ac_01_identity_registry::NewActor;
use ac_03_custody_ledger::{Attestation, Good, NewGood};
use node_runtime::{LedgerNode, NodeConfig};
use shared_types::{ActorId, GoodId, ManualClock, Role};

pub const FARMER: ActorId = ActorId::repeat(0x01);
pub const MILL: ActorId = ActorId::repeat(0x02);
pub const DEPOT: ActorId = ActorId::repeat(0x03);
pub const TRUCK: ActorId = ActorId::repeat(0x04);
pub const SHOP: ActorId = ActorId::repeat(0x05);
pub const OUTSIDER: ActorId = ActorId::repeat(0x0F);

/// Clock start for every harness.
pub const GENESIS: u64 = 1_700_000_000;

pub struct Harness {
    pub node: LedgerNode,
    pub clock: Arc<ManualClock>,
    pub admin: ActorId,
}

impl Harness {
    /// Node with default configuration and the standard cast registered.
    pub fn new() -> Self {
        Self::with_config(NodeConfig::default())
    }

    pub fn with_config(config: NodeConfig) -> Self {
        let harness = Self::bare(config);
        for (id, role) in [
            (FARMER, Role::Producer),
            (MILL, Role::Processor),
            (DEPOT, Role::Distributor),
            (TRUCK, Role::Carrier),
            (SHOP, Role::Retailer),
        ] {
            harness.register(id, role);
        }
        harness
    }

    /// Node with only the bootstrap administrator.
    pub fn bare(config: NodeConfig) -> Self {
        let admin = config.identity.bootstrap_admin;
        let clock = Arc::new(ManualClock::new(GENESIS));
        let node = LedgerNode::with_clock(config, clock.clone()).expect("node builds");
        Self { node, clock, admin }
    }

    pub fn actor_request(id: ActorId, role: Role, license: &str) -> NewActor {
        NewActor {
            id,
            role,
            name: format!("{} {}", role.as_str(), id),
            license: license.to_string(),
            location: "Rift Valley".into(),
            certification: "KEBS-2024".into(),
        }
    }

    pub fn register(&self, id: ActorId, role: Role) {
        let license = format!("LIC-{}", id);
        self.node
            .register_actor(self.admin, Self::actor_request(id, role, &license))
            .expect("cast registers");
    }

    /// Register a good at origin held by `FARMER`.
    pub fn origin_good(&self, code: &str) -> Good {
        self.node
            .register_good(
                FARMER,
                NewGood {
                    name: "Arabica beans".into(),
                    code: code.to_string(),
                    attestation: Attestation::new("harvested").with_estimate(100.0).at("Nyeri"),
                },
            )
            .expect("good registers")
    }

    /// Advance `good_id` through the stages handled by each of `actors`.
    pub fn advance_by(&self, good_id: GoodId, actors: &[ActorId]) -> Good {
        let mut last = None;
        for actor in actors {
            last = Some(
                self.node
                    .advance_good(*actor, good_id, Attestation::new("handled").with_estimate(100.0))
                    .expect("advance succeeds"),
            );
        }
        last.or_else(|| {
            ac_03_custody_ledger::CustodyApi::get_good(self.node.custody(), good_id)
        })
        .expect("good exists")
    }
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}
