//! Verification Token Service

use crate::domain::{
    derive_code, ProvenanceConfig, ProvenanceError, ProvenanceResult, VerificationReport,
    VerificationToken,
};
use crate::ports::inbound::{ProvenanceApi, VerificationApi};
use crate::ports::outbound::EntryStore;
use crate::service::ProvenanceLedger;
use parking_lot::RwLock;
use rand::RngCore;
use shared_types::capability::{require_active, require_party, require_party_or_admin};
use shared_types::{
    ActorDirectory, ActorId, AuditScope, Component, EntityRef, GoodId, GoodView, OperationRecord,
    ProvenanceSink, TimeSource,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Default)]
struct TokenBook {
    tokens: HashMap<String, VerificationToken>,
    by_good: HashMap<GoodId, Vec<String>>,
}

/// Issues and resolves verification tokens.
///
/// Token state is separate from the ledger so custody lookups never run
/// while the token book is locked.
pub struct VerificationService<S: EntryStore> {
    config: ProvenanceConfig,
    ledger: Arc<ProvenanceLedger<S>>,
    goods: Arc<dyn GoodView>,
    directory: Arc<dyn ActorDirectory>,
    clock: Arc<dyn TimeSource>,
    book: RwLock<TokenBook>,
}

impl<S: EntryStore> VerificationService<S> {
    pub fn new(
        config: ProvenanceConfig,
        ledger: Arc<ProvenanceLedger<S>>,
        goods: Arc<dyn GoodView>,
        directory: Arc<dyn ActorDirectory>,
        clock: Arc<dyn TimeSource>,
    ) -> Self {
        Self {
            config,
            ledger,
            goods,
            directory,
            clock,
            book: RwLock::new(TokenBook::default()),
        }
    }

    fn fresh_code(&self, book: &TokenBook, good_id: GoodId, issuer: &ActorId) -> String {
        let now = self.clock.now();
        let mut rng = rand::thread_rng();
        loop {
            let mut nonce = [0u8; 32];
            rng.fill_bytes(&mut nonce);
            let code = derive_code(&nonce, good_id, issuer, now, self.config.token_code_bytes);
            if !book.tokens.contains_key(&code) {
                return code;
            }
        }
    }
}

impl<S: EntryStore> VerificationApi for VerificationService<S> {
    fn issue_token(&self, caller: ActorId, good_id: GoodId) -> ProvenanceResult<VerificationToken> {
        self.ledger.ensure_writable()?;
        require_active(self.directory.as_ref(), &caller)?;

        let good = self
            .goods
            .good_summary(good_id)
            .ok_or(ProvenanceError::GoodNotFound { good_id })?;
        if !good.is_active() {
            return Err(ProvenanceError::GoodInactive { good_id });
        }
        require_party(&caller, &good.holder, "current holder")?;

        let mut book = self.book.write();
        let now = self.clock.now();
        let token = VerificationToken {
            code: self.fresh_code(&book, good_id, &caller),
            good_id,
            issuer: caller,
            active: true,
            issued_at: now,
            deactivated_at: None,
        };

        self.ledger.append(
            AuditScope::Good(good_id),
            OperationRecord::new(
                Component::Provenance,
                "issue_token",
                EntityRef::Token(token.code.clone()),
                now,
            )
            .by(caller)
            .field("good_id", good_id.0),
        )?;

        book.by_good
            .entry(good_id)
            .or_default()
            .push(token.code.clone());
        book.tokens.insert(token.code.clone(), token.clone());

        info!(good = %good_id, issuer = %caller, code = %token.code, "Verification token issued");
        Ok(token)
    }

    fn verify_token(&self, code: &str) -> ProvenanceResult<VerificationReport> {
        let token = self
            .get_token(code)
            .ok_or_else(|| ProvenanceError::TokenNotFound {
                code: code.to_string(),
            })?;

        let snapshot = self.goods.good_summary(token.good_id);
        let chain = self.ledger.verify_chain(&AuditScope::Good(token.good_id));
        let valid = token.active && snapshot.is_some() && chain.intact;

        debug!(code, valid, chain_intact = chain.intact, "Verification token resolved");

        Ok(VerificationReport {
            code: token.code,
            good_id: token.good_id,
            valid,
            token_active: token.active,
            stage_count: snapshot.as_ref().map(|s| s.stage_count).unwrap_or(0),
            snapshot,
            chain_intact: chain.intact,
            entry_count: chain.entry_count,
            first_mismatch: chain.first_mismatch,
            verified_at: self.clock.now(),
        })
    }

    fn deactivate_token(&self, caller: ActorId, code: &str) -> ProvenanceResult<VerificationToken> {
        self.ledger.ensure_writable()?;

        let mut book = self.book.write();
        let token = book
            .tokens
            .get(code)
            .cloned()
            .ok_or_else(|| ProvenanceError::TokenNotFound {
                code: code.to_string(),
            })?;
        require_party_or_admin(self.directory.as_ref(), &caller, &token.issuer, "token issuer")?;
        if !token.active {
            return Err(ProvenanceError::AlreadyInactive {
                code: code.to_string(),
            });
        }

        let now = self.clock.now();
        self.ledger.append(
            AuditScope::Good(token.good_id),
            OperationRecord::new(
                Component::Provenance,
                "deactivate_token",
                EntityRef::Token(token.code.clone()),
                now,
            )
            .by(caller)
            .field("active", false),
        )?;

        let updated = VerificationToken {
            active: false,
            deactivated_at: Some(now),
            ..token
        };
        book.tokens.insert(updated.code.clone(), updated.clone());

        info!(code, by = %caller, "Verification token deactivated");
        Ok(updated)
    }

    fn get_token(&self, code: &str) -> Option<VerificationToken> {
        self.book.read().tokens.get(code).cloned()
    }

    fn tokens_for_good(&self, good_id: GoodId) -> Vec<VerificationToken> {
        let book = self.book.read();
        book.by_good
            .get(&good_id)
            .map(|codes| {
                codes
                    .iter()
                    .filter_map(|code| book.tokens.get(code).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}
