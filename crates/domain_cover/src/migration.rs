//! Legacy cover token migration
//!
//! A swap runs in three phases:
//!
//! 1. **Plan**: read every legacy token and validate it against the caller,
//!    the currency registry and the cover book. The sum insured must be
//!    exact in the asset's base units. Nothing is mutated; the
//!    result is a list of pending mints.
//! 2. **Lock**: ask the legacy ledger to lock all tokens in one call. The
//!    ledger locks all of them or none.
//! 3. **Commit**: record the covers and mint the new tokens. This phase
//!    cannot fail.
//!
//! A failure in any phase leaves both ledgers as they were.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{info, warn};

use core_kernel::{CoverId, HolderId, LegacyTokenId, TokenId};

use crate::admin::AdminCap;
use crate::cover::{CoverBook, CoverRecord};
use crate::currency::CurrencyRegistry;
use crate::error::CoverError;
use crate::ledger::CoverLedger;
use crate::ports::{LegacyCoverPort, LegacyCoverToken};
use crate::token::{TokenSeed, TokenStatus};

/// Outcome of one migrated legacy token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapReceipt {
    pub legacy_token_id: LegacyTokenId,
    pub token_id: TokenId,
    pub cover_id: CoverId,
    pub status: TokenStatus,
}

#[derive(Debug)]
struct PendingSwap {
    legacy_token_id: LegacyTokenId,
    record: CoverRecord,
    seed: TokenSeed,
}

/// An item that failed planning, before any wrapping
struct ItemFailure {
    index: usize,
    legacy_token_id: LegacyTokenId,
    error: CoverError,
}

/// Exchanges legacy tokens for new cover tokens
pub struct MigrationBridge {
    legacy: Arc<dyn LegacyCoverPort>,
    /// Identity under which the bridge operates on the legacy ledger
    bridge_id: HolderId,
    active: bool,
}

impl MigrationBridge {
    pub fn new(legacy: Arc<dyn LegacyCoverPort>, bridge_id: HolderId, active: bool) -> Self {
        Self {
            legacy,
            bridge_id,
            active,
        }
    }

    pub fn bridge_id(&self) -> HolderId {
        self.bridge_id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Switches migration on; returns false if it already was
    pub fn activate(&mut self, _cap: &AdminCap) -> bool {
        let was_active = self.active;
        self.active = true;
        !was_active
    }

    /// Migrates a single legacy token
    pub async fn swap_token(
        &self,
        ledger: &mut CoverLedger,
        book: &mut CoverBook,
        registry: &CurrencyRegistry,
        legacy_token_id: LegacyTokenId,
        caller: HolderId,
    ) -> Result<SwapReceipt, CoverError> {
        self.ensure_active()?;
        let plan = self
            .plan(book, registry, &[legacy_token_id], caller)
            .await
            .map_err(|failure| failure.error)?;

        self.lock(&plan).await?;
        let mut receipts = Self::commit(ledger, book, plan, caller);
        receipts.pop().ok_or(CoverError::EmptyBatch)
    }

    /// Migrates a batch of legacy tokens as one unit
    ///
    /// If any item fails, the batch fails with `BatchAborted` naming the
    /// first failing item and nothing is migrated. A lock refusal from the
    /// legacy ledger is attributed to the first item whose legacy state no
    /// longer matches the plan, or to the first item if none does.
    pub async fn batch_swap_tokens(
        &self,
        ledger: &mut CoverLedger,
        book: &mut CoverBook,
        registry: &CurrencyRegistry,
        legacy_token_ids: &[LegacyTokenId],
        caller: HolderId,
    ) -> Result<Vec<SwapReceipt>, CoverError> {
        self.ensure_active()?;
        let Some(&first) = legacy_token_ids.first() else {
            return Err(CoverError::EmptyBatch);
        };

        let plan = match self.plan(book, registry, legacy_token_ids, caller).await {
            Ok(plan) => plan,
            Err(failure) => {
                warn!(
                    index = failure.index,
                    legacy_token_id = %failure.legacy_token_id,
                    error = %failure.error,
                    batch_size = legacy_token_ids.len(),
                    "Batch swap aborted"
                );
                return Err(CoverError::BatchAborted {
                    index: failure.index,
                    legacy_token_id: failure.legacy_token_id,
                    source: Box::new(failure.error),
                });
            }
        };

        if let Err(error) = self.lock(&plan).await {
            let (index, legacy_token_id) = self
                .locate_lock_refusal(&plan, caller)
                .await
                .unwrap_or((0, first));
            return Err(CoverError::BatchAborted {
                index,
                legacy_token_id,
                source: Box::new(error),
            });
        }

        Ok(Self::commit(ledger, book, plan, caller))
    }

    fn ensure_active(&self) -> Result<(), CoverError> {
        if !self.active {
            return Err(CoverError::SwapNotActive);
        }
        Ok(())
    }

    async fn plan(
        &self,
        book: &CoverBook,
        registry: &CurrencyRegistry,
        ids: &[LegacyTokenId],
        caller: HolderId,
    ) -> Result<Vec<PendingSwap>, ItemFailure> {
        let mut seen = HashSet::with_capacity(ids.len());
        let mut planned_covers: HashMap<CoverId, CoverRecord> = HashMap::with_capacity(ids.len());
        let mut plan = Vec::with_capacity(ids.len());

        for (index, &legacy_token_id) in ids.iter().enumerate() {
            let fail = |error: CoverError| ItemFailure {
                index,
                legacy_token_id,
                error,
            };

            if !seen.insert(legacy_token_id) {
                return Err(fail(CoverError::DuplicateLegacyToken(legacy_token_id)));
            }

            let legacy = self
                .legacy
                .get_token(legacy_token_id)
                .await
                .map_err(|e| fail(e.into()))?;
            let pending = self
                .plan_item(book, registry, &planned_covers, legacy, caller)
                .map_err(fail)?;

            planned_covers.insert(pending.record.cover_id, pending.record.clone());
            plan.push(pending);
        }

        Ok(plan)
    }

    fn plan_item(
        &self,
        book: &CoverBook,
        registry: &CurrencyRegistry,
        planned_covers: &HashMap<CoverId, CoverRecord>,
        legacy: LegacyCoverToken,
        caller: HolderId,
    ) -> Result<PendingSwap, CoverError> {
        if legacy.locked {
            return Err(CoverError::LegacyTokenLocked(legacy.id));
        }
        if legacy.owner != caller {
            return Err(CoverError::unauthorized(caller, "swap legacy token"));
        }
        if legacy.approved != Some(self.bridge_id) {
            return Err(CoverError::unauthorized(caller, "swap legacy token without bridge approval"));
        }
        if legacy.status.requires_claim() && legacy.claim_id.is_none() {
            return Err(CoverError::InconsistentLegacyToken(legacy.id));
        }

        let currency = legacy.currency();
        let decimals = registry.resolve(currency)?.decimals;
        legacy.cover.sum_insured.to_minor(decimals)?;

        let record = CoverRecord {
            cover_id: legacy.cover.cover_id,
            purchaser: caller,
            sum_insured: legacy.cover.sum_insured,
            period: legacy.cover.period,
        };
        book.ensure_insertable(&record)?;
        if let Some(other) = planned_covers.get(&record.cover_id) {
            return Err(if other.same_terms(&record) {
                CoverError::CoverAlreadyIssued(record.cover_id)
            } else {
                CoverError::CoverTermsMismatch(record.cover_id)
            });
        }

        Ok(PendingSwap {
            legacy_token_id: legacy.id,
            seed: TokenSeed {
                cover_id: record.cover_id,
                currency,
                status: legacy.status,
                claim_id: legacy.claim_id,
            },
            record,
        })
    }

    async fn lock(&self, plan: &[PendingSwap]) -> Result<(), CoverError> {
        let ids: Vec<LegacyTokenId> = plan.iter().map(|p| p.legacy_token_id).collect();
        if let Err(e) = self.legacy.lock_tokens(ids, self.bridge_id).await {
            warn!(error = %e, count = plan.len(), "Legacy ledger refused to lock tokens");
            return Err(e.into());
        }
        Ok(())
    }

    /// Re-reads the planned tokens and returns the first one that changed
    async fn locate_lock_refusal(&self, plan: &[PendingSwap], caller: HolderId) -> Option<(usize, LegacyTokenId)> {
        for (index, pending) in plan.iter().enumerate() {
            let changed = match self.legacy.get_token(pending.legacy_token_id).await {
                Ok(token) => token.locked || token.owner != caller || token.approved != Some(self.bridge_id),
                Err(_) => true,
            };
            if changed {
                return Some((index, pending.legacy_token_id));
            }
        }
        None
    }

    fn commit(
        ledger: &mut CoverLedger,
        book: &mut CoverBook,
        plan: Vec<PendingSwap>,
        caller: HolderId,
    ) -> Vec<SwapReceipt> {
        plan
            .into_iter()
            .map(|pending| {
                let token_id = ledger.mint_restored(caller, pending.seed);
                let cover_id = pending.record.cover_id;
                book.attach(pending.record, token_id);

                info!(
                    legacy_token_id = %pending.legacy_token_id,
                    %token_id,
                    %cover_id,
                    status = %pending.seed.status,
                    "Legacy token swapped"
                );
                SwapReceipt {
                    legacy_token_id: pending.legacy_token_id,
                    token_id,
                    cover_id,
                    status: pending.seed.status,
                }
            })
            .collect()
    }
}
