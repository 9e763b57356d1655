//! Cover Domain Ports
//!
//! The engine consumes three collaborators, each behind an async port so the
//! core can be exercised against deterministic fakes:
//!
//! - **AssessmentPort**: the claims-assessment (voting) system. Opens claims
//!   and reports a verdict the engine polls.
//! - **SettlementPort**: the vault holding pooled funds. Collects premiums
//!   and pays out redeemed claims.
//! - **LegacyCoverPort**: the ledger of the previous cover token
//!   implementation, used by migration.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_cover::ports::mock::{FakeAssessment, InMemoryLegacyLedger, InMemoryVault};
//!
//! let collaborators = Collaborators {
//!     assessment: Arc::new(FakeAssessment::new()),
//!     settlement: Arc::new(InMemoryVault::new()),
//!     legacy: Arc::new(InMemoryLegacyLedger::new()),
//!     bridge_id: HolderId::new(),
//! };
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use core_kernel::{
    ClaimId, CoverId, CoverPeriod, CurrencyCode, DomainPort, HolderId, LegacyTokenId, Money,
    PayoutId, PortError, TokenId,
};

use crate::currency::AssetHandle;
use crate::token::TokenStatus;

/// Outcome of a claim as reported by the assessment collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Pending,
    Accepted,
    Denied,
}

/// Claims-assessment collaborator
#[async_trait]
pub trait AssessmentPort: DomainPort {
    /// Opens a claim for a token and returns its id
    ///
    /// Every call must return a claim id not previously issued for the token.
    async fn open_claim(&self, token_id: TokenId, cover_id: CoverId) -> Result<ClaimId, PortError>;

    /// Reads the current outcome of a claim
    async fn get_verdict(&self, claim_id: ClaimId) -> Result<Verdict, PortError>;
}

/// A premium to be pulled from a buyer into the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumCollection {
    pub cover_id: CoverId,
    pub payer: HolderId,
    pub asset: AssetHandle,
    pub amount: Money,
    /// Amount in the asset's base units
    pub minor_units: u128,
}

/// A payout to be transferred from the pool to a token holder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRequest {
    pub token_id: TokenId,
    pub recipient: HolderId,
    pub asset: AssetHandle,
    pub amount: Money,
    /// Amount in the asset's base units
    pub minor_units: u128,
}

/// Confirmation of a completed payout
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutReceipt {
    pub payout_id: PayoutId,
    pub token_id: TokenId,
    pub recipient: HolderId,
    pub amount: Money,
    pub minor_units: u128,
    pub paid_at: DateTime<Utc>,
}

/// Settlement vault collaborator
#[async_trait]
pub trait SettlementPort: DomainPort {
    /// Pulls a premium into the pool
    async fn collect_premium(&self, collection: PremiumCollection) -> Result<(), PortError>;

    /// Transfers a payout out of the pool
    ///
    /// Returns `PortError::InsufficientLiquidity` when the pool cannot cover
    /// the amount; nothing is transferred in that case.
    async fn pay_out(&self, request: PayoutRequest) -> Result<PayoutReceipt, PortError>;
}

/// Cover terms recorded against a legacy token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCover {
    pub cover_id: CoverId,
    pub sum_insured: Money,
    pub period: CoverPeriod,
}

/// A token on the legacy cover ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyCoverToken {
    pub id: LegacyTokenId,
    pub owner: HolderId,
    /// Operator the owner approved to move this token
    pub approved: Option<HolderId>,
    pub locked: bool,
    pub cover: LegacyCover,
    pub status: TokenStatus,
    pub claim_id: Option<ClaimId>,
}

impl LegacyCoverToken {
    pub fn currency(&self) -> CurrencyCode {
        self.cover.sum_insured.currency()
    }

    /// Returns true if `operator` may move the token
    pub fn is_operator(&self, operator: HolderId) -> bool {
        self.owner == operator || self.approved == Some(operator)
    }
}

/// Legacy cover token ledger
#[async_trait]
pub trait LegacyCoverPort: DomainPort {
    /// Reads a legacy token
    async fn get_token(&self, id: LegacyTokenId) -> Result<LegacyCoverToken, PortError>;

    /// Locks every listed token, or none of them
    ///
    /// `operator` must be the owner or approved operator of each token.
    async fn lock_tokens(&self, ids: Vec<LegacyTokenId>, operator: HolderId) -> Result<(), PortError>;
}

/// In-memory collaborators for testing
///
/// These fakes keep their state behind `tokio::sync::RwLock` so a test can
/// hold an `Arc` to the same instance the service uses and steer or inspect
/// it between calls.
#[cfg(any(test, feature = "mock"))]
pub mod mock {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;
    use tokio::sync::RwLock;

    #[derive(Debug, Default)]
    struct AssessmentState {
        last_issued: u64,
        verdicts: HashMap<ClaimId, Verdict>,
        latest_by_token: HashMap<TokenId, ClaimId>,
        reuse_claim_ids: bool,
        unavailable: bool,
    }

    /// Deterministic verdict oracle
    ///
    /// Claim ids are issued from 1 upward. New claims start out `Pending`
    /// until a test decides them.
    #[derive(Debug, Default, Clone)]
    pub struct FakeAssessment {
        state: Arc<RwLock<AssessmentState>>,
    }

    impl FakeAssessment {
        pub fn new() -> Self {
            Self::default()
        }

        /// Sets the verdict of a claim
        pub async fn decide(&self, claim_id: ClaimId, verdict: Verdict) {
            self.state.write().await.verdicts.insert(claim_id, verdict);
        }

        /// Sets the verdict of the most recent claim opened for a token
        pub async fn decide_latest(&self, token_id: TokenId, verdict: Verdict) -> Option<ClaimId> {
            let mut state = self.state.write().await;
            let claim_id = state.latest_by_token.get(&token_id).copied()?;
            state.verdicts.insert(claim_id, verdict);
            Some(claim_id)
        }

        /// Most recent claim opened for a token
        pub async fn latest_claim(&self, token_id: TokenId) -> Option<ClaimId> {
            self.state.read().await.latest_by_token.get(&token_id).copied()
        }

        /// Number of claims opened so far
        pub async fn claims_opened(&self) -> u64 {
            self.state.read().await.last_issued
        }

        /// Makes `open_claim` hand back the token's previous claim id
        pub async fn reuse_claim_ids(&self, reuse: bool) {
            self.state.write().await.reuse_claim_ids = reuse;
        }

        /// Makes every call fail with `ServiceUnavailable`
        pub async fn set_unavailable(&self, unavailable: bool) {
            self.state.write().await.unavailable = unavailable;
        }
    }

    impl DomainPort for FakeAssessment {}

    #[async_trait]
    impl AssessmentPort for FakeAssessment {
        async fn open_claim(&self, token_id: TokenId, _cover_id: CoverId) -> Result<ClaimId, PortError> {
            let mut state = self.state.write().await;
            if state.unavailable {
                return Err(PortError::ServiceUnavailable {
                    service: "assessment".to_string(),
                });
            }
            if state.reuse_claim_ids {
                if let Some(previous) = state.latest_by_token.get(&token_id).copied() {
                    return Ok(previous);
                }
            }

            state.last_issued += 1;
            let claim_id = ClaimId::new(state.last_issued);
            state.verdicts.insert(claim_id, Verdict::Pending);
            state.latest_by_token.insert(token_id, claim_id);
            Ok(claim_id)
        }

        async fn get_verdict(&self, claim_id: ClaimId) -> Result<Verdict, PortError> {
            let state = self.state.read().await;
            if state.unavailable {
                return Err(PortError::ServiceUnavailable {
                    service: "assessment".to_string(),
                });
            }
            state
                .verdicts
                .get(&claim_id)
                .copied()
                .ok_or_else(|| PortError::not_found("Claim", claim_id))
        }
    }

    /// A movement recorded by the in-memory vault
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum VaultEntry {
        PremiumCollected(PremiumCollection),
        PaidOut(PayoutReceipt),
    }

    #[derive(Debug, Default)]
    struct VaultState {
        pools: HashMap<CurrencyCode, Money>,
        journal: Vec<VaultEntry>,
        halted: bool,
    }

    /// Pooled-liquidity vault
    ///
    /// Premiums add to the pool of their currency; payouts draw from it and
    /// fail with `InsufficientLiquidity` when the pool is short.
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryVault {
        state: Arc<RwLock<VaultState>>,
    }

    impl InMemoryVault {
        pub fn new() -> Self {
            Self::default()
        }

        /// Adds liquidity to the pool of the amount's currency
        pub async fn fund(&self, amount: Money) {
            let mut state = self.state.write().await;
            let pool = state
                .pools
                .entry(amount.currency())
                .or_insert_with(|| Money::zero(amount.currency()));
            if let Ok(total) = pool.checked_add(&amount) {
                *pool = total;
            }
        }

        /// Pooled balance for a currency
        pub async fn balance(&self, currency: CurrencyCode) -> Money {
            self.state
                .read()
                .await
                .pools
                .get(&currency)
                .copied()
                .unwrap_or_else(|| Money::zero(currency))
        }

        /// All payouts, oldest first
        pub async fn payouts(&self) -> Vec<PayoutReceipt> {
            self.state
                .read()
                .await
                .journal
                .iter()
                .filter_map(|e| match e {
                    VaultEntry::PaidOut(receipt) => Some(receipt.clone()),
                    VaultEntry::PremiumCollected(_) => None,
                })
                .collect()
        }

        /// All premium collections, oldest first
        pub async fn collections(&self) -> Vec<PremiumCollection> {
            self.state
                .read()
                .await
                .journal
                .iter()
                .filter_map(|e| match e {
                    VaultEntry::PremiumCollected(c) => Some(c.clone()),
                    VaultEntry::PaidOut(_) => None,
                })
                .collect()
        }

        pub async fn journal(&self) -> Vec<VaultEntry> {
            self.state.read().await.journal.clone()
        }

        /// Makes every call fail with `ServiceUnavailable`
        pub async fn set_halted(&self, halted: bool) {
            self.state.write().await.halted = halted;
        }
    }

    impl DomainPort for InMemoryVault {}

    #[async_trait]
    impl SettlementPort for InMemoryVault {
        async fn collect_premium(&self, collection: PremiumCollection) -> Result<(), PortError> {
            let mut state = self.state.write().await;
            if state.halted {
                return Err(PortError::ServiceUnavailable {
                    service: "vault".to_string(),
                });
            }

            let currency = collection.amount.currency();
            let pool = state
                .pools
                .get(&currency)
                .copied()
                .unwrap_or_else(|| Money::zero(currency));
            let total = pool
                .checked_add(&collection.amount)
                .map_err(|e| PortError::internal(e.to_string()))?;
            state.pools.insert(currency, total);
            state.journal.push(VaultEntry::PremiumCollected(collection));
            Ok(())
        }

        async fn pay_out(&self, request: PayoutRequest) -> Result<PayoutReceipt, PortError> {
            let mut state = self.state.write().await;
            if state.halted {
                return Err(PortError::ServiceUnavailable {
                    service: "vault".to_string(),
                });
            }

            let currency = request.amount.currency();
            let pool = state
                .pools
                .get(&currency)
                .copied()
                .unwrap_or_else(|| Money::zero(currency));
            if pool.amount() < request.amount.amount() {
                return Err(PortError::InsufficientLiquidity {
                    requested: request.amount.to_string(),
                    available: pool.to_string(),
                });
            }
            let remaining = pool
                .checked_sub(&request.amount)
                .map_err(|e| PortError::internal(e.to_string()))?;
            state.pools.insert(currency, remaining);

            let receipt = PayoutReceipt {
                payout_id: PayoutId::new_v7(),
                token_id: request.token_id,
                recipient: request.recipient,
                amount: request.amount,
                minor_units: request.minor_units,
                paid_at: Utc::now(),
            };
            state.journal.push(VaultEntry::PaidOut(receipt.clone()));
            Ok(receipt)
        }
    }

    /// Legacy token ledger
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryLegacyLedger {
        tokens: Arc<RwLock<HashMap<LegacyTokenId, LegacyCoverToken>>>,
        halted: Arc<RwLock<bool>>,
    }

    impl InMemoryLegacyLedger {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates with tokens for testing
        pub async fn with_tokens(tokens: Vec<LegacyCoverToken>) -> Self {
            let ledger = Self::new();
            for token in tokens {
                ledger.insert(token).await;
            }
            ledger
        }

        pub async fn insert(&self, token: LegacyCoverToken) {
            self.tokens.write().await.insert(token.id, token);
        }

        /// Approves `operator` to move a token
        pub async fn approve(&self, id: LegacyTokenId, operator: HolderId) -> Result<(), PortError> {
            let mut tokens = self.tokens.write().await;
            let token = tokens
                .get_mut(&id)
                .ok_or_else(|| PortError::not_found("LegacyToken", id))?;
            token.approved = Some(operator);
            Ok(())
        }

        pub async fn is_locked(&self, id: LegacyTokenId) -> bool {
            self.tokens.read().await.get(&id).is_some_and(|t| t.locked)
        }

        pub async fn locked_count(&self) -> usize {
            self.tokens.read().await.values().filter(|t| t.locked).count()
        }

        /// Makes every lock request fail with `ServiceUnavailable`
        pub async fn set_halted(&self, halted: bool) {
            *self.halted.write().await = halted;
        }
    }

    impl DomainPort for InMemoryLegacyLedger {}

    #[async_trait]
    impl LegacyCoverPort for InMemoryLegacyLedger {
        async fn get_token(&self, id: LegacyTokenId) -> Result<LegacyCoverToken, PortError> {
            self.tokens
                .read()
                .await
                .get(&id)
                .cloned()
                .ok_or_else(|| PortError::not_found("LegacyToken", id))
        }

        async fn lock_tokens(&self, ids: Vec<LegacyTokenId>, operator: HolderId) -> Result<(), PortError> {
            if *self.halted.read().await {
                return Err(PortError::ServiceUnavailable {
                    service: "legacy ledger".to_string(),
                });
            }
            let mut tokens = self.tokens.write().await;

            let mut seen = HashSet::new();
            for id in &ids {
                if !seen.insert(*id) {
                    return Err(PortError::conflict(format!("{} listed twice", id)));
                }
                let token = tokens
                    .get(id)
                    .ok_or_else(|| PortError::not_found("LegacyToken", id))?;
                if token.locked {
                    return Err(PortError::conflict(format!("{} already locked", id)));
                }
                if !token.is_operator(operator) {
                    return Err(PortError::rejected(format!("{} not approved for {}", id, operator)));
                }
            }

            for id in &ids {
                if let Some(token) = tokens.get_mut(id) {
                    token.locked = true;
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn eth_code() -> CurrencyCode {
        CurrencyCode::new("ETH").unwrap()
    }

    fn eth(amount: rust_decimal::Decimal) -> Money {
        Money::new(amount, eth_code())
    }

    fn legacy(id: u64, owner: HolderId) -> LegacyCoverToken {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        LegacyCoverToken {
            id: LegacyTokenId::new(id),
            owner,
            approved: None,
            locked: false,
            cover: LegacyCover {
                cover_id: CoverId::new(id * 10),
                sum_insured: eth(dec!(1)),
                period: CoverPeriod::days_from(start, 30).unwrap(),
            },
            status: TokenStatus::Active,
            claim_id: None,
        }
    }

    fn payout(amount: Money) -> PayoutRequest {
        PayoutRequest {
            token_id: TokenId::new(1),
            recipient: HolderId::new(),
            asset: AssetHandle::native(18),
            amount,
            minor_units: amount.to_minor(18).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_fake_assessment_issues_fresh_claim_ids() {
        let oracle = FakeAssessment::new();
        let token = TokenId::new(1);

        let first = oracle.open_claim(token, CoverId::new(1)).await.unwrap();
        let second = oracle.open_claim(token, CoverId::new(1)).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(oracle.get_verdict(first).await.unwrap(), Verdict::Pending);
        assert_eq!(oracle.decide_latest(token, Verdict::Denied).await, Some(second));
        assert_eq!(oracle.get_verdict(second).await.unwrap(), Verdict::Denied);
    }

    #[tokio::test]
    async fn test_fake_assessment_unknown_claim() {
        let oracle = FakeAssessment::new();
        let err = oracle.get_verdict(ClaimId::new(42)).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_vault_pays_from_pool() {
        let vault = InMemoryVault::new();
        vault.fund(eth(dec!(2))).await;

        let receipt = vault.pay_out(payout(eth(dec!(1.5)))).await.unwrap();

        assert_eq!(receipt.amount, eth(dec!(1.5)));
        assert_eq!(vault.balance(eth_code()).await, eth(dec!(0.5)));
        assert_eq!(vault.payouts().await.len(), 1);
    }

    #[tokio::test]
    async fn test_vault_rejects_short_pool() {
        let vault = InMemoryVault::new();
        vault.fund(eth(dec!(0.5))).await;

        let err = vault.pay_out(payout(eth(dec!(1)))).await.unwrap_err();

        assert!(matches!(err, PortError::InsufficientLiquidity { .. }));
        assert_eq!(vault.balance(eth_code()).await, eth(dec!(0.5)));
        assert!(vault.journal().await.is_empty());
    }

    #[tokio::test]
    async fn test_legacy_lock_is_all_or_nothing() {
        let owner = HolderId::new();
        let bridge = HolderId::new();
        let ledger = InMemoryLegacyLedger::with_tokens(vec![legacy(1, owner), legacy(2, owner)]).await;
        ledger.approve(LegacyTokenId::new(1), bridge).await.unwrap();

        let result = ledger
            .lock_tokens(vec![LegacyTokenId::new(1), LegacyTokenId::new(2)], bridge)
            .await;

        assert!(result.is_err());
        assert_eq!(ledger.locked_count().await, 0);

        ledger.approve(LegacyTokenId::new(2), bridge).await.unwrap();
        ledger
            .lock_tokens(vec![LegacyTokenId::new(1), LegacyTokenId::new(2)], bridge)
            .await
            .unwrap();
        assert!(ledger.is_locked(LegacyTokenId::new(2)).await);
    }
}
