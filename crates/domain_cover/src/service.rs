//! Cover engine facade
//!
//! `CoverService` owns all engine state and exposes the public operations.
//! Every mutating operation takes `&mut self`, so calls are serialized and
//! each one runs to completion before the next starts; no caller can observe
//! or re-enter a half-applied operation.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, instrument};

use core_kernel::{ClaimId, CoverId, CurrencyCode, HolderId, LegacyTokenId, Money, TokenId};

use crate::admin::AdminGate;
use crate::claims::ClaimCoordinator;
use crate::config::EngineConfig;
use crate::cover::{CoverBook, CoverQuote, CoverRecord};
use crate::currency::{AssetHandle, CurrencyEntry, CurrencyRegistry};
use crate::error::CoverError;
use crate::events::{CoverEvent, EventJournal};
use crate::ledger::CoverLedger;
use crate::migration::{MigrationBridge, SwapReceipt};
use crate::ports::{AssessmentPort, LegacyCoverPort, PayoutReceipt, SettlementPort};
use crate::settlement::RedemptionSettlement;
use crate::token::{CoverToken, TokenStatus, TokenView};

/// External collaborators the engine is wired to
#[derive(Clone)]
pub struct Collaborators {
    pub assessment: Arc<dyn AssessmentPort>,
    pub settlement: Arc<dyn SettlementPort>,
    pub legacy: Arc<dyn LegacyCoverPort>,
    /// Identity the migration bridge uses on the legacy ledger
    pub bridge_id: HolderId,
}

/// The cover token engine
pub struct CoverService {
    gate: AdminGate,
    registry: CurrencyRegistry,
    ledger: CoverLedger,
    book: CoverBook,
    claims: ClaimCoordinator,
    settlement: RedemptionSettlement,
    bridge: MigrationBridge,
    journal: EventJournal,
}

impl CoverService {
    /// Creates an engine with no currencies and migration switched off
    pub fn new(admin: HolderId, collaborators: Collaborators) -> Self {
        Self {
            gate: AdminGate::new(admin),
            registry: CurrencyRegistry::new(),
            ledger: CoverLedger::new(),
            book: CoverBook::new(),
            claims: ClaimCoordinator::new(collaborators.assessment),
            settlement: RedemptionSettlement::new(collaborators.settlement),
            bridge: MigrationBridge::new(collaborators.legacy, collaborators.bridge_id, false),
            journal: EventJournal::new(),
        }
    }

    /// Creates an engine seeded from configuration
    ///
    /// Configured currencies are registered in order. Any invalid entry
    /// fails the whole initialization with `CoverError::Configuration`.
    pub fn from_config(config: &EngineConfig, collaborators: Collaborators) -> Result<Self, CoverError> {
        let mut service = Self::new(config.admin, collaborators);
        let cap = service.gate.authorize(config.admin, "configure engine")?;

        for currency in &config.currencies {
            let (symbol, asset) = currency.to_entry()?;
            service
                .registry
                .add_currency(&cap, symbol, asset)
                .map_err(|e| CoverError::Configuration(e.to_string()))?;
        }
        if config.swap_active {
            service.bridge.activate(&cap);
        }

        info!(
            admin = %config.admin,
            currencies = service.registry.len(),
            swap_active = service.bridge.is_active(),
            "Cover engine initialized"
        );
        Ok(service)
    }

    // ========================================================================
    // Administration
    // ========================================================================

    /// Registers a settlement currency (admin only)
    #[instrument(skip(self, asset))]
    pub fn add_currency(
        &mut self,
        caller: HolderId,
        symbol: CurrencyCode,
        asset: AssetHandle,
    ) -> Result<(), CoverError> {
        let cap = self.gate.authorize(caller, "add currency")?;
        self.registry.add_currency(&cap, symbol, asset.clone())?;

        info!(%symbol, decimals = asset.decimals, "Currency added");
        self.journal.record(CoverEvent::CurrencyAdded {
            symbol,
            asset,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    /// Switches legacy token migration on (admin only)
    ///
    /// Activating an already active bridge succeeds without effect.
    #[instrument(skip(self))]
    pub fn activate_swap(&mut self, caller: HolderId) -> Result<(), CoverError> {
        let cap = self.gate.authorize(caller, "activate swap")?;
        if self.bridge.activate(&cap) {
            info!("Token swap activated");
            self.journal.record(CoverEvent::SwapActivated {
                by: caller,
                timestamp: Utc::now(),
            });
        }
        Ok(())
    }

    /// Hands the admin role to `new_admin` (admin only)
    #[instrument(skip(self))]
    pub fn transfer_admin(&mut self, caller: HolderId, new_admin: HolderId) -> Result<(), CoverError> {
        let cap = self.gate.authorize(caller, "transfer admin")?;
        let previous = self.gate.transfer(cap, new_admin);

        info!(from = %previous, to = %new_admin, "Admin transferred");
        self.journal.record(CoverEvent::AdminTransferred {
            from: previous,
            to: new_admin,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    // ========================================================================
    // Purchase and ownership
    // ========================================================================

    /// Buys a priced cover and mints its token to `caller`
    #[instrument(skip(self, quote), fields(cover_id = %quote.cover_id))]
    pub async fn buy_cover(
        &mut self,
        caller: HolderId,
        quote: CoverQuote,
        payment: Money,
    ) -> Result<TokenId, CoverError> {
        let currency = quote.currency();
        let decimals = self.registry.resolve(currency)?.decimals;
        quote.validate()?;
        quote.sum_insured.to_minor(decimals)?;
        quote.premium.to_minor(decimals)?;

        let record = CoverRecord {
            cover_id: quote.cover_id,
            purchaser: caller,
            sum_insured: quote.sum_insured,
            period: quote.period,
        };
        self.book.ensure_insertable(&record)?;

        self.settlement
            .collect_premium(&self.registry, &quote, caller, payment)
            .await?;

        let cover_id = quote.cover_id;
        let token_id = self
            .ledger
            .mint_with(caller, |id| CoverToken::issued(id, cover_id, currency));
        self.book.attach(record, token_id);

        info!(%token_id, %cover_id, %currency, premium = %payment, "Cover issued");
        self.journal.record(CoverEvent::CoverIssued {
            token_id,
            cover_id,
            owner: caller,
            premium: payment,
            timestamp: Utc::now(),
        });
        Ok(token_id)
    }

    /// Moves a token to another holder (owner only)
    ///
    /// Transferring to oneself succeeds without effect.
    #[instrument(skip(self))]
    pub fn transfer_token(&mut self, caller: HolderId, token_id: TokenId, to: HolderId) -> Result<(), CoverError> {
        if !self.ledger.transfer(token_id, caller, to)? {
            return Ok(());
        }

        info!(%token_id, from = %caller, %to, "Token transferred");
        self.journal.record(CoverEvent::TokenTransferred {
            token_id,
            from: caller,
            to,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    // ========================================================================
    // Claims and redemption
    // ========================================================================

    /// Opens a claim against a token held by `caller`
    #[instrument(skip(self))]
    pub async fn submit_claim(&mut self, caller: HolderId, token_id: TokenId) -> Result<ClaimId, CoverError> {
        let submitted = self.claims.submit_claim(&mut self.ledger, token_id, caller).await?;

        self.journal.record(CoverEvent::ClaimSubmitted {
            token_id,
            claim_id: submitted.claim_id,
            previous_claim_id: submitted.previous_claim_id,
            timestamp: Utc::now(),
        });
        Ok(submitted.claim_id)
    }

    /// Applies the verdict of a token's pending claim, if one is available
    ///
    /// Callable by anyone and safe to poll; returns the token's status after
    /// the call.
    #[instrument(skip(self))]
    pub async fn resolve_verdict(&mut self, token_id: TokenId) -> Result<TokenStatus, CoverError> {
        let resolution = self.claims.resolve_verdict(&mut self.ledger, token_id).await?;

        if let (true, Some(claim_id)) = (resolution.changed, resolution.claim_id) {
            self.journal.record(CoverEvent::ClaimResolved {
                token_id,
                claim_id,
                status: resolution.status,
                timestamp: Utc::now(),
            });
        }
        Ok(resolution.status)
    }

    /// Pays out an accepted claim to the token holder
    #[instrument(skip(self))]
    pub async fn redeem_claim(&mut self, caller: HolderId, token_id: TokenId) -> Result<PayoutReceipt, CoverError> {
        let receipt = self
            .settlement
            .redeem_claim(&mut self.ledger, &self.book, &self.registry, token_id, caller)
            .await?;

        self.journal.record(CoverEvent::ClaimRedeemed {
            token_id,
            payout_id: receipt.payout_id,
            recipient: receipt.recipient,
            amount: receipt.amount,
            timestamp: receipt.paid_at,
        });
        Ok(receipt)
    }

    // ========================================================================
    // Migration
    // ========================================================================

    /// Exchanges a legacy token held by `caller` for a new token
    #[instrument(skip(self))]
    pub async fn swap_token(&mut self, caller: HolderId, legacy_token_id: LegacyTokenId) -> Result<TokenId, CoverError> {
        let receipt = self
            .bridge
            .swap_token(&mut self.ledger, &mut self.book, &self.registry, legacy_token_id, caller)
            .await?;

        self.record_swaps(caller, std::slice::from_ref(&receipt));
        Ok(receipt.token_id)
    }

    /// Exchanges several legacy tokens as one all-or-nothing unit
    ///
    /// Returns the new token ids in the order of `legacy_token_ids`.
    #[instrument(skip(self, legacy_token_ids), fields(batch_size = legacy_token_ids.len()))]
    pub async fn batch_swap_tokens(
        &mut self,
        caller: HolderId,
        legacy_token_ids: &[LegacyTokenId],
    ) -> Result<Vec<TokenId>, CoverError> {
        let receipts = self
            .bridge
            .batch_swap_tokens(&mut self.ledger, &mut self.book, &self.registry, legacy_token_ids, caller)
            .await?;

        self.record_swaps(caller, &receipts);
        Ok(receipts.iter().map(|r| r.token_id).collect())
    }

    fn record_swaps(&mut self, owner: HolderId, receipts: &[SwapReceipt]) {
        let timestamp = Utc::now();
        for receipt in receipts {
            self.journal.record(CoverEvent::TokenSwapped {
                legacy_token_id: receipt.legacy_token_id,
                token_id: receipt.token_id,
                cover_id: receipt.cover_id,
                status: receipt.status,
                owner,
                timestamp,
            });
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Returns `{cover_id, currency, status, claim_id}` of a token
    pub fn get_token(&self, token_id: TokenId) -> Result<TokenView, CoverError> {
        self.ledger.get(token_id).map(CoverToken::view)
    }

    pub fn get_cover(&self, cover_id: CoverId) -> Result<&CoverRecord, CoverError> {
        self.book.get(cover_id)
    }

    pub fn owner_of(&self, token_id: TokenId) -> Result<HolderId, CoverError> {
        self.ledger.owner_of(token_id)
    }

    pub fn balance_of(&self, owner: HolderId) -> usize {
        self.ledger.balance_of(owner)
    }

    pub fn token_of_owner_by_index(&self, owner: HolderId, index: usize) -> Option<TokenId> {
        self.ledger.token_of_owner_by_index(owner, index)
    }

    pub fn tokens_of_owner(&self, owner: HolderId) -> &[TokenId] {
        self.ledger.tokens_of_owner(owner)
    }

    pub fn total_supply(&self) -> usize {
        self.ledger.total_supply()
    }

    /// Registered currencies in registration order
    pub fn currencies(&self) -> &[CurrencyEntry] {
        self.registry.entries()
    }

    pub fn is_swap_active(&self) -> bool {
        self.bridge.is_active()
    }

    pub fn admin(&self) -> HolderId {
        self.gate.admin()
    }

    /// Committed events, oldest first
    pub fn events(&self) -> &[CoverEvent] {
        self.journal.all()
    }

    pub fn journal(&self) -> &EventJournal {
        &self.journal
    }
}
