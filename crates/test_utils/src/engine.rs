//! Engine Test Harness
//!
//! Wires a `CoverService` to in-memory collaborators and keeps handles to
//! them so tests can decide verdicts, fund the vault and seed the legacy
//! ledger between calls.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing_subscriber::EnvFilter;

use core_kernel::{HolderId, TokenId};
use domain_cover::ports::mock::{FakeAssessment, InMemoryLegacyLedger, InMemoryVault};
use domain_cover::{Collaborators, CoverService, CurrencyConfig, CurrencyKind, EngineConfig, LegacyCoverToken, Verdict};

use crate::builders::CoverQuoteBuilder;
use crate::fixtures::{CurrencyFixtures, HolderFixtures, MoneyFixtures};

static TRACING: Lazy<()> = Lazy::new(|| {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
});

/// Installs a test log subscriber once per process
///
/// Honors `RUST_LOG`; defaults to `warn`.
pub fn init_test_tracing() {
    Lazy::force(&TRACING);
}

/// Engine configuration with ETH registered and migration off
pub fn eth_only_config() -> EngineConfig {
    EngineConfig::new(HolderFixtures::admin()).with_currency(CurrencyConfig {
        symbol: "ETH".to_string(),
        kind: CurrencyKind::Native,
        contract: None,
        decimals: 18,
    })
}

/// A cover engine backed by in-memory collaborators
pub struct TestEngine {
    pub service: CoverService,
    pub assessment: FakeAssessment,
    pub vault: InMemoryVault,
    pub legacy: InMemoryLegacyLedger,
}

impl TestEngine {
    /// Engine with ETH registered, an empty vault and migration off
    pub fn new() -> Self {
        Self::from_config(&eth_only_config())
    }

    /// Engine seeded from `config`
    ///
    /// # Panics
    ///
    /// Panics if the configuration is rejected
    pub fn from_config(config: &EngineConfig) -> Self {
        init_test_tracing();

        let assessment = FakeAssessment::new();
        let vault = InMemoryVault::new();
        let legacy = InMemoryLegacyLedger::new();
        let collaborators = Collaborators {
            assessment: Arc::new(assessment.clone()),
            settlement: Arc::new(vault.clone()),
            legacy: Arc::new(legacy.clone()),
            bridge_id: HolderFixtures::bridge(),
        };

        let service = CoverService::from_config(config, collaborators).expect("valid test configuration");
        Self {
            service,
            assessment,
            vault,
            legacy,
        }
    }

    /// Engine with ETH registered and an ETH pool large enough for any test
    pub async fn funded() -> Self {
        let engine = Self::new();
        engine.vault.fund(MoneyFixtures::eth_pool()).await;
        engine
    }

    /// Registers DAI as a settlement currency and funds its pool
    pub async fn with_dai(mut self) -> Self {
        self.service
            .add_currency(HolderFixtures::admin(), CurrencyFixtures::dai(), CurrencyFixtures::dai_asset())
            .expect("admin may add DAI");
        self.vault.fund(MoneyFixtures::dai_pool()).await;
        self
    }

    /// Switches migration on
    pub fn with_swap_active(mut self) -> Self {
        self.service
            .activate_swap(HolderFixtures::admin())
            .expect("admin may activate swap");
        self
    }

    /// Seeds the legacy ledger
    pub async fn with_legacy(self, tokens: Vec<LegacyCoverToken>) -> Self {
        for token in tokens {
            self.legacy.insert(token).await;
        }
        self
    }

    /// Buys a standard 1 ETH cover for `holder`
    pub async fn issue_cover(&mut self, holder: HolderId, cover_id: u64) -> TokenId {
        let quote = CoverQuoteBuilder::new(cover_id).build();
        let premium = quote.premium;
        self.service
            .buy_cover(holder, quote, premium)
            .await
            .expect("cover purchase succeeds")
    }

    /// Submits a claim for `token_id` and applies `verdict`
    pub async fn claim_with_verdict(&mut self, holder: HolderId, token_id: TokenId, verdict: Verdict) {
        let claim_id = self
            .service
            .submit_claim(holder, token_id)
            .await
            .expect("claim submission succeeds");
        self.assessment.decide(claim_id, verdict).await;
        self.service
            .resolve_verdict(token_id)
            .await
            .expect("verdict resolution succeeds");
    }

    /// Buys a standard cover for `holder` and drives it to `Accepted`
    pub async fn accepted_token(&mut self, holder: HolderId, cover_id: u64) -> TokenId {
        let token_id = self.issue_cover(holder, cover_id).await;
        self.claim_with_verdict(holder, token_id, Verdict::Accepted).await;
        token_id
    }
}

impl Default for TestEngine {
    fn default() -> Self {
        Self::new()
    }
}
