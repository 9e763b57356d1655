//! Administration, configuration, purchase and ownership

use std::sync::Arc;

use core_kernel::{CoverId, HolderId, TokenId};
use domain_cover::ports::mock::{FakeAssessment, InMemoryLegacyLedger, InMemoryVault};
use domain_cover::{
    AssetKind, Collaborators, CoverError, CoverEvent, CoverService, CurrencyConfig, CurrencyKind, EngineConfig,
    ErrorKind, TokenStatus,
};
use rust_decimal_macros::dec;
use test_utils::{
    assert_kind, assert_token_events, eth_only_config, CoverQuoteBuilder, CurrencyFixtures, HolderFixtures,
    MoneyFixtures, TestEngine,
};

fn collaborators() -> Collaborators {
    Collaborators {
        assessment: Arc::new(FakeAssessment::new()),
        settlement: Arc::new(InMemoryVault::new()),
        legacy: Arc::new(InMemoryLegacyLedger::new()),
        bridge_id: HolderFixtures::bridge(),
    }
}

fn dai_config() -> CurrencyConfig {
    CurrencyConfig {
        symbol: "DAI".to_string(),
        kind: CurrencyKind::Token,
        contract: Some("0x6b17".to_string()),
        decimals: 18,
    }
}

#[test]
fn test_from_config_registers_in_order() {
    let config = eth_only_config().with_currency(dai_config());

    let service = CoverService::from_config(&config, collaborators()).unwrap();

    let symbols: Vec<_> = service.currencies().iter().map(|c| c.symbol.as_str().to_string()).collect();
    assert_eq!(symbols, vec!["ETH", "DAI"]);
    assert_eq!(service.currencies()[0].asset.kind, AssetKind::Native);
    assert_eq!(service.admin(), HolderFixtures::admin());
    assert!(!service.is_swap_active());
    assert!(service.events().is_empty());
}

#[test]
fn test_from_config_rejects_duplicate_symbol() {
    let config = eth_only_config().with_currency(dai_config()).with_currency(dai_config());

    let result = CoverService::from_config(&config, collaborators());

    assert!(matches!(result, Err(CoverError::Configuration(_))));
}

#[test]
fn test_from_config_can_start_with_swap_active() {
    let mut config = eth_only_config();
    config.swap_active = true;

    let service = CoverService::from_config(&config, collaborators()).unwrap();

    assert!(service.is_swap_active());
}

#[test]
fn test_from_toml_config() {
    let toml = r#"
        admin = "0190a5e4-8d1c-7c3e-b1a3-5f2b8f4c9d10"
        swap_active = true

        [[currencies]]
        symbol = "ETH"
        kind = "native"
        decimals = 18
    "#;

    let config = EngineConfig::from_toml_str(toml).unwrap();
    let service = CoverService::from_config(&config, collaborators()).unwrap();

    assert_eq!(service.admin(), HolderFixtures::admin());
    assert!(service.is_swap_active());
    assert_eq!(service.currencies().len(), 1);
}

#[test]
fn test_from_env_config() {
    std::env::set_var("COVER_ADMIN", "0190a5e4-8d1c-7c3e-b1a3-5f2b8f4c9d10");
    std::env::set_var("COVER_SWAP_ACTIVE", "true");

    let config = EngineConfig::from_env().unwrap();

    std::env::remove_var("COVER_ADMIN");
    std::env::remove_var("COVER_SWAP_ACTIVE");
    assert_eq!(config.admin, HolderFixtures::admin());
    assert!(config.swap_active);
    assert!(config.currencies.is_empty());
}

#[test]
fn test_only_admin_adds_currency() {
    let mut engine = TestEngine::new();

    let result = engine
        .service
        .add_currency(HolderFixtures::alice(), CurrencyFixtures::dai(), CurrencyFixtures::dai_asset());

    assert_kind(result, ErrorKind::Unauthorized);
    assert_eq!(engine.service.currencies().len(), 1);
}

#[test]
fn test_currency_symbol_is_never_replaced() {
    let mut engine = TestEngine::new();

    let result = engine
        .service
        .add_currency(HolderFixtures::admin(), CurrencyFixtures::eth(), CurrencyFixtures::dai_asset());

    assert!(matches!(result, Err(CoverError::CurrencyAlreadyRegistered(_))));
    assert_eq!(engine.service.currencies()[0].asset, CurrencyFixtures::eth_asset());
}

#[test]
fn test_only_admin_activates_swap() {
    let mut engine = TestEngine::new();

    assert_kind(engine.service.activate_swap(HolderFixtures::bob()), ErrorKind::Unauthorized);
    assert!(!engine.service.is_swap_active());

    engine.service.activate_swap(HolderFixtures::admin()).unwrap();
    engine.service.activate_swap(HolderFixtures::admin()).unwrap();

    assert!(engine.service.is_swap_active());
    let activations = engine
        .service
        .events()
        .iter()
        .filter(|e| matches!(e, CoverEvent::SwapActivated { .. }))
        .count();
    assert_eq!(activations, 1);
}

#[test]
fn test_admin_transfer() {
    let mut engine = TestEngine::new();
    let successor = HolderId::new();

    engine.service.transfer_admin(HolderFixtures::admin(), successor).unwrap();

    assert_eq!(engine.service.admin(), successor);
    assert_kind(engine.service.activate_swap(HolderFixtures::admin()), ErrorKind::Unauthorized);
    engine.service.activate_swap(successor).unwrap();
}

#[tokio::test]
async fn test_buy_cover_mints_active_token() {
    let mut engine = TestEngine::new();
    let alice = HolderFixtures::alice();

    let token = engine.issue_cover(alice, 12).await;

    let view = engine.service.get_token(token).unwrap();
    assert_eq!(token, TokenId::new(1));
    assert_eq!(view.cover_id, CoverId::new(12));
    assert_eq!(view.status, TokenStatus::Active);
    assert_eq!(view.claim_id, None);
    assert_eq!(engine.service.get_cover(CoverId::new(12)).unwrap().purchaser, alice);
    assert_eq!(engine.vault.collections().await[0].amount, MoneyFixtures::eth_premium());
    assert_token_events(&engine.service, token, &["CoverIssued"]);
}

#[tokio::test]
async fn test_buy_cover_in_unknown_currency() {
    let mut engine = TestEngine::new();
    let quote = CoverQuoteBuilder::dai(1).build();

    let result = engine
        .service
        .buy_cover(HolderFixtures::alice(), quote, MoneyFixtures::dai_premium())
        .await;

    assert_kind(result, ErrorKind::UnknownCurrency);
    assert!(engine.vault.collections().await.is_empty());
}

#[tokio::test]
async fn test_buy_cover_with_wrong_payment() {
    let mut engine = TestEngine::new();
    let quote = CoverQuoteBuilder::new(1).build();
    let underpaid = core_kernel::Money::new(dec!(0.01), CurrencyFixtures::eth());

    let result = engine.service.buy_cover(HolderFixtures::alice(), quote, underpaid).await;

    assert!(matches!(result, Err(CoverError::PaymentMismatch { .. })));
    assert_eq!(engine.service.total_supply(), 0);
}

#[tokio::test]
async fn test_cover_backs_one_token() {
    let mut engine = TestEngine::new();
    let alice = HolderFixtures::alice();
    engine.issue_cover(alice, 1).await;

    let quote = CoverQuoteBuilder::new(1).build();
    let premium = quote.premium;
    let result = engine.service.buy_cover(alice, quote, premium).await;

    assert!(matches!(result, Err(CoverError::CoverAlreadyIssued(_))));
    assert_eq!(engine.vault.collections().await.len(), 1);
}

#[tokio::test]
async fn test_enumeration_follows_acquisition_order() {
    let mut engine = TestEngine::new();
    let alice = HolderFixtures::alice();
    let bob = HolderFixtures::bob();
    let a1 = engine.issue_cover(alice, 1).await;
    let b1 = engine.issue_cover(bob, 2).await;
    let a2 = engine.issue_cover(alice, 3).await;

    engine.service.transfer_token(bob, b1, alice).unwrap();

    assert_eq!(engine.service.balance_of(alice), 3);
    assert_eq!(engine.service.balance_of(bob), 0);
    assert_eq!(engine.service.tokens_of_owner(alice), &[a1, a2, b1]);
    assert_eq!(engine.service.token_of_owner_by_index(alice, 2), Some(b1));
    assert_eq!(engine.service.total_supply(), 3);
}

#[tokio::test]
async fn test_transfer_by_non_owner_rejected() {
    let mut engine = TestEngine::new();
    let token = engine.issue_cover(HolderFixtures::alice(), 1).await;

    let result = engine
        .service
        .transfer_token(HolderFixtures::bob(), token, HolderFixtures::bob());

    assert_kind(result, ErrorKind::Unauthorized);
    assert_eq!(engine.service.owner_of(token).unwrap(), HolderFixtures::alice());
}

#[tokio::test]
async fn test_sum_insured_must_fit_asset_units() {
    let mut engine = TestEngine::new();
    engine
        .service
        .add_currency(HolderFixtures::admin(), CurrencyFixtures::usdc(), CurrencyFixtures::usdc_asset())
        .unwrap();
    let usdc = CurrencyFixtures::usdc();
    let quote = CoverQuoteBuilder::new(1)
        .with_sum_insured(core_kernel::Money::new(dec!(1.0000001), usdc))
        .with_premium(core_kernel::Money::new(dec!(0.05), usdc))
        .build();
    let premium = quote.premium;

    let result = engine.service.buy_cover(HolderFixtures::alice(), quote, premium).await;

    assert!(matches!(result, Err(CoverError::Core(_))));
    assert_eq!(engine.service.total_supply(), 0);
    assert!(engine.vault.collections().await.is_empty());
}

#[tokio::test]
async fn test_premium_must_fit_asset_units() {
    let mut engine = TestEngine::new();
    engine
        .service
        .add_currency(HolderFixtures::admin(), CurrencyFixtures::usdc(), CurrencyFixtures::usdc_asset())
        .unwrap();
    let usdc = CurrencyFixtures::usdc();
    let quote = CoverQuoteBuilder::new(1)
        .with_sum_insured(core_kernel::Money::new(dec!(500), usdc))
        .with_premium(core_kernel::Money::new(dec!(0.0000001), usdc))
        .build();
    let premium = quote.premium;

    let result = engine.service.buy_cover(HolderFixtures::alice(), quote, premium).await;

    assert_kind(result, ErrorKind::Invalid);
    assert!(engine.vault.collections().await.is_empty());
}

#[tokio::test]
async fn test_transfer_to_self_records_nothing() {
    let mut engine = TestEngine::new();
    let alice = HolderFixtures::alice();
    let token = engine.issue_cover(alice, 1).await;

    engine.service.transfer_token(alice, token, alice).unwrap();

    assert_eq!(engine.service.tokens_of_owner(alice), &[token]);
    assert_token_events(&engine.service, token, &["CoverIssued"]);
}
