//! Claim submission, verdict polling and redemption through the engine

use core_kernel::{ClaimId, TokenId};
use domain_cover::{CoverError, CoverEvent, ErrorKind, TokenStatus, Verdict};
use test_utils::{assert_kind, assert_status, HolderFixtures, MoneyFixtures, TestEngine};

#[tokio::test]
async fn test_only_owner_may_submit() {
    let mut engine = TestEngine::funded().await;
    let token = engine.issue_cover(HolderFixtures::alice(), 1).await;

    let result = engine.service.submit_claim(HolderFixtures::bob(), token).await;

    assert_kind(result, ErrorKind::Unauthorized);
    assert_status(&engine.service, token, TokenStatus::Active);
    assert_eq!(engine.assessment.claims_opened().await, 0);
}

#[tokio::test]
async fn test_pending_claim_blocks_resubmission() {
    let mut engine = TestEngine::funded().await;
    let alice = HolderFixtures::alice();
    let token = engine.issue_cover(alice, 1).await;
    let claim_id = engine.service.submit_claim(alice, token).await.unwrap();

    let result = engine.service.submit_claim(alice, token).await;

    assert!(matches!(result, Err(CoverError::AlreadyPending(_))));
    assert_eq!(engine.service.get_token(token).unwrap().claim_id, Some(claim_id));
    assert_eq!(engine.assessment.claims_opened().await, 1);
}

#[tokio::test]
async fn test_accepted_token_cannot_be_resubmitted() {
    let mut engine = TestEngine::funded().await;
    let alice = HolderFixtures::alice();
    let token = engine.accepted_token(alice, 1).await;

    let err = assert_kind(engine.service.submit_claim(alice, token).await, ErrorKind::InvalidStateTransition);

    assert!(matches!(err, CoverError::InvalidStateTransition { from: TokenStatus::Accepted, .. }));
}

#[tokio::test]
async fn test_redeemed_token_cannot_be_claimed() {
    let mut engine = TestEngine::funded().await;
    let alice = HolderFixtures::alice();
    let token = engine.accepted_token(alice, 1).await;
    engine.service.redeem_claim(alice, token).await.unwrap();

    let result = engine.service.submit_claim(alice, token).await;

    assert!(matches!(result, Err(CoverError::AlreadyRedeemed(_))));
}

#[tokio::test]
async fn test_resolve_is_idempotent_while_pending() {
    let mut engine = TestEngine::funded().await;
    let alice = HolderFixtures::alice();
    let token = engine.issue_cover(alice, 1).await;
    engine.service.submit_claim(alice, token).await.unwrap();
    let events_before = engine.service.events().len();

    for _ in 0..3 {
        let status = engine.service.resolve_verdict(token).await.unwrap();
        assert_eq!(status, TokenStatus::ClaimSubmitted);
    }

    assert_eq!(engine.service.events().len(), events_before);
}

#[tokio::test]
async fn test_resolve_outside_pending_is_noop() {
    let mut engine = TestEngine::funded().await;
    let token = engine.issue_cover(HolderFixtures::alice(), 1).await;

    assert_eq!(engine.service.resolve_verdict(token).await.unwrap(), TokenStatus::Active);
}

#[tokio::test]
async fn test_resolve_unknown_token() {
    let mut engine = TestEngine::new();

    let result = engine.service.resolve_verdict(TokenId::new(99)).await;

    assert!(matches!(result, Err(CoverError::TokenNotFound(_))));
}

#[tokio::test]
async fn test_anyone_may_resolve() {
    let mut engine = TestEngine::funded().await;
    let alice = HolderFixtures::alice();
    let token = engine.issue_cover(alice, 1).await;
    let claim_id = engine.service.submit_claim(alice, token).await.unwrap();
    engine.assessment.decide(claim_id, Verdict::Denied).await;

    // resolve_verdict takes no caller
    let status = engine.service.resolve_verdict(token).await.unwrap();

    assert_eq!(status, TokenStatus::Denied);
    let resolved = engine
        .service
        .events()
        .iter()
        .filter(|e| matches!(e, CoverEvent::ClaimResolved { status: TokenStatus::Denied, .. }))
        .count();
    assert_eq!(resolved, 1);
}

#[tokio::test]
async fn test_stale_claim_id_rejected() {
    let mut engine = TestEngine::funded().await;
    let alice = HolderFixtures::alice();
    let token = engine.issue_cover(alice, 1).await;
    engine.claim_with_verdict(alice, token, Verdict::Denied).await;
    engine.assessment.reuse_claim_ids(true).await;

    let err = assert_kind(engine.service.submit_claim(alice, token).await, ErrorKind::Collaborator);

    assert!(matches!(err, CoverError::StaleClaimId { claim_id, .. } if claim_id == ClaimId::new(1)));
    assert_status(&engine.service, token, TokenStatus::Denied);
}

#[tokio::test]
async fn test_redeem_requires_accepted_claim() {
    let mut engine = TestEngine::funded().await;
    let alice = HolderFixtures::alice();
    let token = engine.issue_cover(alice, 1).await;
    engine.claim_with_verdict(alice, token, Verdict::Denied).await;

    let err = assert_kind(engine.service.redeem_claim(alice, token).await, ErrorKind::InvalidStateTransition);

    assert!(matches!(err, CoverError::NotAccepted { status: TokenStatus::Denied, .. }));
    assert!(engine.vault.payouts().await.is_empty());
}

#[tokio::test]
async fn test_only_owner_may_redeem() {
    let mut engine = TestEngine::funded().await;
    let token = engine.accepted_token(HolderFixtures::alice(), 1).await;

    let result = engine.service.redeem_claim(HolderFixtures::bob(), token).await;

    assert_kind(result, ErrorKind::Unauthorized);
    assert_status(&engine.service, token, TokenStatus::Accepted);
}

#[tokio::test]
async fn test_insufficient_liquidity_rolls_back_and_allows_retry() {
    let mut engine = TestEngine::new();
    let alice = HolderFixtures::alice();
    let token = engine.accepted_token(alice, 1).await;

    let err = assert_kind(engine.service.redeem_claim(alice, token).await, ErrorKind::Collaborator);
    assert!(matches!(err, CoverError::Port(ref e) if e.is_transient()));
    assert_status(&engine.service, token, TokenStatus::Accepted);
    assert!(!engine
        .service
        .events()
        .iter()
        .any(|e| e.event_type() == "ClaimRedeemed"));

    engine.vault.fund(MoneyFixtures::eth_pool()).await;
    engine.service.redeem_claim(alice, token).await.unwrap();

    assert_status(&engine.service, token, TokenStatus::Redeemed);
    assert_eq!(engine.vault.payouts().await.len(), 1);
}

#[tokio::test]
async fn test_transferred_token_claims_for_new_owner() {
    let mut engine = TestEngine::funded().await;
    let alice = HolderFixtures::alice();
    let bob = HolderFixtures::bob();
    let token = engine.issue_cover(alice, 1).await;
    engine.claim_with_verdict(alice, token, Verdict::Accepted).await;

    engine.service.transfer_token(alice, token, bob).unwrap();

    assert_kind(engine.service.redeem_claim(alice, token).await, ErrorKind::Unauthorized);
    let receipt = engine.service.redeem_claim(bob, token).await.unwrap();
    assert_eq!(receipt.recipient, bob);
}
