//! Tests for identifier newtypes

use std::collections::{BTreeSet, HashSet};

use core_kernel::{ClaimId, CoverId, HolderId, LegacyTokenId, PayoutId, TokenId};

#[test]
fn test_sequential_ids_order_by_value() {
    let ids: BTreeSet<TokenId> = [3, 1, 2].into_iter().map(TokenId::new).collect();
    let ordered: Vec<u64> = ids.into_iter().map(|id| id.value()).collect();

    assert_eq!(ordered, vec![1, 2, 3]);
}

#[test]
fn test_prefixes_distinguish_id_spaces() {
    assert_eq!(TokenId::prefix(), "TKN");
    assert_eq!(LegacyTokenId::prefix(), "LTKN");
    assert_eq!(CoverId::prefix(), "COV");
    assert_eq!(ClaimId::prefix(), "CLM");
    assert_eq!(HolderId::prefix(), "HLD");
    assert_eq!(PayoutId::prefix(), "PAY");
}

#[test]
fn test_legacy_id_round_trips_through_display() {
    let id = LegacyTokenId::new(1200);
    let parsed: LegacyTokenId = id.to_string().parse().unwrap();

    assert_eq!(parsed, id);
}

#[test]
fn test_invalid_sequential_id_rejected() {
    assert!("TKN-abc".parse::<TokenId>().is_err());
    assert!("-1".parse::<ClaimId>().is_err());
}

#[test]
fn test_holder_ids_are_unique() {
    let ids: HashSet<HolderId> = (0..100).map(|_| HolderId::new()).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn test_payout_ids_are_time_ordered() {
    let first = PayoutId::new_v7();
    let second = PayoutId::new_v7();

    assert!(first.as_uuid() <= second.as_uuid());
}

#[test]
fn test_sequential_id_serializes_as_number() {
    let json = serde_json::to_string(&CoverId::new(17)).unwrap();
    assert_eq!(json, "17");

    let back: CoverId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, CoverId::new(17));
}
