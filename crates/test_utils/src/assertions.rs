//! Custom Test Assertions
//!
//! Provides specialized assertion helpers for domain types that give
//! more meaningful error messages than standard assertions.

use std::fmt::Debug;

use core_kernel::{Money, TokenId};
use domain_cover::{CoverError, CoverEvent, CoverService, ErrorKind, TokenStatus};

/// Asserts that a token has the expected status
///
/// # Panics
///
/// Panics if the token does not exist or its status differs
pub fn assert_status(service: &CoverService, token_id: TokenId, expected: TokenStatus) {
    let view = service
        .get_token(token_id)
        .unwrap_or_else(|e| panic!("Token {} not found: {}", token_id, e));
    assert_eq!(
        view.status, expected,
        "Token {} has status {}, expected {}",
        token_id, view.status, expected
    );
}

/// Asserts that a result is an error of the expected kind
///
/// Returns the error for further inspection.
pub fn assert_kind<T: Debug>(result: Result<T, CoverError>, expected: ErrorKind) -> CoverError {
    match result {
        Ok(value) => panic!("Expected {:?} error, got Ok({:?})", expected, value),
        Err(e) => {
            assert_eq!(e.kind(), expected, "Expected {:?} error, got {:?}", expected, e);
            e
        }
    }
}

/// Asserts that two Money values are exactly equal, currency included
pub fn assert_money_eq(actual: &Money, expected: &Money) {
    assert_eq!(
        actual.currency(),
        expected.currency(),
        "Currency mismatch: actual={}, expected={}",
        actual,
        expected
    );
    assert_eq!(
        actual.amount(),
        expected.amount(),
        "Amount mismatch: actual={}, expected={}",
        actual,
        expected
    );
}

/// Asserts the event types recorded for a token, oldest first
pub fn assert_token_events(service: &CoverService, token_id: TokenId, expected: &[&str]) {
    let actual: Vec<&str> = service
        .journal()
        .for_token(token_id)
        .map(CoverEvent::event_type)
        .collect();
    assert_eq!(actual, expected, "Unexpected events for token {}", token_id);
}
