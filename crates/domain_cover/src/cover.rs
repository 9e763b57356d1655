//! Priced cover records
//!
//! Cover records are produced by the pricing collaborator and consumed
//! read-only. The book maps each cover id to its record and to the token
//! backing it; one cover backs at most one token.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use core_kernel::{CoreError, CoverId, CoverPeriod, CurrencyCode, HolderId, Money, TokenId};

use crate::error::CoverError;

/// A priced cover as quoted by the pricing collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverQuote {
    /// Cover record id assigned by the pricing collaborator
    pub cover_id: CoverId,
    /// Fixed amount paid out on an accepted claim
    pub sum_insured: Money,
    /// Premium due to buy the cover
    pub premium: Money,
    /// When the cover is in force
    pub period: CoverPeriod,
}

impl CoverQuote {
    /// Currency the cover is denominated in
    pub fn currency(&self) -> CurrencyCode {
        self.sum_insured.currency()
    }

    /// Validates internal consistency of the quote
    pub fn validate(&self) -> Result<(), CoverError> {
        if self.premium.currency() != self.sum_insured.currency() {
            return Err(CoverError::PaymentMismatch {
                expected: format!("premium in {}", self.sum_insured.currency()),
                actual: self.premium.to_string(),
            });
        }
        if !self.sum_insured.is_positive() || self.premium.is_negative() {
            return Err(CoverError::Core(CoreError::out_of_range(
                self.cover_id,
                "sum insured must be positive and premium non-negative",
            )));
        }
        Ok(())
    }
}

/// Recorded terms of a cover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverRecord {
    pub cover_id: CoverId,
    /// Holder who bought the cover (or migrated it)
    pub purchaser: HolderId,
    pub sum_insured: Money,
    pub period: CoverPeriod,
}

impl CoverRecord {
    pub fn currency(&self) -> CurrencyCode {
        self.sum_insured.currency()
    }

    /// Returns true if currency and payout terms are identical
    pub fn same_terms(&self, other: &CoverRecord) -> bool {
        self.sum_insured == other.sum_insured && self.period == other.period
    }
}

/// Cover records keyed by cover id
#[derive(Debug, Default)]
pub struct CoverBook {
    records: HashMap<CoverId, CoverRecord>,
    backing: HashMap<CoverId, TokenId>,
}

impl CoverBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a cover record by id
    pub fn get(&self, cover_id: CoverId) -> Result<&CoverRecord, CoverError> {
        self.records
            .get(&cover_id)
            .ok_or(CoverError::CoverNotFound(cover_id))
    }

    /// Returns the token backed by a cover, if any
    pub fn token_for(&self, cover_id: CoverId) -> Option<TokenId> {
        self.backing.get(&cover_id).copied()
    }

    /// Checks that `record` can be attached to a new token
    ///
    /// An existing record with different terms is a conflict; an existing
    /// record with identical terms means the cover is already tokenized.
    pub fn ensure_insertable(&self, record: &CoverRecord) -> Result<(), CoverError> {
        match self.records.get(&record.cover_id) {
            Some(existing) if !existing.same_terms(record) => {
                Err(CoverError::CoverTermsMismatch(record.cover_id))
            }
            Some(_) => Err(CoverError::CoverAlreadyIssued(record.cover_id)),
            None => Ok(()),
        }
    }

    /// Stores a record validated by `ensure_insertable`
    pub(crate) fn attach(&mut self, record: CoverRecord, token_id: TokenId) {
        self.backing.insert(record.cover_id, token_id);
        self.records.insert(record.cover_id, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
