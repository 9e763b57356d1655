//! Cover token ownership ledger
//!
//! The ledger is the single source of truth for who holds which token. It
//! provides the standard ownership, transfer and enumeration primitives; the
//! claim and redemption components only touch a token's status and claim
//! reference through it.
//!
//! # Invariants
//!
//! - Token ids are assigned sequentially from 1 and never reused
//! - Every token has exactly one owner
//! - Tokens are never burned; a redeemed token stays as a receipt
//! - Per-owner enumeration follows acquisition order

use std::collections::{BTreeMap, HashMap};

use core_kernel::{HolderId, TokenId};

use crate::error::CoverError;
use crate::token::{CoverToken, TokenSeed};

#[derive(Debug)]
struct Entry {
    owner: HolderId,
    token: CoverToken,
}

/// Ownership and enumeration substrate for cover tokens
#[derive(Debug)]
pub struct CoverLedger {
    entries: BTreeMap<TokenId, Entry>,
    holdings: HashMap<HolderId, Vec<TokenId>>,
    next_id: TokenId,
}

impl Default for CoverLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverLedger {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            holdings: HashMap::new(),
            next_id: TokenId::new(1),
        }
    }

    /// Id the next minted token will receive
    pub fn peek_next_id(&self) -> TokenId {
        self.next_id
    }

    /// Mints a token to `owner`, building it from the assigned id
    pub(crate) fn mint_with(
        &mut self,
        owner: HolderId,
        build: impl FnOnce(TokenId) -> CoverToken,
    ) -> TokenId {
        let id = self.next_id;
        self.next_id = id.next();

        self.entries.insert(id, Entry { owner, token: build(id) });
        self.holdings.entry(owner).or_default().push(id);
        id
    }

    /// Mints a token carrying over existing claim state
    pub(crate) fn mint_restored(&mut self, owner: HolderId, seed: TokenSeed) -> TokenId {
        self.mint_with(owner, |id| CoverToken::restored(id, seed))
    }

    /// Gets a token by id
    pub fn get(&self, id: TokenId) -> Result<&CoverToken, CoverError> {
        self.entries
            .get(&id)
            .map(|e| &e.token)
            .ok_or(CoverError::TokenNotFound(id))
    }

    pub(crate) fn get_mut(&mut self, id: TokenId) -> Result<&mut CoverToken, CoverError> {
        self.entries
            .get_mut(&id)
            .map(|e| &mut e.token)
            .ok_or(CoverError::TokenNotFound(id))
    }

    /// Returns the holder of a token
    pub fn owner_of(&self, id: TokenId) -> Result<HolderId, CoverError> {
        self.entries
            .get(&id)
            .map(|e| e.owner)
            .ok_or(CoverError::TokenNotFound(id))
    }

    /// Returns the token if `caller` holds it
    pub fn owned_by(&self, id: TokenId, caller: HolderId, action: &'static str) -> Result<&CoverToken, CoverError> {
        let entry = self.entries.get(&id).ok_or(CoverError::TokenNotFound(id))?;
        if entry.owner != caller {
            return Err(CoverError::unauthorized(caller, action));
        }
        Ok(&entry.token)
    }

    /// Moves a token to a new holder
    ///
    /// Status and claim reference travel with the token. Returns false if
    /// `to` already holds it.
    pub fn transfer(&mut self, id: TokenId, caller: HolderId, to: HolderId) -> Result<bool, CoverError> {
        self.owned_by(id, caller, "transfer token")?;
        if caller == to {
            return Ok(false);
        }

        if let Some(held) = self.holdings.get_mut(&caller) {
            held.retain(|t| *t != id);
            if held.is_empty() {
                self.holdings.remove(&caller);
            }
        }
        self.holdings.entry(to).or_default().push(id);
        if let Some(entry) = self.entries.get_mut(&id) {
            entry.owner = to;
        }
        Ok(true)
    }

    /// Number of tokens held by `owner`
    pub fn balance_of(&self, owner: HolderId) -> usize {
        self.holdings.get(&owner).map_or(0, Vec::len)
    }

    /// The `index`-th token held by `owner`, in acquisition order
    pub fn token_of_owner_by_index(&self, owner: HolderId, index: usize) -> Option<TokenId> {
        self.holdings.get(&owner).and_then(|held| held.get(index).copied())
    }

    /// All tokens held by `owner`, in acquisition order
    pub fn tokens_of_owner(&self, owner: HolderId) -> &[TokenId] {
        self.holdings.get(&owner).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of tokens ever minted
    pub fn total_supply(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over all tokens in id order
    pub fn iter(&self) -> impl Iterator<Item = &CoverToken> {
        self.entries.values().map(|e| &e.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{CoverId, CurrencyCode};

    fn mint(ledger: &mut CoverLedger, owner: HolderId, cover: u64) -> TokenId {
        let currency = CurrencyCode::new("ETH").unwrap();
        ledger.mint_with(owner, |id| CoverToken::issued(id, CoverId::new(cover), currency))
    }

    #[test]
    fn test_sequential_ids() {
        let mut ledger = CoverLedger::new();
        let holder = HolderId::new();

        assert_eq!(mint(&mut ledger, holder, 1), TokenId::new(1));
        assert_eq!(mint(&mut ledger, holder, 2), TokenId::new(2));
        assert_eq!(ledger.peek_next_id(), TokenId::new(3));
        assert_eq!(ledger.total_supply(), 2);
    }

    #[test]
    fn test_enumeration_by_owner() {
        let mut ledger = CoverLedger::new();
        let alice = HolderId::new();
        let bob = HolderId::new();

        let a1 = mint(&mut ledger, alice, 1);
        let _b1 = mint(&mut ledger, bob, 2);
        let a2 = mint(&mut ledger, alice, 3);

        assert_eq!(ledger.balance_of(alice), 2);
        assert_eq!(ledger.tokens_of_owner(alice), &[a1, a2]);
        assert_eq!(ledger.token_of_owner_by_index(alice, 1), Some(a2));
        assert_eq!(ledger.token_of_owner_by_index(alice, 2), None);
    }

    #[test]
    fn test_transfer_moves_ownership() {
        let mut ledger = CoverLedger::new();
        let alice = HolderId::new();
        let bob = HolderId::new();
        let t = mint(&mut ledger, alice, 1);

        assert!(ledger.transfer(t, alice, bob).unwrap());

        assert_eq!(ledger.owner_of(t).unwrap(), bob);
        assert_eq!(ledger.balance_of(alice), 0);
        assert_eq!(ledger.tokens_of_owner(bob), &[t]);
    }

    #[test]
    fn test_transfer_by_non_owner_rejected() {
        let mut ledger = CoverLedger::new();
        let alice = HolderId::new();
        let mallory = HolderId::new();
        let t = mint(&mut ledger, alice, 1);

        let result = ledger.transfer(t, mallory, mallory);
        assert!(matches!(result, Err(CoverError::Unauthorized { .. })));
        assert_eq!(ledger.owner_of(t).unwrap(), alice);
    }

    #[test]
    fn test_transfer_to_self_changes_nothing() {
        let mut ledger = CoverLedger::new();
        let alice = HolderId::new();
        let t = mint(&mut ledger, alice, 1);

        assert!(!ledger.transfer(t, alice, alice).unwrap());
        assert_eq!(ledger.tokens_of_owner(alice), &[t]);
    }

    #[test]
    fn test_unknown_token() {
        let ledger = CoverLedger::new();
        assert!(matches!(ledger.get(TokenId::new(1)), Err(CoverError::TokenNotFound(_))));
        assert!(ledger.owner_of(TokenId::new(1)).is_err());
    }
}
