//! Settlement currency registry
//!
//! Maps a currency symbol to the asset used to collect premiums and pay out
//! claims. The registry is append-only: redeemable tokens reference their
//! currency by symbol, so an entry can never be removed or replaced.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use core_kernel::CurrencyCode;

use crate::admin::AdminCap;
use crate::error::CoverError;

/// How a settlement asset is held
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AssetKind {
    /// The host chain's native asset
    Native,
    /// A fungible token at the given contract address
    Token { contract: String },
}

/// Handle to a settlement asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetHandle {
    pub kind: AssetKind,
    /// Number of decimals of the asset's base unit
    pub decimals: u32,
}

impl AssetHandle {
    pub fn native(decimals: u32) -> Self {
        Self {
            kind: AssetKind::Native,
            decimals,
        }
    }

    pub fn token(contract: impl Into<String>, decimals: u32) -> Self {
        Self {
            kind: AssetKind::Token {
                contract: contract.into(),
            },
            decimals,
        }
    }

    fn validate(&self) -> Result<(), CoverError> {
        if self.decimals > core_kernel::money::MAX_DECIMALS {
            return Err(CoverError::InvalidCurrency(format!(
                "{} decimals exceeds the supported maximum",
                self.decimals
            )));
        }
        if let AssetKind::Token { contract } = &self.kind {
            if contract.trim().is_empty() {
                return Err(CoverError::InvalidCurrency(
                    "token asset requires a contract address".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// A registered currency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyEntry {
    pub symbol: CurrencyCode,
    pub asset: AssetHandle,
}

/// Append-only currency symbol to asset registry
#[derive(Debug, Default)]
pub struct CurrencyRegistry {
    entries: Vec<CurrencyEntry>,
    index: HashMap<CurrencyCode, usize>,
}

impl CurrencyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new currency
    ///
    /// # Errors
    ///
    /// - `CurrencyAlreadyRegistered` if the symbol is in use
    /// - `InvalidCurrency` if the asset handle is malformed
    pub fn add_currency(
        &mut self,
        _cap: &AdminCap,
        symbol: CurrencyCode,
        asset: AssetHandle,
    ) -> Result<(), CoverError> {
        if self.index.contains_key(&symbol) {
            return Err(CoverError::CurrencyAlreadyRegistered(symbol));
        }
        asset.validate()?;

        self.index.insert(symbol, self.entries.len());
        self.entries.push(CurrencyEntry { symbol, asset });
        Ok(())
    }

    /// Resolves the settlement asset for a currency
    pub fn resolve(&self, symbol: CurrencyCode) -> Result<&AssetHandle, CoverError> {
        self.index
            .get(&symbol)
            .map(|&i| &self.entries[i].asset)
            .ok_or(CoverError::UnknownCurrency(symbol))
    }

    pub fn contains(&self, symbol: CurrencyCode) -> bool {
        self.index.contains_key(&symbol)
    }

    /// All registered currencies in registration order
    pub fn entries(&self) -> &[CurrencyEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
