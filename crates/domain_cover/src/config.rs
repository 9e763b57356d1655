//! Engine configuration
//!
//! Settings are layered with the `config` crate: an optional TOML file first,
//! then `COVER_*` environment variables (nested keys separated by `__`).
//!
//! ```toml
//! admin = "0190a5e4-8d1c-7c3e-b1a3-5f2b8f4c9d10"
//! swap_active = false
//!
//! [[currencies]]
//! symbol = "ETH"
//! kind = "native"
//! decimals = 18
//!
//! [[currencies]]
//! symbol = "DAI"
//! kind = "token"
//! contract = "0x6b175474e89094c44da98b954eedeac495271d0f"
//! decimals = 18
//! ```

use std::path::Path;

use serde::Deserialize;

use core_kernel::{CurrencyCode, HolderId};

use crate::currency::AssetHandle;
use crate::error::CoverError;

/// How a configured currency is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurrencyKind {
    Native,
    Token,
}

/// A settlement currency registered at start-up
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrencyConfig {
    pub symbol: String,
    pub kind: CurrencyKind,
    /// Contract address, required for `token` currencies
    #[serde(default)]
    pub contract: Option<String>,
    pub decimals: u32,
}

impl CurrencyConfig {
    /// Resolves the symbol and asset handle this entry describes
    pub fn to_entry(&self) -> Result<(CurrencyCode, AssetHandle), CoverError> {
        let symbol = CurrencyCode::new(&self.symbol)
            .map_err(|e| CoverError::Configuration(format!("currency {:?}: {}", self.symbol, e)))?;

        let asset = match (self.kind, &self.contract) {
            (CurrencyKind::Native, None) => AssetHandle::native(self.decimals),
            (CurrencyKind::Native, Some(_)) => {
                return Err(CoverError::Configuration(format!(
                    "currency {}: native asset cannot have a contract",
                    symbol
                )))
            }
            (CurrencyKind::Token, Some(contract)) => AssetHandle::token(contract.clone(), self.decimals),
            (CurrencyKind::Token, None) => {
                return Err(CoverError::Configuration(format!(
                    "currency {}: token asset requires a contract",
                    symbol
                )))
            }
        };
        Ok((symbol, asset))
    }
}

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Holder allowed to perform administrative operations
    pub admin: HolderId,
    /// Whether legacy token migration starts switched on
    #[serde(default)]
    pub swap_active: bool,
    /// Currencies registered at start-up, in registration order
    #[serde(default)]
    pub currencies: Vec<CurrencyConfig>,
}

impl EngineConfig {
    /// Creates a configuration with no currencies and migration off
    pub fn new(admin: HolderId) -> Self {
        Self {
            admin,
            swap_active: false,
            currencies: Vec::new(),
        }
    }

    /// Adds a currency entry
    pub fn with_currency(mut self, currency: CurrencyConfig) -> Self {
        self.currencies.push(currency);
        self
    }

    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, CoverError> {
        let settings = config::Config::builder()
            .add_source(Self::environment())
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Parses configuration from a TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self, CoverError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Loads configuration from an optional file overlaid with environment
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoverError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(Self::environment())
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("COVER")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADMIN: &str = "0190a5e4-8d1c-7c3e-b1a3-5f2b8f4c9d10";

    #[test]
    fn test_from_toml() {
        let toml = format!(
            r#"
            admin = "{ADMIN}"

            [[currencies]]
            symbol = "ETH"
            kind = "native"
            decimals = 18

            [[currencies]]
            symbol = "DAI"
            kind = "token"
            contract = "0x6b17"
            decimals = 18
            "#
        );

        let config = EngineConfig::from_toml_str(&toml).unwrap();

        assert_eq!(config.admin.as_uuid().to_string(), ADMIN);
        assert!(!config.swap_active);
        assert_eq!(config.currencies.len(), 2);
        let (symbol, asset) = config.currencies[1].to_entry().unwrap();
        assert_eq!(symbol.as_str(), "DAI");
        assert_eq!(asset, AssetHandle::token("0x6b17", 18));
    }

    #[test]
    fn test_missing_admin_is_error() {
        let result = EngineConfig::from_toml_str("swap_active = true");
        assert!(matches!(result, Err(CoverError::Configuration(_))));
    }

    #[test]
    fn test_token_without_contract() {
        let currency = CurrencyConfig {
            symbol: "USDC".to_string(),
            kind: CurrencyKind::Token,
            contract: None,
            decimals: 6,
        };
        assert!(matches!(currency.to_entry(), Err(CoverError::Configuration(_))));
    }

    #[test]
    fn test_malformed_symbol() {
        let currency = CurrencyConfig {
            symbol: "eth".to_string(),
            kind: CurrencyKind::Native,
            contract: None,
            decimals: 18,
        };
        assert!(matches!(currency.to_entry(), Err(CoverError::Configuration(_))));
    }
}
