//! Money types with precise decimal arithmetic
//!
//! Settlement currencies are open-ended: new symbols are registered at runtime
//! (ETH, DAI, ...), so a currency is a short validated symbol rather than a
//! closed enum. Amounts use rust_decimal so a sum insured is paid out exactly,
//! without floating-point drift.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum length of a currency symbol in bytes
pub const MAX_SYMBOL_LEN: usize = 8;

/// Largest number of decimal places an amount can carry
pub const MAX_DECIMALS: u32 = 28;

/// Errors that can occur during money operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Currency mismatch: cannot operate on {0} and {1}")]
    CurrencyMismatch(String, String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid currency symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Overflow during calculation")]
    Overflow,
}

/// A settlement currency symbol such as `ETH` or `DAI`
///
/// Symbols are 1 to 8 uppercase ASCII letters or digits. The value is stored
/// inline so `CurrencyCode` (and therefore [`Money`]) stays `Copy`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode {
    bytes: [u8; MAX_SYMBOL_LEN],
    len: u8,
}

impl CurrencyCode {
    /// Parses and validates a currency symbol
    pub fn new(symbol: &str) -> Result<Self, MoneyError> {
        let raw = symbol.as_bytes();
        let valid = !raw.is_empty()
            && raw.len() <= MAX_SYMBOL_LEN
            && raw.iter().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if !valid {
            return Err(MoneyError::InvalidSymbol(symbol.to_string()));
        }

        let mut bytes = [0u8; MAX_SYMBOL_LEN];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self {
            bytes,
            len: raw.len() as u8,
        })
    }

    /// Returns the symbol as a string slice
    pub fn as_str(&self) -> &str {
        // Only ASCII is ever stored
        std::str::from_utf8(&self.bytes[..self.len as usize]).unwrap_or("")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = MoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = MoneyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> String {
        code.as_str().to_string()
    }
}

/// A monetary amount with associated currency
///
/// Amounts are kept at full precision; callers that settle in base units
/// convert with [`Money::to_minor`] using the asset's decimals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    amount: Decimal,
    currency: CurrencyCode,
}

impl Money {
    /// Creates a new Money value
    pub fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self {
            amount: amount.normalize(),
            currency,
        }
    }

    /// Creates Money from an integer amount in base units (e.g. wei with 18 decimals)
    pub fn from_minor(minor_units: i128, decimals: u32, currency: CurrencyCode) -> Result<Self, MoneyError> {
        let amount = Decimal::try_from_i128_with_scale(minor_units, decimals)
            .map_err(|_| MoneyError::Overflow)?;
        Ok(Self::new(amount, currency))
    }

    /// Creates a zero amount in the specified currency
    pub fn zero(currency: CurrencyCode) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns the amount
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the currency
    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Returns true if the amount is zero
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is positive
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount is negative
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Converts to base units for an asset with the given decimals
    ///
    /// Fails if the amount is negative or carries more precision than the
    /// asset can represent; settlement never rounds.
    pub fn to_minor(&self, decimals: u32) -> Result<u128, MoneyError> {
        if self.is_negative() {
            return Err(MoneyError::InvalidAmount(format!("negative amount {}", self.amount)));
        }
        if decimals > MAX_DECIMALS {
            return Err(MoneyError::InvalidAmount(format!("unsupported decimals {}", decimals)));
        }
        if self.amount.scale() > decimals {
            return Err(MoneyError::InvalidAmount(format!(
                "{} has more than {} decimal places",
                self.amount, decimals
            )));
        }
        let factor = 10_i128.pow(decimals - self.amount.scale());
        let minor = self.amount.mantissa().checked_mul(factor).ok_or(MoneyError::Overflow)?;
        u128::try_from(minor).map_err(|_| MoneyError::Overflow)
    }

    /// Checked addition that returns an error on currency mismatch
    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let sum = self.amount.checked_add(other.amount).ok_or(MoneyError::Overflow)?;
        Ok(Self::new(sum, self.currency))
    }

    /// Checked subtraction that returns an error on currency mismatch
    pub fn checked_sub(&self, other: &Money) -> Result<Money, MoneyError> {
        self.ensure_same_currency(other)?;
        let diff = self.amount.checked_sub(other.amount).ok_or(MoneyError::Overflow)?;
        Ok(Self::new(diff, self.currency))
    }

    fn ensure_same_currency(&self, other: &Money) -> Result<(), MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.to_string(),
                other.currency.to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}
