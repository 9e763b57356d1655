//! Core Kernel - Foundational types for the cover token system
//!
//! This crate provides the building blocks shared by the domain crates:
//! - Money and currency symbols with precise decimal arithmetic
//! - Cover periods
//! - Strongly-typed identifiers for tokens, covers, claims and holders
//! - Port infrastructure for external collaborators

pub mod money;
pub mod temporal;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, CurrencyCode, MoneyError};
pub use temporal::{CoverPeriod, TemporalError};
pub use identifiers::{
    TokenId, LegacyTokenId, CoverId, ClaimId, HolderId, PayoutId,
};
pub use ports::{PortError, DomainPort};
pub use error::CoreError;
