//! Cover Token Domain
//!
//! This crate implements tokenized insurance cover: each purchased cover is a
//! non-fungible token whose claim lifecycle is tracked here and whose payout
//! settles in the currency the cover was bought in. Holders of tokens from
//! the previous token implementation can swap them for new ones.
//!
//! # Claim Lifecycle
//!
//! ```text
//! Active -> ClaimSubmitted -> Accepted -> Redeemed
//!                 |  ^
//!                 v  |
//!                Denied
//! ```
//!
//! # Collaborators
//!
//! Claim assessment, the settlement vault and the legacy token ledger are
//! reached through the port traits in [`ports`]. Enable the `mock` feature
//! for in-memory implementations.

pub mod admin;
pub mod claims;
pub mod config;
pub mod cover;
pub mod currency;
pub mod error;
pub mod events;
pub mod ledger;
pub mod migration;
pub mod ports;
pub mod service;
pub mod settlement;
pub mod token;

pub use admin::{AdminCap, AdminGate};
pub use claims::{ClaimCoordinator, Resolution, SubmittedClaim};
pub use config::{CurrencyConfig, CurrencyKind, EngineConfig};
pub use cover::{CoverBook, CoverQuote, CoverRecord};
pub use currency::{AssetHandle, AssetKind, CurrencyEntry, CurrencyRegistry};
pub use error::{CoverError, ErrorKind};
pub use events::{CoverEvent, EventJournal};
pub use ledger::CoverLedger;
pub use migration::{MigrationBridge, SwapReceipt};
pub use ports::{
    AssessmentPort, LegacyCover, LegacyCoverPort, LegacyCoverToken, PayoutReceipt, PayoutRequest,
    PremiumCollection, SettlementPort, Verdict,
};
pub use service::{Collaborators, CoverService};
pub use settlement::RedemptionSettlement;
pub use token::{CoverToken, TokenStatus, TokenView};
