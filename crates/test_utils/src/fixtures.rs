//! Pre-built Test Fixtures
//!
//! Provides ready-to-use test data for the cover token engine. These fixtures
//! are consistent and predictable so tests can compare against them.

use chrono::{DateTime, TimeZone, Utc};
use core_kernel::{CoverPeriod, CurrencyCode, HolderId, Money};
use domain_cover::AssetHandle;
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Fixture for currency symbols and their settlement assets
pub struct CurrencyFixtures;

impl CurrencyFixtures {
    pub fn eth() -> CurrencyCode {
        CurrencyCode::new("ETH").expect("valid symbol")
    }

    pub fn dai() -> CurrencyCode {
        CurrencyCode::new("DAI").expect("valid symbol")
    }

    /// A six-decimal stablecoin
    pub fn usdc() -> CurrencyCode {
        CurrencyCode::new("USDC").expect("valid symbol")
    }

    pub fn eth_asset() -> AssetHandle {
        AssetHandle::native(18)
    }

    pub fn dai_asset() -> AssetHandle {
        AssetHandle::token("0x6b175474e89094c44da98b954eedeac495271d0f", 18)
    }

    pub fn usdc_asset() -> AssetHandle {
        AssetHandle::token("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48", 6)
    }
}

/// Fixture for Money test data
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// One ether, the standard sum insured
    pub fn eth_1() -> Money {
        Money::new(dec!(1), CurrencyFixtures::eth())
    }

    /// Standard ether premium
    pub fn eth_premium() -> Money {
        Money::new(dec!(0.026), CurrencyFixtures::eth())
    }

    /// Liquidity large enough for any test payout in ether
    pub fn eth_pool() -> Money {
        Money::new(dec!(1000), CurrencyFixtures::eth())
    }

    pub fn dai_1000() -> Money {
        Money::new(dec!(1000), CurrencyFixtures::dai())
    }

    pub fn dai_premium() -> Money {
        Money::new(dec!(26), CurrencyFixtures::dai())
    }

    pub fn dai_pool() -> Money {
        Money::new(dec!(1000000), CurrencyFixtures::dai())
    }
}

/// Fixture for cover periods
pub struct PeriodFixtures;

impl PeriodFixtures {
    /// Standard cover start (Jan 1, 2024)
    pub fn cover_start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    /// A 90-day cover from the standard start
    pub fn ninety_days() -> CoverPeriod {
        CoverPeriod::days_from(Self::cover_start(), 90).expect("valid period")
    }

    /// A one-year cover from the standard start
    pub fn one_year() -> CoverPeriod {
        CoverPeriod::days_from(Self::cover_start(), 365).expect("valid period")
    }
}

/// Fixture for holder identities
pub struct HolderFixtures;

impl HolderFixtures {
    /// Deterministic admin identity
    pub fn admin() -> HolderId {
        HolderId::from_uuid(Uuid::from_u128(0x0190a5e4_8d1c_7c3e_b1a3_5f2b8f4c9d10))
    }

    /// Deterministic bridge identity on the legacy ledger
    pub fn bridge() -> HolderId {
        HolderId::from_uuid(Uuid::from_u128(0x0190a5e4_8d1c_7c3e_b1a3_5f2b8f4c9d11))
    }

    pub fn alice() -> HolderId {
        HolderId::from_uuid(Uuid::from_u128(0xa11ce))
    }

    pub fn bob() -> HolderId {
        HolderId::from_uuid(Uuid::from_u128(0xb0b))
    }

    /// A random holder with no tokens
    pub fn stranger() -> HolderId {
        HolderId::new()
    }
}
