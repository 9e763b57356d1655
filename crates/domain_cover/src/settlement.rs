//! Premium collection and claim redemption
//!
//! Redemption flips the token to `Redeemed` before the payout is requested,
//! so any nested attempt to redeem the same token during the transfer sees a
//! spent token. If the transfer fails the flip is undone and the call fails
//! as a whole; the holder may retry later.

use std::sync::Arc;

use tracing::{info, warn};

use core_kernel::{HolderId, Money, TokenId};

use crate::cover::{CoverBook, CoverQuote};
use crate::currency::CurrencyRegistry;
use crate::error::CoverError;
use crate::ledger::CoverLedger;
use crate::ports::{PayoutReceipt, PayoutRequest, PremiumCollection, SettlementPort};

/// Moves value between holders and the pooled vault
pub struct RedemptionSettlement {
    vault: Arc<dyn SettlementPort>,
}

impl RedemptionSettlement {
    pub fn new(vault: Arc<dyn SettlementPort>) -> Self {
        Self { vault }
    }

    /// Collects the premium for a quote from `payer`
    ///
    /// The payment must equal the quoted premium exactly, currency included.
    pub async fn collect_premium(
        &self,
        registry: &CurrencyRegistry,
        quote: &CoverQuote,
        payer: HolderId,
        payment: Money,
    ) -> Result<(), CoverError> {
        let asset = registry.resolve(quote.currency())?.clone();
        if payment != quote.premium {
            return Err(CoverError::PaymentMismatch {
                expected: quote.premium.to_string(),
                actual: payment.to_string(),
            });
        }

        let minor_units = payment.to_minor(asset.decimals)?;
        self.vault
            .collect_premium(PremiumCollection {
                cover_id: quote.cover_id,
                payer,
                asset,
                amount: payment,
                minor_units,
            })
            .await?;
        Ok(())
    }

    /// Pays out the sum insured of an accepted claim to its holder
    ///
    /// The amount is the cover's fixed sum insured, paid in the token's
    /// currency. Fails with `AlreadyRedeemed` on every call after a success.
    pub async fn redeem_claim(
        &self,
        ledger: &mut CoverLedger,
        book: &CoverBook,
        registry: &CurrencyRegistry,
        token_id: TokenId,
        caller: HolderId,
    ) -> Result<PayoutReceipt, CoverError> {
        let token = ledger.owned_by(token_id, caller, "redeem claim")?;
        token.ensure_redeemable()?;
        let currency = token.currency();
        let record = book.get(token.cover_id())?;

        let asset = registry.resolve(currency)?.clone();
        if record.currency() != currency {
            return Err(CoverError::CoverTermsMismatch(record.cover_id));
        }
        let amount = record.sum_insured;
        let minor_units = amount.to_minor(asset.decimals)?;

        ledger.get_mut(token_id)?.mark_redeemed()?;

        let request = PayoutRequest {
            token_id,
            recipient: caller,
            asset,
            amount,
            minor_units,
        };
        match self.vault.pay_out(request).await {
            Ok(receipt) => {
                info!(%token_id, payout_id = %receipt.payout_id, %amount, "Claim redeemed");
                Ok(receipt)
            }
            Err(e) => {
                if let Ok(token) = ledger.get_mut(token_id) {
                    token.abort_redemption();
                }
                warn!(%token_id, %amount, error = %e, "Payout failed, redemption rolled back");
                Err(e.into())
            }
        }
    }
}
