//! Remote VIP tier configuration and wallet-to-tier resolution.
//!
//! The document is fetched with a plain unauthenticated GET. The dashboard
//! must keep rendering when it is missing or malformed, so any fetch or
//! parse failure falls back to a built-in default and is never surfaced as
//! a hard error.

use anyhow::Result;
use serde::Deserialize;
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

pub const DEFAULT_DLAN_PER_USD_PER_DAY: u64 = 120;

#[derive(Debug, Clone, Deserialize)]
pub struct InvestRule {
    pub dlan_per_usd_per_day: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VipTier {
    pub wallet: String,
    /// Flat daily payout rates in whole USDT, one claim button each.
    pub buttons: Vec<u64>,
    #[serde(default)]
    pub fee_recipient: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VipConfig {
    pub invest_usd_per_dlan_rule: InvestRule,
    pub invest_fee_recipient: String,
    #[serde(default)]
    pub tiers: Vec<VipTier>,
}

impl VipConfig {
    /// In-memory default used whenever the remote document is unreachable:
    /// standard divisor, fees to the admin wallet, no VIP tiers.
    pub fn fallback(admin_wallet: &Pubkey) -> Self {
        VipConfig {
            invest_usd_per_dlan_rule: InvestRule {
                dlan_per_usd_per_day: DEFAULT_DLAN_PER_USD_PER_DAY,
            },
            invest_fee_recipient: admin_wallet.to_string(),
            tiers: Vec::new(),
        }
    }

    pub fn daily_rate_divisor(&self) -> u64 {
        self.invest_usd_per_dlan_rule.dlan_per_usd_per_day
    }

    pub fn invest_fee_recipient(&self) -> Result<Pubkey> {
        Ok(Pubkey::from_str(&self.invest_fee_recipient)?)
    }
}

/// Fetch the remote VIP config. Callers fall back to
/// [`VipConfig::fallback`] on any failure; the document being unreachable
/// is never a hard error.
pub fn try_fetch_vip_config(url: &str) -> Result<VipConfig> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(response.json::<VipConfig>()?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTier {
    /// Empty when the wallet has no VIP entitlement.
    pub buttons: Vec<u64>,
    pub fee_recipient: Pubkey,
}

/// Look up a wallet's VIP entitlement by exact identity match. The fee
/// recipient is the tier override when present and non-empty, otherwise the
/// global invest recipient.
pub fn resolve_tier(wallet: &Pubkey, config: &VipConfig) -> Result<ResolvedTier> {
    let wallet_str = wallet.to_string();
    let tier = config.tiers.iter().find(|t| t.wallet == wallet_str);

    let fee_recipient = match tier.and_then(|t| t.fee_recipient.as_deref()) {
        Some(s) if !s.is_empty() => Pubkey::from_str(s)?,
        _ => config.invest_fee_recipient()?,
    };

    Ok(ResolvedTier {
        buttons: tier.map(|t| t.buttons.clone()).unwrap_or_default(),
        fee_recipient,
    })
}
