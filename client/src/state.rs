//! Explicit application state for the dashboard: one struct, no globals,
//! with one update point per external event (connect, poll tick, confirmed
//! submission).

use anyhow::Result;
use solana_client::rpc_client::RpcClient;
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::accrual::elapsed_days;
use crate::error::DashboardError;
use crate::instructions::rpc::{get_account_opt, get_mint, get_token_balance_or_zero};
use crate::instructions::utils::{
    deserialize_program_account, get_user_state_address, get_vip_state_address, UserState,
    VipState,
};
use crate::units::to_human;
use crate::vip::{try_fetch_vip_config, VipConfig};
use crate::ClientConfig;

pub struct AppState {
    pub wallet: Pubkey,
    pub dlan_decimals: u8,
    pub dlan_total_units: u64,
    pub dlan_user_units: u64,
    /// Accrued whole days per stream, from the last poll.
    pub invest_days: u64,
    pub vip_days: u64,
    /// Last observed vault balance. Display only; claim flows re-read the
    /// reserve immediately before settlement.
    pub reserve_units: u64,
    pub vip_config: VipConfig,
}

impl AppState {
    pub fn connect(client: &RpcClient, config: &ClientConfig, wallet: Pubkey) -> Result<Self> {
        let vip_config = load_vip_config(config);
        let mut state = AppState {
            wallet,
            dlan_decimals: 9,
            dlan_total_units: 0,
            dlan_user_units: 0,
            invest_days: 0,
            vip_days: 0,
            reserve_units: 0,
            vip_config,
        };
        state.poll_tick(client, config);
        Ok(state)
    }

    /// Periodic refresh of every chain-derived field. Individual read
    /// failures degrade to zero rather than aborting the tick.
    pub fn poll_tick(&mut self, client: &RpcClient, config: &ClientConfig) {
        self.refresh_balances(client, config);
        self.refresh_timers(client, config);
    }

    pub fn refresh_balances(&mut self, client: &RpcClient, config: &ClientConfig) {
        if let Ok(mint) = get_mint(client, &config.dlan_mint) {
            self.dlan_decimals = mint.decimals;
            self.dlan_total_units = mint.supply;
        }
        let user_ata = get_associated_token_address(&self.wallet, &config.dlan_mint);
        self.dlan_user_units = get_token_balance_or_zero(client, &user_ata);
        self.reserve_units = get_token_balance_or_zero(client, &config.vault_usdt_ata);
    }

    /// Re-read both stream clocks from chain state. A missing state account
    /// means "never claimed" and gets the one-day-old baseline.
    pub fn refresh_timers(&mut self, client: &RpcClient, config: &ClientConfig) {
        let now = unix_now();
        self.invest_days = elapsed_days(last_invest_ts(client, config, &self.wallet), now);
        self.vip_days = elapsed_days(last_vip_ts(client, config, &self.wallet), now);
    }

    /// Manual refresh of the VIP tier document, the same fetch-or-fallback
    /// path as connect. Long-running watch sessions pick up tier changes
    /// only through this.
    pub fn reload_vip(&mut self, config: &ClientConfig) {
        self.vip_config = load_vip_config(config);
    }

    /// Post-confirmation update point. Local state is never mutated on a
    /// failed submission; this runs only after success.
    pub fn note_submission_success(&mut self, client: &RpcClient, config: &ClientConfig) {
        self.poll_tick(client, config);
    }

    /// Standard-stream gross rate in USDT base units per day: the DLAN
    /// balance divided by the configured divisor. Float only on the
    /// human-readable side, floored before settlement.
    pub fn invest_units_per_day(&self) -> u64 {
        let divisor = self.vip_config.daily_rate_divisor();
        if divisor == 0 {
            return 0;
        }
        let dlan_human = to_human(self.dlan_user_units, self.dlan_decimals);
        (dlan_human / divisor as f64 * 1e6).floor() as u64
    }

    pub fn share_percent(&self) -> f64 {
        if self.dlan_total_units == 0 {
            0.0
        } else {
            self.dlan_user_units as f64 / self.dlan_total_units as f64 * 100.0
        }
    }

    /// Gross APR guess from the divisor rule.
    pub fn apr_percent(&self) -> f64 {
        let divisor = self.vip_config.daily_rate_divisor();
        if divisor == 0 {
            0.0
        } else {
            365.0 / divisor as f64 * 100.0
        }
    }

    /// Net APR shown next to the gross figure. Assumes the fee split is
    /// exactly 1/3; for very small entitlements the floor-divided settlement
    /// diverges by rounding. Known display-only approximation.
    pub fn net_apr_percent(&self) -> f64 {
        self.apr_percent() * 2.0 / 3.0
    }
}

fn load_vip_config(config: &ClientConfig) -> VipConfig {
    match try_fetch_vip_config(&config.vip_config_url) {
        Ok(vip_config) => vip_config,
        Err(_) => {
            // Non-fatal: the dashboard keeps rendering without vip.json.
            println!("{}, using defaults", DashboardError::ConfigUnavailable);
            VipConfig::fallback(&config.admin_wallet)
        }
    }
}

fn last_invest_ts(client: &RpcClient, config: &ClientConfig, wallet: &Pubkey) -> Option<i64> {
    let address = get_user_state_address(wallet, &config.dlan_stake_program);
    let account = get_account_opt(client, &address)?;
    let state: UserState = deserialize_program_account("UserState", &account).ok()?;
    Some(state.last_invest_ts)
}

fn last_vip_ts(client: &RpcClient, config: &ClientConfig, wallet: &Pubkey) -> Option<i64> {
    let address = get_vip_state_address(wallet, &config.dlan_stake_program);
    let account = get_account_opt(client, &address)?;
    let state: VipState = deserialize_program_account("VipState", &account).ok()?;
    Some(state.last_vip_ts)
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vip::{InvestRule, VipConfig};

    fn state_with(dlan_user_units: u64, dlan_total_units: u64, divisor: u64) -> AppState {
        AppState {
            wallet: Pubkey::new_unique(),
            dlan_decimals: 9,
            dlan_total_units,
            dlan_user_units,
            invest_days: 0,
            vip_days: 0,
            reserve_units: 0,
            vip_config: VipConfig {
                invest_usd_per_dlan_rule: InvestRule {
                    dlan_per_usd_per_day: divisor,
                },
                invest_fee_recipient: Pubkey::new_unique().to_string(),
                tiers: Vec::new(),
            },
        }
    }

    #[test]
    fn invest_rate_from_balance_and_divisor() {
        // 1200 DLAN at divisor 120 pays 10 USDT/day gross.
        let state = state_with(1_200_000_000_000, 0, 120);
        assert_eq!(state.invest_units_per_day(), 10_000_000);
    }

    #[test]
    fn invest_rate_floors_to_integer_units() {
        // 1 DLAN / 120 = 0.008333... USDT/day -> 8333 base units.
        let state = state_with(1_000_000_000, 0, 120);
        assert_eq!(state.invest_units_per_day(), 8333);
    }

    #[test]
    fn invest_rate_zero_divisor_is_zero() {
        let state = state_with(1_000_000_000, 0, 0);
        assert_eq!(state.invest_units_per_day(), 0);
    }

    #[test]
    fn share_percent_handles_zero_supply() {
        assert_eq!(state_with(5, 0, 120).share_percent(), 0.0);
        let state = state_with(25, 100, 120);
        assert!((state.share_percent() - 25.0).abs() < 1e-9);
    }

    #[test]
    fn reload_vip_falls_back_when_unreachable() {
        let admin = Pubkey::new_unique();
        let config = ClientConfig {
            http_url: "http://localhost:8899".to_string(),
            payer_path: "id.json".to_string(),
            dlan_stake_program: Pubkey::new_unique(),
            dlan_mint: Pubkey::new_unique(),
            usdt_mint: Pubkey::new_unique(),
            admin_wallet: admin,
            vault_authority: Pubkey::new_unique(),
            vault_usdt_ata: Pubkey::new_unique(),
            vip_config_url: String::new(),
            quote_url: "http://localhost/quote".to_string(),
        };
        let mut state = state_with(0, 0, 90);
        state.vip_config.tiers.push(crate::vip::VipTier {
            wallet: state.wallet.to_string(),
            buttons: vec![5],
            fee_recipient: None,
        });

        state.reload_vip(&config);

        assert!(state.vip_config.tiers.is_empty());
        assert_eq!(
            state.vip_config.daily_rate_divisor(),
            crate::vip::DEFAULT_DLAN_PER_USD_PER_DAY
        );
        assert_eq!(state.vip_config.invest_fee_recipient().unwrap(), admin);
    }

    #[test]
    fn apr_guess_matches_divisor_rule() {
        let state = state_with(0, 0, 120);
        assert!((state.apr_percent() - 304.1666666).abs() < 1e-4);
        assert!((state.net_apr_percent() - state.apr_percent() * 2.0 / 3.0).abs() < 1e-9);
    }
}
