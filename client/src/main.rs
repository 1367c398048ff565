use anyhow::{format_err, Result};
use clap::Parser;
use colorful::{Color, Colorful};
use configparser::ini::Ini;
use solana_client::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    instruction::Instruction,
    native_token::LAMPORTS_PER_SOL,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::str::FromStr;
use std::thread;
use std::time::Duration;

mod accrual;
mod error;
mod instructions;
mod quote;
mod settle;
mod state;
mod units;
mod vip;

use error::DashboardError;
use instructions::rpc::{get_token_balance_or_zero, send_txn};
use instructions::stake_instructions::{
    invest_claim_split_instr, stake_and_mint_priced_instr, vip_claim_split_timed_instr,
};
use quote::quote_usdc_out;
use settle::settle;
use state::AppState;
use units::{rescale, to_base_units, to_human, SOL_DECIMALS, USDT_DECIMALS};
use vip::resolve_tier;

// Mainnet defaults; any of them can be overridden in client_config.ini.
const DEFAULT_DLAN_STAKE_PROGRAM: &str = "3hQsDEYknZmKKUBApAGtcGPy395ogJdiB8DCvMKh24K7";
const DEFAULT_DLAN_MINT: &str = "7yTrTBY1PZtknKAQTqzA3KriDc8y7yeMNa9nzTMseYa8";
const DEFAULT_USDT_MINT: &str = "Es9vMFrzaCERmJfrF4H2FYD4KCoNkY11McCe8BenwNYB";
const DEFAULT_ADMIN_WALLET: &str = "Gxovarj3kNDd6ks54KNXknRh1GP5ETaUdYGr1xgqeVNh";
const DEFAULT_VAULT_AUTHORITY: &str = "ByG2RboeJD4hTxZ8MGHMfmsdWbyvVFNh1jrPL27suoyc";
const DEFAULT_VAULT_USDT_ATA: &str = "AMroGi8sbTG63nMr4VT1hyj18YA8jvoMN3GvVqovhBqa";
const DEFAULT_QUOTE_URL: &str = "https://quote-api.jup.ag/v6/quote";

#[derive(Clone, Debug, PartialEq)]
pub struct ClientConfig {
    http_url: String,
    payer_path: String,
    dlan_stake_program: Pubkey,
    dlan_mint: Pubkey,
    usdt_mint: Pubkey,
    admin_wallet: Pubkey,
    vault_authority: Pubkey,
    vault_usdt_ata: Pubkey,
    /// URL of the remote vip.json; an empty value just means the built-in
    /// default config is used.
    vip_config_url: String,
    quote_url: String,
}

fn load_cfg(client_config: &String) -> Result<ClientConfig> {
    let mut config = Ini::new();
    config
        .load(client_config)
        .map_err(|err| format_err!("failed to read {}: {}", client_config, err))?;

    let required = |key: &str| -> Result<String> {
        config
            .get("Global", key)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| format_err!("{} must not be empty", key))
    };
    let string_or = |key: &str, default: &str| -> String {
        config
            .get("Global", key)
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| default.to_string())
    };
    let pubkey_or = |key: &str, default: &str| -> Result<Pubkey> {
        let value = string_or(key, default);
        Pubkey::from_str(&value).map_err(|_| format_err!("{} is not a valid pubkey", key))
    };

    Ok(ClientConfig {
        http_url: required("http_url")?,
        payer_path: required("payer_path")?,
        dlan_stake_program: pubkey_or("dlan_stake_program", DEFAULT_DLAN_STAKE_PROGRAM)?,
        dlan_mint: pubkey_or("dlan_mint", DEFAULT_DLAN_MINT)?,
        usdt_mint: pubkey_or("usdt_mint", DEFAULT_USDT_MINT)?,
        admin_wallet: pubkey_or("admin_wallet", DEFAULT_ADMIN_WALLET)?,
        vault_authority: pubkey_or("vault_authority", DEFAULT_VAULT_AUTHORITY)?,
        vault_usdt_ata: pubkey_or("vault_usdt_ata", DEFAULT_VAULT_USDT_ATA)?,
        vip_config_url: string_or("vip_config_url", ""),
        quote_url: string_or("quote_url", DEFAULT_QUOTE_URL),
    })
}

fn read_keypair_file(s: &str) -> Result<Keypair> {
    solana_sdk::signature::read_keypair_file(s)
        .map_err(|_| DashboardError::WalletNotConnected.into())
}

#[derive(Debug, Parser)]
pub struct Opts {
    #[clap(subcommand)]
    pub command: DlanCommands,
}

#[derive(Debug, Parser)]
pub enum DlanCommands {
    /// One-shot snapshot: balances, accrual clocks, reserve and VIP buttons.
    Dashboard,
    /// Re-render the dashboard on a fixed polling interval.
    Watch {
        #[arg(long, default_value_t = 30)]
        interval_secs: u64,
    },
    /// Deposit SOL and mint DLAN sized by the current Jupiter quote.
    Stake {
        #[arg(long)]
        sol: f64,
    },
    /// Claim every accrued standard dividend day, capped by the reserve.
    Claim,
    /// Claim one of your configured VIP daily payouts for all accrued days.
    VipClaim {
        #[arg(long)]
        usd_per_day: u64,
    },
    /// Re-fetch the VIP tier document and show the refreshed dashboard.
    ReloadVip,
}

fn main() -> Result<()> {
    let client_config = "client_config.ini";
    let config = load_cfg(&client_config.to_string())?;
    let payer = read_keypair_file(&config.payer_path)?;
    let rpc_client = RpcClient::new_with_commitment(
        config.http_url.clone(),
        CommitmentConfig::processed(),
    );

    let opts = Opts::parse();
    let mut app = AppState::connect(&rpc_client, &config, payer.pubkey())?;

    match opts.command {
        DlanCommands::Dashboard => {
            render_dashboard(&app, &config);
        }
        DlanCommands::Watch { interval_secs } => loop {
            render_dashboard(&app, &config);
            thread::sleep(Duration::from_secs(interval_secs));
            app.poll_tick(&rpc_client, &config);
        },
        DlanCommands::Stake { sol } => {
            stake_via_quote(&rpc_client, &config, &payer, &mut app, sol)?;
        }
        DlanCommands::Claim => {
            claim_invest(&rpc_client, &config, &payer, &mut app)?;
        }
        DlanCommands::VipClaim { usd_per_day } => {
            claim_vip(&rpc_client, &config, &payer, &mut app, usd_per_day)?;
        }
        DlanCommands::ReloadVip => {
            app.reload_vip(&config);
            render_dashboard(&app, &config);
        }
    }
    Ok(())
}

fn render_dashboard(app: &AppState, config: &ClientConfig) {
    println!("{}", "DLAN dashboard".color(Color::LightSeaGreen).bold());
    println!("wallet        {}", app.wallet);
    println!(
        "your DLAN     {:.6}",
        to_human(app.dlan_user_units, app.dlan_decimals)
    );
    println!(
        "total DLAN    {:.6}",
        to_human(app.dlan_total_units, app.dlan_decimals)
    );
    println!("your share    {:.2}%", app.share_percent());
    println!(
        "APR           {:.2}% gross / ~{:.2}% net",
        app.apr_percent(),
        app.net_apr_percent()
    );
    println!(
        "reserve USDT  {:.6}",
        to_human(app.reserve_units, USDT_DECIMALS)
    );
    println!(
        "accrued days  invest {} / vip {}",
        app.invest_days, app.vip_days
    );

    match quote_usdc_out(&config.quote_url, LAMPORTS_PER_SOL) {
        Some(usdc_out) => {
            let mint_units = rescale(usdc_out, USDT_DECIMALS, app.dlan_decimals);
            println!(
                "1 SOL mints   ~{:.6} DLAN (Jupiter)",
                to_human(mint_units, app.dlan_decimals)
            );
        }
        None => println!("1 SOL mints   quote unavailable"),
    }

    match resolve_tier(&app.wallet, &app.vip_config) {
        Ok(tier) if !tier.buttons.is_empty() => {
            let buttons = tier
                .buttons
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            println!(
                "{}   {} USDT/day (fee -> {})",
                "vip buttons".color(Color::Gold1),
                buttons,
                tier.fee_recipient
            );
        }
        _ => println!("vip buttons   none"),
    }
}

fn stake_via_quote(
    client: &RpcClient,
    config: &ClientConfig,
    payer: &Keypair,
    app: &mut AppState,
    sol: f64,
) -> Result<()> {
    let lamports = to_base_units(sol, SOL_DECIMALS);
    if lamports == 0 {
        return Err(DashboardError::ZeroOrNegativeInput.into());
    }
    let usdc_out =
        quote_usdc_out(&config.quote_url, lamports).ok_or(DashboardError::QuoteUnavailable)?;
    let mint_units = rescale(usdc_out, USDT_DECIMALS, app.dlan_decimals);
    if mint_units == 0 {
        return Err(DashboardError::ZeroOrNegativeInput.into());
    }

    let instructions = stake_and_mint_priced_instr(config, &app.wallet, lamports, mint_units)?;
    let signature = submit(client, payer, &instructions)?;
    println!("stake via quote sig: {}", signature);

    app.note_submission_success(client, config);
    println!(
        "Staked {} SOL at ~{:.6} USDC, minted {:.6} DLAN.",
        sol,
        to_human(usdc_out, USDT_DECIMALS),
        to_human(mint_units, app.dlan_decimals)
    );
    Ok(())
}

fn claim_invest(
    client: &RpcClient,
    config: &ClientConfig,
    payer: &Keypair,
    app: &mut AppState,
) -> Result<()> {
    // Balances feed the rate, the timers are the accrual snapshot; the
    // reserve is re-read last so the settlement sees the freshest value.
    app.poll_tick(client, config);
    let reserve_units = get_token_balance_or_zero(client, &config.vault_usdt_ata);
    let settlement = settle(app.invest_units_per_day(), app.invest_days, reserve_units)?;

    let fee_owner = app.vip_config.invest_fee_recipient()?;
    let instructions = invest_claim_split_instr(
        config,
        &app.wallet,
        &fee_owner,
        settlement.user_units,
        settlement.fee_units,
        settlement.days_settled,
    )?;
    let signature = submit(client, payer, &instructions)?;
    println!("invest claim sig: {}", signature);

    app.note_submission_success(client, config);
    println!(
        "Claimed {} day(s): {:.6} USDT net, {:.6} USDT fee.",
        settlement.days_settled,
        to_human(settlement.user_units, USDT_DECIMALS),
        to_human(settlement.fee_units, USDT_DECIMALS)
    );
    Ok(())
}

fn claim_vip(
    client: &RpcClient,
    config: &ClientConfig,
    payer: &Keypair,
    app: &mut AppState,
    usd_per_day: u64,
) -> Result<()> {
    let tier = resolve_tier(&app.wallet, &app.vip_config)?;
    if !tier.buttons.contains(&usd_per_day) {
        return Err(DashboardError::VipNotEntitled(usd_per_day).into());
    }

    app.refresh_timers(client, config);
    // A configured tier always gets at least one claimable day, even when
    // the clock reads zero. Deliberately different from the invest stream.
    let days_accrued = app.vip_days.max(1);
    let units_per_day = usd_per_day.saturating_mul(10u64.pow(USDT_DECIMALS as u32));

    let reserve_units = get_token_balance_or_zero(client, &config.vault_usdt_ata);
    let settlement = settle(units_per_day, days_accrued, reserve_units)?;

    let instructions = vip_claim_split_timed_instr(
        config,
        &app.wallet,
        &tier.fee_recipient,
        settlement.user_units,
        settlement.fee_units,
        settlement.days_settled,
    )?;
    let signature = submit(client, payer, &instructions)?;
    println!("vip claim sig: {}", signature);

    app.note_submission_success(client, config);
    println!(
        "VIP claim, {} day(s): {:.6} USDT net.",
        settlement.days_settled,
        to_human(settlement.user_units, USDT_DECIMALS)
    );
    Ok(())
}

fn submit(client: &RpcClient, payer: &Keypair, instructions: &[Instruction]) -> Result<Signature> {
    let signers = vec![payer];
    let recent_hash = client.get_latest_blockhash()?;
    let txn = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        &signers,
        recent_hash,
    );
    send_txn(client, &txn, true)
        .map_err(|err| DashboardError::ChainSubmissionFailed(err.to_string()).into())
}
