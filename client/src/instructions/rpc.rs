use anyhow::Result;
use solana_account_decoder::parse_token::UiTokenAmount;
use solana_client::{rpc_client::RpcClient, rpc_config::RpcSendTransactionConfig};
use solana_sdk::{
    account::Account, commitment_config::CommitmentConfig, program_pack::Pack, pubkey::Pubkey,
    signature::Signature, transaction::Transaction,
};

pub fn send_txn(client: &RpcClient, txn: &Transaction, wait_confirm: bool) -> Result<Signature> {
    Ok(client.send_and_confirm_transaction_with_spinner_and_config(
        txn,
        if wait_confirm {
            CommitmentConfig::confirmed()
        } else {
            CommitmentConfig::processed()
        },
        RpcSendTransactionConfig {
            skip_preflight: true,
            ..RpcSendTransactionConfig::default()
        },
    )?)
}

pub fn get_account_opt(client: &RpcClient, address: &Pubkey) -> Option<Account> {
    client.get_account(address).ok()
}

/// Token balance in base units. A missing or not-yet-created token account
/// reads as zero so the dashboard degrades instead of hard-failing.
pub fn get_token_balance_or_zero(client: &RpcClient, token_account: &Pubkey) -> u64 {
    client
        .get_token_account_balance(token_account)
        .map(|balance| token_units(&balance))
        .unwrap_or(0)
}

fn token_units(amount: &UiTokenAmount) -> u64 {
    amount.amount.parse().unwrap_or(0)
}

pub fn get_mint(client: &RpcClient, mint: &Pubkey) -> Result<spl_token::state::Mint> {
    let account = client.get_account(mint)?;
    Ok(spl_token::state::Mint::unpack(&account.data)?)
}
