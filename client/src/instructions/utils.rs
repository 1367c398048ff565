use anchor_lang::prelude::borsh;
use anchor_lang::AnchorDeserialize;
use anyhow::{format_err, Result};
use solana_sdk::{account::Account, hash::hash, pubkey::Pubkey};

/// Per-wallet standard (invest) stream state.
pub const USER_STATE_SEED: &str = "user";
/// Per-wallet VIP stream state.
pub const VIP_STATE_SEED: &str = "vip";
/// Fixed mint-authority PDA of the staking program.
pub const MINT_AUTH_SEED: &str = "mint-auth";

/// Anchor sighash: first 8 bytes of sha256("namespace:name").
pub fn anchor_discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let digest = hash(format!("{namespace}:{name}").as_bytes());
    let mut discriminator = [0u8; 8];
    discriminator.copy_from_slice(&digest.to_bytes()[..8]);
    discriminator
}

pub fn get_user_state_address(wallet: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (user_state, _bump) =
        Pubkey::find_program_address(&[USER_STATE_SEED.as_bytes(), wallet.as_ref()], program_id);
    user_state
}

pub fn get_vip_state_address(wallet: &Pubkey, program_id: &Pubkey) -> Pubkey {
    let (vip_state, _bump) =
        Pubkey::find_program_address(&[VIP_STATE_SEED.as_bytes(), wallet.as_ref()], program_id);
    vip_state
}

pub fn get_mint_authority_address(program_id: &Pubkey) -> Pubkey {
    let (mint_authority, _bump) =
        Pubkey::find_program_address(&[MINT_AUTH_SEED.as_bytes()], program_id);
    mint_authority
}

/// Standard stream state; the program stores the authority first, then the
/// last claim timestamp. Trailing fields are ignored on deserialization.
#[derive(AnchorDeserialize, Debug, Clone, Copy)]
pub struct UserState {
    pub authority: Pubkey,
    pub last_invest_ts: i64,
}

/// VIP stream state, same layout as [`UserState`] with its own clock.
#[derive(AnchorDeserialize, Debug, Clone, Copy)]
pub struct VipState {
    pub authority: Pubkey,
    pub last_vip_ts: i64,
}

/// Deserialize an anchor account after checking its name discriminator.
pub fn deserialize_program_account<T: AnchorDeserialize>(
    account_name: &str,
    account: &Account,
) -> Result<T> {
    let discriminator = anchor_discriminator("account", account_name);
    if account.data.len() < 8 || account.data[..8] != discriminator {
        return Err(format_err!("account is not a {}", account_name));
    }
    let mut data = &account.data[8..];
    T::deserialize(&mut data).map_err(Into::into)
}
