//! Builders for the three staking-program instructions. Account lists are
//! typed per instruction kind, so a missing derived address cannot be
//! assembled; data follows the anchor wire format (8-byte method sighash
//! followed by little-endian args).

use anchor_lang::prelude::borsh;
use anchor_lang::prelude::AccountMeta;
use anchor_lang::AnchorSerialize;
use anyhow::Result;
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_program, sysvar};
use spl_associated_token_account::get_associated_token_address;

use crate::instructions::utils::{
    anchor_discriminator, get_mint_authority_address, get_user_state_address,
    get_vip_state_address,
};
use crate::ClientConfig;

#[derive(AnchorSerialize)]
struct StakeAndMintPricedArgs {
    lamports: u64,
    mint_units: u64,
}

#[derive(AnchorSerialize)]
struct ClaimSplitArgs {
    user_units: u64,
    fee_units: u64,
    days: u64,
}

fn anchor_instruction(
    program_id: Pubkey,
    method: &str,
    args: &impl AnchorSerialize,
    accounts: Vec<AccountMeta>,
) -> Result<Instruction> {
    let mut data = anchor_discriminator("global", method).to_vec();
    args.serialize(&mut data)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

pub struct StakeAndMintPricedAccounts {
    pub authority: Pubkey,
    pub admin: Pubkey,
    pub mint: Pubkey,
    pub user_token: Pubkey,
    pub mint_authority: Pubkey,
}

impl StakeAndMintPricedAccounts {
    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.authority, true),
            AccountMeta::new(self.admin, false),
            AccountMeta::new(self.mint, false),
            AccountMeta::new(self.user_token, false),
            AccountMeta::new_readonly(self.mint_authority, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ]
    }
}

/// Account set shared by the two claim instructions; only the per-stream
/// state PDA and the fee recipient differ between invest and VIP.
pub struct ClaimSplitAccounts {
    pub authority: Pubkey,
    pub stream_state: Pubkey,
    pub user_token: Pubkey,
    pub vault_token: Pubkey,
    pub vault_authority: Pubkey,
    pub fee_owner: Pubkey,
    pub fee_token: Pubkey,
    pub usdt_mint: Pubkey,
}

impl ClaimSplitAccounts {
    fn new(
        config: &ClientConfig,
        wallet: &Pubkey,
        stream_state: Pubkey,
        fee_owner: &Pubkey,
    ) -> Self {
        ClaimSplitAccounts {
            authority: *wallet,
            stream_state,
            user_token: get_associated_token_address(wallet, &config.usdt_mint),
            vault_token: config.vault_usdt_ata,
            vault_authority: config.vault_authority,
            fee_owner: *fee_owner,
            fee_token: get_associated_token_address(fee_owner, &config.usdt_mint),
            usdt_mint: config.usdt_mint,
        }
    }

    fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.authority, true),
            AccountMeta::new(self.stream_state, false),
            AccountMeta::new(self.user_token, false),
            AccountMeta::new(self.vault_token, false),
            AccountMeta::new_readonly(self.vault_authority, false),
            AccountMeta::new_readonly(self.fee_owner, false),
            AccountMeta::new(self.fee_token, false),
            AccountMeta::new_readonly(self.usdt_mint, false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(spl_associated_token_account::id(), false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ]
    }
}

pub fn stake_and_mint_priced_instr(
    config: &ClientConfig,
    wallet: &Pubkey,
    lamports: u64,
    mint_units: u64,
) -> Result<Vec<Instruction>> {
    let accounts = StakeAndMintPricedAccounts {
        authority: *wallet,
        admin: config.admin_wallet,
        mint: config.dlan_mint,
        user_token: get_associated_token_address(wallet, &config.dlan_mint),
        mint_authority: get_mint_authority_address(&config.dlan_stake_program),
    };
    let instruction = anchor_instruction(
        config.dlan_stake_program,
        "stake_and_mint_priced",
        &StakeAndMintPricedArgs {
            lamports,
            mint_units,
        },
        accounts.to_account_metas(),
    )?;
    Ok(vec![instruction])
}

pub fn invest_claim_split_instr(
    config: &ClientConfig,
    wallet: &Pubkey,
    fee_owner: &Pubkey,
    user_units: u64,
    fee_units: u64,
    days: u64,
) -> Result<Vec<Instruction>> {
    let stream_state = get_user_state_address(wallet, &config.dlan_stake_program);
    let accounts = ClaimSplitAccounts::new(config, wallet, stream_state, fee_owner);
    let instruction = anchor_instruction(
        config.dlan_stake_program,
        "invest_claim_split",
        &ClaimSplitArgs {
            user_units,
            fee_units,
            days,
        },
        accounts.to_account_metas(),
    )?;
    Ok(vec![instruction])
}

pub fn vip_claim_split_timed_instr(
    config: &ClientConfig,
    wallet: &Pubkey,
    fee_owner: &Pubkey,
    user_units: u64,
    fee_units: u64,
    days: u64,
) -> Result<Vec<Instruction>> {
    let stream_state = get_vip_state_address(wallet, &config.dlan_stake_program);
    let accounts = ClaimSplitAccounts::new(config, wallet, stream_state, fee_owner);
    let instruction = anchor_instruction(
        config.dlan_stake_program,
        "vip_claim_split_timed",
        &ClaimSplitArgs {
            user_units,
            fee_units,
            days,
        },
        accounts.to_account_metas(),
    )?;
    Ok(vec![instruction])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ClientConfig {
        ClientConfig {
            http_url: "http://localhost:8899".to_string(),
            payer_path: "id.json".to_string(),
            dlan_stake_program: Pubkey::new_unique(),
            dlan_mint: Pubkey::new_unique(),
            usdt_mint: Pubkey::new_unique(),
            admin_wallet: Pubkey::new_unique(),
            vault_authority: Pubkey::new_unique(),
            vault_usdt_ata: Pubkey::new_unique(),
            vip_config_url: "http://localhost/vip.json".to_string(),
            quote_url: "http://localhost/quote".to_string(),
        }
    }

    #[test]
    fn stake_instruction_shape() {
        let config = test_config();
        let wallet = Pubkey::new_unique();
        let ixs = stake_and_mint_priced_instr(&config, &wallet, 1_000_000_000, 152_000_000_000)
            .unwrap();
        assert_eq!(ixs.len(), 1);
        let ix = &ixs[0];
        assert_eq!(ix.program_id, config.dlan_stake_program);
        assert_eq!(ix.accounts.len(), 9);
        assert_eq!(ix.accounts[0].pubkey, wallet);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, config.admin_wallet);
        // sighash + two u64 args
        assert_eq!(ix.data.len(), 8 + 16);
        assert_eq!(&ix.data[8..16], &1_000_000_000u64.to_le_bytes());
        assert_eq!(&ix.data[16..24], &152_000_000_000u64.to_le_bytes());
    }

    #[test]
    fn claim_instructions_differ_only_by_stream_state_and_sighash() {
        let config = test_config();
        let wallet = Pubkey::new_unique();
        let fee_owner = Pubkey::new_unique();
        let invest =
            &invest_claim_split_instr(&config, &wallet, &fee_owner, 3334, 1666, 5).unwrap()[0];
        let vip =
            &vip_claim_split_timed_instr(&config, &wallet, &fee_owner, 3334, 1666, 5).unwrap()[0];

        assert_eq!(invest.accounts.len(), 12);
        assert_eq!(vip.accounts.len(), 12);
        assert_eq!(
            invest.accounts[1].pubkey,
            get_user_state_address(&wallet, &config.dlan_stake_program)
        );
        assert_eq!(
            vip.accounts[1].pubkey,
            get_vip_state_address(&wallet, &config.dlan_stake_program)
        );
        for i in (0..12).filter(|&i| i != 1) {
            assert_eq!(invest.accounts[i].pubkey, vip.accounts[i].pubkey);
        }
        assert_ne!(invest.data[..8], vip.data[..8]);
        assert_eq!(invest.data[8..], vip.data[8..]);
    }

    #[test]
    fn claim_args_are_little_endian_in_order() {
        let config = test_config();
        let wallet = Pubkey::new_unique();
        let fee_owner = Pubkey::new_unique();
        let ix = &invest_claim_split_instr(&config, &wallet, &fee_owner, 2667, 1333, 4).unwrap()[0];
        assert_eq!(ix.data.len(), 8 + 24);
        assert_eq!(&ix.data[8..16], &2667u64.to_le_bytes());
        assert_eq!(&ix.data[16..24], &1333u64.to_le_bytes());
        assert_eq!(&ix.data[24..32], &4u64.to_le_bytes());
    }

    #[test]
    fn vault_accounts_come_from_config() {
        let config = test_config();
        let wallet = Pubkey::new_unique();
        let fee_owner = Pubkey::new_unique();
        let ix = &invest_claim_split_instr(&config, &wallet, &fee_owner, 1, 0, 1).unwrap()[0];
        assert_eq!(ix.accounts[3].pubkey, config.vault_usdt_ata);
        assert_eq!(ix.accounts[4].pubkey, config.vault_authority);
        assert_eq!(
            ix.accounts[6].pubkey,
            get_associated_token_address(&fee_owner, &config.usdt_mint)
        );
    }
}
