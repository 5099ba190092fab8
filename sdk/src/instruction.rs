//! Instruction encoders for the merkle distributor program.
//!
//! Data is the instruction's 8-byte discriminator followed by the borsh encoding of its
//! arguments. Account lists follow the order the program declares them in; the program
//! rejects any other order, so none of these builders reorder.

use std::io;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    pubkey::Pubkey,
};

pub trait InstructionArgs: BorshSerialize {
    const DISCRIMINATOR: [u8; 8];

    fn data(&self) -> io::Result<Vec<u8>> {
        let mut data = Self::DISCRIMINATOR.to_vec();
        self.serialize(&mut data)?;
        Ok(data)
    }
}

/// Arguments of `new_claim`. `proof` is the sibling path from leaf to root.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct NewClaimArgs {
    pub amount_unlocked: u64,
    pub amount_locked: u64,
    pub proof: Vec<[u8; 32]>,
}

impl InstructionArgs for NewClaimArgs {
    const DISCRIMINATOR: [u8; 8] = [78, 177, 98, 123, 210, 21, 187, 83];
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimLockedArgs {}

impl InstructionArgs for ClaimLockedArgs {
    const DISCRIMINATOR: [u8; 8] = [34, 206, 181, 23, 11, 207, 147, 90];
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetEnableSlotArgs {
    pub enable_slot: u64,
}

impl InstructionArgs for SetEnableSlotArgs {
    const DISCRIMINATOR: [u8; 8] = [5, 52, 73, 33, 150, 115, 97, 206];
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct SetClawbackStartTsArgs {
    pub clawback_start_ts: i64,
}

impl InstructionArgs for SetClawbackStartTsArgs {
    const DISCRIMINATOR: [u8; 8] = [83, 102, 71, 44, 243, 244, 186, 8];
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SetAdminArgs {}

impl InstructionArgs for SetAdminArgs {
    const DISCRIMINATOR: [u8; 8] = [251, 163, 0, 52, 91, 194, 187, 92];
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CloseClaimStatusArgs {}

impl InstructionArgs for CloseClaimStatusArgs {
    const DISCRIMINATOR: [u8; 8] = [163, 214, 191, 165, 245, 188, 17, 185];
}

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct CloseDistributorArgs {}

impl InstructionArgs for CloseDistributorArgs {
    const DISCRIMINATOR: [u8; 8] = [202, 56, 180, 143, 46, 104, 106, 112];
}

/// [new_claim] accounts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewClaimAccounts {
    /// The [MerkleDistributor].
    pub distributor: Pubkey,
    /// Claim status PDA, created by this instruction.
    pub claim_status: Pubkey,
    /// Distributor token vault.
    pub from: Pubkey,
    /// Claimant token account receiving the tokens.
    pub to: Pubkey,
    /// Who is claiming the tokens.
    pub claimant: Pubkey,
    pub token_program: Pubkey,
    pub system_program: Pubkey,
}

impl NewClaimAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.distributor, false),
            AccountMeta::new(self.claim_status, false),
            AccountMeta::new(self.from, false),
            AccountMeta::new(self.to, false),
            AccountMeta::new(self.claimant, true),
            AccountMeta::new_readonly(self.token_program, false),
            AccountMeta::new_readonly(self.system_program, false),
        ]
    }
}

/// [claim_locked] accounts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimLockedAccounts {
    pub distributor: Pubkey,
    pub claim_status: Pubkey,
    pub from: Pubkey,
    pub to: Pubkey,
    pub claimant: Pubkey,
    pub token_program: Pubkey,
}

impl ClaimLockedAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.distributor, false),
            AccountMeta::new(self.claim_status, false),
            AccountMeta::new(self.from, false),
            AccountMeta::new(self.to, false),
            AccountMeta::new(self.claimant, true),
            AccountMeta::new_readonly(self.token_program, false),
        ]
    }
}

/// Accounts shared by the admin-only setters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdminAccounts {
    pub distributor: Pubkey,
    pub admin: Pubkey,
}

impl AdminAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.distributor, false),
            AccountMeta::new(self.admin, true),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetAdminAccounts {
    pub distributor: Pubkey,
    pub admin: Pubkey,
    pub new_admin: Pubkey,
}

impl SetAdminAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.distributor, false),
            AccountMeta::new(self.admin, true),
            AccountMeta::new(self.new_admin, false),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseClaimStatusAccounts {
    pub claim_status: Pubkey,
    /// Receives the rent back.
    pub claimant: Pubkey,
    pub admin: Pubkey,
}

impl CloseClaimStatusAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.claim_status, false),
            AccountMeta::new(self.claimant, false),
            AccountMeta::new_readonly(self.admin, true),
        ]
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloseDistributorAccounts {
    pub distributor: Pubkey,
    pub token_vault: Pubkey,
    pub admin: Pubkey,
    /// Receives the remaining vault balance.
    pub destination_token_account: Pubkey,
    pub token_program: Pubkey,
}

impl CloseDistributorAccounts {
    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new(self.distributor, false),
            AccountMeta::new(self.token_vault, false),
            AccountMeta::new(self.admin, true),
            AccountMeta::new(self.destination_token_account, false),
            AccountMeta::new_readonly(self.token_program, false),
        ]
    }
}

pub fn new_claim(
    program_id: &Pubkey,
    args: &NewClaimArgs,
    accounts: &NewClaimAccounts,
) -> io::Result<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: args.data()?,
    })
}

pub fn claim_locked(
    program_id: &Pubkey,
    accounts: &ClaimLockedAccounts,
) -> io::Result<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: ClaimLockedArgs {}.data()?,
    })
}

pub fn set_enable_slot(
    program_id: &Pubkey,
    enable_slot: u64,
    accounts: &AdminAccounts,
) -> io::Result<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: SetEnableSlotArgs { enable_slot }.data()?,
    })
}

pub fn set_clawback_start_ts(
    program_id: &Pubkey,
    clawback_start_ts: i64,
    accounts: &AdminAccounts,
) -> io::Result<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: SetClawbackStartTsArgs { clawback_start_ts }.data()?,
    })
}

pub fn set_admin(program_id: &Pubkey, accounts: &SetAdminAccounts) -> io::Result<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: SetAdminArgs {}.data()?,
    })
}

/// only available in test phase
pub fn close_claim_status(
    program_id: &Pubkey,
    accounts: &CloseClaimStatusAccounts,
) -> io::Result<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: CloseClaimStatusArgs {}.data()?,
    })
}

/// only available in test phase
pub fn close_distributor(
    program_id: &Pubkey,
    accounts: &CloseDistributorAccounts,
) -> io::Result<Instruction> {
    Ok(Instruction {
        program_id: *program_id,
        accounts: accounts.to_account_metas(),
        data: CloseDistributorArgs {}.data()?,
    })
}
