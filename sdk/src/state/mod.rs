//! Fixed-layout ledger records.
//!
//! Every record is an 8-byte discriminator followed by the borsh encoding of its fields,
//! exactly as the on-chain program writes it.

use std::io;

use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;
use solana_sdk::account::Account;

use crate::error::DecodeError;

pub mod claim_status;
pub mod merkle_distributor;

pub const DISCRIMINATOR_LEN: usize = 8;

pub trait AccountRecord: BorshSerialize + BorshDeserialize + Sized {
    const DISCRIMINATOR: [u8; DISCRIMINATOR_LEN];

    /// Serialized size of the fields, excluding the discriminator.
    const BODY_LEN: usize;

    /// Full on-chain size, discriminator included.
    const LEN: usize = DISCRIMINATOR_LEN + Self::BODY_LEN;

    /// Decode a record from raw account data. Bytes past the fixed layout are ignored.
    fn decode(data: &[u8]) -> Result<Self, DecodeError> {
        if data.len() < DISCRIMINATOR_LEN {
            return Err(DecodeError::TruncatedBuffer {
                expected: Self::LEN,
                actual: data.len(),
            });
        }

        let mut found = [0u8; DISCRIMINATOR_LEN];
        found.copy_from_slice(&data[..DISCRIMINATOR_LEN]);
        if found != Self::DISCRIMINATOR {
            return Err(DecodeError::BadDiscriminator {
                expected: Self::DISCRIMINATOR,
                found,
            });
        }

        if data.len() < Self::LEN {
            return Err(DecodeError::TruncatedBuffer {
                expected: Self::LEN,
                actual: data.len(),
            });
        }

        let mut body = &data[DISCRIMINATOR_LEN..Self::LEN];
        Self::deserialize(&mut body).map_err(|e| DecodeError::Malformed(e.to_string()))
    }

    /// Encode the record, discriminator first. `decode(&r.encode()?) == Ok(r)`.
    fn encode(&self) -> io::Result<Vec<u8>> {
        let mut data = Vec::with_capacity(Self::LEN);
        data.extend_from_slice(&Self::DISCRIMINATOR);
        self.serialize(&mut data)?;
        Ok(data)
    }

    /// Decode an account fetched from the ledger, checking it belongs to `program_id` first.
    fn decode_account(account: &Account, program_id: &Pubkey) -> Result<Self, DecodeError> {
        if account.owner != *program_id {
            return Err(DecodeError::UnexpectedOwner {
                expected: *program_id,
                found: account.owner,
            });
        }
        Self::decode(&account.data)
    }
}
