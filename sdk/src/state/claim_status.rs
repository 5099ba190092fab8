use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

use crate::{error::DistributorError, state::AccountRecord};

/// Holds whether or not a claimant has claimed tokens.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimStatus {
    /// Authority that claimed the tokens.
    pub claimant: Pubkey,
    /// Locked amount
    pub locked_amount: u64,
    /// Locked amount withdrawn
    pub locked_amount_withdrawn: u64,
    /// Unlocked amount
    pub unlocked_amount: u64,
    /// indicate that whether admin can close this account, for testing purpose
    pub closable: bool,
    /// admin of merkle tree, store for for testing purpose
    pub admin: Pubkey,
}

impl AccountRecord for ClaimStatus {
    const DISCRIMINATOR: [u8; 8] = [22, 183, 249, 157, 247, 95, 150, 96];
    const BODY_LEN: usize = 89;
}

impl ClaimStatus {
    /// Returns amount withdrawable, factoring in unlocked tokens and previous withdraws.
    pub fn amount_withdrawable(
        &self,
        curr_ts: i64,
        start_ts: i64,
        end_ts: i64,
    ) -> Result<u64, DistributorError> {
        self.unlocked_amount(curr_ts, start_ts, end_ts)?
            .checked_sub(self.locked_amount_withdrawn)
            .ok_or(DistributorError::ArithmeticError)
    }

    /// Portion of `locked_amount` unlocked at `curr_ts`, linear between `start_ts` and `end_ts`.
    ///
    /// The product `time_into_unlock * locked_amount` is taken in u128 and cannot overflow;
    /// the quotient never exceeds `locked_amount`, so narrowing back to u64 is lossless.
    pub fn unlocked_amount(
        &self,
        curr_ts: i64,
        start_ts: i64,
        end_ts: i64,
    ) -> Result<u64, DistributorError> {
        if curr_ts < start_ts {
            return Ok(0);
        }
        if curr_ts >= end_ts {
            return Ok(self.locked_amount);
        }

        let time_into_unlock = curr_ts
            .checked_sub(start_ts)
            .ok_or(DistributorError::ArithmeticError)?;
        let total_unlock_time = end_ts
            .checked_sub(start_ts)
            .ok_or(DistributorError::ArithmeticError)?;

        let amount = (time_into_unlock as u128)
            .checked_mul(self.locked_amount as u128)
            .ok_or(DistributorError::ArithmeticError)?
            .checked_div(total_unlock_time as u128)
            .ok_or(DistributorError::ArithmeticError)?;

        u64::try_from(amount).map_err(|_| DistributorError::ArithmeticError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::DecodeError, state::merkle_distributor::MerkleDistributor};

    fn sample_claim_status() -> ClaimStatus {
        ClaimStatus {
            claimant: Pubkey::new_unique(),
            locked_amount: 1_000,
            locked_amount_withdrawn: 250,
            unlocked_amount: 9_007_199_254_740_993,
            closable: true,
            admin: Pubkey::new_unique(),
        }
    }

    #[test]
    fn test_round_trip() {
        let claim_status = sample_claim_status();
        let data = claim_status.encode().unwrap();

        assert_eq!(data.len(), 97);
        assert_eq!(&data[40..48], &1_000u64.to_le_bytes());
        assert_eq!(data[64], 1);
        assert_eq!(ClaimStatus::decode(&data).unwrap(), claim_status);
    }

    #[test]
    fn test_rejects_distributor_discriminator() {
        let mut data = sample_claim_status().encode().unwrap();
        data[..8].copy_from_slice(&MerkleDistributor::DISCRIMINATOR);

        assert!(matches!(
            ClaimStatus::decode(&data),
            Err(DecodeError::BadDiscriminator { .. })
        ));
    }

    #[test]
    fn test_rejects_distributor_bytes() {
        // A distributor is longer than a claim status, so only the tag can reject it.
        let data = MerkleDistributor::default().encode().unwrap();
        assert!(matches!(
            ClaimStatus::decode(&data),
            Err(DecodeError::BadDiscriminator { .. })
        ));
    }

    #[test]
    fn test_unlocked_amount_linear() {
        let claim_status = ClaimStatus {
            locked_amount: 1_000,
            ..ClaimStatus::default()
        };

        assert_eq!(claim_status.unlocked_amount(50, 100, 200).unwrap(), 0);
        assert_eq!(claim_status.unlocked_amount(150, 100, 200).unwrap(), 500);
        assert_eq!(claim_status.unlocked_amount(200, 100, 200).unwrap(), 1_000);
        assert_eq!(claim_status.unlocked_amount(500, 100, 200).unwrap(), 1_000);
    }

    #[test]
    fn test_amount_withdrawable() {
        let claim_status = ClaimStatus {
            locked_amount: u64::MAX,
            locked_amount_withdrawn: 10,
            ..ClaimStatus::default()
        };

        assert_eq!(
            claim_status.amount_withdrawable(300, 100, 200).unwrap(),
            u64::MAX - 10
        );
        assert!(claim_status.amount_withdrawable(100, 100, 200).is_err());
    }
}
