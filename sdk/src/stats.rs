use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use solana_program::pubkey::Pubkey;

use crate::{error::DistributorError, state::merkle_distributor::MerkleDistributor};

/// Claim progress of one distributor.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorStats {
    #[serde_as(as = "DisplayFromStr")]
    pub address: Pubkey,
    pub claimed_total: u64,
    pub remaining_total: u64,
    pub users_total: u64,
    pub users_claimed_total: u64,
}

impl DistributorStats {
    pub fn from_distributor(
        address: Pubkey,
        distributor: &MerkleDistributor,
    ) -> Result<Self, DistributorError> {
        let remaining_total =
            distributor
                .remaining_claim()
                .ok_or_else(|| DistributorError::InconsistentState {
                    address,
                    reason: format!(
                        "total_amount_claimed {} exceeds max_total_claim {}",
                        distributor.total_amount_claimed, distributor.max_total_claim
                    ),
                })?;

        Ok(Self {
            address,
            claimed_total: distributor.total_amount_claimed,
            remaining_total,
            users_total: distributor.max_num_nodes,
            users_claimed_total: distributor.num_nodes_claimed,
        })
    }
}

/// Totals across several distributors, alongside each one's own stats.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionStats {
    pub claimed_total: u64,
    pub remaining_total: u64,
    pub users_total: u64,
    pub users_claimed_total: u64,
    pub distributors: Vec<DistributorStats>,
}

impl DistributionStats {
    pub fn aggregate(distributors: Vec<DistributorStats>) -> Result<Self, DistributorError> {
        let mut stats = DistributionStats::default();
        for d in &distributors {
            stats.claimed_total = checked_add(stats.claimed_total, d.claimed_total)?;
            stats.remaining_total = checked_add(stats.remaining_total, d.remaining_total)?;
            stats.users_total = checked_add(stats.users_total, d.users_total)?;
            stats.users_claimed_total =
                checked_add(stats.users_claimed_total, d.users_claimed_total)?;
        }
        stats.distributors = distributors;
        Ok(stats)
    }
}

fn checked_add(a: u64, b: u64) -> Result<u64, DistributorError> {
    a.checked_add(b).ok_or(DistributorError::ArithmeticError)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(claimed: u64, remaining: u64, users: u64, users_claimed: u64) -> DistributorStats {
        DistributorStats {
            address: Pubkey::new_unique(),
            claimed_total: claimed,
            remaining_total: remaining,
            users_total: users,
            users_claimed_total: users_claimed,
        }
    }

    #[test]
    fn test_from_distributor() {
        let address = Pubkey::new_unique();
        let distributor = MerkleDistributor {
            max_total_claim: 3_000_000,
            total_amount_claimed: 1_000_000,
            max_num_nodes: 10,
            num_nodes_claimed: 4,
            ..MerkleDistributor::default()
        };

        let stats = DistributorStats::from_distributor(address, &distributor).unwrap();
        assert_eq!(stats.claimed_total, 1_000_000);
        assert_eq!(stats.remaining_total, 2_000_000);
        assert_eq!(stats.users_total, 10);
        assert_eq!(stats.users_claimed_total, 4);
    }

    #[test]
    fn test_over_claimed_is_inconsistent() {
        let distributor = MerkleDistributor {
            max_total_claim: 1,
            total_amount_claimed: 2,
            ..MerkleDistributor::default()
        };
        assert!(matches!(
            DistributorStats::from_distributor(Pubkey::new_unique(), &distributor),
            Err(DistributorError::InconsistentState { .. })
        ));
    }

    #[test]
    fn test_aggregate() {
        let total = DistributionStats::aggregate(vec![stats(1, 2, 3, 4), stats(10, 20, 30, 40)])
            .unwrap();
        assert_eq!(total.claimed_total, 11);
        assert_eq!(total.remaining_total, 22);
        assert_eq!(total.users_total, 33);
        assert_eq!(total.users_claimed_total, 44);
        assert_eq!(total.distributors.len(), 2);
    }

    #[test]
    fn test_aggregate_overflow() {
        let result = DistributionStats::aggregate(vec![stats(u64::MAX, 0, 0, 0), stats(1, 0, 0, 0)]);
        assert!(matches!(result, Err(DistributorError::ArithmeticError)));
    }

    #[test]
    fn test_serializes_address_as_string() {
        let s = stats(1, 2, 3, 4);
        let value = serde_json::to_value(&s).unwrap();
        assert_eq!(value["address"], s.address.to_string());
        assert_eq!(value["usersClaimedTotal"], 4);
    }
}
