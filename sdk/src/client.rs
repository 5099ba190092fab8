use solana_program::{instruction::Instruction, pubkey::Pubkey};
use solana_sdk::account::Account;
use solana_sdk_ids::system_program;
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account,
};
use tracing::{debug, info, instrument};

use crate::{
    error::DistributorError,
    fetcher::AccountFetcher,
    instruction::{new_claim, NewClaimAccounts, NewClaimArgs},
    pda::get_claim_status_pda,
    state::{claim_status::ClaimStatus, merkle_distributor::MerkleDistributor, AccountRecord},
    stats::{DistributionStats, DistributorStats},
};

/// An account with no data is treated the same as a missing one.
fn account_exists(account: &Option<Account>) -> bool {
    account.as_ref().is_some_and(|a| !a.data.is_empty())
}

/// Reads distributor state and builds claim instructions for one program deployment.
pub struct DistributorClient<F> {
    fetcher: F,
    program_id: Pubkey,
}

impl<F: AccountFetcher> DistributorClient<F> {
    pub fn new(fetcher: F, program_id: Pubkey) -> Self {
        Self {
            fetcher,
            program_id,
        }
    }

    pub fn program_id(&self) -> &Pubkey {
        &self.program_id
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    fn decode<T: AccountRecord>(
        &self,
        address: &Pubkey,
        account: &Account,
    ) -> Result<T, DistributorError> {
        T::decode_account(account, &self.program_id).map_err(|source| DistributorError::Decode {
            address: *address,
            source,
        })
    }

    #[instrument(skip(self))]
    pub async fn fetch_distributor(
        &self,
        address: &Pubkey,
    ) -> Result<MerkleDistributor, DistributorError> {
        let account = self
            .fetcher
            .get_account(address)
            .await?
            .ok_or(DistributorError::NotFound(*address))?;
        self.decode(address, &account)
    }

    /// Fetch many distributors in one round trip. Missing accounts come back as `None`;
    /// an account owned by another program or failing to decode errors the whole call.
    #[instrument(skip_all, fields(count = addresses.len()))]
    pub async fn fetch_distributors(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<MerkleDistributor>>, DistributorError> {
        let accounts = self.fetcher.get_multiple_accounts(addresses).await?;
        if accounts.len() != addresses.len() {
            return Err(DistributorError::BatchLengthMismatch {
                requested: addresses.len(),
                returned: accounts.len(),
            });
        }

        addresses
            .iter()
            .zip(accounts)
            .map(|(address, account)| match account {
                Some(account) => self.decode(address, &account).map(Some),
                None => Ok(None),
            })
            .collect()
    }

    /// Whether claims against `distributor` are open at `now_slot`.
    pub async fn is_claimable(
        &self,
        distributor: &Pubkey,
        now_slot: u64,
    ) -> Result<bool, DistributorError> {
        let distributor = self.fetch_distributor(distributor).await?;
        Ok(distributor.is_claimable_at(now_slot))
    }

    /// Existence check on the claim status PDA. The record is not decoded.
    #[instrument(skip(self))]
    pub async fn has_claimed(
        &self,
        claimant: &Pubkey,
        distributor: &Pubkey,
    ) -> Result<bool, DistributorError> {
        let (claim_status, _bump) = get_claim_status_pda(&self.program_id, claimant, distributor);
        let account = self.fetcher.get_account(&claim_status).await?;
        Ok(account_exists(&account))
    }

    pub async fn claim_status(
        &self,
        claimant: &Pubkey,
        distributor: &Pubkey,
    ) -> Result<Option<ClaimStatus>, DistributorError> {
        let (claim_status, _bump) = get_claim_status_pda(&self.program_id, claimant, distributor);
        match self.fetcher.get_account(&claim_status).await? {
            Some(account) if !account.data.is_empty() => {
                self.decode(&claim_status, &account).map(Some)
            }
            _ => Ok(None),
        }
    }

    /// Instructions for `claimant` to claim `amount_unlocked` from `distributor`.
    ///
    /// When the claimant has no token account for the distributor's mint yet, an
    /// instruction creating it (paid by the claimant) comes first.
    #[instrument(skip(self, proof), fields(proof_len = proof.len()))]
    pub async fn build_claim(
        &self,
        distributor: &Pubkey,
        claimant: &Pubkey,
        amount_unlocked: u64,
        proof: Vec<[u8; 32]>,
    ) -> Result<Vec<Instruction>, DistributorError> {
        let merkle_distributor = self.fetch_distributor(distributor).await?;
        let claimant_ata = get_associated_token_address(claimant, &merkle_distributor.mint);
        let (claim_status, _bump) = get_claim_status_pda(&self.program_id, claimant, distributor);

        let mut ixs = Vec::with_capacity(2);
        let ata_account = self.fetcher.get_account(&claimant_ata).await?;
        if !account_exists(&ata_account) {
            debug!("creating token account {claimant_ata} for {claimant}");
            ixs.push(create_associated_token_account(
                claimant,
                claimant,
                &merkle_distributor.mint,
                &spl_token::ID,
            ));
        }

        ixs.push(new_claim(
            &self.program_id,
            &NewClaimArgs {
                amount_unlocked,
                amount_locked: 0,
                proof,
            },
            &NewClaimAccounts {
                distributor: *distributor,
                claim_status,
                from: merkle_distributor.token_vault,
                to: claimant_ata,
                claimant: *claimant,
                token_program: spl_token::ID,
                system_program: system_program::ID,
            },
        )?);

        Ok(ixs)
    }

    pub async fn stats_for(&self, distributor: &Pubkey) -> Result<DistributorStats, DistributorError> {
        let merkle_distributor = self.fetch_distributor(distributor).await?;
        DistributorStats::from_distributor(*distributor, &merkle_distributor)
    }

    /// All-or-nothing: any missing distributor fails the call.
    #[instrument(skip_all, fields(count = distributors.len()))]
    pub async fn stats_for_many(
        &self,
        distributors: &[Pubkey],
    ) -> Result<DistributionStats, DistributorError> {
        let fetched = self.fetch_distributors(distributors).await?;

        let stats = distributors
            .iter()
            .zip(fetched)
            .map(|(address, distributor)| {
                let distributor = distributor.ok_or(DistributorError::NotFound(*address))?;
                DistributorStats::from_distributor(*address, &distributor)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = DistributionStats::aggregate(stats)?;
        info!(
            "{} distributors: claimed {} of {} users",
            total.distributors.len(),
            total.users_claimed_total,
            total.users_total
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    use async_trait::async_trait;

    use super::*;
    use crate::error::DecodeError;

    #[derive(Default)]
    struct FakeFetcher {
        accounts: HashMap<Pubkey, Account>,
        batch_calls: AtomicUsize,
    }

    impl FakeFetcher {
        fn insert(&mut self, address: Pubkey, owner: Pubkey, data: Vec<u8>) {
            self.accounts.insert(
                address,
                Account {
                    lamports: 1_000_000,
                    data,
                    owner,
                    executable: false,
                    rent_epoch: 0,
                },
            );
        }
    }

    #[async_trait]
    impl AccountFetcher for FakeFetcher {
        async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, DistributorError> {
            Ok(self.accounts.get(address).cloned())
        }

        async fn get_multiple_accounts(
            &self,
            addresses: &[Pubkey],
        ) -> Result<Vec<Option<Account>>, DistributorError> {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            Ok(addresses
                .iter()
                .map(|a| self.accounts.get(a).cloned())
                .collect())
        }
    }

    struct Fixture {
        program_id: Pubkey,
        distributor: Pubkey,
        mint: Pubkey,
        token_vault: Pubkey,
        fetcher: FakeFetcher,
    }

    fn fixture() -> Fixture {
        let program_id = Pubkey::new_unique();
        let distributor = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let token_vault = Pubkey::new_unique();

        let mut fetcher = FakeFetcher::default();
        fetcher.insert(
            distributor,
            program_id,
            MerkleDistributor {
                mint,
                token_vault,
                max_total_claim: 3_000_000,
                total_amount_claimed: 1_000_000,
                max_num_nodes: 100,
                num_nodes_claimed: 40,
                enable_slot: 100,
                ..MerkleDistributor::default()
            }
            .encode()
            .unwrap(),
        );

        Fixture {
            program_id,
            distributor,
            mint,
            token_vault,
            fetcher,
        }
    }

    #[tokio::test]
    async fn test_is_claimable() {
        let f = fixture();
        let client = DistributorClient::new(f.fetcher, f.program_id);

        assert!(!client.is_claimable(&f.distributor, 99).await.unwrap());
        assert!(!client.is_claimable(&f.distributor, 100).await.unwrap());
        assert!(client.is_claimable(&f.distributor, 101).await.unwrap());

        let missing = Pubkey::new_unique();
        let err = client.is_claimable(&missing, 101).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_distributor_wrong_owner() {
        let f = fixture();
        let client = DistributorClient::new(f.fetcher, Pubkey::new_unique());

        let err = client.fetch_distributor(&f.distributor).await.unwrap_err();
        assert!(matches!(
            err,
            DistributorError::Decode {
                source: DecodeError::UnexpectedOwner { .. },
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_has_claimed() {
        let mut f = fixture();
        let claimed = Pubkey::new_unique();
        let unclaimed = Pubkey::new_unique();
        let (pda, _) = get_claim_status_pda(&f.program_id, &claimed, &f.distributor);
        f.fetcher.insert(
            pda,
            f.program_id,
            ClaimStatus {
                claimant: claimed,
                unlocked_amount: 500,
                ..ClaimStatus::default()
            }
            .encode()
            .unwrap(),
        );

        let client = DistributorClient::new(f.fetcher, f.program_id);
        assert!(client.has_claimed(&claimed, &f.distributor).await.unwrap());
        assert!(!client.has_claimed(&unclaimed, &f.distributor).await.unwrap());

        let status = client
            .claim_status(&claimed, &f.distributor)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(status.claimant, claimed);
        assert_eq!(status.unlocked_amount, 500);
        assert!(client
            .claim_status(&unclaimed, &f.distributor)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_build_claim_creates_missing_token_account() {
        let f = fixture();
        let claimant = Pubkey::new_unique();
        let (distributor, program_id, mint, token_vault) =
            (f.distributor, f.program_id, f.mint, f.token_vault);
        let client = DistributorClient::new(f.fetcher, program_id);

        let ixs = client
            .build_claim(&distributor, &claimant, 1_000, vec![[1; 32]])
            .await
            .unwrap();

        assert_eq!(ixs.len(), 2);
        assert_eq!(ixs[0].program_id, spl_associated_token_account::ID);

        let claim = &ixs[1];
        let ata = get_associated_token_address(&claimant, &mint);
        let (claim_status, _) = get_claim_status_pda(&program_id, &claimant, &distributor);
        assert_eq!(claim.program_id, program_id);
        assert_eq!(claim.accounts[0].pubkey, distributor);
        assert_eq!(claim.accounts[1].pubkey, claim_status);
        assert_eq!(claim.accounts[2].pubkey, token_vault);
        assert_eq!(claim.accounts[3].pubkey, ata);
        assert_eq!(claim.accounts[4].pubkey, claimant);
        assert_eq!(&claim.data[8..16], &1_000u64.to_le_bytes());
        assert_eq!(&claim.data[16..24], &0u64.to_le_bytes());
    }

    #[tokio::test]
    async fn test_build_claim_existing_token_account() {
        let mut f = fixture();
        let claimant = Pubkey::new_unique();
        let ata = get_associated_token_address(&claimant, &f.mint);
        f.fetcher.insert(ata, spl_token::ID, vec![0; 165]);

        let client = DistributorClient::new(f.fetcher, f.program_id);
        let ixs = client
            .build_claim(&f.distributor, &claimant, 1_000, vec![])
            .await
            .unwrap();
        assert_eq!(ixs.len(), 1);
        assert_eq!(ixs[0].program_id, f.program_id);
    }

    #[tokio::test]
    async fn test_build_claim_missing_distributor() {
        let f = fixture();
        let client = DistributorClient::new(f.fetcher, f.program_id);
        let err = client
            .build_claim(&Pubkey::new_unique(), &Pubkey::new_unique(), 1, vec![])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_stats_for() {
        let f = fixture();
        let client = DistributorClient::new(f.fetcher, f.program_id);
        let stats = client.stats_for(&f.distributor).await.unwrap();

        assert_eq!(stats.claimed_total, 1_000_000);
        assert_eq!(stats.remaining_total, 2_000_000);
        assert_eq!(stats.users_total, 100);
        assert_eq!(stats.users_claimed_total, 40);
    }

    #[tokio::test]
    async fn test_stats_for_many_single_round_trip() {
        let mut f = fixture();
        let second = Pubkey::new_unique();
        f.fetcher.insert(
            second,
            f.program_id,
            MerkleDistributor {
                max_total_claim: 500,
                total_amount_claimed: 100,
                max_num_nodes: 5,
                num_nodes_claimed: 1,
                ..MerkleDistributor::default()
            }
            .encode()
            .unwrap(),
        );

        let client = DistributorClient::new(f.fetcher, f.program_id);
        let stats = client
            .stats_for_many(&[f.distributor, second])
            .await
            .unwrap();

        assert_eq!(client.fetcher().batch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(stats.claimed_total, 1_000_100);
        assert_eq!(stats.remaining_total, 2_000_400);
        assert_eq!(stats.users_total, 105);
        assert_eq!(stats.users_claimed_total, 41);
        assert_eq!(stats.distributors[1].address, second);
    }

    #[tokio::test]
    async fn test_stats_for_many_fails_on_missing() {
        let f = fixture();
        let missing = Pubkey::new_unique();
        let client = DistributorClient::new(f.fetcher, f.program_id);

        let err = client
            .stats_for_many(&[f.distributor, missing])
            .await
            .unwrap_err();
        assert!(matches!(err, DistributorError::NotFound(address) if address == missing));
    }

    #[tokio::test]
    async fn test_fetch_distributors_rejects_foreign_account() {
        let mut f = fixture();
        let foreign = Pubkey::new_unique();
        f.fetcher.insert(
            foreign,
            Pubkey::new_unique(),
            MerkleDistributor::default().encode().unwrap(),
        );
        let missing = Pubkey::new_unique();

        let client = DistributorClient::new(f.fetcher, f.program_id);
        let fetched = client
            .fetch_distributors(&[f.distributor, missing])
            .await
            .unwrap();
        assert!(fetched[0].is_some());
        assert!(fetched[1].is_none());

        let err = client
            .fetch_distributors(&[f.distributor, foreign])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DistributorError::Decode {
                source: DecodeError::UnexpectedOwner { .. },
                ..
            }
        ));
    }
}
