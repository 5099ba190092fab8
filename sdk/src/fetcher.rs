use async_trait::async_trait;
use solana_program::pubkey::Pubkey;
use solana_rpc_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{account::Account, commitment_config::CommitmentConfig};

use crate::error::DistributorError;

/// Read access to ledger accounts.
///
/// `Ok(None)` means the account does not exist. Transport failures are errors.
#[async_trait]
pub trait AccountFetcher: Send + Sync {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, DistributorError>;

    /// One entry per requested address, in request order.
    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, DistributorError>;
}

#[async_trait]
impl AccountFetcher for RpcClient {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Account>, DistributorError> {
        let response = self
            .get_account_with_commitment(address, CommitmentConfig::confirmed())
            .await
            .map_err(Box::new)?;
        Ok(response.value)
    }

    async fn get_multiple_accounts(
        &self,
        addresses: &[Pubkey],
    ) -> Result<Vec<Option<Account>>, DistributorError> {
        let accounts = RpcClient::get_multiple_accounts(self, addresses)
            .await
            .map_err(Box::new)?;
        Ok(accounts)
    }
}
