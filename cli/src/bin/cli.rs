mod instructions;

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use instructions::*;
use jito_distributor_sdk::{
    api_client::HttpClaimApi,
    client::DistributorClient,
    config::{ClaimApiConfig, VerificationConfig},
    verification::{get_user_claim_with_retry, VerificationEngine},
    MERKLE_DISTRIBUTOR_PROGRAM_ID,
};
use jito_merkle_tree::{csv_entry::AllocationEntry, proof_store::ProofStore};
use solana_program::{instruction::Instruction, pubkey::Pubkey};
use solana_rpc_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    signature::{read_keypair_file, Keypair},
    signer::Signer,
    transaction::Transaction,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Commands,

    /// RPC url
    #[clap(long, env, default_value = "http://localhost:8899")]
    pub rpc_url: String,

    /// Program id
    #[clap(long, env, default_value_t = MERKLE_DISTRIBUTOR_PROGRAM_ID)]
    pub program_id: Pubkey,

    /// Payer keypair
    #[clap(long, env)]
    pub keypair_path: Option<PathBuf>,
}

impl Args {
    fn rpc_client(&self) -> RpcClient {
        RpcClient::new_with_commitment(self.rpc_url.clone(), CommitmentConfig::confirmed())
    }

    fn distributor_client(&self) -> DistributorClient<RpcClient> {
        DistributorClient::new(self.rpc_client(), self.program_id)
    }

    fn read_keypair(&self) -> Result<Keypair> {
        let path = self
            .keypair_path
            .as_ref()
            .ok_or_else(|| anyhow!("--keypair-path (or KEYPAIR_PATH) is required"))?;
        read_keypair_file(path)
            .map_err(|e| anyhow!("failed reading keypair file {}: {e}", path.display()))
    }
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print claim progress of one distributor
    GetDistributorStats(GetDistributorStatsArgs),
    /// Print claim progress summed over every distributor in a JSON file
    GetAllDistributorsStats(GetAllDistributorsStatsArgs),
    /// Print whether a user has claimed from a distributor
    GetUserClaimed(GetUserClaimedArgs),
    /// Print whether a distributor accepts claims at a slot
    IsClaimable(IsClaimableArgs),
    /// Look users up in the claim API and report whether they claimed
    CheckUserClaimStatus(CheckUserClaimStatusArgs),
    /// Claim the keypair's allocation as served by the claim API
    Claim(ClaimArgs),
    /// Check the claim API against the allocation CSV and, optionally, the merkle trees
    CheckApiReturnsAllKeys(CheckApiReturnsAllKeysArgs),
}

#[derive(Parser, Debug)]
pub struct GetDistributorStatsArgs {
    #[clap(long, env)]
    pub distributor_address: Pubkey,
}

#[derive(Parser, Debug)]
pub struct GetAllDistributorsStatsArgs {
    /// JSON array of distributor addresses
    #[clap(long, env)]
    pub distributors_file: PathBuf,
}

#[derive(Parser, Debug)]
pub struct GetUserClaimedArgs {
    #[clap(long, env)]
    pub distributor_address: Pubkey,
    #[clap(long, env)]
    pub user_address: Pubkey,
}

#[derive(Parser, Debug)]
pub struct IsClaimableArgs {
    #[clap(long, env)]
    pub distributor_address: Pubkey,
    /// Defaults to the current slot
    #[clap(long, env)]
    pub slot: Option<u64>,
}

#[derive(Parser, Debug)]
#[clap(group(
    ArgGroup::new("users")
        .required(true)
        .args(["user_address", "user_address_file"])
))]
pub struct CheckUserClaimStatusArgs {
    #[clap(long, env)]
    pub api_url_base: String,
    #[clap(long, env)]
    pub user_address: Option<Pubkey>,
    /// JSON array of user addresses
    #[clap(long, env)]
    pub user_address_file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ClaimMode {
    /// Simulate the transaction and print the logs
    Simulate,
    /// Send the transaction
    Execute,
}

#[derive(Parser, Debug)]
pub struct ClaimArgs {
    #[clap(long, env)]
    pub api_url: String,
    #[clap(long, value_enum, default_value_t = ClaimMode::Simulate)]
    pub mode: ClaimMode,
    /// Multiple of the base compute unit price, execute mode only
    #[clap(long, env, default_value_t = 1)]
    pub priority_fee_multiplier: u64,
}

#[derive(Parser, Debug)]
pub struct CheckApiReturnsAllKeysArgs {
    #[clap(long, env)]
    pub api_url: String,
    /// `pubkey,amount` allocation list
    #[clap(long, env)]
    pub csv_path: PathBuf,
    #[clap(long, env)]
    pub decimals_in_csv: u32,
    /// Directory of merkle tree files
    #[clap(long, env)]
    pub merkle_tree_path: Option<PathBuf>,
}

/// Read a JSON array of base58 addresses.
fn read_pubkeys_file(path: &Path) -> Result<Vec<Pubkey>> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let addresses: Vec<String> = serde_json::from_str(&raw)?;
    addresses
        .iter()
        .map(|a| Pubkey::from_str(a).map_err(|e| anyhow!("invalid address {a}: {e}")))
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    match &args.command {
        Commands::GetDistributorStats(stats_args) => {
            process_get_distributor_stats(&args, stats_args).await?;
        }
        Commands::GetAllDistributorsStats(stats_args) => {
            process_get_all_distributors_stats(&args, stats_args).await?;
        }
        Commands::GetUserClaimed(user_claimed_args) => {
            process_get_user_claimed(&args, user_claimed_args).await?;
        }
        Commands::IsClaimable(is_claimable_args) => {
            process_is_claimable(&args, is_claimable_args).await?;
        }
        Commands::CheckUserClaimStatus(claim_status_args) => {
            process_check_user_claim_status(&args, claim_status_args).await?;
        }
        Commands::Claim(claim_args) => {
            process_claim(&args, claim_args).await?;
        }
        Commands::CheckApiReturnsAllKeys(verify_args) => {
            process_check_api_returns_all_keys(verify_args).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, CommandFactory};

    use super::*;

    #[test]
    fn test_args_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_check_user_claim_status_takes_exactly_one_source() {
        let user = Pubkey::new_unique().to_string();
        let base = [
            "cli",
            "check-user-claim-status",
            "--api-url-base",
            "http://localhost:7001",
        ];

        let parsed = Args::try_parse_from(base.iter().copied().chain(["--user-address", &user]))
            .unwrap();
        match parsed.command {
            Commands::CheckUserClaimStatus(a) => {
                assert_eq!(a.user_address.map(|p| p.to_string()), Some(user.clone()));
                assert!(a.user_address_file.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }

        let err = Args::try_parse_from(base.iter().copied().chain([
            "--user-address",
            &user,
            "--user-address-file",
            "users.json",
        ]))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);

        let err = Args::try_parse_from(base).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }
}
