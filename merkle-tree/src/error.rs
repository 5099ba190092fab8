use std::path::PathBuf;

use solana_program::pubkey::Pubkey;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MerkleTreeError {
    #[error("Merkle Tree Validation Error: {0}")]
    MerkleValidationError(String),
    #[error("io Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serde Error: {0}")]
    SerdeError(#[from] serde_json::Error),
    #[error("Csv Error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("Invalid pubkey: {0}")]
    InvalidPubkey(String),
    #[error("Invalid amount {amount:?}: {reason}")]
    InvalidAmount { amount: String, reason: String },
    #[error("Unexpected directory {0:?} in proof store")]
    UnexpectedDirectory(PathBuf),
    #[error("Claimant {claimant} appears more than once, last seen in {path:?}")]
    DuplicateClaimant { claimant: Pubkey, path: PathBuf },
}
