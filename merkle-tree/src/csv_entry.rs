use std::{fs::File, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};
use solana_program::pubkey::Pubkey;

use crate::{error::MerkleTreeError, utils::ui_amount_to_token_amount};

pub type Result<T> = std::result::Result<T, MerkleTreeError>;

/// Represents a single entry in a CSV
#[derive(Debug, Clone, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct CsvEntry {
    /// Pubkey of the claimant; will be responsible for signing the claim
    pub pubkey: String,
    /// ui amount, kept as text so it can be scaled exactly
    pub amount: String,
}

impl CsvEntry {
    pub fn new_from_file(path: &Path) -> Result<Vec<Self>> {
        let file = File::open(path)?;
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut entries = Vec::new();
        for result in rdr.deserialize() {
            let record: CsvEntry = result?;
            entries.push(record);
        }

        Ok(entries)
    }
}

/// One claimant's allocation in token units.
#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
pub struct AllocationEntry {
    pub address: Pubkey,
    pub amount: u64,
}

impl AllocationEntry {
    pub fn from_csv_entry(entry: &CsvEntry, decimals: u32) -> Result<Self> {
        let address = Pubkey::from_str(&entry.pubkey)
            .map_err(|_| MerkleTreeError::InvalidPubkey(entry.pubkey.clone()))?;
        let amount = ui_amount_to_token_amount(&entry.amount, decimals)?;
        Ok(Self { address, amount })
    }

    /// Load a `pubkey,amount` allocation list, scaling every amount by `decimals`.
    pub fn load_csv(path: &Path, decimals: u32) -> Result<Vec<Self>> {
        CsvEntry::new_from_file(path)?
            .iter()
            .map(|entry| Self::from_csv_entry(entry, decimals))
            .collect()
    }
}
