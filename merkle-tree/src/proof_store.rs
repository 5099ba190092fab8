//! Flattened view over a directory of merkle tree files.

use std::{
    collections::{hash_map::Entry, HashMap},
    fs,
    path::Path,
};

use solana_program::pubkey::Pubkey;
use tracing::{debug, info};

use crate::{airdrop_merkle_tree::AirdropMerkleTree, error::MerkleTreeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofStoreEntry {
    pub amount: u64,
    pub proof: Vec<[u8; 32]>,
}

/// Claimant -> `{amount, proof}` across every tree in a directory. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct ProofStore {
    entries: HashMap<Pubkey, ProofStoreEntry>,
}

impl ProofStore {
    /// Load every file in `dir` as an [AirdropMerkleTree].
    ///
    /// A subdirectory, a file failing validation, or a claimant present in two files is an error.
    pub fn load_dir(dir: &Path) -> Result<Self, MerkleTreeError> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                return Err(MerkleTreeError::UnexpectedDirectory(entry.path()));
            }
            paths.push(entry.path());
        }
        paths.sort();

        let mut store = ProofStore::default();
        for path in paths {
            let tree = AirdropMerkleTree::new_from_file(&path)?;
            tree.validate()?;
            debug!(
                "loaded {:?}: {} nodes, version {}",
                path, tree.max_num_nodes, tree.airdrop_version
            );

            for node in tree.tree_nodes {
                // validate() guarantees every node carries a proof
                let proof = node.proof.unwrap_or_default();
                match store.entries.entry(node.claimant) {
                    Entry::Occupied(_) => {
                        return Err(MerkleTreeError::DuplicateClaimant {
                            claimant: node.claimant,
                            path,
                        })
                    }
                    Entry::Vacant(v) => {
                        v.insert(ProofStoreEntry {
                            amount: node.amount,
                            proof,
                        });
                    }
                }
            }
        }

        info!("proof store loaded with {} claimants", store.len());
        Ok(store)
    }

    pub fn get(&self, claimant: &Pubkey) -> Option<&ProofStoreEntry> {
        self.entries.get(claimant)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Pubkey, ProofStoreEntry)> for ProofStore {
    fn from_iter<T: IntoIterator<Item = (Pubkey, ProofStoreEntry)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
