use std::{
    collections::HashSet,
    fs::File,
    io::{BufReader, Write},
    path::Path,
    result,
};

use serde::{Deserialize, Serialize};

use crate::{
    error::{MerkleTreeError, MerkleTreeError::MerkleValidationError},
    tree_node::TreeNode,
    utils::get_max_total_claim,
};

/// Merkle Tree which will be used to distribute tokens to claimants.
/// Contains all the information necessary to verify claims against the Merkle Tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirdropMerkleTree {
    /// The merkle root, which is uploaded on-chain
    pub merkle_root: [u8; 32],
    #[serde(default)]
    pub airdrop_version: u64,
    pub max_num_nodes: u64,
    pub max_total_claim: u64,
    pub tree_nodes: Vec<TreeNode>,
}

pub type Result<T> = result::Result<T, MerkleTreeError>;

impl AirdropMerkleTree {
    /// Load a serialized merkle tree from file path
    pub fn new_from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let tree: AirdropMerkleTree = serde_json::from_reader(reader)?;

        Ok(tree)
    }

    /// Write a merkle tree to a filepath
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let serialized = serde_json::to_string_pretty(&self)?;
        let mut file = File::create(path)?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }

    /// Structural checks on a tree produced by the external builder. Proofs are not
    /// re-derived here, only required to be present.
    pub fn validate(&self) -> Result<()> {
        // The Merkle tree can be at most height 32, implying a max node count of 2^32 - 1
        if self.max_num_nodes > 2u64.pow(32) - 1 {
            return Err(MerkleValidationError(format!(
                "Max num nodes {} is greater than 2^32 - 1",
                self.max_num_nodes
            )));
        }

        // validate that the length is equal to the max_num_nodes
        if self.tree_nodes.len() as u64 != self.max_num_nodes {
            return Err(MerkleValidationError(format!(
                "Tree nodes length {} does not match max_num_nodes {}",
                self.tree_nodes.len(),
                self.max_num_nodes
            )));
        }

        // validate that there are no duplicate claimants
        let unique_nodes: HashSet<_> = self.tree_nodes.iter().map(|n| n.claimant).collect();
        if unique_nodes.len() != self.tree_nodes.len() {
            return Err(MerkleValidationError(
                "Duplicate claimants found".to_string(),
            ));
        }

        // validate that sum is equal to max_total_claim
        let sum = get_max_total_claim(&self.tree_nodes).ok_or_else(|| {
            MerkleValidationError("Tree nodes sum overflows u64".to_string())
        })?;
        if sum != self.max_total_claim {
            return Err(MerkleValidationError(format!(
                "Tree nodes sum {} does not match max_total_claim {}",
                sum, self.max_total_claim
            )));
        }

        if let Some(node) = self.tree_nodes.iter().find(|n| n.proof.is_none()) {
            return Err(MerkleValidationError(format!(
                "Claimant {} has no proof",
                node.claimant
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use solana_program::pubkey::Pubkey;

    use super::*;

    pub(crate) fn new_test_tree(amounts: &[u64]) -> AirdropMerkleTree {
        let tree_nodes: Vec<TreeNode> = amounts
            .iter()
            .enumerate()
            .map(|(i, amount)| TreeNode {
                claimant: Pubkey::new_unique(),
                amount: *amount,
                proof: Some(vec![[i as u8; 32], [0xff; 32]]),
            })
            .collect();

        AirdropMerkleTree {
            merkle_root: [9; 32],
            airdrop_version: 0,
            max_num_nodes: tree_nodes.len() as u64,
            max_total_claim: amounts.iter().sum(),
            tree_nodes,
        }
    }

    #[test]
    fn test_write_and_read_merkle_tree_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("merkle_tree.json");

        let tree = new_test_tree(&[100 * u64::pow(10, 9), 200, 300]);
        tree.write_to_file(&path).unwrap();

        let read = AirdropMerkleTree::new_from_file(&path).unwrap();
        assert_eq!(read.tree_nodes.len(), 3);
        assert_eq!(read.merkle_root, tree.merkle_root);
        assert_eq!(read.tree_nodes, tree.tree_nodes);
        assert!(read.validate().is_ok());
    }

    #[test]
    fn test_validate_node_count() {
        let mut tree = new_test_tree(&[1, 2]);
        tree.max_num_nodes = 3;
        assert!(matches!(tree.validate(), Err(MerkleValidationError(_))));
    }

    #[test]
    fn test_validate_total_claim() {
        let mut tree = new_test_tree(&[1, 2]);
        tree.max_total_claim = 4;
        assert!(matches!(tree.validate(), Err(MerkleValidationError(_))));
    }

    #[test]
    fn test_validate_duplicate_claimants() {
        let mut tree = new_test_tree(&[1, 2]);
        tree.tree_nodes[1].claimant = tree.tree_nodes[0].claimant;
        assert!(matches!(tree.validate(), Err(MerkleValidationError(_))));
    }

    #[test]
    fn test_validate_missing_proof() {
        let mut tree = new_test_tree(&[1, 2]);
        tree.tree_nodes[0].proof = None;
        assert!(matches!(tree.validate(), Err(MerkleValidationError(_))));
    }
}
