pub mod airdrop_merkle_tree;
pub mod csv_entry;
pub mod error;
pub mod proof_store;
pub mod tree_node;
pub mod utils;
