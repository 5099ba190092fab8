pub mod api_client;
pub mod client;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod instruction;
pub mod pda;
pub mod state;
pub mod stats;
pub mod verification;

use solana_program::{pubkey, pubkey::Pubkey};

/// Mainnet deployment of the merkle distributor program.
pub const MERKLE_DISTRIBUTOR_PROGRAM_ID: Pubkey =
    pubkey!("meRjbQXFNf5En86FXT2YPz1dQzLj4Yb3xK8u1MVgqpb");
