use solana_program::pubkey::Pubkey;

pub const CLAIM_STATUS_SEED: &[u8] = b"ClaimStatus";

/// Address of the claim status record for `claimant` under `distributor`.
///
/// The first bump (from 255 down) that pushes the hash off the ed25519 curve wins, so the result
/// is a pure function of its inputs.
pub fn get_claim_status_pda(
    program_id: &Pubkey,
    claimant: &Pubkey,
    distributor: &Pubkey,
) -> (Pubkey, u8) {
    Pubkey::find_program_address(
        &[
            CLAIM_STATUS_SEED,
            claimant.to_bytes().as_ref(),
            distributor.to_bytes().as_ref(),
        ],
        program_id,
    )
}
