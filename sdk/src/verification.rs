//! Reconciles the claim API against the allocation list and, optionally, the local proof store.
//!
//! Addresses are checked in fixed-size batches. Inside a batch every lookup runs concurrently;
//! batches run strictly one after another with a pause in between to stay under the API's
//! rate limit. The first disagreement aborts the run.

use std::fmt;

use futures::future::try_join_all;
use jito_merkle_tree::{csv_entry::AllocationEntry, proof_store::ProofStore};
use solana_program::pubkey::Pubkey;
use tracing::{debug, info, instrument, warn};

use crate::{
    api_client::{ClaimApi, ClaimApiResponse},
    config::VerificationConfig,
    error::{AmountSource, VerificationError},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    Fetching,
    Checked,
    Failed,
}

impl fmt::Display for BatchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BatchState::Pending => "pending",
            BatchState::Fetching => "fetching",
            BatchState::Checked => "checked",
            BatchState::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub batches: usize,
    pub addresses_checked: usize,
}

/// Index of the first position where the two proofs disagree. When one proof is a prefix of
/// the other, that is the length of the shorter one.
pub fn first_proof_mismatch(expected: &[[u8; 32]], actual: &[[u8; 32]]) -> Option<usize> {
    expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .or_else(|| (expected.len() != actual.len()).then(|| expected.len().min(actual.len())))
}

/// Compare one API response against its allocation entry and the proof store, if any.
pub fn check_response(
    entry: &AllocationEntry,
    response: &ClaimApiResponse,
    proof_store: Option<&ProofStore>,
) -> Result<(), VerificationError> {
    let address = entry.address;

    if response.amount != entry.amount {
        return Err(VerificationError::AmountMismatch {
            address,
            source_kind: AmountSource::Csv,
            expected: entry.amount,
            actual: response.amount,
        });
    }

    let Some(proof_store) = proof_store else {
        return Ok(());
    };

    let stored = proof_store
        .get(&address)
        .ok_or(VerificationError::MissingInProofStore { address })?;

    if stored.amount != response.amount {
        return Err(VerificationError::AmountMismatch {
            address,
            source_kind: AmountSource::ProofStore,
            expected: stored.amount,
            actual: response.amount,
        });
    }

    if let Some(index) = first_proof_mismatch(&stored.proof, &response.proof) {
        return Err(VerificationError::ProofMismatch { address, index });
    }

    Ok(())
}

pub struct VerificationEngine<'a, C> {
    api: C,
    config: VerificationConfig,
    proof_store: Option<&'a ProofStore>,
}

impl<'a, C: ClaimApi> VerificationEngine<'a, C> {
    pub fn new(api: C, config: VerificationConfig) -> Self {
        Self {
            api,
            config,
            proof_store: None,
        }
    }

    pub fn with_proof_store(mut self, proof_store: &'a ProofStore) -> Self {
        self.proof_store = Some(proof_store);
        self
    }

    pub fn config(&self) -> &VerificationConfig {
        &self.config
    }

    #[instrument(skip_all, fields(addresses = entries.len()))]
    pub async fn run(
        &self,
        entries: &[AllocationEntry],
    ) -> Result<VerificationReport, VerificationError> {
        let batch_size = self.config.batch_size.max(1);
        let num_batches = entries.len().div_ceil(batch_size);
        let mut report = VerificationReport::default();

        for (i, batch) in entries.chunks(batch_size).enumerate() {
            if i > 0 {
                debug!(
                    "waiting {:?} before batch {}/{}",
                    self.config.batch_delay,
                    i + 1,
                    num_batches
                );
                tokio::time::sleep(self.config.batch_delay).await;
            }

            info!(batch = i + 1, state = %BatchState::Pending, "{} addresses", batch.len());
            info!(batch = i + 1, state = %BatchState::Fetching);

            match try_join_all(batch.iter().map(|entry| self.check_entry(entry))).await {
                Ok(_) => {
                    info!(batch = i + 1, state = %BatchState::Checked);
                    report.batches += 1;
                    report.addresses_checked += batch.len();
                }
                Err(e) => {
                    warn!(batch = i + 1, state = %BatchState::Failed, "{e}");
                    return Err(e);
                }
            }
        }

        info!(
            "verified {} addresses in {} batches",
            report.addresses_checked, report.batches
        );
        Ok(report)
    }

    async fn check_entry(&self, entry: &AllocationEntry) -> Result<(), VerificationError> {
        let response = get_user_claim_with_retry(&self.api, &entry.address, &self.config).await?;
        check_response(entry, &response, self.proof_store)
    }
}

/// Look up `address`, retrying failed requests up to `config.max_attempts` times in total
/// with a fixed `config.retry_delay` between attempts. Malformed bodies are not retried.
pub async fn get_user_claim_with_retry<C: ClaimApi + ?Sized>(
    api: &C,
    address: &Pubkey,
    config: &VerificationConfig,
) -> Result<ClaimApiResponse, VerificationError> {
    let max_attempts = config.max_attempts.max(1);
    let mut attempts = 0;

    loop {
        attempts += 1;
        match api.get_user_claim(address).await {
            Ok(response) => return Ok(response),
            Err(e) if attempts < max_attempts && e.is_retryable() => {
                warn!("attempt {attempts}/{max_attempts} for {address} failed: {e}");
                tokio::time::sleep(config.retry_delay).await;
            }
            Err(source) => {
                return Err(VerificationError::Network {
                    address: *address,
                    attempts,
                    source,
                })
            }
        }
    }
}
