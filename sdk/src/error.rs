use std::fmt;

use solana_program::pubkey::Pubkey;
use solana_rpc_client_api::client_error::Error as ClientError;
use thiserror::Error;

/// Errors raised while turning raw account bytes into a record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Bad discriminator: expected {expected:?}, found {found:?}")]
    BadDiscriminator { expected: [u8; 8], found: [u8; 8] },

    #[error("Truncated buffer: expected at least {expected} bytes, got {actual}")]
    TruncatedBuffer { expected: usize, actual: usize },

    #[error("Account is owned by {found}, expected {expected}")]
    UnexpectedOwner { expected: Pubkey, found: Pubkey },

    #[error("Malformed account data: {0}")]
    Malformed(String),
}

#[derive(Error, Debug)]
pub enum DistributorError {
    #[error("Account {0} not found")]
    NotFound(Pubkey),

    #[error("Failed to decode account {address}: {source}")]
    Decode {
        address: Pubkey,
        #[source]
        source: DecodeError,
    },

    #[error("Rpc Error: {0}")]
    RpcError(#[from] Box<ClientError>),

    #[error("Requested {requested} accounts but the rpc returned {returned}")]
    BatchLengthMismatch { requested: usize, returned: usize },

    #[error("Distributor {address} is inconsistent: {reason}")]
    InconsistentState { address: Pubkey, reason: String },

    #[error("Arithmetic Error (overflow/underflow)")]
    ArithmeticError,

    #[error("Serialization Error: {0}")]
    SerializationError(#[from] std::io::Error),
}

impl DistributorError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, DistributorError::NotFound(_))
    }
}

/// Errors returned by the claim-serving API client.
#[derive(Error, Debug)]
pub enum ClaimApiError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The body did not match the expected response shape
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// API returned an error response
    #[error("API error: {status_code} - {message}")]
    ApiError { status_code: u16, message: String },

    /// Address unknown to the API
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClaimApiError {
    pub fn api_error(status_code: u16, message: impl Into<String>) -> Self {
        ClaimApiError::ApiError {
            status_code,
            message: message.into(),
        }
    }

    /// A malformed body or URL will not get better on a second try.
    pub fn is_retryable(&self) -> bool {
        !matches!(
            self,
            ClaimApiError::JsonError(_) | ClaimApiError::InvalidUrl(_)
        )
    }
}

/// Which reference source disagreed with the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    Csv,
    ProofStore,
}

impl fmt::Display for AmountSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountSource::Csv => write!(f, "csv"),
            AmountSource::ProofStore => write!(f, "proof store"),
        }
    }
}

/// Consistency and transport failures from the verification engine. All of them abort the run.
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("Amount mismatch for {address}: {source_kind} has {expected}, api returned {actual}")]
    AmountMismatch {
        address: Pubkey,
        source_kind: AmountSource,
        expected: u64,
        actual: u64,
    },

    #[error("{address} not found in proof store")]
    MissingInProofStore { address: Pubkey },

    #[error("Proof mismatch for {address} at index {index}")]
    ProofMismatch { address: Pubkey, index: usize },

    #[error("Claim API request for {address} failed after {attempts} attempt(s): {source}")]
    Network {
        address: Pubkey,
        attempts: u32,
        #[source]
        source: ClaimApiError,
    },
}

impl VerificationError {
    pub fn address(&self) -> &Pubkey {
        match self {
            VerificationError::AmountMismatch { address, .. }
            | VerificationError::MissingInProofStore { address }
            | VerificationError::ProofMismatch { address, .. }
            | VerificationError::Network { address, .. } => address,
        }
    }
}
