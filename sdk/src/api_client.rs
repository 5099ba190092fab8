use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode, Url};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use solana_program::pubkey::Pubkey;
use tracing::debug;

use crate::{config::ClaimApiConfig, error::ClaimApiError};

/// What the claim API serves for one claimant.
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimApiResponse {
    /// Distributor the claimant belongs to.
    #[serde_as(as = "DisplayFromStr")]
    pub merkle_tree: Pubkey,
    pub amount: u64,
    #[serde(deserialize_with = "deserialize_proof")]
    pub proof: Vec<[u8; 32]>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawProofNode {
    Bytes(Vec<u8>),
    Hex(String),
}

impl RawProofNode {
    fn into_node<E: de::Error>(self) -> Result<[u8; 32], E> {
        let bytes = match self {
            RawProofNode::Bytes(bytes) => bytes,
            RawProofNode::Hex(s) => {
                hex::decode(s.trim_start_matches("0x")).map_err(E::custom)?
            }
        };
        let len = bytes.len();
        bytes
            .try_into()
            .map_err(|_| E::custom(format!("proof node must be 32 bytes, got {len}")))
    }
}

/// Proof nodes arrive either as 32-element integer arrays or as 64-char hex strings.
fn deserialize_proof<'de, D>(deserializer: D) -> Result<Vec<[u8; 32]>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<RawProofNode>::deserialize(deserializer)?
        .into_iter()
        .map(RawProofNode::into_node)
        .collect()
}

#[async_trait]
pub trait ClaimApi: Send + Sync {
    async fn get_user_claim(&self, address: &Pubkey) -> Result<ClaimApiResponse, ClaimApiError>;
}

/// Client for the claim-serving HTTP API.
#[derive(Debug, Clone)]
pub struct HttpClaimApi {
    client: Client,
    config: ClaimApiConfig,
}

impl HttpClaimApi {
    pub fn new(config: ClaimApiConfig) -> Result<Self, ClaimApiError> {
        Url::parse(&config.base_url).map_err(|e| ClaimApiError::InvalidUrl(e.to_string()))?;

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn user_url(&self, address: &Pubkey) -> String {
        format!("{}/user/{}", self.config.base_url, address)
    }

    async fn handle_response(response: Response) -> Result<ClaimApiResponse, ClaimApiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            let status_code = status.as_u16();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            match status {
                StatusCode::NOT_FOUND => Err(ClaimApiError::NotFound(error_text)),
                StatusCode::TOO_MANY_REQUESTS => Err(ClaimApiError::RateLimitExceeded),
                _ => Err(ClaimApiError::api_error(status_code, error_text)),
            }
        }
    }
}

#[async_trait]
impl ClaimApi for HttpClaimApi {
    async fn get_user_claim(&self, address: &Pubkey) -> Result<ClaimApiResponse, ClaimApiError> {
        let url = self.user_url(address);
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        Self::handle_response(response).await
    }
}
