//! Ledger node HTTP client with timeout and error handling.
//!
//! # Responsibilities
//! - Submit signed transactions in commit mode
//! - Fetch committed transactions by id
//! - Bound every call by the configured timeout
//! - Map transport, status and decoding failures to `LedgerError`

use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

use crate::ledger::transaction::SignedTransaction;
use crate::ledger::types::{
    LedgerConfig, LedgerError, LedgerResult, TransactionId, TransactionRecord,
};

/// Error body the node returns alongside 4xx/5xx statuses.
#[derive(Debug, Deserialize)]
struct NodeErrorBody {
    message: String,
}

/// Commit response; the node echoes the accepted transaction.
#[derive(Debug, Deserialize)]
struct CommitResponse {
    id: TransactionId,
}

/// Client for a single ledger node.
#[derive(Clone)]
pub struct LedgerClient {
    http: reqwest::Client,
    /// Base API URL, always ending in '/'.
    base: Url,
    config: LedgerConfig,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl LedgerClient {
    /// Create a new ledger client.
    ///
    /// No request is made; an unreachable node surfaces on first use.
    pub fn new(config: LedgerConfig) -> LedgerResult<Self> {
        let mut base: Url = config.api_url.parse().map_err(|e| {
            LedgerError::InvalidEndpoint(format!("'{}': {}", config.api_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(LedgerError::InvalidEndpoint(format!(
                "'{}' cannot be used as a base URL",
                config.api_url
            )));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| LedgerError::Network(format!("failed to build HTTP client: {}", e)))?;

        tracing::info!(
            api_url = %base,
            timeout_secs = config.request_timeout_secs,
            "Ledger client initialized"
        );

        Ok(Self {
            http,
            base,
            timeout_duration: Duration::from_secs(config.request_timeout_secs),
            config,
        })
    }

    /// Endpoint for commit-mode submission.
    pub fn commit_url(&self) -> LedgerResult<Url> {
        let mut url = self.endpoint("transactions")?;
        url.set_query(Some("mode=commit"));
        Ok(url)
    }

    /// Endpoint for fetching one transaction.
    pub fn transaction_url(&self, id: &TransactionId) -> LedgerResult<Url> {
        self.endpoint(&format!("transactions/{}", id))
    }

    fn endpoint(&self, path: &str) -> LedgerResult<Url> {
        self.base
            .join(path)
            .map_err(|e| LedgerError::InvalidEndpoint(format!("{}{}: {}", self.base, path, e)))
    }

    /// Submit a signed transaction and wait for the node to report commit.
    pub async fn submit_commit(&self, tx: &SignedTransaction) -> LedgerResult<TransactionId> {
        let url = self.commit_url()?;
        let body = tx.to_json()?;

        tracing::debug!(tx_id = %tx.id(), url = %url, "Submitting transaction");

        let (status, text) = self.call(self.http.post(url).json(&body)).await?;

        if !status.is_success() {
            return Err(LedgerError::Rejected {
                status: status.as_u16(),
                message: node_message(&text),
            });
        }

        let committed: CommitResponse = serde_json::from_str(&text)
            .map_err(|e| LedgerError::Decode(format!("commit response: {}", e)))?;

        if &committed.id != tx.id() {
            tracing::warn!(
                local_id = %tx.id(),
                node_id = %committed.id,
                "Node reported a different transaction id"
            );
        }

        tracing::info!(tx_id = %committed.id, "Transaction committed");
        Ok(committed.id)
    }

    /// Fetch a transaction by id.
    pub async fn fetch_transaction(&self, id: &TransactionId) -> LedgerResult<TransactionRecord> {
        let url = self.transaction_url(id)?;

        tracing::debug!(tx_id = %id, url = %url, "Fetching transaction");

        let (status, text) = self.call(self.http.get(url)).await?;

        if status == StatusCode::NOT_FOUND {
            return Err(LedgerError::NotFound(id.clone()));
        }
        if !status.is_success() {
            return Err(LedgerError::Rejected {
                status: status.as_u16(),
                message: node_message(&text),
            });
        }

        let record: Value = serde_json::from_str(&text)
            .map_err(|e| LedgerError::Decode(format!("transaction record: {}", e)))?;

        Ok(TransactionRecord(record))
    }

    /// Send `request` and read its body under a single deadline.
    async fn call(&self, request: reqwest::RequestBuilder) -> LedgerResult<(StatusCode, String)> {
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        match timeout(self.timeout_duration, exchange).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => Err(LedgerError::Network(e.to_string())),
            Err(_) => Err(LedgerError::Timeout(self.config.request_timeout_secs)),
        }
    }
}

/// Prefer the node's `message` field; fall back to the raw body.
fn node_message(body: &str) -> String {
    match serde_json::from_str::<NodeErrorBody>(body) {
        Ok(parsed) => parsed.message,
        Err(_) if body.trim().is_empty() => "no response body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}

impl std::fmt::Debug for LedgerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerClient")
            .field("api_url", &self.base.as_str())
            .field("timeout_secs", &self.config.request_timeout_secs)
            .finish()
    }
}
