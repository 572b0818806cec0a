//! REST client for the explorer backend.
//!
//! Every view talks to the backend through [`ExplorerApi`] so pollers and the
//! transaction driver can be exercised against an in-memory fake.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::OnceLock;
use tokio::time::{sleep, Duration};

use crate::constants::api::{NODE_DAEMON, TX_NOT_FOUND_DETAIL};
use crate::types::{
    BlueScoreInfo, DagSnapshot, NodeInfo, ServerInfo, Transaction, TxLookup,
};

#[async_trait]
pub trait ExplorerApi: Send + Sync {
    /// `GET info/blockdag`
    async fn blockdag_info(&self) -> Result<DagSnapshot>;

    /// `GET info`
    async fn node_info(&self) -> Result<NodeInfo>;

    /// `GET info/htnd`
    async fn server_version(&self) -> Result<String>;

    /// `GET info/virtual-chain-blue-score`
    async fn virtual_blue_score(&self) -> Result<u64>;

    /// `GET transactions/<id>`
    async fn transaction(&self, id: &str) -> Result<TxLookup>;

    /// Batch lookup with inputs and outputs included
    async fn transactions(&self, ids: &[String]) -> Result<Vec<Transaction>>;
}

static HTTP: OnceLock<reqwest::Client> = OnceLock::new();

pub(crate) fn http_client() -> &'static reqwest::Client {
    HTTP.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(8)
            .tcp_nodelay(true)
            .build()
            .unwrap_or_else(|e| {
                log::warn!("[api] falling back to default http client: {e}");
                reqwest::Client::new()
            })
    })
}

/// HTTP implementation of [`ExplorerApi`]
#[derive(Clone, Debug)]
pub struct HttpApi {
    base_url: String,
    timeout_ms: u64,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout_ms: u64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send a request, retrying a couple of times on transient statuses.
    /// Returns the status together with the decoded JSON body.
    async fn send_json(
        &self,
        build: impl Fn() -> reqwest::RequestBuilder,
        label: &str,
    ) -> Result<(reqwest::StatusCode, Value)> {
        let mut attempt = 0u32;
        loop {
            let res = build()
                .timeout(Duration::from_millis(self.timeout_ms))
                .send()
                .await
                .with_context(|| format!("request {label} failed"))?;

            let status = res.status();
            if matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504) && attempt < 2 {
                attempt += 1;
                log::debug!("[api] {label} http {status}, retry {attempt}");
                sleep(Duration::from_millis(150 * attempt as u64)).await;
                continue;
            }

            let body: Value = res
                .json()
                .await
                .with_context(|| format!("invalid JSON from {label} (http {status})"))?;
            return Ok((status, body));
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        let (status, body) = self.send_json(|| http_client().get(&url), path).await?;
        if !status.is_success() {
            return Err(anyhow!("{path}: http {status}"));
        }
        serde_json::from_value(body).with_context(|| format!("unexpected payload from {path}"))
    }
}

/// Whether a response body is the backend's "transaction not found" marker
pub fn is_not_found_body(body: &Value) -> bool {
    body.get("detail").and_then(Value::as_str) == Some(TX_NOT_FOUND_DETAIL)
}

/// Interpret a single-transaction response. The not-found marker wins over the
/// status, since the backend sends it with either a 200 or a 404.
pub fn lookup_from(status: reqwest::StatusCode, body: Value) -> Result<TxLookup> {
    if is_not_found_body(&body) {
        return Ok(TxLookup::NotFound);
    }
    if !status.is_success() {
        return Err(anyhow!("http {status}"));
    }
    let tx: Transaction = serde_json::from_value(body).context("unexpected transaction payload")?;
    Ok(TxLookup::Found(Box::new(tx)))
}

#[async_trait]
impl ExplorerApi for HttpApi {
    async fn blockdag_info(&self) -> Result<DagSnapshot> {
        self.get("info/blockdag").await
    }

    async fn node_info(&self) -> Result<NodeInfo> {
        self.get("info").await
    }

    async fn server_version(&self) -> Result<String> {
        let info: ServerInfo = self.get(&format!("info/{NODE_DAEMON}")).await?;
        Ok(info.server_version)
    }

    async fn virtual_blue_score(&self) -> Result<u64> {
        let info: BlueScoreInfo = self.get("info/virtual-chain-blue-score").await?;
        Ok(info.blue_score)
    }

    async fn transaction(&self, id: &str) -> Result<TxLookup> {
        let path = format!(
            "transactions/{}?inputs=true&outputs=true&resolve_previous_outpoints=no",
            urlencoding::encode(id)
        );
        let url = self.url(&path);
        let (status, body) = self.send_json(|| http_client().get(&url), "transactions/<id>").await?;
        lookup_from(status, body).with_context(|| format!("transactions/{id}"))
    }

    async fn transactions(&self, ids: &[String]) -> Result<Vec<Transaction>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.url("transactions/search?fields=&resolve_previous_outpoints=no");
        let body = json!({ "transactionIds": ids });

        log::info!("[api] batch fetching {} transactions", ids.len());
        let (status, data) = self
            .send_json(|| http_client().post(&url).json(&body), "transactions/search")
            .await?;
        if !status.is_success() {
            return Err(anyhow!("transactions/search: http {status}"));
        }
        serde_json::from_value(data).context("unexpected batch transaction payload")
    }
}
