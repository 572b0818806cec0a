use serde::{Deserialize, Serialize};

use crate::tx_tracker::TxPhase;
use crate::util_text::{
    deserialize_null_default, deserialize_option_u64_lenient, deserialize_u64_lenient,
};

/// `GET info/blockdag`, replaced wholesale on every poll
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DagSnapshot {
    #[serde(deserialize_with = "deserialize_u64_lenient")]
    pub block_count: u64,
    #[serde(deserialize_with = "deserialize_u64_lenient")]
    pub header_count: u64,
    #[serde(deserialize_with = "deserialize_u64_lenient")]
    pub virtual_daa_score: u64,
    /// Difficulty as reported by the node, before the blocks-per-second scaling
    pub difficulty: f64,
}

/// `GET info`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeInfo {
    #[serde(deserialize_with = "deserialize_u64_lenient")]
    pub mempool_size: u64,
}

/// `GET info/htnd`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    #[serde(default)]
    pub server_version: String,
}

/// `GET info/virtual-chain-blue-score`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlueScoreInfo {
    #[serde(deserialize_with = "deserialize_u64_lenient")]
    pub blue_score: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "transaction_id")]
    pub id: String,
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub subnetwork_id: String,
    /// Milliseconds since the Unix epoch
    #[serde(default, deserialize_with = "deserialize_u64_lenient_default")]
    pub block_time: u64,
    #[serde(default, deserialize_with = "deserialize_option_u64_lenient")]
    pub mass: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub is_accepted: bool,
    #[serde(default)]
    pub accepting_block_hash: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_u64_lenient")]
    pub accepting_block_blue_score: Option<u64>,
    #[serde(rename = "block_hash", default, deserialize_with = "deserialize_null_default")]
    pub block_hashes: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub inputs: Vec<TxInput>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub outputs: Vec<TxOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxInput {
    #[serde(default)]
    pub previous_outpoint_hash: String,
    #[serde(default, deserialize_with = "deserialize_u64_lenient_default")]
    pub previous_outpoint_index: u64,
    #[serde(default)]
    pub signature_script: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TxOutput {
    #[serde(default, deserialize_with = "deserialize_u64_lenient_default")]
    pub index: u64,
    #[serde(default, deserialize_with = "deserialize_u64_lenient_default")]
    pub amount: u64,
    #[serde(default)]
    pub script_public_key_address: Option<String>,
    #[serde(default)]
    pub script_public_key_type: Option<String>,
}

fn deserialize_u64_lenient_default<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(deserialize_option_u64_lenient(deserializer)?.unwrap_or_default())
}

/// Result of a single-transaction lookup. The backend signals an unknown
/// transaction with a `detail` body, which is a normal outcome here, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TxLookup {
    Found(Box<Transaction>),
    NotFound,
}

/// Updates produced by the network stats pollers
#[derive(Debug, Clone, PartialEq)]
pub enum StatsUpdate {
    CycleStarted,
    Dag(DagSnapshot),
    Mempool(u64),
    ServerVersion(String),
    CycleFinished { failed: bool },
}

/// Updates produced by the transaction driver
#[derive(Debug, Clone, PartialEq)]
pub enum TxUpdate {
    Status { phase: TxPhase, not_found_retries: u32 },
    Loaded(Box<Transaction>),
    /// Previous transactions referenced by the inputs; `complete` when every
    /// requested id came back
    Previous { txs: Vec<Transaction>, complete: bool },
    /// The driver stopped; no further updates for this view
    Finished,
}

/// Every event is tagged with the view generation that produced it so the
/// consumer can drop events from a view that has since been torn down.
#[derive(Debug, Clone)]
pub enum AppEvent {
    Stats { generation: u64, update: StatsUpdate },
    Tx { generation: u64, update: TxUpdate },
    BlueScore { generation: u64, score: u64 },
    Quit,
}
