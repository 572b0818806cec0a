//! In-memory explorer backend shared by the integration tests

#![allow(dead_code)]

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use htnx::api::ExplorerApi;
use htnx::types::{DagSnapshot, NodeInfo, Transaction, TxInput, TxLookup, TxOutput};

#[derive(Clone, Debug)]
pub enum TxAnswer {
    NotFound,
    Found(Transaction),
    Fail,
}

pub struct FakeApi {
    pub dag_calls: AtomicU32,
    pub info_calls: AtomicU32,
    pub version_calls: AtomicU32,
    pub blue_score_calls: AtomicU32,
    pub tx_calls: AtomicU32,
    pub batch_calls: AtomicU32,

    pub dag: Mutex<DagSnapshot>,
    pub mempool: AtomicU32,
    pub version: Mutex<Option<String>>,
    pub dag_fails: AtomicBool,
    pub tx_answer: Mutex<TxAnswer>,
    pub batch_answer: Mutex<Vec<Transaction>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            dag_calls: AtomicU32::new(0),
            info_calls: AtomicU32::new(0),
            version_calls: AtomicU32::new(0),
            blue_score_calls: AtomicU32::new(0),
            tx_calls: AtomicU32::new(0),
            batch_calls: AtomicU32::new(0),
            dag: Mutex::new(DagSnapshot {
                block_count: 1_000,
                header_count: 1_000,
                virtual_daa_score: 5_000,
                difficulty: 2.0,
            }),
            mempool: AtomicU32::new(7),
            version: Mutex::new(Some("1.2.3".into())),
            dag_fails: AtomicBool::new(false),
            tx_answer: Mutex::new(TxAnswer::NotFound),
            batch_answer: Mutex::new(Vec::new()),
        }
    }

    pub fn answer_tx(&self, answer: TxAnswer) {
        *self.tx_answer.lock().unwrap() = answer;
    }

    pub fn answer_batch(&self, txs: Vec<Transaction>) {
        *self.batch_answer.lock().unwrap() = txs;
    }

    pub fn set_version(&self, version: Option<&str>) {
        *self.version.lock().unwrap() = version.map(str::to_string);
    }

    pub fn count(counter: &AtomicU32) -> u32 {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExplorerApi for FakeApi {
    async fn blockdag_info(&self) -> Result<DagSnapshot> {
        self.dag_calls.fetch_add(1, Ordering::SeqCst);
        if self.dag_fails.load(Ordering::SeqCst) {
            return Err(anyhow!("blockdag unavailable"));
        }
        Ok(*self.dag.lock().unwrap())
    }

    async fn node_info(&self) -> Result<NodeInfo> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        Ok(NodeInfo {
            mempool_size: self.mempool.load(Ordering::SeqCst) as u64,
        })
    }

    async fn server_version(&self) -> Result<String> {
        self.version_calls.fetch_add(1, Ordering::SeqCst);
        self.version
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("version endpoint down"))
    }

    async fn virtual_blue_score(&self) -> Result<u64> {
        self.blue_score_calls.fetch_add(1, Ordering::SeqCst);
        Ok(9_000)
    }

    async fn transaction(&self, _id: &str) -> Result<TxLookup> {
        self.tx_calls.fetch_add(1, Ordering::SeqCst);
        match self.tx_answer.lock().unwrap().clone() {
            TxAnswer::NotFound => Ok(TxLookup::NotFound),
            TxAnswer::Found(tx) => Ok(TxLookup::Found(Box::new(tx))),
            TxAnswer::Fail => Err(anyhow!("connection reset")),
        }
    }

    async fn transactions(&self, ids: &[String]) -> Result<Vec<Transaction>> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .batch_answer
            .lock()
            .unwrap()
            .iter()
            .filter(|tx| ids.contains(&tx.id))
            .cloned()
            .collect())
    }
}

pub fn tx(id: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        hash: format!("hash-{id}"),
        subnetwork_id: "0000000000000000000000000000000000000000".into(),
        block_time: 0,
        mass: Some(2036),
        is_accepted: true,
        accepting_block_hash: Some("acc".into()),
        accepting_block_blue_score: Some(8_990),
        block_hashes: vec!["blk".into()],
        inputs: Vec::new(),
        outputs: Vec::new(),
    }
}

pub fn input(prev: &str, index: u64) -> TxInput {
    TxInput {
        previous_outpoint_hash: prev.to_string(),
        previous_outpoint_index: index,
        signature_script: None,
    }
}

pub fn output(index: u64, amount: u64) -> TxOutput {
    TxOutput {
        index,
        amount,
        script_public_key_address: Some(format!("hoosat:addr{index}")),
        script_public_key_type: Some("pubkey".into()),
    }
}
