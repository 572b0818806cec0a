//! Fee computation by joining inputs to the transactions they spend.
//!
//! Known defect: an input whose previous output cannot be found contributes 0,
//! so the fee is understated instead of omitted. Callers only display the fee
//! when every referenced transaction was returned, which narrows but does not
//! close this gap (a returned transaction may still lack the output index).

use std::collections::{HashMap, HashSet};

use crate::types::{Transaction, TxOutput};

/// Distinct, non-empty previous-outpoint hashes in order of first appearance
pub fn previous_tx_ids(tx: &Transaction) -> Vec<String> {
    let mut seen = HashSet::new();
    tx.inputs
        .iter()
        .map(|input| input.previous_outpoint_hash.as_str())
        .filter(|hash| !hash.is_empty())
        .filter(|hash| seen.insert(*hash))
        .map(str::to_string)
        .collect()
}

/// Index previous transactions by id
pub fn index_by_id(txs: Vec<Transaction>) -> HashMap<String, Transaction> {
    txs.into_iter().map(|tx| (tx.id.clone(), tx)).collect()
}

/// Look up an output by its `index` field, falling back to its position
pub fn output_at(outputs: &[TxOutput], index: u64) -> Option<&TxOutput> {
    outputs
        .iter()
        .find(|o| o.index == index)
        .or_else(|| usize::try_from(index).ok().and_then(|i| outputs.get(i)))
}

/// Amount spent by the input at `position`, if its previous output is known
pub fn input_amount(
    tx: &Transaction,
    position: usize,
    previous: &HashMap<String, Transaction>,
) -> Option<u64> {
    let input = tx.inputs.get(position)?;
    let prev = previous.get(&input.previous_outpoint_hash)?;
    output_at(&prev.outputs, input.previous_outpoint_index).map(|o| o.amount)
}

/// Sum of input amounts minus sum of output amounts, in sompi
pub fn fee_sompi(tx: &Transaction, previous: &HashMap<String, Transaction>) -> i128 {
    let spent: i128 = (0..tx.inputs.len())
        .map(|i| input_amount(tx, i, previous).unwrap_or(0) as i128)
        .sum();
    let created: i128 = tx.outputs.iter().map(|o| o.amount as i128).sum();
    spent - created
}
