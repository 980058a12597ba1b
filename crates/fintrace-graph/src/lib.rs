#![warn(missing_docs)]
//! # fintrace-graph
//!
//! ## Purpose
//! Folds a flat transaction list into an account/transaction graph for the
//! network view.
//!
//! ## Responsibilities
//! - Create exactly one node per distinct account identifier.
//! - Propagate the suspicious flag from flagged transactions to both endpoints.
//! - Emit one edge per valid transaction, parallel edges included.
//!
//! ## Data flow
//! Raw transactions -> [`build_graph`] -> [`TransactionGraph`] consumed by the
//! rendering layer.
//!
//! ## Ownership and lifetimes
//! The node index used for deduplication lives only inside [`build_graph`];
//! callers receive plain owned vectors.
//!
//! ## Error model
//! Nothing here fails. Transactions missing an endpoint are skipped, and an
//! empty [`TransactionGraph`] means there is nothing to draw.

use std::collections::HashMap;

use fintrace_core::number_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Account node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Account identifier.
    pub id: String,
    /// Set once any flagged transaction touches this account; never cleared.
    pub suspicious: bool,
}

/// One transaction drawn between two accounts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    /// Sender account identifier.
    pub source: String,
    /// Receiver account identifier.
    pub target: String,
    /// Amount exactly as the backend sent it; `null` when absent.
    pub amount: Value,
}

impl GraphEdge {
    /// Link decoration text, for example `₹250`.
    pub fn label(&self) -> String {
        match &self.amount {
            Value::Null => "₹-".to_string(),
            Value::String(text) => format!("₹{text}"),
            other => format!("₹{other}"),
        }
    }
}

/// Node/edge structure handed to the network view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionGraph {
    /// Accounts in first-seen order.
    pub nodes: Vec<GraphNode>,
    /// Transactions in input order.
    pub links: Vec<GraphEdge>,
}

impl TransactionGraph {
    /// Returns `true` when there is no graph to display.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by account id.
    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Iterates over suspicious accounts in first-seen order.
    pub fn suspicious_nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|node| node.suspicious)
    }
}

/// Insertion-ordered node set keyed by account id.
#[derive(Debug, Default)]
struct NodeIndex {
    positions: HashMap<String, usize>,
    nodes: Vec<GraphNode>,
}

impl NodeIndex {
    fn get_or_add(&mut self, id: &str) -> usize {
        if let Some(position) = self.positions.get(id) {
            return *position;
        }

        let position = self.nodes.len();
        self.nodes.push(GraphNode {
            id: id.to_string(),
            suspicious: false,
        });
        self.positions.insert(id.to_string(), position);
        position
    }

    fn mark_suspicious(&mut self, position: usize) {
        if let Some(node) = self.nodes.get_mut(position) {
            node.suspicious = true;
        }
    }
}

/// Builds the transaction graph.
///
/// # Semantics
/// - A transaction without both `sender` and `receiver` contributes nothing.
/// - Only `"flagged": true` marks endpoints suspicious; truthy strings or
///   numbers do not.
/// - `amount` is carried verbatim onto the edge.
pub fn build_graph(transactions: &[Value]) -> TransactionGraph {
    let mut index = NodeIndex::default();
    let mut links = Vec::new();

    for (position, transaction) in transactions.iter().enumerate() {
        let (Some(sender), Some(receiver)) = (
            account_id(transaction, "sender"),
            account_id(transaction, "receiver"),
        ) else {
            log::trace!("transaction at position {position} lacks an endpoint; skipped");
            continue;
        };

        let sender_node = index.get_or_add(&sender);
        let receiver_node = index.get_or_add(&receiver);

        if transaction.get("flagged") == Some(&Value::Bool(true)) {
            index.mark_suspicious(sender_node);
            index.mark_suspicious(receiver_node);
        }

        links.push(GraphEdge {
            source: sender,
            target: receiver,
            amount: transaction.get("amount").cloned().unwrap_or(Value::Null),
        });
    }

    TransactionGraph {
        nodes: index.nodes,
        links,
    }
}

/// Reads an endpoint id. Blank strings, zero, `null` and non-scalars count
/// as missing; `7` and `7.0` name the same account.
fn account_id(transaction: &Value, key: &str) -> Option<String> {
    match transaction.get(key)? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Number(number) if number.as_f64() != Some(0.0) => Some(number_text(number)),
        _ => None,
    }
}
