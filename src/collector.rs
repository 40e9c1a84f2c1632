//! Share ingestion.
//!
//! Walks a [`RawBatch`] in document order, reads the quorum record, and
//! decodes every other entry into a [`Share`]:
//!
//! 1. **Quorum** — `k` under the reserved key; missing or unusable `k`
//!    aborts the batch.
//! 2. **Entries** — each record is decoded independently. A bad record is
//!    rejected with a warning and the rest of the batch carries on.
//! 3. **Dedup** — the first record for an x-coordinate claims it, whether or
//!    not it decodes; later records with the same x are dropped silently.
//!
//! The batch is usable only if at least `k` shares survive.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::field::Modulus;
use crate::share::{self, RawBatch, Share};

// ---------------------------------------------------------------------------
// Collector state
// ---------------------------------------------------------------------------

/// Shares collected from one batch so far.
pub struct CollectorState {
    /// Accepted shares in document order (deduplicated by x).
    pub shares: Vec<Share>,
    /// x values already claimed by an earlier record.
    pub seen_x: HashSet<i64>,
    /// Quorum k.
    pub threshold: usize,
}

impl CollectorState {
    pub fn new(threshold: usize) -> Self {
        Self {
            shares: Vec::new(),
            seen_x: HashSet::new(),
            threshold,
        }
    }

    /// How many more shares are needed (0 = ready).
    pub fn remaining(&self) -> usize {
        self.threshold.saturating_sub(self.shares.len())
    }

    /// Try to decode and add one record.
    pub fn try_add(&mut self, label: &str, record: &serde_json::Value, modulus: Modulus) -> AddResult {
        let x = match share::parse_label(label) {
            Ok(x) => x,
            Err(e) => return AddResult::Rejected(Rejection::new(label, e)),
        };

        // Dedup by x; the first record claims x even if it fails to decode.
        if !self.seen_x.insert(x) {
            return AddResult::Duplicate(x);
        }

        match Share::decode(label, record, modulus) {
            Ok(share) => {
                self.shares.push(share);
                AddResult::Accepted(x)
            }
            Err(e) => AddResult::Rejected(Rejection::new(label, e)),
        }
    }
}

/// Result of trying to add a record.
#[derive(Debug)]
pub enum AddResult {
    Accepted(i64),
    Duplicate(i64),
    Rejected(Rejection),
}

impl fmt::Display for AddResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AddResult::Accepted(x) => write!(f, "share #{x} accepted"),
            AddResult::Duplicate(x) => write!(f, "share #{x} already collected (duplicate)"),
            AddResult::Rejected(r) => write!(f, "{r}"),
        }
    }
}

/// A record dropped from its batch, with the reason.
#[derive(Debug)]
pub struct Rejection {
    pub label: String,
    pub error: Error,
}

impl Rejection {
    fn new(label: &str, error: Error) -> Self {
        Self {
            label: label.to_string(),
            error,
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {:?} rejected: {}", self.label, self.error)
    }
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

/// Result of ingesting one batch.
#[derive(Debug)]
pub struct Batch {
    /// Quorum size.
    pub k: usize,
    /// Valid shares in document order; at least `k` of them.
    pub shares: Vec<Share>,
    /// Records dropped along the way.
    pub rejected: Vec<Rejection>,
}

/// Quorum declared by a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quorum {
    pub k: usize,
    /// Declared share count, if present. Informational only.
    pub n: Option<u64>,
}

/// Read the quorum record stored under `key`.
pub fn read_quorum(raw: &RawBatch, key: &str) -> Result<Quorum> {
    let record = raw.get(key).ok_or_else(|| Error::MissingQuorum(key.to_string()))?;
    let k = record.get("k").ok_or_else(|| Error::MissingQuorum(key.to_string()))?;

    let parsed = match k {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    let k = parsed
        .filter(|&k| k > 0)
        .and_then(|k| usize::try_from(k).ok())
        .ok_or_else(|| Error::InvalidQuorum(format!("k must be a positive integer, got {k}")))?;

    let n = record.get("n").and_then(|n| n.as_u64());
    Ok(Quorum { k, n })
}

/// Ingest one batch: read the quorum, decode and deduplicate the shares.
pub fn ingest(raw: &RawBatch, config: &Config) -> Result<Batch> {
    let quorum = read_quorum(raw, &config.quorum_key)?;
    let mut state = CollectorState::new(quorum.k);
    let mut rejected = Vec::new();
    let mut records = 0u64;

    for (label, record) in &raw.entries {
        if *label == config.quorum_key {
            continue;
        }
        records += 1;
        match state.try_add(label, record, config.modulus) {
            AddResult::Rejected(rejection) => {
                warn!("{rejection}");
                rejected.push(rejection);
            }
            result => debug!("{result}"),
        }
    }

    if let Some(n) = quorum.n {
        if n != records {
            warn!(declared = n, found = records, "share count differs from declared n");
        }
    }

    info!(
        k = quorum.k,
        accepted = state.shares.len(),
        rejected = rejected.len(),
        "batch ingested"
    );

    if state.remaining() > 0 {
        return Err(Error::InsufficientShares {
            needed: quorum.k,
            available: state.shares.len(),
        });
    }

    Ok(Batch {
        k: quorum.k,
        shares: state.shares,
        rejected,
    })
}
