// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! In-memory record store with atomic snapshot swapping.
//!
//! Readers always see a complete, internally consistent batch. Concurrent
//! refreshes are serialized by a generation counter so a slow fetch can
//! never overwrite the result of a newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, warn};

use gridion_types::SettlementRecord;

/// One immutable fetched batch of settlement records.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<SettlementRecord>,
    fetched_at: Option<DateTime<Utc>>,
    rejected: usize,
}

impl RecordStore {
    /// Convert raw CKAN rows, dropping rows that fail validation.
    pub fn from_rows(
        rows: &[serde_json::Map<String, serde_json::Value>],
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let mut records = Vec::with_capacity(rows.len());
        let mut rejected = 0;
        for row in rows {
            match SettlementRecord::from_row(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    rejected += 1;
                    warn!("rejecting settlement row: {e}");
                }
            }
        }
        Self {
            records,
            fetched_at: Some(fetched_at),
            rejected,
        }
    }

    pub fn from_records(records: Vec<SettlementRecord>, fetched_at: DateTime<Utc>) -> Self {
        Self {
            records,
            fetched_at: Some(fetched_at),
            rejected: 0,
        }
    }

    pub fn records(&self) -> &[SettlementRecord] {
        &self.records
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Rows dropped during conversion of this batch.
    pub fn rejected_rows(&self) -> usize {
        self.rejected
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Shared handle over the current store snapshot.
#[derive(Debug)]
pub struct DataHub {
    current: RwLock<Arc<RecordStore>>,
    generation: AtomicU64,
    last_error: RwLock<Option<String>>,
}

impl Default for DataHub {
    fn default() -> Self {
        Self::new()
    }
}

impl DataHub {
    /// Start empty; the first refresh populates it.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(RecordStore::default())),
            generation: AtomicU64::new(0),
            last_error: RwLock::new(None),
        }
    }

    /// The current snapshot. Cheap; holds no lock beyond the clone.
    pub fn snapshot(&self) -> Arc<RecordStore> {
        Arc::clone(&self.current.read())
    }

    /// Claim a refresh generation. Any fetch still in flight under an older
    /// generation becomes stale the moment this returns.
    pub fn begin_refresh(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Install a fetched batch, unless a newer refresh has started since
    /// `generation` was claimed. Returns whether the batch was installed.
    pub fn install(&self, generation: u64, store: RecordStore) -> bool {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale fetch result");
            return false;
        }
        let mut current = self.current.write();
        // Re-check under the lock; a newer install may have raced us
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale fetch result");
            return false;
        }
        *current = Arc::new(store);
        *self.last_error.write() = None;
        true
    }

    /// Record a failed refresh, unless a newer one has started since.
    pub fn record_error(&self, generation: u64, message: String) {
        if self.generation.load(Ordering::SeqCst) == generation {
            *self.last_error.write() = Some(message);
        }
    }

    /// The most recent refresh failure, cleared by the next success.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }
}
