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

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{info, warn};

use gridion_core::neso::{self, NesoClient};
use gridion_core::store::{DataHub, RecordStore};

use crate::config::GridionConfig;
use crate::story::StoryPlayer;

/// Everything the handlers share.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<GridionConfig>,
    pub hub: Arc<DataHub>,
    pub client: NesoClient,
    pub player: Arc<RwLock<StoryPlayer>>,
}

impl AppState {
    pub fn new(config: GridionConfig) -> Result<Self> {
        let client = NesoClient::new(Duration::from_secs(config.neso.timeout_secs))?
            .with_base_url(config.neso.base_url.clone());
        Ok(Self {
            config: Arc::new(config),
            hub: Arc::new(DataHub::new()),
            client,
            player: Arc::new(RwLock::new(StoryPlayer::new())),
        })
    }

    /// Fetch the latest week of settlement rows and swap it in, unless a
    /// newer refresh has started meanwhile.
    pub async fn refresh(&self) {
        let generation = self.hub.begin_refresh();
        match self
            .client
            .datastore_search(neso::resources::DEMAND_FLOWS, neso::WEEK_LIMIT)
            .await
        {
            Ok(rows) => {
                let store = RecordStore::from_rows(&rows, Utc::now());
                let count = store.records().len();
                if self.hub.install(generation, store) {
                    info!(records = count, "settlement data refreshed");
                }
            }
            Err(e) => {
                // Keep serving the previous snapshot
                warn!("settlement refresh failed: {e}");
                self.hub.record_error(generation, e.to_string());
            }
        }
    }

    /// Periodic refresh loop; runs until the process exits.
    pub async fn run_refresh_loop(self) {
        let mut ticker =
            tokio::time::interval(Duration::from_secs(self.config.neso.refresh_interval_secs));
        loop {
            ticker.tick().await;
            self.refresh().await;
        }
    }
}
