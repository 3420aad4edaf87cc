//! Sync operations for the Planner.

use log::{info, warn};
use reqwest::Url;

use super::Planner;
use crate::{
    error::{PlannerError, Result},
    params::EnableSync,
    sync::{HttpSyncTarget, SyncReport, SyncSettings, SyncStatus, SyncTarget},
};

impl Planner {
    /// Enables sync for an account. Mutations made from now on are queued.
    pub async fn enable_sync(&self, params: &EnableSync) -> Result<SyncSettings> {
        let user_id = params.user_id.trim();
        if user_id.is_empty() {
            return Err(PlannerError::invalid_input("user_id")
                .with_reason("Sync user must not be empty"));
        }
        let endpoint = Url::parse(params.endpoint.trim()).map_err(|e| {
            PlannerError::invalid_input("endpoint").with_reason(format!("Invalid URL: {e}"))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(PlannerError::invalid_input("endpoint")
                .with_reason("Sync endpoint must be an http(s) URL"));
        }

        let settings = SyncSettings {
            user_id: user_id.to_string(),
            endpoint: endpoint.as_str().trim_end_matches('/').to_string(),
        };
        let stored = settings.clone();
        self.with_database(move |db| db.enable_sync(&stored)).await?;
        info!("Sync enabled for {}", settings.endpoint);
        Ok(settings)
    }

    /// Disables sync and drops queued entries. Returns how many were dropped.
    pub async fn disable_sync(&self) -> Result<usize> {
        let dropped = self.with_database(|db| db.disable_sync()).await?;
        if dropped > 0 {
            warn!("Dropped {dropped} unsynced change(s)");
        }
        Ok(dropped)
    }

    pub async fn sync_status(&self) -> Result<SyncStatus> {
        self.with_database(|db| {
            Ok(SyncStatus {
                settings: db.sync_settings()?,
                pending: db.pending_outbox_count()?,
            })
        })
        .await
    }

    /// Pushes queued entries to `target` in order.
    ///
    /// Each entry is deleted only after the target acknowledged it. The first
    /// failure ends the drain and is reported in [`SyncReport::failure`]; that
    /// entry and everything after it stay queued.
    pub async fn sync_outbox(&self, target: &dyn SyncTarget) -> Result<SyncReport> {
        let (settings, entries) = self
            .with_database(|db| Ok((db.sync_settings()?, db.list_outbox()?)))
            .await?;
        let settings = settings.ok_or_else(|| PlannerError::Sync {
            message: "Sync is not enabled".to_string(),
        })?;

        let mut report = SyncReport::default();
        for entry in &entries {
            if let Err(e) = target.push(&settings.user_id, entry).await {
                warn!("Sync stopped at entry {}: {e}", entry.seq);
                report.failure = Some(e.to_string());
                break;
            }
            let seq = entry.seq;
            self.with_database(move |db| db.delete_outbox_entry(seq))
                .await?;
            report.pushed += 1;
        }

        report.pending = self.with_database(|db| db.pending_outbox_count()).await?;
        info!(
            "Sync pushed {} entr(ies), {} pending",
            report.pushed, report.pending
        );
        Ok(report)
    }

    /// Drains the outbox to the configured HTTP endpoint.
    pub async fn sync_now(&self) -> Result<SyncReport> {
        let settings = self
            .with_database(|db| db.sync_settings())
            .await?
            .ok_or_else(|| PlannerError::Sync {
                message: "Sync is not enabled".to_string(),
            })?;
        let target = HttpSyncTarget::new(settings.endpoint)?;
        self.sync_outbox(&target).await
    }
}
