//! Remote sync through a local outbox.
//!
//! The local database is the single source of truth. While sync is enabled,
//! each task, plan or history mutation appends an [`OutboxEntry`] in the same
//! transaction as the mutation itself. Draining pushes entries to a
//! [`SyncTarget`] strictly in `seq` order and deletes an entry only once the
//! target acknowledged it. The first failure stops the drain, so the remote
//! side never observes a later mutation before an earlier one.

use std::{fmt, str::FromStr, time::Duration};

use async_trait::async_trait;
use jiff::Timestamp;
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PlannerError, Result};

/// Kind of record a mutation applies to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncEntity {
    Task,
    Plan,
    History,
}

/// What happened to the record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SyncOperation {
    Upsert,
    Delete,
    Clear,
}

macro_rules! str_enum {
    ($ty:ty { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name),+
                }
            }
        }

        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(format!("Unknown {}: {s}", stringify!($ty))),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(SyncEntity { Task => "task", Plan => "plan", History => "history" });
str_enum!(SyncOperation { Upsert => "upsert", Delete => "delete", Clear => "clear" });

/// A queued local mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutboxEntry {
    pub seq: u64,
    pub entity: SyncEntity,
    pub operation: SyncOperation,
    pub payload: Value,
    pub created_at: Timestamp,
}

/// Account and endpoint used while sync is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSettings {
    pub user_id: String,
    pub endpoint: String,
}

/// Snapshot of the sync configuration and queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub settings: Option<SyncSettings>,
    pub pending: usize,
}

/// Outcome of one drain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries acknowledged and removed from the outbox
    pub pushed: usize,
    /// Entries still queued after the drain
    pub pending: usize,
    /// Why the drain stopped early, if it did
    pub failure: Option<String>,
}

impl SyncReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.pending == 0
    }
}

/// Destination for outbox entries.
#[async_trait]
pub trait SyncTarget: Send + Sync {
    /// Delivers one entry. `Ok` means the remote side acknowledged it.
    async fn push(&self, user_id: &str, entry: &OutboxEntry) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct MutationBody<'a> {
    user_id: &'a str,
    seq: u64,
    entity: SyncEntity,
    operation: SyncOperation,
    payload: &'a Value,
    created_at: Timestamp,
}

/// Pushes entries as `POST {endpoint}/mutations`. Any 2xx is an ack.
#[derive(Debug, Clone)]
pub struct HttpSyncTarget {
    client: Client,
    endpoint: String,
}

impl HttpSyncTarget {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| PlannerError::Configuration {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl SyncTarget for HttpSyncTarget {
    async fn push(&self, user_id: &str, entry: &OutboxEntry) -> Result<()> {
        let url = format!("{}/mutations", self.endpoint.trim_end_matches('/'));
        debug!("Pushing outbox entry {} ({} {})", entry.seq, entry.operation, entry.entity);

        let body = MutationBody {
            user_id,
            seq: entry.seq,
            entity: entry.entity,
            operation: entry.operation,
            payload: &entry.payload,
            created_at: entry.created_at,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PlannerError::Sync {
                message: format!("Failed to reach {url}: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(PlannerError::Sync {
                message: format!("Entry {} rejected ({status}): {}", entry.seq, text.trim()),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        matchers::{body_partial_json, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    fn entry(seq: u64) -> OutboxEntry {
        OutboxEntry {
            seq,
            entity: SyncEntity::Task,
            operation: SyncOperation::Upsert,
            payload: json!({ "id": 1, "title": "Write" }),
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn test_entity_and_operation_names() {
        assert_eq!("history".parse::<SyncEntity>().unwrap(), SyncEntity::History);
        assert_eq!(SyncOperation::Clear.to_string(), "clear");
        assert!("bogus".parse::<SyncOperation>().is_err());
    }

    #[tokio::test]
    async fn test_http_target_posts_mutation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/mutations"))
            .and(body_partial_json(json!({
                "user_id": "user-1",
                "seq": 7,
                "entity": "task",
                "operation": "upsert",
                "payload": { "title": "Write" }
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let target = HttpSyncTarget::new(format!("{}/", server.uri())).unwrap();
        target.push("user-1", &entry(7)).await.unwrap();
    }

    #[tokio::test]
    async fn test_http_target_reports_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_string("conflict"))
            .mount(&server)
            .await;

        let target = HttpSyncTarget::new(server.uri()).unwrap();
        let err = target.push("user-1", &entry(1)).await.unwrap_err();
        assert!(matches!(err, PlannerError::Sync { ref message } if message.contains("conflict")));
    }
}
