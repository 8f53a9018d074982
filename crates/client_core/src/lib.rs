use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use shared::{
    domain::{Employee, EmployeeId},
    error::ApiErrorBody,
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{info, warn};
use url::Url;

pub mod error;
pub mod pagination;
pub mod state;

pub use error::{FetchError, SaveError, NETWORK_ERROR_MESSAGE};
pub use pagination::{has_more, next_chunk, CHUNK_SIZE};
pub use state::{DirectoryState, EditSession, EmployeeField, LoadPhase, SaveStatus};

/// How long the save-success banner stays up before auto-dismissing.
const SUCCESS_BANNER_DURATION: Duration = Duration::from_secs(3);

const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Transport seam toward the remote employee service.
///
/// The production implementation is [`HttpEmployeeService`]; tests substitute
/// in-memory doubles.
#[async_trait]
pub trait EmployeeService: Send + Sync {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, FetchError>;
    async fn patch_employee(&self, record: &Employee) -> Result<Employee, SaveError>;
}

/// reqwest-backed service client speaking the employee REST contract:
/// `GET {base}/employees` and `PATCH {base}/employees/{id}`.
pub struct HttpEmployeeService {
    http: Client,
    server_url: String,
}

impl HttpEmployeeService {
    pub fn new(server_url: impl Into<String>) -> Result<Self> {
        let server_url = server_url.into();
        Url::parse(&server_url)
            .with_context(|| format!("invalid employee service url '{server_url}'"))?;
        Ok(Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl EmployeeService for HttpEmployeeService {
    async fn fetch_employees(&self) -> Result<Vec<Employee>, FetchError> {
        let response = self
            .http
            .get(format!("{}/employees", self.server_url))
            .send()
            .await
            .map_err(|err| FetchError::new(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.trim().is_empty() {
                "Failed to fetch data".to_string()
            } else {
                body
            };
            return Err(FetchError::new(message));
        }

        response
            .json::<Vec<Employee>>()
            .await
            .map_err(|err| FetchError::new(format!("invalid employee payload: {err}")))
    }

    async fn patch_employee(&self, record: &Employee) -> Result<Employee, SaveError> {
        let response = self
            .http
            .patch(format!("{}/employees/{}", self.server_url, record.id.0))
            .json(record)
            .send()
            .await
            .map_err(|_| SaveError::network(record.clone()))?;

        let status = response.status();
        if !status.is_success() {
            // The service is expected to return a JSON body with a `message`
            // field; fall back to a status-derived message otherwise.
            let fallback = format!("HTTP error! status: {}", status.as_u16());
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => fallback,
            };
            return Err(SaveError::new(message, record.clone()));
        }

        response.json::<Employee>().await.map_err(|err| {
            SaveError::new(
                format!("invalid employee payload: {err}"),
                record.clone(),
            )
        })
    }
}

/// State-change notifications toward the rendering layer.
#[derive(Debug, Clone)]
pub enum DirectoryEvent {
    FetchStarted,
    FetchCompleted { total: usize, visible: usize },
    FetchFailed { message: String },
    VisibleExtended { added: usize, visible: usize },
    Selected { id: EmployeeId },
    SelectionCleared,
    SaveStarted { id: EmployeeId },
    SaveSucceeded { id: EmployeeId },
    SaveFailed { id: EmployeeId, message: String },
    BannerDismissed,
}

/// Read view of the directory for rendering.
#[derive(Debug, Clone)]
pub struct DirectorySnapshot {
    pub total: usize,
    pub visible: Vec<Employee>,
    pub load_phase: LoadPhase,
    pub last_error: Option<String>,
}

/// Read view of the edit session for rendering.
#[derive(Debug, Clone)]
pub struct EditSnapshot {
    pub selected: Option<EmployeeId>,
    pub draft: Option<Employee>,
    pub save_status: SaveStatus,
    pub banner_visible: bool,
}

/// Client core coordinating the employee directory: one-time dataset fetch,
/// chunked reveal of the visible window, and the edit/save session with
/// optimistic local application and server reconciliation.
///
/// All mutation goes through the operations below; the rendering layer reads
/// snapshots and subscribes to [`DirectoryEvent`]s.
pub struct DirectoryClient {
    service: Arc<dyn EmployeeService>,
    inner: Mutex<DirectoryState>,
    events: broadcast::Sender<DirectoryEvent>,
    banner_timer: Mutex<Option<JoinHandle<()>>>,
}

impl DirectoryClient {
    /// Connects to an employee service at the given base URL.
    pub fn connect(server_url: impl Into<String>) -> Result<Arc<Self>> {
        Ok(Self::with_service(Arc::new(HttpEmployeeService::new(
            server_url,
        )?)))
    }

    pub fn with_service(service: Arc<dyn EmployeeService>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            service,
            inner: Mutex::new(DirectoryState::default()),
            events,
            banner_timer: Mutex::new(None),
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<DirectoryEvent> {
        self.events.subscribe()
    }

    pub async fn directory_snapshot(&self) -> DirectorySnapshot {
        let guard = self.inner.lock().await;
        DirectorySnapshot {
            total: guard.all_data.len(),
            visible: guard.visible.clone(),
            load_phase: guard.load_phase,
            last_error: guard.last_error.clone(),
        }
    }

    pub async fn edit_snapshot(&self) -> EditSnapshot {
        let guard = self.inner.lock().await;
        EditSnapshot {
            selected: guard.edit.selected,
            draft: guard.edit.draft.clone(),
            save_status: guard.edit.save_status,
            banner_visible: guard.edit.banner_visible,
        }
    }

    /// Loads the full dataset and reveals the first chunk. Guarded by an
    /// initialization flag: only the first call per client lifetime issues a
    /// request, later calls return Ok without side effects.
    ///
    /// A failure is blocking for the whole directory; besides setting the
    /// error state it is escalated through [`DirectoryEvent::FetchFailed`]
    /// so the presentation layer can switch to its full-reload fallback.
    pub async fn fetch_all(&self) -> Result<(), FetchError> {
        {
            let mut guard = self.inner.lock().await;
            if guard.fetched {
                return Ok(());
            }
            guard.fetched = true;
            guard.begin_fetch();
        }
        let _ = self.events.send(DirectoryEvent::FetchStarted);
        info!("directory: fetching employee dataset");

        match self.service.fetch_employees().await {
            Ok(records) => {
                let (total, visible) = {
                    let mut guard = self.inner.lock().await;
                    guard.complete_fetch(records);
                    (guard.all_data.len(), guard.visible.len())
                };
                info!(total, visible, "directory: fetch complete");
                let _ = self
                    .events
                    .send(DirectoryEvent::FetchCompleted { total, visible });
                Ok(())
            }
            Err(err) => {
                {
                    let mut guard = self.inner.lock().await;
                    guard.fail_fetch(err.message.clone());
                }
                warn!("directory: fetch failed: {err}");
                let _ = self.events.send(DirectoryEvent::FetchFailed {
                    message: err.message.clone(),
                });
                Err(err)
            }
        }
    }

    /// Reacts to the presentation layer's "sentinel entered view" signal by
    /// appending the next chunk to the visible window. Returns whether more
    /// data remains, so the caller knows when to stop observing the sentinel.
    pub async fn advance(&self) -> bool {
        let (added, visible, total) = {
            let mut guard = self.inner.lock().await;
            if !guard.fetched || guard.load_phase != LoadPhase::Idle {
                return false;
            }
            let chunk: Vec<Employee> =
                pagination::next_chunk(guard.visible.len(), &guard.all_data).to_vec();
            let added = guard.append_visible(&chunk);
            (added, guard.visible.len(), guard.all_data.len())
        };
        if added > 0 {
            let _ = self
                .events
                .send(DirectoryEvent::VisibleExtended { added, visible });
        }
        pagination::has_more(visible, total)
    }

    /// Seeds an edit session from the given record, replacing any prior
    /// selection and cancelling a pending success-banner timer.
    pub async fn select(&self, record: &Employee) {
        {
            let mut guard = self.inner.lock().await;
            guard.edit.select(record);
        }
        self.abort_banner_timer().await;
        let _ = self.events.send(DirectoryEvent::Selected { id: record.id });
    }

    /// Updates one field of the draft. Returns false when nothing is
    /// selected.
    pub async fn edit_field(&self, field: EmployeeField, value: impl Into<String>) -> bool {
        let mut guard = self.inner.lock().await;
        guard.edit.edit_field(field, value.into())
    }

    /// Discards the draft, clears the selection and any store-level error,
    /// and aborts a pending success-banner timer.
    pub async fn cancel(&self) {
        {
            let mut guard = self.inner.lock().await;
            guard.edit.cancel();
            guard.clear_error();
        }
        self.abort_banner_timer().await;
        let _ = self.events.send(DirectoryEvent::SelectionCleared);
    }

    pub async fn clear_error(&self) {
        self.inner.lock().await.clear_error();
    }

    /// Saves the current draft: applies it locally first (optimistic), then
    /// issues the PATCH and reconciles with the server's returned record.
    ///
    /// No-op when nothing is selected. Saves are not queued: each call stamps
    /// a per-record generation and a resolving response is applied only while
    /// its generation is still the newest for that record, so a slow earlier
    /// save cannot clobber a newer one.
    pub async fn save(self: &Arc<Self>) -> Result<(), SaveError> {
        let (draft, generation) = {
            let mut guard = self.inner.lock().await;
            let Some(draft) = guard.edit.begin_save() else {
                return Ok(());
            };
            guard.apply_local_update(&draft);
            let generation = guard.bump_save_generation(draft.id);
            (draft, generation)
        };
        let _ = self.events.send(DirectoryEvent::SaveStarted { id: draft.id });
        info!(id = draft.id.0, "directory: saving employee");

        let outcome = self.service.patch_employee(&draft).await;

        let mut guard = self.inner.lock().await;
        if !guard.is_latest_save_generation(draft.id, generation) {
            drop(guard);
            info!(id = draft.id.0, "directory: dropping stale save response");
            return Ok(());
        }
        match outcome {
            Ok(server_record) => {
                guard.apply_local_update(&server_record);
                guard.edit.finish_save_success();
                drop(guard);
                info!(id = draft.id.0, "directory: save succeeded");
                let _ = self
                    .events
                    .send(DirectoryEvent::SaveSucceeded { id: draft.id });
                self.schedule_banner_dismiss().await;
                Ok(())
            }
            Err(err) => {
                guard.edit.finish_save_failure();
                guard.last_error = Some(err.message.clone());
                drop(guard);
                warn!(id = draft.id.0, "directory: save failed: {err}");
                let _ = self.events.send(DirectoryEvent::SaveFailed {
                    id: draft.id,
                    message: err.message.clone(),
                });
                Err(err)
            }
        }
    }

    /// Arms the 3-second auto-dismiss for the success banner, replacing any
    /// timer armed by an earlier save resolution.
    async fn schedule_banner_dismiss(self: &Arc<Self>) {
        let client = Arc::clone(self);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(SUCCESS_BANNER_DURATION).await;
            let dismissed = {
                let mut guard = client.inner.lock().await;
                let was_visible = guard.edit.banner_visible;
                guard.edit.dismiss_banner();
                was_visible
            };
            if dismissed {
                let _ = client.events.send(DirectoryEvent::BannerDismissed);
            }
        });
        let mut timer = self.banner_timer.lock().await;
        if let Some(previous) = timer.replace(handle) {
            previous.abort();
        }
    }

    async fn abort_banner_timer(&self) {
        if let Some(handle) = self.banner_timer.lock().await.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
