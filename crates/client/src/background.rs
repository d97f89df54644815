// crates/client/src/background.rs
//! Background download sessions with delegate-driven completion

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use courier_endpoint::Endpoint;
use futures::StreamExt;
use reqwest::Url;
use serde::de::DeserializeOwned;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::task::JoinHandle;

use crate::client::{build_request, REQUEST_TIMEOUT, RESOURCE_TIMEOUT};
use crate::error::{RequestError, RequestResult};
use crate::response::{classify, classify_transport};

/// A completed background download task
#[derive(Debug, Clone)]
pub struct DownloadTask {
    /// Task number, unique within its session
    pub task_id: u64,
    /// URL the task requested
    pub url: Url,
    /// Status code of the captured response, if one arrived
    pub status: Option<u16>,
}

/// Callbacks delivered as background tasks progress and complete.
///
/// Callbacks run on whatever executor thread the task completes on and must
/// rely only on their parameters, not on in-process state from the
/// submitting call site.
pub trait SessionDelegate: Send + Sync + 'static {
    /// Called once a task's payload has been written to `location`
    fn finished_downloading(
        &self,
        session: &BackgroundSession,
        task: &DownloadTask,
        location: &Path,
    );

    /// Streaming progress for an in-flight task
    fn wrote_data(&self, _session_id: &str, _task_id: u64, _downloaded: u64, _total: Option<u64>) {
    }

    /// Called when the session tears down outside the completion path
    fn became_invalid(&self, _session_id: &str, _error: Option<&RequestError>) {}
}

struct SessionInner {
    identifier: String,
    client: reqwest::Client,
    delegate: Arc<dyn SessionDelegate>,
    tasks: Mutex<HashMap<u64, JoinHandle<()>>>,
    next_task_id: AtomicU64,
    invalidated: AtomicBool,
}

/// A download session keyed by a caller-supplied identifier.
///
/// Submissions are fire-and-forget: `submit` returns immediately and
/// completion arrives later through the session's delegate. The session is
/// cheap to clone; clones share the same identifier, client, and task set.
#[derive(Clone)]
pub struct BackgroundSession {
    inner: Arc<SessionInner>,
}

impl BackgroundSession {
    /// Creates a background session keyed by `identifier`.
    ///
    /// The session owns one platform client with the same fixed 15 second
    /// timeouts as the foreground path.
    pub fn new(identifier: String, delegate: Arc<dyn SessionDelegate>) -> RequestResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(RESOURCE_TIMEOUT)
            .build()
            .map_err(|_| RequestError::Unknown)?;

        Ok(Self {
            inner: Arc::new(SessionInner {
                identifier,
                client,
                delegate,
                tasks: Mutex::new(HashMap::new()),
                next_task_id: AtomicU64::new(1),
                invalidated: AtomicBool::new(false),
            }),
        })
    }

    /// The identifier this session was created with
    pub fn identifier(&self) -> &str {
        &self.inner.identifier
    }

    /// Returns true once the session stopped accepting submissions
    pub fn is_invalidated(&self) -> bool {
        self.inner.invalidated.load(Ordering::SeqCst)
    }

    /// Number of tasks submitted and not yet torn down
    pub fn active_count(&self) -> usize {
        self.inner.tasks.lock().map(|tasks| tasks.len()).unwrap_or(0)
    }

    /// Submits a download task for `endpoint` and returns immediately.
    ///
    /// Completion is delivered through the session delegate. A descriptor
    /// that fails URL assembly is logged and dropped without surfacing an
    /// error, unlike the foreground path. Submissions to an invalidated
    /// session are dropped the same way.
    pub fn submit(&self, endpoint: &dyn Endpoint) {
        if self.is_invalidated() {
            log::warn!(
                "session {}: submission after invalidation dropped",
                self.inner.identifier
            );
            return;
        }

        let url = match endpoint.url() {
            Ok(url) => url,
            Err(e) => {
                log::warn!("session {}: submission dropped: {e}", self.inner.identifier);
                return;
            }
        };

        let request = build_request(&self.inner.client, endpoint, url.clone());
        let task_id = self.inner.next_task_id.fetch_add(1, Ordering::SeqCst);

        let session = self.clone();
        let handle = tokio::spawn(async move {
            session.run_task(task_id, url, request).await;
        });

        if let Ok(mut tasks) = self.inner.tasks.lock() {
            tasks.insert(task_id, handle);
        }
    }

    async fn run_task(&self, task_id: u64, url: Url, request: reqwest::RequestBuilder) {
        log::debug!(
            "session {} task {}: downloading {}",
            self.inner.identifier,
            task_id,
            url
        );

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                self.handle_session_error(&classify_transport(e));
                return;
            }
        };

        let status = response.status().as_u16();
        let total = response.content_length();
        let location = std::env::temp_dir().join(format!(
            "{}-{}.download",
            self.inner.identifier, task_id
        ));

        match self.write_payload(response, &location, task_id, total).await {
            Ok(()) => {
                let task = DownloadTask {
                    task_id,
                    url,
                    status: Some(status),
                };
                self.inner.delegate.finished_downloading(self, &task, &location);
            }
            Err(error) => self.handle_session_error(&error),
        }
    }

    async fn write_payload(
        &self,
        response: reqwest::Response,
        location: &Path,
        task_id: u64,
        total: Option<u64>,
    ) -> RequestResult<()> {
        let mut file = File::create(location)
            .await
            .map_err(|e| RequestError::UnexpectedError(e.to_string()))?;
        let mut stream = response.bytes_stream();
        let mut downloaded = 0u64;

        while let Some(chunk_result) = stream.next().await {
            let chunk = chunk_result.map_err(classify_transport)?;
            file.write_all(&chunk)
                .await
                .map_err(|e| RequestError::UnexpectedError(e.to_string()))?;

            downloaded += chunk.len() as u64;
            self.inner
                .delegate
                .wrote_data(&self.inner.identifier, task_id, downloaded, total);
        }

        file.flush()
            .await
            .map_err(|e| RequestError::UnexpectedError(e.to_string()))?;
        Ok(())
    }

    /// Logs a session-level delivery error and tears the session down.
    ///
    /// Used when a task fails outside the completion path, e.g. the exchange
    /// itself could not complete. Outstanding tasks are cancelled and the
    /// delegate is notified through `became_invalid`.
    pub fn handle_session_error(&self, error: &RequestError) {
        log::error!(
            "session {}: delivery error: {}",
            self.inner.identifier,
            error
        );
        self.invalidate_and_cancel();
        self.inner
            .delegate
            .became_invalid(&self.inner.identifier, Some(error));
    }

    /// Stops accepting submissions and lets in-flight tasks drain
    pub fn finish_and_invalidate(&self) {
        self.inner.invalidated.store(true, Ordering::SeqCst);
        log::debug!("session {} finished", self.inner.identifier);
    }

    /// Stops accepting submissions and aborts in-flight tasks
    pub fn invalidate_and_cancel(&self) {
        self.inner.invalidated.store(true, Ordering::SeqCst);
        if let Ok(mut tasks) = self.inner.tasks.lock() {
            for (_, handle) in tasks.drain() {
                handle.abort();
            }
        }
        log::debug!("session {} cancelled", self.inner.identifier);
    }
}

/// Submits one download in a fresh background session and returns
/// immediately.
///
/// Creates a session keyed by `identifier`, starts a task for `endpoint`,
/// and hands the session to the delegate's callbacks on completion.
pub fn submit_download(
    identifier: String,
    delegate: Arc<dyn SessionDelegate>,
    endpoint: &dyn Endpoint,
) {
    match BackgroundSession::new(identifier, delegate) {
        Ok(session) => session.submit(endpoint),
        Err(e) => log::error!("background session not created: {e}"),
    }
}

/// Classifies and decodes a completed background download.
///
/// Mirrors the foreground classification exactly, reading the body from the
/// payload the task wrote at `location`. A task that captured no HTTP
/// response cancels the session and fails with `NoResponse`; once a response
/// was captured the session is finished and invalidated before the payload
/// is decoded, whatever the classification outcome.
pub async fn decode_download<T>(
    session: &BackgroundSession,
    task: &DownloadTask,
    location: &Path,
) -> RequestResult<T>
where
    T: DeserializeOwned,
{
    let status = match task.status {
        Some(status) => status,
        None => {
            log::warn!(
                "session {} task {}: no response captured",
                session.identifier(),
                task.task_id
            );
            session.invalidate_and_cancel();
            return Err(RequestError::NoResponse);
        }
    };

    session.finish_and_invalidate();

    let body = tokio::fs::read(location)
        .await
        .map_err(|e| RequestError::UnexpectedError(e.to_string()))?;

    let result = classify(status, &body);
    match &result {
        Ok(_) => log::debug!(
            "session {} task {}: decoded {} bytes",
            session.identifier(),
            task.task_id,
            body.len()
        ),
        Err(error) => log::debug!(
            "session {} task {}: failed with {}: {}",
            session.identifier(),
            task.task_id,
            status,
            error
        ),
    }
    result
}
