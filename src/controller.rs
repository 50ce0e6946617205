//! Composition root for the conversation engine.
//!
//! Owns the conversation store and the backend client, exposes the two
//! entry points a presentation layer calls, and enforces single-flight:
//! while a chat or upload request is outstanding, a second submission of
//! the same kind is dropped, not queued.

use crate::backend::BackendClient;
use crate::chat;
use crate::config::Config;
use crate::conversation::ConversationStore;
use crate::error::Result;
use crate::models::{Turn, UploadCandidate};
use crate::upload;
use std::time::Duration;
use tracing::debug;

pub struct ClientController {
    config: Config,
    client: BackendClient,
    store: ConversationStore,
    chat_busy: bool,
    upload_busy: bool,
}

impl ClientController {
    pub fn new(config: Config) -> Result<Self> {
        let client = BackendClient::new(
            &config.api_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;
        Ok(Self {
            config,
            client,
            store: ConversationStore::new(),
            chat_busy: false,
            upload_busy: false,
        })
    }

    /// Run one query. Dropped while a chat request is already in flight.
    ///
    /// The query string is consumed: handing it over is what empties the
    /// caller's input buffer, before the response arrives.
    pub async fn submit_query(&mut self, query: String) {
        if self.chat_busy {
            debug!("Dropping query: a chat request is already in flight");
            return;
        }

        self.chat_busy = true;
        chat::run_query(
            &self.client,
            &mut self.store,
            self.config.history_window,
            &query,
        )
        .await;
        self.chat_busy = false;
    }

    /// Upload a batch of files. Dropped while an upload is already in
    /// flight. The summary lands in the log as an assistant turn.
    pub async fn submit_files(&mut self, candidates: Vec<UploadCandidate>) {
        if self.upload_busy {
            debug!("Dropping upload: a batch is already in flight");
            return;
        }

        self.upload_busy = true;
        let summary =
            upload::process_batch(&self.client, self.config.max_file_bytes, candidates).await;
        if let Some(summary) = summary {
            self.store.append(Turn::assistant(summary, Vec::new()));
        }
        self.upload_busy = false;
    }

    pub fn chat_busy(&self) -> bool {
        self.chat_busy
    }

    pub fn upload_busy(&self) -> bool {
        self.upload_busy
    }

    /// Live view of the conversation log.
    pub fn conversation(&self) -> &[Turn] {
        self.store.all()
    }

    /// Explicit session reset: clears the log.
    pub fn reset(&mut self) {
        self.store.clear();
    }

    pub fn backend(&self) -> &BackendClient {
        &self.client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
