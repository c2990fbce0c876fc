use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use swipematch_core::{CandidateCard, MatchLine, Program, SurveyDraft, UserProfile};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("could not encode payload: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("sync URL is not configured")]
    NotConfigured,
}

/// Everything the spreadsheet collector records for one finished session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPayload {
    pub name: String,
    pub program: Program,
    pub passions: [String; 2],
    pub strength: String,
    pub happiness: String,
    pub matches: Vec<MatchLine>,
    pub survey: SurveyDraft,
}

impl SyncPayload {
    pub fn new(profile: &UserProfile, matches: &[CandidateCard], survey: SurveyDraft) -> Self {
        Self {
            name: profile.name.clone(),
            program: profile.program,
            passions: profile.passions.clone(),
            strength: profile.strength.clone(),
            happiness: profile.happiness.clone(),
            matches: matches
                .iter()
                .map(|card| MatchLine {
                    title: card.title.clone(),
                    archetype: card.archetype,
                })
                .collect(),
            survey,
        }
    }
}

/// One-way POST to a spreadsheet webhook. The response body is never read.
#[derive(Debug, Clone)]
pub struct SheetSync {
    client: Client,
    url: Option<String>,
}

impl SheetSync {
    /// Only `https://` URLs are accepted; anything else disables sync.
    pub fn new(url: Option<String>) -> Self {
        let url = url.filter(|url| {
            let ok = url.starts_with("https://");
            if !ok {
                warn!(url = %url, "ignoring sync URL that is not https");
            }
            ok
        });
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(client: Client, url: Option<String>) -> Self {
        Self { client, url }
    }

    pub fn is_enabled(&self) -> bool {
        self.url.is_some()
    }

    pub async fn send(&self, payload: &SyncPayload) -> Result<(), SyncError> {
        let url = self.url.as_deref().ok_or(SyncError::NotConfigured)?;
        let body = serde_json::to_string(payload)?;
        self.client
            .post(url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .timeout(Duration::from_secs(30))
            .body(body)
            .send()
            .await?;
        debug!(matches = payload.matches.len(), "session synced");
        Ok(())
    }

    /// Sends in the background and logs failures. Must be called from inside
    /// a tokio runtime. Returns `None` when sync is not configured.
    pub fn dispatch(&self, payload: SyncPayload) -> Option<JoinHandle<()>> {
        if !self.is_enabled() {
            warn!("sync skipped: no sheet URL configured");
            return None;
        }
        let sync = self.clone();
        Some(tokio::spawn(async move {
            if let Err(err) = sync.send(&payload).await {
                warn!(error = %err, "sync failed");
            }
        }))
    }
}
