//! Application context shared by every request

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use docchat_core::{ChatModel, Result};
use docchat_rag::{ChatSession, IndexBuilder};

use crate::config::WebConfig;
use crate::page::load_logo;

pub type SharedSession = Arc<Mutex<ChatSession>>;

/// Configuration, model handles and the session table
pub struct AppContext {
    config: WebConfig,
    llm: Arc<dyn ChatModel>,
    builder: Arc<IndexBuilder>,
    logo: Option<String>,
    sessions: RwLock<HashMap<String, SharedSession>>,
}

impl AppContext {
    /// Create the document directory and load the sidebar image.
    ///
    /// A logo that cannot be read is logged and left out of the page.
    pub async fn new(
        config: WebConfig,
        llm: Arc<dyn ChatModel>,
        builder: Arc<IndexBuilder>,
    ) -> Result<Self> {
        tokio::fs::create_dir_all(builder.pdf_dir()).await?;

        let logo = match &config.logo {
            Some(path) => match load_logo(path).await {
                Ok(uri) => Some(uri),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not load logo");
                    None
                }
            },
            None => None,
        };

        Ok(Self {
            config,
            llm,
            builder,
            logo,
            sessions: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &WebConfig {
        &self.config
    }

    pub fn llm(&self) -> Arc<dyn ChatModel> {
        self.llm.clone()
    }

    pub fn builder(&self) -> &IndexBuilder {
        &self.builder
    }

    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    /// The session for `id`, if one has been opened
    pub async fn existing(&self, id: &str) -> Option<SharedSession> {
        self.sessions.read().await.get(id).cloned()
    }

    /// The session for `id`, created empty when unknown
    pub async fn session(&self, id: &str) -> SharedSession {
        if let Some(session) = self.existing(id).await {
            return session;
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(id.to_string())
            .or_insert_with(|| {
                tracing::debug!(session = id, "new session");
                Arc::new(Mutex::new(ChatSession::new()))
            })
            .clone()
    }

    /// Fetch the session and build its index unless it already has one.
    ///
    /// Idle sessions are pruned first. A session whose build fails is not kept.
    pub async fn open_session(&self, id: &str) -> Result<SharedSession> {
        self.prune_idle(Utc::now()).await;

        let session = self.session(id).await;
        let built = session
            .lock()
            .await
            .ensure_ready(&self.builder, self.llm.clone())
            .await;

        match built {
            Ok(true) => tracing::info!(session = id, "conversation initialized"),
            Ok(false) => {}
            Err(e) => {
                self.discard_unready(id, &session).await;
                return Err(e);
            }
        }
        Ok(session)
    }

    async fn discard_unready(&self, id: &str, session: &SharedSession) {
        let mut sessions = self.sessions.write().await;
        let unready = sessions.get(id).is_some_and(|current| {
            Arc::ptr_eq(current, session)
                && current.try_lock().map(|s| !s.is_ready()).unwrap_or(false)
        });
        if unready {
            sessions.remove(id);
            tracing::debug!(session = id, "dropped session after failed build");
        }
    }

    /// Drop a session; returns whether it existed
    pub async fn reset(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id).is_some();
        if removed {
            tracing::info!(session = id, "session reset");
        }
        removed
    }

    /// Drop sessions untouched for longer than the idle timeout.
    ///
    /// Sessions busy with a request are kept.
    pub async fn prune_idle(&self, now: DateTime<Utc>) -> usize {
        let idle_timeout = self.config.session_idle_timeout;
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, session| match session.try_lock() {
            Ok(guard) => (now - guard.touched_at())
                .to_std()
                .map(|elapsed| elapsed <= idle_timeout)
                .unwrap_or(true),
            Err(_) => true,
        });

        let pruned = before - sessions.len();
        if pruned > 0 {
            tracing::debug!(pruned, remaining = sessions.len(), "pruned idle sessions");
        }
        pruned
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop every session
    pub async fn shutdown(&self) {
        let mut sessions = self.sessions.write().await;
        tracing::info!(sessions = sessions.len(), "closing sessions");
        sessions.clear();
    }
}
