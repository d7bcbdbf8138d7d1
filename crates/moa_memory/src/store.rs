//! Whole-document conversation persistence.
//!
//! Every conversation lives in one JSON document mapping
//! `{user_id}_{conversation_name}` keys to `{history, user_profile}`
//! payloads. Each operation reads the full document, mutates it in memory and
//! rewrites it. An internal mutex serializes that cycle within the process;
//! across processes the behavior stays last-write-wins with no detection.
//!
//! Namespacing is the isolation mechanism: a key is only reachable through
//! the `user_id` that owns it.

use anyhow::{Context, Result};
use moa_core::{Turn, UserProfile};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// The persistence key: `{user_id}_{conversation_name}`.
pub fn conversation_key(user_id: &str, conversation_name: &str) -> String {
    format!("{}_{}", user_id, conversation_name)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoredConversation {
    #[serde(default)]
    history: Vec<Turn>,
    #[serde(default)]
    user_profile: UserProfile,
}

type Document = BTreeMap<String, StoredConversation>;

pub struct ConversationStore {
    path: PathBuf,
    /// Held across every read-modify-write cycle.
    lock: Mutex<()>,
}

impl ConversationStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    /// Load a conversation. A missing key (or missing/corrupt document)
    /// yields an empty history and profile, never an error.
    pub async fn load(&self, user_id: &str, conversation_name: &str) -> (Vec<Turn>, UserProfile) {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await;
        match document.get(&conversation_key(user_id, conversation_name)) {
            Some(stored) => (stored.history.clone(), stored.user_profile.clone()),
            None => (Vec::new(), UserProfile::default()),
        }
    }

    /// Save (or overwrite) a conversation under its namespaced key.
    pub async fn save(
        &self,
        user_id: &str,
        conversation_name: &str,
        history: &[Turn],
        user_profile: &UserProfile,
    ) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await;
        document.insert(
            conversation_key(user_id, conversation_name),
            StoredConversation {
                history: history.to_vec(),
                user_profile: user_profile.clone(),
            },
        );
        self.write_document(&document).await
    }

    /// Conversation names owned by `user_id`, with the namespace prefix
    /// stripped. Other users' keys are never visible.
    pub async fn list(&self, user_id: &str) -> Vec<String> {
        let _guard = self.lock.lock().await;
        let document = self.read_document().await;
        let prefix = format!("{}_", user_id);
        document
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .map(str::to_string)
            .collect()
    }

    /// Remove a conversation. Deleting a key that isn't present is a no-op.
    pub async fn delete(&self, user_id: &str, conversation_name: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut document = self.read_document().await;
        if document
            .remove(&conversation_key(user_id, conversation_name))
            .is_some()
        {
            self.write_document(&document).await?;
        }
        Ok(())
    }

    async fn read_document(&self) -> Document {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            // First run: the document doesn't exist yet.
            Err(_) => return Document::new(),
        };
        match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(e) => {
                // Corruption is treated as "store is empty", not a fatal
                // error; the next save rewrites the document.
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "conversation document failed to parse, treating store as empty"
                );
                Document::new()
            }
        }
    }

    async fn write_document(&self, document: &Document) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        let content = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}
