//! Subject registry: lifecycle of per-subject state
//!
//! Each subject sits behind its own mutex, so mutations for one subject are
//! serialized while different subjects proceed independently. A second
//! per-subject turn lock spans a whole utterance turn, including reply
//! generation, while sensor events only take the state lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::info;

use crate::core::Subject;
use crate::error::{Error, Result};

/// Id of the subject that exists from startup
pub const DEFAULT_SUBJECT: &str = "default";

/// State lock and turn lock of one subject
#[derive(Debug)]
pub struct SubjectSlot {
    state: Mutex<Subject>,
    turn: Mutex<()>,
}

impl SubjectSlot {
    pub fn new(subject: Subject) -> Self {
        Self {
            state: Mutex::new(subject),
            turn: Mutex::new(()),
        }
    }

    /// Lock the subject's state for one mutation or read
    pub async fn lock(&self) -> MutexGuard<'_, Subject> {
        self.state.lock().await
    }

    /// Hold for a full utterance turn; turns on one subject run one at a time
    pub async fn begin_turn(&self) -> MutexGuard<'_, ()> {
        self.turn.lock().await
    }
}

/// Shared handle to one subject
pub type SubjectHandle = Arc<SubjectSlot>;

/// All registered subjects
#[derive(Debug)]
pub struct SubjectRegistry {
    subjects: RwLock<HashMap<String, SubjectHandle>>,
    next_seq: AtomicU64,
}

impl Default for SubjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SubjectRegistry {
    /// Create a registry holding only the default subject
    pub fn new() -> Self {
        let mut subjects = HashMap::new();
        subjects.insert(
            DEFAULT_SUBJECT.to_string(),
            Arc::new(SubjectSlot::new(Subject::new(DEFAULT_SUBJECT))),
        );
        Self {
            subjects: RwLock::new(subjects),
            next_seq: AtomicU64::new(1),
        }
    }

    /// Register a subject; a fresh id is generated when none is given
    pub async fn register(&self, id: Option<String>) -> Result<String> {
        let id = match id {
            Some(id) => id,
            None => self.generate_id(),
        };

        let mut subjects = self.subjects.write().await;
        if subjects.contains_key(&id) {
            return Err(Error::SubjectExists(id));
        }
        subjects.insert(id.clone(), Arc::new(SubjectSlot::new(Subject::new(id.clone()))));

        info!(subject = %id, "Subject registered");
        Ok(id)
    }

    /// Remove a subject and drop its state
    pub async fn remove(&self, id: &str) -> Result<()> {
        if id == DEFAULT_SUBJECT {
            return Err(Error::SubjectPinned(id.to_string()));
        }
        let mut subjects = self.subjects.write().await;
        subjects
            .remove(id)
            .ok_or_else(|| Error::SubjectNotFound(id.to_string()))?;

        info!(subject = %id, "Subject removed");
        Ok(())
    }

    /// Look up a subject
    pub async fn get(&self, id: &str) -> Result<SubjectHandle> {
        let subjects = self.subjects.read().await;
        subjects
            .get(id)
            .cloned()
            .ok_or_else(|| Error::SubjectNotFound(id.to_string()))
    }

    /// Registered ids, sorted
    pub async fn ids(&self) -> Vec<String> {
        let subjects = self.subjects.read().await;
        let mut ids: Vec<String> = subjects.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered subjects
    pub async fn len(&self) -> usize {
        self.subjects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.subjects.read().await.is_empty()
    }

    fn generate_id(&self) -> String {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let nanos = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        format!("subject_{:x}_{}", nanos as u64, seq)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_default_subject_exists() {
        let registry = SubjectRegistry::new();
        assert!(registry.get(DEFAULT_SUBJECT).await.is_ok());
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_and_remove() {
        let registry = SubjectRegistry::new();
        let id = registry.register(Some("alice".to_string())).await.unwrap();
        assert_eq!(id, "alice");
        assert_eq!(registry.ids().await, vec!["alice".to_string(), DEFAULT_SUBJECT.to_string()]);

        registry.remove("alice").await.unwrap();
        assert!(matches!(registry.get("alice").await, Err(Error::SubjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_duplicate_register() {
        let registry = SubjectRegistry::new();
        registry.register(Some("bob".to_string())).await.unwrap();
        let err = registry.register(Some("bob".to_string())).await.unwrap_err();
        assert!(matches!(err, Error::SubjectExists(_)));
    }

    #[tokio::test]
    async fn test_generated_ids_are_unique() {
        let registry = SubjectRegistry::new();
        let a = registry.register(None).await.unwrap();
        let b = registry.register(None).await.unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("subject_"));
    }

    #[tokio::test]
    async fn test_default_cannot_be_removed() {
        let registry = SubjectRegistry::new();
        let err = registry.remove(DEFAULT_SUBJECT).await.unwrap_err();
        assert!(matches!(err, Error::SubjectPinned(_)));
        assert!(matches!(registry.remove("ghost").await, Err(Error::SubjectNotFound(_))));
    }

    #[tokio::test]
    async fn test_state_is_per_subject() {
        let registry = SubjectRegistry::new();
        registry.register(Some("carol".to_string())).await.unwrap();
        registry.get("carol").await.unwrap().lock().await.record_utterance("lonely");
        assert_eq!(registry.get("carol").await.unwrap().lock().await.history().len(), 1);
        assert_eq!(registry.get(DEFAULT_SUBJECT).await.unwrap().lock().await.history().len(), 0);
    }

    #[tokio::test]
    async fn test_turn_lock_leaves_state_free() {
        let slot = SubjectSlot::new(Subject::new("dave"));
        let _turn = slot.begin_turn().await;

        let second = tokio::time::timeout(std::time::Duration::from_millis(20), slot.begin_turn()).await;
        assert!(second.is_err());

        slot.lock().await.record_utterance("worried");
        assert_eq!(slot.lock().await.history().len(), 1);
    }
}
