//! Persistence seam for engine records.
//!
//! The engine does not own a database. It emits [`UserProfile`],
//! [`TaskRecord`], and [`ConversationTurn`] values through this trait
//! and the embedding application decides where they go.

use async_trait::async_trait;
use thiserror::Error;

use tierline_types::{ConversationTurn, TaskRecord, UserProfile};

/// Errors from a persistence backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Backend(String),
}

/// Where engine records go.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Create or update a user profile.
    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;

    /// Append a task to history.
    async fn save_task(&self, record: &TaskRecord) -> Result<(), StoreError>;

    /// Append a conversation turn.
    async fn append_turn(&self, turn: &ConversationTurn) -> Result<(), StoreError>;
}

/// In-memory store, for tests and ephemeral sessions.
#[derive(Default)]
pub struct InMemoryStore {
    inner: std::sync::Mutex<InMemoryState>,
}

#[derive(Default)]
struct InMemoryState {
    profiles: Vec<UserProfile>,
    tasks: Vec<TaskRecord>,
    turns: Vec<ConversationTurn>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recent tasks for a user, newest first.
    pub fn recent_tasks(&self, user_id: &str, limit: usize) -> Vec<TaskRecord> {
        let state = self.inner.lock().expect("store lock poisoned");
        state
            .tasks
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .take(limit)
            .cloned()
            .collect()
    }

    /// Conversation history for a user, oldest first.
    pub fn conversation(&self, user_id: &str, limit: usize) -> Vec<ConversationTurn> {
        let state = self.inner.lock().expect("store lock poisoned");
        let mut turns: Vec<ConversationTurn> = state
            .turns
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .take(limit)
            .cloned()
            .collect();
        turns.reverse();
        turns
    }

    /// Profile for a user, if one was saved.
    pub fn profile(&self, user_id: &str) -> Option<UserProfile> {
        let state = self.inner.lock().expect("store lock poisoned");
        state
            .profiles
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn save_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let mut state = self.inner.lock().expect("store lock poisoned");
        if let Some(existing) = state
            .profiles
            .iter_mut()
            .find(|p| p.user_id == profile.user_id)
        {
            *existing = profile.clone();
        } else {
            state.profiles.push(profile.clone());
        }
        Ok(())
    }

    async fn save_task(&self, record: &TaskRecord) -> Result<(), StoreError> {
        let mut state = self.inner.lock().expect("store lock poisoned");
        state.tasks.push(record.clone());
        Ok(())
    }

    async fn append_turn(&self, turn: &ConversationTurn) -> Result<(), StoreError> {
        let mut state = self.inner.lock().expect("store lock poisoned");
        state.turns.push(turn.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tierline_types::{Intent, TaskPlan, TaskRecord};

    fn record(user_id: &str, message: &str) -> TaskRecord {
        let plan = TaskPlan::new(user_id, message, Intent::GeneralChat);
        TaskRecord::from_plan(&plan, "ok")
    }

    #[tokio::test]
    async fn tasks_come_back_newest_first() {
        let store = InMemoryStore::new();
        store.save_task(&record("u1", "first")).await.unwrap();
        store.save_task(&record("u1", "second")).await.unwrap();
        store.save_task(&record("u2", "other user")).await.unwrap();

        let tasks = store.recent_tasks("u1", 10);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].original_message, "second");
        assert_eq!(tasks[1].original_message, "first");

        assert_eq!(store.recent_tasks("u1", 1).len(), 1);
    }

    #[tokio::test]
    async fn conversation_comes_back_in_order() {
        let store = InMemoryStore::new();
        store
            .append_turn(&ConversationTurn::new("u1", "user", "hi", "cli"))
            .await
            .unwrap();
        store
            .append_turn(&ConversationTurn::new("u1", "assistant", "hello", "cli"))
            .await
            .unwrap();

        let turns = store.conversation("u1", 10);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, "user");
        assert_eq!(turns[1].role, "assistant");
    }

    #[tokio::test]
    async fn profile_upserts() {
        let store = InMemoryStore::new();
        let mut profile = UserProfile {
            user_id: "u1".to_string(),
            name: "Asha".to_string(),
            ..UserProfile::default()
        };
        store.save_profile(&profile).await.unwrap();

        profile.detected_role = "developer".to_string();
        store.save_profile(&profile).await.unwrap();

        let stored = store.profile("u1").unwrap();
        assert_eq!(stored.detected_role, "developer");
        assert!(store.profile("unknown").is_none());
    }
}
