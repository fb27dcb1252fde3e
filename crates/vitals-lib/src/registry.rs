//! In-memory user registry
//!
//! Holds the mutable user collection and its id counter behind a single
//! lock. Identifiers start at 1, grow monotonically, and are never reused
//! after deletion. State is process-local and lost on restart.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::models::{User, UserDraft};

/// Shared handle to the user store. Clones share the same state.
#[derive(Debug, Clone)]
pub struct UserRegistry {
    inner: Arc<RwLock<RegistryState>>,
}

#[derive(Debug)]
struct RegistryState {
    users: Vec<User>,
    next_id: u64,
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRegistry {
    /// Create a registry pre-populated with the demo seed records.
    pub fn new() -> Self {
        let users = vec![
            User {
                id: 1,
                name: "John Doe".to_string(),
                email: "john.doe@example.com".to_string(),
            },
            User {
                id: 2,
                name: "Jane Smith".to_string(),
                email: "jane.smith@example.com".to_string(),
            },
        ];
        let next_id = users.len() as u64 + 1;

        Self {
            inner: Arc::new(RwLock::new(RegistryState { users, next_id })),
        }
    }

    /// Snapshot copy of all users in insertion order
    pub async fn list_all(&self) -> Vec<User> {
        self.inner.read().await.users.clone()
    }

    /// Number of stored records
    pub async fn count(&self) -> usize {
        self.inner.read().await.users.len()
    }

    /// Look up a user by id
    pub async fn get_by_id(&self, id: u64) -> Option<User> {
        self.inner
            .read()
            .await
            .users
            .iter()
            .find(|user| user.id == id)
            .cloned()
    }

    /// Assign the next id to `draft`, append it, and return the stored
    /// record. Payload constraints are the caller's concern.
    pub async fn create(&self, draft: UserDraft) -> User {
        let mut state = self.inner.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let user = User {
            id,
            name: draft.name,
            email: draft.email,
        };
        state.users.push(user.clone());
        user
    }

    /// Replace the name and email of the record with `id`, keeping the id.
    /// Returns `None` and leaves the collection unchanged when absent.
    pub async fn update(&self, id: u64, draft: UserDraft) -> Option<User> {
        let mut state = self.inner.write().await;
        let user = state.users.iter_mut().find(|user| user.id == id)?;
        user.name = draft.name;
        user.email = draft.email;
        Some(user.clone())
    }

    /// Remove the record with `id`; returns whether a removal occurred.
    pub async fn delete(&self, id: u64) -> bool {
        let mut state = self.inner.write().await;
        let before = state.users.len();
        state.users.retain(|user| user.id != id);
        state.users.len() != before
    }
}
