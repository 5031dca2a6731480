use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use super::{CreateOutcome, User};

/// In-process user table, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn find_by_email(&self, email: &str) -> Option<User> {
        self.users
            .read()
            .values()
            .find(|user| user.email == email)
            .cloned()
    }

    pub(super) fn find_by_id(&self, id: Uuid) -> Option<User> {
        self.users.read().get(&id).cloned()
    }

    pub(super) fn create(&self, email: &str, password_hash: &str) -> CreateOutcome {
        let mut users = self.users.write();
        if users.values().any(|user| user.email == email) {
            return CreateOutcome::Conflict;
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.insert(user.id, user.clone());
        CreateOutcome::Created(user)
    }

    pub(super) fn update_password_hash(&self, id: Uuid, password_hash: &str) -> bool {
        match self.users.write().get_mut(&id) {
            Some(user) => {
                user.password_hash = password_hash.to_string();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{CreateOutcome, UserStore};
    use anyhow::{bail, Result};
    use uuid::Uuid;

    #[tokio::test]
    async fn create_and_find() -> Result<()> {
        let store = UserStore::memory();
        let CreateOutcome::Created(user) = store.create("alice@example.com", "hash").await? else {
            bail!("expected a new user");
        };

        assert_eq!(
            store.find_by_email("alice@example.com").await?,
            Some(user.clone())
        );
        assert_eq!(store.find_by_id(user.id).await?, Some(user));
        assert_eq!(store.find_by_email("bob@example.com").await?, None);
        assert_eq!(store.find_by_id(Uuid::new_v4()).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() -> Result<()> {
        let store = UserStore::memory();
        store.create("alice@example.com", "hash").await?;
        assert!(matches!(
            store.create("alice@example.com", "other").await?,
            CreateOutcome::Conflict
        ));
        Ok(())
    }

    #[tokio::test]
    async fn update_password_hash() -> Result<()> {
        let store = UserStore::memory();
        let CreateOutcome::Created(user) = store.create("alice@example.com", "old").await? else {
            bail!("expected a new user");
        };

        assert!(store.update_password_hash(user.id, "new").await?);
        let updated = store.find_by_id(user.id).await?;
        assert_eq!(updated.map(|u| u.password_hash), Some("new".to_string()));
        assert!(!store.update_password_hash(Uuid::new_v4(), "new").await?);
        Ok(())
    }

    #[tokio::test]
    async fn clones_share_state() -> Result<()> {
        let store = UserStore::memory();
        let clone = store.clone();
        store.create("alice@example.com", "hash").await?;
        assert!(clone.find_by_email("alice@example.com").await?.is_some());
        assert_eq!(clone.backend(), "memory");
        clone.ping().await
    }
}
