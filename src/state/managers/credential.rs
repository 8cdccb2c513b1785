//! Credential store.
//!
//! Holds client id → (secret, role) for every known user. Records are loaded
//! from the user log at startup and appended to it on creation; they are
//! never modified or deleted.

use crate::error::{Existing, HandlerError};
use crate::security::{hash_password, verify_secret};
use crate::store::{LogKind, LogStore, StoreError, UserRecord};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use emcom_proto::RoleLevel;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
struct Credential {
    secret: String,
    role: RoleLevel,
}

pub struct CredentialManager {
    users: DashMap<String, Credential>,
    store: Arc<dyn LogStore>,
    hash_new_passwords: bool,
}

impl CredentialManager {
    pub fn new(store: Arc<dyn LogStore>, hash_new_passwords: bool) -> Self {
        Self {
            users: DashMap::new(),
            store,
            hash_new_passwords,
        }
    }

    /// Replay the user log. A later record for the same id replaces an
    /// earlier one; malformed lines are skipped.
    pub async fn load(&self) -> Result<usize, StoreError> {
        for line in self.store.read_all(LogKind::Users).await? {
            match line.parse::<UserRecord>() {
                Ok(rec) => {
                    self.users.insert(
                        rec.id,
                        Credential {
                            secret: rec.secret,
                            role: rec.role,
                        },
                    );
                }
                Err(e) => warn!(error = %e, "Skipping user record"),
            }
        }
        info!(count = self.users.len(), "Loaded users");
        Ok(self.users.len())
    }

    /// True iff `id` exists and `secret` matches its stored secret.
    pub fn authenticate(&self, id: &str, secret: &str) -> bool {
        let stored = match self.users.get(id) {
            Some(cred) => cred.secret.clone(),
            None => return false,
        };
        verify_secret(secret, &stored)
    }

    pub fn role_of(&self, id: &str) -> Option<RoleLevel> {
        self.users.get(id).map(|c| c.role)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.users.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Create and persist a user.
    ///
    /// The id is claimed in memory first so two concurrent creations of the
    /// same id cannot both succeed; the claim is released if persisting fails.
    pub async fn create_user(
        &self,
        id: &str,
        secret: &str,
        profile: &str,
    ) -> Result<RoleLevel, HandlerError> {
        let role = RoleLevel::from_profile(profile)
            .ok_or_else(|| HandlerError::InvalidProfile(profile.to_string()))?;

        let stored_secret = if self.hash_new_passwords {
            hash_password(secret).map_err(|e| HandlerError::Internal(e.to_string()))?
        } else {
            secret.to_string()
        };

        match self.users.entry(id.to_string()) {
            Entry::Occupied(_) => {
                return Err(HandlerError::AlreadyExists(Existing::User(id.to_string())));
            }
            Entry::Vacant(slot) => {
                slot.insert(Credential {
                    secret: stored_secret.clone(),
                    role,
                });
            }
        }

        let record = UserRecord {
            id: id.to_string(),
            secret: stored_secret,
            role,
        };
        if let Err(e) = self.store.append(LogKind::Users, &record.to_string()).await {
            self.users.remove(id);
            return Err(e.into());
        }

        info!(client_id = %id, role = role.level(), "User created");
        Ok(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    async fn loaded(lines: &[&str]) -> (CredentialManager, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new().with_lines(LogKind::Users, lines.iter().copied()));
        let creds = CredentialManager::new(store.clone(), false);
        creds.load().await.unwrap();
        (creds, store)
    }

    #[tokio::test]
    async fn authenticate_requires_exact_secret() {
        let (creds, _) = loaded(&["alice:pw:todos", "bob:s3:Coordenador Regional"]).await;
        assert!(creds.authenticate("alice", "pw"));
        assert!(!creds.authenticate("alice", "PW"));
        assert!(!creds.authenticate("alice", "s3"));
        assert!(!creds.authenticate("nobody", "pw"));
    }

    #[tokio::test]
    async fn load_maps_every_profile() {
        let (creds, _) = loaded(&[
            "a:x:todos",
            "b:x:Coordenador Regional",
            "c:x:Operador de Nivel Medio",
            "d:x:Administrador",
            "garbage",
        ])
        .await;
        assert_eq!(creds.len(), 4);
        assert_eq!(creds.role_of("a"), Some(RoleLevel::Public));
        assert_eq!(creds.role_of("b"), Some(RoleLevel::RegionalCoordinator));
        assert_eq!(creds.role_of("c"), Some(RoleLevel::MidLevelOperator));
        assert_eq!(creds.role_of("d"), Some(RoleLevel::Administrator));
        assert_eq!(creds.role_of("e"), None);
    }

    #[tokio::test]
    async fn create_user_persists_and_rejects_duplicates() {
        let (creds, store) = loaded(&["alice:pw:todos"]).await;

        let role = creds
            .create_user("carol", "pw1", "administrador")
            .await
            .unwrap();
        assert_eq!(role, RoleLevel::Administrator);
        assert!(creds.authenticate("carol", "pw1"));

        let err = creds.create_user("carol", "other", "todos").await.unwrap_err();
        assert!(matches!(err, HandlerError::AlreadyExists(Existing::User(_))));
        assert!(creds.authenticate("carol", "pw1"));

        let lines = store.read_all(LogKind::Users).await.unwrap();
        assert_eq!(lines, vec!["alice:pw:todos", "carol:pw1:Administrador"]);
    }

    #[tokio::test]
    async fn invalid_profile_creates_nothing() {
        let (creds, store) = loaded(&[]).await;
        let err = creds.create_user("dave", "pw", "chefe").await.unwrap_err();
        assert!(matches!(err, HandlerError::InvalidProfile(_)));
        assert!(!creds.contains("dave"));
        assert!(store.read_all(LogKind::Users).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn hashed_users_authenticate_after_reload() {
        let store = Arc::new(MemoryStore::new());
        let creds = CredentialManager::new(store.clone(), true);
        creds.create_user("eve", "segredo", "todos").await.unwrap();

        let line = &store.read_all(LogKind::Users).await.unwrap()[0];
        assert!(line.starts_with("eve:$argon2"));
        assert!(!line.contains("segredo"));

        let reloaded = CredentialManager::new(store.clone(), false);
        reloaded.load().await.unwrap();
        assert!(reloaded.authenticate("eve", "segredo"));
        assert!(!reloaded.authenticate("eve", "errado"));
    }
}
