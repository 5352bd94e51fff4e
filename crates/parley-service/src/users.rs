use std::sync::Arc;

use parley_store::{KeyValueStore, keys};
use parley_types::api::{CreateUserRequest, UpdateUserRequest};
use parley_types::models::User;
use tracing::{info, warn};

use crate::error::Result;
use crate::records::UserRecord;

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn KeyValueStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Provision a user. Any client-supplied id is discarded before a
    /// fresh one is minted.
    pub fn create(&self, req: &CreateUserRequest) -> Result<User> {
        if let Some(supplied) = &req.user_id {
            warn!("ignoring client-supplied userID {supplied} on create");
        }

        let record = UserRecord::from_input(req, crate::now_millis());
        info!("provisioning user {}", record.user_id);
        self.store.put(&record.user_id, record.to_fields())?;

        // Return what is actually durable, not what we think we wrote.
        let stored = UserRecord::load(self.store.as_ref(), &record.user_id)?;
        Ok(stored.into_resource())
    }

    pub fn retrieve(&self, user_id: &str) -> Result<User> {
        Ok(UserRecord::load(self.store.as_ref(), user_id)?.into_resource())
    }

    /// Overwrite the nickname; every other field in the input is immutable
    /// and dropped. No write happens when nothing effectively changes.
    pub fn update(&self, user_id: &str, req: &UpdateUserRequest) -> Result<User> {
        let mut record = UserRecord::load(self.store.as_ref(), user_id)?;

        if req.first_name.is_some() || req.last_name.is_some() {
            warn!("ignoring immutable name fields in update of {user_id}");
        }

        let mut changed = false;
        if let Some(nickname) = &req.nickname {
            if *nickname != record.nickname {
                record.nickname = nickname.clone();
                changed = true;
            }
        }

        if changed {
            record.last_modified = crate::now_millis();
            self.store.put(user_id, record.to_fields())?;
        }

        let stored = UserRecord::load(self.store.as_ref(), user_id)?;
        Ok(stored.into_resource())
    }

    /// Full scan of the USER keyspace. O(users); there is no secondary
    /// index, which is acceptable at this system's scale.
    pub fn list_all(&self) -> Result<Vec<User>> {
        let mut users = Vec::new();
        for key in self.store.scan_keys(keys::USER_PREFIX)? {
            users.push(UserRecord::load(self.store.as_ref(), &key)?.into_resource());
        }
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_store::MemoryStore;

    fn repo() -> UserRepository {
        UserRepository::new(Arc::new(MemoryStore::new()))
    }

    fn create_req(nickname: &str) -> CreateUserRequest {
        CreateUserRequest {
            user_id: Some("USER:client-supplied".into()),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            nickname: nickname.into(),
        }
    }

    #[test]
    fn create_mints_its_own_id_and_round_trips() {
        let users = repo();
        let created = users.create(&create_req("ada")).unwrap();

        assert!(created.user_id.starts_with("USER:"));
        assert_ne!(created.user_id, "USER:client-supplied");

        let fetched = users.retrieve(&created.user_id).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn update_changes_nickname_only() {
        let users = repo();
        let created = users.create(&create_req("ada")).unwrap();

        let updated = users
            .update(
                &created.user_id,
                &UpdateUserRequest {
                    user_id: None,
                    first_name: Some("Grace".into()),
                    last_name: Some("Hopper".into()),
                    nickname: Some("countess".into()),
                },
            )
            .unwrap();

        assert_eq!(updated.nickname, "countess");
        // immutable fields silently kept
        assert_eq!(updated.first_name, "Ada");
        assert_eq!(updated.last_name, "Lovelace");
    }

    #[test]
    fn update_of_unknown_user_is_not_found() {
        let users = repo();
        let result = users.update(
            "USER:ghost",
            &UpdateUserRequest {
                user_id: None,
                first_name: None,
                last_name: None,
                nickname: Some("boo".into()),
            },
        );
        assert!(matches!(result, Err(crate::ServiceError::NotFound(_))));
    }

    #[test]
    fn list_all_sees_every_user_and_nothing_else() {
        let users = repo();
        users.create(&create_req("a")).unwrap();
        users.create(&create_req("b")).unwrap();

        let all = users.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|u| u.user_id.starts_with("USER:")));
    }
}
