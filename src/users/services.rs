use anyhow::Context;
use tracing::{info, warn};
use uuid::Uuid;

use super::model::{normalize_email, NewUser, User};
use super::password::{hash_password, verify_password};
use super::store::UserStore;
use crate::validation::SaveOutcome;

/// Validate and persist a new account.
///
/// The email is stored in normalized form. The uniqueness pre-check here is
/// best-effort; under concurrent sign-ups the store's unique index has the
/// final word, and a violation surfaces as a fault rather than a message.
pub async fn register(
    store: &dyn UserStore,
    new_user: &NewUser,
) -> anyhow::Result<SaveOutcome<User>> {
    let mut errors = new_user.validate();
    let email = new_user.email.as_deref().map(normalize_email);

    if let Some(email) = email.as_deref().filter(|e| !e.is_empty()) {
        if store.find_by_email(email).await?.is_some() {
            errors.add("email", "has already been taken");
        }
    }

    if !errors.is_empty() {
        warn!(messages = errors.full_messages().len(), "rejected user save");
        return Ok(SaveOutcome::Rejected(errors));
    }

    let (Some(name), Some(email), Some(password)) = (
        new_user.name.as_deref(),
        email.as_deref(),
        new_user.password.as_deref(),
    ) else {
        anyhow::bail!("presence checks let a partial user through");
    };

    let password_hash = hash_password(password)?;
    let user = store
        .insert(name, email, &password_hash)
        .await
        .context("persist user")?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(SaveOutcome::Saved(user))
}

/// Validate and persist a profile or password update. The same rule set as
/// sign-up applies; the uniqueness pre-check ignores the account itself.
pub async fn update(
    store: &dyn UserStore,
    id: Uuid,
    changes: &NewUser,
) -> anyhow::Result<SaveOutcome<User>> {
    let mut errors = changes.validate();
    let email = changes.email.as_deref().map(normalize_email);

    if let Some(email) = email.as_deref().filter(|e| !e.is_empty()) {
        if let Some(existing) = store.find_by_email(email).await? {
            if existing.id != id {
                errors.add("email", "has already been taken");
            }
        }
    }

    if !errors.is_empty() {
        warn!(user_id = %id, "rejected user update");
        return Ok(SaveOutcome::Rejected(errors));
    }

    let (Some(name), Some(email), Some(password)) = (
        changes.name.as_deref(),
        email.as_deref(),
        changes.password.as_deref(),
    ) else {
        anyhow::bail!("presence checks let a partial user through");
    };

    let password_hash = hash_password(password)?;
    let user = store
        .update(id, name, email, &password_hash)
        .await
        .context("persist user update")?;
    info!(user_id = %user.id, "user updated");
    Ok(SaveOutcome::Saved(user))
}

/// Look up an account by credentials.
///
/// The email is normalized before the lookup. Unknown email and wrong
/// password both come back as `None`; callers cannot tell which happened.
pub async fn authenticate(
    store: &dyn UserStore,
    raw_email: &str,
    raw_password: &str,
) -> anyhow::Result<Option<User>> {
    let email = normalize_email(raw_email);
    let Some(user) = store.find_by_email(&email).await? else {
        warn!(email = %email, "login with unknown email");
        return Ok(None);
    };

    if verify_password(raw_password, &user.password_hash)? {
        info!(user_id = %user.id, "user authenticated");
        Ok(Some(user))
    } else {
        warn!(user_id = %user.id, "login with wrong password");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use time::OffsetDateTime;

    use super::*;

    #[derive(Default)]
    struct MemoryUserStore {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserStore for MemoryUserStore {
        async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn find(&self, id: Uuid) -> anyhow::Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned())
        }

        async fn insert(
            &self,
            name: &str,
            email: &str,
            password_hash: &str,
        ) -> anyhow::Result<User> {
            let user = User {
                id: Uuid::new_v4(),
                name: name.to_string(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: OffsetDateTime::now_utc(),
            };
            self.users.lock().unwrap().push(user.clone());
            Ok(user)
        }

        async fn update(
            &self,
            id: Uuid,
            name: &str,
            email: &str,
            password_hash: &str,
        ) -> anyhow::Result<User> {
            let mut users = self.users.lock().unwrap();
            let user = users
                .iter_mut()
                .find(|u| u.id == id)
                .ok_or_else(|| anyhow::anyhow!("no such user"))?;
            user.name = name.to_string();
            user.email = email.to_string();
            user.password_hash = password_hash.to_string();
            Ok(user.clone())
        }
    }

    fn kevin() -> NewUser {
        NewUser {
            name: Some("Kevin Kim".into()),
            email: Some("ex@example.com".into()),
            password: Some("password".into()),
            password_confirmation: Some("password".into()),
        }
    }

    #[tokio::test]
    async fn registers_a_valid_user_with_a_hashed_password() {
        let store = MemoryUserStore::default();
        let user = register(&store, &kevin())
            .await
            .unwrap()
            .saved()
            .expect("valid user should save");
        assert_eq!(user.email, "ex@example.com");
        assert_ne!(user.password_hash, "password");
    }

    #[tokio::test]
    async fn stores_the_normalized_email() {
        let store = MemoryUserStore::default();
        let mut input = kevin();
        input.email = Some(" Ex@Example.CoM ".into());
        let user = register(&store, &input)
            .await
            .unwrap()
            .saved()
            .expect("valid user should save");
        assert_eq!(user.email, "ex@example.com");
    }

    #[tokio::test]
    async fn rejects_a_duplicate_email_ignoring_case() {
        let store = MemoryUserStore::default();
        register(&store, &kevin())
            .await
            .unwrap()
            .saved()
            .expect("first save");

        let mut duplicate = kevin();
        duplicate.email = Some("Ex@example.CoM".into());
        let outcome = register(&store, &duplicate).await.unwrap();
        let errors = outcome.errors().expect("duplicate email must not save");
        assert!(errors
            .full_messages()
            .contains(&"Email has already been taken".to_string()));
        assert_eq!(store.users.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejection_leaves_no_partial_write() {
        let store = MemoryUserStore::default();
        let mut input = kevin();
        input.name = None;
        let outcome = register(&store, &input).await.unwrap();
        assert!(!outcome.is_saved());
        assert!(store.users.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_own_email_and_rejects_taken_ones() {
        let store = MemoryUserStore::default();
        let kevin_user = register(&store, &kevin())
            .await
            .unwrap()
            .saved()
            .expect("first save");
        let mut other = kevin();
        other.email = Some("other@example.com".into());
        let other_user = register(&store, &other)
            .await
            .unwrap()
            .saved()
            .expect("second save");

        let mut rename = kevin();
        rename.name = Some("Kevin K.".into());
        let updated = update(&store, kevin_user.id, &rename)
            .await
            .unwrap()
            .saved()
            .expect("own email stays usable");
        assert_eq!(updated.name, "Kevin K.");

        let mut steal = kevin();
        steal.email = Some("other@example.com".into());
        let outcome = update(&store, kevin_user.id, &steal).await.unwrap();
        let errors = outcome.errors().expect("taken email must not save");
        assert!(errors
            .full_messages()
            .contains(&"Email has already been taken".to_string()));
        assert_eq!(
            store
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == other_user.id)
                .unwrap()
                .email,
            "other@example.com"
        );
    }

    #[tokio::test]
    async fn authenticates_with_exact_credentials() {
        let store = MemoryUserStore::default();
        let saved = register(&store, &kevin()).await.unwrap().saved().unwrap();
        let user = authenticate(&store, "ex@example.com", "password")
            .await
            .unwrap()
            .expect("matching credentials should log in");
        assert_eq!(user.id, saved.id);
    }

    #[tokio::test]
    async fn authenticates_ignoring_email_case() {
        let store = MemoryUserStore::default();
        let saved = register(&store, &kevin()).await.unwrap().saved().unwrap();
        let user = authenticate(&store, "ex@Example.cOM", "password")
            .await
            .unwrap()
            .expect("case-variant email should log in");
        assert_eq!(user.email, saved.email);
    }

    #[tokio::test]
    async fn authenticates_ignoring_surrounding_spaces() {
        let store = MemoryUserStore::default();
        let saved = register(&store, &kevin()).await.unwrap().saved().unwrap();
        let user = authenticate(&store, " ex@Example.cOM ", "password")
            .await
            .unwrap()
            .expect("padded email should log in");
        assert_eq!(user.email, saved.email);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let store = MemoryUserStore::default();
        register(&store, &kevin()).await.unwrap().saved().unwrap();

        let unknown = authenticate(&store, "wrong@example.com", "password")
            .await
            .unwrap();
        let wrong_password = authenticate(&store, "ex@example.com", "helloworld")
            .await
            .unwrap();
        assert!(unknown.is_none());
        assert!(wrong_password.is_none());
    }
}
