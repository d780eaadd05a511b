//! crates/diatwin_core/src/auth.rs
//!
//! Mock authentication. Any email/password pair is accepted and every account
//! gets the same opaque id; the only real work is keeping the `user` key in sync.

use crate::domain::User;
use crate::latency::{pause, Latency};
use crate::ports::{keys, KeyValueStore, PortResult};
use crate::store::{load_json, store_json};
use std::sync::Arc;
use tracing::info;

pub const MOCK_USER_ID: &str = "123";

pub struct AuthService {
    storage: Arc<dyn KeyValueStore>,
    latency: Latency,
}

impl AuthService {
    pub fn new(storage: Arc<dyn KeyValueStore>, latency: Latency) -> Self {
        Self { storage, latency }
    }

    /// Returns the user left signed in by a previous run, if any.
    pub async fn restore(&self) -> PortResult<Option<User>> {
        load_json(self.storage.as_ref(), keys::USER).await
    }

    pub async fn sign_in(&self, email: &str, _password: &str) -> PortResult<User> {
        pause(self.latency.sign_in).await;
        self.issue(email, None).await
    }

    pub async fn sign_up(&self, email: &str, _password: &str, name: &str) -> PortResult<User> {
        pause(self.latency.sign_in).await;
        self.issue(email, Some(name.to_string())).await
    }

    pub async fn sign_out(&self) -> PortResult<()> {
        pause(self.latency.sign_out).await;
        self.storage.remove(keys::USER).await?;
        info!("Signed out.");
        Ok(())
    }

    async fn issue(&self, email: &str, name: Option<String>) -> PortResult<User> {
        let user = User {
            id: MOCK_USER_ID.to_string(),
            email: email.to_string(),
            name,
            profile_complete: false,
        };
        store_json(self.storage.as_ref(), keys::USER, &user).await?;
        info!(user_id = %user.id, email = %user.email, "Signed in.");
        Ok(user)
    }
}
