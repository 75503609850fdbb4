//! Session and role resolution for the ServiHogar API
//!
//! Decodes the bearer token issued by `/auth/login` into a [`Session`] with a
//! normalized [`Role`], persists it through a [`SessionStore`], and restores
//! it on startup. Decode failures and expired tokens are never fatal: the
//! resolver falls back to "no session" and clears whatever was persisted.

mod session;
mod store;
mod token;

use std::sync::{Arc, Mutex};

use chrono::Utc;
use log::{info, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::config::ClientOptions;
use crate::error::Error;
use crate::fetch::Fetch;

pub use session::Session;
pub use store::{MemoryStore, SessionStore, KEY_ROLE, KEY_TOKEN, KEY_USERNAME};
pub use token::{decode_claims, Claims, Role};

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
}

/// Client for authentication against the ServiHogar API
pub struct Auth {
    /// The base URL for the API
    url: String,

    /// HTTP client used for requests
    client: Client,

    /// Persisted session state
    store: Arc<dyn SessionStore>,

    /// The current session
    session: Arc<Mutex<Option<Session>>>,

    /// Client options
    options: ClientOptions,
}

impl Auth {
    /// Create a new Auth client
    pub(crate) fn new(
        url: &str,
        client: Client,
        store: Arc<dyn SessionStore>,
        options: ClientOptions,
    ) -> Self {
        Self {
            url: url.to_string(),
            client,
            store,
            session: Arc::new(Mutex::new(None)),
            options,
        }
    }

    /// Handle shared with the service clients so requests carry the bearer token
    pub(crate) fn session_handle(&self) -> Arc<Mutex<Option<Session>>> {
        Arc::clone(&self.session)
    }

    /// Get the current session
    pub fn current_session(&self) -> Option<Session> {
        self.session.lock().unwrap().clone()
    }

    /// Log in with a username (or email) and password.
    ///
    /// Submits the credentials, decodes the returned token to learn the role,
    /// persists token, username and role, and caches the new session.
    /// Rejected credentials and token-less responses are
    /// [`Error::Authentication`].
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, Error> {
        let url = format!("{}{}", self.url, self.options.auth_path);

        let payload = serde_json::json!({
            "username": username,
            "password": password,
        });

        let response = Fetch::post(&self.client, &url)
            .json(&payload)?
            .execute_raw()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            warn!("login rechazado ({}): {}", status, text);
            return Err(Error::authentication(format!(
                "credenciales rechazadas ({})",
                status
            )));
        }

        let body: LoginResponse = response.json().await?;
        let token = body
            .token
            .ok_or_else(|| Error::authentication("no se recibió token"))?;

        let claims = decode_claims(&token)?;
        let role = Role::from_claims(&claims);

        let session = Session::new(token, username.to_string(), role, claims.exp);

        if self.options.persist_session {
            self.store.set(KEY_TOKEN, &session.token);
            self.store.set(KEY_USERNAME, &session.username);
            self.store.set(KEY_ROLE, role.as_str());
        }

        let mut current = self.session.lock().unwrap();
        *current = Some(session.clone());

        info!("sesión iniciada como {} ({})", session.username, role.as_str());
        Ok(session)
    }

    /// Restore a persisted session.
    ///
    /// Returns `None` when nothing is persisted, and also when the persisted
    /// token cannot be decoded or its expiry has passed; both failure cases
    /// run the same cleanup as [`Auth::logout`], never a partial clear.
    pub fn restore(&self) -> Option<Session> {
        let token = self.store.get(KEY_TOKEN)?;

        let claims = match decode_claims(&token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("token persistido ilegible, limpiando sesión: {}", e);
                self.clear_session();
                return None;
            }
        };

        // Un exp ausente cuenta como vencido
        match claims.exp {
            Some(exp) if exp > Utc::now().timestamp() => {}
            _ => {
                warn!("token expirado, limpiando sesión");
                self.clear_session();
                return None;
            }
        }

        let role = Role::from_claims(&claims);
        let username = self
            .store
            .get(KEY_USERNAME)
            .or_else(|| claims.sub.clone())
            .unwrap_or_default();

        // Reescribe el rol por si la clave faltaba
        if self.options.persist_session {
            self.store.set(KEY_ROLE, role.as_str());
        }

        let session = Session::new(token, username, role, claims.exp);

        let mut current = self.session.lock().unwrap();
        *current = Some(session.clone());

        info!("sesión restaurada, rol {}", role.as_str());
        Some(session)
    }

    /// Log out: clears the persisted state and the cached session. Never fails.
    pub fn logout(&self) {
        self.clear_session();
        info!("sesión cerrada");
    }

    fn clear_session(&self) {
        self.store.clear();
        let mut current = self.session.lock().unwrap();
        *current = None;
    }
}
