//! ServiHogar Rust Client Library
//!
//! A Rust client library for the ServiHogar service dispatch API, providing
//! session and role resolution, typed access to the clients, technicians,
//! service-ticket, agenda and warranty resources, and the booking flow that
//! creates an appointment with its embedded service ticket.

pub mod api;
pub mod auth;
pub mod booking;
pub mod config;
pub mod error;
pub mod fetch;

use std::sync::Arc;

use reqwest::Client;

use crate::api::{
    AgendaService, ApiHandle, ClientesService, GarantiasService, ServiciosService,
    TecnicosService,
};
use crate::auth::{Auth, MemoryStore, Session, SessionStore};
use crate::booking::Booking;
use crate::config::ClientOptions;

/// The main entry point for the ServiHogar Rust client
pub struct ServiHogar {
    /// The base URL of the API
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Auth client for login and session restoration
    pub auth: Auth,
    /// Client options
    pub options: ClientOptions,
}

impl ServiHogar {
    /// Create a new ServiHogar client with an in-memory session store
    ///
    /// # Example
    ///
    /// ```
    /// use servihogar_rust::ServiHogar;
    ///
    /// let servihogar = ServiHogar::new("https://api.servihogar.example");
    /// ```
    pub fn new(base_url: &str) -> Self {
        Self::new_with_store(base_url, Arc::new(MemoryStore::new()), ClientOptions::default())
    }

    /// Create a new ServiHogar client with custom options
    pub fn new_with_options(base_url: &str, options: ClientOptions) -> Self {
        Self::new_with_store(base_url, Arc::new(MemoryStore::new()), options)
    }

    /// Create a new ServiHogar client over a specific session store.
    ///
    /// The store is where the session survives restarts; a browser host hands
    /// in its local-storage wrapper, tests and tools use [`MemoryStore`].
    pub fn new_with_store(
        base_url: &str,
        store: Arc<dyn SessionStore>,
        options: ClientOptions,
    ) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_default();

        let auth = Auth::new(base_url, http_client.clone(), store, options.clone());

        Self {
            url: base_url.to_string(),
            http_client,
            auth,
            options,
        }
    }

    /// Get a reference to the auth client
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    fn api_handle(&self) -> ApiHandle {
        ApiHandle::new(&self.url, self.http_client.clone(), self.auth.session_handle())
    }

    /// Client for the `/clientes` resource
    pub fn clientes(&self) -> ClientesService {
        ClientesService::new(self.api_handle())
    }

    /// Client for the `/tecnicos` resource
    pub fn tecnicos(&self) -> TecnicosService {
        TecnicosService::new(self.api_handle())
    }

    /// Client for the `/servicios` resource
    pub fn servicios(&self) -> ServiciosService {
        ServiciosService::new(self.api_handle())
    }

    /// Client for the `/agenda` resource
    pub fn agenda(&self) -> AgendaService {
        AgendaService::new(self.api_handle())
    }

    /// Client for the `/garantias` resource
    pub fn garantias(&self) -> GarantiasService {
        GarantiasService::new(self.api_handle())
    }

    /// Start a booking flow acting for an explicit session
    ///
    /// # Example
    ///
    /// ```no_run
    /// use servihogar_rust::ServiHogar;
    /// use servihogar_rust::booking::BookingRequest;
    ///
    /// # async fn run() -> Result<(), servihogar_rust::error::Error> {
    /// let servihogar = ServiHogar::new("https://api.servihogar.example");
    /// let session = servihogar.auth().login("ana@x.com", "secreta").await?;
    ///
    /// let mut booking = servihogar.booking(session);
    /// booking
    ///     .submit(&BookingRequest {
    ///         cliente_id: None,
    ///         tecnico_id: Some(3),
    ///         descripcion: "fuga de agua".into(),
    ///         fecha_inicio: None,
    ///     })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn booking(&self, session: Session) -> Booking {
        Booking::new(
            session,
            self.clientes(),
            self.tecnicos(),
            self.servicios(),
            self.agenda(),
        )
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{Role, Session};
    pub use crate::booking::{Booking, BookingOutcome, BookingRequest, BookingState};
    pub use crate::config::ClientOptions;
    pub use crate::error::Error;
    pub use crate::ServiHogar;
}
