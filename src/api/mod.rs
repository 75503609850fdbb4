//! Service clients for the ServiHogar REST resources
//!
//! One client per resource collection, all sharing the same HTTP client and
//! the session cached by [`crate::auth::Auth`]. When a session is present its
//! bearer token rides along on every request.

mod agenda;
mod clientes;
mod garantias;
mod servicios;
mod tecnicos;

use std::sync::{Arc, Mutex};

use reqwest::Client;

use crate::auth::Session;
use crate::fetch::{Fetch, FetchBuilder};

pub use agenda::{AgendaService, Cita, CitaUpdate, EstadoCita, NuevaCita};
pub use clientes::{Cliente, ClienteRef, ClientesService, NuevoCliente};
pub use garantias::{Garantia, GarantiasService};
pub use servicios::{
    EstadoServicio, NuevoServicio, ResumenServicios, Servicio, ServiciosService,
};
pub use tecnicos::{NuevoTecnico, Tecnico, TecnicoRef, TecnicosService};

/// Shared request context for the resource services
#[derive(Clone)]
pub(crate) struct ApiHandle {
    base_url: String,
    client: Client,
    session: Arc<Mutex<Option<Session>>>,
}

impl ApiHandle {
    pub(crate) fn new(
        base_url: &str,
        client: Client,
        session: Arc<Mutex<Option<Session>>>,
    ) -> Self {
        Self {
            base_url: base_url.to_string(),
            client,
            session,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self) -> Option<String> {
        self.session
            .lock()
            .unwrap()
            .as_ref()
            .map(|session| session.token.clone())
    }

    fn authorize<'a>(&self, builder: FetchBuilder<'a>) -> FetchBuilder<'a> {
        match self.token() {
            Some(token) => builder.bearer_auth(&token),
            None => builder,
        }
    }

    pub(crate) fn get(&self, path: &str) -> FetchBuilder<'_> {
        self.authorize(Fetch::get(&self.client, &self.endpoint(path)))
    }

    pub(crate) fn post(&self, path: &str) -> FetchBuilder<'_> {
        self.authorize(Fetch::post(&self.client, &self.endpoint(path)))
    }

    pub(crate) fn put(&self, path: &str) -> FetchBuilder<'_> {
        self.authorize(Fetch::put(&self.client, &self.endpoint(path)))
    }

    pub(crate) fn delete(&self, path: &str) -> FetchBuilder<'_> {
        self.authorize(Fetch::delete(&self.client, &self.endpoint(path)))
    }
}
