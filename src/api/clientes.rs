//! Client directory: the `/clientes` resource

use serde::{Deserialize, Serialize};

use super::ApiHandle;
use crate::error::Error;

/// A registered client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cliente {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    #[serde(default)]
    pub direccion: Option<String>,
}

impl Cliente {
    /// Match this profile's email against a login identifier.
    ///
    /// Comparison ignores case and surrounding whitespace on both sides; a
    /// profile without an email never matches.
    pub fn email_matches(&self, identifier: &str) -> bool {
        match &self.email {
            Some(email) => email.trim().eq_ignore_ascii_case(identifier.trim()),
            None => false,
        }
    }

    /// Reference to this client for nested payloads
    pub fn referencia(&self) -> ClienteRef {
        ClienteRef { id: self.id }
    }
}

/// Creation/update payload, without the server-assigned id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NuevoCliente {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub direccion: String,
}

/// Id-only reference used inside nested payloads, serialized as `{"id": n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClienteRef {
    pub id: i64,
}

/// Client for the `/clientes` resource
pub struct ClientesService {
    api: ApiHandle,
}

impl ClientesService {
    pub(crate) fn new(api: ApiHandle) -> Self {
        Self { api }
    }

    /// Fetch every registered client
    pub async fn listar(&self) -> Result<Vec<Cliente>, Error> {
        self.api.get("/clientes").execute().await
    }

    /// Fetch one client by id
    pub async fn obtener(&self, id: i64) -> Result<Cliente, Error> {
        self.api.get(&format!("/clientes/{}", id)).execute().await
    }

    /// Register a new client
    pub async fn crear(&self, datos: &NuevoCliente) -> Result<Cliente, Error> {
        self.api.post("/clientes").json(datos)?.execute().await
    }

    /// Update an existing client
    pub async fn actualizar(&self, id: i64, datos: &NuevoCliente) -> Result<Cliente, Error> {
        self.api
            .put(&format!("/clientes/{}", id))
            .json(datos)?
            .execute()
            .await
    }

    /// Delete a client
    pub async fn eliminar(&self, id: i64) -> Result<(), Error> {
        self.api
            .delete(&format!("/clientes/{}", id))
            .execute_empty()
            .await
    }

    /// Find the profile whose email matches a login identifier.
    ///
    /// The directory has no lookup endpoint, so this reads the collection and
    /// matches locally, the way the front ends resolve "my profile".
    pub async fn buscar_por_email(&self, email: &str) -> Result<Option<Cliente>, Error> {
        let clientes = self.listar().await?;
        Ok(clientes.into_iter().find(|c| c.email_matches(email)))
    }
}
