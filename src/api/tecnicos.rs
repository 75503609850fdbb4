//! Technician directory: the `/tecnicos` resource

use serde::{Deserialize, Serialize};

use super::ApiHandle;
use crate::error::Error;

/// A registered technician
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tecnico {
    pub id: i64,
    pub nombre: String,
    pub apellido: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefono: Option<String>,
    pub especialidad: String,
    #[serde(default)]
    pub foto: Option<String>,
    pub disponible: bool,
}

impl Tecnico {
    /// Match this profile's email against a login identifier
    pub fn email_matches(&self, identifier: &str) -> bool {
        match &self.email {
            Some(email) => email.trim().eq_ignore_ascii_case(identifier.trim()),
            None => false,
        }
    }

    /// Reference to this technician for nested payloads
    pub fn referencia(&self) -> TecnicoRef {
        TecnicoRef { id: self.id }
    }
}

/// Creation/update payload, without the server-assigned id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NuevoTecnico {
    pub nombre: String,
    pub apellido: String,
    pub email: String,
    pub telefono: String,
    pub especialidad: String,
    pub foto: Option<String>,
    pub disponible: bool,
}

/// Id-only reference used inside nested payloads, serialized as `{"id": n}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TecnicoRef {
    pub id: i64,
}

/// Client for the `/tecnicos` resource
pub struct TecnicosService {
    api: ApiHandle,
}

impl TecnicosService {
    pub(crate) fn new(api: ApiHandle) -> Self {
        Self { api }
    }

    /// Fetch every registered technician
    pub async fn listar(&self) -> Result<Vec<Tecnico>, Error> {
        self.api.get("/tecnicos").execute().await
    }

    /// Fetch one technician by id
    pub async fn obtener(&self, id: i64) -> Result<Tecnico, Error> {
        self.api.get(&format!("/tecnicos/{}", id)).execute().await
    }

    /// Register a new technician
    pub async fn crear(&self, datos: &NuevoTecnico) -> Result<Tecnico, Error> {
        self.api.post("/tecnicos").json(datos)?.execute().await
    }

    /// Update an existing technician
    pub async fn actualizar(&self, id: i64, datos: &NuevoTecnico) -> Result<Tecnico, Error> {
        self.api
            .put(&format!("/tecnicos/{}", id))
            .json(datos)?
            .execute()
            .await
    }

    /// Delete a technician
    pub async fn eliminar(&self, id: i64) -> Result<(), Error> {
        self.api
            .delete(&format!("/tecnicos/{}", id))
            .execute_empty()
            .await
    }

    /// Fetch only the technicians currently marked available
    pub async fn disponibles(&self) -> Result<Vec<Tecnico>, Error> {
        let tecnicos = self.listar().await?;
        Ok(tecnicos.into_iter().filter(|t| t.disponible).collect())
    }

    /// Find the profile whose email matches a login identifier
    pub async fn buscar_por_email(&self, email: &str) -> Result<Option<Tecnico>, Error> {
        let tecnicos = self.listar().await?;
        Ok(tecnicos.into_iter().find(|t| t.email_matches(email)))
    }
}
