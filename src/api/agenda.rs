//! Appointment slots: the `/agenda` resource

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::servicios::{NuevoServicio, Servicio};
use super::tecnicos::{Tecnico, TecnicoRef};
use super::ApiHandle;
use crate::error::Error;

/// Lifecycle state of an appointment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoCita {
    Reservado,
    Pendiente,
    Disponible,
    Cancelado,
}

/// A scheduled appointment linking a technician, a time window and a ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cita {
    pub id: i64,
    pub fecha_hora_inicio: NaiveDateTime,
    pub fecha_hora_fin: NaiveDateTime,
    pub estado: EstadoCita,
    #[serde(default)]
    pub tecnico: Option<Tecnico>,
    #[serde(default)]
    pub servicio: Option<Servicio>,
}

/// Creation payload: the slot together with its embedded new ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevaCita {
    pub fecha_hora_inicio: NaiveDateTime,
    pub fecha_hora_fin: NaiveDateTime,
    pub estado: EstadoCita,
    pub tecnico: Option<TecnicoRef>,
    pub servicio: NuevoServicio,
}

/// Edit payload for an existing slot; the embedded ticket is not resent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitaUpdate {
    pub fecha_hora_inicio: NaiveDateTime,
    pub fecha_hora_fin: NaiveDateTime,
    pub estado: EstadoCita,
    pub tecnico: Option<TecnicoRef>,
}

/// Client for the `/agenda` resource
pub struct AgendaService {
    api: ApiHandle,
}

impl AgendaService {
    pub(crate) fn new(api: ApiHandle) -> Self {
        Self { api }
    }

    /// Fetch every appointment
    pub async fn listar(&self) -> Result<Vec<Cita>, Error> {
        self.api.get("/agenda").execute().await
    }

    /// Fetch one appointment by id
    pub async fn obtener(&self, id: i64) -> Result<Cita, Error> {
        self.api.get(&format!("/agenda/{}", id)).execute().await
    }

    /// Create an appointment together with its embedded ticket
    pub async fn crear(&self, datos: &NuevaCita) -> Result<Cita, Error> {
        self.api.post("/agenda").json(datos)?.execute().await
    }

    /// Update an appointment's window, state or technician
    pub async fn actualizar(&self, id: i64, datos: &CitaUpdate) -> Result<Cita, Error> {
        self.api
            .put(&format!("/agenda/{}", id))
            .json(datos)?
            .execute()
            .await
    }

    /// Cancel an appointment
    pub async fn cancelar(&self, id: i64) -> Result<(), Error> {
        self.api
            .delete(&format!("/agenda/{}", id))
            .execute_empty()
            .await
    }

    /// Appointments assigned to one technician
    pub async fn de_tecnico(&self, tecnico_id: i64) -> Result<Vec<Cita>, Error> {
        let citas = self.listar().await?;
        Ok(citas
            .into_iter()
            .filter(|c| c.tecnico.as_ref().map(|t| t.id) == Some(tecnico_id))
            .collect())
    }
}
