//! Service tickets: the `/servicios` resource

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::clientes::{Cliente, ClienteRef};
use super::tecnicos::{Tecnico, TecnicoRef};
use super::ApiHandle;
use crate::error::Error;

/// Lifecycle state of a service ticket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EstadoServicio {
    Pendiente,
    Asignado,
    EnProceso,
    Completado,
}

/// A customer-reported problem record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Servicio {
    pub id: i64,
    pub descripcion_problema: String,
    pub estado: EstadoServicio,
    #[serde(default)]
    pub fecha_solicitud: Option<NaiveDateTime>,
    #[serde(default)]
    pub cliente: Option<Cliente>,
    #[serde(default)]
    pub tecnico: Option<Tecnico>,
}

/// Creation payload: the ticket plus id-only references to its relations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NuevoServicio {
    pub descripcion_problema: String,
    pub estado: EstadoServicio,
    pub cliente: ClienteRef,
    pub tecnico: Option<TecnicoRef>,
}

/// Ticket counts grouped the way the dashboards summarize them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResumenServicios {
    /// ASIGNADO and PENDIENTE tickets, still waiting for work to start
    pub pendientes: usize,
    pub en_proceso: usize,
    pub completados: usize,
}

impl ResumenServicios {
    /// Summarize a set of tickets
    pub fn desde(servicios: &[Servicio]) -> Self {
        let mut resumen = ResumenServicios::default();
        for servicio in servicios {
            match servicio.estado {
                EstadoServicio::Pendiente | EstadoServicio::Asignado => resumen.pendientes += 1,
                EstadoServicio::EnProceso => resumen.en_proceso += 1,
                EstadoServicio::Completado => resumen.completados += 1,
            }
        }
        resumen
    }
}

/// Client for the `/servicios` resource
pub struct ServiciosService {
    api: ApiHandle,
}

impl ServiciosService {
    pub(crate) fn new(api: ApiHandle) -> Self {
        Self { api }
    }

    /// Fetch every service ticket
    pub async fn listar(&self) -> Result<Vec<Servicio>, Error> {
        self.api.get("/servicios").execute().await
    }

    /// Fetch one ticket by id
    pub async fn obtener(&self, id: i64) -> Result<Servicio, Error> {
        self.api.get(&format!("/servicios/{}", id)).execute().await
    }

    /// Create a ticket
    pub async fn crear(&self, datos: &NuevoServicio) -> Result<Servicio, Error> {
        self.api.post("/servicios").json(datos)?.execute().await
    }

    /// Replace a ticket
    pub async fn actualizar(&self, id: i64, datos: &Servicio) -> Result<Servicio, Error> {
        self.api
            .put(&format!("/servicios/{}", id))
            .json(datos)?
            .execute()
            .await
    }

    /// Delete a ticket
    pub async fn eliminar(&self, id: i64) -> Result<(), Error> {
        self.api
            .delete(&format!("/servicios/{}", id))
            .execute_empty()
            .await
    }

    /// Move a ticket to a new state, keeping its relations intact.
    ///
    /// The API replaces the whole record on PUT, so the current record is
    /// resent with only the state changed.
    pub async fn cambiar_estado(
        &self,
        servicio: &Servicio,
        estado: EstadoServicio,
    ) -> Result<Servicio, Error> {
        let mut actualizado = servicio.clone();
        actualizado.estado = estado;
        self.actualizar(servicio.id, &actualizado).await
    }

    /// Tickets assigned to one technician
    pub async fn asignados_a(&self, tecnico_id: i64) -> Result<Vec<Servicio>, Error> {
        let servicios = self.listar().await?;
        Ok(servicios
            .into_iter()
            .filter(|s| s.tecnico.as_ref().map(|t| t.id) == Some(tecnico_id))
            .collect())
    }

    /// Tickets belonging to the client with a given login email
    pub async fn de_cliente(&self, email: &str) -> Result<Vec<Servicio>, Error> {
        let servicios = self.listar().await?;
        Ok(servicios
            .into_iter()
            .filter(|s| {
                s.cliente
                    .as_ref()
                    .map(|c| c.email_matches(email))
                    .unwrap_or(false)
            })
            .collect())
    }
}
