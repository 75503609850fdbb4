//! Warranties: the `/garantias` resource

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::servicios::Servicio;
use super::ApiHandle;
use crate::error::Error;

/// A warranty issued over a completed service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Garantia {
    pub id: i64,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub fecha_vencimiento: Option<NaiveDate>,
    #[serde(default)]
    pub servicio: Option<Servicio>,
}

/// Client for the `/garantias` resource
pub struct GarantiasService {
    api: ApiHandle,
}

impl GarantiasService {
    pub(crate) fn new(api: ApiHandle) -> Self {
        Self { api }
    }

    /// Fetch every warranty
    pub async fn listar(&self) -> Result<Vec<Garantia>, Error> {
        self.api.get("/garantias").execute().await
    }

    /// Warranties whose underlying ticket belongs to a given client email
    pub async fn de_cliente(&self, email: &str) -> Result<Vec<Garantia>, Error> {
        let garantias = self.listar().await?;
        Ok(garantias
            .into_iter()
            .filter(|g| {
                g.servicio
                    .as_ref()
                    .and_then(|s| s.cliente.as_ref())
                    .map(|c| c.email_matches(email))
                    .unwrap_or(false)
            })
            .collect())
    }
}
