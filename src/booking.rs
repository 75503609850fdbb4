//! Booking reconciliation
//!
//! Turns "this technician, this problem, maybe this start time" into the
//! right API write: an `/agenda` slot with an embedded ticket when a start
//! time is given, or a bare pending ticket on `/servicios` when it is not.
//! The acting client is resolved from the session: a client books for itself
//! (matched by email against the directory), an admin or technician names the
//! client explicitly.

use chrono::{Duration, NaiveDateTime};
use log::{info, warn};

use crate::api::{
    AgendaService, Cita, Cliente, ClienteRef, ClientesService, EstadoCita, EstadoServicio,
    NuevaCita, NuevoServicio, Servicio, ServiciosService, TecnicoRef, TecnicosService,
};
use crate::auth::{Role, Session};
use crate::error::Error;

/// Default appointment length when only a start time is chosen
const DURACION_CITA_HORAS: i64 = 2;

/// Progress of a single booking attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingState {
    Idle,
    ClientsLoading,
    ClientResolved,
    Submitting,
    Succeeded,
    Failed,
}

/// What the caller filled in for one booking
#[derive(Debug, Clone)]
pub struct BookingRequest {
    /// Explicit client selection; required for admin and technician sessions
    pub cliente_id: Option<i64>,

    /// Pre-selected technician, if any
    pub tecnico_id: Option<i64>,

    /// Problem description for the embedded ticket
    pub descripcion: String,

    /// Start of the appointment; `None` files a pending request instead
    pub fecha_inicio: Option<NaiveDateTime>,
}

/// The record a successful booking created
#[derive(Debug, Clone)]
pub enum BookingOutcome {
    /// An appointment slot with its embedded ticket
    Cita(Cita),

    /// A bare pending ticket, no slot reserved yet
    Solicitud(Servicio),
}

/// One booking flow bound to an explicit session.
///
/// A `Booking` runs one attempt at a time: `submit` takes `&mut self`, so a
/// second submission cannot start while one is in flight. A failed attempt
/// leaves the request untouched for the caller to correct and resend.
pub struct Booking {
    session: Session,
    clientes: ClientesService,
    tecnicos: TecnicosService,
    servicios: ServiciosService,
    agenda: AgendaService,
    state: BookingState,
}

impl Booking {
    pub(crate) fn new(
        session: Session,
        clientes: ClientesService,
        tecnicos: TecnicosService,
        servicios: ServiciosService,
        agenda: AgendaService,
    ) -> Self {
        Self {
            session,
            clientes,
            tecnicos,
            servicios,
            agenda,
            state: BookingState::Idle,
        }
    }

    /// Progress of the current attempt
    pub fn state(&self) -> BookingState {
        self.state
    }

    /// The session this flow acts for
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one booking attempt.
    ///
    /// Validation problems ([`Error::Validation`],
    /// [`Error::ClientProfileNotFound`]) are reported before anything is
    /// written; transport problems ([`Error::Http`]) may be retried by
    /// calling `submit` again with the same request.
    pub async fn submit(&mut self, request: &BookingRequest) -> Result<BookingOutcome, Error> {
        self.state = BookingState::Idle;

        match self.run(request).await {
            Ok(outcome) => {
                self.state = BookingState::Succeeded;
                Ok(outcome)
            }
            Err(e) => {
                self.state = BookingState::Failed;
                warn!("reserva fallida: {}", e);
                Err(e)
            }
        }
    }

    async fn run(&mut self, request: &BookingRequest) -> Result<BookingOutcome, Error> {
        if self.session.is_expired() {
            return Err(Error::SessionExpired);
        }

        let descripcion = request.descripcion.trim();
        if descripcion.is_empty() {
            return Err(Error::validation("describe el problema a atender"));
        }

        self.state = BookingState::ClientsLoading;
        let directorio = self.clientes.listar().await?;

        let cliente_id = resolver_cliente(&self.session, request.cliente_id, &directorio)?;
        self.state = BookingState::ClientResolved;

        let tecnico = self
            .resolver_tecnico(request.tecnico_id)
            .await?
            .map(|id| TecnicoRef { id });

        // Con técnico el ticket nace asignado; sin él queda pendiente
        let estado = match tecnico {
            Some(_) => EstadoServicio::Asignado,
            None => EstadoServicio::Pendiente,
        };

        let servicio = NuevoServicio {
            descripcion_problema: descripcion.to_string(),
            estado,
            cliente: ClienteRef { id: cliente_id },
            tecnico,
        };

        self.state = BookingState::Submitting;

        match request.fecha_inicio {
            Some(inicio) => {
                let (inicio, fin) = ventana_atencion(inicio);
                let cita = NuevaCita {
                    fecha_hora_inicio: inicio,
                    fecha_hora_fin: fin,
                    estado: EstadoCita::Reservado,
                    tecnico,
                    servicio,
                };
                let creada = self.agenda.crear(&cita).await?;
                info!("cita #{} reservada para el cliente {}", creada.id, cliente_id);
                Ok(BookingOutcome::Cita(creada))
            }
            None => {
                let creado = self.servicios.crear(&servicio).await?;
                info!(
                    "solicitud #{} registrada para el cliente {}",
                    creado.id, cliente_id
                );
                Ok(BookingOutcome::Solicitud(creado))
            }
        }
    }

    /// Apply the technician-assignment policy.
    ///
    /// A technician session always books onto its own calendar: its profile is
    /// looked up by the session email and overrides any explicit selection.
    /// When no profile matches, the explicit selection is kept as-is.
    async fn resolver_tecnico(&self, solicitado: Option<i64>) -> Result<Option<i64>, Error> {
        if self.session.is_tecnico() {
            if let Some(propio) = self.tecnicos.buscar_por_email(&self.session.username).await? {
                return Ok(Some(propio.id));
            }
        }
        Ok(solicitado)
    }
}

/// Resolve the acting client for a booking.
///
/// A client session may only resolve to its own profile, matched by email
/// ignoring case and surrounding whitespace; no match is
/// [`Error::ClientProfileNotFound`], never a fallback to some other client.
/// Admin and technician sessions must name the client explicitly.
pub fn resolver_cliente(
    session: &Session,
    explicito: Option<i64>,
    directorio: &[Cliente],
) -> Result<i64, Error> {
    match session.role {
        Role::Cliente => directorio
            .iter()
            .find(|c| c.email_matches(&session.username))
            .map(|c| c.id)
            .ok_or_else(|| Error::ClientProfileNotFound(session.username.clone())),
        Role::Admin | Role::Tecnico => {
            explicito.ok_or_else(|| Error::validation("selecciona el cliente de la cita"))
        }
    }
}

/// Compute the appointment window from its start.
///
/// The end lands two hours later by calendar arithmetic, so day, month and
/// year boundaries roll over correctly.
pub fn ventana_atencion(inicio: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    (inicio, inicio + Duration::hours(DURACION_CITA_HORAS))
}

/// Parse a wall-clock timestamp as the booking forms produce it.
///
/// Accepts both `YYYY-MM-DDTHH:MM` (datetime-local inputs) and
/// `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_fecha_local(texto: &str) -> Result<NaiveDateTime, Error> {
    let texto = texto.trim();
    NaiveDateTime::parse_from_str(texto, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(texto, "%Y-%m-%dT%H:%M"))
        .map_err(|_| Error::validation(format!("fecha u hora inválida: {}", texto)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;

    fn cliente(id: i64, email: &str) -> Cliente {
        Cliente {
            id,
            nombre: "Ana".into(),
            apellido: "Diaz".into(),
            email: Some(email.into()),
            telefono: None,
            direccion: None,
        }
    }

    fn session(role: Role, username: &str) -> Session {
        Session::new("tok".into(), username.into(), role, None)
    }

    #[test]
    fn ventana_suma_dos_horas() {
        let inicio = parse_fecha_local("2024-06-01T10:00").unwrap();
        let (_, fin) = ventana_atencion(inicio);
        assert_eq!(fin, parse_fecha_local("2024-06-01T12:00").unwrap());
    }

    #[test]
    fn ventana_cruza_fin_de_mes() {
        let inicio = parse_fecha_local("2024-01-31T23:00").unwrap();
        let (_, fin) = ventana_atencion(inicio);
        assert_eq!(fin, parse_fecha_local("2024-02-01T01:00").unwrap());
    }

    #[test]
    fn ventana_cruza_fin_de_anio() {
        let inicio = parse_fecha_local("2024-12-31T23:30").unwrap();
        let (_, fin) = ventana_atencion(inicio);
        assert_eq!(fin, parse_fecha_local("2025-01-01T01:30").unwrap());
    }

    #[test]
    fn parse_acepta_con_y_sin_segundos() {
        assert!(parse_fecha_local("2024-06-01T10:00").is_ok());
        assert!(parse_fecha_local("2024-06-01T10:00:30").is_ok());
        assert!(matches!(
            parse_fecha_local("mañana temprano"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn cliente_se_resuelve_por_email_sin_distinguir_mayusculas() {
        let directorio = vec![cliente(5, " Ana@X.com ")];
        let s = session(Role::Cliente, "ana@x.com");

        assert_eq!(resolver_cliente(&s, None, &directorio).unwrap(), 5);
    }

    #[test]
    fn cliente_sin_perfil_no_cae_en_otro() {
        let directorio = vec![cliente(5, "otra@x.com")];
        let s = session(Role::Cliente, "ana@x.com");

        match resolver_cliente(&s, Some(5), &directorio) {
            Err(Error::ClientProfileNotFound(quien)) => assert_eq!(quien, "ana@x.com"),
            otro => panic!("se esperaba ClientProfileNotFound, fue {:?}", otro),
        }
    }

    #[test]
    fn admin_usa_la_seleccion_explicita() {
        let directorio = vec![cliente(5, "otra@x.com")];
        let s = session(Role::Admin, "admin@x.com");

        assert_eq!(resolver_cliente(&s, Some(7), &directorio).unwrap(), 7);
        assert!(matches!(
            resolver_cliente(&s, None, &directorio),
            Err(Error::Validation(_))
        ));
    }
}
