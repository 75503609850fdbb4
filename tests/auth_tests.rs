use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use servihogar_rust::auth::{MemoryStore, Role, SessionStore, KEY_ROLE, KEY_TOKEN, KEY_USERNAME};
use servihogar_rust::config::ClientOptions;
use servihogar_rust::error::Error;
use servihogar_rust::ServiHogar;

/// Compact token whose middle segment carries the given claims
fn token_con(claims: serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{}.{}.firma", header, payload)
}

fn cliente_con_store(url: &str) -> (ServiHogar, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let servihogar = ServiHogar::new_with_store(url, store.clone(), ClientOptions::default());
    (servihogar, store)
}

const EXP_FUTURO: i64 = 4102444800; // 2100-01-01
const EXP_PASADO: i64 = 946684800; // 2000-01-01

#[tokio::test]
async fn login_persiste_token_usuario_y_rol() {
    let mock_server = MockServer::start().await;

    let token = token_con(json!({
        "sub": "ana@x.com",
        "exp": EXP_FUTURO,
        "authorities": ["ROLE_ADMIN"]
    }));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token.clone() })))
        .mount(&mock_server)
        .await;

    let (servihogar, store) = cliente_con_store(&mock_server.uri());

    let session = servihogar.auth().login("ana@x.com", "secreta").await.unwrap();

    assert_eq!(session.role, Role::Admin);
    assert!(session.is_admin());
    assert_eq!(session.username, "ana@x.com");
    assert_eq!(session.expires_at, Some(EXP_FUTURO));

    assert_eq!(store.get(KEY_TOKEN), Some(token));
    assert_eq!(store.get(KEY_USERNAME).as_deref(), Some("ana@x.com"));
    assert_eq!(store.get(KEY_ROLE).as_deref(), Some("ADMIN"));

    assert!(servihogar.auth().current_session().is_some());
}

#[tokio::test]
async fn login_rechazado_no_persiste_nada() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("credenciales inválidas"))
        .mount(&mock_server)
        .await;

    let (servihogar, store) = cliente_con_store(&mock_server.uri());

    let result = servihogar.auth().login("ana@x.com", "equivocada").await;

    assert!(matches!(result, Err(Error::Authentication(_))));
    assert_eq!(store.get(KEY_TOKEN), None);
    assert!(servihogar.auth().current_session().is_none());
}

#[tokio::test]
async fn login_sin_token_en_la_respuesta_falla() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let (servihogar, _store) = cliente_con_store(&mock_server.uri());

    let result = servihogar.auth().login("ana@x.com", "secreta").await;

    assert!(matches!(result, Err(Error::Authentication(_))));
}

#[tokio::test]
async fn restore_recupera_una_sesion_vigente() {
    let (servihogar, store) = cliente_con_store("http://localhost:1");

    let token = token_con(json!({
        "sub": "leo@x.com",
        "exp": EXP_FUTURO,
        "role": "TECNICO"
    }));
    store.set(KEY_TOKEN, &token);
    store.set(KEY_USERNAME, "leo@x.com");
    // la clave del rol falta a propósito

    let session = servihogar.auth().restore().expect("la sesión debía restaurarse");

    assert_eq!(session.role, Role::Tecnico);
    assert_eq!(session.username, "leo@x.com");
    // restore reescribe el rol que faltaba
    assert_eq!(store.get(KEY_ROLE).as_deref(), Some("TECNICO"));
}

#[tokio::test]
async fn restore_sin_username_usa_el_sub_del_token() {
    let (servihogar, store) = cliente_con_store("http://localhost:1");

    let token = token_con(json!({ "sub": "ana@x.com", "exp": EXP_FUTURO }));
    store.set(KEY_TOKEN, &token);

    let session = servihogar.auth().restore().unwrap();

    assert_eq!(session.username, "ana@x.com");
    assert_eq!(session.role, Role::Cliente);
}

#[tokio::test]
async fn restore_con_token_vencido_limpia_las_tres_claves() {
    let (servihogar, store) = cliente_con_store("http://localhost:1");

    let token = token_con(json!({ "sub": "ana@x.com", "exp": EXP_PASADO, "role": "ADMIN" }));
    store.set(KEY_TOKEN, &token);
    store.set(KEY_USERNAME, "ana@x.com");
    store.set(KEY_ROLE, "ADMIN");

    assert!(servihogar.auth().restore().is_none());

    assert_eq!(store.get(KEY_TOKEN), None);
    assert_eq!(store.get(KEY_USERNAME), None);
    assert_eq!(store.get(KEY_ROLE), None);
    assert!(servihogar.auth().current_session().is_none());
}

#[tokio::test]
async fn restore_sin_exp_cuenta_como_vencido() {
    let (servihogar, store) = cliente_con_store("http://localhost:1");

    let token = token_con(json!({ "sub": "ana@x.com", "role": "ADMIN" }));
    store.set(KEY_TOKEN, &token);
    store.set(KEY_USERNAME, "ana@x.com");

    assert!(servihogar.auth().restore().is_none());
    assert_eq!(store.get(KEY_TOKEN), None);
    assert_eq!(store.get(KEY_USERNAME), None);
}

#[tokio::test]
async fn restore_con_token_ilegible_limpia_y_no_falla() {
    let (servihogar, store) = cliente_con_store("http://localhost:1");

    store.set(KEY_TOKEN, "esto-no-es-un-token");
    store.set(KEY_USERNAME, "ana@x.com");

    assert!(servihogar.auth().restore().is_none());
    assert_eq!(store.get(KEY_TOKEN), None);
    assert_eq!(store.get(KEY_USERNAME), None);
}

#[tokio::test]
async fn logout_limpia_el_estado_persistido() {
    let mock_server = MockServer::start().await;

    let token = token_con(json!({ "sub": "ana@x.com", "exp": EXP_FUTURO, "role": "CLIENTE" }));

    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": token })))
        .mount(&mock_server)
        .await;

    let (servihogar, store) = cliente_con_store(&mock_server.uri());

    servihogar.auth().login("ana@x.com", "secreta").await.unwrap();
    assert!(store.get(KEY_TOKEN).is_some());

    servihogar.auth().logout();

    assert_eq!(store.get(KEY_TOKEN), None);
    assert_eq!(store.get(KEY_USERNAME), None);
    assert_eq!(store.get(KEY_ROLE), None);
    assert!(servihogar.auth().current_session().is_none());
}
