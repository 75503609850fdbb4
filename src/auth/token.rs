//! Bearer token payload decoding and role normalization
//!
//! The API issues a compact three-part signed token. Issuance and signature
//! verification happen server side; the client only reads the claims in the
//! middle segment to learn who is logged in and as what role.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Claims carried in the token payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Claims {
    /// Subject, the login identifier
    pub sub: Option<String>,

    /// Expiry in seconds since epoch
    pub exp: Option<i64>,

    /// Role claim, possibly prefixed with `ROLE_`
    pub role: Option<String>,

    /// Granted authorities; the first entry doubles as the role
    pub authorities: Option<Vec<String>>,
}

/// Decode the claims from the middle segment of a compact token.
///
/// The segment is base64url without padding, holding a JSON object. Any
/// structural problem is reported as [`Error::TokenDecode`]; callers in the
/// restore path treat that as "no session".
pub fn decode_claims(token: &str) -> Result<Claims, Error> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return Err(Error::token_decode("el token no tiene tres segmentos")),
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| Error::token_decode(format!("base64 inválido: {}", e)))?;

    let claims = serde_json::from_slice::<Claims>(&bytes)
        .map_err(|e| Error::token_decode(format!("payload inválido: {}", e)))?;

    Ok(claims)
}

/// Actor role, normalized from the token claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Tecnico,
    Cliente,
}

/// Prefix some issuers put in front of the role name
const ROLE_PREFIX: &str = "ROLE_";

impl Role {
    /// Canonical wire form of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Tecnico => "TECNICO",
            Role::Cliente => "CLIENTE",
        }
    }

    /// Parse a role name, tolerating the `ROLE_` prefix
    pub fn from_name(name: &str) -> Option<Role> {
        let name = name.trim();
        let name = name.strip_prefix(ROLE_PREFIX).unwrap_or(name);
        match name {
            "ADMIN" => Some(Role::Admin),
            "TECNICO" => Some(Role::Tecnico),
            "CLIENTE" => Some(Role::Cliente),
            _ => None,
        }
    }

    /// Normalize the role out of decoded claims.
    ///
    /// Order: the `role` claim, then the first `authorities` entry, then the
    /// default of `Cliente`. Unknown names also fall through to `Cliente`, so
    /// every session ends up with exactly one of the three canonical roles.
    pub fn from_claims(claims: &Claims) -> Role {
        claims
            .role
            .as_deref()
            .and_then(Role::from_name)
            .or_else(|| {
                claims
                    .authorities
                    .as_ref()
                    .and_then(|list| list.first())
                    .and_then(|name| Role::from_name(name))
            })
            .unwrap_or(Role::Cliente)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Option<&str>, authorities: Option<Vec<&str>>) -> Claims {
        Claims {
            role: role.map(str::to_string),
            authorities: authorities.map(|list| list.into_iter().map(str::to_string).collect()),
            ..Claims::default()
        }
    }

    #[test]
    fn role_claim_wins_over_authorities() {
        let c = claims(Some("ADMIN"), Some(vec!["ROLE_TECNICO"]));
        assert_eq!(Role::from_claims(&c), Role::Admin);
    }

    #[test]
    fn authorities_prefix_is_stripped() {
        let c = claims(None, Some(vec!["ROLE_TECNICO"]));
        assert_eq!(Role::from_claims(&c), Role::Tecnico);
    }

    #[test]
    fn role_claim_prefix_is_stripped() {
        let c = claims(Some("ROLE_ADMIN"), None);
        assert_eq!(Role::from_claims(&c), Role::Admin);
    }

    #[test]
    fn missing_everything_defaults_to_cliente() {
        assert_eq!(Role::from_claims(&Claims::default()), Role::Cliente);
    }

    #[test]
    fn unknown_role_defaults_to_cliente() {
        let c = claims(Some("SUPERUSER"), None);
        assert_eq!(Role::from_claims(&c), Role::Cliente);
    }

    #[test]
    fn decode_rejects_malformed_tokens() {
        assert!(decode_claims("garbage").is_err());
        assert!(decode_claims("a.b").is_err());
        assert!(decode_claims("a.!!!!.c").is_err());
    }

    #[test]
    fn decode_reads_middle_segment() {
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;
        use base64::Engine;

        let payload = URL_SAFE_NO_PAD.encode(r#"{"sub":"ana@x.com","exp":4102444800,"role":"TECNICO"}"#);
        let token = format!("hdr.{}.sig", payload);

        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("ana@x.com"));
        assert_eq!(claims.exp, Some(4102444800));
        assert_eq!(Role::from_claims(&claims), Role::Tecnico);
    }
}
