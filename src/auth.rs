//! Admin sessions: a single configured admin identity, HS256 session tokens,
//! and the middleware that checks them on every admin request.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{TimeDelta, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub iat: usize,
    pub exp: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub token: String,
    pub expires_at: usize,
}

pub struct SessionManager {
    secret: String,
    admin_email: String,
    admin_password_sha256: String,
    ttl: TimeDelta,
}

impl SessionManager {
    pub fn new(config: &Config) -> Self {
        Self {
            secret: config.jwt_secret.clone(),
            admin_email: config.admin_email.clone(),
            admin_password_sha256: config.admin_password_sha256.to_ascii_lowercase(),
            ttl: config.session_ttl,
        }
    }

    /// Check credentials and issue a token.
    pub fn login(&self, req: &LoginRequest) -> Result<SessionToken, AppError> {
        let email_ok = req.email.trim().eq_ignore_ascii_case(&self.admin_email);
        let password_ok = constant_time_eq(
            sha256_hex(&req.password).as_bytes(),
            self.admin_password_sha256.as_bytes(),
        );

        if !(email_ok && password_ok) {
            return Err(AppError::Unauthorized("invalid credentials".to_string()));
        }

        let session = self.issue(&self.admin_email)?;
        info!("admin session issued for {}", self.admin_email);
        Ok(session)
    }

    pub fn issue(&self, subject: &str) -> Result<SessionToken, AppError> {
        let now = Utc::now();
        let expires = now.checked_add_signed(self.ttl).ok_or_else(|| {
            warn!("session ttl overflows the clock");
            AppError::InternalServerError
        })?;
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp() as usize,
            exp: expires.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| {
            warn!("failed to sign session token: {}", e);
            AppError::InternalServerError
        })?;

        Ok(SessionToken {
            token,
            expires_at: claims.exp,
        })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AppError::Unauthorized(format!("invalid session token: {}", e)))?;

        if data.claims.sub != self.admin_email {
            return Err(AppError::Unauthorized("unknown subject".to_string()));
        }
        Ok(data.claims)
    }
}

/// Rejects requests without a valid bearer token; on success the claims are
/// available to handlers as an `Extension<Claims>`.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    let claims = state.sessions.verify(token.trim())?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

pub fn sha256_hex(input: &str) -> String {
    Sha256::digest(input.as_bytes())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
