// src/middleware/auth.rs

use axum::{
    extract::State,
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum::extract::FromRequestParts;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::Session,
    services::auth,
};

// Middleware de autenticação: verifica e decodifica o token assinado.
// Papel e empresa vêm do próprio token (fixados no login); não há
// reconsulta ao banco por requisição.
pub async fn auth_middleware(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let session = auth::decode_session(token, &app_state.jwt_secret)?;

            // Insere a sessão nos "extensions" da requisição
            request.extensions_mut().insert(session);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::Unauthenticated)
}

// Extrator para obter a sessão autenticada diretamente nos handlers
pub struct CurrentUser(pub Session);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AppError::Unauthenticated)
    }
}
