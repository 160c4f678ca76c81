use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{
    domain::{
        error::{DomainError, HasherError, required},
        models::{credential::HashedPassword, password_policy::PolicyViolation},
        services::password_service::PasswordHasher,
    },
    usecase::credential_usecase::CredentialUsecase,
};

// Request

/// json for hash and validate requests
#[derive(Serialize, Deserialize)]
pub struct PasswordRequest {
    pub password: Option<String>,
}

/// json for verify request
#[derive(Serialize, Deserialize)]
pub struct VerifyRequest {
    pub password_hash: Option<String>,
    pub password: Option<String>,
}

// Response

#[derive(Serialize, Deserialize)]
pub struct HashResponse {
    pub password_hash: String,
}

#[derive(Serialize, Deserialize)]
pub struct ValidateResponse {
    pub valid: bool,
    pub violations: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct VerifyResponse {
    pub matches: bool,
    pub rehash_recommended: bool,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

/* Router Function and Handler Function */

/// function return Router object
/// Suppose to be nested by main router
pub fn create_password_router<P: PasswordHasher + 'static>(
    credential_service: CredentialUsecase<P>,
) -> Router {
    let state = AppState {
        credential_service: Arc::new(credential_service),
    };

    Router::new()
        .route("/hash", post(hash::<P>))
        .route("/validate", post(validate::<P>))
        .route("/verify", post(verify::<P>))
        .with_state(state)
}

pub struct AppState<P: PasswordHasher> {
    pub credential_service: Arc<CredentialUsecase<P>>,
}

// derive(Clone) would demand P: Clone
impl<P: PasswordHasher> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            credential_service: Arc::clone(&self.credential_service),
        }
    }
}

fn error_response(err: DomainError) -> Response {
    let status = match err {
        DomainError::InvalidArgument { .. }
        | DomainError::InvalidFormat { .. }
        | DomainError::Hasher(HasherError::MalformedHash(_)) => StatusCode::BAD_REQUEST,
        DomainError::Hasher(HasherError::Hash(_)) => {
            error!(error = %err, "password hasher failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let body = ErrorResponse {
        error: err.to_string(),
        parameter: err.parameter().map(str::to_string),
    };
    (status, Json(body)).into_response()
}

fn verify_inputs(payload: VerifyRequest) -> Result<(HashedPassword, String), DomainError> {
    let stored_hash = required(payload.password_hash, "password_hash")?;
    let password = required(payload.password, "password")?;
    Ok((HashedPassword::new(stored_hash), password))
}

// handler function

/// handler function for hashing; argon2 runs on the blocking pool
async fn hash<P: PasswordHasher + 'static>(
    State(state): State<AppState<P>>,
    Json(payload): Json<PasswordRequest>,
) -> Response {
    let password = match required(payload.password, "password") {
        Ok(password) => password,
        Err(err) => return error_response(err),
    };

    let service = Arc::clone(&state.credential_service);
    match tokio::task::spawn_blocking(move || service.hash(&password)).await {
        Ok(Ok(hash)) => {
            let response = HashResponse {
                password_hash: hash.into_string(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(Err(err)) => error_response(err),
        Err(join_err) => {
            error!(error = %join_err, "hashing task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// handler function for policy validation
async fn validate<P: PasswordHasher>(
    State(state): State<AppState<P>>,
    Json(payload): Json<PasswordRequest>,
) -> Response {
    let result = required(payload.password, "password").and_then(|password| {
        let service = &state.credential_service;
        if service.validate(&password)? {
            Ok(Vec::new())
        } else {
            service.violations(&password)
        }
    });

    match result {
        Ok(violations) => {
            let response = ValidateResponse {
                valid: violations.is_empty(),
                violations: violations.iter().map(PolicyViolation::to_string).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(err) => error_response(err),
    }
}

/// handler function for verification; argon2 runs on the blocking pool
async fn verify<P: PasswordHasher + 'static>(
    State(state): State<AppState<P>>,
    Json(payload): Json<VerifyRequest>,
) -> Response {
    let (stored_hash, password) = match verify_inputs(payload) {
        Ok(inputs) => inputs,
        Err(err) => return error_response(err),
    };

    let service = Arc::clone(&state.credential_service);
    match tokio::task::spawn_blocking(move || service.verify(&stored_hash, &password)).await {
        Ok(Ok(outcome)) => {
            let response = VerifyResponse {
                matches: outcome.matches(),
                rehash_recommended: outcome.rehash_recommended(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Ok(Err(err)) => error_response(err),
        Err(join_err) => {
            error!(error = %join_err, "verification task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
