mod domain;
mod infrastructure;
mod presentation;
mod usecase;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tracing_subscriber::{EnvFilter, fmt};

use crate::{
    infrastructure::{
        argon2_password_hasher::Argon2PasswordHasher,
        env_config::{AppConfig, LogFormat},
    },
    presentation::handlers::password_handler::create_password_router,
    usecase::credential_usecase::CredentialUsecase,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env is optional; real environment variables take precedence
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_logging(&config);

    let password_hasher = Argon2PasswordHasher::with_settings(config.argon2)?
        .with_max_cost_factor(config.argon2_max_cost_factor);
    let credential_service = CredentialUsecase::new(config.policy.clone(), password_hasher);
    tracing::info!(
        policy = ?credential_service.policy(),
        argon2 = ?config.argon2,
        "password service configured"
    );

    let app = create_app(credential_service);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!("listening on {}", config.bind_addr);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn create_app(credential_service: CredentialUsecase<Argon2PasswordHasher>) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api/passwords", create_password_router(credential_service))
}

fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => fmt().json().with_env_filter(filter).with_target(true).init(),
        LogFormat::Pretty => fmt().with_env_filter(filter).with_target(true).init(),
    }
}
