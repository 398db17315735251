use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use csrf_newbie_axum::{AppState, COOKIE_SECURE, InMemoryCredentialStore, csrf_newbie_router};

mod server;

use crate::server::{Ports, TlsFiles, spawn_http_server, spawn_https_server};

fn port_from_env(key: &str, default: u16) -> u16 {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn tls_files_from_env() -> Option<TlsFiles> {
    match (std::env::var("TLS_CERT_PATH"), std::env::var("TLS_KEY_PATH")) {
        (Ok(cert), Ok(key)) => Some(TlsFiles {
            cert: cert.into(),
            key: key.into(),
        }),
        _ => None,
    }
}

fn credentials_from_env() -> Result<InMemoryCredentialStore, Box<dyn std::error::Error>> {
    match std::env::var("DEMO_USERS") {
        Ok(table) => Ok(InMemoryCredentialStore::parse(&table)?),
        Err(_) => Ok(InMemoryCredentialStore::demo()),
    }
}

/// Secure cookies sent over plain HTTP are dropped by browsers outside localhost
fn secure_cookies_without_tls(tls_configured: bool, cookie_secure: bool) -> bool {
    cookie_secure && !tls_configured
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Install default CryptoProvider for rustls before any TLS config is built
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install default CryptoProvider")?;

    dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "{}=debug,csrf_newbie=debug,csrf_newbie_axum=debug,tower_http=info",
                    env!("CARGO_CRATE_NAME")
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let credentials = credentials_from_env()?;
    tracing::info!("Loaded {} demo accounts", credentials.len());

    let app = csrf_newbie_router(AppState::in_memory(credentials));

    let ports = Ports {
        http: port_from_env("HTTP_PORT", 3001),
        https: port_from_env("HTTPS_PORT", 3443),
    };

    let tls_files = tls_files_from_env();
    if secure_cookies_without_tls(tls_files.is_some(), *COOKIE_SECURE) {
        tracing::warn!(
            "COOKIE_SECURE is on but TLS is not configured; browsers will only keep the \
             session and CSRF cookies on localhost. Set COOKIE_SECURE=false for plain HTTP."
        );
    }

    let http_server = spawn_http_server(ports.http, app.clone());

    match tls_files {
        Some(tls) => {
            let https_server = spawn_https_server(ports.https, app, tls).await?;
            let (http, https) = tokio::try_join!(http_server, https_server)?;
            http?;
            https?;
        }
        None => {
            tracing::info!("TLS_CERT_PATH/TLS_KEY_PATH not set, serving HTTP only");
            http_server.await??;
        }
    }

    Ok(())
}
