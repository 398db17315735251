use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use std::{io, net::SocketAddr, path::PathBuf};
use tokio::task::JoinHandle;

#[derive(Clone, Copy)]
pub(crate) struct Ports {
    pub(crate) http: u16,
    pub(crate) https: u16,
}

/// Certificate and key for the optional HTTPS listener
pub(crate) struct TlsFiles {
    pub(crate) cert: PathBuf,
    pub(crate) key: PathBuf,
}

pub(crate) fn spawn_http_server(port: u16, app: Router) -> JoinHandle<io::Result<()>> {
    tokio::spawn(async move {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        tracing::info!("HTTP server listening on {}", addr);
        axum_server::bind(addr)
            .serve(app.into_make_service())
            .await
    })
}

pub(crate) async fn spawn_https_server(
    port: u16,
    app: Router,
    tls: TlsFiles,
) -> io::Result<JoinHandle<io::Result<()>>> {
    let config = RustlsConfig::from_pem_file(tls.cert, tls.key).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("HTTPS server listening on {}", addr);
    Ok(tokio::spawn(async move {
        axum_server::bind_rustls(addr, config)
            .serve(app.into_make_service())
            .await
    }))
}
