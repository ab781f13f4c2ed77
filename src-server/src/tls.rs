//! Optional HTTPS listener
//!
//! Service workers only register in a secure context, so installing the
//! app from another device needs HTTPS.

use std::io;
use std::net::SocketAddr;
use std::path::Path;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;

/// Read a PEM certificate chain and private key
pub async fn load_tls(cert: &Path, key: &Path) -> io::Result<RustlsConfig> {
    // both ring and aws-lc-rs are linked, so rustls cannot pick one itself
    let _ = rustls::crypto::ring::default_provider().install_default();
    RustlsConfig::from_pem_file(cert, key).await
}

pub async fn serve_https(addr: SocketAddr, tls: RustlsConfig, app: Router) -> io::Result<()> {
    axum_server::bind_rustls(addr, tls)
        .serve(app.into_make_service())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_certificate_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = load_tls(&tmp.path().join("cert.pem"), &tmp.path().join("key.pem")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_garbage_pem_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let cert = tmp.path().join("cert.pem");
        let key = tmp.path().join("key.pem");
        std::fs::write(&cert, "not a certificate").unwrap();
        std::fs::write(&key, "not a key").unwrap();
        assert!(load_tls(&cert, &key).await.is_err());
    }
}
