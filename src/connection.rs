//! Connection establishment: plain TCP, optionally upgraded to TLS.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio_rustls::rustls::pki_types::ServerName;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;
use tracing::debug;

use crate::error::Error;

pub trait Stream: AsyncRead + AsyncWrite + Unpin + Send + std::fmt::Debug {}

impl<T: AsyncRead + AsyncWrite + Unpin + Send + std::fmt::Debug> Stream for T {}

/// Open bidirectional connection to the server. One reader and one writer
/// may use it concurrently once split.
pub type Handle = Box<dyn Stream>;

/// Connect to `host:port`. With `secure` set, a TLS session is negotiated
/// on top of the TCP stream, validating the server certificate against
/// `server_name` using the system trust store. The server name may differ
/// from `host` when the connection is routed through an intermediary
/// address but the certificate names the logical service.
pub async fn connect(
    host: &str,
    port: u16,
    secure: bool,
    server_name: &str,
) -> Result<Handle, Error> {
    let stream = TcpStream::connect((host, port))
        .await
        .map_err(|source| Error::Connect {
            host: host.into(),
            port,
            source,
        })?;
    debug!(host, port, "tcp connection established");

    if !secure {
        return Ok(Box::new(stream));
    }

    let handshake = |message: String| Error::Handshake {
        server_name: server_name.into(),
        message,
    };

    let certs = rustls_native_certs::load_native_certs()
        .map_err(|e| handshake(format!("could not load system trust store: {e}")))?;
    let mut roots = RootCertStore::empty();
    let (added, skipped) = roots.add_parsable_certificates(certs);
    if added == 0 {
        return Err(handshake("no usable roots in system trust store".into()));
    }
    debug!(added, skipped, "loaded system trust store");

    let config = ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();
    let connector = TlsConnector::from(Arc::new(config));

    let name = ServerName::try_from(server_name.to_string())
        .map_err(|e| handshake(format!("invalid server name: {e}")))?;

    let stream = connector
        .connect(name, stream)
        .await
        .map_err(|e| handshake(e.to_string()))?;
    debug!(server_name, "tls session established");

    Ok(Box::new(stream))
}
