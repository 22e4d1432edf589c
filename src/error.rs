//! Error types for the client.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The TCP connection could not be established. Fatal, no retry.
    #[error("connection to {host}:{port} failed: {source}")]
    Connect {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Securing the stream failed: trust store, server name, or TLS
    /// negotiation. Fatal, no retry.
    #[error("TLS handshake with {server_name} failed: {message}")]
    Handshake {
        server_name: String,
        message: String,
    },

    /// The stream failed mid-session.
    #[error("stream closed: {0}")]
    StreamClosed(#[source] io::Error),
}
