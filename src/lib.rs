//! Interactive client for the chatr line protocol: one persistent
//! connection, newline-terminated commands out, newline-terminated
//! messages in. Inbound rendering runs in the background while the
//! foreground reads user commands.

mod connection;
mod error;
mod session;

pub use connection::{connect, Handle, Stream};
pub use error::Error;
pub use session::{command_loop, is_quit, listen, outbound_line, render_inbound};

use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Connect and run the interactive session until the user quits, the
/// input ends, or the connection refuses a write.
pub async fn run(host: &str, port: u16, secure: bool, server_name: &str) -> Result<(), Error> {
    let handle = connect(host, port, secure, server_name).await?;

    if secure {
        println!("Connected securely to server at {host}:{port}");
    } else {
        println!("Connected to server at {host}:{port}");
    }

    let (reader, mut writer) = tokio::io::split(handle);
    tokio::spawn(session::listen(reader));

    let outcome = session::command_loop(tokio::io::stdin(), &mut writer).await;

    // Single close point for every exit path; an already-broken stream is
    // tolerated here.
    if let Err(e) = writer.shutdown().await {
        debug!(error = %e, "close after session end failed");
    }

    outcome
}
