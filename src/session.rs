//! The interactive session: a background listener draining inbound bytes
//! and a foreground loop forwarding user commands. The listener owns the
//! read half of the connection, the command loop the write half; neither
//! touches the other's side.

use std::io::Write;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::debug;

use crate::error::Error;

const READ_BUF_SIZE: usize = 1024;

/// Render one inbound chunk as a display line. Decoding is lossy and each
/// chunk is one displayable unit; split multi-byte sequences stay mangled.
pub fn render_inbound(chunk: &[u8]) -> String {
    let msg = String::from_utf8_lossy(chunk);
    format!("\r<< {}\n>> ", msg.trim_end())
}

/// Trim user input into a wire line, or `None` when there is nothing to
/// send.
pub fn outbound_line(input: &str) -> Option<String> {
    let cmd = input.trim();
    if cmd.is_empty() {
        None
    } else {
        Some(format!("{cmd}\n"))
    }
}

pub fn is_quit(command: &str) -> bool {
    command.to_uppercase().starts_with("QUIT")
}

/// Drain inbound bytes and render them until the stream ends. Runs as a
/// detached task; exits silently on end-of-stream or transport error and
/// never writes to the connection.
pub async fn listen<R>(mut reader: R)
where
    R: AsyncRead + Unpin,
{
    let mut buf = [0u8; READ_BUF_SIZE];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => {
                print!("{}", render_inbound(&buf[..n]));
                let _ = std::io::stdout().flush();
            }
            Err(e) => {
                debug!(error = %e, "listener read failed");
                break;
            }
        }
    }
    debug!("listener stopped");
}

/// Read command lines from `input` and forward them to `writer` until the
/// user quits, interrupts, or the input ends. Only this loop ever writes
/// to the connection.
pub async fn command_loop<I, W>(input: I, writer: &mut W) -> Result<(), Error>
where
    I: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = BufReader::new(input).lines();

    loop {
        print!(">> ");
        let _ = std::io::stdout().flush();

        tokio::select! {
            read = lines.next_line() => {
                let line = match read {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        debug!(error = %e, "input read failed");
                        break;
                    }
                };

                let Some(out) = outbound_line(&line) else {
                    continue;
                };
                writer
                    .write_all(out.as_bytes())
                    .await
                    .map_err(Error::StreamClosed)?;

                if is_quit(out.trim_end()) {
                    println!("Quitting...");
                    break;
                }
            }
            _ = signal::ctrl_c() => {
                println!("Interrupted, quitting...");
                // Courtesy quit for the server; the session is ending
                // whether or not it arrives.
                let _ = writer.write_all(b"QUIT |\n").await;
                break;
            }
        }
    }

    Ok(())
}
