use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_util::codec::{Framed, LinesCodec};

use chatr_client::{command_loop, connect, listen, render_inbound, Error};

/// Line-echo server standing in for the real chat server.
async fn spawn_echo_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                break;
            };
            tokio::spawn(async move {
                let mut lines = Framed::new(stream, LinesCodec::new());
                while let Some(Ok(line)) = lines.next().await {
                    if lines.send(line).await.is_err() {
                        break;
                    }
                }
            });
        }
    });

    addr
}

#[tokio::test]
async fn echoed_line_round_trips_and_renders() {
    let addr = spawn_echo_server().await;

    let handle = connect("127.0.0.1", addr.port(), false, "localhost")
        .await
        .unwrap();
    let (mut reader, mut writer) = tokio::io::split(handle);

    writer.write_all(b"hello\n").await.unwrap();

    let mut buf = [0u8; 1024];
    let n = reader.read(&mut buf).await.unwrap();
    assert_eq!(&buf[..n], b"hello\n");
    assert_eq!(render_inbound(&buf[..n]), "\r<< hello\n>> ");
}

#[tokio::test]
async fn refused_connection_is_a_connect_error() {
    // Bind and drop to get a port nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = connect("127.0.0.1", addr.port(), false, "localhost")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Connect { .. }));
}

#[tokio::test]
async fn failed_tls_negotiation_is_a_handshake_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        drop(stream);
    });

    let err = connect("127.0.0.1", addr.port(), true, "localhost")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Handshake { .. }));
}

#[tokio::test]
async fn scripted_session_sends_trimmed_lines_and_quits() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, rx) = oneshot::channel();
    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        stream.read_to_end(&mut received).await.unwrap();
        let _ = tx.send(received);
    });

    let handle = connect("127.0.0.1", addr.port(), false, "localhost")
        .await
        .unwrap();
    let (_reader, mut writer) = tokio::io::split(handle);

    let input = &b"  hello  \n\n   \nMESSAGE | hi\nquit\n"[..];
    command_loop(input, &mut writer).await.unwrap();
    writer.shutdown().await.unwrap();

    let received = rx.await.unwrap();
    assert_eq!(received, b"hello\nMESSAGE | hi\nquit\n");
}

#[tokio::test]
async fn listener_exits_when_server_closes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(stream);
    });

    let handle = connect("127.0.0.1", addr.port(), false, "localhost")
        .await
        .unwrap();
    let (reader, _writer) = tokio::io::split(handle);

    let task = tokio::spawn(listen(reader));
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .expect("listener should stop on server close")
        .unwrap();
}
