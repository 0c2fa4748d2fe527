use super::codec::{frame, get_string, put_string, put_varint, read_packet};
use super::{effective_timeout, elapsed_ms, resolve};
use crate::{JavaStatus, ProbeError, ServerHandle, StatusResponse};
use bytes::{Buf, BufMut, BytesMut};
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

/// Protocol version sent in the handshake; servers answer status for any value
const PROTOCOL_VERSION: i32 = 47;
const NEXT_STATE_STATUS: i32 = 1;

const HANDSHAKE: i32 = 0x00;
const STATUS_REQUEST: i32 = 0x00;
const STATUS_RESPONSE: i32 = 0x00;
const PING: i32 = 0x01;
const PONG: i32 = 0x01;

/// Java edition server reached over TCP
pub struct JavaHandle {
    host: String,
    port: u16,
}

impl JavaHandle {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    async fn connect(&self) -> Result<TcpStream, ProbeError> {
        let addr = resolve(&self.host, self.port).await?;
        let mut stream = TcpStream::connect(addr).await?;
        stream.set_nodelay(true)?;

        let mut body = BytesMut::new();
        put_varint(&mut body, PROTOCOL_VERSION);
        put_string(&mut body, &self.host);
        body.put_u16(self.port);
        put_varint(&mut body, NEXT_STATE_STATUS);
        stream.write_all(&frame(HANDSHAKE, &body)).await?;

        Ok(stream)
    }

    async fn query_status(&self) -> Result<StatusResponse, ProbeError> {
        let mut stream = self.connect().await?;

        let started = Instant::now();
        stream.write_all(&frame(STATUS_REQUEST, &[])).await?;
        let (id, mut payload) = read_packet(&mut stream).await?;
        let latency = elapsed_ms(started);

        if id != STATUS_RESPONSE {
            return Err(ProbeError::Protocol(format!("unexpected packet 0x{:02x} in status", id)));
        }

        let json = get_string(&mut payload)?;
        parse_status(&json, latency)
    }

    async fn query_ping(&self) -> Result<f64, ProbeError> {
        let mut stream = self.connect().await?;
        let token = chrono::Utc::now().timestamp_millis();

        let started = Instant::now();
        stream.write_all(&frame(PING, &token.to_be_bytes())).await?;
        let (id, mut payload) = read_packet(&mut stream).await?;
        let latency = elapsed_ms(started);

        if id != PONG || payload.remaining() < 8 {
            return Err(ProbeError::Protocol(format!("unexpected packet 0x{:02x} in ping", id)));
        }
        if payload.get_i64() != token {
            return Err(ProbeError::Protocol("pong payload mismatch".to_string()));
        }
        Ok(latency)
    }
}

/// Reads the status document, falling back to a loose JSON value when a
/// field has an unexpected type
fn parse_status(json: &str, latency_ms: f64) -> Result<StatusResponse, ProbeError> {
    let typed_error = match serde_json::from_str::<JavaStatus>(json) {
        Ok(mut status) => {
            status.latency_ms = Some(latency_ms);
            return Ok(StatusResponse::Java(status));
        }
        Err(e) => e,
    };

    let mut value: Value = serde_json::from_str(json)?;
    let Some(fields) = value.as_object_mut() else {
        return Err(typed_error.into());
    };
    tracing::debug!(error = %typed_error, "irregular status document, reading it loosely");
    fields.insert("latency_ms".to_string(), Value::from(latency_ms));
    Ok(StatusResponse::Json(value))
}

#[async_trait::async_trait]
impl ServerHandle for JavaHandle {
    async fn status(&self, timeout: Option<Duration>) -> Result<StatusResponse, ProbeError> {
        let timeout = effective_timeout(timeout);
        tokio::time::timeout(timeout, self.query_status())
            .await
            .map_err(|_| ProbeError::Timeout(timeout))?
    }

    async fn ping(&self, timeout: Option<Duration>) -> Result<f64, ProbeError> {
        let timeout = effective_timeout(timeout);
        tokio::time::timeout(timeout, self.query_ping())
            .await
            .map_err(|_| ProbeError::Timeout(timeout))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::codec::{get_varint, read_packet};
    use crate::{NetworkBackend, Prober};
    use bytes::Bytes;
    use craftwatch_models::{Edition, Players, ServerTarget, StatusResult};
    use std::sync::Arc;
    use tokio::net::TcpListener;

    /// Answers one handshake + request on `listener`
    async fn serve_once(listener: TcpListener, status_json: &'static str) {
        let (mut socket, _) = listener.accept().await.unwrap();

        let (id, mut handshake) = read_packet(&mut socket).await.unwrap();
        assert_eq!(id, HANDSHAKE);
        assert_eq!(get_varint(&mut handshake).unwrap(), PROTOCOL_VERSION);
        assert_eq!(get_string(&mut handshake).unwrap(), "127.0.0.1");
        handshake.advance(2);
        assert_eq!(get_varint(&mut handshake).unwrap(), NEXT_STATE_STATUS);

        let (id, payload): (i32, Bytes) = read_packet(&mut socket).await.unwrap();
        match id {
            STATUS_REQUEST => {
                let mut body = BytesMut::new();
                put_string(&mut body, status_json);
                socket.write_all(&frame(STATUS_RESPONSE, &body)).await.unwrap();
            }
            PING => {
                socket.write_all(&frame(PONG, &payload)).await.unwrap();
            }
            other => panic!("unexpected packet {}", other),
        }
    }

    #[tokio::test]
    async fn test_status_against_local_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(serve_once(
            listener,
            r#"{"version":{"name":"1.21.1","protocol":767},"players":{"max":20,"online":3},"description":"§aLocal"}"#,
        ));

        let handle = JavaHandle::new("127.0.0.1", port);
        let response = handle.status(Some(Duration::from_secs(2))).await.unwrap();
        server.await.unwrap();

        let StatusResponse::Java(status) = response else {
            panic!("expected java status");
        };
        assert_eq!(status.players.unwrap().online, Some(3));
        assert!(status.latency_ms.is_some());
    }

    #[tokio::test]
    async fn test_irregular_status_is_read_loosely() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(serve_once(
            listener,
            r#"{"version":{"name":"1.21.1"},"players":{"max":20,"online":"3"},"description":"§aLocal"}"#,
        ));

        let target = ServerTarget {
            host: "127.0.0.1".to_string(),
            port,
            edition: Edition::Java,
        };
        let result = Prober::new(Arc::new(NetworkBackend::new()))
            .probe(&target, Duration::from_secs(2))
            .await;
        server.await.unwrap();

        match result {
            StatusResult::Up { players, version_name, motd, latency_ms, .. } => {
                assert_eq!(players, Players { online: Some(3), max: Some(20) });
                assert_eq!(version_name.as_deref(), Some("1.21.1"));
                assert_eq!(motd.as_deref(), Some("Local"));
                assert!(latency_ms.is_some());
            }
            other => panic!("expected up, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_status_shapes() {
        let typed = parse_status(r#"{"players":{"max":5,"online":1}}"#, 3.0).unwrap();
        assert!(matches!(typed, StatusResponse::Java(_)));
        assert_eq!(typed.latency_ms(), Some(3.0));

        let loose = parse_status(r#"{"players":{"max":5,"online":"1"}}"#, 3.0).unwrap();
        assert!(matches!(loose, StatusResponse::Json(_)));
        assert_eq!(loose.latency_ms(), Some(3.0));

        assert!(matches!(parse_status(r#""just text""#, 3.0), Err(ProbeError::Json(_))));
        assert!(matches!(parse_status("not json", 3.0), Err(ProbeError::Json(_))));
    }

    #[tokio::test]
    async fn test_ping_against_local_server() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(serve_once(listener, "{}"));

        let latency = JavaHandle::new("127.0.0.1", port)
            .ping(Some(Duration::from_secs(2)))
            .await
            .unwrap();
        server.await.unwrap();

        assert!(latency >= 0.0);
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        // Accepts but never answers
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(socket);
        });

        let err = JavaHandle::new("127.0.0.1", port)
            .status(Some(Duration::from_millis(150)))
            .await
            .unwrap_err();
        server.abort();

        assert!(matches!(err, ProbeError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_refused_connection_is_io_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = JavaHandle::new("127.0.0.1", port)
            .status(Some(Duration::from_secs(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Io(_)));
    }
}
