use super::{effective_timeout, elapsed_ms, resolve};
use crate::{BedrockStatus, MotdSource, ProbeError, ServerHandle, StatusResponse, VersionInfo};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::net::SocketAddr;
use std::time::{Duration, Instant};
use tokio::net::UdpSocket;

const UNCONNECTED_PING: u8 = 0x01;
const UNCONNECTED_PONG: u8 = 0x1c;

/// RakNet offline message magic
const MAGIC: [u8; 16] = [
    0x00, 0xff, 0xff, 0x00, 0xfe, 0xfe, 0xfe, 0xfe, 0xfd, 0xfd, 0xfd, 0xfd, 0x12, 0x34, 0x56, 0x78,
];

const CLIENT_GUID: i64 = 2;

/// Bedrock edition server reached over UDP
pub struct BedrockHandle {
    host: String,
    port: u16,
}

impl BedrockHandle {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// One unconnected ping/pong exchange; returns the advertisement and
    /// the round-trip time
    async fn exchange(&self) -> Result<(String, f64), ProbeError> {
        let addr = resolve(&self.host, self.port).await?;
        let bind_addr: SocketAddr = if addr.is_ipv6() {
            "[::]:0".parse().map_err(|_| ProbeError::InvalidAddress("[::]:0".to_string()))?
        } else {
            "0.0.0.0:0".parse().map_err(|_| ProbeError::InvalidAddress("0.0.0.0:0".to_string()))?
        };

        let socket = UdpSocket::bind(bind_addr).await?;
        socket.connect(addr).await?;

        let sent_at = chrono::Utc::now().timestamp_millis();
        let started = Instant::now();
        socket.send(&encode_ping(sent_at)).await?;

        let mut buf = vec![0u8; 2048];
        let len = socket.recv(&mut buf).await?;
        let latency = elapsed_ms(started);

        buf.truncate(len);
        let advertisement = decode_pong(Bytes::from(buf))?;
        Ok((advertisement, latency))
    }
}

fn encode_ping(time: i64) -> Bytes {
    let mut buf = BytesMut::with_capacity(33);
    buf.put_u8(UNCONNECTED_PING);
    buf.put_i64(time);
    buf.put_slice(&MAGIC);
    buf.put_i64(CLIENT_GUID);
    buf.freeze()
}

fn decode_pong(mut buf: Bytes) -> Result<String, ProbeError> {
    // id + time + server guid + magic + string length
    if buf.remaining() < 1 + 8 + 8 + 16 + 2 {
        return Err(ProbeError::Protocol("truncated pong".to_string()));
    }
    let id = buf.get_u8();
    if id != UNCONNECTED_PONG {
        return Err(ProbeError::Protocol(format!("unexpected packet 0x{:02x}", id)));
    }
    buf.advance(8 + 8);
    if buf.split_to(16)[..] != MAGIC[..] {
        return Err(ProbeError::Protocol("bad offline message magic".to_string()));
    }

    let len = usize::from(buf.get_u16());
    if len > buf.remaining() {
        return Err(ProbeError::Protocol("truncated advertisement".to_string()));
    }
    Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
}

/// Parses `MCPE;motd;protocol;version;online;max;guid;motd2;gamemode;...`
pub(crate) fn parse_advertisement(advertisement: &str, latency_ms: Option<f64>) -> BedrockStatus {
    let fields: Vec<&str> = advertisement.split(';').collect();
    let field = |i: usize| fields.get(i).map(|f| f.trim()).filter(|f| !f.is_empty());
    let number = |i: usize| field(i).and_then(|f| f.parse::<i64>().ok());

    BedrockStatus {
        motd: field(1).map(MotdSource::from),
        version: field(3).map(|v| VersionInfo::Text(v.to_string())),
        players_online: number(4),
        players_max: number(5),
        map_name: field(7).map(str::to_string),
        gamemode: field(8).map(str::to_string),
        latency_ms,
    }
}

#[async_trait::async_trait]
impl ServerHandle for BedrockHandle {
    async fn status(&self, timeout: Option<Duration>) -> Result<StatusResponse, ProbeError> {
        let timeout = effective_timeout(timeout);
        let (advertisement, latency) = tokio::time::timeout(timeout, self.exchange())
            .await
            .map_err(|_| ProbeError::Timeout(timeout))??;
        Ok(StatusResponse::Bedrock(parse_advertisement(&advertisement, Some(latency))))
    }

    async fn ping(&self, timeout: Option<Duration>) -> Result<f64, ProbeError> {
        let timeout = effective_timeout(timeout);
        let (_, latency) = tokio::time::timeout(timeout, self.exchange())
            .await
            .map_err(|_| ProbeError::Timeout(timeout))??;
        Ok(latency)
    }
}
