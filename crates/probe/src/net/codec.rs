//! Framing helpers for the Java edition Server List Ping.

use crate::ProbeError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Upper bound on a status packet (JSON plus favicon)
pub(crate) const MAX_PACKET_LEN: usize = 2 * 1024 * 1024;

pub(crate) fn put_varint(buf: &mut BytesMut, value: i32) {
    let mut value = value as u32;
    loop {
        if value & !0x7F == 0 {
            buf.put_u8(value as u8);
            return;
        }
        buf.put_u8((value & 0x7F) as u8 | 0x80);
        value >>= 7;
    }
}

pub(crate) fn get_varint(buf: &mut impl Buf) -> Result<i32, ProbeError> {
    let mut result: u32 = 0;
    for i in 0..5 {
        if !buf.has_remaining() {
            return Err(ProbeError::Protocol("truncated varint".to_string()));
        }
        let byte = buf.get_u8();
        result |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result as i32);
        }
    }
    Err(ProbeError::Protocol("varint too long".to_string()))
}

pub(crate) async fn read_varint<R: AsyncRead + Unpin>(reader: &mut R) -> Result<i32, ProbeError> {
    let mut result: u32 = 0;
    for i in 0..5 {
        let byte = reader.read_u8().await?;
        result |= u32::from(byte & 0x7F) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(result as i32);
        }
    }
    Err(ProbeError::Protocol("varint too long".to_string()))
}

pub(crate) fn put_string(buf: &mut BytesMut, value: &str) {
    put_varint(buf, value.len() as i32);
    buf.put_slice(value.as_bytes());
}

pub(crate) fn get_string(buf: &mut Bytes) -> Result<String, ProbeError> {
    let len = get_varint(buf)?;
    let len = usize::try_from(len)
        .map_err(|_| ProbeError::Protocol("negative string length".to_string()))?;
    if len > buf.remaining() {
        return Err(ProbeError::Protocol("truncated string".to_string()));
    }
    let raw = buf.split_to(len);
    String::from_utf8(raw.to_vec())
        .map_err(|_| ProbeError::Protocol("string is not UTF-8".to_string()))
}

/// Prefixes `id` + `body` with its varint length
pub(crate) fn frame(id: i32, body: &[u8]) -> Bytes {
    let mut inner = BytesMut::with_capacity(body.len() + 5);
    put_varint(&mut inner, id);
    inner.put_slice(body);

    let mut out = BytesMut::with_capacity(inner.len() + 5);
    put_varint(&mut out, inner.len() as i32);
    out.put_slice(&inner);
    out.freeze()
}

/// Reads one length-prefixed packet, returning its id and payload
pub(crate) async fn read_packet<R: AsyncRead + Unpin>(
    reader: &mut R,
) -> Result<(i32, Bytes), ProbeError> {
    let len = read_varint(reader).await?;
    let len = usize::try_from(len)
        .ok()
        .filter(|l| *l > 0 && *l <= MAX_PACKET_LEN)
        .ok_or_else(|| ProbeError::Protocol(format!("invalid packet length {}", len)))?;

    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).await?;

    let mut payload = Bytes::from(payload);
    let id = get_varint(&mut payload)?;
    Ok((id, payload))
}
