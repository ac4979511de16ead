//! SSE framing: turns `(event, payload)` pairs into stream-wire bytes.
//!
//! A frame is `event: <name>\n`, one `data: <line>\n` per payload line, and a
//! terminating blank line. Every payload line break (`\r\n`, `\r` or `\n`, the
//! three an SSE parser honours) starts a new `data:` line, so a frame can never
//! be cut short by its own content.

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;

use crate::types::McpResult;

/// Event name carrying the POST endpoint for a fresh session.
pub const ENDPOINT_EVENT: &str = "endpoint";

/// Event name carrying JSON-RPC replies and notifications.
pub const MESSAGE_EVENT: &str = "message";

/// Frame a single event.
pub fn frame(event: &str, payload: &str) -> Bytes {
    let mut buf = BytesMut::with_capacity(event.len() + payload.len() + 16);
    buf.put_slice(b"event: ");
    buf.put_slice(strip_newlines(event).as_bytes());
    buf.put_u8(b'\n');
    for line in payload_lines(payload) {
        buf.put_slice(b"data: ");
        buf.put_slice(line.as_bytes());
        buf.put_u8(b'\n');
    }
    buf.put_u8(b'\n');
    buf.freeze()
}

/// The URI a client should POST to for the given session.
pub fn endpoint_uri(post_path: &str, session_id: &str) -> String {
    format!("{post_path}?session_id={session_id}")
}

/// Frame the `endpoint` event announced once per session.
pub fn endpoint_event(post_path: &str, session_id: &str) -> Bytes {
    frame(ENDPOINT_EVENT, &endpoint_uri(post_path, session_id))
}

/// Serialize `message` as compact JSON and frame it as a `message` event.
pub fn message_event<T: Serialize>(message: &T) -> McpResult<Bytes> {
    let json = serde_json::to_string(message)?;
    Ok(frame(MESSAGE_EVENT, &json))
}

/// An SSE comment line; clients ignore it, proxies see traffic.
pub fn keep_alive_comment() -> Bytes {
    Bytes::from_static(b": keep-alive\n\n")
}

// Split on `\r\n`, bare `\r` and bare `\n`. A trailing break yields a final
// empty line, as `str::split` would.
fn payload_lines(payload: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(payload);
    std::iter::from_fn(move || {
        let text = rest?;
        match text.find(['\r', '\n']) {
            Some(at) => {
                let width = if text[at..].starts_with("\r\n") { 2 } else { 1 };
                rest = Some(&text[at + width..]);
                Some(&text[..at])
            }
            None => {
                rest = None;
                Some(text)
            }
        }
    })
}

// Event names must stay on one line.
fn strip_newlines(s: &str) -> std::borrow::Cow<'_, str> {
    if s.contains(['\r', '\n']) {
        std::borrow::Cow::Owned(s.replace(['\r', '\n'], ""))
    } else {
        std::borrow::Cow::Borrowed(s)
    }
}
