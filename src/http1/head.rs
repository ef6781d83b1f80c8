// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! A ready-to-use `MessageFactory` for plain HTTP/1.x request/response
//! heads, so an embedder doesn't have to write one to get a working
//! decoder. Field types reuse the teacher's `Method`/`Version` shape but own
//! raw bytes instead of interning into enums, matching spec's data model.

use super::message::{HeaderList, MessageFactory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    pub method: Vec<u8>,
    pub path: Vec<u8>,
    pub version: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub version: Vec<u8>,
    pub status: Vec<u8>,
    pub reason: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Request(RequestLine),
    Response(StatusLine),
}

impl Head {
    pub fn as_request(&self) -> Option<&RequestLine> {
        match self {
            Head::Request(r) => Some(r),
            Head::Response(_) => None,
        }
    }

    pub fn as_response(&self) -> Option<&StatusLine> {
        match self {
            Head::Response(r) => Some(r),
            Head::Request(_) => None,
        }
    }
}

fn status_code(status: &[u8]) -> Option<u16> {
    std::str::from_utf8(status).ok()?.trim().parse().ok()
}

fn header_eq(name: &[u8], target: &str) -> bool {
    name.eq_ignore_ascii_case(target.as_bytes())
}

/// True when a message of this direction, with these headers, has a body
/// whose end can only be known by the connection closing (a response with
/// neither `Content-Length` nor `Transfer-Encoding: chunked`). Requests are
/// never close-delimited: a request body with no length is simply empty.
/// Exposed so a caller holding a decoded `MessageHead` can decide whether to
/// close the connection once the matching `LastContent` arrives, without
/// re-deriving the same framing rules the decoder already applied.
pub fn is_close_delimited(is_request: bool, headers: &HeaderList) -> bool {
    if is_request {
        return false;
    }
    let has_content_length = headers.iter().any(|(n, _)| header_eq(n, "content-length"));
    let has_chunked = headers.iter().any(|(n, v)| {
        header_eq(n, "transfer-encoding") && v.split(|&b| b == b',').any(|part| {
            let part = part
                .iter()
                .position(|&b| !b.is_ascii_whitespace())
                .map(|start| &part[start..])
                .unwrap_or(part);
            let end = part.iter().rposition(|&b| !b.is_ascii_whitespace()).map(|e| e + 1).unwrap_or(0);
            part[..end].eq_ignore_ascii_case(b"chunked")
        })
    });
    !has_content_length && !has_chunked
}

/// A `MessageFactory` for plain request or response decoding. One instance
/// decodes exactly one direction, matching how a single `Http1Decoder` is
/// normally wired to one side of a connection.
pub struct HttpMessageFactory {
    decoding_request: bool,
}

impl HttpMessageFactory {
    pub fn requests() -> Self {
        HttpMessageFactory { decoding_request: true }
    }

    pub fn responses() -> Self {
        HttpMessageFactory { decoding_request: false }
    }
}

impl MessageFactory for HttpMessageFactory {
    type Head = Head;

    fn new_message(&mut self, first: &[u8], second: &[u8], rest: &[u8]) -> Head {
        if self.decoding_request {
            Head::Request(RequestLine {
                method: first.to_vec(),
                path: second.to_vec(),
                version: rest.to_vec(),
            })
        } else {
            Head::Response(StatusLine {
                version: first.to_vec(),
                status: second.to_vec(),
                reason: rest.to_vec(),
            })
        }
    }

    fn new_invalid_message(&mut self) -> Head {
        if self.decoding_request {
            Head::Request(RequestLine { method: Vec::new(), path: Vec::new(), version: Vec::new() })
        } else {
            Head::Response(StatusLine { version: Vec::new(), status: Vec::new(), reason: Vec::new() })
        }
    }

    fn is_decoding_request(&self) -> bool {
        self.decoding_request
    }

    fn is_content_always_empty(&self, head: &Head, headers: &HeaderList) -> bool {
        let status = match head {
            Head::Request(_) => return false,
            Head::Response(r) => match status_code(&r.status) {
                Some(s) => s,
                None => return false,
            },
        };
        match status {
            101 => {
                let has_upgrade = headers.iter().any(|(n, _)| header_eq(n, "upgrade"));
                let has_ws_accept = headers.iter().any(|(n, _)| header_eq(n, "sec-websocket-accept"));
                !(has_upgrade && !has_ws_accept)
            }
            100..=199 => true,
            204 | 304 => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_204_is_always_empty() {
        let f = HttpMessageFactory::responses();
        let head = Head::Response(StatusLine {
            version: b"HTTP/1.1".to_vec(),
            status: b"204".to_vec(),
            reason: b"No Content".to_vec(),
        });
        assert!(f.is_content_always_empty(&head, &Vec::new()));
    }

    #[test]
    fn switching_protocols_upgrade_is_not_always_empty() {
        let f = HttpMessageFactory::responses();
        let head = Head::Response(StatusLine {
            version: b"HTTP/1.1".to_vec(),
            status: b"101".to_vec(),
            reason: b"Switching Protocols".to_vec(),
        });
        let headers = vec![(b"Upgrade".to_vec(), b"websocket".to_vec())];
        assert!(!f.is_content_always_empty(&head, &headers));
    }

    #[test]
    fn request_is_never_always_empty() {
        let f = HttpMessageFactory::requests();
        let head = Head::Request(RequestLine {
            method: b"GET".to_vec(),
            path: b"/".to_vec(),
            version: b"HTTP/1.1".to_vec(),
        });
        assert!(!f.is_content_always_empty(&head, &Vec::new()));
    }

    #[test]
    fn response_without_length_or_chunked_is_close_delimited() {
        assert!(is_close_delimited(false, &Vec::new()));
        let with_length = vec![(b"Content-Length".to_vec(), b"5".to_vec())];
        assert!(!is_close_delimited(false, &with_length));
        let with_chunked = vec![(b"Transfer-Encoding".to_vec(), b"chunked".to_vec())];
        assert!(!is_close_delimited(false, &with_chunked));
    }

    #[test]
    fn request_is_never_close_delimited() {
        assert!(!is_close_delimited(true, &Vec::new()));
    }
}
