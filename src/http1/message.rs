// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! The decoder's view of a parsed message: a caller-supplied head type, the
//! header list the decoder assembled around it, and the event stream the
//! decoder emits.

/// An ordered header list. Kept as raw byte pairs rather than the teacher's
/// interned `HeaderName`/`HeaderValue`, matching spec's "opaque byte pairs"
/// data model.
pub type HeaderList = Vec<(Vec<u8>, Vec<u8>)>;

/// The capability the decoder depends on to build concrete request/response
/// objects without knowing their shape. `H` is the caller's head type (e.g.
/// a request-line or status-line record).
///
/// Four capabilities only, matching spec §9: create-message,
/// create-invalid-message, is-decoding-request, is-content-always-empty. The
/// last one additionally takes the header list the decoder has assembled so
/// far, since distinguishing a `101 Switching Protocols` upgrade (which is
/// *not* always-empty) from a plain 1xx requires reading the `Upgrade` and
/// `Sec-WebSocket-Accept` headers that only the caller's status-code logic
/// knows how to interpret; the spec's narrower 3-argument signature doesn't
/// give the callback enough to implement the exception it describes.
pub trait MessageFactory {
    type Head;

    /// Builds a head from the three whitespace-delimited fields of an
    /// initial line (request-line: method, target, version; status-line:
    /// version, status, reason).
    fn new_message(&mut self, first: &[u8], second: &[u8], rest: &[u8]) -> Self::Head;

    /// Builds a placeholder head for an `InvalidMessage` event raised before
    /// any head was successfully parsed.
    fn new_invalid_message(&mut self) -> Self::Head;

    /// True if this decoder instance decodes requests (vs. responses). A
    /// property of the decoder's configuration, not of any one message.
    fn is_decoding_request(&self) -> bool;

    /// True if, per HTTP semantics, a message with this head must not carry
    /// a body regardless of `Content-Length`/`Transfer-Encoding` (1xx other
    /// than the Upgrade case, 204, 304).
    fn is_content_always_empty(&self, head: &Self::Head, headers: &HeaderList) -> bool;
}

/// A parsed head paired with the header list the decoder collected for it.
#[derive(Debug, Clone)]
pub struct Message<H> {
    pub head: H,
    pub headers: HeaderList,
}

/// One unit of decoder output. A complete message is exactly
/// `MessageHead`, zero or more `Content`, then one `LastContent` -- or a
/// single `InvalidMessage` if parsing failed partway through.
#[derive(Debug, Clone)]
pub enum Http1Event<H> {
    MessageHead(Message<H>),
    Content(Vec<u8>),
    LastContent { data: Vec<u8>, trailers: HeaderList },
    InvalidMessage { message: Message<H>, cause: &'static str },
}
