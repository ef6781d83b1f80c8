// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! The resumable HTTP/1.x message decoder: initial line, headers, and
//! fixed/variable/chunked body framing, re-entrant across `decode` calls.

use log::{debug, trace};

use crate::buffer::Buffer;
use crate::{next, peek};

use super::error::{Http1Error, Http1Result};
use super::message::{HeaderList, Http1Event, Message, MessageFactory};
use super::scanner::{HeaderScanner, LineScanner};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    SkipControlChars,
    ReadInitial,
    ReadHeader,
    ReadFixedLengthContent,
    ReadVariableLengthContent,
    ReadChunkSize,
    ReadChunkContent,
    ReadChunkDelimiter,
    ReadChunkFooter,
    BadMessage,
    Upgraded,
}

#[derive(Debug, Clone, Copy)]
enum ContentLength {
    NotComputed,
    Absent,
    Known(u64),
}

/// The §6 decoder configuration knobs, with spec defaults.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    pub max_initial_line_length: usize,
    pub max_header_size: usize,
    pub max_chunk_size: usize,
    pub chunked_supported: bool,
    pub validate_headers: bool,
    pub initial_buffer_size: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_initial_line_length: 4096,
            max_header_size: 8192,
            max_chunk_size: 8192,
            chunked_supported: true,
            validate_headers: true,
            initial_buffer_size: 128,
        }
    }
}

fn is_skippable(b: u8) -> bool {
    b < 0x20 || b == 0x7f || b == b' '
}

fn is_ws(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn trim(bytes: &[u8]) -> &[u8] {
    let mut start = 0;
    let mut end = bytes.len();
    while start < end && is_ws(bytes[start]) {
        start += 1;
    }
    while end > start && is_ws(bytes[end - 1]) {
        end -= 1;
    }
    &bytes[start..end]
}

/// Splits an initial line into its three whitespace-delimited fields
/// (method/target/version or version/status/reason); `None` if fewer than
/// three fields are present.
fn split_initial_line(line: &[u8]) -> Option<(Vec<u8>, Vec<u8>, Vec<u8>)> {
    let mut i = 0;
    let n = line.len();
    while i < n && is_ws(line[i]) {
        i += 1;
    }
    let first_start = i;
    while i < n && !is_ws(line[i]) {
        i += 1;
    }
    if i == first_start {
        return None;
    }
    let first_end = i;

    while i < n && is_ws(line[i]) {
        i += 1;
    }
    let second_start = i;
    while i < n && !is_ws(line[i]) {
        i += 1;
    }
    if i == second_start {
        return None;
    }
    let second_end = i;

    while i < n && is_ws(line[i]) {
        i += 1;
    }
    let rest_start = i;
    if rest_start >= n {
        return None;
    }
    let mut rest_end = n;
    while rest_end > rest_start && is_ws(line[rest_end - 1]) {
        rest_end -= 1;
    }

    Some((
        line[first_start..first_end].to_vec(),
        line[second_start..second_end].to_vec(),
        line[rest_start..rest_end].to_vec(),
    ))
}

/// Splits a header line at the first colon: name is bytes up to the first
/// colon-or-whitespace, value is the trimmed remainder after the colon.
fn split_header_line(line: &[u8]) -> Http1Result<(Vec<u8>, Vec<u8>)> {
    let name_end = line
        .iter()
        .position(|&b| b == b':' || is_ws(b))
        .ok_or(Http1Error::InvalidMessage("header line has no colon"))?;
    if name_end == 0 {
        return Err(Http1Error::InvalidMessage("empty header name"));
    }
    let colon = if line[name_end] == b':' {
        name_end
    } else {
        name_end
            + line[name_end..]
                .iter()
                .position(|&b| b == b':')
                .ok_or(Http1Error::InvalidMessage("header line has no colon"))?
    };
    let name = line[..name_end].to_vec();
    let value = trim(&line[colon + 1..]).to_vec();
    Ok((name, value))
}

fn eq_ignore_case(a: &[u8], b: &[u8]) -> bool {
    a.eq_ignore_ascii_case(b)
}

fn has_chunked_token(value: &[u8]) -> bool {
    value
        .split(|&b| b == b',')
        .any(|part| eq_ignore_case(trim(part), b"chunked"))
}

fn is_forbidden_trailer_name(name: &[u8]) -> bool {
    eq_ignore_case(name, b"content-length")
        || eq_ignore_case(name, b"transfer-encoding")
        || eq_ignore_case(name, b"trailer")
}

/// The HTTP/1.x decoder described in spec §4.6, generic over a
/// `MessageFactory` that knows how to build the caller's concrete head type.
pub struct Http1Decoder<F: MessageFactory> {
    factory: F,
    config: DecoderConfig,
    state: State,
    line_scanner: LineScanner,
    header_scanner: HeaderScanner,
    head: Option<F::Head>,
    headers: HeaderList,
    pending_name: Option<Vec<u8>>,
    pending_value: Vec<u8>,
    content_length: ContentLength,
    chunk_remaining: u64,
    is_chunked: bool,
    trailers: HeaderList,
    reset_pending: bool,
}

impl<F: MessageFactory> Http1Decoder<F> {
    pub fn new(factory: F) -> Self {
        Self::with_config(factory, DecoderConfig::default())
    }

    pub fn with_config(factory: F, config: DecoderConfig) -> Self {
        Http1Decoder {
            line_scanner: LineScanner::new(config.max_initial_line_length),
            header_scanner: HeaderScanner::new(config.max_header_size),
            factory,
            config,
            state: State::SkipControlChars,
            head: None,
            headers: Vec::new(),
            pending_name: None,
            pending_value: Vec::new(),
            content_length: ContentLength::NotComputed,
            chunk_remaining: 0,
            is_chunked: false,
            trailers: Vec::new(),
            reset_pending: false,
        }
    }

    /// Requests a reset; applied at the start of the next `decode`/
    /// `decode_last` call rather than immediately, so a write racing a
    /// natural message completion never emits two `LastContent` events.
    pub fn reset(&mut self) {
        self.reset_pending = true;
    }

    /// `HttpExpectationFailedEvent` per spec §4.6 point 12: if currently
    /// reading a body, flags a reset for the same reason.
    pub fn notify_expectation_failed(&mut self) {
        if matches!(
            self.state,
            State::ReadFixedLengthContent | State::ReadVariableLengthContent | State::ReadChunkSize
        ) {
            self.reset_pending = true;
        }
    }

    fn do_reset(&mut self) {
        self.state = State::SkipControlChars;
        self.head = None;
        self.headers.clear();
        self.pending_name = None;
        self.pending_value.clear();
        self.content_length = ContentLength::NotComputed;
        self.chunk_remaining = 0;
        self.is_chunked = false;
        self.trailers.clear();
        self.line_scanner.reset();
        self.header_scanner.reset();
    }

    /// Decodes as much of `input` as is currently available, pushing events
    /// onto `output`. Returns `Ok` both when input runs out mid-state (the
    /// next call resumes exactly where this one left off) and when the
    /// message is malformed: a protocol violation transitions to
    /// `BAD_MESSAGE`, drains whatever of `input` is left, and is reported as
    /// an `InvalidMessage` event rather than an `Err`, matching §7's
    /// "emit and keep going" handling of a bad message.
    pub fn decode(&mut self, input: &mut Buffer, output: &mut Vec<Http1Event<F::Head>>) -> Http1Result<()> {
        if self.reset_pending {
            self.reset_pending = false;
            self.do_reset();
        }
        loop {
            let result = match self.state {
                State::SkipControlChars => self.skip_control_chars(input),
                State::ReadInitial => self.read_initial(input),
                State::ReadHeader => self.read_header(input, output),
                State::ReadFixedLengthContent => self.read_fixed_length_content(input, output),
                State::ReadVariableLengthContent => self.read_variable_length_content(input, output),
                State::ReadChunkSize => self.read_chunk_size(input),
                State::ReadChunkContent => self.read_chunk_content(input, output),
                State::ReadChunkDelimiter => self.read_chunk_delimiter(input),
                State::ReadChunkFooter => self.read_chunk_footer(input, output),
                State::BadMessage => {
                    self.drain(input);
                    return Ok(());
                }
                State::Upgraded => {
                    self.pass_through(input, output);
                    return Ok(());
                }
            };
            match result {
                Ok(()) => continue,
                Err(Http1Error::Partial) => return Ok(()),
                Err(e) => {
                    self.fail(output, &e);
                    self.drain(input);
                    return Ok(());
                }
            }
        }
    }

    /// Call once on connection close. Resolves any body framing that can
    /// only be settled by knowing no more bytes are coming.
    pub fn decode_last(&mut self, input: &mut Buffer, output: &mut Vec<Http1Event<F::Head>>) -> Http1Result<()> {
        self.decode(input, output)?;
        match self.state {
            State::ReadVariableLengthContent => {
                if !self.is_chunked {
                    self.emit_empty_last(output);
                    self.do_reset();
                }
            }
            State::ReadHeader => {
                let head = self.head.take().unwrap_or_else(|| self.factory.new_invalid_message());
                let headers = std::mem::take(&mut self.headers);
                output.push(Http1Event::InvalidMessage {
                    message: Message { head, headers },
                    cause: "connection closed before headers",
                });
                self.do_reset();
            }
            State::ReadInitial | State::SkipControlChars | State::BadMessage | State::Upgraded => {}
            State::ReadFixedLengthContent
            | State::ReadChunkSize
            | State::ReadChunkContent
            | State::ReadChunkDelimiter
            | State::ReadChunkFooter => {
                let premature = self.factory.is_decoding_request()
                    || self.is_chunked
                    || matches!(self.content_length, ContentLength::Known(n) if n > 0);
                if !premature {
                    self.emit_empty_last(output);
                }
                self.do_reset();
            }
        }
        Ok(())
    }

    fn emit_empty_last(&self, output: &mut Vec<Http1Event<F::Head>>) {
        output.push(Http1Event::LastContent { data: Vec::new(), trailers: Vec::new() });
    }

    fn fail(&mut self, output: &mut Vec<Http1Event<F::Head>>, err: &Http1Error) {
        debug!("http1 decoder: {} -> BAD_MESSAGE", err);
        self.state = State::BadMessage;
        let head = self.head.take().unwrap_or_else(|| self.factory.new_invalid_message());
        let headers = std::mem::take(&mut self.headers);
        output.push(Http1Event::InvalidMessage {
            message: Message { head, headers },
            cause: err.description_str(),
        });
    }

    fn drain(&mut self, input: &mut Buffer) {
        let len = input.get_left_array().len();
        if len > 0 {
            input.advance(len);
            input.commit();
        }
    }

    fn pass_through(&mut self, input: &mut Buffer, output: &mut Vec<Http1Event<F::Head>>) {
        let len = input.get_left_array().len();
        if len > 0 {
            let data = input.get_read_array(len).to_vec();
            input.advance(len);
            input.commit();
            output.push(Http1Event::Content(data));
        }
    }

    fn skip_control_chars(&mut self, input: &mut Buffer) -> Http1Result<()> {
        loop {
            let b = peek!(input)?;
            if is_skippable(b) {
                input.bump();
                input.commit();
            } else {
                self.state = State::ReadInitial;
                return Ok(());
            }
        }
    }

    fn read_initial(&mut self, input: &mut Buffer) -> Http1Result<()> {
        self.line_scanner.parse(input)?;
        let line = self.line_scanner.take_line();
        if line.is_empty() {
            // A stray blank line between messages (RFC 7230 §3.5 tolerance).
            self.state = State::SkipControlChars;
            return Ok(());
        }
        match split_initial_line(&line) {
            None => Err(Http1Error::InvalidMessage("initial line has fewer than three fields")),
            Some((first, second, rest)) => {
                let head = self.factory.new_message(&first, &second, &rest);
                self.head = Some(head);
                self.state = State::ReadHeader;
                Ok(())
            }
        }
    }

    /// Shared by header-block and trailer-block parsing: accumulates a
    /// continuation line into the pending value, or flushes the pending
    /// header and starts a new one.
    fn accumulate_header_line(&mut self, line: &[u8], is_trailer: bool) -> Http1Result<()> {
        if line[0] == b' ' || line[0] == b'\t' {
            if self.pending_name.is_none() {
                return Err(Http1Error::InvalidMessage("continuation line with no preceding header"));
            }
            let trimmed = trim(line);
            if !self.pending_value.is_empty() && !trimmed.is_empty() {
                self.pending_value.push(b' ');
            }
            self.pending_value.extend_from_slice(trimmed);
        } else {
            self.flush_pending_header(is_trailer)?;
            let (name, value) = split_header_line(line)?;
            if self.config.validate_headers {
                validate_header_name(&name)?;
            }
            self.pending_name = Some(name);
            self.pending_value = value;
        }
        Ok(())
    }

    fn flush_pending_header(&mut self, is_trailer: bool) -> Http1Result<()> {
        if let Some(name) = self.pending_name.take() {
            let value = std::mem::take(&mut self.pending_value);
            if self.config.validate_headers {
                validate_header_value(&value)?;
            }
            if is_trailer {
                if !is_forbidden_trailer_name(&name) {
                    self.trailers.push((name, value));
                }
            } else {
                self.observe_framing_header(&name, &value);
                self.headers.push((name, value));
            }
        }
        Ok(())
    }

    fn observe_framing_header(&mut self, name: &[u8], value: &[u8]) {
        if eq_ignore_case(name, b"transfer-encoding") {
            if has_chunked_token(value) {
                self.is_chunked = true;
            }
        } else if eq_ignore_case(name, b"content-length") {
            let digits = trim(value);
            if !digits.is_empty() && digits.iter().all(|&b| crate::helper::Helper::is_digit(b)) {
                if let Ok(s) = std::str::from_utf8(digits) {
                    if let Ok(n) = s.parse::<u64>() {
                        self.content_length = ContentLength::Known(n);
                    }
                }
            }
        }
    }

    /// The same `Upgrade`-without-`Sec-WebSocket-Accept` condition that made
    /// the factory report this response as not always-empty: a protocol
    /// switch the decoder doesn't itself understand, versus a completed
    /// WebSocket handshake (which carries `Sec-WebSocket-Accept` and is left
    /// on the normal empty-body path for the embedder to handle). Re-checked
    /// here, generically, rather than added as a fifth `MessageFactory`
    /// capability, since the decoder already holds the header list.
    fn is_unrecognized_upgrade(&self) -> bool {
        let has_upgrade = self.headers.iter().any(|(n, _)| eq_ignore_case(n, b"upgrade"));
        let has_ws_accept = self
            .headers
            .iter()
            .any(|(n, _)| eq_ignore_case(n, b"sec-websocket-accept"));
        has_upgrade && !has_ws_accept
    }

    fn read_header(&mut self, input: &mut Buffer, output: &mut Vec<Http1Event<F::Head>>) -> Http1Result<()> {
        loop {
            self.header_scanner.parse(input)?;
            let line = self.header_scanner.take_line();
            if line.is_empty() {
                self.flush_pending_header(false)?;
                return self.finish_headers(output);
            }
            self.accumulate_header_line(&line, false)?;
        }
    }

    fn finish_headers(&mut self, output: &mut Vec<Http1Event<F::Head>>) -> Http1Result<()> {
        let head = self.head.take().expect("head set by read_initial before read_header runs");
        let always_empty = self.factory.is_content_always_empty(&head, &self.headers);
        if always_empty {
            self.is_chunked = false;
        }
        if !always_empty && self.is_chunked && !self.config.chunked_supported {
            self.head = Some(head);
            return Err(Http1Error::UnsupportedChunkedEncoding);
        }

        if always_empty {
            output.push(Http1Event::MessageHead(Message { head, headers: std::mem::take(&mut self.headers) }));
            self.emit_empty_last(output);
            self.do_reset();
            return Ok(());
        }

        if !self.factory.is_decoding_request() && self.is_unrecognized_upgrade() {
            output.push(Http1Event::MessageHead(Message { head, headers: std::mem::take(&mut self.headers) }));
            self.state = State::Upgraded;
            return Ok(());
        }

        if self.is_chunked {
            output.push(Http1Event::MessageHead(Message { head, headers: std::mem::take(&mut self.headers) }));
            self.state = State::ReadChunkSize;
            return Ok(());
        }

        let length = match self.content_length {
            ContentLength::Known(n) => Some(n),
            _ => None,
        };
        if length == Some(0) || (length.is_none() && self.factory.is_decoding_request()) {
            output.push(Http1Event::MessageHead(Message { head, headers: std::mem::take(&mut self.headers) }));
            self.emit_empty_last(output);
            self.do_reset();
            return Ok(());
        }

        output.push(Http1Event::MessageHead(Message { head, headers: std::mem::take(&mut self.headers) }));
        match length {
            Some(n) => {
                self.chunk_remaining = n;
                self.state = State::ReadFixedLengthContent;
            }
            None => {
                self.content_length = ContentLength::Absent;
                self.state = State::ReadVariableLengthContent;
            }
        }
        Ok(())
    }

    fn read_fixed_length_content(&mut self, input: &mut Buffer, output: &mut Vec<Http1Event<F::Head>>) -> Http1Result<()> {
        peek!(input)?;
        let avail = input.get_left_array().len();
        let take = avail.min(self.config.max_chunk_size).min(self.chunk_remaining as usize);
        let data = input.get_read_array(take).to_vec();
        input.advance(take);
        input.commit();
        self.chunk_remaining -= take as u64;
        if self.chunk_remaining == 0 {
            output.push(Http1Event::LastContent { data, trailers: Vec::new() });
            self.do_reset();
        } else {
            output.push(Http1Event::Content(data));
        }
        Ok(())
    }

    fn read_variable_length_content(&mut self, input: &mut Buffer, output: &mut Vec<Http1Event<F::Head>>) -> Http1Result<()> {
        peek!(input)?;
        let avail = input.get_left_array().len();
        let take = avail.min(self.config.max_chunk_size);
        let data = input.get_read_array(take).to_vec();
        input.advance(take);
        input.commit();
        output.push(Http1Event::Content(data));
        Ok(())
    }

    fn read_chunk_size(&mut self, input: &mut Buffer) -> Http1Result<()> {
        self.line_scanner.parse(input)?;
        let line = self.line_scanner.take_line();
        let end = line
            .iter()
            .position(|&b| b == b';' || is_ws(b) || b < 0x20)
            .unwrap_or(line.len());
        let digits = &line[..end];
        if digits.is_empty() || !digits.iter().all(|&b| crate::helper::Helper::is_hex(b)) {
            return Err(Http1Error::InvalidChunkSize);
        }
        let s = std::str::from_utf8(digits).map_err(|_| Http1Error::InvalidChunkSize)?;
        let size = u64::from_str_radix(s, 16).map_err(|_| Http1Error::InvalidChunkSize)?;
        if size == 0 {
            self.state = State::ReadChunkFooter;
        } else {
            self.chunk_remaining = size;
            self.state = State::ReadChunkContent;
        }
        Ok(())
    }

    fn read_chunk_content(&mut self, input: &mut Buffer, output: &mut Vec<Http1Event<F::Head>>) -> Http1Result<()> {
        peek!(input)?;
        let avail = input.get_left_array().len();
        let take = avail.min(self.config.max_chunk_size).min(self.chunk_remaining as usize);
        let data = input.get_read_array(take).to_vec();
        input.advance(take);
        input.commit();
        self.chunk_remaining -= take as u64;
        output.push(Http1Event::Content(data));
        if self.chunk_remaining == 0 {
            self.state = State::ReadChunkDelimiter;
        }
        Ok(())
    }

    fn read_chunk_delimiter(&mut self, input: &mut Buffer) -> Http1Result<()> {
        loop {
            let b = next!(input)?;
            input.commit();
            if b == b'\n' {
                self.state = State::ReadChunkSize;
                return Ok(());
            }
        }
    }

    fn read_chunk_footer(&mut self, input: &mut Buffer, output: &mut Vec<Http1Event<F::Head>>) -> Http1Result<()> {
        loop {
            self.header_scanner.parse(input)?;
            let line = self.header_scanner.take_line();
            if line.is_empty() {
                self.flush_pending_header(true)?;
                trace!("trailers complete: {} entries", self.trailers.len());
                let trailers = std::mem::take(&mut self.trailers);
                output.push(Http1Event::LastContent { data: Vec::new(), trailers });
                self.do_reset();
                return Ok(());
            }
            self.accumulate_header_line(&line, true)?;
        }
    }
}

fn validate_header_name(name: &[u8]) -> Http1Result<()> {
    if name.is_empty() || !name.iter().all(|&b| crate::helper::Helper::is_header_name_token(b)) {
        return Err(Http1Error::InvalidMessage("header name contains an invalid character"));
    }
    Ok(())
}

fn validate_header_value(value: &[u8]) -> Http1Result<()> {
    if !value.iter().all(|&b| crate::helper::Helper::is_header_value_token(b)) {
        return Err(Http1Error::InvalidMessage("header value contains an invalid character"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http1::head::HttpMessageFactory;

    fn decode_all(decoder: &mut Http1Decoder<HttpMessageFactory>, bytes: &[u8]) -> Vec<Http1Event<super::super::head::Head>> {
        let mut input = Buffer::new_buf(bytes);
        let mut output = Vec::new();
        decoder.decode(&mut input, &mut output).unwrap();
        output
    }

    #[test]
    fn simple_request_with_content_length() {
        let mut decoder = Http1Decoder::new(HttpMessageFactory::requests());
        let events = decode_all(
            &mut decoder,
            b"POST /x HTTP/1.1\r\nHost: a\r\nContent-Length: 5\r\n\r\nhello",
        );
        assert_eq!(events.len(), 2);
        match &events[0] {
            Http1Event::MessageHead(m) => {
                let r = m.head.as_request().unwrap();
                assert_eq!(r.method, b"POST");
                assert_eq!(r.path, b"/x");
            }
            _ => panic!("expected message head"),
        }
        match &events[1] {
            Http1Event::LastContent { data, trailers } => {
                assert_eq!(data, b"hello");
                assert!(trailers.is_empty());
            }
            _ => panic!("expected last content"),
        }
    }

    #[test]
    fn chunked_request_body() {
        let mut decoder = Http1Decoder::new(HttpMessageFactory::requests());
        let events = decode_all(
            &mut decoder,
            b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n",
        );
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], Http1Event::MessageHead(_)));
        match &events[1] {
            Http1Event::Content(data) => assert_eq!(data, b"hello"),
            _ => panic!("expected content"),
        }
        match &events[2] {
            Http1Event::LastContent { data, trailers } => {
                assert!(data.is_empty());
                assert!(trailers.is_empty());
            }
            _ => panic!("expected last content"),
        }
    }

    #[test]
    fn byte_by_byte_resume_matches_whole_buffer() {
        let whole = b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n0\r\n\r\n";

        let mut one_shot = Http1Decoder::new(HttpMessageFactory::requests());
        let baseline = decode_all(&mut one_shot, whole);

        let mut decoder = Http1Decoder::new(HttpMessageFactory::requests());
        let mut events = Vec::new();
        for &b in whole {
            let mut input = Buffer::new_buf(&[b]);
            decoder.decode(&mut input, &mut events).unwrap();
        }

        assert_eq!(format!("{:?}", events), format!("{:?}", baseline));
    }

    #[test]
    fn request_without_content_length_is_empty() {
        let mut decoder = Http1Decoder::new(HttpMessageFactory::requests());
        let events = decode_all(&mut decoder, b"GET / HTTP/1.1\r\nHost: a\r\n\r\n");
        assert_eq!(events.len(), 2);
        match &events[1] {
            Http1Event::LastContent { data, .. } => assert!(data.is_empty()),
            _ => panic!("expected empty last content"),
        }
    }

    #[test]
    fn response_without_content_length_is_variable_length_until_close() {
        let mut decoder = Http1Decoder::new(HttpMessageFactory::responses());
        let mut input = Buffer::new_buf(b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\r\nhello world");
        let mut output = Vec::new();
        decoder.decode(&mut input, &mut output).unwrap();
        assert_eq!(output.len(), 2);
        assert!(matches!(output[0], Http1Event::MessageHead(_)));
        match &output[1] {
            Http1Event::Content(data) => assert_eq!(data, b"hello world"),
            _ => panic!("expected a content chunk, not last-content, before close"),
        }

        let mut empty = Buffer::new_buf(b"");
        decoder.decode_last(&mut empty, &mut output).unwrap();
        assert_eq!(output.len(), 3);
        match &output[2] {
            Http1Event::LastContent { data, .. } => assert!(data.is_empty()),
            _ => panic!("expected last content on close"),
        }
    }

    #[test]
    fn oversized_initial_line_goes_bad_message() {
        let mut decoder = Http1Decoder::with_config(
            HttpMessageFactory::requests(),
            DecoderConfig { max_initial_line_length: 4, ..Default::default() },
        );
        let events = decode_all(&mut decoder, b"GET /this-is-too-long HTTP/1.1\r\n\r\n");
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Http1Event::InvalidMessage { .. }));
    }

    #[test]
    fn a_malformed_message_is_reported_as_an_event_not_an_err() {
        let mut decoder = Http1Decoder::new(HttpMessageFactory::requests());
        let mut input = Buffer::new_buf(b"NOTANHTTPREQUEST\r\n\r\n");
        let mut output = Vec::new();
        let result = decoder.decode(&mut input, &mut output);
        assert!(result.is_ok(), "a bad message must not surface as Err, only as InvalidMessage");
        assert_eq!(output.len(), 1);
        assert!(matches!(output[0], Http1Event::InvalidMessage { .. }));
        assert_eq!(input.get_left_array().len(), 0);
    }

    #[test]
    fn header_continuation_lines_are_joined_with_a_space() {
        let mut decoder = Http1Decoder::new(HttpMessageFactory::requests());
        let events = decode_all(
            &mut decoder,
            b"GET / HTTP/1.1\r\nX-Long: one\r\n two\r\n\r\n",
        );
        match &events[0] {
            Http1Event::MessageHead(m) => {
                assert_eq!(m.headers[0], (b"X-Long".to_vec(), b"one two".to_vec()));
            }
            _ => panic!("expected message head"),
        }
    }

    #[test]
    fn chunked_trailers_are_attached_to_last_content() {
        let mut decoder = Http1Decoder::new(HttpMessageFactory::requests());
        let events = decode_all(
            &mut decoder,
            b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n0\r\nX-Trailer: done\r\n\r\n",
        );
        match events.last().unwrap() {
            Http1Event::LastContent { trailers, .. } => {
                assert_eq!(trailers[0], (b"X-Trailer".to_vec(), b"done".to_vec()));
            }
            _ => panic!("expected last content with trailers"),
        }
    }

    #[test]
    fn unsupported_chunked_is_rejected() {
        let mut decoder = Http1Decoder::with_config(
            HttpMessageFactory::requests(),
            DecoderConfig { chunked_supported: false, ..Default::default() },
        );
        let events = decode_all(
            &mut decoder,
            b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n0\r\n\r\n",
        );
        assert!(matches!(events[0], Http1Event::InvalidMessage { .. }));
    }

    #[test]
    fn switching_protocols_response_goes_upgraded_and_passes_bytes_through() {
        let mut decoder = Http1Decoder::new(HttpMessageFactory::responses());
        let mut input = Buffer::new_buf(
            b"HTTP/1.1 101 Switching Protocols\r\nUpgrade: h2c\r\n\r\nraw-bytes-after-upgrade",
        );
        let mut output = Vec::new();
        decoder.decode(&mut input, &mut output).unwrap();
        assert_eq!(output.len(), 2);
        assert!(matches!(output[0], Http1Event::MessageHead(_)));
        match &output[1] {
            Http1Event::Content(data) => assert_eq!(data, b"raw-bytes-after-upgrade"),
            _ => panic!("expected raw content after upgrade"),
        }
    }
}
