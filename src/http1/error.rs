// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

use std::{fmt, result};

/// Which budget a `FrameTooLarge` error came from, so the decoder can report
/// a distinct message for an over-long initial line versus an over-long
/// header block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanContext {
    Line,
    Header,
}

impl fmt::Display for ScanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanContext::Line => f.write_str("line"),
            ScanContext::Header => f.write_str("header block"),
        }
    }
}

/// Errors the HTTP/1.x decoder can raise while parsing a byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Http1Error {
    /// Not enough input to make progress; not a protocol violation, just a
    /// request to park and resume on the next `decode` call.
    Partial,
    /// A line or the whole header block exceeded its configured cap.
    FrameTooLarge { context: ScanContext, limit: usize },
    /// A chunk-size line could not be parsed as hexadecimal.
    InvalidChunkSize,
    /// The initial line or a header line was malformed.
    InvalidMessage(&'static str),
    /// The peer sent `Transfer-Encoding: chunked` but `chunked_supported` is
    /// false.
    UnsupportedChunkedEncoding,
}

impl Http1Error {
    pub(crate) fn description_str(&self) -> &'static str {
        match self {
            Http1Error::Partial => "not enough data to proceed",
            Http1Error::FrameTooLarge { context: ScanContext::Line, .. } => {
                "line exceeds the configured maximum length"
            }
            Http1Error::FrameTooLarge { context: ScanContext::Header, .. } => {
                "header block exceeds the configured maximum size"
            }
            Http1Error::InvalidChunkSize => "invalid chunk size",
            Http1Error::InvalidMessage(_) => "invalid HTTP message",
            Http1Error::UnsupportedChunkedEncoding => "chunked transfer encoding is not supported",
        }
    }
}

impl fmt::Display for Http1Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Http1Error::FrameTooLarge { context, limit } => {
                write!(f, "{} exceeds maximum of {} bytes", context, limit)
            }
            Http1Error::InvalidMessage(cause) => write!(f, "invalid HTTP message: {}", cause),
            _ => f.write_str(self.description_str()),
        }
    }
}

impl std::error::Error for Http1Error {}

pub type Http1Result<T> = result::Result<T, Http1Error>;
