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

use crate::hpack::HpackError;
use crate::http1::Http1Error;

/// Top-level error for the codec core, composing the HPACK and HTTP/1.x
/// subsystem errors the way a caller embedding both sees them.
#[derive(Debug)]
pub enum CodecError {
    Hpack(HpackError),
    Http1(Http1Error),
}

impl CodecError {
    #[inline]
    fn description_str(&self) -> &'static str {
        match self {
            CodecError::Hpack(e) => e.description_str(),
            CodecError::Http1(e) => e.description_str(),
        }
    }

    /// True when the error just means "not enough input yet", not a protocol
    /// violation.
    pub fn is_partial(&self) -> bool {
        matches!(self, CodecError::Http1(Http1Error::Partial))
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description_str())
    }
}

impl std::error::Error for CodecError {}

impl From<HpackError> for CodecError {
    fn from(e: HpackError) -> Self {
        CodecError::Hpack(e)
    }
}

impl From<Http1Error> for CodecError {
    fn from(e: Http1Error) -> Self {
        CodecError::Http1(e)
    }
}

pub type CodecResult<T> = result::Result<T, CodecError>;
