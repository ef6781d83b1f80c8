// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! A resumable HTTP/1.x message decoder: initial line, headers, and
//! fixed/variable/chunked body framing, parsed incrementally from whatever
//! bytes happen to be available on each call.

mod decoder;
mod error;
mod head;
mod message;
mod scanner;

pub use decoder::{DecoderConfig, Http1Decoder};
pub use error::{Http1Error, Http1Result, ScanContext};
pub use head::{is_close_delimited, Head, HttpMessageFactory, RequestLine, StatusLine};
pub use message::{HeaderList, Http1Event, Message, MessageFactory};
