// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! RFC 7541 HPACK: integer/string codecs, the static table, a bounded
//! dynamic table and the header encoder built on top of them.
//!
//! This module implements encoding only. Decoding an HPACK block is out of
//! scope; `dynamic_table` and `integer`/`huffman` expose just enough of the
//! decode-side machinery (under `pub(crate)`) to make their own round-trip
//! tests possible.

mod dynamic_table;
mod encoder;
mod error;
mod huffman;
mod integer;
mod static_table;

pub use dynamic_table::DynamicTable;
pub use encoder::{Encoder, EncoderConfig};
pub use error::{ConfigError, HpackError, HpackResult};
pub use static_table::STATIC_TABLE_SIZE;
