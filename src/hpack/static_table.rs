// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! RFC 7541 Appendix A: the 61-entry static table, indexed 1..=61.

use lazy_static::lazy_static;
use std::collections::HashMap;

pub const STATIC_TABLE_SIZE: usize = 61;

/// (HPACK, Appendix A). Index 15 is `accept-charset`, not the truncated
/// `accept-` some HPACK ports carry from a transcription slip.
pub static STATIC_TABLE_RAW: &[(&str, &str)] = &[
    (":authority", ""),
    (":method", "GET"),
    (":method", "POST"),
    (":path", "/"),
    (":path", "/index.html"),
    (":scheme", "http"),
    (":scheme", "https"),
    (":status", "200"),
    (":status", "204"),
    (":status", "206"),
    (":status", "304"),
    (":status", "400"),
    (":status", "404"),
    (":status", "500"),
    ("accept-charset", ""),
    ("accept-encoding", "gzip, deflate"),
    ("accept-language", ""),
    ("accept-ranges", ""),
    ("accept", ""),
    ("access-control-allow-origin", ""),
    ("age", ""),
    ("allow", ""),
    ("authorization", ""),
    ("cache-control", ""),
    ("content-disposition", ""),
    ("content-encoding", ""),
    ("content-language", ""),
    ("content-length", ""),
    ("content-location", ""),
    ("content-range", ""),
    ("content-type", ""),
    ("cookie", ""),
    ("date", ""),
    ("etag", ""),
    ("expect", ""),
    ("expires", ""),
    ("from", ""),
    ("host", ""),
    ("if-match", ""),
    ("if-modified-since", ""),
    ("if-none-match", ""),
    ("if-range", ""),
    ("if-unmodified-since", ""),
    ("last-modified", ""),
    ("link", ""),
    ("location", ""),
    ("max-forwards", ""),
    ("proxy-authenticate", ""),
    ("proxy-authorization", ""),
    ("range", ""),
    ("referer", ""),
    ("refresh", ""),
    ("retry-after", ""),
    ("server", ""),
    ("set-cookie", ""),
    ("strict-transport-security", ""),
    ("transfer-encoding", ""),
    ("user-agent", ""),
    ("vary", ""),
    ("via", ""),
    ("www-authenticate", ""),
];

lazy_static! {
    /// name -> lowest 1-based index with that name (first match wins, as
    /// required by `lookupByName`'s "smallest index" rule).
    static ref NAME_INDEX: HashMap<&'static str, usize> = {
        let mut m = HashMap::new();
        for (idx, &(name, _)) in STATIC_TABLE_RAW.iter().enumerate() {
            m.entry(name).or_insert(idx + 1);
        }
        m
    };
    /// (name, value) -> 1-based index, exact match only.
    static ref NAME_VALUE_INDEX: HashMap<(&'static str, &'static str), usize> = {
        let mut m = HashMap::new();
        for (idx, &pair) in STATIC_TABLE_RAW.iter().enumerate() {
            m.entry(pair).or_insert(idx + 1);
        }
        m
    };
}

/// Returns the 1-based static index for an exact (name, value) match, if any.
pub fn lookup_name_value(name: &[u8], value: &[u8]) -> Option<usize> {
    let name = std::str::from_utf8(name).ok()?;
    let value = std::str::from_utf8(value).ok()?;
    NAME_VALUE_INDEX.get(&(name, value)).copied()
}

/// Returns the smallest 1-based static index with a matching name, if any.
pub fn lookup_name(name: &[u8]) -> Option<usize> {
    let name = std::str::from_utf8(name).ok()?;
    NAME_INDEX.get(name).copied()
}

/// Returns the (name, value) pair stored at 1-based static `index`.
pub fn entry_at(index: usize) -> Option<(&'static str, &'static str)> {
    if index == 0 {
        return None;
    }
    STATIC_TABLE_RAW.get(index - 1).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_61_entries() {
        assert_eq!(STATIC_TABLE_RAW.len(), STATIC_TABLE_SIZE);
    }

    #[test]
    fn method_get_is_index_2() {
        assert_eq!(lookup_name_value(b":method", b"GET"), Some(2));
    }

    #[test]
    fn accept_charset_is_index_15() {
        assert_eq!(entry_at(15), Some(("accept-charset", "")));
        assert_eq!(lookup_name(b"accept-charset"), Some(15));
    }

    #[test]
    fn name_only_match_picks_lowest_index() {
        // :method appears at both 2 and 3; name-only lookup must pick 2.
        assert_eq!(lookup_name(b":method"), Some(2));
    }

    #[test]
    fn unknown_name_is_absent() {
        assert_eq!(lookup_name(b"x-unknown"), None);
        assert_eq!(lookup_name_value(b":method", b"PUT"), None);
    }
}
