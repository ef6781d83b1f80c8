// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

use log::{debug, trace};

use super::dynamic_table::DynamicTable;
use super::error::{ConfigError, HpackError, HpackResult};
use super::huffman;
use super::integer::encode_integer;
use super::static_table;

/// RFC 7541 §3: header table size is a non-negative integer not exceeding
/// 2^31 - 1.
pub const MIN_TABLE_SIZE: u32 = 0;
pub const MAX_TABLE_SIZE: u32 = (1u32 << 31) - 1;
pub const DEFAULT_HEADER_TABLE_SIZE: u32 = 4_096;
/// RFC 7540 §6.5.2: SETTINGS_MAX_HEADER_LIST_SIZE has no mandated default;
/// "unlimited" is represented as `u32::MAX`.
pub const DEFAULT_HEADER_LIST_SIZE: u32 = u32::MAX;

pub struct EncoderConfig {
    pub ignore_max_header_list_size: bool,
    pub array_size_hint: usize,
    pub max_header_table_size: u32,
    pub max_header_list_size: u32,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            ignore_max_header_list_size: false,
            array_size_hint: 16,
            max_header_table_size: DEFAULT_HEADER_TABLE_SIZE,
            max_header_list_size: DEFAULT_HEADER_LIST_SIZE,
        }
    }
}

/// An HPACK header-block encoder, RFC 7541.
///
/// Not thread-safe: an instance owns a single dynamic table and must not be
/// shared across concurrent callers.
pub struct Encoder {
    table: DynamicTable,
    ignore_max_header_list_size: bool,
    max_header_list_size: u32,
    array_size_hint: usize,
}

impl Encoder {
    pub fn new(config: EncoderConfig) -> Encoder {
        Encoder {
            table: DynamicTable::new(config.max_header_table_size),
            ignore_max_header_list_size: config.ignore_max_header_list_size,
            max_header_list_size: config.max_header_list_size,
            array_size_hint: config.array_size_hint,
        }
    }

    pub fn with_defaults() -> Encoder {
        Encoder::new(EncoderConfig::default())
    }

    pub fn max_header_table_size(&self) -> u32 {
        self.table.max_size()
    }

    pub fn dynamic_table_len(&self) -> usize {
        self.table.len()
    }

    pub fn dynamic_table_size(&self) -> usize {
        self.table.size()
    }

    /// RFC 7541 §6.3: validates and applies a new dynamic table capacity and
    /// emits the matching size-update directive (mask `0x20`, 5-bit prefix).
    /// A no-op value still shrinks the table via `ensureCapacity(0)` but is
    /// validated the same as any other call; an unchanged value performs no
    /// table mutation and emits nothing.
    pub fn set_max_header_table_size(&mut self, out: &mut Vec<u8>, new_max: u32) -> HpackResult<()> {
        if new_max > MAX_TABLE_SIZE {
            return Err(HpackError::Configuration(ConfigError::TableSize {
                value: new_max,
                min: MIN_TABLE_SIZE,
                max: MAX_TABLE_SIZE,
            }));
        }
        if new_max == self.table.max_size() {
            return Ok(());
        }
        self.table.set_max_size(new_max);
        debug!("dynamic table resized to {new_max}");
        encode_integer(out, new_max as u64, 5, 0x20);
        Ok(())
    }

    /// Validates and stores the header-list budget; has no wire effect.
    pub fn set_max_header_list_size(&mut self, new_max: u32) -> HpackResult<()> {
        if new_max < 1 {
            return Err(HpackError::Configuration(ConfigError::HeaderListSize {
                value: new_max,
                min: 1,
                max: u32::MAX,
            }));
        }
        self.max_header_list_size = new_max;
        Ok(())
    }

    /// Encodes `headers` in input order into `out`. `sensitivity` classifies
    /// each (name, value) pair as "never index". Raises a protocol error
    /// (parameterised by `stream_id`) with no partial output and no dynamic
    /// table mutation if the header list's total size would exceed
    /// `max_header_list_size`, unless `ignore_max_header_list_size` is set.
    pub fn encode_headers<'a, I, F>(
        &mut self,
        stream_id: u32,
        out: &mut Vec<u8>,
        headers: I,
        mut sensitivity: F,
    ) -> HpackResult<()>
    where
        I: IntoIterator<Item = (&'a [u8], &'a [u8])>,
        F: FnMut(&[u8], &[u8]) -> bool,
    {
        let headers: Vec<(&[u8], &[u8])> = headers.into_iter().collect();

        if !self.ignore_max_header_list_size {
            let total: usize = headers
                .iter()
                .map(|(name, value)| name.len() + value.len() + 32)
                .sum();
            if total > self.max_header_list_size as usize {
                return Err(HpackError::HeaderListSizeExceeded {
                    stream_id,
                    len: total,
                    max: self.max_header_list_size as usize,
                });
            }
        }

        out.reserve(self.array_size_hint);
        for (name, value) in headers {
            let sensitive = sensitivity(name, value);
            let header_size = name.len() + value.len() + 32;
            self.encode_header(out, name, value, sensitive, header_size);
        }
        Ok(())
    }

    fn name_index(&self, name: &[u8]) -> Option<usize> {
        if let Some(idx) = static_table::lookup_name(name) {
            return Some(idx);
        }
        self.table
            .lookup_by_name(name)
            .map(|idx| idx + static_table::STATIC_TABLE_SIZE)
    }

    fn encode_header(&mut self, out: &mut Vec<u8>, name: &[u8], value: &[u8], sensitive: bool, header_size: usize) {
        let max_table_size = self.table.max_size();

        if sensitive {
            let name_index = self.name_index(name);
            self.emit_literal(out, name, value, name_index, 0x10, 4);
            return;
        }

        if max_table_size == 0 {
            if let Some(idx) = static_table::lookup_name_value(name, value) {
                encode_integer(out, idx as u64, 7, 0x80);
            } else {
                let name_index = static_table::lookup_name(name);
                self.emit_literal(out, name, value, name_index, 0x00, 4);
            }
            return;
        }

        if header_size > max_table_size as usize {
            let name_index = self.name_index(name);
            self.emit_literal(out, name, value, name_index, 0x00, 4);
            return;
        }

        if let Some(idx) = self.table.lookup_by_name_value(name, value) {
            let index = idx + static_table::STATIC_TABLE_SIZE;
            encode_integer(out, index as u64, 7, 0x80);
            return;
        }

        if let Some(idx) = static_table::lookup_name_value(name, value) {
            encode_integer(out, idx as u64, 7, 0x80);
            return;
        }

        let name_index = self.name_index(name);
        self.emit_literal(out, name, value, name_index, 0x40, 6);
        self.table.add(name.to_vec(), value.to_vec());
        trace!(
            "dynamic table now holds {} entries, {} bytes",
            self.table.len(),
            self.table.size()
        );
    }

    /// Emits a literal representation: prefix-integer name index (or 0),
    /// optionally followed by a string-literal name, then always a
    /// string-literal value.
    fn emit_literal(
        &self,
        out: &mut Vec<u8>,
        name: &[u8],
        value: &[u8],
        name_index: Option<usize>,
        mask: u8,
        prefix_bits: u8,
    ) {
        encode_integer(out, name_index.unwrap_or(0) as u64, prefix_bits, mask);
        if name_index.is_none() {
            emit_string(out, name);
        }
        emit_string(out, value);
    }
}

/// Emits a string literal: a Huffman flag bit, a 7-bit prefix length, then
/// the bytes. Huffman form is used only when strictly shorter than raw.
fn emit_string(out: &mut Vec<u8>, s: &[u8]) {
    let huffman_len = huffman::encoded_len(s);
    if huffman_len < s.len() {
        encode_integer(out, huffman_len as u64, 7, 0x80);
        huffman::encode(out, s);
    } else {
        encode_integer(out, s.len() as u64, 7, 0x00);
        out.extend_from_slice(s);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_sensitive(_: &[u8], _: &[u8]) -> bool {
        false
    }

    #[test]
    fn static_table_hit() {
        let mut enc = Encoder::with_defaults();
        let mut out = Vec::new();
        enc.encode_headers(1, &mut out, vec![(&b":method"[..], &b"GET"[..])], not_sensitive)
            .unwrap();
        assert_eq!(out, vec![0x82]);
        assert_eq!(enc.dynamic_table_len(), 0);
    }

    #[test]
    fn literal_with_incremental_indexing() {
        let mut enc = Encoder::with_defaults();
        let mut out = Vec::new();
        enc.encode_headers(
            1,
            &mut out,
            vec![(&b"custom-key"[..], &b"custom-header"[..])],
            not_sensitive,
        )
        .unwrap();
        assert_eq!(out[0] & 0xc0, 0x40);
        assert_eq!(out[0] & 0x3f, 0); // no name index, literal name follows
        assert_eq!(out[1] & 0x80, 0x80); // huffman flag on the name length
        assert_eq!(enc.dynamic_table_len(), 1);
        assert_eq!(enc.dynamic_table_size(), 10 + 13 + 32);
    }

    #[test]
    fn sensitive_header_is_never_indexed() {
        let mut enc = Encoder::with_defaults();
        let mut out = Vec::new();
        enc.encode_headers(
            1,
            &mut out,
            vec![(&b"password"[..], &b"q1w2e3"[..])],
            |_, _| true,
        )
        .unwrap();
        assert_eq!(out[0] & 0xf0, 0x10);
        assert_eq!(enc.dynamic_table_len(), 0);
    }

    #[test]
    fn table_size_update_evicts_to_fit() {
        let mut enc = Encoder::with_defaults();
        let mut out = Vec::new();
        enc.encode_headers(
            1,
            &mut out,
            vec![
                (&b"a"[..], &b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa"[..]),
                (&b"b"[..], &b"bb"[..]),
                (&b"c"[..], &b"cc"[..]),
            ],
            not_sensitive,
        )
        .unwrap();

        let mut update = Vec::new();
        enc.set_max_header_table_size(&mut update, 100).unwrap();
        assert!(!update.is_empty());
        assert_eq!(update[0] & 0xe0, 0x20);
        assert!(enc.dynamic_table_size() <= 100);
    }

    #[test]
    fn header_list_too_large_does_not_mutate_table_or_output() {
        let mut enc = Encoder::with_defaults();
        enc.set_max_header_list_size(10).unwrap();
        let mut out = Vec::new();
        let before_len = enc.dynamic_table_len();
        let result = enc.encode_headers(
            7,
            &mut out,
            vec![(&b"custom-key"[..], &b"custom-header"[..])],
            not_sensitive,
        );
        assert!(matches!(
            result,
            Err(HpackError::HeaderListSizeExceeded { stream_id: 7, .. })
        ));
        assert!(out.is_empty());
        assert_eq!(enc.dynamic_table_len(), before_len);
    }

    #[test]
    fn invalid_table_size_is_rejected() {
        let mut enc = Encoder::with_defaults();
        let mut out = Vec::new();
        let err = enc
            .set_max_header_table_size(&mut out, MAX_TABLE_SIZE + 1)
            .unwrap_err();
        assert!(matches!(err, HpackError::Configuration(ConfigError::TableSize { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn repeated_header_hits_dynamic_table() {
        let mut enc = Encoder::with_defaults();
        let mut out = Vec::new();
        enc.encode_headers(
            1,
            &mut out,
            vec![(&b"custom-key"[..], &b"custom-header"[..])],
            not_sensitive,
        )
        .unwrap();
        out.clear();
        enc.encode_headers(
            1,
            &mut out,
            vec![(&b"custom-key"[..], &b"custom-header"[..])],
            not_sensitive,
        )
        .unwrap();
        assert_eq!(out[0] & 0x80, 0x80);
        let (idx, _) = super::super::integer::decode_integer(&out, 7).unwrap();
        assert_eq!(idx as usize, static_table::STATIC_TABLE_SIZE + 1);
    }
}
