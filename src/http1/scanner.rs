// Copyright 2022 - 2023 Wenmeng See the COPYRIGHT
// file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
//
// Author: tickbh

//! CR/LF-framed line extraction with a size cap, shared by the initial
//! line, header lines, chunk-size lines, and trailer lines.

use crate::buffer::Buffer;
use crate::next;

use super::error::{Http1Error, Http1Result, ScanContext};

/// Wraps a reusable scratch buffer and a running byte count checked against
/// `cap`. `accumulate` decides whether that count persists across lines
/// (the header scanner, enforcing a cap over the whole header block) or
/// resets once a line is consumed (the line scanner, capping one line at a
/// time).
pub(crate) struct Scanner {
    line: Vec<u8>,
    running: usize,
    cap: usize,
    context: ScanContext,
    accumulate: bool,
}

impl Scanner {
    fn new(cap: usize, context: ScanContext, accumulate: bool) -> Scanner {
        Scanner {
            line: Vec::new(),
            running: 0,
            cap,
            context,
            accumulate,
        }
    }

    /// Consumes bytes from `input`'s read cursor until an LF. CR bytes are
    /// discarded. Returns `Ok(())` once a full line sits in the scratch
    /// buffer (read it with `take_line`); propagates `Http1Error::Partial`
    /// when input runs out first, leaving the cursor and scratch buffer
    /// positioned to resume on the next call.
    pub fn parse(&mut self, input: &mut Buffer) -> Http1Result<()> {
        loop {
            let b = next!(input)?;
            match b {
                b'\n' => return Ok(()),
                b'\r' => continue,
                _ => {
                    self.running += 1;
                    if self.running > self.cap {
                        return Err(Http1Error::FrameTooLarge {
                            context: self.context,
                            limit: self.cap,
                        });
                    }
                    self.line.push(b);
                }
            }
        }
    }

    /// Takes the completed line out of the scratch buffer. For a
    /// non-accumulating scanner (the line scanner) this also resets the
    /// size counter, so the next line starts its own budget; the header
    /// scanner's counter is left alone, enforcing the cap across the whole
    /// block until `reset` is called between messages.
    pub fn take_line(&mut self) -> Vec<u8> {
        let line = std::mem::take(&mut self.line);
        if !self.accumulate {
            self.running = 0;
        }
        line
    }

    /// Full reset: scratch buffer and running total both cleared. Called
    /// between messages.
    pub fn reset(&mut self) {
        self.line.clear();
        self.running = 0;
    }
}

pub(crate) struct LineScanner(Scanner);

impl LineScanner {
    pub fn new(cap: usize) -> LineScanner {
        LineScanner(Scanner::new(cap, ScanContext::Line, false))
    }

    pub fn parse(&mut self, input: &mut Buffer) -> Http1Result<()> {
        self.0.parse(input)
    }

    pub fn take_line(&mut self) -> Vec<u8> {
        self.0.take_line()
    }

    pub fn reset(&mut self) {
        self.0.reset()
    }
}

pub(crate) struct HeaderScanner(Scanner);

impl HeaderScanner {
    pub fn new(cap: usize) -> HeaderScanner {
        HeaderScanner(Scanner::new(cap, ScanContext::Header, true))
    }

    pub fn parse(&mut self, input: &mut Buffer) -> Http1Result<()> {
        self.0.parse(input)
    }

    pub fn take_line(&mut self) -> Vec<u8> {
        self.0.take_line()
    }

    pub fn reset(&mut self) {
        self.0.reset()
    }
}
