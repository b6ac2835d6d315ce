// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! BLC bitstream reader and printer.
//!
//! The wire format is John Tromp's binary encoding of De Bruijn terms:
//!
//! - `Var(n)` is `1` repeated `n + 1` times followed by `0`
//! - `Lambda(b)` is `00` followed by the body
//! - `Call(f, a)` is `01` followed by function and argument
//!
//! The reader accepts ASCII `'0'`/`'1'` bytes and skips everything else;
//! end of input in the middle of a term is a parse failure. The printer
//! emits `'0'`/`'1'` bytes with no separators.


use std::io::{self, Read, Write};

use thiserror::Error;

use crate::cell::{Cell, CellRef};
use crate::heap::{Heap, HeapError};

/// Bitstream parse failure.
#[derive(Debug, Error)]
pub enum ParseError {
    /// End of input in the middle of a term.
    #[error("unexpected end of input")]
    UnexpectedEof,
    /// Cell allocation failed while building the term.
    #[error(transparent)]
    Heap(#[from] HeapError),
    /// The underlying reader failed.
    #[error("read error: {0}")]
    Io(#[from] io::Error),
}

/// Whitespace-skipping bit source over a byte reader.
struct Bits<R> {
    input: R,
}

impl<R: Read> Bits<R> {
    /// Next significant bit, or `None` at end of input.
    fn next(&mut self) -> Result<Option<bool>, ParseError> {
        let mut byte = [0u8; 1];
        loop {
            if self.input.read(&mut byte)? == 0 {
                return Ok(None);
            }
            match byte[0] {
                b'0' => return Ok(Some(false)),
                b'1' => return Ok(Some(true)),
                _ => {}
            }
        }
    }

    /// Next bit, failing at end of input.
    fn demand(&mut self) -> Result<bool, ParseError> {
        self.next()?.ok_or(ParseError::UnexpectedEof)
    }
}

/// Read one term from a BLC bitstream.
///
/// # Errors
///
/// Fails on a truncated or unreadable bitstream or when the arena is
/// exhausted.
pub fn read_expr<R: Read>(heap: &mut Heap, input: R) -> Result<CellRef, ParseError> {
    let mut bits = Bits { input };
    parse_expr(heap, &mut bits)
}

fn parse_expr<R: Read>(heap: &mut Heap, bits: &mut Bits<R>) -> Result<CellRef, ParseError> {
    if bits.demand()? {
        parse_var(heap, bits)
    } else if bits.demand()? {
        parse_call(heap, bits)
    } else {
        parse_lambda(heap, bits)
    }
}

fn parse_var<R: Read>(heap: &mut Heap, bits: &mut Bits<R>) -> Result<CellRef, ParseError> {
    // The leading 1 is already consumed; each further 1 is one more level.
    let mut idx = 0;
    while bits.demand()? {
        idx += 1;
    }
    Ok(heap.make_var(idx)?)
}

fn parse_lambda<R: Read>(heap: &mut Heap, bits: &mut Bits<R>) -> Result<CellRef, ParseError> {
    let body = parse_expr(heap, bits)?;
    Ok(heap.make_lambda(body)?)
}

fn parse_call<R: Read>(heap: &mut Heap, bits: &mut Bits<R>) -> Result<CellRef, ParseError> {
    // The function must stay rooted while the argument is parsed: parsing
    // allocates and may trigger a collection.
    let fun = parse_expr(heap, bits)?;
    heap.push(fun)?;
    let arg = parse_expr(heap, bits);
    heap.pop(1);
    let arg = arg?;
    Ok(heap.make_call(fun, arg)?)
}

/// Write a term to a sink in BLC encoding.
///
/// Term constructors print bit-exactly; runtime tags print as debug forms
/// (`#<proc:...>`, `#<input>`, ...) so any cell can be dumped.
///
/// # Errors
///
/// Fails when the sink fails.
pub fn print_expr<W: Write>(heap: &Heap, expr: CellRef, out: &mut W) -> io::Result<()> {
    match heap.cell(expr) {
        Cell::Var { idx } => {
            for _ in 0..=*idx {
                out.write_all(b"1")?;
            }
            out.write_all(b"0")
        }
        Cell::Lambda { body } => {
            out.write_all(b"00")?;
            print_expr(heap, *body, out)
        }
        Cell::Call { fun, arg } => {
            out.write_all(b"01")?;
            print_expr(heap, *fun, out)?;
            print_expr(heap, *arg, out)
        }
        Cell::Proc { block, stack } => {
            out.write_all(b"#<proc:")?;
            print_expr(heap, *block, out)?;
            write!(out, ";#env={}>", env_length(heap, *stack))
        }
        Cell::Wrap { unwrap, .. } => {
            out.write_all(b"#<wrap:")?;
            print_expr(heap, *unwrap, out)?;
            out.write_all(b">")
        }
        Cell::Memoize { .. } => out.write_all(b"#<memoize>"),
        Cell::Cont { .. } => out.write_all(b"#<cont>"),
        Cell::Input { .. } => out.write_all(b"#<input>"),
        Cell::Str { bytes, pos } => write!(out, "#<string:{}>", bytes.len() - pos),
        Cell::Int { value } => write!(out, "#<integer:{value}>"),
    }
}

/// Render a term to a string.
#[must_use]
pub fn print_to_string(heap: &Heap, expr: CellRef) -> String {
    let mut out = Vec::new();
    print_expr(heap, expr, &mut out).expect("writing to a Vec cannot fail");
    String::from_utf8(out).expect("printer emits ASCII")
}

/// Number of entries in a pair-encoded environment.
fn env_length(heap: &Heap, mut env: CellRef) -> usize {
    let mut n = 0;
    while let Cell::Call { fun, .. } = heap.cell(env) {
        if !heap.cell(*fun).is_call() {
            break;
        }
        env = heap.arg(*fun);
        n += 1;
    }
    n
}
