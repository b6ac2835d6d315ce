// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! Character-level REPL skeleton, expressed as a BLC term.
//!
//! The REPL is itself a lambda term: a Y-combinator loop over the pair
//! `(input, state)` where `state` is a one-element list holding the token
//! accumulated so far. Each step dispatches on the next input byte through
//! an association list:
//!
//! - `'\n'` flushes the accumulator followed by a newline and recurses with
//!   a cleared accumulator
//! - `' '` and `'\t'` are skipped
//! - `'='` is rejected with a message
//! - any other byte is appended to the accumulator
//!
//! End of input with a non-empty accumulator reports `Unexpected EOF`.
//! Applying the skeleton to an input stream yields the byte list of
//! everything the REPL prints.


use std::io::{Read, Write};

use crate::cell::CellRef;
use crate::church::Library;
use crate::heap::{Heap, HeapError};
use crate::stream::{self, StreamError};

/// Build the REPL term. Applying it to an input stream evaluates to the
/// produced byte list.
///
/// # Errors
///
/// Fails when the arena is exhausted.
#[allow(clippy::many_single_char_names)]
pub fn skeleton(heap: &mut Heap, lib: &Library) -> Result<CellRef, HeapError> {
    let f = lib.f();
    let concat = lib.concat_fn();
    let lookup = lib.lookup_fn();
    let eq_num = lib.eq_num_fn();

    let mut b = lib.builder(heap);
    let v0 = b.s.var(0)?;
    let v1 = b.s.var(1)?;
    let v2 = b.s.var(2)?;
    let v3 = b.s.var(3)?;

    // End of input: a pending token means the line never finished.
    let token = b.first(v1)?;
    let token_empty = b.empty(token)?;
    let eof_msg = b.s.str("Unexpected EOF\n")?;
    let eof_case = b.op_if(token_empty, f, eof_msg)?;

    // Newline: emit the token and a newline, recurse with a cleared state.
    let token = b.first(v1)?;
    let nl = b.s.int(u32::from(b'\n'))?;
    let nl_list = b.pair(nl, f)?;
    let flushed = b.s.call2(concat, token, nl_list)?;
    let remaining = b.rest(v0)?;
    let dropped = b.rest(v1)?;
    let cleared = b.pair(f, dropped)?;
    let resumed = b.s.call2(v2, remaining, cleared)?;
    let nl_action = b.s.call2(concat, flushed, resumed)?;
    let nl_key = b.s.int(u32::from(b'\n'))?;
    let nl_entry = b.pair(nl_key, nl_action)?;

    // Space and tab: skip the byte.
    let remaining = b.rest(v0)?;
    let sp_action = b.s.call2(v2, remaining, v1)?;
    let sp_key = b.s.int(u32::from(b' '))?;
    let sp_entry = b.pair(sp_key, sp_action)?;
    let remaining = b.rest(v0)?;
    let tab_action = b.s.call2(v2, remaining, v1)?;
    let tab_key = b.s.int(u32::from(b'\t'))?;
    let tab_entry = b.pair(tab_key, tab_action)?;

    // Definitions are not part of the skeleton.
    let eq_key = b.s.int(u32::from(b'='))?;
    let eq_msg = b.s.str("Unexpected '='\n")?;
    let eq_entry = b.pair(eq_key, eq_msg)?;

    let table = b.pair(eq_entry, f)?;
    let table = b.pair(tab_entry, table)?;
    let table = b.pair(sp_entry, table)?;
    let table = b.pair(nl_entry, table)?;

    // Default: append the byte to the token. One binder deeper, so every
    // outer reference shifts by one.
    let token = b.first(v2)?;
    let byte = b.first(v1)?;
    let byte_list = b.pair(byte, f)?;
    let grown = b.s.call2(concat, token, byte_list)?;
    let kept = b.rest(v2)?;
    let updated = b.pair(grown, kept)?;
    let remaining = b.rest(v1)?;
    let default_body = b.s.call2(v3, remaining, updated)?;
    let default_case = b.s.lambda(default_body)?;

    let dispatch = b.s.call3(lookup, table, eq_num, default_case)?;
    let head = b.first(v0)?;
    let step = b.s.call(dispatch, head)?;

    let input_empty = b.empty(v0)?;
    let body = b.op_if(input_empty, eof_case, step)?;
    let fun = b.s.lambda2(body)?;
    let looped = b.recursive(fun)?;

    // Initial state: one empty accumulator.
    let state = b.pair(f, f)?;
    let r = b.s.call(looped, state)?;
    Ok(b.s.finish(r))
}

/// Drive the REPL term over an input stream, writing its byte list to a
/// sink.
///
/// # Errors
///
/// Fails when the arena is exhausted, evaluation fails or the sink fails.
pub fn run<R: Read + 'static, W: Write>(
    heap: &mut Heap,
    lib: &Library,
    input: R,
    sink: &mut W,
) -> Result<(), StreamError> {
    let term = skeleton(heap, lib)?;
    heap.push(term)?;
    let source = stream::from_reader(heap, input)?;
    let applied = heap.make_call(term, source);
    heap.pop(1);
    stream::output(heap, lib, applied?, sink)
}
