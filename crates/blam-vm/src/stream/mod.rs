// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! Lazy byte streams and list projections.
//!
//! `Input`, `Str` and `Int` cells are on-demand producers: forcing one
//! yields either `false` (end of data) or the pair of a head element and a
//! successor stream. File-backed streams memoize their head pair in the
//! cell's `used` slot, so forcing position `k` of a stream always reads the
//! same byte no matter how often it is forced.
//!
//! The projections `to_int`, `to_str` and `output` drive evaluation from
//! the outside: they build `first`/`rest`/`empty` application terms and
//! re-enter the evaluator until the list is exhausted.


use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Read, Write};
use std::rc::Rc;

use thiserror::Error;

use crate::cell::{Cell, CellRef};
use crate::church::Library;
use crate::eval::{eval, EvalError};
use crate::heap::{Heap, HeapError};

/// Default projection buffer size in bytes.
pub const BUFSIZE: usize = 1024;

/// Failure while projecting a list to host data.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Evaluation of the list failed.
    #[error(transparent)]
    Eval(#[from] EvalError),
    /// The projected list does not fit the buffer.
    #[error("buffer of {size} bytes too small")]
    BufferTooSmall { size: usize },
    /// The output sink failed.
    #[error("write error: {0}")]
    Io(#[from] io::Error),
}

impl From<HeapError> for StreamError {
    fn from(e: HeapError) -> Self {
        Self::Eval(EvalError::Heap(e))
    }
}

/// Build an `Input` stream over an open file.
///
/// # Errors
///
/// Fails when the arena is exhausted.
pub fn from_file(heap: &mut Heap, file: File) -> Result<CellRef, HeapError> {
    heap.make_input(Rc::new(RefCell::new(file)))
}

/// Build an `Input` stream over any reader.
///
/// # Errors
///
/// Fails when the arena is exhausted.
pub fn from_reader<R: Read + 'static>(heap: &mut Heap, reader: R) -> Result<CellRef, HeapError> {
    heap.make_input(Rc::new(RefCell::new(reader)))
}

/// Force a stream cell to its head: `false` at end of data, otherwise the
/// pair of the head element and the successor stream.
///
/// The cell must be rooted by the caller; forcing allocates.
///
/// # Errors
///
/// Fails when the arena is exhausted or the underlying reader fails.
pub(crate) fn force(heap: &mut Heap, lib: &Library, cell: CellRef) -> Result<CellRef, EvalError> {
    match heap.cell(cell).clone() {
        Cell::Input { source, used } => {
            if let Some(head) = used {
                return Ok(head);
            }
            let mut byte = [0u8; 1];
            let n = source.borrow_mut().read(&mut byte)?;
            let head = if n == 0 {
                lib.f()
            } else {
                let value = heap.make_int(u32::from(byte[0]))?;
                heap.push(value)?;
                let next = heap.make_input(source.clone())?;
                let chain = heap.make_call(lib.pair_fn(), next)?;
                let head = heap.make_call(chain, value)?;
                heap.pop(1);
                head
            };
            heap.set_input_used(cell, head);
            Ok(head)
        }
        Cell::Str { bytes, pos } => {
            if pos >= bytes.len() {
                return Ok(lib.f());
            }
            let value = heap.make_int(u32::from(bytes[pos]))?;
            heap.push(value)?;
            let next = heap.make_str_at(bytes, pos + 1)?;
            let chain = heap.make_call(lib.pair_fn(), next)?;
            let head = heap.make_call(chain, value)?;
            heap.pop(1);
            Ok(head)
        }
        Cell::Int { value } => {
            if value == 0 {
                return Ok(lib.f());
            }
            let bit = if value & 1 == 1 { lib.t() } else { lib.f() };
            let next = heap.make_int(value >> 1)?;
            let chain = heap.make_call(lib.pair_fn(), next)?;
            Ok(heap.make_call(chain, bit)?)
        }
        other => unreachable!("force on {} cell", other.type_name()),
    }
}

/// Read a numeral list back into a host integer.
///
/// # Errors
///
/// Fails when evaluation fails.
pub fn to_int(heap: &mut Heap, lib: &Library, number: CellRef) -> Result<u32, EvalError> {
    let base = heap.root_depth();
    let result = to_int_rooted(heap, lib, number);
    heap.truncate_roots(base);
    result
}

fn to_int_rooted(heap: &mut Heap, lib: &Library, number: CellRef) -> Result<u32, EvalError> {
    let slot = heap.root_depth();
    heap.push(number)?;
    let mut list = number;
    let mut result: u32 = 0;
    let mut shift = 0;
    loop {
        let head = eval(heap, lib, list)?;
        heap.set_root(slot, head);
        let probe = lib.empty(heap, head)?;
        if !lib.is_false(heap, probe)? {
            return Ok(result);
        }
        let bit = lib.first(heap, head)?;
        if !lib.is_false(heap, bit)? && shift < u32::BITS {
            result |= 1 << shift;
        }
        list = lib.rest(heap, head)?;
        heap.set_root(slot, list);
        shift += 1;
    }
}

/// Project a byte list into a bounded buffer.
///
/// The buffer needs one spare byte beyond the content and one for the
/// terminator, so a list of `n` bytes needs `size >= n + 2`.
///
/// # Errors
///
/// Fails when the list does not fit or evaluation fails.
pub fn to_buffer(
    heap: &mut Heap,
    lib: &Library,
    list: CellRef,
    size: usize,
) -> Result<Vec<u8>, StreamError> {
    let base = heap.root_depth();
    let result = to_buffer_rooted(heap, lib, list, size);
    heap.truncate_roots(base);
    result
}

fn to_buffer_rooted(
    heap: &mut Heap,
    lib: &Library,
    list: CellRef,
    size: usize,
) -> Result<Vec<u8>, StreamError> {
    let slot = heap.root_depth();
    heap.push(list)?;
    let mut list = list;
    let mut out = Vec::new();
    loop {
        if size - out.len() <= 1 {
            return Err(StreamError::BufferTooSmall { size });
        }
        let head = eval(heap, lib, list)?;
        heap.set_root(slot, head);
        let probe = lib.empty(heap, head)?;
        if !lib.is_false(heap, probe)? {
            return Ok(out);
        }
        let first = lib.first(heap, head)?;
        let byte = to_int(heap, lib, first)?;
        out.push(byte as u8);
        list = lib.rest(heap, head)?;
        heap.set_root(slot, list);
    }
}

/// Project a byte list into a string using the default buffer size.
///
/// # Errors
///
/// Fails when the list does not fit or evaluation fails.
pub fn to_str(heap: &mut Heap, lib: &Library, list: CellRef) -> Result<String, StreamError> {
    let bytes = to_buffer(heap, lib, list, BUFSIZE)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Evaluate a byte list and write it to a sink, one byte at a time.
///
/// # Errors
///
/// Fails when evaluation or the sink fails.
pub fn output<W: Write>(
    heap: &mut Heap,
    lib: &Library,
    expr: CellRef,
    sink: &mut W,
) -> Result<(), StreamError> {
    let base = heap.root_depth();
    let result = output_rooted(heap, lib, expr, sink);
    heap.truncate_roots(base);
    result
}

fn output_rooted<W: Write>(
    heap: &mut Heap,
    lib: &Library,
    expr: CellRef,
    sink: &mut W,
) -> Result<(), StreamError> {
    let slot = heap.root_depth();
    heap.push(expr)?;
    let mut list = eval(heap, lib, expr)?;
    heap.set_root(slot, list);
    loop {
        let probe = lib.empty(heap, list)?;
        if !lib.is_false(heap, probe)? {
            return Ok(());
        }
        let first = lib.first(heap, list)?;
        let byte = to_int(heap, lib, first)?;
        sink.write_all(&[byte as u8])?;
        let rest = lib.rest(heap, list)?;
        list = eval(heap, lib, rest)?;
        heap.set_root(slot, list);
    }
}
