// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! Trampolined CPS evaluator.
//!
//! Reduction to weak head normal form runs as a loop over three machine
//! registers: the expression under reduction, the current environment (an
//! encoded pair list of `Wrap` thunks) and the continuation `cc` (a `Cont`
//! chain of call and memoize obligations living on the heap). The host
//! stack never grows with the depth of the reduction.
//!
//! Ordering is left-outermost and call-by-need: an argument is wrapped
//! unevaluated and only forced when a variable lookup demands it; the
//! forced result is written into the thunk's cache and shared by every
//! later reference.
//!
//! The three machine registers are kept in root register slots, so the
//! collector always sees the live machine state.

#[cfg(test)]
mod eval_test;

use std::io;

use thiserror::Error;

use crate::cell::{Cell, CellRef};
use crate::church::Library;
use crate::heap::{Heap, HeapError};
use crate::stream;

/// Evaluation failure.
#[derive(Debug, Error)]
pub enum EvalError {
    /// Cell allocation failed.
    #[error(transparent)]
    Heap(#[from] HeapError),
    /// A lazy input stream failed to read.
    #[error("stream read error: {0}")]
    Io(#[from] io::Error),
}

/// Reduce `expr` to weak head normal form in the empty environment.
///
/// # Errors
///
/// Fails when the arena is exhausted or an input stream fails.
pub fn eval(heap: &mut Heap, lib: &Library, expr: CellRef) -> Result<CellRef, EvalError> {
    eval_in(heap, lib, expr, lib.f())
}

/// Reduce `expr` to weak head normal form in an environment.
///
/// The environment is an encoded pair list of `Wrap` cells; position `k`
/// holds the value of De Bruijn index `k`. A variable beyond the end of the
/// environment re-emits as a free `Var` lowered by the environment length.
///
/// # Errors
///
/// Fails when the arena is exhausted or an input stream fails.
pub fn eval_in(
    heap: &mut Heap,
    lib: &Library,
    expr: CellRef,
    env: CellRef,
) -> Result<CellRef, EvalError> {
    let base = heap.root_depth();
    let result = machine(heap, lib, base, expr, env);
    heap.truncate_roots(base);
    result
}

fn machine(
    heap: &mut Heap,
    lib: &Library,
    base: usize,
    mut cell: CellRef,
    mut env: CellRef,
) -> Result<CellRef, EvalError> {
    let (slot_cell, slot_env, slot_cc) = (base, base + 1, base + 2);
    heap.push(cell)?;
    heap.push(env)?;
    let v0 = heap.make_var(0)?;
    let mut cc = heap.make_cont(v0)?;
    heap.push(cc)?;

    'machine: loop {
        // Reduce until a value arrives.
        let value = match heap.cell(cell).clone() {
            Cell::Var { idx } => match env_lookup(heap, env, idx) {
                Ok(found) => {
                    cell = found;
                    heap.set_root(slot_cell, cell);
                    continue 'machine;
                }
                Err(len) => {
                    // Free variable: lift past the environment and yield
                    // it as a value.
                    let free = heap.make_var(idx - len)?;
                    cell = free;
                    heap.set_root(slot_cell, cell);
                    free
                }
            },
            Cell::Lambda { body } => {
                let closure = heap.make_proc(body, env)?;
                cell = closure;
                heap.set_root(slot_cell, cell);
                closure
            }
            Cell::Call { fun, arg } => {
                // Suspend the argument and push an apply obligation.
                let wrapped = heap.make_wrap(arg, env)?;
                heap.push(wrapped)?;
                let v0 = heap.make_var(0)?;
                let apply = heap.make_call(v0, wrapped)?;
                heap.pop(1);
                let frame = heap.make_call(cc, apply)?;
                cc = heap.make_cont(frame)?;
                cell = fun;
                heap.set_root(slot_cell, cell);
                heap.set_root(slot_cc, cc);
                continue 'machine;
            }
            Cell::Wrap {
                unwrap,
                context,
                cache,
            } => {
                env = context;
                heap.set_root(slot_env, env);
                match cache {
                    Some(memoized) => {
                        cell = memoized;
                        heap.set_root(slot_cell, cell);
                        continue 'machine;
                    }
                    None => {
                        let v0 = heap.make_var(0)?;
                        let memo = heap.make_memoize(v0, cell)?;
                        let frame = heap.make_call(cc, memo)?;
                        cc = heap.make_cont(frame)?;
                        cell = unwrap;
                        heap.set_root(slot_cell, cell);
                        heap.set_root(slot_cc, cc);
                        continue 'machine;
                    }
                }
            }
            Cell::Proc { .. } | Cell::Cont { .. } => cell,
            Cell::Input { .. } | Cell::Str { .. } | Cell::Int { .. } => {
                if heap.cell(heap.k(cc)).is_var() {
                    // Value position: the stream itself is the result.
                    cell
                } else {
                    // Consumer position: yield the head pair and keep going.
                    cell = stream::force(heap, lib, cell)?;
                    heap.set_root(slot_cell, cell);
                    continue 'machine;
                }
            }
            Cell::Memoize { .. } => {
                unreachable!("memoize marker reduced as an expression")
            }
        };

        // Deliver the value to the continuation.
        loop {
            let obligations = heap.k(cc);
            match heap.cell(obligations).clone() {
                Cell::Var { idx } => {
                    debug_assert_eq!(idx, 0, "terminal continuation is Var(0)");
                    return Ok(value);
                }
                Cell::Call {
                    fun: next,
                    arg: frame,
                } => match heap.cell(frame).clone() {
                    Cell::Memoize { target, .. } => {
                        heap.store(target, value);
                        cc = next;
                        heap.set_root(slot_cc, cc);
                    }
                    Cell::Call { arg: wrapped, .. } => match heap.cell(value).clone() {
                        Cell::Proc { block, stack } => {
                            let chain = heap.make_call(lib.pair_fn(), stack)?;
                            env = heap.make_call(chain, wrapped)?;
                            cell = block;
                            cc = next;
                            heap.set_root(slot_cell, cell);
                            heap.set_root(slot_env, env);
                            heap.set_root(slot_cc, cc);
                            continue 'machine;
                        }
                        Cell::Cont { .. } => {
                            // Applying a captured continuation: it becomes
                            // the continuation, the argument the expression.
                            cell = wrapped;
                            cc = value;
                            heap.set_root(slot_cell, cell);
                            heap.set_root(slot_cc, cc);
                            continue 'machine;
                        }
                        _ => {
                            // Not applicable (a free variable): keep the
                            // value and drop the pending argument.
                            cc = next;
                            heap.set_root(slot_cc, cc);
                        }
                    },
                    other => unreachable!("continuation frame holds {}", other.type_name()),
                },
                other => unreachable!("continuation list holds {}", other.type_name()),
            }
        }
    }
}

/// Walk an encoded environment. `Ok` is the entry at position `idx`;
/// `Err` carries the environment length when `idx` is past the end.
fn env_lookup(heap: &Heap, mut env: CellRef, idx: u32) -> Result<CellRef, u32> {
    let mut remaining = idx;
    let mut len = 0;
    loop {
        match heap.cell(env) {
            Cell::Call { fun, arg } if heap.cell(*fun).is_call() => {
                if remaining == 0 {
                    return Ok(*arg);
                }
                remaining -= 1;
                len += 1;
                env = heap.arg(*fun);
            }
            _ => return Err(len),
        }
    }
}
