// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! # Blam VM
//!
//! A lazy virtual machine for the binary lambda calculus (BLC).
//!
//! Programs are bitstrings encoding De Bruijn-indexed lambda terms. The
//! runtime graph is a fixed-capacity arena of tagged cells kept alive by a
//! mark-and-sweep collector with an explicit root register stack. This crate
//! provides:
//! - The cell arena, root discipline and collector
//! - The BLC bitstream reader and printer
//! - A trampolined, call-by-need CPS evaluator with thunk memoization
//! - A Church-encoded standard library (booleans, pairs, lists, binary
//!   numerals, Y-combinator, folds, equality, association lists)
//! - Lazy byte streams over files, strings and integers
//! - The character-level REPL skeleton expressed as a BLC term
//!
//! The surface-syntax compiler that turns human-readable lambda notation
//! into bitstrings is a separate tool; the VM only consumes bitstrings.

pub mod cell;
pub mod church;
pub mod codec;
pub mod eval;
pub mod heap;
pub mod repl;
pub mod stream;

// Re-export commonly used types at crate root
pub use cell::{Cell, CellRef};
pub use church::Library;
pub use eval::{eval, eval_in, EvalError};
pub use heap::{Heap, HeapError};
