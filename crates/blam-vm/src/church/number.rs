// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! Arithmetic over little-endian bit-list numerals.
//!
//! Numbers are lists of booleans with the least significant bit first; the
//! lazy `Int` producer (see the stream module) yields the same shape on
//! demand. All operators are applications of the recursive combinators
//! built by [`Library::new`](super::Library::new).

use crate::cell::CellRef;
use crate::heap::{Heap, HeapError};

use super::Library;

impl Library {
    /// Whether the lowest bit is clear.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn even(&self, heap: &mut Heap, number: CellRef) -> Result<CellRef, HeapError> {
        heap.make_call(self.even, number)
    }

    /// Whether the lowest bit is set.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn odd(&self, heap: &mut Heap, number: CellRef) -> Result<CellRef, HeapError> {
        heap.make_call(self.odd, number)
    }

    /// Prepend a zero bit (double).
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn shl(&self, heap: &mut Heap, number: CellRef) -> Result<CellRef, HeapError> {
        heap.make_call(self.shl, number)
    }

    /// Drop the lowest bit (halve).
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn shr(&self, heap: &mut Heap, number: CellRef) -> Result<CellRef, HeapError> {
        heap.make_call(self.shr, number)
    }

    /// Addition; the third argument of the combinator is the initial carry.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn add(&self, heap: &mut Heap, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(a)?;
        s.adopt(b)?;
        let r = s.call3(self.add, a, b, self.f())?;
        Ok(s.finish(r))
    }

    /// Subtraction for `a >= b`; the third argument is the initial borrow.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn sub(&self, heap: &mut Heap, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(a)?;
        s.adopt(b)?;
        let r = s.call3(self.sub, a, b, self.f())?;
        Ok(s.finish(r))
    }

    /// Multiplication.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn mul(&self, heap: &mut Heap, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(a)?;
        s.adopt(b)?;
        let r = s.call2(self.mul, a, b)?;
        Ok(s.finish(r))
    }

    /// Numeric equality (list equality over bit lists).
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn eq_num(&self, heap: &mut Heap, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(a)?;
        s.adopt(b)?;
        let r = s.call2(self.eq_num, a, b)?;
        Ok(s.finish(r))
    }
}
