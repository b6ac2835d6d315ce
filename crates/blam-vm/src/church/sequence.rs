// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! Higher-order list combinators and association lookup.

use crate::cell::CellRef;
use crate::heap::{Heap, HeapError};

use super::Library;

impl Library {
    /// Apply `fun` to every element.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn map(&self, heap: &mut Heap, list: CellRef, fun: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(list)?;
        s.adopt(fun)?;
        let r = s.call2(self.map, fun, list)?;
        Ok(s.finish(r))
    }

    /// Fold right: `inject([x, ...], start, fn)` folds from the tail in.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn inject(
        &self,
        heap: &mut Heap,
        list: CellRef,
        start: CellRef,
        fun: CellRef,
    ) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(list)?;
        s.adopt(start)?;
        s.adopt(fun)?;
        let r = s.call3(self.inject, list, start, fun)?;
        Ok(s.finish(r))
    }

    /// Fold left.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn foldleft(
        &self,
        heap: &mut Heap,
        list: CellRef,
        start: CellRef,
        fun: CellRef,
    ) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(list)?;
        s.adopt(start)?;
        s.adopt(fun)?;
        let r = s.call3(self.foldleft, list, start, fun)?;
        Ok(s.finish(r))
    }

    /// List concatenation.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn concat(&self, heap: &mut Heap, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(a)?;
        s.adopt(b)?;
        let r = s.call2(self.concat, a, b)?;
        Ok(s.finish(r))
    }

    /// Keep the elements for which `fun` holds, preserving order.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn select_if(
        &self,
        heap: &mut Heap,
        list: CellRef,
        fun: CellRef,
    ) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(list)?;
        s.adopt(fun)?;
        let r = s.call2(self.select_if, list, fun)?;
        Ok(s.finish(r))
    }

    /// Membership test parameterized by element equality.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn member(
        &self,
        heap: &mut Heap,
        list: CellRef,
        eq_elem: CellRef,
    ) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(list)?;
        s.adopt(eq_elem)?;
        let r = s.call2(self.member, list, eq_elem)?;
        Ok(s.finish(r))
    }

    /// Membership over a boolean list.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn member_bool(&self, heap: &mut Heap, list: CellRef) -> Result<CellRef, HeapError> {
        self.member(heap, list, self.eq_bool)
    }

    /// Membership over a number list.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn member_num(&self, heap: &mut Heap, list: CellRef) -> Result<CellRef, HeapError> {
        self.member(heap, list, self.eq_num)
    }

    /// Membership over a string list.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn member_str(&self, heap: &mut Heap, list: CellRef) -> Result<CellRef, HeapError> {
        self.member(heap, list, self.eq_str)
    }

    /// Association-list lookup with a default thunk for misses.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn lookup(
        &self,
        heap: &mut Heap,
        alist: CellRef,
        eq_elem: CellRef,
        other: CellRef,
    ) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(alist)?;
        s.adopt(eq_elem)?;
        s.adopt(other)?;
        let r = s.call3(self.lookup, alist, eq_elem, other)?;
        Ok(s.finish(r))
    }

    /// Lookup keyed by booleans.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn lookup_bool(
        &self,
        heap: &mut Heap,
        alist: CellRef,
        other: CellRef,
    ) -> Result<CellRef, HeapError> {
        self.lookup(heap, alist, self.eq_bool, other)
    }

    /// Lookup keyed by numbers.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn lookup_num(
        &self,
        heap: &mut Heap,
        alist: CellRef,
        other: CellRef,
    ) -> Result<CellRef, HeapError> {
        self.lookup(heap, alist, self.eq_num, other)
    }

    /// Lookup keyed by strings.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn lookup_str(
        &self,
        heap: &mut Heap,
        alist: CellRef,
        other: CellRef,
    ) -> Result<CellRef, HeapError> {
        self.lookup(heap, alist, self.eq_str, other)
    }

    /// The keys of an association list.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn keys(&self, heap: &mut Heap, alist: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(alist)?;
        let v0 = s.var(0)?;
        let head = s.call(v0, self.t())?;
        let project = s.lambda(head)?;
        let r = s.call2(self.map, project, alist)?;
        Ok(s.finish(r))
    }

    /// List equality parameterized by element equality.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn eq_list(&self, heap: &mut Heap, eq_elem: CellRef) -> Result<CellRef, HeapError> {
        heap.make_call(self.eq_list, eq_elem)
    }

    /// String equality (list equality over numerals).
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn eq_str(&self, heap: &mut Heap, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(a)?;
        s.adopt(b)?;
        let r = s.call2(self.eq_str, a, b)?;
        Ok(s.finish(r))
    }
}
