// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! Church-encoded standard library.
//!
//! All of these are plain term constructors; their semantics arise by
//! evaluation. Booleans select between their two arguments, pairs are
//! `λz.((z first) rest)`, the empty list is `false`, numerals are lazy
//! little-endian bit lists and recursion goes through the Y-combinator.
//!
//! [`Library::new`] builds every combinator once and pins it as a permanent
//! GC root; the wrapper methods then build application terms against the
//! pinned globals.


mod number;
mod sequence;

use tracing::debug;

use crate::cell::CellRef;
use crate::eval::{eval, EvalError};
use crate::heap::{Heap, HeapError, Scope};

/// The pinned combinator globals.
pub struct Library {
    f: CellRef,
    t: CellRef,
    id: CellRef,
    pair: CellRef,
    y: CellRef,
    eq_bool: CellRef,
    even: CellRef,
    odd: CellRef,
    shl: CellRef,
    shr: CellRef,
    add: CellRef,
    sub: CellRef,
    mul: CellRef,
    eq_list: CellRef,
    eq_num: CellRef,
    eq_str: CellRef,
    map: CellRef,
    inject: CellRef,
    foldleft: CellRef,
    concat: CellRef,
    select_if: CellRef,
    member: CellRef,
    lookup: CellRef,
}

/// Combinator construction state while the library is being bootstrapped.
///
/// Wraps a [`Scope`] together with the handful of globals every later
/// definition refers back to. The REPL skeleton reuses it through
/// [`Library::builder`].
pub(crate) struct Build<'h> {
    pub(crate) s: Scope<'h>,
    f: CellRef,
    t: CellRef,
    pair: CellRef,
    y: CellRef,
}

impl Build<'_> {
    /// `((c consequent) alternative)`
    pub(crate) fn op_if(
        &mut self,
        c: CellRef,
        cons: CellRef,
        alt: CellRef,
    ) -> Result<CellRef, HeapError> {
        let picked = self.s.call(c, cons)?;
        self.s.call(picked, alt)
    }

    fn op_not(&mut self, a: CellRef) -> Result<CellRef, HeapError> {
        let (f, t) = (self.f, self.t);
        self.op_if(a, f, t)
    }

    fn op_and(&mut self, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        let f = self.f;
        self.op_if(a, b, f)
    }

    fn op_or(&mut self, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        let t = self.t;
        self.op_if(a, t, b)
    }

    fn op_xor(&mut self, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        let nb = self.op_not(b)?;
        self.op_if(a, nb, b)
    }

    pub(crate) fn pair(&mut self, first: CellRef, rest: CellRef) -> Result<CellRef, HeapError> {
        let p = self.pair;
        self.s.call2(p, first, rest)
    }

    pub(crate) fn first(&mut self, list: CellRef) -> Result<CellRef, HeapError> {
        let t = self.t;
        self.s.call(list, t)
    }

    pub(crate) fn rest(&mut self, list: CellRef) -> Result<CellRef, HeapError> {
        let f = self.f;
        self.s.call(list, f)
    }

    pub(crate) fn empty(&mut self, list: CellRef) -> Result<CellRef, HeapError> {
        let (f, t) = (self.f, self.t);
        let sel = self.s.lambda3(f)?;
        self.s.call2(list, t, sel)
    }

    /// `(Y λ.body)`
    pub(crate) fn recursive(&mut self, body: CellRef) -> Result<CellRef, HeapError> {
        let wrapped = self.s.lambda(body)?;
        let y = self.y;
        self.s.call(y, wrapped)
    }
}

impl Library {
    /// Build and pin every combinator.
    ///
    /// # Errors
    ///
    /// Fails when the arena or root registers are exhausted; the library
    /// needs roughly six hundred cells.
    #[allow(clippy::too_many_lines)]
    pub fn new(heap: &mut Heap) -> Result<Self, HeapError> {
        let mut s = heap.scope();
        let v0 = s.var(0)?;
        let v1 = s.var(1)?;
        let v2 = s.var(2)?;
        let v3 = s.var(3)?;
        let v4 = s.var(4)?;

        // false doubles as the empty list; its environment is itself
        let lam0 = s.lambda(v0)?;
        let f = s.proc_self(lam0)?;
        let lam1 = s.lambda(v1)?;
        let t = s.proc(lam1, f)?;
        let id = s.proc(v0, f)?;

        // pair = λλλ.((z y) x)
        let pair = {
            let picked = s.call(v0, v1)?;
            let body = s.call(picked, v2)?;
            s.lambda3(body)?
        };

        // Y = λ.(λ.1 (0 0)) (λ.1 (0 0))
        let y = {
            let self_app = s.call(v0, v0)?;
            let step = s.call(v1, self_app)?;
            let half = s.lambda(step)?;
            let body = s.call(half, half)?;
            s.lambda(body)?
        };

        let lib = {
            let mut b = Build { s, f, t, pair, y };

            let eq_bool = {
                let nv1 = b.op_not(v1)?;
                let body = b.op_if(v0, v1, nv1)?;
                b.s.lambda2(body)?
            };

            let even = {
                let e = b.empty(v0)?;
                let head = b.first(v0)?;
                let nh = b.op_not(head)?;
                let body = b.op_if(e, t, nh)?;
                b.s.lambda(body)?
            };

            let odd = {
                let e = b.empty(v0)?;
                let head = b.first(v0)?;
                let body = b.op_if(e, f, head)?;
                b.s.lambda(body)?
            };

            let shr = {
                let e = b.empty(v0)?;
                let tail = b.rest(v0)?;
                let body = b.op_if(e, f, tail)?;
                b.s.lambda(body)?
            };

            let shl = {
                let e = b.empty(v0)?;
                let widened = b.pair(f, v0)?;
                let body = b.op_if(e, f, widened)?;
                b.s.lambda(body)?
            };

            // Ripple addition over bit lists with an explicit carry argument:
            // both empty yields [carry]; otherwise combine the parities with
            // the incoming carry and recurse on the shifted operands.
            let add = {
                let e0 = b.empty(v0)?;
                let e1 = b.empty(v1)?;
                let both_empty = b.op_and(e0, e1)?;
                let one = b.pair(t, f)?;
                let base = b.op_if(v2, one, f)?;

                let o1 = b.s.call(odd, v1)?;
                let o2 = b.s.call(odd, v2)?;
                let parity = b.op_xor(o1, o2)?;
                let bit = b.op_xor(parity, v3)?;
                let head = b.pair(bit, v0)?;
                let combine = b.s.lambda(head)?;

                let s1 = b.s.call(shr, v1)?;
                let s0 = b.s.call(shr, v0)?;
                let oa = b.s.call(odd, v0)?;
                let ob = b.s.call(odd, v1)?;
                let either = b.op_or(oa, ob)?;
                let both = b.op_and(oa, ob)?;
                let carry = b.op_if(v2, either, both)?;
                let tail = b.s.call3(v3, s1, s0, carry)?;

                let step = b.s.call(combine, tail)?;
                let body = b.op_if(both_empty, base, step)?;
                let fun = b.s.lambda3(body)?;
                b.recursive(fun)?
            };

            // Subtraction mirrors addition with a borrow instead of a carry.
            let sub = {
                let e0 = b.empty(v0)?;
                let e1 = b.empty(v1)?;
                let both_empty = b.op_and(e0, e1)?;
                let s0 = b.s.call(shr, v0)?;
                let s1 = b.s.call(shr, v1)?;
                let wrapped = b.s.call3(v3, s0, s1, v2)?;
                let ones = b.pair(t, wrapped)?;
                let base = b.op_if(v2, ones, f)?;

                let o1 = b.s.call(odd, v1)?;
                let o2 = b.s.call(odd, v2)?;
                let parity = b.op_xor(o1, o2)?;
                let bit = b.op_xor(parity, v3)?;
                let keep = b.pair(t, v0)?;
                let e0i = b.empty(v0)?;
                let low = b.pair(f, v0)?;
                let trimmed = b.op_if(e0i, f, low)?;
                let head = b.op_if(bit, keep, trimmed)?;
                let combine = b.s.lambda(head)?;

                let s0i = b.s.call(shr, v0)?;
                let s1i = b.s.call(shr, v1)?;
                let ev = b.s.call(even, v0)?;
                let ob = b.s.call(odd, v1)?;
                let either = b.op_or(ev, ob)?;
                let both = b.op_and(ev, ob)?;
                let borrow = b.op_if(v2, either, both)?;
                let tail = b.s.call3(v3, s0i, s1i, borrow)?;

                let step = b.s.call(combine, tail)?;
                let body = b.op_if(both_empty, base, step)?;
                let fun = b.s.lambda3(body)?;
                b.recursive(fun)?
            };

            // Shift-and-add multiplication.
            let mul = {
                let e0 = b.empty(v0)?;

                let summed = b.s.call3(add, v2, v0, f)?;
                let head = b.first(v1)?;
                let body_inner = b.op_if(head, summed, v0)?;
                let combine = b.s.lambda(body_inner)?;

                let s0 = b.s.call(shr, v0)?;
                let partial = b.s.call2(v2, v1, s0)?;
                let doubled = b.s.call(shl, partial)?;
                let step = b.s.call(combine, doubled)?;
                let body = b.op_if(e0, f, step)?;
                let fun = b.s.lambda2(body)?;
                b.recursive(fun)?
            };

            // Structural list equality, parameterized by element equality.
            let eq_list = {
                let e0 = b.empty(v0)?;
                let e1 = b.empty(v1)?;
                let both_empty = b.op_and(e0, e1)?;
                let e0b = b.empty(v0)?;
                let e1b = b.empty(v1)?;
                let one_empty = b.op_or(e0b, e1b)?;
                let h0 = b.first(v0)?;
                let h1 = b.first(v1)?;
                let heads = b.s.call2(v3, h0, h1)?;
                let r0 = b.rest(v0)?;
                let r1 = b.rest(v1)?;
                let rests = b.s.call2(v2, r0, r1)?;
                let tails = b.op_and(heads, rests)?;
                let nonempty = b.op_if(one_empty, f, tails)?;
                let body = b.op_if(both_empty, t, nonempty)?;
                let fun = b.s.lambda2(body)?;
                let rec = b.recursive(fun)?;
                b.s.lambda(rec)?
            };

            let eq_num = b.s.call(eq_list, eq_bool)?;
            let eq_str = b.s.call(eq_list, eq_num)?;

            let map = {
                let e1 = b.empty(v1)?;
                let h1 = b.first(v1)?;
                let mapped = b.s.call(v0, h1)?;
                let r1 = b.rest(v1)?;
                let tail = b.s.call2(v2, v0, r1)?;
                let cons = b.pair(mapped, tail)?;
                let body = b.op_if(e1, f, cons)?;
                let fun = b.s.lambda2(body)?;
                b.recursive(fun)?
            };

            // Fold right
            let inject = {
                let e0 = b.empty(v0)?;
                let r0 = b.rest(v0)?;
                let h0 = b.first(v0)?;
                let folded = b.s.call2(v2, v1, h0)?;
                let step = b.s.call3(v3, r0, folded, v2)?;
                let body = b.op_if(e0, v1, step)?;
                let fun = b.s.lambda3(body)?;
                b.recursive(fun)?
            };

            let foldleft = {
                let e0 = b.empty(v0)?;
                let r0 = b.rest(v0)?;
                let folded = b.s.call3(v3, r0, v1, v2)?;
                let h0 = b.first(v0)?;
                let step = b.s.call2(v2, folded, h0)?;
                let body = b.op_if(e0, v1, step)?;
                let fun = b.s.lambda3(body)?;
                b.recursive(fun)?
            };

            let concat = {
                let cons = b.pair(v1, v0)?;
                let prepend = b.s.lambda2(cons)?;
                let body = b.s.call3(foldleft, v0, v1, prepend)?;
                b.s.lambda2(body)?
            };

            let select_if = {
                let keep = b.s.call(v3, v1)?;
                let cons = b.pair(v1, v0)?;
                let picked = b.op_if(keep, cons, v0)?;
                let sieve = b.s.lambda2(picked)?;
                let body = b.s.call3(foldleft, v0, f, sieve)?;
                b.s.lambda2(body)?
            };

            let member = {
                let e1 = b.empty(v1)?;
                let h1 = b.first(v1)?;
                let hit = b.s.call2(v3, h1, v0)?;
                let r1 = b.rest(v1)?;
                let tail = b.s.call2(v2, v0, r1)?;
                let scan = b.op_if(hit, t, tail)?;
                let body = b.op_if(e1, f, scan)?;
                let fun = b.s.lambda2(body)?;
                let rec = b.recursive(fun)?;
                b.s.lambda(rec)?
            };

            // Association lookup; falls back to the default thunk on a miss.
            let lookup = {
                let e1 = b.empty(v1)?;
                let miss = b.s.call(v4, v0)?;
                let entry = b.first(v1)?;
                let key = b.first(entry)?;
                let hit = b.s.call2(v3, key, v0)?;
                let entry2 = b.first(v1)?;
                let value = b.rest(entry2)?;
                let r1 = b.rest(v1)?;
                let tail = b.s.call2(v2, v0, r1)?;
                let scan = b.op_if(hit, value, tail)?;
                let body = b.op_if(e1, miss, scan)?;
                let fun = b.s.lambda2(body)?;
                let rec = b.recursive(fun)?;
                b.s.lambda2(rec)?
            };

            let lib = Self {
                f,
                t,
                id,
                pair,
                y,
                eq_bool,
                even,
                odd,
                shl,
                shr,
                add,
                sub,
                mul,
                eq_list,
                eq_num,
                eq_str,
                map,
                inject,
                foldleft,
                concat,
                select_if,
                member,
                lookup,
            };

            let Build { mut s, .. } = b;
            for global in [
                lib.f,
                lib.t,
                lib.id,
                lib.pair,
                lib.y,
                lib.eq_bool,
                lib.even,
                lib.odd,
                lib.shl,
                lib.shr,
                lib.add,
                lib.sub,
                lib.mul,
                lib.eq_list,
                lib.eq_num,
                lib.eq_str,
                lib.map,
                lib.inject,
                lib.foldleft,
                lib.concat,
                lib.select_if,
                lib.member,
                lib.lookup,
            ] {
                s.pin(global);
            }
            drop(s);
            lib
        };
        debug!(cells = heap.live_count(), "church library pinned");

        Ok(lib)
    }

    // --- Globals ---

    /// The `false` boolean, which is also the empty list and environment.
    #[must_use]
    pub fn f(&self) -> CellRef {
        self.f
    }

    /// The `true` boolean.
    #[must_use]
    pub fn t(&self) -> CellRef {
        self.t
    }

    /// The identity closure.
    #[must_use]
    pub fn id(&self) -> CellRef {
        self.id
    }

    /// The pair constructor combinator.
    #[must_use]
    pub fn pair_fn(&self) -> CellRef {
        self.pair
    }

    /// The boolean equality combinator.
    #[must_use]
    pub fn eq_bool_fn(&self) -> CellRef {
        self.eq_bool
    }

    /// The numeric equality combinator.
    #[must_use]
    pub fn eq_num_fn(&self) -> CellRef {
        self.eq_num
    }

    /// The string equality combinator.
    #[must_use]
    pub fn eq_str_fn(&self) -> CellRef {
        self.eq_str
    }

    pub(crate) fn concat_fn(&self) -> CellRef {
        self.concat
    }

    pub(crate) fn lookup_fn(&self) -> CellRef {
        self.lookup
    }

    /// Open a term-construction scope seeded with the core globals.
    pub(crate) fn builder<'h>(&self, heap: &'h mut Heap) -> Build<'h> {
        Build {
            s: heap.scope(),
            f: self.f,
            t: self.t,
            pair: self.pair,
            y: self.y,
        }
    }

    // --- Booleans and conditionals ---

    /// `if c then t else e` is `((c t) e)`.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn op_if(
        &self,
        heap: &mut Heap,
        c: CellRef,
        cons: CellRef,
        alt: CellRef,
    ) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(c)?;
        s.adopt(cons)?;
        s.adopt(alt)?;
        let picked = s.call(c, cons)?;
        let r = s.call(picked, alt)?;
        Ok(s.finish(r))
    }

    /// Boolean negation.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn op_not(&self, heap: &mut Heap, a: CellRef) -> Result<CellRef, HeapError> {
        self.op_if(heap, a, self.f, self.t)
    }

    /// Boolean conjunction.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn op_and(&self, heap: &mut Heap, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        self.op_if(heap, a, b, self.f)
    }

    /// Boolean disjunction.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn op_or(&self, heap: &mut Heap, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        self.op_if(heap, a, self.t, b)
    }

    /// Boolean exclusive or.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn op_xor(&self, heap: &mut Heap, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(a)?;
        s.adopt(b)?;
        let nb = s.call(b, self.f)?;
        let nb = s.call(nb, self.t)?;
        let picked = s.call(a, nb)?;
        let r = s.call(picked, b)?;
        Ok(s.finish(r))
    }

    /// Equality of two boolean terms.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn eq_bool(&self, heap: &mut Heap, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(a)?;
        s.adopt(b)?;
        let r = s.call2(self.eq_bool, a, b)?;
        Ok(s.finish(r))
    }

    /// Whether `expr` evaluates to `false`.
    ///
    /// # Errors
    ///
    /// Fails when evaluation fails.
    pub fn is_false(&self, heap: &mut Heap, expr: CellRef) -> Result<bool, EvalError> {
        let probe = self.op_if(heap, expr, self.t, self.f)?;
        Ok(eval(heap, self, probe)? == self.f)
    }

    /// Whether `expr` evaluates to `true`.
    ///
    /// # Errors
    ///
    /// Fails when evaluation fails.
    pub fn is_true(&self, heap: &mut Heap, expr: CellRef) -> Result<bool, EvalError> {
        Ok(!self.is_false(heap, expr)?)
    }

    /// Whether `cell` is the `false` global itself, without evaluating.
    #[must_use]
    pub fn is_false_raw(&self, cell: CellRef) -> bool {
        cell == self.f
    }

    // --- Pairs and lists ---

    /// Build the pair `(first, rest)`.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn pair(
        &self,
        heap: &mut Heap,
        first: CellRef,
        rest: CellRef,
    ) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(first)?;
        s.adopt(rest)?;
        let r = s.call2(self.pair, first, rest)?;
        Ok(s.finish(r))
    }

    /// Head projection `(list true)`.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn first(&self, heap: &mut Heap, list: CellRef) -> Result<CellRef, HeapError> {
        heap.make_call(list, self.t)
    }

    /// Tail projection `(list false)`.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn rest(&self, heap: &mut Heap, list: CellRef) -> Result<CellRef, HeapError> {
        heap.make_call(list, self.f)
    }

    /// Emptiness test `((list λλλ.false) true)`.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn empty(&self, heap: &mut Heap, list: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(list)?;
        let sel = s.lambda3(self.f)?;
        let r = s.call2(list, self.t, sel)?;
        Ok(s.finish(r))
    }

    /// Element projection via `i` tails and one head.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn at(&self, heap: &mut Heap, list: CellRef, i: usize) -> Result<CellRef, HeapError> {
        let mut cur = list;
        for _ in 0..i {
            cur = self.rest(heap, cur)?;
        }
        self.first(heap, cur)
    }

    /// Rebuild `list` with element `i` replaced by `value`.
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn replace(
        &self,
        heap: &mut Heap,
        list: CellRef,
        i: usize,
        value: CellRef,
    ) -> Result<CellRef, HeapError> {
        heap.push(list)?;
        heap.push(value)?;
        let result = if i > 0 {
            let tail = self.rest(heap, list)?;
            let deeper = self.replace(heap, tail, i - 1, value)?;
            heap.push(deeper)?;
            let head = self.first(heap, list)?;
            let r = self.pair(heap, head, deeper);
            heap.pop(1);
            r
        } else {
            let tail = self.rest(heap, list)?;
            self.pair(heap, value, tail)
        };
        heap.pop(2);
        result
    }

    /// Structural head of an already-built pair term.
    #[must_use]
    pub fn first_raw(&self, heap: &Heap, list: CellRef) -> CellRef {
        heap.arg(list)
    }

    /// Structural tail of an already-built pair term.
    #[must_use]
    pub fn rest_raw(&self, heap: &Heap, list: CellRef) -> CellRef {
        heap.arg(heap.fun(list))
    }

    /// Structural element projection; `None` past the end of the list.
    #[must_use]
    pub fn at_raw(&self, heap: &Heap, list: CellRef, i: usize) -> Option<CellRef> {
        let mut cur = list;
        for _ in 0..i {
            if self.is_false_raw(cur) {
                return None;
            }
            cur = self.rest_raw(heap, cur);
        }
        if self.is_false_raw(cur) {
            return None;
        }
        Some(self.first_raw(heap, cur))
    }

    /// `[a]`
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn list1(&self, heap: &mut Heap, a: CellRef) -> Result<CellRef, HeapError> {
        self.pair(heap, a, self.f)
    }

    /// `[a, b]`
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn list2(&self, heap: &mut Heap, a: CellRef, b: CellRef) -> Result<CellRef, HeapError> {
        heap.push(a)?;
        let tail = self.list1(heap, b)?;
        let r = self.pair(heap, a, tail);
        heap.pop(1);
        r
    }

    /// `[a, b, c]`
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn list3(
        &self,
        heap: &mut Heap,
        a: CellRef,
        b: CellRef,
        c: CellRef,
    ) -> Result<CellRef, HeapError> {
        heap.push(a)?;
        let tail = self.list2(heap, b, c)?;
        let r = self.pair(heap, a, tail);
        heap.pop(1);
        r
    }

    /// `[a, b, c, d]`
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn list4(
        &self,
        heap: &mut Heap,
        a: CellRef,
        b: CellRef,
        c: CellRef,
        d: CellRef,
    ) -> Result<CellRef, HeapError> {
        heap.push(a)?;
        let tail = self.list3(heap, b, c, d)?;
        let r = self.pair(heap, a, tail);
        heap.pop(1);
        r
    }

    // --- Recursion ---

    /// `(Y λ.body)`
    ///
    /// # Errors
    ///
    /// Fails when the arena is exhausted.
    pub fn recursive(&self, heap: &mut Heap, body: CellRef) -> Result<CellRef, HeapError> {
        let mut s = heap.scope();
        s.adopt(body)?;
        let wrapped = s.lambda(body)?;
        let r = s.call(self.y, wrapped)?;
        Ok(s.finish(r))
    }
}
