// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! Tests for the arena, root discipline and collector.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::{Heap, HeapError};
use crate::cell::Cell;

#[test]
fn arena_new() {
    let heap = Heap::new(256);
    assert_eq!(heap.capacity(), 256);
    assert_eq!(heap.root_depth(), 0);
}

#[test]
fn make_var_holds_index() {
    let mut heap = Heap::new(256);
    let v = heap.make_var(7).unwrap();
    assert!(heap.cell(v).is_var());
    assert_eq!(heap.idx(v), 7);
}

#[test]
fn make_lambda_holds_body() {
    let mut heap = Heap::new(256);
    let v = heap.make_var(0).unwrap();
    let l = heap.make_lambda(v).unwrap();
    assert!(heap.cell(l).is_lambda());
    assert_eq!(heap.body(l), v);
}

#[test]
fn make_call_holds_children() {
    let mut heap = Heap::new(256);
    let f = heap.make_var(1).unwrap();
    let a = heap.make_var(2).unwrap();
    let c = heap.make_call(f, a).unwrap();
    assert!(heap.cell(c).is_call());
    assert_eq!(heap.fun(c), f);
    assert_eq!(heap.arg(c), a);
}

#[test]
fn proc_self_environment_is_itself() {
    let mut heap = Heap::new(256);
    let v = heap.make_var(0).unwrap();
    let l = heap.make_lambda(v).unwrap();
    let f = heap.make_proc_self(l).unwrap();
    assert!(heap.cell(f).is_proc());
    assert_eq!(heap.block(f), l);
    assert_eq!(heap.stack(f), f);
}

#[test]
fn wrap_cache_starts_empty_and_is_written_once() {
    let mut heap = Heap::new(256);
    let v = heap.make_var(0).unwrap();
    let e = heap.make_var(1).unwrap();
    let w = heap.make_wrap(v, e).unwrap();
    assert!(heap.cell(w).is_wrap());
    assert_eq!(heap.wrap_cache(w), None);
    heap.store(w, e);
    assert_eq!(heap.wrap_cache(w), Some(e));
}

#[test]
fn memoize_and_cont_shapes() {
    let mut heap = Heap::new(256);
    let v = heap.make_var(0).unwrap();
    let e = heap.make_var(1).unwrap();
    let w = heap.make_wrap(v, e).unwrap();
    let m = heap.make_memoize(v, w).unwrap();
    match heap.cell(m) {
        Cell::Memoize { value, target } => {
            assert_eq!(*value, v);
            assert_eq!(*target, w);
        }
        other => panic!("expected memoize, got {other:?}"),
    }
    let k = heap.make_cont(v).unwrap();
    assert_eq!(heap.k(k), v);
}

#[test]
fn collect_reclaims_unrooted_cells() {
    let mut heap = Heap::new(256);
    let keep = heap.make_var(0).unwrap();
    heap.push(keep).unwrap();
    for i in 0..10 {
        heap.make_var(i).unwrap();
    }
    assert_eq!(heap.live_count(), 1);
    heap.pop(1);
    assert_eq!(heap.live_count(), 0);
}

#[test]
fn collect_traces_children() {
    let mut heap = Heap::new(256);
    let v = heap.make_var(0).unwrap();
    let l = heap.make_lambda(v).unwrap();
    let c = heap.make_call(l, l).unwrap();
    heap.push(c).unwrap();
    assert_eq!(heap.live_count(), 3);
}

#[test]
fn collect_traces_wrap_cache() {
    let mut heap = Heap::new(256);
    let v = heap.make_var(0).unwrap();
    let e = heap.make_var(1).unwrap();
    let w = heap.make_wrap(v, e).unwrap();
    heap.push(w).unwrap();
    let cached = heap.make_var(2).unwrap();
    heap.store(w, cached);
    assert_eq!(heap.live_count(), 4);
}

#[test]
fn pinned_cells_survive_without_roots() {
    let mut heap = Heap::new(256);
    let v = heap.make_var(0).unwrap();
    heap.pin(v);
    assert_eq!(heap.live_count(), 1);
}

#[test]
fn allocation_reuses_swept_slots() {
    let mut heap = Heap::new(4);
    for _ in 0..16 {
        heap.make_var(0).unwrap();
    }
}

#[test]
fn out_of_memory_is_deterministic() {
    let mut heap = Heap::new(4);
    let mut held = Vec::new();
    for i in 0..4 {
        let v = heap.make_var(i).unwrap();
        held.push(heap.push(v).unwrap());
    }
    assert_eq!(
        heap.make_var(99),
        Err(HeapError::OutOfMemory { capacity: 4 })
    );
    // Still deterministic on retry
    assert_eq!(
        heap.make_var(99),
        Err(HeapError::OutOfMemory { capacity: 4 })
    );
}

#[test]
fn root_register_overflow() {
    let mut heap = Heap::with_limits(16, 2);
    let v = heap.make_var(0).unwrap();
    heap.push(v).unwrap();
    heap.push(v).unwrap();
    assert_eq!(heap.push(v), Err(HeapError::TooManyRoots { limit: 2 }));
}

#[test]
fn constructors_root_children_under_stress() {
    let mut heap = Heap::new(64);
    heap.set_stress(true);
    let v = heap.make_var(0).unwrap();
    heap.push(v).unwrap();
    let l = heap.make_lambda(v).unwrap();
    heap.set_root(0, l);
    let c = heap.make_call(l, l).unwrap();
    heap.set_root(0, c);
    // Everything reachable from the root survived every forced collection
    assert_eq!(heap.idx(heap.body(heap.fun(c))), 0);
}

#[test]
fn scope_roots_intermediates_under_stress() {
    let mut heap = Heap::new(64);
    heap.set_stress(true);
    let term = {
        let mut s = heap.scope();
        let v0 = s.var(0).unwrap();
        let v1 = s.var(1).unwrap();
        let inner = s.call(v0, v1).unwrap();
        let body = s.lambda(inner).unwrap();
        s.finish(body)
    };
    heap.push(term).unwrap();
    assert_eq!(heap.live_count(), 4);
}

#[test]
fn scope_drop_releases_roots() {
    let mut heap = Heap::new(64);
    {
        let mut s = heap.scope();
        s.var(0).unwrap();
        s.var(1).unwrap();
    }
    assert_eq!(heap.root_depth(), 0);
    assert_eq!(heap.live_count(), 0);
}

#[test]
fn structural_eq_compares_graphs() {
    let mut heap = Heap::new(256);
    let a = {
        let v = heap.make_var(0).unwrap();
        heap.make_lambda(v).unwrap()
    };
    let b = {
        let v = heap.make_var(0).unwrap();
        heap.make_lambda(v).unwrap()
    };
    let c = {
        let v = heap.make_var(1).unwrap();
        heap.make_lambda(v).unwrap()
    };
    assert!(heap.structural_eq(a, a));
    assert!(heap.structural_eq(a, b));
    assert!(!heap.structural_eq(a, c));
}

#[test]
fn structural_eq_handles_self_cycles() {
    let mut heap = Heap::new(256);
    let a = {
        let v = heap.make_var(0).unwrap();
        let l = heap.make_lambda(v).unwrap();
        heap.make_proc_self(l).unwrap()
    };
    let b = {
        let v = heap.make_var(0).unwrap();
        let l = heap.make_lambda(v).unwrap();
        heap.make_proc_self(l).unwrap()
    };
    assert!(heap.structural_eq(a, b));
}

#[test]
fn structural_eq_on_streams() {
    let mut heap = Heap::new(256);
    let a = heap.from_str("abc").unwrap();
    let b = heap.from_str("abc").unwrap();
    let c = heap.from_str("abd").unwrap();
    assert!(heap.structural_eq(a, b));
    assert!(!heap.structural_eq(a, c));
    let i = heap.make_int(5).unwrap();
    let j = heap.make_int(5).unwrap();
    let k = heap.make_int(6).unwrap();
    assert!(heap.structural_eq(i, j));
    assert!(!heap.structural_eq(i, k));
    assert!(!heap.structural_eq(a, i));
}
