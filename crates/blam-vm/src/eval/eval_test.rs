// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! Tests for the trampolined evaluator.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::{eval, eval_in};
use crate::cell::{Cell, CellRef};
use crate::church::Library;
use crate::heap::Heap;

fn setup() -> (Heap, Library) {
    let mut heap = Heap::new(65_536);
    let lib = Library::new(&mut heap).unwrap();
    (heap, lib)
}

/// `(λx.(x x)) (λx.(x x))` - reduction never reaches a value.
fn omega(heap: &mut Heap) -> CellRef {
    let mut s = heap.scope();
    let v0 = s.var(0).unwrap();
    let app = s.call(v0, v0).unwrap();
    let half = s.lambda(app).unwrap();
    let r = s.call(half, half).unwrap();
    s.finish(r)
}

#[test]
fn booleans_evaluate_to_themselves() {
    let (mut heap, lib) = setup();
    assert_eq!(eval(&mut heap, &lib, lib.f()).unwrap(), lib.f());
    assert_eq!(eval(&mut heap, &lib, lib.t()).unwrap(), lib.t());
    assert!(lib.is_false(&mut heap, lib.f()).unwrap());
    assert!(!lib.is_false(&mut heap, lib.t()).unwrap());
}

#[test]
fn lambda_yields_closure_over_the_environment() {
    let (mut heap, lib) = setup();
    let v0 = heap.make_var(0).unwrap();
    let l = heap.make_lambda(v0).unwrap();
    let result = eval(&mut heap, &lib, l).unwrap();
    let expected = heap.make_proc(v0, lib.f()).unwrap();
    assert!(heap.structural_eq(result, expected));
}

#[test]
fn beta_reduction_of_identity() {
    let (mut heap, lib) = setup();
    // (λ.0 false) and (λ.0 true)
    let v0 = heap.make_var(0).unwrap();
    let id = heap.make_lambda(v0).unwrap();
    heap.push(id).unwrap();
    let app = heap.make_call(id, lib.f()).unwrap();
    assert!(lib.is_false(&mut heap, app).unwrap());
    let app = heap.make_call(id, lib.t()).unwrap();
    assert!(!lib.is_false(&mut heap, app).unwrap());
    heap.pop(1);
}

#[test]
fn beta_law_matches_explicit_wrap() {
    let (mut heap, lib) = setup();
    // eval((λ.0) t, env) == eval(0, Wrap(t, env) : env)
    let v0 = heap.make_var(0).unwrap();
    let id = heap.make_lambda(v0).unwrap();
    heap.push(id).unwrap();
    let call = heap.make_call(id, lib.t()).unwrap();
    let by_call = eval(&mut heap, &lib, call).unwrap();

    let wrap = heap.make_wrap(lib.t(), lib.f()).unwrap();
    heap.push(wrap).unwrap();
    let env = lib.pair(&mut heap, wrap, lib.f()).unwrap();
    let by_env = eval_in(&mut heap, &lib, v0, env).unwrap();
    heap.pop(2);
    assert_eq!(by_call, by_env);
    assert_eq!(by_call, lib.t());
}

#[test]
fn nested_applications() {
    let (mut heap, lib) = setup();
    // ((λλ.(λ.0 1) x) y) reduces to x
    let mut s = heap.scope();
    let v0 = s.var(0).unwrap();
    let v1 = s.var(1).unwrap();
    let inner_id = s.lambda(v0).unwrap();
    let inner = s.call(inner_id, v1).unwrap();
    let fun = s.lambda2(inner).unwrap();
    let with_f = s.call(fun, lib.f()).unwrap();
    let app_f = s.call(with_f, lib.f()).unwrap();
    let with_t = s.call(fun, lib.t()).unwrap();
    let app_t = s.call(with_t, lib.f()).unwrap();
    drop(s);
    heap.push(app_f).unwrap();
    heap.push(app_t).unwrap();
    assert!(lib.is_false(&mut heap, app_f).unwrap());
    assert!(!lib.is_false(&mut heap, app_t).unwrap());
    heap.pop(2);
}

#[test]
fn lookup_in_environment() {
    let (mut heap, lib) = setup();
    // Var(0) and Var(1) in an environment holding wraps of false and true
    let wf = heap.make_wrap(lib.f(), lib.f()).unwrap();
    heap.push(wf).unwrap();
    let wt = heap.make_wrap(lib.t(), lib.f()).unwrap();
    heap.push(wt).unwrap();
    let tail = lib.pair(&mut heap, wt, lib.f()).unwrap();
    heap.push(tail).unwrap();
    let env = lib.pair(&mut heap, wf, tail).unwrap();
    heap.push(env).unwrap();

    let v0 = heap.make_var(0).unwrap();
    assert_eq!(eval_in(&mut heap, &lib, v0, env).unwrap(), lib.f());
    let v1 = heap.make_var(1).unwrap();
    assert_eq!(eval_in(&mut heap, &lib, v1, env).unwrap(), lib.t());
    heap.pop(4);
}

#[test]
fn out_of_range_variable_lifts_to_free() {
    let (mut heap, lib) = setup();
    let w = heap.make_wrap(lib.t(), lib.f()).unwrap();
    heap.push(w).unwrap();
    let env = lib.pair(&mut heap, w, lib.f()).unwrap();
    heap.push(env).unwrap();
    let v3 = heap.make_var(3).unwrap();
    let result = eval_in(&mut heap, &lib, v3, env).unwrap();
    match heap.cell(result) {
        Cell::Var { idx } => assert_eq!(*idx, 2),
        other => panic!("expected free var, got {other:?}"),
    }
    heap.pop(2);
}

#[test]
fn free_variable_application_keeps_the_function() {
    let (mut heap, lib) = setup();
    // (0 true) in the empty environment: the free variable survives and
    // the argument is dropped unevaluated.
    let v0 = heap.make_var(0).unwrap();
    heap.push(v0).unwrap();
    let bottom = omega(&mut heap);
    heap.push(bottom).unwrap();
    let app = heap.make_call(v0, bottom).unwrap();
    let result = eval(&mut heap, &lib, app).unwrap();
    heap.pop(2);
    match heap.cell(result) {
        Cell::Var { idx } => assert_eq!(*idx, 0),
        other => panic!("expected free var, got {other:?}"),
    }
}

#[test]
fn wrap_forces_lazily_and_memoizes() {
    let (mut heap, lib) = setup();
    let w = heap.make_wrap(lib.t(), lib.f()).unwrap();
    heap.push(w).unwrap();
    assert_eq!(heap.wrap_cache(w), None);
    let first = eval(&mut heap, &lib, w).unwrap();
    assert_eq!(first, lib.t());
    assert_eq!(heap.wrap_cache(w), Some(lib.t()));
    // Second force returns the cached cell without re-reduction
    let second = eval(&mut heap, &lib, w).unwrap();
    assert_eq!(second, first);
    heap.pop(1);
}

#[test]
fn conditionals_do_not_force_the_dead_branch() {
    let (mut heap, lib) = setup();
    let bottom = omega(&mut heap);
    heap.push(bottom).unwrap();
    let picked = lib.op_if(&mut heap, lib.t(), lib.t(), bottom).unwrap();
    assert!(!lib.is_false(&mut heap, picked).unwrap());
    let picked = lib.op_if(&mut heap, lib.f(), bottom, lib.f()).unwrap();
    assert!(lib.is_false(&mut heap, picked).unwrap());
    heap.pop(1);
}

#[test]
fn shared_thunk_reduces_once() {
    let (mut heap, lib) = setup();
    // (λ.pair(0, 0)) false duplicates one wrap into both pair slots
    let mut s = heap.scope();
    let v0 = s.var(0).unwrap();
    let p = s.call2(lib.pair_fn(), v0, v0).unwrap();
    let l = s.lambda(p).unwrap();
    let app = s.call(l, lib.f()).unwrap();
    drop(s);
    heap.push(app).unwrap();
    let duplicate = eval(&mut heap, &lib, app).unwrap();
    heap.pop(1);
    heap.push(duplicate).unwrap();

    let shared = lib.first_raw(&heap, heap.stack(duplicate));
    assert!(heap.cell(shared).is_wrap());
    assert_eq!(heap.wrap_cache(shared), None);

    let head = lib.first(&mut heap, duplicate).unwrap();
    assert!(lib.is_false(&mut heap, head).unwrap());
    assert_eq!(heap.wrap_cache(shared), Some(lib.f()));
    heap.pop(1);
}

#[test]
fn applying_a_continuation_resumes_it() {
    let (mut heap, lib) = setup();
    // Applying a captured terminal continuation to an argument evaluates
    // the argument under that continuation.
    let v0 = heap.make_var(0).unwrap();
    let k = heap.make_cont(v0).unwrap();
    heap.push(k).unwrap();
    let app = heap.make_call(k, lib.t()).unwrap();
    let result = eval(&mut heap, &lib, app).unwrap();
    heap.pop(1);
    assert_eq!(result, lib.t());
}

#[test]
fn streams_in_value_position_stay_streams() {
    let (mut heap, lib) = setup();
    let s = heap.from_str("x").unwrap();
    heap.push(s).unwrap();
    let result = eval(&mut heap, &lib, s).unwrap();
    assert_eq!(result, s);
    let n = heap.make_int(7).unwrap();
    heap.set_root(0, n);
    let result = eval(&mut heap, &lib, n).unwrap();
    assert_eq!(result, n);
    heap.pop(1);
}

#[test]
fn evaluation_runs_under_constant_host_stack() {
    let mut heap = Heap::new(1_048_576);
    let lib = Library::new(&mut heap).unwrap();
    // A chain of 10_000 nested applications of the identity would overflow
    // a recursive evaluator's host stack.
    let v0 = heap.make_var(0).unwrap();
    let id = heap.make_lambda(v0).unwrap();
    heap.push(id).unwrap();
    let slot = heap.root_depth();
    let mut term = lib.t();
    heap.push(term).unwrap();
    for _ in 0..10_000 {
        term = heap.make_call(id, term).unwrap();
        heap.set_root(slot, term);
    }
    assert!(!lib.is_false(&mut heap, term).unwrap());
    heap.pop(2);
}

#[test]
fn eval_transitions_survive_stress_collections() {
    let mut heap = Heap::new(2_048);
    let lib = Library::new(&mut heap).unwrap();
    heap.set_stress(true);
    let v0 = heap.make_var(0).unwrap();
    heap.push(v0).unwrap();
    let id = heap.make_lambda(v0).unwrap();
    heap.set_root(0, id);
    let app = heap.make_call(id, lib.t()).unwrap();
    heap.set_root(0, app);
    assert!(!lib.is_false(&mut heap, app).unwrap());
    heap.pop(1);
}
