// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright 2026 Jan Wedekind

//! Tagged cell representation.
//!
//! Every runtime value is a cell in a single arena, addressed by a
//! [`CellRef`] index. A cell is a discriminated union over the term
//! constructors (`Var`, `Lambda`, `Call`), the evaluator's runtime tags
//! (`Proc`, `Wrap`, `Memoize`, `Cont`) and the lazy byte sources
//! (`Input`, `Str`, `Int`).

use std::cell::RefCell;
use std::fmt;
use std::io::Read;
use std::rc::Rc;

/// Shared byte reader backing an `Input` cell.
///
/// Every stream cell produced by forcing shares the same underlying
/// reader, so the read position advances exactly once per byte.
pub type ByteSource = Rc<RefCell<dyn Read>>;

/// Index of a cell in the arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef(u32);

impl CellRef {
    #[inline]
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index as u32)
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// A tagged arena cell.
#[derive(Clone)]
pub enum Cell {
    /// De Bruijn index (0 = innermost binder).
    Var { idx: u32 },
    /// Abstraction `λ.body`.
    Lambda { body: CellRef },
    /// Application.
    Call { fun: CellRef, arg: CellRef },
    /// Closure: evaluated lambda body plus captured environment.
    ///
    /// `stack` is an encoded pair list of `Wrap` cells; position `k` holds
    /// the value of De Bruijn index `k`.
    Proc { block: CellRef, stack: CellRef },
    /// Suspended thunk. `cache` is `None` until the thunk is forced; once
    /// set it is never overwritten and every later force returns it.
    Wrap {
        unwrap: CellRef,
        context: CellRef,
        cache: Option<CellRef>,
    },
    /// Continuation frame marker asking that the next produced value be
    /// written into `target`'s cache.
    Memoize { value: CellRef, target: CellRef },
    /// CPS continuation: a linked list of call and memoize obligations.
    Cont { k: CellRef },
    /// Lazy byte source over a reader. `used` caches the head pair once the
    /// first byte has been read, making repeated forces idempotent.
    Input {
        source: ByteSource,
        used: Option<CellRef>,
    },
    /// Lazy byte source over an in-memory buffer.
    Str { bytes: Rc<[u8]>, pos: usize },
    /// Lazy producer of a little-endian bit list.
    Int { value: u32 },
}

impl Cell {
    /// Tag name for diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Var { .. } => "var",
            Self::Lambda { .. } => "lambda",
            Self::Call { .. } => "call",
            Self::Proc { .. } => "proc",
            Self::Wrap { .. } => "wrap",
            Self::Memoize { .. } => "memoize",
            Self::Cont { .. } => "cont",
            Self::Input { .. } => "input",
            Self::Str { .. } => "string",
            Self::Int { .. } => "integer",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_var(&self) -> bool {
        matches!(self, Self::Var { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_lambda(&self) -> bool {
        matches!(self, Self::Lambda { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_call(&self) -> bool {
        matches!(self, Self::Call { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_proc(&self) -> bool {
        matches!(self, Self::Proc { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_wrap(&self) -> bool {
        matches!(self, Self::Wrap { .. })
    }

    #[inline]
    #[must_use]
    pub const fn is_stream(&self) -> bool {
        matches!(
            self,
            Self::Input { .. } | Self::Str { .. } | Self::Int { .. }
        )
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var { idx } => write!(f, "Var({idx})"),
            Self::Lambda { body } => write!(f, "Lambda({body:?})"),
            Self::Call { fun, arg } => write!(f, "Call({fun:?}, {arg:?})"),
            Self::Proc { block, stack } => write!(f, "Proc({block:?}, {stack:?})"),
            Self::Wrap {
                unwrap,
                context,
                cache,
            } => write!(f, "Wrap({unwrap:?}, {context:?}, {cache:?})"),
            Self::Memoize { value, target } => write!(f, "Memoize({value:?}, {target:?})"),
            Self::Cont { k } => write!(f, "Cont({k:?})"),
            Self::Input { used, .. } => write!(f, "Input({used:?})"),
            Self::Str { bytes, pos } => write!(f, "Str({} bytes at {pos})", bytes.len()),
            Self::Int { value } => write!(f, "Int({value})"),
        }
    }
}
