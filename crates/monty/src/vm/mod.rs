//! Evaluator primitives: the operand-stack operations a transpiled frame
//! invokes (§4.6 "Evaluator Primitives (C6)").
//!
//! Each submodule groups one family of opcode-level primitives in an
//! `impl Vm { .. }`-per-opcode-method shape: rather than free functions
//! threading `&mut Heap`/`&BuiltinTypes`/`&KnownNames` through every call,
//! [`Vm`] bundles a frame's operand stack together with the shared runtime
//! tables for the duration of one primitive call.

mod attr_ops;
mod binary;
mod call_op;
mod compare;
mod iter;
mod stack_ops;

pub use iter::IterStep;

use crate::heap::Heap;
use crate::intern::KnownNames;
use crate::types::BuiltinTypes;
use crate::value::Value;

/// A frame's operand stack plus its currently-caught exception slot (§6
/// Transpiler ABI: `stack`, `stack_current`, `caught_exception`).
///
/// There is no `PY__EXCEPTION_HANDLER_LABEL` field here — Design Notes §9
/// directs modeling the jump-to-handler control transfer as ordinary control
/// flow in a systems language rather than a literal computed goto; callers
/// express a try/except region as a `match` on the `RunResult` a primitive
/// returns, truncating the stack themselves via [`Frame::truncate_to`] and
/// falling into the handler block in source order instead of jumping to one.
#[derive(Debug, Default)]
pub struct Frame {
    stack: Vec<Value>,
    pub caught_exception: Option<Value>,
}

impl Frame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    /// # Panics
    /// Panics on an empty stack — an operand-stack underflow is a tier-1
    /// fatal condition (§7), never a recoverable exception.
    pub fn pop(&mut self) -> Value {
        self.stack.pop().expect("operand stack underflow")
    }

    /// # Panics
    /// Panics on an empty stack.
    #[must_use]
    pub fn peek(&self) -> Value {
        *self.stack.last().expect("operand stack underflow")
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Restores the stack to `depth`, as a catchable raise's handler-fixup
    /// does (§4.5 Propagation).
    ///
    /// # Panics
    /// Panics if `depth` exceeds the current depth.
    pub fn truncate_to(&mut self, depth: usize) {
        assert!(depth <= self.stack.len(), "cannot truncate operand stack to a depth above its current size");
        self.stack.truncate(depth);
    }
}

/// Bundles one frame's operand stack with the runtime tables its opcode
/// primitives need. Constructed fresh (cheaply — all fields are borrows) at
/// each call site that needs to run a primitive.
pub struct Vm<'a> {
    pub frame: &'a mut Frame,
    pub heap: &'a mut Heap,
    pub builtins: &'a BuiltinTypes,
    pub names: &'a KnownNames,
}
