//! The `CALL` opcode (§4.6.5): invokes a callable already on the stack.

use super::Vm;
use crate::exception::RunResult;
use crate::value::Value;

impl Vm<'_> {
    /// `call argc` (§4.6.5): pops `argc` positional arguments (right to
    /// left), pops the callable, invokes it with `self_slot` as the
    /// receiver, pushes the result.
    ///
    /// `self_slot` is whatever [`Vm::load_attr_callable`](super::attr_ops)
    /// returned for this call site — `Some(owner)` for an unbound method
    /// fast-path dispatch, `None` otherwise (a bare name load, an already-
    /// bound method, or a non-method callable). The stack itself carries
    /// only the callable and its positional arguments; the self slot rides
    /// alongside as a plain parameter rather than a third stack push (see
    /// `load_attr_callable`'s doc comment).
    ///
    /// # Errors
    /// Propagates whatever `callable::call` raises, including `TypeError`
    /// for a non-callable target.
    pub fn call(&mut self, argc: usize, self_slot: Option<Value>) -> RunResult<()> {
        let mut args = Vec::with_capacity(argc);
        for _ in 0..argc {
            args.push(self.frame.pop());
        }
        args.reverse();

        let callee = self.frame.pop();
        let result = crate::callable::call(callee, &args, &[], self_slot, self.heap, self.builtins, self.names)?;
        self.frame.push(result);
        Ok(())
    }
}
