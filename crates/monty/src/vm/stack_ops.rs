//! Stack micromanagement primitives (§4.6.6): `COPY i`, `SWAP i`,
//! `PUSH_EXC_INFO`, `POP_JUMP_IF_FALSE`/`POP_JUMP_IF_TRUE`.

use super::{Frame, Vm};

impl Frame {
    /// `COPY i` (§4.6.6): duplicates the `i`-th-from-top element onto the
    /// top. `i` is 1-based, matching CPython's own `COPY`/`SWAP` bytecode
    /// convention (§9 open question on indexing resolved this way — `COPY 1`
    /// duplicates the top itself).
    ///
    /// # Panics
    /// Panics if `i` is zero or exceeds the current stack depth.
    pub fn copy(&mut self, i: usize) {
        assert!(i >= 1, "COPY index is 1-based");
        let idx = self.depth().checked_sub(i).expect("COPY index out of range");
        let value = self.stack[idx];
        self.push(value);
    }

    /// `SWAP i` (§4.6.6): swaps the top of the stack (position 1) with the
    /// `i`-th-from-top element.
    ///
    /// # Panics
    /// Panics if `i` is zero or exceeds the current stack depth.
    pub fn swap(&mut self, i: usize) {
        assert!(i >= 1, "SWAP index is 1-based");
        let len = self.depth();
        let top = len - 1;
        let other = len.checked_sub(i).expect("SWAP index out of range");
        self.stack.swap(top, other);
    }

    /// `POP_JUMP_IF_FALSE` (§4.6.6): pops the top, reporting whether the
    /// frame should take the jump. Assumes the top is an exact `bool`
    /// (transpiler responsibility per §4.6.6 — undefined otherwise).
    ///
    /// # Panics
    /// Panics if the popped value isn't a `bool`.
    pub fn pop_jump_if_false(&mut self) -> bool {
        match self.pop() {
            crate::value::Value::Bool(b) => !b,
            other => unreachable!("POP_JUMP_IF_FALSE on a non-bool top of stack: {other:?}"),
        }
    }

    /// `POP_JUMP_IF_TRUE` (§4.6.6).
    ///
    /// # Panics
    /// Panics if the popped value isn't a `bool`.
    pub fn pop_jump_if_true(&mut self) -> bool {
        match self.pop() {
            crate::value::Value::Bool(b) => b,
            other => unreachable!("POP_JUMP_IF_TRUE on a non-bool top of stack: {other:?}"),
        }
    }
}

impl Vm<'_> {
    /// `PUSH_EXC_INFO` (§4.6.6): inserts the frame's currently-caught
    /// exception beneath the top of the stack.
    ///
    /// # Panics
    /// Panics if there is no active caught exception.
    pub fn push_exc_info(&mut self) {
        let top = self.frame.pop();
        let exc = self.frame.caught_exception.expect("PUSH_EXC_INFO with no active exception");
        self.frame.push(exc);
        self.frame.push(top);
    }

    /// `CHECK_EXC_MATCH` (§4.6.6 family): pops the candidate exception type,
    /// pushes whether `STACK[-1]` (left unconsumed) is an instance of it.
    pub fn check_exc_match(&mut self) {
        let candidate_type = self.frame.pop();
        let exc = self.frame.peek();
        let crate::value::Value::Object(type_id) = candidate_type else {
            unreachable!("CHECK_EXC_MATCH candidate must be a type value");
        };
        let matches = crate::types::is_instance(exc, type_id, self.heap, self.builtins);
        self.frame.push(crate::value::Value::Bool(matches));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn copy_one_duplicates_the_top() {
        let mut frame = Frame::new();
        frame.push(Value::Int(1));
        frame.push(Value::Int(2));
        frame.copy(1);
        assert!(matches!(frame.pop(), Value::Int(2)));
        assert!(matches!(frame.pop(), Value::Int(2)));
        assert!(matches!(frame.pop(), Value::Int(1)));
    }

    #[test]
    fn swap_two_exchanges_top_and_second() {
        let mut frame = Frame::new();
        frame.push(Value::Int(1));
        frame.push(Value::Int(2));
        frame.swap(2);
        assert!(matches!(frame.pop(), Value::Int(1)));
        assert!(matches!(frame.pop(), Value::Int(2)));
    }
}
