//! Attribute opcode primitives: `load_attr`, `load_attr_callable`,
//! `store_attr` (§4.6.4).

use super::Vm;
use crate::exception::RunResult;
use crate::intern::InternId;
use crate::value::Value;

impl Vm<'_> {
    /// `load_attr name` (§4.6.4): replaces the top of stack with
    /// `get_attribute(top, name)`.
    ///
    /// # Panics
    /// Panics if the attribute is absent — raising a catchable
    /// `AttributeError` is explicitly deferred (§4.6.4, §7: a currently-fatal
    /// gap rather than a recoverable case).
    pub fn load_attr(&mut self, name: InternId) -> RunResult<()> {
        let owner = self.frame.pop();
        let value = crate::attr::get_attribute(owner, name, self.heap, self.builtins, self.names)?
            .unwrap_or_else(|| panic!("attribute lookup failed: no such attribute"));
        self.frame.push(value);
        Ok(())
    }

    /// `load_attr_callable name` (§4.6.4): pops the owner, resolves `name`
    /// via the unbound fast path.
    ///
    /// Returns `(Some(owner), function)` when the fast path engaged (the
    /// subsequent call must pass `owner` as an explicit self), or
    /// `(None, value)` otherwise. This "owner-or-absent" pair is returned
    /// directly to the caller as a typed `Option` instead of being pushed
    /// onto the (otherwise `Value`-only) operand stack, since `Value` has no
    /// spare "absent" representation that wouldn't collide with a real
    /// `None` receiver — see `DESIGN.md`.
    ///
    /// # Panics
    /// Panics if the attribute is absent (same policy as `load_attr`).
    pub fn load_attr_callable(&mut self, name: InternId) -> RunResult<(Option<Value>, Value)> {
        let owner = self.frame.pop();
        let (value, unbound) = crate::attr::get_method_attribute(owner, name, self.heap, self.builtins, self.names)?
            .unwrap_or_else(|| panic!("attribute lookup failed: no such attribute"));
        Ok((unbound.then_some(owner), value))
    }

    /// `store_attr name` (§4.6.4): pops the owner, then the value, and
    /// writes the attribute.
    ///
    /// # Panics
    /// Panics per `set_attribute`'s fatal precondition (intrinsic non-type
    /// target).
    pub fn store_attr(&mut self, name: InternId) {
        let owner = self.frame.pop();
        let value = self.frame.pop();
        crate::attr::set_attribute(owner, name, value, self.heap);
    }
}
