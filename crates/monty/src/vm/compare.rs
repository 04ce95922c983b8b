//! Comparison dispatch: `==, !=, <, <=, >, >=` (§4.6.2).

use super::Vm;
use crate::exception::RunResult;
use crate::intern::CompareOp;
use crate::value::{HeapData, Value};

impl Vm<'_> {
    /// Dispatches one of the six comparisons, pops both operands, pushes a
    /// `bool`.
    ///
    /// # Errors
    /// `TypeError` for an ordering comparison (`<`, `<=`, `>`, `>=`) with no
    /// dunder on either side — unlike equality, ordering has no identity
    /// fallback (§4.6.2 step 4; see DESIGN.md for why this resolves the
    /// ambiguity as a hard `TypeError` rather than leaving it unspecified).
    pub fn compare(&mut self, op: CompareOp) -> RunResult<()> {
        let right = self.frame.pop();
        let left = self.frame.pop();

        if let (Value::Int(l), Value::Int(r)) = (left, right) {
            self.frame.push(Value::Bool(native_int_compare(op, l, r)));
            return Ok(());
        }

        if op.is_equality() {
            if let (Value::Object(l), Value::Object(r)) = (left, right) {
                if let (HeapData::Str(l), HeapData::Str(r)) = (self.heap.get(l), self.heap.get(r)) {
                    let eq = l == r;
                    self.frame.push(Value::Bool(if op == CompareOp::Eq { eq } else { !eq }));
                    return Ok(());
                }
            }
        }

        let dunder = self.names.compare_dunder(op);
        if let Some(result) = self.try_dunder(dunder, right, left)? {
            self.frame.push(Value::Bool(truthy(result)));
            return Ok(());
        }
        if let Some(result) = self.try_dunder(dunder, left, right)? {
            self.frame.push(Value::Bool(truthy(result)));
            return Ok(());
        }

        if op.is_equality() {
            self.frame.push(Value::Bool(if op == CompareOp::Eq { left.is(&right) } else { !left.is(&right) }));
            return Ok(());
        }

        Err(crate::exception::type_error(
            format!("'{}' not supported between instances", op.symbol()),
            self.builtins,
            self.heap,
            self.names,
        ))
    }

    /// Tries `owner`'s dunder with `arg`, returning `None` when the dunder
    /// isn't present rather than erroring — the caller tries the other
    /// operand next.
    fn try_dunder(
        &mut self,
        dunder: crate::intern::InternId,
        owner: Value,
        arg: Value,
    ) -> RunResult<Option<Value>> {
        match crate::attr::get_method_attribute(owner, dunder, self.heap, self.builtins, self.names)? {
            Some((func, unbound)) => {
                let self_for_call = unbound.then_some(owner);
                let result = crate::callable::call(func, &[arg], &[], self_for_call, self.heap, self.builtins, self.names)?;
                Ok(Some(result))
            }
            None => Ok(None),
        }
    }
}

fn truthy(value: Value) -> bool {
    matches!(value, Value::Bool(true))
}

fn native_int_compare(op: CompareOp, l: i64, r: i64) -> bool {
    match op {
        CompareOp::Eq => l == r,
        CompareOp::Ne => l != r,
        CompareOp::Lt => l < r,
        CompareOp::Le => l <= r,
        CompareOp::Gt => l > r,
        CompareOp::Ge => l >= r,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{Heap, HeapLimits};
    use crate::intern::Interns;
    use crate::types::BuiltinTypes;
    use crate::vm::Frame;

    fn bootstrap() -> (Heap, BuiltinTypes, crate::intern::KnownNames) {
        let mut heap = Heap::new(HeapLimits::default());
        let mut interns = Interns::new();
        let names = crate::intern::KnownNames::bootstrap(&mut interns);
        let Value::Object(object) = heap.alloc_type("object", None, false) else { unreachable!() };
        let Value::Object(type_) = heap.alloc_type("type", Some(object), true) else { unreachable!() };
        let builtins = BuiltinTypes {
            object,
            type_,
            bool_: object,
            int: object,
            float: object,
            str_: object,
            tuple: object,
            list: object,
            none_type: object,
            function: object,
            method: object,
            base_exception: object,
            exception: object,
            stop_iteration: object,
            type_error: object,
        };
        (heap, builtins, names)
    }

    #[test]
    fn native_int_ordering() {
        let (mut heap, builtins, names) = bootstrap();
        let mut frame = Frame::new();
        frame.push(Value::Int(2));
        frame.push(Value::Int(3));
        let mut vm = Vm { frame: &mut frame, heap: &mut heap, builtins: &builtins, names: &names };
        vm.compare(CompareOp::Lt).unwrap();
        assert!(matches!(frame.pop(), Value::Bool(true)));
    }

    #[test]
    fn equality_falls_back_to_identity() {
        let (mut heap, builtins, names) = bootstrap();
        let mut frame = Frame::new();
        frame.push(Value::None);
        frame.push(Value::None);
        let mut vm = Vm { frame: &mut frame, heap: &mut heap, builtins: &builtins, names: &names };
        vm.compare(CompareOp::Eq).unwrap();
        assert!(matches!(frame.pop(), Value::Bool(true)));
    }

    #[test]
    fn ordering_with_no_dunder_raises_type_error() {
        let (mut heap, builtins, names) = bootstrap();
        let mut frame = Frame::new();
        frame.push(Value::None);
        frame.push(Value::None);
        let mut vm = Vm { frame: &mut frame, heap: &mut heap, builtins: &builtins, names: &names };
        let err = vm.compare(CompareOp::Lt).unwrap_err();
        assert!(crate::types::is_instance(err.0, builtins.type_error, &heap, &builtins));
    }

    #[test]
    fn str_equality_is_byte_wise() {
        let (mut heap, builtins, names) = bootstrap();
        let a = heap.alloc_str("hi");
        let b = heap.alloc_str("hi");
        let mut frame = Frame::new();
        frame.push(a);
        frame.push(b);
        let mut vm = Vm { frame: &mut frame, heap: &mut heap, builtins: &builtins, names: &names };
        vm.compare(CompareOp::Eq).unwrap();
        assert!(matches!(frame.pop(), Value::Bool(true)));
    }
}
