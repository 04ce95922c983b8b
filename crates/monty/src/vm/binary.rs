//! Binary operator dispatch (§4.6.1).

use super::Vm;
use crate::exception::RunResult;
use crate::intern::BinaryOp;
use crate::value::Value;

impl Vm<'_> {
    /// `op_<name>` (§4.6.1): pops right then left, dispatches, pushes the
    /// result.
    ///
    /// The native-int fast path only applies to the arithmetic/bitwise
    /// members of the family — `@` (`MatMul`) and `[]` (`GetItem`) have no
    /// meaningful native-int implementation, so they always fall through to
    /// dunder dispatch even when both operands happen to be `int` (an `int`
    /// has no `__getitem__`/`__matmul__`, so that dispatch correctly ends in
    /// `TypeError`).
    ///
    /// # Errors
    /// `TypeError` if neither the native fast path nor the right operand's
    /// dunder resolves (§4.6.1 step 3).
    pub fn binary_op(&mut self, op: BinaryOp) -> RunResult<()> {
        let right = self.frame.pop();
        let left = self.frame.pop();

        if !matches!(op, BinaryOp::MatMul | BinaryOp::GetItem) {
            if let (Value::Int(l), Value::Int(r)) = (left, right) {
                let result = native_int_op(op, l, r, self.builtins, self.heap, self.names)?;
                self.frame.push(result);
                return Ok(());
            }
        }

        let dunder = self.names.binary_dunder(op);
        match crate::attr::get_method_attribute(right, dunder, self.heap, self.builtins, self.names)? {
            Some((func, unbound)) => {
                let self_for_call = unbound.then_some(right);
                let result = crate::callable::call(func, &[left], &[], self_for_call, self.heap, self.builtins, self.names)?;
                self.frame.push(result);
                Ok(())
            }
            None => Err(crate::exception::type_error(
                format!("unsupported operand type(s) for {}", op.symbol()),
                self.builtins,
                self.heap,
                self.names,
            )),
        }
    }
}

fn native_int_op(
    op: BinaryOp,
    l: i64,
    r: i64,
    builtins: &crate::types::BuiltinTypes,
    heap: &mut crate::heap::Heap,
    names: &crate::intern::KnownNames,
) -> RunResult<Value> {
    use BinaryOp::{Add, And, FloorDiv, LShift, Mod, Mul, Or, Pow, RShift, Sub, TrueDiv, Xor};
    Ok(match op {
        Add => Value::Int(l.wrapping_add(r)),
        Sub => Value::Int(l.wrapping_sub(r)),
        Mul => Value::Int(l.wrapping_mul(r)),
        TrueDiv => {
            assert!(r != 0, "division by zero");
            #[allow(clippy::cast_precision_loss)]
            {
                Value::Float(l as f64 / r as f64)
            }
        }
        FloorDiv => {
            assert!(r != 0, "integer division by zero");
            Value::Int(l.div_euclid(r))
        }
        Mod => {
            assert!(r != 0, "integer modulo by zero");
            Value::Int(l.rem_euclid(r))
        }
        Pow => Value::Int(l.wrapping_pow(u32::try_from(r).unwrap_or(0))),
        And => Value::Int(l & r),
        Or => Value::Int(l | r),
        Xor => Value::Int(l ^ r),
        LShift => Value::Int(l.wrapping_shl(u32::try_from(r).unwrap_or(0))),
        RShift => Value::Int(l.wrapping_shr(u32::try_from(r).unwrap_or(0))),
        BinaryOp::MatMul | BinaryOp::GetItem => {
            return Err(crate::exception::type_error(
                format!("unsupported operand type(s) for {}", op.symbol()),
                builtins,
                heap,
                names,
            ));
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::{Heap, HeapLimits};
    use crate::intern::Interns;
    use crate::types::BuiltinTypes;
    use crate::vm::Frame;
    use std::rc::Rc;

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
    fn native_int_add_fast_path() {
        let (mut heap, builtins, names) = bootstrap();
        let mut frame = Frame::new();
        frame.push(Value::Int(2));
        frame.push(Value::Int(3));
        let mut vm = Vm { frame: &mut frame, heap: &mut heap, builtins: &builtins, names: &names };
        vm.binary_op(BinaryOp::Add).unwrap();
        assert!(matches!(frame.pop(), Value::Int(5)));
    }

    #[test]
    fn unsupported_operands_raise_type_error() {
        let (mut heap, builtins, names) = bootstrap();
        let mut frame = Frame::new();
        frame.push(Value::Int(2));
        frame.push(Value::None);
        let mut vm = Vm { frame: &mut frame, heap: &mut heap, builtins: &builtins, names: &names };
        let err = vm.binary_op(BinaryOp::Add).unwrap_err();
        assert!(crate::types::is_instance(err.0, builtins.type_error, &heap, &builtins));
    }

    #[test]
    fn right_operand_dunder_is_consulted() {
        let (mut heap, builtins, names) = bootstrap();
        let add = heap.alloc_function(Rc::new(|_heap, _b, _n, self_arg, args, _kwargs| {
            let _ = self_arg;
            Ok(args[0])
        }));
        let cls = heap.alloc_type("Box", Some(builtins.object), false);
        crate::attr::set_attribute(cls, names.dunder_add, add, &mut heap);
        let Value::Object(cls_id) = cls else { unreachable!() };
        let instance = heap.alloc_object(cls_id);

        let mut frame = Frame::new();
        frame.push(Value::Int(1));
        frame.push(instance);
        let mut vm = Vm { frame: &mut frame, heap: &mut heap, builtins: &builtins, names: &names };
        vm.binary_op(BinaryOp::Add).unwrap();
        assert!(matches!(frame.pop(), Value::Int(1)));
    }
}
