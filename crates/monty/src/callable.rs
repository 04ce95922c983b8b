//! Call dispatch: functions, bound methods, and arbitrary callables via
//! `__call__` (§4.3 "Call Protocol (C3)").

use crate::heap::Heap;
use crate::intern::{InternId, KnownNames};
use crate::types::BuiltinTypes;
use crate::value::{HeapData, Value};

/// `call(target, argc, argv, kwargc, kwargv, self)` (§4.3).
///
/// # Panics
/// Panics if `self_arg` is supplied for a target that isn't a raw
/// `function` — only a `function` value accepts an externally-supplied
/// receiver; this mirrors the source runtime's fatal precondition, not a
/// recoverable `TypeError` (§7 tier 1).
pub fn call(
    target: Value,
    args: &[Value],
    kwargs: &[(InternId, Value)],
    self_arg: Option<Value>,
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
) -> crate::exception::RunResult<Value> {
    if let Value::Object(id) = target {
        match heap.get(id) {
            HeapData::Function(f) => {
                let f = f.clone();
                return f(heap, builtins, names, self_arg, args, kwargs);
            }
            HeapData::Method { func, bound } => {
                assert!(self_arg.is_none(), "cannot pass an explicit self to an already-bound method");
                let func = *func;
                let bound = *bound;
                return call(func, args, kwargs, Some(bound), heap, builtins, names);
            }
            _ => {}
        }
    }

    assert!(self_arg.is_none(), "only a function value accepts an externally-supplied self");

    let owner = Value::Object(builtins.type_of(target, heap));
    match crate::attr::get_method_attribute(owner, names.dunder_call, heap, builtins, names)? {
        Some((call_attr, _unbound)) if is_callable(call_attr, heap) => {
            call(call_attr, args, kwargs, Some(target), heap, builtins, names)
        }
        _ => Err(crate::exception::type_error("attempted to call a non-callable object", builtins, heap, names)),
    }
}

fn is_callable(value: Value, heap: &Heap) -> bool {
    matches!(value, Value::Object(id) if matches!(heap.get(id), HeapData::Function(_) | HeapData::Method { .. }))
}
