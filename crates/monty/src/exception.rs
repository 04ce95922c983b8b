//! Exception hierarchy, the Result-or-exception return discipline, and raise
//! coercion (§3 "Return discipline"/"Exception hierarchy", §4.5).

use crate::heap::Heap;
use crate::intern::KnownNames;
use crate::types::{self, BuiltinTypes, TypeId};
use crate::value::{HeapData, Value};

/// A raised exception, always a `Value` assignable to `BaseException` by the
/// time one of these exists — every constructor in this module upholds that,
/// and [`coerce`] is the one place an arbitrary caller-supplied `Value` gets
/// turned into one (§4.5 coercion rules).
///
/// There is deliberately no `anyhow`-style trait object here: the object
/// model defines exactly one error channel (a `Value`), so wrapping it in
/// anything heavier would just be indirection with nothing to abstract over.
#[derive(Debug, Clone, Copy)]
pub struct RunError(pub Value);

/// `Result` alias used by every fallible runtime operation (§3 "Return
/// discipline"). `Ok`/`Err` are mutually exclusive by construction — there is
/// no state where both a value and an exception exist for the same call.
pub type RunResult<T> = Result<T, RunError>;

/// Allocates an instance of `type_id` with an optional `msg` attribute set,
/// mirroring `BaseException.__init__(msg?)` (§3 Exception hierarchy).
pub fn new_exception(type_id: TypeId, msg: Option<&str>, heap: &mut Heap, names: &KnownNames) -> Value {
    let instance = heap.alloc_object(type_id);
    if let Some(msg) = msg {
        let msg_value = heap.alloc_str(msg);
        crate::attr::set_attribute(instance, names.msg, msg_value, heap);
    }
    instance
}

pub fn type_error(msg: impl Into<String>, builtins: &BuiltinTypes, heap: &mut Heap, names: &KnownNames) -> RunError {
    RunError(new_exception(builtins.type_error, Some(&msg.into()), heap, names))
}

pub fn stop_iteration(builtins: &BuiltinTypes, heap: &mut Heap, names: &KnownNames) -> RunError {
    RunError(new_exception(builtins.stop_iteration, None, heap, names))
}

/// `py_coerce_exception` (§4.5): turns whatever a raise site hands us into a
/// `Value` that is actually assignable to `BaseException`.
///
/// - If `v` is itself a type assignable to `BaseException`, instantiate it
///   with no arguments and raise the instance instead.
/// - If `v` is already a `BaseException` instance, use it as-is.
/// - Otherwise, the raise is invalid: produce a `TypeError`.
pub fn coerce(
    v: Value,
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
) -> RunResult<Value> {
    if let Value::Object(id) = v {
        if matches!(heap.get(id), HeapData::Type(_)) && types::is_subtype(id, builtins.base_exception, heap) {
            return crate::callable::call(v, &[], &[], None, heap, builtins, names);
        }
    }
    if types::is_instance(v, builtins.base_exception, heap, builtins) {
        return Ok(v);
    }
    Err(type_error("exceptions must derive from BaseException", builtins, heap, names))
}
