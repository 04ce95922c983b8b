//! Class construction: `__build_class__` and `type.__call__`
//! (§4.4 "Class Builder (C4)").

use crate::heap::Heap;
use crate::intern::{InternId, KnownNames};
use crate::types::{self, BuiltinTypes};
use crate::value::{HeapData, Value};

/// `__build_class__(body, name, base?)` (§4.4).
///
/// Shaped as a [`crate::value::NativeFn`] itself, so it can sit in the
/// builtin globals table exactly like `print` — `__build_class__` and
/// `print` are the entire built-in library (§1).
///
/// # Errors
/// `TypeError` for wrong argument counts, a non-`function` body, or a
/// non-`str` name (§4.4, §8 boundary cases).
pub fn build_class(
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
    _self: Option<Value>,
    args: &[Value],
    _kwargs: &[(InternId, Value)],
) -> crate::exception::RunResult<Value> {
    if args.len() < 2 {
        return Err(crate::exception::type_error(
            "__build_class__: not enough arguments",
            builtins,
            heap,
            names,
        ));
    }
    if args.len() > 3 {
        return Err(crate::exception::type_error(
            "multiple inheritance is not yet supported",
            builtins,
            heap,
            names,
        ));
    }

    let body = args[0];
    let name = args[1];

    if !is_function(body, heap) {
        return Err(crate::exception::type_error("__build_class__: body must be a function", builtins, heap, names));
    }
    let Value::Object(name_id) = name else {
        return Err(crate::exception::type_error("__build_class__: name must be a str", builtins, heap, names));
    };
    let HeapData::Str(name_str) = heap.get(name_id) else {
        return Err(crate::exception::type_error("__build_class__: name must be a str", builtins, heap, names));
    };
    let name_str = name_str.clone();

    let base = match args.get(2) {
        Some(&base_value) => {
            let Value::Object(base_id) = base_value else {
                return Err(crate::exception::type_error("__build_class__: base must be a type", builtins, heap, names));
            };
            if !matches!(heap.get(base_id), HeapData::Type(_)) {
                return Err(crate::exception::type_error("__build_class__: base must be a type", builtins, heap, names));
            }
            base_id
        }
        None => builtins.object,
    };

    let new_type = heap.alloc_type(name_str, Some(base), false);

    // Run the class body with the new type as the hidden `self`; every name
    // binding inside it becomes an assignment to the type's
    // `class_attributes` (§4.4). The return value is discarded; any
    // exception propagates.
    crate::callable::call(body, &[], &[], Some(new_type), heap, builtins, names)?;

    Ok(new_type)
}

fn is_function(value: Value, heap: &Heap) -> bool {
    matches!(value, Value::Object(id) if matches!(heap.get(id), HeapData::Function(_)))
}

/// `type.__call__(self=cls, args…)` (§4.4): resolves `__new__` then,
/// conditionally, `__init__`.
///
/// An exception raised by `__init__` propagates and aborts construction
/// instead of being discarded in favor of returning a half-initialized
/// instance (see DESIGN.md, Open Question #1).
pub fn type_call(
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
    self_arg: Option<Value>,
    args: &[Value],
    kwargs: &[(InternId, Value)],
) -> crate::exception::RunResult<Value> {
    let cls_value = self_arg.expect("type.__call__ invoked without a class as self");
    let Value::Object(cls) = cls_value else { unreachable!("type.__call__'s self must be a type value") };

    let (new_fn, _) = crate::attr::get_method_attribute(cls_value, names.dunder_new, heap, builtins, names)?
        .expect("type.__call__: no __new__ found (object.__new__ should always be present)");
    let instance = crate::callable::call(new_fn, args, kwargs, Some(cls_value), heap, builtins, names)?;

    if types::is_subtype(builtins.type_of(instance, heap), cls, heap) {
        if let Some((init_fn, _)) =
            crate::attr::get_method_attribute(instance, names.dunder_init, heap, builtins, names)?
        {
            crate::callable::call(init_fn, args, kwargs, Some(instance), heap, builtins, names)?;
        }
    }

    Ok(instance)
}

/// Default `object.__new__(cls)` (§4.4): an empty non-intrinsic instance.
pub fn object_new(
    heap: &mut Heap,
    _builtins: &BuiltinTypes,
    _names: &KnownNames,
    self_arg: Option<Value>,
    _args: &[Value],
    _kwargs: &[(InternId, Value)],
) -> crate::exception::RunResult<Value> {
    let Value::Object(cls) = self_arg.expect("object.__new__ requires cls as self") else {
        unreachable!("object.__new__'s self must be a type value")
    };
    Ok(heap.alloc_object(cls))
}

/// Default `object.__init__`: a no-op returning `None`.
pub fn object_init(
    _heap: &mut Heap,
    _builtins: &BuiltinTypes,
    _names: &KnownNames,
    _self_arg: Option<Value>,
    _args: &[Value],
    _kwargs: &[(InternId, Value)],
) -> crate::exception::RunResult<Value> {
    Ok(Value::None)
}

/// `object.__str__` default fallback: `<ClassName object>` (§10.6).
pub fn object_str(
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
    self_arg: Option<Value>,
    _args: &[Value],
    _kwargs: &[(InternId, Value)],
) -> crate::exception::RunResult<Value> {
    let target = self_arg.expect("object.__str__ requires self");
    let type_id = builtins.type_of(target, heap);
    let class_name = types::type_name(type_id, heap);
    let _ = names;
    Ok(heap.alloc_str(format!("<{class_name} object>")))
}

/// `function.__get__(func, instance, owner)` (§4.6 descriptor resolution's
/// grounding case): binds a plain function and an instance into a `method`.
pub fn function_get(
    heap: &mut Heap,
    _builtins: &BuiltinTypes,
    _names: &KnownNames,
    self_arg: Option<Value>,
    args: &[Value],
    _kwargs: &[(InternId, Value)],
) -> crate::exception::RunResult<Value> {
    let func = self_arg.expect("function.__get__ requires the function as self");
    let instance = args[0];
    Ok(heap.alloc_method(func, instance))
}
