//! Attribute resolution: instance table, MRO walk, and the one-level
//! descriptor protocol (§4.2 "Attribute Resolver (C2)").

use crate::heap::Heap;
use crate::intern::{InternId, KnownNames};
use crate::types::{BuiltinTypes, TypeId};
use crate::value::{HeapData, Value};

/// Looks a class attribute up along the MRO starting at `start`, without
/// invoking any descriptor — the raw building block both `get_attribute`
/// and `get_method_attribute` walk on top of.
fn scan_class_attributes(start: TypeId, name: InternId, heap: &Heap) -> Option<Value> {
    let mut current = Some(start);
    while let Some(type_id) = current {
        let HeapData::Type(data) = heap.get(type_id) else {
            unreachable!("MRO walk hit a non-type object");
        };
        if let Some(&value) = data.class_attributes.get(&name) {
            return Some(value);
        }
        current = data.base;
    }
    None
}

/// Reads an instance-dict slot directly, with no MRO walk and no descriptor
/// protocol — the same lookup `get_attribute`'s step 1 performs, exposed for
/// callers (like `BaseException.__str__`) that want "was this ever
/// explicitly set" rather than "what does attribute lookup resolve to".
pub fn instance_attr(target: Value, name: InternId, heap: &Heap) -> Option<Value> {
    if let Value::Object(id) = target {
        if let HeapData::Instance { attrs, .. } = heap.get(id) {
            return attrs.get(&name).copied();
        }
    }
    None
}

fn is_type_value(value: Value, heap: &Heap) -> bool {
    matches!(value, Value::Object(id) if matches!(heap.get(id), HeapData::Type(_)))
}

/// Shared implementation behind `get_attribute`/`get_method_attribute`
/// (§4.2 steps 1–3). Returns `(value, unbound)`: `unbound` is only ever
/// `true` when `want_unbound` was set and the hit came from a raw
/// `function` class attribute via the fast path.
fn resolve(
    target: Value,
    name: InternId,
    want_unbound: bool,
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
) -> crate::exception::RunResult<Option<(Value, bool)>> {
    // Step 1: instance-dict entries bypass `__get__` entirely.
    if let Some(value) = instance_attr(target, name, heap) {
        return Ok(Some((value, false)));
    }

    // Step 2: MRO walk, starting at `target` itself if it is a type, else at
    // `target`'s type.
    let start: TypeId = if is_type_value(target, heap) {
        let Value::Object(id) = target else { unreachable!() };
        id
    } else {
        builtins.type_of(target, heap)
    };

    let Some(attr) = scan_class_attributes(start, name, heap) else {
        return Ok(None);
    };

    let attr_is_function = matches!(attr, Value::Object(id) if matches!(heap.get(id), HeapData::Function(_)));
    if want_unbound && attr_is_function {
        return Ok(Some((attr, true)));
    }

    // Resolve `attr.__get__`, one level, non-recursively (Design Notes §9):
    // only a raw `function` class attribute has a `__get__` worth invoking.
    // `__get__` itself is looked up as a plain class attribute on `attr`'s
    // type rather than through `resolve` again — `function.__get__` is
    // itself a `function`, so recursing into this same path would find
    // `function.__get__` as its own `__get__` and never terminate.
    if attr_is_function {
        let getter_type = builtins.type_of(attr, heap);
        if let Some(getter) = scan_class_attributes(getter_type, names.dunder_get, heap) {
            let owner = Value::Object(start);
            let result = crate::callable::call(getter, &[target, owner], &[], Some(attr), heap, builtins, names)?;
            return Ok(Some((result, false)));
        }
    }
    Ok(Some((attr, false)))
}

/// `get_attribute(target, name)` (§4.2): descriptor protocol engaged,
/// `function` class attributes are bound into a `method` by `__get__`.
pub fn get_attribute(
    target: Value,
    name: InternId,
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
) -> crate::exception::RunResult<Option<Value>> {
    Ok(resolve(target, name, false, heap, builtins, names)?.map(|(value, _)| value))
}

/// `get_method_attribute(target, name)` (§4.2): the unbound fast path used
/// by the `x.m()` call-site opcode to avoid allocating a `method` object.
pub fn get_method_attribute(
    target: Value,
    name: InternId,
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
) -> crate::exception::RunResult<Option<(Value, bool)>> {
    resolve(target, name, true, heap, builtins, names)
}

/// `set_attribute(target, name, value)` (§4.2).
///
/// # Panics
/// Panics if `target` is intrinsic and not itself a `type` — writing an
/// attribute there is a tier-1 fatal precondition violation (§7), not a
/// recoverable exception.
pub fn set_attribute(target: Value, name: InternId, value: Value, heap: &mut Heap) {
    match target {
        Value::Object(id) => match heap.get_mut(id) {
            HeapData::Type(data) => {
                data.class_attributes.insert(name, value);
            }
            HeapData::Instance { attrs, .. } => {
                attrs.insert(name, value);
            }
            _ => panic!("cannot set attribute on an intrinsic non-type value"),
        },
        _ => panic!("cannot set attribute on an intrinsic non-type value"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::HeapLimits;
    use crate::intern::Interns;

    fn bootstrap() -> (Heap, BuiltinTypes, KnownNames) {
        let mut heap = Heap::new(HeapLimits::default());
        let mut interns = Interns::new();
        let names = KnownNames::bootstrap(&mut interns);
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
    fn instance_attr_bypasses_class_lookup() {
        let (mut heap, builtins, names) = bootstrap();
        let mut interns = Interns::new();
        let sub = heap.alloc_type("Sub", Some(builtins.object), false);
        let Value::Object(sub_id) = sub else { unreachable!() };
        let instance = heap.alloc_object(sub_id);
        let name = interns.intern("x");
        set_attribute(instance, name, Value::Int(7), &mut heap);
        let found = get_attribute(instance, name, &mut heap, &builtins, &names).unwrap();
        assert!(matches!(found, Some(Value::Int(7))));
    }

    #[test]
    fn mro_walk_reaches_base_class_attribute() {
        let (mut heap, builtins, names) = bootstrap();
        let mut interns = Interns::new();
        let base = heap.alloc_type("Base", Some(builtins.object), false);
        let Value::Object(base_id) = base else { unreachable!() };
        let greeting = interns.intern("greeting");
        set_attribute(base, greeting, Value::Int(1), &mut heap);
        let sub = heap.alloc_type("Sub", Some(base_id), false);
        let Value::Object(sub_id) = sub else { unreachable!() };
        let instance = heap.alloc_object(sub_id);
        let found = get_attribute(instance, greeting, &mut heap, &builtins, &names).unwrap();
        assert!(matches!(found, Some(Value::Int(1))));
    }

    #[test]
    fn store_attr_on_type_is_visible_to_instances() {
        let (mut heap, builtins, names) = bootstrap();
        let mut interns = Interns::new();
        let cls = heap.alloc_type("Cls", Some(builtins.object), false);
        let Value::Object(cls_id) = cls else { unreachable!() };
        let instance = heap.alloc_object(cls_id);
        let name = interns.intern("shared");
        set_attribute(cls, name, Value::Int(42), &mut heap);
        let found = get_attribute(instance, name, &mut heap, &builtins, &names).unwrap();
        assert!(matches!(found, Some(Value::Int(42))));
    }

    #[test]
    fn missing_attribute_reports_absent() {
        let (mut heap, builtins, names) = bootstrap();
        let mut interns = Interns::new();
        let cls = heap.alloc_type("Cls", Some(builtins.object), false);
        let Value::Object(cls_id) = cls else { unreachable!() };
        let instance = heap.alloc_object(cls_id);
        let missing = interns.intern("nope");
        let found = get_attribute(instance, missing, &mut heap, &builtins, &names).unwrap();
        assert!(found.is_none());
    }
}
