//! The static type registry (§3 "TypeData", §4.1).
//!
//! Built-in type objects are allocated once at startup (C7's bootstrapping)
//! and never freed; this module only defines the registry shape and the
//! operations that read it — `is_instance` and "what type is this value" —
//! not the bootstrap sequence itself (that lives in `runtime.rs`, which owns
//! the heap the types are allocated into).

use crate::heap::Heap;
use crate::value::{HeapData, ObjectId, Value};

/// A type object is just a [`Value::Object`] pointing at [`HeapData::Type`];
/// this alias documents call sites that specifically expect that shape.
pub type TypeId = ObjectId;

/// Handles to every built-in type object, fixed at startup.
///
/// Transpiled code has no way to look these up by name at runtime (no
/// module/import machinery is in scope); the bootstrapping glue hands them
/// out once and every other component takes them as a shared reference.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinTypes {
    pub object: TypeId,
    pub type_: TypeId,
    pub bool_: TypeId,
    pub int: TypeId,
    pub float: TypeId,
    pub str_: TypeId,
    pub tuple: TypeId,
    pub list: TypeId,
    pub none_type: TypeId,
    pub function: TypeId,
    pub method: TypeId,
    pub base_exception: TypeId,
    pub exception: TypeId,
    pub stop_iteration: TypeId,
    pub type_error: TypeId,
}

impl BuiltinTypes {
    /// Resolves the type object for any `Value`, inline types returning
    /// their dedicated singleton id, everything else reading the tag stored
    /// alongside its payload in the heap.
    #[must_use]
    pub fn type_of(&self, value: Value, heap: &Heap) -> TypeId {
        match value {
            Value::None => self.none_type,
            Value::Bool(_) => self.bool_,
            Value::Int(_) => self.int,
            Value::Float(_) => self.float,
            Value::Object(id) => match heap.get(id) {
                HeapData::Str(_) => self.str_,
                HeapData::Tuple(_) => self.tuple,
                HeapData::List(_) => self.list,
                HeapData::Type(_) => self.type_,
                HeapData::Function(_) => self.function,
                HeapData::Method { .. } => self.method,
                HeapData::Instance { type_id, .. } => *type_id,
            },
        }
    }
}

/// Walks a type's own `base` chain (inclusive of itself) looking for
/// pointer equality with `target`. Used both by `is_instance` (applied to a
/// value's type) and by exception coercion (applied to a type value acting
/// as a class, to ask "is this type assignable to `BaseException`?").
#[must_use]
pub fn is_subtype(type_id: TypeId, target: TypeId, heap: &Heap) -> bool {
    let mut current = Some(type_id);
    while let Some(id) = current {
        if id == target {
            return true;
        }
        current = base_of(id, heap);
    }
    false
}

/// `is_instance(v, t)` (§4.1): walk `v`'s type's `base` chain looking for
/// pointer equality with `t`.
///
/// The walk starts at `v`'s type and climbs `base` links; it never
/// special-cases `v`'s own type pointer as an extra termination condition
/// beyond reaching the end of the chain (`object` has no base).
#[must_use]
pub fn is_instance(value: Value, target: TypeId, heap: &Heap, builtins: &BuiltinTypes) -> bool {
    is_subtype(builtins.type_of(value, heap), target, heap)
}

/// Reads a type object's own name — used by `object.__str__`'s fallback
/// rendering and by `BaseException.__str__`'s no-`msg` fallback.
///
/// # Panics
/// Panics if `type_id` does not point at a type object.
#[must_use]
pub fn type_name(type_id: TypeId, heap: &Heap) -> Box<str> {
    match heap.get(type_id) {
        HeapData::Type(data) => data.name.clone(),
        other => unreachable!("type id did not point at a type object: {other:?}"),
    }
}

fn base_of(type_id: TypeId, heap: &Heap) -> Option<TypeId> {
    match heap.get(type_id) {
        HeapData::Type(data) => data.base,
        other => unreachable!("type id did not point at a type object: {other:?}"),
    }
}
