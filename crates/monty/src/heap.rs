//! The page heap: a bump-allocated, never-freeing arena backing every
//! non-inline [`Value`](crate::value::Value).
//!
//! There is deliberately no garbage collector and no reference counting here
//! (contrast the refcounted heaps in the wider `monty` lineage this crate
//! descends from): objects live "until reset", matching a bump/page
//! allocator that a boot layer hands the runtime once and never reclaims
//! from mid-flight. [`Heap::alloc`] only ever grows `objects`.

use crate::types::TypeId;
use crate::value::{AttrTable, HeapData, NativeFn, ObjectId, TypeData, Value};

/// Configurable ceiling on heap growth.
///
/// The bare-metal target has a fixed pool of physical pages; `max_objects`
/// is this crate's stand-in for "ran out of pages". Exceeding it is a tier-1
/// fatal condition (allocation failure), not a recoverable exception.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeapLimits {
    pub max_objects: Option<usize>,
}

/// The arena. Indices handed out by [`Heap::alloc`] are stable for the life
/// of the heap — nothing is ever moved or removed.
#[derive(Debug)]
pub struct Heap {
    objects: Vec<HeapData>,
    limits: HeapLimits,
}

impl Heap {
    #[must_use]
    pub fn new(limits: HeapLimits) -> Self {
        Self { objects: Vec::new(), limits }
    }

    fn alloc(&mut self, data: HeapData) -> ObjectId {
        if let Some(max) = self.limits.max_objects {
            assert!(self.objects.len() < max, "heap exhausted: allocation would exceed {max} objects");
        }
        let id = ObjectId::new(self.objects.len());
        self.objects.push(data);
        id
    }

    #[must_use]
    pub fn get(&self, id: ObjectId) -> &HeapData {
        &self.objects[id.index()]
    }

    pub fn get_mut(&mut self, id: ObjectId) -> &mut HeapData {
        &mut self.objects[id.index()]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Allocates an immutable string value.
    pub fn alloc_str(&mut self, s: impl Into<String>) -> Value {
        Value::Object(self.alloc(HeapData::Str(s.into())))
    }

    /// Allocates a tuple from already-evaluated elements.
    pub fn alloc_tuple(&mut self, items: Vec<Value>) -> Value {
        Value::Object(self.alloc(HeapData::Tuple(items)))
    }

    /// Allocates a list from already-evaluated elements.
    pub fn alloc_list(&mut self, items: Vec<Value>) -> Value {
        Value::Object(self.alloc(HeapData::List(items)))
    }

    /// Allocates a native function value (§4.1 `alloc_function`).
    pub fn alloc_function(&mut self, f: NativeFn) -> Value {
        Value::Object(self.alloc(HeapData::Function(f)))
    }

    /// Allocates a bound method pairing a function pointer with its receiver
    /// (§4.1 `alloc_method`).
    pub fn alloc_method(&mut self, func: Value, bound: Value) -> Value {
        Value::Object(self.alloc(HeapData::Method { func, bound }))
    }

    /// Allocates a new type object with the given base (`None` only for the
    /// root `object` type) and an empty class namespace (§4.1 `alloc_type`).
    pub fn alloc_type(&mut self, name: impl Into<Box<str>>, base: Option<TypeId>, is_intrinsic: bool) -> Value {
        let data = TypeData { name: name.into(), base, class_attributes: AttrTable::new(), is_intrinsic };
        Value::Object(self.alloc(HeapData::Type(data)))
    }

    /// Allocates an empty non-intrinsic instance of `type_id` (§4.1
    /// `alloc_object`; also the body of `object.__new__`).
    pub fn alloc_object(&mut self, type_id: TypeId) -> Value {
        Value::Object(self.alloc(HeapData::Instance { type_id, attrs: AttrTable::new() }))
    }
}
