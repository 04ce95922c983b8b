//! The tagged value representation (§3 "Value (C1)").
//!
//! A `Value` is conceptually a pair of (type pointer, payload); here the type
//! pointer is implicit in which variant a value is — `Bool`/`Int`/`Float`/
//! `None` carry their type identity inline (no allocation, no indirection),
//! everything else is an [`ObjectId`] into the [`Heap`](crate::heap::Heap),
//! whose [`HeapData`] tag supplies the payload *and* determines the type.
//!
//! `Value` is `Copy`: it is the thing that lives on the operand stack, gets
//! passed by value through the call protocol, and gets duplicated by `COPY`.
//! There is no destructor to run and nothing to reference-count — objects
//! are reclaimed only when the whole heap is reset.

use std::fmt;
use std::rc::Rc;

use crate::intern::InternId;
use crate::types::TypeId;

/// Index into [`Heap`](crate::heap::Heap)'s object vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(u32);

impl ObjectId {
    pub(crate) fn new(index: usize) -> Self {
        Self(u32::try_from(index).expect("heap grew past u32::MAX objects"))
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Ordered, insertion-position-preserving attribute table.
///
/// Backs both the instance attribute table and a type's `class_attributes`
/// (§3). `IndexMap` gives O(1) lookup while preserving "overwrite keeps the
/// slot's position, first insert grows the table by one" — the one
/// observable property a linear-scan attribute table would have too; a
/// small ordered map is an allowed substitute for a literal linear scan.
pub type AttrTable = indexmap::IndexMap<InternId, Value>;

/// A native callable: the one shape every function pointer the runtime
/// invokes has (§4.3). Boxed in an `Rc` rather than a bare `fn` pointer
/// because class bodies and bound closures created at class-construction
/// time need to capture state (the new type object, a captured default,
/// and so on) — a bare `fn` can't do that, and this runtime has no bytecode
/// compiler emitting one fixed function per definition.
///
/// Alongside the three parameters a callable's own signature names (self,
/// positional args, keyword args), every native callable also receives the
/// built-in type registry and the well-known-name table: both are the
/// `KNOWN_GLOBAL`-style static registration tables Design Notes §9
/// describes, populated once at startup and threaded everywhere rather than
/// looked up by name at each call site.
pub type NativeFn = Rc<
    dyn Fn(
        &mut crate::heap::Heap,
        &crate::types::BuiltinTypes,
        &crate::intern::KnownNames,
        Option<Value>,
        &[Value],
        &[(InternId, Value)],
    ) -> crate::exception::RunResult<Value>,
>;

/// Payload of a type object (§3 "TypeData").
pub struct TypeData {
    pub name: Box<str>,
    pub base: Option<TypeId>,
    pub class_attributes: AttrTable,
    pub is_intrinsic: bool,
}

/// Everything that lives behind an [`ObjectId`] (§3's non-inline payload
/// variants, plus the catch-all "ordered sequence of (name, value)" used for
/// user-defined instances).
pub enum HeapData {
    Str(String),
    Tuple(Vec<Value>),
    List(Vec<Value>),
    Type(TypeData),
    Function(NativeFn),
    Method { func: Value, bound: Value },
    Instance { type_id: TypeId, attrs: AttrTable },
}

impl fmt::Debug for HeapData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::Tuple(items) => write!(f, "Tuple({items:?})"),
            Self::List(items) => write!(f, "List({items:?})"),
            Self::Type(t) => write!(f, "Type({:?}, intrinsic={})", t.name, t.is_intrinsic),
            Self::Function(_) => write!(f, "Function(<native>)"),
            Self::Method { bound, .. } => write!(f, "Method(bound={bound:?})"),
            Self::Instance { type_id, attrs } => write!(f, "Instance({type_id:?}, {} attrs)", attrs.len()),
        }
    }
}

/// The tagged value record itself.
#[derive(Debug, Clone, Copy)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// str, tuple, list, type, function, method, or a user-defined instance —
    /// distinguished by the [`HeapData`] variant it points at.
    Object(ObjectId),
}

impl Value {
    /// Pointer-equality / identity (Invariant T4: `None`'s equality predicate).
    #[must_use]
    pub fn is(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Object(a), Self::Object(b)) => a == b,
            _ => false,
        }
    }
}
