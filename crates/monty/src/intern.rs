//! String interning for attribute and variable names.
//!
//! Attribute lookups happen on every `get_attribute`/`set_attribute` call, so
//! names are interned once (by the bootstrapping glue, or by whatever produced
//! the transpiled program) and compared afterwards as cheap `InternId`s instead
//! of re-hashing or re-comparing byte strings on every lookup.

use ahash::AHashMap;

/// Index into the interner's storage.
///
/// Uses `u32` to save space relative to `usize`; four billion distinct names
/// is far more than any program will ever intern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternId(u32);

/// Append-only table mapping names to `InternId`s and back.
///
/// There is no eviction: names live as long as the runtime does, matching the
/// rest of the object model's "nothing is ever freed" lifecycle (see the heap's
/// Non-goals around garbage collection).
#[derive(Debug, Default)]
pub struct Interns {
    strings: Vec<Box<str>>,
    lookup: AHashMap<Box<str>, InternId>,
}

impl Interns {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `name`, returning its stable id. Re-interning the same text
    /// returns the id handed out the first time.
    pub fn intern(&mut self, name: &str) -> InternId {
        if let Some(&id) = self.lookup.get(name) {
            return id;
        }
        let id = InternId(u32::try_from(self.strings.len()).expect("interned more than u32::MAX names"));
        self.strings.push(name.into());
        self.lookup.insert(name.into(), id);
        id
    }

    /// Resolves an `InternId` back to its text.
    ///
    /// # Panics
    /// Panics if `id` was not produced by this table.
    #[must_use]
    pub fn get(&self, id: InternId) -> &str {
        &self.strings[id.0 as usize]
    }
}

/// Dunder names the runtime itself needs to look up (descriptor protocol,
/// call protocol, construction, binary ops, comparisons…), interned once at
/// startup.
///
/// This is the neutral-language stand-in for the source runtime's
/// `KNOWN_GLOBAL` preprocessor mechanism (Design Notes §9): rather than
/// re-interning `"__get__"` on every attribute lookup, every component that
/// needs a well-known name is handed this table instead of a live `&mut
/// Interns` borrow.
#[derive(Debug, Clone, Copy)]
pub struct KnownNames {
    pub dunder_get: InternId,
    pub dunder_call: InternId,
    pub dunder_new: InternId,
    pub dunder_init: InternId,
    pub dunder_str: InternId,
    pub dunder_iter: InternId,
    pub dunder_next: InternId,
    pub dunder_name: InternId,
    pub msg: InternId,
    pub dunder_eq: InternId,
    pub dunder_ne: InternId,
    pub dunder_lt: InternId,
    pub dunder_le: InternId,
    pub dunder_gt: InternId,
    pub dunder_ge: InternId,
    pub dunder_add: InternId,
    pub dunder_sub: InternId,
    pub dunder_mul: InternId,
    pub dunder_truediv: InternId,
    pub dunder_floordiv: InternId,
    pub dunder_mod: InternId,
    pub dunder_pow: InternId,
    pub dunder_and: InternId,
    pub dunder_or: InternId,
    pub dunder_xor: InternId,
    pub dunder_lshift: InternId,
    pub dunder_rshift: InternId,
    pub dunder_matmul: InternId,
    pub dunder_getitem: InternId,
}

impl KnownNames {
    #[must_use]
    pub fn bootstrap(interns: &mut Interns) -> Self {
        Self {
            dunder_get: interns.intern("__get__"),
            dunder_call: interns.intern("__call__"),
            dunder_new: interns.intern("__new__"),
            dunder_init: interns.intern("__init__"),
            dunder_str: interns.intern("__str__"),
            dunder_iter: interns.intern("__iter__"),
            dunder_next: interns.intern("__next__"),
            dunder_name: interns.intern("__name__"),
            msg: interns.intern("msg"),
            dunder_eq: interns.intern("__eq__"),
            dunder_ne: interns.intern("__ne__"),
            dunder_lt: interns.intern("__lt__"),
            dunder_le: interns.intern("__le__"),
            dunder_gt: interns.intern("__gt__"),
            dunder_ge: interns.intern("__ge__"),
            dunder_add: interns.intern("__add__"),
            dunder_sub: interns.intern("__sub__"),
            dunder_mul: interns.intern("__mul__"),
            dunder_truediv: interns.intern("__truediv__"),
            dunder_floordiv: interns.intern("__floordiv__"),
            dunder_mod: interns.intern("__mod__"),
            dunder_pow: interns.intern("__pow__"),
            dunder_and: interns.intern("__and__"),
            dunder_or: interns.intern("__or__"),
            dunder_xor: interns.intern("__xor__"),
            dunder_lshift: interns.intern("__lshift__"),
            dunder_rshift: interns.intern("__rshift__"),
            dunder_matmul: interns.intern("__matmul__"),
            dunder_getitem: interns.intern("__getitem__"),
        }
    }

    /// Maps a binary-operator name (as used in error messages and by the
    /// `op_<name>` dispatch family, §4.6.1) to its dunder.
    #[must_use]
    pub fn binary_dunder(&self, op: BinaryOp) -> InternId {
        match op {
            BinaryOp::Add => self.dunder_add,
            BinaryOp::Sub => self.dunder_sub,
            BinaryOp::Mul => self.dunder_mul,
            BinaryOp::TrueDiv => self.dunder_truediv,
            BinaryOp::FloorDiv => self.dunder_floordiv,
            BinaryOp::Mod => self.dunder_mod,
            BinaryOp::Pow => self.dunder_pow,
            BinaryOp::And => self.dunder_and,
            BinaryOp::Or => self.dunder_or,
            BinaryOp::Xor => self.dunder_xor,
            BinaryOp::LShift => self.dunder_lshift,
            BinaryOp::RShift => self.dunder_rshift,
            BinaryOp::MatMul => self.dunder_matmul,
            BinaryOp::GetItem => self.dunder_getitem,
        }
    }
}

/// The binary operator family dispatched by `op_<name>` (§4.6.1): `+ & // <<
/// @ * % | ** >> - ^ []`. In-place variants share the same dunder in this
/// crate (the reflected/in-place `__iop__` protocol is deferred, §4.6.1
/// Note), so there is no separate in-place enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
pub enum BinaryOp {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    TrueDiv,
    #[strum(serialize = "//")]
    FloorDiv,
    #[strum(serialize = "%")]
    Mod,
    #[strum(serialize = "**")]
    Pow,
    #[strum(serialize = "&")]
    And,
    #[strum(serialize = "|")]
    Or,
    #[strum(serialize = "^")]
    Xor,
    #[strum(serialize = "<<")]
    LShift,
    #[strum(serialize = ">>")]
    RShift,
    #[strum(serialize = "@")]
    MatMul,
    #[strum(serialize = "[]")]
    GetItem,
}

impl BinaryOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        self.into()
    }
}

/// The six comparison opcodes (§4.6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::IntoStaticStr)]
pub enum CompareOp {
    #[strum(serialize = "==")]
    Eq,
    #[strum(serialize = "!=")]
    Ne,
    #[strum(serialize = "<")]
    Lt,
    #[strum(serialize = "<=")]
    Le,
    #[strum(serialize = ">")]
    Gt,
    #[strum(serialize = ">=")]
    Ge,
}

impl CompareOp {
    #[must_use]
    pub fn symbol(self) -> &'static str {
        self.into()
    }

    #[must_use]
    pub fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::Ne)
    }
}

impl KnownNames {
    /// Maps a comparison to the dunder consulted for it (§4.6.2 step 3).
    #[must_use]
    pub fn compare_dunder(&self, op: CompareOp) -> InternId {
        match op {
            CompareOp::Eq => self.dunder_eq,
            CompareOp::Ne => self.dunder_ne,
            CompareOp::Lt => self.dunder_lt,
            CompareOp::Le => self.dunder_le,
            CompareOp::Gt => self.dunder_gt,
            CompareOp::Ge => self.dunder_ge,
        }
    }
}
