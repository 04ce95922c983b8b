//! Bootstrapping glue (§4.7 "Bootstrapping Glue (C7)"): allocates every
//! static built-in type object, wires their class attributes, and builds the
//! fixed global namespace transpiled code resolves names against.
//!
//! Built-in *type* objects (`object`, `str`, `Exception`, …) are themselves
//! exposed as globals alongside `print`/`__build_class__`/`isinstance` — a
//! class body referencing a base class by name, or `raise Exception(...)`,
//! needs somewhere to find them, and there is no module/import machinery in
//! scope (§1) to resolve such a lookup any other way. This is the
//! `KNOWN_GLOBAL`-style static registration table Design Notes §9 describes.

use std::cell::RefCell;
use std::rc::Rc;

use crate::heap::Heap;
use crate::intern::{Interns, KnownNames};
use crate::terminal::Terminal;
use crate::types::BuiltinTypes;
use crate::value::{AttrTable, HeapData, Value};

/// Everything C7 produces: the built-in type handles and the fixed global
/// namespace (`print`, `__build_class__`, `isinstance`, plus every built-in
/// type by name).
pub struct Builtins {
    pub types: BuiltinTypes,
    pub globals: AttrTable,
}

/// Allocates and wires every built-in type, then builds the global namespace.
///
/// `terminal` is captured by the `print` closure — the native callable
/// signature (§4.3) has no terminal parameter, so the sink rides along as
/// bound state the same way a class-body thunk captures the new type object
/// (see [`crate::value::NativeFn`]'s doc comment).
pub fn bootstrap(heap: &mut Heap, interns: &mut Interns, names: &KnownNames, terminal: Rc<RefCell<dyn Terminal>>) -> Builtins {
    let Value::Object(object) = heap.alloc_type("object", None, false) else { unreachable!() };
    let Value::Object(type_) = heap.alloc_type("type", Some(object), true) else { unreachable!() };
    let Value::Object(bool_) = heap.alloc_type("bool", Some(object), true) else { unreachable!() };
    let Value::Object(int) = heap.alloc_type("int", Some(object), true) else { unreachable!() };
    let Value::Object(float) = heap.alloc_type("float", Some(object), true) else { unreachable!() };
    let Value::Object(str_) = heap.alloc_type("str", Some(object), true) else { unreachable!() };
    let Value::Object(tuple) = heap.alloc_type("tuple", Some(object), true) else { unreachable!() };
    let Value::Object(list) = heap.alloc_type("list", Some(object), true) else { unreachable!() };
    let Value::Object(none_type) = heap.alloc_type("NoneType", Some(object), true) else { unreachable!() };
    let Value::Object(function) = heap.alloc_type("function", Some(object), true) else { unreachable!() };
    let Value::Object(method) = heap.alloc_type("method", Some(object), true) else { unreachable!() };
    let Value::Object(base_exception) = heap.alloc_type("BaseException", Some(object), false) else { unreachable!() };
    let Value::Object(exception) = heap.alloc_type("Exception", Some(base_exception), false) else { unreachable!() };
    let Value::Object(stop_iteration) = heap.alloc_type("StopIteration", Some(exception), false) else { unreachable!() };
    let Value::Object(type_error) = heap.alloc_type("TypeError", Some(exception), false) else { unreachable!() };

    let types = BuiltinTypes {
        object,
        type_,
        bool_,
        int,
        float,
        str_,
        tuple,
        list,
        none_type,
        function,
        method,
        base_exception,
        exception,
        stop_iteration,
        type_error,
    };

    wire_class_attributes(heap, names, &types);

    let mut globals = AttrTable::new();

    let build_class_fn = heap.alloc_function(Rc::new(crate::class_builder::build_class));
    let isinstance_fn = heap.alloc_function(Rc::new(isinstance));
    let print_fn = heap.alloc_function(make_print(terminal));

    globals.insert(interns.intern("__build_class__"), build_class_fn);
    globals.insert(interns.intern("isinstance"), isinstance_fn);
    globals.insert(interns.intern("print"), print_fn);
    globals.insert(interns.intern("object"), Value::Object(object));
    globals.insert(interns.intern("type"), Value::Object(type_));
    globals.insert(interns.intern("bool"), Value::Object(bool_));
    globals.insert(interns.intern("int"), Value::Object(int));
    globals.insert(interns.intern("float"), Value::Object(float));
    globals.insert(interns.intern("str"), Value::Object(str_));
    globals.insert(interns.intern("tuple"), Value::Object(tuple));
    globals.insert(interns.intern("list"), Value::Object(list));
    globals.insert(interns.intern("function"), Value::Object(function));
    globals.insert(interns.intern("method"), Value::Object(method));
    globals.insert(interns.intern("BaseException"), Value::Object(base_exception));
    globals.insert(interns.intern("Exception"), Value::Object(exception));
    globals.insert(interns.intern("StopIteration"), Value::Object(stop_iteration));
    globals.insert(interns.intern("TypeError"), Value::Object(type_error));

    Builtins { types, globals }
}

fn wire_class_attributes(heap: &mut Heap, names: &KnownNames, types: &BuiltinTypes) {
    let object = Value::Object(types.object);
    set(heap, object, names.dunder_new, Rc::new(crate::class_builder::object_new));
    set(heap, object, names.dunder_init, Rc::new(crate::class_builder::object_init));
    set(heap, object, names.dunder_str, Rc::new(crate::class_builder::object_str));

    set(heap, Value::Object(types.type_), names.dunder_call, Rc::new(crate::class_builder::type_call));
    set(heap, Value::Object(types.function), names.dunder_get, Rc::new(crate::class_builder::function_get));

    set(heap, Value::Object(types.bool_), names.dunder_str, Rc::new(bool_str));
    set(heap, Value::Object(types.none_type), names.dunder_str, Rc::new(none_str));
    set(heap, Value::Object(types.str_), names.dunder_str, Rc::new(str_str));
    set(heap, Value::Object(types.str_), names.dunder_new, Rc::new(str_new));

    set(heap, Value::Object(types.base_exception), names.dunder_init, Rc::new(base_exception_init));
    set(heap, Value::Object(types.base_exception), names.dunder_str, Rc::new(base_exception_str));
}

fn set(heap: &mut Heap, target: Value, name: crate::intern::InternId, f: crate::value::NativeFn) {
    let func = heap.alloc_function(f);
    crate::attr::set_attribute(target, name, func, heap);
}

/// `bool.__str__` — satisfies §8's round-trip property that `True`/`False`
/// stringify to those exact words.
fn bool_str(
    heap: &mut Heap,
    _builtins: &BuiltinTypes,
    _names: &KnownNames,
    self_arg: Option<Value>,
    _args: &[Value],
    _kwargs: &[(crate::intern::InternId, Value)],
) -> crate::exception::RunResult<Value> {
    let Some(Value::Bool(b)) = self_arg else { unreachable!("bool.__str__ requires a bool self") };
    Ok(heap.alloc_str(if b { "True" } else { "False" }))
}

/// `NoneType.__str__` — satisfies §8's round-trip property that `None`
/// stringifies to `"None"`. `object.__str__`'s generic fallback would instead
/// produce `<NoneType object>`, so `NoneType` needs its own override the way
/// `bool` and `str` get theirs.
fn none_str(
    heap: &mut Heap,
    _builtins: &BuiltinTypes,
    _names: &KnownNames,
    _self_arg: Option<Value>,
    _args: &[Value],
    _kwargs: &[(crate::intern::InternId, Value)],
) -> crate::exception::RunResult<Value> {
    Ok(heap.alloc_str("None"))
}

/// `str.__str__` (grounded in `objects.c`'s `CLASS_METHOD(str, __str__)`):
/// returns `self` unchanged, satisfying §8's "`str(s)` yields `s` by
/// identity" round-trip property.
fn str_str(
    _heap: &mut Heap,
    _builtins: &BuiltinTypes,
    _names: &KnownNames,
    self_arg: Option<Value>,
    _args: &[Value],
    _kwargs: &[(crate::intern::InternId, Value)],
) -> crate::exception::RunResult<Value> {
    Ok(self_arg.expect("str.__str__ requires self"))
}

/// `str.__new__(cls, value)` (grounded in `objects.c`'s
/// `CLASS_METHOD(str, __new__)`): calling the `str` type is how user code
/// stringifies a value (scenario 3's `str(A("hi"))`). Resolves and invokes
/// `value.__str__` directly rather than going through the generic
/// allocate-then-`__init__` path `type.__call__` otherwise takes — the
/// source does the same, since the result of `__str__` already *is* the
/// `str` instance to hand back.
fn str_new(
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
    _self_arg: Option<Value>,
    args: &[Value],
    _kwargs: &[(crate::intern::InternId, Value)],
) -> crate::exception::RunResult<Value> {
    if args.len() != 1 {
        return Err(crate::exception::type_error("str() takes exactly one argument", builtins, heap, names));
    }
    let value = args[0];
    match crate::attr::get_method_attribute(value, names.dunder_str, heap, builtins, names)? {
        Some((func, unbound)) => {
            let self_for_call = unbound.then_some(value);
            crate::callable::call(func, &[], &[], self_for_call, heap, builtins, names)
        }
        None => Ok(heap.alloc_str("<object>")),
    }
}

/// `BaseException.__init__(self, msg?)` (§3 Exception hierarchy): at most
/// one positional argument, stored as the `msg` attribute when present.
fn base_exception_init(
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
    self_arg: Option<Value>,
    args: &[Value],
    _kwargs: &[(crate::intern::InternId, Value)],
) -> crate::exception::RunResult<Value> {
    if args.len() > 1 {
        return Err(crate::exception::type_error("BaseException.__init__ takes at most one argument", builtins, heap, names));
    }
    if let Some(&msg) = args.first() {
        let instance = self_arg.expect("BaseException.__init__ requires self");
        crate::attr::set_attribute(instance, names.msg, msg, heap);
    }
    Ok(Value::None)
}

/// `BaseException.__str__` (§3): returns `msg` if present, else the
/// exception's own type name (§10.6 supplement, `runtime/exceptions.c`).
fn base_exception_str(
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
    self_arg: Option<Value>,
    _args: &[Value],
    _kwargs: &[(crate::intern::InternId, Value)],
) -> crate::exception::RunResult<Value> {
    let instance = self_arg.expect("BaseException.__str__ requires self");
    match crate::attr::instance_attr(instance, names.msg, heap) {
        Some(msg) => Ok(msg),
        None => {
            let type_id = builtins.type_of(instance, heap);
            let name = crate::types::type_name(type_id, heap);
            Ok(heap.alloc_str(name))
        }
    }
}

/// `isinstance(obj, type)` (§10.6 supplement): exposed as a real builtin
/// function rather than only an evaluator-internal primitive, since §8
/// scenario 4 explicitly allows either route.
fn isinstance(
    heap: &mut Heap,
    builtins: &BuiltinTypes,
    names: &KnownNames,
    _self_arg: Option<Value>,
    args: &[Value],
    _kwargs: &[(crate::intern::InternId, Value)],
) -> crate::exception::RunResult<Value> {
    if args.len() != 2 {
        return Err(crate::exception::type_error("isinstance expected 2 arguments", builtins, heap, names));
    }
    let (value, type_arg) = (args[0], args[1]);
    let Value::Object(type_id) = type_arg else {
        return Err(crate::exception::type_error("isinstance() arg 2 must be a type", builtins, heap, names));
    };
    if !matches!(heap.get(type_id), HeapData::Type(_)) {
        return Err(crate::exception::type_error("isinstance() arg 2 must be a type", builtins, heap, names));
    }
    Ok(Value::Bool(crate::types::is_instance(value, type_id, heap, builtins)))
}

/// `print(...)` (§4.7, §1 — one of the only two required builtins).
///
/// Zero arguments emits a bare newline; more than one argument, or an
/// argument that isn't already a `str`, is a fatal precondition violation
/// (accepting arbitrary argument counts and non-`str` arguments is each a
/// known future extension, not implemented here) rather than a recoverable
/// exception — callers are expected to have already called `str(...)`
/// themselves (scenario 3).
fn make_print(terminal: Rc<RefCell<dyn Terminal>>) -> crate::value::NativeFn {
    Rc::new(move |heap, _builtins, _names, _self_arg, args, _kwargs| {
        if args.is_empty() {
            terminal.borrow_mut().newline();
            return Ok(Value::None);
        }
        assert!(args.len() == 1, "more than one argument is not yet supported for print()");
        let Value::Object(id) = args[0] else {
            panic!("expected a 'str' argument for print()");
        };
        let HeapData::Str(text) = heap.get(id) else {
            panic!("expected a 'str' argument for print()");
        };
        terminal.borrow_mut().println(text);
        Ok(Value::None)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::HeapLimits;
    use crate::terminal::CapturingTerminal;
    use pretty_assertions::assert_eq;

    fn bootstrap_test() -> (Heap, Builtins, KnownNames, Interns, Rc<RefCell<CapturingTerminal>>) {
        let mut heap = Heap::new(HeapLimits::default());
        let mut interns = Interns::new();
        let names = KnownNames::bootstrap(&mut interns);
        let terminal = Rc::new(RefCell::new(CapturingTerminal::new()));
        let builtins = bootstrap(&mut heap, &mut interns, &names, terminal.clone());
        (heap, builtins, names, interns, terminal)
    }

    #[test]
    fn print_with_no_args_emits_a_blank_line() {
        let (mut heap, builtins, names, mut interns, terminal) = bootstrap_test();
        let print_fn = *builtins.globals.get(&interns.intern("print")).unwrap();
        crate::callable::call(print_fn, &[], &[], None, &mut heap, &builtins.types, &names).unwrap();
        assert_eq!(terminal.borrow().lines, vec![String::new()]);
    }

    #[test]
    fn isinstance_true_across_a_base_chain() {
        let (mut heap, builtins, names, _interns, _terminal) = bootstrap_test();
        let a = heap.alloc_type("A", Some(builtins.types.object), false);
        let Value::Object(a_id) = a else { unreachable!() };
        let b_instance = heap.alloc_object(a_id);
        let result = isinstance(&mut heap, &builtins.types, &names, None, &[b_instance, a], &[]).unwrap();
        assert!(matches!(result, Value::Bool(true)));
    }

    #[test]
    fn get_attribute_on_a_class_method_binds_it_through_function_get() {
        let (mut heap, builtins, names, mut interns, _terminal) = bootstrap_test();
        let cls = heap.alloc_type("Cls", Some(builtins.types.object), false);
        let method_name = interns.intern("double");
        let double = heap.alloc_function(Rc::new(|_h: &mut Heap, _b: &_, _n: &_, self_arg, _a: &[Value], _k: &[(crate::intern::InternId, Value)]| {
            Ok(self_arg.expect("double receives self"))
        }));
        crate::attr::set_attribute(cls, method_name, double, &mut heap);
        let Value::Object(cls_id) = cls else { unreachable!() };
        let instance = heap.alloc_object(cls_id);

        let bound = crate::attr::get_attribute(instance, method_name, &mut heap, &builtins.types, &names).unwrap().unwrap();
        let Value::Object(bound_id) = bound else { panic!("bound method is not a heap object") };
        assert!(matches!(heap.get(bound_id), HeapData::Method { .. }));

        let result = crate::callable::call(bound, &[], &[], None, &mut heap, &builtins.types, &names).unwrap();
        assert!(instance.is(&result));
    }

    #[test]
    fn none_str_and_bool_str_match_python_literals() {
        let (mut heap, builtins, names, _interns, _terminal) = bootstrap_test();
        let rendered = none_str(&mut heap, &builtins.types, &names, None, &[], &[]).unwrap();
        let Value::Object(id) = rendered else { unreachable!() };
        assert!(matches!(heap.get(id), HeapData::Str(s) if s == "None"));

        let rendered = bool_str(&mut heap, &builtins.types, &names, Some(Value::Bool(true)), &[], &[]).unwrap();
        let Value::Object(id) = rendered else { unreachable!() };
        assert!(matches!(heap.get(id), HeapData::Str(s) if s == "True"));
    }
}
