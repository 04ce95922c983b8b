//! Demonstrates the transpiler ABI (§6) by hand-assembling one of the
//! programs a code generator would emit, since source-level parsing is out
//! of scope for this crate (§1): a class with `__init__`/`__str__`,
//! instantiated and printed.
//!
//! Equivalent Python:
//! ```python
//! class A:
//!     def __init__(self, x):
//!         self.x = x
//!     def __str__(self):
//!         return self.x
//! print(str(A("hi")))
//! ```

use std::process::ExitCode;
use std::rc::Rc;

use monty::heap::HeapLimits;
use monty::intern::InternId;
use monty::terminal::StdTerminal;
use monty::value::Value;
use monty::Runtime;

fn main() -> ExitCode {
    let mut rt = Runtime::new(StdTerminal, HeapLimits::default());

    let x_attr = rt.intern("x");
    let init = rt.heap.alloc_function(Rc::new(move |heap: &mut monty::Heap, _b: &_, _n: &_, self_arg, args: &[Value], _k: &[(InternId, Value)]| {
        let instance = self_arg.expect("A.__init__ requires self");
        monty::attr::set_attribute(instance, x_attr, args[0], heap);
        Ok(Value::None)
    }));
    let str_method = rt.heap.alloc_function(Rc::new(move |heap: &mut monty::Heap, builtins, names, self_arg, _args: &[Value], _k: &[(InternId, Value)]| {
        let instance = self_arg.expect("A.__str__ requires self");
        monty::attr::get_attribute(instance, x_attr, heap, builtins, names).map(|v| v.expect("x was set by __init__"))
    }));
    let body = rt.heap.alloc_function(Rc::new(move |heap: &mut monty::Heap, _b: &_, names: &_, self_arg, _a: &[Value], _k: &[(InternId, Value)]| {
        let new_type = self_arg.expect("class body receives the new type as self");
        monty::attr::set_attribute(new_type, names.dunder_init, init, heap);
        monty::attr::set_attribute(new_type, names.dunder_str, str_method, heap);
        Ok(Value::None)
    }));
    let name = rt.heap.alloc_str("A");
    let class_a = monty::class_builder::build_class(&mut rt.heap, &rt.builtins.types, &rt.names, None, &[body, name], &[])
        .expect("class A has no way to fail to build");

    let str_fn = rt.global("str").expect("str is a registered builtin");
    let print_fn = rt.global("print").expect("print is a registered builtin");

    // The single transpiled entry point §4.7 describes: `print(str(A("hi")))`.
    let main_entry = rt.heap.alloc_function(Rc::new(move |heap: &mut monty::Heap, builtins, names, _self, _args: &[Value], _k: &[(InternId, Value)]| {
        let greeting = heap.alloc_str("hi");
        let instance = monty::callable::call(class_a, &[greeting], &[], None, heap, builtins, names)?;
        let stringified = monty::callable::call(str_fn, &[instance], &[], None, heap, builtins, names)?;
        monty::callable::call(print_fn, &[stringified], &[], None, heap, builtins, names)
    }));

    rt.run_main(main_entry);
    ExitCode::SUCCESS
}
