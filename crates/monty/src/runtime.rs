//! Top-level runtime: owns the heap and the bootstrapped built-ins, and
//! implements the main-entry/uncaught-exception contract (§4.7, §7
//! "User-visible failure").

use std::cell::RefCell;
use std::rc::Rc;

use crate::builtins::{self, Builtins};
use crate::exception::RunError;
use crate::heap::{Heap, HeapLimits};
use crate::intern::{InternId, Interns, KnownNames};
use crate::terminal::Terminal;
use crate::value::{HeapData, Value};

/// Bundles everything C7 bootstraps plus the heap and interner it bootstraps
/// them into — the one object a host program (the CLI, or a test) needs to
/// run a transpiled entry point.
pub struct Runtime {
    pub heap: Heap,
    pub interns: Interns,
    pub names: KnownNames,
    pub builtins: Builtins,
    terminal: Rc<RefCell<dyn Terminal>>,
}

impl Runtime {
    /// Initializes the heap and terminal, then registers every static type
    /// object and the fixed global namespace (§4.7: "initialize physical
    /// page allocator, initialize terminal, then register all static type
    /// objects" — the page allocator and terminal device itself are the
    /// boot layer's concern, out of scope here; this is everything after).
    #[must_use]
    pub fn new(terminal: impl Terminal + 'static, limits: HeapLimits) -> Self {
        Self::with_shared_terminal(Rc::new(RefCell::new(terminal)), limits)
    }

    /// As [`Runtime::new`], but takes an already-shared terminal handle —
    /// used by callers (tests, mainly) that need to keep their own clone of
    /// the `Rc` to inspect captured output after the fact.
    #[must_use]
    pub fn with_shared_terminal(terminal: Rc<RefCell<dyn Terminal>>, limits: HeapLimits) -> Self {
        let mut heap = Heap::new(limits);
        let mut interns = Interns::new();
        let names = KnownNames::bootstrap(&mut interns);
        let builtins = builtins::bootstrap(&mut heap, &mut interns, &names, terminal.clone());
        Self { heap, interns, names, builtins, terminal }
    }

    /// Looks up a name in the fixed global namespace (built-in types,
    /// `print`, `__build_class__`, `isinstance`), interning it first so
    /// repeated lookups of the same name are idempotent.
    pub fn global(&mut self, name: &str) -> Option<Value> {
        let id = self.interns.intern(name);
        self.builtins.globals.get(&id).copied()
    }

    /// Runs the transpiled program's entry point (§4.7): a single callable
    /// matching the native signature (§4.3), invoked with no arguments.
    ///
    /// On an uncaught exception, prints the two-line message §7 specifies
    /// ("User-visible failure: ... print two lines — a fixed prefix and the
    /// stringified exception — then hang"). This host-testable runtime
    /// returns after printing instead of hanging — there is no kernel here
    /// to halt, and a caller (the CLI, or a test) needs `run_main` to give
    /// control back.
    pub fn run_main(&mut self, main: Value) {
        let result = crate::callable::call(main, &[], &[], None, &mut self.heap, &self.builtins.types, &self.names);
        if let Err(RunError(exc)) = result {
            self.report_uncaught(exc);
        }
    }

    fn report_uncaught(&mut self, exc: Value) {
        let text = self.stringify(exc);
        let mut terminal = self.terminal.borrow_mut();
        terminal.println("Unhandled exception:");
        terminal.println(&text);
    }

    /// Best-effort `str()` used only by the uncaught-exception handler: a
    /// failure while stringifying the exception itself must not panic the
    /// reporting path, so any error collapses to a placeholder.
    fn stringify(&mut self, value: Value) -> String {
        let resolved =
            crate::attr::get_method_attribute(value, self.names.dunder_str, &mut self.heap, &self.builtins.types, &self.names);
        let Ok(Some((func, unbound))) = resolved else {
            return "<object>".to_string();
        };
        let self_for_call = unbound.then_some(value);
        let Ok(Value::Object(id)) =
            crate::callable::call(func, &[], &[], self_for_call, &mut self.heap, &self.builtins.types, &self.names)
        else {
            return "<object>".to_string();
        };
        match self.heap.get(id) {
            HeapData::Str(s) => s.clone(),
            _ => "<object>".to_string(),
        }
    }

    /// Interns `name` — a thin pass-through used by callers assembling a
    /// transpiled frame's attribute names ahead of time.
    pub fn intern(&mut self, name: &str) -> InternId {
        self.interns.intern(name)
    }
}
