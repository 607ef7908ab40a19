//! Code generation context.
//!
//! Mirrors the checker's own scope-stack design: a stack of name tables
//! that the generator pushes/pops as it walks into functions and blocks, so
//! a variable lookup always resolves to the nearest enclosing declaration.
//! Where the teacher's LLVM backend accumulated `inkwell` values in its
//! scopes, this backend accumulates target-language source text in two
//! growable buffers (`declare`/`define`) and resolves names to their
//! already-mangled target-language identifier.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use sha2::{Digest, Sha256};

use crate::checker::types::Type;

use super::naming;

/// Accumulates emitted target-language source across the two code
/// generation passes: `declare` collects forward
/// declarations (opaque struct shells, function signatures, vtable
/// skeletons), `define` collects bodies, vtables, closure classes and
/// tests. The final program text is `declare` followed by `define`.
#[derive(Default)]
pub struct TargetWriter {
    declare: String,
    define: String,
}

impl TargetWriter {
    pub fn declare_line(&mut self, line: impl AsRef<str>) {
        self.declare.push_str(line.as_ref());
        self.declare.push('\n');
    }

    pub fn define_line(&mut self, line: impl AsRef<str>) {
        self.define.push_str(line.as_ref());
        self.define.push('\n');
    }

    /// Renders the full translation unit: declarations, then definitions.
    pub fn render(&self) -> String {
        format!("{}\n{}", self.declare, self.define)
    }
}

#[derive(Default, Debug, Clone)]
pub struct Scope {
    variables: HashMap<String, String>,
    functions: HashMap<String, String>,
    constants: HashMap<String, String>,
}

/// Per-compilation state threaded through every `codegen` call: the two
/// output buffers, the lexical scope stack, and the lazily-populated sets
/// of structural types (variants, ranges, tuples) that need a declaration
/// emitted exactly once regardless of how many call sites reference them.
pub struct CodegenContext {
    pub writer: RefCell<TargetWriter>,
    scopes: RefCell<Vec<Scope>>,
    emitted_variants: RefCell<HashMap<String, String>>,
    emitted_ranges: RefCell<HashMap<String, String>>,
    emitted_tuples: RefCell<HashMap<String, String>>,
    lambda_counter: Cell<usize>,
    pub test_functions: RefCell<Vec<String>>,
    methods: RefCell<HashMap<String, String>>,
}

impl Default for CodegenContext {
    fn default() -> Self {
        CodegenContext {
            writer: RefCell::new(TargetWriter::default()),
            scopes: RefCell::new(vec![Scope::default()]),
            emitted_variants: RefCell::new(HashMap::new()),
            emitted_ranges: RefCell::new(HashMap::new()),
            emitted_tuples: RefCell::new(HashMap::new()),
            lambda_counter: Cell::new(0),
            test_functions: RefCell::new(Vec::new()),
            methods: RefCell::new(HashMap::new()),
        }
    }
}

impl CodegenContext {
    pub fn enter_scope(&self) {
        self.scopes.borrow_mut().push(Scope::default());
    }

    pub fn exit_scope(&self) {
        self.scopes.borrow_mut().pop();
    }

    pub fn store_variable(&self, name: impl ToString, mangled: impl ToString) {
        if let Some(scope) = self.scopes.borrow_mut().last_mut() {
            scope.variables.insert(name.to_string(), mangled.to_string());
        }
    }

    pub fn find_variable(&self, name: &str) -> String {
        self.scopes
            .borrow()
            .iter()
            .rev()
            .find_map(|scope| scope.variables.get(name).cloned())
            .unwrap_or_else(|| naming::mangle(name))
    }

    pub fn store_function(&self, name: impl ToString, mangled: impl ToString) {
        if let Some(scope) = self.scopes.borrow_mut().last_mut() {
            scope.functions.insert(name.to_string(), mangled.to_string());
        }
    }

    pub fn find_function(&self, name: &str) -> String {
        self.scopes
            .borrow()
            .iter()
            .rev()
            .find_map(|scope| scope.functions.get(name).cloned())
            .unwrap_or_else(|| naming::mangle(name))
    }

    pub fn store_constant(&self, name: impl ToString, mangled: impl ToString) {
        if let Some(scope) = self.scopes.borrow_mut().last_mut() {
            scope.constants.insert(name.to_string(), mangled.to_string());
        }
    }

    pub fn find_constant(&self, name: &str) -> Option<String> {
        self.scopes
            .borrow()
            .iter()
            .rev()
            .find_map(|scope| scope.constants.get(name).cloned())
    }

    /// Registers the mangled free-function name that implements `method_name`
    /// on `type_name`, keyed so call sites can resolve `receiver.method(...)`
    /// without a nominal member-function lookup in the target language.
    pub fn store_method(&self, type_name: &str, method_name: &str, mangled: String) {
        self.methods
            .borrow_mut()
            .insert(format!("{type_name}.{method_name}"), mangled);
    }

    pub fn find_method(&self, type_name: &str, method_name: &str) -> Option<String> {
        self.methods
            .borrow()
            .get(&format!("{type_name}.{method_name}"))
            .cloned()
    }

    /// Next unique name for an anonymous lambda's closure class.
    pub fn next_lambda_name(&self) -> String {
        let n = self.lambda_counter.get();
        self.lambda_counter.set(n + 1);
        format!("Lambda_{n}")
    }

    /// Stable hash used as a variant/behaviour dynamic-type tag: the tag of
    /// a value always equals the hash of its dynamic type's canonical form.
    pub fn type_tag(canonical: &str) -> u64 {
        let digest = Sha256::digest(canonical.as_bytes());
        u64::from_be_bytes(digest[0..8].try_into().expect("sha256 digest is 32 bytes"))
    }

    /// Returns the (mangled) struct name for a variant over `members`,
    /// emitting its declaration/definition the first time it is requested.
    /// Keyed by canonical string so two call sites referencing the same
    /// member set share one emitted type.
    pub fn ensure_variant(&self, members: &[Type]) -> String {
        let canonical = Type::Variant(members.to_vec()).canonical();
        if let Some(name) = self.emitted_variants.borrow().get(&canonical) {
            return name.clone();
        }

        let name = format!("Variant_{:016x}", Self::type_tag(&canonical));
        self.emitted_variants
            .borrow_mut()
            .insert(canonical, name.clone());
        super::types::emit_variant(self, &name, members);
        name
    }

    /// Returns the (mangled) wrapper struct name for `range(inner)`,
    /// emitting its declaration/definition the first time it is requested.
    pub fn ensure_range(&self, inner: &Type) -> String {
        let canonical = inner.canonical();
        if let Some(name) = self.emitted_ranges.borrow().get(&canonical) {
            return name.clone();
        }

        let name = format!("Range_{:016x}", Self::type_tag(&canonical));
        self.emitted_ranges
            .borrow_mut()
            .insert(canonical, name.clone());
        super::types::emit_range(self, &name, inner);
        name
    }

    /// Returns the (mangled) struct name for an anonymous structural tuple,
    /// emitting its declaration/definition the first time it is requested.
    pub fn ensure_tuple(&self, members: &[Type]) -> String {
        let canonical = Type::Tuple(members.to_vec()).canonical();
        if let Some(name) = self.emitted_tuples.borrow().get(&canonical) {
            return name.clone();
        }

        let name = format!("Tuple_{:016x}", Self::type_tag(&canonical));
        self.emitted_tuples
            .borrow_mut()
            .insert(canonical, name.clone());
        super::types::emit_tuple(self, &name, members);
        name
    }
}
