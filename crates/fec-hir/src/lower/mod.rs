//! AST->HIR lowering (C7, spec.md sec 4.4). Pure transformation: the whole
//! AST is moved in and never observed again (spec.md sec 3 "Lifecycle").

mod expr;
mod fixup;
mod items;
mod namespace;
mod pattern;
mod types;

use rustc_hash::FxHashMap;

use fec_common::{Sink, Span};
use fec_parser::ast;

use crate::hir;
use namespace::{ModuleScope, Namespaces};

/// Threads the mutable state a pre-order lowering visitor needs: the
/// in-scope generics and local-variable binder (spec.md sec 9 "Visitor
/// control flow": "threads mutable state... must release every push on
/// every exit path"), plus the slot/id counters and module-namespace chain
/// that back spec.md sec 2 C7's "resolving name kinds" responsibility (see
/// `lower::namespace`'s module doc comment).
pub struct Lowerer<'a> {
    pub sink: &'a mut dyn Sink,
    pub crate_name: String,
    modules: ModuleScope,
    locals: Vec<FxHashMap<String, u32>>,
    next_slot: u32,
    next_closure_id: u32,
    next_infer: u32,
    /// Names of generic type parameters in scope for the item currently
    /// being lowered (function/struct/enum/trait/impl generics).
    generic_params: Vec<String>,
}

impl<'a> Lowerer<'a> {
    fn new(sink: &'a mut dyn Sink, crate_name: impl Into<String>) -> Self {
        Self {
            sink,
            crate_name: crate_name.into(),
            modules: ModuleScope::default(),
            locals: Vec::new(),
            next_slot: 0,
            next_closure_id: 0,
            next_infer: 0,
            generic_params: Vec::new(),
        }
    }

    fn bug(&mut self, span: Span, msg: impl Into<String>) -> ! {
        self.sink.bug(span, msg)
    }

    fn fresh_slot(&mut self) -> u32 {
        let slot = self.next_slot;
        self.next_slot += 1;
        slot
    }

    fn fresh_closure_id(&mut self) -> u32 {
        let id = self.next_closure_id;
        self.next_closure_id += 1;
        id
    }

    fn fresh_infer(&mut self, class: hir::InferClass) -> hir::TypeRef {
        let index = self.next_infer;
        self.next_infer += 1;
        hir::TypeRef::Infer { index, class }
    }

    /// RAII-free scope push/pop pair; every call site pops on every exit
    /// path by construction (the lowering functions below never return
    /// early without reaching their matching pop -- no `?` crosses a push).
    fn push_scope(&mut self) {
        self.locals.push(FxHashMap::default());
    }

    fn pop_scope(&mut self) {
        self.locals.pop();
    }

    fn bind_local(&mut self, name: &str) -> u32 {
        let slot = self.fresh_slot();
        self.locals.last_mut().expect("bind_local called with no open scope").insert(name.to_string(), slot);
        slot
    }

    fn lookup_local(&self, name: &str) -> Option<u32> {
        self.locals.iter().rev().find_map(|scope| scope.get(name).copied())
    }

    fn bind_local_binding(&mut self, name: &str, mode: hir::BindMode, mutable: bool) -> hir::Binding {
        let slot = self.bind_local(name);
        hir::Binding { mutable, mode, name: name.to_string(), slot }
    }

    fn push_module_namespaces(&mut self, ns: Namespaces) {
        self.modules.push(ns);
    }

    fn pop_module_namespaces(&mut self) {
        self.modules.pop();
    }

    fn push_generics(&mut self, names: Vec<String>) -> usize {
        let mark = self.generic_params.len();
        self.generic_params.extend(names);
        mark
    }

    fn pop_generics(&mut self, mark: usize) {
        self.generic_params.truncate(mark);
    }

    fn generic_index(&self, name: &str) -> Option<u32> {
        self.generic_params.iter().position(|g| g == name).map(|i| i as u32)
    }
}

/// Entry point used by `fec-driver` and tests: lower a fully-parsed
/// `AST.Crate` into a `HIR.Crate`, indexing impls and running the
/// index-fixup pass (spec.md sec 4.4).
pub fn lower_crate(krate: ast::Crate, crate_name: &str, sink: &mut dyn Sink) -> hir::Crate {
    let mut lowerer = Lowerer::new(sink, crate_name);
    let mut out = hir::Crate::new(crate_name);

    let root_ns = Namespaces::collect(&krate.items);
    lowerer.push_module_namespaces(root_ns);

    let root_path = hir::SimplePath::crate_root(crate_name);
    let mut trait_index = FxHashMap::default();
    items::lower_items_into(&mut lowerer, &krate.items, &root_path, &mut out.root, &mut trait_index);
    lowerer.pop_module_namespaces();
    out.trait_index = trait_index;

    let mut impl_index = items::ImplIndex::default();
    items::index_impls(&mut lowerer, &krate.items, &root_path, &out.root, &mut impl_index);
    out.type_impls = impl_index.type_impls;
    out.trait_impls = impl_index.trait_impls;
    out.marker_impls = impl_index.marker_impls;

    fixup::run(&mut lowerer, &mut out);

    out
}
