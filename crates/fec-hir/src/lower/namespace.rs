//! Name-kind resolution (spec.md sec 2 C7: "resolving name kinds (struct vs
//! enum-variant vs function vs local)").
//!
//! spec.md sec 3 describes `PathBinding` as "populated by the resolver
//! (consumed from outside this spec) and read by lowering", but sec 2's own
//! component table assigns exactly this job to C7 ("AST->HIR lowering...
//! resolving name kinds"), and sec 5's phase order lists a `Resolve
//! (external)` step with no further contract anywhere in this document.
//! Taken together the only reading that is actually implementable is: a
//! lexical binder (which name is a local, which is a module item, which
//! item kind it is) lives here, inside lowering, scoped to the two
//! namespaces spec.md sec 3 "HIR.Module" already names (value vs type).
//! Fuller resolution concerns -- multi-segment imports, glob re-exports,
//! cross-module visibility -- are out of scope for this pass; see
//! DESIGN.md.

use rustc_hash::FxHashMap;

use fec_parser::ast;

/// What a type-namespace name denotes, narrowed to what path lowering needs
/// to pick the right `HIR.Path` shape.
#[derive(Debug, Clone)]
pub enum TypeBinding {
    Module,
    Struct { is_tuple: bool, is_unit: bool },
    Enum { variants: Vec<VariantInfo> },
    Trait { is_marker: bool },
    TypeAlias,
}

#[derive(Debug, Clone)]
pub struct VariantInfo {
    pub name: String,
    pub idx: u32,
    pub is_struct: bool,
    pub is_unit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueBinding {
    Function,
    Constant,
    Static,
    /// The value of a unit-like struct used bare (`let s = S;`).
    StructConstant,
    /// The callable constructor of a tuple struct (`S(1, 2)`).
    StructConstructor,
}

/// The two namespaces of one module (spec.md sec 3 "HIR.Module").
#[derive(Debug, Clone, Default)]
pub struct Namespaces {
    pub types: FxHashMap<String, TypeBinding>,
    pub values: FxHashMap<String, ValueBinding>,
}

impl Namespaces {
    /// Collect the top-level name bindings visible in one module body,
    /// without descending into nested `mod` blocks (each nested module gets
    /// its own `Namespaces`, chained to this one -- see `Scope`).
    pub fn collect(items: &[ast::Item]) -> Self {
        let mut ns = Namespaces::default();
        for item in items {
            match &item.kind {
                ast::ItemKind::Struct(def) => {
                    let (is_tuple, is_unit) = match &def.body {
                        ast::StructBody::Unit => (false, true),
                        ast::StructBody::Tuple(_) => (true, false),
                        ast::StructBody::Named(_) => (false, false),
                    };
                    ns.types.insert(def.name.clone(), TypeBinding::Struct { is_tuple, is_unit });
                    if is_unit {
                        ns.values.insert(def.name.clone(), ValueBinding::StructConstant);
                    } else if is_tuple {
                        ns.values.insert(def.name.clone(), ValueBinding::StructConstructor);
                    }
                }
                ast::ItemKind::Enum(def) => {
                    let variants = def
                        .variants
                        .iter()
                        .enumerate()
                        .map(|(idx, v)| VariantInfo {
                            name: v.name.clone(),
                            idx: idx as u32,
                            is_struct: matches!(v.body, ast::VariantBody::Struct(_)),
                            is_unit: matches!(v.body, ast::VariantBody::Unit | ast::VariantBody::Value(_)),
                        })
                        .collect();
                    ns.types.insert(def.name.clone(), TypeBinding::Enum { variants });
                }
                ast::ItemKind::Trait(def) => {
                    ns.types.insert(def.name.clone(), TypeBinding::Trait { is_marker: def.is_marker });
                }
                ast::ItemKind::TypeAlias(def) => {
                    ns.types.insert(def.name.clone(), TypeBinding::TypeAlias);
                }
                ast::ItemKind::Module(def) => {
                    ns.types.insert(def.name.clone(), TypeBinding::Module);
                }
                ast::ItemKind::Function(f) => {
                    ns.values.insert(f.name.clone(), ValueBinding::Function);
                }
                ast::ItemKind::Const(c) => {
                    ns.values.insert(c.name.clone(), ValueBinding::Constant);
                }
                ast::ItemKind::Static(s) => {
                    ns.values.insert(s.name.clone(), ValueBinding::Static);
                }
                ast::ItemKind::Use(_) | ast::ItemKind::ExternCrate(_) | ast::ItemKind::ExternBlock(_) | ast::ItemKind::Impl(_) | ast::ItemKind::Macro(_) => {}
            }
        }
        ns
    }
}

/// A chain of module namespaces, innermost last, used to resolve a name
/// against the nearest enclosing module and fall back outward (the
/// simplified stand-in for full module-path resolution; see module doc
/// comment).
#[derive(Debug, Default)]
pub struct ModuleScope {
    chain: Vec<Namespaces>,
}

impl ModuleScope {
    pub fn push(&mut self, ns: Namespaces) {
        self.chain.push(ns);
    }

    pub fn pop(&mut self) {
        self.chain.pop();
    }

    pub fn lookup_type(&self, name: &str) -> Option<&TypeBinding> {
        self.chain.iter().rev().find_map(|ns| ns.types.get(name))
    }

    pub fn lookup_value(&self, name: &str) -> Option<ValueBinding> {
        self.chain.iter().rev().find_map(|ns| ns.values.get(name).copied())
    }
}
