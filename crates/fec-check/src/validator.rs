//! The expression validator (C8, spec.md sec 4.5). Runs after type
//! inference: every `ExprNode::ty` it visits is assumed already populated
//! (a `None` reaching this pass is a bug, not a validation failure -- that
//! invariant belongs to the phase ordering, not to this one). Grounded on
//! `mesh-typeck::infer.rs`'s `infer_expr`/`infer_binary`/`infer_call`
//! dispatch-by-node-kind shape, narrowed from inference to the structural
//! re-checks spec.md sec 4.5 actually asks for.
//!
//! **Algorithm** (spec.md sec 4.5): a single depth-first traversal. The
//! first mismatch reported stops the pass (spec.md sec 7 "Propagation
//! policy": "an `error`... the compiler aborts at the end of the current
//! phase") -- `Aborted` is the signal that unwinds the remaining traversal
//! once `sink.error` has already recorded the one diagnostic spec.md sec 8
//! promises ("the validator either accepts it or emits exactly one
//! diagnostic with a span").

use fec_common::{CoreType, Sink, Span};
use fec_hir::hir::{
    ArrayLit, BinOp, ClosureParam, CompoundOp, Crate, ExprKind, ExprNode, Field, FieldName, Function, MatchArm, Module, Path, Stmt,
    StructBody, StructLiteralField, TraitValue, TypeEntry, TypeItem, TypeRef, ValueItem,
};
use fec_resolve::{Resolver, TraitImplMatch};

use crate::paths;

/// Signals that `sink` already recorded the one diagnostic this pass is
/// allowed to emit; traversal unwinds without visiting the rest of the tree.
struct Aborted;

type VResult<T> = Result<T, Aborted>;

pub struct Validator<'r, 'a> {
    resolver: &'r Resolver<'a>,
    sink: &'r mut dyn Sink,
    /// The innermost enclosing `Return` target: the function's declared
    /// return type, or a nested closure's (spec.md sec 4.5 "Return":
    /// "closures nest, return targets stack"). Pushed/popped around the
    /// body they belong to so every exit path restores the outer scope.
    return_stack: Vec<TypeRef>,
}

impl<'r, 'a> Validator<'r, 'a> {
    pub fn new(resolver: &'r Resolver<'a>, sink: &'r mut dyn Sink) -> Self {
        Self { resolver, sink, return_stack: Vec::new() }
    }

    /// Validate every function reachable from `krate`: the root module's
    /// tree (recursing into nested modules and trait default bodies) plus
    /// every method on every impl in the three impl indexes. A function
    /// with no body (a trait method with no default) has nothing to check.
    pub fn validate_crate(&mut self, krate: &Crate) {
        self.validate_module(&krate.root);
        for imp in &krate.type_impls {
            for m in imp.methods.values() {
                let _ = self.validate_function(&m.function);
            }
        }
        for impls in krate.trait_impls.values() {
            for imp in impls {
                for m in imp.methods.values() {
                    let _ = self.validate_function(&m.function);
                }
            }
        }
    }

    fn validate_module(&mut self, module: &Module) {
        for entry in module.values.values() {
            if let ValueItem::Function(f) = &entry.item {
                let _ = self.validate_function(f);
            }
        }
        for entry in module.types.values() {
            match &entry.item {
                TypeItem::Module(inner) => self.validate_module(inner),
                TypeItem::Trait(t) => {
                    for value in t.values.values() {
                        if let TraitValue::Function(f) = value {
                            let _ = self.validate_function(f);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn validate_function(&mut self, function: &Function) -> VResult<()> {
        let Some(body) = &function.body else { return Ok(()) };
        self.return_stack.push(function.ret.clone());
        let body_result = self.visit_expr(body);
        self.return_stack.pop();
        let body_ty = body_result?;
        self.check_eq(function.span, &function.ret, &body_ty)
    }

    fn ty_of(&mut self, node: &ExprNode) -> TypeRef {
        match &node.ty {
            Some(ty) => ty.clone(),
            None => self.sink.bug(node.span, "expression reached the validator without a resolved type"),
        }
    }

    /// Structural equality after associated-type expansion, with
    /// `Diverge` unifying with anything (spec.md sec 4.5 "Algorithm":
    /// "Diverging types (`!`) unify with anything").
    fn types_equal(&self, a: &TypeRef, b: &TypeRef) -> bool {
        let a = self.resolver.expand_associated_types(a);
        let b = self.resolver.expand_associated_types(b);
        matches!(a, TypeRef::Diverge) || matches!(b, TypeRef::Diverge) || a == b
    }

    fn check_eq(&mut self, span: Span, expected: &TypeRef, found: &TypeRef) -> VResult<()> {
        if self.types_equal(expected, found) {
            Ok(())
        } else {
            self.sink.error(span, "E0000", format!("type mismatch: expected `{expected:?}`, found `{found:?}`"));
            Err(Aborted)
        }
    }

    fn check_trait_membership(&mut self, lang_item: &str, trait_args: &[TypeRef], ty: &TypeRef, span: Span) -> VResult<()> {
        let trait_path = self.resolver.get_lang_item_path(lang_item, self.sink, span);
        let ty = self.resolver.expand_associated_types(ty);
        match self.resolver.find_trait_impls(&trait_path, trait_args, &ty, |_| Some(())) {
            Some(()) => Ok(()),
            None => {
                self.sink.error(span, "E0000", format!("no implementation of `{trait_path}` for `{ty:?}`"));
                Err(Aborted)
            }
        }
    }

    /// Like `check_trait_membership`, but additionally extracts and returns
    /// the implementation's `Output` associated type (spec.md sec 4.5
    /// "BinOp": "verify the `Output` associated type matches the node's
    /// result type").
    fn trait_output(&mut self, lang_item: &str, trait_args: &[TypeRef], self_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        let trait_path = self.resolver.get_lang_item_path(lang_item, self.sink, span);
        let self_ty = self.resolver.expand_associated_types(self_ty);
        let output = self.resolver.find_trait_impls(&trait_path, trait_args, &self_ty, |m| match m {
            TraitImplMatch::Trait(imp) => imp.types.get("Output").map(|t| t.ty.clone()),
            TraitImplMatch::Marker(_) => None,
        });
        match output {
            Some(output) => Ok(output),
            None => {
                self.sink.error(span, "E0000", format!("no implementation of `{trait_path}` providing `Output` for `{self_ty:?}`"));
                Err(Aborted)
            }
        }
    }

    fn visit_expr(&mut self, node: &ExprNode) -> VResult<TypeRef> {
        let ty = self.ty_of(node);
        match &node.kind {
            ExprKind::Block(stmts, tail) => self.visit_block(stmts, tail.as_deref(), &ty, node.span),
            ExprKind::Return(operand) => self.visit_return(operand, node.span),
            ExprKind::Break { .. } | ExprKind::Continue { .. } => Ok(ty),
            ExprKind::Let { pattern: _, ty: annotated, value } => self.visit_let(annotated.as_ref(), value, node.span),
            ExprKind::Assign { op, target, value } => self.visit_assign(*op, target, value, node.span),
            ExprKind::BinOp { op, lhs, rhs } => self.visit_binop(*op, lhs, rhs, &ty, node.span),
            ExprKind::UniOp { op, operand } => self.visit_uniop(*op, operand, &ty, node.span),
            ExprKind::Borrow { mutable, operand } => self.visit_borrow(*mutable, operand, &ty, node.span),
            ExprKind::Cast { value, ty: target } => self.visit_cast(value, target),
            ExprKind::Deref(operand) => self.visit_deref(operand, &ty, node.span),
            ExprKind::CallPath { path, args } => self.visit_call_path(path, args, &ty, node.span),
            ExprKind::CallValue { slot: _, args } => {
                for a in args {
                    self.visit_expr(a)?;
                }
                Ok(ty)
            }
            ExprKind::CallMethod { receiver, args, .. } => {
                self.visit_expr(receiver)?;
                for a in args {
                    self.visit_expr(a)?;
                }
                Ok(ty)
            }
            ExprKind::CallObject { callee, args } => {
                self.visit_expr(callee)?;
                for a in args {
                    self.visit_expr(a)?;
                }
                Ok(ty)
            }
            ExprKind::TupleVariant { path, is_struct, args } => self.visit_tuple_variant(path, *is_struct, args, &ty, node.span),
            ExprKind::Loop { body, .. } => self.visit_loop(body, &ty),
            ExprKind::Match { value, arms } => self.visit_match(value, arms, &ty),
            ExprKind::If { cond, then_branch, else_branch } => self.visit_if(cond, then_branch, else_branch.as_deref(), &ty, node.span),
            ExprKind::Literal(_) => Ok(ty),
            ExprKind::Closure { params, ret, body, .. } => self.visit_closure(params, ret, body, &ty, node.span),
            ExprKind::StructLiteral { path, fields, base } => self.visit_struct_literal(path, fields, base.as_deref(), &ty, node.span),
            ExprKind::Array(lit) => self.visit_array(lit, &ty, node.span),
            ExprKind::Tuple(elems) => self.visit_tuple(elems, &ty, node.span),
            ExprKind::Local(_) | ExprKind::NamedValue(_) => Ok(ty),
            ExprKind::Field { value, name } => self.visit_field(value, name, &ty, node.span),
            ExprKind::Index { value, index } => {
                self.visit_expr(value)?;
                self.visit_expr(index)?;
                Ok(ty)
            }
        }
    }

    fn visit_block(&mut self, stmts: &[Stmt], tail: Option<&ExprNode>, ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        for stmt in stmts {
            match stmt {
                Stmt::Expr(e) | Stmt::Semi(e) => {
                    self.visit_expr(e)?;
                }
            }
        }
        match tail {
            Some(tail) => {
                let tail_ty = self.visit_expr(tail)?;
                self.check_eq(span, ty, &tail_ty)?;
            }
            None => self.check_eq(span, ty, &TypeRef::unit())?,
        }
        Ok(ty.clone())
    }

    fn visit_return(&mut self, operand: &ExprNode, span: Span) -> VResult<TypeRef> {
        let operand_ty = self.visit_expr(operand)?;
        match self.return_stack.last().cloned() {
            Some(target) => self.check_eq(span, &target, &operand_ty)?,
            None => self.sink.bug(span, "`return` reached the validator with no enclosing return target"),
        }
        Ok(TypeRef::Diverge)
    }

    fn visit_let(&mut self, annotated: Option<&TypeRef>, value: &ExprNode, span: Span) -> VResult<TypeRef> {
        let value_ty = self.visit_expr(value)?;
        if let Some(expected) = annotated {
            self.check_eq(span, expected, &value_ty)?;
        }
        Ok(TypeRef::unit())
    }

    fn visit_assign(&mut self, op: Option<CompoundOp>, target: &ExprNode, value: &ExprNode, span: Span) -> VResult<TypeRef> {
        let target_ty = self.visit_expr(target)?;
        let value_ty = self.visit_expr(value)?;
        match op {
            None => self.check_eq(span, &target_ty, &value_ty)?,
            Some(op) => self.check_trait_membership(fec_resolve::compound_assign_trait(op), &[value_ty], &target_ty, span)?,
        }
        Ok(TypeRef::unit())
    }

    fn visit_binop(&mut self, op: BinOp, lhs: &ExprNode, rhs: &ExprNode, result_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        let lhs_ty = self.visit_expr(lhs)?;
        let rhs_ty = self.visit_expr(rhs)?;
        match fec_resolve::binop_trait(op) {
            None => {} // short-circuit `&&`/`||`: no additional constraint (spec.md sec 4.5).
            Some(lang_item) if matches!(op, BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge) => {
                self.check_trait_membership(lang_item, &[rhs_ty], &lhs_ty, span)?;
                self.check_eq(span, result_ty, &TypeRef::Primitive(CoreType::Bool))?;
            }
            Some(lang_item) => {
                let output = self.trait_output(lang_item, &[rhs_ty], &lhs_ty, span)?;
                self.check_eq(span, result_ty, &output)?;
            }
        }
        Ok(result_ty.clone())
    }

    fn visit_uniop(&mut self, op: fec_hir::hir::UniOp, operand: &ExprNode, result_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        let operand_ty = self.visit_expr(operand)?;
        let lang_item = fec_resolve::uniop_trait(op);
        let output = self.trait_output(lang_item, &[], &operand_ty, span)?;
        self.check_eq(span, result_ty, &output)?;
        Ok(result_ty.clone())
    }

    fn visit_borrow(&mut self, mutable: bool, operand: &ExprNode, result_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        let operand_ty = self.visit_expr(operand)?;
        match result_ty {
            TypeRef::Borrow { mutable: m, inner } if *m == mutable => {
                self.check_eq(span, inner, &operand_ty)?;
            }
            _ => {
                self.sink.error(span, "E0000", "borrow result type is not a reference of matching mutability");
                return Err(Aborted);
            }
        }
        Ok(result_ty.clone())
    }

    /// Whether casting a value of type `from` to `to` is permitted
    /// (spec.md sec 4.5 "Cast"). `Unsize` coercions have no dedicated HIR
    /// node in this tree (lowering never produces one), so "permitted only
    /// when the target is a trait object or slice" is folded in here as the
    /// widening-pointer special case below.
    fn cast_allowed(&self, from: &TypeRef, to: &TypeRef) -> bool {
        match (from, to) {
            (TypeRef::Primitive(_), TypeRef::Primitive(_)) => true,
            (TypeRef::Pointer { .. }, TypeRef::Primitive(CoreType::Usize)) => true,
            (TypeRef::Primitive(CoreType::Usize), TypeRef::Pointer { .. }) => true,
            (TypeRef::Pointer { inner: i1, .. }, TypeRef::Pointer { inner: i2, .. }) => !(self.is_sized(i1) && !self.is_sized(i2)),
            (TypeRef::Function(_), TypeRef::Pointer { mutable: false, inner }) if inner.is_unit() => true,
            (TypeRef::Borrow { inner: i1, .. }, TypeRef::Borrow { inner: i2, .. }) => i1 == i2,
            // Unsizing coercions (spec.md sec 4.5 "Unsize": "permitted only
            // when the target is a trait object or a slice"); this HIR has
            // no dedicated Unsize node, so a widening Cast stands in for one.
            (TypeRef::Array { inner: i1, .. }, TypeRef::Slice(i2)) => i1 == i2,
            (concrete, TypeRef::TraitObject { .. }) if self.is_sized(concrete) => true,
            _ => false,
        }
    }

    fn is_sized(&self, ty: &TypeRef) -> bool {
        !matches!(ty, TypeRef::Slice(_) | TypeRef::TraitObject { .. })
    }

    fn visit_cast(&mut self, value: &ExprNode, target: &TypeRef) -> VResult<TypeRef> {
        let value_ty = self.visit_expr(value)?;
        if !self.cast_allowed(&value_ty, target) {
            self.sink.error(value.span, "E0000", format!("invalid cast from `{value_ty:?}` to `{target:?}`"));
            return Err(Aborted);
        }
        Ok(target.clone())
    }

    fn visit_deref(&mut self, operand: &ExprNode, result_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        let operand_ty = self.visit_expr(operand)?;
        let target = self.trait_output_named(operand_ty, "deref", "Target", span)?;
        self.check_eq(span, result_ty, &target)?;
        Ok(result_ty.clone())
    }

    /// `trait_output` generalized to an arbitrary associated-type name
    /// (`Deref::Target` rather than the operator traits' `Output`).
    fn trait_output_named(&mut self, self_ty: TypeRef, lang_item: &str, assoc_name: &str, span: Span) -> VResult<TypeRef> {
        let trait_path = self.resolver.get_lang_item_path(lang_item, self.sink, span);
        let self_ty = self.resolver.expand_associated_types(&self_ty);
        let found = self.resolver.find_trait_impls(&trait_path, &[], &self_ty, |m| match m {
            TraitImplMatch::Trait(imp) => imp.types.get(assoc_name).map(|t| t.ty.clone()),
            TraitImplMatch::Marker(_) => None,
        });
        match found {
            Some(ty) => Ok(ty),
            None => {
                self.sink.error(span, "E0000", format!("no implementation of `{trait_path}` providing `{assoc_name}` for `{self_ty:?}`"));
                Err(Aborted)
            }
        }
    }

    fn visit_call_path(&mut self, path: &Path, args: &[ExprNode], result_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        for a in args {
            self.visit_expr(a)?;
        }
        if let Path::UfcsKnown { ty, trait_, .. } = path {
            if let Some(fec_hir::hir::TraitId(trait_path)) = &trait_.resolved_trait {
                let self_ty = self.resolver.expand_associated_types(ty);
                let trait_args = &trait_.path.params.types;
                let found = self.resolver.find_trait_impls(trait_path, trait_args, &self_ty, |_| Some(()));
                if found.is_none() {
                    self.sink.error(span, "E0000", format!("no implementation of `{trait_path}` for the call's `Self` type"));
                    return Err(Aborted);
                }
            }
        }
        Ok(result_ty.clone())
    }

    fn visit_tuple_variant(&mut self, path: &Path, is_struct: bool, args: &[ExprNode], result_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        let mut arg_tys = Vec::with_capacity(args.len());
        for a in args {
            arg_tys.push(self.visit_expr(a)?);
        }
        let Path::Generic(g) = path else {
            self.sink.bug(span, "tuple/unit variant constructor path must be a plain generic path");
        };
        let krate = self.resolver.crate_ref();
        let Some(declared) = paths::variant_or_struct_tuple_fields(krate, &g.base, is_struct) else {
            self.sink.bug(span, format!("path `{}` does not denote a known tuple variant or struct", g.base));
        };
        if declared.len() != arg_tys.len() {
            self.sink.error(span, "E0000", format!("expected {} arguments, found {}", declared.len(), arg_tys.len()));
            return Err(Aborted);
        }
        for (expected, found) in declared.iter().zip(&arg_tys) {
            let expected = paths::substitute_generics(expected, &g.params.types);
            self.check_eq(span, &expected, found)?;
        }
        Ok(result_ty.clone())
    }

    fn visit_loop(&mut self, body: &[Stmt], result_ty: &TypeRef) -> VResult<TypeRef> {
        for stmt in body {
            match stmt {
                Stmt::Expr(e) | Stmt::Semi(e) => {
                    self.visit_expr(e)?;
                }
            }
        }
        Ok(result_ty.clone())
    }

    fn visit_match(&mut self, value: &ExprNode, arms: &[MatchArm], result_ty: &TypeRef) -> VResult<TypeRef> {
        self.visit_expr(value)?;
        for arm in arms {
            if let Some(guard) = &arm.guard {
                self.visit_expr(guard)?;
            }
            let body_ty = self.visit_expr(&arm.body)?;
            self.check_eq(arm.body.span, result_ty, &body_ty)?;
        }
        Ok(result_ty.clone())
    }

    fn visit_if(&mut self, cond: &ExprNode, then_branch: &[Stmt], else_branch: Option<&ExprNode>, result_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        self.visit_expr(cond)?;
        let then_ty = self.visit_stmts_tail(then_branch)?;
        match else_branch {
            Some(else_expr) => {
                let else_ty = self.visit_expr(else_expr)?;
                self.check_eq(span, result_ty, &then_ty)?;
                self.check_eq(span, result_ty, &else_ty)?;
            }
            None => {
                // spec.md sec 4.5 "If": "missing `else` branch implies the
                // `true` branch has type unit".
                self.check_eq(span, &then_ty, &TypeRef::unit())?;
                self.check_eq(span, result_ty, &TypeRef::unit())?;
            }
        }
        Ok(result_ty.clone())
    }

    fn visit_stmts_tail(&mut self, stmts: &[Stmt]) -> VResult<TypeRef> {
        let mut tail_ty = None;
        for (i, stmt) in stmts.iter().enumerate() {
            match stmt {
                Stmt::Expr(e) => {
                    let t = self.visit_expr(e)?;
                    if i == stmts.len() - 1 {
                        tail_ty = Some(t);
                    }
                }
                Stmt::Semi(e) => {
                    self.visit_expr(e)?;
                }
            }
        }
        Ok(tail_ty.unwrap_or_else(TypeRef::unit))
    }

    fn visit_closure(&mut self, _params: &[ClosureParam], ret: &TypeRef, body: &ExprNode, own_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        self.return_stack.push(ret.clone());
        let body_result = self.visit_expr(body);
        self.return_stack.pop();
        let body_ty = body_result?;
        self.check_eq(span, ret, &body_ty)?;
        Ok(own_ty.clone())
    }

    fn visit_struct_literal(
        &mut self,
        path: &Path,
        fields: &[StructLiteralField],
        base: Option<&ExprNode>,
        result_ty: &TypeRef,
        span: Span,
    ) -> VResult<TypeRef> {
        let mut field_tys = Vec::with_capacity(fields.len());
        for f in fields {
            field_tys.push((f.name.clone(), self.visit_expr(&f.value)?, f.value.span));
        }
        if let Some(base) = base {
            self.visit_expr(base)?;
        }
        let Path::Generic(g) = path else {
            self.sink.bug(span, "struct literal path must be a plain generic path");
        };
        let krate = self.resolver.crate_ref();
        let Some(entry) = paths::resolve_type_entry(&krate.root, &g.base.components) else {
            self.sink.bug(span, format!("path `{}` does not denote a known struct", g.base));
        };
        let declared_fields = struct_named_fields(entry, span, self.sink);
        if base.is_none() && declared_fields.len() != field_tys.len() {
            self.sink.error(span, "E0000", format!("expected {} fields, found {}", declared_fields.len(), field_tys.len()));
            return Err(Aborted);
        }
        for (name, found_ty, field_span) in &field_tys {
            let Some(declared) = declared_fields.iter().find(|f| f.name.as_deref() == Some(name.as_str())) else {
                self.sink.error(*field_span, "E0000", format!("no field `{name}` on this struct"));
                return Err(Aborted);
            };
            let expected = paths::substitute_generics(&declared.ty, &g.params.types);
            self.check_eq(*field_span, &expected, found_ty)?;
        }
        Ok(result_ty.clone())
    }

    fn visit_array(&mut self, lit: &ArrayLit, result_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        match lit {
            ArrayLit::List(elems) => {
                let mut tys = Vec::with_capacity(elems.len());
                for e in elems {
                    tys.push(self.visit_expr(e)?);
                }
                let inner = match result_ty {
                    TypeRef::Slice(inner) => inner.as_ref().clone(),
                    TypeRef::Array { inner, .. } => inner.as_ref().clone(),
                    _ => {
                        self.sink.error(span, "E0000", "array literal result type is not an array or slice");
                        return Err(Aborted);
                    }
                };
                for t in &tys {
                    self.check_eq(span, &inner, t)?;
                }
            }
            ArrayLit::Sized { value, count } => {
                let value_ty = self.visit_expr(value)?;
                self.visit_expr(count)?;
                let inner = match result_ty {
                    TypeRef::Array { inner, .. } => inner.as_ref().clone(),
                    _ => {
                        self.sink.error(span, "E0000", "sized array literal result type is not an array");
                        return Err(Aborted);
                    }
                };
                self.check_eq(span, &inner, &value_ty)?;
            }
        }
        Ok(result_ty.clone())
    }

    fn visit_tuple(&mut self, elems: &[ExprNode], result_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        let mut elem_tys = Vec::with_capacity(elems.len());
        for e in elems {
            elem_tys.push(self.visit_expr(e)?);
        }
        match result_ty {
            TypeRef::Tuple(expected) if expected.len() == elem_tys.len() => {
                for (a, b) in expected.iter().zip(&elem_tys) {
                    self.check_eq(span, a, b)?;
                }
            }
            _ => {
                self.sink.error(span, "E0000", "tuple literal arity does not match its result type");
                return Err(Aborted);
            }
        }
        Ok(result_ty.clone())
    }

    fn visit_field(&mut self, value: &ExprNode, name: &FieldName, result_ty: &TypeRef, span: Span) -> VResult<TypeRef> {
        let value_ty = self.visit_expr(value)?;
        let value_ty = self.resolver.expand_associated_types(&value_ty);
        match (&value_ty, name) {
            (TypeRef::Tuple(elems), FieldName::Tuple(i)) => match elems.get(*i as usize) {
                Some(field_ty) => self.check_eq(span, result_ty, field_ty)?,
                None => {
                    self.sink.error(span, "E0000", "tuple index out of range");
                    return Err(Aborted);
                }
            },
            // Closure captures are opaque to this layer -- the capture set
            // and its field types are an inference-phase concern.
            (TypeRef::Closure(_), FieldName::Tuple(_)) => {}
            (TypeRef::Path(Path::Generic(g)), FieldName::Named(field_name)) => {
                let krate = self.resolver.crate_ref();
                let Some(entry) = paths::resolve_type_entry(&krate.root, &g.base.components) else {
                    self.sink.bug(span, format!("path `{}` does not denote a known struct", g.base));
                };
                let declared_fields = struct_named_fields(entry, span, self.sink);
                match declared_fields.iter().find(|f| f.name.as_deref() == Some(field_name.as_str())) {
                    Some(f) => {
                        let expected = paths::substitute_generics(&f.ty, &g.params.types);
                        self.check_eq(span, result_ty, &expected)?;
                    }
                    None => {
                        self.sink.error(span, "E0000", format!("no field `{field_name}` on this struct"));
                        return Err(Aborted);
                    }
                }
            }
            _ => {
                self.sink.error(span, "E0000", "field access name form does not match the value's type");
                return Err(Aborted);
            }
        }
        Ok(result_ty.clone())
    }
}

fn struct_named_fields<'c>(entry: &'c TypeEntry, span: Span, sink: &mut dyn Sink) -> &'c [Field] {
    let TypeItem::Struct(s) = &entry.item else {
        sink.bug(span, "path does not denote a struct");
    };
    match &s.body {
        StructBody::Named(fields) => fields,
        _ => sink.bug(span, "field access/struct literal used against a non-named-field struct"),
    }
}
