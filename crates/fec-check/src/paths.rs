//! Path-resolution helpers the validator needs to cross-check arity and
//! field types against a type's own definition (spec.md sec 4.5
//! "TupleVariant / StructLiteral": "looks up the variant/struct from the
//! resolved result type"). Narrower than a real name resolver: it only
//! walks the module tree the HIR already carries, component by component.

use fec_hir::hir::{Crate, Module, SimplePath, StructBody, TypeEntry, TypeItem, TypeRef, VariantBody};

/// Walk `module` through nested `TypeItem::Module` entries following
/// `components`, returning the final entry if every step resolves.
pub fn resolve_type_entry<'c>(module: &'c Module, components: &[String]) -> Option<&'c TypeEntry> {
    let (head, rest) = components.split_first()?;
    let entry = module.types.get(head)?;
    if rest.is_empty() {
        return Some(entry);
    }
    match &entry.item {
        TypeItem::Module(inner) => resolve_type_entry(inner, rest),
        _ => None,
    }
}

/// The tuple-positional field types of the struct or enum variant `path`
/// denotes (`is_struct` distinguishes a tuple struct constructor from an
/// enum tuple variant, per `ExprKind::TupleVariant`'s doc comment). `None`
/// means the path does not denote a tuple-shaped constructor at all.
pub fn variant_or_struct_tuple_fields(krate: &Crate, path: &SimplePath, is_struct: bool) -> Option<Vec<TypeRef>> {
    if is_struct {
        let entry = resolve_type_entry(&krate.root, &path.components)?;
        match &entry.item {
            TypeItem::Struct(s) => match &s.body {
                StructBody::Tuple(fields) => Some(fields.iter().map(|f| f.ty.clone()).collect()),
                StructBody::Unit => Some(Vec::new()),
                StructBody::Named(_) => None,
            },
            _ => None,
        }
    } else {
        let (variant_name, enum_components) = path.components.split_last()?;
        let entry = resolve_type_entry(&krate.root, enum_components)?;
        match &entry.item {
            TypeItem::Enum(e) => e.variants.iter().find(|v| &v.name == variant_name).and_then(|v| match &v.body {
                VariantBody::Unit => Some(Vec::new()),
                VariantBody::Value(_) => Some(Vec::new()),
                VariantBody::Tuple(fields) => Some(fields.iter().map(|f| f.ty.clone()).collect()),
                VariantBody::Struct(_) => None,
            }),
            _ => None,
        }
    }
}

/// Replace every `Generic { index, .. }` reachable from `ty` with the
/// matching entry of `args` (spec.md sec 4.5: "substitutes the impl/item
/// parameter cache if the field type needs monomorphisation"). Indices with
/// no matching argument are left as-is.
pub fn substitute_generics(ty: &TypeRef, args: &[TypeRef]) -> TypeRef {
    match ty {
        TypeRef::Generic { index, .. } => args.get(*index as usize).cloned().unwrap_or_else(|| ty.clone()),
        TypeRef::Tuple(elems) => TypeRef::Tuple(elems.iter().map(|e| substitute_generics(e, args)).collect()),
        TypeRef::Slice(inner) => TypeRef::Slice(Box::new(substitute_generics(inner, args))),
        TypeRef::Array { inner, len_expr, resolved_len } => TypeRef::Array {
            inner: Box::new(substitute_generics(inner, args)),
            len_expr: len_expr.clone(),
            resolved_len: *resolved_len,
        },
        TypeRef::Borrow { mutable, inner } => TypeRef::Borrow { mutable: *mutable, inner: Box::new(substitute_generics(inner, args)) },
        TypeRef::Pointer { mutable, inner } => TypeRef::Pointer { mutable: *mutable, inner: Box::new(substitute_generics(inner, args)) },
        other => other.clone(),
    }
}
