//! Module items and the crate root (spec.md sec 4.3 "Module items",
//! "Functions", "Structs & enums", "Traits & impls", "Use paths").
//!
//! Grounded on `snow-parser/src/parser/items.rs` for the overall
//! attribute/visibility-then-keyword dispatch and on
//! `original_source/src/parse/root.cpp` for the use-tree and sub-module
//! file-layout rules.

use fec_lexer::token::TokenKind;

use crate::ast::{
    ConstDef, Crate, EnumDef, EnumVariant, ExternBlock, ExternCrateDecl, Function, ImplDef, Item, ItemKind, ModuleBody, ModuleDef, Param, Repr,
    SelfParam, StaticDef, StructBody, StructDef, StructField, TraitDef, TypeAliasDef, UseDecl, UseTree,
};

use super::attrs;
use super::exprs;
use super::generics;
use super::patterns;
use super::paths;
use super::types;
use super::{PResult, ParseError, Parser};

/// Whether `kind` can legally start an item, used by block-level statement
/// parsing to decide between an item declaration and an expression
/// statement (spec.md sec 4.3 "Blocks & statements": "a block may declare
/// local items").
pub fn looks_like_item_start(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Pound
            | TokenKind::KwPub
            | TokenKind::KwUse
            | TokenKind::KwExtern
            | TokenKind::KwConst
            | TokenKind::KwStatic
            | TokenKind::KwFn
            | TokenKind::KwAsync
            | TokenKind::KwUnsafe
            | TokenKind::KwType
            | TokenKind::KwStruct
            | TokenKind::KwEnum
            | TokenKind::KwTrait
            | TokenKind::KwImpl
            | TokenKind::KwMod
    )
}

pub fn parse_crate(p: &mut Parser) -> PResult<Crate> {
    // Leading `#![...]` inner attributes belong to the crate itself; a
    // `#[...]` outer attribute here instead belongs to the first item and
    // is left for `parse_item` below.
    let attrs_list = attrs::parse_inner_attrs(p)?;
    let mut items = Vec::new();
    while !matches!(p.peek_kind()?, TokenKind::Eof) {
        items.push(parse_item(p)?);
    }
    Ok(Crate { attrs: attrs_list, items })
}

pub fn parse_item(p: &mut Parser) -> PResult<Item> {
    let ps = p.start_span()?;
    let attrs_list = attrs::parse_attrs(p)?;
    let vis = attrs::parse_visibility(p)?;
    let mut kind = parse_item_kind(p)?;
    let repr = parse_repr(&attrs_list);
    match &mut kind {
        ItemKind::Struct(def) => def.repr = repr,
        ItemKind::Enum(def) => def.repr = repr,
        _ => {}
    }
    Ok(Item { vis, attrs: attrs_list, kind, span: p.end_span(ps) })
}

fn parse_item_kind(p: &mut Parser) -> PResult<ItemKind> {
    match p.peek_kind()? {
        TokenKind::KwUse => Ok(ItemKind::Use(parse_use(p)?)),
        TokenKind::KwExtern if !is_function_start(p)? => parse_extern(p),
        TokenKind::KwConst if !matches!(p.peek2_kind()?, TokenKind::KwFn) => Ok(ItemKind::Const(parse_const(p)?)),
        TokenKind::KwStatic => Ok(ItemKind::Static(parse_static(p)?)),
        TokenKind::KwFn | TokenKind::KwAsync | TokenKind::KwConst | TokenKind::KwExtern if is_function_start(p)? => {
            Ok(ItemKind::Function(parse_function(p)?))
        }
        TokenKind::KwUnsafe if is_function_start(p)? => Ok(ItemKind::Function(parse_function(p)?)),
        TokenKind::KwUnsafe => parse_unsafe_trait_or_impl(p),
        TokenKind::KwType => Ok(ItemKind::TypeAlias(parse_type_alias(p)?)),
        TokenKind::KwStruct => Ok(ItemKind::Struct(parse_struct(p)?)),
        TokenKind::KwEnum => Ok(ItemKind::Enum(parse_enum(p)?)),
        TokenKind::KwTrait => Ok(ItemKind::Trait(parse_trait(p, false)?)),
        TokenKind::KwImpl => Ok(ItemKind::Impl(parse_impl(p, false)?)),
        TokenKind::KwMod => Ok(ItemKind::Module(parse_module(p)?)),
        TokenKind::MacroName(_) => {
            let inv = exprs::parse_macro_invocation(p)?;
            p.expect(&TokenKind::Semi, "`;`")?;
            Ok(ItemKind::Macro(inv))
        }
        other => Err(ParseError::UnexpectedToken { found: other, expected: vec!["an item"], span: p.peek_span()? }),
    }
}

/// Distinguishes `fn`/`async fn`/`const fn`/`unsafe fn`/`extern "C" fn`
/// from `const`/`unsafe trait`/`unsafe impl`/`extern crate`/`extern` blocks,
/// all of which share a leading keyword with some function form.
fn is_function_start(p: &mut Parser) -> PResult<bool> {
    Ok(match p.peek_kind()? {
        TokenKind::KwFn | TokenKind::KwAsync => true,
        TokenKind::KwConst | TokenKind::KwUnsafe => matches!(p.peek2_kind()?, TokenKind::KwFn | TokenKind::KwAsync | TokenKind::KwExtern),
        // `extern fn` (no ABI) and `extern "C" fn` are function starts;
        // `extern crate ...` and `extern "C" { ... }` are not. The ABI
        // string, when present, pushes `fn` one token further out.
        TokenKind::KwExtern => match p.peek2_kind()? {
            TokenKind::KwFn => true,
            TokenKind::Str(_) => matches!(p.peek3_kind()?, TokenKind::KwFn),
            _ => false,
        },
        _ => false,
    })
}

fn parse_unsafe_trait_or_impl(p: &mut Parser) -> PResult<ItemKind> {
    p.expect(&TokenKind::KwUnsafe, "`unsafe`")?;
    match p.peek_kind()? {
        TokenKind::KwTrait => Ok(ItemKind::Trait(parse_trait(p, true)?)),
        TokenKind::KwImpl => Ok(ItemKind::Impl(parse_impl(p, true)?)),
        other => Err(ParseError::UnexpectedToken { found: other, expected: vec!["`trait` or `impl`"], span: p.peek_span()? }),
    }
}

// ── Use / extern ─────────────────────────────────────────────────────────

fn parse_use(p: &mut Parser) -> PResult<UseDecl> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::KwUse, "`use`")?;
    let tree = parse_use_tree(p)?;
    p.expect(&TokenKind::Semi, "`;`")?;
    Ok(UseDecl { tree, span: p.end_span(ps) })
}

fn parse_use_tree(p: &mut Parser) -> PResult<UseTree> {
    let prefix = paths::parse_path(p)?;
    if p.eat(&TokenKind::ColonColon)? {
        if p.eat(&TokenKind::Star)? {
            return Ok(UseTree::Glob { path: prefix });
        }
        if matches!(p.peek_kind()?, TokenKind::LBrace) {
            p.bump()?;
            let mut items = Vec::new();
            loop {
                if p.eat(&TokenKind::RBrace)? {
                    break;
                }
                items.push(parse_use_tree(p)?);
                if !p.eat(&TokenKind::Comma)? {
                    p.expect(&TokenKind::RBrace, "`}`")?;
                    break;
                }
            }
            return Ok(UseTree::Nested { prefix, items });
        }
    }
    let rename = if p.eat(&TokenKind::KwAs)? { Some(p.expect_ident()?) } else { None };
    Ok(UseTree::Simple { path: prefix, rename })
}

fn parse_extern(p: &mut Parser) -> PResult<ItemKind> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::KwExtern, "`extern`")?;
    if p.eat(&TokenKind::KwCrate)? {
        let name = p.expect_ident()?;
        let rename = if p.eat(&TokenKind::KwAs)? { Some(p.expect_ident()?) } else { None };
        p.expect(&TokenKind::Semi, "`;`")?;
        return Ok(ItemKind::ExternCrate(ExternCrateDecl { name, rename, span: p.end_span(ps) }));
    }
    let abi = if let TokenKind::Str(_) = p.peek_kind()? {
        let TokenKind::Str(s) = p.bump()?.kind else { unreachable!() };
        Some(s)
    } else {
        None
    };
    p.expect(&TokenKind::LBrace, "`{`")?;
    let mut items = Vec::new();
    loop {
        if p.eat(&TokenKind::RBrace)? {
            break;
        }
        items.push(parse_item(p)?);
    }
    Ok(ItemKind::ExternBlock(ExternBlock { abi, items, span: p.end_span(ps) }))
}

// ── Const / static ───────────────────────────────────────────────────────

fn parse_const(p: &mut Parser) -> PResult<ConstDef> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::KwConst, "`const`")?;
    let name = p.expect_ident()?;
    p.expect(&TokenKind::Colon, "`:`")?;
    let ty = types::parse_type(p)?;
    p.expect(&TokenKind::Eq, "`=`")?;
    let value = exprs::parse_expr(p)?;
    p.expect(&TokenKind::Semi, "`;`")?;
    Ok(ConstDef { name, ty, value, span: p.end_span(ps) })
}

fn parse_static(p: &mut Parser) -> PResult<StaticDef> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::KwStatic, "`static`")?;
    let mutable = p.eat(&TokenKind::KwMut)?;
    let name = p.expect_ident()?;
    p.expect(&TokenKind::Colon, "`:`")?;
    let ty = types::parse_type(p)?;
    p.expect(&TokenKind::Eq, "`=`")?;
    let value = exprs::parse_expr(p)?;
    p.expect(&TokenKind::Semi, "`;`")?;
    Ok(StaticDef { name, mutable, ty, value, span: p.end_span(ps) })
}

fn parse_type_alias(p: &mut Parser) -> PResult<TypeAliasDef> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::KwType, "`type`")?;
    let name = p.expect_ident()?;
    let generics_list = generics::parse_generics(p)?;
    let ty = if p.eat(&TokenKind::Eq)? { Some(types::parse_type(p)?) } else { None };
    p.expect(&TokenKind::Semi, "`;`")?;
    Ok(TypeAliasDef { name, generics: generics_list, ty, span: p.end_span(ps) })
}

// ── Functions ────────────────────────────────────────────────────────────

fn parse_function(p: &mut Parser) -> PResult<Function> {
    let ps = p.start_span()?;
    let is_const = p.eat(&TokenKind::KwConst)?;
    let is_async = p.eat(&TokenKind::KwAsync)?;
    let is_unsafe = p.eat(&TokenKind::KwUnsafe)?;
    let abi = if p.eat(&TokenKind::KwExtern)? {
        if let TokenKind::Str(_) = p.peek_kind()? {
            let TokenKind::Str(s) = p.bump()?.kind else { unreachable!() };
            Some(s)
        } else {
            Some("C".to_string())
        }
    } else {
        None
    };
    p.expect(&TokenKind::KwFn, "`fn`")?;
    let name = p.expect_ident()?;
    let generics_list = generics::parse_generics(p)?;
    p.expect(&TokenKind::LParen, "`(`")?;
    let self_param = parse_self_param(p)?;
    let mut params = Vec::new();
    loop {
        if p.eat(&TokenKind::RParen)? {
            break;
        }
        let pattern = patterns::parse_pattern(p)?;
        p.expect(&TokenKind::Colon, "`:`")?;
        let ty = types::parse_type(p)?;
        params.push(Param { pattern, ty });
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::RParen, "`)`")?;
            break;
        }
    }
    let ret = if p.eat(&TokenKind::RArrow)? {
        types::parse_type(p)?
    } else {
        let span = p.peek_span()?;
        crate::ast::Type::new(crate::ast::TypeRef::Unit, span)
    };
    let where_clause = generics::parse_where_clause(p)?;
    let body = if p.eat(&TokenKind::Semi)? {
        None
    } else {
        let (stmts, tail) = exprs::parse_block_contents(p)?;
        let mut stmts = stmts;
        if let Some(tail) = tail {
            stmts.push(crate::ast::Stmt::Expr(*tail));
        }
        Some(stmts)
    };
    Ok(Function {
        name,
        is_unsafe,
        is_const,
        is_async,
        abi,
        generics: generics_list,
        self_param,
        params,
        ret,
        where_clause,
        body,
        span: p.end_span(ps),
    })
}

fn parse_self_param(p: &mut Parser) -> PResult<SelfParam> {
    match p.peek_kind()? {
        TokenKind::And => {
            // Could still be `&self` or a by-reference non-self first
            // parameter; only `&[mut] [lifetime] self` is the receiver.
            let is_self = matches!(p.peek2_kind()?, TokenKind::KwSelfValue) || matches!(p.peek2_kind()?, TokenKind::Lifetime(_) | TokenKind::KwMut);
            if !is_self {
                return Ok(SelfParam::None);
            }
            p.bump()?;
            let lifetime = if let TokenKind::Lifetime(_) = p.peek_kind()? {
                let TokenKind::Lifetime(l) = p.bump()?.kind else { unreachable!() };
                Some(l)
            } else {
                None
            };
            let mutable = p.eat(&TokenKind::KwMut)?;
            if !p.eat(&TokenKind::KwSelfValue)? {
                return Ok(SelfParam::None);
            }
            let _ = p.eat(&TokenKind::Comma)?;
            Ok(SelfParam::Ref { mutable, lifetime })
        }
        TokenKind::KwMut if matches!(p.peek2_kind()?, TokenKind::KwSelfValue) => {
            p.bump()?;
            p.bump()?;
            let self_param = if p.eat(&TokenKind::Colon)? { SelfParam::Typed(types::parse_type(p)?) } else { SelfParam::Value { mutable: true } };
            let _ = p.eat(&TokenKind::Comma)?;
            Ok(self_param)
        }
        TokenKind::KwSelfValue => {
            p.bump()?;
            let self_param = if p.eat(&TokenKind::Colon)? { SelfParam::Typed(types::parse_type(p)?) } else { SelfParam::Value { mutable: false } };
            let _ = p.eat(&TokenKind::Comma)?;
            Ok(self_param)
        }
        _ => Ok(SelfParam::None),
    }
}

// ── Structs & enums ──────────────────────────────────────────────────────

fn parse_repr(attrs_list: &[crate::ast::Attribute]) -> Repr {
    for a in attrs_list {
        if let crate::ast::MetaItem::List(name, items) = &a.meta {
            if name == "repr" {
                for item in items {
                    if let crate::ast::MetaItem::Name(n) = item {
                        match n.as_str() {
                            "C" => return Repr::C,
                            "u8" => return Repr::U8,
                            "u16" => return Repr::U16,
                            "u32" => return Repr::U32,
                            "packed" => return Repr::Packed,
                            _ => {}
                        }
                    }
                }
            }
        }
    }
    Repr::Rust
}

fn parse_struct_field(p: &mut Parser) -> PResult<StructField> {
    let field_attrs = attrs::parse_attrs(p)?;
    let public = matches!(attrs::parse_visibility(p)?, crate::ast::Visibility::Public);
    let name = p.expect_ident()?;
    p.expect(&TokenKind::Colon, "`:`")?;
    let ty = types::parse_type(p)?;
    Ok(StructField { name: Some(name), ty, public, attrs: field_attrs })
}

fn parse_tuple_field(p: &mut Parser) -> PResult<StructField> {
    let field_attrs = attrs::parse_attrs(p)?;
    let public = matches!(attrs::parse_visibility(p)?, crate::ast::Visibility::Public);
    let ty = types::parse_type(p)?;
    Ok(StructField { name: None, ty, public, attrs: field_attrs })
}

fn parse_struct(p: &mut Parser) -> PResult<StructDef> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::KwStruct, "`struct`")?;
    let name = p.expect_ident()?;
    let generics_list = generics::parse_generics(p)?;
    if matches!(p.peek_kind()?, TokenKind::LParen) {
        p.bump()?;
        let mut fields = Vec::new();
        loop {
            if p.eat(&TokenKind::RParen)? {
                break;
            }
            fields.push(parse_tuple_field(p)?);
            if !p.eat(&TokenKind::Comma)? {
                p.expect(&TokenKind::RParen, "`)`")?;
                break;
            }
        }
        let where_clause = generics::parse_where_clause(p)?;
        p.expect(&TokenKind::Semi, "`;`")?;
        return Ok(StructDef { name, generics: generics_list, where_clause, repr: Repr::Rust, body: StructBody::Tuple(fields), span: p.end_span(ps) });
    }
    let where_clause = generics::parse_where_clause(p)?;
    if p.eat(&TokenKind::Semi)? {
        return Ok(StructDef { name, generics: generics_list, where_clause, repr: Repr::Rust, body: StructBody::Unit, span: p.end_span(ps) });
    }
    p.expect(&TokenKind::LBrace, "`{`")?;
    let mut fields = Vec::new();
    loop {
        if p.eat(&TokenKind::RBrace)? {
            break;
        }
        fields.push(parse_struct_field(p)?);
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::RBrace, "`}`")?;
            break;
        }
    }
    Ok(StructDef { name, generics: generics_list, where_clause, repr: Repr::Rust, body: StructBody::Named(fields), span: p.end_span(ps) })
}

fn parse_enum(p: &mut Parser) -> PResult<EnumDef> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::KwEnum, "`enum`")?;
    let name = p.expect_ident()?;
    let generics_list = generics::parse_generics(p)?;
    let where_clause = generics::parse_where_clause(p)?;
    p.expect(&TokenKind::LBrace, "`{`")?;
    let mut variants = Vec::new();
    loop {
        if p.eat(&TokenKind::RBrace)? {
            break;
        }
        variants.push(parse_variant(p)?);
        if !p.eat(&TokenKind::Comma)? {
            p.expect(&TokenKind::RBrace, "`}`")?;
            break;
        }
    }
    Ok(EnumDef { name, generics: generics_list, where_clause, repr: Repr::Rust, variants, span: p.end_span(ps) })
}

fn parse_variant(p: &mut Parser) -> PResult<EnumVariant> {
    let variant_attrs = attrs::parse_attrs(p)?;
    let name = p.expect_ident()?;
    let body = match p.peek_kind()? {
        TokenKind::LParen => {
            p.bump()?;
            let mut fields = Vec::new();
            loop {
                if p.eat(&TokenKind::RParen)? {
                    break;
                }
                fields.push(parse_tuple_field(p)?);
                if !p.eat(&TokenKind::Comma)? {
                    p.expect(&TokenKind::RParen, "`)`")?;
                    break;
                }
            }
            crate::ast::VariantBody::Tuple(fields)
        }
        TokenKind::LBrace => {
            p.bump()?;
            let mut fields = Vec::new();
            loop {
                if p.eat(&TokenKind::RBrace)? {
                    break;
                }
                fields.push(parse_struct_field(p)?);
                if !p.eat(&TokenKind::Comma)? {
                    p.expect(&TokenKind::RBrace, "`}`")?;
                    break;
                }
            }
            crate::ast::VariantBody::Struct(fields)
        }
        TokenKind::Eq => {
            p.bump()?;
            crate::ast::VariantBody::Value(exprs::parse_expr(p)?)
        }
        _ => crate::ast::VariantBody::Unit,
    };
    Ok(EnumVariant { name, body, attrs: variant_attrs })
}

// ── Traits & impls ───────────────────────────────────────────────────────

fn parse_trait(p: &mut Parser, is_unsafe: bool) -> PResult<TraitDef> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::KwTrait, "`trait`")?;
    let name = p.expect_ident()?;
    let generics_list = generics::parse_generics(p)?;
    let supertraits = if p.eat(&TokenKind::Colon)? {
        generics::parse_trait_bounds(p)?.into_iter().map(|b| b.path).collect()
    } else {
        Vec::new()
    };
    let where_clause = generics::parse_where_clause(p)?;
    p.expect(&TokenKind::LBrace, "`{`")?;
    let mut items = Vec::new();
    loop {
        if p.eat(&TokenKind::RBrace)? {
            break;
        }
        items.push(parse_item(p)?);
    }
    let is_marker = items.is_empty();
    Ok(TraitDef { name, is_unsafe, is_marker, generics: generics_list, supertraits, where_clause, items, span: p.end_span(ps) })
}

fn parse_impl(p: &mut Parser, is_unsafe: bool) -> PResult<ImplDef> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::KwImpl, "`impl`")?;
    let generics_list = generics::parse_generics(p)?;
    let is_negative = p.eat(&TokenKind::Not)?;
    let first = types::parse_type(p)?;
    let (trait_, self_ty) = if p.eat(&TokenKind::KwFor)? {
        let trait_path = match first.kind {
            crate::ast::TypeRef::Path(path) => path,
            _ => return Err(ParseError::UnexpectedToken { found: TokenKind::KwFor, expected: vec!["a trait path before `for`"], span: first.span }),
        };
        (Some(trait_path), types::parse_type(p)?)
    } else {
        (None, first)
    };
    let where_clause = generics::parse_where_clause(p)?;
    p.expect(&TokenKind::LBrace, "`{`")?;
    let mut items = Vec::new();
    loop {
        if p.eat(&TokenKind::RBrace)? {
            break;
        }
        items.push(parse_item(p)?);
    }
    Ok(ImplDef { is_unsafe, is_negative, generics: generics_list, trait_, self_ty, where_clause, items, span: p.end_span(ps) })
}

// ── Modules ──────────────────────────────────────────────────────────────

fn parse_module(p: &mut Parser) -> PResult<ModuleDef> {
    let ps = p.start_span()?;
    p.expect(&TokenKind::KwMod, "`mod`")?;
    let name = p.expect_ident()?;
    let body = if p.eat(&TokenKind::Semi)? {
        // `mod foo;`: the file-system collaborator resolves `foo.rs` vs
        // `foo/mod.rs` and raises `ConflictingModuleFileLayout` if both
        // exist (spec.md sec 4.3) -- this crate never touches the
        // filesystem, so it only records that the body is external.
        ModuleBody::External
    } else {
        p.expect(&TokenKind::LBrace, "`{`")?;
        let mut items = Vec::new();
        loop {
            if p.eat(&TokenKind::RBrace)? {
                break;
            }
            items.push(parse_item(p)?);
        }
        ModuleBody::Inline(items)
    };
    Ok(ModuleDef { name, body, span: p.end_span(ps) })
}

