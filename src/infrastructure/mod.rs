// Infrastructure implementations for em-import.

use syn::punctuated::Punctuated;
use syn::{Attribute, Expr, FnArg, ImplItem, Item, Lit, LitStr, Meta, Signature, Stmt, Token, TraitItem, Type};

use crate::domain::decl::{Decl, FunctionDecl};
use crate::domain::error::ParseError;
use crate::ports::DeclParser;

pub mod concurrency;
pub mod config;
pub mod logging;
pub mod mangler;
pub mod project_loader;
pub mod spelling;

pub use mangler::LegacyMangler;

use spelling::{return_spelling, tokens_spelling, type_spelling};

/// Attribute carrying import annotation text, e.g. `#[annotate("EM_IMPORT:func:jsAdd")]`.
pub const ANNOTATE_ATTR: &str = "annotate";

/// Rust frontend: lowers a source file into a declaration tree.
pub struct SynDeclParser;

impl DeclParser for SynDeclParser {
    fn parse_unit(&self, module_path: &str, file_path: &str, code: &str) -> Result<Decl, ParseError> {
        let ast_file = syn::parse_file(code).map_err(|e| {
            let start = e.span().start();
            ParseError::Syntax {
                file: file_path.to_string(),
                message: format!("{}:{}: {}", start.line, start.column, e),
            }
        })?;
        let scope: Vec<String> = module_path.split("::").map(str::to_string).collect();
        Ok(Decl::unit(file_path, lower_items(&ast_file.items, &scope)))
    }
}

fn lower_items(items: &[Item], scope: &[String]) -> Vec<Decl> {
    items.iter().map(|item| lower_item(item, scope)).collect()
}

fn lower_item(item: &Item, scope: &[String]) -> Decl {
    match item {
        Item::Fn(func) => {
            let link_name = pinned_name(&func.attrs, &func.sig.ident.to_string());
            lower_fn(&func.attrs, &func.sig, Some(func.block.stmts.as_slice()), scope, link_name)
        }
        Item::Mod(module) => {
            let name = module.ident.to_string();
            let inner = scoped(scope, &name);
            let children = module
                .content
                .as_ref()
                .map(|(_, items)| lower_items(items, &inner))
                .unwrap_or_default();
            with_annotation(Decl::namespace(name, children), &module.attrs)
        }
        Item::Impl(imp) => {
            let name = self_type_name(&imp.self_ty);
            let inner = scoped(scope, &impl_segment(imp));
            let members = imp
                .items
                .iter()
                .map(|member| match member {
                    ImplItem::Fn(method) => {
                        let link_name = pinned_name(&method.attrs, &method.sig.ident.to_string());
                        lower_fn(&method.attrs, &method.sig, Some(method.block.stmts.as_slice()), &inner, link_name)
                    }
                    ImplItem::Const(c) => with_annotation(Decl::other(c.ident.to_string()), &c.attrs),
                    ImplItem::Type(t) => with_annotation(Decl::other(t.ident.to_string()), &t.attrs),
                    ImplItem::Macro(m) => Decl::other(macro_name(&m.mac)),
                    _ => Decl::other("<verbatim>"),
                })
                .collect();
            with_annotation(Decl::record(name, members), &imp.attrs)
        }
        Item::Trait(tr) => {
            let name = tr.ident.to_string();
            let inner = scoped(scope, &name);
            let members = tr
                .items
                .iter()
                .map(|member| match member {
                    TraitItem::Fn(method) => {
                        let body = method.default.as_ref().map(|block| block.stmts.as_slice());
                        lower_fn(&method.attrs, &method.sig, body, &inner, None)
                    }
                    TraitItem::Const(c) => with_annotation(Decl::other(c.ident.to_string()), &c.attrs),
                    TraitItem::Type(t) => with_annotation(Decl::other(t.ident.to_string()), &t.attrs),
                    TraitItem::Macro(m) => Decl::other(macro_name(&m.mac)),
                    _ => Decl::other("<verbatim>"),
                })
                .collect();
            with_annotation(Decl::record(name, members), &tr.attrs)
        }
        Item::ForeignMod(foreign) => {
            let abi = foreign
                .abi
                .name
                .as_ref()
                .map(LitStr::value)
                .unwrap_or_else(|| "C".to_string());
            let children = foreign
                .items
                .iter()
                .map(|member| match member {
                    syn::ForeignItem::Fn(func) => {
                        let link_name = foreign_link_name(&func.attrs)
                            .unwrap_or_else(|| func.sig.ident.to_string());
                        lower_fn(&func.attrs, &func.sig, None, scope, Some(link_name))
                    }
                    syn::ForeignItem::Static(st) => Decl::other(st.ident.to_string()),
                    syn::ForeignItem::Type(ty) => Decl::other(ty.ident.to_string()),
                    syn::ForeignItem::Macro(m) => Decl::other(macro_name(&m.mac)),
                    _ => Decl::other("<verbatim>"),
                })
                .collect();
            with_annotation(Decl::namespace(format!("extern \"{}\"", abi), children), &foreign.attrs)
        }
        other => Decl::other(item_name(other)),
    }
}

fn lower_fn(
    attrs: &[Attribute],
    sig: &Signature,
    body: Option<&[Stmt]>,
    scope: &[String],
    link_name: Option<String>,
) -> Decl {
    let name = sig.ident.to_string();
    let path = scoped(scope, &name);
    // Receivers are implicit, like C++ `this`.
    let params = sig
        .inputs
        .iter()
        .filter_map(|arg| match arg {
            FnArg::Typed(pat_type) => Some(type_spelling(&pat_type.ty)),
            FnArg::Receiver(_) => None,
        })
        .collect();
    let children = body
        .map(|stmts| {
            stmts
                .iter()
                .filter_map(|stmt| match stmt {
                    Stmt::Item(item) => Some(lower_item(item, &path)),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let func = FunctionDecl {
        path,
        params,
        ret: return_spelling(&sig.output),
        link_name,
    };
    with_annotation(Decl::function(name, func).with_children(children), attrs)
}

fn scoped(scope: &[String], name: &str) -> Vec<String> {
    let mut path = scope.to_vec();
    path.push(name.to_string());
    path
}

fn with_annotation(mut decl: Decl, attrs: &[Attribute]) -> Decl {
    decl.annotation = annotation_text(attrs);
    decl
}

/// Text of the first `annotate` attribute. `#[annotate("..")]`,
/// `#[annotate = ".."]` and `#[cfg_attr(<pred>, annotate(".."))]` are accepted.
pub fn annotation_text(attrs: &[Attribute]) -> Option<String> {
    attrs.iter().find_map(|attr| {
        if attr.path().is_ident("cfg_attr") {
            let nested = attr
                .parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)
                .ok()?;
            nested
                .iter()
                .skip(1)
                .find(|meta| meta.path().is_ident(ANNOTATE_ATTR))
                .map(annotate_value)?
        } else if attr.path().is_ident(ANNOTATE_ATTR) {
            annotate_value(&attr.meta)
        } else {
            None
        }
    })
}

fn annotate_value(meta: &Meta) -> Option<String> {
    match meta {
        Meta::List(list) => list.parse_args::<LitStr>().ok().map(|lit| lit.value()),
        Meta::NameValue(nv) => string_value(&nv.value),
        Meta::Path(_) => None,
    }
}

/// Symbol name fixed by `no_mangle` or `export_name`, plain or wrapped in `unsafe(..)`.
fn pinned_name(attrs: &[Attribute], ident: &str) -> Option<String> {
    attrs.iter().find_map(|attr| {
        if attr.path().is_ident("unsafe") {
            let inner = attr.parse_args::<Meta>().ok()?;
            link_meta(&inner, ident)
        } else {
            link_meta(&attr.meta, ident)
        }
    })
}

fn link_meta(meta: &Meta, ident: &str) -> Option<String> {
    match meta {
        Meta::Path(path) if path.is_ident("no_mangle") => Some(ident.to_string()),
        Meta::NameValue(nv) if nv.path.is_ident("export_name") => string_value(&nv.value),
        _ => None,
    }
}

fn foreign_link_name(attrs: &[Attribute]) -> Option<String> {
    attrs.iter().find_map(|attr| match &attr.meta {
        Meta::NameValue(nv) if nv.path.is_ident("link_name") => string_value(&nv.value),
        _ => None,
    })
}

fn string_value(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(s) => Some(s.value()),
            _ => None,
        },
        _ => None,
    }
}

fn self_type_name(ty: &Type) -> String {
    match ty {
        Type::Path(tp) => tp
            .path
            .segments
            .last()
            .map(|segment| segment.ident.to_string())
            .unwrap_or_default(),
        Type::Reference(r) => self_type_name(&r.elem),
        other => type_spelling(other),
    }
}

/// Path segment of an impl block. Trait impls read `<Foo as Display>` so
/// that methods of different traits on one type stay distinct.
fn impl_segment(imp: &syn::ItemImpl) -> String {
    let self_ty = type_spelling(&imp.self_ty);
    match &imp.trait_ {
        Some((negative, path, _)) => {
            let bang = if negative.is_some() { "!" } else { "" };
            format!("<{} as {}{}>", self_ty, bang, tokens_spelling(path))
        }
        None => self_ty,
    }
}

fn macro_name(mac: &syn::Macro) -> String {
    mac.path
        .segments
        .last()
        .map(|segment| format!("{}!", segment.ident))
        .unwrap_or_else(|| "<macro>".to_string())
}

fn item_name(item: &Item) -> String {
    match item {
        Item::Struct(s) => s.ident.to_string(),
        Item::Enum(e) => e.ident.to_string(),
        Item::Union(u) => u.ident.to_string(),
        Item::Const(c) => c.ident.to_string(),
        Item::Static(s) => s.ident.to_string(),
        Item::Type(t) => t.ident.to_string(),
        Item::TraitAlias(t) => t.ident.to_string(),
        Item::ExternCrate(e) => format!("extern crate {}", e.ident),
        Item::Use(u) => format!("use {}", tokens_spelling(&u.tree)),
        Item::Macro(m) => macro_name(&m.mac),
        _ => "<verbatim>".to_string(),
    }
}
