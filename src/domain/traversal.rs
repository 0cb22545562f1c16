//! Declaration Traversal
//!
//! Walks a declaration tree in declaration order and turns every annotated
//! function into an `ImportDescriptor`. An annotated record opens a
//! `RecordContext` for its immediate members only; nested records never
//! inherit it.

use tracing::debug;

use crate::domain::annotation::ParsedAnnotation;
use crate::domain::decl::{Decl, DeclKind, FunctionDecl};
use crate::domain::descriptor::{ImportDescriptor, RecordContext};
use crate::domain::error::ImportError;
use crate::ports::NameResolver;

pub struct DeclarationTraversal<'a> {
    resolver: &'a dyn NameResolver,
}

impl<'a> DeclarationTraversal<'a> {
    pub fn new(resolver: &'a dyn NameResolver) -> Self {
        Self { resolver }
    }

    /// Visit the whole tree, handing each descriptor to `sink` as soon as it is built.
    /// Stops at the first error.
    pub fn traverse<F>(&self, root: &Decl, sink: &mut F) -> Result<(), ImportError>
    where
        F: FnMut(ImportDescriptor) -> Result<(), ImportError>,
    {
        self.visit_decl(root, sink)
    }

    /// Collect all descriptors of a tree in traversal order.
    pub fn collect(&self, root: &Decl) -> Result<Vec<ImportDescriptor>, ImportError> {
        let mut descriptors = Vec::new();
        self.traverse(root, &mut |d| {
            descriptors.push(d);
            Ok(())
        })?;
        Ok(descriptors)
    }

    fn visit_decl<F>(&self, decl: &Decl, sink: &mut F) -> Result<(), ImportError>
    where
        F: FnMut(ImportDescriptor) -> Result<(), ImportError>,
    {
        match &decl.kind {
            DeclKind::Record => self.visit_record(decl, sink),
            DeclKind::Function(func) => self.visit_function(decl, func, None, sink),
            _ => self.visit_children(decl, sink),
        }
    }

    fn visit_record<F>(&self, record: &Decl, sink: &mut F) -> Result<(), ImportError>
    where
        F: FnMut(ImportDescriptor) -> Result<(), ImportError>,
    {
        let Some(parsed) = ParsedAnnotation::from_attr(record.annotation.as_deref()) else {
            return self.visit_children(record, sink);
        };

        let context = RecordContext { class_name: parsed.payload };
        debug!(record = %record.name, class = context.class_name, "entering annotated record");
        for member in &record.children {
            match &member.kind {
                DeclKind::Function(func) => self.visit_function(member, func, Some(context), sink)?,
                _ => self.visit_decl(member, sink)?,
            }
        }
        Ok(())
    }

    fn visit_function<F>(
        &self,
        decl: &Decl,
        func: &FunctionDecl,
        context: Option<RecordContext<'_>>,
        sink: &mut F,
    ) -> Result<(), ImportError>
    where
        F: FnMut(ImportDescriptor) -> Result<(), ImportError>,
    {
        if let Some(parsed) = ParsedAnnotation::from_attr(decl.annotation.as_deref()) {
            sink(self.describe(func, parsed, context)?)?;
        }
        // Items declared inside the body get no record context.
        self.visit_children(decl, sink)
    }

    fn visit_children<F>(&self, decl: &Decl, sink: &mut F) -> Result<(), ImportError>
    where
        F: FnMut(ImportDescriptor) -> Result<(), ImportError>,
    {
        for child in &decl.children {
            self.visit_decl(child, sink)?;
        }
        Ok(())
    }

    fn describe(
        &self,
        func: &FunctionDecl,
        parsed: ParsedAnnotation<'_>,
        context: Option<RecordContext<'_>>,
    ) -> Result<ImportDescriptor, ImportError> {
        let class_name = if parsed.is_func() {
            None
        } else {
            match context {
                Some(ctx) if !ctx.class_name.is_empty() => Some(ctx.class_name.to_string()),
                _ => {
                    return Err(ImportError::MissingClassName {
                        kind: parsed.kind.to_string(),
                        function: func.qualified_name(),
                    })
                }
            }
        };
        let import_name = if parsed.is_constructor() {
            None
        } else {
            Some(parsed.payload.to_string())
        };
        let mangled_name = self.resolver.resolve(func);
        debug!(function = %func.qualified_name(), mangled = %mangled_name, kind = parsed.kind, "import descriptor");

        Ok(ImportDescriptor {
            kind: parsed.kind.to_string(),
            class_name,
            mangled_name,
            import_name,
            param_types: func.params.clone(),
            return_type: func.ret.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Resolver backed by a fixed table, falling back to the qualified name.
    struct TableResolver(HashMap<String, String>);

    impl TableResolver {
        fn new(entries: &[(&str, &str)]) -> Self {
            Self(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            )
        }
    }

    impl NameResolver for TableResolver {
        fn resolve(&self, func: &FunctionDecl) -> String {
            let name = func.qualified_name();
            self.0.get(&name).cloned().unwrap_or(name)
        }
    }

    fn func(path: &[&str], params: &[&str], ret: &str) -> Decl {
        Decl::function(
            *path.last().unwrap(),
            FunctionDecl {
                path: path.iter().map(|s| s.to_string()).collect(),
                params: params.iter().map(|s| s.to_string()).collect(),
                ret: ret.to_string(),
                link_name: None,
            },
        )
    }

    #[test]
    fn test_top_level_func() {
        let tree = Decl::unit(
            "calc",
            vec![func(&["add"], &["int", "int"], "int").annotated("EM_IMPORT:func:jsAdd")],
        );
        let resolver = TableResolver::new(&[("add", "add_i_ii")]);
        let out = DeclarationTraversal::new(&resolver).collect(&tree).unwrap();

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, "func");
        assert_eq!(out[0].mangled_name, "add_i_ii");
        assert_eq!(out[0].import_name.as_deref(), Some("jsAdd"));
        assert_eq!(out[0].class_name, None);
        assert_eq!(out[0].param_types, vec!["int", "int"]);
    }

    #[test]
    fn test_unannotated_and_foreign_prefix_skipped() {
        let tree = Decl::unit(
            "calc",
            vec![
                func(&["plain"], &[], "void"),
                func(&["other"], &[], "void").annotated("noinline"),
                func(&["lower"], &[], "void").annotated("em_import:func:x"),
            ],
        );
        let resolver = TableResolver::new(&[]);
        let out = DeclarationTraversal::new(&resolver).collect(&tree).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_record_members_get_class_name() {
        let tree = Decl::unit(
            "ui",
            vec![Decl::record(
                "Widget",
                vec![
                    func(&["Widget", "resize"], &["int", "int"], "void")
                        .annotated("EM_IMPORT:method:foo:bar"),
                    func(&["Widget", "new"], &[], "Widget").annotated("EM_IMPORT:constructor:ignored"),
                    func(&["Widget", "helper"], &[], "void"),
                ],
            )
            .annotated("EM_IMPORT:record:Widget")],
        );
        let resolver = TableResolver::new(&[]);
        let out = DeclarationTraversal::new(&resolver).collect(&tree).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].kind, "method");
        assert_eq!(out[0].class_name.as_deref(), Some("Widget"));
        assert_eq!(out[0].import_name.as_deref(), Some("foo:bar"));
        assert_eq!(out[1].kind, "constructor");
        assert_eq!(out[1].class_name.as_deref(), Some("Widget"));
        assert_eq!(out[1].import_name, None);
    }

    #[test]
    fn test_func_member_emitted_once_without_class() {
        let tree = Decl::unit(
            "ui",
            vec![Decl::record(
                "Widget",
                vec![func(&["Widget", "count"], &[], "int").annotated("EM_IMPORT:func:widgetCount")],
            )
            .annotated("EM_IMPORT:record:Widget")],
        );
        let resolver = TableResolver::new(&[]);
        let out = DeclarationTraversal::new(&resolver).collect(&tree).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_name, None);
    }

    #[test]
    fn test_nested_record_does_not_inherit_context() {
        let inner = Decl::record(
            "Inner",
            vec![func(&["Outer", "Inner", "poke"], &[], "void").annotated("EM_IMPORT:method:poke")],
        );
        let tree = Decl::unit(
            "nest",
            vec![Decl::record("Outer", vec![inner]).annotated("EM_IMPORT:record:Outer")],
        );
        let resolver = TableResolver::new(&[]);
        let err = DeclarationTraversal::new(&resolver).collect(&tree).unwrap_err();
        match err {
            ImportError::MissingClassName { kind, function } => {
                assert_eq!(kind, "method");
                assert_eq!(function, "Outer::Inner::poke");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nested_record_with_own_annotation() {
        let inner = Decl::record(
            "Inner",
            vec![func(&["Outer", "Inner", "poke"], &[], "void").annotated("EM_IMPORT:method:poke")],
        )
        .annotated("EM_IMPORT:record:Inner");
        let tree = Decl::unit(
            "nest",
            vec![Decl::record("Outer", vec![inner]).annotated("EM_IMPORT:record:Outer")],
        );
        let resolver = TableResolver::new(&[]);
        let out = DeclarationTraversal::new(&resolver).collect(&tree).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].class_name.as_deref(), Some("Inner"));
    }

    #[test]
    fn test_method_without_record_is_fatal() {
        let tree = Decl::unit(
            "bad",
            vec![func(&["bar"], &[], "void").annotated("EM_IMPORT:method:bar")],
        );
        let resolver = TableResolver::new(&[]);
        let result = DeclarationTraversal::new(&resolver).collect(&tree);
        assert!(matches!(result, Err(ImportError::MissingClassName { .. })));
    }

    #[test]
    fn test_unparsed_record_annotation_gives_no_context() {
        let tree = Decl::unit(
            "ui",
            vec![Decl::record(
                "Widget",
                vec![
                    func(&["Widget", "create"], &[], "int").annotated("EM_IMPORT:func:create"),
                    func(&["Widget", "draw"], &[], "void").annotated("EM_IMPORT:method:draw"),
                ],
            )
            .annotated("packed")],
        );
        let resolver = TableResolver::new(&[]);
        let mut seen = Vec::new();
        let result = DeclarationTraversal::new(&resolver).traverse(&tree, &mut |d| {
            seen.push(d.mangled_name);
            Ok(())
        });
        assert!(matches!(result, Err(ImportError::MissingClassName { .. })));
        assert_eq!(seen, vec!["Widget::create"]);
    }

    #[test]
    fn test_empty_class_name_is_missing() {
        let tree = Decl::unit(
            "ui",
            vec![Decl::record(
                "Widget",
                vec![func(&["Widget", "draw"], &[], "void").annotated("EM_IMPORT:method:draw")],
            )
            .annotated("EM_IMPORT:record")],
        );
        let resolver = TableResolver::new(&[]);
        assert!(DeclarationTraversal::new(&resolver).collect(&tree).is_err());
    }

    #[test]
    fn test_function_body_items_are_visited() {
        let body_fn = func(&["outer", "inner"], &[], "void").annotated("EM_IMPORT:func:innerImport");
        let outer = func(&["outer"], &[], "void").with_children(vec![body_fn]);
        let tree = Decl::unit("body", vec![Decl::namespace("ns", vec![outer])]);
        let resolver = TableResolver::new(&[]);
        let out = DeclarationTraversal::new(&resolver).collect(&tree).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].import_name.as_deref(), Some("innerImport"));
    }

    #[test]
    fn test_declaration_order_and_determinism() {
        let tree = Decl::unit(
            "order",
            vec![
                func(&["b"], &[], "void").annotated("EM_IMPORT:func:second"),
                Decl::other("CONST"),
                func(&["a"], &[], "void").annotated("EM_IMPORT:func:first"),
            ],
        );
        let resolver = TableResolver::new(&[]);
        let traversal = DeclarationTraversal::new(&resolver);
        let first = traversal.collect(&tree).unwrap();
        let second = traversal.collect(&tree).unwrap();
        assert_eq!(first, second);
        let names: Vec<_> = first.iter().map(|d| d.import_name.clone().unwrap()).collect();
        assert_eq!(names, vec!["second", "first"]);
    }
}
