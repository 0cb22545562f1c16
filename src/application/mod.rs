use std::io::Write;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::domain::decl::Decl;
use crate::domain::error::{ImportError, ParseError};
use crate::domain::traversal::DeclarationTraversal;
use crate::infrastructure::project_loader::SourceUnit;
use crate::ports::{DeclParser, DescriptorEmitter, NameResolver};

/// Outcome of one extraction run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractReport {
    pub units: usize,
    pub descriptors: usize,
    /// Units skipped because the frontend rejected them: (file, message).
    pub failed: Vec<(String, String)>,
}

pub struct ExtractUsecase<'a> {
    pub parser: &'a dyn DeclParser,
    pub resolver: &'a dyn NameResolver,
    pub emitter: &'a dyn DescriptorEmitter,
    /// Pool for parsing; the global rayon pool when absent.
    pub pool: Option<&'a rayon::ThreadPool>,
}

impl<'a> ExtractUsecase<'a> {
    /// Extract every unit into an in-memory buffer. Nothing is returned
    /// unless all parsed units traverse cleanly.
    pub fn render(&self, sources: &[SourceUnit]) -> Result<(Vec<u8>, ExtractReport), ImportError> {
        let parsed = match self.pool {
            Some(pool) => pool.install(|| parse_all(self.parser, sources)),
            None => parse_all(self.parser, sources),
        };

        let traversal = DeclarationTraversal::new(self.resolver);
        let mut buffer = Vec::new();
        let mut report = ExtractReport::default();

        for ((_, file_path, _), unit) in sources.iter().zip(parsed) {
            let tree = match unit {
                Ok(tree) => tree,
                Err(ParseError::Syntax { file, message }) => {
                    warn!(file = %file, "skipping unit: {}", message);
                    report.failed.push((file, message));
                    continue;
                }
            };
            let before = report.descriptors;
            traversal.traverse(&tree, &mut |descriptor| {
                self.emitter.emit(&descriptor, &mut buffer)?;
                report.descriptors += 1;
                Ok(())
            })?;
            report.units += 1;
            info!(file = %file_path, imports = report.descriptors - before, "extracted unit");
        }

        Ok((buffer, report))
    }

    /// Extract and append the result to `sink`.
    pub fn run(&self, sources: &[SourceUnit], sink: &mut dyn Write) -> Result<ExtractReport, ImportError> {
        let (buffer, report) = self.render(sources)?;
        sink.write_all(&buffer)?;
        sink.flush()?;
        Ok(report)
    }
}

fn parse_all(parser: &dyn DeclParser, sources: &[SourceUnit]) -> Vec<Result<Decl, ParseError>> {
    sources
        .par_iter()
        .map(|(module_path, file_path, code)| parser.parse_unit(module_path, file_path, code))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{LegacyMangler, SynDeclParser};
    use crate::ports::descriptor_emitter::SexprEmitter;

    fn unit(name: &str, code: &str) -> SourceUnit {
        (name.to_string(), format!("{}.rs", name), code.to_string())
    }

    fn usecase() -> ExtractUsecase<'static> {
        ExtractUsecase {
            parser: &SynDeclParser,
            resolver: &LegacyMangler,
            emitter: &SexprEmitter,
            pool: None,
        }
    }

    #[test]
    fn test_units_in_input_order() {
        let sources = vec![
            unit("b", r#"#[annotate("EM_IMPORT:func:second")] fn g() {}"#),
            unit("a", r#"#[annotate("EM_IMPORT:func:first")] fn f() {}"#),
        ];
        let mut out = Vec::new();
        let report = usecase().run(&sources, &mut out).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "(func _ZN1b1gE \"second\" () \"()\")\n(func _ZN1a1fE \"first\" () \"()\")\n"
        );
        assert_eq!(report.units, 2);
        assert_eq!(report.descriptors, 2);
    }

    #[test]
    fn test_violation_writes_nothing() {
        let sources = vec![
            unit("ok", r#"#[annotate("EM_IMPORT:func:fine")] fn f() {}"#),
            unit("bad", r#"#[annotate("EM_IMPORT:method:bar")] fn bar() {}"#),
        ];
        let mut out = Vec::new();
        let err = usecase().run(&sources, &mut out).unwrap_err();
        assert!(matches!(err, ImportError::MissingClassName { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_syntax_error_skips_unit() {
        let sources = vec![
            unit("broken", "fn ("),
            unit("ok", r#"#[annotate("EM_IMPORT:func:fine")] fn f() {}"#),
        ];
        let (buffer, report) = usecase().render(&sources).unwrap();
        assert_eq!(report.units, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "broken.rs");
        assert!(String::from_utf8(buffer).unwrap().contains("\"fine\""));
    }
}
