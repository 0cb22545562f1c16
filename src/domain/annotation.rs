//! Annotation Parser
//!
//! Recognizes `EM_IMPORT:<kind>[:<payload>]` annotation text.

/// Marker every import annotation starts with.
pub const IMPORT_PREFIX: &str = "EM_IMPORT:";

/// Separator between kind and payload. Only the first occurrence splits.
pub const SEPARATOR: char = ':';

/// Kind valid outside a record context.
pub const KIND_FUNC: &str = "func";

/// Kind invoked by convention, carries no import name.
pub const KIND_CONSTRUCTOR: &str = "constructor";

/// A recognized import annotation, borrowing from the raw text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedAnnotation<'a> {
    pub kind: &'a str,
    /// Everything after the first separator, verbatim. Empty if there is none.
    pub payload: &'a str,
}

impl<'a> ParsedAnnotation<'a> {
    /// Parse raw annotation text. Returns `None` when the text is not an
    /// import annotation, which callers treat as "not annotated".
    pub fn parse(text: &'a str) -> Option<Self> {
        let rest = text.strip_prefix(IMPORT_PREFIX)?;
        let (kind, payload) = rest.split_once(SEPARATOR).unwrap_or((rest, ""));
        Some(Self { kind, payload })
    }

    /// Parse an optional annotation, as attached to a declaration.
    pub fn from_attr(text: Option<&'a str>) -> Option<Self> {
        text.and_then(Self::parse)
    }

    pub fn is_func(&self) -> bool {
        self.kind == KIND_FUNC
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == KIND_CONSTRUCTOR
    }
}
