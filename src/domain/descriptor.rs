//! Import Descriptor
//!
//! One function's foreign binding, ready for emission.

use serde::Serialize;

/// Context opened by an annotated record for its immediate members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordContext<'a> {
    pub class_name: &'a str,
}

/// Describes how to wire one function to an external import.
///
/// `class_name` is present iff `kind != "func"`, `import_name` is present
/// iff `kind != "constructor"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportDescriptor {
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    pub mangled_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_name: Option<String>,
    pub param_types: Vec<String>,
    pub return_type: String,
}
