// Declaration tree for em-import.
// These types represent one translation unit in a form suitable for import extraction.

/// A node in the declaration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decl {
    pub kind: DeclKind,
    pub name: String,
    /// Raw text of the first `annotate` attribute, if any.
    pub annotation: Option<String>,
    pub children: Vec<Decl>,
}

/// Supported declaration types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeclKind {
    /// Root of a translation unit.
    Unit,
    Namespace,
    /// Aggregate type whose immediate members may share one import context.
    Record,
    Function(FunctionDecl),
    Other,
}

/// Signature data of a function declaration, as seen by the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionDecl {
    /// Fully qualified path, crate name first, function name last.
    pub path: Vec<String>,
    /// Formal parameter type spellings in declaration order.
    pub params: Vec<String>,
    pub ret: String,
    /// Symbol name pinned by the source (`no_mangle`, `export_name`, foreign items).
    pub link_name: Option<String>,
}

impl FunctionDecl {
    pub fn qualified_name(&self) -> String {
        self.path.join("::")
    }
}

impl Decl {
    pub fn unit(name: impl Into<String>, children: Vec<Decl>) -> Self {
        Self {
            kind: DeclKind::Unit,
            name: name.into(),
            annotation: None,
            children,
        }
    }

    pub fn namespace(name: impl Into<String>, children: Vec<Decl>) -> Self {
        Self {
            kind: DeclKind::Namespace,
            name: name.into(),
            annotation: None,
            children,
        }
    }

    pub fn record(name: impl Into<String>, children: Vec<Decl>) -> Self {
        Self {
            kind: DeclKind::Record,
            name: name.into(),
            annotation: None,
            children,
        }
    }

    pub fn function(name: impl Into<String>, func: FunctionDecl) -> Self {
        Self {
            kind: DeclKind::Function(func),
            name: name.into(),
            annotation: None,
            children: vec![],
        }
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self {
            kind: DeclKind::Other,
            name: name.into(),
            annotation: None,
            children: vec![],
        }
    }

    /// Attach annotation text (builder style).
    pub fn annotated(mut self, text: impl Into<String>) -> Self {
        self.annotation = Some(text.into());
        self
    }

    pub fn with_children(mut self, children: Vec<Decl>) -> Self {
        self.children = children;
        self
    }

    pub fn as_function(&self) -> Option<&FunctionDecl> {
        match &self.kind {
            DeclKind::Function(func) => Some(func),
            _ => None,
        }
    }

    pub fn is_record(&self) -> bool {
        matches!(self.kind, DeclKind::Record)
    }
}
