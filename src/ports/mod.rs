use std::io::Write;

use crate::domain::decl::{Decl, FunctionDecl};
use crate::domain::descriptor::ImportDescriptor;
use crate::domain::error::{ImportError, ParseError};

pub mod descriptor_emitter;

/// Frontend turning one translation unit into a declaration tree.
pub trait DeclParser: Sync {
    fn parse_unit(&self, module_path: &str, file_path: &str, code: &str) -> Result<Decl, ParseError>;
}

/// Computes the linkage-stable symbol name of a function.
pub trait NameResolver {
    fn resolve(&self, func: &FunctionDecl) -> String;
}

/// Serializes descriptors into an append-only sink.
pub trait DescriptorEmitter {
    fn emit(&self, descriptor: &ImportDescriptor, sink: &mut dyn Write) -> Result<(), ImportError>;
}
