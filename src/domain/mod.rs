// Domain model and core algorithms for em-import.

pub mod annotation;
pub mod decl;
pub mod descriptor;
pub mod error;
pub mod traversal;
