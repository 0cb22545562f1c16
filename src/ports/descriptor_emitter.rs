//! Descriptor Emitters
//!
//! Line-oriented serializations of `ImportDescriptor`.

use std::io::Write;

use clap::ValueEnum;
use serde::Deserialize;

use super::DescriptorEmitter;
use crate::domain::descriptor::ImportDescriptor;
use crate::domain::error::ImportError;

/// Output line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `(kind "Class" mangled "import" ("T1" "T2") "Ret")`
    #[default]
    Sexpr,
    /// One JSON object per line.
    Json,
}

impl OutputFormat {
    pub fn emitter(&self) -> &'static dyn DescriptorEmitter {
        match self {
            OutputFormat::Sexpr => &SexprEmitter,
            OutputFormat::Json => &JsonLinesEmitter,
        }
    }
}

pub struct SexprEmitter;

impl SexprEmitter {
    /// Render one descriptor as a newline-terminated line.
    pub fn to_line(descriptor: &ImportDescriptor) -> String {
        let mut line = format!("({}", descriptor.kind);
        if let Some(class_name) = &descriptor.class_name {
            line.push_str(&format!(" \"{}\"", class_name));
        }
        line.push(' ');
        line.push_str(&descriptor.mangled_name);
        if let Some(import_name) = &descriptor.import_name {
            line.push_str(&format!(" \"{}\"", import_name));
        }
        let params: Vec<String> = descriptor
            .param_types
            .iter()
            .map(|t| format!("\"{}\"", t))
            .collect();
        line.push_str(&format!(" ({}) \"{}\")\n", params.join(" "), descriptor.return_type));
        line
    }
}

impl DescriptorEmitter for SexprEmitter {
    fn emit(&self, descriptor: &ImportDescriptor, sink: &mut dyn Write) -> Result<(), ImportError> {
        sink.write_all(Self::to_line(descriptor).as_bytes())?;
        Ok(())
    }
}

pub struct JsonLinesEmitter;

impl DescriptorEmitter for JsonLinesEmitter {
    fn emit(&self, descriptor: &ImportDescriptor, sink: &mut dyn Write) -> Result<(), ImportError> {
        serde_json::to_writer(&mut *sink, descriptor)?;
        sink.write_all(b"\n")?;
        Ok(())
    }
}
