//! Text template rendering for package members.
//!
//! Members are rendered with `tera`: `{{ Title }}` interpolation,
//! `{% for p in ChartData %}` loops with `loop.index`/`loop.index0`,
//! `{% if %}`/`{% elif %}`/`{% else %}` and `{% set %}`. Every template gets
//! the `xmlEscape` filter and the `add(a=, b=)` function on top of tera's
//! built-ins (`length` and friends). Autoescaping is off; escaping is explicit.

mod funcs;

pub use funcs::xml_escape;

use crate::services::fs_utils::file_utils;
use crate::types::errors::{AssemblyError, AssemblyResult};
use serde_json::Value;
use std::error::Error as _;
use std::fs;
use std::path::Path;
use tera::{Context, ErrorKind, Tera};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TemplateError {
    #[error("template {name}: {message}")]
    Syntax { name: String, message: String },
    #[error("template {name}: field {field} is not provided by the data")]
    MissingField { name: String, field: String },
    #[error("template {name}: {message}")]
    Exec { name: String, message: String },
}

/// A parsed template, reusable across data values.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    tera: Tera,
}

impl Template {
    pub fn parse(name: &str, source: &str) -> Result<Self, TemplateError> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        funcs::register(&mut tera);
        tera.add_raw_template(name, source)
            .map_err(|e| TemplateError::Syntax {
                name: name.to_string(),
                message: chain_message(&e),
            })?;
        Ok(Self {
            name: name.to_string(),
            tera,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn execute(&self, data: &Value) -> Result<String, TemplateError> {
        let context = Context::from_serialize(data).map_err(|e| TemplateError::Exec {
            name: self.name.clone(),
            message: chain_message(&e),
        })?;
        self.tera
            .render(&self.name, &context)
            .map_err(|e| classify(&self.name, &e))
    }
}

/// Maps a render failure onto the template error taxonomy.
///
/// tera nests the interesting error under "Failed to render", so the whole
/// source chain is inspected.
fn classify(name: &str, err: &tera::Error) -> TemplateError {
    let mut current: Option<&(dyn std::error::Error + 'static)> = Some(err);
    while let Some(e) = current {
        if let Some(te) = e.downcast_ref::<tera::Error>() {
            match &te.kind {
                ErrorKind::FilterNotFound(f) => {
                    return TemplateError::Syntax {
                        name: name.to_string(),
                        message: format!("filter {f:?} not defined"),
                    }
                }
                ErrorKind::FunctionNotFound(f) => {
                    return TemplateError::Syntax {
                        name: name.to_string(),
                        message: format!("function {f:?} not defined"),
                    }
                }
                ErrorKind::Msg(msg) => {
                    if let Some(field) = missing_variable(msg) {
                        return TemplateError::MissingField {
                            name: name.to_string(),
                            field,
                        };
                    }
                }
                _ => {}
            }
        }
        current = e.source();
    }
    TemplateError::Exec {
        name: name.to_string(),
        message: chain_message(err),
    }
}

/// Extracts `X` from "Variable `X` not found in context ...".
fn missing_variable(message: &str) -> Option<String> {
    let rest = message.strip_prefix("Variable `")?;
    let (field, tail) = rest.split_once('`')?;
    tail.contains("not found in context")
        .then(|| field.to_string())
}

fn chain_message(err: &tera::Error) -> String {
    let mut parts = vec![err.to_string()];
    let mut current = err.source();
    while let Some(e) = current {
        parts.push(e.to_string());
        current = e.source();
    }
    parts.join(": ")
}

/// Parses `source` and renders it against `data` in one step.
pub fn render(name: &str, source: &str, data: &Value) -> Result<String, TemplateError> {
    Template::parse(name, source)?.execute(data)
}

/// Renders the template file at `source_path` into `dest_path`.
///
/// The text is rendered in memory first; the destination (and its parent
/// directories) is created or truncated only once rendering succeeded.
pub fn render_template_file(
    member: &str,
    source_path: &Path,
    dest_path: &Path,
    data: &Value,
) -> AssemblyResult<usize> {
    let source = fs::read_to_string(source_path).map_err(|e| AssemblyError::io(source_path, e))?;

    let rendered = render(member, &source, data).map_err(|source| AssemblyError::Template {
        member: member.to_string(),
        source,
    })?;

    file_utils::write_truncating(dest_path, rendered.as_bytes())?;
    log::debug!(
        "Rendered template {member} ({} bytes) into {}",
        rendered.len(),
        dest_path.display()
    );
    Ok(rendered.len())
}

#[cfg(test)]
#[path = "tests/template_tests.rs"]
mod template_tests;
