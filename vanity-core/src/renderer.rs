use serde::Serialize;
use tera::Context;

use crate::template::{Templates, error_chain};

#[derive(Debug)]
pub enum RenderError {
    UnknownTemplate(String),
    InvalidData(String),
    TeraError(tera::Error),
    SerializationError(serde_json::Error),
}

impl From<tera::Error> for RenderError {
    fn from(err: tera::Error) -> Self {
        RenderError::TeraError(err)
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(err: serde_json::Error) -> Self {
        RenderError::SerializationError(err)
    }
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::UnknownTemplate(name) => write!(f, "Unknown template: {}", name),
            RenderError::InvalidData(kind) => {
                write!(f, "Template data must be a map, got {}", kind)
            }
            RenderError::TeraError(e) => write!(f, "Template error: {}", error_chain(e)),
            RenderError::SerializationError(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for RenderError {}

/// Renders pages from a borrowed set of compiled templates.
pub struct Renderer<'a> {
    templates: &'a Templates,
}

impl<'a> Renderer<'a> {
    pub fn new(templates: &'a Templates) -> Self {
        Self { templates }
    }

    /// Render `template` with the fields of `data` as the top-level context.
    ///
    /// Nothing is written anywhere; a failed render only produces an error.
    pub fn render<T: Serialize>(&self, template: &str, data: &T) -> Result<Vec<u8>, RenderError> {
        if !self.templates.has_template(template) {
            return Err(RenderError::UnknownTemplate(template.to_string()));
        }

        let value = serde_json::to_value(data)?;
        if !value.is_object() {
            return Err(RenderError::InvalidData(json_kind(&value).to_string()));
        }

        let context = Context::from_value(value)?;
        let html = self.templates.tera().render(template, &context)?;

        Ok(html.into_bytes())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "a map",
    }
}
