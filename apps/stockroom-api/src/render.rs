//! # Template Rendering
//!
//! Turns a serializable context into an HTML page.
//!
//! ## How Pages Are Built
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  StockPageContext ──serde──► serde_json::Value                          │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │  templates/stocks/index.html  (embedded at compile time)               │
//! │  ├── {{ title }}, {{ keyword }}, ...   top-level scalars, escaped      │
//! │  └── {{ context_json }}                whole context for the script    │
//! │                                    │                                    │
//! │                                    ▼                                    │
//! │                               HTML string                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers only see the [`TemplateRenderer`] trait, so tests and other
//! front ends can swap the implementation.

use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Template name of the home page.
pub const INDEX_TEMPLATE: &str = "index.html";

/// Template name of the stock listing page.
pub const STOCKS_TEMPLATE: &str = "stocks/index.html";

/// Placeholder key replaced with the whole context as JSON.
const CONTEXT_KEY: &str = "context_json";

/// Rendering errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),

    #[error("Template context is not a JSON object")]
    InvalidContext,

    #[error("Failed to serialize template context: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Renders a named template with a JSON context.
pub trait TemplateRenderer: Send + Sync {
    /// Renders `template` with `context` (a JSON object).
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError>;
}

// =============================================================================
// Embedded Renderer
// =============================================================================

/// Renderer over HTML shells compiled into the binary.
///
/// Replaces `{{ key }}` with the top-level context value of that name
/// (HTML-escaped; empty for missing, null or nested values) and
/// `{{ context_json }}` with the whole context, safe to place inside a
/// `<script>` element.
pub struct EmbeddedRenderer {
    templates: HashMap<&'static str, &'static str>,
}

impl EmbeddedRenderer {
    /// Creates a renderer with the shipped templates.
    pub fn new() -> Self {
        let mut templates = HashMap::new();
        templates.insert(INDEX_TEMPLATE, include_str!("../templates/index.html"));
        templates.insert(STOCKS_TEMPLATE, include_str!("../templates/stocks/index.html"));
        EmbeddedRenderer { templates }
    }
}

impl Default for EmbeddedRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for EmbeddedRenderer {
    fn render(&self, template: &str, context: &Value) -> Result<String, RenderError> {
        let source = self
            .templates
            .get(template)
            .ok_or_else(|| RenderError::UnknownTemplate(template.to_string()))?;
        let fields = context.as_object().ok_or(RenderError::InvalidContext)?;

        // Single pass, so substituted text is never scanned again
        let mut html = String::with_capacity(source.len());
        let mut rest: &str = source;
        while let Some(start) = rest.find("{{ ") {
            html.push_str(&rest[..start]);
            let after = &rest[start + 3..];
            let Some(end) = after.find(" }}") else {
                rest = &rest[start..];
                break;
            };

            let key = &after[..end];
            if key == CONTEXT_KEY {
                html.push_str(&script_safe_json(context)?);
            } else {
                html.push_str(&escape_html(&scalar_text(fields.get(key))));
            }
            rest = &after[end + 3..];
        }
        html.push_str(rest);

        Ok(html)
    }
}

/// Display text of a top-level context value ("" for missing or nested values).
fn scalar_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(value @ (Value::Bool(_) | Value::Number(_))) => value.to_string(),
        _ => String::new(),
    }
}

/// Escapes text for HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Serializes `value` so it cannot close the surrounding `<script>` element.
fn script_safe_json(value: &Value) -> Result<String, RenderError> {
    let json = serde_json::to_string(value)?;
    Ok(json
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026"))
}
