use regex::{Captures, Regex};
use std::sync::OnceLock;

use crate::errors::ReaperNlpError;

/// `{{`, `}}` or a `{field}` placeholder.
fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{|\}\}|\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern"))
}

/// A text template with a fixed set of named fields.
///
/// Rendering is a single pass over the template text, so a value that happens
/// to contain `{instruction}` is copied through as-is.
#[derive(Debug, Clone)]
pub struct Template {
    text: String,
    fields: Vec<String>,
}

impl Template {
    pub fn new(text: impl Into<String>, fields: &[&str]) -> Result<Self, ReaperNlpError> {
        let text = text.into();
        let mut seen = vec![false; fields.len()];

        for caps in token_re().captures_iter(&text) {
            let Some(name) = caps.get(1) else { continue };
            match fields.iter().position(|f| *f == name.as_str()) {
                Some(i) => seen[i] = true,
                None => {
                    return Err(ReaperNlpError::Template(format!(
                        "unknown placeholder {{{}}} (expected one of: {})",
                        name.as_str(),
                        fields.join(", ")
                    )))
                }
            }
        }

        let missing: Vec<&str> = fields
            .iter()
            .zip(&seen)
            .filter(|(_, s)| !**s)
            .map(|(f, _)| *f)
            .collect();
        if !missing.is_empty() {
            return Err(ReaperNlpError::Template(format!(
                "template is missing placeholder(s): {}",
                missing.join(", ")
            )));
        }

        Ok(Self {
            text,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        })
    }

    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, ReaperNlpError> {
        if let Some(f) = self.fields.iter().find(|f| !values.iter().any(|(k, _)| *k == f.as_str())) {
            return Err(ReaperNlpError::Template(format!("no value supplied for {{{}}}", f)));
        }

        let out = token_re().replace_all(&self.text, |caps: &Captures| match &caps[0] {
            "{{" => "{".to_string(),
            "}}" => "}".to_string(),
            _ => {
                let name = &caps[1];
                values
                    .iter()
                    .find(|(k, _)| *k == name)
                    .map(|(_, v)| v.to_string())
                    .unwrap_or_default()
            }
        });
        Ok(out.into_owned())
    }
}
