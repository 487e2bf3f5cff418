//! Strict `{{ name }}` substitution against a [`ParameterContext`]
//!
//! Every `{{ dotted.name }}` reference must resolve to a scalar (or a list of
//! scalars) in the context; anything else fails the render instead of producing
//! an empty string. Rendering is a pure function of (template, context).

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, template_render};
use crate::params::ParameterContext;

static REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").unwrap()
});

static NAME: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_-]*(\.[A-Za-z0-9_-]+)*$").unwrap()
});

/// Render `template` against `context`; `source_name` only labels errors
pub fn render(source_name: &str, template: &str, context: &ParameterContext) -> Result<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for captures in REFERENCE.captures_iter(template) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        let name = name.as_str();
        let value = NAME
            .is_match(name)
            .then(|| context.lookup_text(name))
            .flatten()
            .ok_or_else(|| template_render(source_name, name, line_of(template, whole.start())))?;

        rendered.push_str(&template[last..whole.start()]);
        rendered.push_str(&value);
        last = whole.end();
    }
    rendered.push_str(&template[last..]);

    Ok(rendered)
}

/// Every distinct name referenced by `template`, in first-use order
pub fn references(template: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for captures in REFERENCE.captures_iter(template) {
        if let Some(name) = captures.get(1) {
            let name = name.as_str().to_string();
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].matches('\n').count() + 1
}
