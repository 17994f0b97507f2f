//! Process-wide placeholder registry and message expansion.
//!
//! Registered names are kept reverse-sorted so longer placeholders
//! (`:values`) are substituted before shorter prefixes (`:value`).

use super::Language;
use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};

/// Inputs available to a placeholder replacement function.
pub struct ExpandContext<'a> {
    /// Raw (non-localized) field name.
    pub field_name: &'a str,
    pub language: &'a Language,
    /// Alternating `:name` → value pairs contributed by the failing rule.
    pub params: &'a [(String, String)],
}

pub type PlaceholderFn = Arc<dyn Fn(&ExpandContext) -> Option<String> + Send + Sync>;

static REGISTRY: Lazy<RwLock<Vec<(String, PlaceholderFn)>>> = Lazy::new(|| {
    let mut registry: Vec<(String, PlaceholderFn)> = Vec::new();
    registry.push((
        ":field".to_string(),
        Arc::new(|ctx: &ExpandContext| Some(ctx.language.field_name(ctx.field_name).to_string())),
    ));
    for name in [
        ":min", ":max", ":other", ":values", ":value", ":version", ":date", ":max_date",
    ] {
        registry.push((name.to_string(), param_placeholder(name)));
    }
    registry.sort_by(|a, b| b.0.cmp(&a.0));
    RwLock::new(registry)
});

fn param_placeholder(name: &'static str) -> PlaceholderFn {
    Arc::new(move |ctx: &ExpandContext| {
        ctx.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    })
}

/// Register (or override) a placeholder. Names must carry their leading
/// colon (`:reason`).
pub fn register_placeholder<F>(name: impl Into<String>, replace: F)
where
    F: Fn(&ExpandContext) -> Option<String> + Send + Sync + 'static,
{
    let name = name.into();
    let mut registry = REGISTRY.write().unwrap();
    registry.retain(|(existing, _)| *existing != name);
    registry.push((name, Arc::new(replace)));
    registry.sort_by(|a, b| b.0.cmp(&a.0));
}

/// Substitute every registered placeholder occurring in `template`.
pub fn expand(template: &str, ctx: &ExpandContext) -> String {
    let registry = REGISTRY.read().unwrap();
    let mut message = template.to_string();
    for (name, replace) in registry.iter() {
        if !message.contains(name.as_str()) {
            continue;
        }
        if let Some(replacement) = replace(ctx) {
            message = message.replace(name.as_str(), &replacement);
        }
    }
    message
}
