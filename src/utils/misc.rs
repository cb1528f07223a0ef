use serde_json::Value;
use url::{ParseError, Url};
use uuid::Uuid;

/// Generate a random UUID v4
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Normalize a page path for storage: lowercase, spaces become hyphens.
pub fn normalize_page_path(path: &str) -> String {
    path.to_lowercase().replace(' ', "-")
}

/// Shallow merge: top-level keys of `source` replace those of `target`.
/// Non-object inputs leave `target` untouched.
pub fn shallow_merge(target: &mut Value, source: &Value) {
    if let (Some(target_obj), Some(source_obj)) = (target.as_object_mut(), source.as_object()) {
        for (key, value) in source_obj {
            target_obj.insert(key.clone(), value.clone());
        }
    }
}

/// `fontSize` -> `font-size`. Already-kebab names pass through.
pub fn css_property_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Returns the URL when it is relative or uses a scheme safe to emit into
/// `href`/`src`; anything else (e.g. `javascript:`) becomes `#`.
pub fn safe_url(url: &str) -> &str {
    let trimmed = url.trim();

    match Url::parse(trimmed) {
        Ok(parsed) => match parsed.scheme() {
            "http" | "https" | "mailto" | "tel" => trimmed,
            "data" if parsed.path().to_ascii_lowercase().starts_with("image/") => trimmed,
            _ => "#",
        },
        Err(ParseError::RelativeUrlWithoutBase) => trimmed,
        Err(_) => "#",
    }
}
