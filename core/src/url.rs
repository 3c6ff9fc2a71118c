//! URL assembly helpers.
//!
//! Plain string manipulation: segment joining, `{key}` template substitution
//! and query-string appending. Encoding is left to the caller, matching the
//! rest of the core's treat-URLs-as-strings approach.

use std::collections::BTreeMap;

/// Join two URL segments with exactly one slash between them.
pub fn path_join(base: &str, segment: &str) -> String {
    let base = base.trim_end_matches('/');
    let segment = segment.trim_start_matches('/');
    if segment.is_empty() {
        base.to_string()
    } else if base.is_empty() {
        segment.to_string()
    } else {
        format!("{base}/{segment}")
    }
}

/// Replace every `{key}` placeholder in `template` with its value from
/// `data`. Placeholders with no matching key are left untouched.
pub fn replace_url_params(template: &str, data: &BTreeMap<String, String>) -> String {
    let mut out = template.to_string();
    for (key, value) in data {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

/// Append `params` to `url` as a query string, continuing an existing one
/// with `&` when the URL already carries a `?`.
pub fn append_query_params(url: &str, params: &BTreeMap<String, String>) -> String {
    if params.is_empty() {
        return url.to_string();
    }
    let mut out = String::from(url);
    let mut separator = if url.contains('?') { '&' } else { '?' };
    for (key, value) in params {
        out.push(separator);
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        separator = '&';
    }
    out
}
