//! The `display` and `visibility` attributes.
//!
//! This runs while the call tree is being built, not while it is replayed: an
//! element whose effective `display` is `none` contributes no calls at all.

use std::collections::BTreeMap;

/// Resolves the effective `display` of an element from its raw attributes.
///
/// `visibility="hidden"` forces `display` to `none` in `attributes`.  Returns
/// the trimmed `display` value, if there is one.
pub fn resolve_display(attributes: &mut BTreeMap<String, String>) -> Option<String> {
    if attributes.get("visibility").map(String::as_str) == Some("hidden") {
        attributes.insert("display".to_string(), "none".to_string());
    }

    attributes.get("display").map(|d| d.trim().to_string())
}

/// Whether an element with the given effective `display` produces drawing calls.
pub fn is_displayed(display: Option<&str>) -> bool {
    display != Some("none")
}
