//! Helpers for fully-qualified domain names kept as lowercase strings with a
//! trailing dot (`www.example.com.`). The root is `.`.

use crate::DomainError;
use std::sync::Arc;

const MAX_NAME_LEN: usize = 255;
const MAX_LABEL_LEN: usize = 63;

/// Lowercases `name` and appends the trailing dot if missing.
pub fn normalize_fqdn(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." {
        return ".".to_string();
    }
    let mut fqdn = trimmed.to_ascii_lowercase();
    if !fqdn.ends_with('.') {
        fqdn.push('.');
    }
    fqdn
}

/// Normalizes and validates label and total lengths.
pub fn parse_fqdn(name: &str) -> Result<Arc<str>, DomainError> {
    let fqdn = normalize_fqdn(name);
    if fqdn == "." {
        return Ok(Arc::from(fqdn));
    }
    if fqdn.len() > MAX_NAME_LEN {
        return Err(DomainError::InvalidDomainName(format!(
            "'{}' exceeds {} bytes",
            name, MAX_NAME_LEN
        )));
    }
    for label in fqdn.trim_end_matches('.').split('.') {
        if label.is_empty() {
            return Err(DomainError::InvalidDomainName(format!(
                "'{}' contains an empty label",
                name
            )));
        }
        if label.len() > MAX_LABEL_LEN {
            return Err(DomainError::InvalidDomainName(format!(
                "label '{}' exceeds {} bytes",
                label, MAX_LABEL_LEN
            )));
        }
    }
    Ok(Arc::from(fqdn))
}

/// Parent of `name`, or `None` for the root.
pub fn parent(name: &str) -> Option<&str> {
    if name == "." || name.is_empty() {
        return None;
    }
    match name.find('.') {
        Some(idx) if idx + 1 < name.len() => Some(&name[idx + 1..]),
        _ => Some("."),
    }
}

/// True when `name` equals `zone` or lies below it.
pub fn is_subdomain_of(name: &str, zone: &str) -> bool {
    if zone == "." {
        return true;
    }
    if name.len() < zone.len() {
        return false;
    }
    if name == zone {
        return true;
    }
    name.ends_with(zone) && name.as_bytes()[name.len() - zone.len() - 1] == b'.'
}

/// Proper ancestors of `name` down to and including `zone`, closest first.
///
/// `a.b.example.com.` under `example.com.` yields `[b.example.com., example.com.]`.
pub fn ancestors_within<'a>(name: &'a str, zone: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    if name == zone || !is_subdomain_of(name, zone) {
        return out;
    }
    let mut current = name;
    while let Some(up) = parent(current) {
        out.push(up);
        if up == zone || up == "." {
            break;
        }
        current = up;
    }
    out
}

pub fn wildcard_of(name: &str) -> String {
    if name == "." {
        "*.".to_string()
    } else {
        format!("*.{}", name)
    }
}

pub fn label_count(name: &str) -> usize {
    if name == "." {
        0
    } else {
        name.trim_end_matches('.').split('.').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_dot_and_lowercases() {
        assert_eq!(normalize_fqdn("WWW.Example.com"), "www.example.com.");
        assert_eq!(normalize_fqdn("example.com."), "example.com.");
        assert_eq!(normalize_fqdn(""), ".");
    }

    #[test]
    fn test_parse_rejects_empty_label() {
        assert!(parse_fqdn("a..example.com").is_err());
        assert!(parse_fqdn(&format!("{}.com", "x".repeat(64))).is_err());
    }

    #[test]
    fn test_parent_walks_to_root() {
        assert_eq!(parent("www.example.com."), Some("example.com."));
        assert_eq!(parent("com."), Some("."));
        assert_eq!(parent("."), None);
    }

    #[test]
    fn test_subdomain_requires_label_boundary() {
        assert!(is_subdomain_of("www.example.com.", "example.com."));
        assert!(is_subdomain_of("example.com.", "example.com."));
        assert!(!is_subdomain_of("badexample.com.", "example.com."));
        assert!(is_subdomain_of("anything.", "."));
    }

    #[test]
    fn test_ancestors_stop_at_zone() {
        assert_eq!(
            ancestors_within("a.b.example.com.", "example.com."),
            vec!["b.example.com.", "example.com."]
        );
        assert!(ancestors_within("example.com.", "example.com.").is_empty());
    }
}
