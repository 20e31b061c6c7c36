/// Whitelist editing: input validation, add/remove, import/export
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use url::Url;

use crate::error::{ExtensionError, Result};

fn domain_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*$")
            .expect("domain pattern is valid")
    })
}

/// Turn user input into a whitelist entry
///
/// Accepts a bare domain or a pasted URL; the scheme, port and path are
/// dropped. The result must survive `http://<domain>` parsing unchanged.
pub fn normalize_domain(input: &str) -> Result<String> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return Err(ExtensionError::InvalidDomain(input.to_string()));
    }

    let without_scheme = trimmed
        .split_once("://")
        .map_or(trimmed.as_str(), |(_, rest)| rest);
    let host_part = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default();
    let host_part = host_part.split(':').next().unwrap_or_default();
    let host_part = host_part.trim_end_matches('.');

    if !domain_pattern().is_match(host_part) {
        return Err(ExtensionError::InvalidDomain(input.to_string()));
    }

    let parsed = Url::parse(&format!("http://{}", host_part))
        .map_err(|_| ExtensionError::InvalidDomain(input.to_string()))?;

    match parsed.host_str() {
        Some(host) if host == host_part => Ok(host_part.to_string()),
        _ => Err(ExtensionError::InvalidDomain(input.to_string())),
    }
}

/// Add a domain, keeping insertion order. Returns false if already present.
pub fn add_domain(whitelist: &mut Vec<String>, domain: String) -> bool {
    if whitelist.contains(&domain) {
        return false;
    }
    whitelist.push(domain);
    true
}

pub fn remove_domain(whitelist: &mut Vec<String>, domain: &str) -> bool {
    let original_len = whitelist.len();
    whitelist.retain(|d| d != domain);
    whitelist.len() < original_len
}

pub fn export_json(whitelist: &[String]) -> Result<String> {
    Ok(serde_json::to_string_pretty(whitelist)?)
}

/// Outcome of merging an imported list into the current whitelist
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ImportSummary {
    pub added: usize,
    pub duplicates: usize,
    pub invalid: Vec<String>,
}

/// Merge a JSON array of domains into `whitelist`
///
/// Each entry goes through the same validation as manual input. Invalid
/// entries are reported back, not fatal; malformed JSON is.
pub fn import_json(whitelist: &mut Vec<String>, json: &str) -> Result<ImportSummary> {
    let entries: Vec<String> = serde_json::from_str(json)?;
    let mut summary = ImportSummary::default();

    for entry in entries {
        match normalize_domain(&entry) {
            Ok(domain) => {
                if add_domain(whitelist, domain) {
                    summary.added += 1;
                } else {
                    summary.duplicates += 1;
                }
            }
            Err(_) => summary.invalid.push(entry),
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_plain_domain() {
        assert_eq!(normalize_domain("example.com").unwrap(), "example.com");
        assert_eq!(normalize_domain("  Example.COM ").unwrap(), "example.com");
        assert_eq!(normalize_domain("localhost").unwrap(), "localhost");
        assert_eq!(normalize_domain("my-site.co.uk").unwrap(), "my-site.co.uk");
    }

    #[test]
    fn test_normalize_pasted_url() {
        assert_eq!(
            normalize_domain("https://docs.rs/serde/latest").unwrap(),
            "docs.rs"
        );
        assert_eq!(normalize_domain("http://localhost:8080/").unwrap(), "localhost");
        assert_eq!(normalize_domain("github.com/rust-lang").unwrap(), "github.com");
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(normalize_domain("").is_err());
        assert!(normalize_domain("   ").is_err());
        assert!(normalize_domain("exa mple.com").is_err());
        assert!(normalize_domain("-example.com").is_err());
        assert!(normalize_domain("example..com").is_err());
        assert!(normalize_domain("ex_ample.com").is_err());
        assert!(normalize_domain("https://").is_err());
    }

    #[test]
    fn test_add_domain_keeps_order_and_skips_duplicates() {
        let mut whitelist = vec!["b.com".to_string()];

        assert!(add_domain(&mut whitelist, "a.com".to_string()));
        assert!(!add_domain(&mut whitelist, "b.com".to_string()));

        assert_eq!(whitelist, vec!["b.com", "a.com"]);
    }

    #[test]
    fn test_remove_domain() {
        let mut whitelist = vec!["a.com".to_string(), "b.com".to_string()];

        assert!(remove_domain(&mut whitelist, "a.com"));
        assert!(!remove_domain(&mut whitelist, "c.com"));
        assert_eq!(whitelist, vec!["b.com"]);
    }

    #[test]
    fn test_export_then_import_into_empty_list() {
        let original = vec!["example.com".to_string(), "github.com".to_string()];
        let json = export_json(&original).unwrap();

        let mut restored = Vec::new();
        let summary = import_json(&mut restored, &json).unwrap();

        assert_eq!(restored, original);
        assert_eq!(summary.added, 2);
    }

    #[test]
    fn test_import_reports_duplicates_and_invalid() {
        let mut whitelist = vec!["example.com".to_string()];
        let json = r#"["EXAMPLE.com", "rust-lang.org", "not a domain", "rust-lang.org"]"#;

        let summary = import_json(&mut whitelist, json).unwrap();

        assert_eq!(summary.added, 1);
        assert_eq!(summary.duplicates, 2);
        assert_eq!(summary.invalid, vec!["not a domain".to_string()]);
        assert_eq!(whitelist, vec!["example.com", "rust-lang.org"]);
    }

    #[test]
    fn test_import_rejects_malformed_json() {
        let mut whitelist = Vec::new();
        assert!(import_json(&mut whitelist, "{\"not\": \"a list\"}").is_err());
        assert!(whitelist.is_empty());
    }
}
