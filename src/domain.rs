/// Host extraction and domain matching for the whitelist
use url::Url;

/// Extract the lowercase host from a tab URL
///
/// Only URLs with a real host qualify: `chrome://`, `about:blank`,
/// `file://` and friends return None so they can never be whitelisted.
///
/// Examples:
/// - https://www.google.com/search → www.google.com
/// - http://localhost:3000/ → localhost
/// - chrome://extensions → None
pub fn extract_host(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;

    if !matches!(parsed.scheme(), "http" | "https" | "ftp" | "ws" | "wss") {
        return None;
    }

    parsed
        .host_str()
        .map(|host| host.trim_end_matches('.').to_lowercase())
        .filter(|host| !host.is_empty())
}

/// Does `host` fall under the whitelist `entry`?
///
/// Exact match or subdomain match: `mail.example.com` is covered by
/// `example.com`, but `badexample.com` is not. A leading `www.` on the
/// entry is ignored so `www.example.com` covers the bare domain too.
pub fn host_matches(host: &str, entry: &str) -> bool {
    let entry = entry.trim().to_lowercase();
    let entry = entry.strip_prefix("www.").unwrap_or(&entry);

    if entry.is_empty() {
        return false;
    }

    host == entry
        || host
            .strip_suffix(entry)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

/// Check a tab URL against every whitelist entry
pub fn is_whitelisted(url: &str, whitelist: &[String]) -> bool {
    match extract_host(url) {
        Some(host) => whitelist.iter().any(|entry| host_matches(&host, entry)),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|e| e.to_string()).collect()
    }

    #[test]
    fn test_extract_host_basic() {
        assert_eq!(extract_host("https://www.google.com"), Some("www.google.com".to_string()));
        assert_eq!(extract_host("http://GitHub.com/rust-lang"), Some("github.com".to_string()));
        assert_eq!(
            extract_host("https://news.bbc.co.uk/article?id=1"),
            Some("news.bbc.co.uk".to_string())
        );
    }

    #[test]
    fn test_extract_host_special_cases() {
        assert_eq!(extract_host("http://localhost:3000"), Some("localhost".to_string()));
        assert_eq!(extract_host("http://127.0.0.1:8080/x"), Some("127.0.0.1".to_string()));
        assert_eq!(extract_host("https://example.com./"), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_host_without_host() {
        assert_eq!(extract_host(""), None);
        assert_eq!(extract_host("not-a-url"), None);
        assert_eq!(extract_host("chrome://extensions"), None);
        assert_eq!(extract_host("about:blank"), None);
        assert_eq!(extract_host("file:///tmp/notes.txt"), None);
    }

    #[test]
    fn test_host_matches_exact_and_subdomain() {
        assert!(host_matches("example.com", "example.com"));
        assert!(host_matches("mail.example.com", "example.com"));
        assert!(host_matches("a.b.example.com", "example.com"));
        assert!(!host_matches("badexample.com", "example.com"));
        assert!(!host_matches("example.com", "mail.example.com"));
        assert!(!host_matches("example.org", "example.com"));
    }

    #[test]
    fn test_host_matches_ignores_www_on_entry() {
        assert!(host_matches("example.com", "www.example.com"));
        assert!(host_matches("www.example.com", "www.example.com"));
        assert!(host_matches("docs.example.com", "WWW.Example.com"));
    }

    #[test]
    fn test_host_matches_empty_entry() {
        assert!(!host_matches("example.com", ""));
        assert!(!host_matches("example.com", "   "));
    }

    #[test]
    fn test_is_whitelisted() {
        let whitelist = list(&["example.com", "github.com"]);

        assert!(is_whitelisted("https://example.com/page", &whitelist));
        assert!(is_whitelisted("https://gist.github.com/someone", &whitelist));
        assert!(!is_whitelisted("https://google.com", &whitelist));
        assert!(!is_whitelisted("chrome://newtab", &whitelist));
        assert!(!is_whitelisted("https://example.com", &[]));
    }
}
