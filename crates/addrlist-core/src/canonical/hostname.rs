//! Hostname validation for FQDN entries
//!
//! Follows the letters-digits-hyphen rule from RFC 1123 / RFC 3696: labels of
//! 1 to 63 characters, no hyphen at either end of a label, and at most 255
//! characters in total.

/// Maximum total hostname length
pub const MAX_HOSTNAME_LEN: usize = 255;

/// Maximum length of a single dot-separated label
pub const MAX_LABEL_LEN: usize = 63;

/// Reasonable check that `host` is a valid hostname
pub fn is_valid_hostname(host: &str) -> bool {
    let host = host.strip_suffix('.').unwrap_or(host);
    if host.len() > MAX_HOSTNAME_LEN {
        return false;
    }
    host.split('.').all(is_valid_label)
}

fn is_valid_label(label: &str) -> bool {
    (1..=MAX_LABEL_LEN).contains(&label.len())
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_hostnames() {
        assert!(is_valid_hostname("good.example.com"));
        assert!(is_valid_hostname("GOOD.Example.COM"));
        assert!(is_valid_hostname("mit.edu."));
        assert!(is_valid_hostname("a-b.c1"));
        assert!(is_valid_hostname("localhost"));
    }

    #[test]
    fn rejects_hyphen_at_label_edges() {
        assert!(!is_valid_hostname("-bad.example.com"));
        assert!(!is_valid_hostname("bad-.example.com"));
        assert!(!is_valid_hostname("ok.-bad.com"));
    }

    #[test]
    fn rejects_bad_lengths() {
        let long_label = "a".repeat(256);
        assert!(!is_valid_hostname(&long_label));
        assert!(!is_valid_hostname(&format!("{}.com", "a".repeat(64))));
        assert!(is_valid_hostname(&format!("{}.com", "a".repeat(63))));

        let long_host = vec!["abcdefgh"; 32].join(".");
        assert!(long_host.len() > MAX_HOSTNAME_LEN);
        assert!(!is_valid_hostname(&long_host));
    }

    #[test]
    fn rejects_empty_labels_and_symbols() {
        assert!(!is_valid_hostname(""));
        assert!(!is_valid_hostname("a..b"));
        assert!(!is_valid_hostname("under_score.com"));
        assert!(!is_valid_hostname("exämple.com"));
    }
}
