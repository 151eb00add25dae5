use crate::ConfigError;
use regex::Regex;

/// Decides whether an absolute URL may be visited
///
/// A URL is eligible when it matches the include pattern and does not match
/// the exclude pattern (if one is set). Both patterns use unanchored regex
/// search; anchoring is only whatever the pattern itself spells out.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    include: Regex,
    exclude: Option<Regex>,
}

impl UrlFilter {
    /// Compiles the include and optional exclude patterns
    ///
    /// An empty exclude pattern is treated as "no exclude".
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidPattern` if either pattern fails to compile.
    /// This is a startup error, not a per-URL one.
    ///
    /// # Examples
    ///
    /// ```
    /// use golly::url::UrlFilter;
    ///
    /// let filter = UrlFilter::new(r"^https://example\.com", Some("/private/")).unwrap();
    /// assert!(filter.is_eligible("https://example.com/docs"));
    /// assert!(!filter.is_eligible("https://example.com/private/x"));
    /// assert!(!filter.is_eligible("https://other.com/page"));
    /// ```
    pub fn new(include: &str, exclude: Option<&str>) -> Result<Self, ConfigError> {
        let include = Regex::new(include).map_err(|source| ConfigError::InvalidPattern {
            which: "include",
            pattern: include.to_string(),
            source,
        })?;

        let exclude = match exclude.filter(|p| !p.is_empty()) {
            Some(pattern) => Some(Regex::new(pattern).map_err(|source| {
                ConfigError::InvalidPattern {
                    which: "exclude",
                    pattern: pattern.to_string(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(Self { include, exclude })
    }

    /// Returns true if the absolute URL passes both patterns
    pub fn is_eligible(&self, url: &str) -> bool {
        if !self.include.is_match(url) {
            return false;
        }

        match &self.exclude {
            Some(exclude) => !exclude.is_match(url),
            None => true,
        }
    }

    /// The include pattern as written
    pub fn include_pattern(&self) -> &str {
        self.include.as_str()
    }

    /// The exclude pattern as written, if any
    pub fn exclude_pattern(&self) -> Option<&str> {
        self.exclude.as_ref().map(Regex::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_only() {
        let filter = UrlFilter::new(r"^https://example\.com", None).unwrap();
        assert!(filter.is_eligible("https://example.com/"));
        assert!(filter.is_eligible("https://example.com/docs/x"));
        assert!(!filter.is_eligible("https://other.com/page"));
    }

    #[test]
    fn test_other_domain_never_eligible() {
        let filter = UrlFilter::new(r"^https://example\.com", None).unwrap();
        assert!(!filter.is_eligible("https://other.com/page"));
        assert!(!filter.is_eligible("http://example.com/page"));
    }

    #[test]
    fn test_exclude_wins() {
        let filter = UrlFilter::new(r"^https://example\.com", Some(r"\.pdf$")).unwrap();
        assert!(filter.is_eligible("https://example.com/guide"));
        assert!(!filter.is_eligible("https://example.com/guide.pdf"));
    }

    #[test]
    fn test_empty_exclude_is_ignored() {
        let filter = UrlFilter::new("example", Some("")).unwrap();
        assert!(filter.exclude_pattern().is_none());
        assert!(filter.is_eligible("https://example.com/"));
    }

    #[test]
    fn test_user_pattern_is_unanchored() {
        // No implicit anchoring: "docs" matches anywhere in the URL
        let filter = UrlFilter::new("docs", None).unwrap();
        assert!(filter.is_eligible("https://example.com/docs/intro"));
        assert!(filter.is_eligible("https://docs.rs/"));
        assert!(!filter.is_eligible("https://example.com/blog"));
    }

    #[test]
    fn test_malformed_include() {
        let err = UrlFilter::new("([a-z", None).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPattern {
                which: "include",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_exclude() {
        let err = UrlFilter::new(".*", Some("*bad")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidPattern {
                which: "exclude",
                ..
            }
        ));
    }

    #[test]
    fn test_patterns_round_trip() {
        let filter = UrlFilter::new(r"^https?://example\.com", Some("/old/")).unwrap();
        assert_eq!(filter.include_pattern(), r"^https?://example\.com");
        assert_eq!(filter.exclude_pattern(), Some("/old/"));
    }
}
