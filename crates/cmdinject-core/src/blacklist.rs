//! Input blacklist for the hardened route
//!
//! A deliberately incomplete filter: it flags the `whoami` token and the pipe
//! character, nothing else. It does not check that the input looks like an
//! IPv4 address, so garbage still reaches the target program.

use crate::error::Result;
use regex::Regex;

/// Case-insensitive `whoami` as a whole word, or a literal pipe
pub const DEFAULT_PATTERN: &str = r"(?i)\bwhoami\b|\|";

/// Compiled blacklist, built once at startup and shared read-only
#[derive(Debug, Clone)]
pub struct Blacklist {
    pattern: Regex,
}

impl Blacklist {
    /// Compile a blacklist from a regex pattern
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    /// True if the input contains a blocked token
    pub fn is_blocked(&self, input: &str) -> bool {
        self.pattern.is_match(input)
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_blacklist() -> Blacklist {
        Blacklist::new(DEFAULT_PATTERN).unwrap()
    }

    #[test]
    fn test_default_pattern_compiles() {
        assert_eq!(default_blacklist().pattern(), DEFAULT_PATTERN);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = Blacklist::new("(unclosed").unwrap_err();
        assert!(matches!(err, crate::Error::Pattern(_)));
        assert!(err.to_string().starts_with("Invalid blacklist pattern: "));
    }

    #[test]
    fn test_whoami_blocked_case_insensitive() {
        let blacklist = default_blacklist();
        assert!(blacklist.is_blocked("127.0.0.1; whoami"));
        assert!(blacklist.is_blocked("WHOAMI"));
        assert!(blacklist.is_blocked("127.0.0.1 && WhoAmI"));
        assert!(blacklist.is_blocked("$(whoami)"));
    }

    #[test]
    fn test_whoami_requires_word_boundary() {
        let blacklist = default_blacklist();
        assert!(!blacklist.is_blocked("whoamix"));
        assert!(!blacklist.is_blocked("xwhoami"));
    }

    #[test]
    fn test_pipe_blocked() {
        let blacklist = default_blacklist();
        assert!(blacklist.is_blocked("127.0.0.1|id"));
        assert!(blacklist.is_blocked("|"));
        assert!(blacklist.is_blocked("127.0.0.1 || true"));
    }

    #[test]
    fn test_plain_inputs_pass() {
        let blacklist = default_blacklist();
        assert!(!blacklist.is_blocked("127.0.0.1"));
        assert!(!blacklist.is_blocked("example.com"));
    }

    #[test]
    fn test_other_metacharacters_pass() {
        // Only `whoami` and the pipe are flagged
        let blacklist = default_blacklist();
        assert!(!blacklist.is_blocked("127.0.0.1; id"));
        assert!(!blacklist.is_blocked("`id`"));
        assert!(!blacklist.is_blocked("$(id)"));
        assert!(!blacklist.is_blocked("999.999.999.999"));
    }
}
