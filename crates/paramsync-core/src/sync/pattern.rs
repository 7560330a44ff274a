use regex::Regex;
use std::fmt;

/// A compiled allow/deny pattern.
///
/// `*` matches any run of characters; the rest of the pattern keeps its
/// regular-expression meaning. Matching is always against the whole key.
#[derive(Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    pub fn compile(source: &str) -> Result<Self, regex::Error> {
        let translated = source.replace('*', ".*");
        let regex = Regex::new(&format!("^(?:{})$", translated))?;
        Ok(Self { source: source.to_string(), regex })
    }

    pub fn matches(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// The pattern as it was configured.
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wildcard_matches_any_run() {
        let p = Pattern::compile("/robot/*/gain").unwrap();

        assert!(p.matches("/robot/arm/gain"));
        assert!(p.matches("/robot//gain"));
        assert!(p.matches("/robot/arm/wrist/gain"));
        assert!(!p.matches("/robot/arm/gains"));
    }

    #[test]
    fn test_match_is_anchored() {
        let p = Pattern::compile("secret").unwrap();

        assert!(p.matches("secret"));
        assert!(!p.matches("my_secret"));
        assert!(!p.matches("secret_x"));
    }

    #[test]
    fn test_alternation_stays_anchored() {
        let p = Pattern::compile("a|b").unwrap();

        assert!(p.matches("a"));
        assert!(p.matches("b"));
        assert!(!p.matches("ab"));
        assert!(!p.matches("xa"));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        assert!(Pattern::compile("/robot/(*").is_err());
        assert!(Pattern::compile("+").is_err());
    }
}
