//! Inline rule syntax used by `--gsub`.
//!
//! A rule spec is a comma-separated list of `pattern:replacement` items.
//! The item is split at its *last* colon, so patterns may contain colons
//! as long as a replacement follows. An item without a colon deletes
//! whatever the pattern matches.

/// One `pattern:replacement` item, not yet compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    /// Regular expression source.
    pub pattern: String,
    /// Replacement template; empty means delete the match.
    pub replacement: String,
}

/// Split a `--gsub` value into its items.
///
/// Empty items (`a,,b` or a trailing comma) are skipped.
///
/// # Examples
///
/// ```
/// use watchlog::rules::parse_rule_spec;
///
/// let specs = parse_rule_spec(r"\[.*\]:[tag],DEBUG ");
/// assert_eq!(specs.len(), 2);
/// assert_eq!(specs[0].pattern, r"\[.*\]");
/// assert_eq!(specs[0].replacement, "[tag]");
/// assert_eq!(specs[1].pattern, "DEBUG ");
/// assert_eq!(specs[1].replacement, "");
/// ```
pub fn parse_rule_spec(spec: &str) -> Vec<RuleSpec> {
    spec.split(',')
        .filter(|item| !item.is_empty())
        .map(|item| match item.rsplit_once(':') {
            Some((pattern, replacement)) => RuleSpec {
                pattern: pattern.to_string(),
                replacement: replacement.to_string(),
            },
            None => RuleSpec {
                pattern: item.to_string(),
                replacement: String::new(),
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_splits_into_pattern_and_replacement() {
        let specs = parse_rule_spec("foo:bar");
        assert_eq!(
            specs,
            vec![RuleSpec {
                pattern: "foo".to_string(),
                replacement: "bar".to_string(),
            }]
        );
    }

    #[test]
    fn item_without_colon_is_deletion() {
        let specs = parse_rule_spec(r"\[bar\]");
        assert_eq!(specs[0].pattern, r"\[bar\]");
        assert_eq!(specs[0].replacement, "");
    }

    #[test]
    fn split_happens_at_last_colon() {
        let specs = parse_rule_spec(r"\d\d:\d\d:TIME");
        assert_eq!(specs[0].pattern, r"\d\d:\d\d");
        assert_eq!(specs[0].replacement, "TIME");
    }

    #[test]
    fn trailing_colon_means_empty_replacement() {
        let specs = parse_rule_spec("noise:");
        assert_eq!(specs[0].pattern, "noise");
        assert_eq!(specs[0].replacement, "");
    }

    #[test]
    fn multiple_items_keep_order() {
        let specs = parse_rule_spec(r"rx:replacement,\[foo\]:[newstring],\[bar\]");
        let patterns: Vec<&str> = specs.iter().map(|s| s.pattern.as_str()).collect();
        assert_eq!(patterns, vec!["rx", r"\[foo\]", r"\[bar\]"]);
        assert_eq!(specs[1].replacement, "[newstring]");
    }

    #[test]
    fn empty_items_are_skipped() {
        assert!(parse_rule_spec("").is_empty());
        assert_eq!(parse_rule_spec("a,,b,").len(), 2);
    }
}
