//! Substitution rules applied to each line before it is stored.
//!
//! Rules are compiled once at startup. A pattern that fails to compile is
//! fatal. Replacement templates are only checked when they are first used
//! against a matching line; a bad template disables that rule for the line
//! instead of stopping the viewer.

use crate::model::{RuleError, Source, SubstitutionError};
use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::{debug, warn};

mod syntax;

pub use syntax::{parse_rule_spec, RuleSpec};

/// Which streams a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamSelector {
    /// Only lines read from stdout.
    Out,
    /// Only lines read from stderr.
    Err,
    /// Lines from either stream.
    Both,
}

impl StreamSelector {
    /// Whether a line from `source` is subject to this selector.
    pub fn matches(self, source: Source) -> bool {
        matches!(
            (self, source),
            (StreamSelector::Both, _)
                | (StreamSelector::Out, Source::Out)
                | (StreamSelector::Err, Source::Err)
        )
    }
}

/// A compiled pattern/replacement pair bound to a stream selector.
#[derive(Debug, Clone)]
pub struct SubstitutionRule {
    pattern: Regex,
    replacement: String,
    selector: StreamSelector,
    template_check: OnceLock<Result<(), SubstitutionError>>,
}

impl SubstitutionRule {
    /// Compile a rule.
    ///
    /// # Errors
    ///
    /// Returns `RuleError::InvalidPattern` if `pattern` is not a valid regex.
    pub fn compile(
        pattern: &str,
        replacement: &str,
        selector: StreamSelector,
    ) -> Result<Self, RuleError> {
        let compiled = Regex::new(pattern).map_err(|source| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            pattern: compiled,
            replacement: replacement.to_string(),
            selector,
            template_check: OnceLock::new(),
        })
    }

    /// The pattern source text.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// The replacement template.
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Streams this rule applies to.
    pub fn selector(&self) -> StreamSelector {
        self.selector
    }

    /// Replace every match of the pattern in `line`.
    ///
    /// Returns the input borrowed when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns `SubstitutionError` if the line matches but the replacement
    /// template cannot be evaluated against this pattern.
    pub fn apply<'a>(&self, line: &'a str) -> Result<Cow<'a, str>, SubstitutionError> {
        if !self.pattern.is_match(line) {
            return Ok(Cow::Borrowed(line));
        }

        self.template_check
            .get_or_init(|| {
                let checked = check_template(&self.replacement, &self.pattern);
                if let Err(err) = &checked {
                    warn!(pattern = %self.pattern, error = %err, "Substitution rule disabled");
                }
                checked
            })
            .clone()?;

        Ok(self.pattern.replace_all(line, self.replacement.as_str()))
    }
}

/// Ordered set of substitution rules.
///
/// Rules run in registration order; each rule sees the output of the
/// previous one.
#[derive(Debug, Clone, Default)]
pub struct RuleEngine {
    rules: Vec<SubstitutionRule>,
}

impl RuleEngine {
    /// Create an engine with no rules. Lines pass through unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile and register a single rule.
    ///
    /// # Errors
    ///
    /// Returns `RuleError` if the pattern does not compile.
    pub fn add(
        &mut self,
        pattern: &str,
        replacement: &str,
        selector: StreamSelector,
    ) -> Result<(), RuleError> {
        self.rules
            .push(SubstitutionRule::compile(pattern, replacement, selector)?);
        Ok(())
    }

    /// Compile and register every item of a `--gsub` style spec.
    ///
    /// Returns the number of rules added. Nothing is registered if any
    /// item fails to compile.
    ///
    /// # Errors
    ///
    /// Returns the first `RuleError` encountered.
    pub fn add_spec(&mut self, spec: &str, selector: StreamSelector) -> Result<usize, RuleError> {
        let compiled = parse_rule_spec(spec)
            .iter()
            .map(|item| SubstitutionRule::compile(&item.pattern, &item.replacement, selector))
            .collect::<Result<Vec<_>, _>>()?;

        let added = compiled.len();
        self.rules.extend(compiled);
        Ok(added)
    }

    /// Rewrite a raw line from `source` through every applicable rule.
    ///
    /// A rule whose replacement cannot be evaluated is skipped for this line.
    pub fn apply(&self, raw: &str, source: Source) -> String {
        let mut line = Cow::Borrowed(raw);

        for rule in self.rules.iter().filter(|r| r.selector.matches(source)) {
            let rewritten = match rule.apply(&line) {
                Ok(Cow::Owned(text)) => Some(text),
                Ok(Cow::Borrowed(_)) => None,
                Err(err) => {
                    debug!(pattern = rule.pattern(), error = %err, "Rule skipped");
                    None
                }
            };
            if let Some(text) = rewritten {
                line = Cow::Owned(text);
            }
        }

        line.into_owned()
    }

    /// Number of rules that apply to lines from `source`.
    pub fn rule_count(&self, source: Source) -> usize {
        self.rules
            .iter()
            .filter(|r| r.selector.matches(source))
            .count()
    }

    /// All registered rules, in order.
    pub fn rules(&self) -> &[SubstitutionRule] {
        &self.rules
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Verify every group reference in `template` exists in `pattern`.
///
/// Follows the regex crate's expansion syntax: `$$` is a literal dollar,
/// `${name}` is a braced reference, `$name` takes the longest run of
/// `[_0-9A-Za-z]`. A `$` that starts neither form is literal.
fn check_template(template: &str, pattern: &Regex) -> Result<(), SubstitutionError> {
    let bytes = template.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'$' {
            i += 1;
            continue;
        }

        match bytes.get(i + 1) {
            Some(b'$') => {
                i += 2;
            }
            Some(b'{') => match template[i + 2..].find('}') {
                Some(len) => {
                    check_group(&template[i + 2..i + 2 + len], pattern)?;
                    i += 3 + len;
                }
                None => i += 1,
            },
            _ => {
                let len = template[i + 1..]
                    .bytes()
                    .take_while(|b| b.is_ascii_alphanumeric() || *b == b'_')
                    .count();
                if len > 0 {
                    check_group(&template[i + 1..i + 1 + len], pattern)?;
                }
                i += 1 + len;
            }
        }
    }

    Ok(())
}

fn check_group(group: &str, pattern: &Regex) -> Result<(), SubstitutionError> {
    let known = match group.parse::<usize>() {
        Ok(index) => index < pattern.captures_len(),
        Err(_) => pattern.capture_names().flatten().any(|name| name == group),
    };

    if known {
        Ok(())
    } else {
        Err(SubstitutionError::UnknownGroup {
            group: group.to_string(),
        })
    }
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
