//! Full-string patterns over event titles and attendee names.

use std::fmt;

use fancy_regex::Regex;

/// A compiled pattern that must match the entire input.
///
/// The source text is kept verbatim so that a pattern written out again
/// is exactly what the user configured.
#[derive(Clone)]
pub struct FullMatchPattern {
    source: String,
    regex: Regex,
}

impl FullMatchPattern {
    /// Compiles `source` anchored at both ends.
    ///
    /// A source ending in a verbose-mode (`(?x)`) comment would swallow the
    /// closing anchor, so in that case the comment is terminated with a
    /// newline first.
    pub fn new(source: impl Into<String>) -> Result<Self, fancy_regex::Error> {
        let source = source.into();
        let regex = match Regex::new(&format!("^(?:{source})$")) {
            Ok(regex) => regex,
            Err(err) if ends_in_comment(&source) => {
                Regex::new(&format!("^(?:{source}\n)$")).map_err(|_| err)?
            }
            Err(err) => return Err(err),
        };
        Ok(Self { source, regex })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Tests `text` against the pattern.
    ///
    /// A pattern that exceeds the backtracking limit on `text` does not match.
    pub fn matches(&self, text: &str) -> bool {
        match self.regex.is_match(text) {
            Ok(matched) => matched,
            Err(err) => {
                tracing::warn!(pattern = %self.source, error = %err, "pattern evaluation failed");
                false
            }
        }
    }
}

fn ends_in_comment(source: &str) -> bool {
    source.lines().last().is_some_and(|line| line.contains('#'))
}

impl fmt::Debug for FullMatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FullMatchPattern").field(&self.source).finish()
    }
}

impl fmt::Display for FullMatchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl PartialEq for FullMatchPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for FullMatchPattern {}
