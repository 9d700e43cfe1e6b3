use anyhow::{Context, Result};
use regex::Regex;

fn discovered_path_ignores() -> &'static [Regex] {
    use std::sync::OnceLock;

    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            vec![
                Regex::new(r"(?i)\.map$").expect("invalid source map regex"),
                Regex::new(r"(^|/)\.").expect("invalid hidden segment regex"),
                Regex::new(r"~$").expect("invalid backup file regex"),
            ]
        })
        .as_slice()
}

/// Determine whether a file found on disk should stay out of the load order.
///
/// Source maps, hidden files and editor backups sit next to real assets but are never
/// loaded by the page themselves.
pub fn should_ignore_discovered_path(value: &str) -> bool {
    discovered_path_ignores()
        .iter()
        .any(|pattern| pattern.is_match(value))
}

/// Built-in ignore patterns extended with project specific ones.
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    extra: Vec<Regex>,
}

impl IgnoreRules {
    /// Compile additional patterns, failing on the first invalid expression.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extra = patterns
            .into_iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                Regex::new(pattern).with_context(|| format!("invalid ignore pattern `{pattern}`"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { extra })
    }

    /// True when the path matches a built-in or configured pattern.
    pub fn is_ignored(&self, value: &str) -> bool {
        should_ignore_discovered_path(value)
            || self.extra.iter().any(|pattern| pattern.is_match(value))
    }
}
