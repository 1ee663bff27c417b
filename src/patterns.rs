//! Name patterns used by the package filter and the entry-point list.
//!
//! Every stage that compares a user-supplied pattern against a node name goes
//! through [`matches_pattern`], so counting and slicing never disagree.

use glob::Pattern;

/// Trims whitespace and trailing package separators (`.`, `.*`, `$`).
pub fn normalize_pattern(pattern: &str) -> String {
    let mut p = pattern.trim();
    loop {
        let stripped = p
            .strip_suffix(".*")
            .or_else(|| p.strip_suffix('.'))
            .or_else(|| p.strip_suffix('$'));
        match stripped {
            Some(rest) => p = rest,
            None => break,
        }
    }
    p.to_string()
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Returns `true` if `name` is selected by `pattern`.
///
/// Plain patterns match the name itself or anything nested under it (the
/// next character after the prefix must be `.` or `$`). Patterns with glob
/// meta characters are matched against the whole name. An empty pattern
/// matches nothing.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    let pattern = normalize_pattern(pattern);
    if pattern.is_empty() {
        return false;
    }

    if is_glob(&pattern) {
        let match_opts = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        return Pattern::new(&pattern)
            .map(|p| p.matches_with(name, match_opts))
            .unwrap_or(false);
    }

    match name.strip_prefix(pattern.as_str()) {
        Some("") => true,
        Some(rest) => rest.starts_with('.') || rest.starts_with('$'),
        None => false,
    }
}

/// An insertion-ordered, de-duplicated list of normalized patterns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<String>,
}

impl PatternSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a pattern. Returns `false` if it was empty or already present.
    pub fn add(&mut self, pattern: &str) -> bool {
        let normalized = normalize_pattern(pattern);
        if normalized.is_empty() || self.patterns.contains(&normalized) {
            return false;
        }
        self.patterns.push(normalized);
        true
    }

    /// Removes a pattern. Returns `false` if it was not present.
    pub fn remove(&mut self, pattern: &str) -> bool {
        let normalized = normalize_pattern(pattern);
        let before = self.patterns.len();
        self.patterns.retain(|p| *p != normalized);
        self.patterns.len() != before
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.patterns.contains(&normalize_pattern(pattern))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(String::as_str)
    }

    /// Returns `true` if any pattern in the set selects `name`.
    pub fn matches(&self, name: &str) -> bool {
        self.patterns.iter().any(|p| matches_pattern(name, p))
    }
}

impl<S: AsRef<str>> FromIterator<S> for PatternSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = PatternSet::new();
        for p in iter {
            set.add(p.as_ref());
        }
        set
    }
}
