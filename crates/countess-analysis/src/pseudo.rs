//! Pseudo-class stripping.
//!
//! Structural queries never match `a:hover` or `p::first-line`, even when an
//! `a` or `p` exists, so selectors are stripped of every known pseudo-class
//! and pseudo-element before they are looked up in the document.
//!
//! Parameterized entries (`:nth-child(n)`, `:lang(language)`,
//! `:not(selector)`) are matched as literal text. A selector written with a
//! concrete argument such as `li:nth-child(2)` keeps its pseudo-class and is
//! looked up as written.

/// Pseudo-classes and pseudo-elements removed before querying.
pub static STANDARD_PSEUDO_CLASSES: &[&str] = &[
    ":active",
    ":after",
    ":before",
    ":checked",
    ":disabled",
    ":empty",
    ":enabled",
    ":first-child",
    ":first-letter",
    ":first-line",
    ":first-of-type",
    ":focus",
    ":hover",
    ":in-range",
    ":invalid",
    ":lang(language)",
    ":last-child",
    ":last-of-type",
    ":link",
    ":not(selector)",
    ":nth-child(n)",
    ":nth-last-child(n)",
    ":nth-last-of-type(n)",
    ":nth-of-type(n)",
    ":only-of-type",
    ":only-child",
    ":optional",
    ":out-of-range",
    ":read-only",
    ":read-write",
    ":required",
    ":root",
    ":target",
    ":valid",
    ":visited",
];

/// The set of tokens stripped from selectors: the standard list plus any
/// project-specific additions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PseudoClassTable {
    extra: Vec<String>,
}

impl PseudoClassTable {
    /// The standard table.
    pub fn standard() -> Self {
        Self::default()
    }

    /// Appends tokens after the standard ones. A missing leading `:` is added.
    pub fn with_extra<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for token in tokens {
            let token = token.into();
            let token = if token.starts_with(':') {
                token
            } else {
                format!(":{token}")
            };
            if token.len() > 1 && !self.contains(&token) {
                self.extra.push(token);
            }
        }
        self
    }

    /// All tokens: the standard ones, then the extras.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        STANDARD_PSEUDO_CLASSES
            .iter()
            .copied()
            .chain(self.extra.iter().map(String::as_str))
    }

    /// Returns true if the table holds exactly this token.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens().any(|t| t == token)
    }

    /// Removes every occurrence of every token, in its double-colon form
    /// first, then in its single-colon form.
    ///
    /// An occurrence followed by an identifier character is part of a longer
    /// name (`:focus` inside `:focus-within`) and is kept. Longer tokens are
    /// tried first.
    pub fn strip(&self, selector: &str) -> String {
        let mut tokens: Vec<&str> = self.tokens().collect();
        tokens.sort_by_key(|token| std::cmp::Reverse(token.len()));

        let mut stripped = selector.to_string();
        for token in tokens {
            if !stripped.contains(token) {
                continue;
            }
            stripped = remove_token(&stripped, &format!(":{token}"));
            stripped = remove_token(&stripped, token);
        }
        stripped
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Removes whole-name occurrences of `token` from `selector`.
fn remove_token(selector: &str, token: &str) -> String {
    let bounded = token.ends_with(is_ident_char);
    let mut out = String::with_capacity(selector.len());
    let mut rest = selector;

    while let Some(at) = rest.find(token) {
        let after = &rest[at + token.len()..];
        out.push_str(&rest[..at]);
        if bounded && after.starts_with(is_ident_char) {
            out.push_str(token);
        }
        rest = after;
    }
    out.push_str(rest);
    out
}

/// Strips the standard pseudo-classes from a selector.
pub fn normalize_selector(selector: &str) -> String {
    PseudoClassTable::standard().strip(selector)
}
