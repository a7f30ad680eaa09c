//! The normalization pass.

use crate::error::{Construct, TemplateError};
use crate::{APPLY_MARKER, ROOT_TAG, WRAPPER_TAG};

const HOST_CALL: &str = ":host(";
const HOST_ATTRIBUTE: &str = ":host[";
const HOST: &str = ":host";

/// Rewrites a component source into markup a plain HTML parser can read.
///
/// Fails only when a script, comment or mixin opened in the source is never
/// closed; anything else produces output, even for malformed input.
pub fn normalize_template(source: &str) -> Result<String, TemplateError> {
    let page = coerce_page(source);
    let words: Vec<&str> = page.split_whitespace().collect();
    let kept = strip_words(&words)?;
    Ok(kept.join(" "))
}

/// Steps that work on the raw text: tag substitution and `@apply` lines.
fn coerce_page(source: &str) -> String {
    let html = source.replace(WRAPPER_TAG, ROOT_TAG);
    let html = replace_first(&html, "<template", "<body");
    let html = replace_last(&html, "</template", "</body");

    html.lines()
        .filter(|line| !line.contains(APPLY_MARKER))
        .collect::<Vec<_>>()
        .join("\n")
}

fn replace_first(text: &str, from: &str, to: &str) -> String {
    text.replacen(from, to, 1)
}

fn replace_last(text: &str, from: &str, to: &str) -> String {
    match text.rfind(from) {
        Some(at) => format!("{}{}{}", &text[..at], to, &text[at + from.len()..]),
        None => text.to_string(),
    }
}

/// Walks the word list once, dropping removed ranges and rewriting host
/// selectors in the words that survive.
fn strip_words(words: &[&str]) -> Result<Vec<String>, TemplateError> {
    let mut kept = Vec::with_capacity(words.len());
    let mut cursor = 0;

    while cursor < words.len() {
        match removal_end(words, cursor)? {
            Some(end) => cursor = end,
            None => {
                kept.push(rewrite_host(words[cursor]));
                cursor += 1;
            }
        }
    }

    Ok(kept)
}

/// If the word at `at` opens a removable construct, returns the index just
/// past its last word. Terminators are only looked for in later words.
fn removal_end(words: &[&str], at: usize) -> Result<Option<usize>, TemplateError> {
    let word = words[at];

    let end = if word.starts_with("--") {
        mixin_end(words, at)?
    } else if word.contains("<script") {
        terminator_end(words, at, Construct::Script, "</script")?
    } else if word.contains("<!--") {
        terminator_end(words, at, Construct::Comment, "-->")?
    } else {
        return Ok(None);
    };

    Ok(Some(end))
}

/// A mixin is a block when the word after its name holds `{`, otherwise a
/// single value ending at the next `;`.
fn mixin_end(words: &[&str], at: usize) -> Result<usize, TemplateError> {
    let opens_block = words
        .get(at + 1)
        .is_some_and(|next| next.contains('{'));

    if opens_block {
        terminator_end(words, at, Construct::Mixin, "}")
    } else {
        terminator_end(words, at, Construct::Mixin, ";")
    }
}

/// Finds the first word after `at` containing `marker` and returns the index
/// just past it.
fn terminator_end(
    words: &[&str],
    at: usize,
    construct: Construct,
    marker: &'static str,
) -> Result<usize, TemplateError> {
    words[at + 1..]
        .iter()
        .position(|word| word.contains(marker))
        .map(|offset| at + 1 + offset + 1)
        .ok_or_else(|| TemplateError::Unterminated {
            construct,
            opening: words[at].to_string(),
            expected: marker,
        })
}

/// Rewrites `:host` selectors in a single word to target the root element.
///
/// `:host(.x)` becomes `html.x`, any word containing `:host[` becomes `html`,
/// and a bare `:host` becomes `html`.
pub fn rewrite_host(word: &str) -> String {
    if word.contains(HOST_CALL) {
        rewrite_host_calls(word)
    } else if word.contains(HOST_ATTRIBUTE) {
        ROOT_TAG.to_string()
    } else {
        word.replace(HOST, ROOT_TAG)
    }
}

fn rewrite_host_calls(word: &str) -> String {
    let mut out = String::with_capacity(word.len());
    let mut rest = word;

    while let Some(start) = rest.find(HOST_CALL) {
        out.push_str(&rest[..start]);
        out.push_str(ROOT_TAG);
        let inner = &rest[start + HOST_CALL.len()..];
        match closing_paren(inner) {
            Some(close) => {
                out.push_str(&inner[..close]);
                rest = &inner[close + 1..];
            }
            None => rest = inner,
        }
    }

    out.push_str(rest);
    out
}

/// Byte index of the `)` closing an already opened parenthesis.
fn closing_paren(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (index, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some(index),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}
