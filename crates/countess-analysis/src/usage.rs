//! Unused selector detection.

use crate::document::Document;
use crate::error::AnalysisError;
use crate::pseudo::PseudoClassTable;
use crate::result::UnusedSelector;
use countess_css::{Rule, StyleRule, Stylesheet};
use rustc_hash::FxHashMap;

/// Selector text queried when stripping leaves nothing, as for `:root`.
const UNIVERSAL: &str = "*";

/// Answers "does this selector match anything" with pseudo-classes stripped,
/// remembering answers for selectors already seen.
pub(crate) struct UsageCheck<'a, D: ?Sized> {
    document: &'a D,
    table: &'a PseudoClassTable,
    seen: FxHashMap<String, bool>,
}

impl<'a, D: Document + ?Sized> UsageCheck<'a, D> {
    pub(crate) fn new(document: &'a D, table: &'a PseudoClassTable) -> Self {
        Self {
            document,
            table,
            seen: FxHashMap::default(),
        }
    }

    pub(crate) fn is_used(&mut self, selector: &str) -> Result<bool, AnalysisError> {
        if let Some(&used) = self.seen.get(selector) {
            return Ok(used);
        }

        let stripped = self.table.strip(selector);
        let query = match stripped.trim() {
            "" => UNIVERSAL,
            query => query,
        };
        let used = self
            .document
            .matches(query)
            .map_err(|err| AnalysisError::SelectorEvaluation {
                selector: selector.to_string(),
                message: err.message,
            })?;

        self.seen.insert(selector.to_string(), used);
        Ok(used)
    }
}

/// Lists every selector that matches no element, in stylesheet order.
///
/// Rules directly inside `@media` blocks are checked at the block's position
/// and tagged with its condition. A selector appearing in several rules is
/// reported once per appearance.
pub fn find_unused<D: Document + ?Sized>(
    sheet: &Stylesheet,
    document: &D,
    table: &PseudoClassTable,
) -> Result<Vec<UnusedSelector>, AnalysisError> {
    let mut check = UsageCheck::new(document, table);
    let mut unused = Vec::new();

    for rule in &sheet.rules {
        match rule {
            Rule::Style(style) => collect(style, None, &mut check, &mut unused)?,
            Rule::Media(media) => {
                for style in media.style_rules() {
                    collect(style, Some(&media.condition), &mut check, &mut unused)?;
                }
            }
            Rule::AtRule(_) => {}
        }
    }

    Ok(unused)
}

fn collect<D: Document + ?Sized>(
    rule: &StyleRule,
    media: Option<&str>,
    check: &mut UsageCheck<'_, D>,
    unused: &mut Vec<UnusedSelector>,
) -> Result<(), AnalysisError> {
    for selector in &rule.selectors {
        if !check.is_used(selector)? {
            unused.push(UnusedSelector {
                selector: selector.clone(),
                media: media.map(str::to_string),
            });
        }
    }
    Ok(())
}
