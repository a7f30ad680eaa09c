//! Overwritten property detection.
//!
//! A declaration is overwritten when a later rule in the same scope lists the
//! same selector and sets the same property. The top level is one scope and
//! each `@media` block is its own; rules are never compared across scopes.
//! Declarations marked `!important` in the earlier rule are never reported,
//! whatever the later rule says.

use crate::document::Document;
use crate::error::AnalysisError;
use crate::pseudo::PseudoClassTable;
use crate::result::OverwrittenProperty;
use crate::usage::UsageCheck;
use countess_css::{Rule, StyleRule, Stylesheet};

/// Lists every overwritten declaration, in stylesheet order.
///
/// Only selectors that match something in the document are considered. One
/// record is produced per (earlier declaration, later declaration) pair, so a
/// property set three times yields three records.
pub fn find_overwritten<D: Document + ?Sized>(
    sheet: &Stylesheet,
    document: &D,
    table: &PseudoClassTable,
) -> Result<Vec<OverwrittenProperty>, AnalysisError> {
    let mut check = UsageCheck::new(document, table);
    let mut overwritten = Vec::new();

    for (index, rule) in sheet.rules.iter().enumerate() {
        match rule {
            Rule::Style(style) => {
                let later = &sheet.rules[index + 1..];
                scan(style, later, None, &mut check, &mut overwritten)?;
            }
            Rule::Media(media) => {
                for (inner, rule) in media.rules.iter().enumerate() {
                    if let Rule::Style(style) = rule {
                        let later = &media.rules[inner + 1..];
                        scan(style, later, Some(&media.condition), &mut check, &mut overwritten)?;
                    }
                }
            }
            Rule::AtRule(_) => {}
        }
    }

    Ok(overwritten)
}

fn scan<D: Document + ?Sized>(
    rule: &StyleRule,
    later: &[Rule],
    media: Option<&str>,
    check: &mut UsageCheck<'_, D>,
    out: &mut Vec<OverwrittenProperty>,
) -> Result<(), AnalysisError> {
    for selector in &rule.selectors {
        if !check.is_used(selector)? {
            continue;
        }

        let repeats = later
            .iter()
            .filter_map(Rule::as_style)
            .filter(|other| other.has_selector(selector));

        for other in repeats {
            for earlier in rule.declarations.iter().filter(|d| !d.is_important()) {
                for replacement in &other.declarations {
                    if earlier.property == replacement.property {
                        out.push(OverwrittenProperty {
                            selector: selector.clone(),
                            property: earlier.property.to_string(),
                            media: media.map(str::to_string),
                        });
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usage::tests::FakeDocument;
    use pretty_assertions::assert_eq;

    fn overwritten(css: &str, doc: &FakeDocument) -> Vec<OverwrittenProperty> {
        let sheet = countess_css::parse(css).unwrap();
        find_overwritten(&sheet, doc, &PseudoClassTable::standard()).unwrap()
    }

    fn record(selector: &str, property: &str, media: Option<&str>) -> OverwrittenProperty {
        OverwrittenProperty {
            selector: selector.to_string(),
            property: property.to_string(),
            media: media.map(str::to_string),
        }
    }

    #[test]
    fn test_later_rule_overwrites() {
        let doc = FakeDocument::new(&[".a"]);
        assert_eq!(
            overwritten(".a { color: red; margin: 0; } .a { color: blue; }", &doc),
            vec![record(".a", "color", None)]
        );
    }

    #[test]
    fn test_important_is_kept() {
        let doc = FakeDocument::new(&[".a"]);
        assert!(overwritten(".a { color: red !important; } .a { color: blue; }", &doc).is_empty());
        assert_eq!(
            overwritten(".a { color: red; } .a { color: blue !important; }", &doc),
            vec![record(".a", "color", None)]
        );
    }

    #[test]
    fn test_group_member_matches() {
        let doc = FakeDocument::new(&[".a", ".b"]);
        assert_eq!(
            overwritten(".a, .b { top: 0; } .b { top: 1px; }", &doc),
            vec![record(".b", "top", None)]
        );
    }

    #[test]
    fn test_scopes_are_separate() {
        let doc = FakeDocument::new(&[".a"]);
        assert!(overwritten(".a { color: red; } @media print { .a { color: blue; } }", &doc).is_empty());
        assert!(overwritten("@media print { .a { color: red; } } .a { color: blue; }", &doc).is_empty());
    }

    #[test]
    fn test_inside_media() {
        let doc = FakeDocument::new(&[".a"]);
        assert_eq!(
            overwritten("@media (max-width: 600px) { .a { top: 0; } .a { top: 1px; } }", &doc),
            vec![record(".a", "top", Some("(max-width: 600px)"))]
        );
    }

    #[test]
    fn test_unused_selectors_skipped() {
        let doc = FakeDocument::new(&[]);
        assert!(overwritten(".a { color: red; } .a { color: blue; }", &doc).is_empty());
    }

    #[test]
    fn test_no_deduplication() {
        let doc = FakeDocument::new(&[".a"]);
        assert_eq!(
            overwritten(".a { color: red; } .a { color: blue; } .a { color: green; }", &doc),
            vec![
                record(".a", "color", None),
                record(".a", "color", None),
                record(".a", "color", None),
            ]
        );
    }

    #[test]
    fn test_repeated_property_in_later_rule() {
        let doc = FakeDocument::new(&[".a"]);
        assert_eq!(
            overwritten(".a { color: red; } .a { color: blue; color: green; }", &doc).len(),
            2
        );
    }
}
