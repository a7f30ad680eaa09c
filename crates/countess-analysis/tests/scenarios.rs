//! End-to-end analysis of whole sources.

use countess_analysis::{
    analyze, analyze_with, AnalysisError, AnalyzeOptions, OverwrittenProperty, UnusedSelector,
};
use countess_template::Construct;
use pretty_assertions::assert_eq;

fn page(style: &str, body: &str) -> String {
    format!("<!DOCTYPE html>\n<html>\n<head>\n<style>\n{style}\n</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n")
}

fn overwritten(selector: &str, property: &str, media: Option<&str>) -> OverwrittenProperty {
    OverwrittenProperty {
        selector: selector.to_string(),
        property: property.to_string(),
        media: media.map(str::to_string),
    }
}

#[test]
fn test_selector_without_element_is_unused() {
    let result = analyze(&page(".a { color: red; }", "<p></p>")).unwrap();
    assert_eq!(
        result.unused,
        vec![UnusedSelector {
            selector: ".a".to_string(),
            media: None,
        }]
    );
    assert!(result.overwritten.is_empty());
}

#[test]
fn test_repeated_rule_overwrites_property() {
    let result = analyze(&page(".a{color:red} .a{color:blue}", "<div class=\"a\"></div>")).unwrap();
    assert!(result.unused.is_empty());
    assert_eq!(result.overwritten, vec![overwritten(".a", "color", None)]);
}

#[test]
fn test_important_declaration_is_not_overwritten() {
    let result = analyze(&page(
        ".a{color:red !important} .a{color:blue}",
        "<div class=\"a\"></div>",
    ))
    .unwrap();
    assert!(result.is_clean());
}

#[test]
fn test_override_inside_media_block() {
    let result = analyze(&page(
        "@media (max-width:600px){ .a{color:red} .a{color:blue} }",
        "<div class=\"a\"></div>",
    ))
    .unwrap();
    assert!(result.unused.is_empty());
    assert_eq!(
        result.overwritten,
        vec![overwritten(".a", "color", Some("(max-width:600px)"))]
    );
}

#[test]
fn test_host_selector_targets_component() {
    let source = r#"<dom-module id="x-tag" class="x">
  <template>
    <style>
      :host(.x) {
        display: block;
      }
      :host {
        --x-tag-color: red;
        color: var(--x-tag-color);
      }
    </style>
    <span></span>
  </template>
  <script>
    Polymer({ is: 'x-tag' });
  </script>
</dom-module>"#;

    let result = analyze(source).unwrap();
    assert!(result.unused.is_empty(), "unused: {:?}", result.unused);
    assert!(result.overwritten.is_empty());
}

#[test]
fn test_unterminated_mixin_fails() {
    let source = "<dom-module>\n<template>\n<style>\n:host {\n  --foo: {\n    color: red;\n</style>\n</template>\n</dom-module>";
    assert!(matches!(
        analyze(source),
        Err(AnalysisError::MalformedTemplate {
            construct: Construct::Mixin,
            ..
        })
    ));
}

#[test]
fn test_pseudo_classes_do_not_hide_elements() {
    let result = analyze(&page(
        "a:hover { color: red; } p::first-line { color: red; } li:nth-child(2) { top: 0; } :root { top: 0; }",
        "<a href=\"#\"></a><p></p><ul><li></li><li></li></ul>",
    ))
    .unwrap();
    assert!(result.unused.is_empty(), "unused: {:?}", result.unused);
}

#[test]
fn test_parameterized_pseudo_class_without_match_is_unused() {
    let result = analyze(&page("li:nth-child(3) { top: 0; }", "<ul><li></li></ul>")).unwrap();
    assert_eq!(result.unused.len(), 1);
}

#[test]
fn test_unsupported_pseudo_class_names_selector() {
    let err = analyze(&page("a:focus-visible { top: 0; }", "<a></a>")).unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::SelectorEvaluation { ref selector, .. } if selector == "a:focus-visible"
    ));
}

#[test]
fn test_stylesheet_error_carries_text() {
    let err = analyze(&page(".a { color red; }", "<p></p>")).unwrap_err();
    match err {
        AnalysisError::StylesheetParse { snippet, .. } => assert!(!snippet.is_empty()),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_missing_style_element() {
    assert_eq!(
        analyze("<html><body><p></p></body></html>"),
        Err(AnalysisError::StyleBlockNotFound)
    );
}

#[test]
fn test_only_first_style_is_analyzed() {
    let source = page(".a { top: 0; }", "<style>.b { top: 0; }</style><p></p>");
    let result = analyze(&source).unwrap();
    assert_eq!(result.unused.len(), 1);
    assert_eq!(result.unused[0].selector, ".a");
}

#[test]
fn test_results_are_deterministic() {
    let source = page(
        ".a, .b { color: red; margin: 0; }\n.a { color: blue; }\n@media print { .a { margin: 1px; } .a { margin: 2px; } .c { } }\n.b { margin: 3px; }",
        "<div class=\"a b\"></div>",
    );
    let first = analyze(&source).unwrap();
    for _ in 0..5 {
        assert_eq!(analyze(&source).unwrap(), first);
    }
    assert_eq!(
        first.overwritten,
        vec![
            overwritten(".a", "color", None),
            overwritten(".b", "margin", None),
            overwritten(".a", "margin", Some("print")),
        ]
    );
    assert_eq!(
        first.unused,
        vec![UnusedSelector {
            selector: ".c".to_string(),
            media: Some("print".to_string()),
        }]
    );
}

#[test]
fn test_scopes_never_cross() {
    let source = page(
        ".a { color: red; }\n@media print { .a { color: blue; } }\n@media screen { .a { color: green; } }",
        "<div class=\"a\"></div>",
    );
    assert!(analyze(&source).unwrap().overwritten.is_empty());
}

#[test]
fn test_important_suppresses_every_later_match() {
    let source = page(
        ".a { color: red !important; top: 0; }\n.a { color: blue; top: 1px; }\n.a { color: green !important; }",
        "<div class=\"a\"></div>",
    );
    assert_eq!(
        analyze(&source).unwrap().overwritten,
        vec![overwritten(".a", "top", None), overwritten(".a", "color", None)]
    );
}

#[test]
fn test_checks_are_independent() {
    let source = page(
        ".a { color: red; } .gone { top: 0; } .a { color: blue; } .gone { top: 1px; }",
        "<div class=\"a\"></div>",
    );
    let both = analyze(&source).unwrap();

    let unused_only = AnalyzeOptions {
        overwritten: false,
        ..AnalyzeOptions::default()
    };
    let overwritten_only = AnalyzeOptions {
        unused: false,
        ..AnalyzeOptions::default()
    };

    assert_eq!(analyze_with(&source, &unused_only).unwrap().unused, both.unused);
    assert_eq!(
        analyze_with(&source, &overwritten_only).unwrap().overwritten,
        both.overwritten
    );
    assert_eq!(both.unused.len(), 2);
    assert_eq!(both.overwritten, vec![overwritten(".a", "color", None)]);
}
