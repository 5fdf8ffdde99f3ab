mod common;

use std::io::Write;

use sheen::style::values::{parse_color, parse_transition};
use sheen::style::{ParseErrorKind, StyleError, StyleSheet, VisualState};
use sheen::widgets::Color;

use common::{approx_eq, init_logging};

const SHEET: &str = "
    /* buttons */
    .primary { width: 80; height: 40; background: #2d2f3a; transition: 0.3s ease-out; }
    .primary:hover { background: #3b3f52; transform: scale(1.05); }
    .primary:active { transform: scale(0.9) rotate(-3deg); }
    .sw toggle { background: #444; }
";

#[test]
fn test_hover_merges_over_base() {
    init_logging();
    let sheet = StyleSheet::from_source(SHEET);
    let merged = sheet.merged("primary", VisualState::Hover.as_str(), None);
    assert_eq!(merged.color("background"), Some(Color::from_hex(0x3b3f52)));
    assert_eq!(merged.number("width", 0.0), 80.0);
    let (scale, rotate) = merged.transform();
    assert!(approx_eq(scale, 1.05));
    assert_eq!(rotate, 0.0);
    let transition = merged.transition();
    assert!(approx_eq(transition.duration_ms(), 300.0));
    assert_eq!(transition.easing, "ease-out");
}

#[test]
fn test_component_rules_stay_apart() {
    let sheet = StyleSheet::from_source(SHEET);
    assert!(sheet.get("sw", "base", Some("toggle")).is_some());
    assert!(sheet.get("sw", "base", None).is_none());
    assert!(sheet.declares("sw", Some("toggle"), "background"));
    assert!(!sheet.declares("primary", None, "box-shadow"));
}

#[test]
fn test_unknown_class_resolves_empty() {
    let sheet = StyleSheet::from_source(SHEET);
    assert!(sheet.merged("nope", "hover", None).is_empty());
}

#[test]
fn test_malformed_rule_is_skipped() {
    init_logging();
    let mut sheet = StyleSheet::new();
    let report = sheet.load(".ok { width: 10; } { height: 4; } .also { width: 2; }");
    assert_eq!(report.rules, 2);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].kind, ParseErrorKind::EmptySelector);
    assert!(sheet.has_class("also"));
}

#[test]
fn test_strict_load_reports_errors() {
    let Err(StyleError::Parse(errors)) = StyleSheet::from_source_strict(".a { width: 1; ") else {
        panic!("expected a parse error");
    };
    assert_eq!(errors[0].kind, ParseErrorKind::UnterminatedBlock);
}

#[test]
fn test_sheet_from_file() {
    let path = std::env::temp_dir().join(format!("sheen-cascade-{}.css", std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(SHEET.as_bytes()).unwrap();
    drop(file);

    let sheet = StyleSheet::from_path(&path).unwrap();
    assert!(sheet.has_class("primary"));
    std::fs::remove_file(&path).unwrap();

    assert!(matches!(StyleSheet::from_path(&path), Err(StyleError::Io { .. })));
}

#[test]
fn test_value_parsers() {
    assert_eq!(parse_color("#fff"), Some(Color::WHITE));
    assert_eq!(parse_color("transparent"), Some(Color::TRANSPARENT));
    assert_eq!(parse_color("bogus"), None);
    let transition = parse_transition("150ms spring");
    assert!(approx_eq(transition.duration_ms(), 150.0));
    assert!(transition.is_springy());
}
