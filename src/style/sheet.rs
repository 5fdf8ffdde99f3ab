use std::path::Path;

use indexmap::IndexMap;
use nom::{
    bytes::complete::{tag, take_until, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{opt, rest},
    sequence::{delimited, preceded, tuple},
    IResult,
};

use crate::style::error::{ParseErrorKind, Result, StyleError, StyleParseError};
use crate::style::props::PropertyMap;

/// State name of rules written without a `:state` suffix.
pub const BASE_STATE: &str = "base";

/// state → declarations
type StateRules = IndexMap<String, PropertyMap>;
/// component ("" when the selector names none) → states
type ComponentRules = IndexMap<String, StateRules>;

/// Outcome of a lenient load.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rules that were stored (later duplicates count again)
    pub rules: usize,
    /// Rules that were skipped
    pub errors: Vec<StyleParseError>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The rule set controls resolve their look from.
///
/// Rules are keyed by `(class, component, state)`. Defining the same key twice
/// keeps only the later declaration block. Loading replaces every rule.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    classes: IndexMap<String, ComponentRules>,
    revision: u64,
}

#[derive(Debug, PartialEq, Eq)]
struct Selector<'a> {
    class: &'a str,
    state: &'a str,
    component: Option<&'a str>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `source` leniently; skipped rules are logged.
    pub fn from_source(source: &str) -> Self {
        let mut sheet = Self::new();
        sheet.load(source);
        sheet
    }

    /// Parse `source`, failing if any rule had to be skipped.
    pub fn from_source_strict(source: &str) -> Result<Self> {
        let mut sheet = Self::new();
        let report = sheet.load(source);
        if report.is_clean() {
            Ok(sheet)
        } else {
            Err(StyleError::Parse(report.errors))
        }
    }

    /// Read and leniently parse a sheet file. Only I/O problems are errors.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let mut sheet = Self::new();
        sheet.load_path(path)?;
        Ok(sheet)
    }

    /// Replace all rules with those read from `path`.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| StyleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.load(&source))
    }

    /// Replace all rules with those parsed from `source`.
    ///
    /// Malformed rules are skipped one by one; the rest of the sheet still loads.
    pub fn load(&mut self, source: &str) -> LoadReport {
        self.classes.clear();
        self.revision += 1;

        let text = strip_comments(source);
        let mut report = LoadReport::default();
        let mut remaining: &str = &text;

        loop {
            let trimmed = remaining.trim_start();
            if trimmed.is_empty() {
                break;
            }
            let line = line_of(&text, trimmed);

            let Some(open) = trimmed.find('{') else {
                report.errors.push(StyleParseError {
                    line,
                    selector: trimmed.trim().to_string(),
                    kind: ParseErrorKind::InvalidSelector,
                });
                break;
            };

            let selector_text = trimmed[..open].trim();
            let after = &trimmed[open + 1..];

            match after.find(|c: char| c == '{' || c == '}') {
                Some(close) if after[close..].starts_with('}') => {
                    remaining = &after[close + 1..];
                    match parse_selector(selector_text) {
                        Ok(selector) => {
                            self.insert(selector, parse_declarations(&after[..close]));
                            report.rules += 1;
                        }
                        Err(kind) => report.errors.push(StyleParseError {
                            line,
                            selector: selector_text.to_string(),
                            kind,
                        }),
                    }
                }
                Some(nested) => {
                    // The block never closed before the next one opened.
                    // Resume at the start of that next rule's selector.
                    report.errors.push(StyleParseError {
                        line,
                        selector: selector_text.to_string(),
                        kind: ParseErrorKind::UnterminatedBlock,
                    });
                    let segment = &after[..nested];
                    let resume = segment
                        .rfind(|c: char| c == ';' || c == '\n')
                        .map(|i| i + 1)
                        .unwrap_or(0);
                    remaining = &after[resume..];
                }
                None => {
                    report.errors.push(StyleParseError {
                        line,
                        selector: selector_text.to_string(),
                        kind: ParseErrorKind::UnterminatedBlock,
                    });
                    break;
                }
            }
        }

        for error in &report.errors {
            log::warn!("skipping style rule: {}", error);
        }
        log::debug!(
            "loaded {} style rule(s), {} skipped (revision {})",
            report.rules,
            report.errors.len(),
            self.revision
        );
        report
    }

    fn insert(&mut self, selector: Selector<'_>, props: PropertyMap) {
        self.classes
            .entry(selector.class.to_string())
            .or_default()
            .entry(selector.component.unwrap_or("").to_string())
            .or_default()
            .insert(selector.state.to_string(), props);
    }

    /// Declarations of exactly `(class, state, component)`, if any rule defines them.
    pub fn get(&self, class: &str, state: &str, component: Option<&str>) -> Option<&PropertyMap> {
        self.classes
            .get(class)?
            .get(component.unwrap_or(""))?
            .get(state)
    }

    /// Declarations of `(class, state, component)`, empty when undefined.
    pub fn resolve(&self, class: &str, state: &str, component: Option<&str>) -> PropertyMap {
        self.get(class, state, component).cloned().unwrap_or_default()
    }

    /// `base ⊕ state` for the given class and component.
    pub fn merged(&self, class: &str, state: &str, component: Option<&str>) -> PropertyMap {
        let base = self.resolve(class, BASE_STATE, component);
        if state == BASE_STATE {
            return base;
        }
        match self.get(class, state, component) {
            Some(over) => base.merged_with(over),
            None => base,
        }
    }

    /// Whether any state of `(class, component)` declares `key`.
    pub fn declares(&self, class: &str, component: Option<&str>, key: &str) -> bool {
        self.classes
            .get(class)
            .and_then(|components| components.get(component.unwrap_or("")))
            .map(|states| states.values().any(|props| props.contains(key)))
            .unwrap_or(false)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// Number of distinct `(class, component, state)` keys.
    pub fn rule_count(&self) -> usize {
        self.classes
            .values()
            .flat_map(|components| components.values())
            .map(|states| states.len())
            .sum()
    }

    /// Bumped by every load, so holders can tell a sheet was replaced.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// 1-based line of `fragment` (a suffix of `source`).
fn line_of(source: &str, fragment: &str) -> usize {
    let offset = source.len().saturating_sub(fragment.len());
    source[..offset].matches('\n').count() + 1
}

fn block_comment(input: &str) -> IResult<&str, &str> {
    delimited(tag("/*"), take_until("*/"), tag("*/"))(input)
}

/// Remove `/* ... */` comments, keeping their newlines so line numbers hold.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut remaining = source;
    while let Some(start) = remaining.find("/*") {
        out.push_str(&remaining[..start]);
        match block_comment(&remaining[start..]) {
            Ok((rest, body)) => {
                out.extend(body.chars().filter(|&c| c == '\n'));
                remaining = rest;
            }
            Err(_) => {
                // Unterminated comment swallows the rest of the sheet
                remaining = "";
            }
        }
    }
    out.push_str(remaining);
    out
}

fn identifier(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

/// `.class[:state] [component]`
fn selector(input: &str) -> IResult<&str, Selector<'_>> {
    let (input, _) = multispace0(input)?;
    let (input, _) = opt(char('.'))(input)?;
    let (input, class) = identifier(input)?;
    let (input, state) = opt(preceded(char(':'), identifier))(input)?;
    let (input, component) = opt(preceded(multispace1, identifier))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((
        input,
        Selector {
            class,
            state: state.unwrap_or(BASE_STATE),
            component,
        },
    ))
}

fn parse_selector(text: &str) -> std::result::Result<Selector<'_>, ParseErrorKind> {
    if text.is_empty() {
        return Err(ParseErrorKind::EmptySelector);
    }
    match selector(text) {
        Ok(("", selector)) => Ok(selector),
        _ => Err(ParseErrorKind::InvalidSelector),
    }
}

/// `name: value`
fn declaration(input: &str) -> IResult<&str, (&str, &str)> {
    let (input, name) = preceded(multispace0, take_while1(|c: char| c != ':' && !c.is_whitespace()))(input)?;
    let (input, _) = tuple((multispace0, char(':')))(input)?;
    let (input, value) = rest(input)?;
    Ok((input, (name, value.trim())))
}

fn parse_declarations(body: &str) -> PropertyMap {
    let mut props = PropertyMap::new();
    for segment in body.split(';') {
        if segment.trim().is_empty() {
            continue;
        }
        match declaration(segment) {
            Ok((_, (name, value))) => props.insert(name, value),
            Err(_) => log::trace!("ignoring declaration without a colon: {:?}", segment.trim()),
        }
    }
    props
}
