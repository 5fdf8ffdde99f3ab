//! Style sheets and the cascade controls resolve their look from.
//!
//! A sheet is a list of `.class[:state] [component] { key: value; }` rules.
//! Controls ask for `base ⊕ state` maps and read them through the typed
//! accessors on [`PropertyMap`].

mod error;
mod props;
mod sheet;
pub mod values;

use std::cell::RefCell;
use std::rc::Rc;

pub use error::{ParseErrorKind, Result, StyleError, StyleParseError};
pub use props::{PropertyMap, DEFAULT_FONT_SIZE, DEFAULT_RADIUS};
pub use sheet::{LoadReport, StyleSheet, BASE_STATE};
pub use values::{BoxShadow, GlassBorder, TransitionValue};

/// The cascade shared between an engine and the controls it created.
pub type SharedStyles = Rc<RefCell<StyleSheet>>;

/// Visual state a control resolves its style for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisualState {
    #[default]
    Base,
    Hover,
    Active,
}

impl VisualState {
    /// `active` while pressed, else `hover` while hovered, else `base`.
    pub fn resolve(pressed: bool, hovered: bool) -> Self {
        if pressed {
            VisualState::Active
        } else if hovered {
            VisualState::Hover
        } else {
            VisualState::Base
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisualState::Base => BASE_STATE,
            VisualState::Hover => "hover",
            VisualState::Active => "active",
        }
    }
}

/// Class and optional sub-component a control takes its style from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StyleRef {
    pub class: String,
    pub component: Option<String>,
}

impl StyleRef {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            component: None,
        }
    }

    pub fn component(class: impl Into<String>, component: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            component: Some(component.into()),
        }
    }

    pub fn base(&self, sheet: &StyleSheet) -> PropertyMap {
        sheet.resolve(&self.class, BASE_STATE, self.component.as_deref())
    }

    /// Only what the `state` rule itself declares.
    pub fn state(&self, sheet: &StyleSheet, state: VisualState) -> PropertyMap {
        sheet.resolve(&self.class, state.as_str(), self.component.as_deref())
    }

    pub fn merged(&self, sheet: &StyleSheet, state: VisualState) -> PropertyMap {
        sheet.merged(&self.class, state.as_str(), self.component.as_deref())
    }

    pub fn declares(&self, sheet: &StyleSheet, key: &str) -> bool {
        sheet.declares(&self.class, self.component.as_deref(), key)
    }
}
