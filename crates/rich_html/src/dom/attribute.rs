// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::fmt;

use super::css::{CssAttribute, CssAttributeMatcher, CssParser};

pub const STYLE_ATTRIBUTE: &str = "style";

/// The value of an HTML attribute.
///
/// Parsed `style` attributes are stored as [AttributeValue::String] so they
/// re-serialize byte for byte. They only become
/// [AttributeValue::InlineCss] once their declarations are edited.
#[derive(Clone, Debug)]
pub enum AttributeValue {
    /// A boolean attribute such as `nostyle`.
    None,
    String(String),
    InlineCss(Vec<CssAttribute>),
}

impl AttributeValue {
    pub fn to_string_value(&self) -> Option<String> {
        match self {
            Self::None => None,
            Self::String(value) => Some(value.clone()),
            Self::InlineCss(css) => Some(CssParser::serialize(css)),
        }
    }
}

impl PartialEq for AttributeValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InlineCss(a), Self::InlineCss(b)) => a == b,
            _ => self.to_string_value() == other.to_string_value(),
        }
    }
}

impl Eq for AttributeValue {}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttributeValue::None,
        }
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    pub fn is_style(&self) -> bool {
        self.is_named(STYLE_ATTRIBUTE)
    }

    /// The declarations of a `style` attribute. Empty for any other
    /// attribute.
    pub fn css_attributes(&self) -> Vec<CssAttribute> {
        if !self.is_style() {
            return Vec::new();
        }
        match &self.value {
            AttributeValue::None => Vec::new(),
            AttributeValue::String(value) => CssParser::parse(value),
            AttributeValue::InlineCss(css) => css.clone(),
        }
    }

    pub fn contains_css_attribute(
        &self,
        matcher: &dyn CssAttributeMatcher,
    ) -> bool {
        self.css_attributes().iter().any(|css| matcher.check(css))
    }

    /// Drop every declaration accepted by `matcher`. Returns whether
    /// anything was removed.
    pub fn remove_css_attributes(
        &mut self,
        matcher: &dyn CssAttributeMatcher,
    ) -> bool {
        let css = self.css_attributes();
        let kept: Vec<CssAttribute> =
            css.iter().filter(|c| !matcher.check(c)).cloned().collect();
        if kept.len() == css.len() {
            return false;
        }
        self.value = AttributeValue::InlineCss(kept);
        true
    }

    pub fn has_empty_css(&self) -> bool {
        self.is_style()
            && matches!(&self.value, AttributeValue::InlineCss(css) if css.is_empty())
    }

    /// The attribute as it appears inside an opening tag.
    pub fn to_html(&self) -> String {
        match self.value.to_string_value() {
            Some(value) => format!(
                "{}=\"{}\"",
                self.name,
                html_escape::encode_double_quoted_attribute(&value)
            ),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

/// Whether two attribute lists hold the same attributes, in any order.
pub fn same_attribute_set(left: &[Attribute], right: &[Attribute]) -> bool {
    left.len() == right.len() && left.iter().all(|a| right.contains(a))
}
