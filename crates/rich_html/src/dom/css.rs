// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::fmt;

/// One declaration of an inline `style` attribute. A declaration without a
/// `:` is kept with no value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CssAttribute {
    pub name: String,
    pub value: Option<String>,
}

impl CssAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn name_only(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

impl fmt::Display for CssAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {}", self.name, value),
            None => write!(f, "{}", self.name),
        }
    }
}

pub struct CssParser;

impl CssParser {
    /// Parse the content of a `style` attribute. Whitespace around names
    /// and values is ignored, as are empty declarations, so `"color:blue;"`,
    /// `"color:blue"` and `"  color   :   blue   ;"` are all the same.
    pub fn parse(css: &str) -> Vec<CssAttribute> {
        css.split(';')
            .filter_map(|declaration| {
                let declaration = declaration.trim();
                if declaration.is_empty() {
                    return None;
                }
                Some(match declaration.split_once(':') {
                    Some((name, value)) => {
                        CssAttribute::new(name.trim(), value.trim())
                    }
                    None => CssAttribute::name_only(declaration),
                })
            })
            .collect()
    }

    pub fn serialize(attributes: &[CssAttribute]) -> String {
        attributes
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Decides whether a CSS declaration expresses a given style.
pub trait CssAttributeMatcher {
    fn check(&self, css: &CssAttribute) -> bool;
}

fn value_of<'a>(css: &'a CssAttribute, name: &str) -> Option<&'a str> {
    if css.name.eq_ignore_ascii_case(name) {
        css.value.as_deref()
    } else {
        None
    }
}

/// `font-weight: bold` or any numeric weight of at least 700.
pub struct BoldCssAttributeMatcher;

impl CssAttributeMatcher for BoldCssAttributeMatcher {
    fn check(&self, css: &CssAttribute) -> bool {
        match value_of(css, "font-weight") {
            Some(value) => {
                let value = value.trim();
                value.eq_ignore_ascii_case("bold")
                    || value.eq_ignore_ascii_case("bolder")
                    || value.parse::<u32>().map_or(false, |w| w >= 700)
            }
            None => false,
        }
    }
}

pub struct ItalicCssAttributeMatcher;

impl CssAttributeMatcher for ItalicCssAttributeMatcher {
    fn check(&self, css: &CssAttribute) -> bool {
        value_of(css, "font-style")
            .map_or(false, |v| v.to_ascii_lowercase().contains("italic"))
    }
}

pub struct UnderlineCssAttributeMatcher;

impl CssAttributeMatcher for UnderlineCssAttributeMatcher {
    fn check(&self, css: &CssAttribute) -> bool {
        value_of(css, "text-decoration")
            .map_or(false, |v| v.to_ascii_lowercase().contains("underline"))
    }
}

pub struct StrikethroughCssAttributeMatcher;

impl CssAttributeMatcher for StrikethroughCssAttributeMatcher {
    fn check(&self, css: &CssAttribute) -> bool {
        value_of(css, "text-decoration").map_or(false, |v| {
            v.to_ascii_lowercase().contains("line-through")
        })
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;

    fn color_blue() -> Vec<CssAttribute> {
        vec![CssAttribute::new("color", "blue")]
    }

    #[test]
    fn parses_a_single_declaration() {
        assert_that!(CssParser::parse("color:blue;")).is_equal_to(color_blue());
    }

    #[test]
    fn parses_without_trailing_semicolon() {
        assert_that!(CssParser::parse("color:blue")).is_equal_to(color_blue());
    }

    #[test]
    fn parses_with_extra_whitespace() {
        assert_that!(CssParser::parse("  color   :   blue   ;"))
            .is_equal_to(color_blue());
    }

    #[test]
    fn keeps_declaration_order_and_name_only_entries() {
        assert_that!(CssParser::parse(
            "font-weight: bold; inherit; ; text-decoration:underline"
        ))
        .is_equal_to(vec![
            CssAttribute::new("font-weight", "bold"),
            CssAttribute::name_only("inherit"),
            CssAttribute::new("text-decoration", "underline"),
        ]);
    }

    #[test]
    fn value_keeps_everything_after_the_first_colon() {
        assert_that!(CssParser::parse("background: url(http://x/y.png)"))
            .is_equal_to(vec![CssAttribute::new(
                "background",
                "url(http://x/y.png)",
            )]);
    }

    #[test]
    fn serializes_with_separators() {
        let css = CssParser::parse("color:red;font-style:italic");
        assert_eq!(CssParser::serialize(&css), "color: red; font-style: italic");
    }

    #[test]
    fn bold_matcher_accepts_keywords_and_heavy_weights() {
        let bold = BoldCssAttributeMatcher;
        assert!(bold.check(&CssAttribute::new("font-weight", "bold")));
        assert!(bold.check(&CssAttribute::new("font-weight", "700")));
        assert!(bold.check(&CssAttribute::new("Font-Weight", "900")));
        assert!(!bold.check(&CssAttribute::new("font-weight", "400")));
        assert!(!bold.check(&CssAttribute::new("font-weight", "normal")));
        assert!(!bold.check(&CssAttribute::name_only("font-weight")));
        assert!(!bold.check(&CssAttribute::new("color", "bold")));
    }

    #[test]
    fn decoration_matchers_look_inside_the_value() {
        let css = CssAttribute::new("text-decoration", "underline line-through");
        assert!(UnderlineCssAttributeMatcher.check(&css));
        assert!(StrikethroughCssAttributeMatcher.check(&css));
        assert!(!ItalicCssAttributeMatcher.check(&css));
        assert!(ItalicCssAttributeMatcher
            .check(&CssAttribute::new("font-style", "italic")));
    }
}
