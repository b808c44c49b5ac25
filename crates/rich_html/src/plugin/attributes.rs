// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dom::{Attribute, AttributeValue};

// name="value", name='value', name=value, "value", value
static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"([\w-]+)\s*=\s*"([^"]*)"(?:\s|$)"#,
        r#"|([\w-]+)\s*=\s*'([^']*)'(?:\s|$)"#,
        r#"|([\w-]+)\s*=\s*([^\s'"]+)(?:\s|$)"#,
        r#"|"([^"]*)"(?:\s|$)"#,
        r#"|(\S+)(?:\s|$)"#,
    ))
    .unwrap()
});

/// Parses the attribute list of a shortcode, e.g. `123 w=640 h="480"`.
///
/// Keys are lowercased. Values without a key become bare attributes named
/// after the value, so `[wpvideo OcobLTqC]` yields one attribute
/// `OcobLTqC` with no value.
pub struct ShortcodeAttributeParser;

impl ShortcodeAttributeParser {
    pub fn parse(text: &str) -> Vec<Attribute> {
        let text = text.replace(['\u{00A0}', '\u{200B}'], " ");
        ATTRIBUTE
            .captures_iter(&text)
            .filter_map(|captures| {
                let group = |index: usize| captures.get(index).map(|m| m.as_str());
                for (key, value) in [(1, 2), (3, 4), (5, 6)] {
                    if let (Some(key), Some(value)) = (group(key), group(value)) {
                        return Some(Attribute::new(key.to_lowercase(), value));
                    }
                }
                group(7).or_else(|| group(8)).map(Attribute::bare)
            })
            .collect()
    }
}

/// The attributes of an HTML tag written in text, split into named ones
/// and bare values.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HtmlAttributes {
    pub named: Vec<Attribute>,
    pub unnamed: Vec<String>,
}

impl HtmlAttributes {
    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.named.iter().find(|a| a.is_named(name))
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.get(name).and_then(|a| a.value.to_string_value())
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
            || self.unnamed.iter().any(|u| u.eq_ignore_ascii_case(name))
    }
}

pub struct HtmlAttributesParser;

impl HtmlAttributesParser {
    pub fn parse(text: &str) -> HtmlAttributes {
        let mut attributes = HtmlAttributes::default();
        for attribute in ShortcodeAttributeParser::parse(text) {
            match attribute.value {
                AttributeValue::None => attributes.unnamed.push(attribute.name),
                _ => attributes.named.push(attribute),
            }
        }
        attributes
    }
}

/// Writes attributes back in shortcode form: `key` or `key="value"`.
pub struct ShortcodeAttributeSerializer;

impl ShortcodeAttributeSerializer {
    pub fn serialize(attribute: &Attribute) -> String {
        match attribute.value.to_string_value() {
            Some(value) => Self::serialize_pair(&attribute.name, &value),
            None => attribute.name.clone(),
        }
    }

    pub fn serialize_pair(key: &str, value: &str) -> String {
        format!("{key}=\"{value}\"")
    }

    pub fn serialize_all<'a>(
        attributes: impl IntoIterator<Item = &'a Attribute>,
    ) -> String {
        attributes
            .into_iter()
            .map(Self::serialize)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;

    #[test]
    fn parses_every_quoting_style() {
        let attributes = ShortcodeAttributeParser::parse(
            r#"src="a b.mp4" poster='p.png' W=640 "quoted" 12345"#,
        );
        assert_that!(attributes).is_equal_to(vec![
            Attribute::new("src", "a b.mp4"),
            Attribute::new("poster", "p.png"),
            Attribute::new("w", "640"),
            Attribute::bare("quoted"),
            Attribute::bare("12345"),
        ]);
    }

    #[test]
    fn tolerates_spaces_around_equals() {
        let attributes = ShortcodeAttributeParser::parse("id = \"1\"\u{00A0}x=2");
        assert_that!(attributes).is_equal_to(vec![
            Attribute::new("id", "1"),
            Attribute::new("x", "2"),
        ]);
    }

    #[test]
    fn empty_text_has_no_attributes() {
        assert_that!(ShortcodeAttributeParser::parse("   ")).is_empty();
    }

    #[test]
    fn html_attributes_split_bare_values() {
        let attributes = HtmlAttributesParser::parse(r#" src="v.mp4" controls"#);
        assert_that!(attributes.value("SRC")).is_equal_to(Some(String::from("v.mp4")));
        assert_that!(attributes.unnamed).is_equal_to(vec![String::from("controls")]);
        assert_that!(attributes.has("controls")).is_true();
        assert_that!(attributes.has("poster")).is_false();
    }

    #[test]
    fn serializes_keys_and_pairs() {
        let attributes = vec![Attribute::bare("123"), Attribute::new("w", "640")];
        assert_that!(ShortcodeAttributeSerializer::serialize_all(&attributes))
            .is_equal_to(String::from(r#"123 w="640""#));
    }
}
