// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::tag_scanner::{TagScanner, TagType};
use super::{ShortcodeAttributeParser, TextProcessor};
use crate::dom::{Attribute, AttributeValue};

/// A bracketed directive such as `[gallery ids="1,2"]` or
/// `[caption]A cat[/caption]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shortcode {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub tag_type: TagType,
    pub content: Option<String>,
}

impl Shortcode {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes
            .iter()
            .find(|a| a.is_named(name) && a.value != AttributeValue::None)
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.attribute(name).and_then(|a| a.value.to_string_value())
    }

    /// The first value written without a key, e.g. the id in
    /// `[wpvideo OcobLTqC]`.
    pub fn first_unnamed(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.value == AttributeValue::None)
            .map(|a| a.name.as_str())
    }
}

type ShortcodeReplacer = dyn Fn(&Shortcode) -> Option<String>;

/// Replaces the shortcodes with a given tag in text.
///
/// An escaped shortcode (`[[tag]]`) is never passed to the replacer.
pub struct ShortcodeProcessor {
    tag: String,
    scanner: TagScanner,
    replacer: Box<ShortcodeReplacer>,
}

impl ShortcodeProcessor {
    pub fn new(
        tag: &str,
        replacer: impl Fn(&Shortcode) -> Option<String> + 'static,
    ) -> Self {
        Self {
            tag: tag.to_owned(),
            scanner: TagScanner::shortcode(tag),
            replacer: Box::new(replacer),
        }
    }
}

impl TextProcessor for ShortcodeProcessor {
    fn process(&self, text: &str) -> String {
        self.scanner.replace_all(text, |scanned| {
            let shortcode = Shortcode {
                tag: self.tag.clone(),
                attributes: ShortcodeAttributeParser::parse(scanned.arguments),
                tag_type: scanned.tag_type,
                content: scanned.content.map(str::to_owned),
            };
            (self.replacer)(&shortcode)
        })
    }
}
