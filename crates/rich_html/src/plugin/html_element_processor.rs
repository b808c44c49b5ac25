// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::tag_scanner::{TagScanner, TagType};
use super::{HtmlAttributes, HtmlAttributesParser, TextProcessor};

/// An element of the tag an [HtmlElementProcessor] looks for, as it was
/// written in the HTML text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlElement {
    pub tag: String,
    pub attributes: HtmlAttributes,
    pub tag_type: TagType,
    /// The text between the opening and closing tags of a
    /// [TagType::Closed] element.
    pub content: Option<String>,
}

type ElementReplacer = dyn Fn(&HtmlElement) -> Option<String>;

/// Replaces the elements with a given tag name in HTML text.
///
/// Works on the text, before parsing or after serializing, so it can
/// rewrite elements into things that are not HTML at all.
pub struct HtmlElementProcessor {
    tag: String,
    scanner: TagScanner,
    replacer: Box<ElementReplacer>,
}

impl HtmlElementProcessor {
    /// `replacer` returns the text to put in place of an element, or `None`
    /// to leave it as it is.
    pub fn new(
        tag: &str,
        replacer: impl Fn(&HtmlElement) -> Option<String> + 'static,
    ) -> Self {
        Self {
            tag: tag.to_owned(),
            scanner: TagScanner::html(tag),
            replacer: Box::new(replacer),
        }
    }
}

impl TextProcessor for HtmlElementProcessor {
    fn process(&self, text: &str) -> String {
        self.scanner.replace_all(text, |scanned| {
            let element = HtmlElement {
                tag: self.tag.clone(),
                attributes: HtmlAttributesParser::parse(scanned.arguments),
                tag_type: scanned.tag_type,
                content: scanned.content.map(str::to_owned),
            };
            (self.replacer)(&element)
        })
    }
}
