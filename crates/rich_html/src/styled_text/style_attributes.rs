// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::collections::BTreeMap;

use strum_macros::{AsRefStr, Display, EnumIter};

use super::{Attachment, ElementRepresentation, StyleRepresentation};
use crate::dom::StandardElementType;

/// The styles a run of text can carry, and the key under which the
/// representation of each one is stored.
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Display,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[strum(serialize_all = "lowercase")]
pub enum StyleKey {
    Bold,
    Italic,
    /// Italic spelled as `<cite>`.
    Cite,
    Underline,
    Strikethrough,
    Code,
    Mark,
    Subscript,
    Superscript,
    Link,
    /// Only a representation: how a `<hr>` was spelled.
    HorizontalRule,
}

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
#[strum(serialize_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

impl ListKind {
    pub fn element_type(&self) -> StandardElementType {
        match self {
            Self::Ordered => StandardElementType::Ol,
            Self::Unordered => StandardElementType::Ul,
        }
    }
}

/// The block a paragraph sits in.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ParagraphKind {
    Blockquote,
    Div,
    Figure,
    Figcaption,
    Header(u8),
    List(ListKind),
    ListItem,
    Paragraph,
    Pre,
}

impl ParagraphKind {
    pub fn for_element_type(element_type: StandardElementType) -> Option<Self> {
        use StandardElementType as T;
        Some(match element_type {
            T::Blockquote => Self::Blockquote,
            T::Div => Self::Div,
            T::Figure => Self::Figure,
            T::Figcaption => Self::Figcaption,
            T::Ol => Self::List(ListKind::Ordered),
            T::Ul => Self::List(ListKind::Unordered),
            T::Li => Self::ListItem,
            T::P => Self::Paragraph,
            T::Pre => Self::Pre,
            other => Self::Header(other.header_level()?),
        })
    }

    /// The element written when no representation was stored.
    pub fn default_element_type(&self) -> StandardElementType {
        use StandardElementType as T;
        match self {
            Self::Blockquote => T::Blockquote,
            Self::Div => T::Div,
            Self::Figure => T::Figure,
            Self::Figcaption => T::Figcaption,
            Self::Header(level) => {
                T::for_header_level(*level).unwrap_or(T::H1)
            }
            Self::List(kind) => kind.element_type(),
            Self::ListItem => T::Li,
            Self::Paragraph => T::P,
            Self::Pre => T::Pre,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParagraphProperty {
    pub kind: ParagraphKind,
    pub representation: Option<ElementRepresentation>,
}

impl ParagraphProperty {
    pub fn new(kind: ParagraphKind) -> Self {
        Self {
            kind,
            representation: None,
        }
    }

    pub fn with_representation(
        kind: ParagraphKind,
        representation: ElementRepresentation,
    ) -> Self {
        Self {
            kind,
            representation: Some(representation),
        }
    }
}

/// Everything known about a run of styled text.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StyleAttributes {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub code: bool,
    pub mark: bool,
    pub subscript: bool,
    pub superscript: bool,
    /// Target of the link the run is part of.
    pub link: Option<String>,
    /// Enclosing blocks, outermost first.
    pub paragraph: Vec<ParagraphProperty>,
    pub representations: BTreeMap<StyleKey, StyleRepresentation>,
    /// Elements wrapping the run that carry no style of their own, such as
    /// `<span class="x">` or unknown tags, outermost first.
    pub unsupported_html: Vec<ElementRepresentation>,
    /// Set on the object replacement character of an attachment.
    pub attachment: Option<Attachment>,
}

impl StyleAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the style behind `key` is on. The horizontal rule key is on
    /// when a representation is stored.
    pub fn is_set(&self, key: StyleKey) -> bool {
        match key {
            StyleKey::Bold => self.bold,
            StyleKey::Italic | StyleKey::Cite => self.italic,
            StyleKey::Underline => self.underline,
            StyleKey::Strikethrough => self.strikethrough,
            StyleKey::Code => self.code,
            StyleKey::Mark => self.mark,
            StyleKey::Subscript => self.subscript,
            StyleKey::Superscript => self.superscript,
            StyleKey::Link => self.link.is_some(),
            StyleKey::HorizontalRule => self.representations.contains_key(&key),
        }
    }

    /// Switch a flag style on or off. Turning a style off forgets how it
    /// was spelled; turning the link off clears its target.
    pub fn set(&mut self, key: StyleKey, on: bool) {
        let flag = match key {
            StyleKey::Bold => &mut self.bold,
            StyleKey::Italic | StyleKey::Cite => &mut self.italic,
            StyleKey::Underline => &mut self.underline,
            StyleKey::Strikethrough => &mut self.strikethrough,
            StyleKey::Code => &mut self.code,
            StyleKey::Mark => &mut self.mark,
            StyleKey::Subscript => &mut self.subscript,
            StyleKey::Superscript => &mut self.superscript,
            StyleKey::Link => {
                if !on {
                    self.link = None;
                    self.representations.remove(&key);
                }
                return;
            }
            StyleKey::HorizontalRule => return,
        };
        *flag = on;
        if !on {
            if matches!(key, StyleKey::Italic | StyleKey::Cite) {
                self.representations.remove(&StyleKey::Italic);
                self.representations.remove(&StyleKey::Cite);
            } else {
                self.representations.remove(&key);
            }
        }
    }

    pub fn representation(&self, key: StyleKey) -> Option<&StyleRepresentation> {
        self.representations.get(&key)
    }

    /// The stored element for `key`, if the style was spelled as one.
    pub fn element_representation(
        &self,
        key: StyleKey,
    ) -> Option<&ElementRepresentation> {
        self.representation(key).and_then(StyleRepresentation::as_element)
    }

    pub fn set_representation(
        &mut self,
        key: StyleKey,
        representation: StyleRepresentation,
    ) {
        self.representations.insert(key, representation);
    }

    pub fn push_paragraph_property(&mut self, property: ParagraphProperty) {
        self.paragraph.push(property);
    }

    pub fn has_paragraph_kind(&self, kind: ParagraphKind) -> bool {
        self.paragraph.iter().any(|p| p.kind == kind)
    }

    pub fn header_level(&self) -> Option<u8> {
        self.paragraph.iter().rev().find_map(|p| match p.kind {
            ParagraphKind::Header(level) => Some(level),
            _ => None,
        })
    }

    /// How deeply nested the run is in lists.
    pub fn list_depth(&self) -> usize {
        self.paragraph
            .iter()
            .filter(|p| matches!(p.kind, ParagraphKind::List(_)))
            .count()
    }

    pub fn is_in_pre(&self) -> bool {
        self.has_paragraph_kind(ParagraphKind::Pre)
    }

    /// The same paragraph properties without any character level styling.
    pub fn paragraph_only(&self) -> Self {
        Self {
            paragraph: self.paragraph.clone(),
            ..Self::default()
        }
    }
}
