// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::ops::Range;

use super::{
    ListKind, ParagraphKind, ParagraphProperty, StyleAttributes, StyleKey,
    StyleRepresentation, StyledText,
};
use crate::dom::{ElementNode, StandardElementType};
use crate::error::ConversionResult;

/// A style that can be switched on and off over a range of styled text.
///
/// Element converters use formatters to turn an element into attributes,
/// and an editing surface uses them to toggle styles from its toolbar.
/// Paragraph formatters always act on whole paragraphs.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Formatter {
    Bold,
    Italic,
    Cite,
    Underline,
    Strikethrough,
    Code,
    Mark,
    Subscript,
    Superscript,
    Link(String),
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

impl Formatter {
    /// The formatter an element stands for, if it stands for a style.
    /// Anchors only do when they have a target.
    pub fn for_element(element: &ElementNode) -> Option<Self> {
        use StandardElementType as T;
        let element_type = element.standard_type()?;
        if let Some(kind) = ParagraphKind::for_element_type(element_type) {
            return Some(Self::for_paragraph_kind(kind));
        }
        Some(match element_type {
            T::B | T::Strong => Self::Bold,
            T::I | T::Em => Self::Italic,
            T::Cite => Self::Cite,
            T::U => Self::Underline,
            T::S | T::Strike | T::Del => Self::Strikethrough,
            T::Code => Self::Code,
            T::Mark => Self::Mark,
            T::Sub => Self::Subscript,
            T::Sup => Self::Superscript,
            T::A => Self::Link(element.string_value("href")?),
            _ => return None,
        })
    }

    pub fn for_paragraph_kind(kind: ParagraphKind) -> Self {
        match kind {
            ParagraphKind::Blockquote => Self::Blockquote,
            ParagraphKind::Div => Self::Div,
            ParagraphKind::Figure => Self::Figure,
            ParagraphKind::Figcaption => Self::Figcaption,
            ParagraphKind::Header(level) => Self::Header(level),
            ParagraphKind::List(list) => Self::List(list),
            ParagraphKind::ListItem => Self::ListItem,
            ParagraphKind::Paragraph => Self::Paragraph,
            ParagraphKind::Pre => Self::Pre,
        }
    }

    pub fn style_key(&self) -> Option<StyleKey> {
        Some(match self {
            Self::Bold => StyleKey::Bold,
            Self::Italic => StyleKey::Italic,
            Self::Cite => StyleKey::Cite,
            Self::Underline => StyleKey::Underline,
            Self::Strikethrough => StyleKey::Strikethrough,
            Self::Code => StyleKey::Code,
            Self::Mark => StyleKey::Mark,
            Self::Subscript => StyleKey::Subscript,
            Self::Superscript => StyleKey::Superscript,
            Self::Link(_) => StyleKey::Link,
            _ => return None,
        })
    }

    pub fn paragraph_kind(&self) -> Option<ParagraphKind> {
        Some(match self {
            Self::Blockquote => ParagraphKind::Blockquote,
            Self::Div => ParagraphKind::Div,
            Self::Figure => ParagraphKind::Figure,
            Self::Figcaption => ParagraphKind::Figcaption,
            Self::Header(level) => ParagraphKind::Header(*level),
            Self::List(list) => ParagraphKind::List(*list),
            Self::ListItem => ParagraphKind::ListItem,
            Self::Paragraph => ParagraphKind::Paragraph,
            Self::Pre => ParagraphKind::Pre,
            _ => return None,
        })
    }

    pub fn is_paragraph_formatter(&self) -> bool {
        self.paragraph_kind().is_some()
    }

    // ─── Attributes ───

    /// Switch the style on, remembering how it was spelled if known.
    pub fn apply_to_attributes(
        &self,
        attributes: &mut StyleAttributes,
        representation: Option<StyleRepresentation>,
    ) {
        if let Some(kind) = self.paragraph_kind() {
            attributes.push_paragraph_property(ParagraphProperty {
                kind,
                representation: representation
                    .as_ref()
                    .and_then(StyleRepresentation::as_element)
                    .cloned(),
            });
            return;
        }
        if let Self::Link(url) = self {
            attributes.link = Some(url.clone());
        }
        if let Some(key) = self.style_key() {
            attributes.set(key, true);
            if let Some(representation) = representation {
                attributes.set_representation(key, representation);
            }
        }
    }

    pub fn remove_from_attributes(&self, attributes: &mut StyleAttributes) {
        if let Some(kind) = self.paragraph_kind() {
            remove_paragraph_kind(attributes, kind);
        } else if let Some(key) = self.style_key() {
            attributes.set(key, false);
        }
    }

    pub fn is_present_in_attributes(&self, attributes: &StyleAttributes) -> bool {
        match self {
            Self::Cite => {
                attributes.italic
                    && attributes.representation(StyleKey::Cite).is_some()
            }
            Self::Link(_) => attributes.link.is_some(),
            _ => match self.paragraph_kind() {
                Some(kind) => attributes.has_paragraph_kind(kind),
                None => self
                    .style_key()
                    .is_some_and(|key| attributes.is_set(key)),
            },
        }
    }

    // ─── Styled text ───

    pub fn apply(
        &self,
        text: &mut StyledText,
        range: Range<usize>,
    ) -> ConversionResult<()> {
        let range = self.effective_range(text, range);
        text.apply(range, |attributes| {
            if !self.is_present_in_attributes(attributes)
                || !self.is_paragraph_formatter()
            {
                self.apply_to_attributes(attributes, None)
            }
        })
    }

    pub fn remove(
        &self,
        text: &mut StyledText,
        range: Range<usize>,
    ) -> ConversionResult<()> {
        let range = self.effective_range(text, range);
        text.apply(range, |attributes| self.remove_from_attributes(attributes))
    }

    /// Whether the whole range carries the style. An empty range looks at
    /// the character before it, where typing would continue.
    pub fn is_present(&self, text: &StyledText, range: Range<usize>) -> bool {
        if range.is_empty() {
            let index = range.start.saturating_sub(1);
            return text
                .attributes_at(index)
                .is_some_and(|a| self.is_present_in_attributes(a));
        }
        let range = self.effective_range(text, range);
        let mut covered = false;
        for (run_range, run) in text.runs_with_ranges() {
            if run_range.end <= range.start || run_range.start >= range.end {
                continue;
            }
            if !self.is_present_in_attributes(&run.attributes) {
                return false;
            }
            covered = true;
        }
        covered
    }

    fn effective_range(&self, text: &StyledText, range: Range<usize>) -> Range<usize> {
        if self.is_paragraph_formatter() {
            text.paragraph_range_around(range)
        } else {
            range
        }
    }
}

/// Remove the innermost property of `kind`. A list takes its own list item
/// with it.
fn remove_paragraph_kind(attributes: &mut StyleAttributes, kind: ParagraphKind) {
    let Some(index) = attributes.paragraph.iter().rposition(|p| p.kind == kind)
    else {
        return;
    };
    attributes.paragraph.remove(index);
    if matches!(kind, ParagraphKind::List(_))
        && attributes
            .paragraph
            .get(index)
            .is_some_and(|p| p.kind == ParagraphKind::ListItem)
    {
        attributes.paragraph.remove(index);
    }
}
