// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::css::{
    BoldCssAttributeMatcher, ItalicCssAttributeMatcher,
    StrikethroughCssAttributeMatcher, UnderlineCssAttributeMatcher,
};
use crate::dom::{Attribute, CssAttributeMatcher};
use crate::styled_text::{Formatter, StyleAttributes, StyleRepresentation};

/// Turns an HTML attribute into style attributes.
///
/// A converter that does not recognise the attribute returns `inherited`
/// untouched, which is what makes converters safe to chain.
pub trait AttributeConverter {
    fn convert(
        &self,
        attribute: &Attribute,
        inherited: StyleAttributes,
    ) -> StyleAttributes;

    fn convert_all(
        &self,
        attributes: &[Attribute],
        inherited: StyleAttributes,
    ) -> StyleAttributes {
        attributes
            .iter()
            .fold(inherited, |previous, a| self.convert(a, previous))
    }
}

/// Reads one style out of the declarations of a `style` attribute.
///
/// The declaration is stored as the style's representation unless the style
/// is already on, so `<b style="font-weight: 700">` keeps `<b>` as its
/// spelling.
pub struct CssAttributeConverter {
    matcher: Box<dyn CssAttributeMatcher>,
    formatter: Formatter,
}

impl CssAttributeConverter {
    pub fn new(
        matcher: Box<dyn CssAttributeMatcher>,
        formatter: Formatter,
    ) -> Self {
        Self { matcher, formatter }
    }

    pub fn bold() -> Self {
        Self::new(Box::new(BoldCssAttributeMatcher), Formatter::Bold)
    }

    pub fn italic() -> Self {
        Self::new(Box::new(ItalicCssAttributeMatcher), Formatter::Italic)
    }

    pub fn underline() -> Self {
        Self::new(Box::new(UnderlineCssAttributeMatcher), Formatter::Underline)
    }

    pub fn strikethrough() -> Self {
        Self::new(
            Box::new(StrikethroughCssAttributeMatcher),
            Formatter::Strikethrough,
        )
    }
}

impl AttributeConverter for CssAttributeConverter {
    fn convert(
        &self,
        attribute: &Attribute,
        mut inherited: StyleAttributes,
    ) -> StyleAttributes {
        if self.formatter.is_present_in_attributes(&inherited) {
            return inherited;
        }
        let declaration = attribute
            .css_attributes()
            .into_iter()
            .find(|css| self.matcher.check(css));
        if let Some(css) = declaration {
            self.formatter.apply_to_attributes(
                &mut inherited,
                Some(StyleRepresentation::InlineCss(css)),
            );
        }
        inherited
    }
}

/// Runs converters in sequence, each one seeing the output of the one
/// before.
pub struct PipelineAttributeConverter {
    converters: Vec<Box<dyn AttributeConverter>>,
}

impl PipelineAttributeConverter {
    pub fn new(converters: Vec<Box<dyn AttributeConverter>>) -> Self {
        Self { converters }
    }
}

impl Default for PipelineAttributeConverter {
    /// Bold, italic, underline and strikethrough from inline CSS.
    fn default() -> Self {
        Self::new(vec![
            Box::new(CssAttributeConverter::bold()),
            Box::new(CssAttributeConverter::italic()),
            Box::new(CssAttributeConverter::underline()),
            Box::new(CssAttributeConverter::strikethrough()),
        ])
    }
}

impl AttributeConverter for PipelineAttributeConverter {
    fn convert(
        &self,
        attribute: &Attribute,
        inherited: StyleAttributes,
    ) -> StyleAttributes {
        self.converters
            .iter()
            .fold(inherited, |previous, c| c.convert(attribute, previous))
    }
}
