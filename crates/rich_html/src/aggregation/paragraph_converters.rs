// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::{ElementNode, StandardElementType};
use crate::styled_text::{ElementRepresentation, ParagraphKind, ParagraphProperty};

/// Builds the block element a paragraph property stands for.
pub trait ParagraphToElementConverter {
    /// `None` when the property is not one this converter handles.
    fn convert(&self, property: &ParagraphProperty) -> Option<ElementNode>;
}

pub fn default_paragraph_converters(
) -> Vec<Box<dyn ParagraphToElementConverter>> {
    vec![
        Box::new(StoredParagraphConverter),
        Box::new(DefaultParagraphConverter),
    ]
}

/// The element as it was spelled in the source.
pub struct StoredParagraphConverter;

impl ParagraphToElementConverter for StoredParagraphConverter {
    fn convert(&self, property: &ParagraphProperty) -> Option<ElementNode> {
        property
            .representation
            .as_ref()
            .map(ElementRepresentation::to_element_node)
    }
}

/// The default element of the property's kind. Headers past `<h6>` have
/// none.
pub struct DefaultParagraphConverter;

impl ParagraphToElementConverter for DefaultParagraphConverter {
    fn convert(&self, property: &ParagraphProperty) -> Option<ElementNode> {
        if let ParagraphKind::Header(level) = property.kind {
            StandardElementType::for_header_level(level)?;
        }
        Some(ElementNode::from_type(property.kind.default_element_type()))
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;
    use crate::dom::Attribute;

    fn names(property: &ParagraphProperty) -> Vec<String> {
        default_paragraph_converters()
            .iter()
            .filter_map(|c| c.convert(property))
            .map(|e| e.name().to_owned())
            .collect()
    }

    #[test]
    fn stored_spelling_comes_first() {
        let property = ParagraphProperty::with_representation(
            ParagraphKind::Div,
            ElementRepresentation::new("section", vec![Attribute::new("id", "s")]),
        );
        assert_that!(names(&property))
            .is_equal_to(vec![String::from("section"), String::from("div")]);
    }

    #[test]
    fn deep_headers_have_no_element() {
        assert_that!(names(&ParagraphProperty::new(ParagraphKind::Header(7))))
            .is_empty();
        assert_that!(names(&ParagraphProperty::new(ParagraphKind::Header(6))))
            .is_equal_to(vec![String::from("h6")]);
    }
}
