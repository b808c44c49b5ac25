// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{ContentSerializer, ElementConverter};
use crate::dom::{ElementNode, Node, StandardElementType};
use crate::styled_text::{
    Formatter, StyleAttributes, StyleRepresentation, StyledText,
    PARAGRAPH_SEPARATOR,
};

/// Converts `<li>`.
///
/// A list item whose only content is a nested list still needs a line of
/// its own, so it starts with a paragraph separator before the nested list.
pub struct LiElementConverter;

impl ElementConverter for LiElementConverter {
    fn can_convert(&self, element: &ElementNode) -> bool {
        element.is_node_type(StandardElementType::Li)
    }

    fn convert(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
        serializer: &dyn ContentSerializer,
    ) -> StyledText {
        let mut attributes = inherited.clone();
        Formatter::ListItem.apply_to_attributes(
            &mut attributes,
            Some(StyleRepresentation::element(element)),
        );

        let before_children =
            !has_text_outside_lists(element) && has_nested_list(element);
        let intrinsic = before_children
            .then(|| StyledText::styled(PARAGRAPH_SEPARATOR, attributes.clone()));

        serializer.serialize_content(
            element,
            intrinsic,
            &attributes,
            before_children,
        )
    }
}

fn is_list(element: &ElementNode) -> bool {
    element.is_node_type(StandardElementType::Ol)
        || element.is_node_type(StandardElementType::Ul)
}

fn has_text_outside_lists(element: &ElementNode) -> bool {
    element.children().iter().any(|child| match child {
        Node::Text(text) => !text.text.trim().is_empty(),
        Node::Element(child) => {
            !is_list(child) && has_text_outside_lists(child)
        }
        Node::Comment(_) => false,
    })
}

fn has_nested_list(element: &ElementNode) -> bool {
    element
        .children()
        .iter()
        .filter_map(Node::as_element)
        .any(is_list)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::HtmlParser;

    fn first_li(html: &str) -> ElementNode {
        let root = HtmlParser::new().parse(html).unwrap();
        root.children()[0].as_element().unwrap().children()[0]
            .as_element()
            .unwrap()
            .clone()
    }

    #[test]
    fn text_in_nested_elements_counts() {
        let li = first_li("<ul><li><b>x</b><ul><li>y</li></ul></li></ul>");
        assert!(has_text_outside_lists(&li));
        assert!(has_nested_list(&li));
    }

    #[test]
    fn text_inside_nested_lists_does_not_count() {
        let li = first_li("<ul><li> <ol><li>y</li></ol></li></ul>");
        assert!(!has_text_outside_lists(&li));
        assert!(has_nested_list(&li));
    }
}
