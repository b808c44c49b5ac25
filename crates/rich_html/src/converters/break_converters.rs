// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{ContentSerializer, ElementConverter};
use crate::dom::{ElementNode, StandardElementType};
use crate::styled_text::{
    Attachment, ElementRepresentation, StyleAttributes, StyleKey,
    StyleRepresentation, StyledText, LINE_SEPARATOR,
};

/// `<br>` becomes a line separator: a new line inside the same paragraph.
pub struct BrElementConverter;

impl ElementConverter for BrElementConverter {
    fn can_convert(&self, element: &ElementNode) -> bool {
        element.is_node_type(StandardElementType::Br)
    }

    fn convert(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
        serializer: &dyn ContentSerializer,
    ) -> StyledText {
        let intrinsic = StyledText::styled(
            LINE_SEPARATOR,
            StyleAttributes {
                attachment: None,
                ..inherited.clone()
            },
        );
        serializer.serialize_content(element, Some(intrinsic), inherited, false)
    }
}

/// `<hr>` becomes a line attachment remembering how the rule was spelled.
pub struct HrElementConverter;

impl ElementConverter for HrElementConverter {
    fn can_convert(&self, element: &ElementNode) -> bool {
        element.is_node_type(StandardElementType::Hr)
    }

    fn convert(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
        serializer: &dyn ContentSerializer,
    ) -> StyledText {
        let representation = ElementRepresentation::from_element(element);
        let mut attributes = inherited.clone();
        attributes.set_representation(
            StyleKey::HorizontalRule,
            StyleRepresentation::Element(representation.clone()),
        );
        let intrinsic = StyledText::attachment(
            Attachment::Line {
                representation: Some(representation),
            },
            attributes,
        );
        serializer.serialize_content(element, Some(intrinsic), inherited, false)
    }
}
