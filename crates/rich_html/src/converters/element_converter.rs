// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::{ElementNode, Node};
use crate::styled_text::{StyleAttributes, StyledText};

/// Serializes the content of an element on behalf of an [ElementConverter].
///
/// Implementations must not modify the tree they walk: a converter may call
/// back as many times as it likes and get the same answer.
pub trait ContentSerializer {
    /// Serialize `element` with `attributes` flowing down to its children.
    ///
    /// With an `intrinsic` representation and `intrinsic_before_children`
    /// unset, the representation replaces the children entirely. With it
    /// set, the representation comes first and the children follow.
    /// Paragraph separators are appended where the element ends a
    /// paragraph.
    fn serialize_content(
        &self,
        element: &ElementNode,
        intrinsic: Option<StyledText>,
        attributes: &StyleAttributes,
        intrinsic_before_children: bool,
    ) -> StyledText;

    /// Serialize nodes that are not part of the tree being walked, as if
    /// they were the whole document. Used for image captions.
    fn serialize_fragment(
        &self,
        nodes: &[Node],
        attributes: &StyleAttributes,
    ) -> StyledText;
}

/// Converts one kind of element into styled text.
///
/// Converters are tried in order and the first whose `can_convert` accepts
/// an element handles it. Attachment-producing converters return a single
/// object replacement character carrying the attachment.
pub trait ElementConverter {
    fn can_convert(&self, element: &ElementNode) -> bool;

    fn convert(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
        serializer: &dyn ContentSerializer,
    ) -> StyledText;
}
