// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{ContentSerializer, ElementConverter};
use crate::dom::{ElementNode, Node, StandardElementType};
use crate::styled_text::{
    Attachment, ElementRepresentation, ImageAttachment, StyleAttributes,
    StyledText, VideoAttachment, VideoSource,
};

/// `<img>` becomes an image attachment.
pub struct ImageElementConverter;

impl ElementConverter for ImageElementConverter {
    fn can_convert(&self, element: &ElementNode) -> bool {
        element.is_node_type(StandardElementType::Img)
    }

    fn convert(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
        serializer: &dyn ContentSerializer,
    ) -> StyledText {
        let image = ImageAttachment::from_attributes(element.attributes());
        let intrinsic =
            StyledText::attachment(Attachment::Image(image), inherited.clone());
        serializer.serialize_content(element, Some(intrinsic), inherited, false)
    }
}

/// `<figure>` holding exactly an image and its caption becomes one image
/// attachment carrying the caption as styled text.
pub struct FigureElementConverter;

impl FigureElementConverter {
    /// The `<img>` and `<figcaption>` of a captioned figure, ignoring the
    /// whitespace between them.
    fn parts(element: &ElementNode) -> Option<(&ElementNode, &ElementNode)> {
        let children: Vec<&Node> = element
            .children()
            .iter()
            .filter(|child| {
                !matches!(child, Node::Text(text) if text.text.trim().is_empty())
            })
            .collect();
        let [first, second] = children.as_slice() else {
            return None;
        };
        let (first, second) = (first.as_element()?, second.as_element()?);
        let is = |e: &ElementNode, t| e.is_node_type(t);
        if is(first, StandardElementType::Img)
            && is(second, StandardElementType::Figcaption)
        {
            Some((first, second))
        } else if is(second, StandardElementType::Img)
            && is(first, StandardElementType::Figcaption)
        {
            Some((second, first))
        } else {
            None
        }
    }
}

impl ElementConverter for FigureElementConverter {
    fn can_convert(&self, element: &ElementNode) -> bool {
        element.is_node_type(StandardElementType::Figure)
            && Self::parts(element).is_some()
    }

    fn convert(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
        serializer: &dyn ContentSerializer,
    ) -> StyledText {
        let Some((img, figcaption)) = Self::parts(element) else {
            return serializer.serialize_content(element, None, inherited, false);
        };
        let caption = serializer
            .serialize_fragment(figcaption.children(), &StyleAttributes::new());
        let image = ImageAttachment {
            caption: Some(caption),
            figure: Some(ElementRepresentation::from_element(element)),
            ..ImageAttachment::from_attributes(img.attributes())
        };
        let intrinsic =
            StyledText::attachment(Attachment::Image(image), inherited.clone());
        serializer.serialize_content(element, Some(intrinsic), inherited, false)
    }
}

/// `<video>` becomes a video attachment. Its `<source>` children are kept
/// on the attachment; any other content is dropped.
pub struct VideoElementConverter;

impl VideoElementConverter {
    fn sources(element: &ElementNode, sources: &mut Vec<VideoSource>) {
        for source in element
            .children()
            .iter()
            .filter_map(Node::as_element)
            .filter(|e| e.is_node_type(StandardElementType::Source))
        {
            sources.push(VideoSource {
                src: source.string_value("src"),
                source_type: source.string_value("type"),
            });
            Self::sources(source, sources);
        }
    }
}

impl ElementConverter for VideoElementConverter {
    fn can_convert(&self, element: &ElementNode) -> bool {
        element.is_node_type(StandardElementType::Video)
    }

    fn convert(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
        serializer: &dyn ContentSerializer,
    ) -> StyledText {
        let mut video = VideoAttachment::from_attributes(element.attributes());
        Self::sources(element, &mut video.sources);
        let intrinsic =
            StyledText::attachment(Attachment::Video(video), inherited.clone());
        serializer.serialize_content(element, Some(intrinsic), inherited, false)
    }
}
