// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::StyledTextParser;
use crate::dom::{
    Attribute, ElementNode, HtmlParser, Node, StandardElementType,
};
use crate::styled_text::{
    Attachment, ElementRepresentation, ImageAttachment, VideoAttachment,
};

/// Rebuilds the nodes an attachment stands for.
pub trait AttachmentToElementConverter {
    /// `None` when the attachment is not of the kind this converter
    /// handles.
    fn convert(
        &self,
        attachment: &Attachment,
        parser: &StyledTextParser,
    ) -> Option<Vec<Node>>;
}

pub fn default_attachment_converters(
) -> Vec<Box<dyn AttachmentToElementConverter>> {
    vec![
        Box::new(ImageAttachmentConverter),
        Box::new(VideoAttachmentConverter),
        Box::new(LineAttachmentConverter),
        Box::new(HtmlAttachmentConverter),
        Box::new(CommentAttachmentConverter),
        Box::new(CustomAttachmentConverter),
    ]
}

/// `<img>`, inside a `<figure>` with its `<figcaption>` when captioned.
///
/// Attributes and classes come back in the order they had in the source.
pub struct ImageAttachmentConverter;

impl ImageAttachmentConverter {
    fn image_element(image: &ImageAttachment) -> ElementNode {
        let mut classes: Vec<String> = image
            .class_value()
            .map(|c| c.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default();
        let mut others = Vec::new();
        for attribute in &image.extra_attributes {
            if !attribute.is_named("class") {
                others.push(attribute.clone());
                continue;
            }
            let extra = attribute.value.to_string_value().unwrap_or_default();
            for class in extra.split_whitespace() {
                if !classes.iter().any(|c| c == class) {
                    classes.push(class.to_owned());
                }
            }
        }

        let mut attributes = Vec::with_capacity(others.len() + 2);
        if let Some(src) = &image.src {
            attributes.push(Attribute::new("src", src.as_str()));
        }
        let classes = image.layout.arrange_classes(classes);
        if !classes.is_empty() {
            attributes.push(Attribute::new("class", classes.join(" ")));
        }
        attributes.extend(others);
        ElementNode::with_attributes(
            StandardElementType::Img.name(),
            image.layout.arrange(attributes),
        )
    }
}

impl AttachmentToElementConverter for ImageAttachmentConverter {
    fn convert(
        &self,
        attachment: &Attachment,
        parser: &StyledTextParser,
    ) -> Option<Vec<Node>> {
        let Attachment::Image(image) = attachment else {
            return None;
        };
        let img = Self::image_element(image);
        let Some(caption) = &image.caption else {
            return Some(vec![img.into()]);
        };
        let figcaption = ElementNode::from_type(StandardElementType::Figcaption)
            .with_children(parser.parse(caption).into_children());
        let figure = image
            .figure
            .as_ref()
            .map(ElementRepresentation::to_element_node)
            .unwrap_or_else(|| {
                ElementNode::from_type(StandardElementType::Figure)
            })
            .with_children(vec![img.into(), figcaption.into()]);
        Some(vec![figure.into()])
    }
}

/// `<video>` with its `<source>` children.
pub struct VideoAttachmentConverter;

impl VideoAttachmentConverter {
    fn video_element(video: &VideoAttachment) -> ElementNode {
        let mut attributes = Vec::with_capacity(video.extra_attributes.len() + 2);
        if let Some(src) = &video.src {
            attributes.push(Attribute::new("src", src.as_str()));
        }
        if let Some(poster) = &video.poster {
            attributes.push(Attribute::new("poster", poster.as_str()));
        }
        attributes.extend(video.extra_attributes.iter().cloned());
        let mut element = ElementNode::with_attributes(
            StandardElementType::Video.name(),
            video.layout.arrange(attributes),
        );
        let sources = video.sources.iter().map(|source| {
            let mut element = ElementNode::from_type(StandardElementType::Source);
            if let Some(src) = &source.src {
                element.set_attribute("src", src.as_str());
            }
            if let Some(source_type) = &source.source_type {
                element.set_attribute("type", source_type.as_str());
            }
            Node::from(element)
        });
        element.append_children(sources.collect::<Vec<_>>());
        element
    }
}

impl AttachmentToElementConverter for VideoAttachmentConverter {
    fn convert(
        &self,
        attachment: &Attachment,
        _parser: &StyledTextParser,
    ) -> Option<Vec<Node>> {
        match attachment {
            Attachment::Video(video) => {
                Some(vec![Self::video_element(video).into()])
            }
            _ => None,
        }
    }
}

/// `<hr>`, as it was spelled.
pub struct LineAttachmentConverter;

impl AttachmentToElementConverter for LineAttachmentConverter {
    fn convert(
        &self,
        attachment: &Attachment,
        _parser: &StyledTextParser,
    ) -> Option<Vec<Node>> {
        let Attachment::Line { representation } = attachment else {
            return None;
        };
        let hr = representation
            .as_ref()
            .map(ElementRepresentation::to_element_node)
            .unwrap_or_else(|| ElementNode::from_type(StandardElementType::Hr));
        Some(vec![hr.into()])
    }
}

/// HTML kept verbatim, parsed back into a tree.
///
/// A single root element is returned as is, several are wrapped in a
/// `<span>`. If nothing can be parsed the raw HTML is kept as text.
pub struct HtmlAttachmentConverter;

impl AttachmentToElementConverter for HtmlAttachmentConverter {
    fn convert(
        &self,
        attachment: &Attachment,
        _parser: &StyledTextParser,
    ) -> Option<Vec<Node>> {
        let Attachment::Html { raw_html, .. } = attachment else {
            return None;
        };
        let mut children = match HtmlParser::new().parse(raw_html) {
            Ok(root) => root.into_children(),
            Err(error) => {
                log::debug!("cannot parse stored HTML back: {error}");
                Vec::new()
            }
        };
        let node = match children.len() {
            0 => Node::text(raw_html.as_str()),
            1 => children.remove(0),
            _ => ElementNode::from_type(StandardElementType::Span)
                .with_children(children)
                .into(),
        };
        Some(vec![node])
    }
}

pub struct CommentAttachmentConverter;

impl AttachmentToElementConverter for CommentAttachmentConverter {
    fn convert(
        &self,
        attachment: &Attachment,
        _parser: &StyledTextParser,
    ) -> Option<Vec<Node>> {
        match attachment {
            Attachment::Comment { text } => Some(vec![Node::comment(text.as_str())]),
            _ => None,
        }
    }
}

/// Plugin attachments no plugin converter took, written as an element
/// named after their kind.
pub struct CustomAttachmentConverter;

impl AttachmentToElementConverter for CustomAttachmentConverter {
    fn convert(
        &self,
        attachment: &Attachment,
        _parser: &StyledTextParser,
    ) -> Option<Vec<Node>> {
        let Attachment::Custom(custom) = attachment else {
            return None;
        };
        log::debug!("no converter for {} attachments, writing an element", custom.kind);
        let element =
            ElementNode::with_attributes(custom.kind.as_str(), custom.attributes.clone());
        Some(vec![element.into()])
    }
}
