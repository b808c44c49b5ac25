// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::str::FromStr;

use strum_macros::{AsRefStr, EnumString};

use super::{
    is_gutenberg_content, HtmlElement, HtmlElementProcessor, Plugin, Shortcode,
    ShortcodeAttributeSerializer, ShortcodeProcessor, TextProcessor,
};
use crate::aggregation::{AttachmentToElementConverter, StyledTextParser};
use crate::converters::{ContentSerializer, ElementConverter};
use crate::dom::{Attribute, ElementNode, Node};
use crate::styled_text::{
    Attachment, CustomAttachment, StyleAttributes, StyledText,
};

pub const GALLERY: &str = "gallery";

#[derive(AsRefStr, Clone, Copy, Debug, EnumString, Eq, PartialEq)]
#[strum(ascii_case_insensitive)]
pub enum GalleryOrder {
    #[strum(serialize = "asc")]
    Ascending,
    #[strum(serialize = "desc")]
    Descending,
}

#[derive(AsRefStr, Clone, Copy, Debug, EnumString, Eq, PartialEq)]
pub enum GalleryOrderBy {
    #[strum(serialize = "menu_order")]
    Menu,
    #[strum(serialize = "title")]
    Title,
    #[strum(serialize = "post_date")]
    Date,
    #[strum(serialize = "rand")]
    Random,
}

/// The settings of a `[gallery]`, read from the attributes of its
/// attachment.
///
/// Values that do not parse are dropped; attributes the gallery does not
/// know are kept in `extra_attributes`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Gallery {
    pub columns: Option<u32>,
    pub ids: Option<Vec<u64>>,
    pub order: Option<GalleryOrder>,
    pub order_by: Option<GalleryOrderBy>,
    pub extra_attributes: Vec<Attribute>,
}

impl Gallery {
    pub fn from_attributes(attributes: &[Attribute]) -> Self {
        let mut gallery = Self::default();
        for attribute in attributes {
            let value = attribute.value.to_string_value().unwrap_or_default();
            match attribute.name.to_ascii_lowercase().as_str() {
                "columns" => gallery.columns = value.trim().parse().ok(),
                "ids" => {
                    gallery.ids = Some(
                        value
                            .split(',')
                            .filter_map(|id| id.trim().parse().ok())
                            .collect(),
                    )
                }
                "order" => gallery.order = GalleryOrder::from_str(&value).ok(),
                "orderby" => {
                    gallery.order_by = GalleryOrderBy::from_str(&value).ok()
                }
                _ => gallery.extra_attributes.push(attribute.clone()),
            }
        }
        gallery
    }

    /// Known settings first, then the others in their original order.
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attributes = Vec::new();
        if let Some(columns) = self.columns {
            attributes.push(Attribute::new("columns", columns.to_string()));
        }
        if let Some(ids) = &self.ids {
            let ids: Vec<String> = ids.iter().map(u64::to_string).collect();
            attributes.push(Attribute::new("ids", ids.join(",")));
        }
        if let Some(order) = self.order {
            let order: &str = order.as_ref();
            attributes.push(Attribute::new("order", order));
        }
        if let Some(order_by) = self.order_by {
            let order_by: &str = order_by.as_ref();
            attributes.push(Attribute::new("orderby", order_by));
        }
        attributes.extend(self.extra_attributes.iter().cloned());
        attributes
    }

    pub fn to_attachment(&self) -> Attachment {
        Attachment::Custom(CustomAttachment::new(GALLERY, self.attributes()))
    }

    pub fn from_attachment(attachment: &Attachment) -> Option<Self> {
        match attachment {
            Attachment::Custom(custom) if custom.is_kind(GALLERY) => {
                Some(Self::from_attributes(&custom.attributes))
            }
            _ => None,
        }
    }
}

/// `<gallery>` becomes a gallery attachment.
pub struct GalleryElementConverter;

impl ElementConverter for GalleryElementConverter {
    fn can_convert(&self, element: &ElementNode) -> bool {
        element.name() == GALLERY
    }

    fn convert(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
        serializer: &dyn ContentSerializer,
    ) -> StyledText {
        let gallery = Gallery::from_attributes(element.attributes());
        let intrinsic =
            StyledText::attachment(gallery.to_attachment(), inherited.clone());
        serializer.serialize_content(element, Some(intrinsic), inherited, false)
    }
}

/// A gallery attachment becomes a `<gallery>` again.
pub struct GalleryAttachmentConverter;

impl AttachmentToElementConverter for GalleryAttachmentConverter {
    fn convert(
        &self,
        attachment: &Attachment,
        _parser: &StyledTextParser,
    ) -> Option<Vec<Node>> {
        let gallery = Gallery::from_attachment(attachment)?;
        let element = ElementNode::with_attributes(GALLERY, gallery.attributes());
        Some(vec![element.into()])
    }
}

fn shortcode_to_html(shortcode: &Shortcode) -> Option<String> {
    let attributes: Vec<String> = shortcode
        .attributes
        .iter()
        .map(Attribute::to_html)
        .collect();
    let separator = if attributes.is_empty() { "" } else { " " };
    Some(format!("<{GALLERY}{separator}{}></{GALLERY}>", attributes.join(" ")))
}

fn html_to_shortcode(element: &HtmlElement) -> Option<String> {
    let mut parts = vec![GALLERY.to_owned()];
    parts.extend(
        element
            .attributes
            .named
            .iter()
            .map(ShortcodeAttributeSerializer::serialize),
    );
    parts.extend(element.attributes.unnamed.iter().cloned());
    Some(format!("[{}]", parts.join(" ")))
}

/// Reads `[gallery]` shortcodes as gallery attachments and writes them
/// back as shortcodes.
pub struct GalleryShortcodePlugin {
    input: ShortcodeProcessor,
    output: HtmlElementProcessor,
}

impl Default for GalleryShortcodePlugin {
    fn default() -> Self {
        Self {
            input: ShortcodeProcessor::new(GALLERY, shortcode_to_html),
            output: HtmlElementProcessor::new(GALLERY, html_to_shortcode),
        }
    }
}

impl Plugin for GalleryShortcodePlugin {
    fn identifier(&self) -> &str {
        "gallery-shortcode"
    }

    fn process_input_html(&self, html: &str) -> String {
        if is_gutenberg_content(html) {
            return html.to_owned();
        }
        self.input.process(html)
    }

    fn process_output_html(&self, html: &str) -> String {
        if is_gutenberg_content(html) {
            return html.to_owned();
        }
        self.output.process(html)
    }

    fn element_converters(&self) -> Vec<Box<dyn ElementConverter>> {
        vec![Box::new(GalleryElementConverter)]
    }

    fn attachment_converters(
        &self,
    ) -> Vec<Box<dyn AttachmentToElementConverter>> {
        vec![Box::new(GalleryAttachmentConverter)]
    }
}
