// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

use super::{ElementRepresentation, StyledText};
use crate::dom::Attribute;

/// Non-text content standing in the styled text as a single object
/// replacement character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Attachment {
    Image(ImageAttachment),
    Video(VideoAttachment),
    /// A horizontal rule.
    Line {
        representation: Option<ElementRepresentation>,
    },
    /// An element the editor cannot host, kept as serialized HTML.
    Html {
        root_tag_name: String,
        raw_html: String,
    },
    Comment {
        text: String,
    },
    /// Content only a plugin knows about, written back by the plugin's
    /// attachment converter.
    Custom(CustomAttachment),
}

/// A plugin attachment: its kind and the attributes it was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomAttachment {
    pub kind: String,
    pub attributes: Vec<Attribute>,
}

impl CustomAttachment {
    pub fn new(kind: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            kind: kind.into(),
            attributes,
        }
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind == kind
    }

    pub fn value(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|a| a.is_named(name))
            .and_then(|a| a.value.to_string_value())
    }
}

/// Where the attributes of a media element, and the tokens of its `class`,
/// sat in the source, so the element is rebuilt in the same order even
/// though some of them were lifted into fields.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SourceLayout {
    /// Lowercase attribute names.
    pub attributes: Vec<String>,
    pub classes: Vec<String>,
}

impl SourceLayout {
    pub fn of(attributes: &[Attribute]) -> Self {
        let classes = attributes
            .iter()
            .find(|a| a.is_named("class"))
            .and_then(|a| a.value.to_string_value())
            .map(|c| c.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default();
        Self {
            attributes: attributes
                .iter()
                .map(|a| a.name.to_ascii_lowercase())
                .collect(),
            classes,
        }
    }

    /// Sort `attributes` by where their names sat in the source. Names the
    /// source did not have keep their relative order, after the others.
    pub fn arrange(&self, mut attributes: Vec<Attribute>) -> Vec<Attribute> {
        let mut arranged = Vec::with_capacity(attributes.len());
        for name in &self.attributes {
            if let Some(index) = attributes.iter().position(|a| a.is_named(name)) {
                arranged.push(attributes.remove(index));
            }
        }
        arranged.extend(attributes);
        arranged
    }

    /// Sort class tokens the same way. An alignment or size class takes
    /// the place of the alignment or size class the source had, even if
    /// its value changed.
    pub fn arrange_classes(&self, mut classes: Vec<String>) -> Vec<String> {
        let mut arranged = Vec::with_capacity(classes.len());
        for token in &self.classes {
            let same_slot = |class: &String| {
                class == token
                    || (ImageAlignment::from_str(token).is_ok()
                        && ImageAlignment::from_str(class).is_ok())
                    || (ImageSize::from_str(token).is_ok()
                        && ImageSize::from_str(class).is_ok())
            };
            if let Some(index) = classes.iter().position(same_slot) {
                arranged.push(classes.remove(index));
            }
        }
        arranged.extend(classes);
        arranged
    }
}

#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Display,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
)]
pub enum ImageAlignment {
    #[strum(serialize = "alignnone")]
    None,
    #[strum(serialize = "alignleft")]
    Left,
    #[strum(serialize = "aligncenter")]
    Center,
    #[strum(serialize = "alignright")]
    Right,
}

#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Display,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    PartialEq,
)]
pub enum ImageSize {
    #[strum(serialize = "size-thumbnail")]
    Thumbnail,
    #[strum(serialize = "size-medium")]
    Medium,
    #[strum(serialize = "size-large")]
    Large,
    #[strum(serialize = "size-full")]
    Full,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageAttachment {
    pub src: Option<String>,
    pub alignment: Option<ImageAlignment>,
    pub size: Option<ImageSize>,
    /// Caption of a `<figure>`, as styled text.
    pub caption: Option<StyledText>,
    /// The `<figure>` element wrapping a captioned image.
    pub figure: Option<ElementRepresentation>,
    /// Every other attribute of the `<img>`, in source order.
    pub extra_attributes: Vec<Attribute>,
    pub layout: SourceLayout,
}

impl ImageAttachment {
    /// Build from the attributes of an `<img>`. `src` is lifted out, and so
    /// are the alignment and size classes; other classes stay in
    /// `extra_attributes`.
    pub fn from_attributes(attributes: &[Attribute]) -> Self {
        let mut attachment = Self {
            layout: SourceLayout::of(attributes),
            ..Default::default()
        };
        for attribute in attributes {
            if attribute.is_named("src") {
                attachment.src = attribute.value.to_string_value();
            } else if attribute.is_named("class") {
                let classes =
                    attribute.value.to_string_value().unwrap_or_default();
                let remaining = attachment.lift_classes(&classes);
                if !remaining.is_empty() {
                    attachment
                        .extra_attributes
                        .push(Attribute::new("class", remaining));
                }
            } else {
                attachment.extra_attributes.push(attribute.clone());
            }
        }
        attachment
    }

    fn lift_classes(&mut self, classes: &str) -> String {
        let mut remaining = Vec::new();
        for class in classes.split_whitespace() {
            if let Ok(alignment) = ImageAlignment::from_str(class) {
                self.alignment = Some(alignment);
            } else if let Ok(size) = ImageSize::from_str(class) {
                self.size = Some(size);
            } else {
                remaining.push(class);
            }
        }
        remaining.join(" ")
    }

    /// The `class` value carrying alignment and size, if either is set.
    pub fn class_value(&self) -> Option<String> {
        let classes: Vec<&'static str> = [
            self.alignment.map(<&'static str>::from),
            self.size.map(<&'static str>::from),
        ]
        .into_iter()
        .flatten()
        .collect();
        (!classes.is_empty()).then(|| classes.join(" "))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoSource {
    pub src: Option<String>,
    pub source_type: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VideoAttachment {
    pub src: Option<String>,
    pub poster: Option<String>,
    /// `<source>` children, in order.
    pub sources: Vec<VideoSource>,
    pub extra_attributes: Vec<Attribute>,
    pub layout: SourceLayout,
}

impl VideoAttachment {
    pub fn from_attributes(attributes: &[Attribute]) -> Self {
        let mut attachment = Self {
            layout: SourceLayout::of(attributes),
            ..Default::default()
        };
        for attribute in attributes {
            if attribute.is_named("src") {
                attachment.src = attribute.value.to_string_value();
            } else if attribute.is_named("poster") {
                attachment.poster = attribute.value.to_string_value();
            } else {
                attachment.extra_attributes.push(attribute.clone());
            }
        }
        attachment
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;

    #[test]
    fn image_classes_are_lifted() {
        let image = ImageAttachment::from_attributes(&[
            Attribute::new("src", "a.png"),
            Attribute::new("class", "alignleft wp-image-1 size-full"),
            Attribute::new("alt", ""),
        ]);
        assert_that!(image.src).is_equal_to(Some(String::from("a.png")));
        assert_that!(image.alignment).is_equal_to(Some(ImageAlignment::Left));
        assert_that!(image.size).is_equal_to(Some(ImageSize::Full));
        assert_that!(image.extra_attributes).is_equal_to(vec![
            Attribute::new("class", "wp-image-1"),
            Attribute::new("alt", ""),
        ]);
        assert_that!(image.class_value())
            .is_equal_to(Some(String::from("alignleft size-full")));
    }

    #[test]
    fn fully_lifted_class_leaves_no_attribute() {
        let image = ImageAttachment::from_attributes(&[Attribute::new(
            "class",
            "aligncenter",
        )]);
        assert_that!(image.extra_attributes).is_empty();
        assert_that!(image.class_value())
            .is_equal_to(Some(String::from("aligncenter")));
    }

    #[test]
    fn video_src_and_poster_are_lifted() {
        let video = VideoAttachment::from_attributes(&[
            Attribute::new("src", "v.mp4"),
            Attribute::bare("controls"),
            Attribute::new("poster", "p.png"),
        ]);
        assert_that!(video.src).is_equal_to(Some(String::from("v.mp4")));
        assert_that!(video.poster).is_equal_to(Some(String::from("p.png")));
        assert_that!(video.extra_attributes)
            .is_equal_to(vec![Attribute::bare("controls")]);
    }

    #[test]
    fn layout_restores_source_order() {
        let layout = SourceLayout::of(&[
            Attribute::new("class", "foo alignleft"),
            Attribute::new("src", "a.png"),
        ]);
        let arranged = layout.arrange(vec![
            Attribute::new("src", "a.png"),
            Attribute::new("alt", ""),
            Attribute::new("class", "x"),
        ]);
        let names: Vec<&str> = arranged.iter().map(|a| a.name.as_str()).collect();
        assert_that!(names).is_equal_to(vec!["class", "src", "alt"]);

        let classes = layout.arrange_classes(vec![
            String::from("alignright"),
            String::from("size-full"),
            String::from("foo"),
        ]);
        assert_that!(classes).is_equal_to(vec![
            String::from("foo"),
            String::from("alignright"),
            String::from("size-full"),
        ]);
    }

    #[test]
    fn custom_attachments_expose_their_values() {
        let gallery =
            CustomAttachment::new("gallery", vec![Attribute::new("IDS", "1,2")]);
        assert_that!(gallery.is_kind("gallery")).is_true();
        assert_that!(gallery.value("ids")).is_equal_to(Some(String::from("1,2")));
        assert_that!(gallery.value("columns")).is_none();
    }
}
