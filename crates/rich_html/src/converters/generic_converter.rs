// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{
    AttributeConverter, ContentSerializer, ElementConverter,
    PipelineAttributeConverter,
};
use crate::dom::{ElementNode, HtmlSerializer, StandardElementType};
use crate::styled_text::{
    Attachment, ElementRepresentation, Formatter, StyleAttributes,
    StyleRepresentation, StyledText,
};

/// Handles any element no dedicated converter took.
///
/// Elements with a [Formatter] apply it, remembering how they were spelled.
/// Other elements the editor can host, and unknown elements with content,
/// are recorded in `unsupported_html` so they can be written back around
/// their text. Anything else is packed whole into an HTML attachment, so
/// nothing is ever lost.
#[derive(Default)]
pub struct GenericElementConverter {
    attribute_converter: PipelineAttributeConverter,
}

impl GenericElementConverter {
    pub fn new(attribute_converter: PipelineAttributeConverter) -> Self {
        Self {
            attribute_converter,
        }
    }

    fn is_hosted(element: &ElementNode) -> bool {
        match element.standard_type() {
            Some(element_type) => element_type.is_supported_by_editor(),
            None => !element.children().is_empty(),
        }
    }

    fn child_attributes(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
    ) -> StyleAttributes {
        if element.is_node_type(StandardElementType::Root) {
            return inherited.clone();
        }
        let mut attributes = inherited.clone();
        let representation = ElementRepresentation::from_element(element);
        match Formatter::for_element(element) {
            Some(formatter) => formatter.apply_to_attributes(
                &mut attributes,
                Some(StyleRepresentation::Element(representation)),
            ),
            None => attributes.unsupported_html.push(representation),
        }
        self.attribute_converter
            .convert_all(element.attributes(), attributes)
    }

    fn convert_unsupported(
        element: &ElementNode,
        inherited: &StyleAttributes,
        serializer: &dyn ContentSerializer,
    ) -> StyledText {
        log::trace!("keeping <{}> as raw HTML", element.name());
        let attachment = Attachment::Html {
            root_tag_name: element.name().to_owned(),
            raw_html: HtmlSerializer::new(false).serialize_element(element),
        };
        let intrinsic = StyledText::attachment(attachment, inherited.clone());
        serializer.serialize_content(element, Some(intrinsic), inherited, false)
    }
}

impl ElementConverter for GenericElementConverter {
    fn can_convert(&self, _element: &ElementNode) -> bool {
        true
    }

    fn convert(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
        serializer: &dyn ContentSerializer,
    ) -> StyledText {
        if !Self::is_hosted(element) {
            return Self::convert_unsupported(element, inherited, serializer);
        }
        let attributes = self.child_attributes(element, inherited);
        serializer.serialize_content(element, None, &attributes, false)
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;
    use crate::dom::{Attribute, HtmlParser};
    use crate::styled_text::{ParagraphKind, StyleKey};

    fn convert(html: &str) -> StyledText {
        let root = HtmlParser::new().parse(html).unwrap();
        let converters: Vec<Box<dyn ElementConverter>> =
            vec![Box::new(GenericElementConverter::default())];
        crate::converters::StyledTextSerializer::new(&root, &converters)
            .serialize()
    }

    #[test]
    fn equivalent_tags_share_a_formatter() {
        for html in ["<b>x</b>", "<strong>x</strong>"] {
            assert_that!(convert(html).attributes_at(0).unwrap().bold)
                .is_true();
        }
    }

    #[test]
    fn anchors_keep_their_attributes() {
        let text = convert(r#"<a href="https://a.org" rel="nofollow">x</a>"#);
        let attributes = text.attributes_at(0).unwrap();
        assert_that!(attributes.link.clone())
            .is_equal_to(Some(String::from("https://a.org")));
        assert_that!(attributes
            .element_representation(StyleKey::Link)
            .map(|r| r.attributes.clone()))
        .is_equal_to(Some(vec![
            Attribute::new("href", "https://a.org"),
            Attribute::new("rel", "nofollow"),
        ]));
    }

    #[test]
    fn anchors_without_target_are_unsupported_html() {
        let text = convert(r#"<a name="top">x</a>"#);
        let attributes = text.attributes_at(0).unwrap();
        assert_that!(attributes.link).is_none();
        assert_that!(attributes.unsupported_html.len()).is_equal_to(1);
    }

    #[test]
    fn paragraph_representation_is_stored() {
        let text = convert(r#"<blockquote class="q">x</blockquote>"#);
        let property = &text.attributes_at(0).unwrap().paragraph[0];
        assert_that!(property.kind).is_equal_to(ParagraphKind::Blockquote);
        assert_that!(property.representation.clone().unwrap().attributes)
            .is_equal_to(vec![Attribute::new("class", "q")]);
    }

    #[test]
    fn empty_unknown_elements_are_raw_html() {
        let text = convert("something <something>");
        assert_that!(text.text()).is_equal_to(String::from("something \u{FFFC}"));
        assert_that!(text.attributes_at(10).unwrap().attachment.clone())
            .is_equal_to(Some(Attachment::Html {
                root_tag_name: String::from("something"),
                raw_html: String::from("<something></something>"),
            }));
    }

    #[test]
    fn unknown_elements_with_content_wrap_it() {
        let text = convert("<custom>x</custom>");
        assert_that!(text.text()).is_equal_to(String::from("x"));
        assert_that!(text.attributes_at(0).unwrap().unsupported_html[0]
            .name
            .as_str())
        .is_equal_to("custom");
    }
}
