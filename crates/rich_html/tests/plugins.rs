// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use rich_html::converters::ContentSerializer;
use rich_html::plugin::{
    Gallery, ShortcodeProcessor, TextPipelineProcessor, TextProcessor,
};
use rich_html::styled_text::{ParagraphKind, ParagraphProperty};
use rich_html::{
    Attachment, Attribute, CaptionShortcodePlugin, ElementConverter,
    ElementNode, ElementToTagConverter, Formatter, GalleryShortcodePlugin,
    GutenbergPlugin, HtmlConverter, ParagraphToElementConverter, Plugin,
    RootNode, StyleAttributes, StyledText, VideoShortcodePlugin,
};
use speculoos::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn roundtrip(converter: &HtmlConverter, html: &str) -> String {
    let text = converter.styled_text(html).unwrap();
    converter.html(&text, false)
}

#[test]
fn videopress_shortcodes_roundtrip() {
    init_logging();
    let converter = HtmlConverter::builder()
        .plugin(VideoShortcodePlugin::default())
        .build()
        .unwrap();
    let text = converter
        .styled_text("[wpvideo OcobLTqC w=640 h=480]")
        .unwrap();
    let Some(Attachment::Video(video)) = &text.attributes_at(0).unwrap().attachment
    else {
        panic!("expected a video attachment");
    };
    assert_that!(video.src.clone())
        .is_equal_to(Some(String::from("videopress://OcobLTqC")));
    assert_that!(converter.html(&text, false))
        .is_equal_to(String::from(r#"[wpvideo OcobLTqC w="640" h="480"]"#));
}

#[test]
fn video_shortcodes_roundtrip() {
    let converter = HtmlConverter::builder()
        .plugin(VideoShortcodePlugin::default())
        .build()
        .unwrap();
    assert_that!(roundtrip(&converter, r#"[video src="a.mp4" poster="p.png"]"#))
        .is_equal_to(String::from(r#"[video src="a.mp4" poster="p.png"]"#));
}

#[test]
fn ordinary_videos_stay_html() {
    let converter = HtmlConverter::builder()
        .plugin(VideoShortcodePlugin::default())
        .build()
        .unwrap();
    let html = r#"<video src="a.mp4"></video>"#;
    assert_that!(roundtrip(&converter, html)).is_equal_to(String::from(html));
}

/// Reads `[gallery]` shortcodes through its own element converter as
/// plain text, and wraps the output in a classed `<b>`.
struct GallerySummaryPlugin {
    input: TextPipelineProcessor,
}

impl Default for GallerySummaryPlugin {
    fn default() -> Self {
        let mut input = TextPipelineProcessor::default();
        input.push(ShortcodeProcessor::new("gallery", |shortcode| {
            let ids = shortcode.value("ids")?;
            Some(format!("<gallery>{ids}</gallery>"))
        }));
        Self { input }
    }
}

struct GalleryConverter;

impl ElementConverter for GalleryConverter {
    fn can_convert(&self, element: &ElementNode) -> bool {
        element.name() == "gallery"
    }

    fn convert(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
        _serializer: &dyn ContentSerializer,
    ) -> StyledText {
        StyledText::styled(format!("Gallery {}", element.raw_text()), inherited.clone())
    }
}

struct ClassedBoldTagConverter;

impl ElementToTagConverter for ClassedBoldTagConverter {
    fn can_convert(&self, element: &ElementNode) -> bool {
        element.name() == "strong"
    }

    fn convert(&self, _element: &ElementNode) -> (String, Option<String>) {
        (String::from("<b class=\"g\">"), Some(String::from("</b>")))
    }
}

impl Plugin for GallerySummaryPlugin {
    fn identifier(&self) -> &str {
        "gallery-summary"
    }

    fn process_input_html(&self, html: &str) -> String {
        self.input.process(html)
    }

    fn process_output_tree(&self, root: &mut RootNode) {
        let children = root.take_children();
        root.append_child(ElementNode::new("strong").with_children(children));
    }

    fn element_converters(&self) -> Vec<Box<dyn ElementConverter>> {
        vec![Box::new(GalleryConverter)]
    }

    fn element_to_tag_converters(&self) -> Vec<Box<dyn ElementToTagConverter>> {
        vec![Box::new(ClassedBoldTagConverter)]
    }
}

#[test]
fn plugin_converters_take_over_both_directions() {
    init_logging();
    let converter = HtmlConverter::builder()
        .plugin(GallerySummaryPlugin::default())
        .build()
        .unwrap();
    let text = converter.styled_text(r#"[gallery ids="1,2"]"#).unwrap();
    assert_that!(text.text()).is_equal_to(String::from("Gallery 1,2"));
    assert_that!(converter.html(&text, false))
        .is_equal_to(String::from(r#"<b class="g">Gallery 1,2</b>"#));
}

#[test]
fn full_documents_are_reported_unsupported() {
    let converter = HtmlConverter::default();
    assert_that!(converter.is_supported("<body><p>pasted</p></body>")).is_false();
    assert_that!(converter.is_supported("<p>typed</p>")).is_true();
}

fn block_editor() -> HtmlConverter {
    HtmlConverter::builder()
        .plugin(GutenbergPlugin::default())
        .build()
        .unwrap()
}

#[test]
fn blocks_roundtrip() {
    init_logging();
    let converter = block_editor();
    let html = "<!-- wp:paragraph --><p>x</p><!-- /wp:paragraph -->";
    assert_that!(roundtrip(&converter, html)).is_equal_to(String::from(html));
}

#[test]
fn neighbouring_blocks_stay_apart() {
    let converter = block_editor();
    let text = converter
        .styled_text(
            "<!-- wp:paragraph --><p>a</p><!-- /wp:paragraph --><!-- wp:paragraph --><p>b</p><!-- /wp:paragraph -->",
        )
        .unwrap();
    assert_that!(text.text()).starts_with("a\nb");
    assert_that!(converter.html(&text, false)).is_equal_to(String::from(
        "<!-- wp:paragraph --><p>a</p><!-- /wp:paragraph -->\n<!-- wp:paragraph --><p>b</p><!-- /wp:paragraph -->",
    ));
}

#[test]
fn empty_blocks_roundtrip_as_attachments() {
    let converter = block_editor();
    let text = converter.styled_text("<!-- wp:latest-posts /-->").unwrap();
    let Some(Attachment::Custom(block)) = &text.attributes_at(0).unwrap().attachment
    else {
        panic!("expected a custom attachment");
    };
    assert_that!(block.value("block"))
        .is_equal_to(Some(String::from(" wp:latest-posts /")));
    assert_that!(converter.html(&text, false))
        .is_equal_to(String::from("<!-- wp:latest-posts /-->"));
}

#[test]
fn captions_roundtrip() {
    let converter = HtmlConverter::builder()
        .plugin(CaptionShortcodePlugin::default())
        .build()
        .unwrap();
    let html = r#"[caption id="attachment_6" align="alignleft" width="300"]<img src="a.png" class="alignleft wp-image-6" width="300">A cat[/caption]"#;
    let text = converter.styled_text(html).unwrap();
    let Some(Attachment::Image(image)) = &text.attributes_at(0).unwrap().attachment
    else {
        panic!("expected an image attachment");
    };
    assert_that!(image.caption.as_ref().map(StyledText::text))
        .is_equal_to(Some(String::from("A cat")));
    assert_that!(converter.html(&text, false)).is_equal_to(String::from(html));
}

#[test]
fn galleries_roundtrip_with_known_settings_first() {
    let converter = HtmlConverter::builder()
        .plugin(GalleryShortcodePlugin::default())
        .build()
        .unwrap();
    let text = converter
        .styled_text(r#"[gallery link="file" ids="4, 5" columns="2"]"#)
        .unwrap();
    let gallery = text
        .attributes_at(0)
        .and_then(|a| a.attachment.as_ref())
        .and_then(Gallery::from_attachment)
        .unwrap();
    assert_that!(gallery.ids.clone()).is_equal_to(Some(vec![4, 5]));
    assert_that!(gallery.columns).is_equal_to(Some(2));
    assert_that!(converter.html(&text, false)).is_equal_to(String::from(
        r#"[gallery columns="2" ids="4,5" link="file"]"#,
    ));
}

/// Writes quotes the way the block editor styles them.
struct QuoteBlockPlugin;

struct QuoteBlockConverter;

impl ParagraphToElementConverter for QuoteBlockConverter {
    fn convert(&self, property: &ParagraphProperty) -> Option<ElementNode> {
        (property.kind == ParagraphKind::Blockquote).then(|| {
            ElementNode::with_attributes(
                "blockquote",
                vec![Attribute::new("class", "wp-block-quote")],
            )
        })
    }
}

impl Plugin for QuoteBlockPlugin {
    fn identifier(&self) -> &str {
        "quote-block"
    }

    fn paragraph_converters(&self) -> Vec<Box<dyn ParagraphToElementConverter>> {
        vec![Box::new(QuoteBlockConverter)]
    }
}

#[test]
fn plugin_paragraph_converters_come_first() {
    let converter = HtmlConverter::builder()
        .plugin(QuoteBlockPlugin)
        .build()
        .unwrap();
    let mut text = converter.styled_text("quote").unwrap();
    Formatter::Blockquote.apply(&mut text, 0..1).unwrap();
    assert_that!(converter.html(&text, false)).is_equal_to(String::from(
        r#"<blockquote class="wp-block-quote">quote</blockquote>"#,
    ));
}
