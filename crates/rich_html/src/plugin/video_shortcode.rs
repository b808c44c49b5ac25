// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use url::Url;

use super::{
    HtmlElement, HtmlElementProcessor, Plugin, Shortcode,
    ShortcodeAttributeSerializer, ShortcodeProcessor, TextPipelineProcessor,
    TextProcessor,
};

pub const VIDEOPRESS_SCHEME: &str = "videopress";
pub const VIDEOPRESS_ATTRIBUTE: &str = "data-wpvideopress";
pub const VIDEO_SHORTCODE_ATTRIBUTE: &str = "data-wpvideoshortcode";
pub const UPLOAD_ID_ATTRIBUTE: &str = "data-wp_upload_id";

/// Turns `[video]` and `[wpvideo]` shortcodes into `<video>` elements on
/// the way in, and back into shortcodes on the way out.
///
/// The elements are marked with a data attribute so that only videos
/// which started as shortcodes are written back as shortcodes.
pub struct VideoShortcodePlugin {
    input: TextPipelineProcessor,
    output: TextPipelineProcessor,
}

impl Default for VideoShortcodePlugin {
    fn default() -> Self {
        let mut input = TextPipelineProcessor::default();
        input.push(ShortcodeProcessor::new("wpvideo", videopress_to_html));
        input.push(ShortcodeProcessor::new("video", video_to_html));
        let mut output = TextPipelineProcessor::default();
        output.push(HtmlElementProcessor::new("video", html_to_shortcode));
        Self { input, output }
    }
}

impl Plugin for VideoShortcodePlugin {
    fn identifier(&self) -> &str {
        "video-shortcode"
    }

    fn process_input_html(&self, html: &str) -> String {
        self.input.process(html)
    }

    fn process_output_html(&self, html: &str) -> String {
        self.output.process(html)
    }
}

fn video_element(attributes: Vec<String>) -> String {
    format!("<video {}></video>", attributes.join(" "))
}

fn videopress_to_html(shortcode: &Shortcode) -> Option<String> {
    let id = shortcode.first_unnamed().unwrap_or_default();
    let mut attributes = vec![
        ShortcodeAttributeSerializer::serialize_pair(
            "src",
            &format!("{VIDEOPRESS_SCHEME}://{id}"),
        ),
        ShortcodeAttributeSerializer::serialize_pair(VIDEOPRESS_ATTRIBUTE, id),
    ];
    for (key, name) in [("w", "width"), ("h", "height")] {
        if let Some(value) = shortcode.value(key) {
            attributes.push(ShortcodeAttributeSerializer::serialize_pair(name, &value));
        }
    }
    if let Some(upload_id) = shortcode.attribute(UPLOAD_ID_ATTRIBUTE) {
        attributes.push(ShortcodeAttributeSerializer::serialize(upload_id));
    }
    Some(video_element(attributes))
}

fn video_to_html(shortcode: &Shortcode) -> Option<String> {
    let mut attributes: Vec<String> = ["src", "poster", UPLOAD_ID_ATTRIBUTE]
        .into_iter()
        .filter_map(|name| shortcode.attribute(name))
        .map(ShortcodeAttributeSerializer::serialize)
        .collect();
    attributes.push(ShortcodeAttributeSerializer::serialize_pair(
        VIDEO_SHORTCODE_ATTRIBUTE,
        "true",
    ));
    Some(video_element(attributes))
}

fn html_to_shortcode(element: &HtmlElement) -> Option<String> {
    let attributes = &element.attributes;
    let (tag, mut parts) = if let Some(id) = attributes.value(VIDEOPRESS_ATTRIBUTE) {
        let mut parts = vec![id];
        for (name, key) in [("width", "w"), ("height", "h")] {
            if let Some(value) = attributes.value(name) {
                parts.push(ShortcodeAttributeSerializer::serialize_pair(key, &value));
            }
        }
        ("wpvideo", parts)
    } else if attributes.has(VIDEO_SHORTCODE_ATTRIBUTE) {
        let mut parts = Vec::new();
        if let Some(src) = attributes.get("src") {
            parts.push(ShortcodeAttributeSerializer::serialize(src));
        }
        if let Some(poster) = attributes.get("poster") {
            if !is_local_file(&poster.value.to_string_value().unwrap_or_default()) {
                parts.push(ShortcodeAttributeSerializer::serialize(poster));
            }
        }
        ("video", parts)
    } else {
        return None;
    };
    if let Some(upload_id) = attributes.get(UPLOAD_ID_ATTRIBUTE) {
        parts.push(ShortcodeAttributeSerializer::serialize(upload_id));
    }
    parts.insert(0, tag.to_owned());
    Some(format!("[{}]", parts.join(" ")))
}

/// Posters still pointing at the device are not worth keeping.
fn is_local_file(url: &str) -> bool {
    Url::parse(url).map_or(false, |url| url.scheme() == "file")
}
