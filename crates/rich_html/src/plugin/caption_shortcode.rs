// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{
    is_gutenberg_content, HtmlElement, HtmlElementProcessor, Plugin, Shortcode,
    ShortcodeAttributeSerializer, ShortcodeProcessor, TextProcessor,
};
use crate::dom::{
    Attribute, ElementNode, HtmlParser, HtmlSerializer, Node,
    StandardElementType,
};

const CAPTION_TAG: &str = "caption";

/// Turns `[caption]` shortcodes into `<figure><img><figcaption>` on the way
/// in, and captioned figures back into shortcodes on the way out.
///
/// Block editor content is left alone: captions there are real figures.
pub struct CaptionShortcodePlugin {
    input: ShortcodeProcessor,
    output: HtmlElementProcessor,
}

impl Default for CaptionShortcodePlugin {
    fn default() -> Self {
        Self {
            input: ShortcodeProcessor::new(CAPTION_TAG, caption_to_figure),
            output: HtmlElementProcessor::new("figure", figure_to_caption),
        }
    }
}

impl Plugin for CaptionShortcodePlugin {
    fn identifier(&self) -> &str {
        "caption-shortcode"
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
}

fn is_caption_core(node: &Node) -> bool {
    node.as_element().map_or(false, |e| {
        e.is_node_type(StandardElementType::Img)
            || e.is_node_type(StandardElementType::A)
    })
}

/// The image (or the link around it) and the caption text after it. Both
/// must be there.
fn caption_to_figure(shortcode: &Shortcode) -> Option<String> {
    let content = shortcode.content.as_deref()?;
    let mut children = HtmlParser::new().parse(content).ok()?.into_children();
    if children.len() < 2 {
        return None;
    }
    let core = children.iter().position(is_caption_core)?;
    let core = children.remove(core);
    let figcaption =
        ElementNode::from_type(StandardElementType::Figcaption).with_children(children);
    let figure = ElementNode::with_attributes(
        StandardElementType::Figure.name(),
        shortcode.attributes.clone(),
    )
    .with_children(vec![core, figcaption.into()]);
    Some(HtmlSerializer::new(false).serialize_element(&figure))
}

/// Set `name` to `value`, keeping its place if it is already there.
fn set(attributes: &mut Vec<Attribute>, name: &str, value: &str) {
    match attributes.iter_mut().find(|a| a.is_named(name)) {
        Some(attribute) => attribute.value = value.into(),
        None => attributes.push(Attribute::new(name, value)),
    }
}

/// Shortcode attributes taken from the image: `wp-image-N` gives the id,
/// an `align*` class the alignment, and other attributes but `src` are
/// copied as they are.
fn image_attributes(img: &ElementNode, attributes: &mut Vec<Attribute>) {
    for attribute in img.attributes() {
        let Some(value) = attribute.value.to_string_value() else {
            continue;
        };
        if attribute.is_named("src") {
            continue;
        }
        if !attribute.is_named("class") {
            set(attributes, &attribute.name, &value);
            continue;
        }
        for class in value.split_whitespace() {
            if let Some(id) = class.strip_prefix("wp-image-") {
                set(attributes, "id", &format!("attachment_{id}"));
            } else if class.starts_with("align") {
                set(attributes, "align", class);
            }
        }
    }
}

fn figure_to_caption(element: &HtmlElement) -> Option<String> {
    let content = element.content.as_deref()?;
    let root = HtmlParser::new().parse(content).ok()?;
    let core = root.children().iter().find(|n| is_caption_core(n))?;
    let figcaption = root.children().iter().find_map(|n| {
        n.as_element()
            .filter(|e| e.is_node_type(StandardElementType::Figcaption))
    })?;

    let mut attributes = element.attributes.named.clone();
    attributes.extend(element.attributes.unnamed.iter().map(Attribute::bare));
    let img = core.as_element().and_then(|e| {
        if e.is_node_type(StandardElementType::Img) {
            Some(e)
        } else {
            e.children().iter().filter_map(Node::as_element).find(|c| {
                c.is_node_type(StandardElementType::Img)
            })
        }
    });
    if let Some(img) = img {
        image_attributes(img, &mut attributes);
    }
    if !attributes.iter().any(|a| a.is_named("id")) {
        attributes.insert(0, Attribute::new("id", ""));
    }

    let serializer = HtmlSerializer::new(false);
    let mut html = format!(
        "[{CAPTION_TAG} {}]",
        ShortcodeAttributeSerializer::serialize_all(&attributes)
    );
    html.push_str(&serializer.serialize_node(core));
    for child in figcaption.children() {
        html.push_str(&serializer.serialize_node(child));
    }
    html.push_str(&format!("[/{CAPTION_TAG}]"));
    Some(html)
}
