// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::{ElementNode, Node, RootNode};

pub const DEFAULT_INDENTATION: usize = 2;

/// Produces the opening and closing tag text for an element.
///
/// Plugins supply their own implementations to take over how particular
/// elements are written out; the first converter whose `can_convert`
/// accepts an element wins.
pub trait ElementToTagConverter {
    fn can_convert(&self, element: &ElementNode) -> bool;

    /// The opening tag and, unless the element is void, the closing tag.
    fn convert(&self, element: &ElementNode) -> (String, Option<String>);
}

/// Writes `<name attr="value">` and `</name>`, omitting the closing tag for
/// void elements.
#[derive(Clone, Debug, Default)]
pub struct GenericElementToTagConverter;

impl ElementToTagConverter for GenericElementToTagConverter {
    fn can_convert(&self, _element: &ElementNode) -> bool {
        true
    }

    fn convert(&self, element: &ElementNode) -> (String, Option<String>) {
        let mut opening = format!("<{}", element.name());
        for attribute in element.attributes() {
            opening.push(' ');
            opening.push_str(&attribute.to_html());
        }
        opening.push('>');

        let closing = element
            .requires_closing_tag()
            .then(|| format!("</{}>", element.name()));
        (opening, closing)
    }
}

/// Turns a node tree back into HTML text.
///
/// Without pretty printing the output of a parsed, well-formed fragment is
/// byte-identical to its input. With pretty printing, block-level elements
/// start on a new line indented by their depth, and elements containing
/// blocks close on their own line.
pub struct HtmlSerializer<'a> {
    pretty_print: bool,
    indentation: usize,
    tag_converters: &'a [Box<dyn ElementToTagConverter>],
}

impl HtmlSerializer<'static> {
    pub fn new(pretty_print: bool) -> Self {
        Self {
            pretty_print,
            indentation: DEFAULT_INDENTATION,
            tag_converters: &[],
        }
    }
}

impl<'a> HtmlSerializer<'a> {
    pub fn with_indentation(mut self, indentation: usize) -> Self {
        self.indentation = indentation;
        self
    }

    /// Consult `tag_converters`, in order, before the generic converter.
    pub fn with_tag_converters<'b>(
        self,
        tag_converters: &'b [Box<dyn ElementToTagConverter>],
    ) -> HtmlSerializer<'b> {
        HtmlSerializer {
            pretty_print: self.pretty_print,
            indentation: self.indentation,
            tag_converters,
        }
    }

    pub fn serialize(&self, root: &RootNode) -> String {
        let mut out = String::new();
        self.write_children(root.children(), 0, &mut out);
        trim_newlines(out)
    }

    /// Serialize a single node as if it were the only child of a root.
    pub fn serialize_node(&self, node: &Node) -> String {
        let mut out = String::new();
        self.write_node(node, None, 0, &mut out);
        trim_newlines(out)
    }

    pub fn serialize_element(&self, element: &ElementNode) -> String {
        let mut out = String::new();
        self.write_element(element, None, 0, &mut out);
        trim_newlines(out)
    }

    fn write_children(&self, children: &[Node], level: usize, out: &mut String) {
        for (index, child) in children.iter().enumerate() {
            self.write_node(child, children.get(index + 1), level, out);
        }
    }

    fn write_node(
        &self,
        node: &Node,
        right_sibling: Option<&Node>,
        level: usize,
        out: &mut String,
    ) {
        match node {
            Node::Element(element) => {
                self.write_element(element, right_sibling, level, out)
            }
            Node::Text(text) => out.push_str(&escape_text(&text.text)),
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(&comment.comment);
                out.push_str("-->");
            }
        }
    }

    fn write_element(
        &self,
        element: &ElementNode,
        right_sibling: Option<&Node>,
        level: usize,
        out: &mut String,
    ) {
        let (opening, closing) = self.tags_for(element);

        if self.pretty_print && element.is_block_level() {
            out.push_str(&self.line_prefix(level));
        }
        out.push_str(&opening);

        let Some(closing) = closing else {
            return;
        };

        self.write_children(element.children(), level + 1, out);

        if self.pretty_print
            && element.children().iter().any(Node::is_block_level)
        {
            out.push_str(&self.line_prefix(level));
        }
        out.push_str(&closing);

        if self.pretty_print
            && element.is_block_level()
            && right_sibling.is_some_and(|s| !s.is_block_level())
        {
            out.push('\n');
        }
    }

    fn tags_for(&self, element: &ElementNode) -> (String, Option<String>) {
        match self
            .tag_converters
            .iter()
            .find(|converter| converter.can_convert(element))
        {
            Some(converter) => converter.convert(element),
            None => GenericElementToTagConverter.convert(element),
        }
    }

    fn line_prefix(&self, level: usize) -> String {
        format!("\n{}", " ".repeat(level * self.indentation))
    }
}

fn escape_text(text: &str) -> String {
    html_escape::encode_text(text).replace('\u{A0}', "&nbsp;")
}

fn trim_newlines(out: String) -> String {
    let trimmed = out.trim_matches(|c| c == '\n' || c == '\r');
    if trimmed.len() == out.len() {
        out
    } else {
        trimmed.to_owned()
    }
}
