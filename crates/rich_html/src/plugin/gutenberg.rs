// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Block editor content: HTML split in blocks by comments such as
//! `<!-- wp:paragraph -->` and `<!-- /wp:paragraph -->`.

use std::collections::VecDeque;

use super::{Plugin, TreeProcessor};
use crate::converters::{ContentSerializer, ElementConverter};
use crate::dom::{Attribute, ElementNode, Node, RootNode, StandardElementType};
use crate::styled_text::{
    Attachment, CustomAttachment, StyleAttributes, StyledText,
};

pub const BLOCK_OPENER_ATTRIBUTE: &str = "data-gutenblock-opener";
pub const BLOCK_CLOSER_ATTRIBUTE: &str = "data-gutenblock-closer";
/// Numbers the blocks of a document, so that two neighbouring blocks with
/// the same comments are never merged into one.
pub const BLOCK_ID_ATTRIBUTE: &str = "data-gutenblock-id";
pub const GUTENPACK: &str = "gutenpack";
pub const GUTENPACK_ATTRIBUTE: &str = "block";

/// Whether `html` was written by the block editor.
pub fn is_gutenberg_content(html: &str) -> bool {
    html.contains("<!-- wp:")
}

/// What a comment says about blocks.
#[derive(Debug, PartialEq, Eq)]
enum BlockComment<'a> {
    Opener(&'a str),
    Closer(&'a str),
    /// A block with no content, e.g. `<!-- wp:spacer /-->`.
    SelfClosing,
}

impl<'a> BlockComment<'a> {
    fn parse(comment: &'a str) -> Option<Self> {
        let comment = comment.trim();
        if let Some(rest) = comment.strip_prefix("/wp:") {
            return Some(Self::Closer(block_name(rest)));
        }
        let rest = comment.strip_prefix("wp:")?;
        if rest.ends_with('/') {
            Some(Self::SelfClosing)
        } else {
            Some(Self::Opener(block_name(rest)))
        }
    }
}

fn block_name(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or_default()
}

fn block_comment(node: &Node) -> Option<BlockComment<'_>> {
    match node {
        Node::Comment(comment) => BlockComment::parse(&comment.comment),
        _ => None,
    }
}

/// Wraps the content between a block's opening and closing comments in a
/// `<div>` carrying both comments, so the block travels through styled text
/// as a paragraph property. Blocks with no content become `<gutenpack>`
/// elements, read as attachments.
///
/// An opening comment without its closing one is left alone.
#[derive(Default)]
pub struct GutenbergInputTreeProcessor;

impl GutenbergInputTreeProcessor {
    fn wrap(nodes: Vec<Node>, next_id: &mut usize) -> Vec<Node> {
        let mut pending = VecDeque::from(nodes);
        let mut output = Vec::with_capacity(pending.len());
        while let Some(node) = pending.pop_front() {
            match block_comment(&node) {
                Some(BlockComment::Opener(name)) => {
                    let Some(end) = Self::closer_position(&pending, name) else {
                        log::debug!("block {name} is never closed");
                        output.push(node);
                        continue;
                    };
                    let inner: Vec<Node> = pending.drain(..end).collect();
                    let closer = pending.pop_front();
                    output.push(Self::block(&node, closer.as_ref(), inner, next_id));
                }
                Some(BlockComment::SelfClosing) => {
                    let mut gutenpack = ElementNode::new(GUTENPACK);
                    if let Node::Comment(comment) = &node {
                        gutenpack
                            .set_attribute(GUTENPACK_ATTRIBUTE, comment.comment.as_str());
                    }
                    output.push(gutenpack.into());
                }
                _ => output.push(Self::descend(node, next_id)),
            }
        }
        output
    }

    fn descend(node: Node, next_id: &mut usize) -> Node {
        match node {
            Node::Element(mut element) => {
                let children = Self::wrap(element.take_children(), next_id);
                element.set_children(children);
                element.into()
            }
            other => other,
        }
    }

    /// Index of the comment closing the block `name`, skipping blocks of
    /// the same name nested at the same level.
    fn closer_position(nodes: &VecDeque<Node>, name: &str) -> Option<usize> {
        let mut depth = 0usize;
        for (index, node) in nodes.iter().enumerate() {
            match block_comment(node) {
                Some(BlockComment::Opener(n)) if n == name => depth += 1,
                Some(BlockComment::Closer(n)) if n == name => {
                    if depth == 0 {
                        return Some(index);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
        None
    }

    fn block(
        opener: &Node,
        closer: Option<&Node>,
        inner: Vec<Node>,
        next_id: &mut usize,
    ) -> Node {
        let comment_text = |node: Option<&Node>| match node {
            Some(Node::Comment(comment)) => comment.comment.clone(),
            _ => String::new(),
        };
        let id = *next_id;
        *next_id += 1;
        let children = Self::wrap(inner, next_id);
        ElementNode::with_attributes(
            StandardElementType::Div.name(),
            vec![
                Attribute::new(BLOCK_OPENER_ATTRIBUTE, comment_text(Some(opener))),
                Attribute::new(BLOCK_CLOSER_ATTRIBUTE, comment_text(closer)),
                Attribute::new(BLOCK_ID_ATTRIBUTE, id.to_string()),
            ],
        )
        .with_children(children)
        .into()
    }
}

impl TreeProcessor for GutenbergInputTreeProcessor {
    fn process(&self, root: &mut RootNode) {
        let mut next_id = 0;
        let children = Self::wrap(root.take_children(), &mut next_id);
        root.set_children(children);
    }
}

/// Nodes written back, with a new line after each block that has
/// something after it.
#[derive(Default)]
struct BlockOutput {
    nodes: Vec<Node>,
    newline_pending: bool,
}

impl BlockOutput {
    fn push(&mut self, node: Node) {
        if std::mem::take(&mut self.newline_pending) {
            self.nodes.push(Node::text("\n"));
        }
        self.nodes.push(node);
    }

    fn end_block(&mut self) {
        self.newline_pending = true;
    }
}

/// Turns the block `<div>`s and `<gutenpack>`s back into comments. A
/// `<p>` the writer put around a `<gutenpack>` is split around it.
#[derive(Default)]
pub struct GutenbergOutputTreeProcessor;

impl GutenbergOutputTreeProcessor {
    fn unwrap(nodes: Vec<Node>) -> Vec<Node> {
        let mut output = BlockOutput::default();
        for node in nodes {
            Self::unwrap_into(node, &mut output);
        }
        output.nodes
    }

    fn unwrap_into(node: Node, output: &mut BlockOutput) {
        let Node::Element(mut element) = node else {
            output.push(node);
            return;
        };
        if let Some(opener) = element.string_value(BLOCK_OPENER_ATTRIBUTE) {
            let closer = element.string_value(BLOCK_CLOSER_ATTRIBUTE);
            output.push(Node::comment(opener));
            for child in Self::unwrap(element.take_children()) {
                output.push(child);
            }
            output.push(Node::comment(closer.unwrap_or_default()));
            output.end_block();
        } else if is_gutenpack(&element) {
            let block = element.string_value(GUTENPACK_ATTRIBUTE);
            output.push(Node::comment(block.unwrap_or_default()));
            output.end_block();
        } else if element.is_node_type(StandardElementType::P)
            && element.children().iter().any(is_gutenpack_node)
        {
            let mut segment = Vec::new();
            for child in element.take_children() {
                if !is_gutenpack_node(&child) {
                    segment.push(child);
                    continue;
                }
                if !segment.is_empty() {
                    output.push(Self::paragraph(&element, std::mem::take(&mut segment)));
                }
                Self::unwrap_into(child, output);
            }
            if !segment.is_empty() {
                output.push(Self::paragraph(&element, segment));
            }
        } else {
            let children = Self::unwrap(element.take_children());
            element.set_children(children);
            output.push(element.into());
        }
    }

    fn paragraph(original: &ElementNode, children: Vec<Node>) -> Node {
        ElementNode::with_attributes(original.name(), original.attributes().to_vec())
            .with_children(Self::unwrap(children))
            .into()
    }
}

impl TreeProcessor for GutenbergOutputTreeProcessor {
    fn process(&self, root: &mut RootNode) {
        let children = Self::unwrap(root.take_children());
        root.set_children(children);
    }
}

fn is_gutenpack(element: &ElementNode) -> bool {
    element.name() == GUTENPACK
}

fn is_gutenpack_node(node: &Node) -> bool {
    node.as_element().map_or(false, is_gutenpack)
}

/// `<gutenpack>` becomes a custom attachment keeping the block comment.
pub struct GutenpackConverter;

impl ElementConverter for GutenpackConverter {
    fn can_convert(&self, element: &ElementNode) -> bool {
        is_gutenpack(element)
    }

    fn convert(
        &self,
        element: &ElementNode,
        inherited: &StyleAttributes,
        serializer: &dyn ContentSerializer,
    ) -> StyledText {
        let attachment = Attachment::Custom(CustomAttachment::new(
            GUTENPACK,
            element.attributes().to_vec(),
        ));
        let intrinsic = StyledText::attachment(attachment, inherited.clone());
        serializer.serialize_content(element, Some(intrinsic), inherited, false)
    }
}

/// Keeps the blocks of block editor content through the editor.
///
/// Gutenpack attachments are written back as `<gutenpack>` elements by the
/// built-in custom attachment converter, then turned into comments here.
#[derive(Default)]
pub struct GutenbergPlugin {
    input: GutenbergInputTreeProcessor,
    output: GutenbergOutputTreeProcessor,
}

impl Plugin for GutenbergPlugin {
    fn identifier(&self) -> &str {
        "gutenberg"
    }

    fn process_input_tree(&self, root: &mut RootNode) {
        self.input.process(root);
    }

    fn process_output_tree(&self, root: &mut RootNode) {
        self.output.process(root);
    }

    fn element_converters(&self) -> Vec<Box<dyn ElementConverter>> {
        vec![Box::new(GutenpackConverter)]
    }
}
