// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

mod element_node;
mod root_node;

pub use element_node::ElementNode;
pub use root_node::RootNode;

use super::DomHandle;

pub const TEXT_NODE_NAME: &str = "#text";
pub const COMMENT_NODE_NAME: &str = "#comment";

/// A node of an HTML tree. Nodes own their children; the way back up is the
/// [DomHandle] every attached node carries, which is only ever written by
/// the insertion and removal operations of [ElementNode].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(ElementNode),
    Text(TextNode),
    Comment(CommentNode),
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(TextNode::new(text))
    }

    pub fn comment(comment: impl Into<String>) -> Self {
        Self::Comment(CommentNode::new(comment))
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Element(element) => element.name(),
            Self::Text(_) => TEXT_NODE_NAME,
            Self::Comment(_) => COMMENT_NODE_NAME,
        }
    }

    pub fn handle(&self) -> Option<&DomHandle> {
        match self {
            Self::Element(element) => element.handle(),
            Self::Text(text) => text.handle.as_ref(),
            Self::Comment(comment) => comment.handle.as_ref(),
        }
    }

    pub(crate) fn set_handle(&mut self, handle: Option<DomHandle>) {
        match self {
            Self::Element(element) => element.set_handle(handle),
            Self::Text(text) => text.handle = handle,
            Self::Comment(comment) => comment.handle = handle,
        }
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementNode> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextNode> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_block_level(&self) -> bool {
        self.as_element().map_or(false, ElementNode::is_block_level)
    }

    pub fn is_empty_text(&self) -> bool {
        matches!(self, Self::Text(text) if text.text.is_empty())
    }

    /// Length of the node's content: characters for text, one unit for a
    /// comment or a void element.
    pub fn content_len(&self) -> usize {
        match self {
            Self::Element(element) => element.content_len(),
            Self::Text(text) => text.len(),
            Self::Comment(_) => 1,
        }
    }

    /// Plain text of the node, with `<br>` as a newline.
    pub fn raw_text(&self) -> String {
        match self {
            Self::Element(element) => element.raw_text(),
            Self::Text(text) => text.text.clone(),
            Self::Comment(_) => String::new(),
        }
    }
}

impl From<ElementNode> for Node {
    fn from(element: ElementNode) -> Self {
        Self::Element(element)
    }
}

impl From<TextNode> for Node {
    fn from(text: TextNode) -> Self {
        Self::Text(text)
    }
}

impl From<CommentNode> for Node {
    fn from(comment: CommentNode) -> Self {
        Self::Comment(comment)
    }
}

#[derive(Clone, Debug, Default)]
pub struct TextNode {
    pub text: String,
    handle: Option<DomHandle>,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            handle: None,
        }
    }

    pub fn handle(&self) -> Option<&DomHandle> {
        self.handle.as_ref()
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whitespace that only exists because of how the source was laid out,
    /// e.g. the newline and indentation between two `<li>`.
    pub fn is_layout_whitespace(&self) -> bool {
        self.text.contains('\n') && self.text.trim().is_empty()
    }
}

impl PartialEq for TextNode {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for TextNode {}

/// An HTML comment, kept verbatim.
#[derive(Clone, Debug, Default)]
pub struct CommentNode {
    pub comment: String,
    handle: Option<DomHandle>,
}

impl CommentNode {
    pub fn new(comment: impl Into<String>) -> Self {
        Self {
            comment: comment.into(),
            handle: None,
        }
    }

    pub fn handle(&self) -> Option<&DomHandle> {
        self.handle.as_ref()
    }
}

impl PartialEq for CommentNode {
    fn eq(&self, other: &Self) -> bool {
        self.comment == other.comment
    }
}

impl Eq for CommentNode {}
