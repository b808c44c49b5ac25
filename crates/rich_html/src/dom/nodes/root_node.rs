// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::ops::{Deref, DerefMut};

use crate::dom::{DomHandle, StandardElementType, ROOT_NAME};

use super::{ElementNode, Node};

/// The synthetic element wrapping a parsed fragment, so that a fragment
/// with several top level siblings is still a single tree. It never appears
/// in serialized HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RootNode(ElementNode);

impl Default for RootNode {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for RootNode {
    type Target = ElementNode;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for RootNode {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl RootNode {
    pub fn new(children: Vec<Node>) -> Self {
        let mut element = ElementNode::new(ROOT_NAME);
        element.set_handle(Some(DomHandle::root()));
        element.set_children(children);
        Self(element)
    }

    pub fn into_children(mut self) -> Vec<Node> {
        self.0.take_children()
    }

    pub fn as_element(&self) -> &ElementNode {
        &self.0
    }

    /// The node at `handle`. The root itself is not a [Node], so the root
    /// handle gives `None`; use [RootNode::element] for it.
    pub fn node(&self, handle: &DomHandle) -> Option<&Node> {
        self.0.descendant(handle.raw())
    }

    pub fn node_mut(&mut self, handle: &DomHandle) -> Option<&mut Node> {
        self.0.descendant_mut(handle.raw())
    }

    pub fn element(&self, handle: &DomHandle) -> Option<&ElementNode> {
        if handle.is_root() {
            Some(&self.0)
        } else {
            self.node(handle).and_then(Node::as_element)
        }
    }

    pub fn element_mut(
        &mut self,
        handle: &DomHandle,
    ) -> Option<&mut ElementNode> {
        if handle.is_root() {
            Some(&mut self.0)
        } else {
            self.node_mut(handle).and_then(Node::as_element_mut)
        }
    }

    pub fn parent(&self, handle: &DomHandle) -> Option<&ElementNode> {
        self.element(&handle.parent_handle()?)
    }

    // ─── Sibling queries ───

    /// Text nodes that carry no content for sibling purposes: empty ones,
    /// and layout whitespace outside of `<pre>`.
    pub fn is_ignorable(&self, handle: &DomHandle) -> bool {
        match self.node(handle) {
            Some(Node::Text(text)) => {
                text.is_empty()
                    || (text.is_layout_whitespace()
                        && !self.is_inside_pre(handle))
            }
            _ => false,
        }
    }

    fn is_inside_pre(&self, handle: &DomHandle) -> bool {
        let mut current = handle.parent_handle();
        while let Some(h) = current {
            if self
                .element(&h)
                .map_or(false, |e| e.is_node_type(StandardElementType::Pre))
            {
                return true;
            }
            current = h.parent_handle();
        }
        false
    }

    /// The next sibling, skipping ignorable text.
    pub fn right_sibling(&self, handle: &DomHandle) -> Option<&Node> {
        let parent = self.parent(handle)?;
        let index = handle.index_in_parent()?;
        let parent_handle = handle.parent_handle()?;
        parent
            .children()
            .iter()
            .enumerate()
            .skip(index + 1)
            .find(|(i, _)| !self.is_ignorable(&parent_handle.child_handle(*i)))
            .map(|(_, node)| node)
    }

    pub fn has_right_block_level_sibling(&self, handle: &DomHandle) -> bool {
        self.right_sibling(handle)
            .map_or(false, Node::is_block_level)
    }

    /// Whether no meaningful sibling follows the node.
    pub fn is_last_in_parent(&self, handle: &DomHandle) -> bool {
        self.right_sibling(handle).is_none()
    }

    /// Whether nothing meaningful follows the node anywhere in the tree.
    pub fn is_last_in_tree(&self, handle: &DomHandle) -> bool {
        match handle.parent_handle() {
            None => true,
            Some(parent) => {
                self.is_last_in_parent(handle) && self.is_last_in_tree(&parent)
            }
        }
    }

    /// Whether the node closes an ancestor after which a paragraph break
    /// happens: it is the last child of a block element, or of an element
    /// followed by a block, at any level.
    pub fn is_last_in_ancestor_ending_in_block_level_separation(
        &self,
        handle: &DomHandle,
    ) -> bool {
        let (Some(parent_handle), Some(parent)) =
            (handle.parent_handle(), self.parent(handle))
        else {
            return false;
        };
        if handle.index_in_parent() != Some(parent.children().len() - 1) {
            return false;
        }
        parent.is_block_level()
            || self.has_right_block_level_sibling(&parent_handle)
            || self.is_last_in_ancestor_ending_in_block_level_separation(
                &parent_handle,
            )
    }

    /// Whether a paragraph separator follows the content of this node when
    /// it is converted to styled text.
    ///
    /// Only leaves carry separators: text, comments and childless elements.
    /// With `include_descendants`, an element is treated as a leaf even if
    /// it has children (used when an element is replaced by an attachment).
    pub fn needs_closing_paragraph_separator(
        &self,
        handle: &DomHandle,
        include_descendants: bool,
    ) -> bool {
        match self.node(handle) {
            None => return false,
            Some(Node::Text(text)) if text.is_empty() => return false,
            Some(Node::Element(element))
                if !include_descendants && !element.children().is_empty() =>
            {
                return false
            }
            Some(_) => {}
        }
        if self.has_right_block_level_sibling(handle) {
            return true;
        }
        !self.is_last_in_tree(handle)
            && self.is_last_in_ancestor_ending_in_block_level_separation(handle)
    }

    // ─── Debug output ───

    /// An indented dump of the tree, one node per line.
    pub fn to_tree_string(&self) -> String {
        let mut out = String::from("\n");
        let count = self.children().len();
        for (index, child) in self.children().iter().enumerate() {
            write_tree(child, "", index + 1 == count, &mut out);
        }
        out
    }
}

fn tree_label(node: &Node) -> String {
    match node {
        Node::Element(element) => {
            let mut label = element.name().to_owned();
            for attribute in element.attributes() {
                label.push(' ');
                label.push_str(&attribute.to_html());
            }
            label
        }
        Node::Text(text) => format!("\"{}\"", text.text),
        Node::Comment(comment) => format!("<!--{}-->", comment.comment),
    }
}

fn write_tree(node: &Node, prefix: &str, is_last: bool, out: &mut String) {
    out.push_str(prefix);
    out.push_str(if is_last { "└>" } else { "├>" });
    out.push_str(&tree_label(node));
    out.push('\n');
    if let Node::Element(element) = node {
        let child_prefix =
            format!("{prefix}{}", if is_last { "  " } else { "│ " });
        let count = element.children().len();
        for (index, child) in element.children().iter().enumerate() {
            write_tree(child, &child_prefix, index + 1 == count, out);
        }
    }
}
