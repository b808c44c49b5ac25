// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::ops::Range;

use crate::dom::attribute::{same_attribute_set, Attribute, AttributeValue};
use crate::dom::css::CssAttributeMatcher;
use crate::dom::{DomHandle, StandardElementType};
use crate::error::{ConversionError, ConversionResult};

use super::Node;

/// An HTML element with ordered attributes and owned children.
///
/// Equality is structural: name, attributes and children. The handle is
/// positional information and is ignored.
#[derive(Clone, Debug)]
pub struct ElementNode {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
    handle: Option<DomHandle>,
}

impl PartialEq for ElementNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.attributes == other.attributes
            && self.children == other.children
    }
}

impl Eq for ElementNode {}

impl ElementNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            attributes: Vec::new(),
            children: Vec::new(),
            handle: None,
        }
    }

    pub fn with_attributes(
        name: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> Self {
        let mut element = Self::new(name);
        element.attributes = attributes;
        element
    }

    pub fn from_type(element_type: StandardElementType) -> Self {
        Self::new(element_type.name())
    }

    /// Builder-style helper setting the children of a fresh element.
    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.set_children(children);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the element, keeping attributes and children.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into().to_ascii_lowercase();
    }

    pub fn standard_type(&self) -> Option<StandardElementType> {
        StandardElementType::from_name(&self.name)
    }

    pub fn handle(&self) -> Option<&DomHandle> {
        self.handle.as_ref()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.children.get(index)
    }

    pub fn child_element_mut(
        &mut self,
        index: usize,
    ) -> Option<&mut ElementNode> {
        self.children.get_mut(index).and_then(Node::as_element_mut)
    }

    pub fn last_child_element_mut(&mut self) -> Option<&mut ElementNode> {
        self.children.last_mut().and_then(Node::as_element_mut)
    }

    // ─── Classification ───

    pub fn is_node_type(&self, element_type: StandardElementType) -> bool {
        self.standard_type() == Some(element_type)
    }

    /// Whether this element is `element_type` or one of its equivalents,
    /// e.g. `<b>` for [StandardElementType::Strong].
    pub fn is_equivalent_to(&self, element_type: StandardElementType) -> bool {
        self.standard_type()
            .map_or(false, |t| t.is_equivalent_to(element_type))
    }

    pub fn is_block_level(&self) -> bool {
        self.standard_type()
            .map_or(false, |t| t.is_block_level())
    }

    pub fn is_void(&self) -> bool {
        self.standard_type().map_or(false, |t| t.is_void())
    }

    pub fn requires_closing_tag(&self) -> bool {
        !self.is_void()
    }

    pub fn is_supported_by_editor(&self) -> bool {
        self.standard_type()
            .map_or(false, |t| t.is_supported_by_editor())
    }

    /// Whether the children of `other` can be moved into this element when
    /// the two are adjacent, e.g. two consecutive `<ul>`.
    pub fn can_merge_children(
        &self,
        other: &ElementNode,
        block_level_enforced: bool,
    ) -> bool {
        if self.name != other.name
            || !same_attribute_set(&self.attributes, &other.attributes)
        {
            return false;
        }
        match self.standard_type() {
            Some(t) if block_level_enforced => t.is_mergeable_block_level(),
            Some(t) => t.is_mergeable_style(),
            None => false,
        }
    }

    pub fn has_block_level_descendant(&self) -> bool {
        self.children.iter().any(|child| match child {
            Node::Element(element) => {
                element.is_block_level() || element.has_block_level_descendant()
            }
            _ => false,
        })
    }

    // ─── Attributes ───

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is_named(name))
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn string_value(&self, name: &str) -> Option<String> {
        self.attribute(name).and_then(|a| a.value.to_string_value())
    }

    /// Update the attribute in place, or append it if it is missing.
    pub fn set_attribute(
        &mut self,
        name: &str,
        value: impl Into<AttributeValue>,
    ) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.is_named(name)) {
            Some(attribute) => attribute.value = value,
            None => self.attributes.push(Attribute {
                name: name.to_owned(),
                value,
            }),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Attribute> {
        let index = self.attributes.iter().position(|a| a.is_named(name))?;
        Some(self.attributes.remove(index))
    }

    pub fn set_attributes(&mut self, attributes: Vec<Attribute>) {
        self.attributes = attributes;
    }

    pub fn contains_css_attribute(
        &self,
        matcher: &dyn CssAttributeMatcher,
    ) -> bool {
        self.attributes
            .iter()
            .any(|a| a.contains_css_attribute(matcher))
    }

    /// Remove every inline CSS declaration accepted by `matcher`. A `style`
    /// attribute left without declarations is removed too.
    pub fn remove_css_attributes(&mut self, matcher: &dyn CssAttributeMatcher) {
        for attribute in self.attributes.iter_mut() {
            attribute.remove_css_attributes(matcher);
        }
        self.attributes.retain(|a| !a.has_empty_css());
    }

    // ─── Children ───

    pub(crate) fn set_handle(&mut self, handle: Option<DomHandle>) {
        // Descendants of a detached element are all detached already.
        if handle.is_none() && self.handle.is_none() {
            return;
        }
        self.handle = handle;
        self.renumber_children_from(0);
    }

    fn renumber_children_from(&mut self, start: usize) {
        let parent = self.handle.clone();
        for (index, child) in self.children.iter_mut().enumerate().skip(start) {
            child.set_handle(parent.as_ref().map(|h| h.child_handle(index)));
        }
    }

    pub fn append_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
        self.renumber_children_from(self.children.len() - 1);
    }

    pub fn append_children(&mut self, children: impl IntoIterator<Item = Node>) {
        let start = self.children.len();
        self.children.extend(children);
        self.renumber_children_from(start);
    }

    /// Append text, extending the last child if it is a text node.
    pub(crate) fn push_text(&mut self, text: &str) {
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.text.push_str(text);
        } else {
            self.append_child(Node::text(text));
        }
    }

    pub fn insert_child(
        &mut self,
        index: usize,
        child: impl Into<Node>,
    ) -> ConversionResult<()> {
        if index > self.children.len() {
            return Err(ConversionError::invariant(format!(
                "cannot insert child at {index} in <{}> with {} children",
                self.name,
                self.children.len()
            )));
        }
        self.children.insert(index, child.into());
        self.renumber_children_from(index);
        Ok(())
    }

    /// Detach and return a child. The returned node no longer has a handle.
    pub fn remove_child(&mut self, index: usize) -> ConversionResult<Node> {
        if index >= self.children.len() {
            return Err(ConversionError::invariant(format!(
                "cannot remove child {index} of <{}> with {} children",
                self.name,
                self.children.len()
            )));
        }
        let mut removed = self.children.remove(index);
        removed.set_handle(None);
        self.renumber_children_from(index);
        Ok(removed)
    }

    /// Put `child` where the child at `index` was, returning the old child
    /// detached.
    pub fn replace_child(
        &mut self,
        index: usize,
        child: impl Into<Node>,
    ) -> ConversionResult<Node> {
        let removed = self.remove_child(index)?;
        self.insert_child(index, child)?;
        Ok(removed)
    }

    pub fn set_children(&mut self, children: Vec<Node>) {
        for child in self.children.iter_mut() {
            child.set_handle(None);
        }
        self.children = children;
        self.renumber_children_from(0);
    }

    /// Remove all the children, returning them detached.
    pub fn take_children(&mut self) -> Vec<Node> {
        let mut children = std::mem::take(&mut self.children);
        for child in children.iter_mut() {
            child.set_handle(None);
        }
        children
    }

    /// Look a node up by a path relative to this element.
    pub fn descendant(&self, path: &[usize]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let child = self.children.get(*first)?;
        if rest.is_empty() {
            Some(child)
        } else {
            child.as_element()?.descendant(rest)
        }
    }

    pub fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let (first, rest) = path.split_first()?;
        let child = self.children.get_mut(*first)?;
        if rest.is_empty() {
            Some(child)
        } else {
            child.as_element_mut()?.descendant_mut(rest)
        }
    }

    // ─── Text and ranges ───

    pub fn raw_text(&self) -> String {
        if self.is_node_type(StandardElementType::Br) {
            return String::from("\n");
        }
        self.children.iter().map(Node::raw_text).collect()
    }

    /// See [Node::content_len].
    pub fn content_len(&self) -> usize {
        if self.is_void() {
            1
        } else {
            self.children.iter().map(Node::content_len).sum()
        }
    }

    fn check_range(&self, range: &Range<usize>) -> ConversionResult<()> {
        let len = self.content_len();
        if range.start > range.end || range.end > len {
            Err(ConversionError::invariant(format!(
                "range {}..{} is outside <{}> of length {len}",
                range.start, range.end, self.name
            )))
        } else {
            Ok(())
        }
    }

    fn absolute(&self, relative: &[usize]) -> DomHandle {
        self.handle
            .clone()
            .unwrap_or_else(DomHandle::root)
            .join(relative)
    }

    /// The deepest element containing the whole of `range`, measured in
    /// [Node::content_len] units.
    pub fn lowest_element_node_wrapping(
        &self,
        range: Range<usize>,
    ) -> ConversionResult<DomHandle> {
        self.check_range(&range)?;
        let mut path = Vec::new();
        let mut element = self;
        let mut start = range.start;
        'descend: loop {
            let mut offset = 0;
            for (index, child) in element.children.iter().enumerate() {
                let len = child.content_len();
                let end = start + (range.end - range.start);
                if let Node::Element(child_element) = child {
                    if len > 0
                        && !child_element.is_void()
                        && offset <= start
                        && end <= offset + len
                    {
                        path.push(index);
                        start -= offset;
                        element = child_element;
                        continue 'descend;
                    }
                }
                offset += len;
            }
            break;
        }
        Ok(self.absolute(&path))
    }

    /// Every text node touched by `range`, with the part of it covered by
    /// the range in the node's own character offsets.
    pub fn text_nodes_wrapping(
        &self,
        range: Range<usize>,
    ) -> ConversionResult<Vec<(DomHandle, Range<usize>)>> {
        self.check_range(&range)?;
        let mut found = Vec::new();
        let mut offset = 0;
        self.collect_text_nodes_into(
            self,
            &range,
            &mut Vec::new(),
            &mut offset,
            &mut found,
        );
        Ok(found)
    }

    fn collect_text_nodes_into(
        &self,
        owner: &ElementNode,
        range: &Range<usize>,
        path: &mut Vec<usize>,
        offset: &mut usize,
        found: &mut Vec<(DomHandle, Range<usize>)>,
    ) {
        for (index, child) in self.children.iter().enumerate() {
            path.push(index);
            match child {
                Node::Text(text) => {
                    let len = text.len();
                    let node_range = *offset..*offset + len;
                    let start = range.start.max(node_range.start);
                    let end = range.end.min(node_range.end);
                    let touches = if range.is_empty() {
                        found.is_empty()
                            && node_range.start <= range.start
                            && range.start <= node_range.end
                    } else {
                        start < end
                    };
                    if touches {
                        found.push((
                            owner.absolute(path),
                            start - node_range.start..end - node_range.start,
                        ));
                    }
                    *offset += len;
                }
                Node::Element(element) if !element.is_void() => {
                    element.collect_text_nodes_into(
                        owner, range, path, offset, found,
                    );
                }
                other => *offset += other.content_len(),
            }
            path.pop();
        }
    }

    // ─── Invariants ───

    /// Check that every descendant's handle matches its position.
    pub fn check_invariants(&self) -> ConversionResult<()> {
        for (index, child) in self.children.iter().enumerate() {
            let expected = self.handle.as_ref().map(|h| h.child_handle(index));
            if child.handle() != expected.as_ref() {
                return Err(ConversionError::invariant(format!(
                    "child {index} of <{}> has handle {:?}, expected {:?}",
                    self.name,
                    child.handle(),
                    expected
                )));
            }
            if let Node::Element(element) = child {
                if element.name.is_empty() {
                    return Err(ConversionError::invariant(
                        "element without a name",
                    ));
                }
                element.check_invariants()?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;
    use crate::dom::css::BoldCssAttributeMatcher;
    use crate::dom::RootNode;

    fn el(name: &str, children: Vec<Node>) -> Node {
        Node::Element(ElementNode::new(name).with_children(children))
    }

    fn tx(text: &str) -> Node {
        Node::text(text)
    }

    fn sample() -> RootNode {
        // "ab" <b>"cd" <i>"ef"</i></b> <img> "gh"
        RootNode::new(vec![
            tx("ab"),
            el("b", vec![tx("cd"), el("i", vec![tx("ef")])]),
            el("img", vec![]),
            tx("gh"),
        ])
    }

    #[test]
    fn names_are_lowercased() {
        assert_eq!(ElementNode::new("STRONG").name(), "strong");
    }

    #[test]
    fn set_attribute_updates_in_place() {
        let mut a = ElementNode::with_attributes(
            "a",
            vec![Attribute::new("href", "x"), Attribute::new("title", "t")],
        );
        a.set_attribute("href", "y");
        a.set_attribute("rel", "nofollow");
        assert_that!(a.attributes().to_vec()).is_equal_to(vec![
            Attribute::new("href", "y"),
            Attribute::new("title", "t"),
            Attribute::new("rel", "nofollow"),
        ]);
        assert_eq!(a.remove_attribute("title"), Some(Attribute::new("title", "t")));
        assert_eq!(a.remove_attribute("title"), None);
    }

    #[test]
    fn removing_the_last_css_declaration_drops_the_style() {
        let mut span = ElementNode::with_attributes(
            "span",
            vec![
                Attribute::new("style", "font-weight: 700"),
                Attribute::new("class", "c"),
            ],
        );
        assert!(span.contains_css_attribute(&BoldCssAttributeMatcher));
        span.remove_css_attributes(&BoldCssAttributeMatcher);
        assert_that!(span.attributes().to_vec())
            .is_equal_to(vec![Attribute::new("class", "c")]);
    }

    #[test]
    fn equality_is_structural() {
        let mut root = RootNode::new(vec![el("b", vec![tx("x")])]);
        let detached = el("b", vec![tx("x")]);
        assert_eq!(root.children()[0], detached);
        root.append_child(tx("y"));
        assert_ne!(root.children()[0], root.children()[1]);
    }

    #[test]
    fn merging_requires_same_name_attributes_and_mergeable_type() {
        let ul = ElementNode::new("ul");
        let li = ElementNode::new("li");
        let b = ElementNode::new("b");
        let classy_b = ElementNode::with_attributes(
            "b",
            vec![Attribute::new("class", "x")],
        );
        assert!(ul.can_merge_children(&ElementNode::new("ul"), true));
        assert!(!ul.can_merge_children(&li, true));
        assert!(b.can_merge_children(&ElementNode::new("b"), false));
        assert!(!b.can_merge_children(&ElementNode::new("b"), true));
        assert!(!b.can_merge_children(&classy_b, false));
        assert!(!ElementNode::new("table")
            .can_merge_children(&ElementNode::new("table"), true));
    }

    #[test]
    fn inserting_and_removing_keeps_handles_consistent() {
        let mut root = sample();
        root.insert_child(1, tx("new")).unwrap();
        assert_eq!(
            root.children()[2].handle(),
            Some(&DomHandle::from_raw(vec![2]))
        );
        let removed = root.remove_child(2).unwrap();
        assert_eq!(removed.handle(), None);
        if let Node::Element(b) = &removed {
            assert_eq!(b.children()[0].handle(), None);
        }
        assert_eq!(
            root.children()[2].handle(),
            Some(&DomHandle::from_raw(vec![2]))
        );
        root.check_invariants().unwrap();
    }

    #[cfg(not(feature = "assert-invariants"))]
    #[test]
    fn out_of_bounds_child_operations_fail() {
        let mut root = sample();
        assert!(matches!(
            root.insert_child(9, tx("x")),
            Err(ConversionError::InvariantViolation(_))
        ));
        assert!(root.remove_child(4).is_err());
    }

    #[test]
    fn raw_text_renders_line_breaks() {
        let p = el("p", vec![tx("a"), el("br", vec![]), tx("b"), Node::comment("c")]);
        assert_eq!(p.raw_text(), "a\nb");
    }

    #[test]
    fn lowest_element_wrapping_a_range() {
        let root = sample();
        // "cd" is 2..4, "ef" is 4..6
        assert_eq!(
            root.lowest_element_node_wrapping(4..5).unwrap(),
            DomHandle::from_raw(vec![1, 1])
        );
        assert_eq!(
            root.lowest_element_node_wrapping(3..5).unwrap(),
            DomHandle::from_raw(vec![1])
        );
        assert_eq!(
            root.lowest_element_node_wrapping(1..3).unwrap(),
            DomHandle::root()
        );
    }

    #[cfg(not(feature = "assert-invariants"))]
    #[test]
    fn wrapping_an_out_of_bounds_range_is_an_invariant_violation() {
        let root = sample();
        // Total length is 2 + 4 + 1 + 2
        assert!(root.lowest_element_node_wrapping(0..9).is_ok());
        assert!(matches!(
            root.lowest_element_node_wrapping(0..10),
            Err(ConversionError::InvariantViolation(_))
        ));
        #[allow(clippy::reversed_empty_ranges)]
        let reversed = 5..2;
        assert!(root.text_nodes_wrapping(reversed).is_err());
    }

    #[test]
    fn text_nodes_covering_a_range() {
        let root = sample();
        assert_that!(root.text_nodes_wrapping(1..8).unwrap()).is_equal_to(vec![
            (DomHandle::from_raw(vec![0]), 1..2),
            (DomHandle::from_raw(vec![1, 0]), 0..2),
            (DomHandle::from_raw(vec![1, 1, 0]), 0..2),
            (DomHandle::from_raw(vec![3]), 0..1),
        ]);
        assert_that!(root.text_nodes_wrapping(2..2).unwrap())
            .is_equal_to(vec![(DomHandle::from_raw(vec![0]), 2..2)]);
    }
}
