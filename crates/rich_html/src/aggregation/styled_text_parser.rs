// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cmp::Reverse;

use super::{
    default_attachment_converters, default_paragraph_converters,
    default_style_aggregators, AttachmentToElementConverter,
    ParagraphToElementConverter, StyleAggregator,
};
use crate::config::ConverterConfig;
use crate::dom::{ElementNode, Node, RootNode, StandardElementType};
use crate::error::ConversionError;
use crate::styled_text::{
    Paragraph, ParagraphKind, ParagraphProperty, StyleAttributes, StyledRun,
    StyledText, LINE_SEPARATOR,
};

/// The elements wrapping one run of a paragraph, outermost first, and the
/// nodes the run itself turns into.
#[derive(Debug)]
struct Branch {
    elements: Vec<ElementNode>,
    leaves: Vec<Node>,
}

/// Builds an HTML tree back from styled text.
///
/// Each paragraph becomes a chain of block elements built from its
/// paragraph properties. Inside it, every run becomes a [Branch] whose
/// elements are produced by folding the [StyleAggregator]s; consecutive
/// branches share the elements they have in common, so one bold stretch
/// split by a link is still a single `<strong>`. Consecutive paragraphs
/// share their common block elements the same way, which is what puts the
/// items of one list back in a single `<ul>`.
///
/// Attachments and paragraph properties are turned into elements by the
/// first converter that accepts them.
pub struct StyledTextParser {
    config: ConverterConfig,
    style_aggregators: Vec<Box<dyn StyleAggregator>>,
    attachment_converters: Vec<Box<dyn AttachmentToElementConverter>>,
    paragraph_converters: Vec<Box<dyn ParagraphToElementConverter>>,
}

impl Default for StyledTextParser {
    fn default() -> Self {
        Self::new(ConverterConfig::default())
    }
}

impl StyledTextParser {
    pub fn new(config: ConverterConfig) -> Self {
        Self::with_converters(config, Vec::new(), Vec::new())
    }

    /// The given converters are tried before the built-in ones.
    pub fn with_converters(
        config: ConverterConfig,
        mut attachment_converters: Vec<Box<dyn AttachmentToElementConverter>>,
        mut paragraph_converters: Vec<Box<dyn ParagraphToElementConverter>>,
    ) -> Self {
        attachment_converters.extend(default_attachment_converters());
        paragraph_converters.extend(default_paragraph_converters());
        Self {
            config,
            style_aggregators: default_style_aggregators(),
            attachment_converters,
            paragraph_converters,
        }
    }

    pub fn parse(&self, text: &StyledText) -> RootNode {
        let paragraphs = text.paragraphs();
        let bare = paragraphs.len() == 1 && !self.config.always_wrap_paragraphs;

        let mut nodes: Vec<Node> = Vec::new();
        for paragraph in &paragraphs {
            let mut children = self.paragraph_nodes(paragraph, bare);
            if merge_paragraph(&mut nodes, &mut children) {
                continue;
            }
            for child in children {
                push_merging_text(&mut nodes, child);
            }
        }
        RootNode::new(nodes)
    }

    fn paragraph_nodes(&self, paragraph: &Paragraph, bare: bool) -> Vec<Node> {
        let attributes = &paragraph.attributes;
        let content = &paragraph.content;
        let leaves = if content.is_empty() {
            reduce(&self.style_elements(attributes), Vec::new())
        } else {
            let in_pre = attributes.is_in_pre();
            let branches = content
                .runs()
                .iter()
                .map(|run| self.branch(run, in_pre))
                .collect();
            process(branches)
        };

        let mut wrappers = self.paragraph_elements(&attributes.paragraph);
        if wrappers.is_empty() {
            if bare || is_lone_block(&leaves) {
                return leaves;
            }
            wrappers.push(ElementNode::from_type(
                self.config.default_paragraph_element,
            ));
        }
        reduce(&wrappers, leaves)
    }

    /// Block elements for paragraph properties, outermost first. A list
    /// with no list item property below it gets a default `<li>`.
    fn paragraph_elements(
        &self,
        properties: &[ParagraphProperty],
    ) -> Vec<ElementNode> {
        let mut elements = Vec::new();
        for (index, property) in properties.iter().enumerate() {
            match self
                .paragraph_converters
                .iter()
                .find_map(|c| c.convert(property))
            {
                Some(element) => elements.push(element),
                None => {
                    log::trace!("no element for {:?}, skipping it", property.kind);
                    continue;
                }
            }
            let item_follows = properties
                .get(index + 1)
                .map_or(false, |next| next.kind == ParagraphKind::ListItem);
            if matches!(property.kind, ParagraphKind::List(_)) && !item_follows {
                elements.push(ElementNode::from_type(StandardElementType::Li));
            }
        }
        elements
    }

    fn style_elements(&self, attributes: &StyleAttributes) -> Vec<ElementNode> {
        self.style_aggregators
            .iter()
            .fold(Vec::new(), |elements, aggregator| {
                aggregator.aggregate(attributes, elements)
            })
    }

    fn branch(&self, run: &StyledRun, in_pre: bool) -> Branch {
        let leaves = match &run.attributes.attachment {
            Some(attachment) => {
                let nodes: Vec<Node> = self
                    .attachment_converters
                    .iter()
                    .find_map(|c| c.convert(attachment, self))
                    .unwrap_or_default();
                // Equal attachments next to each other share a run.
                std::iter::repeat(nodes).take(run.len()).flatten().collect()
            }
            None => text_leaves(&run.text, in_pre),
        };

        let mut elements = self.style_elements(&run.attributes);
        if leaves.iter().any(Node::is_block_level) {
            elements = elements.into_iter().filter_map(outside_block).collect();
        }
        Branch { elements, leaves }
    }
}

/// Text split at line separators, which become `<br>`. Inside `<pre>`
/// they are written as plain new lines instead.
fn text_leaves(text: &str, in_pre: bool) -> Vec<Node> {
    if in_pre {
        return vec![Node::text(text.replace(LINE_SEPARATOR, "\n"))];
    }
    let mut leaves = Vec::new();
    for (index, line) in text.split(LINE_SEPARATOR).enumerate() {
        if index > 0 {
            leaves.push(ElementNode::from_type(StandardElementType::Br).into());
        }
        if !line.is_empty() {
            leaves.push(Node::text(line));
        }
    }
    leaves
}

/// A text level style element cannot wrap a block: it is written as a
/// `<span>` keeping its attributes, or dropped if it has none.
fn outside_block(mut element: ElementNode) -> Option<ElementNode> {
    let is_text_style = element.standard_type().map_or(false, |t| {
        t.is_mergeable_style()
            && t != StandardElementType::A
            && t != StandardElementType::Span
    });
    if !is_text_style {
        return Some(element);
    }
    let error = ConversionError::unsupported_style(format!(
        "<{}> around a block element",
        element.name()
    ));
    log::warn!("{error}, writing a <span> instead");
    if element.attributes().is_empty() {
        return None;
    }
    element.set_name(StandardElementType::Span.name());
    Some(element)
}

fn is_lone_block(nodes: &[Node]) -> bool {
    matches!(nodes, [node] if node.is_block_level())
}

/// Nest `leaves` in `elements`, the first element outermost.
fn reduce(elements: &[ElementNode], leaves: Vec<Node>) -> Vec<Node> {
    elements.iter().rev().fold(leaves, |children, element| {
        vec![element.clone().with_children(children).into()]
    })
}

fn push_merging_text(nodes: &mut Vec<Node>, node: Node) {
    if let (Some(Node::Text(last)), Node::Text(text)) = (nodes.last_mut(), &node)
    {
        last.text.push_str(&text.text);
        return;
    }
    nodes.push(node);
}

fn append_merging_text(element: &mut ElementNode, nodes: Vec<Node>) {
    for node in nodes {
        match node {
            Node::Text(text) => element.push_text(&text.text),
            other => element.append_child(other),
        }
    }
}

/// Follow the last child `depth` times from the last node.
fn last_chain_element(
    nodes: &mut [Node],
    depth: usize,
) -> Option<&mut ElementNode> {
    let mut element = nodes.last_mut()?.as_element_mut()?;
    for _ in 0..depth {
        element = element.last_child_element_mut()?;
    }
    Some(element)
}

fn first_chain_element(
    nodes: &mut [Node],
    depth: usize,
) -> Option<&mut ElementNode> {
    let mut element = nodes.first_mut()?.as_element_mut()?;
    for _ in 0..depth {
        element = element.child_element_mut(0)?;
    }
    Some(element)
}

/// Order the elements of every branch so that consecutive branches share
/// as long a prefix as possible: elements the previous branch had keep
/// its order, new ones come by how many following branches carry them.
fn sort(branches: Vec<Branch>) -> Vec<Branch> {
    let mut orders: Vec<Vec<ElementNode>> = Vec::with_capacity(branches.len());
    for (index, branch) in branches.iter().enumerate() {
        let mut remaining = branch.elements.clone();
        let mut sorted = Vec::with_capacity(remaining.len());
        if let Some(previous) = orders.last() {
            for element in previous {
                if let Some(position) = remaining.iter().position(|e| e == element)
                {
                    sorted.push(remaining.remove(position));
                }
            }
        }
        remaining.sort_by_key(|element| {
            Reverse(
                branches[index..]
                    .iter()
                    .take_while(|b| b.elements.contains(element))
                    .count(),
            )
        });
        sorted.extend(remaining);
        orders.push(sorted);
    }
    branches
        .into_iter()
        .zip(orders)
        .map(|(branch, elements)| Branch {
            elements,
            leaves: branch.leaves,
        })
        .collect()
}

/// Turn sorted branches into nodes, moving each branch under the deepest
/// element it can share with the one before it.
fn process(branches: Vec<Branch>) -> Vec<Node> {
    let mut nodes: Vec<Node> = Vec::new();
    let mut previous: Vec<ElementNode> = Vec::new();

    for branch in sort(branches) {
        let shared = previous
            .iter()
            .zip(&branch.elements)
            .take_while(|(left, right)| left.can_merge_children(right, false))
            .count();

        if shared > 0 {
            if let Some(target) = last_chain_element(&mut nodes, shared - 1) {
                let rest = &branch.elements[shared..];
                append_merging_text(target, reduce(rest, branch.leaves));
                previous.truncate(shared);
                previous.extend(rest.iter().cloned());
                continue;
            }
        }

        for node in reduce(&branch.elements, branch.leaves) {
            push_merging_text(&mut nodes, node);
        }
        previous = branch.elements;
    }
    nodes
}

/// Block elements down the first (or last) child of `node`.
fn block_spine<'a>(
    node: Option<&'a Node>,
    next: impl Fn(&'a ElementNode) -> Option<&'a Node>,
) -> Vec<&'a ElementNode> {
    let mut spine = Vec::new();
    let mut current = node.and_then(Node::as_element);
    while let Some(element) = current.filter(|e| e.is_block_level()) {
        spine.push(element);
        current = next(element).and_then(Node::as_element);
    }
    spine
}

/// The depth at which a paragraph joins the previous one, if it does.
///
/// The deepest shared element is never merged, so that two paragraphs in
/// one `<blockquote>` stay two `<p>`, and a list item is the deepest level
/// merged at, so that two lines of a list stay two `<li>`. A paragraph
/// that goes deeper than the whole previous chain continues its innermost
/// block instead: that is how a nested list lands in its parent item.
fn merge_depth(
    left: &[&ElementNode],
    right_len: usize,
    pairs: usize,
) -> Option<usize> {
    if pairs == 0 {
        return None;
    }
    if pairs == left.len() && right_len > pairs {
        return Some(pairs - 1);
    }
    if pairs < 2 {
        return None;
    }
    let mut candidates = pairs - 1;
    if !left[pairs - 1].is_node_type(StandardElementType::Li) {
        if let Some(item) = left[..candidates]
            .iter()
            .rposition(|e| e.is_node_type(StandardElementType::Li))
        {
            candidates = item;
        }
    }
    candidates.checked_sub(1)
}

/// Move the content of `children` into the end of `nodes` if their block
/// chains can be shared. Returns whether it happened.
fn merge_paragraph(nodes: &mut [Node], children: &mut [Node]) -> bool {
    let depth = {
        let left = block_spine(nodes.last(), |e| e.children().last());
        let right = block_spine(children.first(), |e| e.children().first());
        let pairs = left
            .iter()
            .zip(&right)
            .take_while(|(l, r)| l.can_merge_children(r, true))
            .count();
        merge_depth(&left, right.len(), pairs)
    };
    let Some(depth) = depth else {
        return false;
    };
    let (Some(target), Some(source)) = (
        last_chain_element(nodes, depth),
        first_chain_element(children, depth),
    ) else {
        return false;
    };
    append_merging_text(target, source.take_children());
    true
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use speculoos::prelude::*;

    use super::*;
    use crate::dom::HtmlSerializer;
    use crate::styled_text::{
        Attachment, CustomAttachment, ElementRepresentation, ListKind,
        StyleKey, StyleRepresentation, PARAGRAPH_SEPARATOR,
    };

    fn html(text: &StyledText) -> String {
        HtmlSerializer::new(false).serialize(&StyledTextParser::default().parse(text))
    }

    fn bold() -> StyleAttributes {
        StyleAttributes {
            bold: true,
            ..Default::default()
        }
    }

    fn in_blocks(kinds: &[ParagraphKind]) -> StyleAttributes {
        StyleAttributes {
            paragraph: kinds.iter().map(|k| ParagraphProperty::new(*k)).collect(),
            ..Default::default()
        }
    }

    fn lines(lines: &[(&str, StyleAttributes)]) -> StyledText {
        let mut text = StyledText::new();
        for (line, attributes) in lines {
            text.push(*line, attributes.clone());
            text.push(PARAGRAPH_SEPARATOR, attributes.clone());
        }
        text
    }

    const UL: ParagraphKind = ParagraphKind::List(ListKind::Unordered);

    #[test]
    fn empty_text_gives_an_empty_tree() {
        assert_that!(html(&StyledText::new())).is_equal_to(String::new());
    }

    #[test]
    fn a_lone_plain_paragraph_is_bare() {
        assert_that!(html(&StyledText::from("Hello"))).is_equal_to(String::from("Hello"));
    }

    #[test]
    fn several_plain_paragraphs_are_wrapped() {
        assert_that!(html(&StyledText::from("a\nb")))
            .is_equal_to(String::from("<p>a</p><p>b</p>"));
    }

    #[test]
    fn always_wrap_wraps_a_lone_paragraph() {
        let parser = StyledTextParser::new(ConverterConfig {
            always_wrap_paragraphs: true,
            default_paragraph_element: StandardElementType::Div,
            ..Default::default()
        });
        let root = parser.parse(&StyledText::from("a"));
        assert_that!(HtmlSerializer::new(false).serialize(&root))
            .is_equal_to(String::from("<div>a</div>"));
    }

    #[test]
    fn one_bold_stretch_is_one_element() {
        let mut text = StyledText::styled("a", bold());
        text.push(
            "b",
            StyleAttributes {
                link: Some(String::from("https://x.org")),
                ..bold()
            },
        );
        text.push("c", bold());
        assert_that!(html(&text)).is_equal_to(String::from(
            r#"<strong>a<a href="https://x.org">b</a>c</strong>"#,
        ));
    }

    #[test]
    fn longer_styles_go_outside() {
        let italic = StyleAttributes {
            italic: true,
            ..Default::default()
        };
        let mut text = StyledText::styled("a", italic.clone());
        text.push(
            "b",
            StyleAttributes {
                italic: true,
                ..bold()
            },
        );
        text.push("c", italic);
        assert_that!(html(&text))
            .is_equal_to(String::from("<em>a<strong>b</strong>c</em>"));
    }

    #[test]
    fn line_separators_become_breaks() {
        let text = StyledText::from("a\u{2028}b\u{2028}");
        assert_that!(html(&text)).is_equal_to(String::from("a<br>b<br>"));
    }

    #[test]
    fn line_separators_in_pre_stay_new_lines() {
        let text = lines(&[("a\u{2028}b", in_blocks(&[ParagraphKind::Pre]))]);
        assert_that!(html(&text)).is_equal_to(String::from("<pre>a\nb</pre>"));
    }

    #[test]
    fn list_items_share_their_list() {
        let item = in_blocks(&[UL, ParagraphKind::ListItem]);
        let text = lines(&[("a", item.clone()), ("b", item)]);
        assert_that!(html(&text))
            .is_equal_to(String::from("<ul><li>a</li><li>b</li></ul>"));
    }

    #[test]
    fn lists_without_item_properties_get_items() {
        let text = lines(&[("a", in_blocks(&[UL])), ("b", in_blocks(&[UL]))]);
        assert_that!(html(&text))
            .is_equal_to(String::from("<ul><li>a</li><li>b</li></ul>"));
    }

    #[test]
    fn nested_lists_land_in_their_parent_item() {
        let outer = in_blocks(&[UL, ParagraphKind::ListItem]);
        let inner =
            in_blocks(&[UL, ParagraphKind::ListItem, UL, ParagraphKind::ListItem]);
        let text = lines(&[("a", outer.clone()), ("b", inner), ("c", outer)]);
        let root = StyledTextParser::default().parse(&text);
        assert_that!(HtmlSerializer::new(true).serialize(&root)).is_equal_to(
            String::from(indoc! {"
                <ul>
                  <li>a
                    <ul>
                      <li>b</li>
                    </ul>
                  </li>
                  <li>c</li>
                </ul>"}),
        );
    }

    #[test]
    fn paragraphs_in_one_blockquote() {
        let quoted = in_blocks(&[ParagraphKind::Blockquote, ParagraphKind::Paragraph]);
        let text = lines(&[("a", quoted.clone()), ("b", quoted)]);
        assert_that!(html(&text)).is_equal_to(String::from(
            "<blockquote><p>a</p><p>b</p></blockquote>",
        ));
    }

    #[test]
    fn headers_do_not_merge() {
        let header = in_blocks(&[ParagraphKind::Header(1)]);
        let text = lines(&[("a", header.clone()), ("b", header)]);
        assert_that!(html(&text)).is_equal_to(String::from("<h1>a</h1><h1>b</h1>"));
    }

    #[test]
    fn stored_block_spelling_is_reused() {
        let attributes = StyleAttributes {
            paragraph: vec![ParagraphProperty::with_representation(
                ParagraphKind::Blockquote,
                ElementRepresentation::new(
                    "blockquote",
                    vec![crate::dom::Attribute::new("class", "q")],
                ),
            )],
            ..Default::default()
        };
        assert_that!(html(&StyledText::styled("a", attributes)))
            .is_equal_to(String::from(r#"<blockquote class="q">a</blockquote>"#));
    }

    #[test]
    fn empty_paragraphs_keep_their_blocks() {
        let text = lines(&[
            ("a", StyleAttributes::new()),
            ("", in_blocks(&[ParagraphKind::Header(2)])),
        ]);
        assert_that!(html(&text)).is_equal_to(String::from("<p>a</p><h2></h2>"));
    }

    #[test]
    fn block_attachments_are_not_wrapped() {
        let mut text = StyledText::from("a\n");
        text.append(StyledText::attachment(
            Attachment::Line {
                representation: None,
            },
            StyleAttributes::new(),
        ));
        assert_that!(html(&text)).is_equal_to(String::from("<p>a</p><hr>"));
    }

    #[test]
    fn text_styles_do_not_wrap_blocks() {
        let mut attributes = bold();
        attributes.set_representation(
            StyleKey::Bold,
            StyleRepresentation::Element(ElementRepresentation::new(
                "b",
                Vec::new(),
            )),
        );
        let text = StyledText::attachment(
            Attachment::Html {
                root_tag_name: String::from("table"),
                raw_html: String::from("<table></table>"),
            },
            attributes,
        );
        assert_that!(html(&text)).is_equal_to(String::from("<table></table>"));
    }

    #[test]
    fn same_styles_in_consecutive_runs_merge_their_text() {
        let mut text = StyledText::styled(
            "a",
            StyleAttributes {
                underline: true,
                ..Default::default()
            },
        );
        let mut other = StyleAttributes {
            underline: true,
            ..Default::default()
        };
        other.set_representation(
            StyleKey::HorizontalRule,
            StyleRepresentation::Element(ElementRepresentation::new("hr", Vec::new())),
        );
        text.push("b", other);
        assert_that!(html(&text)).is_equal_to(String::from("<u>ab</u>"));
    }

    struct Asides;

    impl ParagraphToElementConverter for Asides {
        fn convert(&self, property: &ParagraphProperty) -> Option<ElementNode> {
            (property.kind == ParagraphKind::Blockquote)
                .then(|| ElementNode::new("aside"))
        }
    }

    struct Galleries;

    impl AttachmentToElementConverter for Galleries {
        fn convert(
            &self,
            attachment: &Attachment,
            _parser: &StyledTextParser,
        ) -> Option<Vec<Node>> {
            match attachment {
                Attachment::Custom(custom) if custom.is_kind("gallery") => {
                    Some(vec![Node::text("[gallery]")])
                }
                _ => None,
            }
        }
    }

    #[test]
    fn given_converters_come_before_the_built_in_ones() {
        let parser = StyledTextParser::with_converters(
            ConverterConfig::default(),
            vec![Box::new(Galleries)],
            vec![Box::new(Asides)],
        );
        let mut text = lines(&[
            ("a", in_blocks(&[ParagraphKind::Blockquote])),
            ("b", in_blocks(&[ParagraphKind::Header(2)])),
        ]);
        text.append(StyledText::attachment(
            Attachment::Custom(CustomAttachment::new("gallery", Vec::new())),
            StyleAttributes::new(),
        ));
        let root = parser.parse(&text);
        assert_that!(HtmlSerializer::new(false).serialize(&root)).is_equal_to(
            String::from("<aside>a</aside><h2>b</h2><p>[gallery]</p>"),
        );
    }
}
