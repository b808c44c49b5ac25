// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{
    BrElementConverter, ContentSerializer, ElementConverter,
    FigureElementConverter, GenericElementConverter, HrElementConverter,
    ImageElementConverter, LiElementConverter, VideoElementConverter,
};
use crate::dom::{CommentNode, ElementNode, Node, RootNode, TextNode};
use crate::styled_text::{
    Attachment, StyleAttributes, StyledText, LINE_SEPARATOR,
    PARAGRAPH_SEPARATOR,
};

/// The built-in element converters, in the order they are tried. The
/// generic converter comes last and accepts anything.
pub fn default_element_converters() -> Vec<Box<dyn ElementConverter>> {
    vec![
        Box::new(FigureElementConverter),
        Box::new(ImageElementConverter),
        Box::new(VideoElementConverter),
        Box::new(HrElementConverter),
        Box::new(BrElementConverter),
        Box::new(LiElementConverter),
        Box::new(GenericElementConverter::default()),
    ]
}

/// Walks a tree depth first and builds the styled text for it.
///
/// Style attributes flow down the tree only: each element converter gets
/// the attributes of its ancestors, adds its own and hands the result to
/// its children.
pub struct StyledTextSerializer<'a> {
    root: &'a RootNode,
    converters: &'a [Box<dyn ElementConverter>],
    fallback: GenericElementConverter,
}

impl<'a> StyledTextSerializer<'a> {
    /// `converters` are tried in order; elements none of them accepts go
    /// through a [GenericElementConverter].
    pub fn new(
        root: &'a RootNode,
        converters: &'a [Box<dyn ElementConverter>],
    ) -> Self {
        Self {
            root,
            converters,
            fallback: GenericElementConverter::default(),
        }
    }

    pub fn serialize(&self) -> StyledText {
        self.serialize_children(self.root.children(), &StyleAttributes::new())
    }

    fn serialize_children(
        &self,
        children: &[Node],
        attributes: &StyleAttributes,
    ) -> StyledText {
        let mut content = StyledText::new();
        for child in children {
            content.append(self.serialize_node(child, attributes));
        }
        content
    }

    fn serialize_node(
        &self,
        node: &Node,
        attributes: &StyleAttributes,
    ) -> StyledText {
        match node {
            Node::Element(element) => self.serialize_element(element, attributes),
            Node::Text(text) => self.serialize_text(text, attributes),
            Node::Comment(comment) => self.serialize_comment(comment, attributes),
        }
    }

    fn serialize_element(
        &self,
        element: &ElementNode,
        attributes: &StyleAttributes,
    ) -> StyledText {
        let converter: &dyn ElementConverter =
            match self.converters.iter().find(|c| c.can_convert(element)) {
                Some(converter) => converter.as_ref(),
                None => &self.fallback,
            };
        log::trace!("converting <{}>", element.name());
        converter.convert(element, attributes, self)
    }

    fn serialize_text(
        &self,
        text: &TextNode,
        attributes: &StyleAttributes,
    ) -> StyledText {
        let Some(handle) = text.handle() else {
            return StyledText::new();
        };
        if self.root.is_ignorable(handle) {
            return StyledText::new();
        }
        let content = if attributes.is_in_pre() {
            text.text.replace(['\n', '\r'], &LINE_SEPARATOR.to_string())
        } else {
            collapse_newlines(&text.text)
        };
        let mut styled = StyledText::styled(content, text_attributes(attributes));
        if self.root.needs_closing_paragraph_separator(handle, false) {
            push_separator(&mut styled, attributes);
        }
        styled
    }

    fn serialize_comment(
        &self,
        comment: &CommentNode,
        attributes: &StyleAttributes,
    ) -> StyledText {
        let mut styled = StyledText::attachment(
            Attachment::Comment {
                text: comment.comment.clone(),
            },
            attributes.clone(),
        );
        if comment.handle().is_some_and(|h| {
            self.root.needs_closing_paragraph_separator(h, false)
        }) {
            push_separator(&mut styled, attributes);
        }
        styled
    }
}

impl ContentSerializer for StyledTextSerializer<'_> {
    fn serialize_content(
        &self,
        element: &ElementNode,
        intrinsic: Option<StyledText>,
        attributes: &StyleAttributes,
        intrinsic_before_children: bool,
    ) -> StyledText {
        let handle = element.handle();
        let mut content = StyledText::new();
        match intrinsic {
            Some(intrinsic) if !intrinsic_before_children => {
                content.append(intrinsic);
                if handle.is_some_and(|h| {
                    self.root.needs_closing_paragraph_separator(h, true)
                }) {
                    push_separator(&mut content, attributes);
                }
                return content;
            }
            Some(intrinsic) => content.append(intrinsic),
            None => {}
        }
        content.append(self.serialize_children(element.children(), attributes));
        if handle
            .is_some_and(|h| self.root.needs_closing_paragraph_separator(h, false))
        {
            push_separator(&mut content, attributes);
        }
        content
    }

    fn serialize_fragment(
        &self,
        nodes: &[Node],
        attributes: &StyleAttributes,
    ) -> StyledText {
        let fragment = RootNode::new(nodes.to_vec());
        StyledTextSerializer::new(&fragment, self.converters)
            .serialize_children(fragment.children(), attributes)
    }
}

/// Attributes for plain characters: whatever an ancestor attachment left
/// behind does not apply to them.
fn text_attributes(attributes: &StyleAttributes) -> StyleAttributes {
    StyleAttributes {
        attachment: None,
        ..attributes.clone()
    }
}

fn push_separator(content: &mut StyledText, attributes: &StyleAttributes) {
    content.push(PARAGRAPH_SEPARATOR, text_attributes(attributes));
}

/// Outside `<pre>`, a run of whitespace containing a newline is source
/// layout and reads as a single space.
fn collapse_newlines(text: &str) -> String {
    if !text.contains(['\n', '\r']) {
        return text.to_owned();
    }
    let mut out = String::with_capacity(text.len());
    let mut pending: Option<String> = None;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            pending.get_or_insert_with(String::new).push(c);
            continue;
        }
        if let Some(whitespace) = pending.take() {
            push_whitespace(&mut out, &whitespace);
        }
        out.push(c);
    }
    if let Some(whitespace) = pending {
        push_whitespace(&mut out, &whitespace);
    }
    out
}

fn push_whitespace(out: &mut String, whitespace: &str) {
    if whitespace.contains(['\n', '\r']) {
        out.push(' ');
    } else {
        out.push_str(whitespace);
    }
}
