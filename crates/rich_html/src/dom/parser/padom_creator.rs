// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{
    paqual_name, PaDom, PaDomCreationError, PaDomHandle, PaDomNode,
    PaNodeComment, PaNodeContainer, PaNodeText,
};
use html5ever::interface::NextParserState;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};
use std::cell::{Ref, RefCell};

pub(crate) type DomCreationResult = Result<PaDom, PaDomCreationError>;

/// An html5ever [TreeSink] building a [PaDom].
///
/// Every callback is implemented, so the tree builder's error recovery
/// (adoption agency, foster parenting, templates) can always run to
/// completion. Recovered errors are collected and returned alongside the
/// finished tree.
pub(crate) struct PaDomCreator {
    state: RefCell<PaDomCreationError>,
}

impl PaDomCreator {
    /// Parse `html` as the content of an anonymous element, which puts the
    /// tree builder in body mode.
    pub fn parse(html: &str) -> DomCreationResult {
        Self::parse_in(html, "")
    }

    /// Parse `html` as the content of a `context` element. A `template`
    /// context accepts table parts at the top level.
    pub fn parse_in(html: &str, context: &str) -> DomCreationResult {
        parse_fragment(
            PaDomCreator::default(),
            Default::default(),
            paqual_name(context),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }

    fn push_child(dom: &mut PaDom, parent: &PaDomHandle, child: PaDomHandle) {
        if let Some(children) = dom.get_mut_node(parent).children_mut() {
            children.push(child);
        }
    }

    /// Append text to the text node at `sibling_index` of `parent` if there
    /// is one, so adjacent text always ends up in a single node.
    fn merge_text(
        dom: &mut PaDom,
        parent: &PaDomHandle,
        sibling_index: Option<usize>,
        text: &str,
    ) -> bool {
        let Some(sibling) = sibling_index.and_then(|i| {
            dom.get_node(parent).children().and_then(|c| c.get(i)).cloned()
        }) else {
            return false;
        };
        if let PaDomNode::Text(t) = dom.get_mut_node(&sibling) {
            t.content += text;
            true
        } else {
            false
        }
    }
}

impl Default for PaDomCreator {
    fn default() -> Self {
        Self {
            state: RefCell::new(PaDomCreationError::new()),
        }
    }
}

impl TreeSink for PaDomCreator {
    type Handle = PaDomHandle;
    type Output = DomCreationResult;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        let state = self.state.into_inner();
        if state.parse_errors.is_empty() {
            Ok(state.dom)
        } else {
            Err(state)
        }
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        self.state.borrow_mut().parse_errors.push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().dom.document_handle().clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |state| state.dom.name_of(target))
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        self.state
            .borrow_mut()
            .dom
            .create_element(name, attrs, flags)
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        self.state
            .borrow_mut()
            .dom
            .add_node(PaDomNode::Comment(PaNodeComment {
                content: text.as_ref().to_owned(),
            }))
    }

    fn create_pi(&self, _target: StrTendril, data: StrTendril) -> Self::Handle {
        // Processing instructions only exist in XML; html5ever reports them
        // as bogus comments, so keep the data the same way.
        self.create_comment(data)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let dom = &mut self.state.borrow_mut().dom;
        match child {
            NodeOrText::AppendNode(child) => {
                Self::push_child(dom, parent, child)
            }
            NodeOrText::AppendText(tendril) => {
                let last = dom
                    .get_node(parent)
                    .children()
                    .and_then(|c| c.len().checked_sub(1));
                if !Self::merge_text(dom, parent, last, tendril.as_ref()) {
                    let new_handle = dom.add_node(PaDomNode::Text(PaNodeText {
                        content: tendril.as_ref().to_owned(),
                    }));
                    Self::push_child(dom, parent, new_handle);
                }
            }
        };
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.state.borrow().dom.parent_of(element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Fragments have no doctype
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template content is kept inline, inside the template element.
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        let Some(parent) = dom.parent_of(sibling) else {
            return;
        };
        let Some(index) = dom
            .get_node(&parent)
            .children()
            .and_then(|c| c.iter().position(|h| h == sibling))
        else {
            return;
        };
        let child = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(tendril) => {
                let previous = index.checked_sub(1);
                if Self::merge_text(dom, &parent, previous, tendril.as_ref()) {
                    return;
                }
                dom.add_node(PaDomNode::Text(PaNodeText {
                    content: tendril.as_ref().to_owned(),
                }))
            }
        };
        if let Some(children) = dom.get_mut_node(&parent).children_mut() {
            children.insert(index, child);
        }
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        if let PaDomNode::Container(node) = dom.get_mut_node(target) {
            let to_add: Vec<(String, String)> = attrs
                .iter()
                .filter_map(|attr| {
                    let attr_name = super::padom::attribute_name(attr);
                    if node.attrs.iter().any(|(name, _)| *name == attr_name) {
                        None
                    } else {
                        Some((attr_name, attr.value.as_ref().to_owned()))
                    }
                })
                .collect();
            node.attrs.extend(to_add);
        }
    }

    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        let dom = &mut self.state.borrow_mut().dom;
        if let Some(parent) = dom.parent_of(target) {
            if let Some(children) = dom.get_mut_node(&parent).children_mut() {
                children.retain(|h| h != target);
            }
        }
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let dom = &mut self.state.borrow_mut().dom;
        let moved = dom
            .get_mut_node(node)
            .children_mut()
            .map(std::mem::take)
            .unwrap_or_default();
        if let Some(children) = dom.get_mut_node(new_parent).children_mut() {
            children.extend(moved);
        }
    }

    fn is_mathml_annotation_xml_integration_point(
        &self,
        _handle: &Self::Handle,
    ) -> bool {
        false
    }

    fn set_current_line(&self, _line_number: u64) {}

    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        NextParserState::Continue
    }

    fn allow_declarative_shadow_roots(
        &self,
        _intended_parent: &Self::Handle,
    ) -> bool {
        false
    }

    fn attach_declarative_shadow(
        &self,
        _location: &Self::Handle,
        _template: &Self::Handle,
        _attrs: Vec<Attribute>,
    ) -> Result<(), String> {
        Err(String::from("declarative shadow roots are not supported"))
    }
}
