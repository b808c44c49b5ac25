// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::tree_builder::ElementFlags;
use html5ever::{namespace_url, ns, Attribute, LocalName, QualName};

use super::PaNodeContainer;

/// Handle to a node of a [PaDom]: an index into its node list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PaDomHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeText {
    pub(crate) content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeComment {
    pub(crate) content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PaDomNode {
    Document(PaNodeContainer),
    Container(PaNodeContainer),
    Text(PaNodeText),
    Comment(PaNodeComment),
}

impl PaDomNode {
    pub(crate) fn children(&self) -> Option<&Vec<PaDomHandle>> {
        match self {
            Self::Document(c) | Self::Container(c) => Some(&c.children),
            Self::Text(_) | Self::Comment(_) => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<PaDomHandle>> {
        match self {
            Self::Document(c) | Self::Container(c) => Some(&mut c.children),
            Self::Text(_) | Self::Comment(_) => None,
        }
    }
}

pub(crate) fn paqual_name(name: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(name))
}

/// The arena html5ever builds into while parsing. Nodes refer to their
/// children by handle, and nodes dropped by the tree builder stay in the
/// arena as garbage that is never reached from the document.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaDom {
    pub(crate) nodes: Vec<PaDomNode>,
    pub(crate) document_handle: PaDomHandle,
    unnamed: QualName,
}

impl PaDom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![PaDomNode::Document(PaNodeContainer {
                name: paqual_name(""),
                attrs: Vec::new(),
                children: Vec::new(),
            })],
            document_handle: PaDomHandle(0),
            unnamed: paqual_name(""),
        }
    }

    pub(crate) fn add_node(&mut self, node: PaDomNode) -> PaDomHandle {
        self.nodes.push(node);
        PaDomHandle(self.nodes.len() - 1)
    }

    pub(crate) fn get_node(&self, handle: &PaDomHandle) -> &PaDomNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(&mut self, handle: &PaDomHandle) -> &mut PaDomNode {
        &mut self.nodes[handle.0]
    }

    pub(crate) fn document_handle(&self) -> &PaDomHandle {
        &self.document_handle
    }

    pub(crate) fn get_document(&self) -> &PaDomNode {
        self.get_node(&self.document_handle)
    }

    pub(crate) fn name_of(&self, handle: &PaDomHandle) -> &QualName {
        match self.get_node(handle) {
            PaDomNode::Document(c) | PaDomNode::Container(c) => &c.name,
            PaDomNode::Text(_) | PaDomNode::Comment(_) => &self.unnamed,
        }
    }

    pub(crate) fn create_element(
        &mut self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> PaDomHandle {
        self.add_node(PaDomNode::Container(PaNodeContainer {
            name,
            attrs: attrs
                .iter()
                .map(|attr| (attribute_name(attr), attr.value.to_string()))
                .collect(),
            children: Vec::new(),
        }))
    }

    /// The node whose children include `child`, if it is attached.
    pub(crate) fn parent_of(&self, child: &PaDomHandle) -> Option<PaDomHandle> {
        self.nodes
            .iter()
            .position(|node| {
                node.children().map_or(false, |c| c.contains(child))
            })
            .map(PaDomHandle)
    }
}

pub(crate) fn attribute_name(attr: &Attribute) -> String {
    match &attr.name.prefix {
        Some(prefix) => format!("{}:{}", prefix, attr.name.local),
        None => attr.name.local.to_string(),
    }
}

/// A finished [PaDom] along with the errors the tree builder recovered
/// from while building it.
#[derive(Clone, Debug)]
pub(crate) struct PaDomCreationError {
    pub(crate) dom: PaDom,
    pub(crate) parse_errors: Vec<String>,
}

impl PaDomCreationError {
    pub(crate) fn new() -> Self {
        Self {
            dom: PaDom::new(),
            parse_errors: Vec::new(),
        }
    }
}
