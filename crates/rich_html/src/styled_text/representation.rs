// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::{Attribute, CssAttribute, ElementNode, StandardElementType};

/// An element without its children: enough to rebuild the tag it was
/// spelled with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementRepresentation {
    pub name: String,
    pub attributes: Vec<Attribute>,
}

impl ElementRepresentation {
    pub fn new(name: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            name: name.into().to_ascii_lowercase(),
            attributes,
        }
    }

    pub fn from_element(element: &ElementNode) -> Self {
        Self::new(element.name(), element.attributes().to_vec())
    }

    pub fn is_node_type(&self, element_type: StandardElementType) -> bool {
        self.name == element_type.name()
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.is_named(name))
    }

    /// A fresh, childless element with this name and these attributes.
    pub fn to_element_node(&self) -> ElementNode {
        ElementNode::with_attributes(self.name.clone(), self.attributes.clone())
    }
}

impl From<&ElementNode> for ElementRepresentation {
    fn from(element: &ElementNode) -> Self {
        Self::from_element(element)
    }
}

/// How a style was spelled in the source HTML.
///
/// Stored next to the style flag it explains, so that exporting an edited
/// document writes `<strong class="x">` or `font-weight: 700` back instead
/// of a default tag.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyleRepresentation {
    /// The style came from an attribute of an element.
    Attribute(Attribute),
    /// The style came from the element itself, e.g. `<b>`.
    Element(ElementRepresentation),
    /// The style came from a declaration in a `style` attribute.
    InlineCss(CssAttribute),
}

impl StyleRepresentation {
    pub fn element(element: &ElementNode) -> Self {
        Self::Element(ElementRepresentation::from_element(element))
    }

    pub fn as_element(&self) -> Option<&ElementRepresentation> {
        match self {
            Self::Element(element) => Some(element),
            Self::Attribute(_) | Self::InlineCss(_) => None,
        }
    }

    /// The element to recreate, if the style was spelled as one.
    pub fn to_element_node(&self) -> Option<ElementNode> {
        self.as_element().map(ElementRepresentation::to_element_node)
    }
}
