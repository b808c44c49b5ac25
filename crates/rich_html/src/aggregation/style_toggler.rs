// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::{CssAttributeMatcher, ElementNode, StandardElementType};

/// Switches a style on or off in a list of wrapping elements.
///
/// A style is represented either by an element equivalent to
/// `default_element` or, when a matcher is given, by a matching inline CSS
/// declaration on any of the elements.
pub struct HtmlStyleToggler {
    default_element: StandardElementType,
    css_matcher: Option<Box<dyn CssAttributeMatcher>>,
}

impl HtmlStyleToggler {
    pub fn new(
        default_element: StandardElementType,
        css_matcher: Option<Box<dyn CssAttributeMatcher>>,
    ) -> Self {
        Self {
            default_element,
            css_matcher,
        }
    }

    pub fn toggle(&self, on: bool, elements: Vec<ElementNode>) -> Vec<ElementNode> {
        if on {
            self.enable(elements)
        } else {
            self.disable(elements)
        }
    }

    /// Append the default element unless something already expresses the
    /// style.
    pub fn enable(&self, mut elements: Vec<ElementNode>) -> Vec<ElementNode> {
        if !elements.iter().any(|e| self.represents_style(e)) {
            elements.push(ElementNode::from_type(self.default_element));
        }
        elements
    }

    /// Remove every trace of the style. An element that carries the style
    /// but also other attributes turns into a `<span>` keeping them.
    pub fn disable(&self, elements: Vec<ElementNode>) -> Vec<ElementNode> {
        elements
            .into_iter()
            .filter_map(|mut element| {
                if element.is_equivalent_to(self.default_element) {
                    if element.attributes().is_empty() {
                        return None;
                    }
                    element.set_name(StandardElementType::Span.name());
                }
                if let Some(matcher) = self.css_matcher.as_deref() {
                    element.remove_css_attributes(matcher);
                }
                Some(element)
            })
            .collect()
    }

    fn represents_style(&self, element: &ElementNode) -> bool {
        element.is_equivalent_to(self.default_element)
            || self
                .css_matcher
                .as_deref()
                .map_or(false, |m| element.contains_css_attribute(m))
    }
}
