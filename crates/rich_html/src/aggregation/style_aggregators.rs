// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::HtmlStyleToggler;
use crate::dom::css::{
    BoldCssAttributeMatcher, ItalicCssAttributeMatcher,
    StrikethroughCssAttributeMatcher, UnderlineCssAttributeMatcher,
};
use crate::dom::{CssAttributeMatcher, ElementNode, StandardElementType};
use crate::styled_text::{ElementRepresentation, StyleAttributes, StyleKey};

/// Builds the elements wrapping a run of styled text.
///
/// Aggregators are folded over an initially empty list: each one receives
/// the elements produced so far, outermost first, and adds, changes or
/// removes the ones expressing its style.
pub trait StyleAggregator {
    fn aggregate(
        &self,
        attributes: &StyleAttributes,
        elements: Vec<ElementNode>,
    ) -> Vec<ElementNode>;
}

/// The built-in aggregators, in folding order.
pub fn default_style_aggregators() -> Vec<Box<dyn StyleAggregator>> {
    vec![
        Box::new(UnsupportedHtmlAggregator),
        Box::new(ToggledStyleAggregator::bold()),
        Box::new(ConditionalStyleAggregator::italic()),
        Box::new(ToggledStyleAggregator::underline()),
        Box::new(ToggledStyleAggregator::strikethrough()),
        Box::new(ToggledStyleAggregator::code()),
        Box::new(MarkStyleAggregator::default()),
        Box::new(ToggledStyleAggregator::subscript()),
        Box::new(ToggledStyleAggregator::superscript()),
        Box::new(LinkStyleAggregator),
    ]
}

/// Recreates the elements recorded in `unsupported_html`.
pub struct UnsupportedHtmlAggregator;

impl StyleAggregator for UnsupportedHtmlAggregator {
    fn aggregate(
        &self,
        attributes: &StyleAttributes,
        mut elements: Vec<ElementNode>,
    ) -> Vec<ElementNode> {
        elements.extend(
            attributes
                .unsupported_html
                .iter()
                .map(ElementRepresentation::to_element_node),
        );
        elements
    }
}

/// A flag style written back as its stored element, or as a default one.
///
/// The stored element goes in first, whatever the flag: it may carry
/// attributes beyond the style itself, and the toggler turns it into a
/// `<span>` if the style was switched off.
pub struct ToggledStyleAggregator {
    key: StyleKey,
    toggler: HtmlStyleToggler,
}

impl ToggledStyleAggregator {
    pub fn new(
        key: StyleKey,
        default_element: StandardElementType,
        css_matcher: Option<Box<dyn CssAttributeMatcher>>,
    ) -> Self {
        Self {
            key,
            toggler: HtmlStyleToggler::new(default_element, css_matcher),
        }
    }

    pub fn bold() -> Self {
        Self::new(
            StyleKey::Bold,
            StandardElementType::Strong,
            Some(Box::new(BoldCssAttributeMatcher)),
        )
    }

    pub fn italic() -> Self {
        Self::new(
            StyleKey::Italic,
            StandardElementType::Em,
            Some(Box::new(ItalicCssAttributeMatcher)),
        )
    }

    pub fn cite() -> Self {
        Self::new(StyleKey::Cite, StandardElementType::Cite, None)
    }

    pub fn underline() -> Self {
        Self::new(
            StyleKey::Underline,
            StandardElementType::U,
            Some(Box::new(UnderlineCssAttributeMatcher)),
        )
    }

    pub fn strikethrough() -> Self {
        Self::new(
            StyleKey::Strikethrough,
            StandardElementType::Strike,
            Some(Box::new(StrikethroughCssAttributeMatcher)),
        )
    }

    pub fn code() -> Self {
        Self::new(StyleKey::Code, StandardElementType::Code, None)
    }

    pub fn subscript() -> Self {
        Self::new(StyleKey::Subscript, StandardElementType::Sub, None)
    }

    pub fn superscript() -> Self {
        Self::new(StyleKey::Superscript, StandardElementType::Sup, None)
    }
}

impl StyleAggregator for ToggledStyleAggregator {
    fn aggregate(
        &self,
        attributes: &StyleAttributes,
        mut elements: Vec<ElementNode>,
    ) -> Vec<ElementNode> {
        if let Some(stored) = attributes.element_representation(self.key) {
            elements.push(stored.to_element_node());
        }
        self.toggler.toggle(attributes.is_set(self.key), elements)
    }
}

type Predicate = fn(&StyleAttributes) -> bool;

/// Hands the attributes to the first branch whose predicate holds.
pub struct ConditionalStyleAggregator {
    branches: Vec<(Predicate, Box<dyn StyleAggregator>)>,
}

impl ConditionalStyleAggregator {
    pub fn new(branches: Vec<(Predicate, Box<dyn StyleAggregator>)>) -> Self {
        Self { branches }
    }

    /// Italic spelled `<cite>` stays a `<cite>`.
    pub fn italic() -> Self {
        let has_cite: Predicate =
            |attributes| attributes.representation(StyleKey::Cite).is_some();
        let otherwise: Predicate = |_| true;
        let cite: Box<dyn StyleAggregator> =
            Box::new(ToggledStyleAggregator::cite());
        let italic: Box<dyn StyleAggregator> =
            Box::new(ToggledStyleAggregator::italic());
        Self::new(vec![(has_cite, cite), (otherwise, italic)])
    }
}

impl StyleAggregator for ConditionalStyleAggregator {
    fn aggregate(
        &self,
        attributes: &StyleAttributes,
        elements: Vec<ElementNode>,
    ) -> Vec<ElementNode> {
        match self
            .branches
            .iter()
            .find(|(predicate, _)| predicate(attributes))
        {
            Some((_, aggregator)) => aggregator.aggregate(attributes, elements),
            None => elements,
        }
    }
}

/// `<mark>`, whose stored `style` is written compactly.
pub struct MarkStyleAggregator {
    toggler: HtmlStyleToggler,
}

impl Default for MarkStyleAggregator {
    fn default() -> Self {
        Self {
            toggler: HtmlStyleToggler::new(StandardElementType::Mark, None),
        }
    }
}

impl MarkStyleAggregator {
    fn compact_style(mut element: ElementNode) -> ElementNode {
        if let Some(style) = element.string_value("style") {
            let compact = style.replace(": ", ":").replace("; ", ";");
            element.set_attribute("style", compact);
        }
        element
    }
}

impl StyleAggregator for MarkStyleAggregator {
    fn aggregate(
        &self,
        attributes: &StyleAttributes,
        mut elements: Vec<ElementNode>,
    ) -> Vec<ElementNode> {
        if let Some(stored) = attributes.element_representation(StyleKey::Mark)
        {
            elements.push(Self::compact_style(stored.to_element_node()));
        }
        self.toggler.toggle(attributes.mark, elements)
    }
}

/// `<a>` pointing at the link target, reusing the stored anchor so its
/// other attributes survive.
pub struct LinkStyleAggregator;

impl StyleAggregator for LinkStyleAggregator {
    fn aggregate(
        &self,
        attributes: &StyleAttributes,
        mut elements: Vec<ElementNode>,
    ) -> Vec<ElementNode> {
        let Some(link) = &attributes.link else {
            return elements;
        };
        let mut anchor = attributes
            .element_representation(StyleKey::Link)
            .map(ElementRepresentation::to_element_node)
            .unwrap_or_else(|| ElementNode::from_type(StandardElementType::A));
        anchor.set_attribute("href", link.as_str());
        elements.push(anchor);
        elements
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;
    use crate::dom::Attribute;
    use crate::styled_text::StyleRepresentation;

    fn fold(attributes: &StyleAttributes) -> Vec<ElementNode> {
        default_style_aggregators()
            .iter()
            .fold(Vec::new(), |elements, aggregator| {
                aggregator.aggregate(attributes, elements)
            })
    }

    fn names(elements: &[ElementNode]) -> Vec<&str> {
        elements.iter().map(ElementNode::name).collect()
    }

    fn stored(key: StyleKey, name: &str, attributes: &mut StyleAttributes) {
        attributes.set_representation(
            key,
            StyleRepresentation::Element(ElementRepresentation::new(
                name,
                Vec::new(),
            )),
        );
    }

    #[test]
    fn plain_text_gets_no_elements() {
        assert_that!(fold(&StyleAttributes::new())).is_empty();
    }

    #[test]
    fn default_elements_for_flags() {
        let attributes = StyleAttributes {
            bold: true,
            italic: true,
            underline: true,
            strikethrough: true,
            code: true,
            mark: true,
            subscript: true,
            superscript: true,
            ..Default::default()
        };
        assert_that!(names(&fold(&attributes))).is_equal_to(vec![
            "strong", "em", "u", "strike", "code", "mark", "sub", "sup",
        ]);
    }

    #[test]
    fn stored_spelling_wins() {
        let mut attributes = StyleAttributes {
            bold: true,
            ..Default::default()
        };
        stored(StyleKey::Bold, "b", &mut attributes);
        assert_that!(names(&fold(&attributes))).is_equal_to(vec!["b"]);
    }

    #[test]
    fn cite_is_kept_apart_from_italic() {
        let mut attributes = StyleAttributes {
            italic: true,
            ..Default::default()
        };
        stored(StyleKey::Cite, "cite", &mut attributes);
        assert_that!(names(&fold(&attributes))).is_equal_to(vec!["cite"]);
    }

    #[test]
    fn css_spelling_needs_no_extra_element() {
        let attributes = StyleAttributes {
            bold: true,
            unsupported_html: vec![ElementRepresentation::new(
                "span",
                vec![Attribute::new("style", "font-weight: bold")],
            )],
            ..Default::default()
        };
        assert_that!(names(&fold(&attributes))).is_equal_to(vec!["span"]);
    }

    #[test]
    fn mark_style_is_compacted() {
        let mut attributes = StyleAttributes {
            mark: true,
            ..Default::default()
        };
        attributes.set_representation(
            StyleKey::Mark,
            StyleRepresentation::Element(ElementRepresentation::new(
                "mark",
                vec![Attribute::new(
                    "style",
                    "background-color: rgba(0, 0, 0, 0); color: #cf2e2e",
                )],
            )),
        );
        let elements = fold(&attributes);
        assert_that!(elements[0].string_value("style")).is_equal_to(Some(
            String::from("background-color:rgba(0, 0, 0, 0);color:#cf2e2e"),
        ));
    }

    #[test]
    fn link_updates_the_stored_anchor() {
        let mut attributes = StyleAttributes {
            link: Some(String::from("https://new.org")),
            ..Default::default()
        };
        attributes.set_representation(
            StyleKey::Link,
            StyleRepresentation::Element(ElementRepresentation::new(
                "a",
                vec![
                    Attribute::new("href", "https://old.org"),
                    Attribute::new("rel", "nofollow"),
                ],
            )),
        );
        let elements = fold(&attributes);
        assert_that!(elements[0].attributes().to_vec()).is_equal_to(vec![
            Attribute::new("href", "https://new.org"),
            Attribute::new("rel", "nofollow"),
        ]);
    }
}
