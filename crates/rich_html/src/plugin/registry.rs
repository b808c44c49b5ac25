// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::aggregation::{
    AttachmentToElementConverter, ParagraphToElementConverter,
};
use crate::converters::{default_element_converters, ElementConverter};
use crate::dom::{ElementToTagConverter, RootNode};
use crate::{ConversionError, ConversionResult};

/// Extends a converter with processing at the four points of the
/// conversion pipeline and with element converters of its own.
///
/// Every hook does nothing by default.
pub trait Plugin {
    /// Unique among the plugins of one converter.
    fn identifier(&self) -> &str;

    /// HTML text before it is parsed.
    fn process_input_html(&self, html: &str) -> String {
        html.to_owned()
    }

    /// The tree right after parsing.
    fn process_input_tree(&self, _root: &mut RootNode) {}

    /// The tree rebuilt from styled text, before serializing.
    fn process_output_tree(&self, _root: &mut RootNode) {}

    /// The serialized HTML.
    fn process_output_html(&self, html: &str) -> String {
        html.to_owned()
    }

    /// Tried before the built-in converters when reading HTML.
    fn element_converters(&self) -> Vec<Box<dyn ElementConverter>> {
        Vec::new()
    }

    /// Tried before the generic converter when writing HTML.
    fn element_to_tag_converters(&self) -> Vec<Box<dyn ElementToTagConverter>> {
        Vec::new()
    }

    /// Tried before the built-in converters when turning attachments back
    /// into nodes. This is where a plugin writes its
    /// [crate::styled_text::Attachment::Custom] attachments.
    fn attachment_converters(
        &self,
    ) -> Vec<Box<dyn AttachmentToElementConverter>> {
        Vec::new()
    }

    /// Tried before the built-in converters when turning paragraph
    /// properties back into block elements.
    fn paragraph_converters(&self) -> Vec<Box<dyn ParagraphToElementConverter>> {
        Vec::new()
    }
}

/// The plugins of a converter, fixed once built.
///
/// Hooks run in registration order. The converters plugins supply are
/// collected when the registry is built and come before the built-in ones.
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
    element_converters: Vec<Box<dyn ElementConverter>>,
    tag_converters: Vec<Box<dyn ElementToTagConverter>>,
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self {
            plugins: Vec::new(),
            element_converters: default_element_converters(),
            tag_converters: Vec::new(),
        }
    }
}

impl PluginRegistry {
    /// Fails if two plugins share an identifier.
    pub fn new(plugins: Vec<Box<dyn Plugin>>) -> ConversionResult<Self> {
        for (index, plugin) in plugins.iter().enumerate() {
            let identifier = plugin.identifier();
            if plugins[..index].iter().any(|p| p.identifier() == identifier) {
                log::warn!("rejecting duplicate plugin {identifier}");
                return Err(ConversionError::DuplicatePlugin(
                    identifier.to_owned(),
                ));
            }
        }
        let mut element_converters: Vec<Box<dyn ElementConverter>> = plugins
            .iter()
            .flat_map(|p| p.element_converters())
            .collect();
        element_converters.extend(default_element_converters());
        let tag_converters = plugins
            .iter()
            .flat_map(|p| p.element_to_tag_converters())
            .collect();
        Ok(Self {
            plugins,
            element_converters,
            tag_converters,
        })
    }

    pub fn identifiers(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.identifier()).collect()
    }

    /// Plugin converters followed by the built-in ones.
    pub fn element_converters(&self) -> &[Box<dyn ElementConverter>] {
        &self.element_converters
    }

    pub fn tag_converters(&self) -> &[Box<dyn ElementToTagConverter>] {
        &self.tag_converters
    }

    /// The attachment converters of every plugin, in registration order.
    /// Built-in ones are not included.
    pub fn attachment_converters(
        &self,
    ) -> Vec<Box<dyn AttachmentToElementConverter>> {
        self.plugins
            .iter()
            .flat_map(|p| p.attachment_converters())
            .collect()
    }

    /// The paragraph converters of every plugin, in registration order.
    /// Built-in ones are not included.
    pub fn paragraph_converters(
        &self,
    ) -> Vec<Box<dyn ParagraphToElementConverter>> {
        self.plugins
            .iter()
            .flat_map(|p| p.paragraph_converters())
            .collect()
    }

    pub fn process_input_html(&self, html: &str) -> String {
        self.plugins
            .iter()
            .fold(html.to_owned(), |html, p| p.process_input_html(&html))
    }

    pub fn process_input_tree(&self, root: &mut RootNode) {
        for plugin in &self.plugins {
            plugin.process_input_tree(root);
        }
    }

    pub fn process_output_tree(&self, root: &mut RootNode) {
        for plugin in &self.plugins {
            plugin.process_output_tree(root);
        }
    }

    pub fn process_output_html(&self, html: &str) -> String {
        self.plugins
            .iter()
            .fold(html.to_owned(), |html, p| p.process_output_html(&html))
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;

    struct Suffix(&'static str);

    impl Plugin for Suffix {
        fn identifier(&self) -> &str {
            self.0
        }

        fn process_input_html(&self, html: &str) -> String {
            format!("{html}{}", self.0)
        }
    }

    #[test]
    fn hooks_run_in_registration_order() {
        let registry =
            PluginRegistry::new(vec![Box::new(Suffix("1")), Box::new(Suffix("2"))])
                .unwrap();
        assert_that!(registry.process_input_html("x"))
            .is_equal_to(String::from("x12"));
        assert_that!(registry.process_output_html("x"))
            .is_equal_to(String::from("x"));
        assert_that!(registry.identifiers()).is_equal_to(vec!["1", "2"]);
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let result =
            PluginRegistry::new(vec![Box::new(Suffix("a")), Box::new(Suffix("a"))]);
        assert_that!(result.err())
            .is_equal_to(Some(ConversionError::DuplicatePlugin(String::from("a"))));
    }

    #[test]
    fn built_in_converters_are_always_there() {
        let registry = PluginRegistry::default();
        assert_that!(registry.element_converters().len())
            .is_equal_to(default_element_converters().len());
        assert_that!(registry.tag_converters().len()).is_equal_to(0);
        assert_that!(registry.attachment_converters().len()).is_equal_to(0);
        assert_that!(registry.paragraph_converters().len()).is_equal_to(0);
    }
}
