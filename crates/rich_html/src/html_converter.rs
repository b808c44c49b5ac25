// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::aggregation::StyledTextParser;
use crate::config::ConverterConfig;
use crate::converters::StyledTextSerializer;
use crate::dom::{HtmlParser, HtmlSerializer};
use crate::plugin::{Plugin, PluginRegistry};
use crate::styled_text::StyledText;
use crate::ConversionResult;

// The fragment parser drops <body> tags, so they are looked for in the text.
static BODY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<body(?:\s[^>]*)?/?>").unwrap());

/// Converts HTML to styled text and back.
///
/// ```
/// use rich_html::HtmlConverter;
///
/// let converter = HtmlConverter::default();
/// let text = converter.styled_text("<b>Hello</b> world").unwrap();
/// assert!(text.attributes_at(0).unwrap().bold);
/// assert_eq!(converter.html(&text, false), "<b>Hello</b> world");
/// ```
pub struct HtmlConverter {
    config: ConverterConfig,
    parser: HtmlParser,
    styled_text_parser: StyledTextParser,
    plugins: PluginRegistry,
}

impl Default for HtmlConverter {
    fn default() -> Self {
        Self::new(ConverterConfig::default(), PluginRegistry::default())
    }
}

impl HtmlConverter {
    pub fn builder() -> HtmlConverterBuilder {
        HtmlConverterBuilder::default()
    }

    fn new(config: ConverterConfig, plugins: PluginRegistry) -> Self {
        Self {
            styled_text_parser: StyledTextParser::with_converters(
                config.clone(),
                plugins.attachment_converters(),
                plugins.paragraph_converters(),
            ),
            config,
            parser: HtmlParser::new(),
            plugins,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    /// Parse `html`, after the plugins had a go at it, and convert the tree
    /// to styled text.
    ///
    /// Malformed HTML is repaired rather than rejected.
    pub fn styled_text(&self, html: &str) -> ConversionResult<StyledText> {
        let html = self.plugins.process_input_html(html);
        let mut root = self.parser.parse(&html)?;
        self.plugins.process_input_tree(&mut root);
        #[cfg(feature = "assert-invariants")]
        root.check_invariants()?;
        let serializer =
            StyledTextSerializer::new(&root, self.plugins.element_converters());
        Ok(serializer.serialize())
    }

    /// Write `text` back as HTML, pretty printed if `prettify` is set.
    pub fn html(&self, text: &StyledText, prettify: bool) -> String {
        let mut root = self.styled_text_parser.parse(text);
        self.plugins.process_output_tree(&mut root);
        let html = HtmlSerializer::new(prettify)
            .with_indentation(self.config.pretty_print_indentation)
            .with_tag_converters(self.plugins.tag_converters())
            .serialize(&root);
        self.plugins.process_output_html(&html)
    }

    /// Whether `html` is a fragment this converter can handle. Whole
    /// documents, recognised by their `<body>`, are not.
    pub fn is_supported(&self, html: &str) -> bool {
        let html = self.plugins.process_input_html(html);
        let supported = !BODY_TAG.is_match(&html);
        if !supported {
            log::trace!("refusing a full HTML document");
        }
        supported
    }
}

/// Collects the settings and plugins of an [HtmlConverter].
#[derive(Default)]
pub struct HtmlConverterBuilder {
    config: ConverterConfig,
    plugins: Vec<Box<dyn Plugin>>,
}

impl HtmlConverterBuilder {
    pub fn config(mut self, config: ConverterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn indentation(mut self, indentation: usize) -> Self {
        self.config.pretty_print_indentation = indentation;
        self
    }

    /// Plugins run in the order they are added.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Fails if two plugins share an identifier.
    pub fn build(self) -> ConversionResult<HtmlConverter> {
        let plugins = PluginRegistry::new(self.plugins)?;
        Ok(HtmlConverter::new(self.config, plugins))
    }
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use speculoos::prelude::*;

    use super::*;
    use crate::dom::{ElementNode, RootNode, StandardElementType};
    use crate::plugin::VideoShortcodePlugin;
    use crate::ConversionError;

    fn roundtrip(converter: &HtmlConverter, html: &str) -> String {
        let text = converter.styled_text(html).unwrap();
        converter.html(&text, false)
    }

    #[test]
    fn bold_survives_the_round_trip() {
        let converter = HtmlConverter::default();
        let text = converter.styled_text("<b>Hello</b>").unwrap();
        assert_that!(text.attributes_at(0).map(|a| a.bold)).is_equal_to(Some(true));
        assert_that!(converter.html(&text, false))
            .is_equal_to(String::from("<b>Hello</b>"));
    }

    #[test]
    fn pretty_printing_uses_the_configured_indentation() {
        let converter = HtmlConverter::builder().indentation(4).build().unwrap();
        let text = converter.styled_text("<ul><li>a</li><li>b</li></ul>").unwrap();
        assert_that!(converter.html(&text, true)).is_equal_to(String::from(indoc! {"
            <ul>
                <li>a</li>
                <li>b</li>
            </ul>"}));
    }

    #[test]
    fn documents_with_a_body_are_not_supported() {
        let converter = HtmlConverter::default();
        assert_that!(converter.is_supported("<p>a</p>")).is_true();
        assert_that!(converter.is_supported("<html><BODY class=x><p>a</p></BODY></html>"))
            .is_false();
        assert_that!(converter.is_supported("<bodyguard>a</bodyguard>")).is_true();
    }

    #[test]
    fn plugins_must_be_unique() {
        let result = HtmlConverter::builder()
            .plugin(VideoShortcodePlugin::default())
            .plugin(VideoShortcodePlugin::default())
            .build();
        assert_that!(result.err()).is_equal_to(Some(
            ConversionError::DuplicatePlugin(String::from("video-shortcode")),
        ));
    }

    struct Shout;

    impl Plugin for Shout {
        fn identifier(&self) -> &str {
            "shout"
        }

        fn process_input_tree(&self, root: &mut RootNode) {
            let children = root.take_children();
            root.append_child(
                ElementNode::from_type(StandardElementType::Strong)
                    .with_children(children),
            );
        }

        fn process_output_html(&self, html: &str) -> String {
            html.to_uppercase()
        }
    }

    #[test]
    fn plugin_hooks_run_on_both_paths() {
        let converter = HtmlConverter::builder().plugin(Shout).build().unwrap();
        assert_that!(roundtrip(&converter, "hi"))
            .is_equal_to(String::from("<STRONG>HI</STRONG>"));
    }

    #[test]
    fn configured_paragraph_element_is_used() {
        let converter = HtmlConverter::builder()
            .config(ConverterConfig {
                default_paragraph_element: StandardElementType::Div,
                always_wrap_paragraphs: true,
                ..Default::default()
            })
            .build()
            .unwrap();
        let text = StyledText::from("a");
        assert_that!(converter.html(&text, false))
            .is_equal_to(String::from("<div>a</div>"));
    }
}
