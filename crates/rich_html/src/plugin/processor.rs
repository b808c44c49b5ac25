// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::RootNode;

/// Rewrites HTML (or any text) before it is parsed or after it is
/// serialized.
///
/// A processor that finds nothing to do returns its input unchanged.
pub trait TextProcessor {
    fn process(&self, text: &str) -> String;
}

impl<F> TextProcessor for F
where
    F: Fn(&str) -> String,
{
    fn process(&self, text: &str) -> String {
        self(text)
    }
}

/// Rewrites a parsed tree in place.
pub trait TreeProcessor {
    fn process(&self, root: &mut RootNode);
}

impl<F> TreeProcessor for F
where
    F: Fn(&mut RootNode),
{
    fn process(&self, root: &mut RootNode) {
        self(root)
    }
}

/// Runs text processors left to right, each one receiving the output of
/// the previous one.
#[derive(Default)]
pub struct TextPipelineProcessor {
    processors: Vec<Box<dyn TextProcessor>>,
}

impl TextPipelineProcessor {
    pub fn new(processors: Vec<Box<dyn TextProcessor>>) -> Self {
        Self { processors }
    }

    pub fn push(&mut self, processor: impl TextProcessor + 'static) {
        self.processors.push(Box::new(processor));
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl TextProcessor for TextPipelineProcessor {
    fn process(&self, text: &str) -> String {
        self.processors
            .iter()
            .fold(text.to_owned(), |text, processor| processor.process(&text))
    }
}

/// Runs tree processors in order over the same tree.
#[derive(Default)]
pub struct TreePipelineProcessor {
    processors: Vec<Box<dyn TreeProcessor>>,
}

impl TreePipelineProcessor {
    pub fn new(processors: Vec<Box<dyn TreeProcessor>>) -> Self {
        Self { processors }
    }

    pub fn push(&mut self, processor: impl TreeProcessor + 'static) {
        self.processors.push(Box::new(processor));
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl TreeProcessor for TreePipelineProcessor {
    fn process(&self, root: &mut RootNode) {
        for processor in &self.processors {
            processor.process(root);
        }
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;
    use crate::dom::{ElementNode, HtmlSerializer, Node};

    #[test]
    fn text_stages_feed_each_other() {
        let pipeline = TextPipelineProcessor::new(vec![
            Box::new(|text: &str| text.replace("[b]", "<b>")),
            Box::new(|text: &str| text.replace("<b>", "<strong>")),
        ]);
        assert_that!(pipeline.process("[b]x")).is_equal_to(String::from("<strong>x"));
    }

    #[test]
    fn empty_text_pipeline_is_identity() {
        let pipeline = TextPipelineProcessor::default();
        assert_that!(pipeline.is_empty()).is_true();
        assert_that!(pipeline.process("<p>a</p>"))
            .is_equal_to(String::from("<p>a</p>"));
    }

    #[test]
    fn tree_stages_run_in_order() {
        let mut pipeline = TreePipelineProcessor::default();
        pipeline.push(|root: &mut RootNode| {
            root.append_child(Node::text("a"));
        });
        pipeline.push(|root: &mut RootNode| {
            let children = root.take_children();
            root.append_child(ElementNode::new("b").with_children(children));
        });
        let mut root = RootNode::new(Vec::new());
        pipeline.process(&mut root);
        assert_that!(HtmlSerializer::new(false).serialize(&root))
            .is_equal_to(String::from("<b>a</b>"));
    }
}
