// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::source_hints::{
    table_part_index, SourceHints, LEADING_NEWLINE_ELEMENTS, TABLE_PARTS,
};
use super::{PaDom, PaDomCreator, PaDomHandle, PaDomNode, PaNodeContainer};
use crate::dom::{ElementNode, Node, RootNode, ROOT_NAME};
use crate::error::{ConversionError, ConversionResult};

/// Elements nested deeper than this are flattened into their ancestor at
/// this depth, keeping their content.
pub const MAX_NESTING_DEPTH: usize = 256;

/// The tree produced by [HtmlParser::parse_with_report], along with every
/// malformation the parser recovered from while building it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseReport {
    pub root: RootNode,
    pub recovered: Vec<ConversionError>,
}

/// Parses HTML fragments into a [RootNode].
///
/// Parsing is recovery first: unclosed tags are closed at the nearest valid
/// scope, misnested formatting is repaired, and unknown elements and
/// attributes are kept as they are. Nothing is wrapped in implicit
/// paragraphs, and the few things a browser adds or drops on its own (the
/// implied `<tbody>`, the first newline of a `<pre>`, table parts outside
/// a table) are put back the way the source had them.
#[derive(Clone, Debug, Default)]
pub struct HtmlParser;

impl HtmlParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, html: &str) -> ConversionResult<RootNode> {
        self.parse_with_report(html).map(|report| report.root)
    }

    pub fn parse_with_report(
        &self,
        html: &str,
    ) -> ConversionResult<ParseReport> {
        let hints = SourceHints::scan(html);
        let (mut padom, mut recovered) = build(html, "");
        let lost = lost_table_parts(&padom, &hints)?;
        if lost > 0 {
            let (in_template, template_recovered) = build(html, "template");
            if lost_table_parts(&in_template, &hints)? < lost {
                log::trace!("keeping table parts found outside of a table");
                padom = in_template;
                recovered = template_recovered;
            }
        }

        let (children, flattened) = convert(&padom, &hints)?;
        if flattened {
            recovered.push(ConversionError::parse_recoverable(format!(
                "elements nested deeper than {MAX_NESTING_DEPTH} levels were \
                flattened"
            )));
        }
        for error in &recovered {
            log::debug!("{error}");
        }
        Ok(ParseReport {
            root: RootNode::new(children),
            recovered,
        })
    }
}

fn build(html: &str, context: &str) -> (PaDom, Vec<ConversionError>) {
    match PaDomCreator::parse_in(html, context) {
        Ok(padom) => (padom, Vec::new()),
        Err(e) => {
            let recovered = e
                .parse_errors
                .into_iter()
                .map(ConversionError::parse_recoverable)
                .collect();
            (e.dom, recovered)
        }
    }
}

/// The element holding the parsed fragment.
///
/// The arena may contain nodes html5ever created and then discarded; only
/// what is reachable from the document counts. A fragment parse always
/// yields `document > html > ...`, and the children of that `html` element
/// are the parsed fragment.
fn fragment_of(padom: &PaDom) -> ConversionResult<&PaNodeContainer> {
    let PaDomNode::Document(document) = padom.get_document() else {
        return Err(ConversionError::NoRootNode);
    };
    document
        .children
        .iter()
        .find_map(|handle| match padom.get_node(handle) {
            PaDomNode::Container(c) if &*c.name.local == "html" => Some(c),
            _ => None,
        })
        .ok_or(ConversionError::NoRootNode)
}

/// How many table parts of the source are missing from the parsed tree.
fn lost_table_parts(
    padom: &PaDom,
    hints: &SourceHints,
) -> ConversionResult<usize> {
    let mut found = [0; TABLE_PARTS.len()];
    let mut stack: Vec<&PaDomHandle> =
        fragment_of(padom)?.children.iter().collect();
    while let Some(handle) = stack.pop() {
        if let PaDomNode::Container(container) = padom.get_node(handle) {
            if let Some(index) = table_part_index(&container.name.local) {
                found[index] += 1;
            }
            stack.extend(container.children.iter());
        }
    }
    Ok(hints
        .table_parts()
        .iter()
        .zip(found)
        .map(|(expected, found)| expected.saturating_sub(found))
        .sum())
}

/// An element being filled, and the arena children still to visit. Elements
/// past [MAX_NESTING_DEPTH] get a frame without an element, so their
/// children go to the closest ancestor that has one.
struct Frame<'p> {
    element: Option<ElementNode>,
    pending: std::slice::Iter<'p, PaDomHandle>,
}

fn insertion_target<'f>(
    frames: &'f mut [Frame<'_>],
) -> ConversionResult<&'f mut ElementNode> {
    frames
        .iter_mut()
        .rev()
        .find_map(|frame| frame.element.as_mut())
        .ok_or(ConversionError::NoRootNode)
}

/// Convert the parse arena into detached nodes, without recursion. Returns
/// the top level nodes and whether anything had to be flattened.
fn convert(
    padom: &PaDom,
    hints: &SourceHints,
) -> ConversionResult<(Vec<Node>, bool)> {
    let mut frames = vec![Frame {
        element: Some(ElementNode::new(ROOT_NAME)),
        pending: fragment_of(padom)?.children.iter(),
    }];
    let mut depth = 0;
    let mut flattened = false;
    let mut newline_elements = 0;

    while let Some(frame) = frames.last_mut() {
        let Some(handle) = frame.pending.next() else {
            let Some(Frame {
                element: Some(mut element),
                ..
            }) = frames.pop()
            else {
                continue;
            };
            if frames.is_empty() {
                return Ok((element.take_children(), flattened));
            }
            depth -= 1;
            let target = insertion_target(&mut frames)?;
            if element.attributes().is_empty() && hints.is_implied(element.name())
            {
                target.append_children(element.take_children());
            } else {
                target.append_child(element);
            }
            continue;
        };

        match padom.get_node(handle) {
            PaDomNode::Container(child) => {
                let name = &*child.name.local;
                let leading_newline = if LEADING_NEWLINE_ELEMENTS.contains(&name)
                {
                    newline_elements += 1;
                    hints.has_leading_newline(newline_elements - 1)
                } else {
                    false
                };
                let element = if depth < MAX_NESTING_DEPTH {
                    depth += 1;
                    let mut element =
                        ElementNode::with_attributes(name, child.attributes());
                    if leading_newline {
                        element.push_text("\n");
                    }
                    Some(element)
                } else {
                    flattened = true;
                    None
                };
                frames.push(Frame {
                    element,
                    pending: child.children.iter(),
                });
            }
            PaDomNode::Text(text) => {
                insertion_target(&mut frames)?.push_text(&text.content)
            }
            PaDomNode::Comment(comment) => insertion_target(&mut frames)?
                .append_child(Node::comment(comment.content.as_str())),
            PaDomNode::Document(_) => {
                return Err(ConversionError::invariant(
                    "found a document inside a document",
                ))
            }
        }
    }
    Err(ConversionError::NoRootNode)
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use speculoos::{assert_that, prelude::*, AssertionFailure, Spec};

    use super::*;
    use crate::dom::{Attribute, HtmlSerializer};

    trait Roundtrips<T> {
        fn roundtrips(&self);
    }

    impl<'s, T> Roundtrips<T> for Spec<'s, T>
    where
        T: AsRef<str>,
    {
        fn roundtrips(&self) {
            let subject = self.subject.as_ref();
            let root = HtmlParser::new().parse(subject).unwrap();

            // Parsed trees always have consistent handles
            root.check_invariants().unwrap();

            let output = HtmlSerializer::new(false).serialize(&root);
            if output != subject {
                AssertionFailure::from_spec(self)
                    .with_expected(String::from(subject))
                    .with_actual(output)
                    .fail();
            }
        }
    }

    fn serialize(html: &str, pretty_print: bool) -> String {
        let root = HtmlParser::new().parse(html).unwrap();
        HtmlSerializer::new(pretty_print).serialize(&root)
    }

    #[test]
    fn parse_plain_text() {
        assert_that!("some text").roundtrips();
    }

    #[test]
    fn parse_simple_tag() {
        assert_that!("<strong>sdfds</strong>").roundtrips();
    }

    #[test]
    fn parse_nested_unknown_tags() {
        assert_that!("<bold><i>Hello!</i></bold>").roundtrips();
    }

    #[test]
    fn parse_keeps_comments() {
        assert_that!("<!--Hello Sample--><bold><i>Hello!</i></bold>")
            .roundtrips();
    }

    #[test]
    fn parse_keeps_block_comment_regions() {
        assert_that!(
            "<!-- wp:paragraph --><p>Some text</p><!-- /wp:paragraph -->"
        )
        .roundtrips();
    }

    #[test]
    fn parse_tags_with_attributes() {
        assert_that!(r#"<a href="http://example.com" target="_blank">link</a>"#)
            .roundtrips();
    }

    #[test]
    fn parse_br_tag() {
        assert_that!("a<br>b").roundtrips();
    }

    #[test]
    fn parse_lists() {
        assert_that!("<ul><li>one</li><li><ol><li>two</li></ol></li></ul>")
            .roundtrips();
    }

    #[test]
    fn parse_escaped_text() {
        assert_that!("1 &lt; 2 &amp;&amp; 3 &gt; 2").roundtrips();
    }

    #[test]
    fn parse_nbsp_is_kept_as_an_entity() {
        assert_that!("a&nbsp;b").roundtrips();
    }

    #[test]
    fn parse_tables_without_a_tbody() {
        assert_that!("<table><tr><td>a</td></tr></table>").roundtrips();
        assert_that!("<table>\n<tr><td>a</td></tr>\n</table>").roundtrips();
    }

    #[test]
    fn parse_tables_with_a_tbody() {
        assert_that!("<table><tbody><tr><td>a</td></tr></tbody></table>")
            .roundtrips();
    }

    #[test]
    fn parse_pre_with_a_leading_newline() {
        assert_that!("<pre>\nfoo</pre>").roundtrips();
        assert_that!("<pre>foo</pre><pre>\n<b>bar</b></pre>").roundtrips();
    }

    #[test]
    fn parse_stray_table_parts() {
        assert_that!("<td>x</td>").roundtrips();
        assert_that!("<tr><td>x</td></tr>").roundtrips();
        assert_that!("<caption>c</caption>").roundtrips();
    }

    #[test]
    fn deep_nesting_is_flattened() {
        let depth = 3000;
        let html = format!("{}x{}", "<div>".repeat(depth), "</div>".repeat(depth));
        let report = HtmlParser::new().parse_with_report(&html).unwrap();
        report.root.check_invariants().unwrap();
        assert_that!(report.root.raw_text()).is_equal_to(String::from("x"));
        assert!(report.recovered.iter().any(|e| e.to_string().contains("flattened")));

        let mut element = report.root.as_element();
        let mut levels = 0;
        while let Some(Node::Element(child)) = element.children().first() {
            element = child;
            levels += 1;
        }
        assert_that!(levels).is_equal_to(MAX_NESTING_DEPTH);
    }

    #[test]
    fn nesting_up_to_the_limit_is_kept() {
        let depth = MAX_NESTING_DEPTH;
        let html = format!("{}x{}", "<span>".repeat(depth), "</span>".repeat(depth));
        assert_that!(html.as_str()).roundtrips();
    }

    #[test]
    fn unclosed_inline_tag_is_closed_inside_its_block() {
        assert_that!(serialize("<h1><i>italic heading</h1>", false))
            .is_equal_to(String::from("<h1><i>italic heading</i></h1>"));
    }

    #[test]
    fn unknown_unclosed_tag_gets_a_closing_tag() {
        assert_that!(serialize("something something <something>", false))
            .is_equal_to(String::from(
                "something something <something></something>",
            ));
    }

    #[test]
    fn text_is_not_wrapped_in_paragraphs() {
        let root = HtmlParser::new().parse("Hello <b>world</b>").unwrap();
        assert_that!(root.children().len()).is_equal_to(2);
        assert_that!(root.children()[0].name()).is_equal_to("#text");
    }

    #[test]
    fn attributes_keep_order_names_and_values() {
        let root = HtmlParser::new()
            .parse(r#"<img style="a" nostyle peace="123">"#)
            .unwrap();
        let img = root.children()[0].as_element().unwrap();
        assert_that!(img.attributes().to_vec()).is_equal_to(vec![
            Attribute::new("style", "a"),
            Attribute::bare("nostyle"),
            Attribute::new("peace", "123"),
        ]);
        assert_that!(serialize(r#"<img style="a" nostyle peace="123">"#, false))
            .is_equal_to(String::from(r#"<img style="a" nostyle peace="123">"#));
    }

    #[test]
    fn unquoted_and_uppercase_markup_is_normalised() {
        assert_that!(serialize("<SPAN Class=foo>x</SPAN>", false))
            .is_equal_to(String::from(r#"<span class="foo">x</span>"#));
    }

    #[test]
    fn pretty_print_indents_lists() {
        assert_that!(serialize("<ul><li>Item</li><li>Item</li></ul>", true))
            .is_equal_to(String::from(
                "<ul>\n  <li>Item</li>\n  <li>Item</li>\n</ul>",
            ));
    }

    #[test]
    fn pretty_print_indents_nested_lists_per_level() {
        assert_that!(serialize(
            "<ul><li>One<ul><li>Two</li></ul></li></ul>",
            true
        ))
        .is_equal_to(String::from(indoc! {"
            <ul>
              <li>One
                <ul>
                  <li>Two</li>
                </ul>
              </li>
            </ul>"}));
    }

    #[test]
    fn recovered_errors_are_reported() {
        let report = HtmlParser::new()
            .parse_with_report("<h1><i>italic heading</h1>")
            .unwrap();
        assert_that!(report.recovered).is_not_empty();
        assert!(matches!(
            report.recovered[0],
            ConversionError::ParseRecoverable(_)
        ));
    }

    #[test]
    fn valid_html_reports_nothing() {
        let report = HtmlParser::new()
            .parse_with_report("<p>fine</p>")
            .unwrap();
        assert_that!(report.recovered).is_empty();
    }

    #[test]
    fn empty_input_gives_an_empty_root() {
        let root = HtmlParser::new().parse("").unwrap();
        assert_that!(root.children().len()).is_equal_to(0);
    }

    #[test]
    fn parsed_tree_dump() {
        let root = HtmlParser::new()
            .parse(r#"<p class="x">a<b>b</b></p><!--c-->"#)
            .unwrap();
        assert_eq!(
            root.to_tree_string(),
            indoc! {r#"

            ├>p class="x"
            │ ├>"a"
            │ └>b
            │   └>"b"
            └><!--c-->
            "#}
        );
    }
}
