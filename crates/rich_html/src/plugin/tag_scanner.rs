// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// How a tag found in text was written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagType {
    /// `<tag/>` or `[tag/]`.
    SelfClosing,
    /// An opening tag followed later by its closing tag.
    Closed,
    /// An opening tag with no closing tag anywhere after it.
    Single,
}

/// One occurrence of a tag found by a [TagScanner].
pub(crate) struct ScannedTag<'t> {
    pub(crate) arguments: &'t str,
    pub(crate) tag_type: TagType,
    pub(crate) content: Option<&'t str>,
}

static HTML_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([A-Za-z][\w-]*)((?:\s[^>]*?)?)(/)?>").unwrap()
});

static SHORTCODE_OPENING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[(\[?)([\w-]+)((?:\s[^\]]*?)?)(/)?\]").unwrap()
});

/// Finds the occurrences of one tag in text written either as HTML
/// (`<tag ...>content</tag>`) or as shortcodes (`[tag ...]content[/tag]`),
/// and replaces them.
///
/// Tag names match case-insensitively and must be followed by whitespace,
/// `/` or the closing bracket, so `video` never matches `<video-js>`. The
/// content of a closed tag runs up to the first closing tag, nested tags of
/// the same name are not paired.
pub(crate) struct TagScanner {
    tag: String,
    opening: &'static Regex,
    closing: String,
    escapable: bool,
}

impl TagScanner {
    pub(crate) fn html(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            opening: &HTML_OPENING,
            closing: format!("</{}>", tag.to_ascii_lowercase()),
            escapable: false,
        }
    }

    /// `[[tag]]` is an escaped shortcode and is left alone.
    pub(crate) fn shortcode(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            opening: &SHORTCODE_OPENING,
            closing: format!("[/{}]", tag.to_ascii_lowercase()),
            escapable: true,
        }
    }

    /// Replace every occurrence of the tag with what `replacer` returns
    /// for it. Occurrences for which it returns `None` are kept verbatim.
    pub(crate) fn replace_all<F>(&self, text: &str, mut replacer: F) -> String
    where
        F: FnMut(ScannedTag<'_>) -> Option<String>,
    {
        let lowercase = text.to_ascii_lowercase();
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut search_from = 0;

        while let Some(captures) = self.opening.captures_at(text, search_from) {
            let opening = &captures[0];
            let start = captures.get(0).map_or(0, |m| m.start());
            let opening_end = start + opening.len();

            if !self.names_tag(&captures) {
                search_from = self.next_search_start(text, start);
                continue;
            }

            let self_closing = self.self_closing_group(&captures).is_some();
            let (tag_type, content, end) = if self_closing {
                (TagType::SelfClosing, None, opening_end)
            } else {
                match lowercase[opening_end..].find(&self.closing) {
                    Some(offset) => {
                        let content_end = opening_end + offset;
                        (
                            TagType::Closed,
                            Some(&text[opening_end..content_end]),
                            content_end + self.closing.len(),
                        )
                    }
                    None => (TagType::Single, None, opening_end),
                }
            };

            if self.is_escaped(&captures, text, end) {
                search_from = end;
                continue;
            }

            let scanned = ScannedTag {
                arguments: self.arguments_group(&captures),
                tag_type,
                content,
            };
            if let Some(replacement) = replacer(scanned) {
                out.push_str(&text[copied..start]);
                out.push_str(&replacement);
                copied = end;
            }
            search_from = end;
        }
        out.push_str(&text[copied..]);
        out
    }

    fn names_tag(&self, captures: &Captures) -> bool {
        let group = if self.escapable { 2 } else { 1 };
        captures
            .get(group)
            .map_or(false, |m| m.as_str().eq_ignore_ascii_case(&self.tag))
    }

    fn arguments_group<'t>(&self, captures: &Captures<'t>) -> &'t str {
        let group = if self.escapable { 3 } else { 2 };
        captures.get(group).map_or("", |m| m.as_str())
    }

    fn self_closing_group<'t>(&self, captures: &Captures<'t>) -> Option<&'t str> {
        let group = if self.escapable { 4 } else { 3 };
        captures.get(group).map(|m| m.as_str())
    }

    fn is_escaped(&self, captures: &Captures, text: &str, end: usize) -> bool {
        self.escapable
            && captures.get(1).map_or(false, |m| !m.as_str().is_empty())
            && text[end..].starts_with(']')
    }

    /// Resume just after the `<` or `[` of a tag we are not interested in,
    /// so an occurrence hidden inside its arguments is still found.
    fn next_search_start(&self, text: &str, start: usize) -> usize {
        start
            + text[start..]
                .chars()
                .next()
                .map_or(1, char::len_utf8)
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;

    fn describe(scanner: &TagScanner, text: &str) -> String {
        scanner.replace_all(text, |tag| {
            Some(format!(
                "{{{:?}|{}|{}}}",
                tag.tag_type,
                tag.arguments.trim(),
                tag.content.unwrap_or("-")
            ))
        })
    }

    #[test]
    fn finds_the_three_kinds_of_html_tags() {
        let scanner = TagScanner::html("video");
        assert_that!(describe(&scanner, r#"a<video src="x"/>b"#))
            .is_equal_to(String::from(r#"a{SelfClosing|src="x"|-}b"#));
        assert_that!(describe(&scanner, r#"<VIDEO src="x">in</Video>"#))
            .is_equal_to(String::from(r#"{Closed|src="x"|in}"#));
        assert_that!(describe(&scanner, "<video>after"))
            .is_equal_to(String::from("{Single||-}after"));
    }

    #[test]
    fn longer_tag_names_do_not_match() {
        let scanner = TagScanner::html("video");
        let text = "<video-js src=\"x\"></video-js><videos>";
        assert_that!(describe(&scanner, text)).is_equal_to(String::from(text));
    }

    #[test]
    fn slashes_inside_arguments_are_not_self_closing() {
        let scanner = TagScanner::html("img");
        assert_that!(describe(&scanner, r#"<img src="a/b.png">"#))
            .is_equal_to(String::from(r#"{Single|src="a/b.png"|-}"#));
    }

    #[test]
    fn finds_shortcodes() {
        let scanner = TagScanner::shortcode("caption");
        assert_that!(describe(&scanner, r#"[caption id="1"]A cat[/caption] x"#))
            .is_equal_to(String::from(r#"{Closed|id="1"|A cat} x"#));
        assert_that!(describe(&scanner, "[caption/]"))
            .is_equal_to(String::from("{SelfClosing||-}"));
    }

    #[test]
    fn escaped_shortcodes_are_left_alone() {
        let scanner = TagScanner::shortcode("video");
        let text = "[[video src=\"a.mp4\"]]";
        assert_that!(describe(&scanner, text)).is_equal_to(String::from(text));
    }

    #[test]
    fn declined_matches_are_kept() {
        let scanner = TagScanner::html("b");
        let out = scanner.replace_all("<b>1</b><b>2</b>", |tag| {
            (tag.content == Some("2")).then(|| String::from("two"))
        });
        assert_that!(out).is_equal_to(String::from("<b>1</b>two"));
    }
}
