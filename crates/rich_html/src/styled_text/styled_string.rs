// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::fmt;
use std::ops::Range;

use super::{Attachment, StyleAttributes};
use crate::error::{ConversionError, ConversionResult};

/// Stands in for an attachment.
pub const OBJECT_REPLACEMENT: char = '\u{FFFC}';
/// A line break inside a paragraph, written as `<br>`.
pub const LINE_SEPARATOR: char = '\u{2028}';
pub const PARAGRAPH_SEPARATOR: char = '\n';
/// Accepted as a paragraph separator too.
pub const UNICODE_PARAGRAPH_SEPARATOR: char = '\u{2029}';

pub fn is_paragraph_separator(c: char) -> bool {
    c == PARAGRAPH_SEPARATOR || c == UNICODE_PARAGRAPH_SEPARATOR
}

/// A run of text sharing one set of attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StyledRun {
    pub text: String,
    pub attributes: StyleAttributes,
}

impl StyledRun {
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// One paragraph of a [StyledText]: `content` excludes the separator that
/// ends it, `enclosing` includes it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParagraphRange {
    pub content: Range<usize>,
    pub enclosing: Range<usize>,
}

/// One paragraph cut out of a [StyledText], without its separator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Paragraph {
    pub content: StyledText,
    /// The attributes of the first character, which is the separator of an
    /// empty paragraph.
    pub attributes: StyleAttributes,
}

/// Text annotated with [StyleAttributes].
///
/// Indices are in chars. Runs are never empty and two neighbouring runs
/// never have equal attributes: they are merged as they are added.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyledText {
    runs: Vec<StyledRun>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn styled(text: impl Into<String>, attributes: StyleAttributes) -> Self {
        let mut styled = Self::new();
        styled.push(text, attributes);
        styled
    }

    /// A single attachment character.
    pub fn attachment(attachment: Attachment, attributes: StyleAttributes) -> Self {
        Self::styled(
            OBJECT_REPLACEMENT,
            StyleAttributes {
                attachment: Some(attachment),
                ..attributes
            },
        )
    }

    pub fn push(&mut self, text: impl Into<String>, attributes: StyleAttributes) {
        let text = text.into();
        if text.is_empty() {
            return;
        }
        match self.runs.last_mut() {
            Some(last) if last.attributes == attributes => {
                last.text.push_str(&text)
            }
            _ => self.runs.push(StyledRun { text, attributes }),
        }
    }

    pub fn append(&mut self, other: StyledText) {
        for run in other.runs {
            self.push(run.text, run.attributes);
        }
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.runs.iter().map(StyledRun::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Runs along with the range each one covers.
    pub fn runs_with_ranges(
        &self,
    ) -> impl Iterator<Item = (Range<usize>, &StyledRun)> + '_ {
        let mut start = 0;
        self.runs.iter().map(move |run| {
            let end = start + run.len();
            let range = start..end;
            start = end;
            (range, run)
        })
    }

    pub fn attributes_at(&self, index: usize) -> Option<&StyleAttributes> {
        self.runs_with_ranges()
            .find(|(range, _)| range.contains(&index))
            .map(|(_, run)| &run.attributes)
    }

    /// The part of the text inside `range`, clamped to the text.
    pub fn slice(&self, range: Range<usize>) -> StyledText {
        let mut out = StyledText::new();
        for (run_range, run) in self.runs_with_ranges() {
            let start = range.start.max(run_range.start);
            let end = range.end.min(run_range.end);
            if start >= end {
                continue;
            }
            let text: String = run
                .text
                .chars()
                .skip(start - run_range.start)
                .take(end - start)
                .collect();
            out.push(text, run.attributes.clone());
        }
        out
    }

    fn check_range(&self, range: &Range<usize>) -> ConversionResult<()> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            Err(ConversionError::invariant(format!(
                "range {}..{} is outside styled text of length {len}",
                range.start, range.end
            )))
        } else {
            Ok(())
        }
    }

    /// Put `replacement` where `range` was. The range must lie inside the
    /// text.
    pub fn replace_range(
        &mut self,
        range: Range<usize>,
        replacement: StyledText,
    ) -> ConversionResult<()> {
        self.check_range(&range)?;
        let len = self.len();
        let mut result = self.slice(0..range.start);
        result.append(replacement);
        result.append(self.slice(range.end..len));
        *self = result;
        Ok(())
    }

    /// Change the attributes of everything inside `range`.
    pub fn apply(
        &mut self,
        range: Range<usize>,
        mut change: impl FnMut(&mut StyleAttributes),
    ) -> ConversionResult<()> {
        self.check_range(&range)?;
        let mut middle = self.slice(range.clone());
        let runs = std::mem::take(&mut middle.runs);
        for mut run in runs {
            change(&mut run.attributes);
            middle.push(run.text, run.attributes);
        }
        self.replace_range(range, middle)
    }

    /// Split into paragraphs. A trailing separator does not start a new,
    /// empty paragraph.
    pub fn paragraph_ranges(&self) -> Vec<ParagraphRange> {
        let mut ranges = Vec::new();
        let mut start = 0;
        let mut index = 0;
        for run in &self.runs {
            for c in run.text.chars() {
                if is_paragraph_separator(c) {
                    ranges.push(ParagraphRange {
                        content: start..index,
                        enclosing: start..index + 1,
                    });
                    start = index + 1;
                }
                index += 1;
            }
        }
        if start < index {
            ranges.push(ParagraphRange {
                content: start..index,
                enclosing: start..index,
            });
        }
        ranges
    }

    /// Split into paragraphs in a single pass over the runs. Paragraphs
    /// are cut the same way as by [StyledText::paragraph_ranges].
    pub fn paragraphs(&self) -> Vec<Paragraph> {
        let mut paragraphs = Vec::new();
        let mut content = StyledText::new();
        let mut first: Option<&StyleAttributes> = None;
        for run in &self.runs {
            let mut rest = run.text.as_str();
            while !rest.is_empty() {
                if first.is_none() {
                    first = Some(&run.attributes);
                }
                let Some(at) = rest.find(is_paragraph_separator) else {
                    content.push(rest, run.attributes.clone());
                    break;
                };
                content.push(&rest[..at], run.attributes.clone());
                paragraphs.push(Paragraph {
                    content: std::mem::take(&mut content),
                    attributes: first.take().cloned().unwrap_or_default(),
                });
                let separator_len =
                    rest[at..].chars().next().map_or(1, char::len_utf8);
                rest = &rest[at + separator_len..];
            }
        }
        if let Some(attributes) = first {
            paragraphs.push(Paragraph {
                content,
                attributes: attributes.clone(),
            });
        }
        paragraphs
    }

    /// The paragraphs touched by `range`, as one range.
    pub fn paragraph_range_around(&self, range: Range<usize>) -> Range<usize> {
        let touched: Vec<Range<usize>> = self
            .paragraph_ranges()
            .into_iter()
            .map(|p| p.enclosing)
            .filter(|p| {
                (p.start < range.end && range.start < p.end)
                    || (range.is_empty() && p.contains(&range.start))
            })
            .collect();
        match (touched.first(), touched.last()) {
            (Some(first), Some(last)) => first.start..last.end,
            _ => range,
        }
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        Self::styled(text, StyleAttributes::default())
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        Self::styled(text, StyleAttributes::default())
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for run in &self.runs {
            f.write_str(&run.text)?;
        }
        Ok(())
    }
}
