// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use once_cell::sync::Lazy;
use regex::Regex;

static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static OPENING_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([A-Za-z][A-Za-z0-9]*)(?:\s[^>]*)?/?>(\r?\n)?").unwrap()
});

/// Table parts the tree builder drops when they appear outside a table.
pub(crate) const TABLE_PARTS: [&str; 9] = [
    "caption", "col", "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Table parts the tree builder inserts on its own, e.g. the `<tbody>`
/// between a `<table>` and its `<tr>`.
const IMPLIED_TABLE_PARTS: [&str; 3] = ["colgroup", "tbody", "tr"];

/// Elements whose first newline is swallowed by the tree builder.
pub(crate) const LEADING_NEWLINE_ELEMENTS: [&str; 3] =
    ["listing", "pre", "textarea"];

/// What the source text says about the markup the tree builder rewrites.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SourceHints {
    table_parts: [usize; TABLE_PARTS.len()],
    leading_newlines: Vec<bool>,
}

impl SourceHints {
    pub fn scan(html: &str) -> Self {
        let without_comments = COMMENT.replace_all(html, "");
        let mut hints = Self::default();
        for captures in OPENING_TAG.captures_iter(&without_comments) {
            let name = captures[1].to_ascii_lowercase();
            if let Some(index) = table_part_index(&name) {
                hints.table_parts[index] += 1;
            }
            if LEADING_NEWLINE_ELEMENTS.contains(&name.as_str()) {
                hints.leading_newlines.push(captures.get(2).is_some());
            }
        }
        hints
    }

    /// Number of opening tags of each of [TABLE_PARTS] in the source.
    pub fn table_parts(&self) -> &[usize; TABLE_PARTS.len()] {
        &self.table_parts
    }

    /// Whether the `index`th `<pre>`, `<listing>` or `<textarea>` of the
    /// source started with a newline.
    pub fn has_leading_newline(&self, index: usize) -> bool {
        self.leading_newlines.get(index).copied().unwrap_or(false)
    }

    /// Whether an attribute-less `name` element in the tree was made up by
    /// the tree builder rather than written in the source.
    pub fn is_implied(&self, name: &str) -> bool {
        IMPLIED_TABLE_PARTS.contains(&name)
            && table_part_index(name).map_or(false, |i| self.table_parts[i] == 0)
    }
}

pub(crate) fn table_part_index(name: &str) -> Option<usize> {
    TABLE_PARTS.iter().position(|part| *part == name)
}
