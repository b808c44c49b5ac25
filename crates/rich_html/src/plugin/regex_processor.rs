// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use regex::{Captures, Regex};

use super::TextProcessor;

type Replacer = dyn Fn(&Captures) -> Option<String>;

/// Replaces every match of a regex with what a replacer makes of it.
///
/// Matches the replacer returns `None` for are left as they are.
pub struct RegexProcessor {
    regex: Regex,
    replacer: Box<Replacer>,
}

impl RegexProcessor {
    pub fn new(
        regex: Regex,
        replacer: impl Fn(&Captures) -> Option<String> + 'static,
    ) -> Self {
        Self {
            regex,
            replacer: Box::new(replacer),
        }
    }

    /// Compile `pattern` and build a processor for it.
    pub fn from_pattern(
        pattern: &str,
        replacer: impl Fn(&Captures) -> Option<String> + 'static,
    ) -> Result<Self, regex::Error> {
        Ok(Self::new(Regex::new(pattern)?, replacer))
    }
}

impl TextProcessor for RegexProcessor {
    fn process(&self, text: &str) -> String {
        self.regex
            .replace_all(text, |captures: &Captures| {
                (self.replacer)(captures)
                    .unwrap_or_else(|| captures[0].to_owned())
            })
            .into_owned()
    }
}

#[cfg(test)]
mod test {
    use speculoos::prelude::*;

    use super::*;

    #[test]
    fn replaces_matches() {
        let processor = RegexProcessor::from_pattern(r"\[b\](.*?)\[/b\]", |c| {
            Some(format!("<b>{}</b>", &c[1]))
        })
        .unwrap();
        assert_that!(processor.process("[b]x[/b] and [b]y[/b]"))
            .is_equal_to(String::from("<b>x</b> and <b>y</b>"));
    }

    #[test]
    fn declined_matches_are_untouched() {
        let processor = RegexProcessor::from_pattern(r"\d+", |c| {
            (&c[0] != "2").then(|| String::from("#"))
        })
        .unwrap();
        assert_that!(processor.process("1 2 3"))
            .is_equal_to(String::from("# 2 #"));
    }

    #[test]
    fn invalid_patterns_are_reported() {
        let processor = RegexProcessor::from_pattern("(", |_| None);
        assert_that!(processor.is_err()).is_true();
    }
}
