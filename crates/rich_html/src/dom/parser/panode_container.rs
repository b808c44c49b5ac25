// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::QualName;

use super::PaDomHandle;
use crate::dom::Attribute;

/// Attributes whose empty value means something, so `alt=""` must not be
/// turned into a bare `alt`.
const KEEP_EMPTY_VALUE: &[&str] =
    &["alt", "content", "href", "placeholder", "src", "title", "value"];

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeContainer {
    pub(crate) name: QualName,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<PaDomHandle>,
}

impl PaNodeContainer {
    /// The attributes in source order. html5ever reports boolean attributes
    /// with an empty value; those become value-less attributes.
    pub(crate) fn attributes(&self) -> Vec<Attribute> {
        self.attrs
            .iter()
            .map(|(name, value)| {
                if value.is_empty() && !KEEP_EMPTY_VALUE.contains(&name.as_str())
                {
                    Attribute::bare(name.as_str())
                } else {
                    Attribute::new(name.as_str(), value.as_str())
                }
            })
            .collect()
    }
}
