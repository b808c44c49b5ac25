// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::dom::StandardElementType;

/// Settings shared by both conversion directions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConverterConfig {
    /// Spaces per nesting level when pretty printing.
    pub pretty_print_indentation: usize,
    /// Written around paragraphs that carry no paragraph properties.
    pub default_paragraph_element: StandardElementType,
    /// Wrap a lone property-less paragraph too, instead of emitting it bare.
    pub always_wrap_paragraphs: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            pretty_print_indentation: 2,
            default_paragraph_element: StandardElementType::P,
            always_wrap_paragraphs: false,
        }
    }
}
