// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The styled text model: text split in runs of [StyleAttributes], the
//! structure the converters produce from HTML and read back to HTML.

pub mod attachment;
pub mod formatter;
pub mod representation;
pub mod style_attributes;
pub mod styled_string;

pub use attachment::{
    Attachment, CustomAttachment, ImageAlignment, ImageAttachment, ImageSize,
    SourceLayout, VideoAttachment, VideoSource,
};
pub use formatter::Formatter;
pub use representation::{ElementRepresentation, StyleRepresentation};
pub use style_attributes::{
    ListKind, ParagraphKind, ParagraphProperty, StyleAttributes, StyleKey,
};
pub use styled_string::{
    is_paragraph_separator, Paragraph, ParagraphRange, StyledRun, StyledText,
    LINE_SEPARATOR, OBJECT_REPLACEMENT, PARAGRAPH_SEPARATOR,
    UNICODE_PARAGRAPH_SEPARATOR,
};
