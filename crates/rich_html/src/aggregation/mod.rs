// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Styled text back to an HTML tree.

pub mod attachment_converters;
pub mod paragraph_converters;
pub mod style_aggregators;
pub mod style_toggler;
pub mod styled_text_parser;

pub use attachment_converters::{
    default_attachment_converters, AttachmentToElementConverter,
    CommentAttachmentConverter, CustomAttachmentConverter,
    HtmlAttachmentConverter, ImageAttachmentConverter,
    LineAttachmentConverter, VideoAttachmentConverter,
};
pub use paragraph_converters::{
    default_paragraph_converters, DefaultParagraphConverter,
    ParagraphToElementConverter, StoredParagraphConverter,
};
pub use style_aggregators::{
    default_style_aggregators, ConditionalStyleAggregator, LinkStyleAggregator,
    MarkStyleAggregator, StyleAggregator, ToggledStyleAggregator,
    UnsupportedHtmlAggregator,
};
pub use style_toggler::HtmlStyleToggler;
pub use styled_text_parser::StyledTextParser;
