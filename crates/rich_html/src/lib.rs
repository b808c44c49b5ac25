// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Conversion between HTML and the styled text of a rich text editor.
//!
//! HTML is parsed into a node tree, the tree is converted to [StyledText],
//! and styled text is turned back into a tree and serialized. The way each
//! style was spelled in the input is remembered, so HTML that goes through
//! the editor unchanged comes out as it went in.

pub mod aggregation;
pub mod config;
pub mod converters;
pub mod dom;
mod error;
mod html_converter;
pub mod plugin;
pub mod styled_text;

pub use crate::aggregation::{
    AttachmentToElementConverter, ParagraphToElementConverter,
    StyleAggregator, StyledTextParser,
};
pub use crate::config::ConverterConfig;
pub use crate::converters::{
    ContentSerializer, ElementConverter, StyledTextSerializer,
};
pub use crate::dom::{
    Attribute, AttributeValue, CssAttribute, CssParser, DomHandle,
    ElementNode, ElementToTagConverter, HtmlParser, HtmlSerializer, Node,
    RootNode, StandardElementType,
};
pub use crate::error::{ConversionError, ConversionResult};
pub use crate::html_converter::{HtmlConverter, HtmlConverterBuilder};
pub use crate::plugin::{
    CaptionShortcodePlugin, GalleryShortcodePlugin, GutenbergPlugin, Plugin,
    PluginRegistry, TextProcessor, TreeProcessor, VideoShortcodePlugin,
};
pub use crate::styled_text::{
    Attachment, Formatter, StyleAttributes, StyleRepresentation, StyledText,
};
