// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Hooks around the conversion pipeline: text and tree processors, and the
//! plugins bundling them.

pub mod attributes;
pub mod caption_shortcode;
pub mod embed_url;
pub mod gallery_shortcode;
pub mod gutenberg;
pub mod html_element_processor;
pub mod processor;
pub mod regex_processor;
pub mod registry;
pub mod shortcode;
mod tag_scanner;
pub mod video_shortcode;

pub use attributes::{
    HtmlAttributes, HtmlAttributesParser, ShortcodeAttributeParser,
    ShortcodeAttributeSerializer,
};
pub use caption_shortcode::CaptionShortcodePlugin;
pub use embed_url::EmbedUrlProcessor;
pub use gallery_shortcode::{
    Gallery, GalleryAttachmentConverter, GalleryElementConverter,
    GalleryOrder, GalleryOrderBy, GalleryShortcodePlugin,
};
pub use gutenberg::{
    is_gutenberg_content, GutenbergInputTreeProcessor,
    GutenbergOutputTreeProcessor, GutenbergPlugin, GutenpackConverter,
};
pub use html_element_processor::{HtmlElement, HtmlElementProcessor};
pub use processor::{
    TextPipelineProcessor, TextProcessor, TreePipelineProcessor, TreeProcessor,
};
pub use regex_processor::RegexProcessor;
pub use registry::{Plugin, PluginRegistry};
pub use shortcode::{Shortcode, ShortcodeProcessor};
pub use tag_scanner::TagType;
pub use video_shortcode::VideoShortcodePlugin;
