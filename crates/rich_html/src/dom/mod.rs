// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

pub mod attribute;
pub mod css;
pub mod dom_handle;
pub mod element_type;
pub mod html_serializer;
pub mod nodes;
pub mod parser;

pub use attribute::{Attribute, AttributeValue};
pub use css::{CssAttribute, CssAttributeMatcher, CssParser};
pub use dom_handle::DomHandle;
pub use element_type::{StandardElementType, ROOT_NAME};
pub use html_serializer::{
    ElementToTagConverter, GenericElementToTagConverter, HtmlSerializer,
};
pub use nodes::{CommentNode, ElementNode, Node, RootNode, TextNode};
pub use parser::{HtmlParser, ParseReport};
