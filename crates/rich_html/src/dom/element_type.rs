// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::str::FromStr;

use strum_macros::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Name used by the synthetic node wrapping every parsed fragment. It can
/// never be produced by the HTML tokenizer.
pub const ROOT_NAME: &str = "#root";

/// The HTML elements this crate knows something about. Any other tag name is
/// still kept in the tree, it just has no standard type.
#[derive(
    AsRefStr,
    Clone,
    Copy,
    Debug,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    IntoStaticStr,
    Ord,
    PartialEq,
    PartialOrd,
)]
#[strum(serialize_all = "lowercase")]
pub enum StandardElementType {
    A,
    Address,
    Area,
    B,
    Base,
    Blockquote,
    Br,
    Cite,
    Code,
    Col,
    Dd,
    Del,
    Div,
    Dl,
    Dt,
    Em,
    Embed,
    Fieldset,
    Figcaption,
    Figure,
    Form,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Hr,
    I,
    Iframe,
    Img,
    Input,
    Li,
    Link,
    Mark,
    Meta,
    Noscript,
    Ol,
    P,
    Param,
    Pre,
    #[strum(serialize = "#root")]
    Root,
    S,
    Script,
    Source,
    Span,
    Strike,
    Strong,
    Style,
    Sub,
    Sup,
    Table,
    Td,
    Tr,
    Track,
    U,
    Ul,
    Video,
    Wbr,
}

use StandardElementType::*;

const BLOCK_LEVEL: &[StandardElementType] = &[
    Address, Root, Blockquote, Div, Dl, Dd, Dt, Fieldset, Figure, Figcaption,
    Form, H1, H2, H3, H4, H5, H6, Hr, Li, Noscript, Ol, P, Pre, Table, Td, Tr,
    Ul,
];

const VOID: &[StandardElementType] = &[
    Area, Base, Br, Col, Embed, Hr, Img, Input, Link, Meta, Param, Source,
    Track, Wbr,
];

const MERGEABLE_BLOCK_LEVEL: &[StandardElementType] = &[
    Blockquote, Div, Figure, Figcaption, H1, H2, H3, H4, H5, H6, Hr, Li, Ol,
    Ul, P, Pre,
];

const MERGEABLE_STYLE: &[StandardElementType] = &[
    A, B, Cite, Code, Del, Em, I, Mark, S, Span, Strike, Strong, Sub, Sup, U,
];

/// Elements the styled text model can represent, either through a style
/// attribute or an attachment.
const SUPPORTED_BY_EDITOR: &[StandardElementType] = &[
    A, Root, B, Br, Blockquote, Cite, Code, Del, Div, Em, Figure, Figcaption,
    H1, H2, H3, H4, H5, H6, Hr, I, Img, Li, Mark, Ol, P, Pre, S, Span, Strike,
    Strong, Sub, Sup, U, Ul, Video,
];

impl StandardElementType {
    /// Parse a (case-insensitive) tag name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_str(&name.to_ascii_lowercase()).ok()
    }

    pub fn name(&self) -> &'static str {
        (*self).into()
    }

    pub fn is_block_level(&self) -> bool {
        BLOCK_LEVEL.contains(self)
    }

    pub fn is_void(&self) -> bool {
        VOID.contains(self)
    }

    pub fn is_mergeable_block_level(&self) -> bool {
        MERGEABLE_BLOCK_LEVEL.contains(self)
    }

    pub fn is_mergeable_style(&self) -> bool {
        MERGEABLE_STYLE.contains(self)
    }

    pub fn is_supported_by_editor(&self) -> bool {
        SUPPORTED_BY_EDITOR.contains(self)
    }

    /// Whether two tag names are interchangeable for styling purposes,
    /// e.g. `<b>` and `<strong>`.
    pub fn is_equivalent_to(&self, other: StandardElementType) -> bool {
        match self {
            B | Strong => matches!(other, B | Strong),
            I | Em => matches!(other, I | Em),
            S | Strike | Del => matches!(other, S | Strike | Del),
            _ => *self == other,
        }
    }

    /// The header level (1 to 6) for `h1`..`h6`.
    pub fn header_level(&self) -> Option<u8> {
        match self {
            H1 => Some(1),
            H2 => Some(2),
            H3 => Some(3),
            H4 => Some(4),
            H5 => Some(5),
            H6 => Some(6),
            _ => None,
        }
    }

    pub fn for_header_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(H1),
            2 => Some(H2),
            3 => Some(H3),
            4 => Some(H4),
            5 => Some(H5),
            6 => Some(H6),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn every_type_round_trips_through_its_name() {
        for element_type in StandardElementType::iter() {
            assert_eq!(
                StandardElementType::from_name(element_type.name()),
                Some(element_type)
            );
            assert_eq!(element_type.name(), element_type.as_ref());
        }
    }

    #[test]
    fn names_are_case_insensitive() {
        assert_eq!(StandardElementType::from_name("STRONG"), Some(Strong));
        assert_eq!(StandardElementType::from_name("bold"), None);
    }

    #[test]
    fn bold_and_strong_are_equivalent() {
        assert!(B.is_equivalent_to(Strong));
        assert!(Strong.is_equivalent_to(B));
        assert!(Del.is_equivalent_to(Strike));
        assert!(!B.is_equivalent_to(I));
        assert!(U.is_equivalent_to(U));
    }

    #[test]
    fn classification_tables() {
        assert!(Root.is_block_level());
        assert!(Li.is_block_level());
        assert!(!Span.is_block_level());
        assert!(Img.is_void());
        assert!(!P.is_void());
        assert!(Ul.is_mergeable_block_level());
        assert!(!Table.is_mergeable_block_level());
        assert!(Strong.is_mergeable_style());
        assert!(!Img.is_mergeable_style());
        assert!(!Table.is_supported_by_editor());
    }

    #[test]
    fn header_levels() {
        assert_eq!(H3.header_level(), Some(3));
        assert_eq!(P.header_level(), None);
        assert_eq!(StandardElementType::for_header_level(6), Some(H6));
        assert_eq!(StandardElementType::for_header_level(7), None);
    }
}
