// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! HTML tree to styled text.

pub mod attribute_converter;
pub mod break_converters;
pub mod element_converter;
pub mod generic_converter;
pub mod li_converter;
pub mod media_converters;
pub mod styled_text_serializer;

pub use attribute_converter::{
    AttributeConverter, CssAttributeConverter, PipelineAttributeConverter,
};
pub use break_converters::{BrElementConverter, HrElementConverter};
pub use element_converter::{ContentSerializer, ElementConverter};
pub use generic_converter::GenericElementConverter;
pub use li_converter::LiElementConverter;
pub use media_converters::{
    FigureElementConverter, ImageElementConverter, VideoElementConverter,
};
pub use styled_text_serializer::{
    default_element_converters, StyledTextSerializer,
};
