// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

mod padom;
mod padom_creator;
mod panode_container;
mod parse;
mod source_hints;

use padom::{
    paqual_name, PaDom, PaDomCreationError, PaDomHandle, PaDomNode,
    PaNodeComment, PaNodeText,
};
use padom_creator::PaDomCreator;
use panode_container::PaNodeContainer;

pub use parse::{HtmlParser, ParseReport, MAX_NESTING_DEPTH};
