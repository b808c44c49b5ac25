// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use thiserror::Error;

/// Errors produced while converting between HTML, node trees and styled
/// text.
///
/// Conversions only ever return [ConversionError::NoRootNode] and
/// [ConversionError::InvariantViolation]; building a converter can also
/// fail with [ConversionError::DuplicatePlugin]. The remaining variants are
/// produced internally, logged, and recovered from.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ConversionError {
    /// A malformed construct in the input HTML that the parser corrected.
    #[error("recovered from malformed HTML: {0}")]
    ParseRecoverable(String),

    /// The parser did not produce any document to build a tree from.
    #[error("the parsed document has no root node")]
    NoRootNode,

    /// An internal structural invariant was broken. This is a bug in this
    /// crate, not a problem with the input.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A set of style attributes that cannot be written as valid HTML.
    #[error("unsupported style combination: {0}")]
    UnsupportedStyleCombination(String),

    /// Two plugins with the same identifier were registered.
    #[error("a plugin with identifier {0} is already registered")]
    DuplicatePlugin(String),
}

pub type ConversionResult<T> = Result<T, ConversionError>;

impl ConversionError {
    pub fn parse_recoverable(msg: impl Into<String>) -> Self {
        Self::ParseRecoverable(msg.into())
    }

    pub fn unsupported_style(msg: impl Into<String>) -> Self {
        Self::UnsupportedStyleCombination(msg.into())
    }

    /// Build an invariant violation. With the `assert-invariants` feature
    /// enabled this panics instead, so broken invariants are caught where
    /// they happen.
    pub fn invariant(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        cfg_if::cfg_if! {
            if #[cfg(feature = "assert-invariants")] {
                panic!("invariant violation: {msg}");
            } else {
                Self::InvariantViolation(msg)
            }
        }
    }
}
