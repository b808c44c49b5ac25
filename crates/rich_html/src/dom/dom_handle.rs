// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::fmt;

/// The position of a node in a tree, as the list of child indices leading to
/// it from the root. The root itself has an empty path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomHandle {
    path: Vec<usize>,
}

impl DomHandle {
    pub fn root() -> Self {
        Self { path: Vec::new() }
    }

    pub fn from_raw(path: Vec<usize>) -> Self {
        Self { path }
    }

    pub fn raw(&self) -> &[usize] {
        &self.path
    }

    pub fn is_root(&self) -> bool {
        self.path.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    pub fn parent_handle(&self) -> Option<DomHandle> {
        let (_, parent) = self.path.split_last()?;
        Some(Self::from_raw(parent.to_vec()))
    }

    pub fn child_handle(&self, index: usize) -> DomHandle {
        let mut path = self.path.clone();
        path.push(index);
        Self { path }
    }

    pub fn index_in_parent(&self) -> Option<usize> {
        self.path.last().copied()
    }

    pub fn next_sibling(&self) -> Option<DomHandle> {
        let index = self.index_in_parent()?;
        self.parent_handle().map(|p| p.child_handle(index + 1))
    }

    /// Append a path relative to this handle.
    pub fn join(&self, relative: &[usize]) -> DomHandle {
        let mut path = self.path.clone();
        path.extend_from_slice(relative);
        Self { path }
    }

    pub fn is_ancestor_of(&self, other: &DomHandle) -> bool {
        other.path.len() > self.path.len() && other.path.starts_with(&self.path)
    }
}

impl fmt::Display for DomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.path)
    }
}
