// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

/// Why a markup fragment could not be turned into a tree.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HtmlParseError {
    #[error("the parsed fragment has no root element")]
    NoRoot,
}

/// Why no document could be built.
///
/// Everything short of a parse failure degrades to a document with fewer
/// attributes instead.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("failed to parse HTML: {0}")]
    HtmlParse(#[from] HtmlParseError),
}
