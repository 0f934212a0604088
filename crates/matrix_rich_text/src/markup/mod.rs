// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! HTML parsing and the HTML to styled text transformation.

pub(crate) mod parser;
mod transformer;

pub(crate) use self::transformer::MarkupTransformer;
