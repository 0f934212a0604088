// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::num::NonZeroUsize;

pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000)
{
    Some(capacity) => capacity,
    None => panic!("cache capacity must be non-zero"),
};

/// Settings shared by a [`crate::DocumentCache`] and the builders using it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RichTextConfig {
    /// Maximum number of documents kept per cache namespace.
    pub cache_capacity: NonZeroUsize,
    /// Rewrite links whose text pretends to point somewhere else.
    pub detect_phishing: bool,
}

impl Default for RichTextConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            detect_phishing: true,
        }
    }
}
