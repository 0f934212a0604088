// Copyright 2024 New Vector Ltd.
// Copyright 2023 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Conversion between Matrix permalinks and the entities they point at.
//!
//! Supported forms are `https://matrix.to/#/…` links, `matrix:` URIs and,
//! with the `custom-matrix-urls` feature, links hosted by a Matrix client
//! (`https://app.example.org/#/room/…`).

mod permalink;

pub use crate::permalink::{
    build_permalink, is_permalink, parse_permalink, Entity, PermalinkError,
};
