// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Offsets exposed by this crate are UTF-16 code units, matching the native
//! text APIs documents are rendered with. Rust strings are UTF-8, so the
//! conversions live here and nowhere else.

use std::ops::Range;

use widestring::Utf16String;

/// Number of UTF-16 code units needed to encode `text`.
pub(crate) fn len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// UTF-16 offset of the byte index `byte_index` (which must be a char
/// boundary) in `text`.
pub(crate) fn offset_at_byte(text: &str, byte_index: usize) -> usize {
    len(&text[..byte_index])
}

pub(crate) fn to_utf16(text: &str) -> Utf16String {
    Utf16String::from_str(text)
}

/// The part of `text` covered by the UTF-16 `range`, clamped to the text.
pub(crate) fn substring(text: &str, range: Range<usize>) -> String {
    let wide = to_utf16(text);
    let end = range.end.min(wide.len());
    let start = range.start.min(end);
    String::from_utf16_lossy(&wide.as_slice()[start..end])
}
