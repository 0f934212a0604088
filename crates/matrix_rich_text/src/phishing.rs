// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Spotting links whose visible text pretends to go somewhere else.
//!
//! Only links that were explicit in the markup are checked. A link is a
//! phishing attempt when its text, once lookalike characters are folded
//! and decorations trimmed, reads as a Matrix identifier or URL that is
//! not the one the link really points at.

use std::ops::Range;

use matrix_mentions::Entity;
use percent_encoding::percent_decode_str;
use unicode_segmentation::UnicodeSegmentation;
use url::{form_urlencoded, Url};

use crate::attributed_text::AttributedText;
use crate::attributes::Attribute;
use crate::entity_regex::{
    find_trimmed, hyperlink_target, is_exact_room_alias, is_exact_user_id,
    LINK, ROOM_ALIAS, USER_ID,
};
use crate::permalink::classify_permalink;

/// Scheme of the pseudo-URL that replaces a suspicious link.
pub const CONFIRMATION_SCHEME: &str = "confirm";

const INTERNAL_URL_KEY: &str = "internalURL";
const DISPLAY_STRING_KEY: &str = "displayString";

/// Characters, besides letters and digits, that may start or end the
/// meaningful part of a link's text.
const SIGNIFICANT_PUNCTUATION: &[char] =
    &['@', '#', '!', '$', '/', '%', '+', '=', '_', '~', '&', '-'];

/// What the renderer needs to warn before following a suspicious link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmUrlParameters {
    pub internal_url: String,
    pub display_string: String,
}

impl ConfirmUrlParameters {
    pub fn to_url(&self) -> String {
        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair(INTERNAL_URL_KEY, &self.internal_url)
            .append_pair(DISPLAY_STRING_KEY, &self.display_string)
            .finish();
        format!("{CONFIRMATION_SCHEME}://?{query}")
    }

    pub fn from_url(url: &str) -> Option<Self> {
        let url = Url::parse(url).ok()?;
        if url.scheme() != CONFIRMATION_SCHEME {
            return None;
        }
        let mut internal_url = None;
        let mut display_string = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                INTERNAL_URL_KEY => internal_url = Some(value.into_owned()),
                DISPLAY_STRING_KEY => display_string = Some(value.into_owned()),
                _ => {}
            }
        }
        Some(Self {
            internal_url: internal_url?,
            display_string: display_string?,
        })
    }
}

/// Whether a link showing `display` but leading to `url` is a spoof.
pub fn is_phishing_attempt(display: &str, url: &str) -> bool {
    let normalized = fold_confusables(display);
    let candidate = trim_decorations(&normalized);
    let target = classify_permalink(url);

    if is_exact_user_id(candidate) || is_exact_room_alias(candidate) {
        return !names_target(candidate, target.as_ref());
    }

    // Identifiers inside longer text, e.g. "Alice (@alice:example.org)"
    let identifiers: Vec<Range<usize>> = find_trimmed(&USER_ID, &normalized)
        .into_iter()
        .chain(find_trimmed(&ROOM_ALIAS, &normalized))
        .collect();
    if !identifiers.is_empty() {
        return !identifiers.iter().any(|range| {
            names_target(&normalized[range.clone()], target.as_ref())
        });
    }

    match find_trimmed(&LINK, &normalized).into_iter().next() {
        Some(link) => {
            sanitize(&hyperlink_target(&normalized[link])) != sanitize(url)
        }
        None => false,
    }
}

/// Whether `identifier` is the user or alias that `target` points at.
fn names_target(identifier: &str, target: Option<&Entity>) -> bool {
    match target {
        Some(Entity::User(user_id)) => {
            user_id.eq_ignore_ascii_case(identifier)
        }
        Some(Entity::RoomAlias(alias)) => {
            alias.eq_ignore_ascii_case(identifier)
        }
        _ => false,
    }
}

/// Point every suspicious link at a confirmation pseudo-URL.
pub fn detect_phishing_attempts(text: &mut AttributedText) {
    for (range, url) in text.link_ranges() {
        let display_string = text.substring(range.clone());
        if !is_phishing_attempt(&display_string, &url) {
            continue;
        }
        tracing::debug!(
            %display_string,
            %url,
            "Link looks like a phishing attempt"
        );
        let confirmation = ConfirmUrlParameters {
            internal_url: url,
            display_string,
        };
        text.add_attribute(range, Attribute::Link(confirmation.to_url()));
    }
}

fn fold_confusables(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\u{2024}' | '\u{FF0E}' | '\u{3002}' | '\u{FF61}' | '\u{FE52}'
            | '\u{0701}' | '\u{0702}' | '\u{2E33}' | '\u{A4F8}' => Some('.'),
            '\u{FF0F}' | '\u{2044}' | '\u{2215}' | '\u{29F8}' => Some('/'),
            '\u{FF1A}' | '\u{A789}' | '\u{2236}' | '\u{0589}' => Some(':'),
            '\u{FF20}' => Some('@'),
            '\u{FF03}' => Some('#'),
            '\u{200B}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}' => None,
            other => Some(other),
        })
        .collect()
}

fn trim_decorations(text: &str) -> &str {
    let is_significant = |grapheme: &str| {
        grapheme.chars().next().is_some_and(|c| {
            c.is_alphanumeric() || SIGNIFICANT_PUNCTUATION.contains(&c)
        })
    };
    let graphemes: Vec<(usize, &str)> = text.grapheme_indices(true).collect();
    let Some(first) = graphemes.iter().position(|&(_, g)| is_significant(g))
    else {
        return "";
    };
    let last = graphemes
        .iter()
        .rposition(|&(_, g)| is_significant(g))
        .unwrap_or(first);
    let (end_index, end_grapheme) = graphemes[last];
    &text[graphemes[first].0..end_index + end_grapheme.len()]
}

fn sanitize(url: &str) -> String {
    let decoded = percent_decode_str(url.trim())
        .decode_utf8_lossy()
        .to_lowercase();
    let without_scheme = decoded
        .strip_prefix("https://")
        .or_else(|| decoded.strip_prefix("http://"))
        .unwrap_or(&decoded);
    let without_www =
        without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    without_www.trim_end_matches('/').to_owned()
}
