// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Finds Matrix identifiers and hyperlinks in flattened text and turns
//! them into link and mention attributes.
//!
//! Every pattern runs independently. The matches are then applied longest
//! first, and a match is skipped when any part of it is already a link, a
//! mention or code. A permalink that contains a user id therefore becomes
//! a single link rather than a link with a user link nested inside.

use std::ops::Range;

use matrix_mentions::Entity;
use regex::Regex;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

use crate::attributed_text::AttributedText;
use crate::attributes::{Attribute, AttributeKind, Mention};
use crate::entity_regex::{
    find_trimmed, hyperlink_target, ALL_USERS, LINK, MATRIX_URI, ROOM_ALIAS,
    USER_ID,
};
use crate::permalink::permalink_for;
use crate::utf16;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter)]
pub(crate) enum EntityKind {
    UserId,
    RoomAlias,
    MatrixUri,
    Hyperlink,
    AllUsers,
}

impl EntityKind {
    fn regex(&self) -> &'static Regex {
        match self {
            EntityKind::UserId => &USER_ID,
            EntityKind::RoomAlias => &ROOM_ALIAS,
            EntityKind::MatrixUri => &MATRIX_URI,
            EntityKind::Hyperlink => &LINK,
            EntityKind::AllUsers => &ALL_USERS,
        }
    }

    fn target_for(&self, found: &str) -> Option<String> {
        match self {
            EntityKind::UserId => {
                permalink_for(&Entity::User(found.to_owned()))
            }
            EntityKind::RoomAlias => {
                permalink_for(&Entity::RoomAlias(found.to_owned()))
            }
            EntityKind::MatrixUri => Some(found.to_owned()),
            EntityKind::Hyperlink => Some(hyperlink_target(found)),
            EntityKind::AllUsers => None,
        }
    }
}

/// A candidate entity, with its range in UTF-16 code units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EntityMatch {
    pub(crate) kind: EntityKind,
    pub(crate) range: Range<usize>,
    pub(crate) derived_target: Option<String>,
}

/// All entity matches in `text`, longest first. Matches of equal length
/// keep the declaration order of [`EntityKind`].
pub(crate) fn find_entities(text: &str) -> Vec<EntityMatch> {
    let mut matches: Vec<EntityMatch> = EntityKind::iter()
        .flat_map(|kind| {
            find_trimmed(kind.regex(), text).into_iter().map(move |bytes| {
                EntityMatch {
                    kind,
                    range: utf16::offset_at_byte(text, bytes.start)
                        ..utf16::offset_at_byte(text, bytes.end),
                    derived_target: kind.target_for(&text[bytes]),
                }
            })
        })
        .collect();
    matches.sort_by(|a, b| b.range.len().cmp(&a.range.len()));
    matches
}

/// Attach link and mention attributes for every entity found in `text`.
pub fn annotate_entities(text: &mut AttributedText) {
    for entity in find_entities(text.text()) {
        let occupied = text.any_in_range(entity.range.clone(), |attributes| {
            attributes.contains(AttributeKind::CodeBlock)
                || attributes.contains(AttributeKind::Link)
                || attributes.contains(AttributeKind::Mention)
        });
        if occupied {
            continue;
        }
        let attribute = match (entity.kind, entity.derived_target) {
            (EntityKind::AllUsers, _) => Attribute::Mention(Mention::AllUsers),
            (_, Some(target)) => Attribute::Link(target),
            (_, None) => continue,
        };
        text.add_attribute(entity.range, attribute);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttributeSet;

    fn annotated(text: AttributedText) -> AttributedText {
        let mut text = text;
        annotate_entities(&mut text);
        text.merge_adjacent_runs();
        text
    }

    #[test]
    fn matches_are_sorted_longest_first() {
        let matches = find_entities(
            "@alice:example.org https://matrix.to/#/@alice:example.org",
        );
        let lengths: Vec<usize> =
            matches.iter().map(|found| found.range.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted);
        assert_eq!(matches[0].kind, EntityKind::Hyperlink);
    }

    #[test]
    fn a_permalink_wins_over_the_user_id_inside_it() {
        let text = annotated(AttributedText::plain(
            "see https://matrix.to/#/@alice:example.org now",
        ));
        assert_eq!(
            text.link_ranges(),
            vec![(
                4..42,
                String::from("https://matrix.to/#/@alice:example.org")
            )]
        );
    }

    #[test]
    fn bare_user_ids_link_to_their_permalink() {
        let text = annotated(AttributedText::plain("hi @alice:example.org!"));
        assert_eq!(
            text.link_ranges(),
            vec![(
                3..21,
                String::from("https://matrix.to/#/@alice:example.org")
            )]
        );
    }

    #[test]
    fn links_get_a_scheme_when_missing() {
        let text = annotated(AttributedText::plain("visit matrix.org"));
        assert_eq!(
            text.link_ranges(),
            vec![(6..16, String::from("https://matrix.org"))]
        );
    }

    #[test]
    fn code_is_never_annotated() {
        let code = AttributeSet::from_iter([Attribute::CodeBlock]);
        let mut text = AttributedText::new();
        text.push_str("@alice:example.org", code);
        let text = annotated(text);
        assert!(text.link_ranges().is_empty());
    }

    #[test]
    fn existing_links_are_kept() {
        let link = AttributeSet::from_iter([Attribute::Link(String::from(
            "https://element.io",
        ))]);
        let mut text = AttributedText::new();
        text.push_str("matrix.org", link);
        let text = annotated(text);
        assert_eq!(
            text.link_ranges(),
            vec![(0..10, String::from("https://element.io"))]
        );
    }

    #[test]
    fn the_all_users_token_is_a_mention() {
        let text = annotated(AttributedText::plain("@room look"));
        assert_eq!(
            text.runs()[0].attributes,
            AttributeSet::from_iter([Attribute::Mention(Mention::AllUsers)])
        );
        assert_eq!(text.runs()[0].range, 0..5);
    }

    #[test]
    fn offsets_are_in_utf16_code_units() {
        let text = annotated(AttributedText::plain("🎉 matrix.org"));
        assert_eq!(
            text.link_ranges(),
            vec![(3..13, String::from("https://matrix.org"))]
        );
    }
}
