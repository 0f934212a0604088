// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use matrix_mentions::{build_permalink, parse_permalink, Entity};

/// The Matrix entity a link points at, if it is a permalink at all.
pub fn classify_permalink(uri: &str) -> Option<Entity> {
    parse_permalink(uri)
}

/// The canonical permalink for `entity`, or `None` if one of its
/// identifiers is malformed.
pub(crate) fn permalink_for(entity: &Entity) -> Option<String> {
    match build_permalink(entity) {
        Ok(permalink) => Some(permalink),
        Err(error) => {
            tracing::debug!(%error, ?entity, "Could not build a permalink");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_permalinks_are_classified() {
        assert_eq!(
            classify_permalink("https://matrix.to/#/@alice:example.org"),
            Some(Entity::User(String::from("@alice:example.org")))
        );
    }

    #[test]
    fn event_permalinks_are_classified() {
        assert_eq!(
            classify_permalink(
                "https://matrix.to/#/!room:example.org/$event?via=example.org"
            ),
            Some(Entity::EventOnRoomId {
                room_id: String::from("!room:example.org"),
                event_id: String::from("$event"),
            })
        );
    }

    #[test]
    fn other_links_are_not_classified() {
        assert_eq!(classify_permalink("https://matrix.org/blog"), None);
    }

    #[test]
    fn malformed_identifiers_have_no_permalink() {
        assert_eq!(permalink_for(&Entity::User(String::from("alice"))), None);
        assert_eq!(
            permalink_for(&Entity::User(String::from("@alice:example.org"))),
            Some(String::from("https://matrix.to/#/@alice:example.org"))
        );
    }
}
