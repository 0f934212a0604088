// Copyright 2024 New Vector Ltd.
// Copyright 2023 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use ruma_common::matrix_uri::MatrixId;
use ruma_common::{
    EventId, IdParseError, MatrixToUri, MatrixUri, RoomAliasId, RoomId, UserId,
};

const MATRIX_TO_BASE_URL: &str = "https://matrix.to/#/";

/// A Matrix entity addressed by a permalink.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Entity {
    User(String),
    Room(String),
    RoomAlias(String),
    EventOnRoomId { room_id: String, event_id: String },
    EventOnRoomAlias { alias: String, event_id: String },
}

impl Entity {
    fn from_matrix_id(id: &MatrixId) -> Option<Self> {
        match id {
            MatrixId::User(user_id) => Some(Self::User(user_id.to_string())),
            MatrixId::Room(room_id) => Some(Self::Room(room_id.to_string())),
            MatrixId::RoomAlias(alias) => {
                Some(Self::RoomAlias(alias.to_string()))
            }
            MatrixId::Event(room, event_id) => {
                let event_id = event_id.to_string();
                if room.is_room_id() {
                    Some(Self::EventOnRoomId {
                        room_id: room.to_string(),
                        event_id,
                    })
                } else {
                    Some(Self::EventOnRoomAlias {
                        alias: room.to_string(),
                        event_id,
                    })
                }
            }
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PermalinkError {
    #[error("invalid Matrix identifier: {0}")]
    InvalidIdentifier(#[from] IdParseError),
}

/// Parse `uri` into the entity it refers to.
///
/// Returns `None` for anything that is not a recognised Matrix permalink.
pub fn parse_permalink(uri: &str) -> Option<Entity> {
    let uri = uri.trim();
    if let Ok(matrix_to) = MatrixToUri::parse(uri) {
        return Entity::from_matrix_id(matrix_to.id());
    }
    if let Ok(matrix_uri) = MatrixUri::parse(uri) {
        return Entity::from_matrix_id(matrix_uri.id());
    }

    cfg_if::cfg_if! {
        if #[cfg(feature = "custom-matrix-urls")] {
            client_hosted::parse(uri)
        } else {
            None
        }
    }
}

pub fn is_permalink(uri: &str) -> bool {
    parse_permalink(uri).is_some()
}

/// Build the canonical `matrix.to` permalink for `entity`.
pub fn build_permalink(entity: &Entity) -> Result<String, PermalinkError> {
    let uri = match entity {
        Entity::User(user_id) => {
            UserId::parse(user_id.as_str())?.matrix_to_uri()
        }
        Entity::Room(room_id) => {
            RoomId::parse(room_id.as_str())?.matrix_to_uri()
        }
        Entity::RoomAlias(alias) => {
            RoomAliasId::parse(alias.as_str())?.matrix_to_uri()
        }
        Entity::EventOnRoomId { room_id, event_id } => {
            let event_id = EventId::parse(event_id.as_str())?;
            RoomId::parse(room_id.as_str())?.matrix_to_event_uri(event_id)
        }
        Entity::EventOnRoomAlias { alias, event_id } => {
            let event_id = EventId::parse(event_id.as_str())?;
            RoomAliasId::parse(alias.as_str())?.matrix_to_event_uri(event_id)
        }
    };
    Ok(uri.to_string())
}

#[cfg(feature = "custom-matrix-urls")]
mod client_hosted {
    use ruma_common::MatrixToUri;
    use url::Url;

    use super::{Entity, MATRIX_TO_BASE_URL};

    /// Links shared from a web client look like
    /// `https://app.example.org/#/room/#alias:example.org/$event`.
    /// The part after `/user/` or `/room/` is a regular `matrix.to` path.
    pub(super) fn parse(uri: &str) -> Option<Entity> {
        let url = Url::parse(uri).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        let path = url.fragment()?.strip_prefix('/')?;
        let id_path = path
            .strip_prefix("user/")
            .or_else(|| path.strip_prefix("room/"))?;
        let matrix_to =
            MatrixToUri::parse(&format!("{MATRIX_TO_BASE_URL}{id_path}"))
                .ok()?;
        Entity::from_matrix_id(matrix_to.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_matrix_to_user() {
        assert_eq!(
            parse_permalink("https://matrix.to/#/@alice:example.org"),
            Some(Entity::User("@alice:example.org".to_owned()))
        );
    }

    #[test]
    fn parses_encoded_room_alias() {
        assert_eq!(
            parse_permalink("https://matrix.to/#/%23room:example.org"),
            Some(Entity::RoomAlias("#room:example.org".to_owned()))
        );
    }

    #[test]
    fn parses_room_id_with_via() {
        assert_eq!(
            parse_permalink(
                "https://matrix.to/#/!abcdef:example.org?via=example.org"
            ),
            Some(Entity::Room("!abcdef:example.org".to_owned()))
        );
    }

    #[test]
    fn parses_event_on_room_id() {
        assert_eq!(
            parse_permalink(
                "https://matrix.to/#/!abcdef:example.org/$event:example.org"
            ),
            Some(Entity::EventOnRoomId {
                room_id: "!abcdef:example.org".to_owned(),
                event_id: "$event:example.org".to_owned(),
            })
        );
    }

    #[test]
    fn parses_event_on_room_alias() {
        assert_eq!(
            parse_permalink(
                "https://matrix.to/#/%23room:example.org/$event:example.org"
            ),
            Some(Entity::EventOnRoomAlias {
                alias: "#room:example.org".to_owned(),
                event_id: "$event:example.org".to_owned(),
            })
        );
    }

    #[test]
    fn parses_matrix_scheme_user() {
        assert_eq!(
            parse_permalink("matrix:u/alice:example.org"),
            Some(Entity::User("@alice:example.org".to_owned()))
        );
    }

    #[test]
    fn ignores_regular_links() {
        assert_eq!(parse_permalink("https://www.matrix.org/"), None);
        assert_eq!(parse_permalink("mailto:alice@example.org"), None);
        assert!(!is_permalink("not a link"));
    }

    #[cfg(feature = "custom-matrix-urls")]
    #[test]
    fn parses_client_hosted_links() {
        assert_eq!(
            parse_permalink("https://app.element.io/#/user/@alice:example.org"),
            Some(Entity::User("@alice:example.org".to_owned()))
        );
        assert_eq!(
            parse_permalink("https://app.element.io/#/room/#room:example.org"),
            Some(Entity::RoomAlias("#room:example.org".to_owned()))
        );
        assert_eq!(parse_permalink("https://app.element.io/#/home"), None);
    }

    #[test]
    fn builds_user_permalink() {
        assert_eq!(
            build_permalink(&Entity::User("@alice:example.org".to_owned()))
                .unwrap(),
            "https://matrix.to/#/@alice:example.org"
        );
    }

    #[test]
    fn built_alias_and_event_permalinks_parse_back() {
        let alias = Entity::RoomAlias("#room:example.org".to_owned());
        let event = Entity::EventOnRoomId {
            room_id: "!abcdef:example.org".to_owned(),
            event_id: "$event:example.org".to_owned(),
        };
        for entity in [alias, event] {
            let link = build_permalink(&entity).unwrap();
            assert_eq!(parse_permalink(&link), Some(entity));
        }
    }

    #[test]
    fn building_from_invalid_identifier_fails() {
        assert!(build_permalink(&Entity::User("alice".to_owned())).is_err());
        assert!(
            build_permalink(&Entity::RoomAlias("room".to_owned())).is_err()
        );
    }
}
