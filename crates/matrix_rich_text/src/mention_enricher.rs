// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use matrix_mentions::Entity;

use crate::attributed_text::AttributedText;
use crate::attributes::Mention;
use crate::mention_builder::MentionBuilder;
use crate::permalink::classify_permalink;

/// Hand every permalink and `@room` token in `text` to `builder`.
///
/// Ranges are collected up front; the builder may change attributes but
/// the text itself stays the same, so they remain valid.
pub fn enrich_mentions(
    text: &mut AttributedText,
    builder: &dyn MentionBuilder,
) {
    let links = text.link_ranges();
    let all_users = text.attribute_ranges(|attributes| {
        matches!(attributes.mention(), Some(Mention::AllUsers)).then_some(())
    });

    for (range, url) in links {
        let Some(entity) = classify_permalink(&url) else {
            continue;
        };
        match &entity {
            Entity::User(user_id) => {
                builder.handle_user_mention(text, range, &url, user_id, None)
            }
            Entity::Room(room_id) => {
                builder.handle_room_id_mention(text, range, &url, room_id)
            }
            Entity::RoomAlias(alias) => builder
                .handle_room_alias_mention(text, range, &url, alias, None),
            Entity::EventOnRoomId { room_id, event_id } => builder
                .handle_event_mention(text, range, &url, event_id, room_id),
            Entity::EventOnRoomAlias { alias, event_id } => builder
                .handle_event_mention(text, range, &url, event_id, alias),
        }
    }

    for (range, ()) in all_users {
        builder.handle_all_users_mention(text, range);
    }
}

#[cfg(test)]
mod tests {
    use std::ops::Range;
    use std::sync::Mutex;

    use super::*;
    use crate::attributes::{Attribute, AttributeSet};
    use crate::mention_builder::DefaultMentionBuilder;

    #[derive(Default)]
    struct RecordingBuilder {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingBuilder {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    impl MentionBuilder for RecordingBuilder {
        fn handle_user_mention(
            &self,
            _text: &mut AttributedText,
            range: Range<usize>,
            _url: &str,
            user_id: &str,
            _display_name: Option<&str>,
        ) {
            self.record(format!("user {user_id} {range:?}"));
        }

        fn handle_room_id_mention(
            &self,
            _text: &mut AttributedText,
            range: Range<usize>,
            _url: &str,
            room_id: &str,
        ) {
            self.record(format!("room {room_id} {range:?}"));
        }

        fn handle_room_alias_mention(
            &self,
            _text: &mut AttributedText,
            range: Range<usize>,
            _url: &str,
            alias: &str,
            _display_name: Option<&str>,
        ) {
            self.record(format!("alias {alias} {range:?}"));
        }

        fn handle_event_mention(
            &self,
            _text: &mut AttributedText,
            range: Range<usize>,
            _url: &str,
            event_id: &str,
            room_id_or_alias: &str,
        ) {
            self.record(format!(
                "event {event_id} in {room_id_or_alias} {range:?}"
            ));
        }

        fn handle_all_users_mention(
            &self,
            _text: &mut AttributedText,
            range: Range<usize>,
        ) {
            self.record(format!("all {range:?}"));
        }
    }

    fn linked(label: &str, url: &str) -> AttributedText {
        let mut text = AttributedText::new();
        text.push_str(
            label,
            AttributeSet::from_iter([Attribute::Link(url.to_owned())]),
        );
        text
    }

    #[test]
    fn every_kind_of_permalink_reaches_the_builder() {
        let mut text =
            linked("Alice", "https://matrix.to/#/@alice:example.org");
        text.append(AttributedText::plain(" "));
        text.append(linked("room", "https://matrix.to/#/!abc:example.org"));
        text.append(AttributedText::plain(" "));
        text.append(linked("rust", "https://matrix.to/#/%23rust:example.org"));
        text.append(AttributedText::plain(" "));
        text.append(linked(
            "event",
            "https://matrix.to/#/%23rust:example.org/$ev",
        ));
        text.append(AttributedText::plain(" "));
        text.append(linked("site", "https://matrix.org"));

        let builder = RecordingBuilder::default();
        enrich_mentions(&mut text, &builder);

        assert_eq!(
            *builder.calls.lock().unwrap(),
            vec![
                "user @alice:example.org 0..5",
                "room !abc:example.org 6..10",
                "alias #rust:example.org 11..15",
                "event $ev in #rust:example.org 16..21",
            ]
        );
    }

    #[test]
    fn all_users_tokens_reach_the_builder() {
        let mut text = AttributedText::new();
        text.push_str(
            "@room",
            AttributeSet::from_iter([Attribute::Mention(Mention::AllUsers)]),
        );
        let builder = RecordingBuilder::default();
        enrich_mentions(&mut text, &builder);
        assert_eq!(*builder.calls.lock().unwrap(), vec!["all 0..5"]);
    }

    #[test]
    fn the_default_builder_tags_mentions() {
        let mut text =
            linked("Alice", "https://matrix.to/#/@alice:example.org");
        enrich_mentions(&mut text, &DefaultMentionBuilder);
        assert_eq!(
            text.runs()[0].attributes.mention(),
            Some(&Mention::User {
                user_id: String::from("@alice:example.org")
            })
        );
        assert!(text.runs()[0].attributes.link().is_some());
    }
}
