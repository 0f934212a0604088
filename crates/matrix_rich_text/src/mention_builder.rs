// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The hook deciding how a detected mention ends up in the text.

use std::ops::Range;

use crate::attributed_text::AttributedText;
use crate::attributes::{Attribute, Mention};

/// Called once for every link that resolves to a Matrix entity, and once
/// for every `@room` token. Implementations typically attach a
/// [`Attribute::Mention`] to `range` so that the renderer can draw a pill,
/// but they are free to rewrite the text's attributes in any way.
pub trait MentionBuilder: Send + Sync {
    fn handle_user_mention(
        &self,
        text: &mut AttributedText,
        range: Range<usize>,
        url: &str,
        user_id: &str,
        display_name: Option<&str>,
    );

    fn handle_room_id_mention(
        &self,
        text: &mut AttributedText,
        range: Range<usize>,
        url: &str,
        room_id: &str,
    );

    fn handle_room_alias_mention(
        &self,
        text: &mut AttributedText,
        range: Range<usize>,
        url: &str,
        alias: &str,
        display_name: Option<&str>,
    );

    /// `room_id_or_alias` starts with `#` for an alias and `!` for an id.
    fn handle_event_mention(
        &self,
        text: &mut AttributedText,
        range: Range<usize>,
        url: &str,
        event_id: &str,
        room_id_or_alias: &str,
    );

    fn handle_all_users_mention(
        &self,
        text: &mut AttributedText,
        range: Range<usize>,
    );
}

/// Tags every mention with its identifiers and leaves the link in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultMentionBuilder;

impl MentionBuilder for DefaultMentionBuilder {
    fn handle_user_mention(
        &self,
        text: &mut AttributedText,
        range: Range<usize>,
        _url: &str,
        user_id: &str,
        _display_name: Option<&str>,
    ) {
        text.add_attribute(
            range,
            Attribute::Mention(Mention::User {
                user_id: user_id.to_owned(),
            }),
        );
    }

    fn handle_room_id_mention(
        &self,
        text: &mut AttributedText,
        range: Range<usize>,
        _url: &str,
        room_id: &str,
    ) {
        text.add_attribute(
            range,
            Attribute::Mention(Mention::RoomId {
                room_id: room_id.to_owned(),
            }),
        );
    }

    fn handle_room_alias_mention(
        &self,
        text: &mut AttributedText,
        range: Range<usize>,
        _url: &str,
        alias: &str,
        display_name: Option<&str>,
    ) {
        text.add_attribute(
            range,
            Attribute::Mention(Mention::RoomAlias {
                alias: alias.to_owned(),
                display_name: display_name.map(str::to_owned),
            }),
        );
    }

    fn handle_event_mention(
        &self,
        text: &mut AttributedText,
        range: Range<usize>,
        _url: &str,
        event_id: &str,
        room_id_or_alias: &str,
    ) {
        let event_id = event_id.to_owned();
        let mention = if room_id_or_alias.starts_with('#') {
            Mention::EventOnAlias {
                alias: room_id_or_alias.to_owned(),
                event_id,
            }
        } else {
            Mention::EventOnRoom {
                room_id: room_id_or_alias.to_owned(),
                event_id,
            }
        };
        text.add_attribute(range, Attribute::Mention(mention));
    }

    fn handle_all_users_mention(
        &self,
        _text: &mut AttributedText,
        _range: Range<usize>,
    ) {
        // The annotator has already tagged the token
    }
}
