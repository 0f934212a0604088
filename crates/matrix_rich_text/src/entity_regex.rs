// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Patterns for Matrix identifiers and links found in free text.

use email_address::EmailAddress;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

const HOMESERVER: &str = r"[A-Z0-9]+(?:[.\-][A-Z0-9]+)*(?::[0-9]{2,5})?";

const TOP_LEVEL_DOMAINS: &str = "com|org|net|io|dev|app|chat|im|me|co|uk|de|fr|\
nl|eu|us|ca|au|info|xyz|edu|gov|social|cloud|tech|space";

fn case_insensitive(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("entity patterns are valid regular expressions")
}

pub(crate) static USER_ID: Lazy<Regex> = Lazy::new(|| {
    case_insensitive(&format!(r"@[\x21-\x39\x3B-\x7E]+:{HOMESERVER}"))
});

pub(crate) static ROOM_ALIAS: Lazy<Regex> = Lazy::new(|| {
    case_insensitive(&format!(r"#[A-Z0-9._%#@=+\-]+:{HOMESERVER}"))
});

pub(crate) static MATRIX_URI: Lazy<Regex> = Lazy::new(|| {
    case_insensitive(r"matrix:(?:r|u|roomid)/[A-Z0-9._%#@=+\-:/?&;!$~]+")
});

pub(crate) static LINK: Lazy<Regex> = Lazy::new(|| {
    case_insensitive(&format!(
        concat!(
            r"\b[A-Z][A-Z0-9+.\-]*://[^\s<>]+",
            r"|\bmailto:[^\s<>]+",
            r"|\bwww\.[^\s<>]+",
            r"|\b[A-Z0-9._%+\-]+@[A-Z0-9\-]+(?:\.[A-Z0-9\-]+)*\.[A-Z]{{2,}}\b",
            r"|\b[A-Z0-9\-]+(?:\.[A-Z0-9\-]+)*\.(?:{tlds})\b(?:[/?#][^\s<>]*)?",
        ),
        tlds = TOP_LEVEL_DOMAINS
    ))
});

pub(crate) static ALL_USERS: Lazy<Regex> =
    Lazy::new(|| case_insensitive(r"@room\b"));

static EXACT_USER_ID: Lazy<Regex> =
    Lazy::new(|| case_insensitive(&format!("^(?:{})$", USER_ID.as_str())));

static EXACT_ROOM_ALIAS: Lazy<Regex> =
    Lazy::new(|| case_insensitive(&format!("^(?:{})$", ROOM_ALIAS.as_str())));

/// Byte ranges of every match of `regex`, with trailing sentence
/// punctuation and unbalanced closing parentheses left out.
pub(crate) fn find_trimmed(
    regex: &Regex,
    text: &str,
) -> Vec<std::ops::Range<usize>> {
    regex
        .find_iter(text)
        .map(|found| {
            let end = found.start() + trimmed_len(found.as_str());
            found.start()..end
        })
        .filter(|range| !range.is_empty())
        .collect()
}

fn trimmed_len(candidate: &str) -> usize {
    let mut end = candidate.len();
    loop {
        let current = &candidate[..end];
        let Some(last) = current.chars().last() else {
            return 0;
        };
        let strip = match last {
            '.' | ',' | ';' | ':' | '!' | '?' | '\'' | '"' => true,
            ')' => current.matches('(').count() < current.matches(')').count(),
            _ => false,
        };
        if !strip {
            return end;
        }
        end -= last.len_utf8();
    }
}

pub(crate) fn is_exact_user_id(text: &str) -> bool {
    EXACT_USER_ID.is_match(text)
}

pub(crate) fn is_exact_room_alias(text: &str) -> bool {
    EXACT_ROOM_ALIAS.is_match(text)
}

/// The URL a detected hyperlink points at.
///
/// Text with a scheme is kept as found, a bare e-mail address becomes a
/// `mailto:` link and anything else is assumed to be `https`.
pub(crate) fn hyperlink_target(link: &str) -> String {
    let lower = link.to_ascii_lowercase();
    if lower.contains("://") || lower.starts_with("mailto:") {
        link.to_owned()
    } else if EmailAddress::is_valid(link) {
        format!("mailto:{link}")
    } else {
        format!("https://{link}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn found<'a>(regex: &Regex, text: &'a str) -> Vec<&'a str> {
        find_trimmed(regex, text)
            .into_iter()
            .map(|range| &text[range])
            .collect()
    }

    #[test]
    fn user_ids_are_found_in_text() {
        assert_eq!(
            found(
                &USER_ID,
                "ping @alice:example.org, and @bob:matrix.org:8448."
            ),
            vec!["@alice:example.org", "@bob:matrix.org:8448"]
        );
    }

    #[test]
    fn room_aliases_are_found_in_text() {
        assert_eq!(
            found(&ROOM_ALIAS, "join #rust-lang:matrix.org!"),
            vec!["#rust-lang:matrix.org"]
        );
    }

    #[test]
    fn links_in_several_shapes_are_found() {
        assert_eq!(
            found(
                &LINK,
                concat!(
                    "https://matrix.org/docs, www.element.io ",
                    "and example.com/path?q=1."
                )
            ),
            vec![
                "https://matrix.org/docs",
                "www.element.io",
                "example.com/path?q=1"
            ]
        );
    }

    #[test]
    fn balanced_parentheses_stay_in_links() {
        assert_eq!(
            found(&LINK, "(see https://en.wikipedia.org/wiki/Rust_(language))"),
            vec!["https://en.wikipedia.org/wiki/Rust_(language)"]
        );
    }

    #[test]
    fn e_mail_addresses_are_links() {
        assert_eq!(found(&LINK, "mail me@example.org"), vec!["me@example.org"]);
        assert_eq!(hyperlink_target("me@example.org"), "mailto:me@example.org");
    }

    #[test]
    fn hyperlink_targets_keep_or_add_a_scheme() {
        assert_eq!(hyperlink_target("matrix.org"), "https://matrix.org");
        assert_eq!(hyperlink_target("http://matrix.org"), "http://matrix.org");
        assert_eq!(hyperlink_target("mailto:a@b.org"), "mailto:a@b.org");
    }

    #[test]
    fn matrix_uris_are_found() {
        assert_eq!(
            found(&MATRIX_URI, "open matrix:u/alice:example.org?action=chat"),
            vec!["matrix:u/alice:example.org?action=chat"]
        );
    }

    #[test]
    fn all_users_token_needs_a_word_boundary() {
        assert_eq!(found(&ALL_USERS, "hey @room!"), vec!["@room"]);
        assert!(found(&ALL_USERS, "@roommate").is_empty());
    }

    #[test]
    fn exact_identifiers() {
        assert!(is_exact_user_id("@alice:example.org"));
        assert!(!is_exact_user_id("hi @alice:example.org"));
        assert!(is_exact_room_alias("#room:example.org"));
        assert!(!is_exact_room_alias("#room"));
    }
}
