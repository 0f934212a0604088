// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Rich text for Matrix messages.
//!
//! A [`RichTextBuilder`] turns a message body (plain text, the Matrix HTML
//! dialect or Markdown) into a [`RichTextDocument`]: a string plus styled
//! runs carrying formatting, links and mentions. All offsets are UTF-16
//! code units. Finished documents are cached per namespace in a shared
//! [`DocumentCache`].

mod attributed_text;
mod attributes;
mod builder;
mod cache;
mod config;
mod document;
mod entity_annotator;
mod entity_regex;
mod error;
mod markdown;
mod markup;
mod mention_builder;
mod mention_enricher;
mod permalink;
mod phishing;
mod utf16;

pub use crate::attributed_text::{AttributedText, StyledRun};
pub use crate::attributes::{Attribute, AttributeKind, AttributeSet, Mention};
pub use crate::builder::RichTextBuilder;
pub use crate::cache::{CacheKey, DocumentCache, SourceFlavour};
pub use crate::config::{RichTextConfig, DEFAULT_CACHE_CAPACITY};
pub use crate::document::{DocumentComponent, RichTextDocument};
pub use crate::entity_annotator::annotate_entities;
pub use crate::error::{BuildError, HtmlParseError};
pub use crate::mention_builder::{DefaultMentionBuilder, MentionBuilder};
pub use crate::mention_enricher::enrich_mentions;
pub use crate::permalink::classify_permalink;
pub use crate::phishing::{
    detect_phishing_attempts, is_phishing_attempt, ConfirmUrlParameters,
    CONFIRMATION_SCHEME,
};
pub use matrix_mentions::Entity;
