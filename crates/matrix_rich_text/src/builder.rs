// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The entry point: turns message bodies into cached [`RichTextDocument`]s.

use std::sync::Arc;
use std::time::Instant;

use crate::attributed_text::AttributedText;
use crate::cache::{CacheKey, DocumentCache, SourceFlavour};
use crate::config::RichTextConfig;
use crate::document::RichTextDocument;
use crate::entity_annotator::annotate_entities;
use crate::error::BuildError;
use crate::markdown::markdown_to_html;
use crate::markup::parser::parse_html;
use crate::markup::MarkupTransformer;
use crate::mention_builder::MentionBuilder;
use crate::mention_enricher::enrich_mentions;
use crate::phishing::detect_phishing_attempts;

/// Builds documents for one caller, caching them in that caller's
/// namespace of a shared [`DocumentCache`].
///
/// Every build runs the same stages in order: the source is flattened
/// into styled text, explicit links are checked for phishing (markup only),
/// identifiers and links in the text are detected, and finally every
/// mention is handed to the [`MentionBuilder`].
pub struct RichTextBuilder {
    namespace: String,
    cache: Arc<DocumentCache>,
    mention_builder: Arc<dyn MentionBuilder>,
    detect_phishing: bool,
}

impl RichTextBuilder {
    pub fn new(
        namespace: impl Into<String>,
        cache: Arc<DocumentCache>,
        mention_builder: Arc<dyn MentionBuilder>,
        config: &RichTextConfig,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            cache,
            mention_builder,
            detect_phishing: config.detect_phishing,
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn from_plain(
        &self,
        text: Option<&str>,
    ) -> Option<Arc<RichTextDocument>> {
        self.log_failure(SourceFlavour::Plain, self.try_from_plain(text?))
    }

    pub fn from_html(
        &self,
        html: Option<&str>,
    ) -> Option<Arc<RichTextDocument>> {
        self.log_failure(SourceFlavour::Html, self.try_from_html(html?))
    }

    pub fn from_markdown(
        &self,
        markdown: Option<&str>,
    ) -> Option<Arc<RichTextDocument>> {
        let result = self.try_from_markdown(markdown?);
        self.log_failure(SourceFlavour::Markdown, result)
    }

    pub fn try_from_plain(
        &self,
        text: &str,
    ) -> Result<Arc<RichTextDocument>, BuildError> {
        self.build(SourceFlavour::Plain, text, |text| {
            Ok(AttributedText::plain(text))
        })
    }

    pub fn try_from_html(
        &self,
        html: &str,
    ) -> Result<Arc<RichTextDocument>, BuildError> {
        self.build(SourceFlavour::Html, html, transform_html)
    }

    pub fn try_from_markdown(
        &self,
        markdown: &str,
    ) -> Result<Arc<RichTextDocument>, BuildError> {
        self.build(SourceFlavour::Markdown, markdown, |markdown| {
            transform_html(&markdown_to_html(markdown))
        })
    }

    /// Drop the cached documents of every namespace, e.g. after the theme,
    /// font scale or locale changed.
    pub fn invalidate_caches(&self) {
        self.cache.invalidate_all();
    }

    fn build(
        &self,
        flavour: SourceFlavour,
        source: &str,
        render: impl FnOnce(&str) -> Result<AttributedText, BuildError>,
    ) -> Result<Arc<RichTextDocument>, BuildError> {
        let key = CacheKey::new(flavour, source);
        if let Some(document) = self.cache.get(&self.namespace, &key) {
            tracing::debug!(namespace = %self.namespace, ?flavour, "Cache hit");
            return Ok(document);
        }
        tracing::debug!(namespace = %self.namespace, ?flavour, "Cache miss");

        let started = Instant::now();
        let mut text = render(source)?;
        if self.detect_phishing && flavour != SourceFlavour::Plain {
            detect_phishing_attempts(&mut text);
        }
        annotate_entities(&mut text);
        enrich_mentions(&mut text, self.mention_builder.as_ref());

        let document = Arc::new(RichTextDocument::new(text));
        self.cache
            .put(&self.namespace, key, Some(Arc::clone(&document)));
        tracing::trace!(
            namespace = %self.namespace,
            ?flavour,
            elapsed_us = started.elapsed().as_micros() as u64,
            runs = document.runs().len(),
            "Built rich text document"
        );
        Ok(document)
    }

    fn log_failure(
        &self,
        flavour: SourceFlavour,
        result: Result<Arc<RichTextDocument>, BuildError>,
    ) -> Option<Arc<RichTextDocument>> {
        result
            .inspect_err(|error| {
                tracing::warn!(
                    namespace = %self.namespace,
                    ?flavour,
                    %error,
                    "Failed to build rich text document"
                );
            })
            .ok()
    }
}

fn transform_html(html: &str) -> Result<AttributedText, BuildError> {
    let dom = parse_html(html)?;
    Ok(MarkupTransformer::new(&dom).transform())
}
