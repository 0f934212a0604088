// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::ops::Range;

use widestring::Utf16String;

use crate::attributed_text::{AttributedText, StyledRun};
use crate::attributes::{AttributeKind, AttributeSet, Mention};
use crate::utf16;

/// The finished, immutable result of a build: a backing string and the
/// runs styling it. Offsets are UTF-16 code units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RichTextDocument {
    content: AttributedText,
}

/// A maximal slice of a document that is either entirely inside a
/// blockquote or entirely outside one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentComponent {
    pub range: Range<usize>,
    pub text: String,
    pub is_blockquote: bool,
}

impl RichTextDocument {
    pub(crate) fn new(mut content: AttributedText) -> Self {
        content.merge_adjacent_runs();
        Self { content }
    }

    pub fn text(&self) -> &str {
        self.content.text()
    }

    /// The backing string as UTF-16, for native text APIs.
    pub fn utf16(&self) -> Utf16String {
        utf16::to_utf16(self.content.text())
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn runs(&self) -> &[StyledRun] {
        self.content.runs()
    }

    pub fn attributes_at(&self, offset: usize) -> Option<&AttributeSet> {
        self.runs()
            .iter()
            .find(|run| run.range.contains(&offset))
            .map(|run| &run.attributes)
    }

    pub fn substring(&self, range: Range<usize>) -> String {
        self.content.substring(range)
    }

    pub fn link_ranges(&self) -> Vec<(Range<usize>, String)> {
        self.content.link_ranges()
    }

    pub fn mention_ranges(&self) -> Vec<(Range<usize>, Mention)> {
        self.content
            .attribute_ranges(|attributes| attributes.mention().cloned())
    }

    pub fn blockquote_components(&self) -> Vec<DocumentComponent> {
        let mut components: Vec<DocumentComponent> = Vec::new();
        for run in self.runs() {
            let is_blockquote =
                run.attributes.contains(AttributeKind::Blockquote);
            match components.last_mut() {
                Some(last) if last.is_blockquote == is_blockquote => {
                    last.range.end = run.range.end;
                }
                _ => components.push(DocumentComponent {
                    range: run.range.clone(),
                    text: String::new(),
                    is_blockquote,
                }),
            }
        }
        for component in &mut components {
            component.text = self.substring(component.range.clone());
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Attribute;

    #[test]
    fn quotes_split_the_document_into_components() {
        let mut content = AttributedText::plain("before quoted after");
        content.add_attribute(7..13, Attribute::Blockquote);
        content.add_attribute(9..11, Attribute::Bold);
        let document = RichTextDocument::new(content);

        let components = document.blockquote_components();
        assert_eq!(components.len(), 3);
        assert_eq!(components[1].text, "quoted");
        assert!(components[1].is_blockquote);
        assert!(!components[2].is_blockquote);
    }

    #[test]
    fn attributes_at_finds_the_covering_run() {
        let mut content = AttributedText::plain("ab");
        content.add_attribute(1..2, Attribute::Italic);
        let document = RichTextDocument::new(content);
        assert!(document.attributes_at(0).is_some_and(AttributeSet::is_empty));
        assert!(document
            .attributes_at(1)
            .is_some_and(|a| a.contains(AttributeKind::Italic)));
        assert!(document.attributes_at(2).is_none());
    }
}
