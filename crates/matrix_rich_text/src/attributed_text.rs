// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Mutable attributed text used while a document is being built.
//!
//! The text is covered by contiguous, non-empty [`StyledRun`]s. Runs are
//! split on demand when an attribute is applied to part of one, and merged
//! back together when the document is finalised.

use std::ops::Range;

use crate::attributes::{Attribute, AttributeKind, AttributeSet};
use crate::utf16;

/// A half-open UTF-16 range of the backing string and its attributes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StyledRun {
    pub range: Range<usize>,
    pub attributes: AttributeSet,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AttributedText {
    text: String,
    /// Length of `text` in UTF-16 code units.
    len: usize,
    runs: Vec<StyledRun>,
}

impl AttributedText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unstyled text.
    pub fn plain(text: &str) -> Self {
        let mut attributed = Self::new();
        attributed.push_str(text, AttributeSet::default());
        attributed
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in UTF-16 code units.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn push_str(&mut self, text: &str, attributes: AttributeSet) {
        if text.is_empty() {
            return;
        }
        let added = utf16::len(text);
        self.text.push_str(text);
        self.runs.push(StyledRun {
            range: self.len..self.len + added,
            attributes,
        });
        self.len += added;
    }

    pub fn append(&mut self, other: AttributedText) {
        let offset = self.len;
        self.text.push_str(&other.text);
        self.runs.extend(other.runs.into_iter().map(|mut run| {
            run.range = run.range.start + offset..run.range.end + offset;
            run
        }));
        self.len += other.len;
    }

    /// `prefix` (unstyled) followed by `self`.
    pub fn prepended(self, prefix: &str) -> Self {
        let mut result = Self::plain(prefix);
        result.append(self);
        result
    }

    pub fn ends_with_newline(&self) -> bool {
        self.text.ends_with('\n')
    }

    /// Apply `update` to the attributes of every run.
    pub fn update_attributes(
        &mut self,
        mut update: impl FnMut(&mut AttributeSet),
    ) {
        for run in &mut self.runs {
            update(&mut run.attributes);
        }
    }

    /// Apply `update` to the attributes covering `range`, splitting runs at
    /// its boundaries where needed.
    pub fn update_range(
        &mut self,
        range: Range<usize>,
        mut update: impl FnMut(&mut AttributeSet),
    ) {
        let range = range.start.min(self.len)..range.end.min(self.len);
        if range.is_empty() {
            return;
        }
        self.split_at(range.start);
        self.split_at(range.end);
        for run in self.runs.iter_mut().filter(|run| {
            run.range.start >= range.start && run.range.end <= range.end
        }) {
            update(&mut run.attributes);
        }
    }

    pub fn add_attribute(&mut self, range: Range<usize>, attribute: Attribute) {
        self.update_range(range, |attributes| {
            attributes.insert(attribute.clone());
        });
    }

    pub fn remove_attribute(
        &mut self,
        range: Range<usize>,
        kind: AttributeKind,
    ) {
        self.update_range(range, |attributes| {
            attributes.remove(kind);
        });
    }

    /// Whether any run overlapping `range` satisfies `predicate`.
    pub fn any_in_range(
        &self,
        range: Range<usize>,
        predicate: impl Fn(&AttributeSet) -> bool,
    ) -> bool {
        self.runs
            .iter()
            .filter(|run| {
                run.range.start < range.end && range.start < run.range.end
            })
            .any(|run| predicate(&run.attributes))
    }

    /// Maximal ranges over which `value_of` returns the same `Some` value.
    pub fn attribute_ranges<T, F>(&self, value_of: F) -> Vec<(Range<usize>, T)>
    where
        T: PartialEq,
        F: Fn(&AttributeSet) -> Option<T>,
    {
        let mut ranges: Vec<(Range<usize>, T)> = Vec::new();
        for run in &self.runs {
            let Some(value) = value_of(&run.attributes) else {
                continue;
            };
            if let Some((range, last)) = ranges.last_mut() {
                if range.end == run.range.start && *last == value {
                    range.end = run.range.end;
                    continue;
                }
            }
            ranges.push((run.range.clone(), value));
        }
        ranges
    }

    pub fn link_ranges(&self) -> Vec<(Range<usize>, String)> {
        self.attribute_ranges(|attributes| attributes.link().map(str::to_owned))
    }

    pub fn substring(&self, range: Range<usize>) -> String {
        utf16::substring(&self.text, range)
    }

    /// Remove trailing whitespace and newlines, shortening runs to match.
    pub fn trim_end(&mut self) {
        let kept = self.text.trim_end().len();
        let removed = utf16::len(&self.text[kept..]);
        if removed == 0 {
            return;
        }
        self.text.truncate(kept);
        self.len -= removed;
        let len = self.len;
        self.runs.retain_mut(|run| {
            run.range.end = run.range.end.min(len);
            run.range.start < len
        });
    }

    /// Join neighbouring runs whose attributes are identical.
    pub fn merge_adjacent_runs(&mut self) {
        let mut merged: Vec<StyledRun> = Vec::with_capacity(self.runs.len());
        for run in std::mem::take(&mut self.runs) {
            match merged.last_mut() {
                Some(last)
                    if last.range.end == run.range.start
                        && last.attributes == run.attributes =>
                {
                    last.range.end = run.range.end;
                }
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }

    fn split_at(&mut self, offset: usize) {
        let Some(index) = self.runs.iter().position(|run| {
            run.range.start < offset && offset < run.range.end
        }) else {
            return;
        };
        let tail = StyledRun {
            range: offset..self.runs[index].range.end,
            attributes: self.runs[index].attributes.clone(),
        };
        self.runs[index].range.end = offset;
        self.runs.insert(index + 1, tail);
    }
}
