// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Attributes that can be attached to a run of text.
//!
//! Each [`Attribute`] variant is its own kind; an [`AttributeSet`] holds at
//! most one attribute of every [`AttributeKind`], so a run can never carry
//! two links or two font sizes at once.

use strum_macros::EnumDiscriminants;

/// A Matrix entity (or the whole room) referenced by a run of text.
///
/// Only identifiers are stored. Display names are up to whoever renders the
/// mention.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mention {
    User {
        user_id: String,
    },
    RoomId {
        room_id: String,
    },
    RoomAlias {
        alias: String,
        display_name: Option<String>,
    },
    EventOnRoom {
        room_id: String,
        event_id: String,
    },
    EventOnAlias {
        alias: String,
        event_id: String,
    },
    /// `@room`: notifies every member of the room.
    AllUsers,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, EnumDiscriminants)]
#[strum_discriminants(name(AttributeKind), derive(PartialOrd, Ord, Hash))]
pub enum Attribute {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    /// Raised baseline.
    Superscript,
    /// Lowered baseline.
    Subscript,
    Blockquote,
    CodeBlock,
    /// An opaque colour token, resolved by the renderer.
    BackgroundColor(String),
    /// Points relative to the body font size.
    FontSizeDelta(i8),
    Link(String),
    Mention(Mention),
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        self.into()
    }
}

/// A small ordered set of attributes, keyed by [`AttributeKind`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct AttributeSet {
    attributes: Vec<Attribute>,
}

impl AttributeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `attribute`, replacing (and returning) any attribute of the same
    /// kind that was already present.
    pub fn insert(&mut self, attribute: Attribute) -> Option<Attribute> {
        match self
            .attributes
            .binary_search_by_key(&attribute.kind(), Attribute::kind)
        {
            Ok(index) => {
                Some(std::mem::replace(&mut self.attributes[index], attribute))
            }
            Err(index) => {
                self.attributes.insert(index, attribute);
                None
            }
        }
    }

    pub fn remove(&mut self, kind: AttributeKind) -> Option<Attribute> {
        self.position(kind)
            .map(|index| self.attributes.remove(index))
    }

    pub fn get(&self, kind: AttributeKind) -> Option<&Attribute> {
        self.position(kind).map(|index| &self.attributes[index])
    }

    pub fn contains(&self, kind: AttributeKind) -> bool {
        self.position(kind).is_some()
    }

    pub fn link(&self) -> Option<&str> {
        match self.get(AttributeKind::Link) {
            Some(Attribute::Link(url)) => Some(url),
            _ => None,
        }
    }

    pub fn mention(&self) -> Option<&Mention> {
        match self.get(AttributeKind::Mention) {
            Some(Attribute::Mention(mention)) => Some(mention),
            _ => None,
        }
    }

    pub fn font_size_delta(&self) -> i8 {
        match self.get(AttributeKind::FontSizeDelta) {
            Some(Attribute::FontSizeDelta(delta)) => *delta,
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter()
    }

    fn position(&self, kind: AttributeKind) -> Option<usize> {
        self.attributes
            .binary_search_by_key(&kind, Attribute::kind)
            .ok()
    }
}

impl FromIterator<Attribute> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        let mut set = Self::new();
        for attribute in iter {
            set.insert(attribute);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inserting_a_trait_keeps_the_others() {
        let mut set = AttributeSet::from_iter([Attribute::Italic]);
        set.insert(Attribute::Bold);
        assert!(set.contains(AttributeKind::Bold));
        assert!(set.contains(AttributeKind::Italic));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn only_one_link_per_set() {
        let mut set = AttributeSet::new();
        set.insert(Attribute::Link("https://a.org".to_owned()));
        let previous = set.insert(Attribute::Link("https://b.org".to_owned()));
        assert_eq!(previous, Some(Attribute::Link("https://a.org".to_owned())));
        assert_eq!(set.link(), Some("https://b.org"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn sets_compare_independently_of_insertion_order() {
        let a = AttributeSet::from_iter([Attribute::Bold, Attribute::Italic]);
        let b = AttributeSet::from_iter([Attribute::Italic, Attribute::Bold]);
        assert_eq!(a, b);
    }

    #[test]
    fn font_size_defaults_to_zero() {
        let mut set = AttributeSet::new();
        assert_eq!(set.font_size_delta(), 0);
        set.insert(Attribute::FontSizeDelta(-5));
        assert_eq!(set.font_size_delta(), -5);
        set.remove(AttributeKind::FontSizeDelta);
        assert!(set.is_empty());
    }
}
