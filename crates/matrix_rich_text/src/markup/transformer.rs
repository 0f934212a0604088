// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Walks a [`PaDom`] and flattens it into [`AttributedText`].
//!
//! Formatting is inherited bottom-up: every element first renders its
//! children into a fresh [`AttributedText`] and then layers its own
//! attributes over the result. Traits (bold, italic, ...) are unioned with
//! whatever the children already carry, while the font size of an outer
//! element replaces the one set further down.

use url::Url;

use crate::attributed_text::AttributedText;
use crate::attributes::{Attribute, AttributeKind, AttributeSet};
use crate::markup::parser::{PaDom, PaDomHandle, PaDomNode, PaNodeContainer};

/// Marks content that must never be shown in the timeline.
pub(crate) const PAYMENT_DETAILS_ATTRIBUTE: &str =
    "data-msc4286-external-payment-details";

pub(crate) const CODE_BACKGROUND: &str = "codeBackground";

const SUPERSCRIPT_SIZE_DELTA: i8 = -5;
const CODE_SIZE_DELTA: i8 = -1;

#[derive(Clone, Copy, Debug, Default)]
struct TransformContext {
    preserve_whitespace: bool,
    list_depth: usize,
    /// Children of the fragment root keep their whitespace.
    at_root: bool,
}

enum ListMarker {
    Ordered(i64),
    Unordered,
}

impl ListMarker {
    fn next_bullet(&mut self) -> String {
        match self {
            ListMarker::Ordered(counter) => {
                let bullet = format!("{counter}. ");
                *counter = counter.saturating_add(1);
                bullet
            }
            ListMarker::Unordered => String::from("• "),
        }
    }
}

pub(crate) struct MarkupTransformer<'a> {
    dom: &'a PaDom,
}

impl<'a> MarkupTransformer<'a> {
    pub(crate) fn new(dom: &'a PaDom) -> Self {
        Self { dom }
    }

    pub(crate) fn transform(&self) -> AttributedText {
        let Some(root) = self.dom.root_handle() else {
            return AttributedText::new();
        };
        let context = TransformContext {
            at_root: true,
            ..TransformContext::default()
        };
        let mut text =
            self.transform_children(self.dom.children(&root), context);
        text.trim_end();
        text
    }

    fn transform_children(
        &self,
        children: &[PaDomHandle],
        context: TransformContext,
    ) -> AttributedText {
        let mut text = AttributedText::new();
        let mut follows_line_break = false;
        for child in children {
            match self.dom.get_node(child) {
                PaDomNode::Text(node) => {
                    let mut content = if context.at_root
                        || context.preserve_whitespace
                    {
                        node.content.clone()
                    } else {
                        collapse_whitespace(&node.content)
                    };
                    if follows_line_break && content.starts_with(' ') {
                        content.remove(0);
                    }
                    text.push_str(&content, AttributeSet::default());
                    follows_line_break = false;
                }
                PaDomNode::Container(container) => {
                    text.append(self.transform_element(container, context));
                    follows_line_break = container.tag() == "br";
                }
                PaDomNode::Document(_) | PaDomNode::Comment => {}
            }
        }
        text
    }

    fn transform_element(
        &self,
        element: &PaNodeContainer,
        context: TransformContext,
    ) -> AttributedText {
        let context = TransformContext {
            at_root: false,
            ..context
        };
        let tag = element.tag();
        match tag.as_str() {
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                let level = heading_level(&tag);
                let mut text = self.element_children(element, context);
                text.push_str("\n", AttributeSet::default());
                text.update_attributes(|attributes| {
                    attributes.insert(Attribute::Bold);
                    attributes
                        .insert(Attribute::FontSizeDelta((6 - level) * 2));
                });
                text
            }
            "p" | "div" => {
                let mut text = self.element_children(element, context);
                text.push_str("\n", AttributeSet::default());
                text
            }
            "br" | "hr" => AttributedText::plain("\n"),
            "b" | "strong" => {
                self.styled(element, context, [Attribute::Bold])
            }
            "i" | "em" => self.styled(element, context, [Attribute::Italic]),
            "u" => self.styled(element, context, [Attribute::Underline]),
            "s" | "del" => {
                self.styled(element, context, [Attribute::Strikethrough])
            }
            "sup" => self.styled(
                element,
                context,
                [
                    Attribute::Superscript,
                    Attribute::FontSizeDelta(SUPERSCRIPT_SIZE_DELTA),
                ],
            ),
            "sub" => self.styled(
                element,
                context,
                [
                    Attribute::Subscript,
                    Attribute::FontSizeDelta(SUPERSCRIPT_SIZE_DELTA),
                ],
            ),
            "blockquote" => {
                self.styled(element, context, [Attribute::Blockquote])
            }
            "code" | "pre" => {
                let context = TransformContext {
                    preserve_whitespace: context.preserve_whitespace
                        || tag == "pre",
                    ..context
                };
                let mut text = self.element_children(element, context);
                text.update_attributes(|attributes| {
                    attributes.remove(AttributeKind::Link);
                    attributes.remove(AttributeKind::Mention);
                    attributes.insert(Attribute::CodeBlock);
                    attributes.insert(Attribute::BackgroundColor(
                        CODE_BACKGROUND.to_owned(),
                    ));
                    attributes
                        .insert(Attribute::FontSizeDelta(CODE_SIZE_DELTA));
                });
                text
            }
            "a" => {
                let mut text = self.element_children(element, context);
                if let Some(href) = element
                    .get_attr("href")
                    .map(str::trim)
                    .filter(|href| Url::parse(href).is_ok())
                {
                    // Code spans never carry links
                    text.update_attributes(|attributes| {
                        if !attributes.contains(AttributeKind::CodeBlock) {
                            attributes
                                .insert(Attribute::Link(href.to_owned()));
                        }
                    });
                }
                text
            }
            "span" if element.has_attr(PAYMENT_DETAILS_ATTRIBUTE) => {
                AttributedText::new()
            }
            "ul" => {
                self.transform_list(element, ListMarker::Unordered, context)
            }
            "ol" => {
                let start = element
                    .get_attr("start")
                    .and_then(|start| start.trim().parse().ok())
                    .unwrap_or(1);
                let marker = ListMarker::Ordered(start);
                self.transform_list(element, marker, context)
            }
            "li" => {
                // An item outside of any list
                let indent = context.list_depth;
                self.transform_list_item(
                    element,
                    &mut ListMarker::Unordered,
                    indent,
                    context,
                )
            }
            "img" => match element.get_attr("alt").map(str::trim) {
                Some(alt) if !alt.is_empty() => {
                    AttributedText::plain(&format!("[img: {alt}]"))
                }
                _ => AttributedText::plain("[img]"),
            },
            _ => self.element_children(element, context),
        }
    }

    fn element_children(
        &self,
        element: &PaNodeContainer,
        context: TransformContext,
    ) -> AttributedText {
        self.transform_children(&element.children, context)
    }

    /// Children of `element` with `attributes` layered on top.
    fn styled(
        &self,
        element: &PaNodeContainer,
        context: TransformContext,
        attributes: impl IntoIterator<Item = Attribute> + Clone,
    ) -> AttributedText {
        let mut text = self.element_children(element, context);
        text.update_attributes(|existing| {
            for attribute in attributes.clone() {
                existing.insert(attribute);
            }
        });
        text
    }

    fn transform_list(
        &self,
        list: &PaNodeContainer,
        mut marker: ListMarker,
        context: TransformContext,
    ) -> AttributedText {
        let indent = context.list_depth;
        let item_context = TransformContext {
            list_depth: indent + 1,
            ..context
        };
        let mut text = AttributedText::new();
        if indent > 0 {
            text.push_str("\n", AttributeSet::default());
        }
        for child in &list.children {
            match self.dom.get_node(child) {
                PaDomNode::Container(item) if item.tag() == "li" => {
                    text.append(self.transform_list_item(
                        item,
                        &mut marker,
                        indent,
                        item_context,
                    ));
                }
                PaDomNode::Container(other) => {
                    text.append(self.transform_element(other, item_context));
                }
                PaDomNode::Text(node) if !node.content.trim().is_empty() => {
                    text.push_str(
                        &collapse_whitespace(&node.content),
                        AttributeSet::default(),
                    );
                }
                _ => {}
            }
        }
        text
    }

    fn transform_list_item(
        &self,
        item: &PaNodeContainer,
        marker: &mut ListMarker,
        indent: usize,
        context: TransformContext,
    ) -> AttributedText {
        let prefix = format!("{}{}", "  ".repeat(indent), marker.next_bullet());
        let mut text = self
            .transform_children(&item.children, context)
            .prepended(&prefix);
        if !text.ends_with_newline() {
            text.push_str("\n", AttributeSet::default());
        }
        text
    }
}

fn heading_level(tag: &str) -> i8 {
    tag[1..].parse::<i8>().unwrap_or(6).clamp(1, 6)
}

fn collapse_whitespace(text: &str) -> String {
    let mut collapsed = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_whitespace {
                collapsed.push(' ');
            }
            in_whitespace = true;
        } else {
            collapsed.push(c);
            in_whitespace = false;
        }
    }
    collapsed
}
