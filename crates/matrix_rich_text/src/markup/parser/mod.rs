// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A small arena DOM ("PaDom") filled in by html5ever.
//!
//! html5ever drives [`padom_creator::PaDomCreator`] as its tree sink; the
//! result is a flat list of nodes addressed by [`PaDomHandle`] indices.

mod padom_creator;
mod panode_container;

use html5ever::{LocalName, Namespace, QualName};

use crate::error::HtmlParseError;

pub(crate) use self::padom_creator::PaDomCreator;
pub(crate) use self::panode_container::PaNodeContainer;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PaDomHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PaDomNode {
    Document(PaNodeDocument),
    Container(PaNodeContainer),
    Text(PaNodeText),
    /// Comments and processing instructions. Kept so that html5ever can
    /// hold handles to them, never rendered.
    Comment,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct PaNodeDocument {
    pub(crate) children: Vec<PaDomHandle>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeText {
    pub(crate) content: String,
}

#[derive(Clone, Debug)]
pub(crate) struct PaDom {
    nodes: Vec<PaDomNode>,
    document_handle: PaDomHandle,
    /// Name reported for nodes that are not elements.
    unnamed: QualName,
    pub(crate) parse_errors: Vec<String>,
}

pub(crate) fn paqual_name(local_name: &str) -> QualName {
    QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from(local_name),
    )
}

/// Parse an HTML fragment. Markup errors are recovered from the way a
/// browser would; only a fragment without any root element is rejected.
pub(crate) fn parse_html(html: &str) -> Result<PaDom, HtmlParseError> {
    let dom = PaDomCreator::parse(html);
    if !dom.parse_errors.is_empty() {
        tracing::trace!(
            errors = ?dom.parse_errors,
            "HTML fragment parsed with recoverable errors"
        );
    }
    if dom.root_handle().is_none() {
        return Err(HtmlParseError::NoRoot);
    }
    Ok(dom)
}

fn node_children(node: &PaDomNode) -> &[PaDomHandle] {
    match node {
        PaDomNode::Document(document) => &document.children,
        PaDomNode::Container(container) => &container.children,
        PaDomNode::Text(_) | PaDomNode::Comment => &[],
    }
}

impl PaDom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![PaDomNode::Document(PaNodeDocument::default())],
            document_handle: PaDomHandle(0),
            unnamed: paqual_name(""),
            parse_errors: Vec::new(),
        }
    }

    pub(crate) fn document_handle(&self) -> &PaDomHandle {
        &self.document_handle
    }

    /// The element holding the parsed fragment.
    pub(crate) fn root_handle(&self) -> Option<PaDomHandle> {
        self.children(&self.document_handle)
            .iter()
            .find(|handle| {
                matches!(self.get_node(handle), PaDomNode::Container(_))
            })
            .cloned()
    }

    pub(crate) fn add_node(&mut self, node: PaDomNode) -> PaDomHandle {
        self.nodes.push(node);
        PaDomHandle(self.nodes.len() - 1)
    }

    pub(crate) fn get_node(&self, handle: &PaDomHandle) -> &PaDomNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(
        &mut self,
        handle: &PaDomHandle,
    ) -> &mut PaDomNode {
        &mut self.nodes[handle.0]
    }

    pub(crate) fn name(&self, handle: &PaDomHandle) -> &QualName {
        match self.get_node(handle) {
            PaDomNode::Container(container) => &container.name,
            _ => &self.unnamed,
        }
    }

    pub(crate) fn children(&self, handle: &PaDomHandle) -> &[PaDomHandle] {
        node_children(self.get_node(handle))
    }

    fn children_mut(
        &mut self,
        handle: &PaDomHandle,
    ) -> Option<&mut Vec<PaDomHandle>> {
        match self.get_mut_node(handle) {
            PaDomNode::Document(document) => Some(&mut document.children),
            PaDomNode::Container(container) => Some(&mut container.children),
            PaDomNode::Text(_) | PaDomNode::Comment => None,
        }
    }

    pub(crate) fn parent(&self, handle: &PaDomHandle) -> Option<PaDomHandle> {
        self.nodes
            .iter()
            .position(|node| node_children(node).contains(handle))
            .map(PaDomHandle)
    }

    pub(crate) fn append_child(
        &mut self,
        parent: &PaDomHandle,
        child: PaDomHandle,
    ) {
        if let Some(children) = self.children_mut(parent) {
            children.push(child);
        }
    }

    /// Append text to `parent`, extending its last child if that is
    /// already a text node.
    pub(crate) fn append_text(&mut self, parent: &PaDomHandle, text: &str) {
        let existing = match self.get_node(parent) {
            PaDomNode::Text(_) => Some(parent.clone()),
            _ => self
                .children(parent)
                .last()
                .filter(|handle| {
                    matches!(self.get_node(handle), PaDomNode::Text(_))
                })
                .cloned(),
        };
        if let Some(handle) = existing {
            if let PaDomNode::Text(node) = self.get_mut_node(&handle) {
                node.content.push_str(text);
            }
            return;
        }
        let handle = self.add_node(PaDomNode::Text(PaNodeText {
            content: text.to_owned(),
        }));
        self.append_child(parent, handle);
    }

    pub(crate) fn insert_before(
        &mut self,
        sibling: &PaDomHandle,
        child: PaDomHandle,
    ) {
        let Some(parent) = self.parent(sibling) else {
            return;
        };
        if let Some(children) = self.children_mut(&parent) {
            let index = children
                .iter()
                .position(|handle| handle == sibling)
                .unwrap_or(children.len());
            children.insert(index, child);
        }
    }

    pub(crate) fn detach(&mut self, target: &PaDomHandle) {
        let Some(parent) = self.parent(target) else {
            return;
        };
        if let Some(children) = self.children_mut(&parent) {
            children.retain(|handle| handle != target);
        }
    }

    pub(crate) fn reparent_children(
        &mut self,
        node: &PaDomHandle,
        new_parent: &PaDomHandle,
    ) {
        let moved = self
            .children_mut(node)
            .map(std::mem::take)
            .unwrap_or_default();
        if let Some(children) = self.children_mut(new_parent) {
            children.extend(moved);
        }
    }
}

impl Default for PaDom {
    fn default() -> Self {
        Self::new()
    }
}
