// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::{paqual_name, PaDom, PaDomHandle, PaDomNode, PaNodeContainer};
use html5ever::interface::NextParserState;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};
use std::cell::{Ref, RefCell};

/// Tree sink collecting html5ever output into a [`PaDom`]. Every callback
/// is tolerant: malformed input ends up in `parse_errors`, never in a
/// panic.
pub(crate) struct PaDomCreator {
    dom: RefCell<PaDom>,
}

impl PaDomCreator {
    pub fn parse(html: &str) -> PaDom {
        parse_fragment(
            PaDomCreator::default(),
            Default::default(),
            paqual_name(""),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }

    fn insert(&self, parent: &PaDomHandle, child: NodeOrText<PaDomHandle>) {
        let mut dom = self.dom.borrow_mut();
        match child {
            NodeOrText::AppendNode(child) => dom.append_child(parent, child),
            NodeOrText::AppendText(tendril) => {
                dom.append_text(parent, tendril.as_ref())
            }
        }
    }
}

impl Default for PaDomCreator {
    fn default() -> Self {
        Self {
            dom: RefCell::new(PaDom::new()),
        }
    }
}

fn to_attr_pairs(attrs: Vec<Attribute>) -> Vec<(String, String)> {
    attrs
        .into_iter()
        .map(|attr| {
            (
                attr.name.local.as_ref().to_owned(),
                attr.value.as_ref().to_owned(),
            )
        })
        .collect()
}

impl TreeSink for PaDomCreator {
    type Handle = PaDomHandle;
    type Output = PaDom;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        self.dom.into_inner()
    }

    fn parse_error(&self, msg: std::borrow::Cow<'static, str>) {
        self.dom.borrow_mut().parse_errors.push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.dom.borrow().document_handle().clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.dom.borrow(), |dom| dom.name(target))
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        self.dom
            .borrow_mut()
            .add_node(PaDomNode::Container(PaNodeContainer {
                name,
                attrs: to_attr_pairs(attrs),
                children: Vec::new(),
            }))
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.dom.borrow_mut().add_node(PaDomNode::Comment)
    }

    fn create_pi(
        &self,
        _target: StrTendril,
        _data: StrTendril,
    ) -> Self::Handle {
        self.dom.borrow_mut().add_node(PaDomNode::Comment)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        self.insert(parent, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.dom.borrow().parent(element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.insert(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctypes carry nothing we render
    }

    fn mark_script_already_started(&self, _node: &Self::Handle) {}

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let mut dom = self.dom.borrow_mut();
        let handle = match new_node {
            NodeOrText::AppendNode(handle) => handle,
            NodeOrText::AppendText(tendril) => {
                dom.add_node(PaDomNode::Text(super::PaNodeText {
                    content: tendril.as_ref().to_owned(),
                }))
            }
        };
        dom.insert_before(sibling, handle);
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let mut dom = self.dom.borrow_mut();
        if let PaDomNode::Container(node) = dom.get_mut_node(target) {
            for (name, value) in to_attr_pairs(attrs) {
                if !node.attrs.iter().any(|(existing, _)| *existing == name) {
                    node.attrs.push((name, value));
                }
            }
        }
    }

    fn associate_with_form(
        &self,
        _target: &Self::Handle,
        _form: &Self::Handle,
        _nodes: (&Self::Handle, Option<&Self::Handle>),
    ) {
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.dom.borrow_mut().detach(target);
    }

    fn reparent_children(
        &self,
        node: &Self::Handle,
        new_parent: &Self::Handle,
    ) {
        self.dom.borrow_mut().reparent_children(node, new_parent);
    }

    fn is_mathml_annotation_xml_integration_point(
        &self,
        _handle: &Self::Handle,
    ) -> bool {
        false
    }

    fn set_current_line(&self, _line_number: u64) {}

    fn complete_script(&self, _node: &Self::Handle) -> NextParserState {
        NextParserState::Continue
    }

    fn allow_declarative_shadow_roots(
        &self,
        _intended_parent: &Self::Handle,
    ) -> bool {
        false
    }

    fn attach_declarative_shadow(
        &self,
        _location: &Self::Handle,
        _template: &Self::Handle,
        _attrs: Vec<Attribute>,
    ) -> Result<(), String> {
        Err(String::from("declarative shadow roots are not supported"))
    }
}
