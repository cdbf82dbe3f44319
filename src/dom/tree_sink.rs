//! html5ever `TreeSink` that builds a [`Dom`].

use std::borrow::Cow;
use std::cell::RefCell;

use html5ever::tendril::StrTendril;
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute as Html5Attribute, QualName};

use super::arena::{Attribute, Dom, NodeData, NodeId};

/// Handle html5ever uses to refer to nodes while building.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle(pub NodeId);

impl Default for Handle {
    fn default() -> Self {
        Handle(NodeId::NONE)
    }
}

/// Sink that records every tree-builder callback into an arena.
///
/// html5ever drives the sink through `&self`, so the tree sits in a `RefCell`.
pub struct DomSink {
    dom: RefCell<Dom>,
    errors: RefCell<usize>,
}

impl Default for DomSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomSink {
    pub fn new() -> Self {
        Self {
            dom: RefCell::new(Dom::new()),
            errors: RefCell::new(0),
        }
    }

    /// Number of recoverable parse errors html5ever reported.
    pub fn error_count(&self) -> usize {
        *self.errors.borrow()
    }

    pub fn into_dom(self) -> Dom {
        self.dom.into_inner()
    }

    fn convert_attrs(attrs: Vec<Html5Attribute>) -> Vec<Attribute> {
        attrs
            .into_iter()
            .map(|a| Attribute {
                name: a.name,
                value: a.value.to_string(),
            })
            .collect()
    }

    fn append_to(dom: &mut Dom, parent: NodeId, child: NodeOrText<Handle>) {
        match child {
            NodeOrText::AppendNode(node) => dom.append(parent, node.0),
            NodeOrText::AppendText(text) => dom.append_text(parent, &text),
        }
    }
}

impl TreeSink for DomSink {
    type Handle = Handle;
    type Output = Self;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {
        // NCC and SMIL files are routinely malformed; count and carry on.
        *self.errors.borrow_mut() += 1;
    }

    fn get_document(&self) -> Self::Handle {
        Handle(self.dom.borrow().document())
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static NO_NAME: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };

        let dom = self.dom.borrow();
        match dom.get(target.0).map(|n| &n.data) {
            Some(NodeData::Element { name, .. }) => {
                // SAFETY: the name lives in `Dom::nodes`, which can reallocate
                // (and move it) on the next `create_element`. html5ever only
                // uses the reference within the current tree-builder step and
                // never holds it across a `create_element` call.
                unsafe { std::mem::transmute::<&QualName, &'a QualName>(name) }
            }
            _ => &NO_NAME,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Html5Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        let attrs = Self::convert_attrs(attrs);
        Handle(self.dom.borrow_mut().create_element(name, attrs))
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        Handle(self.dom.borrow_mut().create_comment())
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        Handle(self.dom.borrow_mut().create_comment())
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        Self::append_to(&mut self.dom.borrow_mut(), parent.0, child);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let mut dom = self.dom.borrow_mut();
        let parent = dom
            .get(element.0)
            .map(|n| n.parent)
            .unwrap_or(NodeId::NONE);
        let target = if parent.is_some() {
            parent
        } else {
            prev_element.0
        };
        Self::append_to(&mut dom, target, child);
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        let mut dom = self.dom.borrow_mut();
        let doc = dom.document();
        let doctype = dom.create_doctype();
        dom.append(doc, doctype);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        // Template contents are kept inline; nothing here reads them separately.
        *target
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x.0 == y.0
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let mut dom = self.dom.borrow_mut();
        let node = match new_node {
            NodeOrText::AppendNode(node) => node.0,
            NodeOrText::AppendText(text) => dom.create_text(text.to_string()),
        };
        dom.insert_before(sibling.0, node);
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Html5Attribute>) {
        let mut dom = self.dom.borrow_mut();
        if let Some(node) = dom.get_mut(target.0)
            && let NodeData::Element {
                attrs: existing, ..
            } = &mut node.data
        {
            for attr in Self::convert_attrs(attrs) {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(attr);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.dom.borrow_mut().detach(target.0);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let mut dom = self.dom.borrow_mut();
        let children: Vec<_> = dom.children(node.0).collect();
        for child in children {
            dom.detach(child);
            dom.append(new_parent.0, child);
        }
    }
}
