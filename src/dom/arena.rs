//! Arena-allocated document tree.
//!
//! Nodes live in one vector and link to each other by index, which keeps the
//! tree cheap to build from html5ever callbacks and trivial to walk.

use html5ever::QualName;

/// Index of a node inside a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Marker for "no node" in parent/child/sibling links.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Document,
    Element {
        name: QualName,
        attrs: Vec<Attribute>,
    },
    Text(String),
    /// Comments, processing instructions and XML declarations; content is dropped.
    Comment,
    /// Document type declaration; nothing here reads its identifiers.
    Doctype,
}

/// A single attribute on an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

/// A node plus its links into the tree.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn detached(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// A parsed markup document.
pub struct Dom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl Dom {
    /// Create a tree holding only the document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(Node::detached(NodeData::Document));
        dom
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(Node::detached(NodeData::Element { name, attrs }))
    }

    pub fn create_text(&mut self, text: String) -> NodeId {
        self.alloc(Node::detached(NodeData::Text(text)))
    }

    pub fn create_comment(&mut self) -> NodeId {
        self.alloc(Node::detached(NodeData::Comment))
    }

    pub fn create_doctype(&mut self) -> NodeId {
        self.alloc(Node::detached(NodeData::Doctype))
    }

    /// Attach `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = last;
            node.next_sibling = NodeId::NONE;
        }

        if let Some(prev) = self.get_mut(last) {
            prev.next_sibling = child;
        }

        if let Some(p) = self.get_mut(parent) {
            if p.first_child.is_none() {
                p.first_child = child;
            }
            p.last_child = child;
        }
    }

    /// Attach `new_node` immediately before `sibling`, under the same parent.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(node) = self.get_mut(new_node) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = new_node;
        }
    }

    /// Append text under `parent`, merging into a trailing text node if there is one.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        let last = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(node) = self.get_mut(last)
            && let NodeData::Text(existing) = &mut node.data
        {
            existing.push_str(text);
            return;
        }

        let text_node = self.create_text(text.to_string());
        self.append(parent, text_node);
    }

    /// Unlink `target` from its parent and siblings. The node stays allocated.
    pub fn detach(&mut self, target: NodeId) {
        let (parent, prev, next) = match self.get(target) {
            Some(n) => (n.parent, n.prev_sibling, n.next_sibling),
            None => return,
        };

        if let Some(p) = self.get_mut(prev) {
            p.next_sibling = next;
        } else if let Some(p) = self.get_mut(parent) {
            p.first_child = next;
        }

        if let Some(n) = self.get_mut(next) {
            n.prev_sibling = prev;
        } else if let Some(p) = self.get_mut(parent) {
            p.last_child = prev;
        }

        if let Some(node) = self.get_mut(target) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    pub fn children(&self, parent: NodeId) -> Children<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        Children {
            dom: self,
            current: first,
        }
    }

    /// All nodes matching `predicate`, in document order.
    pub fn find_all<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut found = Vec::new();
        let mut stack = vec![self.document];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.get(id) {
                if predicate(node) {
                    found.push(id);
                }
                // Reversed so the leftmost child is popped first.
                let mut children: Vec<_> = self.children(id).collect();
                children.reverse();
                stack.extend(children);
            }
        }
        found
    }

    /// All elements with the given (lowercase) tag name, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.find_all(|node| match &node.data {
            NodeData::Element { name, .. } => name.local.as_ref() == tag,
            _ => false,
        })
    }

    pub fn get_attr(&self, id: NodeId, attr_name: &str) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { attrs, .. } => attrs
                .iter()
                .find(|a| a.name.local.as_ref() == attr_name)
                .map(|a| a.value.as_str()),
            _ => None,
        })
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over the direct children of a node.
pub struct Children<'a> {
    dom: &'a Dom,
    current: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use html5ever::{LocalName, ns};

    use super::*;

    fn qname(local: &str) -> QualName {
        QualName::new(None, ns!(), LocalName::from(local))
    }

    #[test]
    fn test_append_preserves_order() {
        let mut dom = Dom::new();
        let seq = dom.create_element(qname("seq"), vec![]);
        let first = dom.create_element(qname("par"), vec![]);
        let second = dom.create_element(qname("par"), vec![]);

        dom.append(dom.document(), seq);
        dom.append(seq, first);
        dom.append(seq, second);

        let children: Vec<_> = dom.children(seq).collect();
        assert_eq!(children, vec![first, second]);
    }

    #[test]
    fn test_insert_before_first_child() {
        let mut dom = Dom::new();
        let seq = dom.create_element(qname("seq"), vec![]);
        let par = dom.create_element(qname("par"), vec![]);
        let head = dom.create_element(qname("meta"), vec![]);

        dom.append(dom.document(), seq);
        dom.append(seq, par);
        dom.insert_before(par, head);

        let children: Vec<_> = dom.children(seq).collect();
        assert_eq!(children, vec![head, par]);
    }

    #[test]
    fn test_detach_middle_child() {
        let mut dom = Dom::new();
        let seq = dom.create_element(qname("seq"), vec![]);
        let a = dom.create_element(qname("audio"), vec![]);
        let b = dom.create_element(qname("audio"), vec![]);
        let c = dom.create_element(qname("audio"), vec![]);
        dom.append(dom.document(), seq);
        for id in [a, b, c] {
            dom.append(seq, id);
        }

        dom.detach(b);

        let children: Vec<_> = dom.children(seq).collect();
        assert_eq!(children, vec![a, c]);
        assert!(dom.get(b).unwrap().parent.is_none());
    }

    #[test]
    fn test_text_merging() {
        let mut dom = Dom::new();
        let title = dom.create_element(qname("title"), vec![]);
        dom.append(dom.document(), title);

        dom.append_text(title, "Chapter ");
        dom.append_text(title, "One");

        let children: Vec<_> = dom.children(title).collect();
        assert_eq!(children.len(), 1);
        assert!(matches!(
            &dom.get(children[0]).unwrap().data,
            NodeData::Text(text) if text == "Chapter One"
        ));
    }

    #[test]
    fn test_elements_by_tag_document_order() {
        let mut dom = Dom::new();
        let outer = dom.create_element(
            qname("audio"),
            vec![Attribute {
                name: qname("src"),
                value: "a.mp3".to_string(),
            }],
        );
        let inner = dom.create_element(
            qname("audio"),
            vec![Attribute {
                name: qname("src"),
                value: "b.mp3".to_string(),
            }],
        );
        let sibling = dom.create_element(
            qname("audio"),
            vec![Attribute {
                name: qname("src"),
                value: "c.mp3".to_string(),
            }],
        );
        dom.append(dom.document(), outer);
        dom.append(outer, inner);
        dom.append(dom.document(), sibling);

        let srcs: Vec<_> = dom
            .elements_by_tag("audio")
            .into_iter()
            .filter_map(|id| dom.get_attr(id, "src"))
            .collect();
        assert_eq!(srcs, vec!["a.mp3", "b.mp3", "c.mp3"]);
    }
}
