//! Namespace-resolved markup tree
//!
//! The tree is an arena: nodes live in one vector and refer to each other by
//! [`NodeId`]. Parent links are plain ids, so navigating upward never touches
//! ownership. Only the document element has no parent.

use std::collections::HashMap;

use crate::error::CompileError;
use crate::parser::ast::{Document, Element, Node, QName, Span, Spanned};
use crate::parser::entities::{escape_attribute, escape_text};

/// Namespace of binder directives such as `ui:field`
pub const BINDER_URI: &str = "urn:ui:binder";

/// Namespace URIs starting with this prefix import widget packages
pub const IMPORT_URI_PREFIX: &str = "urn:import:";

/// The `xml:` prefix is bound without a declaration
pub const XML_URI: &str = "http://www.w3.org/XML/1998/namespace";

/// Index of a node in a [`MarkupTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// `xmlns` or `xmlns:prefix` declaration carried by an element
#[derive(Debug, Clone, PartialEq)]
pub struct NamespaceDecl {
    pub prefix: Option<String>,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeAttribute {
    pub prefix: Option<String>,
    pub local_name: String,
    pub namespace_uri: Option<String>,
    pub value: String,
    pub span: Span,
}

impl TreeAttribute {
    pub fn qualified_name(&self) -> String {
        QName::new(self.prefix.as_deref(), self.local_name.as_str()).to_string()
    }

    /// True for attributes in the binder directive namespace
    pub fn is_binder_directive(&self) -> bool {
        self.namespace_uri.as_deref() == Some(BINDER_URI)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementData {
    pub prefix: Option<String>,
    pub local_name: String,
    pub namespace_uri: Option<String>,
    pub namespace_decls: Vec<NamespaceDecl>,
    pub attributes: Vec<TreeAttribute>,
    pub children: Vec<NodeId>,
}

impl ElementData {
    pub fn qualified_name(&self) -> String {
        QName::new(self.prefix.as_deref(), self.local_name.as_str()).to_string()
    }

    /// Find an attribute by namespace URI and local name
    pub fn attribute(&self, namespace_uri: Option<&str>, local_name: &str) -> Option<&TreeAttribute> {
        self.attributes
            .iter()
            .find(|a| a.namespace_uri.as_deref() == namespace_uri && a.local_name == local_name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Element(ElementData),
    Text(String),
    /// Markup substituted verbatim for a consumed subtree
    Fragment(String),
}

#[derive(Debug, Clone)]
struct TreeNode {
    parent: Option<NodeId>,
    span: Span,
    kind: NodeKind,
}

/// In-scope prefix bindings, innermost scope last
type Scopes = Vec<HashMap<Option<String>, Option<String>>>;

#[derive(Debug, Clone)]
pub struct MarkupTree {
    nodes: Vec<TreeNode>,
    root: NodeId,
}

impl MarkupTree {
    /// Build the tree from a parsed document, resolving namespace prefixes
    pub fn from_document(doc: &Document) -> Result<Self, CompileError> {
        let mut tree = MarkupTree {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        let mut scopes: Scopes = vec![HashMap::from([(
            Some("xml".to_string()),
            Some(XML_URI.to_string()),
        )])];
        tree.root = tree.build_element(&doc.root.node, &doc.root.span, None, &mut scopes)?;
        Ok(tree)
    }

    fn build_element(
        &mut self,
        el: &Element,
        span: &Span,
        parent: Option<NodeId>,
        scopes: &mut Scopes,
    ) -> Result<NodeId, CompileError> {
        let mut namespace_decls = Vec::new();
        let mut scope = HashMap::new();
        for attr in el.attributes.iter().filter(|a| a.name.node.is_namespace_declaration()) {
            let prefix = attr.name.node.prefix.as_ref().map(|_| attr.name.node.local.clone());
            let uri = attr.value.node.clone();
            scope.insert(prefix.clone(), (!uri.is_empty()).then(|| uri.clone()));
            namespace_decls.push(NamespaceDecl { prefix, uri });
        }
        scopes.push(scope);

        let result = self.build_element_in_scope(el, span, parent, namespace_decls, scopes);
        scopes.pop();
        result
    }

    fn build_element_in_scope(
        &mut self,
        el: &Element,
        span: &Span,
        parent: Option<NodeId>,
        namespace_decls: Vec<NamespaceDecl>,
        scopes: &mut Scopes,
    ) -> Result<NodeId, CompileError> {
        let namespace_uri = resolve_element_prefix(&el.name, scopes)?;

        let mut attributes = Vec::new();
        for attr in el.attributes.iter().filter(|a| !a.name.node.is_namespace_declaration()) {
            // Unprefixed attributes are in no namespace
            let namespace_uri = match &attr.name.node.prefix {
                Some(_) => resolve_element_prefix(&attr.name, scopes)?,
                None => None,
            };
            attributes.push(TreeAttribute {
                prefix: attr.name.node.prefix.clone(),
                local_name: attr.name.node.local.clone(),
                namespace_uri,
                value: attr.value.node.clone(),
                span: attr.value.span.clone(),
            });
        }

        let id = self.push(TreeNode {
            parent,
            span: span.clone(),
            kind: NodeKind::Element(ElementData {
                prefix: el.name.node.prefix.clone(),
                local_name: el.name.node.local.clone(),
                namespace_uri,
                namespace_decls,
                attributes,
                children: Vec::new(),
            }),
        });

        let mut children = Vec::with_capacity(el.children.len());
        for child in &el.children {
            let child_id = match &child.node {
                Node::Element(child_el) => {
                    self.build_element(child_el, &child.span, Some(id), scopes)?
                }
                Node::Text(text) => self.push(TreeNode {
                    parent: Some(id),
                    span: child.span.clone(),
                    kind: NodeKind::Text(text.clone()),
                }),
            };
            children.push(child_id);
        }

        if let NodeKind::Element(data) = &mut self.nodes[id.0].kind {
            data.children = children;
        }
        Ok(id)
    }

    fn push(&mut self, node: TreeNode) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// The document element
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn span(&self, id: NodeId) -> &Span {
        &self.nodes[id.0].span
    }

    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => Some(data),
            _ => None,
        }
    }

    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.local_name.as_str())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn parent_element(&self, id: NodeId) -> Option<&ElementData> {
        self.parent(id).and_then(|p| self.element(p))
    }

    /// Children of an element in document order; empty for other nodes
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].kind {
            NodeKind::Element(data) => &data.children,
            _ => &[],
        }
    }

    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.element(c).is_some())
    }

    /// Concatenated direct text children
    pub fn text_content(&self, id: NodeId) -> String {
        self.children(id)
            .iter()
            .filter_map(|&c| match &self.nodes[c.0].kind {
                NodeKind::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Replace a node with a verbatim markup fragment.
    ///
    /// The node's attributes and children are dropped; descendants stay in
    /// the arena but are no longer reachable from the root.
    pub fn substitute(&mut self, id: NodeId, fragment: impl Into<String>) {
        self.nodes[id.0].kind = NodeKind::Fragment(fragment.into());
    }

    /// Serialize a subtree back to markup
    pub fn to_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Text(text) => out.push_str(&escape_text(text)),
            NodeKind::Fragment(fragment) => out.push_str(fragment),
            NodeKind::Element(data) => {
                let name = data.qualified_name();
                out.push('<');
                out.push_str(&name);
                for decl in &data.namespace_decls {
                    match &decl.prefix {
                        Some(prefix) => out.push_str(&format!(" xmlns:{}", prefix)),
                        None => out.push_str(" xmlns"),
                    }
                    out.push_str(&format!("=\"{}\"", escape_attribute(&decl.uri)));
                }
                for attr in &data.attributes {
                    out.push_str(&format!(
                        " {}=\"{}\"",
                        attr.qualified_name(),
                        escape_attribute(&attr.value)
                    ));
                }
                if data.children.is_empty() {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for &child in &data.children {
                    self.write_markup(child, out);
                }
                out.push_str(&format!("</{}>", name));
            }
        }
    }
}

/// Resolve the namespace URI of a prefixed (or default-namespaced) name
fn resolve_element_prefix(
    name: &Spanned<QName>,
    scopes: &Scopes,
) -> Result<Option<String>, CompileError> {
    let key = name.node.prefix.clone();
    for scope in scopes.iter().rev() {
        if let Some(uri) = scope.get(&key) {
            return Ok(uri.clone());
        }
    }
    match key {
        Some(prefix) => Err(CompileError::UnboundPrefix {
            prefix,
            span: name.span.clone(),
        }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn tree(source: &str) -> MarkupTree {
        MarkupTree::from_document(&parse(source).expect("Should parse")).expect("Should build")
    }

    #[test]
    fn test_root_has_no_parent() {
        let t = tree("<div><p/></div>");
        assert_eq!(t.parent(t.root()), None);
        let p = t.child_elements(t.root()).next().unwrap();
        assert_eq!(t.parent(p), Some(t.root()));
        assert_eq!(t.parent_element(p).unwrap().local_name, "div");
    }

    #[test]
    fn test_namespace_resolution() {
        let t = tree(
            r#"<ui:UiBinder xmlns:ui="urn:ui:binder" xmlns:g="urn:import:app.widgets">
                 <g:Button ui:field="ok" text="Go"/>
               </ui:UiBinder>"#,
        );
        let root = t.element(t.root()).unwrap();
        assert_eq!(root.namespace_uri.as_deref(), Some(BINDER_URI));
        assert_eq!(root.namespace_decls.len(), 2);

        let button = t.child_elements(t.root()).next().unwrap();
        let data = t.element(button).unwrap();
        assert_eq!(data.namespace_uri.as_deref(), Some("urn:import:app.widgets"));
        assert_eq!(data.attribute(Some(BINDER_URI), "field").unwrap().value, "ok");
        assert_eq!(data.attribute(None, "text").unwrap().value, "Go");
    }

    #[test]
    fn test_default_namespace_applies_to_elements_only() {
        let t = tree(r#"<div xmlns="http://www.w3.org/1999/xhtml" class="x"/>"#);
        let data = t.element(t.root()).unwrap();
        assert_eq!(
            data.namespace_uri.as_deref(),
            Some("http://www.w3.org/1999/xhtml")
        );
        assert_eq!(data.attributes[0].namespace_uri, None);
    }

    #[test]
    fn test_namespace_scope_ends_with_element() {
        let source = r#"<root><a xmlns:g="urn:import:x"><g:W/></a><g:W/></root>"#;
        let err = MarkupTree::from_document(&parse(source).unwrap()).unwrap_err();
        assert!(matches!(err, CompileError::UnboundPrefix { ref prefix, .. } if prefix == "g"));
    }

    #[test]
    fn test_unbound_attribute_prefix() {
        let err = MarkupTree::from_document(&parse(r#"<div ui:field="x"/>"#).unwrap()).unwrap_err();
        assert!(matches!(err, CompileError::UnboundPrefix { .. }));
    }

    #[test]
    fn test_text_content_and_children() {
        let t = tree("<p>one <b>two</b> three</p>");
        assert_eq!(t.children(t.root()).len(), 3);
        assert_eq!(t.child_elements(t.root()).count(), 1);
        assert_eq!(t.text_content(t.root()), "one  three");
    }

    #[test]
    fn test_substitute_replaces_subtree() {
        let mut t = tree(r#"<ul><li class="a">x</li><li>y</li></ul>"#);
        let first = t.child_elements(t.root()).next().unwrap();
        t.substitute(first, "<li></li>");
        assert_eq!(t.to_markup(t.root()), "<ul><li></li><li>y</li></ul>");
        assert!(t.element(first).is_none());
        assert_eq!(t.parent(first), Some(t.root()));
    }

    #[test]
    fn test_to_markup_escapes() {
        let t = tree(r#"<a title="&quot;q&quot;">1 &lt; 2</a>"#);
        assert_eq!(t.to_markup(t.root()), r#"<a title="&quot;q&quot;">1 &lt; 2</a>"#);
    }
}
