//! The writer driving a full compilation pass

use crate::config::BinderConfig;
use crate::error::{CompileError, Span};
use crate::interpreter::HtmlPanelParser;
use crate::policy::PlaceholderPolicy;
use crate::tree::{ElementData, MarkupTree, NodeId, BINDER_URI, IMPORT_URI_PREFIX};

use super::cursor::ChildCursor;
use super::fields::{FieldManager, FieldName, GeneratedField};
use super::format::{format_statement, string_literal};
use super::output::{CompiledBinder, Substitution};
use super::HostWriter;

/// Per-pass emitter state: statements, fields, ids and open DOM containers
#[derive(Debug)]
pub struct BinderWriter {
    config: BinderConfig,
    fields: FieldManager,
    statements: Vec<String>,
    cursors: Vec<ChildCursor>,
    substitutions: Vec<Substitution>,
    next_id: u32,
}

impl BinderWriter {
    pub fn new(config: BinderConfig) -> Self {
        Self {
            config,
            fields: FieldManager::new(),
            statements: Vec::new(),
            cursors: Vec::new(),
            substitutions: Vec::new(),
            next_id: 1,
        }
    }

    /// Validate the `<ui:UiBinder>` document element and bind its widget.
    ///
    /// Returns the field holding the root widget.
    pub fn parse_document(&mut self, tree: &MarkupTree) -> Result<FieldName, CompileError> {
        let root = tree.root();
        let span = tree.span(root).clone();
        let data = tree.element(root).ok_or_else(|| CompileError::MissingRootWidget {
            span: span.clone(),
        })?;

        if data.local_name != "UiBinder" || data.namespace_uri.as_deref() != Some(BINDER_URI) {
            return Err(CompileError::InvalidRoot {
                found: data.qualified_name(),
                expected: BINDER_URI.to_string(),
                span,
            });
        }

        let children: Vec<NodeId> = tree.child_elements(root).collect();
        let widget = match children.as_slice() {
            [only] if tree.text_content(root).trim().is_empty() => *only,
            _ => return Err(CompileError::MissingRootWidget { span }),
        };
        if !self.is_widget_element(tree, widget) {
            return Err(CompileError::MissingRootWidget {
                span: tree.span(widget).clone(),
            });
        }

        tracing::debug!(root = %data.qualified_name(), "parsing binder document");
        self.parse_element_to_field(tree, widget)
    }

    /// Close the pass and hand back everything it produced
    pub fn finish(self, root_field: FieldName) -> CompiledBinder {
        tracing::debug!(
            fields = self.fields.fields().len(),
            statements = self.statements.len(),
            substitutions = self.substitutions.len(),
            "finished binder pass"
        );
        CompiledBinder {
            fields: self.fields.into_fields(),
            init_statements: self.statements,
            root_field,
            substitutions: self.substitutions,
            markup: String::new(),
        }
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn fields(&self) -> &FieldManager {
        &self.fields
    }

    /// Attach widget children, or set text content, on a non-panel widget
    fn parse_widget_children(
        &mut self,
        tree: &MarkupTree,
        elem: NodeId,
        data: &ElementData,
        field: &FieldName,
    ) -> Result<(), CompileError> {
        let children: Vec<NodeId> = tree.child_elements(elem).collect();
        let text = tree.text_content(elem);
        let text = text.trim();

        if children.is_empty() {
            if !text.is_empty() {
                self.add_init_statement("%s.setText(%s);", &[field.as_str(), &string_literal(text)])?;
            }
            return Ok(());
        }

        if !text.is_empty() {
            return Err(CompileError::MixedContent {
                widget: data.qualified_name(),
                span: tree.span(elem).clone(),
            });
        }

        for child in children {
            if !self.is_widget_element(tree, child) {
                let element = tree
                    .element(child)
                    .map(|c| c.qualified_name())
                    .unwrap_or_default();
                return Err(CompileError::UnexpectedChild {
                    element,
                    widget: data.qualified_name(),
                    span: tree.span(child).clone(),
                });
            }
            let child_field = self.parse_element_to_field(tree, child)?;
            self.add_init_statement("%s.add(%s);", &[field.as_str(), child_field.as_str()])?;
        }
        Ok(())
    }
}

/// `urn:import:app.widgets` + `Button` -> `app.widgets.Button`
fn widget_type(data: &ElementData) -> Option<String> {
    let package = data.namespace_uri.as_deref()?.strip_prefix(IMPORT_URI_PREFIX)?;
    if package.is_empty() {
        Some(data.local_name.clone())
    } else {
        Some(format!("{}.{}", package, data.local_name))
    }
}

/// `styleName` -> `setStyleName`, `tab-index` -> `setTabIndex`
fn setter_name(attribute: &str) -> String {
    let mut name = String::from("set");
    let mut upper = true;
    for c in attribute.chars() {
        if c == '-' || c == '_' {
            upper = true;
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }
    name
}

impl HostWriter for BinderWriter {
    fn is_widget_element(&self, tree: &MarkupTree, elem: NodeId) -> bool {
        tree.element(elem).and_then(widget_type).is_some()
    }

    fn parse_element_to_field(
        &mut self,
        tree: &MarkupTree,
        elem: NodeId,
    ) -> Result<FieldName, CompileError> {
        let span = tree.span(elem).clone();
        let data = tree.element(elem).ok_or_else(|| CompileError::NotAWidget {
            element: "#text".to_string(),
            span: span.clone(),
        })?;
        let type_name = widget_type(data).ok_or_else(|| CompileError::NotAWidget {
            element: data.qualified_name(),
            span: span.clone(),
        })?;

        let field = match data.attribute(Some(BINDER_URI), "field") {
            Some(attr) => self.fields.reserve_user(&attr.value, attr.span.clone())?,
            None => {
                let id = self.unique_id();
                self.fields.reserve_generated(&data.local_name, id, span)?
            }
        };

        for attr in data.attributes.iter().filter(|a| !a.is_binder_directive()) {
            let setter = setter_name(&attr.local_name);
            let value = string_literal(&attr.value);
            self.add_init_statement("%s.%s(%s);", &[field.as_str(), &setter, &value])?;
        }

        let constructor_args = if self.config.is_panel_type(&data.local_name) {
            let html = HtmlPanelParser::new(field.clone()).parse(self, tree, elem)?;
            vec![string_literal(&html)]
        } else {
            self.parse_widget_children(tree, elem, data, &field)?;
            Vec::new()
        };

        self.fields.declare(GeneratedField {
            name: field.clone(),
            type_name,
            constructor_args,
            owner: elem,
        })?;
        Ok(field)
    }

    fn reserve_field_name(&mut self, name: &str, span: Span) -> Result<FieldName, CompileError> {
        self.fields.reserve_user(name, span)
    }

    fn unique_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn dom_access_expression(&self, var: &str, tag: &str) -> Result<String, CompileError> {
        let cursor = self.cursors.last().ok_or_else(|| CompileError::NoDomCursor {
            tag: tag.to_string(),
        })?;
        tracing::trace!(var, tag, position = cursor.position(), "dom access");
        Ok(cursor.child_access(&self.config.dom_access_function, tag))
    }

    fn add_init_statement(&mut self, template: &str, args: &[&str]) -> Result<(), CompileError> {
        let statement = format_statement(template, args)?;
        tracing::trace!(%statement, "init statement");
        self.statements.push(statement);
        Ok(())
    }

    fn current_dom_cursor(&mut self) -> Result<&mut ChildCursor, CompileError> {
        self.cursors.last_mut().ok_or_else(|| CompileError::NoDomCursor {
            tag: String::new(),
        })
    }

    fn push_dom_cursor(&mut self, cursor: ChildCursor) {
        self.cursors.push(cursor);
    }

    fn pop_dom_cursor(&mut self) -> Option<ChildCursor> {
        self.cursors.pop()
    }

    fn record_substitution(&mut self, node: NodeId, fragment: &str) {
        self.substitutions.push(Substitution {
            node,
            fragment: fragment.to_string(),
        });
    }

    fn host_element_type(&self) -> &str {
        &self.config.host_element_type
    }

    fn placeholder_policy(&self) -> &PlaceholderPolicy {
        &self.config.policy
    }
}
