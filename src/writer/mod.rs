//! Code emission for binder templates
//!
//! [`HostWriter`] is the capability set element interpreters call into: widget
//! classification, field binding, id allocation, DOM lookups and statement
//! emission. [`BinderWriter`] is the implementation used by a compilation
//! pass; tests substitute their own.

mod binder;
mod cursor;
mod fields;
mod format;
mod output;

pub use binder::BinderWriter;
pub use cursor::ChildCursor;
pub use fields::{
    FieldManager, FieldName, GeneratedField, ELEMENT_POINTER_PREFIX, GENERATED_FIELD_PREFIX,
};
pub use format::{format_statement, string_literal};
pub use output::{CompiledBinder, Substitution};

use crate::error::{CompileError, Span};
use crate::policy::PlaceholderPolicy;
use crate::tree::{MarkupTree, NodeId};

/// Services an element interpreter needs from the surrounding writer
pub trait HostWriter {
    /// Whether `elem` denotes an embedded widget instance
    fn is_widget_element(&self, tree: &MarkupTree, elem: NodeId) -> bool;

    /// Bind a widget element to a field, processing its attributes and
    /// children along the way
    fn parse_element_to_field(
        &mut self,
        tree: &MarkupTree,
        elem: NodeId,
    ) -> Result<FieldName, CompileError>;

    /// Reserve a field name chosen in markup
    fn reserve_field_name(&mut self, name: &str, span: Span) -> Result<FieldName, CompileError>;

    /// A fresh id, never handed out before in this pass
    fn unique_id(&mut self) -> u32;

    /// Expression locating, at runtime, the `tag` element at the current
    /// cursor position. `var` names the temporary that will hold it.
    fn dom_access_expression(&self, var: &str, tag: &str) -> Result<String, CompileError>;

    /// Append a statement built from a `%s` / `%N$s` template
    fn add_init_statement(&mut self, template: &str, args: &[&str]) -> Result<(), CompileError>;

    /// Cursor of the innermost open container
    fn current_dom_cursor(&mut self) -> Result<&mut ChildCursor, CompileError>;

    /// Open a container; lookups resolve against it until popped
    fn push_dom_cursor(&mut self, cursor: ChildCursor);

    fn pop_dom_cursor(&mut self) -> Option<ChildCursor>;

    /// Note that `node` was replaced by `fragment` in the output markup
    fn record_substitution(&mut self, node: NodeId, fragment: &str);

    /// Type of temporaries holding DOM nodes
    fn host_element_type(&self) -> &str;

    fn placeholder_policy(&self) -> &PlaceholderPolicy;
}
