//! Field registry for generated widget references

use std::collections::HashMap;

use crate::error::{CompileError, Span};
use crate::tree::NodeId;

/// Prefix of generated field names
pub const GENERATED_FIELD_PREFIX: &str = "f_";

/// Prefix of placeholder temporaries; followed by a unique id
pub const ELEMENT_POINTER_PREFIX: &str = "element";

/// Name of a field in generated code
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldName(String);

impl FieldName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A constructed widget instance referenced by generated statements
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedField {
    pub name: FieldName,
    /// Fully qualified widget type
    pub type_name: String,
    /// Already-rendered constructor arguments
    pub constructor_args: Vec<String>,
    /// Element the field was derived from
    pub owner: NodeId,
}

impl GeneratedField {
    /// `Type name = new Type(args);`
    pub fn declaration(&self) -> String {
        format!(
            "{ty} {name} = new {ty}({args});",
            ty = self.type_name,
            name = self.name,
            args = self.constructor_args.join(", ")
        )
    }
}

/// Registry of field names and declarations for one pass
#[derive(Debug, Default)]
pub struct FieldManager {
    reserved: HashMap<String, Span>,
    fields: Vec<GeneratedField>,
}

impl FieldManager {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a name chosen in markup via `ui:field`
    pub fn reserve_user(&mut self, name: &str, span: Span) -> Result<FieldName, CompileError> {
        if !is_identifier(name) {
            return Err(CompileError::InvalidFieldName {
                name: name.to_string(),
                span,
            });
        }
        if is_generated_name(name) {
            return Err(CompileError::ReservedFieldName {
                name: name.to_string(),
                span,
            });
        }
        self.reserve(name.to_string(), span)
    }

    /// Reserve `f_<LocalName>_<id>` for an unnamed widget.
    ///
    /// The id follows the last `_` and contains only digits, so two distinct
    /// ids never yield the same name whatever the local names are.
    pub fn reserve_generated(
        &mut self,
        local_name: &str,
        id: u32,
        span: Span,
    ) -> Result<FieldName, CompileError> {
        let sanitized: String = local_name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        self.reserve(format!("{}{}_{}", GENERATED_FIELD_PREFIX, sanitized, id), span)
    }

    fn reserve(&mut self, name: String, span: Span) -> Result<FieldName, CompileError> {
        if self.reserved.contains_key(&name) {
            return Err(CompileError::DuplicateField { name, span });
        }
        self.reserved.insert(name.clone(), span);
        Ok(FieldName(name))
    }

    /// Record the declaration of a reserved field
    pub fn declare(&mut self, field: GeneratedField) -> Result<(), CompileError> {
        if self.get(field.name.as_str()).is_some() {
            let span = self
                .reserved
                .get(field.name.as_str())
                .cloned()
                .unwrap_or_default();
            return Err(CompileError::DuplicateField {
                name: field.name.0,
                span,
            });
        }
        tracing::trace!(field = %field.name, ty = %field.type_name, "declared field");
        self.fields.push(field);
        Ok(())
    }

    /// Whether a name is taken
    pub fn contains(&self, name: &str) -> bool {
        self.reserved.contains_key(name)
    }

    /// Get a declared field by name
    pub fn get(&self, name: &str) -> Option<&GeneratedField> {
        self.fields.iter().find(|f| f.name.as_str() == name)
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[GeneratedField] {
        &self.fields
    }

    pub fn into_fields(self) -> Vec<GeneratedField> {
        self.fields
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Names the compiler hands out on its own
fn is_generated_name(name: &str) -> bool {
    if name.starts_with(GENERATED_FIELD_PREFIX) {
        return true;
    }
    match name.strip_prefix(ELEMENT_POINTER_PREFIX) {
        Some(digits) => !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}
