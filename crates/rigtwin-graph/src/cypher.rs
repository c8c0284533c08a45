//! Safe composition of Cypher patterns from spreadsheet-derived names.
//!
//! Labels, property keys, and relationship types in this pipeline come
//! from sheet names, header rows, and configuration. Cypher cannot bind
//! them as parameters, so they are validated as plain identifiers before
//! being spliced into query text. Values always travel as bound
//! parameters, never as text.

use neo4rs::{BoltBoolean, BoltFloat, BoltInteger, BoltNull, BoltString, BoltType};

use rigtwin_core::types::CellValue;

use crate::client::GraphError;

/// Check that `value` is a plain identifier: ASCII letter or underscore
/// first, then letters, digits, and underscores.
///
/// `kind` names the offending position ("label", "property key",
/// "relationship type") in the error.
pub fn validate_ident(kind: &'static str, value: &str) -> Result<(), GraphError> {
    let mut chars = value.chars();
    let valid = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if valid {
        Ok(())
    } else {
        Err(GraphError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        })
    }
}

/// Convert a cell into its Bolt parameter representation.
pub fn to_bolt(value: &CellValue) -> BoltType {
    match value {
        CellValue::Null => BoltType::Null(BoltNull),
        CellValue::Bool(b) => BoltType::Boolean(BoltBoolean::new(*b)),
        CellValue::Int(i) => BoltType::Integer(BoltInteger::new(*i)),
        CellValue::Float(x) => BoltType::Float(BoltFloat::new(*x)),
        CellValue::Text(s) => BoltType::String(BoltString::new(s)),
    }
}

/// A single node pattern `(var:Label {Key: $param, ...})` whose label and
/// property keys have been validated as identifiers.
#[derive(Debug, Clone)]
pub struct NodePattern {
    var: String,
    label: String,
    props: Vec<(String, String)>,
}

impl NodePattern {
    pub fn new(var: &str, label: &str) -> Result<Self, GraphError> {
        validate_ident("label", label)?;
        Ok(Self {
            var: var.to_string(),
            label: label.to_string(),
            props: Vec::new(),
        })
    }

    /// Add a `key: $param` entry to the pattern's property map.
    pub fn prop(mut self, key: &str, param: &str) -> Result<Self, GraphError> {
        validate_ident("property key", key)?;
        self.props.push((key.to_string(), param.to_string()));
        Ok(self)
    }

    /// Render the pattern as Cypher text.
    pub fn render(&self) -> String {
        if self.props.is_empty() {
            return format!("({}:{})", self.var, self.label);
        }

        let props = self
            .props
            .iter()
            .map(|(key, param)| format!("{key}: ${param}"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("({}:{} {{{props}}})", self.var, self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_ident_accepts_plain_names() {
        for ok in ["EQUI", "IFLOT", "EQUI_ID", "Description", "_private", "Tag42"] {
            assert!(validate_ident("label", ok).is_ok(), "rejected {ok:?}");
        }
    }

    #[test]
    fn test_validate_ident_rejects_unsafe_names() {
        for bad in [
            "",
            "42Tag",
            "Tank Farm",
            "EQUI-ID",
            "n) DETACH DELETE (m",
            "name`: 1}) RETURN 1 //",
            "Ünit",
        ] {
            assert!(validate_ident("label", bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_render_without_props() {
        let pattern = NodePattern::new("n", "EQUI").unwrap();
        assert_eq!(pattern.render(), "(n:EQUI)");
    }

    #[test]
    fn test_render_with_props() {
        let pattern = NodePattern::new("n", "EQUI")
            .unwrap()
            .prop("ID", "p0")
            .unwrap()
            .prop("Description", "p1")
            .unwrap();
        assert_eq!(pattern.render(), "(n:EQUI {ID: $p0, Description: $p1})");
    }

    #[test]
    fn test_bad_label_and_key_are_refused() {
        assert!(NodePattern::new("n", "Bad Label").is_err());
        let pattern = NodePattern::new("n", "EQUI").unwrap();
        assert!(pattern.prop("bad key", "p0").is_err());
    }

    #[test]
    fn test_to_bolt_mapping() {
        assert_eq!(to_bolt(&CellValue::Null), BoltType::Null(BoltNull));
        assert_eq!(
            to_bolt(&CellValue::Bool(true)),
            BoltType::Boolean(BoltBoolean::new(true))
        );
        assert_eq!(
            to_bolt(&CellValue::Int(55)),
            BoltType::Integer(BoltInteger::new(55))
        );
        assert_eq!(
            to_bolt(&CellValue::Float(1.5)),
            BoltType::Float(BoltFloat::new(1.5))
        );
        assert_eq!(
            to_bolt(&CellValue::Text("Pump A".to_string())),
            BoltType::String(BoltString::new("Pump A"))
        );
    }
}
