//! Declaration inventory loading
//!
//! The inventory is produced by an external introspection step. Records are
//! deserialized loosely and then validated into [`Declaration`] values, so a
//! structural problem is reported once, with the path of the offending record.

use serde::Deserialize;

use crate::doc_comment::{DocComment, ParamDoc};
use crate::error::{InventoryError, Result};
use crate::model::{AccessLevel, DeclKind, Declaration, SourceLocation};

/// A raw declaration record as supplied by the introspection step
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeclaration {
    pub kind: Option<String>,
    pub name: Option<String>,
    pub access_level: Option<String>,
    pub signature: Option<String>,
    pub documentation: Option<RawDocumentation>,
    /// Unparsed comment text, used when `documentation` is absent
    pub comment: Option<String>,
    #[serde(default)]
    pub inheritance: Vec<String>,
    #[serde(default)]
    pub members: Vec<RawDeclaration>,
    pub location: Option<SourceLocation>,
}

/// Pre-split documentation fields
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDocumentation {
    #[serde(default, rename = "abstract")]
    pub summary: String,
    pub discussion: Option<String>,
    #[serde(default)]
    pub parameters: Vec<RawParam>,
    pub returns: Option<String>,
    pub throws: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawParam {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawInventory {
    List(Vec<RawDeclaration>),
    Module {
        module: Option<String>,
        declarations: Vec<RawDeclaration>,
    },
}

/// A validated, ordered set of top-level declarations
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    /// Module name, when the inventory names one
    pub module: Option<String>,
    /// Top-level declarations in file-traversal order
    pub declarations: Vec<Declaration>,
}

impl Inventory {
    /// Parse and validate a JSON inventory
    pub fn from_json(json: &str) -> Result<Self> {
        let (module, records) = match serde_json::from_str(json)? {
            RawInventory::List(records) => (None, records),
            RawInventory::Module {
                module,
                declarations,
            } => (module, declarations),
        };
        let mut inventory = Self::from_records(&records)?;
        inventory.module = module;
        Ok(inventory)
    }

    /// Validate raw records
    pub fn from_records(records: &[RawDeclaration]) -> Result<Self, InventoryError> {
        let declarations = records
            .iter()
            .enumerate()
            .map(|(i, raw)| convert(raw, &format!("declarations[{i}]"), None))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            module: None,
            declarations,
        })
    }
}

fn convert(
    raw: &RawDeclaration,
    path: &str,
    parent: Option<DeclKind>,
) -> Result<Declaration, InventoryError> {
    let kind_text = raw.kind.as_deref().ok_or_else(|| InventoryError::MissingField {
        path: path.to_string(),
        field: "kind",
    })?;
    let kind = kind_text.parse::<DeclKind>().map_err(|kind| InventoryError::UnknownKind {
        path: path.to_string(),
        kind,
    })?;

    let name = match raw.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => {
            return Err(InventoryError::MissingField {
                path: path.to_string(),
                field: "name",
            })
        }
    };

    check_placement(kind, parent, path, &name)?;

    let members = raw
        .members
        .iter()
        .enumerate()
        .map(|(i, member)| convert(member, &format!("{path}.members[{i}]"), Some(kind)))
        .collect::<Result<Vec<_>, _>>()?;

    let access_level = match raw.access_level.as_deref() {
        Some(level) => level.parse::<AccessLevel>().map_err(|level| InventoryError::UnknownAccessLevel {
            path: path.to_string(),
            level,
        })?,
        None if kind == DeclKind::Extension => implied_extension_level(&members),
        None => AccessLevel::Internal,
    };

    let doc = match (&raw.documentation, &raw.comment) {
        (Some(fields), _) => Some(convert_documentation(fields)),
        (None, Some(text)) => Some(DocComment::parse(text)),
        (None, None) => None,
    }
    .filter(|doc| !doc.is_empty());

    let signature = raw
        .signature
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(name.as_str())
        .to_string();

    Ok(Declaration {
        kind,
        name,
        access_level,
        signature,
        doc,
        inheritance: raw.inheritance.clone(),
        members,
        location: raw.location.clone(),
    })
}

/// Check the structural rules of already-built declarations.
///
/// Declarations from [`Inventory`] pass by construction; this covers callers
/// that assemble [`Declaration`] values themselves.
pub fn check_structure(declarations: &[Declaration]) -> Result<(), InventoryError> {
    declarations
        .iter()
        .enumerate()
        .try_for_each(|(i, decl)| check_declaration(decl, &format!("declarations[{i}]"), None))
}

fn check_declaration(decl: &Declaration, path: &str, parent: Option<DeclKind>) -> Result<(), InventoryError> {
    if decl.name.trim().is_empty() {
        return Err(InventoryError::MissingField {
            path: path.to_string(),
            field: "name",
        });
    }
    check_placement(decl.kind, parent, path, &decl.name)?;
    decl.members
        .iter()
        .enumerate()
        .try_for_each(|(i, member)| check_declaration(member, &format!("{path}.members[{i}]"), Some(decl.kind)))
}

/// Enum cases only exist inside an enum or an extension of one
fn check_placement(kind: DeclKind, parent: Option<DeclKind>, path: &str, name: &str) -> Result<(), InventoryError> {
    if kind == DeclKind::Case && !matches!(parent, Some(DeclKind::Enum | DeclKind::Extension)) {
        return Err(InventoryError::MisplacedCase {
            path: path.to_string(),
            name: name.to_string(),
        });
    }
    Ok(())
}

/// An extension without an explicit level is as visible as its most
/// visible member.
fn implied_extension_level(members: &[Declaration]) -> AccessLevel {
    members
        .iter()
        .map(|m| m.access_level)
        .max_by_key(AccessLevel::rank)
        .unwrap_or(AccessLevel::Internal)
}

fn convert_documentation(raw: &RawDocumentation) -> DocComment {
    DocComment {
        summary: raw.summary.trim().to_string(),
        discussion: raw
            .discussion
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from),
        params: raw
            .parameters
            .iter()
            .map(|p| ParamDoc::new(p.name.trim(), p.description.trim()))
            .collect(),
        returns: raw.returns.clone().filter(|r| !r.trim().is_empty()),
        throws: raw.throws.clone().filter(|t| !t.trim().is_empty()),
    }
}
