//! Declaration model
//!
//! A single `Declaration` type, discriminated by `DeclKind`, represents every
//! documented symbol: types, protocols, extensions, functions and variables.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::doc_comment::DocComment;

/// Kind of declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    Class,
    Struct,
    Enum,
    Protocol,
    Extension,
    TypeAlias,
    Function,
    Variable,
    /// Enum case, only valid as a member
    Case,
}

impl DeclKind {
    /// Keyword used for this kind in inventories and signatures
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Class => "class",
            DeclKind::Struct => "struct",
            DeclKind::Enum => "enum",
            DeclKind::Protocol => "protocol",
            DeclKind::Extension => "extension",
            DeclKind::TypeAlias => "typealias",
            DeclKind::Function => "function",
            DeclKind::Variable => "variable",
            DeclKind::Case => "case",
        }
    }

    /// Whether declarations of this kind can be the target of an extension
    pub fn is_extendable(&self) -> bool {
        matches!(
            self,
            DeclKind::Class | DeclKind::Struct | DeclKind::Enum | DeclKind::Protocol
        )
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "class" => Ok(DeclKind::Class),
            "struct" => Ok(DeclKind::Struct),
            "enum" => Ok(DeclKind::Enum),
            "protocol" => Ok(DeclKind::Protocol),
            "extension" => Ok(DeclKind::Extension),
            "typealias" => Ok(DeclKind::TypeAlias),
            "function" | "func" | "method" => Ok(DeclKind::Function),
            "variable" | "var" | "property" => Ok(DeclKind::Variable),
            "case" => Ok(DeclKind::Case),
            _ => Err(s.to_string()),
        }
    }
}

/// Access level of a declaration.
///
/// `Open` and `Public` share a tier: filtering treats them as equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Open,
    #[default]
    Public,
    Internal,
    #[serde(rename = "fileprivate")]
    FilePrivate,
    Private,
}

impl AccessLevel {
    /// Every level, most visible first
    pub const ALL: [AccessLevel; 5] = [
        AccessLevel::Open,
        AccessLevel::Public,
        AccessLevel::Internal,
        AccessLevel::FilePrivate,
        AccessLevel::Private,
    ];

    /// Visibility tier, higher is more visible
    pub fn rank(&self) -> u8 {
        match self {
            AccessLevel::Open | AccessLevel::Public => 3,
            AccessLevel::Internal => 2,
            AccessLevel::FilePrivate => 1,
            AccessLevel::Private => 0,
        }
    }

    /// Check whether this level is at least as visible as `min`
    pub fn meets(&self, min: AccessLevel) -> bool {
        self.rank() >= min.rank()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Open => "open",
            AccessLevel::Public => "public",
            AccessLevel::Internal => "internal",
            AccessLevel::FilePrivate => "fileprivate",
            AccessLevel::Private => "private",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(AccessLevel::Open),
            "public" => Ok(AccessLevel::Public),
            "internal" => Ok(AccessLevel::Internal),
            "fileprivate" => Ok(AccessLevel::FilePrivate),
            "private" => Ok(AccessLevel::Private),
            _ => Err(s.to_string()),
        }
    }
}

/// Where a declaration was found in the source tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A documented declaration (type, protocol, extension, function, ...)
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Kind of declaration
    pub kind: DeclKind,
    /// Qualified name; extensions carry the name of the type they extend
    pub name: String,
    /// Declared access level
    pub access_level: AccessLevel,
    /// Declaration line as written in source
    pub signature: String,
    /// Documentation comment
    pub doc: Option<DocComment>,
    /// Supertypes and conformances, as written
    pub inheritance: Vec<String>,
    /// Child declarations (nested types, methods, properties, cases)
    pub members: Vec<Declaration>,
    /// Source location, used for diagnostics only
    pub location: Option<SourceLocation>,
}

impl Declaration {
    /// Create a new declaration
    pub fn new(
        kind: DeclKind,
        name: impl Into<String>,
        access_level: AccessLevel,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            access_level,
            signature: signature.into(),
            doc: None,
            inheritance: Vec::new(),
            members: Vec::new(),
            location: None,
        }
    }

    /// Set the documentation
    #[must_use]
    pub fn with_doc(mut self, doc: Option<DocComment>) -> Self {
        self.doc = doc;
        self
    }

    /// Set the inheritance list
    #[must_use]
    pub fn with_inheritance<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.inheritance = names.into_iter().map(Into::into).collect();
        self
    }

    /// Append a member, builder style
    #[must_use]
    pub fn with_member(mut self, member: Declaration) -> Self {
        self.members.push(member);
        self
    }

    /// Set the source location
    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.location = Some(SourceLocation {
            file: file.into(),
            line,
        });
        self
    }

    /// Add a member
    pub fn add_member(&mut self, member: Declaration) {
        self.members.push(member);
    }

    pub fn is_extension(&self) -> bool {
        self.kind == DeclKind::Extension
    }

    /// Add inheritance entries not already present, keeping existing order
    pub fn union_inheritance(&mut self, names: &[String]) {
        for name in names {
            if !self.inheritance.contains(name) {
                self.inheritance.push(name.clone());
            }
        }
    }

    /// Total number of declarations in this subtree, including self
    pub fn count(&self) -> usize {
        1 + self.members.iter().map(Declaration::count).sum::<usize>()
    }
}
