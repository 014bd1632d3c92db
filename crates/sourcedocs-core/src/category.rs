//! Output categories

use std::collections::BTreeMap;
use std::fmt;

use tracing::warn;

use crate::model::{DeclKind, Declaration};

/// A fixed output grouping of top-level declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Classes,
    Structs,
    Enums,
    Protocols,
    Extensions,
    TypeAliases,
    Methods,
    GlobalVariables,
}

impl Category {
    /// Every category, in index order
    pub const ALL: [Category; 8] = [
        Category::Classes,
        Category::Structs,
        Category::Enums,
        Category::Protocols,
        Category::Extensions,
        Category::TypeAliases,
        Category::Methods,
        Category::GlobalVariables,
    ];

    /// Category for a top-level declaration of `kind`
    pub fn for_kind(kind: DeclKind) -> Option<Self> {
        match kind {
            DeclKind::Class => Some(Category::Classes),
            DeclKind::Struct => Some(Category::Structs),
            DeclKind::Enum => Some(Category::Enums),
            DeclKind::Protocol => Some(Category::Protocols),
            DeclKind::Extension => Some(Category::Extensions),
            DeclKind::TypeAlias => Some(Category::TypeAliases),
            DeclKind::Function => Some(Category::Methods),
            DeclKind::Variable => Some(Category::GlobalVariables),
            DeclKind::Case => None,
        }
    }

    /// Heading used in the index
    pub fn title(&self) -> &'static str {
        match self {
            Category::Classes => "Classes",
            Category::Structs => "Structs",
            Category::Enums => "Enums",
            Category::Protocols => "Protocols",
            Category::Extensions => "Extensions",
            Category::TypeAliases => "Type Aliases",
            Category::Methods => "Methods",
            Category::GlobalVariables => "Global Variables",
        }
    }

    /// Directory (multi-page) or file stem (single-page) for this category
    pub fn path(&self) -> &'static str {
        match self {
            Category::Classes => "classes",
            Category::Structs => "structs",
            Category::Enums => "enums",
            Category::Protocols => "protocols",
            Category::Extensions => "extensions",
            Category::TypeAliases => "typealiases",
            Category::Methods => "methods",
            Category::GlobalVariables => "globals",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Declarations grouped by category, each group ordered by name
#[derive(Debug, Clone, Default)]
pub struct Categorized {
    groups: BTreeMap<Category, BTreeMap<String, Declaration>>,
}

impl Categorized {
    /// Group declarations by kind.
    ///
    /// Names are compared case-sensitively by byte value. When two
    /// declarations of the same category share a name, the later one wins.
    pub fn new(declarations: Vec<Declaration>) -> Self {
        let mut groups: BTreeMap<Category, BTreeMap<String, Declaration>> = BTreeMap::new();

        for decl in declarations {
            let Some(category) = Category::for_kind(decl.kind) else {
                continue;
            };
            let group = groups.entry(category).or_default();
            if let Some(replaced) = group.insert(decl.name.clone(), decl) {
                warn!(
                    name = %replaced.name,
                    %category,
                    location = ?replaced.location,
                    "duplicate declaration replaced by a later one"
                );
            }
        }

        Self { groups }
    }

    /// Non-empty categories in index order, with their declarations
    pub fn iter(&self) -> impl Iterator<Item = (Category, Vec<&Declaration>)> + '_ {
        self.groups
            .iter()
            .filter(|(_, decls)| !decls.is_empty())
            .map(|(category, decls)| (*category, decls.values().collect()))
    }

    /// Declarations of one category, ordered by name
    pub fn get(&self, category: Category) -> Vec<&Declaration> {
        self.groups
            .get(&category)
            .map(|decls| decls.values().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(BTreeMap::is_empty)
    }

    /// Total number of top-level declarations
    pub fn len(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }
}
