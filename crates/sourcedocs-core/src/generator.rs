//! Generation pipeline
//!
//! Merge → filter → categorize → collect pages → render → index. Every stage
//! completes before the next starts; only per-page rendering runs in parallel.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use tracing::debug;

use crate::category::Categorized;
use crate::config::Config;
use crate::crosslink::{PageIndex, INDEX_PATH};
use crate::error::Result;
use crate::filter::filter_declarations;
use crate::index::render_index;
use crate::inventory::{check_structure, Inventory};
use crate::markdown::{footer, MarkdownRenderer};
use crate::merge::merge_extensions;
use crate::model::Declaration;

/// Generated documents keyed by path relative to the output root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedDocs {
    documents: BTreeMap<String, String>,
}

impl GeneratedDocs {
    /// Content of the document at `path`
    pub fn get(&self, path: &str) -> Option<&str> {
        self.documents.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.documents.contains_key(path)
    }

    /// Document paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.documents.keys().map(String::as_str)
    }

    /// `(path, content)` pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.documents
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn into_inner(self) -> BTreeMap<String, String> {
        self.documents
    }
}

/// One output document and the declarations it holds
struct Unit<'a> {
    path: String,
    decls: Vec<&'a Declaration>,
}

/// Drives a documentation run
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: Config,
    generated_at: Option<DateTime<Utc>>,
}

impl Generator {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            generated_at: None,
        }
    }

    /// Stamp every document with a generation footer.
    ///
    /// Without a timestamp the output is reproducible byte for byte.
    #[must_use]
    pub fn with_timestamp(mut self, generated_at: DateTime<Utc>) -> Self {
        self.generated_at = Some(generated_at);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Validate a JSON inventory and generate its documentation
    pub fn generate_json(&self, json: &str) -> Result<GeneratedDocs> {
        let inventory = Inventory::from_json(json)?;
        self.generate_inventory(inventory)
    }

    /// Generate documentation for an inventory; its module name is used
    /// when the configuration does not name one
    pub fn generate_inventory(&self, inventory: Inventory) -> Result<GeneratedDocs> {
        if self.config.module_name.is_some() || inventory.module.is_none() {
            return self.generate(inventory.declarations);
        }
        let mut config = self.config.clone();
        config.module_name = inventory.module;
        Generator {
            config,
            generated_at: self.generated_at,
        }
        .generate(inventory.declarations)
    }

    /// Generate documentation for top-level declarations in traversal order.
    ///
    /// Structurally invalid input, such as an enum case outside of an enum,
    /// fails the run before anything is rendered.
    pub fn generate(&self, declarations: Vec<Declaration>) -> Result<GeneratedDocs> {
        check_structure(&declarations)?;
        let input = declarations.len();
        let merged = merge_extensions(declarations);
        let filtered = filter_declarations(merged, self.config.min_acl);
        let categorized = Categorized::new(filtered);

        // Every page name must be known before the first page is rendered
        let index = PageIndex::collect(&categorized, &self.config);
        debug!(input, pages = index.len(), collapse = self.config.collapse, "collected pages");

        let units = self.units(&categorized, &index);
        let renderer = MarkdownRenderer::new(&index, &self.config);

        let rendered = units
            .into_par_iter()
            .map(|unit| -> Result<(String, String)> {
                let content = match unit.decls.as_slice() {
                    [decl] if !self.config.collapse => renderer.render_page(decl, &unit.path)?,
                    decls => renderer.render_collapsed(decls, &unit.path)?,
                };
                Ok((unit.path, content))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut documents: BTreeMap<String, String> = rendered.into_iter().collect();
        documents.insert(INDEX_PATH.to_string(), render_index(&index, &self.config)?);

        if let Some(generated_at) = &self.generated_at {
            let footer = footer(generated_at);
            for content in documents.values_mut() {
                content.push('\n');
                content.push_str(&footer);
            }
        }

        debug!(documents = documents.len(), "rendered documentation");
        Ok(GeneratedDocs { documents })
    }

    fn units<'a>(&self, categorized: &'a Categorized, index: &PageIndex) -> Vec<Unit<'a>> {
        if self.config.collapse {
            return categorized
                .iter()
                .map(|(category, decls)| Unit {
                    path: format!("{}.md", category.path()),
                    decls,
                })
                .collect();
        }

        // Pages and declarations are both in category then name order
        categorized
            .iter()
            .flat_map(|(_, decls)| decls)
            .zip(index.pages())
            .map(|(decl, page)| Unit {
                path: page.path.clone(),
                decls: vec![decl],
            })
            .collect()
    }
}
