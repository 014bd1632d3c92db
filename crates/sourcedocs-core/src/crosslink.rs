//! Cross-linking for documentation
//!
//! The page index is built once, before any page is rendered, from the full
//! set of categorized declarations. Rendering only ever reads it.

use std::collections::HashMap;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::category::{Categorized, Category};
use crate::config::Config;
use crate::markdown::claim_document_anchors;

/// Characters that would break a Markdown link destination
const LINK: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'(')
    .add(b')')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`');

/// Name of the root index document
pub const INDEX_PATH: &str = "README.md";

/// A page that will be generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    /// Declaration name, also the display name
    pub name: String,
    pub category: Category,
    /// Document path relative to the output root
    pub path: String,
    /// Heading anchor inside the document (single-page mode only)
    pub anchor: Option<String>,
}

/// Name → page table used to resolve cross-references
#[derive(Debug, Clone)]
pub struct PageIndex {
    pages: Vec<PageRef>,
    by_name: HashMap<String, usize>,
    link_beginning: String,
    link_ending: String,
}

impl PageIndex {
    /// Collect every page identity, in category then name order
    pub fn collect(categorized: &Categorized, config: &Config) -> Self {
        let mut pages = Vec::new();
        let mut by_name = HashMap::new();

        for (category, decls) in categorized.iter() {
            // A collapsed category is one document; its anchors are numbered
            // across every heading in it, members included
            let mut slugger = Slugger::new();
            for decl in decls {
                let page = PageRef {
                    name: decl.name.clone(),
                    category,
                    path: page_path(category, &decl.name, config.collapse),
                    anchor: config
                        .collapse
                        .then(|| claim_document_anchors(&mut slugger, decl, config)),
                };
                // The first category in index order claims a shared name
                by_name.entry(page.name.clone()).or_insert(pages.len());
                pages.push(page);
            }
        }

        Self {
            pages,
            by_name,
            link_beginning: config.link_beginning.clone(),
            link_ending: config.link_ending.clone(),
        }
    }

    /// Look up a page by exact, case-sensitive name
    pub fn lookup(&self, name: &str) -> Option<&PageRef> {
        self.by_name.get(name).map(|&i| &self.pages[i])
    }

    /// All pages in index order
    pub fn pages(&self) -> &[PageRef] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Build the link to `target` from the document at `from`
    pub fn link(&self, target: &PageRef, from: &str) -> String {
        let fragment = target
            .anchor
            .as_ref()
            .map(|anchor| format!("#{}", anchor))
            .unwrap_or_default();

        if target.path == from && !fragment.is_empty() {
            return fragment;
        }

        let stem = target.path.strip_prefix('/').unwrap_or(&target.path);
        let stem = stem.strip_suffix(".md").unwrap_or(stem);
        let prefix = if !self.link_beginning.is_empty() {
            self.link_beginning.clone()
        } else {
            "../".repeat(from.matches('/').count())
        };

        format!(
            "{}{}{}{}",
            prefix,
            utf8_percent_encode(stem, LINK),
            self.link_ending,
            fragment
        )
    }

    /// Link `name` as inline code when a page exists for it
    pub fn code_link(&self, name: &str, from: &str) -> String {
        match self.lookup(name) {
            Some(page) => format!("[`{}`]({})", name, self.link(page, from)),
            None => format!("`{}`", name),
        }
    }

    /// Turn inline code spans naming a page into links.
    ///
    /// Fenced code blocks, spans that are already link text, and spans naming
    /// `current` are left alone.
    pub fn link_code_spans(&self, text: &str, from: &str, current: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut in_fence = false;

        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            if line.trim_start().starts_with("```") {
                in_fence = !in_fence;
                out.push_str(line);
            } else if in_fence {
                out.push_str(line);
            } else {
                self.link_line(line, from, current, &mut out);
            }
        }

        out
    }

    fn link_line(&self, line: &str, from: &str, current: &str, out: &mut String) {
        let mut rest = line;

        while let Some(start) = rest.find('`') {
            let after = &rest[start + 1..];
            let Some(len) = after.find('`') else {
                break;
            };
            let content = &after[..len];
            let end = start + len + 2;
            let is_link_text = rest[..start].ends_with('[') || rest[end..].starts_with("](");

            out.push_str(&rest[..start]);
            match self.lookup(content) {
                Some(page) if !is_link_text && content != current => {
                    out.push_str(&format!("[`{}`]({})", content, self.link(page, from)));
                }
                _ => out.push_str(&rest[start..end]),
            }
            rest = &rest[end..];
        }

        out.push_str(rest);
    }
}

/// Document path of a declaration page
pub fn page_path(category: Category, name: &str, collapse: bool) -> String {
    if collapse {
        format!("{}.md", category.path())
    } else {
        format!("{}/{}.md", category.path(), file_name(name))
    }
}

/// File name for a declaration.
///
/// Path separators are percent-escaped, and so is `%` itself, which keeps
/// distinct names on distinct files.
fn file_name(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '/' => escaped.push_str("%2F"),
            '\\' => escaped.push_str("%5C"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// GitHub-style heading anchor
pub fn slugify(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

/// Heading anchors for one document, numbering repeats the way GitHub does
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor for the next heading with this text
    pub fn slug(&mut self, heading: &str) -> String {
        let base = slugify(heading);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let slug = if *count == 0 {
            base
        } else {
            format!("{}-{}", base, count)
        };
        *count += 1;
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccessLevel, DeclKind, Declaration};

    fn create_test_index(config: &Config) -> PageIndex {
        let decls = vec![
            Declaration::new(DeclKind::Class, "Person", AccessLevel::Public, "public class Person"),
            Declaration::new(DeclKind::Protocol, "Pet", AccessLevel::Public, "public protocol Pet"),
            Declaration::new(DeclKind::Struct, "Dog", AccessLevel::Public, "public struct Dog"),
            Declaration::new(DeclKind::Protocol, "Dog", AccessLevel::Public, "public protocol Dog"),
            Declaration::new(
                DeclKind::Function,
                "globalMethod(param1:param2:)",
                AccessLevel::Public,
                "public func globalMethod(param1: String, param2: Int)",
            ),
        ];
        PageIndex::collect(&Categorized::new(decls), config)
    }

    #[test]
    fn test_collect_paths() {
        let index = create_test_index(&Config::default());
        assert_eq!(index.len(), 5);
        assert_eq!(index.lookup("Pet").unwrap().path, "protocols/Pet.md");
        assert_eq!(
            index.lookup("globalMethod(param1:param2:)").unwrap().path,
            "methods/globalMethod(param1:param2:).md"
        );
        assert!(index.lookup("pet").is_none());
    }

    #[test]
    fn test_shared_name_resolves_to_first_category() {
        let index = create_test_index(&Config::default());
        assert_eq!(index.lookup("Dog").unwrap().category, Category::Structs);
    }

    #[test]
    fn test_relative_links() {
        let index = create_test_index(&Config::default());
        let pet = index.lookup("Pet").unwrap();
        assert_eq!(index.link(pet, "classes/Person.md"), "../protocols/Pet.md");
        assert_eq!(index.link(pet, INDEX_PATH), "protocols/Pet.md");

        let method = index.lookup("globalMethod(param1:param2:)").unwrap();
        assert_eq!(
            index.link(method, INDEX_PATH),
            "methods/globalMethod%28param1:param2:%29.md"
        );
    }

    #[test]
    fn test_link_affixes() {
        let config = Config {
            link_beginning: "/wiki/".into(),
            link_ending: String::new(),
            ..Config::default()
        };
        let index = create_test_index(&config);
        let pet = index.lookup("Pet").unwrap();
        assert_eq!(index.link(pet, "classes/Person.md"), "/wiki/protocols/Pet");
    }

    #[test]
    fn test_collapsed_links_use_anchors() {
        let config = Config {
            collapse: true,
            ..Config::default()
        };
        let index = create_test_index(&config);
        let pet = index.lookup("Pet").unwrap();
        assert_eq!(pet.path, "protocols.md");
        assert_eq!(index.link(pet, "classes.md"), "protocols.md#pet");
        assert_eq!(index.link(pet, "protocols.md"), "#pet");
    }

    #[test]
    fn test_link_code_spans() {
        let index = create_test_index(&Config::default());
        let text = "Owns a `Pet`, unlike `Cat`.\n```swift\nlet p: `Pet`\n```\nSee [`Pet`](x) or `Person`.";
        let linked = index.link_code_spans(text, "classes/Person.md", "Person");
        assert_eq!(
            linked,
            "Owns a [`Pet`](../protocols/Pet.md), unlike `Cat`.\n```swift\nlet p: `Pet`\n```\nSee [`Pet`](x) or `Person`."
        );
    }

    #[test]
    fn test_code_link() {
        let index = create_test_index(&Config::default());
        assert_eq!(index.code_link("Pet", INDEX_PATH), "[`Pet`](protocols/Pet.md)");
        assert_eq!(index.code_link("Equatable", INDEX_PATH), "`Equatable`");
    }

    #[test]
    fn test_slugs() {
        assert_eq!(slugify("globalMethod(param1:param2:)"), "globalmethodparam1param2");
        assert_eq!(slugify("Return Value"), "return-value");
        let mut slugger = Slugger::new();
        assert_eq!(slugger.slug("init()"), "init");
        assert_eq!(slugger.slug("init()"), "init-1");
        assert_eq!(slugger.slug("Init"), "init-2");
    }

    #[test]
    fn test_file_name_escapes_separators() {
        assert_eq!(page_path(Category::Methods, "/(lhs:rhs:)", false), "methods/%2F(lhs:rhs:).md");
        assert_eq!(page_path(Category::Methods, "\\(lhs:rhs:)", false), "methods/%5C(lhs:rhs:).md");
        assert_eq!(page_path(Category::Methods, "%(lhs:rhs:)", false), "methods/%25(lhs:rhs:).md");
        assert_eq!(page_path(Category::Methods, "Ünïcode()", false), "methods/Ünïcode().md");
    }

    #[test]
    fn test_separator_names_get_their_own_pages() {
        let decls = vec![
            Declaration::new(DeclKind::Function, "/(lhs:rhs:)", AccessLevel::Public, "public func /(lhs: V, rhs: V) -> V"),
            Declaration::new(DeclKind::Function, "_(lhs:rhs:)", AccessLevel::Public, "public func _(lhs: V, rhs: V) -> V"),
            Declaration::new(DeclKind::Function, "%2F(lhs:rhs:)", AccessLevel::Public, "public func %2F()"),
        ];
        let index = PageIndex::collect(&Categorized::new(decls), &Config::default());

        let slash = index.lookup("/(lhs:rhs:)").unwrap();
        let underscore = index.lookup("_(lhs:rhs:)").unwrap();
        let literal = index.lookup("%2F(lhs:rhs:)").unwrap();
        assert_eq!(slash.path, "methods/%2F(lhs:rhs:).md");
        assert_eq!(underscore.path, "methods/_(lhs:rhs:).md");
        assert_eq!(literal.path, "methods/%252F(lhs:rhs:).md");

        // Links escape the `%` of the file name once more
        assert_eq!(index.link(slash, INDEX_PATH), "methods/%252F%28lhs:rhs:%29.md");
        assert_eq!(index.link(slash, "methods/_(lhs:rhs:).md"), "../methods/%252F%28lhs:rhs:%29.md");
    }

    #[test]
    fn test_collapsed_anchor_follows_member_headings() {
        let config = Config {
            collapse: true,
            ..Config::default()
        };
        let decls = vec![
            Declaration::new(DeclKind::Class, "Car", AccessLevel::Public, "public class Car")
                .with_member(Declaration::new(DeclKind::Variable, "wheel", AccessLevel::Public, "public var wheel: Wheel")),
            Declaration::new(DeclKind::Class, "Wheel", AccessLevel::Public, "public class Wheel"),
            Declaration::new(DeclKind::Struct, "Wheel2", AccessLevel::Public, "public struct Wheel2"),
        ];
        let index = PageIndex::collect(&Categorized::new(decls), &config);

        assert_eq!(index.lookup("Car").unwrap().anchor.as_deref(), Some("car"));
        assert_eq!(index.lookup("Wheel").unwrap().anchor.as_deref(), Some("wheel-1"));
        // Numbering restarts in each category document
        assert_eq!(index.lookup("Wheel2").unwrap().anchor.as_deref(), Some("wheel2"));
        assert_eq!(index.link(index.lookup("Wheel").unwrap(), INDEX_PATH), "classes.md#wheel-1");
    }
}
