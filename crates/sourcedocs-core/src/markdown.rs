//! Markdown page renderer

use std::fmt::{self, Write};

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::crosslink::{PageIndex, Slugger};
use crate::doc_comment::DocComment;
use crate::model::{DeclKind, Declaration};

/// Deepest heading level Markdown supports
const MAX_HEADING: usize = 6;

/// Renders declarations to Markdown, resolving links through a [`PageIndex`]
pub struct MarkdownRenderer<'a> {
    index: &'a PageIndex,
    config: &'a Config,
}

/// Per-document rendering state
struct Page<'p> {
    /// Path of the document being written
    path: &'p str,
    /// Top-level declaration being written; never linked to itself
    current: &'p str,
    slugger: Slugger,
}

impl<'a> MarkdownRenderer<'a> {
    pub fn new(index: &'a PageIndex, config: &'a Config) -> Self {
        Self { index, config }
    }

    /// Render the document for a single declaration
    pub fn render_page(&self, decl: &Declaration, path: &str) -> Result<String, fmt::Error> {
        let mut output = String::new();
        let mut page = Page {
            path,
            current: &decl.name,
            slugger: Slugger::new(),
        };
        self.write_declaration(&mut output, decl, 1, &mut page)?;
        Ok(finish(output))
    }

    /// Render several declarations into one document, separated by rules
    pub fn render_collapsed(&self, decls: &[&Declaration], path: &str) -> Result<String, fmt::Error> {
        let mut output = String::new();
        let mut slugger = Slugger::new();

        for (i, decl) in decls.iter().enumerate() {
            if i > 0 {
                writeln!(output, "---")?;
                writeln!(output)?;
            }
            let mut page = Page {
                path,
                current: &decl.name,
                slugger,
            };
            self.write_declaration(&mut output, decl, 1, &mut page)?;
            slugger = page.slugger;
        }

        Ok(finish(output))
    }

    /// Write a declaration at `level`, returning the anchor of its heading
    fn write_declaration(
        &self,
        output: &mut String,
        decl: &Declaration,
        level: usize,
        page: &mut Page<'_>,
    ) -> Result<String, fmt::Error> {
        let (anchor, sections) = claim_headings(&mut page.slugger, decl, level, self.config);
        writeln!(output, "{} `{}`", heading(level), decl.name)?;
        writeln!(output)?;

        let collapsible = self.config.collapsible && level > 1;
        if collapsible {
            writeln!(output, "<details>")?;
            writeln!(output, "<summary><code>{}</code></summary>", decl.name)?;
            writeln!(output)?;
        }

        self.write_body(output, decl, level, &sections, page)?;

        if collapsible {
            writeln!(output, "</details>")?;
            writeln!(output)?;
        }

        Ok(anchor)
    }

    fn write_body(
        &self,
        output: &mut String,
        decl: &Declaration,
        level: usize,
        sections: &[Section],
        page: &mut Page<'_>,
    ) -> fmt::Result {
        // Signature
        writeln!(output, "```swift")?;
        writeln!(output, "{}", decl.signature.trim_end())?;
        writeln!(output, "```")?;
        writeln!(output)?;

        let section = heading(level + 1);
        let empty = DocComment::default();
        let doc = decl.doc.as_ref().unwrap_or(&empty);

        let rest = match sections {
            [Section::Inheritance, rest @ ..] => {
                writeln!(output, "{} {}", section, Section::Inheritance.title())?;
                writeln!(output)?;
                let supertypes: Vec<_> = decl
                    .inheritance
                    .iter()
                    .map(|name| self.index.code_link(name, page.path))
                    .collect();
                writeln!(output, "{}", supertypes.join(", "))?;
                writeln!(output)?;
                rest
            }
            _ => sections,
        };

        if !doc.summary.is_empty() {
            writeln!(output, "{}", self.prose(&doc.summary, page))?;
            writeln!(output)?;
        }
        if let Some(discussion) = &doc.discussion {
            writeln!(output, "{}", self.prose(discussion, page))?;
            writeln!(output)?;
        }

        for &kind in rest {
            let text = match kind {
                Section::Parameters => {
                    writeln!(output, "{} {}", section, kind.title())?;
                    writeln!(output)?;
                    for param in &doc.params {
                        writeln!(output, "- `{}`: {}", param.name, self.prose(&param.description, page))?;
                    }
                    writeln!(output)?;
                    continue;
                }
                Section::ReturnValue => doc.returns.as_deref(),
                Section::Throws => doc.throws.as_deref(),
                // Contents and Inheritance are written in their own places
                Section::Inheritance | Section::Contents => continue,
            };
            if let Some(text) = text {
                writeln!(output, "{} {}", section, kind.title())?;
                writeln!(output)?;
                writeln!(output, "{}", self.prose(text, page))?;
                writeln!(output)?;
            }
        }

        if decl.members.is_empty() {
            return Ok(());
        }

        // Members go to a side buffer first so the contents list can point
        // at the anchors they actually received
        let mut members = String::new();
        let mut anchors = Vec::with_capacity(decl.members.len());
        for member in &decl.members {
            anchors.push(self.write_declaration(&mut members, member, level + 1, page)?);
        }

        if sections.contains(&Section::Contents) {
            writeln!(output, "{} {}", section, Section::Contents.title())?;
            writeln!(output)?;
            for (member, anchor) in decl.members.iter().zip(&anchors) {
                writeln!(output, "- [`{}`](#{})", member.name, anchor)?;
            }
            writeln!(output)?;
        }

        output.push_str(&members);
        Ok(())
    }

    /// Documentation prose with cross-links added
    fn prose(&self, text: &str, page: &Page<'_>) -> String {
        self.index.link_code_spans(text.trim(), page.path, page.current)
    }
}

/// Headed sections a declaration body can hold, in output order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Inheritance,
    Parameters,
    ReturnValue,
    Throws,
    Contents,
}

impl Section {
    fn title(self) -> &'static str {
        match self {
            Section::Inheritance => "Inheritance",
            Section::Parameters => "Parameters",
            Section::ReturnValue => "Return Value",
            Section::Throws => "Throws",
            Section::Contents => "Contents",
        }
    }
}

/// Sections the body of `decl` will contain at `level`
fn sections(decl: &Declaration, level: usize, config: &Config) -> Vec<Section> {
    let mut sections = Vec::new();
    if !decl.inheritance.is_empty() {
        sections.push(Section::Inheritance);
    }
    if let Some(doc) = &decl.doc {
        if decl.kind == DeclKind::Function && !doc.params.is_empty() {
            sections.push(Section::Parameters);
        }
        if doc.returns.is_some() {
            sections.push(Section::ReturnValue);
        }
        if doc.throws.is_some() {
            sections.push(Section::Throws);
        }
    }
    if config.table_of_contents && level == 1 && !decl.members.is_empty() {
        sections.push(Section::Contents);
    }
    sections
}

/// Claim the anchors of a declaration heading and its section headings,
/// returning the declaration's anchor and its sections
fn claim_headings(slugger: &mut Slugger, decl: &Declaration, level: usize, config: &Config) -> (String, Vec<Section>) {
    let anchor = slugger.slug(&decl.name);
    let sections = sections(decl, level, config);
    for section in &sections {
        slugger.slug(section.title());
    }
    (anchor, sections)
}

/// Claim every heading anchor a top-level declaration takes in a document,
/// members included, in the order the renderer writes them.
///
/// Returns the anchor of the declaration's own heading.
pub(crate) fn claim_document_anchors(slugger: &mut Slugger, decl: &Declaration, config: &Config) -> String {
    fn claim(slugger: &mut Slugger, decl: &Declaration, level: usize, config: &Config) -> String {
        let (anchor, _) = claim_headings(slugger, decl, level, config);
        for member in &decl.members {
            claim(slugger, member, level + 1, config);
        }
        anchor
    }
    claim(slugger, decl, 1, config)
}

/// Footer line appended to every document when a timestamp is known
pub fn footer(generated_at: &DateTime<Utc>) -> String {
    format!(
        "---\n\nThis file was generated by [SourceDocs](https://github.com/sourcedocs/sourcedocs) on {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S%:z")
    )
}

fn heading(level: usize) -> String {
    "#".repeat(level.min(MAX_HEADING))
}

/// Collapse trailing blank lines to a single newline
fn finish(mut output: String) -> String {
    let trimmed = output.trim_end().len();
    output.truncate(trimmed);
    output.push('\n');
    output
}
