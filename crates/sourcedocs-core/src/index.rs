//! Root index document

use std::fmt::{self, Write};

use crate::config::Config;
use crate::crosslink::{PageIndex, INDEX_PATH};

/// Render the root `README` linking every page, grouped by category
pub fn render_index(index: &PageIndex, config: &Config) -> Result<String, fmt::Error> {
    let mut output = String::new();

    writeln!(output, "# {}", config.index_title())?;

    let mut current = None;
    for page in index.pages() {
        // Pages arrive grouped by category in index order
        if current != Some(page.category) {
            writeln!(output)?;
            writeln!(output, "## {}", page.category.title())?;
            writeln!(output)?;
            current = Some(page.category);
        }
        writeln!(output, "- [{}]({})", page.name, index.link(page, INDEX_PATH))?;
    }

    Ok(output)
}
