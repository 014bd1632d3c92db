//! Documentation generation for `sourcedocs generate`.

use anyhow::{bail, Context, Result};
use chrono::Utc;
use sourcedocs_core::{AccessLevel, Config, GeneratedDocs, Generator, Inventory, CONFIG_FILE};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config values given on the command line; these win over `sourcedocs.toml`.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub module_name: Option<String>,
    pub min_acl: Option<AccessLevel>,
    pub collapse: bool,
    pub table_of_contents: bool,
    pub collapsible: bool,
    pub link_beginning: Option<String>,
    pub link_ending: Option<String>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if let Some(name) = self.module_name {
            config.module_name = Some(name);
        }
        if let Some(level) = self.min_acl {
            config.min_acl = level;
        }
        config.collapse |= self.collapse;
        config.table_of_contents |= self.table_of_contents;
        config.collapsible |= self.collapsible;
        if let Some(beginning) = self.link_beginning {
            config.link_beginning = beginning;
        }
        if let Some(ending) = self.link_ending {
            config.link_ending = ending;
        }
    }
}

/// Options for a generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// JSON declaration inventory.
    pub input: PathBuf,

    /// Root output directory.
    pub output_folder: PathBuf,

    /// Write into `<output_folder>/<module>`.
    pub include_module_name: bool,

    /// Leave out the timestamp footer.
    pub reproducible: bool,

    /// Delete the output folder before writing.
    pub clean: bool,

    /// Explicit config file.
    pub config: Option<PathBuf>,

    pub overrides: Overrides,
}

/// Generate documentation and write it to disk.
pub fn generate_docs(options: GenerateOptions) -> Result<()> {
    let mut config = load_config(options.config.as_deref())?;
    options.overrides.apply(&mut config);

    println!("Generating Markdown documentation...");

    let json = fs::read_to_string(&options.input)
        .with_context(|| format!("Failed to read inventory '{}'", options.input.display()))?;
    let inventory = Inventory::from_json(&json)
        .with_context(|| format!("Failed to load inventory '{}'", options.input.display()))?;

    if config.module_name.is_none() {
        config.module_name = inventory.module.clone();
    }
    let output_dir = output_dir(&options.output_folder, options.include_module_name, &config)?;

    let mut generator = Generator::new(config);
    if !options.reproducible {
        generator = generator.with_timestamp(Utc::now());
    }
    let docs = generator.generate_inventory(inventory)?;

    // Nothing is deleted until generation has succeeded
    if options.clean {
        remove_output(&options.output_folder)?;
    }
    write_docs(&docs, &output_dir)?;

    println!("Done 🎉");
    Ok(())
}

/// Load the explicit config file, or `sourcedocs.toml` from the working
/// directory when one exists.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("Failed to load config '{}'", path.display())),
        None if Path::new(CONFIG_FILE).is_file() => {
            debug!(path = CONFIG_FILE, "using config from working directory");
            Config::from_path(CONFIG_FILE).with_context(|| format!("Failed to load config '{}'", CONFIG_FILE))
        }
        None => Ok(Config::default()),
    }
}

fn output_dir(root: &Path, include_module_name: bool, config: &Config) -> Result<PathBuf> {
    if !include_module_name {
        return Ok(root.to_path_buf());
    }
    match config.module_name.as_deref() {
        Some(name) if !name.is_empty() => Ok(root.join(name)),
        _ => bail!("--include-module-name needs a module name; pass --module-name or name the module in the inventory"),
    }
}

pub(crate) fn remove_output(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }
    fs::remove_dir_all(dir).with_context(|| format!("Failed to delete '{}'", dir.display()))?;
    debug!(path = %dir.display(), "deleted output folder");
    Ok(true)
}

fn write_docs(docs: &GeneratedDocs, output_dir: &Path) -> Result<()> {
    for (path, content) in docs.iter() {
        let file = output_dir.join(path);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
        }
        fs::write(&file, content).with_context(|| format!("Failed to write '{}'", file.display()))?;
    }
    debug!(documents = docs.len(), path = %output_dir.display(), "wrote documentation");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_overrides_win_over_config() {
        let mut config = Config::parse("min-acl = \"internal\"\ncollapse = true\nlink-ending = \".html\"\n").unwrap();
        Overrides {
            min_acl: Some(AccessLevel::Private),
            link_ending: Some(String::new()),
            ..Overrides::default()
        }
        .apply(&mut config);

        assert_eq!(config.min_acl, AccessLevel::Private);
        assert!(config.collapse);
        assert_eq!(config.link_ending, "");
    }

    #[test]
    fn test_output_dir_with_module() {
        let config = Config {
            module_name: Some("TestSubjects".into()),
            ..Config::default()
        };
        let root = Path::new("Documentation/Reference");
        assert_eq!(output_dir(root, false, &config).unwrap(), root);
        assert_eq!(output_dir(root, true, &config).unwrap(), root.join("TestSubjects"));
        assert!(output_dir(root, true, &Config::default()).is_err());
    }

    #[test]
    fn test_explicit_config_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "table-of-contents = true\n").unwrap();
        assert!(load_config(Some(&path)).unwrap().table_of_contents);

        fs::write(&path, "unknown-key = 1\n").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }

    #[test]
    fn test_write_docs_creates_category_folders() {
        let tmp = TempDir::new().unwrap();
        let docs = Generator::default()
            .generate_json(r#"[{"kind": "class", "name": "Foo", "accessLevel": "public"}]"#)
            .unwrap();
        write_docs(&docs, tmp.path()).unwrap();

        assert!(tmp.path().join("README.md").is_file());
        let foo = fs::read_to_string(tmp.path().join("classes/Foo.md")).unwrap();
        assert!(foo.starts_with("# `Foo`"));
    }

    #[test]
    fn test_remove_missing_output() {
        let tmp = TempDir::new().unwrap();
        assert!(!remove_output(&tmp.path().join("absent")).unwrap());
    }
}
