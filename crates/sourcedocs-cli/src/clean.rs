//! Output removal for `sourcedocs clean`.

use anyhow::Result;
use std::path::Path;

use crate::generate::remove_output;

/// Delete a generated documentation folder.
pub fn clean_docs(output_folder: &Path) -> Result<()> {
    println!("Removing reference documentation...");
    if !remove_output(output_folder)? {
        println!("Nothing to remove at {}", output_folder.display());
    }
    println!("Done 🎉");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_clean_removes_tree() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("Documentation/Reference");
        fs::create_dir_all(out.join("classes")).unwrap();
        fs::write(out.join("classes/Foo.md"), "# `Foo`\n").unwrap();

        clean_docs(&out).unwrap();
        assert!(!out.exists());
        assert!(tmp.path().join("Documentation").exists());
    }

    #[test]
    fn test_clean_missing_folder_is_ok() {
        let tmp = TempDir::new().unwrap();
        assert!(clean_docs(&tmp.path().join("nothing")).is_ok());
    }
}
