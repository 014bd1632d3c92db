//! Extension merging
//!
//! Folds `extension` declarations into the declaration of the type they
//! extend. Extensions of types that are not part of the inventory are kept as
//! standalone entries, one per extended type.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::model::Declaration;

/// Index path from the top-level list down to a nested declaration
type DeclPath = Vec<usize>;

/// Merge extensions into their target types.
///
/// The result holds every non-extension declaration in input order, followed
/// by the external extensions in first-seen order. Targets are looked up by
/// exact qualified name; when several declarations share a name the first one
/// receives the extension members.
pub fn merge_extensions(declarations: Vec<Declaration>) -> Vec<Declaration> {
    let (extensions, mut merged): (Vec<_>, Vec<_>) =
        declarations.into_iter().partition(Declaration::is_extension);

    let mut targets: HashMap<String, DeclPath> = HashMap::new();
    for (i, decl) in merged.iter().enumerate() {
        register(&mut targets, decl, &decl.name, vec![i]);
    }

    let mut external: Vec<Declaration> = Vec::new();
    let mut external_index: HashMap<String, usize> = HashMap::new();
    let mut folded = 0usize;

    for ext in extensions {
        if let Some(path) = targets.get(&ext.name).cloned() {
            trace!(name = %ext.name, members = ext.members.len(), "merging extension into type");
            let target = resolve_mut(&mut merged, &path);
            let qualified = target.name.clone();
            let start = target.members.len();
            target.union_inheritance(&ext.inheritance);
            target.members.extend(ext.members);

            // Nested types added by this extension become targets themselves
            for (offset, member) in target.members[start..].iter().enumerate() {
                let mut member_path = path.clone();
                member_path.push(start + offset);
                register_member(&mut targets, member, &qualified, member_path);
            }
            folded += 1;
        } else if let Some(&idx) = external_index.get(&ext.name) {
            trace!(name = %ext.name, "appending to external extension");
            let existing = &mut external[idx];
            existing.union_inheritance(&ext.inheritance);
            existing.members.extend(ext.members);
        } else {
            trace!(name = %ext.name, "extension of external type");
            external_index.insert(ext.name.clone(), external.len());
            external.push(ext);
        }
    }

    debug!(
        types = merged.len(),
        folded,
        external = external.len(),
        "merged extensions"
    );

    merged.extend(external);
    merged
}

/// Register `decl` (known as `qualified`) and its nested types
fn register(targets: &mut HashMap<String, DeclPath>, decl: &Declaration, qualified: &str, path: DeclPath) {
    if decl.kind.is_extendable() {
        targets
            .entry(qualified.to_string())
            .or_insert_with(|| path.clone());
    }
    for (i, member) in decl.members.iter().enumerate() {
        let mut member_path = path.clone();
        member_path.push(i);
        register_member(targets, member, qualified, member_path);
    }
}

fn register_member(
    targets: &mut HashMap<String, DeclPath>,
    member: &Declaration,
    parent: &str,
    path: DeclPath,
) {
    if !member.kind.is_extendable() {
        return;
    }
    let qualified = qualify(parent, &member.name);
    register(targets, member, &qualified, path);
}

/// Qualified name of a nested type; names already qualified are kept
fn qualify(parent: &str, name: &str) -> String {
    match name.strip_prefix(parent) {
        Some(rest) if rest.starts_with('.') => name.to_string(),
        _ => format!("{parent}.{name}"),
    }
}

fn resolve_mut<'a>(roots: &'a mut [Declaration], path: &[usize]) -> &'a mut Declaration {
    let mut current = &mut roots[path[0]];
    for &i in &path[1..] {
        current = &mut current.members[i];
    }
    current
}
