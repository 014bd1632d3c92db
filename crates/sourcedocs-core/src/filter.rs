//! Visibility filtering

use tracing::debug;

use crate::model::{AccessLevel, Declaration};

/// Remove every declaration below `min_acl`, recursively.
///
/// A dropped declaration takes all of its members with it. A retained
/// declaration keeps only qualifying members, and survives even with none
/// left, unless it is an extension: an extension exists only to add members.
pub fn filter_declarations(declarations: Vec<Declaration>, min_acl: AccessLevel) -> Vec<Declaration> {
    let before = declarations.len();
    let retained: Vec<_> = declarations
        .into_iter()
        .filter_map(|decl| filter_declaration(decl, min_acl))
        .collect();

    debug!(%min_acl, before, after = retained.len(), "filtered declarations");
    retained
}

fn filter_declaration(mut decl: Declaration, min_acl: AccessLevel) -> Option<Declaration> {
    if !decl.access_level.meets(min_acl) {
        return None;
    }

    let members = std::mem::take(&mut decl.members);
    decl.members = members
        .into_iter()
        .filter_map(|member| filter_declaration(member, min_acl))
        .collect();

    if decl.is_extension() && decl.members.is_empty() {
        return None;
    }
    Some(decl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DeclKind;

    fn func(name: &str, level: AccessLevel) -> Declaration {
        Declaration::new(DeclKind::Function, name, level, format!("{} func {}", level, name))
    }

    fn foo() -> Declaration {
        Declaration::new(DeclKind::Class, "Foo", AccessLevel::Public, "public class Foo")
            .with_member(func("publicMethod()", AccessLevel::Public))
            .with_member(func("openMethod()", AccessLevel::Open))
            .with_member(func("internalMethod()", AccessLevel::Internal))
            .with_member(func("filePrivateMethod()", AccessLevel::FilePrivate))
            .with_member(func("privateMethod()", AccessLevel::Private))
    }

    fn member_names(decl: &Declaration) -> Vec<&str> {
        decl.members.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_default_keeps_public_and_open() {
        let result = filter_declarations(vec![foo()], AccessLevel::default());
        assert_eq!(member_names(&result[0]), vec!["publicMethod()", "openMethod()"]);
    }

    #[test]
    fn test_each_level_adds_one_tier() {
        let internal = filter_declarations(vec![foo()], AccessLevel::Internal);
        assert_eq!(internal[0].members.len(), 3);
        let fileprivate = filter_declarations(vec![foo()], AccessLevel::FilePrivate);
        assert_eq!(fileprivate[0].members.len(), 4);
        let private = filter_declarations(vec![foo()], AccessLevel::Private);
        assert_eq!(private[0].members.len(), 5);
    }

    #[test]
    fn test_invisible_type_hides_public_members() {
        let hidden = Declaration::new(DeclKind::Class, "Hidden", AccessLevel::Private, "private class Hidden")
            .with_member(func("publicMethod()", AccessLevel::Public));
        assert!(filter_declarations(vec![hidden], AccessLevel::Public).is_empty());
    }

    #[test]
    fn test_empty_type_retained_but_empty_extension_dropped() {
        let class = Declaration::new(DeclKind::Class, "Empty", AccessLevel::Public, "public class Empty")
            .with_member(func("hidden()", AccessLevel::Internal));
        let ext = Declaration::new(DeclKind::Extension, "Array", AccessLevel::Public, "extension Array")
            .with_member(func("hidden()", AccessLevel::Internal));

        let result = filter_declarations(vec![class, ext], AccessLevel::Public);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Empty");
        assert!(result[0].members.is_empty());
    }

    #[test]
    fn test_filter_is_monotonic() {
        let input = vec![
            foo(),
            Declaration::new(DeclKind::Struct, "Internal", AccessLevel::Internal, "struct Internal"),
            Declaration::new(DeclKind::Struct, "Secret", AccessLevel::Private, "private struct Secret"),
        ];
        let mut previous: Option<Vec<Declaration>> = None;
        // Most restrictive first; every step must be a superset of the last
        for level in AccessLevel::ALL {
            let current = filter_declarations(input.clone(), level);
            if let Some(prev) = &previous {
                for decl in prev {
                    let wider = current.iter().find(|d| d.name == decl.name).unwrap();
                    for member in &decl.members {
                        assert!(wider.members.contains(member));
                    }
                }
            }
            previous = Some(current);
        }
    }
}
