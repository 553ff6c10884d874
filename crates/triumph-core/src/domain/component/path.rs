//! Object path helpers.

pub const ROOT_PATH: &str = "/";

/// Qualify a child node name against its parent's absolute path.
///
/// Relative names are appended with a single `/` separator, so children of
/// the root become `/name` rather than `//name`. Names that are already
/// absolute are taken as given, and an empty name refers to the parent
/// itself.
#[must_use]
pub fn child_path(parent: &str, name: &str) -> String {
    let name = name.trim();
    if name.starts_with('/') {
        return normalize(name);
    }
    if name.is_empty() {
        return normalize(parent);
    }
    let parent = normalize(parent);
    if parent == ROOT_PATH {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Strip trailing slashes, keeping the root path as `/`.
#[must_use]
pub fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        ROOT_PATH.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Whether `path` is a well-formed absolute object path.
///
/// Elements are non-empty runs of `[A-Za-z0-9_]` separated by single
/// slashes; only the root path may end with a slash.
#[must_use]
pub fn is_object_path(path: &str) -> bool {
    if path == ROOT_PATH {
        return true;
    }
    let Some(rest) = path.strip_prefix('/') else {
        return false;
    };
    rest.split('/').all(|element| {
        !element.is_empty()
            && element
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_of_root() {
        assert_eq!(child_path("/", "org"), "/org");
    }

    #[test]
    fn test_child_of_nested() {
        assert_eq!(child_path("/org/alljoyn", "triumph"), "/org/alljoyn/triumph");
        assert_eq!(child_path("/org/", "x"), "/org/x");
    }

    #[test]
    fn test_absolute_and_empty_names() {
        assert_eq!(child_path("/a", "/a"), "/a");
        assert_eq!(child_path("/a", "/b/"), "/b");
        assert_eq!(child_path("/a", ""), "/a");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("//"), "/");
        assert_eq!(normalize("/a/b/"), "/a/b");
    }

    #[test]
    fn test_object_path_validation() {
        assert!(is_object_path("/"));
        assert!(is_object_path("/org/alljoyn_1"));
        assert!(!is_object_path("org"));
        assert!(!is_object_path("/org/"));
        assert!(!is_object_path("/org//x"));
        assert!(!is_object_path("/org/a-b"));
    }
}
