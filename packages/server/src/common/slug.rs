//! Slug derivation for catalog records.
//!
//! Every resource and tag gets a URL-safe slug derived from its name at
//! creation time. Slugs never change after creation, even when the name is
//! edited, so bookmarked URLs stay valid.

/// Derive a URL-safe slug from a display name.
///
/// Lowercases ASCII alphanumerics and collapses every other run of
/// characters into a single `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(c.to_ascii_lowercase());
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        // Names with no alphanumeric characters still need a stable handle.
        slug.push_str("item");
    }
    slug
}

/// Pick the first slug not already taken: `base`, then `base-2`, `base-3`, ...
///
/// `taken` is the set of existing slugs that could collide (the caller
/// queries for `base` and `base-%`).
pub fn next_available(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|slug| slug == base) {
        return base.to_string();
    }
    let mut n: u32 = 2;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken.iter().any(|slug| *slug == candidate) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_lowercases_and_dashes() {
        assert_eq!(slugify("My App"), "my-app");
        assert_eq!(slugify("GIS"), "gis");
        assert_eq!(slugify("Boston Open Data!"), "boston-open-data");
    }

    #[test]
    fn test_slugify_collapses_runs_and_trims() {
        assert_eq!(slugify("  A --- B  "), "a-b");
        assert_eq!(slugify("trailing punctuation..."), "trailing-punctuation");
    }

    #[test]
    fn test_slugify_never_empty() {
        assert_eq!(slugify("!!!"), "item");
        assert_eq!(slugify(""), "item");
    }

    #[test]
    fn test_next_available_without_collision() {
        assert_eq!(next_available("my-app", &[]), "my-app");
    }

    #[test]
    fn test_next_available_suffixes_on_collision() {
        let taken = vec!["my-app".to_string()];
        assert_eq!(next_available("my-app", &taken), "my-app-2");

        let taken = vec!["my-app".to_string(), "my-app-2".to_string()];
        assert_eq!(next_available("my-app", &taken), "my-app-3");
    }

    #[test]
    fn test_next_available_ignores_unrelated_slugs() {
        let taken = vec!["my-app-store".to_string()];
        assert_eq!(next_available("my-app", &taken), "my-app");
    }
}
