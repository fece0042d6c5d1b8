//! Exports [`is_in_home_paging`], which tells templates whether they are
//! rendering one of the paginated home listing pages (`page/2/`, `page/3/`,
//! etc.) as opposed to the first home page or any other route.

const PAGE_PREFIX: &str = "page/";

/// Returns `true` when `page_path` is a pagination path under the site root.
/// The path must be strictly longer than the `page/` prefix itself, so a bare
/// `page/` is not a paging path.
pub fn is_in_home_paging(page_path: &str, route: &str) -> bool {
    route == "/"
        && page_path.len() > PAGE_PREFIX.len()
        && page_path.starts_with(PAGE_PREFIX)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_paging_path_at_root() {
        assert!(is_in_home_paging("page/2/", "/"));
        assert!(is_in_home_paging("page/10/index.html", "/"));
    }

    #[test]
    fn test_non_root_route() {
        assert!(!is_in_home_paging("page/2/", "/blog/"));
        assert!(!is_in_home_paging("page/2/", ""));
    }

    #[test]
    fn test_short_or_foreign_paths() {
        assert!(!is_in_home_paging("", "/"));
        assert!(!is_in_home_paging("page", "/"));
        assert!(!is_in_home_paging("page/", "/"));
        assert!(!is_in_home_paging("pages/2/", "/"));
        assert!(!is_in_home_paging("archives/page/2/", "/"));
    }

    #[test]
    fn test_multibyte_path() {
        assert!(!is_in_home_paging("页面/2/", "/"));
    }
}
