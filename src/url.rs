//! URL building for templates: [`post_url`] makes a post path absolute against
//! the site's root URL and [`url_for`] prefixes a site-relative path with the
//! site's root directory.

use url::{ParseError, Url};

/// Joins `path` onto `root_url`. An empty `root_url` returns `path` as is.
/// Otherwise `root_url` must parse as an absolute URL; its normalized form is
/// given a trailing slash if it lacks one and `path` is appended verbatim
/// (no resolution of `..` or leading slashes).
pub fn post_url(root_url: &str, path: &str) -> Result<String, ParseError> {
    if root_url.is_empty() {
        return Ok(path.to_owned());
    }
    let mut href = String::from(Url::parse(root_url)?);
    if !href.ends_with('/') {
        href.push('/');
    }
    href.push_str(path);
    Ok(href)
}

/// Prefixes `path` with the site `root` (e.g. `/` or `/blog/`). Absolute URLs,
/// protocol-relative URLs, and fragment links pass through unchanged.
pub fn url_for(root: &str, path: &str) -> String {
    if path.starts_with('#') || path.starts_with("//") || is_absolute(path) {
        return path.to_owned();
    }

    let mut out = String::with_capacity(root.len() + path.len() + 1);
    out.push_str(root);
    if !out.ends_with('/') {
        out.push('/');
    }
    out.push_str(path.trim_start_matches('/'));
    out
}

fn is_absolute(path: &str) -> bool {
    Url::parse(path).is_ok()
}
