//! The generator's own asset helpers, used whenever assets are served from
//! the site rather than a CDN. [`LocalAssets`] is the seam; [`SiteAssets`]
//! renders tags the way the generator does for a given [`SiteConfig`].

use crate::config::SiteConfig;
use crate::url::url_for;

/// Renders references to assets hosted by the site itself.
pub trait LocalAssets {
    /// A classic `<script>` tag.
    fn js(&self, path: &str) -> String;

    /// A `<script type="module">` tag.
    fn js_module(&self, path: &str) -> String;

    /// The bare site URL for `path`.
    fn url_for(&self, path: &str) -> String;

    /// A stylesheet `<link>` tag.
    fn css(&self, path: &str) -> String;
}

/// [`LocalAssets`] for a site served from `root`.
#[derive(Clone, Debug)]
pub struct SiteAssets {
    root: String,
}

impl SiteAssets {
    pub fn new(site: &SiteConfig) -> SiteAssets {
        SiteAssets {
            root: site.root.clone(),
        }
    }
}

impl Default for SiteAssets {
    fn default() -> Self {
        SiteAssets::new(&SiteConfig::default())
    }
}

impl LocalAssets for SiteAssets {
    fn js(&self, path: &str) -> String {
        format!(
            r#"<script src="{}"></script>"#,
            self.url_for(&with_extension(path, ".js"))
        )
    }

    fn js_module(&self, path: &str) -> String {
        format!(
            r#"<script src="{}" type="module"></script>"#,
            self.url_for(&with_extension(path, ".js"))
        )
    }

    fn url_for(&self, path: &str) -> String {
        url_for(&self.root, path)
    }

    fn css(&self, path: &str) -> String {
        format!(
            r#"<link rel="stylesheet" href="{}">"#,
            self.url_for(&with_extension(path, ".css"))
        )
    }
}

// Appends `ext` unless the path already has it or carries a query string.
fn with_extension(path: &str, ext: &str) -> String {
    if path.ends_with(ext) || path.contains('?') {
        path.to_owned()
    } else {
        format!("{}{}", path, ext)
    }
}
