//! Resolution of theme asset paths to CDN mirror URLs.
//!
//! All four asset helpers (`renderJS`, `renderJSModule`, `renderJSPath` and
//! `renderCSS`) share one provider table ([`PROVIDERS`]) and one resolver
//! ([`Resolver`]); they differ only in the [`AssetKind`], which decides how a
//! URL is wrapped and which [`LocalAssets`] helper serves as the fallback when
//! the CDN is disabled.

use crate::assets::LocalAssets;
use crate::config::CdnConfig;
use tracing::debug;

/// The provider name whose template comes from `cdn.custom_url`.
pub const CUSTOM_PROVIDER: &str = "custom";

/// The provider used when the configured one isn't known.
pub const DEFAULT_PROVIDER: &str = "staticfile";

/// URL templates for the known CDN mirrors. `:version` is replaced by the
/// theme version and `:path` by the asset path.
pub const PROVIDERS: &[(&str, &str)] = &[
    (
        "staticfile",
        "https://cdn.staticfile.net/hexo-theme-redefine/:version/:path",
    ),
    (
        "bootcdn",
        "https://cdn.bootcdn.net/ajax/libs/hexo-theme-redefine/:version/:path",
    ),
    (
        "sustech",
        "https://mirrors.sustech.edu.cn/cdnjs/ajax/libs/hexo-theme-redefine/:version/:path",
    ),
    (
        "zstatic",
        "https://s4.zstatic.net/ajax/libs/hexo-theme-redefine/:version/:path",
    ),
    (
        "cdnjs",
        "https://cdnjs.cloudflare.com/ajax/libs/hexo-theme-redefine/:version/:path",
    ),
    (
        "unpkg",
        "https://unpkg.com/hexo-theme-redefine@:version/source/:path",
    ),
    (
        "jsdelivr",
        "https://cdn.jsdelivr.net/npm/hexo-theme-redefine@:version/source/:path",
    ),
    (
        "aliyun",
        "https://evan.beee.top/projects/hexo-theme-redefine/:version/source/:path",
    ),
    (
        "npmmirror",
        "https://registry.npmmirror.com/hexo-theme-redefine/:version/files/source/:path",
    ),
];

/// Looks up a built-in provider's URL template by name.
pub fn provider(name: &str) -> Option<&'static str> {
    PROVIDERS
        .iter()
        .find(|(provider, _)| *provider == name)
        .map(|(_, template)| *template)
}

/// Fills in the first `:version` and then the first `:path` placeholder.
pub fn substitute(template: &str, version: &str, path: &str) -> String {
    template
        .replacen(":version", version, 1)
        .replacen(":path", path, 1)
}

/// The flavours of asset reference the theme renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    /// `<script src="…"></script>`
    Script,

    /// `<script type="module" src="…"></script>`
    Module,

    /// The bare URL.
    Path,

    /// `<link rel="stylesheet" href="…">`
    Stylesheet,
}

impl AssetKind {
    /// Wraps a resolved URL in the kind's markup.
    pub fn wrap(self, url: &str) -> String {
        match self {
            AssetKind::Script => format!(r#"<script src="{}"></script>"#, url),
            AssetKind::Module => format!(r#"<script type="module" src="{}"></script>"#, url),
            AssetKind::Path => url.to_owned(),
            AssetKind::Stylesheet => format!(r#"<link rel="stylesheet" href="{}">"#, url),
        }
    }

    /// Renders `path` with the site's own asset helpers.
    pub fn local(self, assets: &dyn LocalAssets, path: &str) -> String {
        match self {
            AssetKind::Script => assets.js(path),
            AssetKind::Module => assets.js_module(path),
            AssetKind::Path => assets.url_for(path),
            AssetKind::Stylesheet => assets.css(path),
        }
    }
}

/// Resolves asset paths against the configured CDN, falling back to the
/// site's own helpers when the CDN is disabled.
pub struct Resolver<'a> {
    pub cdn: &'a CdnConfig,
    pub assets: &'a dyn LocalAssets,
    pub version: &'a str,
}

impl<'a> Resolver<'a> {
    pub fn new(cdn: &'a CdnConfig, assets: &'a dyn LocalAssets, version: &'a str) -> Self {
        Resolver {
            cdn,
            assets,
            version,
        }
    }

    /// The URL template for the configured provider. An unknown provider, or
    /// `custom` without a `custom_url`, resolves to [`DEFAULT_PROVIDER`].
    pub fn template(&self) -> &'a str {
        let cdn = self.cdn;
        if cdn.provider == CUSTOM_PROVIDER {
            if !cdn.custom_url.is_empty() {
                return &cdn.custom_url;
            }
            debug!("custom CDN provider has no custom_url, using {}", DEFAULT_PROVIDER);
        } else if let Some(template) = provider(&cdn.provider) {
            return template;
        } else {
            debug!(provider = %cdn.provider, "unknown CDN provider, using {}", DEFAULT_PROVIDER);
        }
        provider(DEFAULT_PROVIDER).unwrap_or_default()
    }

    /// Renders a single asset reference.
    pub fn render(&self, kind: AssetKind, path: &str) -> String {
        let template = self.template();
        if !self.cdn.enable {
            return kind.local(self.assets, path);
        }

        let url = substitute(template, self.version, path);
        if self.cdn.provider != CUSTOM_PROVIDER {
            return kind.wrap(&url);
        }

        // The custom provider re-checks the enable flag before committing
        // to the custom URL. Stylesheets never fall back at this point.
        match kind {
            AssetKind::Stylesheet => kind.wrap(&url),
            _ if self.cdn.enable => kind.wrap(&url),
            AssetKind::Path => kind.local(self.assets, path),
            _ => kind.wrap(&kind.local(self.assets, path)),
        }
    }

    /// Renders each path in order and concatenates the results.
    pub fn render_all<S: AsRef<str>>(&self, kind: AssetKind, paths: &[S]) -> String {
        paths
            .iter()
            .map(|path| self.render(kind, path.as_ref()))
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assets::SiteAssets;

    const VERSION: &str = "2.8.2";

    fn cdn(enable: bool, provider: &str, custom_url: &str) -> CdnConfig {
        CdnConfig {
            enable,
            provider: provider.to_owned(),
            custom_url: custom_url.to_owned(),
        }
    }

    #[test]
    fn test_disabled_uses_local_helpers() {
        let cdn = cdn(false, "unpkg", "");
        let assets = SiteAssets::default();
        let resolver = Resolver::new(&cdn, &assets, VERSION);

        assert_eq!(assets.css("a.css"), resolver.render(AssetKind::Stylesheet, "a.css"));
        assert_eq!(
            assets.js("js/main.js"),
            resolver.render(AssetKind::Script, "js/main.js")
        );
        assert_eq!(
            assets.js_module("js/main.js"),
            resolver.render(AssetKind::Module, "js/main.js")
        );
        assert_eq!("/js/main.js", resolver.render(AssetKind::Path, "js/main.js"));
    }

    #[test]
    fn test_providers() {
        let assets = SiteAssets::default();
        let cases = [
            (
                "staticfile",
                "https://cdn.staticfile.net/hexo-theme-redefine/2.8.2/js/main.js",
            ),
            (
                "bootcdn",
                "https://cdn.bootcdn.net/ajax/libs/hexo-theme-redefine/2.8.2/js/main.js",
            ),
            (
                "sustech",
                "https://mirrors.sustech.edu.cn/cdnjs/ajax/libs/hexo-theme-redefine/2.8.2/js/main.js",
            ),
            (
                "zstatic",
                "https://s4.zstatic.net/ajax/libs/hexo-theme-redefine/2.8.2/js/main.js",
            ),
            (
                "cdnjs",
                "https://cdnjs.cloudflare.com/ajax/libs/hexo-theme-redefine/2.8.2/js/main.js",
            ),
            (
                "unpkg",
                "https://unpkg.com/hexo-theme-redefine@2.8.2/source/js/main.js",
            ),
            (
                "jsdelivr",
                "https://cdn.jsdelivr.net/npm/hexo-theme-redefine@2.8.2/source/js/main.js",
            ),
            (
                "aliyun",
                "https://evan.beee.top/projects/hexo-theme-redefine/2.8.2/source/js/main.js",
            ),
            (
                "npmmirror",
                "https://registry.npmmirror.com/hexo-theme-redefine/2.8.2/files/source/js/main.js",
            ),
        ];
        for (name, wanted) in cases.iter() {
            let cdn = cdn(true, name, "");
            let resolver = Resolver::new(&cdn, &assets, VERSION);
            assert_eq!(
                *wanted,
                resolver.render(AssetKind::Path, "js/main.js"),
                "provider {}",
                name
            );
        }
    }

    #[test]
    fn test_wrapping() {
        let cdn = cdn(true, "jsdelivr", "");
        let assets = SiteAssets::default();
        let resolver = Resolver::new(&cdn, &assets, VERSION);
        let url = "https://cdn.jsdelivr.net/npm/hexo-theme-redefine@2.8.2/source/js/a.js";

        assert_eq!(
            format!(r#"<script src="{}"></script>"#, url),
            resolver.render(AssetKind::Script, "js/a.js")
        );
        assert_eq!(
            format!(r#"<script type="module" src="{}"></script>"#, url),
            resolver.render(AssetKind::Module, "js/a.js")
        );
        let css = "https://cdn.jsdelivr.net/npm/hexo-theme-redefine@2.8.2/source/css/a.css";
        assert_eq!(
            format!(r#"<link rel="stylesheet" href="{}">"#, css),
            resolver.render(AssetKind::Stylesheet, "css/a.css")
        );
    }

    #[test]
    fn test_unknown_provider_falls_back() {
        let cdn = cdn(true, "nosuchcdn", "");
        let assets = SiteAssets::default();
        let resolver = Resolver::new(&cdn, &assets, VERSION);
        assert_eq!(
            "https://cdn.staticfile.net/hexo-theme-redefine/2.8.2/a.js",
            resolver.render(AssetKind::Path, "a.js")
        );
    }

    #[test]
    fn test_custom_provider() {
        let template = "https://static.example.org/redefine@:version/:path";
        let cdn = cdn(true, "custom", template);
        let assets = SiteAssets::default();
        let resolver = Resolver::new(&cdn, &assets, VERSION);
        assert_eq!(template, resolver.template());
        assert_eq!(
            r#"<link rel="stylesheet" href="https://static.example.org/redefine@2.8.2/css/a.css">"#,
            resolver.render(AssetKind::Stylesheet, "css/a.css")
        );
        assert_eq!(
            "https://static.example.org/redefine@2.8.2/js/main.js",
            resolver.render(AssetKind::Path, "js/main.js")
        );
    }

    #[test]
    fn test_custom_provider_without_url() {
        let cdn = cdn(true, "custom", "");
        let assets = SiteAssets::default();
        let resolver = Resolver::new(&cdn, &assets, VERSION);
        assert_eq!(provider(DEFAULT_PROVIDER), Some(resolver.template()));
        assert!(provider(CUSTOM_PROVIDER).is_none());
        assert_eq!(
            "https://cdn.staticfile.net/hexo-theme-redefine/2.8.2/a.js",
            resolver.render(AssetKind::Path, "a.js")
        );
    }

    #[test]
    fn test_custom_provider_disabled() {
        let cdn = cdn(false, "custom", "https://static.example.org/:version/:path");
        let assets = SiteAssets::default();
        let resolver = Resolver::new(&cdn, &assets, VERSION);
        assert_eq!(assets.js("a.js"), resolver.render(AssetKind::Script, "a.js"));
    }

    #[test]
    fn test_render_all_concatenates() {
        let cdn = cdn(false, "staticfile", "");
        let assets = SiteAssets::default();
        let resolver = Resolver::new(&cdn, &assets, VERSION);
        assert_eq!(
            format!("{}{}", assets.css("a.css"), assets.css("b.css")),
            resolver.render_all(AssetKind::Stylesheet, &["a.css", "b.css"])
        );
        assert_eq!("", resolver.render_all::<&str>(AssetKind::Stylesheet, &[]));
    }

    #[test]
    fn test_substitute_first_occurrence_only() {
        assert_eq!(
            "https://x/1.0/:version/a.js/:path",
            substitute("https://x/:version/:version/:path/:path", "1.0", "a.js")
        );
    }
}
