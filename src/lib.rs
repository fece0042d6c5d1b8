//! Template helpers for the Redefine blog theme. The helpers are small, pure
//! functions over their arguments and the read-only theme configuration, and
//! fall into a few groups:
//!
//! 1. Page predicates and labels ([`crate::paging`], [`crate::author`])
//! 2. Post grouping for the archive page ([`crate::archive`])
//! 3. Asset and post URLs ([`crate::cdn`], [`crate::assets`], [`crate::url`])
//! 4. Post-processing of rendered HTML ([`crate::highlight`])
//!
//! The host generator doesn't call these directly. It looks them up by name in
//! a [`registry::Registry`] and invokes them with template values
//! ([`gtmpl_value::Value`]) and a [`registry::Context`] holding the
//! configuration, so every helper sees the configuration as an explicit
//! argument rather than ambient state.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod archive;
pub mod assets;
pub mod author;
pub mod cdn;
pub mod config;
pub mod highlight;
pub mod paging;
pub mod registry;
pub mod url;
pub mod value;

/// The theme release this crate renders assets for. CDN mirrors host the
/// theme's assets under this version.
pub const THEME_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the theme version (the `getThemeVersion` helper).
pub fn theme_version() -> &'static str {
    THEME_VERSION
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_theme_version_is_semver() {
        let parts: Vec<&str> = theme_version().split('.').collect();
        assert_eq!(3, parts.len());
        assert!(parts.iter().all(|p| p.parse::<u32>().is_ok()));
    }
}
