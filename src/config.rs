//! Theme and site configuration. Both are read from the generator's YAML
//! files and never mutated by the helpers; see [`Config::from_directory`] for
//! how the files are located.

use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The site configuration file at the root of a site.
pub const SITE_CONFIG_FILE: &str = "_config.yml";

/// The theme configuration file that sits next to [`SITE_CONFIG_FILE`].
pub const THEME_CONFIG_FILE: &str = "_config.redefine.yml";

/// Where the theme keeps its own defaults when it's installed into the site.
const BUNDLED_THEME_CONFIG: &str = "themes/redefine/_config.yml";

/// CDN settings from the theme configuration's `cdn` section.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CdnConfig {
    /// Whether assets are served from a CDN mirror instead of the site.
    pub enable: bool,

    /// The name of the mirror (see [`crate::cdn::PROVIDERS`]) or `custom`.
    pub provider: String,

    /// The URL template used by the `custom` provider. Supports the
    /// `:version` and `:path` placeholders.
    pub custom_url: String,
}

impl Default for CdnConfig {
    fn default() -> Self {
        CdnConfig {
            enable: false,
            provider: String::from("staticfile"),
            custom_url: String::new(),
        }
    }
}

/// The subset of the theme configuration the helpers read.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ThemeConfig {
    pub cdn: CdnConfig,
}

/// The subset of the site configuration the helpers read.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteConfig {
    /// The public URL of the site, e.g. `https://example.org/blog`.
    pub url: String,

    /// The directory the site is served from, e.g. `/` or `/blog/`.
    pub root: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            url: String::new(),
            root: String::from("/"),
        }
    }
}

/// Bundles the theme and site configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    pub theme: ThemeConfig,
    pub site: SiteConfig,
}

impl Config {
    /// Loads the given files; a missing argument means defaults for that half
    /// of the configuration.
    pub fn from_files(theme: Option<&Path>, site: Option<&Path>) -> Result<Config> {
        Ok(Config {
            theme: match theme {
                Some(path) => load(path, "theme")?,
                None => ThemeConfig::default(),
            },
            site: match site {
                Some(path) => load(path, "site")?,
                None => SiteConfig::default(),
            },
        })
    }

    /// Searches `dir` and its ancestors for the site root (the first directory
    /// holding [`SITE_CONFIG_FILE`]). The theme configuration is read from
    /// [`THEME_CONFIG_FILE`] in the site root, or from the theme's bundled
    /// `_config.yml` when the site doesn't override it. Without a site root
    /// everything is defaulted.
    pub fn from_directory(dir: &Path) -> Result<Config> {
        for ancestor in dir.ancestors() {
            let site = ancestor.join(SITE_CONFIG_FILE);
            if site.is_file() {
                debug!(root = %ancestor.display(), "found site root");
                let theme = [
                    ancestor.join(THEME_CONFIG_FILE),
                    ancestor.join(BUNDLED_THEME_CONFIG),
                ]
                .into_iter()
                .find(|p| p.is_file());
                return Config::from_files(theme.as_deref(), Some(&site));
            }
        }
        debug!(dir = %dir.display(), "no site root found, using defaults");
        Ok(Config::default())
    }
}

fn load<T>(path: &Path, kind: &'static str) -> Result<T>
where
    T: for<'de> Deserialize<'de> + Default,
{
    let mut contents = String::new();
    File::open(path)
        .map_err(|err| Error::Open {
            kind,
            path: path.to_owned(),
            err,
        })?
        .read_to_string(&mut contents)
        .map_err(|err| Error::Open {
            kind,
            path: path.to_owned(),
            err,
        })?;

    // An empty YAML document isn't a mapping; treat it as "all defaults".
    if contents.trim().is_empty() {
        return Ok(T::default());
    }
    serde_yaml::from_str(&contents).map_err(|err| Error::DeserializeYaml {
        kind,
        path: path.to_owned(),
        err,
    })
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when a configuration file can't be opened or read.
    Open {
        kind: &'static str,
        path: PathBuf,
        err: std::io::Error,
    },

    /// Returned when a configuration file isn't valid YAML of the expected
    /// shape.
    DeserializeYaml {
        kind: &'static str,
        path: PathBuf,
        err: serde_yaml::Error,
    },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { kind, path, err } => {
                write!(f, "Opening {} config `{}`: {}", kind, path.display(), err)
            }
            Error::DeserializeYaml { kind, path, err } => {
                write!(f, "Parsing {} config `{}`: {}", kind, path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { err, .. } => Some(err),
            Error::DeserializeYaml { err, .. } => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(!config.theme.cdn.enable);
        assert_eq!("staticfile", config.theme.cdn.provider);
        assert_eq!("/", config.site.root);
    }

    #[test]
    fn test_partial_theme_config() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let theme: ThemeConfig = serde_yaml::from_str(
            "info:\n  title: Redefine\ncdn:\n  enable: true\n  provider: unpkg\n",
        )?;
        assert!(theme.cdn.enable);
        assert_eq!("unpkg", theme.cdn.provider);
        assert_eq!("", theme.cdn.custom_url);
        Ok(())
    }

    #[test]
    fn test_from_directory_walks_up() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        fs::write(
            root.path().join(SITE_CONFIG_FILE),
            "title: Blog\nurl: https://example.org/blog\nroot: /blog/\n",
        )?;
        fs::write(
            root.path().join(THEME_CONFIG_FILE),
            concat!(
                "cdn:\n",
                "  enable: true\n",
                "  provider: custom\n",
                "  custom_url: https://cdn.example.org/:version/:path\n",
            ),
        )?;
        let nested = root.path().join("source").join("_posts");
        fs::create_dir_all(&nested)?;

        let config = Config::from_directory(&nested)?;
        assert_eq!("https://example.org/blog", config.site.url);
        assert_eq!("/blog/", config.site.root);
        assert_eq!("custom", config.theme.cdn.provider);
        assert_eq!("https://cdn.example.org/:version/:path", config.theme.cdn.custom_url);
        Ok(())
    }

    #[test]
    fn test_from_directory_bundled_theme_config(
    ) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        fs::write(root.path().join(SITE_CONFIG_FILE), "")?;
        let theme_dir = root.path().join("themes").join("redefine");
        fs::create_dir_all(&theme_dir)?;
        fs::write(theme_dir.join("_config.yml"), "cdn:\n  provider: jsdelivr\n")?;

        let config = Config::from_directory(root.path())?;
        assert_eq!(SiteConfig::default(), config.site);
        assert_eq!("jsdelivr", config.theme.cdn.provider);
        assert!(!config.theme.cdn.enable);
        Ok(())
    }

    #[test]
    fn test_invalid_yaml_names_file() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let root = tempfile::tempdir()?;
        let path = root.path().join(THEME_CONFIG_FILE);
        fs::write(&path, "cdn: [unterminated\n")?;

        match Config::from_files(Some(&path), None) {
            Err(err @ Error::DeserializeYaml { .. }) => {
                assert!(err.to_string().contains(THEME_CONFIG_FILE));
            }
            other => panic!("wanted a YAML error; found {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let result = Config::from_files(None, Some(Path::new("/nonexistent/_config.yml")));
        assert!(matches!(result, Err(Error::Open { kind: "site", .. })));
    }
}
