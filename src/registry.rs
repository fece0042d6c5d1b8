//! The table of helpers and filters the host generator can look up by name.
//!
//! Helpers receive a [`Context`] carrying the configuration explicitly, plus
//! their positional template arguments, and return a template [`Value`].
//! Filters receive the [`Context`] and a [`RenderResult`] to rewrite in place.

use crate::archive::create_archive;
use crate::assets::LocalAssets;
use crate::author::author_label;
use crate::cdn::{AssetKind, Resolver};
use crate::config::{Config, SiteConfig, ThemeConfig};
use crate::highlight::{after_post_render, RenderResult};
use crate::paging::is_in_home_paging;
use crate::url::post_url;
use crate::value::{as_text, as_texts, is_truthy, ArgumentError, Args};
use crate::theme_version;
use gtmpl_value::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::trace;

/// A helper callable from templates.
pub type HelperFn = fn(&Context, &[Value]) -> Result<Value>;

/// A filter run by the host at a fixed point of the render pipeline.
pub type FilterFn = fn(&Context, &mut RenderResult);

/// The hook run once a post's content has been rendered to HTML.
pub const AFTER_POST_RENDER: &str = "after_post_render";

/// Everything a helper may read besides its arguments.
pub struct Context<'a> {
    pub theme: &'a ThemeConfig,
    pub site: &'a SiteConfig,
    pub assets: &'a dyn LocalAssets,
    pub version: &'a str,
}

impl<'a> Context<'a> {
    pub fn new(config: &'a Config, assets: &'a dyn LocalAssets) -> Context<'a> {
        Context {
            theme: &config.theme,
            site: &config.site,
            assets,
            version: theme_version(),
        }
    }

    /// The CDN resolver for this context.
    pub fn resolver(&self) -> Resolver<'a> {
        Resolver::new(&self.theme.cdn, self.assets, self.version)
    }
}

/// Maps helper names and filter hooks to their implementations.
pub struct Registry {
    helpers: BTreeMap<&'static str, HelperFn>,
    filters: BTreeMap<&'static str, Vec<FilterFn>>,
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}

impl Registry {
    /// A registry with no helpers or filters.
    pub fn empty() -> Registry {
        Registry {
            helpers: BTreeMap::new(),
            filters: BTreeMap::new(),
        }
    }

    /// A registry holding all of the theme's helpers and filters.
    pub fn new() -> Registry {
        let mut registry = Registry::empty();
        registry.register_helper("isInHomePaging", helper_is_in_home_paging);
        registry.register_helper("createNewArchivePosts", helper_create_new_archive_posts);
        registry.register_helper("getAuthorLabel", helper_get_author_label);
        registry.register_helper("getPostUrl", helper_get_post_url);
        registry.register_helper("renderJS", helper_render_js);
        registry.register_helper("renderJSModule", helper_render_js_module);
        registry.register_helper("renderJSPath", helper_render_js_path);
        registry.register_helper("renderCSS", helper_render_css);
        registry.register_helper("getThemeVersion", helper_get_theme_version);
        registry.register_filter(AFTER_POST_RENDER, filter_after_post_render);
        registry
    }

    /// Registers `helper` under `name`, replacing any previous helper.
    pub fn register_helper(&mut self, name: &'static str, helper: HelperFn) {
        self.helpers.insert(name, helper);
    }

    /// Appends `filter` to the filters run for `hook`.
    pub fn register_filter(&mut self, hook: &'static str, filter: FilterFn) {
        self.filters.entry(hook).or_default().push(filter);
    }

    pub fn helper(&self, name: &str) -> Option<HelperFn> {
        self.helpers.get(name).copied()
    }

    /// Helper names in lexical order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.helpers.keys().copied()
    }

    /// Filter hooks in lexical order.
    pub fn hooks(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.filters.keys().copied()
    }

    /// Calls the helper registered as `name`.
    pub fn call(&self, ctx: &Context, name: &str, args: &[Value]) -> Result<Value> {
        let helper = self
            .helper(name)
            .ok_or_else(|| Error::UnknownHelper(name.to_owned()))?;
        trace!(helper = name, args = args.len(), "calling helper");
        helper(ctx, args).map_err(|err| err.annotate(name))
    }

    /// Runs every filter registered for `hook`, in registration order.
    pub fn apply_filter(&self, ctx: &Context, hook: &str, data: &mut RenderResult) -> Result<()> {
        let filters = self
            .filters
            .get(hook)
            .ok_or_else(|| Error::UnknownFilter(hook.to_owned()))?;
        trace!(hook, filters = filters.len(), "applying filters");
        for filter in filters {
            filter(ctx, data);
        }
        Ok(())
    }
}

fn helper_is_in_home_paging(_: &Context, args: &[Value]) -> Result<Value> {
    let args = Args::new(args);
    Ok(Value::Bool(is_in_home_paging(
        args.str_or_empty(0),
        args.str_or_empty(1),
    )))
}

fn helper_create_new_archive_posts(_: &Context, args: &[Value]) -> Result<Value> {
    let posts = Args::new(args).posts(0)?;
    Ok(Value::Array(
        create_archive(&posts).iter().map(Value::from).collect(),
    ))
}

fn helper_get_author_label(_: &Context, args: &[Value]) -> Result<Value> {
    let args = Args::new(args);
    // Only an explicit `false` turns automatic labels off.
    let is_auto = !matches!(args.get(1), Some(Value::Bool(false)));
    let labels = match args.get(2) {
        Some(value) if matches!(value, Value::Array(_)) => Some(as_texts(value)),
        _ => None,
    };
    Ok(Value::String(author_label(
        args.count(0),
        is_auto,
        labels.as_deref(),
    )))
}

fn helper_get_post_url(_: &Context, args: &[Value]) -> Result<Value> {
    let args = Args::new(args);
    let path = args.get(1).map(as_text).unwrap_or_default();
    let root = match args.get(0) {
        Some(value) if is_truthy(value) => as_text(value),
        _ => String::new(),
    };
    Ok(Value::String(post_url(&root, &path)?))
}

fn render_assets(ctx: &Context, args: &[Value], kind: AssetKind) -> Result<Value> {
    let paths = Args::new(args).texts(0);
    Ok(Value::String(ctx.resolver().render_all(kind, &paths)))
}

fn helper_render_js(ctx: &Context, args: &[Value]) -> Result<Value> {
    render_assets(ctx, args, AssetKind::Script)
}

fn helper_render_js_module(ctx: &Context, args: &[Value]) -> Result<Value> {
    render_assets(ctx, args, AssetKind::Module)
}

fn helper_render_js_path(ctx: &Context, args: &[Value]) -> Result<Value> {
    render_assets(ctx, args, AssetKind::Path)
}

fn helper_render_css(ctx: &Context, args: &[Value]) -> Result<Value> {
    render_assets(ctx, args, AssetKind::Stylesheet)
}

fn helper_get_theme_version(ctx: &Context, _: &[Value]) -> Result<Value> {
    Ok(Value::String(ctx.version.to_owned()))
}

fn filter_after_post_render(_: &Context, data: &mut RenderResult) {
    after_post_render(data)
}

pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failed helper or filter lookup or call.
#[derive(Debug)]
pub enum Error {
    /// Returned when no helper is registered under the name.
    UnknownHelper(String),

    /// Returned when no filter is registered for the hook.
    UnknownFilter(String),

    /// Returned when an argument has the wrong shape.
    Argument(ArgumentError),

    /// Returned when a URL argument can't be parsed.
    UrlParse(url::ParseError),

    /// An error with the name of the helper that raised it.
    Annotated(String, Box<Error>),
}

impl Error {
    fn annotate(self, helper: &str) -> Error {
        Error::Annotated(format!("calling `{}`", helper), Box::new(self))
    }
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnknownHelper(name) => write!(f, "no helper named `{}`", name),
            Error::UnknownFilter(hook) => write!(f, "no filters for hook `{}`", hook),
            Error::Argument(err) => err.fmt(f),
            Error::UrlParse(err) => err.fmt(f),
            Error::Annotated(annotation, err) => write!(f, "{}: {}", annotation, err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::UnknownHelper(_) => None,
            Error::UnknownFilter(_) => None,
            Error::Argument(err) => Some(err),
            Error::UrlParse(err) => Some(err),
            Error::Annotated(_, err) => Some(err),
        }
    }
}

impl From<ArgumentError> for Error {
    /// Converts an [`ArgumentError`] into an [`Error`]. It allows us to use
    /// the `?` operator when reading helper arguments.
    fn from(err: ArgumentError) -> Error {
        Error::Argument(err)
    }
}

impl From<url::ParseError> for Error {
    /// Converts a [`url::ParseError`] into an [`Error`]. It allows us to use
    /// the `?` operator for URL parsing functions.
    fn from(err: url::ParseError) -> Error {
        Error::UrlParse(err)
    }
}
