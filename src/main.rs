use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use gtmpl_value::Value;
use redefine_helpers::assets::SiteAssets;
use redefine_helpers::config::Config;
use redefine_helpers::highlight::RenderResult;
use redefine_helpers::registry::{Context, Registry, AFTER_POST_RENDER};
use redefine_helpers::THEME_VERSION;
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = App::new("redefine-helpers")
        .version(THEME_VERSION)
        .about("Calls the Redefine theme's template helpers from the command line")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("theme")
                .long("theme")
                .value_name("FILE")
                .takes_value(true)
                .help("Theme configuration file (default: discovered from the current directory)"),
        )
        .arg(
            Arg::with_name("site")
                .long("site")
                .value_name("FILE")
                .takes_value(true)
                .help("Site configuration file (default: discovered from the current directory)"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Log debug output to stderr"),
        )
        .subcommand(SubCommand::with_name("list").about("Lists helper names and filter hooks"))
        .subcommand(
            SubCommand::with_name("call")
                .about("Calls a helper; each argument is parsed as YAML")
                .arg(Arg::with_name("helper").required(true))
                .arg(Arg::with_name("args").multiple(true)),
        )
        .subcommand(
            SubCommand::with_name("filter")
                .about("Runs the after_post_render filter over an HTML file")
                .arg(Arg::with_name("file").required(true)),
        )
        .get_matches();

    init_logging(matches.is_present("verbose"));

    if let Err(e) = run(&matches) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<Config, Box<dyn Error>> {
    let theme = matches.value_of("theme").map(Path::new);
    let site = matches.value_of("site").map(Path::new);
    let config = if theme.is_some() || site.is_some() {
        Config::from_files(theme, site)?
    } else {
        Config::from_directory(&std::env::current_dir()?)?
    };
    debug!(
        cdn = config.theme.cdn.enable,
        provider = %config.theme.cdn.provider,
        root = %config.site.root,
        "loaded configuration"
    );
    Ok(config)
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let config = load_config(matches)?;
    let assets = SiteAssets::new(&config.site);
    let ctx = Context::new(&config, &assets);
    let registry = Registry::new();

    match matches.subcommand() {
        ("list", _) => {
            for name in registry.names() {
                println!("{}", name);
            }
            for hook in registry.hooks() {
                println!("{} (filter)", hook);
            }
        }
        ("call", Some(sub)) => {
            // `helper` is required, so clap guarantees it's present.
            let name = sub.value_of("helper").unwrap_or_default();
            let args = sub
                .values_of("args")
                .map(|values| values.map(parse_arg).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            let result = registry.call(&ctx, name, &args)?;
            println!("{}", render_value(&result)?);
        }
        ("filter", Some(sub)) => {
            let file = sub.value_of("file").unwrap_or_default();
            let mut data = RenderResult::from(std::fs::read_to_string(file)?);
            registry.apply_filter(&ctx, AFTER_POST_RENDER, &mut data)?;
            info!(file, "filtered rendered post");
            print!("{}", data.content);
        }
        _ => unreachable!("clap requires a subcommand"),
    }
    Ok(())
}

fn parse_arg(arg: &str) -> Result<Value, serde_yaml::Error> {
    Ok(from_yaml(serde_yaml::from_str(arg)?))
}

fn from_yaml(yaml: serde_yaml::Value) -> Value {
    use serde_yaml::Value as Yaml;
    match yaml {
        Yaml::Null => Value::Nil,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Value::from(i),
            (None, Some(u), _) => Value::from(u),
            (None, None, Some(f)) => Value::from(f),
            _ => Value::Nil,
        },
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(items) => Value::Array(items.into_iter().map(from_yaml).collect()),
        Yaml::Mapping(mapping) => {
            let mut m: HashMap<String, Value> = HashMap::new();
            for (k, v) in mapping {
                if let Yaml::String(k) = k {
                    m.insert(k, from_yaml(v));
                }
            }
            Value::Object(m)
        }
    }
}

fn to_yaml(value: &Value) -> serde_yaml::Value {
    use serde_yaml::{Mapping, Number, Value as Yaml};
    match value {
        Value::Bool(b) => Yaml::Bool(*b),
        Value::String(s) => Yaml::String(s.clone()),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => Yaml::Number(Number::from(i)),
            (None, Some(u), _) => Yaml::Number(Number::from(u)),
            (None, None, Some(f)) => Yaml::Number(Number::from(f)),
            _ => Yaml::Null,
        },
        Value::Array(items) => Yaml::Sequence(items.iter().map(to_yaml).collect()),
        Value::Object(m) | Value::Map(m) => {
            let mut mapping = Mapping::new();
            for (k, v) in m {
                mapping.insert(Yaml::String(k.clone()), to_yaml(v));
            }
            Yaml::Mapping(mapping)
        }
        _ => Yaml::Null,
    }
}

// Strings print raw so rendered tags can be piped straight into a page.
fn render_value(value: &Value) -> Result<String, serde_yaml::Error> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => serde_yaml::to_string(&to_yaml(other)),
    }
}
