//! `baskit config` command - Configuration management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::print_structured;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::project::Project;
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration values
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (see `baskit config keys`)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of project config
    #[arg(long, short = 'g')]
    pub global: bool,
}

/// Valid configuration keys
const VALID_KEYS: &[(&str, &str)] = &[
    ("author", "Author recorded on purchase orders and used to sign messages"),
    ("default_format", "Default output format (yaml, json, tsv, csv, md, id)"),
    ("default_sort", "Default supplier sort mode"),
    ("currency", "Currency label for printed amounts"),
    ("country_code", "Country calling code for wa.me links"),
    ("buyer_email", "Reply-to address quoted in purchase order emails"),
];

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Set(args) => run_set(args, global),
        ConfigCommands::Path => run_path(global),
        ConfigCommands::Keys => run_keys(),
    }
}

fn open_project(global: &GlobalOpts) -> Option<Project> {
    Project::open(global.project.as_deref()).ok()
}

fn get_config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "author" => Some(config.author()),
        "default_format" => config.default_format.clone(),
        "default_sort" => config.default_sort.clone(),
        "currency" => Some(config.currency().to_string()),
        "country_code" => Some(config.country_code().to_string()),
        "buyer_email" => config.buyer_email.clone(),
        _ => None,
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load_for(open_project(global).as_ref());

    if let Some(key) = &args.key {
        if !VALID_KEYS.iter().any(|(k, _)| *k == key.as_str()) {
            return Err(miette::miette!(
                help = "run `baskit config keys` to list keys",
                "unknown configuration key '{}'",
                key
            ));
        }
        match get_config_value(&config, key) {
            Some(v) => println!("{}", v),
            None => return Err(miette::miette!("Key '{}' is not set", key)),
        }
        return Ok(());
    }

    if print_structured(&config, global.format)? {
        return Ok(());
    }
    if global.format == OutputFormat::Id {
        return Err(miette::miette!("--format id is not supported for config"));
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in VALID_KEYS {
        let value = get_config_value(&config, key);
        match value {
            Some(v) => println!("  {}: {}", style(key).cyan(), style(v).yellow()),
            None => println!("  {}: {}", style(key).cyan(), style("(not set)").dim()),
        }
    }

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Environment variables (BASKIT_AUTHOR, BASKIT_CURRENCY, BASKIT_COUNTRY_CODE)");
    println!("  2. Project config (.baskit/config.yaml)");
    println!("  3. Global config (~/.config/baskit/config.yaml)");
    Ok(())
}

fn config_path(global_scope: bool, global: &GlobalOpts) -> Result<PathBuf> {
    if global_scope {
        Config::global_config_path()
            .ok_or_else(|| miette::miette!("Could not determine global config directory"))
    } else {
        let project = Project::open(global.project.as_deref()).map_err(|e| miette::miette!("{}", e))?;
        Ok(project.baskit_dir().join("config.yaml"))
    }
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    if !VALID_KEYS.iter().any(|(k, _)| *k == args.key) {
        return Err(miette::miette!(
            help = "run `baskit config keys` to list keys",
            "unknown configuration key '{}'",
            args.key
        ));
    }

    let path = config_path(args.global, global)?;

    let mut map = if path.exists() {
        let content = fs::read_to_string(&path).into_diagnostic()?;
        match serde_yml::from_str::<serde_yml::Value>(&content) {
            Ok(serde_yml::Value::Mapping(m)) => m,
            _ => serde_yml::Mapping::new(),
        }
    } else {
        serde_yml::Mapping::new()
    };
    map.insert(
        serde_yml::Value::String(args.key.clone()),
        serde_yml::Value::String(args.value.clone()),
    );

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&serde_yml::Value::Mapping(map)).into_diagnostic()?;
    fs::write(&path, yaml).into_diagnostic()?;

    let scope = if args.global { "global" } else { "project" };
    println!(
        "{} Set {} {} {} in {} config",
        style("✓").green(),
        style(&args.key).cyan(),
        style("→").dim(),
        style(&args.value).yellow(),
        scope
    );
    Ok(())
}

fn run_path(global: &GlobalOpts) -> Result<()> {
    match Config::global_config_path() {
        Some(path) => println!("{} {}", style("Global: ").bold(), path.display()),
        None => println!("{} {}", style("Global: ").bold(), style("(unavailable)").dim()),
    }
    match open_project(global) {
        Some(project) => println!(
            "{} {}",
            style("Project:").bold(),
            project.baskit_dir().join("config.yaml").display()
        ),
        None => println!("{} {}", style("Project:").bold(), style("(not in a project)").dim()),
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    for (key, description) in VALID_KEYS {
        println!("  {:<16} {}", style(key).cyan(), description);
    }
    Ok(())
}
