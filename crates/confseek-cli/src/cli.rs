//! confseek CLI - query configuration files from the command line
//!
//! Usage:
//!   confseek query config.yaml database.primary --field host
//!   confseek query config.yaml users --by id --equals 2 --field name
//!   confseek query config.yaml regions --equals '"Virginia"' --key
//!   confseek keys config.yaml database

use clap::{Parser, Subcommand};
use colored::Colorize;
use confseek_core::{Lookup, Resolver, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// confseek - Select settings and search records in configuration files
#[derive(Parser)]
#[command(name = "confseek")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Select a setting and optionally search inside it
    Query {
        /// Configuration file (YAML, or JSON with a .json extension)
        #[arg(required = true)]
        file: PathBuf,

        /// Dot-separated setting path (e.g., database.primary)
        setting: Option<String>,

        /// Field to read from the selected setting or matched record
        #[arg(short = 'F', long, default_value = "")]
        field: String,

        /// Field the search value is compared against (defaults to --field)
        #[arg(short, long)]
        by: Option<String>,

        /// Search value, parsed as JSON and falling back to a plain string
        #[arg(short, long)]
        equals: Option<String>,

        /// Print the matching key instead of the value
        #[arg(short, long)]
        key: bool,

        /// Output format: text, json, yaml
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Printed when nothing matches
        #[arg(short, long)]
        default: Option<String>,
    },

    /// List the keys available under a setting
    Keys {
        /// Configuration file (YAML, or JSON with a .json extension)
        #[arg(required = true)]
        file: PathBuf,

        /// Dot-separated setting path; the root when omitted
        setting: Option<String>,
    },
}

/// Run the CLI with the given arguments
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Query {
            file,
            setting,
            field,
            by,
            equals,
            key,
            format,
            default,
        } => {
            let query = QueryArgs {
                setting,
                field,
                by,
                equals,
                key,
            };
            cmd_query(&file, &query, &format, default)
        }

        Commands::Keys { file, setting } => cmd_keys(&file, setting.as_deref()),
    }
}

/// Query options gathered from the command line
#[derive(Debug, Default)]
struct QueryArgs {
    setting: Option<String>,
    field: String,
    by: Option<String>,
    equals: Option<String>,
    key: bool,
}

fn load_config(file: &Path) -> Result<Value, String> {
    let content = std::fs::read_to_string(file)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;

    let value = parse_config(&content, is_json(file))
        .map_err(|e| format!("{} in {}", e, file.display()))?;

    log::debug!("Loaded configuration from {}", file.display());
    Ok(value)
}

/// Parse configuration text as JSON or YAML
fn parse_config(content: &str, json: bool) -> Result<Value, String> {
    if json {
        serde_json::from_str(content).map_err(|e| format!("Invalid JSON: {}", e))
    } else {
        serde_yaml::from_str(content).map_err(|e| format!("Invalid YAML: {}", e))
    }
}

fn is_json(file: &Path) -> bool {
    file.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Parse a search value as JSON, falling back to a plain string
fn parse_search_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Build and evaluate the query described by `args`
fn evaluate<'a>(tree: &'a Value, args: &QueryArgs) -> confseek_core::Result<Lookup<'a>> {
    let mut resolver = Resolver::new(tree);

    if let Some(setting) = &args.setting {
        resolver = resolver.select_setting(setting)?;
    }

    let search_value = args.equals.as_deref().map(parse_search_value);
    match (&args.by, search_value) {
        (Some(by), value) => resolver = resolver.matching(by.as_str(), value),
        (None, Some(value)) => resolver = resolver.matching(args.field.as_str(), Some(value)),
        (None, None) => {}
    }

    Ok(resolver.with_key_output(args.key).evaluate(&args.field))
}

/// Render a found value or key in the requested format
fn render(found: &Value, format: &str) -> Result<String, String> {
    match format {
        "json" => serde_json::to_string_pretty(found).map_err(|e| e.to_string()),
        "yaml" => serde_yaml::to_string(found)
            .map(|s| s.trim_end().to_string())
            .map_err(|e| e.to_string()),
        _ => match found {
            Value::Sequence(_) | Value::Mapping(_) => serde_yaml::to_string(found)
                .map(|s| s.trim_end().to_string())
                .map_err(|e| e.to_string()),
            scalar => Ok(scalar.to_string()),
        },
    }
}

fn cmd_query(file: &Path, args: &QueryArgs, format: &str, default: Option<String>) -> ExitCode {
    let tree = match load_config(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    let lookup = match evaluate(&tree, args) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            return ExitCode::from(2);
        }
    };

    match lookup.to_value() {
        Some(found) => match render(&found, format) {
            Ok(out) => {
                println!("{}", out);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("{}: {}", "Error rendering value".red(), e);
                ExitCode::from(2)
            }
        },
        None => {
            if let Some(default_val) = default {
                println!("{}", default_val);
                ExitCode::SUCCESS
            } else {
                eprintln!("{}: no match for '{}'", "Not found".red(), args.field);
                ExitCode::from(1)
            }
        }
    }
}

/// List the keys under `setting`, or under the root when it is omitted
fn list_keys(tree: &Value, setting: Option<&str>) -> confseek_core::Result<Vec<String>> {
    let resolver = match setting {
        Some(path) => Resolver::new(tree).select_setting(path)?,
        None => Resolver::new(tree),
    };

    Ok(resolver
        .evaluate("")
        .value()
        .map(Value::keys)
        .unwrap_or_default())
}

fn cmd_keys(file: &Path, setting: Option<&str>) -> ExitCode {
    let tree = match load_config(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::from(2);
        }
    };

    match list_keys(&tree, setting) {
        Ok(keys) => {
            for key in keys {
                println!("{}", key);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red(), e);
            ExitCode::from(2)
        }
    }
}
