//! CLI Adapter.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::app::Application;
use crate::domain::assets::DEFAULT_VITE_DIRECTORY;
use crate::domain::{AppError, Language, Request};

#[derive(Parser)]
#[command(name = "porter")]
#[command(version)]
#[command(
    about = "Inspect an application's config, named routes and versioned assets",
    long_about = None
)]
struct Cli {
    /// Application directory (config is read from <app>/config)
    #[arg(short, long, global = true, default_value = ".")]
    app: PathBuf,
    /// Environment whose config overrides are applied
    #[arg(short, long, global = true)]
    env: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve an entry through the Vite manifest
    Vite {
        /// Logical asset path (e.g. resources/js/app.js)
        path: String,
        /// Build directory under the public path
        #[arg(short, long, default_value = DEFAULT_VITE_DIRECTORY)]
        dir: String,
        /// Print the stylesheets of the entry instead of its file
        #[arg(long)]
        css: bool,
    },
    /// Resolve a file through the Mix manifest
    Mix {
        /// Asset path (e.g. /js/app.js)
        path: String,
        /// Directory under the public path holding mix-manifest.json
        #[arg(short, long, default_value = "")]
        dir: String,
    },
    /// Print a config value as JSON
    #[clap(visible_alias = "c")]
    Config {
        /// Dotted key, starting with the config group (e.g. application.base_url)
        key: String,
    },
    /// Build the URL of a named route
    #[clap(visible_alias = "r")]
    Route {
        /// Route name from the routes config group
        name: String,
        /// Route parameter as key=value
        #[arg(short, long = "param", value_parser = parse_pair)]
        params: Vec<(String, String)>,
        /// Query parameter as key=value
        #[arg(short, long = "query", value_parser = parse_pair)]
        query: Vec<(String, String)>,
        /// Separator between query pairs
        #[arg(long, default_value = "&")]
        separator: String,
        /// Language segment to prefix the path with
        #[arg(short, long)]
        language: Option<String>,
    },
}

/// Entry point for the CLI.
pub fn run() {
    let cli = Cli::parse();

    let result = load_application(cli.app, cli.env).and_then(|app| match cli.command {
        Commands::Vite { path, dir, css } => run_vite(&app, &path, &dir, css),
        Commands::Mix { path, dir } => run_mix(&app, &path, &dir),
        Commands::Config { key } => run_config(&app, &key),
        Commands::Route { name, params, query, separator, language } => {
            run_route(&app, &name, &params, &query, &separator, language.as_deref())
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// The public directory is derived from the absolute application path.
fn load_application(path: PathBuf, env: Option<String>) -> Result<Application, AppError> {
    let path = path.canonicalize().map_err(|e| {
        AppError::config_error(format!("Application directory {}: {}", path.display(), e))
    })?;

    let mut builder = Application::builder(path);
    if let Some(env) = env {
        builder = builder.environment(env);
    }
    Ok(builder.build())
}

fn run_vite(app: &Application, path: &str, dir: &str, css: bool) -> Result<(), AppError> {
    if css {
        for file in app.assets().vite_css(path, dir)? {
            println!("{}", file);
        }
    } else {
        println!("{}", app.assets().vite(path, dir)?);
    }
    Ok(())
}

fn run_mix(app: &Application, path: &str, dir: &str) -> Result<(), AppError> {
    let display_errors = app.display_errors()?;
    println!("{}", app.assets().mix(path, dir, display_errors)?);
    Ok(())
}

fn run_config(app: &Application, key: &str) -> Result<(), AppError> {
    let value = app
        .config()
        .get(key)?
        .ok_or_else(|| AppError::config_error(format!("Config key '{}' is not set", key)))?;
    let rendered = serde_json::to_string_pretty(&value)
        .map_err(|e| AppError::config_error(format!("Failed to render '{}': {}", key, e)))?;
    println!("{}", rendered);
    Ok(())
}

fn run_route(
    app: &Application,
    name: &str,
    params: &[(String, String)],
    query: &[(String, String)],
    separator: &str,
    language: Option<&str>,
) -> Result<(), AppError> {
    let routes = Arc::new(app.routes()?);
    let url = app.url_builder(routes, &Request::builder("GET", "/").build())?;

    let params: Vec<(&str, &str)> = params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let query: Vec<(&str, &str)> = query.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect();
    let language = language.map(Language::Named).unwrap_or_default();

    println!("{}", url.to_route(name, &params, &query, separator, language)?);
    Ok(())
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}
