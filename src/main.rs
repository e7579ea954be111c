//! Iconography CLI
//!
//! Usage:
//!   iconography [OPTIONS] <COMMAND>
//!
//! Commands:
//!   show-registry  Show every registered icon and the renderer that owns it
//!   render         Render a single icon
//!   template       Expand icon tags in a template file

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use iconography::{
    render_template, Attributes, IconRequest, Icons, RegistryReport, Settings, TagContext,
};

#[derive(Parser)]
#[command(name = "iconography")]
#[command(about = "Render icons from a TOML icon registry")]
struct Cli {
    /// Icon settings file (TOML format)
    #[arg(short, long, default_value = "icons.toml", global = true)]
    settings: PathBuf,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show every registered icon and the renderer that owns it
    ShowRegistry {
        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,

        /// Only show icon names claimed by more than one renderer
        #[arg(long)]
        show_collisions_only: bool,
    },

    /// Render a single icon
    Render {
        /// Logical icon name
        name: String,

        /// Renderer configuration to use instead of the registry
        #[arg(short, long)]
        renderer: Option<String>,

        /// HTML attribute as KEY=VALUE (repeatable)
        #[arg(short, long = "attr", value_parser = parse_attr)]
        attrs: Vec<(String, String)>,

        /// Ignore the renderer's default attributes
        #[arg(long)]
        no_defaults: bool,
    },

    /// Expand icon tags in a template (reads from stdin if not provided)
    Template {
        input: Option<PathBuf>,

        /// Template variable as KEY=VALUE (repeatable)
        #[arg(long = "var", value_parser = parse_attr)]
        vars: Vec<(String, String)>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

fn parse_attr(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", s)),
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let icons = Icons::new(load_settings(&cli.settings));

    match cli.command {
        Command::ShowRegistry {
            format,
            show_collisions_only,
        } => {
            let report = RegistryReport::new(&icons.build_registry(), icons.fail_silently());
            match format {
                Format::Table => print!("{}", report.render_table(show_collisions_only)),
                Format::Json => {
                    let json = report
                        .to_json(show_collisions_only)
                        .and_then(|value| serde_json::to_string_pretty(&value));
                    match json {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            std::process::exit(1);
                        }
                    }
                }
            }
        }
        Command::Render {
            name,
            renderer,
            attrs,
            no_defaults,
        } => {
            let mut request = IconRequest::new()
                .use_defaults(!no_defaults)
                .attrs(attrs.into_iter().collect::<Attributes>());
            if let Some(renderer) = renderer {
                request = request.renderer(renderer);
            }
            match icons.icon(&name, &request) {
                Ok(markup) => println!("{}", markup),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Template { input, vars } => {
            let (source, filename) = read_input(input.as_deref());
            let mut context = TagContext::new();
            for (key, value) in vars {
                context.insert(key, value);
            }
            match render_template(&source, &icons, &context) {
                Ok(html) => print!("{}", html),
                Err(e) => {
                    eprint!("{}", e.format(&source, &filename));
                    std::process::exit(1);
                }
            }
        }
    }
}

fn load_settings(path: &Path) -> Settings {
    let source = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading settings '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    };
    match Settings::from_str(&source) {
        Ok(settings) => match path.parent() {
            Some(dir) => settings.with_base_dir(dir),
            None => settings,
        },
        Err(e) => {
            eprint!("{}", e.format(&source, &path.display().to_string()));
            std::process::exit(1);
        }
    }
}

fn read_input(input: Option<&Path>) -> (String, String) {
    match input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
