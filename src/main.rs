//! parts-quote: browse a phone-repair parts catalog and request live quotes.

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use parts_quote::{
    catalog::{SortDirection, SortField},
    cli::{self, OutputOptions, ProductsOptions},
    config::{self, AppConfig, ConfigOverrides, ConfigPreset, Validatable},
    reports::{OutputFormat, OutputTarget},
};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "parts-quote")]
#[command(version)]
#[command(about = "Browse a phone-repair parts catalog and request live price quotes", long_about = None)]
#[command(after_help = "EXIT CODES:
    0  Success
    1  A catalog load or price request failed
    2  Invalid configuration

EXAMPLES:
    # Show the category tree
    parts-quote categories

    # Second page of iPhone displays, sorted by id
    parts-quote products -c Phones -c iPhone --search display --sort id --page 2

    # Dealer prices for two parts
    parts-quote --user-type dealer --password \"$PW\" quote 1337 1338

    # Interactive session against a local dev server
    parts-quote --preset development browse")]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output (also respects `NO_COLOR` env)
    #[arg(long, global = true)]
    no_color: bool,

    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Deployment preset; file and flag values override it
    #[arg(long, global = true, value_enum)]
    preset: Option<ConfigPreset>,

    /// Catalog API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Serve the catalog from a JSON fixture file instead of the network
    #[arg(long, global = true)]
    fixture: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Customer tier sent with price requests
    #[arg(long, global = true, env = "PARTS_QUOTE_USER_TYPE")]
    user_type: Option<String>,

    /// Credential sent with price requests
    #[arg(long, global = true, env = "PARTS_QUOTE_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output flags shared by the printing commands
#[derive(Args)]
struct OutputArgs {
    /// Output format
    #[arg(short = 'o', long = "output", value_enum, default_value = "text")]
    format: OutputFormat,

    /// Write to a file instead of stdout
    #[arg(short = 'O', long = "output-file")]
    output_file: Option<PathBuf>,
}

impl OutputArgs {
    fn options(self, no_color: bool) -> OutputOptions {
        OutputOptions {
            format: self.format,
            target: OutputTarget::from_option(self.output_file),
            no_color,
        }
    }
}

/// Arguments for the `products` subcommand
#[derive(Args)]
struct ProductsArgs {
    /// Server-side search term
    #[arg(short, long)]
    search: Option<String>,

    /// Category path, one level per flag, top level first
    #[arg(short, long = "category")]
    category: Vec<String>,

    /// Local name substring filter
    #[arg(long)]
    name: Option<String>,

    /// Local id substring filter
    #[arg(long)]
    id: Option<String>,

    /// Sort column
    #[arg(long, value_enum)]
    sort: Option<SortField>,

    /// Sort direction
    #[arg(long, value_enum)]
    direction: Option<SortDirection>,

    /// Page to show (1-based)
    #[arg(short, long, default_value_t = 1)]
    page: usize,

    /// Products per page
    #[arg(long)]
    page_size: Option<usize>,

    /// Also request a price for every product on the page
    #[arg(long)]
    quote: bool,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the category tree
    Categories {
        #[command(flatten)]
        output: OutputArgs,
    },

    /// Fetch, filter, sort and print one page of products
    Products(ProductsArgs),

    /// Request price offers for one or more products
    Quote {
        /// Product ids
        #[arg(required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Interactive line-oriented session (type `help`)
    Browse,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show or generate configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (defaults, preset, file and flags)
    Show,
    /// Print the JSON Schema of the config file
    Schema {
        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print a commented example config file
    Example,
}

impl Cli {
    /// Flag values; any flag that was given wins over preset and file.
    fn overrides(&self) -> ConfigOverrides {
        let page_size = match &self.command {
            Commands::Products(args) => args.page_size,
            _ => None,
        };
        ConfigOverrides {
            base_url: self.base_url.clone(),
            timeout_secs: self.timeout,
            fixture: self.fixture.clone(),
            page_size,
            user_type: self.user_type.clone(),
            password: self.password.clone(),
        }
    }

    /// Preset, then config file, then flags.
    fn effective_config(&self) -> (AppConfig, Option<PathBuf>) {
        let (file_config, loaded_from) = config::load_or_default(self.config.as_deref());
        let mut effective = self
            .preset
            .map_or_else(AppConfig::default, AppConfig::from_preset);
        effective.merge(&file_config);
        effective.apply_overrides(&self.overrides());
        (effective, loaded_from)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(io::stderr),
        )
        .init();

    let (app_config, loaded_from) = cli.effective_config();
    if let Some(path) = &loaded_from {
        tracing::debug!("Loaded config from {}", path.display());
    }

    let no_color = cli.no_color;
    let exit_code = match cli.command {
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "parts-quote", &mut io::stdout());
            0
        }

        Commands::Config { action } => match action {
            ConfigAction::Show => {
                match &loaded_from {
                    Some(path) => eprintln!("# Loaded from: {}", path.display()),
                    None => eprintln!("# No config file found; showing defaults"),
                }
                let yaml = serde_yaml::to_string(&app_config.redacted())
                    .context("failed to serialize config")?;
                print!("{yaml}");
                0
            }
            ConfigAction::Schema { output } => {
                let schema = config::generate_json_schema();
                match output {
                    Some(path) => {
                        std::fs::write(&path, &schema)
                            .with_context(|| format!("failed to write {}", path.display()))?;
                        eprintln!("Schema written to {}", path.display());
                    }
                    None => println!("{schema}"),
                }
                0
            }
            ConfigAction::Example => {
                print!("{}", config::generate_full_example_config());
                0
            }
        },

        command => {
            let errors = app_config.validate();
            if !errors.is_empty() {
                for error in &errors {
                    eprintln!("config error: {error}");
                }
                std::process::exit(2);
            }

            match command {
                Commands::Categories { output } => {
                    cli::run_categories(&app_config, &output.options(no_color))?
                }
                Commands::Products(args) => {
                    let options = ProductsOptions {
                        search: args.search,
                        category: args.category,
                        name_filter: args.name,
                        id_filter: args.id,
                        sort_field: args.sort,
                        sort_direction: args.direction,
                        page: args.page,
                        quote: args.quote,
                    };
                    cli::run_products(&app_config, &options, &args.output.options(no_color))?
                }
                Commands::Quote { ids, output } => {
                    cli::run_quote(&app_config, &ids, &output.options(no_color))?
                }
                Commands::Browse => cli::run_browse(
                    &app_config,
                    &OutputOptions {
                        no_color,
                        ..OutputOptions::default()
                    },
                )?,
                Commands::Completions { .. } | Commands::Config { .. } => 0,
            }
        }
    };

    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
