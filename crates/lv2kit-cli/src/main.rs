use clap::{Parser, Subcommand};
use lv2kit_cli::{
    commands::{
        config::{self, ConfigAction},
        info, list,
    },
    common, logger, GlobalOpts,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "lv2kit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Browse installed LV2 plugins",
    long_about = "lv2kit discovers LV2 plugin bundles on the search path and shows their metadata."
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Configure lv2kit
    #[command(subcommand_required = false, arg_required_else_help = false)]
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// List installed plugins
    List {
        /// Only show plugins whose URI or name contains this text
        filter: Option<String>,
        /// Include plugins replaced by a newer version
        #[arg(short, long)]
        all: bool,
    },
    /// Show everything known about one plugin
    Info {
        /// Plugin URI
        uri: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| logger::verbosity_to_filter().into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let settings = common::load_settings();

    if let Err(e) = logger::init_with_verbosity(
        cli.global.verbosity_level(),
        cli.global.quiet,
        settings.log_file.as_deref().map(PathBuf::from),
    ) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }
    init_tracing();

    let result = match cli.command {
        Commands::Config { action } => {
            config::handle_config(action.unwrap_or(ConfigAction::Show), &cli.global)
        }
        Commands::List { filter, all } => {
            let world = common::open_world(settings);
            list::list_plugins(&cli.global, &world, filter.as_deref(), all)
        }
        Commands::Info { uri, json } => {
            let world = common::open_world(settings);
            info::show_info(&world, &uri, json)
        }
    };

    if let Err(e) = result {
        logger::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}
