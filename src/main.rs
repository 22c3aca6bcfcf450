mod commands;

use clap::{Parser, Subcommand};
use nppatch_core::config;
use nppatch_core::labels::{self, LabelCatalog};

#[derive(Parser)]
#[command(
    name = "nppatch",
    version,
    about = "NPPatch UI labels and save-error messages"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the text for a label key (the key itself if unmapped).
    Label {
        /// Label key, e.g. gseuPageTitle.
        key: String,
    },
    /// List labels, sorted by key.
    Labels {
        /// Only list keys starting with this prefix.
        #[arg(long, default_value = "")]
        prefix: String,
    },
    /// Format the errors of a save result (JSON) for display.
    Error {
        /// Save result file. Reads stdin when omitted.
        file: Option<String>,
        /// Print the header/detail pair as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Print install instructions for a package version.
    PackageInfo {
        /// Package version number (e.g. 1.0.0.1).
        #[arg(long)]
        version_number: String,
        /// Subscriber package version id (04t...).
        #[arg(long)]
        package_version_id: String,
    },
    /// Generate the admin permission set from object metadata.
    GeneratePermissionSet {
        /// Object metadata directory. Defaults to `[permission_set] objects_dir`.
        #[arg(long)]
        objects_dir: Option<String>,
        /// Output file. Defaults to `[permission_set] output`.
        #[arg(long)]
        output: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.nppatch.log_level)),
        )
        .init();

    labels::install(LabelCatalog::from_config(&cfg.labels))?;
    let catalog = labels::catalog();

    match cli.command {
        Commands::Label { key } => {
            println!("{}", commands::label(catalog, &key));
        }
        Commands::Labels { prefix } => {
            let listing = commands::list_labels(catalog, &prefix);
            if !listing.is_empty() {
                println!("{listing}");
            }
        }
        Commands::Error { file, json } => {
            let save_result = commands::read_save_result(file.as_deref())?;
            println!("{}", commands::error_message(catalog, &save_result, json)?);
        }
        Commands::PackageInfo {
            version_number,
            package_version_id,
        } => {
            println!(
                "{}",
                commands::package_info(&version_number, &package_version_id)?
            );
        }
        Commands::GeneratePermissionSet {
            objects_dir,
            output,
        } => {
            let objects_dir =
                config::shellexpand(&objects_dir.unwrap_or(cfg.permission_set.objects_dir));
            let output = config::shellexpand(&output.unwrap_or(cfg.permission_set.output));
            println!(
                "{}",
                commands::generate_permission_set(&objects_dir, &output)?
            );
        }
    }

    Ok(())
}
