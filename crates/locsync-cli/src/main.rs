use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use locsync_services::{DownloadOptions, UploadOptions};
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_appender::rolling;
use tracing_subscriber::Layer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "locsync",
    version,
    about = "Sync translatable strings with the remote localization service"
)]
struct Cli {
    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan descriptor files, merge the catalog and upload it
    Upload {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        pid: Option<String>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        loc_version: Option<String>,
        #[arg(long)]
        upload_language: Option<String>,
        #[arg(long)]
        file_pattern: Option<String>,
        #[arg(long, default_value = ".")]
        root: PathBuf,
        #[arg(long, default_value_t = false)]
        insecure: bool,
        /// Build and print the resource text without contacting the server
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Download translations for every requested language
    Download {
        #[arg(long)]
        base_url: Option<String>,
        #[arg(long)]
        pid: Option<String>,
        #[arg(long)]
        group: Option<String>,
        #[arg(long)]
        loc_version: Option<String>,
        /// Target language code; may be given several times
        #[arg(long = "language")]
        languages: Vec<String>,
        #[arg(long)]
        output_path: Option<PathBuf>,
        /// Fail a language whose catalog comes back empty
        #[arg(long, default_value_t = false)]
        fail_empty: bool,
        #[arg(long, default_value_t = false)]
        insecure: bool,
    },
}

/// Resolve a required option from flag or config file, or bail with a
/// usage error.
fn require(name: &str, value: Option<String>) -> String {
    value.unwrap_or_else(|| {
        eprintln!("Error: missing required option --{name} (set it or add it to locsync.toml)");
        std::process::exit(2);
    })
}

trait Runnable {
    fn run(self, use_color: bool) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, use_color: bool) -> Result<()> {
        let cmd_name = format!("{:?}", self);
        info!("▶ Starting command: {}", cmd_name);

        let cfg = locsync_config::load_config().unwrap_or_default();

        let result = match self {
            Commands::Upload {
                base_url,
                pid,
                group,
                loc_version,
                upload_language,
                file_pattern,
                root,
                insecure,
                dry_run,
            } => {
                let opts = UploadOptions {
                    root,
                    file_pattern: file_pattern
                        .or(cfg.file_pattern)
                        .unwrap_or_else(|| "src/**/*.json".to_string()),
                    base_url: require("base-url", base_url.or(cfg.base_url)),
                    pid: require("pid", pid.or(cfg.pid)),
                    version: loc_version
                        .or(cfg.version)
                        .unwrap_or_else(|| "1.0".to_string()),
                    group: require("group", group.or(cfg.group)),
                    upload_language: upload_language
                        .or(cfg.upload_language)
                        .unwrap_or_else(|| "en".to_string()),
                    insecure: insecure || cfg.insecure.unwrap_or(false),
                    dry_run,
                };
                debug!(
                    "Upload args: root={:?} pattern={} url={} pid={} version={} group={} lang={} dry_run={}",
                    opts.root,
                    opts.file_pattern,
                    opts.base_url,
                    opts.pid,
                    opts.version,
                    opts.group,
                    opts.upload_language,
                    opts.dry_run
                );

                println!("Extracting messages from {}…", opts.file_pattern);
                let report = locsync_services::upload(&opts)?;
                println!("Found {} messages.", report.message_count);

                if report.dry_run {
                    println!("DRY-RUN: would upload the following resource text:");
                    print!("{}", report.resource_text);
                    return Ok(());
                }

                println!("Changes:");
                for change in &report.changes {
                    if use_color {
                        use owo_colors::OwoColorize;
                        println!("  {}", change.cyan());
                    } else {
                        println!("  {}", change);
                    }
                }
                println!("✔ Upload complete.");
                Ok(())
            }

            Commands::Download {
                base_url,
                pid,
                group,
                loc_version,
                languages,
                output_path,
                fail_empty,
                insecure,
            } => {
                let languages = if languages.is_empty() {
                    cfg.languages.unwrap_or_default()
                } else {
                    languages
                };
                if languages.is_empty() {
                    eprintln!("Error: at least one --language is required");
                    std::process::exit(2);
                }

                let opts = DownloadOptions {
                    base_url: require("base-url", base_url.or(cfg.base_url)),
                    pid: require("pid", pid.or(cfg.pid)),
                    version: loc_version
                        .or(cfg.version)
                        .unwrap_or_else(|| "1.0".to_string()),
                    group: require("group", group.or(cfg.group)),
                    languages,
                    output_path: output_path
                        .or(cfg.output_path.map(PathBuf::from))
                        .unwrap_or_else(|| PathBuf::from("src/translations")),
                    fail_empty: fail_empty || cfg.fail_empty.unwrap_or(false),
                    insecure: insecure || cfg.insecure.unwrap_or(false),
                };
                debug!(
                    "Download args: url={} pid={} version={} group={} languages={:?} out={:?} fail_empty={}",
                    opts.base_url,
                    opts.pid,
                    opts.version,
                    opts.group,
                    opts.languages,
                    opts.output_path,
                    opts.fail_empty
                );

                for language in &opts.languages {
                    println!("Loading translations for {language}…");
                }
                let outcomes = locsync_services::download(&opts)?;

                let mut failed = 0usize;
                for outcome in &outcomes {
                    match &outcome.result {
                        Ok(report) => {
                            println!(
                                "✔ Written {} messages to {}.",
                                report.keys,
                                report.path.display()
                            );
                        }
                        Err(e) => {
                            failed += 1;
                            if use_color {
                                use owo_colors::OwoColorize;
                                eprintln!("✖ {}: {e}", outcome.language.red());
                            } else {
                                eprintln!("✖ {}: {e}", outcome.language);
                            }
                        }
                    }
                }

                if failed > 0 {
                    eprintln!("{failed} of {} languages failed", outcomes.len());
                    std::process::exit(1);
                }
                Ok(())
            }
        };

        match &result {
            Ok(_) => info!("✔ Finished command: {}", cmd_name),
            Err(e) => error!("✖ Command {} failed: {:?}", cmd_name, e),
        }

        result
    }
}

fn init_tracing() -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = rolling::daily("logs", "locsync.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _guard = init_tracing();

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stdout().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    cli.cmd.run(use_color)
}
