use clap::Parser;
use log::{error, info, warn};
use neuroref::core::App;
use neuroref::core::config::{CliOverrides, Theme, load_config, resolve};
use neuroref::core::i18n::Language;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "neuroref", about = "Bilingual nerve conduction and EMG reference")]
struct Args {
    /// Interface language (es, en)
    #[arg(short, long)]
    lang: Option<Language>,

    /// Color theme (light, dark)
    #[arg(short, long)]
    theme: Option<Theme>,

    /// Start at a location such as `nerves/upper-limb-nerves`
    #[arg(long)]
    location: Option<String>,

    /// Print nerves matching QUERY and exit
    #[arg(short, long, value_name = "QUERY")]
    search: Option<String>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = load_config().unwrap_or_else(|e| {
        eprintln!("neuroref: {e}; using defaults");
        Default::default()
    });
    let cli = CliOverrides {
        language: args.lang,
        theme: args.theme,
        location: args.location,
        log_file: args.log_file,
    };
    let resolved = resolve(&config, &cli);

    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    match File::create(&resolved.log_file) {
        Ok(log_file) => {
            let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
        }
        Err(e) => eprintln!("neuroref: cannot open log file {}: {e}", resolved.log_file.display()),
    }
    info!("NeuroRef starting up (language: {})", resolved.language);

    let app = match App::from_config(&resolved) {
        Ok(app) => app,
        Err(e) => {
            error!("Startup integrity check failed: {}", e);
            eprintln!("neuroref: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(query) = args.search {
        print_matches(app, &query);
        return ExitCode::SUCCESS;
    }

    match neuroref::tui::run(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Terminal error: {}", e);
            eprintln!("neuroref: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Non-interactive search: one matching nerve per line.
fn print_matches(mut app: App, query: &str) {
    app.search.set_query(query);
    if app.search.result_count() == 0 {
        warn!("No nerves match '{}'", query);
        println!("{}", app.t("search.noResults", &[]));
        return;
    }
    for nerve in app.search.results() {
        let region = app.t(&format!("regions.{}", nerve.region), &[]);
        match &nerve.specific_region {
            Some(specific) => println!("{}\t{}\t{} · {}", nerve.id, nerve.common_name, region, specific),
            None => println!("{}\t{}\t{}", nerve.id, nerve.common_name, region),
        }
    }
}
