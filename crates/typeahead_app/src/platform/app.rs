use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use typeahead_engine::{ControllerSettings, QueryController};
use typeahead_logging::{typeahead_debug, typeahead_info, typeahead_warn};

use super::config::{load_config, AppConfig};
use super::logging::{self, LogDestination, LogLevel};
use super::render::render;
use super::script::{parse_script, Step};

/// Replays typed queries against a data source and prints the dropdown as it
/// changes.
#[derive(Debug, Parser)]
#[command(name = "typeahead", version)]
struct Cli {
    /// RON config file; defaults to ./typeahead.ron when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    log: LogDestination,
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
    /// Print the effective config and exit.
    #[arg(long)]
    print_config: bool,
    /// Input script; read from stdin when omitted.
    script: Option<PathBuf>,
}

pub fn run_app() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, cli.log_level.into());

    let config = load_config(cli.config.as_deref())?;
    if cli.print_config {
        println!("{}", config.to_ron()?);
        return Ok(());
    }

    let script = match &cli.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => io::read_to_string(io::stdin()).context("reading script from stdin")?,
    };
    let steps = parse_script(&script)?;
    typeahead_info!("Replaying {} steps", steps.len());

    let runtime = tokio::runtime::Runtime::new().context("starting tokio runtime")?;
    runtime.block_on(replay(config, steps))
}

async fn replay(config: AppConfig, steps: Vec<Step>) -> anyhow::Result<()> {
    let settings = ControllerSettings {
        delay: config.delay(),
        ..ControllerSettings::default()
    };
    let controller = QueryController::with_shared_source(config.build_source()?, settings)?;
    let mut views = controller.subscribe();
    controller.set_focused(true);

    let printer = tokio::spawn(async move {
        let mut last_frame = Vec::new();
        loop {
            let frame = render(&views.borrow_and_update());
            if frame != last_frame {
                let written = write_frame(&mut io::stdout().lock(), &frame);
                if let Err(err) = written {
                    typeahead_warn!("Stopped printing frames: {}", err);
                    break;
                }
                last_frame = frame;
            }
            if views.changed().await.is_err() {
                break;
            }
        }
    });

    for step in steps {
        typeahead_debug!("Step {:?}", step);
        match step {
            Step::Query(query) => controller.set_query(query),
            Step::Sleep(duration) => tokio::time::sleep(duration).await,
            Step::Focus => controller.set_focused(true),
            Step::Blur => controller.set_focused(false),
            Step::Settle => {
                controller.wait_settled().await;
            }
        }
    }

    let last = controller.wait_settled().await;
    typeahead_info!("Settled on {:?} loaded={}", last.query, last.loaded);
    // Dropping the controller closes the view channel and ends the printer.
    drop(controller);
    printer.await.context("printer task")?;
    Ok(())
}

/// Writes one frame followed by a blank separator line.
fn write_frame(out: &mut impl Write, frame: &[String]) -> io::Result<()> {
    for line in frame {
        writeln!(out, "{line}")?;
    }
    writeln!(out)?;
    out.flush()
}
