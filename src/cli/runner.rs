use std::time::Duration;

use tracing::info;

use landpro::api::Session;
use landpro::catalog::MetricsCatalog;

use super::args::{CliArgs, CliCommand};
use super::errors::AppError;

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    match args.command {
        CliCommand::Metrics {
            kind,
            process,
            catalog,
            json,
        } => {
            let catalog = match catalog {
                Some(path) => MetricsCatalog::load(&path)?,
                None => MetricsCatalog::bundled()?,
            };
            let rows = catalog.filter(kind.as_deref(), process.as_deref());
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                for m in rows {
                    println!("{}\t{}\t{}", m.identifier, m.kind, m.process);
                }
            }
        }

        CliCommand::SetRuntime { path } => {
            let session = Session::new();
            session.set_runtime(&path)?;
            println!("runtime path saved: {}", path.display());
        }

        CliCommand::Run {
            timeout_secs,
            files,
        } => {
            let mut session = Session::new();
            if let Some(secs) = timeout_secs {
                session = session.with_timeout(Duration::from_secs(secs));
            }

            info!("dispatching {} properties file(s)", files.len());
            let results = session.run_files(&files)?;

            let total = results.len();
            let mut failed = 0;
            for (file, outcome) in &results {
                match outcome {
                    Ok(()) => println!("{}: ok", file.display()),
                    Err(e) => {
                        failed += 1;
                        println!("{}: {}", file.display(), e);
                    }
                }
            }

            if failed > 0 {
                return Err(AppError::DispatchFailed { failed, total }.into());
            }
        }
    }

    Ok(())
}
