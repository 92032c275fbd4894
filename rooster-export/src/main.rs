mod cli;
mod input;
mod server;

use std::env;

use anyhow::{Context, Result};
use log::info;
use rooster_parser::Exporter;

use crate::cli::Mode;

fn setup_logging() {
    if env::var("LOG").is_err() {
        env::set_var("LOG", "rooster_export=info,rooster_parser=info");
    }

    pretty_env_logger::init_custom_env("LOG");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::parse(env::args().skip(1).collect());

    setup_logging();

    let exporter = Exporter::new(&args.timezone)?;

    match args.mode {
        Mode::Serve { address } => server::serve(address, exporter)
            .await
            .context("HTTP server failed"),

        Mode::Export {
            inputs,
            output,
            json,
        } => {
            let labels = input::read_labels(&inputs)?;
            let calendar = exporter.calendar(&labels);

            let body = if json {
                serde_json::to_string_pretty(&calendar)?
            } else {
                calendar.to_ics()
            };

            input::write_output(output.as_deref(), &body)?;

            info!(
                "Exported {} events from {} labels",
                calendar.len(),
                labels.len()
            );
            Ok(())
        }
    }
}
