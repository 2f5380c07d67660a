/// Interactive entry point: prompts for a street name, fetches every
/// meetbout in that street with its full measurement series, computes
/// the derived recent settlement rate per address, and writes the
/// grouped table as semicolon-separated CSV.
///
/// The run is strictly linear and aborts on the first error; no partial
/// output file is produced.

use std::error::Error;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use meetbout_export::logging::{self, LogLevel, Stage};
use meetbout_export::{analysis, config, export, ingest};

fn main() {
    logging::init_logger(LogLevel::Info, None);

    if let Err(e) = run() {
        logging::error(Stage::System, None, &e.to_string());
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = config::load_config(config::DEFAULT_CONFIG_PATH)?;

    print!("Voer straat naam in: ");
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let street = capitalize_street(input.trim());

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.api.timeout_secs))
        .build()?;

    logging::info(
        Stage::Api,
        None,
        &format!("Fetching meetbouten for '{}'", street),
    );
    let devices = ingest::meetbouten::fetch_meetbouten(&client, &config, &street)?;

    let mut rows = Vec::new();
    for device in &devices {
        logging::info(Stage::Api, Some(device.device_id()), &device.address);
        let metingen = ingest::meetbouten::fetch_metingen(&client, &config, device.device_id())?;
        rows.extend(ingest::meetbouten::flatten_readings(device, &metingen));
    }
    logging::info(
        Stage::Pipeline,
        None,
        &format!("{} readings from {} meetbouten", rows.len(), devices.len()),
    );

    let rows = analysis::zakking::compute_recent_rates(rows);
    let table = export::build_table(&rows);
    export::write_csv(Path::new(&config.output.path), &table)?;

    logging::info(
        Stage::Export,
        None,
        &format!("Wrote {} records to {}", table.len(), config.output.path),
    );
    Ok(())
}

/// Uppercases the first letter of every space-separated word, leaving
/// the rest of each word untouched. The API's address labels are
/// capitalized this way, and its `like` filter is case sensitive.
fn capitalize_street(street: &str) -> String {
    street
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
