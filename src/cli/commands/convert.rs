//! Convert command implementation
//!
//! Runs the mapping and assembly steps on a local file and writes the JSON
//! time series instead of submitting it.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::shared::setup_logging;
use crate::app::models::TimeSeries;
use crate::app::services::assembly::{SeriesIdentity, assemble_mapping};
use crate::app::services::csv_mapper::CsvObservationMapper;
use crate::cli::args::ConvertArgs;
use crate::{Error, Result};

pub async fn run_convert(args: ConvertArgs) -> Result<()> {
    setup_logging(&args.verbosity)?;
    args.validate()?;

    let time_series = convert_file(&args)?;
    let output = if args.headers_only {
        time_series.headers_only()
    } else {
        time_series
    };

    match &args.output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;
            write_json(BufWriter::new(file), &output, args.pretty)?;
            info!("Wrote time series to {}", path.display());
        }
        None => write_json(std::io::stdout().lock(), &output, args.pretty)?,
    }

    Ok(())
}

/// Map and assemble a local CSV file
pub fn convert_file(args: &ConvertArgs) -> Result<TimeSeries> {
    let identity = SeriesIdentity::new(
        args.tstype.trim(),
        args.glider_id.trim(),
        args.source.trim(),
        args.name.trim(),
    )?;

    let mapper = CsvObservationMapper::new(args.mapping.time_zone);
    let mapping = mapper.map(&args.mapping.get_parameters(), open_input(&args.input)?)?;

    info!(
        "Mapped {} rows from {} into {} observations",
        mapping.stats.rows_mapped,
        args.input.display(),
        mapping.stats.observations_created
    );

    assemble_mapping(&identity, mapping)
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))
}

fn write_json<W: Write>(mut writer: W, time_series: &TimeSeries, pretty: bool) -> Result<()> {
    let serialized = if pretty {
        serde_json::to_writer_pretty(&mut writer, time_series)
    } else {
        serde_json::to_writer(&mut writer, time_series)
    };
    serialized.map_err(|e| Error::io("Failed to write time series JSON", e.into()))?;

    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
