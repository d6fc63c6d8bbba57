use clap::Parser;
use labview_xlsx::{ConvertOptions, MemorySheet, convert_upload, decode_text, emit_rows};
use std::fs;
use std::path::PathBuf;

/// Convert a LabVIEW voltage/temperature log into an xlsx workbook with a chart
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Semicolon-delimited log file
    input: PathBuf,

    /// Output path (defaults to the input name with an .xlsx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Name of the worksheet
    #[arg(long, default_value = "Sheet1")]
    sheet_name: String,

    /// Print the processing summary as JSON on stdout
    #[arg(long)]
    summary_json: bool,

    /// Parse and report without writing a workbook
    #[arg(long)]
    dry_run: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let options = ConvertOptions {
        sheet_name: args.sheet_name.clone(),
        ..ConvertOptions::default()
    };
    let bytes = fs::read(&args.input)?;
    let input_name = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let summary = if args.dry_run {
        let text = decode_text(&bytes)?;
        let mut sheet = MemorySheet::new(&options.sheet_name);
        let summary = emit_rows(&text, &mut sheet, &options)?;
        match &sheet.chart {
            Some(chart) => {
                for series in &chart.series {
                    println!("series {} -> {}", series.name.formula(), series.values.formula());
                }
            }
            None => println!("no chart: no fully valid rows"),
        }
        summary
    } else {
        let file = convert_upload(&bytes, &input_name, &options)?;
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| args.input.with_file_name(&file.filename));
        fs::write(&output, &file.bytes)?;
        log::info!("wrote {}", output.display());
        file.summary
    };

    if args.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "Rows processed: {}, rows with errors/skipped: {}",
            summary.lines_processed,
            summary.error_count()
        );
    }

    Ok(())
}
