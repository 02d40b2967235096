use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::info;

use cpe2csv::error::{Error, Result};
use cpe2csv::source::InputSource;

/// A tool to convert the CPE dictionary XML to CSV.
///
/// Either fetches the current dictionary from NVD or converts an XML file
/// you provide.
#[derive(Parser)]
#[command(name = "cpe2csv", version, about)]
struct Cli {
    /// Output CSV file path where the conversion will be saved.
    csv_file: PathBuf,

    /// Show progress and other messages while processing.
    #[arg(short, long)]
    verbose: bool,

    /// Fetch the latest dictionary from NVD, convert it to CSV and then
    /// clean up. Overrides --input if both are provided.
    #[cfg(feature = "download")]
    #[arg(short, long)]
    update: bool,

    /// Path to the input XML file for conversion. Ignored with --update.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Archive URL used by --update.
    #[cfg(feature = "download")]
    #[arg(
        long,
        hide = true,
        default_value = cpe2csv::fetch::NVD_DICTIONARY_URL,
        env = "CPE_DICTIONARY_URL"
    )]
    url: String,
}

impl Cli {
    #[cfg(feature = "download")]
    fn update(&self) -> bool {
        self.update
    }

    #[cfg(not(feature = "download"))]
    fn update(&self) -> bool {
        false
    }
}

fn main() {
    let cli = Cli::parse();
    cpe2csv::logging::init(cli.verbose);

    let source = match InputSource::resolve(cli.update(), cli.input.as_deref()) {
        Ok(source) => source,
        Err(e) => {
            let kind = match &e {
                Error::NoInput => ErrorKind::MissingRequiredArgument,
                _ => ErrorKind::ValueValidation,
            };
            Cli::command().error(kind, e).exit();
        }
    };

    if let Err(e) = run(&cli, source) {
        eprintln!("error: {e}");

        // Print cause chain.
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = std::error::Error::source(cause);
        }

        process::exit(1);
    }
}

fn run(cli: &Cli, source: InputSource) -> Result<()> {
    let workdir = Path::new(".");

    let xml_file = match &source {
        #[cfg(feature = "download")]
        InputSource::Fetch => {
            eprintln!("Fetching the latest dictionary from NVD...");
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| Error::Download(format!("starting runtime: {e}")))?;
            rt.block_on(cpe2csv::fetch::fetch_dictionary(&cli.url, workdir))?
        }
        #[cfg(not(feature = "download"))]
        InputSource::Fetch => unreachable!("--update requires the download feature"),
        InputSource::LocalPath(path) => path.clone(),
    };

    let stats = cpe2csv::convert::convert(&xml_file, &cli.csv_file, cli.verbose)?;
    info!(
        "Wrote {} rows to {} ({} references, {} without title)",
        stats.items,
        cli.csv_file.display(),
        stats.references,
        stats.untitled
    );

    if source.is_fetch() {
        cpe2csv::fetch::cleanup(workdir)?;
    }

    Ok(())
}
