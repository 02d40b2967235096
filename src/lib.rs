//! Convert the NVD CPE dictionary into CSV.
//!
//! `cpe2csv` reads the [CPE](https://nvd.nist.gov/products/cpe) dictionary
//! XML feed published by NVD and writes one CSV row per `cpe-item`, with the
//! CPE name split into its positional fields.
//!
//! # Features
//!
//! - Streaming conversion: memory use does not grow with dictionary size
//! - Stable column set: `name, part, vendor, product, version, update,
//!   edition, language, title, references`
//! - Optional download of the current archive from NVD (`download` feature)
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! let stats = cpe2csv::convert::convert(
//!     Path::new("official-cpe-dictionary_v2.3.xml"),
//!     Path::new("cpe.csv"),
//!     false,
//! )?;
//! eprintln!("Converted {} items", stats.items);
//! # Ok::<(), cpe2csv::error::Error>(())
//! ```

pub mod convert;
pub mod cpe;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod source;
