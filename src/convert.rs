//! Streaming conversion of the CPE dictionary XML into CSV.
//!
//! The dictionary is tens of thousands of `cpe-item` elements under a single
//! `cpe-list` root. It is read with a namespace-aware pull parser: only the
//! item currently open is held in memory, and the event buffer is cleared
//! after every event, so memory stays flat regardless of document size.
//!
//! Each closed item becomes one [`CpeRecord`] which is written immediately.
//! The CSV header comes from the first record's field names; since every
//! record has the same fields, the header is identical on every run.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use serde::{Serialize, Serializer};
use tracing::info;

use crate::cpe::CpeIdentifier;
use crate::error::{Error, Result};

/// XML namespace of the CPE dictionary elements.
pub const DICTIONARY_NAMESPACE: &str = "http://cpe.mitre.org/dictionary/2.0";

/// One CSV row: a dictionary item with its name decomposed.
///
/// Field declaration order is the column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CpeRecord {
    /// The raw CPE name from the item's `name` attribute.
    pub name: String,
    pub part: String,
    pub vendor: String,
    pub product: String,
    pub version: String,
    pub update: String,
    pub edition: String,
    pub language: String,
    /// Text of the first `title` child, empty if absent.
    pub title: String,
    /// `href` of every `references/reference` child, in document order.
    ///
    /// Written as a JSON array string, or an empty cell when there are none.
    #[serde(serialize_with = "serialize_references")]
    pub references: Vec<String>,
}

impl CpeRecord {
    /// Build a record, decomposing `name` into its positional fields.
    pub fn new(name: String, title: String, references: Vec<String>) -> Self {
        let CpeIdentifier {
            part,
            vendor,
            product,
            version,
            update,
            edition,
            language,
        } = CpeIdentifier::parse(&name);

        Self {
            name,
            part,
            vendor,
            product,
            version,
            update,
            edition,
            language,
            title,
            references,
        }
    }
}

fn serialize_references<S>(
    references: &[String],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if references.is_empty() {
        return serializer.serialize_str("");
    }
    let encoded = serde_json::to_string(references).map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&encoded)
}

/// Counters collected during a conversion run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConversionStats {
    /// Rows written, one per `cpe-item`.
    pub items: usize,
    /// Total reference URLs across all rows.
    pub references: usize,
    /// Items that had no `title` element.
    pub untitled: usize,
}

/// Convert the dictionary at `xml_path` into a CSV file at `csv_path`.
///
/// The destination is created (or truncated) up front. On error, rows
/// already written are left in place.
pub fn convert(xml_path: &Path, csv_path: &Path, verbose: bool) -> Result<ConversionStats> {
    let source = File::open(xml_path).map_err(|e| Error::Read {
        path: xml_path.to_path_buf(),
        source: e,
    })?;
    let sink = File::create(csv_path).map_err(|e| Error::Write {
        path: csv_path.to_path_buf(),
        source: e,
    })?;

    let stats = convert_stream(BufReader::new(source), sink, verbose)?;

    if verbose {
        info!(
            "Conversion from {} to {} completed",
            xml_path.display(),
            csv_path.display()
        );
    }
    Ok(stats)
}

/// Convert a dictionary document read from `source` into CSV written to `sink`.
///
/// The writer is flushed before returning successfully.
pub fn convert_stream<R, W>(source: R, sink: W, verbose: bool) -> Result<ConversionStats>
where
    R: BufRead,
    W: Write,
{
    let mut reader = NsReader::from_reader(source);
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(sink);

    if verbose {
        info!("Starting XML to CSV conversion");
    }

    let mut stats = ConversionStats::default();
    let mut item: Option<ItemBuilder> = None;
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut buf = Vec::new();

    loop {
        let (ns, event) = reader.read_resolved_event_into(&mut buf)?;
        let in_dictionary = matches!(
            ns,
            ResolveResult::Bound(Namespace(uri)) if uri == DICTIONARY_NAMESPACE.as_bytes()
        );
        let self_closing = matches!(event, Event::Empty(_));

        match event {
            Event::Start(e) | Event::Empty(e) if !root_seen => {
                if !in_dictionary {
                    return Err(Error::Parse(format!(
                        "root element <{}> is not in the {DICTIONARY_NAMESPACE} namespace",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                root_seen = true;
                // A self-closing root holds no items.
                if !self_closing {
                    depth += 1;
                }
            }
            Event::Start(_) | Event::Empty(_) if depth == 0 => {
                return Err(Error::Parse("content after the root element".to_string()));
            }
            Event::Start(e) => {
                depth += 1;
                if let Some(open) = item.as_mut() {
                    open.start(in_dictionary, &e)?;
                } else if in_dictionary && is_item(&e) {
                    item = Some(ItemBuilder::open(&e)?);
                }
            }
            Event::Empty(e) => {
                if let Some(open) = item.as_mut() {
                    open.start(in_dictionary, &e)?;
                    open.end();
                } else if in_dictionary && is_item(&e) {
                    let record = ItemBuilder::open(&e)?.finish(&mut stats);
                    write_record(&mut writer, &record, verbose)?;
                }
            }
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match item.take() {
                    Some(open) if open.depth == 0 => {
                        let record = open.finish(&mut stats);
                        write_record(&mut writer, &record, verbose)?;
                    }
                    Some(mut open) => {
                        open.end();
                        item = Some(open);
                    }
                    None => {}
                }
            }
            Event::Text(t) => {
                if let Some(open) = item.as_mut().filter(|open| open.capturing_title) {
                    open.push_title(&t.unescape()?);
                }
            }
            Event::CData(c) => {
                if let Some(open) = item.as_mut().filter(|open| open.capturing_title) {
                    open.push_title(&c.decode().map_err(quick_xml::Error::from)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !root_seen {
        return Err(Error::Parse("document has no root element".to_string()));
    }
    if depth > 0 || item.is_some() {
        return Err(Error::Parse(
            "document ended before all elements were closed".to_string(),
        ));
    }

    writer.flush().map_err(csv::Error::from)?;

    if verbose {
        info!(
            "Converted {} items ({} references, {} without title)",
            stats.items, stats.references, stats.untitled
        );
    }
    Ok(stats)
}

fn write_record<W: Write>(
    writer: &mut csv::Writer<W>,
    record: &CpeRecord,
    verbose: bool,
) -> Result<()> {
    writer.serialize(record)?;
    if verbose {
        info!("Processed item: {}", record.name);
    }
    Ok(())
}

fn is_item(e: &BytesStart<'_>) -> bool {
    e.local_name().as_ref() == b"cpe-item"
}

/// Accumulates the parts of the `cpe-item` currently open.
#[derive(Debug, Default)]
struct ItemBuilder {
    name: String,
    title: Option<String>,
    references: Vec<String>,
    /// Open elements below the item itself.
    depth: usize,
    capturing_title: bool,
    in_references: bool,
}

impl ItemBuilder {
    fn open(e: &BytesStart<'_>) -> Result<Self> {
        Ok(Self {
            name: attribute(e, "name")?.unwrap_or_default(),
            ..Self::default()
        })
    }

    fn start(&mut self, in_dictionary: bool, e: &BytesStart<'_>) -> Result<()> {
        self.depth += 1;
        // Title text stops at its first child element.
        self.capturing_title = false;
        if !in_dictionary {
            return Ok(());
        }

        match (self.depth, e.local_name().as_ref()) {
            (1, b"title") if self.title.is_none() => {
                self.title = Some(String::new());
                self.capturing_title = true;
            }
            (1, b"references") => self.in_references = true,
            (2, b"reference") if self.in_references => {
                self.references.push(attribute(e, "href")?.unwrap_or_default());
            }
            _ => {}
        }
        Ok(())
    }

    fn end(&mut self) {
        if self.depth == 1 {
            self.capturing_title = false;
            self.in_references = false;
        }
        self.depth = self.depth.saturating_sub(1);
    }

    fn push_title(&mut self, text: &str) {
        if let Some(title) = self.title.as_mut() {
            title.push_str(text);
        }
    }

    fn finish(self, stats: &mut ConversionStats) -> CpeRecord {
        stats.items += 1;
        stats.references += self.references.len();
        if self.title.is_none() {
            stats.untitled += 1;
        }
        CpeRecord::new(self.name, self.title.unwrap_or_default(), self.references)
    }
}

fn attribute(e: &BytesStart<'_>, key: &str) -> Result<Option<String>> {
    let Some(attr) = e
        .try_get_attribute(key)
        .map_err(quick_xml::Error::from)?
    else {
        return Ok(None);
    };
    Ok(Some(attr.unescape_value()?.into_owned()))
}
