//! Positional decomposition of CPE names.
//!
//! Dictionary items carry their identifier in the URI binding,
//! `cpe:/part:vendor:product:version:update:edition:language`. The name is
//! split on `:` into a fixed array of eight segments; segment 0 is the `cpe`
//! scheme marker and is discarded.

/// Number of colon-delimited segments considered, including the scheme.
const SEGMENTS: usize = 8;

/// The seven positional fields of a CPE name.
///
/// Every field is always present and may be empty. No validation is
/// performed: malformed input yields empty or odd-looking fields, never an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CpeIdentifier {
    /// `a` (application), `o` (operating system) or `h` (hardware).
    pub part: String,
    pub vendor: String,
    pub product: String,
    pub version: String,
    pub update: String,
    pub edition: String,
    pub language: String,
}

impl CpeIdentifier {
    /// Field names in column order.
    pub const FIELDS: [&'static str; 7] = [
        "part", "vendor", "product", "version", "update", "edition", "language",
    ];

    /// Split a CPE name into its positional fields.
    ///
    /// Missing trailing segments are padded with empty strings and segments
    /// beyond the eighth are ignored:
    ///
    /// ```
    /// use cpe2csv::cpe::CpeIdentifier;
    ///
    /// let id = CpeIdentifier::parse("cpe:/a:apache:http_server:2.4.0");
    /// assert_eq!(id.part, "a");
    /// assert_eq!(id.product, "http_server");
    /// assert_eq!(id.update, "");
    /// ```
    pub fn parse(name: &str) -> Self {
        let mut segments = [""; SEGMENTS];
        for (slot, segment) in segments.iter_mut().zip(name.split(':')) {
            *slot = segment;
        }
        let [_, part, vendor, product, version, update, edition, language] = segments;

        Self {
            // URI binding prefixes the part with '/'.
            part: part.strip_prefix('/').unwrap_or(part).to_string(),
            vendor: vendor.to_string(),
            product: product.to_string(),
            version: version.to_string(),
            update: update.to_string(),
            edition: edition.to_string(),
            language: language.to_string(),
        }
    }

    /// `(field name, value)` pairs in [`FIELDS`](Self::FIELDS) order.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        let values = [
            self.part.as_str(),
            self.vendor.as_str(),
            self.product.as_str(),
            self.version.as_str(),
            self.update.as_str(),
            self.edition.as_str(),
            self.language.as_str(),
        ];
        std::array::from_fn(|i| (Self::FIELDS[i], values[i]))
    }
}

impl From<&str> for CpeIdentifier {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}
