use crate::formats::Format;

/// An input document handed to the conversion pipeline.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawDocument {
    /// Caller-chosen name, used in diagnostics (typically the file name).
    pub name: String,
    /// Format the contents are declared to be in.
    pub format: Format,
    /// Full document text.
    pub contents: String,
}

/// Caller-supplied options for a whole conversion run.
///
/// `renew_ids` reassigns canonical sequential ids to every node of the merged
/// network before writing, so output ids are stable regardless of the input
/// documents' id schemes. On by default; turn off to keep source ids.
#[derive(Debug, Clone, Copy)]
pub struct ConvertOptions {
    pub renew_ids: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { renew_ids: true }
    }
}

/// Options a single writer may honor.
#[derive(Debug, Clone, Copy)]
pub struct WriteOptions {
    /// Human-oriented layout for formats that have a compact form.
    pub pretty: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}
