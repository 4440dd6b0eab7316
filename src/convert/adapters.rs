use crate::error::{ReadModelError, WriteModelError};
use crate::formats::dot::DotAdapter;
use crate::formats::json::JsonAdapter;
use crate::formats::sbgntxt::SbgntxtAdapter;
use crate::formats::sif::SifAdapter;
use crate::formats::Format;
use crate::model::network::Network;
use crate::types::WriteOptions;

/// One document format's reader and writer.
///
/// Write-only formats return a [`ReadModelError`] from `read_model` saying
/// so; every read failure is a [`ReadModelError`] and every write failure a
/// [`WriteModelError`].
pub trait FormatAdapter: Sync {
    fn format(&self) -> Format;

    fn read_model(&self, input: &str) -> Result<Network, ReadModelError>;

    fn write_model(
        &self,
        network: &Network,
        options: &WriteOptions,
    ) -> Result<String, WriteModelError>;
}

pub fn adapter_for(format: Format) -> &'static dyn FormatAdapter {
    match format {
        Format::Sbgntxt => &SbgntxtAdapter,
        Format::Json => &JsonAdapter,
        Format::Sif => &SifAdapter,
        Format::Dot => &DotAdapter,
    }
}
