pub mod dot;
pub mod json;
pub mod sbgntxt;
pub mod sif;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Document formats this crate speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Sbgntxt,
    Json,
    Sif,
    Dot,
}

impl Format {
    /// Looks a format up by its name or customary file extension.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "sbgntxt" | "txt" => Some(Self::Sbgntxt),
            "json" => Some(Self::Json),
            "sif" => Some(Self::Sif),
            "dot" | "gv" => Some(Self::Dot),
            _ => None,
        }
    }

    /// Like [`Format::from_name`], with the failure as a crate error.
    pub fn parse(name: &str) -> Result<Self, Error> {
        Self::from_name(name).ok_or_else(|| Error::UnknownFormat {
            name: name.to_string(),
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sbgntxt => "sbgntxt",
            Self::Json => "json",
            Self::Sif => "sif",
            Self::Dot => "dot",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Sbgntxt => "sbgntxt",
            Self::Json => "json",
            Self::Sif => "sif",
            Self::Dot => "dot",
        }
    }

    pub fn can_read(self) -> bool {
        matches!(self, Self::Sbgntxt | Self::Json)
    }

    pub fn can_write(self) -> bool {
        true
    }

    pub fn all() -> &'static [Format] {
        &[Self::Sbgntxt, Self::Json, Self::Sif, Self::Dot]
    }
}

/// What one format supports, for capability listings.
#[derive(Debug, Clone, Serialize)]
pub struct FormatCapability {
    pub name: &'static str,
    pub extension: &'static str,
    pub reads: bool,
    pub writes: bool,
}

pub fn capabilities() -> Vec<FormatCapability> {
    Format::all()
        .iter()
        .map(|f| FormatCapability {
            name: f.as_str(),
            extension: f.extension(),
            reads: f.can_read(),
            writes: f.can_write(),
        })
        .collect()
}

/// Display name for a node in exports that have no id column: the label when
/// present, the id otherwise.
pub(crate) fn display_name<'a>(label: Option<&'a str>, id: &'a str) -> &'a str {
    match label {
        Some(l) if !l.is_empty() => l,
        _ => id,
    }
}
