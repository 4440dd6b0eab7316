use serde::{Deserialize, Serialize};

use crate::convert::adapters::FormatAdapter;
use crate::error::{ReadModelError, WriteModelError};
use crate::formats::Format;
use crate::model::network::Network;
use crate::model::{Compartment, Entity, LogicalOperator, Modulation, Process};
use crate::types::WriteOptions;

/// Version tag carried by JSON network documents. Documents written by a
/// build with a different tag do not read back.
pub const DOCUMENT_VERSION: u32 = 1;

#[derive(Debug)]
pub struct JsonAdapter;

impl FormatAdapter for JsonAdapter {
    fn format(&self) -> Format {
        Format::Json
    }

    fn read_model(&self, input: &str) -> Result<Network, ReadModelError> {
        read_network(input)
    }

    fn write_model(
        &self,
        network: &Network,
        options: &WriteOptions,
    ) -> Result<String, WriteModelError> {
        write_network(network, options)
    }
}

#[derive(Serialize, Deserialize)]
struct NetworkDocument {
    version: u32,
    network: NetworkPayload,
}

#[derive(Serialize, Deserialize, Default)]
struct NetworkPayload {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    compartments: Vec<Compartment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    entities: Vec<Entity>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    operators: Vec<LogicalOperator>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    processes: Vec<Process>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    modulations: Vec<Modulation>,
}

/// Parses a JSON network document.
pub fn read_network(input: &str) -> Result<Network, ReadModelError> {
    let document: NetworkDocument = serde_json::from_str(input).map_err(|err| {
        ReadModelError::with_message_and_cause("malformed JSON network document", err)
    })?;
    if document.version != DOCUMENT_VERSION {
        return Err(ReadModelError::with_message(format!(
            "unsupported document version {} (expected {DOCUMENT_VERSION})",
            document.version
        )));
    }
    let network = Network {
        compartments: document.network.compartments,
        entities: document.network.entities,
        operators: document.network.operators,
        processes: document.network.processes,
        modulations: document.network.modulations,
    };
    let problems = network.validate();
    if let Some(problem) = problems.first() {
        return Err(ReadModelError::with_message(format!(
            "invalid network document: {problem}"
        )));
    }
    Ok(network)
}

/// Renders a network as a JSON document, pretty-printed unless asked not to.
pub fn write_network(network: &Network, options: &WriteOptions) -> Result<String, WriteModelError> {
    if let Some(problem) = network.validate().first() {
        return Err(WriteModelError::with_message(format!(
            "network is not well formed: {problem}"
        )));
    }
    let document = NetworkDocument {
        version: DOCUMENT_VERSION,
        network: NetworkPayload {
            compartments: network.compartments.clone(),
            entities: network.entities.clone(),
            operators: network.operators.clone(),
            processes: network.processes.clone(),
            modulations: network.modulations.clone(),
        },
    };
    let rendered = if options.pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };
    rendered
        .map_err(|err| WriteModelError::with_message_and_cause("could not encode network document", err))
}
