pub mod adapters;

use crate::convert::adapters::adapter_for;
use crate::error::{Error, ReadModelError};
use crate::formats::Format;
use crate::model::network::Network;
use crate::types::{ConvertOptions, RawDocument, WriteOptions};

pub struct ConvertEngine;

impl ConvertEngine {
    /// Reads every input document, merges them into one network, and writes
    /// it in the target format with default write options.
    pub fn convert(
        inputs: &[RawDocument],
        target: Format,
        options: &ConvertOptions,
    ) -> Result<String, Error> {
        Self::convert_with(inputs, target, options, &WriteOptions::default())
    }

    pub fn convert_with(
        inputs: &[RawDocument],
        target: Format,
        options: &ConvertOptions,
        write_options: &WriteOptions,
    ) -> Result<String, Error> {
        if inputs.is_empty() {
            return Err(ReadModelError::with_message("no input documents").into());
        }

        let mut merged = Network::default();
        for document in inputs {
            tracing::debug!(
                name = %document.name,
                format = document.format.as_str(),
                "reading input document"
            );
            let network = adapter_for(document.format)
                .read_model(&document.contents)
                .map_err(|err| {
                    ReadModelError::with_message_and_cause(
                        format!("could not read {}", document.name),
                        err,
                    )
                })?;
            merged = merged.union(&network);
        }

        if options.renew_ids {
            merged.renew_ids();
        }

        tracing::debug!(
            format = target.as_str(),
            entities = merged.entities.len(),
            processes = merged.processes.len(),
            "writing output document"
        );
        Ok(adapter_for(target).write_model(&merged, write_options)?)
    }

    /// Structural union of any number of networks.
    pub fn merge(networks: &[Network]) -> Network {
        networks
            .iter()
            .fold(Network::default(), |acc, net| acc.union(net))
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::formats::sbgntxt;
    use crate::model::{Entity, EntityClass};

    const DOC_A: &str = "
entity erk macromolecule \"ERK\"
entity atp simple_chemical \"ATP\"
process p1 process erk + atp -> erk
";

    const DOC_B: &str = "
entity erk macromolecule \"ERK\"
entity mek macromolecule \"MEK\"
process p1 process erk -> erk
modulation m1 catalysis mek -> p1
";

    fn doc(name: &str, format: Format, contents: &str) -> RawDocument {
        RawDocument {
            name: name.to_string(),
            format,
            contents: contents.to_string(),
        }
    }

    #[test]
    fn converts_a_single_document_between_formats() {
        let inputs = [doc("a.sbgntxt", Format::Sbgntxt, DOC_A)];
        let json = ConvertEngine::convert(&inputs, Format::Json, &ConvertOptions::default())
            .unwrap();

        let reread = adapter_for(Format::Json).read_model(&json).unwrap();
        let original = sbgntxt::read_network(DOC_A).unwrap();
        assert!(reread.equivalent(&original));
    }

    #[test]
    fn merges_multiple_inputs_before_writing() {
        let inputs = [
            doc("a.sbgntxt", Format::Sbgntxt, DOC_A),
            doc("b.sbgntxt", Format::Sbgntxt, DOC_B),
        ];
        let json = ConvertEngine::convert(&inputs, Format::Json, &ConvertOptions::default())
            .unwrap();
        let merged = adapter_for(Format::Json).read_model(&json).unwrap();

        // ERK is shared, everything else is distinct
        assert_eq!(merged.entities.len(), 3);
        assert_eq!(merged.processes.len(), 2);
        assert_eq!(merged.modulations.len(), 1);
    }

    #[test]
    fn renew_ids_produces_canonical_ids() {
        let inputs = [doc("a.sbgntxt", Format::Sbgntxt, DOC_A)];
        let rendered = ConvertEngine::convert(&inputs, Format::Sbgntxt, &ConvertOptions::default())
            .unwrap();
        assert!(rendered.contains("entity e1 "));
        assert!(rendered.contains("process p1 "));

        let kept = ConvertEngine::convert(
            &inputs,
            Format::Sbgntxt,
            &ConvertOptions { renew_ids: false },
        )
        .unwrap();
        assert!(kept.contains("entity erk "));
    }

    #[test]
    fn empty_input_list_is_a_read_error() {
        let err = ConvertEngine::convert(&[], Format::Json, &ConvertOptions::default())
            .unwrap_err();
        let Error::Read(read) = err else {
            panic!("expected a read error");
        };
        assert_eq!(read.message(), Some("no input documents"));
    }

    #[test]
    fn read_failures_name_the_document_and_chain_the_cause() {
        let inputs = [doc("broken.json", Format::Json, "{ not json")];
        let err = ConvertEngine::convert(&inputs, Format::Sbgntxt, &ConvertOptions::default())
            .unwrap_err();
        let Error::Read(read) = err else {
            panic!("expected a read error");
        };
        assert_eq!(read.message(), Some("could not read broken.json"));
        assert!(read.cause().is_some());
    }

    #[test]
    fn unwritable_networks_surface_write_errors() {
        let doc_with_operator = "
entity a macromolecule \"A\"
entity b macromolecule \"B\"
operator and1 and a b
process p1 process a -> b
modulation m1 stimulation and1 -> p1
";
        let inputs = [doc("ops.sbgntxt", Format::Sbgntxt, doc_with_operator)];
        let err = ConvertEngine::convert(&inputs, Format::Sif, &ConvertOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Write(_)));
    }

    #[test]
    fn merge_of_no_networks_is_empty() {
        assert!(ConvertEngine::merge(&[]).is_empty());
    }

    #[test]
    fn merge_matches_pairwise_union() {
        let a = sbgntxt::read_network(DOC_A).unwrap();
        let b = sbgntxt::read_network(DOC_B).unwrap();
        let mut c = Network::default();
        c.add_entity(Entity::new("x", EntityClass::SimpleChemical, Some("GTP")));

        let merged = ConvertEngine::merge(&[a.clone(), b.clone(), c.clone()]);
        assert!(merged.equivalent(&a.union(&b).union(&c)));
    }
}
