use std::collections::HashSet;

use crate::convert::adapters::FormatAdapter;
use crate::error::{ReadModelError, WriteModelError};
use crate::formats::{display_name, Format};
use crate::model::network::Network;
use crate::model::{EntityClass, ModulationSource};
use crate::types::WriteOptions;

#[derive(Debug)]
pub struct SifAdapter;

impl FormatAdapter for SifAdapter {
    fn format(&self) -> Format {
        Format::Sif
    }

    fn read_model(&self, _input: &str) -> Result<Network, ReadModelError> {
        Err(ReadModelError::with_message(
            "simple interaction format documents cannot be read back into a network",
        ))
    }

    fn write_model(
        &self,
        network: &Network,
        options: &WriteOptions,
    ) -> Result<String, WriteModelError> {
        write_network(network, options)
    }
}

/// Renders a network as tab-separated interaction rows, one relation per
/// line. Process topology becomes `reactant <class> product` rows and
/// modulations become `source <class> product` rows against the target
/// process's products.
pub fn write_network(network: &Network, _options: &WriteOptions) -> Result<String, WriteModelError> {
    if let Some(problem) = network.validate().first() {
        return Err(WriteModelError::with_message(format!(
            "network is not well formed: {problem}"
        )));
    }
    if let Some(op) = network.operators.first() {
        return Err(WriteModelError::with_message(format!(
            "simple interaction format cannot represent logical operator {}",
            op.id
        )));
    }
    if let Some(empty) = network
        .entities
        .iter()
        .find(|e| e.class == EntityClass::EmptySet)
    {
        return Err(WriteModelError::with_message(format!(
            "simple interaction format cannot represent empty set entity {}",
            empty.id
        )));
    }

    let name = |id: &str| -> String {
        network
            .get_entity(id)
            .map_or_else(|| id.to_string(), |e| {
                display_name(e.label.as_deref(), &e.id).to_string()
            })
    };

    let mut seen = HashSet::new();
    let mut out = String::new();
    let mut push_row = |row: String| {
        if seen.insert(row.clone()) {
            out.push_str(&row);
            out.push('\n');
        }
    };

    for p in &network.processes {
        for reactant in &p.reactants {
            for product in &p.products {
                push_row(format!(
                    "{}\t{}\t{}",
                    name(reactant),
                    p.class.as_ref(),
                    name(product)
                ));
            }
        }
    }
    for m in &network.modulations {
        let ModulationSource::Entity(source) = &m.source else {
            continue;
        };
        let Some(target) = network.get_process(&m.target) else {
            continue;
        };
        for product in &target.products {
            push_row(format!(
                "{}\t{}\t{}",
                name(source),
                m.class.as_ref(),
                name(product)
            ));
        }
    }

    Ok(out)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::model::{
        Entity, EntityClass, LogicalOperator, Modulation, ModulationClass, OperatorClass, Process,
        ProcessClass,
    };

    fn phosphorylation() -> Network {
        let mut net = Network::default();
        net.add_entity(Entity::new("erk", EntityClass::Macromolecule, Some("ERK")));
        net.add_entity(Entity::new("erk_p", EntityClass::Macromolecule, Some("ERK-P")));
        net.add_entity(Entity::new("mek", EntityClass::Macromolecule, Some("MEK")));
        net.add_process(Process {
            id: "p1".to_string(),
            class: ProcessClass::Process,
            label: None,
            reactants: vec!["erk".to_string()],
            products: vec!["erk_p".to_string()],
        });
        net.add_modulation(Modulation {
            id: "m1".to_string(),
            class: ModulationClass::Catalysis,
            source: ModulationSource::Entity("mek".to_string()),
            target: "p1".to_string(),
        });
        net
    }

    #[test]
    fn renders_process_and_modulation_rows() {
        let rendered = write_network(&phosphorylation(), &WriteOptions::default()).unwrap();
        let rows: Vec<&str> = rendered.lines().collect();
        assert_eq!(rows, vec!["ERK\tprocess\tERK-P", "MEK\tcatalysis\tERK-P"]);
    }

    #[test]
    fn duplicate_rows_collapse() {
        let mut net = phosphorylation();
        net.add_process(Process {
            id: "p2".to_string(),
            class: ProcessClass::Process,
            label: Some("again".to_string()),
            reactants: vec!["erk".to_string()],
            products: vec!["erk_p".to_string()],
        });
        let rendered = write_network(&net, &WriteOptions::default()).unwrap();
        assert_eq!(
            rendered.lines().filter(|l| *l == "ERK\tprocess\tERK-P").count(),
            1
        );
    }

    #[test]
    fn logical_operators_fail_the_write() {
        let mut net = phosphorylation();
        net.add_operator(LogicalOperator {
            id: "and1".to_string(),
            class: OperatorClass::And,
            children: vec![],
        });
        let err = write_network(&net, &WriteOptions::default()).unwrap_err();
        assert!(err.message().unwrap().contains("logical operator and1"));
        assert!(err.cause().is_none());
    }

    #[test]
    fn empty_set_entities_fail_the_write() {
        let mut net = phosphorylation();
        net.add_entity(Entity::new("src", EntityClass::EmptySet, None));
        let err = write_network(&net, &WriteOptions::default()).unwrap_err();
        assert!(err.message().unwrap().contains("empty set entity"));
    }
}
