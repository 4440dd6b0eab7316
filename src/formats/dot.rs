use std::fmt::Write as _;

use crate::convert::adapters::FormatAdapter;
use crate::error::{ReadModelError, WriteModelError};
use crate::formats::{display_name, Format};
use crate::model::network::Network;
use crate::model::{EntityClass, ModulationClass, ModulationSource, OperatorChild};
use crate::types::WriteOptions;

#[derive(Debug)]
pub struct DotAdapter;

impl FormatAdapter for DotAdapter {
    fn format(&self) -> Format {
        Format::Dot
    }

    fn read_model(&self, _input: &str) -> Result<Network, ReadModelError> {
        Err(ReadModelError::with_message(
            "dot documents cannot be read back into a network",
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

fn entity_shape(class: EntityClass) -> &'static str {
    match class {
        EntityClass::UnspecifiedEntity => "ellipse",
        EntityClass::SimpleChemical => "circle",
        EntityClass::Macromolecule => "box",
        EntityClass::NucleicAcidFeature => "cds",
        EntityClass::Complex => "octagon",
        EntityClass::EmptySet => "point",
        EntityClass::PerturbingAgent => "hexagon",
    }
}

fn modulation_arrowhead(class: ModulationClass) -> &'static str {
    match class {
        ModulationClass::Modulation => "diamond",
        ModulationClass::Stimulation | ModulationClass::NecessaryStimulation => "onormal",
        ModulationClass::Catalysis => "odot",
        ModulationClass::Inhibition => "tee",
    }
}

fn escape(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Renders a network as a Graphviz digraph: compartments become clusters,
/// entities and processes become nodes, consumption/production and
/// modulations become edges.
pub fn write_network(network: &Network, _options: &WriteOptions) -> Result<String, WriteModelError> {
    if let Some(problem) = network.validate().first() {
        return Err(WriteModelError::with_message(format!(
            "network is not well formed: {problem}"
        )));
    }

    let mut out = String::new();
    out.push_str("digraph network {\n  rankdir=LR;\n");

    let entity_node = |out: &mut String, indent: &str, id: &str| {
        if let Some(e) = network.get_entity(id) {
            let _ = writeln!(
                out,
                "{indent}\"{}\" [shape={}, label=\"{}\"];",
                escape(&e.id),
                entity_shape(e.class),
                escape(display_name(e.label.as_deref(), &e.id))
            );
        }
    };

    for c in &network.compartments {
        let _ = writeln!(out, "  subgraph \"cluster_{}\" {{", escape(&c.id));
        let _ = writeln!(
            out,
            "    label=\"{}\";",
            escape(display_name(c.label.as_deref(), &c.id))
        );
        for e in &network.entities {
            if e.compartment.as_deref() == Some(c.id.as_str()) {
                entity_node(&mut out, "    ", &e.id);
            }
        }
        out.push_str("  }\n");
    }
    for e in &network.entities {
        if e.compartment.is_none() {
            entity_node(&mut out, "  ", &e.id);
        }
    }

    for op in &network.operators {
        let _ = writeln!(
            out,
            "  \"{}\" [shape=diamond, label=\"{}\"];",
            escape(&op.id),
            op.class.as_ref()
        );
        for child in &op.children {
            let child_id = match child {
                OperatorChild::Entity(id) | OperatorChild::Operator(id) => id,
            };
            let _ = writeln!(out, "  \"{}\" -> \"{}\";", escape(child_id), escape(&op.id));
        }
    }

    for p in &network.processes {
        let _ = writeln!(
            out,
            "  \"{}\" [shape=square, label=\"{}\"];",
            escape(&p.id),
            escape(p.label.as_deref().unwrap_or_default())
        );
        for r in &p.reactants {
            let _ = writeln!(out, "  \"{}\" -> \"{}\";", escape(r), escape(&p.id));
        }
        for r in &p.products {
            let _ = writeln!(out, "  \"{}\" -> \"{}\";", escape(&p.id), escape(r));
        }
    }

    for m in &network.modulations {
        let source = match &m.source {
            ModulationSource::Entity(id) | ModulationSource::Operator(id) => id,
        };
        let _ = writeln!(
            out,
            "  \"{}\" -> \"{}\" [style=dashed, arrowhead={}];",
            escape(source),
            escape(&m.target),
            modulation_arrowhead(m.class)
        );
    }

    out.push_str("}\n");
    Ok(out)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::model::{Compartment, Entity, Modulation, Process, ProcessClass};

    #[test]
    fn renders_clusters_nodes_and_edges() {
        let mut net = Network::default();
        net.add_compartment(Compartment {
            id: "c1".to_string(),
            label: Some("cytosol".to_string()),
        });
        let mut erk = Entity::new("erk", EntityClass::Macromolecule, Some("ERK"));
        erk.compartment = Some("c1".to_string());
        net.add_entity(erk);
        net.add_entity(Entity::new("atp", EntityClass::SimpleChemical, Some("ATP")));
        net.add_process(Process {
            id: "p1".to_string(),
            class: ProcessClass::Process,
            label: None,
            reactants: vec!["erk".to_string(), "atp".to_string()],
            products: vec!["erk".to_string()],
        });
        net.add_modulation(Modulation {
            id: "m1".to_string(),
            class: ModulationClass::Catalysis,
            source: ModulationSource::Entity("atp".to_string()),
            target: "p1".to_string(),
        });

        let rendered = write_network(&net, &WriteOptions::default()).unwrap();
        assert!(rendered.starts_with("digraph network {"));
        assert!(rendered.contains("subgraph \"cluster_c1\""));
        assert!(rendered.contains("\"erk\" [shape=box, label=\"ERK\"]"));
        assert!(rendered.contains("\"erk\" -> \"p1\";"));
        assert!(rendered.contains("\"p1\" -> \"erk\";"));
        assert!(rendered.contains("arrowhead=odot"));
        assert!(rendered.ends_with("}\n"));
    }

    #[test]
    fn labels_with_quotes_are_escaped() {
        let mut net = Network::default();
        net.add_entity(Entity::new(
            "e1",
            EntityClass::Macromolecule,
            Some(r#"my "protein""#),
        ));
        let rendered = write_network(&net, &WriteOptions::default()).unwrap();
        assert!(rendered.contains(r#"label="my \"protein\"""#));
    }

    #[test]
    fn dangling_references_fail_the_write() {
        let mut net = Network::default();
        net.modulations.push(Modulation {
            id: "m1".to_string(),
            class: ModulationClass::Stimulation,
            source: ModulationSource::Entity("ghost".to_string()),
            target: "p1".to_string(),
        });
        let err = write_network(&net, &WriteOptions::default()).unwrap_err();
        assert!(err.message().unwrap().contains("not well formed"));
    }
}
