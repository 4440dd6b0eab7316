use std::collections::HashMap;

use crate::convert::adapters::FormatAdapter;
use crate::error::{ReadModelError, WriteModelError};
use crate::formats::Format;
use crate::model::network::Network;
use crate::model::{
    Compartment, Entity, EntityClass, LogicalOperator, Modulation, ModulationClass,
    ModulationSource, OperatorChild, OperatorClass, Process, ProcessClass, StateVariable,
    UnitOfInformation,
};
use crate::types::WriteOptions;

// One record per line, ids are bare tokens, labels are quoted:
//
//   compartment c1 "cytosol"
//   entity e1 macromolecule "ERK" @c1 ui:ct:protein sv:P@Thr202
//   operator op1 and e1 e2
//   process p1 process e1 + e2 -> e3
//   modulation m1 catalysis op1 -> p1
//
// Blank lines and `#` comments are skipped. References must be declared
// before use.

#[derive(Debug)]
pub struct SbgntxtAdapter;

impl FormatAdapter for SbgntxtAdapter {
    fn format(&self) -> Format {
        Format::Sbgntxt
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

struct Token {
    text: String,
    quoted: bool,
}

fn tokenize(line: &str) -> Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some(escaped) => text.push(escaped),
                        None => return Err("dangling escape in quoted label".to_string()),
                    },
                    '"' => {
                        closed = true;
                        break;
                    }
                    other => text.push(other),
                }
            }
            if !closed {
                return Err("unterminated quoted label".to_string());
            }
            tokens.push(Token { text, quoted: true });
        } else {
            let mut text = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                text.push(c);
                chars.next();
            }
            tokens.push(Token {
                text,
                quoted: false,
            });
        }
    }
    Ok(tokens)
}

#[derive(Default)]
struct Parser {
    network: Network,
    compartment_ids: HashMap<String, String>,
    entity_ids: HashMap<String, String>,
    operator_ids: HashMap<String, String>,
    process_ids: HashMap<String, String>,
}

/// Parses a whole document into a network.
pub fn read_network(input: &str) -> Result<Network, ReadModelError> {
    let mut parser = Parser::default();
    for (index, raw) in input.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        parser.parse_line(line).map_err(|reason| {
            ReadModelError::with_message(format!("line {}: {reason}", index + 1))
        })?;
    }
    Ok(parser.network)
}

impl Parser {
    fn parse_line(&mut self, line: &str) -> Result<(), String> {
        let tokens = tokenize(line)?;
        let Some(kind) = tokens.first() else {
            return Ok(());
        };
        match kind.text.as_str() {
            "compartment" => self.parse_compartment(&tokens),
            "entity" => self.parse_entity(&tokens),
            "operator" => self.parse_operator(&tokens),
            "process" => self.parse_process(&tokens),
            "modulation" => self.parse_modulation(&tokens),
            other => Err(format!("unknown record kind: {other}")),
        }
    }

    fn parse_compartment(&mut self, tokens: &[Token]) -> Result<(), String> {
        let id = bare(tokens, 1, "compartment id")?;
        let label = match tokens.get(2) {
            None => None,
            Some(t) if t.quoted => Some(t.text.clone()),
            Some(t) => return Err(format!("unexpected token: {}", t.text)),
        };
        if tokens.len() > 3 {
            return Err("trailing tokens after compartment record".to_string());
        }
        let resolved = self.network.add_compartment(Compartment {
            id: id.clone(),
            label,
        });
        self.compartment_ids.insert(id, resolved);
        Ok(())
    }

    fn parse_entity(&mut self, tokens: &[Token]) -> Result<(), String> {
        let id = bare(tokens, 1, "entity id")?;
        let class: EntityClass = parse_class(tokens, 2, "entity class")?;

        let mut label = None;
        let mut compartment = None;
        let mut units_of_information = Vec::new();
        let mut state_variables = Vec::new();
        for token in &tokens[3..] {
            if token.quoted {
                if label.is_some() {
                    return Err("more than one label".to_string());
                }
                label = Some(token.text.clone());
            } else if let Some(comp) = token.text.strip_prefix('@') {
                let resolved = self
                    .compartment_ids
                    .get(comp)
                    .ok_or_else(|| format!("unknown compartment id: {comp}"))?;
                compartment = Some(resolved.clone());
            } else if let Some(ui) = token.text.strip_prefix("ui:") {
                units_of_information.push(parse_unit_of_information(ui));
            } else if let Some(sv) = token.text.strip_prefix("sv:") {
                state_variables.push(parse_state_variable(sv));
            } else {
                return Err(format!("unexpected token: {}", token.text));
            }
        }

        let resolved = self.network.add_entity(Entity {
            id: id.clone(),
            class,
            label,
            compartment,
            units_of_information,
            state_variables,
        });
        self.entity_ids.insert(id, resolved);
        Ok(())
    }

    fn parse_operator(&mut self, tokens: &[Token]) -> Result<(), String> {
        let id = bare(tokens, 1, "operator id")?;
        let class: OperatorClass = parse_class(tokens, 2, "operator class")?;
        let mut children = Vec::new();
        for token in &tokens[3..] {
            children.push(self.resolve_child(&token.text)?);
        }
        let resolved = self.network.add_operator(LogicalOperator {
            id: id.clone(),
            class,
            children,
        });
        self.operator_ids.insert(id, resolved);
        Ok(())
    }

    fn parse_process(&mut self, tokens: &[Token]) -> Result<(), String> {
        let id = bare(tokens, 1, "process id")?;
        let class: ProcessClass = parse_class(tokens, 2, "process class")?;

        let mut rest = &tokens[3..];
        let label = match rest.first() {
            Some(t) if t.quoted => {
                let label = Some(t.text.clone());
                rest = &rest[1..];
                label
            }
            _ => None,
        };

        let arrow = rest
            .iter()
            .position(|t| t.text == "->")
            .ok_or_else(|| "process record is missing ->".to_string())?;
        let reactants = self.resolve_side(&rest[..arrow])?;
        let products = self.resolve_side(&rest[arrow + 1..])?;

        let resolved = self.network.add_process(Process {
            id: id.clone(),
            class,
            label,
            reactants,
            products,
        });
        self.process_ids.insert(id, resolved);
        Ok(())
    }

    fn parse_modulation(&mut self, tokens: &[Token]) -> Result<(), String> {
        let id = bare(tokens, 1, "modulation id")?;
        let class: ModulationClass = parse_class(tokens, 2, "modulation class")?;
        let source_id = bare(tokens, 3, "modulation source")?;
        match tokens.get(4) {
            Some(t) if t.text == "->" => {}
            _ => return Err("modulation record is missing ->".to_string()),
        }
        let target_id = bare(tokens, 5, "modulation target")?;
        if tokens.len() > 6 {
            return Err("trailing tokens after modulation record".to_string());
        }

        let source = if let Some(entity) = self.entity_ids.get(&source_id) {
            ModulationSource::Entity(entity.clone())
        } else if let Some(operator) = self.operator_ids.get(&source_id) {
            ModulationSource::Operator(operator.clone())
        } else {
            return Err(format!("unknown modulation source: {source_id}"));
        };
        let target = self
            .process_ids
            .get(&target_id)
            .ok_or_else(|| format!("unknown process id: {target_id}"))?
            .clone();

        self.network.add_modulation(Modulation {
            id,
            class,
            source,
            target,
        });
        Ok(())
    }

    fn resolve_child(&self, id: &str) -> Result<OperatorChild, String> {
        if let Some(entity) = self.entity_ids.get(id) {
            Ok(OperatorChild::Entity(entity.clone()))
        } else if let Some(operator) = self.operator_ids.get(id) {
            Ok(OperatorChild::Operator(operator.clone()))
        } else {
            Err(format!("unknown operator child: {id}"))
        }
    }

    fn resolve_side(&self, tokens: &[Token]) -> Result<Vec<String>, String> {
        let mut ids = Vec::new();
        for token in tokens {
            if token.text == "+" {
                continue;
            }
            let resolved = self
                .entity_ids
                .get(&token.text)
                .ok_or_else(|| format!("unknown entity id: {}", token.text))?;
            ids.push(resolved.clone());
        }
        Ok(ids)
    }
}

fn bare(tokens: &[Token], index: usize, what: &str) -> Result<String, String> {
    match tokens.get(index) {
        Some(t) if !t.quoted => Ok(t.text.clone()),
        Some(_) => Err(format!("{what} must not be quoted")),
        None => Err(format!("missing {what}")),
    }
}

fn parse_class<T: std::str::FromStr>(tokens: &[Token], index: usize, what: &str) -> Result<T, String> {
    let raw = bare(tokens, index, what)?;
    raw.parse::<T>().map_err(|_| format!("unknown {what}: {raw}"))
}

fn parse_unit_of_information(raw: &str) -> UnitOfInformation {
    match raw.split_once(':') {
        Some((prefix, value)) => UnitOfInformation::new(Some(prefix), value),
        None => UnitOfInformation::new(None, raw),
    }
}

fn parse_state_variable(raw: &str) -> StateVariable {
    let (value, variable) = match raw.split_once('@') {
        Some((value, variable)) => (value, Some(variable)),
        None => (raw, None),
    };
    StateVariable {
        variable: variable.filter(|v| !v.is_empty()).map(String::from),
        value: (!value.is_empty()).then(|| value.to_string()),
    }
}

/// Renders a network in canonical order: compartments, entities, operators,
/// processes, modulations.
pub fn write_network(network: &Network, _options: &WriteOptions) -> Result<String, WriteModelError> {
    if let Some(problem) = network.validate().first() {
        return Err(WriteModelError::with_message(format!(
            "network is not well formed: {problem}"
        )));
    }

    let mut out = String::new();
    for c in &network.compartments {
        check_token("compartment id", &c.id)?;
        out.push_str("compartment ");
        out.push_str(&c.id);
        if let Some(label) = &c.label {
            out.push(' ');
            out.push_str(&quote(label));
        }
        out.push('\n');
    }
    for e in &network.entities {
        check_token("entity id", &e.id)?;
        out.push_str("entity ");
        out.push_str(&e.id);
        out.push(' ');
        out.push_str(e.class.as_ref());
        if let Some(label) = &e.label {
            out.push(' ');
            out.push_str(&quote(label));
        }
        if let Some(comp) = &e.compartment {
            out.push_str(" @");
            out.push_str(comp);
        }
        for ui in &e.units_of_information {
            let rendered = ui.to_string();
            check_token("unit of information", &rendered)?;
            out.push_str(" ui:");
            out.push_str(&rendered);
        }
        for sv in &e.state_variables {
            let rendered = render_state_variable(sv);
            check_token("state variable", &rendered)?;
            out.push_str(" sv:");
            out.push_str(&rendered);
        }
        out.push('\n');
    }
    for o in &network.operators {
        check_token("operator id", &o.id)?;
        out.push_str("operator ");
        out.push_str(&o.id);
        out.push(' ');
        out.push_str(o.class.as_ref());
        for child in &o.children {
            let id = match child {
                OperatorChild::Entity(id) | OperatorChild::Operator(id) => id,
            };
            out.push(' ');
            out.push_str(id);
        }
        out.push('\n');
    }
    for p in &network.processes {
        check_token("process id", &p.id)?;
        out.push_str("process ");
        out.push_str(&p.id);
        out.push(' ');
        out.push_str(p.class.as_ref());
        if let Some(label) = &p.label {
            out.push(' ');
            out.push_str(&quote(label));
        }
        for (i, r) in p.reactants.iter().enumerate() {
            out.push_str(if i == 0 { " " } else { " + " });
            out.push_str(r);
        }
        out.push_str(" ->");
        for (i, r) in p.products.iter().enumerate() {
            out.push_str(if i == 0 { " " } else { " + " });
            out.push_str(r);
        }
        out.push('\n');
    }
    for m in &network.modulations {
        check_token("modulation id", &m.id)?;
        let source = match &m.source {
            ModulationSource::Entity(id) | ModulationSource::Operator(id) => id,
        };
        out.push_str("modulation ");
        out.push_str(&m.id);
        out.push(' ');
        out.push_str(m.class.as_ref());
        out.push(' ');
        out.push_str(source);
        out.push_str(" -> ");
        out.push_str(&m.target);
        out.push('\n');
    }
    Ok(out)
}

fn render_state_variable(sv: &StateVariable) -> String {
    let mut out = sv.value.clone().unwrap_or_default();
    if let Some(variable) = &sv.variable {
        out.push('@');
        out.push_str(variable);
    }
    out
}

fn quote(label: &str) -> String {
    let mut out = String::with_capacity(label.len() + 2);
    out.push('"');
    for c in label.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

fn check_token(what: &str, value: &str) -> Result<(), WriteModelError> {
    if value.is_empty() || value.chars().any(|c| c.is_whitespace() || c == '"') {
        return Err(WriteModelError::with_message(format!(
            "{what} cannot be rendered as a token: {value:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::*;
    use crate::model::EntityClass;

    const SAMPLE: &str = r#"
# MAPK fragment
compartment c1 "cytosol"
entity erk macromolecule "ERK" @c1 sv:@Thr202
entity erk_p macromolecule "ERK" @c1 sv:P@Thr202
entity mek macromolecule "MEK" @c1
entity atp simple_chemical "ATP" @c1
process phos process erk + atp -> erk_p
modulation cat catalysis mek -> phos
"#;

    #[test]
    fn parses_a_small_document() {
        let net = read_network(SAMPLE).unwrap();
        assert_eq!(net.compartments.len(), 1);
        assert_eq!(net.entities.len(), 4);
        assert_eq!(net.processes.len(), 1);
        assert_eq!(net.modulations.len(), 1);
        assert!(net.validate().is_empty());

        let erk_p = net.get_entity("erk_p").unwrap();
        assert_eq!(erk_p.state_variables.len(), 1);
        assert_eq!(erk_p.state_variables[0].value.as_deref(), Some("P"));
        assert_eq!(erk_p.state_variables[0].variable.as_deref(), Some("Thr202"));
    }

    #[test]
    fn quoted_labels_keep_spaces_and_escapes() {
        let net = read_network(r#"entity e1 simple_chemical "a \"special\" chemical""#).unwrap();
        assert_eq!(
            net.get_entity("e1").unwrap().label.as_deref(),
            Some(r#"a "special" chemical"#)
        );
    }

    #[test]
    fn equivalent_entities_merge_and_references_follow() {
        let doc = "
entity a macromolecule \"ERK\"
entity b macromolecule \"ERK\"
entity c simple_chemical \"ATP\"
process p1 process b + c -> a
";
        let net = read_network(doc).unwrap();
        assert_eq!(net.entities.len(), 2);
        let process = net.get_process("p1").unwrap();
        assert!(process.reactants.contains(&"a".to_string()));
    }

    #[test]
    fn empty_reactant_side_parses() {
        let doc = "
entity src empty_set
entity prot macromolecule \"TP53\"
process p1 process src -> prot
process p2 process -> prot
";
        let net = read_network(doc).unwrap();
        assert_eq!(net.get_process("p2").unwrap().reactants.len(), 0);
        assert_eq!(net.get_entity("src").unwrap().class, EntityClass::EmptySet);
    }

    #[test]
    fn operators_nest() {
        let doc = "
entity a macromolecule \"A\"
entity b macromolecule \"B\"
operator n1 not b
operator a1 and a n1
process p1 process a -> b
modulation m1 stimulation a1 -> p1
";
        let net = read_network(doc).unwrap();
        assert_eq!(net.operators.len(), 2);
        assert!(net.validate().is_empty());
    }

    #[test]
    fn read_errors_carry_line_numbers() {
        let err = read_network("entity e1 macromolecule\nwhat is this").unwrap_err();
        assert!(err.message().unwrap().starts_with("line 2:"));
        assert!(err.message().unwrap().contains("unknown record kind"));

        let err = read_network("entity e1 not_a_class").unwrap_err();
        assert!(err.message().unwrap().contains("unknown entity class"));

        let err = read_network("process p1 process ghost ->").unwrap_err();
        assert!(err.message().unwrap().contains("unknown entity id: ghost"));

        let err = read_network("entity e1 macromolecule \"unterminated").unwrap_err();
        assert!(err.message().unwrap().contains("unterminated"));
    }

    #[test]
    fn round_trip_preserves_structure() {
        let net = read_network(SAMPLE).unwrap();
        let rendered = write_network(&net, &crate::types::WriteOptions::default()).unwrap();
        let reparsed = read_network(&rendered).unwrap();
        assert!(reparsed.equivalent(&net));
    }

    #[test]
    fn write_rejects_ids_that_cannot_be_tokens() {
        let mut net = Network::default();
        net.entities.push(crate::model::Entity::new(
            "has space",
            EntityClass::Macromolecule,
            Some("A"),
        ));
        let err = write_network(&net, &crate::types::WriteOptions::default()).unwrap_err();
        assert!(err.message().unwrap().contains("entity id"));
    }

    #[test]
    fn write_rejects_dangling_references() {
        let mut net = Network::default();
        net.processes.push(crate::model::Process {
            id: "p1".to_string(),
            class: crate::model::ProcessClass::Process,
            label: None,
            reactants: vec!["ghost".to_string()],
            products: vec![],
        });
        let err = write_network(&net, &crate::types::WriteOptions::default()).unwrap_err();
        assert!(err.message().unwrap().contains("not well formed"));
    }
}
