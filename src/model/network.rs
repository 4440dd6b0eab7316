use std::collections::HashMap;

use crate::model::{
    Compartment, Entity, EntityClass, LogicalOperator, Modulation, ModulationClass,
    ModulationSource, OperatorChild, Process,
};

/// An SBGN process description network.
///
/// Nodes reference each other by id. Additions deduplicate structurally:
/// adding a node equivalent to an existing one (same fields, ids aside)
/// resolves to the existing node's id instead of inserting a duplicate.
#[derive(Debug, Clone, Default)]
pub struct Network {
    pub compartments: Vec<Compartment>,
    pub entities: Vec<Entity>,
    pub operators: Vec<LogicalOperator>,
    pub processes: Vec<Process>,
    pub modulations: Vec<Modulation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RefKind {
    Compartment,
    Entity,
    Operator,
    Process,
}

type IdMap = HashMap<(RefKind, String), String>;

impl Network {
    pub fn is_empty(&self) -> bool {
        self.compartments.is_empty()
            && self.entities.is_empty()
            && self.operators.is_empty()
            && self.processes.is_empty()
            && self.modulations.is_empty()
    }

    // ──────────────────── lookups ────────────────────

    pub fn get_compartment(&self, id: &str) -> Option<&Compartment> {
        self.compartments.iter().find(|c| c.id == id)
    }

    pub fn get_entity(&self, id: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_operator(&self, id: &str) -> Option<&LogicalOperator> {
        self.operators.iter().find(|o| o.id == id)
    }

    pub fn get_process(&self, id: &str) -> Option<&Process> {
        self.processes.iter().find(|p| p.id == id)
    }

    pub fn get_modulation(&self, id: &str) -> Option<&Modulation> {
        self.modulations.iter().find(|m| m.id == id)
    }

    pub fn get_entity_by_label(&self, label: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.label.as_deref() == Some(label))
    }

    pub fn get_compartment_by_label(&self, label: &str) -> Option<&Compartment> {
        self.compartments
            .iter()
            .find(|c| c.label.as_deref() == Some(label))
    }

    pub fn get_process_by_label(&self, label: &str) -> Option<&Process> {
        self.processes
            .iter()
            .find(|p| p.label.as_deref() == Some(label))
    }

    // ──────────────────── additions ────────────────────

    /// Adds a compartment, returning the id it resolved to.
    pub fn add_compartment(&mut self, compartment: Compartment) -> String {
        let sig = self.compartment_signature(&compartment);
        if let Some(existing) = self
            .compartments
            .iter()
            .find(|c| self.compartment_signature(c) == sig)
        {
            return existing.id.clone();
        }
        let mut compartment = compartment;
        compartment.id = self.fresh_id(&compartment.id);
        let id = compartment.id.clone();
        self.compartments.push(compartment);
        id
    }

    /// Adds an entity, returning the id it resolved to. The compartment
    /// reference, if any, must already be valid in this network.
    pub fn add_entity(&mut self, entity: Entity) -> String {
        let sig = self.entity_signature(&entity);
        if let Some(existing) = self
            .entities
            .iter()
            .find(|e| self.entity_signature(e) == sig)
        {
            return existing.id.clone();
        }
        let mut entity = entity;
        entity.id = self.fresh_id(&entity.id);
        let id = entity.id.clone();
        self.entities.push(entity);
        id
    }

    /// Adds a logical operator, returning the id it resolved to. Children
    /// must already be valid in this network.
    pub fn add_operator(&mut self, operator: LogicalOperator) -> String {
        let sig = self.operator_signature(&operator);
        if let Some(existing) = self
            .operators
            .iter()
            .find(|o| self.operator_signature(o) == sig)
        {
            return existing.id.clone();
        }
        let mut operator = operator;
        operator.id = self.fresh_id(&operator.id);
        let id = operator.id.clone();
        self.operators.push(operator);
        id
    }

    /// Adds a process, returning the id it resolved to. Reactant and product
    /// references must already be valid in this network.
    pub fn add_process(&mut self, process: Process) -> String {
        let sig = self.process_signature(&process);
        if let Some(existing) = self
            .processes
            .iter()
            .find(|p| self.process_signature(p) == sig)
        {
            return existing.id.clone();
        }
        let mut process = process;
        process.id = self.fresh_id(&process.id);
        let id = process.id.clone();
        self.processes.push(process);
        id
    }

    /// Adds a modulation, returning the id it resolved to. Source and target
    /// references must already be valid in this network.
    pub fn add_modulation(&mut self, modulation: Modulation) -> String {
        let sig = self.modulation_signature(&modulation);
        if let Some(existing) = self
            .modulations
            .iter()
            .find(|m| self.modulation_signature(m) == sig)
        {
            return existing.id.clone();
        }
        let mut modulation = modulation;
        modulation.id = self.fresh_id(&modulation.id);
        let id = modulation.id.clone();
        self.modulations.push(modulation);
        id
    }

    // ──────────────────── removals ────────────────────

    /// Removes an entity and everything that depends on it: processes that
    /// consume or produce it, modulations sourced from it, and its slots in
    /// operator children.
    pub fn remove_entity(&mut self, id: &str) {
        let dependent_processes: Vec<String> = self
            .processes
            .iter()
            .filter(|p| p.reactants.iter().any(|r| r == id) || p.products.iter().any(|r| r == id))
            .map(|p| p.id.clone())
            .collect();
        for pid in dependent_processes {
            self.remove_process(&pid);
        }
        let dependent_modulations: Vec<String> = self
            .modulations
            .iter()
            .filter(|m| matches!(&m.source, ModulationSource::Entity(e) if e == id))
            .map(|m| m.id.clone())
            .collect();
        for mid in dependent_modulations {
            self.remove_modulation(&mid);
        }
        for op in &mut self.operators {
            op.children
                .retain(|c| !matches!(c, OperatorChild::Entity(e) if e == id));
        }
        self.entities.retain(|e| e.id != id);
    }

    /// Removes a process and the modulations targeting it.
    pub fn remove_process(&mut self, id: &str) {
        let dependent_modulations: Vec<String> = self
            .modulations
            .iter()
            .filter(|m| m.target == id)
            .map(|m| m.id.clone())
            .collect();
        for mid in dependent_modulations {
            self.remove_modulation(&mid);
        }
        self.processes.retain(|p| p.id != id);
    }

    /// Removes a modulation; an operator serving only as its source goes with
    /// it.
    pub fn remove_modulation(&mut self, id: &str) {
        let source_operator = self.get_modulation(id).and_then(|m| match &m.source {
            ModulationSource::Operator(op) => Some(op.clone()),
            ModulationSource::Entity(_) => None,
        });
        self.modulations.retain(|m| m.id != id);
        if let Some(op_id) = source_operator {
            let still_used = self
                .modulations
                .iter()
                .any(|m| matches!(&m.source, ModulationSource::Operator(o) if *o == op_id));
            if !still_used {
                self.remove_operator(&op_id);
            }
        }
    }

    /// Removes an operator, its nested child operators, and modulations
    /// sourced from it.
    pub fn remove_operator(&mut self, id: &str) {
        let child_operators: Vec<String> = self
            .get_operator(id)
            .map(|op| {
                op.children
                    .iter()
                    .filter_map(|c| match c {
                        OperatorChild::Operator(o) => Some(o.clone()),
                        OperatorChild::Entity(_) => None,
                    })
                    .collect()
            })
            .unwrap_or_default();
        let dependent_modulations: Vec<String> = self
            .modulations
            .iter()
            .filter(|m| matches!(&m.source, ModulationSource::Operator(o) if o == id))
            .map(|m| m.id.clone())
            .collect();
        self.operators.retain(|o| o.id != id);
        for op in &mut self.operators {
            op.children
                .retain(|c| !matches!(c, OperatorChild::Operator(o) if o == id));
        }
        for mid in dependent_modulations {
            self.modulations.retain(|m| m.id != mid);
        }
        for child in child_operators {
            self.remove_operator(&child);
        }
    }

    /// Removes a compartment, detaching the entities inside it.
    pub fn remove_compartment(&mut self, id: &str) {
        self.compartments.retain(|c| c.id != id);
        for entity in &mut self.entities {
            if entity.compartment.as_deref() == Some(id) {
                entity.compartment = None;
            }
        }
    }

    // ──────────────────── derived views ────────────────────

    /// Processes reading as transcriptions: empty set to an mRNA-tagged
    /// nucleic acid feature, necessarily stimulated by a gene-tagged one.
    pub fn transcriptions(&self) -> Vec<&Process> {
        self.processes
            .iter()
            .filter(|p| self.is_transcription(p))
            .collect()
    }

    /// Processes reading as translations: empty set to a macromolecule,
    /// necessarily stimulated by an mRNA-tagged nucleic acid feature.
    pub fn translations(&self) -> Vec<&Process> {
        self.processes
            .iter()
            .filter(|p| self.is_translation(p))
            .collect()
    }

    fn is_transcription(&self, process: &Process) -> bool {
        let Some(reactant) = process.reactants.first().and_then(|id| self.get_entity(id)) else {
            return false;
        };
        let Some(product) = process.products.first().and_then(|id| self.get_entity(id)) else {
            return false;
        };
        reactant.class == EntityClass::EmptySet
            && product.class == EntityClass::NucleicAcidFeature
            && product.has_unit_of_information("ct", "mRNA")
            && self.modulations.iter().any(|m| {
                m.target == process.id
                    && m.class == ModulationClass::NecessaryStimulation
                    && self.source_is_tagged_nucleic_acid(&m.source, "gene")
            })
    }

    fn is_translation(&self, process: &Process) -> bool {
        let Some(reactant) = process.reactants.first().and_then(|id| self.get_entity(id)) else {
            return false;
        };
        let Some(product) = process.products.first().and_then(|id| self.get_entity(id)) else {
            return false;
        };
        reactant.class == EntityClass::EmptySet
            && product.class == EntityClass::Macromolecule
            && self.modulations.iter().any(|m| {
                m.target == process.id
                    && m.class == ModulationClass::NecessaryStimulation
                    && self.source_is_tagged_nucleic_acid(&m.source, "mRNA")
            })
    }

    fn source_is_tagged_nucleic_acid(&self, source: &ModulationSource, tag: &str) -> bool {
        matches!(source, ModulationSource::Entity(eid) if self
            .get_entity(eid)
            .is_some_and(|e| e.class == EntityClass::NucleicAcidFeature
                && e.has_unit_of_information("ct", tag)))
    }

    /// Collapses transcription/translation pairs into direct regulation of
    /// the translation: gene entities and transcription processes are
    /// dropped, the transcription's other modulations are retargeted onto the
    /// translation of the matching mRNA, and the intermediate mRNA entities
    /// are dropped.
    pub fn simplify_gene_expressions(&mut self) {
        let transcription_ids: Vec<String> = self
            .transcriptions()
            .iter()
            .map(|p| p.id.clone())
            .collect();

        // mRNA product id -> modulations to retarget onto its translation
        let mut carried: Vec<(String, Vec<Modulation>)> = Vec::new();

        for tid in transcription_ids {
            let Some(process) = self.get_process(&tid) else {
                continue;
            };
            let mrna_id = process.products.first().cloned();

            let mut gene_ids = Vec::new();
            let mut carry = Vec::new();
            for m in self.modulations.iter().filter(|m| m.target == tid) {
                if self.source_is_tagged_nucleic_acid(&m.source, "gene") {
                    if let ModulationSource::Entity(eid) = &m.source {
                        gene_ids.push(eid.clone());
                    }
                } else {
                    carry.push(m.clone());
                }
            }

            for gid in gene_ids {
                self.remove_entity(&gid);
            }
            self.remove_process(&tid);
            if let Some(mrna_id) = mrna_id {
                carried.push((mrna_id, carry));
            }
        }

        let translation_ids: Vec<String> =
            self.translations().iter().map(|p| p.id.clone()).collect();

        for ttid in translation_ids {
            let mrna_sources: Vec<String> = self
                .modulations
                .iter()
                .filter(|m| m.target == ttid)
                .filter_map(|m| match &m.source {
                    ModulationSource::Entity(eid)
                        if self.source_is_tagged_nucleic_acid(&m.source, "mRNA") =>
                    {
                        Some(eid.clone())
                    }
                    _ => None,
                })
                .collect();

            for mrna_id in mrna_sources {
                for (product_id, mods) in &carried {
                    if *product_id == mrna_id {
                        for m in mods.clone() {
                            let mut retargeted = m;
                            retargeted.target = ttid.clone();
                            self.add_modulation(retargeted);
                        }
                    }
                }
                self.remove_entity(&mrna_id);
            }
        }
    }

    // ──────────────────── set algebra ────────────────────

    /// Structural union: every node of both networks, deduplicated.
    pub fn union(&self, other: &Network) -> Network {
        let mut out = Network::default();
        for src in [self, other] {
            let mut map = IdMap::new();
            for c in &src.compartments {
                import_compartment(&mut out, src, &c.id, &mut map);
            }
            for e in &src.entities {
                import_entity(&mut out, src, &e.id, &mut map);
            }
            for o in &src.operators {
                import_operator(&mut out, src, &o.id, &mut map);
            }
            for p in &src.processes {
                import_process(&mut out, src, &p.id, &mut map);
            }
            for m in &src.modulations {
                import_modulation(&mut out, src, &m.id, &mut map);
            }
        }
        out
    }

    /// Structural intersection: nodes of `self` with an equivalent in
    /// `other`.
    pub fn intersection(&self, other: &Network) -> Network {
        let mut out = Network::default();
        let mut map = IdMap::new();
        for e in &self.entities {
            if other.contains_entity_signature(&self.entity_signature(e)) {
                import_entity(&mut out, self, &e.id, &mut map);
            }
        }
        for p in &self.processes {
            if other.contains_process_signature(&self.process_signature(p)) {
                import_process(&mut out, self, &p.id, &mut map);
            }
        }
        for m in &self.modulations {
            if other.contains_modulation_signature(&self.modulation_signature(m)) {
                import_modulation(&mut out, self, &m.id, &mut map);
            }
        }
        for c in &self.compartments {
            if other.contains_compartment_signature(&self.compartment_signature(c)) {
                import_compartment(&mut out, self, &c.id, &mut map);
            }
        }
        for o in &self.operators {
            if other.contains_operator_signature(&self.operator_signature(o)) {
                import_operator(&mut out, self, &o.id, &mut map);
            }
        }
        out
    }

    /// Structural difference: nodes of `self` with no equivalent in `other`,
    /// plus whatever those nodes need to stay well formed.
    pub fn difference(&self, other: &Network) -> Network {
        let mut out = Network::default();
        let mut map = IdMap::new();
        for m in &self.modulations {
            if !other.contains_modulation_signature(&self.modulation_signature(m)) {
                import_modulation(&mut out, self, &m.id, &mut map);
            }
        }
        for p in &self.processes {
            if !other.contains_process_signature(&self.process_signature(p)) {
                import_process(&mut out, self, &p.id, &mut map);
            }
        }
        for e in &self.entities {
            if !other.contains_entity_signature(&self.entity_signature(e)) {
                import_entity(&mut out, self, &e.id, &mut map);
            }
        }
        for c in &self.compartments {
            if !other.contains_compartment_signature(&self.compartment_signature(c)) {
                import_compartment(&mut out, self, &c.id, &mut map);
            }
        }
        out
    }

    /// Structural equality, ids aside.
    pub fn equivalent(&self, other: &Network) -> bool {
        self.sorted_signatures() == other.sorted_signatures()
    }

    fn sorted_signatures(&self) -> Vec<Vec<String>> {
        let mut compartments: Vec<String> = self
            .compartments
            .iter()
            .map(|c| self.compartment_signature(c))
            .collect();
        let mut entities: Vec<String> = self
            .entities
            .iter()
            .map(|e| self.entity_signature(e))
            .collect();
        let mut operators: Vec<String> = self
            .operators
            .iter()
            .map(|o| self.operator_signature(o))
            .collect();
        let mut processes: Vec<String> = self
            .processes
            .iter()
            .map(|p| self.process_signature(p))
            .collect();
        let mut modulations: Vec<String> = self
            .modulations
            .iter()
            .map(|m| self.modulation_signature(m))
            .collect();
        compartments.sort();
        entities.sort();
        operators.sort();
        processes.sort();
        modulations.sort();
        vec![compartments, entities, operators, processes, modulations]
    }

    // ──────────────────── id renewal & validation ────────────────────

    /// Reassigns canonical sequential ids per node kind and rewrites every
    /// reference consistently.
    pub fn renew_ids(&mut self) {
        let compartment_map: HashMap<String, String> = self
            .compartments
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), format!("c{}", i + 1)))
            .collect();
        let entity_map: HashMap<String, String> = self
            .entities
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), format!("e{}", i + 1)))
            .collect();
        let operator_map: HashMap<String, String> = self
            .operators
            .iter()
            .enumerate()
            .map(|(i, o)| (o.id.clone(), format!("op{}", i + 1)))
            .collect();
        let process_map: HashMap<String, String> = self
            .processes
            .iter()
            .enumerate()
            .map(|(i, p)| (p.id.clone(), format!("p{}", i + 1)))
            .collect();

        let remap = |map: &HashMap<String, String>, id: &mut String| {
            if let Some(new_id) = map.get(id.as_str()) {
                *id = new_id.clone();
            }
        };

        for c in &mut self.compartments {
            remap(&compartment_map, &mut c.id);
        }
        for e in &mut self.entities {
            remap(&entity_map, &mut e.id);
            if let Some(comp) = &mut e.compartment {
                remap(&compartment_map, comp);
            }
        }
        for o in &mut self.operators {
            remap(&operator_map, &mut o.id);
            for child in &mut o.children {
                match child {
                    OperatorChild::Entity(id) => remap(&entity_map, id),
                    OperatorChild::Operator(id) => remap(&operator_map, id),
                }
            }
        }
        for p in &mut self.processes {
            remap(&process_map, &mut p.id);
            for r in &mut p.reactants {
                remap(&entity_map, r);
            }
            for r in &mut p.products {
                remap(&entity_map, r);
            }
        }
        for (i, m) in self.modulations.iter_mut().enumerate() {
            m.id = format!("m{}", i + 1);
            match &mut m.source {
                ModulationSource::Entity(id) => remap(&entity_map, id),
                ModulationSource::Operator(id) => remap(&operator_map, id),
            }
            remap(&process_map, &mut m.target);
        }

        tracing::debug!(
            compartments = self.compartments.len(),
            entities = self.entities.len(),
            operators = self.operators.len(),
            processes = self.processes.len(),
            modulations = self.modulations.len(),
            "renewed network ids"
        );
    }

    /// Referential integrity check. Returns one description per problem;
    /// empty means the network is well formed.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        let mut seen = std::collections::HashSet::new();
        for id in self
            .compartments
            .iter()
            .map(|c| &c.id)
            .chain(self.entities.iter().map(|e| &e.id))
            .chain(self.operators.iter().map(|o| &o.id))
            .chain(self.processes.iter().map(|p| &p.id))
            .chain(self.modulations.iter().map(|m| &m.id))
        {
            if !seen.insert(id) {
                problems.push(format!("duplicate id: {id}"));
            }
        }

        for e in &self.entities {
            if let Some(comp) = &e.compartment {
                if self.get_compartment(comp).is_none() {
                    problems.push(format!("entity {} references unknown compartment {comp}", e.id));
                }
            }
        }
        for o in &self.operators {
            for child in &o.children {
                match child {
                    OperatorChild::Entity(id) if self.get_entity(id).is_none() => {
                        problems.push(format!("operator {} references unknown entity {id}", o.id));
                    }
                    OperatorChild::Operator(id) if self.get_operator(id).is_none() => {
                        problems.push(format!("operator {} references unknown operator {id}", o.id));
                    }
                    _ => {}
                }
            }
        }
        for p in &self.processes {
            for id in p.reactants.iter().chain(&p.products) {
                if self.get_entity(id).is_none() {
                    problems.push(format!("process {} references unknown entity {id}", p.id));
                }
            }
        }
        for m in &self.modulations {
            match &m.source {
                ModulationSource::Entity(id) if self.get_entity(id).is_none() => {
                    problems.push(format!("modulation {} references unknown entity {id}", m.id));
                }
                ModulationSource::Operator(id) if self.get_operator(id).is_none() => {
                    problems.push(format!("modulation {} references unknown operator {id}", m.id));
                }
                _ => {}
            }
            if self.get_process(&m.target).is_none() {
                problems.push(format!(
                    "modulation {} references unknown process {}",
                    m.id, m.target
                ));
            }
        }

        problems
    }

    // ──────────────────── structural signatures ────────────────────
    //
    // A signature renders a node with every reference resolved to the
    // referenced node's own signature, so two nodes compare equal exactly
    // when they are structurally equivalent regardless of ids.

    fn compartment_signature(&self, c: &Compartment) -> String {
        format!("compartment|{:?}", c.label)
    }

    fn entity_signature(&self, e: &Entity) -> String {
        let compartment = match &e.compartment {
            None => "-".to_string(),
            Some(id) => self
                .get_compartment(id)
                .map_or_else(|| format!("?{id}"), |c| format!("{:?}", c.label)),
        };
        let mut uis = e.units_of_information.clone();
        uis.sort();
        let mut svs = e.state_variables.clone();
        svs.sort();
        format!(
            "entity|{}|{:?}|{compartment}|{uis:?}|{svs:?}",
            e.class, e.label
        )
    }

    fn operator_signature(&self, o: &LogicalOperator) -> String {
        let mut stack = Vec::new();
        self.operator_signature_inner(o, &mut stack)
    }

    fn operator_signature_inner(&self, o: &LogicalOperator, stack: &mut Vec<String>) -> String {
        if stack.contains(&o.id) {
            return format!("operator-cycle|{}", o.id);
        }
        stack.push(o.id.clone());
        let mut children: Vec<String> = o
            .children
            .iter()
            .map(|child| match child {
                OperatorChild::Entity(id) => self
                    .get_entity(id)
                    .map_or_else(|| format!("?{id}"), |e| self.entity_signature(e)),
                OperatorChild::Operator(id) => self
                    .get_operator(id)
                    .map_or_else(|| format!("?{id}"), |op| {
                        self.operator_signature_inner(op, stack)
                    }),
            })
            .collect();
        stack.pop();
        children.sort();
        format!("operator|{}|{children:?}", o.class)
    }

    fn process_signature(&self, p: &Process) -> String {
        let resolve = |ids: &[String]| -> Vec<String> {
            let mut sigs: Vec<String> = ids
                .iter()
                .map(|id| {
                    self.get_entity(id)
                        .map_or_else(|| format!("?{id}"), |e| self.entity_signature(e))
                })
                .collect();
            sigs.sort();
            sigs
        };
        format!(
            "process|{}|{:?}|{:?}|{:?}",
            p.class,
            p.label,
            resolve(&p.reactants),
            resolve(&p.products)
        )
    }

    fn modulation_signature(&self, m: &Modulation) -> String {
        let source = match &m.source {
            ModulationSource::Entity(id) => self
                .get_entity(id)
                .map_or_else(|| format!("?{id}"), |e| self.entity_signature(e)),
            ModulationSource::Operator(id) => self
                .get_operator(id)
                .map_or_else(|| format!("?{id}"), |o| self.operator_signature(o)),
        };
        let target = self
            .get_process(&m.target)
            .map_or_else(|| format!("?{}", m.target), |p| self.process_signature(p));
        format!("modulation|{}|{source}|{target}", m.class)
    }

    fn contains_compartment_signature(&self, sig: &str) -> bool {
        self.compartments
            .iter()
            .any(|c| self.compartment_signature(c) == sig)
    }

    fn contains_entity_signature(&self, sig: &str) -> bool {
        self.entities.iter().any(|e| self.entity_signature(e) == sig)
    }

    fn contains_operator_signature(&self, sig: &str) -> bool {
        self.operators
            .iter()
            .any(|o| self.operator_signature(o) == sig)
    }

    fn contains_process_signature(&self, sig: &str) -> bool {
        self.processes
            .iter()
            .any(|p| self.process_signature(p) == sig)
    }

    fn contains_modulation_signature(&self, sig: &str) -> bool {
        self.modulations
            .iter()
            .any(|m| self.modulation_signature(m) == sig)
    }

    fn id_taken(&self, id: &str) -> bool {
        self.get_compartment(id).is_some()
            || self.get_entity(id).is_some()
            || self.get_operator(id).is_some()
            || self.get_process(id).is_some()
            || self.get_modulation(id).is_some()
    }

    fn fresh_id(&self, base: &str) -> String {
        if !self.id_taken(base) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}_{n}");
            if !self.id_taken(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

// Import helpers pull a node from `src` into `out`, recursively importing
// whatever it references first. `map` caches src-id to out-id resolutions so
// shared dependencies import once.

fn import_compartment(out: &mut Network, src: &Network, id: &str, map: &mut IdMap) -> Option<String> {
    let key = (RefKind::Compartment, id.to_string());
    if let Some(mapped) = map.get(&key) {
        return Some(mapped.clone());
    }
    let compartment = src.get_compartment(id)?.clone();
    let new_id = out.add_compartment(compartment);
    map.insert(key, new_id.clone());
    Some(new_id)
}

fn import_entity(out: &mut Network, src: &Network, id: &str, map: &mut IdMap) -> Option<String> {
    let key = (RefKind::Entity, id.to_string());
    if let Some(mapped) = map.get(&key) {
        return Some(mapped.clone());
    }
    let mut entity = src.get_entity(id)?.clone();
    if let Some(comp) = entity.compartment.take() {
        entity.compartment = import_compartment(out, src, &comp, map);
    }
    let new_id = out.add_entity(entity);
    map.insert(key, new_id.clone());
    Some(new_id)
}

fn import_operator(out: &mut Network, src: &Network, id: &str, map: &mut IdMap) -> Option<String> {
    let key = (RefKind::Operator, id.to_string());
    if let Some(mapped) = map.get(&key) {
        return Some(mapped.clone());
    }
    let mut operator = src.get_operator(id)?.clone();
    let mut children = Vec::with_capacity(operator.children.len());
    for child in operator.children {
        match child {
            OperatorChild::Entity(eid) => {
                if let Some(new_id) = import_entity(out, src, &eid, map) {
                    children.push(OperatorChild::Entity(new_id));
                }
            }
            OperatorChild::Operator(oid) => {
                if let Some(new_id) = import_operator(out, src, &oid, map) {
                    children.push(OperatorChild::Operator(new_id));
                }
            }
        }
    }
    operator.children = children;
    let new_id = out.add_operator(operator);
    map.insert(key, new_id.clone());
    Some(new_id)
}

fn import_process(out: &mut Network, src: &Network, id: &str, map: &mut IdMap) -> Option<String> {
    let key = (RefKind::Process, id.to_string());
    if let Some(mapped) = map.get(&key) {
        return Some(mapped.clone());
    }
    let mut process = src.get_process(id)?.clone();
    process.reactants = process
        .reactants
        .iter()
        .filter_map(|eid| import_entity(out, src, eid, map))
        .collect();
    process.products = process
        .products
        .iter()
        .filter_map(|eid| import_entity(out, src, eid, map))
        .collect();
    let new_id = out.add_process(process);
    map.insert(key, new_id.clone());
    Some(new_id)
}

fn import_modulation(out: &mut Network, src: &Network, id: &str, map: &mut IdMap) -> Option<String> {
    let mut modulation = src.get_modulation(id)?.clone();
    modulation.source = match modulation.source {
        ModulationSource::Entity(eid) => ModulationSource::Entity(import_entity(out, src, &eid, map)?),
        ModulationSource::Operator(oid) => {
            ModulationSource::Operator(import_operator(out, src, &oid, map)?)
        }
    };
    modulation.target = import_process(out, src, &modulation.target, map)?;
    Some(out.add_modulation(modulation))
}
