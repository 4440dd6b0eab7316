pub mod network;

use serde::{Deserialize, Serialize};

/// Entity pool node classes of the process description language.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EntityClass {
    UnspecifiedEntity,
    SimpleChemical,
    Macromolecule,
    NucleicAcidFeature,
    Complex,
    EmptySet,
    PerturbingAgent,
}

/// Process node classes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProcessClass {
    Process,
    Association,
    Dissociation,
    Omitted,
    Uncertain,
}

/// Modulation arc classes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ModulationClass {
    Modulation,
    Stimulation,
    Catalysis,
    Inhibition,
    NecessaryStimulation,
}

/// Logical operator classes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OperatorClass {
    And,
    Or,
    Not,
    Delay,
}

/// A unit of information decoration, e.g. `ct:mRNA` or a bare `receptor`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitOfInformation {
    #[serde(default)]
    pub prefix: Option<String>,
    pub value: String,
}

impl UnitOfInformation {
    pub fn new(prefix: Option<&str>, value: &str) -> Self {
        Self {
            prefix: prefix.map(String::from),
            value: value.to_string(),
        }
    }
}

impl std::fmt::Display for UnitOfInformation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.value),
            None => f.write_str(&self.value),
        }
    }
}

/// A state variable decoration, e.g. `P@Thr202` or an unset site.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateVariable {
    #[serde(default)]
    pub variable: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// An entity pool node. `compartment` refers to a [`Compartment`] id within
/// the same network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    pub class: EntityClass,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub compartment: Option<String>,
    #[serde(default)]
    pub units_of_information: Vec<UnitOfInformation>,
    #[serde(default)]
    pub state_variables: Vec<StateVariable>,
}

impl Entity {
    pub fn new(id: &str, class: EntityClass, label: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            class,
            label: label.map(String::from),
            compartment: None,
            units_of_information: Vec::new(),
            state_variables: Vec::new(),
        }
    }

    pub fn has_unit_of_information(&self, prefix: &str, value: &str) -> bool {
        self.units_of_information
            .iter()
            .any(|ui| ui.prefix.as_deref() == Some(prefix) && ui.value == value)
    }
}

/// A compartment node entities may live in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Compartment {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// A process node; `reactants` and `products` refer to [`Entity`] ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Process {
    pub id: String,
    pub class: ProcessClass,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub reactants: Vec<String>,
    #[serde(default)]
    pub products: Vec<String>,
}

/// A child slot of a logical operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorChild {
    Entity(String),
    Operator(String),
}

/// A logical operator node combining entities (or nested operators) into one
/// modulation source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalOperator {
    pub id: String,
    pub class: OperatorClass,
    #[serde(default)]
    pub children: Vec<OperatorChild>,
}

/// The source end of a modulation arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModulationSource {
    Entity(String),
    Operator(String),
}

/// A modulation arc from an entity or operator onto a process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Modulation {
    pub id: String,
    pub class: ModulationClass,
    pub source: ModulationSource,
    /// Target [`Process`] id.
    pub target: String,
}
