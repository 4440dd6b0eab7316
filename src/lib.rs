#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod convert;
pub mod error;
pub mod formats;
pub mod model;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use convert::adapters::{adapter_for, FormatAdapter};
pub use convert::ConvertEngine;
pub use error::{Error, ReadModelError, RemoteCause, WriteModelError, ERROR_PAYLOAD_VERSION};
pub use formats::{capabilities, Format, FormatCapability};
pub use model::network::Network;
pub use model::{
    Compartment, Entity, EntityClass, LogicalOperator, Modulation, ModulationClass,
    ModulationSource, OperatorChild, OperatorClass, Process, ProcessClass, StateVariable,
    UnitOfInformation,
};
pub use types::{ConvertOptions, RawDocument, WriteOptions};
