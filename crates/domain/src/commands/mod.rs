pub mod inventory_commands;

pub use inventory_commands::{
    RecordAcquisitionCommand, RecordConsumptionCommand, RecordCorrectionCommand,
};
