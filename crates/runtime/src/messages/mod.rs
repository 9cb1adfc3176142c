//! Admin network messages handled by the runtime.
mod variable_viewer;

pub use variable_viewer::{
    ChangeVariableRequest, ListModification, MessageError, MessageSender, VariableEditor,
};
