//! Variable viewer: admins editing live values by page id.
//!
//! Requests travel as bincode-encoded [`ChangeVariableRequest`]s. Only senders
//! flagged as admins get their change through to the [`VariableEditor`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use bureau_core::{BureauError, ErrorSeverity};

/// How a change applies when the target is a list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListModification {
    /// Replace the value itself.
    #[default]
    None,
    Add,
    Remove,
}

/// Client request to change one variable shown in the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeVariableRequest {
    pub page_id: u64,
    pub new_value: String,
    pub is_new_bookshelf: bool,
    /// Mirror the new value back to the requesting client.
    pub send_to_client: bool,
    pub list_modification: ListModification,
}

/// Who sent a request, as seen by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSender {
    pub username: String,
    pub account_id: String,
    pub is_admin: bool,
}

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("{username} is not an admin")]
    NotAdmin { username: String },

    #[error("malformed message")]
    Codec(#[from] bincode::Error),
}

impl BureauError for MessageError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            MessageError::NotAdmin { .. } => "not_admin",
            MessageError::Codec(_) => "codec",
        }
    }
}

/// Server-side store the viewer edits.
pub trait VariableEditor {
    fn request_change(
        &mut self,
        page_id: u64,
        new_value: &str,
        send_to_client: bool,
        requester: &MessageSender,
        list_modification: ListModification,
    );
}

impl ChangeVariableRequest {
    pub fn new(page_id: u64, new_value: impl Into<String>, send_to_client: bool) -> Self {
        Self {
            page_id,
            new_value: new_value.into(),
            is_new_bookshelf: false,
            send_to_client,
            list_modification: ListModification::None,
        }
    }

    pub fn with_list_modification(mut self, list_modification: ListModification) -> Self {
        self.list_modification = list_modification;
        self
    }

    pub fn encode(&self) -> Result<Vec<u8>, MessageError> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Forwards the change to `editor` if `sender` is an admin.
    pub fn process(
        &self,
        sender: &MessageSender,
        editor: &mut impl VariableEditor,
    ) -> Result<(), MessageError> {
        if !sender.is_admin {
            debug!(
                username = %sender.username,
                page_id = self.page_id,
                "non-admin variable change ignored"
            );
            return Err(MessageError::NotAdmin {
                username: sender.username.clone(),
            });
        }

        editor.request_change(
            self.page_id,
            &self.new_value,
            self.send_to_client,
            sender,
            self.list_modification,
        );

        info!(
            target: "admin",
            "Admin {} changed variable {} (in VV) with a new value of: {}",
            sender.username,
            self.page_id,
            self.new_value
        );
        Ok(())
    }
}
