//! Tools the model can call.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The machine-readable description of a tool handed to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: Value,
}

/// What a tool knows about the turn it is called from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolContext {
    /// Anchor for relative dates such as "tomorrow".
    pub today: NaiveDate,
}

impl ToolContext {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Context anchored on the local calendar date.
    pub fn now() -> Self {
        Self::new(Local::now().date_naive())
    }
}

/// A capability the model may invoke.
///
/// `call` never fails: validation problems and backend failures are reported
/// inside the returned value so the model can react to them on its next turn.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn parameters_schema(&self) -> Value;

    /// Execute the tool with the raw JSON arguments produced by the model.
    async fn call(&self, ctx: &ToolContext, arguments: &str) -> Value;

    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters_schema(),
        }
    }
}
