//! The tool-call descriptor carried by the `PreActing` hook event.
//!
//! This is deliberately narrow: the core does not execute tools or know
//! their result shapes, it only needs a typed, mutable representation of
//! "the agent is about to call this tool with this input" so that hooks can
//! inspect or abort the call before it happens.

use crate::identifiers::ToolId;
use serde::{Deserialize, Serialize};

/// Standard tool types for strongly-typed dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardTool {
    HttpGet,
    HttpPost,
    FileRead,
    FileWrite,
    JsonParse,
    TextSearch,
}

impl StandardTool {
    pub fn name(&self) -> &'static str {
        match self {
            StandardTool::HttpGet => "http_get",
            StandardTool::HttpPost => "http_post",
            StandardTool::FileRead => "file_read",
            StandardTool::FileWrite => "file_write",
            StandardTool::JsonParse => "json_parse",
            StandardTool::TextSearch => "text_search",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "http_get" => Some(StandardTool::HttpGet),
            "http_post" => Some(StandardTool::HttpPost),
            "file_read" => Some(StandardTool::FileRead),
            "file_write" => Some(StandardTool::FileWrite),
            "json_parse" => Some(StandardTool::JsonParse),
            "text_search" => Some(StandardTool::TextSearch),
            _ => None,
        }
    }
}

impl std::fmt::Display for StandardTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Tool dispatch method: a compile-time-checked standard tool, or a
/// runtime-validated custom tool id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolDispatch {
    Standard(StandardTool),
    Custom(ToolId),
}

impl ToolDispatch {
    pub fn from_name(name: &str) -> Result<Self, crate::identifiers::IdValidationError> {
        if let Some(standard) = StandardTool::from_name(name) {
            Ok(ToolDispatch::Standard(standard))
        } else {
            Ok(ToolDispatch::Custom(ToolId::parse(name)?))
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ToolDispatch::Standard(tool) => tool.name(),
            ToolDispatch::Custom(id) => id.as_str(),
        }
    }
}

/// A request to invoke a specific tool with input data.
///
/// Carried verbatim (and mutably, by reference) in `HookEvent::PreActing`
/// so a hook can observe or abort before the call is made. The core never
/// executes this call itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCall {
    pub dispatch: ToolDispatch,
    pub input: String,
}

impl ToolCall {
    pub fn name(&self) -> &str {
        self.dispatch.name()
    }

    pub fn new(name: &str, input: &str) -> Result<Self, crate::identifiers::IdValidationError> {
        Ok(Self {
            dispatch: ToolDispatch::from_name(name)?,
            input: input.to_string(),
        })
    }

    pub fn from_standard(tool: StandardTool, input: String) -> Self {
        Self {
            dispatch: ToolDispatch::Standard(tool),
            input,
        }
    }

    /// Start building a `ToolCall`.
    ///
    /// ```rust
    /// use sluice_core::tool::ToolCall;
    ///
    /// let call = ToolCall::builder()
    ///     .name("json_parse")
    ///     .input("{}")
    ///     .build()
    ///     .expect("valid tool name");
    /// ```
    pub fn builder() -> ToolCallBuilder {
        ToolCallBuilder::default()
    }
}

#[derive(Debug, Default)]
pub struct ToolCallBuilder {
    name: Option<String>,
    input: Option<String>,
}

impl ToolCallBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn build(self) -> Result<ToolCall, crate::identifiers::IdValidationError> {
        let name = self.name.unwrap_or_default();
        ToolCall::new(&name, &self.input.unwrap_or_default())
    }
}
