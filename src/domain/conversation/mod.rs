//! Conversation module - messages, bounded history, prompt and tool schema.
//!
//! Everything the Conversation Engine needs to talk to a language model,
//! independent of which provider serves the request.

mod history;
mod message;
mod prompt;
mod tools;

pub use history::{BoundedHistory, ConversationHistory};
pub use message::{Message, MessageRole};
pub use prompt::{presentation_prompt, system_prompt, PRESENTATION_INSTRUCTIONS};
pub use tools::{
    search_params_from_tool_calls, travel_tools, ItineraryRequest, ToolCall, ToolDefinition,
    TravelTool,
};
