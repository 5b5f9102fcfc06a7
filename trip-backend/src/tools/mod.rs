//! Tool layer: definitions, registry, and the built-in travel lookups.

pub mod builtin;
pub mod lookup;
pub mod registry;
pub mod types;

pub use builtin::create_default_registry;
pub use lookup::{compact, grounded_lookup, MAX_TOOL_CHARS};
pub use registry::{Tool, ToolRegistry};
pub use types::{PropertySchema, ToolContext, ToolDefinition, ToolInputSchema, ToolResult};
