pub mod assist;
pub mod html;
pub mod registry;
pub mod schema;
pub mod tool;
pub mod tools;

pub use registry::ToolRegistry;
pub use schema::{ArgType, SchemaError, ToolSchema};
pub use tool::{ContentBlock, EchoTool, Tool, ToolDefinition, ToolError, ToolOutput};
pub use tools::FetchPageTool;
