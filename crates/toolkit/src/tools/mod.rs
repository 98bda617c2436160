pub mod fetch;

pub use fetch::{FetchConfig, FetchPageTool};
