pub mod error;
pub mod paths;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod stage;
pub mod table;
