pub mod marketplace;
pub mod mcp;
pub mod modes;
