pub mod commands;
pub mod rename;
