// Main library entry point for em-import.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;
