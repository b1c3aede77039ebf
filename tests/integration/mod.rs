//! Integration tests for the cook database

mod cli_parsing;
mod disk_workflow;
mod freshness_properties;
mod version_processing;
