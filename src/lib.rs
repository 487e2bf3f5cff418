//! svcdeb - stage Debian service bundles and validate their runtime configuration
//!
//! A run turns a [`config::PackageConfig`] into a staged payload tree:
//!
//! 1. [`params`] builds the immutable parameter context templates render against
//! 2. [`resource`] resolves the fixed service files and user rules into a
//!    destination-unique list
//! 3. [`staging`] renders and writes every resource with its mode, recording ownership
//! 4. [`validation`] binds the rendered configuration to the type the artifact
//!    exports ([`introspect`]) and collects every violation
//! 5. an [`assembler::BundleAssembler`] turns the staged tree into the bundle
//!
//! [`pipeline::Pipeline`] runs these steps in order.

pub mod assembler;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod introspect;
pub mod params;
pub mod pipeline;
pub mod report;
pub mod resource;
pub mod staging;
#[cfg(test)]
mod temp;
pub mod template;
pub mod validation;
