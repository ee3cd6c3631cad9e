//! Command-line control of JDS6600 function generators.
//!
//! The binary loads an [`config::AppConfig`], installs the tracing
//! subscriber from [`logging`], connects a
//! [`Jds6600`](fgen_driver_jds6600::Jds6600) and runs one subcommand.
//! Named settings are resolved by [`commands`].

pub mod commands;
pub mod config;
pub mod logging;
