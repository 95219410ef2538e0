#![cfg_attr(feature = "strict", deny(warnings))]

#[macro_use]
extern crate text_io;

pub mod cli;
pub mod commands;
pub mod deploy;
pub mod error;
pub mod http;
pub mod settings;
pub mod terminal;
pub mod upload;

pub use error::Error;
