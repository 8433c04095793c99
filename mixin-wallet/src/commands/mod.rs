// Copyright (c) 2024 Botho Foundation

//! CLI Commands
//!
//! Implementation of all wallet CLI commands.

pub mod address;
pub mod decode;
pub mod ghost;
pub mod send_raw;

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("\x1b[31mError:\x1b[0m {}", message);
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("\x1b[32m{}\x1b[0m", message);
}
