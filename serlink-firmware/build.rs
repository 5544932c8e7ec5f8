//! Build script for serlink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates link.toml and compiles it into `link_config.rs`

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() {
    setup_linker();
    let generated = validate_config();

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("link_config.rs"), generated).unwrap();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate link.toml and render it as Rust constants
fn validate_config() -> String {
    println!("cargo:rerun-if-changed=link.toml");

    let config_path = Path::new("link.toml");
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: link.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a link.toml configuration file in the     ║\n\
            ║  serlink-firmware directory.                                     ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read link.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in link.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    let uart = table(&config, "uart", &mut errors);
    let link = table(&config, "link", &mut errors);

    let baudrate = integer(uart, "uart", "baudrate", 300, 3_000_000, &mut errors);
    let data_bits = integer(uart, "uart", "data_bits", 5, 8, &mut errors);
    let stop_bits = integer(uart, "uart", "stop_bits", 1, 2, &mut errors);
    let parity = match uart.and_then(|t| t.get("parity")) {
        Some(toml::Value::String(p)) if ["none", "even", "odd"].contains(&p.as_str()) => {
            p.clone()
        }
        _ => {
            errors.push("[uart] parity must be 'none', 'even', or 'odd'".to_string());
            String::new()
        }
    };

    let rx_buffer = integer(link, "link", "rx_buffer", 2, 4096, &mut errors);
    let tx_buffer = integer(link, "link", "tx_buffer", 2, 4096, &mut errors);
    let queue_depth = integer(link, "link", "queue_depth", 1, 256, &mut errors);
    let resolve_budget = integer(link, "link", "resolve_budget", 0, 65535, &mut errors);
    let resolve_interval_ms = integer(link, "link", "resolve_interval_ms", 1, 65535, &mut errors);
    let inbound_timeout_ms = integer(link, "link", "inbound_timeout_ms", 0, 65535, &mut errors);
    let transmit_enabled = boolean(link, "link", "transmit_enabled", &mut errors);
    let derive_size = boolean(link, "link", "derive_size_from_subtype", &mut errors);

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid link.toml                                        ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=link.toml validated successfully");

    let data_bits = match data_bits {
        5 => "Five",
        6 => "Six",
        7 => "Seven",
        _ => "Eight",
    };
    let parity = match parity.as_str() {
        "even" => "Even",
        "odd" => "Odd",
        _ => "None",
    };
    let stop_bits = if stop_bits == 2 { "Two" } else { "One" };

    format!(
        "// Generated from link.toml by build.rs\n\
         pub const RX_BUFFER_SLOTS: usize = {rx_buffer};\n\
         pub const TX_BUFFER_SLOTS: usize = {tx_buffer};\n\
         pub const QUEUE_DEPTH: usize = {queue_depth};\n\
         pub const UART_CONFIG: UartConfig = UartConfig {{\n    \
             baudrate: {baudrate},\n    \
             data_bits: DataBits::{data_bits},\n    \
             parity: Parity::{parity},\n    \
             stop_bits: StopBits::{stop_bits},\n\
         }};\n\
         pub const LINK_CONFIG: LinkConfig = LinkConfig {{\n    \
             resolve_budget: {resolve_budget},\n    \
             resolve_interval_ms: {resolve_interval_ms},\n    \
             inbound_timeout_ms: {inbound_timeout_ms},\n    \
             transmit_enabled: {transmit_enabled},\n    \
             derive_size_from_subtype: {derive_size},\n\
         }};\n"
    )
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn table<'a>(
    config: &'a toml::Value,
    name: &str,
    errors: &mut Vec<String>,
) -> Option<&'a toml::value::Table> {
    match config.get(name) {
        Some(toml::Value::Table(t)) => Some(t),
        _ => {
            errors.push(format!("Missing [{}] section", name));
            None
        }
    }
}

fn integer(
    section: Option<&toml::value::Table>,
    section_name: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> i64 {
    match section.and_then(|t| t.get(key)) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => *v,
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section_name, key, min, max));
            min
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section_name, key));
            min
        }
        None => {
            if section.is_some() {
                errors.push(format!("[{}] missing '{}'", section_name, key));
            }
            min
        }
    }
}

fn boolean(
    section: Option<&toml::value::Table>,
    section_name: &str,
    key: &str,
    errors: &mut Vec<String>,
) -> bool {
    match section.and_then(|t| t.get(key)) {
        Some(toml::Value::Boolean(v)) => *v,
        Some(_) => {
            errors.push(format!("[{}] {} must be true or false", section_name, key));
            false
        }
        None => {
            if section.is_some() {
                errors.push(format!("[{}] missing '{}'", section_name, key));
            }
            false
        }
    }
}
