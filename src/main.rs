// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS Compiler CLI
//!
//! Compiles program text files with the registered compilers and inspects
//! the instruction and compiler registries.
//!
//! # Usage
//!
//! ```bash
//! # Compile with the default compiler
//! qubit-os-qc compile bell.qp
//!
//! # Compile with a specific compiler, JSON output
//! qubit-os-qc compile anneal.qp --compiler annealer --json
//!
//! # List registered instructions and compilers
//! qubit-os-qc gates
//! qubit-os-qc compilers
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use qubit_os_compiler::compiler::load_builtin_plugins;
use qubit_os_compiler::{
    config::Config, parse_program, CompilerRegistry, Error, InstructionRegistry, PluginHost,
    Result, VERSION,
};

/// QubitOS quantum program compiler
#[derive(Parser)]
#[command(name = "qubit-os-qc")]
#[command(author = "QubitOS Contributors")]
#[command(version = VERSION)]
#[command(about = "Compile quantum programs with pluggable backends")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = "QUBITOS_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a program file
    Compile {
        /// Program text file
        file: PathBuf,

        /// Compiler to use (defaults to the configured default)
        #[arg(long)]
        compiler: Option<String>,

        /// Register name used by the program's operands
        #[arg(long, default_value = "q")]
        register: String,

        /// Emit the compiled program as JSON
        #[arg(long)]
        json: bool,

        /// Write output to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List registered instructions
    Gates,

    /// List registered compilers
    Compilers,

    /// Show effective configuration
    Config,

    /// Validate configuration file
    Validate,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    // Initialize logging
    init_logging(&config.logging.level, &config.logging.format);

    match cli.command {
        Commands::Compile {
            file,
            compiler,
            register,
            json,
            output,
        } => {
            config.validate()?;
            let host = initialize_compilers(&config)?;

            let source = std::fs::read_to_string(&file)?;
            let program = parse_program(&register, &source, InstructionRegistry::instance())?;
            let compiler = host.registry().get_or_default(compiler.as_deref())?;

            let compiled = match compiler.compile(&program) {
                Ok(compiled) => compiled,
                Err(e) => {
                    error!(
                        compiler = compiler.name(),
                        index = ?e.instruction_index(),
                        error = %e,
                        "Compilation failed"
                    );
                    eprintln!("{}: {}", file.display(), e);
                    std::process::exit(1);
                }
            };

            info!(
                file = %file.display(),
                compiler = %compiled.backend,
                instructions = program.len(),
                lines = compiled.lines.len(),
                "Compiled program"
            );

            let rendered = if json {
                serde_json::to_string_pretty(&compiled)?
            } else {
                compiled.text()
            };
            match output {
                Some(path) => std::fs::write(path, rendered + "\n")?,
                None => println!("{}", rendered),
            }
        }

        Commands::Gates => {
            let registry = InstructionRegistry::instance();
            println!("Registered instructions:");
            for name in registry.names() {
                println!("  {}", name);
            }
        }

        Commands::Compilers => {
            config.validate()?;
            let host = initialize_compilers(&config)?;
            let registry = host.registry();

            println!("Available compilers:");
            for name in registry.list() {
                let default_marker = if Some(&name) == registry.default_compiler_name().as_ref() {
                    " (default)"
                } else {
                    ""
                };
                let owner = host.owner_of(&name).unwrap_or_else(|| "-".to_string());
                println!("  {} [plugin: {}]{}", name, owner, default_marker);
            }

            if registry.is_empty() {
                println!("  (no compilers available)");
            }
        }

        Commands::Config => {
            // Show effective configuration
            println!("{}", serde_yaml::to_string(&config)?);
        }

        Commands::Validate => {
            // Validate configuration
            match config.validate() {
                Ok(()) => {
                    println!("Configuration is valid");
                }
                Err(e) => {
                    eprintln!("Configuration error: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

/// Initialize logging with tracing. Logs go to stderr so compiled output on
/// stdout stays clean.
fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(filter);

    if format == "json" {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}

/// Apply registry policy and load the compiler plugins enabled in `config`
/// into the process-wide compiler registry.
///
/// The built-in instructions are installed when the instruction registry is
/// first used, so `registry.strict` governs registrations made after that,
/// e.g. an extension trying to replace `Y`.
fn initialize_compilers(config: &Config) -> Result<PluginHost> {
    InstructionRegistry::instance().set_policy(config.registry.policy());

    let host = PluginHost::new(Arc::clone(CompilerRegistry::global()));
    load_builtin_plugins(&host, config)?;

    if host.registry().is_empty() {
        error!("No compilers available. At least one compiler must be enabled.");
        return Err(Error::Config(
            "No compilers available. At least one compiler must be enabled.".to_string(),
        ));
    }

    info!(
        version = VERSION,
        compilers = ?host.registry().list(),
        default = ?host.registry().default_compiler_name(),
        "Compilers initialized"
    );
    Ok(host)
}
