//! opcode-runner binary
//!
//! Runs the opcode test files through the bundled opcode library, the wat
//! toolchain and the wasmtime kernel. Exits with status 1 if any assertion
//! failed.

mod cli;

use anyhow::Result;
use cli::Cli;
use ewasm_compiler::{OpcodeLibrary, WatToolchain};
use ewasm_kernel::KernelFactory;
use ewasm_opcode_tests::TestRunner;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = cli.harness_config();
    let library_dir = OpcodeLibrary::default_dir();
    let library = OpcodeLibrary::load(&library_dir)?;
    tracing::info!(library = %library_dir.display(), "opcode library loaded");

    let runner = TestRunner::new(config, library, WatToolchain::new(), KernelFactory::new());
    let stats = runner.run().await?;
    stats.print_summary();

    if stats.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}
