//! CLI argument parsing for opcode-runner

use clap::Parser;
use ewasm_opcode_tests::HarnessConfig;

/// Runs EVM opcode tests against their wasm implementations
#[derive(Parser, Debug, Clone)]
#[command(name = "opcode-runner")]
#[command(about = "Conformance tests for EVM opcodes compiled to WebAssembly")]
#[command(version)]
pub struct Cli {
    /// Run a single test file from the test directory
    #[arg(long)]
    pub file: Option<String>,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Harness configuration described by the arguments
    pub fn harness_config(&self) -> HarnessConfig {
        HarnessConfig::default().with_file_filter(self.file.clone())
    }
}
