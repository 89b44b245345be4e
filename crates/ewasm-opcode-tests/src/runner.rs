//! Test runner and statistics

use crate::assertions::{AssertionEngine, Failure, Field, Observation};
use crate::config::HarnessConfig;
use crate::context::ContextBuilder;
use crate::driver::{ExecutionDriver, PreparedInput};
use crate::error::{TestError, TestResult};
use crate::loader::SuiteLoader;
use crate::synth::ModuleSynthesizer;
use crate::types::OpcodeTestCase;
use ewasm_compiler::{OpcodeCompiler, Toolchain};
use ewasm_kernel::VmFactory;
use std::path::Path;
use std::time::{Duration, Instant};

/// Results of one test file
#[derive(Debug, Default)]
pub struct FileResults {
    /// File name
    pub file: String,
    /// Labels of passing cases
    pub passed: Vec<String>,
    /// Labels of failing cases, or the file name if it could not be loaded
    pub failed: Vec<String>,
    /// Every failed assertion
    pub failures: Vec<Failure>,
}

impl FileResults {
    /// Create empty results for `file`
    pub fn new(file: String) -> Self {
        Self {
            file,
            ..Self::default()
        }
    }

    /// Total cases
    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len()
    }
}

/// Aggregated test statistics
#[derive(Debug, Default)]
pub struct TestStats {
    /// Total cases executed
    pub total: usize,
    /// Cases passed
    pub passed: usize,
    /// Cases failed
    pub failed: usize,
    /// Total execution time
    pub duration: Duration,
    /// Every failed assertion
    pub failures: Vec<Failure>,
}

impl TestStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the results of one file
    pub fn add_file_results(&mut self, results: FileResults) {
        self.total += results.total();
        self.passed += results.passed.len();
        self.failed += results.failed.len();
        self.failures.extend(results.failures);
    }

    /// Whether any assertion failed
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Pass rate as percentage
    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.passed as f64 / self.total as f64) * 100.0
    }

    /// Print summary
    pub fn print_summary(&self) {
        println!("\n========================================");
        println!("Opcode Test Summary");
        println!("========================================");
        println!("Total:   {}", self.total);
        println!("Passed:  {}", self.passed);
        println!("Failed:  {}", self.failed);
        println!("Pass Rate: {:.2}%", self.pass_rate());
        println!("Duration: {:.2}s", self.duration.as_secs_f64());

        if !self.failures.is_empty() {
            println!("\nFailed assertions:");
            for failure in &self.failures {
                println!("  - {}", failure);
            }
        }
    }
}

/// Runs opcode test files against a compiler, toolchain and VM
pub struct TestRunner<C, T, F> {
    loader: SuiteLoader,
    contexts: ContextBuilder,
    synthesizer: ModuleSynthesizer<C, T>,
    driver: ExecutionDriver<F>,
    assertions: AssertionEngine,
}

impl<C, T, F> TestRunner<C, T, F>
where
    C: OpcodeCompiler,
    T: Toolchain,
    F: VmFactory,
{
    /// Create a runner
    pub fn new(config: HarnessConfig, compiler: C, toolchain: T, factory: F) -> Self {
        Self {
            loader: SuiteLoader::new(config.test_dir, config.file_filter),
            contexts: ContextBuilder::new(config.gas_budget),
            synthesizer: ModuleSynthesizer::new(compiler, toolchain),
            driver: ExecutionDriver::new(factory, config.memory_offset),
            assertions: AssertionEngine::new(config.memory_offset),
        }
    }

    /// Run every discovered file in order
    pub async fn run(&self) -> TestResult<TestStats> {
        let mut stats = TestStats::new();
        let start = Instant::now();

        let files = self.loader.discover()?;
        let dir = self.loader.dir().display();
        tracing::info!(dir = %dir, files = files.len(), "running opcode tests");

        for path in files {
            let results = self.run_file(&path).await;
            if !results.failed.is_empty() {
                tracing::info!(
                    file = %results.file,
                    passed = results.passed.len(),
                    failed = results.failed.len(),
                    "file finished with failures"
                );
            }
            stats.add_file_results(results);
        }

        stats.duration = start.elapsed();
        Ok(stats)
    }

    /// Run all cases in a file
    ///
    /// A file that cannot be read or parsed counts as one failure.
    pub async fn run_file(&self, path: &Path) -> FileResults {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let mut results = FileResults::new(name.clone());

        let cases = match SuiteLoader::load_file(path) {
            Ok(cases) => cases,
            Err(e) => {
                let failure = Failure::new(&name, None, Field::Setup, e.to_string());
                tracing::warn!("FAIL: {}", failure);
                results.failed.push(name);
                results.failures.push(failure);
                return results;
            }
        };

        tracing::info!(file = %name, cases = cases.len(), "running file");
        for case in &cases {
            let failures = self.run_case(&name, case).await;
            if failures.is_empty() {
                tracing::debug!("PASS: {}", case.label());
                results.passed.push(case.label());
            } else {
                for failure in &failures {
                    tracing::warn!("FAIL: {}", failure);
                }
                results.failed.push(case.label());
                results.failures.extend(failures);
            }
        }

        results
    }

    /// Run a single case and return its failed assertions
    pub async fn run_case(&self, file: &str, case: &OpcodeTestCase) -> Vec<Failure> {
        tracing::debug!(op = %case.op, description = %case.description, "testing");

        let setup = async {
            let code = self.synthesizer.synthesize(&case.op).await?;
            let ctx = self.contexts.build(&case.environment)?;
            let input = PreparedInput::from_input(&case.input)?;
            Ok::<_, TestError>((code, ctx, input))
        }
        .await;
        let fail = |field, message: String| vec![Failure::new(file, Some(case), field, message)];
        let (code, ctx, input) = match setup {
            Ok(prepared) => prepared,
            Err(e) => return fail(Field::Setup, e.to_string()),
        };

        let budget = ctx.message.gas;
        let executed = self.driver.execute(code, ctx, &input, &case.op, &case.params).await;
        let mut execution = match executed {
            Ok(execution) => execution,
            Err(e) => return fail(Field::Execution, e.to_string()),
        };

        let gas_used = budget.saturating_sub(execution.vm.gas_left());
        let return_value = execution.vm.return_value().map(<[u8]>::to_vec);
        let instance = match execution.vm.instance() {
            Ok(instance) => instance,
            Err(e) => return fail(Field::Execution, TestError::from(e).to_string()),
        };

        let observed = Observation {
            instance,
            stack_pointer: execution.stack_pointer,
            return_value: return_value.as_deref(),
            gas_used,
        };
        self.assertions.check(file, case, &observed)
    }
}
