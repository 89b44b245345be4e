//! Execution driver
//!
//! Runs one synthesized module through the fixed protocol: receive the
//! message, set the stack pointer, prime stack and memory, call the opcode,
//! then wait for the VM's deferred effects to settle.

use crate::context::ExecutionContext;
use crate::error::{TestError, TestResult};
use crate::marshal::{to_word, write_word};
use crate::types::TestInput;
use ewasm_kernel::{HostVm, KernelConfig, VmFactory};
use ewasm_primitives::WORD_SIZE;

/// Stack pointer addressing the top of an `len`-word stack
///
/// An empty stack yields `-32`.
pub fn initial_stack_pointer(len: usize) -> i64 {
    (len as i64 - 1) * WORD_SIZE as i64
}

/// Input words decoded and padded, ready to be written
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreparedInput {
    /// Stack words, bottom first
    pub stack: Vec<Vec<u8>>,
    /// Memory words in ascending offset order
    pub memory: Vec<(u32, Vec<u8>)>,
}

impl PreparedInput {
    /// Decode every input word
    pub fn from_input(input: &TestInput) -> TestResult<Self> {
        let stack = input
            .stack
            .iter()
            .map(|word| to_word(word, WORD_SIZE))
            .collect::<TestResult<Vec<_>>>()?;
        let memory = input
            .memory
            .iter()
            .map(|(offset, word)| Ok((*offset, to_word(word, WORD_SIZE)?)))
            .collect::<TestResult<Vec<_>>>()?;
        Ok(Self { stack, memory })
    }
}

/// VM after a completed protocol run
pub struct Execution {
    /// VM holding the instance, staged return value and gas
    pub vm: Box<dyn HostVm>,
    /// Value the opcode export returned
    pub stack_pointer: Option<i64>,
}

/// Drives a module through one protocol run
pub struct ExecutionDriver<F> {
    factory: F,
    memory_offset: u32,
}

impl<F: VmFactory> ExecutionDriver<F> {
    /// Create a driver placing EVM memory at `memory_offset`
    pub fn new(factory: F, memory_offset: u32) -> Self {
        Self {
            factory,
            memory_offset,
        }
    }

    /// Run `op` from `code` inside `ctx`
    ///
    /// Any VM error is returned as [`TestError::Execution`].
    pub async fn execute(
        &self,
        code: Vec<u8>,
        ctx: ExecutionContext,
        input: &PreparedInput,
        op: &str,
        params: &[i64],
    ) -> TestResult<Execution> {
        let mut vm = self.factory.create(KernelConfig {
            code,
            state: ctx.state,
            account: ctx.account,
        })?;
        vm.receive(ctx.message).await?;

        let stack_pointer = {
            let instance = vm.instance()?;
            let sp = initial_stack_pointer(input.stack.len());
            instance.call("setSP", &[sp])?;

            for (index, word) in input.stack.iter().enumerate() {
                write_word(instance, index * WORD_SIZE, word)?;
            }
            for (offset, word) in &input.memory {
                let address = *offset as usize + self.memory_offset as usize;
                write_word(instance, address, word)?;
            }

            tracing::debug!(op, sp, "calling opcode");
            instance.call(op, params)?
        };

        vm.on_done().await?;
        Ok(Execution { vm, stack_pointer })
    }
}
