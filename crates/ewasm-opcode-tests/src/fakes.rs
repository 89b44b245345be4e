//! Scripted collaborators for unit tests

use async_trait::async_trait;
use ewasm_compiler::{CompileError, CompilerError, CompilerResult, OpcodeCompiler, Toolchain};
use ewasm_kernel::{
    HostVm, KernelConfig, KernelError, KernelResult, Message, ModuleInstance, VmFactory,
};
use ewasm_primitives::Gas;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

const MEMORY_SIZE: usize = 65_536;

#[derive(Default)]
struct ScriptState {
    result: Option<i64>,
    trap: bool,
    reject_receive: bool,
    return_value: Option<Vec<u8>>,
    gas: Gas,
    writes: Vec<(usize, Vec<u8>)>,
    log: Vec<String>,
}

/// Shared behaviour of every VM a [`FakeFactory`] creates
#[derive(Clone, Default)]
pub struct Script(Arc<Mutex<ScriptState>>);

impl Script {
    pub fn returning(result: Option<i64>) -> Self {
        let script = Self::default();
        script.0.lock().unwrap().result = result;
        script
    }

    pub fn trapping() -> Self {
        let script = Self::default();
        script.0.lock().unwrap().trap = true;
        script
    }

    pub fn rejecting_receive() -> Self {
        let script = Self::default();
        script.0.lock().unwrap().reject_receive = true;
        script
    }

    pub fn with_return(self, payload: &[u8]) -> Self {
        self.0.lock().unwrap().return_value = Some(payload.to_vec());
        self
    }

    pub fn with_gas(self, gas: Gas) -> Self {
        self.0.lock().unwrap().gas = gas;
        self
    }

    /// Raw bytes the opcode writes when called
    pub fn with_write(self, offset: usize, bytes: &[u8]) -> Self {
        self.0.lock().unwrap().writes.push((offset, bytes.to_vec()));
        self
    }

    pub fn log(&self) -> Vec<String> {
        self.0.lock().unwrap().log.clone()
    }

    fn record(&self, entry: String) {
        self.0.lock().unwrap().log.push(entry);
    }
}

pub struct FakeFactory {
    script: Script,
}

impl FakeFactory {
    pub fn new(script: Script) -> Self {
        Self { script }
    }
}

impl VmFactory for FakeFactory {
    fn create(&self, _config: KernelConfig) -> KernelResult<Box<dyn HostVm>> {
        Ok(Box::new(FakeVm {
            script: self.script.clone(),
            instance: None,
            gas_left: 0,
            return_value: None,
        }))
    }
}

pub struct FakeVm {
    script: Script,
    instance: Option<FakeInstance>,
    gas_left: Gas,
    return_value: Option<Vec<u8>>,
}

#[async_trait]
impl HostVm for FakeVm {
    async fn receive(&mut self, message: Message) -> KernelResult<()> {
        self.script.record("receive".to_string());
        if self.script.0.lock().unwrap().reject_receive {
            return Err(KernelError::Instantiate("rejected".to_string()));
        }
        self.gas_left = message.gas;
        self.instance = Some(FakeInstance {
            script: self.script.clone(),
            memory: vec![0; MEMORY_SIZE],
        });
        Ok(())
    }

    fn instance(&mut self) -> KernelResult<&mut dyn ModuleInstance> {
        match self.instance.as_mut() {
            Some(instance) => Ok(instance),
            None => Err(KernelError::NotInstantiated),
        }
    }

    async fn on_done(&mut self) -> KernelResult<()> {
        self.script.record("on_done".to_string());
        let state = self.script.0.lock().unwrap();
        self.gas_left -= state.gas;
        self.return_value = state.return_value.clone();
        Ok(())
    }

    fn return_value(&self) -> Option<&[u8]> {
        self.return_value.as_deref()
    }

    fn gas_left(&self) -> Gas {
        self.gas_left
    }
}

pub struct FakeInstance {
    script: Script,
    memory: Vec<u8>,
}

impl ModuleInstance for FakeInstance {
    fn has_export(&mut self, _name: &str) -> bool {
        true
    }

    fn call(&mut self, name: &str, params: &[i64]) -> KernelResult<Option<i64>> {
        self.script.record(format!("call {} {:?}", name, params));
        if name == "setSP" {
            return Ok(None);
        }
        let (trap, result, writes) = {
            let state = self.script.0.lock().unwrap();
            (state.trap, state.result, state.writes.clone())
        };
        if trap {
            return Err(KernelError::Trap("unreachable".to_string()));
        }
        for (offset, bytes) in writes {
            self.memory[offset..offset + bytes.len()].copy_from_slice(&bytes);
        }
        Ok(result)
    }

    fn write_memory(&mut self, offset: usize, bytes: &[u8]) -> KernelResult<()> {
        self.script.record(format!("write {}+{}", offset, bytes.len()));
        if offset + bytes.len() > self.memory.len() {
            return Err(KernelError::MemoryOutOfBounds {
                offset,
                len: bytes.len(),
                size: self.memory.len(),
            });
        }
        self.memory[offset..offset + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    fn read_memory(&self, offset: usize, len: usize) -> KernelResult<Vec<u8>> {
        if offset + len > self.memory.len() {
            return Err(KernelError::MemoryOutOfBounds {
                offset,
                len,
                size: self.memory.len(),
            });
        }
        Ok(self.memory[offset..offset + len].to_vec())
    }
}

/// Knows every opcode except `UNKNOWN`
pub struct FakeCompiler;

impl OpcodeCompiler for FakeCompiler {
    fn resolve_functions(
        &self,
        names: &BTreeSet<String>,
    ) -> CompilerResult<(Vec<String>, Vec<String>)> {
        if let Some(name) = names.iter().find(|name| *name == "UNKNOWN") {
            return Err(CompilerError::UnknownFunction(name.clone()));
        }
        Ok((names.iter().map(|name| format!("(func ${})", name)).collect(), Vec::new()))
    }

    fn build_module(
        &self,
        funcs: &[String],
        _imports: &[String],
        _exports: &[String],
    ) -> CompilerResult<String> {
        Ok(funcs.join("\n"))
    }
}

pub struct FakeToolchain;

#[async_trait]
impl Toolchain for FakeToolchain {
    async fn compile(&self, text: &str) -> Result<Vec<u8>, CompileError> {
        let mut binary = b"\0asm".to_vec();
        binary.extend_from_slice(text.as_bytes());
        Ok(binary)
    }
}
