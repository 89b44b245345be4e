//! wasmtime-backed module instance

use crate::eei::{self, HostState};
use crate::error::{KernelError, KernelResult};
use crate::traits::ModuleInstance;
use wasmtime::{Instance, Memory, Module, Store, Val, ValType};

/// Instantiated module with its store and exported memory
pub struct WasmInstance {
    store: Store<HostState>,
    instance: Instance,
    memory: Memory,
}

impl WasmInstance {
    /// Instantiate `module` against the kernel's host functions
    pub fn instantiate(module: &Module, host: HostState) -> KernelResult<Self> {
        let engine = module.engine();
        let mut store = Store::new(engine, host);
        let linker = eei::linker(engine)?;
        let instance = linker
            .instantiate(&mut store, module)
            .map_err(|e| KernelError::Instantiate(format!("{:#}", e)))?;
        let memory = instance
            .get_memory(&mut store, "memory")
            .ok_or_else(|| KernelError::MissingExport("memory".to_string()))?;
        Ok(Self {
            store,
            instance,
            memory,
        })
    }

    /// Size of linear memory in bytes
    pub fn memory_size(&self) -> usize {
        self.memory.data_size(&self.store)
    }

    fn out_of_bounds(&self, offset: usize, len: usize) -> KernelError {
        KernelError::MemoryOutOfBounds {
            offset,
            len,
            size: self.memory_size(),
        }
    }
}

impl ModuleInstance for WasmInstance {
    fn has_export(&mut self, name: &str) -> bool {
        self.instance.get_func(&mut self.store, name).is_some()
    }

    fn call(&mut self, name: &str, params: &[i64]) -> KernelResult<Option<i64>> {
        let func = self
            .instance
            .get_func(&mut self.store, name)
            .ok_or_else(|| KernelError::MissingExport(name.to_string()))?;
        let ty = func.ty(&self.store);

        let param_types: Vec<ValType> = ty.params().collect();
        if param_types.len() != params.len() {
            return Err(KernelError::ParamCount {
                export: name.to_string(),
                expected: param_types.len(),
                actual: params.len(),
            });
        }
        let args = param_types
            .iter()
            .zip(params)
            .map(|(ty, value)| match ty {
                ValType::I32 => i32::try_from(*value)
                    .map(Val::I32)
                    .map_err(|_| KernelError::ParamOutOfRange {
                        export: name.to_string(),
                        value: *value,
                    }),
                ValType::I64 => Ok(Val::I64(*value)),
                other => Err(KernelError::UnsupportedParam {
                    export: name.to_string(),
                    ty: format!("{:?}", other),
                }),
            })
            .collect::<KernelResult<Vec<Val>>>()?;

        let mut results = vec![Val::I32(0); ty.results().len()];
        tracing::trace!(export = name, ?params, "calling export");
        func.call(&mut self.store, &args, &mut results)
            .map_err(|e| KernelError::Trap(format!("{:#}", e)))?;

        Ok(results.first().and_then(|value| match value {
            Val::I32(v) => Some(i64::from(*v)),
            Val::I64(v) => Some(*v),
            _ => None,
        }))
    }

    fn write_memory(&mut self, offset: usize, bytes: &[u8]) -> KernelResult<()> {
        self.memory
            .write(&mut self.store, offset, bytes)
            .map_err(|_| self.out_of_bounds(offset, bytes.len()))
    }

    fn read_memory(&self, offset: usize, len: usize) -> KernelResult<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.memory
            .read(&self.store, offset, &mut buf)
            .map_err(|_| self.out_of_bounds(offset, len))?;
        Ok(buf)
    }
}
