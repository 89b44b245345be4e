//! Kernel: one contract account running wasm code

use crate::code_handler::{CodeHandler, WasmCodeHandler};
use crate::context::{Block, FakeBlockchain, Message, ACCOUNTS_PATH, BLOCKCHAIN_PATH, BLOCK_PATH};
use crate::effects::{self, Effect, EffectQueue};
use crate::eei::HostState;
use crate::error::{KernelError, KernelResult};
use crate::instance::WasmInstance;
use crate::traits::{HostVm, KernelConfig, ModuleInstance, VmFactory};
use async_trait::async_trait;
use ewasm_primitives::{Address, Gas};
use ewasm_state::{StateStore, Vertex};
use std::sync::Arc;

/// Values staged by the last dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Responses {
    /// Payload passed to `return` or `revert`
    pub return_value: Option<Vec<u8>>,
    /// Whether the payload came from `revert`
    pub reverted: bool,
}

/// Host VM bound to one account
pub struct Kernel {
    code: Vec<u8>,
    code_handler: Arc<dyn CodeHandler>,
    state: Vertex,
    account: Address,
    vm: Option<WasmInstance>,
    effects: Option<EffectQueue>,
    gas_left: Gas,
    responses: Responses,
}

impl Kernel {
    /// Create a kernel; nothing is compiled until [`HostVm::receive`]
    pub fn new(config: KernelConfig, code_handler: Arc<dyn CodeHandler>) -> Self {
        Self {
            code: config.code,
            code_handler,
            state: config.state,
            account: config.account,
            vm: None,
            effects: None,
            gas_left: 0,
            responses: Responses::default(),
        }
    }

    /// Values staged by the last dispatch
    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    fn load_block(&self) -> KernelResult<Block> {
        match self.state.get(&[BLOCK_PATH]) {
            Ok(vertex) => Ok(vertex.decode_json::<Block>()?.unwrap_or_default()),
            Err(_) => Ok(Block::default()),
        }
    }

    fn load_blockchain(&self) -> KernelResult<Option<FakeBlockchain>> {
        match self.state.get(&[BLOCKCHAIN_PATH]) {
            Ok(vertex) => Ok(vertex.decode_json::<FakeBlockchain>()?),
            Err(_) => Ok(None),
        }
    }

    fn apply(&mut self, effect: Effect) -> KernelResult<()> {
        match effect {
            Effect::UseGas(amount) => {
                if amount > self.gas_left {
                    let left = self.gas_left;
                    self.gas_left = 0;
                    return Err(KernelError::OutOfGas {
                        requested: amount,
                        left,
                    });
                }
                self.gas_left -= amount;
            }
            Effect::Return(payload) => {
                self.responses.return_value = Some(payload);
                self.responses.reverted = false;
            }
            Effect::Revert(payload) => {
                self.responses.return_value = Some(payload);
                self.responses.reverted = true;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl HostVm for Kernel {
    async fn receive(&mut self, message: Message) -> KernelResult<()> {
        let account_key = self.account.to_hex();
        self.state.get(&[ACCOUNTS_PATH, account_key.as_str()])?;
        let block = self.load_block()?;
        let blockchain = self.load_blockchain()?;

        let module = self.code_handler.init(&self.code)?;
        let (sender, queue) = effects::channel();
        let host = HostState {
            address: self.account,
            caller: message.caller,
            call_data: message.data.clone(),
            block: block.header,
            blockchain,
            effects: sender,
        };
        let mut vm = WasmInstance::instantiate(&module, host)?;
        tracing::debug!(
            account = %self.account,
            kind = self.code_handler.kind(),
            memory = vm.memory_size(),
            "module instantiated"
        );

        self.gas_left = message.gas;
        self.responses = Responses::default();
        self.effects = Some(queue);
        if vm.has_export("main") {
            vm.call("main", &[])?;
        }
        self.vm = Some(vm);

        // let lookups scheduled by the dispatch run before the caller continues
        tokio::task::yield_now().await;
        Ok(())
    }

    fn instance(&mut self) -> KernelResult<&mut dyn ModuleInstance> {
        match self.vm.as_mut() {
            Some(vm) => Ok(vm),
            None => Err(KernelError::NotInstantiated),
        }
    }

    async fn on_done(&mut self) -> KernelResult<()> {
        let queue = self.effects.as_mut().ok_or(KernelError::NotInstantiated)?;
        let settled = queue.settle().await;
        for effect in settled {
            self.apply(effect)?;
        }
        Ok(())
    }

    fn return_value(&self) -> Option<&[u8]> {
        self.responses.return_value.as_deref()
    }

    fn gas_left(&self) -> Gas {
        self.gas_left
    }
}

/// [`VmFactory`] producing [`Kernel`]s that share one code handler
#[derive(Clone)]
pub struct KernelFactory {
    code_handler: Arc<dyn CodeHandler>,
}

impl KernelFactory {
    /// Factory using a fresh [`WasmCodeHandler`]
    pub fn new() -> Self {
        Self::with_code_handler(Arc::new(WasmCodeHandler::new()))
    }

    /// Factory using `code_handler`
    pub fn with_code_handler(code_handler: Arc<dyn CodeHandler>) -> Self {
        Self { code_handler }
    }
}

impl Default for KernelFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl VmFactory for KernelFactory {
    fn create(&self, config: KernelConfig) -> KernelResult<Box<dyn HostVm>> {
        Ok(Box::new(Kernel::new(config, Arc::clone(&self.code_handler))))
    }
}
