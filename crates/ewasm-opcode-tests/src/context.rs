//! Execution context construction

use crate::config::DEFAULT_GAS_BUDGET;
use crate::error::TestResult;
use crate::types::TestEnvironment;
use ewasm_kernel::{Block, FakeBlockchain, Message, ACCOUNTS_PATH, BLOCKCHAIN_PATH, BLOCK_PATH};
use ewasm_primitives::{Address, Gas};
use ewasm_state::{StateStore, Vertex};

/// Everything the VM needs to run one test case
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Message dispatched to the module
    pub message: Message,
    /// Current block
    pub block: Block,
    /// Fresh state root
    pub state: Vertex,
    /// Executing contract account
    pub account: Address,
}

/// Builds an [`ExecutionContext`] from a test environment
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    gas_budget: Gas,
}

impl ContextBuilder {
    /// Create a builder giving every message `gas_budget`
    pub fn new(gas_budget: Gas) -> Self {
        Self { gas_budget }
    }

    /// Build a context with its own state tree
    ///
    /// Missing environment fields fall back to the zero address and empty
    /// call data.
    pub fn build(&self, env: &TestEnvironment) -> TestResult<ExecutionContext> {
        let caller = env.caller.unwrap_or(Address::ZERO);
        let data = env.call_data.clone().unwrap_or_default().0;
        let account = env.address.unwrap_or(Address::ZERO);
        let block = Block::with_coinbase(env.coinbase.unwrap_or(Address::ZERO));

        let mut state = Vertex::new();
        state.set(&[BLOCK_PATH], Vertex::with_json(&block)?)?;
        state.set(&[BLOCKCHAIN_PATH], Vertex::with_json(&FakeBlockchain::default())?)?;
        state.set(&[ACCOUNTS_PATH, account.to_hex().as_str()], Vertex::new())?;

        Ok(ExecutionContext {
            message: Message::new(caller, data, self.gas_budget),
            block,
            state,
            account,
        })
    }
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_GAS_BUDGET)
    }
}
