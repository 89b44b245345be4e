//! Assertion engine
//!
//! Every field is checked on its own; a mismatch in one never hides the
//! result of another.

use crate::marshal::{read_word, to_bytes, to_word};
use crate::types::OpcodeTestCase;
use ewasm_kernel::ModuleInstance;
use ewasm_primitives::{hex::encode_hex, Gas, WORD_SIZE};
use std::fmt;

/// Part of a test case a failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// File or module could not be prepared
    Setup,
    /// VM trapped or rejected a step
    Execution,
    /// Value returned by the opcode export
    StackPointer,
    /// Output stack word at an index
    Stack(usize),
    /// Output memory at an EVM offset
    Memory(u32),
    /// Staged return payload
    Return,
    /// Gas consumed
    GasUsed,
}

/// One failed assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Test file name
    pub file: String,
    /// Case label; empty for file level failures
    pub case: String,
    /// Field that failed
    pub field: Field,
    /// What went wrong
    pub message: String,
}

impl Failure {
    /// Failure of `field` in `case`, or of the whole file when `case` is `None`
    pub fn new(
        file: &str,
        case: Option<&OpcodeTestCase>,
        field: Field,
        message: impl Into<String>,
    ) -> Self {
        Self {
            file: file.to_string(),
            case: case.map(OpcodeTestCase::label).unwrap_or_default(),
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.file)?;
        if !self.case.is_empty() {
            write!(f, "{} ", self.case)?;
        }
        write!(f, "{:?}: {}", self.field, self.message)
    }
}

/// What the VM looked like after a run
pub struct Observation<'a> {
    /// Live module instance
    pub instance: &'a dyn ModuleInstance,
    /// Value the opcode export returned
    pub stack_pointer: Option<i64>,
    /// Staged return payload
    pub return_value: Option<&'a [u8]>,
    /// Budget minus gas left
    pub gas_used: Gas,
}

/// Compares observations against a test case
#[derive(Debug, Clone)]
pub struct AssertionEngine {
    memory_offset: u32,
}

impl AssertionEngine {
    /// Create an engine reading EVM memory at `memory_offset`
    pub fn new(memory_offset: u32) -> Self {
        Self { memory_offset }
    }

    /// Run every check and collect the failures
    pub fn check(
        &self,
        file: &str,
        case: &OpcodeTestCase,
        observed: &Observation<'_>,
    ) -> Vec<Failure> {
        let mut failures = Vec::new();
        let mut fail = |field, message: String| {
            failures.push(Failure::new(file, Some(case), field, message))
        };

        if let Some(message) = check_stack_pointer(observed.stack_pointer) {
            fail(Field::StackPointer, message);
        }

        for (index, expected) in case.out.stack.iter().enumerate() {
            let result = to_word(expected, WORD_SIZE).and_then(|expected| {
                let actual = read_word(observed.instance, index * WORD_SIZE, WORD_SIZE)?;
                Ok((actual, expected))
            });
            if let Some(message) = compare(result) {
                fail(Field::Stack(index), message);
            }
        }

        for (offset, expected) in &case.out.memory {
            let address = *offset as usize + self.memory_offset as usize;
            let result = to_word(expected, WORD_SIZE).and_then(|expected| {
                let actual = read_word(observed.instance, address, expected.len())?;
                Ok((actual, expected))
            });
            if let Some(message) = compare(result) {
                fail(Field::Memory(*offset), message);
            }
        }

        if let Some(expected) = &case.out.return_value {
            match (to_bytes(expected), observed.return_value) {
                (Err(e), _) => fail(Field::Return, e.to_string()),
                (Ok(expected), None) => {
                    fail(Field::Return, format!("expected {}, got nothing", encode_hex(&expected)))
                }
                (Ok(expected), Some(actual)) if expected != actual => fail(
                    Field::Return,
                    format!("expected {}, got {}", encode_hex(&expected), encode_hex(actual)),
                ),
                _ => {}
            }
        }

        if let Some(expected) = case.out.gas_used {
            if expected != observed.gas_used {
                fail(
                    Field::GasUsed,
                    format!("expected {}, got {}", expected, observed.gas_used),
                );
            }
        }

        failures
    }
}

/// Reason the returned stack pointer is unusable, if any
fn check_stack_pointer(sp: Option<i64>) -> Option<String> {
    match sp {
        None => Some("not a number: the opcode must return the stack pointer".to_string()),
        Some(sp) if sp < 0 => Some(format!("negative: {}", sp)),
        Some(sp) if sp % WORD_SIZE as i64 != 0 => Some(format!("not 32-aligned: {}", sp)),
        Some(_) => None,
    }
}

fn compare(result: crate::error::TestResult<(Vec<u8>, Vec<u8>)>) -> Option<String> {
    match result {
        Err(e) => Some(e.to_string()),
        Ok((actual, expected)) if actual != expected => Some(format!(
            "expected {}, got {}",
            encode_hex(&expected),
            encode_hex(&actual)
        )),
        Ok(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeFactory, Script};
    use crate::marshal::write_word;
    use crate::types::OpcodeTestFile;
    use ewasm_kernel::{HostVm, KernelConfig, Message, VmFactory};

    fn case(json: &str) -> OpcodeTestCase {
        let mut file: OpcodeTestFile = serde_json::from_str(&format!("[{}]", json)).unwrap();
        file.remove(0)
    }

    async fn vm() -> Box<dyn HostVm> {
        let mut vm = FakeFactory::new(Script::default())
            .create(KernelConfig {
                code: Vec::new(),
                state: Default::default(),
                account: Default::default(),
            })
            .unwrap();
        vm.receive(Message::default()).await.unwrap();
        vm
    }

    fn word(byte: u8) -> Vec<u8> {
        let mut word = vec![0u8; 32];
        word[31] = byte;
        word
    }

    #[test]
    fn test_stack_pointer_checks() {
        assert!(check_stack_pointer(Some(0)).is_none());
        assert!(check_stack_pointer(Some(64)).is_none());
        assert!(check_stack_pointer(None).unwrap().starts_with("not a number"));
        assert!(check_stack_pointer(Some(-32)).unwrap().starts_with("negative"));
        assert!(check_stack_pointer(Some(33)).unwrap().starts_with("not 32-aligned"));
    }

    #[tokio::test]
    async fn test_all_fields_pass() {
        let mut vm = vm().await;
        let instance = vm.instance().unwrap();
        write_word(instance, 0, &word(3)).unwrap();
        write_word(instance, 100 + 64, &word(9)).unwrap();

        let case = case(
            r#"{"op": "X", "out": {
                "stack": ["0x03"], "memory": {"64": "0x09"}, "return": "0x2a", "gasUsed": 3
            }}"#,
        );
        let engine = AssertionEngine::new(100);
        let observed = Observation {
            instance: vm.instance().unwrap(),
            stack_pointer: Some(0),
            return_value: Some(&[0x2a]),
            gas_used: 3,
        };
        assert!(engine.check("x.json", &case, &observed).is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_independent() {
        let mut vm = vm().await;
        let case = case(
            r#"{"op": "X", "description": "d", "out": {
                "stack": ["0x01", "0x00"], "memory": {"0": "0x05"}, "return": "0x2a", "gasUsed": 3
            }}"#,
        );
        let observed = Observation {
            instance: vm.instance().unwrap(),
            stack_pointer: Some(-32),
            return_value: None,
            gas_used: 0,
        };
        let failures = AssertionEngine::new(0).check("x.json", &case, &observed);
        let fields: Vec<Field> = failures.iter().map(|f| f.field).collect();

        assert_eq!(
            fields,
            vec![
                Field::StackPointer,
                Field::Stack(0),
                Field::Memory(0),
                Field::Return,
                Field::GasUsed
            ]
        );
        assert_eq!(failures[0].to_string(), "x.json: X (d) StackPointer: negative: -32");
    }

    #[tokio::test]
    async fn test_return_compared_exactly() {
        let mut vm = vm().await;
        let case = case(r#"{"op": "X", "out": {"return": "0x2a"}}"#);
        let observed = Observation {
            instance: vm.instance().unwrap(),
            stack_pointer: Some(0),
            return_value: Some(&[0x00, 0x2a]),
            gas_used: 0,
        };
        let failures = AssertionEngine::new(0).check("x.json", &case, &observed);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, Field::Return);
        assert_eq!(failures[0].message, "expected 0x2a, got 0x002a");
    }

    #[tokio::test]
    async fn test_gas_zero_is_checked() {
        let mut vm = vm().await;
        let case = case(r#"{"op": "X", "out": {"gasUsed": 0}}"#);
        let observed = Observation {
            instance: vm.instance().unwrap(),
            stack_pointer: Some(0),
            return_value: None,
            gas_used: 2,
        };
        let failures = AssertionEngine::new(0).check("x.json", &case, &observed);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, Field::GasUsed);
    }

    #[tokio::test]
    async fn test_bad_expectation_reported() {
        let mut vm = vm().await;
        let case = case(r#"{"op": "X", "out": {"stack": ["0xzz"]}}"#);
        let observed = Observation {
            instance: vm.instance().unwrap(),
            stack_pointer: Some(0),
            return_value: None,
            gas_used: 0,
        };
        let failures = AssertionEngine::new(0).check("x.json", &case, &observed);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].field, Field::Stack(0));
    }

    #[test]
    fn test_file_failure_display() {
        let failure = Failure::new("bad.json", None, Field::Setup, "JSON error: EOF");
        assert_eq!(failure.to_string(), "bad.json: Setup: JSON error: EOF");
    }
}
