//! RPC channel to the debug server
//!
//! This module defines the request/response contract the rest of the TUI is
//! written against, plus the JSON-RPC client that implements it in
//! production. Every operation is awaited to completion before the next is
//! issued, so at most one request is outstanding at any time.

use jsonrpsee::{
    core::client::ClientT,
    http_client::{HttpClient, HttpClientBuilder},
};
use mdb_common::types::{Breakpoint, DebuggerState, Instruction, Register};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::{future::Future, time::Duration};
use tracing::{debug, error};

/// Failures surfaced by the debug channel.
///
/// There is no recoverable category: once the interactive loop is running,
/// any of these aborts the session after being written to the log.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The RPC transport failed: connection lost, timeout, or a
    /// server-side error response.
    #[error("debug server request failed: {0}")]
    Transport(#[from] jsonrpsee::core::ClientError),
    /// The server answered with a payload the client cannot use.
    #[error("malformed response from debug server: {0}")]
    Malformed(String),
    /// The debuggee is not in an inspectable state (e.g. already exited).
    #[error("debuggee not inspectable: {0}")]
    State(String),
}

/// Synchronous request/response contract with the debug server.
///
/// The server performs breakpoint insertion, single-instruction execution,
/// memory reads, and disassembly; the client only ever asks. `step_out` and
/// `continue_execution` block until the debuggee stops again, with no
/// timeout of their own.
pub trait DebugChannel: Send + Sync + 'static {
    /// Query the currently scheduled thread and its program counter.
    fn get_state(&self) -> impl Future<Output = Result<DebuggerState, ChannelError>> + Send;

    /// List the register file of the given thread, in the server's stable
    /// order.
    fn list_registers(
        &self,
        thread_id: i64,
    ) -> impl Future<Output = Result<Vec<Register>, ChannelError>> + Send;

    /// Read exactly `len` bytes of debuggee memory starting at `addr`.
    fn read_memory(
        &self,
        addr: u64,
        len: usize,
    ) -> impl Future<Output = Result<Vec<u8>, ChannelError>> + Send;

    /// Disassemble the address range `[low, high)` for the given thread.
    fn disassemble(
        &self,
        thread_id: i64,
        low: u64,
        high: u64,
    ) -> impl Future<Output = Result<Vec<Instruction>, ChannelError>> + Send;

    /// Execute exactly one machine instruction.
    fn step_instruction(&self) -> impl Future<Output = Result<DebuggerState, ChannelError>> + Send;

    /// Run until the current function returns to its caller.
    fn step_out(&self) -> impl Future<Output = Result<DebuggerState, ChannelError>> + Send;

    /// Run until the next breakpoint is hit or the debuggee exits.
    fn continue_execution(
        &self,
    ) -> impl Future<Output = Result<DebuggerState, ChannelError>> + Send;

    /// Install a breakpoint at a function's entry.
    fn create_breakpoint(
        &self,
        function_name: &str,
    ) -> impl Future<Output = Result<Breakpoint, ChannelError>> + Send;
}

/// JSON-RPC client for debug server communication
pub struct RpcClient {
    client: HttpClient,
    server_url: String,
}

impl RpcClient {
    /// Create a new RPC client.
    ///
    /// The timeout is a backstop against a dead server, not a liveness
    /// bound: `step_out` and `continue` legitimately block until the
    /// debuggee stops, so callers pass a generous value.
    pub fn new(server_url: &str, request_timeout: Duration) -> Result<Self, ChannelError> {
        let client = HttpClientBuilder::default().request_timeout(request_timeout).build(server_url)?;

        debug!("Created RPC client for: {}", server_url);
        Ok(Self { client, server_url: server_url.to_string() })
    }

    /// Probe a server URL with a short timeout.
    pub async fn test_connection(server_url: &str) -> Result<(), ChannelError> {
        debug!("Testing connection to: {}", server_url);

        let client =
            HttpClientBuilder::default().request_timeout(Duration::from_secs(5)).build(server_url)?;

        match client.request::<DebuggerState, _>("debug.getState", rpc_params::build()).await {
            Ok(_) => {
                debug!("Connection test successful for: {}", server_url);
                Ok(())
            }
            Err(e) => {
                debug!("Connection test failed for {}: {}", server_url, e);
                Err(e.into())
            }
        }
    }

    /// Get server URL
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Generic method to make RPC requests with logging
    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> Result<T, ChannelError> {
        debug!("Making RPC request: {}", method);

        match self.client.request(method, params).await {
            Ok(result) => Ok(result),
            Err(e) => {
                error!("{} failed: {}", method, e);
                Err(e.into())
            }
        }
    }
}

impl DebugChannel for RpcClient {
    async fn get_state(&self) -> Result<DebuggerState, ChannelError> {
        self.request("debug.getState", rpc_params::build()).await
    }

    async fn list_registers(&self, thread_id: i64) -> Result<Vec<Register>, ChannelError> {
        self.request("debug.listRegisters", rpc_params::build_with([json!(thread_id)])).await
    }

    async fn read_memory(&self, addr: u64, len: usize) -> Result<Vec<u8>, ChannelError> {
        let encoded: String = self
            .request("debug.readMemory", rpc_params::build_with([json!(addr), json!(len)]))
            .await?;
        let bytes = hex::decode(&encoded)
            .map_err(|e| ChannelError::Malformed(format!("memory payload: {e}")))?;
        if bytes.len() != len {
            return Err(ChannelError::Malformed(format!(
                "memory read returned {} bytes, wanted {len}",
                bytes.len()
            )));
        }
        Ok(bytes)
    }

    async fn disassemble(
        &self,
        thread_id: i64,
        low: u64,
        high: u64,
    ) -> Result<Vec<Instruction>, ChannelError> {
        self.request(
            "debug.disassemble",
            rpc_params::build_with([json!(thread_id), json!(low), json!(high)]),
        )
        .await
    }

    async fn step_instruction(&self) -> Result<DebuggerState, ChannelError> {
        self.request("debug.stepInstruction", rpc_params::build()).await
    }

    async fn step_out(&self) -> Result<DebuggerState, ChannelError> {
        self.request("debug.stepOut", rpc_params::build()).await
    }

    async fn continue_execution(&self) -> Result<DebuggerState, ChannelError> {
        self.request("debug.continue", rpc_params::build()).await
    }

    async fn create_breakpoint(&self, function_name: &str) -> Result<Breakpoint, ChannelError> {
        self.request("debug.createBreakpoint", rpc_params::build_with([json!(function_name)]))
            .await
    }
}

// Helper module for building RPC parameters
mod rpc_params {
    use serde_json::Value;

    pub fn build() -> Vec<Value> {
        vec![]
    }

    pub fn build_with<const N: usize>(params: [Value; N]) -> Vec<Value> {
        params.into_iter().collect()
    }
}

#[cfg(test)]
pub(crate) mod mock {
    //! Scripted in-memory channel for unit tests.
    //!
    //! Responses are queued per operation and popped in call order; every
    //! call is recorded so tests can assert exact RPC sequences.

    use super::{ChannelError, DebugChannel};
    use mdb_common::types::{Breakpoint, DebuggerState, Instruction, Register, ThreadState};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// A scripted state with the given program counter on thread 1.
    pub fn state(pc: u64) -> DebuggerState {
        DebuggerState { current_thread: ThreadState { id: 1, pc }, exited: false }
    }

    #[derive(Debug, Default)]
    pub struct MockChannel {
        pub calls: Mutex<Vec<&'static str>>,
        pub states: Mutex<VecDeque<DebuggerState>>,
        pub registers: Mutex<VecDeque<Vec<Register>>>,
        pub memory: Mutex<VecDeque<Vec<u8>>>,
        pub disasm: Mutex<VecDeque<Vec<Instruction>>>,
    }

    impl MockChannel {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_state(&self, pc: u64) {
            self.states.lock().unwrap().push_back(state(pc));
        }

        pub fn push_registers(&self, registers: Vec<Register>) {
            self.registers.lock().unwrap().push_back(registers);
        }

        pub fn push_memory(&self, bytes: Vec<u8>) {
            self.memory.lock().unwrap().push_back(bytes);
        }

        pub fn push_disasm(&self, instructions: Vec<Instruction>) {
            self.disasm.lock().unwrap().push_back(instructions);
        }

        pub fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }

        pub fn count(&self, name: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|c| **c == name).count()
        }

        fn record(&self, name: &'static str) {
            self.calls.lock().unwrap().push(name);
        }

        fn next<T>(&self, queue: &Mutex<VecDeque<T>>, what: &str) -> Result<T, ChannelError> {
            queue
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| ChannelError::State(format!("mock queue exhausted: {what}")))
        }
    }

    impl DebugChannel for MockChannel {
        async fn get_state(&self) -> Result<DebuggerState, ChannelError> {
            self.record("getState");
            self.next(&self.states, "states")
        }

        async fn list_registers(&self, _thread_id: i64) -> Result<Vec<Register>, ChannelError> {
            self.record("listRegisters");
            self.next(&self.registers, "registers")
        }

        async fn read_memory(&self, _addr: u64, _len: usize) -> Result<Vec<u8>, ChannelError> {
            self.record("readMemory");
            self.next(&self.memory, "memory")
        }

        async fn disassemble(
            &self,
            _thread_id: i64,
            _low: u64,
            _high: u64,
        ) -> Result<Vec<Instruction>, ChannelError> {
            self.record("disassemble");
            self.next(&self.disasm, "disasm")
        }

        async fn step_instruction(&self) -> Result<DebuggerState, ChannelError> {
            self.record("stepInstruction");
            self.next(&self.states, "states")
        }

        async fn step_out(&self) -> Result<DebuggerState, ChannelError> {
            self.record("stepOut");
            self.next(&self.states, "states")
        }

        async fn continue_execution(&self) -> Result<DebuggerState, ChannelError> {
            self.record("continue");
            self.next(&self.states, "states")
        }

        async fn create_breakpoint(&self, function_name: &str) -> Result<Breakpoint, ChannelError> {
            self.record("createBreakpoint");
            Ok(Breakpoint { id: 1, function_name: function_name.to_string(), addr: 0 })
        }
    }
}
