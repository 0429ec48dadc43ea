// MDB - Machine-State Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Step-over-call stepping policy
//!
//! A "step over" inspects the instruction at the program counter before
//! executing anything: if it is a call, the single step into the callee is
//! compensated with an immediate step-out, so the whole callee reads as one
//! step.

use crate::arch;
use crate::rpc::{ChannelError, DebugChannel};
use tracing::debug;

/// Upper bound on one instruction's encoded length; sizes the
/// single-instruction disassembly query at the program counter.
const MAX_INSTRUCTION_BYTES: u64 = 16;

/// Step commands bound to the input surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCommand {
    /// Step one instruction, treating a called function as atomic.
    OverCall,
    /// Step exactly one machine instruction, calls included.
    Into,
    /// Run until the current function returns.
    Out,
}

/// Execute one step command against the channel.
///
/// Blocks until every RPC the command issues has returned; the caller
/// decides how long it is willing to wait.
pub async fn run<C: DebugChannel>(channel: &C, command: StepCommand) -> Result<(), ChannelError> {
    match command {
        StepCommand::OverCall => step_over(channel).await,
        StepCommand::Into => {
            channel.step_instruction().await?;
            Ok(())
        }
        StepCommand::Out => {
            channel.step_out().await?;
            Ok(())
        }
    }
}

/// Single-step, then step out of the callee when the instruction at the
/// program counter is a call.
async fn step_over<C: DebugChannel>(channel: &C) -> Result<(), ChannelError> {
    let state = channel.get_state().await?;
    let pc = state.current_thread.pc;

    let window = channel
        .disassemble(state.current_thread.id, pc, pc + MAX_INSTRUCTION_BYTES)
        .await?;
    let is_call = window
        .iter()
        .find(|instruction| instruction.at_pc || instruction.address == pc)
        .map(|instruction| arch::is_call(&instruction.text))
        .unwrap_or(false);
    debug!(pc, is_call, "step over");

    channel.step_instruction().await?;
    if is_call {
        channel.step_out().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rpc::mock::MockChannel;
    use mdb_common::types::Instruction;

    fn instruction(address: u64, text: &str, at_pc: bool) -> Instruction {
        Instruction {
            address,
            bytes: vec![0x90],
            text: text.to_string(),
            function: Some("main.main".to_string()),
            at_pc,
        }
    }

    #[tokio::test]
    async fn step_over_call_steps_then_steps_out() {
        let channel = MockChannel::new();
        channel.push_state(0x4000);
        channel.push_disasm(vec![instruction(0x4000, "CALL main.callee", true)]);
        channel.push_state(0x9000); // inside the callee after the single step
        channel.push_state(0x4005); // back in the caller after the step-out

        run(&channel, StepCommand::OverCall).await.unwrap();

        assert_eq!(channel.count("stepInstruction"), 1);
        assert_eq!(channel.count("stepOut"), 1);
        assert_eq!(channel.calls(), vec!["getState", "disassemble", "stepInstruction", "stepOut"]);
    }

    #[tokio::test]
    async fn step_over_non_call_steps_once() {
        let channel = MockChannel::new();
        channel.push_state(0x4000);
        channel.push_disasm(vec![instruction(0x4000, "MOV AX, BX", true)]);
        channel.push_state(0x4003);

        run(&channel, StepCommand::OverCall).await.unwrap();

        assert_eq!(channel.count("stepInstruction"), 1);
        assert_eq!(channel.count("stepOut"), 0);
    }

    #[tokio::test]
    async fn step_over_classifies_the_at_pc_instruction_only() {
        // A call elsewhere in the window must not trigger the step-out.
        let channel = MockChannel::new();
        channel.push_state(0x4003);
        channel.push_disasm(vec![
            instruction(0x4000, "CALL main.callee", false),
            instruction(0x4003, "ADD AX, 1", true),
        ]);
        channel.push_state(0x4006);

        run(&channel, StepCommand::OverCall).await.unwrap();

        assert_eq!(channel.count("stepOut"), 0);
    }

    #[tokio::test]
    async fn step_into_ignores_call_classification() {
        let channel = MockChannel::new();
        channel.push_state(0x9000);

        run(&channel, StepCommand::Into).await.unwrap();

        assert_eq!(channel.calls(), vec!["stepInstruction"]);
    }

    #[tokio::test]
    async fn step_out_issues_only_step_out() {
        let channel = MockChannel::new();
        channel.push_state(0x4005);

        run(&channel, StepCommand::Out).await.unwrap();

        assert_eq!(channel.calls(), vec!["stepOut"]);
    }

    #[tokio::test]
    async fn empty_window_is_treated_as_non_call() {
        let channel = MockChannel::new();
        channel.push_state(0x4000);
        channel.push_disasm(Vec::new());
        channel.push_state(0x4001);

        run(&channel, StepCommand::OverCall).await.unwrap();

        assert_eq!(channel.count("stepInstruction"), 1);
        assert_eq!(channel.count("stepOut"), 0);
    }
}
