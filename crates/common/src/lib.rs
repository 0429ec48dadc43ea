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

// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
// SPDX-License-Identifier: AGPL-3.0
//! MDB Common - shared functionality for MDB components
//!
//! This crate provides the wire types exchanged with the debug server and
//! the logging setup used by every MDB binary.

/// Types crossing the RPC boundary: execution state, registers, disassembly
pub mod types;

/// Logging setup and utilities for consistent logging across MDB components
pub mod logging;

pub use logging::*;
pub use types::*;
