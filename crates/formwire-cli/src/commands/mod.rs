// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! CLI command implementations.
//!
//! - `init`: Initialize a new formwire project
//! - `serve`: Serve the todo application
//! - `actions`: List registered action identifiers

/// Action listing command.
pub mod actions;
/// Project initialization command.
pub mod init;
/// Server command.
pub mod serve;
