// Copyright 2019-2026 Maravilla Labs, operated by SOLUTAS GmbH, Switzerland
// SPDX-License-Identifier: Apache-2.0
// SPDX-License-Identifier: MIT

//! HTTP server components.
//!
//! # Components
//!
//! - `http`: routes, handlers and response conversion using Axum
//! - `body_parser`: reading axum requests into `FormRequest`

/// Request conversion with a body size limit.
pub mod body_parser;
/// HTTP server implementation using Axum.
pub mod http;
