// Copyright 2025 Ojima Abraham
// SPDX-License-Identifier: Apache-2.0

//! Point-in-time query engine.

pub mod engine;

pub use engine::{History, QueryEngine};
