// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Black-box specs for the `punch` binary.
//!
//! The files under `cli/` are compiled as integration tests of the
//! `punch` package so `cargo_bin_cmd!` can find the binary.
