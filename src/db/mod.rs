// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Persistence layer.

pub mod session_store;

pub use session_store::SessionStore;
