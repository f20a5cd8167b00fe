// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - session, transport and response handling.

pub mod cancel;
pub mod endpoints;
pub mod gateway;
pub mod normalize;
pub mod scope;
pub mod session;

pub use cancel::{ScopeGuard, ViewScope};
pub use endpoints::{Endpoint, EndpointResolver, Locale};
pub use gateway::{ApiResponse, Gateway, MultipartForm, RequestBody, RequestDescriptor};
pub use normalize::{latest, normalize_list};
pub use scope::filter_by_scope;
pub use session::SessionManager;
