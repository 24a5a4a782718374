// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Core components for building and signing QingStor requests.
//!
//! This crate provides the service independent pieces used by
//! `qingstor-sign`:
//!
//! - [`Error`] and [`ErrorKind`]: the error taxonomy shared by every build step.
//! - [`Context`] and [`Env`]: where configuration values are loaded from.
//! - [`hash`]: base64, MD5 and HMAC-SHA256 helpers.
//! - [`time`]: http date formatting.
//! - [`utils`]: data redaction for logs and `Debug` output.

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

pub mod hash;
pub mod time;
pub mod utils;

mod context;
pub use context::Context;
pub use context::Env;
pub use context::NoopEnv;
pub use context::OsEnv;
pub use context::StaticEnv;

mod error;
pub use error::{Error, ErrorKind, Result};
