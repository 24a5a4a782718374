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

//! Build and sign requests for QingStor object storage.
//!
//! [`Builder`] takes a shared [`Config`], one [`Operation`] and its
//! classified [`Params`], then produces either a signed `http::Request` or a
//! presigned url.
//!
//! - [Signature](https://docsv4.qingcloud.com/user_guide/storage/object_storage/api/signature/)

// Make sure all our public APIs have docs.
#![warn(missing_docs)]

mod constants;

mod config;
pub use config::Config;
pub use config::UrlStyle;

mod operation;
pub use operation::ApiKind;
pub use operation::Operation;
pub use operation::Params;

pub mod header;
pub use header::Headers;

mod digest;

pub mod url;

pub mod sign_request;
pub use sign_request::SigningMethod;

mod body;
pub use body::{body_content, BodyInput, BodyKind, EncodeBody, NormalBody};

mod build;
pub use build::Builder;
