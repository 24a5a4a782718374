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

//! Select and drive the encoder that turns params into a request body.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::Method;
use qingstor_sign_core::{Error, Result};
use serde_json::Map;
use serde_json::Value;

use crate::constants::*;

/// BodyKind is the encoder a request body is handed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Json fields or a raw `Body` string.
    Normal,
    /// A part of a multipart upload.
    Multipart,
    /// Form data fields.
    Form,
}

/// BodyInput carries everything an encoder needs to build a body.
#[derive(Debug)]
pub struct BodyInput<'a> {
    /// Kind selected for this request.
    pub kind: BodyKind,
    /// Value of the `Content-Type` header if present.
    pub content_type: Option<&'a str>,
    /// Value of the `Content-Length` header, `0` if absent.
    pub content_length: u64,
    /// HTTP method of the request.
    pub method: &'a Method,
    /// Body params, or form data params for [`BodyKind::Form`].
    pub params: &'a Map<String, Value>,
    /// Canonical query params of the request url.
    pub query: &'a BTreeMap<String, String>,
}

/// EncodeBody turns body params into a transmittable payload.
///
/// Implementations live outside this crate, the builder only decides which
/// kind applies and passes the finalized params along.
pub trait EncodeBody {
    /// Payload type of the built request.
    type Body;

    /// Encode the body for the given input.
    fn encode(&self, input: BodyInput<'_>) -> Result<Self::Body>;
}

/// Serialize body params the way a normal body is sent.
///
/// A single string `Body` param is sent as is, anything else is sent as a
/// json object.
pub fn body_content(params: &Map<String, Value>) -> Result<String> {
    if params.len() == 1 {
        if let Some(Value::String(s)) = params.get(BODY_PARAM_KEY) {
            return Ok(s.clone());
        }
    }

    Ok(serde_json::to_string(params)?)
}

/// NormalBody encodes [`BodyKind::Normal`] bodies with [`body_content`].
///
/// Empty params produce an empty body. Other kinds are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalBody;

impl EncodeBody for NormalBody {
    type Body = Bytes;

    fn encode(&self, input: BodyInput<'_>) -> Result<Bytes> {
        if input.kind != BodyKind::Normal {
            return Err(Error::request_invalid(format!(
                "normal body encoder can't encode {:?} body",
                input.kind
            )));
        }
        if input.params.is_empty() {
            return Ok(Bytes::new());
        }

        Ok(Bytes::from(body_content(input.params)?))
    }
}
