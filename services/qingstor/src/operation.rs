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

use http::Method;
use qingstor_sign_core::time::DateTime;
use serde_json::Map;
use serde_json::Value;

use crate::constants::*;

/// Operation describes one logical call against QingStor.
#[derive(Debug, Clone)]
pub struct Operation {
    /// Name of the api, like `GetObject` or `DeleteMultipleObjects`.
    pub api_name: String,
    /// HTTP method of the request.
    pub method: Method,
    /// Path template that may contain `<bucket-name>` and `<object-key>`.
    pub path: String,
    /// Bucket name, `None` for service level requests.
    pub bucket: Option<String>,
    /// Object key.
    pub object: Option<String>,
    /// Zone override, falls back to [`Config::zone`](crate::Config::zone).
    pub zone: Option<String>,
    /// Unix timestamp the request expires at.
    ///
    /// Setting it switches the builder into presigned url mode.
    pub expires: Option<i64>,
    /// Time used for the `Date` header when the caller didn't provide one.
    pub time: Option<DateTime>,
}

impl Operation {
    /// Create a new operation.
    pub fn new(api_name: impl Into<String>, method: Method, path: impl Into<String>) -> Self {
        Self {
            api_name: api_name.into(),
            method,
            path: path.into(),
            bucket: None,
            object: None,
            zone: None,
            expires: None,
            time: None,
        }
    }

    /// Set bucket
    pub fn with_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set object
    pub fn with_object(mut self, object: impl Into<String>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Set zone
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }

    /// Set expires
    pub fn with_expires(mut self, expires: i64) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// The kind of api this operation calls.
    pub fn api_kind(&self) -> ApiKind {
        ApiKind::from(self.api_name.as_str())
    }

    /// Bucket name if it's set and not empty.
    pub(crate) fn bucket_name(&self) -> Option<&str> {
        self.bucket.as_deref().filter(|v| !v.is_empty())
    }

    pub(crate) fn is_presigned(&self) -> bool {
        self.expires.is_some()
    }
}

/// ApiKind marks the apis that change how the request is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    /// Requires a `Content-MD5` header over the body.
    DeleteMultipleObjects,
    /// Body is encoded by the multipart encoder.
    UploadMultipart,
    /// Everything else.
    Other,
}

impl From<&str> for ApiKind {
    fn from(api_name: &str) -> Self {
        match api_name {
            API_DELETE_MULTIPLE_OBJECTS => ApiKind::DeleteMultipleObjects,
            API_UPLOAD_MULTIPART => ApiKind::UploadMultipart,
            _ => ApiKind::Other,
        }
    }
}

/// Params are the classified parameters of an operation.
///
/// Keys are case sensitive. The header param [`METADATA_PARAM_KEY`] may hold an
/// object of user metadata headers.
#[derive(Debug, Clone, Default)]
pub struct Params {
    /// Query params.
    pub query: Map<String, Value>,
    /// Body params.
    pub body: Map<String, Value>,
    /// Header params.
    pub headers: Map<String, Value>,
    /// Form data params.
    pub form_data: Map<String, Value>,
}

impl Params {
    /// Create empty params.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a query param.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Insert a body param.
    pub fn with_body(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.body.insert(key.into(), value.into());
        self
    }

    /// Insert a header param.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Insert a form data param.
    pub fn with_form_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.form_data.insert(key.into(), value.into());
        self
    }

    /// Insert user metadata headers under [`METADATA_PARAM_KEY`].
    pub fn with_metadata<K, V>(mut self, metadata: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = metadata
            .into_iter()
            .map(|(k, v)| (k.into(), Value::String(v.into())))
            .collect::<Map<String, Value>>();
        self.headers
            .insert(METADATA_PARAM_KEY.to_string(), Value::Object(map));
        self
    }
}

/// Render a param value the way it's sent on the wire.
///
/// Strings are used as is, `null` becomes empty and everything else uses
/// its json text.
pub(crate) fn param_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        v => v.to_string(),
    }
}
