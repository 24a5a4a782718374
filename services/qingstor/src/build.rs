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

//! Build signed QingStor requests and presigned urls.

use std::collections::BTreeMap;
use std::str::FromStr;

use http::header::HeaderName;
use http::HeaderMap;
use http::HeaderValue;
use http::Uri;
use log::debug;
use percent_encoding::utf8_percent_encode;
use qingstor_sign_core::utils::redact_authorization;
use qingstor_sign_core::{Error, Result};
use serde_json::Map;
use serde_json::Value;

use crate::body::{BodyInput, BodyKind, EncodeBody};
use crate::config::Config;
use crate::constants::*;
use crate::digest::apply_content_md5;
use crate::header::{self, header_get, header_insert, Headers};
use crate::operation::{ApiKind, Operation, Params};
use crate::sign_request::{self, auth_path, SigningMethod};
use crate::url::{self, ComposedUrl};

/// Whether the builder holds a signature already.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SignState {
    Unsigned,
    /// The `Authorization` value in header mode or the url encoded
    /// signature in query mode.
    Signed(String),
}

/// Builder turns one [`Operation`] into a signed request or a presigned url.
///
/// A builder is created for a single operation and dropped after the
/// request is built. It only reads the shared [`Config`].
///
/// ```
/// use http::Method;
/// use qingstor_sign::{Builder, Config, NormalBody, Operation, Params};
///
/// # fn main() -> qingstor_sign_core::Result<()> {
/// let config = Config::new()
///     .with_zone("pek3a")
///     .with_access_key_id("ACCESS_KEY_ID")
///     .with_secret_access_key("SECRET_ACCESS_KEY");
/// let op = Operation::new("GetObject", Method::GET, "/<bucket-name>/<object-key>")
///     .with_bucket("mybucket")
///     .with_object("music.mp3");
///
/// let req = Builder::new(&config, op, Params::new())?.build_request(&NormalBody)?;
/// assert_eq!(req.uri(), "https://pek3a.qingstor.com/mybucket/music.mp3");
/// assert!(req.headers().contains_key(http::header::AUTHORIZATION));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Builder<'a> {
    config: &'a Config,
    op: Operation,
    zone: String,
    suffix: String,
    url: ComposedUrl,
    headers: Headers,
    body: Map<String, Value>,
    form_data: Map<String, Value>,
    access_key_id: Option<String>,
    state: SignState,
}

impl<'a> Builder<'a> {
    /// Create a builder and run every step that doesn't need a signature:
    /// header normalization, content md5 and url composition.
    pub fn new(config: &'a Config, op: Operation, params: Params) -> Result<Self> {
        let Params {
            query,
            body,
            headers,
            form_data,
        } = params;

        let mut headers = header::normalize(headers, config, &op);
        apply_content_md5(&mut headers, op.api_kind(), &body)?;
        let headers = header::encode_non_ascii(headers);

        let zone = op
            .zone
            .clone()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| config.zone.clone());
        let suffix = url::suffix_path(&op.path, op.object.as_deref());
        let url = url::compose(
            &config.endpoint,
            &zone,
            op.bucket_name(),
            config.url_style(),
            &suffix,
            &query,
        )?;

        Ok(Self {
            config,
            op,
            zone,
            suffix,
            url,
            headers,
            body,
            form_data,
            access_key_id: None,
            state: SignState::Unsigned,
        })
    }

    /// The operation this builder was created for.
    pub fn operation(&self) -> &Operation {
        &self.op
    }

    /// The composed request url.
    pub fn url(&self) -> &str {
        &self.url.url
    }

    /// Query params parsed back from the request url.
    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.url.query
    }

    /// Headers that will be signed and sent.
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Whether a signature is held by this builder.
    pub fn is_signed(&self) -> bool {
        matches!(self.state, SignState::Signed(_))
    }

    fn signing_method(&self) -> SigningMethod {
        if self.op.is_presigned() {
            SigningMethod::Query
        } else {
            SigningMethod::Header
        }
    }

    fn access_key_id(&self) -> &str {
        self.access_key_id
            .as_deref()
            .unwrap_or(&self.config.access_key_id)
    }

    /// Overwrite a header directly.
    ///
    /// The value is not normalized, callers must keep it ascii safe. Setting a
    /// non-empty `Authorization` marks the request as signed, setting it empty
    /// makes the next [`Builder::signature`] sign again.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let (key, value) = (key.into(), value.into());
        if key.eq_ignore_ascii_case(AUTHORIZATION) {
            self.state = if value.is_empty() {
                SignState::Unsigned
            } else {
                SignState::Signed(value.clone())
            };
        }
        header_insert(&mut self.headers, key, value);
    }

    /// Use a signature computed elsewhere, for example by a signing server
    /// that holds the secret key.
    ///
    /// `access_key` is used for this request only, the shared [`Config`] is
    /// not touched. Build a new config with [`Config::with_access_key_id`]
    /// to keep it for later requests.
    pub fn set_signature(&mut self, access_key: &str, signature: &str) {
        let value = match self.signing_method() {
            SigningMethod::Header => {
                let value = sign_request::authorization(access_key, signature);
                header_insert(&mut self.headers, AUTHORIZATION, value.clone());
                value
            }
            SigningMethod::Query => sign_request::encode_signature(signature),
        };

        self.access_key_id = Some(access_key.to_string());
        self.state = SignState::Signed(value);
    }

    /// Build the string to sign of this request.
    pub fn string_to_sign(&self) -> Result<String> {
        let path = auth_path(
            self.url.uri.path(),
            self.op.bucket_name(),
            self.config.url_style(),
        );
        sign_request::string_to_sign(&self.op.method, &path, &self.headers, &self.url.query)
    }

    /// Get the signature, signing the request on first call.
    ///
    /// - header mode returns the `Authorization` value and stores it in the headers.
    /// - query mode returns the url encoded signature.
    ///
    /// Later calls return the same value without signing again.
    pub fn signature(&mut self) -> Result<String> {
        if let SignState::Signed(v) = &self.state {
            return Ok(v.clone());
        }

        let method = self.signing_method();
        let string_to_sign = self
            .string_to_sign()
            .map_err(|e| Error::signing_failed("auth signature error").with_source(e))?;
        let signed = sign_request::sign(
            method,
            self.access_key_id(),
            &self.config.secret_access_key,
            &string_to_sign,
        );

        if method == SigningMethod::Header {
            header_insert(&mut self.headers, AUTHORIZATION, signed.clone());
        }
        debug!("{method:?} signature: {}", redact_authorization(&signed));

        self.state = SignState::Signed(signed.clone());
        Ok(signed)
    }

    /// The encoder kind the request body is handed to.
    ///
    /// Form data wins over everything, then multipart uploads, then normal
    /// bodies.
    pub fn body_kind(&self) -> BodyKind {
        if !self.form_data.is_empty() {
            BodyKind::Form
        } else if self.op.api_kind() == ApiKind::UploadMultipart {
            BodyKind::Multipart
        } else {
            BodyKind::Normal
        }
    }

    /// Sign and build the request to send.
    ///
    /// Fails with [`ErrorKind::InvalidUsage`](qingstor_sign_core::ErrorKind::InvalidUsage)
    /// if the operation has `expires` set, use [`Builder::presigned_url`] instead.
    pub fn build_request<E: EncodeBody>(&mut self, encoder: &E) -> Result<http::Request<E::Body>> {
        let kind = self.body_kind();
        self.build_request_with(encoder, kind)
    }

    /// Same as [`Builder::build_request`] but hands the body to `encoder` as
    /// `kind` instead of the selected kind.
    pub fn build_request_with<E: EncodeBody>(
        &mut self,
        encoder: &E,
        kind: BodyKind,
    ) -> Result<http::Request<E::Body>> {
        if self.op.is_presigned() {
            return Err(Error::invalid_usage(
                "request with expires must be built with presigned_url",
            ));
        }

        self.signature()?;

        let content_length = match header_get(&self.headers, CONTENT_LENGTH) {
            Some(v) => v.trim().parse::<u64>().map_err(|e| {
                Error::request_invalid(format!("invalid content length {v}")).with_source(e)
            })?,
            None => 0,
        };
        let params = match kind {
            BodyKind::Form => &self.form_data,
            _ => &self.body,
        };
        debug!("encode {kind:?} body with {} params", params.len());

        let body = encoder.encode(BodyInput {
            kind,
            content_type: header_get(&self.headers, CONTENT_TYPE),
            content_length,
            method: &self.op.method,
            params,
            query: &self.url.query,
        })?;

        let mut headers = HeaderMap::with_capacity(self.headers.len());
        for (k, v) in &self.headers {
            let mut value = HeaderValue::from_str(v)?;
            if k.eq_ignore_ascii_case(AUTHORIZATION) {
                value.set_sensitive(true);
            }
            headers.insert(HeaderName::from_str(k)?, value);
        }

        let mut req = http::Request::new(body);
        *req.method_mut() = self.op.method.clone();
        *req.uri_mut() = self.url.uri.clone();
        *req.headers_mut() = headers;
        Ok(req)
    }

    /// Build the presigned url of this request.
    ///
    /// The url looks like
    /// `{base}/{path}?access_key_id={id}&expires={expires}&signature={signature}`
    /// followed by the rest of the query params.
    ///
    /// Fails with [`ErrorKind::InvalidUsage`](qingstor_sign_core::ErrorKind::InvalidUsage)
    /// if the operation has no `expires`.
    pub fn presigned_url(&mut self) -> Result<String> {
        let Some(expires) = self.op.expires else {
            return Err(Error::invalid_usage(
                "presigned url requires expires to be set",
            ));
        };
        let signature = self.signature()?;

        let base = url::base_url(
            &self.config.endpoint,
            &self.zone,
            self.op.bucket_name(),
            self.config.url_style(),
        );
        let suffix = if self.suffix.starts_with('/') {
            self.suffix.clone()
        } else {
            format!("/{}", self.suffix)
        };
        let (sep, existing) = match suffix.split_once('?') {
            Some((_, q)) => ('&', url::canonical_query(q)),
            None => ('?', BTreeMap::new()),
        };

        let access_key_id = utf8_percent_encode(self.access_key_id(), &QUERY_ENCODE_SET);
        let presigned = format!(
            "{base}{suffix}{sep}{QUERY_ACCESS_KEY_ID}={access_key_id}&{QUERY_EXPIRES}={expires}&{QUERY_SIGNATURE}={signature}"
        );
        let presigned = url::append_query(
            &presigned,
            self.url
                .query
                .iter()
                .filter(|(k, _)| {
                    !existing.contains_key(*k)
                        && ![QUERY_ACCESS_KEY_ID, QUERY_EXPIRES, QUERY_SIGNATURE]
                            .contains(&k.as_str())
                })
                .map(|(k, v)| (k.as_str(), v.clone())),
        );

        Uri::from_str(&presigned).map_err(|e| {
            Error::url_malformed(format!("the presigned url {presigned} is malformed"))
                .with_source(e)
        })?;
        debug!("presigned url: {presigned}");
        Ok(presigned)
    }
}
