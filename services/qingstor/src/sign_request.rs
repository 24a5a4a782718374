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

//! QingStor signature.
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt::Write;

use http::Method;
use log::debug;
use once_cell::sync::Lazy;
use percent_encoding::utf8_percent_encode;
use percent_encoding::NON_ALPHANUMERIC;
use qingstor_sign_core::hash::base64_hmac_sha256;
use qingstor_sign_core::Result;

use crate::config::UrlStyle;
use crate::constants::*;
use crate::header::{header_get, Headers};

/// SigningMethod is the method that used in signing.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SigningMethod {
    /// Signing with the `Authorization` header.
    Header,
    /// Signing with query, used to build presigned urls.
    Query,
}

/// Path used in the canonicalized resource.
///
/// Virtual host style urls carry the bucket in their host, so it's put back
/// in front of the path. Service level requests use the url path as is.
pub fn auth_path(url_path: &str, bucket: Option<&str>, style: UrlStyle) -> String {
    match (style, bucket) {
        (UrlStyle::VirtualHostStyle, Some(bucket)) => format!("/{bucket}{url_path}"),
        _ => url_path.to_string(),
    }
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// VERB + "\n" +
/// Content-MD5 + "\n" +
/// Content-Type + "\n" +
/// (Expires or Date) + "\n" +
/// CanonicalizedHeaders +
/// CanonicalizedResource;
/// ```
pub fn string_to_sign(
    method: &Method,
    path: &str,
    headers: &Headers,
    query: &BTreeMap<String, String>,
) -> Result<String> {
    let mut s = String::new();
    writeln!(&mut s, "{}", method.as_str())?;
    writeln!(&mut s, "{}", header_get(headers, CONTENT_MD5).unwrap_or_default())?;
    writeln!(&mut s, "{}", header_get(headers, CONTENT_TYPE).unwrap_or_default())?;
    match header_get(headers, EXPIRES).filter(|v| !v.is_empty()) {
        Some(expires) => writeln!(&mut s, "{expires}")?,
        None => writeln!(&mut s, "{}", header_get(headers, DATE).unwrap_or_default())?,
    }

    for (k, v) in canonicalize_header(headers) {
        writeln!(&mut s, "{k}:{v}")?;
    }
    s.write_str(&canonicalize_resource(path, query))?;

    debug!("string to sign: {}", &s);
    Ok(s)
}

/// Collect `x-qs-` headers with lowercase names and trimmed values, sorted
/// by name.
fn canonicalize_header(headers: &Headers) -> Vec<(String, String)> {
    let mut h = headers
        .iter()
        .map(|(k, v)| (k.to_lowercase(), v.trim().to_string()))
        .filter(|(k, _)| k.starts_with(X_QS_HEADER_PREFIX))
        .collect::<Vec<_>>();
    h.sort();
    h
}

fn canonicalize_resource(path: &str, query: &BTreeMap<String, String>) -> String {
    // BTreeMap iterates in key order already.
    let params = query
        .iter()
        .filter(|(k, _)| is_sub_resource(k))
        .map(|(k, v)| {
            if v.is_empty() {
                k.to_string()
            } else {
                format!("{k}={v}")
            }
        })
        .collect::<Vec<_>>();

    if params.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", params.join("&"))
    }
}

fn is_sub_resource(param: &str) -> bool {
    SUBRESOURCES.contains(param)
}

// Please attention: the subsources are case sensitive.
static SUBRESOURCES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "acl",
        "append",
        "cname",
        "cors",
        "delete",
        "image",
        "lifecycle",
        "logging",
        "mirror",
        "notification",
        "part_number",
        "policy",
        "position",
        "replication",
        "response-cache-control",
        "response-content-disposition",
        "response-content-encoding",
        "response-content-language",
        "response-content-type",
        "response-expires",
        "stats",
        "tagging",
        "upload_id",
        "uploads",
    ])
});

/// Compute the signature of `string_to_sign`.
pub fn signature(secret_access_key: &str, string_to_sign: &str) -> String {
    base64_hmac_sha256(secret_access_key.as_bytes(), string_to_sign.as_bytes())
}

/// Format an `Authorization` header value.
pub fn authorization(access_key_id: &str, signature: &str) -> String {
    format!("QS {access_key_id}:{signature}")
}

/// Percent encode a signature for the `signature` query param.
pub fn encode_signature(signature: &str) -> String {
    utf8_percent_encode(signature, NON_ALPHANUMERIC).to_string()
}

/// Sign `string_to_sign` for the given method.
///
/// - [`SigningMethod::Header`] returns the `Authorization` value.
/// - [`SigningMethod::Query`] returns the url encoded signature.
pub fn sign(
    method: SigningMethod,
    access_key_id: &str,
    secret_access_key: &str,
    string_to_sign: &str,
) -> String {
    let signature = signature(secret_access_key, string_to_sign);
    match method {
        SigningMethod::Header => authorization(access_key_id, &signature),
        SigningMethod::Query => encode_signature(&signature),
    }
}
