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

//! Compose request urls for QingStor.

use std::collections::BTreeMap;
use std::str::FromStr;

use http::Uri;
use log::debug;
use percent_encoding::utf8_percent_encode;
use qingstor_sign_core::{Error, Result};
use serde_json::Map;
use serde_json::Value;

use crate::config::UrlStyle;
use crate::constants::*;
use crate::operation::param_to_string;

/// Percent encode every byte outside the ascii safe set.
///
/// Used for object keys in paths and for header values that carry non-ascii
/// characters. Decoding the result gives back the original utf-8 bytes.
pub fn ascii_encode(s: &str) -> String {
    utf8_percent_encode(s, &ASCII_ENCODE_SET).to_string()
}

/// Encode a query key or value.
fn query_encode(s: &str) -> String {
    utf8_percent_encode(s, &QUERY_ENCODE_SET).to_string()
}

/// Build the path after the bucket part of a path template.
///
/// `/<bucket-name>` is removed and `<object-key>` is replaced by the encoded
/// object name when there is one.
pub fn suffix_path(template: &str, object: Option<&str>) -> String {
    let path = template.replace(&format!("/{BUCKET_PLACEHOLDER}"), "");
    match object {
        Some(object) => path.replace(OBJECT_PLACEHOLDER, &ascii_encode(object)),
        None => path,
    }
}

/// Resolve the url prefix before the suffix path.
///
/// - no bucket: `{endpoint}`
/// - path style: `scheme://{zone}.{host}/{bucket}`
/// - virtual host style: `scheme://{bucket}.{zone}.{host}`
///
/// An empty zone is not inserted.
pub fn base_url(endpoint: &str, zone: &str, bucket: Option<&str>, style: UrlStyle) -> String {
    let Some(bucket) = bucket else {
        return endpoint.to_string();
    };

    let zone_prefix = if zone.is_empty() {
        String::new()
    } else {
        format!("{zone}.")
    };

    match style {
        UrlStyle::PathStyle => {
            let host = endpoint.replacen("://", &format!("://{zone_prefix}"), 1);
            format!("{host}/{bucket}")
        }
        UrlStyle::VirtualHostStyle => {
            endpoint.replacen("://", &format!("://{bucket}.{zone_prefix}"), 1)
        }
    }
}

/// Append query params to url in sorted order.
///
/// Empty values are written as a bare key. `&` is used instead of `?` when
/// the url already carries a query.
pub fn append_query<'a, I>(url: &str, query: I) -> String
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    let mut pairs = query.into_iter().collect::<Vec<_>>();
    pairs.sort();

    let mut s = String::with_capacity(url.len() + 16);
    s.push_str(url);
    for (idx, (k, v)) in pairs.into_iter().enumerate() {
        if idx == 0 {
            s.push(if url.contains('?') { '&' } else { '?' });
        } else {
            s.push('&');
        }
        s.push_str(&query_encode(k));
        if !v.is_empty() {
            s.push('=');
            s.push_str(&query_encode(&v));
        }
    }
    s
}

/// Parse a query string into a map, the first value of a repeated key wins.
pub fn canonical_query(query: &str) -> BTreeMap<String, String> {
    let mut m = BTreeMap::new();
    for (k, v) in form_urlencoded::parse(query.as_bytes()) {
        m.entry(k.into_owned()).or_insert_with(|| v.into_owned());
    }
    m
}

/// ComposedUrl is the result of url composition.
#[derive(Debug, Clone)]
pub struct ComposedUrl {
    /// The full request url.
    pub url: String,
    /// Parsed form of `url`.
    pub uri: Uri,
    /// Query params parsed back from `url`.
    ///
    /// These are the params used for signing.
    pub query: BTreeMap<String, String>,
}

/// Compose the request url and re-derive its canonical query.
pub fn compose(
    endpoint: &str,
    zone: &str,
    bucket: Option<&str>,
    style: UrlStyle,
    suffix: &str,
    query: &Map<String, Value>,
) -> Result<ComposedUrl> {
    let prefix = base_url(endpoint, zone, bucket, style);
    let url = append_query(
        &format!("{prefix}{suffix}"),
        query.iter().map(|(k, v)| (k.as_str(), param_to_string(v))),
    );

    debug!("request url: {url}");

    let uri = Uri::from_str(&url)?;
    if uri.scheme().is_none() || uri.authority().is_none() {
        return Err(Error::url_malformed(format!(
            "the request url {url} is malformed: scheme and host are required"
        )));
    }
    let query = uri.query().map(canonical_query).unwrap_or_default();
    Ok(ComposedUrl { url, uri, query })
}
