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

//! Normalize header params into the headers that will be signed and sent.

use std::collections::BTreeMap;

use log::debug;
use qingstor_sign_core::time::{format_http_date, now};
use serde_json::Map;
use serde_json::Value;

use crate::config::Config;
use crate::constants::*;
use crate::operation::{param_to_string, Operation};
use crate::url::ascii_encode;

/// Headers keyed by name. Names are unique ignoring ascii case.
pub type Headers = BTreeMap<String, String>;

/// Get a header value with case insensitive name matching.
pub(crate) fn header_get<'a>(headers: &'a Headers, key: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v.as_str())
}

/// Set a header, replacing every existing entry whose name matches `key`
/// ignoring ascii case.
pub(crate) fn header_insert(
    headers: &mut Headers,
    key: impl Into<String>,
    value: impl Into<String>,
) {
    let key = key.into();
    headers.retain(|k, _| !k.eq_ignore_ascii_case(&key));
    headers.insert(key, value.into());
}

/// Normalize classified header params.
///
/// The passes run in this order:
///
/// 1. entries of [`METADATA_PARAM_KEY`] are promoted to headers and the key is removed.
/// 2. `User-Agent` is overwritten by [`Config::additional_user_agent`].
/// 3. in presigned mode every header is dropped and only `Expires` is kept.
/// 4. otherwise `Date` is set if the caller didn't provide one.
///
/// Non-ascii values are left untouched here, see [`encode_non_ascii`].
pub fn normalize(mut params: Map<String, Value>, config: &Config, op: &Operation) -> Headers {
    let metadata = params.remove(METADATA_PARAM_KEY);

    let mut headers = Headers::new();
    for (k, v) in params {
        header_insert(&mut headers, k, param_to_string(&v));
    }

    if let Some(Value::Object(metadata)) = metadata {
        for (k, v) in metadata {
            header_insert(&mut headers, k, param_to_string(&v));
        }
    }

    if let Some(ua) = &config.additional_user_agent {
        header_insert(&mut headers, USER_AGENT, ua.clone());
    }

    if let Some(expires) = op.expires {
        headers.clear();
        headers.insert(EXPIRES.to_string(), expires.to_string());
    } else if header_get(&headers, DATE).is_none() {
        let date = format_http_date(op.time.unwrap_or_else(now));
        debug!("insert date header: {date}");
        header_insert(&mut headers, DATE, date);
    }

    headers
}

/// Replace every value that contains a code point above 127 with its ascii
/// safe percent encoding.
///
/// Pure ascii values are kept byte for byte.
pub fn encode_non_ascii(headers: Headers) -> Headers {
    headers
        .into_iter()
        .map(|(k, v)| {
            if v.is_ascii() {
                (k, v)
            } else {
                (k, ascii_encode(&v))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use http::Method;
    use percent_encoding::percent_decode_str;
    use pretty_assertions::assert_eq;
    use qingstor_sign_core::time::parse_http_date;
    use serde_json::json;

    use super::*;
    use crate::operation::Params;

    fn op() -> Operation {
        Operation::new("PutObject", Method::PUT, "/<bucket-name>/<object-key>")
            .with_bucket("mybucket")
            .with_object("obj")
    }

    #[test]
    fn test_flatten_metadata() {
        let params = Params::new()
            .with_header("x-qs-meta-color", "blue")
            .with_header(DATE, "Mon, 01 Jan 2024 00:00:00 GMT")
            .with_metadata([("x-qs-meta-color", "red"), ("x-qs-meta-size", "1")]);

        let headers = normalize(params.headers, &Config::new(), &op());

        assert_eq!(headers.get("x-qs-meta-color").map(String::as_str), Some("red"));
        assert_eq!(headers.get("x-qs-meta-size").map(String::as_str), Some("1"));
        assert!(!headers.contains_key(METADATA_PARAM_KEY));
    }

    #[test]
    fn test_user_agent_overwritten() {
        let params = Params::new().with_header(USER_AGENT, "default/0.1");
        let cfg = Config::new().with_additional_user_agent("app/1.0");

        let headers = normalize(params.headers, &cfg, &op());
        assert_eq!(headers.get(USER_AGENT).map(String::as_str), Some("app/1.0"));
    }

    #[test]
    fn test_overrides_ignore_name_case() -> qingstor_sign_core::Result<()> {
        let t = parse_http_date("Wed, 10 Dec 2014 17:20:31 GMT")?;
        let params = Params::new()
            .with_header("user-agent", "default/0.1")
            .with_header("X-QS-Meta-Color", "blue")
            .with_metadata([("x-qs-meta-color", "red")]);
        let cfg = Config::new().with_additional_user_agent("app/1.0");

        let headers = normalize(params.headers, &cfg, &op().with_time(t));

        assert_eq!(
            headers.keys().map(String::as_str).collect::<Vec<_>>(),
            vec![DATE, USER_AGENT, "x-qs-meta-color"]
        );
        assert_eq!(header_get(&headers, USER_AGENT), Some("app/1.0"));
        assert_eq!(header_get(&headers, "x-qs-meta-color"), Some("red"));
        Ok(())
    }

    #[test]
    fn test_presigned_keeps_only_expires() {
        let params = Params::new()
            .with_header(CONTENT_TYPE, "text/plain")
            .with_metadata([("x-qs-meta-color", "red")]);
        let cfg = Config::new().with_additional_user_agent("app/1.0");

        let headers = normalize(params.headers, &cfg, &op().with_expires(1700000000));

        assert_eq!(
            headers,
            Headers::from([(EXPIRES.to_string(), "1700000000".to_string())])
        );
    }

    #[test]
    fn test_date_inserted_from_operation_time() -> qingstor_sign_core::Result<()> {
        let t = parse_http_date("Wed, 10 Dec 2014 17:20:31 GMT")?;

        let headers = normalize(Map::new(), &Config::new(), &op().with_time(t));
        assert_eq!(
            headers.get(DATE).map(String::as_str),
            Some("Wed, 10 Dec 2014 17:20:31 GMT")
        );
        Ok(())
    }

    #[test]
    fn test_date_kept_when_provided() {
        let params = Params::new().with_header("date", "Mon, 01 Jan 2024 00:00:00 GMT");

        let headers = normalize(params.headers, &Config::new(), &op());
        assert_eq!(headers.len(), 1);
        assert_eq!(
            header_get(&headers, DATE),
            Some("Mon, 01 Jan 2024 00:00:00 GMT")
        );
    }

    #[test]
    fn test_non_string_values() {
        let params = Params::new().with_header(CONTENT_LENGTH, json!(1024));

        let headers = normalize(params.headers, &Config::new(), &op());
        assert_eq!(headers.get(CONTENT_LENGTH).map(String::as_str), Some("1024"));
    }

    #[test]
    fn test_encode_non_ascii() {
        let headers = Headers::from([
            ("x-qs-meta-name".to_string(), "图片 1.png".to_string()),
            (CONTENT_TYPE.to_string(), "image/png; charset=x".to_string()),
        ]);

        let headers = encode_non_ascii(headers);

        let encoded = &headers["x-qs-meta-name"];
        assert!(encoded.is_ascii());
        assert_eq!(
            percent_decode_str(encoded).decode_utf8_lossy(),
            "图片 1.png"
        );
        assert_eq!(headers[CONTENT_TYPE], "image/png; charset=x");
    }
}
