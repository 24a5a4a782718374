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

use log::debug;
use qingstor_sign_core::hash::base64_md5;
use qingstor_sign_core::Result;
use serde_json::Map;
use serde_json::Value;

use crate::body::body_content;
use crate::constants::*;
use crate::header::{header_insert, Headers};
use crate::operation::ApiKind;

/// Set `Content-MD5` for apis that require it.
///
/// Only [`ApiKind::DeleteMultipleObjects`] with a non-empty body gets the
/// header. The digest covers the utf-8 bytes of [`body_content`], which is
/// what existing signed requests were computed over.
pub fn apply_content_md5(
    headers: &mut Headers,
    api: ApiKind,
    body: &Map<String, Value>,
) -> Result<()> {
    if api != ApiKind::DeleteMultipleObjects || body.is_empty() {
        return Ok(());
    }

    let content = body_content(body)?;
    let md5 = base64_md5(content.as_bytes());
    debug!("content md5 of {api:?} body: {md5}");

    header_insert(headers, CONTENT_MD5, md5);
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn body(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_content_md5_for_delete_multiple_objects() -> Result<()> {
        let mut headers = Headers::new();
        apply_content_md5(
            &mut headers,
            ApiKind::DeleteMultipleObjects,
            &body(json!({"uploadId": "abc"})),
        )?;

        assert_eq!(
            headers.get(CONTENT_MD5).map(String::as_str),
            Some("4QPt54FLgDAjZTVx9qOwjA==")
        );
        Ok(())
    }

    #[test]
    fn test_no_content_md5_for_empty_body() -> Result<()> {
        let mut headers = Headers::new();
        apply_content_md5(&mut headers, ApiKind::DeleteMultipleObjects, &Map::new())?;

        assert!(headers.is_empty());
        Ok(())
    }

    #[test]
    fn test_no_content_md5_for_other_apis() -> Result<()> {
        let mut headers = Headers::new();
        for api in [ApiKind::Other, ApiKind::UploadMultipart] {
            apply_content_md5(&mut headers, api, &body(json!({"uploadId": "abc"})))?;
        }

        assert!(headers.is_empty());
        Ok(())
    }
}
