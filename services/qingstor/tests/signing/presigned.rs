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

use anyhow::Result;
use http::Method;
use pretty_assertions::assert_eq;
use qingstor_sign::{Builder, NormalBody, Operation, Params, UrlStyle};
use qingstor_sign_core::ErrorKind;

use crate::{test_config, EXPIRES};

#[test]
fn test_presigned_get_object() -> Result<()> {
    let cfg = test_config(UrlStyle::PathStyle);
    let op = Operation::new("GetObject", Method::GET, "/<bucket-name>/<object-key>")
        .with_bucket("mybucket")
        .with_object("中文 a.txt")
        .with_expires(EXPIRES);
    let params = Params::new()
        .with_header("Content-Type", "text/plain")
        .with_query("response-content-type", "text/plain");

    let mut builder = Builder::new(&cfg, op, params)?;
    assert_eq!(builder.headers().len(), 1);
    assert_eq!(builder.headers()["Expires"], "1700000000");

    let url = builder.presigned_url()?;
    assert_eq!(
        url,
        "https://pek3a.qingstor.com/mybucket/%E4%B8%AD%E6%96%87%20a.txt\
         ?access_key_id=ACCESS_KEY_ID&expires=1700000000\
         &signature=0IR%2BW4TVcQy70iQUT1WCePWb5p49N6bzjcFi3vWJYIM%3D\
         &response-content-type=text%2Fplain"
    );
    assert!(!builder.headers().contains_key("Authorization"));
    Ok(())
}

#[test]
fn test_presigned_keys_in_order() -> Result<()> {
    let cfg = test_config(UrlStyle::PathStyle);
    let op = Operation::new("UploadMultipart", Method::PUT, "/<bucket-name>/<object-key>")
        .with_bucket("mybucket")
        .with_object("big.iso")
        .with_expires(EXPIRES);
    let params = Params::new()
        .with_query("upload_id", "abc")
        .with_query("part_number", 1);

    let url = Builder::new(&cfg, op, params)?.presigned_url()?;

    let ak = url.find("access_key_id=").expect("must have access_key_id");
    let expires = url.find("expires=1700000000").expect("must have expires");
    let signature = url.find("signature=").expect("must have signature");
    assert!(ak < expires && expires < signature);
    for key in ["access_key_id=", "expires=", "signature="] {
        assert_eq!(url.matches(key).count(), 1, "{key} must appear once");
    }
    assert!(url.ends_with(
        "&signature=QPnMrRCAbUR96Uo5v6GaBAr%2BMNYkeKRS%2FP86Bm8jk9s%3D&part_number=1&upload_id=abc"
    ));
    Ok(())
}

#[test]
fn test_presigned_path_with_query() -> Result<()> {
    let cfg = test_config(UrlStyle::VirtualHostStyle);
    let op = Operation::new(
        "InitiateMultipartUpload",
        Method::POST,
        "/<bucket-name>/<object-key>?uploads",
    )
    .with_bucket("mybucket")
    .with_object("big.iso")
    .with_expires(EXPIRES);

    let url = Builder::new(&cfg, op, Params::new())?.presigned_url()?;

    assert_eq!(
        url,
        "https://mybucket.pek3a.qingstor.com/big.iso?uploads\
         &access_key_id=ACCESS_KEY_ID&expires=1700000000\
         &signature=tpxAOQ3DYGe0BRURCSJ9BHHqeKKmylkWfqqG8XmO%2BQc%3D"
    );
    Ok(())
}

#[test]
fn test_presigned_request_can_not_be_sent() -> Result<()> {
    let cfg = test_config(UrlStyle::PathStyle);
    let op = Operation::new("GetObject", Method::GET, "/<bucket-name>/<object-key>")
        .with_bucket("mybucket")
        .with_object("a.txt")
        .with_expires(EXPIRES);

    let mut builder = Builder::new(&cfg, op, Params::new())?;
    let err = builder
        .build_request(&NormalBody)
        .expect_err("presigned request must not be built");
    assert_eq!(err.kind(), ErrorKind::InvalidUsage);

    // The presigned url is still available afterwards.
    assert!(builder.presigned_url()?.contains("expires=1700000000"));
    Ok(())
}
