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
use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::Method;
use pretty_assertions::assert_eq;
use qingstor_sign::{Builder, NormalBody, Operation, Params, UrlStyle};
use serde_json::json;

use crate::{test_config, DATE};

#[test]
fn test_put_object_virtual_host_style() -> Result<()> {
    let cfg = test_config(UrlStyle::VirtualHostStyle);
    let op = Operation::new("PutObject", Method::PUT, "/<bucket-name>/<object-key>")
        .with_bucket("mybucket")
        .with_object("dir/obj name.png");
    let params = Params::new()
        .with_header("Date", DATE)
        .with_header("Content-Type", "image/png")
        .with_metadata([("x-qs-meta-author", "张三")]);

    let mut builder = Builder::new(&cfg, op, params)?;
    let req = builder.build_request(&NormalBody)?;

    assert_eq!(
        req.uri().to_string(),
        "https://mybucket.pek3a.qingstor.com/dir/obj%20name.png"
    );
    assert_eq!(req.headers()["x-qs-meta-author"], "%E5%BC%A0%E4%B8%89");
    assert_eq!(
        req.headers()[AUTHORIZATION],
        "QS ACCESS_KEY_ID:83APowEgXkG/Jwbt34sI2VfJ5rYD+SSkBZhD83qWJDw="
    );
    assert_eq!(req.body(), &Bytes::new());
    Ok(())
}

#[test]
fn test_delete_multiple_objects() -> Result<()> {
    let cfg = test_config(UrlStyle::PathStyle);
    let op = Operation::new("DeleteMultipleObjects", Method::POST, "/<bucket-name>?delete")
        .with_bucket("mybucket");
    let params = Params::new()
        .with_header("Date", DATE)
        .with_body("objects", json!([{"key": "a.txt"}]))
        .with_body("quiet", false);

    let mut builder = Builder::new(&cfg, op, params)?;
    assert_eq!(
        builder.string_to_sign()?,
        "POST\n6pzWnG6hmrbNzfeF5ru1nA==\n\nWed, 10 Dec 2014 17:20:31 GMT\n/mybucket?delete"
    );

    let req = builder.build_request(&NormalBody)?;
    assert_eq!(req.uri().to_string(), "https://pek3a.qingstor.com/mybucket?delete");
    assert_eq!(req.headers()["content-md5"], "6pzWnG6hmrbNzfeF5ru1nA==");
    assert_eq!(
        req.headers()[AUTHORIZATION],
        "QS ACCESS_KEY_ID:LZJGlWFBIkVusreMTgPXnv6L0ExTwKcPel/xQwHsU9M="
    );
    assert_eq!(
        req.body(),
        &Bytes::from_static(br#"{"objects":[{"key":"a.txt"}],"quiet":false}"#)
    );
    Ok(())
}

#[test]
fn test_delete_multiple_objects_without_body() -> Result<()> {
    let cfg = test_config(UrlStyle::PathStyle);
    let op = Operation::new("DeleteMultipleObjects", Method::POST, "/<bucket-name>?delete")
        .with_bucket("mybucket");

    let mut builder = Builder::new(&cfg, op, Params::new().with_header("Date", DATE))?;
    let req = builder.build_request(&NormalBody)?;

    assert!(!req.headers().contains_key("content-md5"));
    Ok(())
}

#[test]
fn test_list_buckets_service_level() -> Result<()> {
    let cfg = test_config(UrlStyle::VirtualHostStyle);
    let op = Operation::new("ListBuckets", Method::GET, "/");

    let mut builder = Builder::new(&cfg, op, Params::new().with_header("Date", DATE))?;
    let req = builder.build_request(&NormalBody)?;

    assert_eq!(req.uri().to_string(), "https://qingstor.com/");
    assert_eq!(
        req.headers()[AUTHORIZATION],
        "QS ACCESS_KEY_ID:O36EQm+iwLQVePp5GoaUmBDeAoerRjfohwmffukmJeU="
    );
    Ok(())
}

#[test]
fn test_user_agent_is_sent() -> Result<()> {
    let cfg = test_config(UrlStyle::PathStyle).with_additional_user_agent("app/1.0");
    let op = Operation::new("HeadBucket", Method::HEAD, "/<bucket-name>").with_bucket("mybucket");

    let mut builder = Builder::new(&cfg, op, Params::new())?;
    let req = builder.build_request(&NormalBody)?;

    assert_eq!(req.headers()[http::header::USER_AGENT], "app/1.0");
    assert!(req.headers().contains_key(http::header::DATE));
    Ok(())
}
