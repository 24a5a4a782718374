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

use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in qingstor services.
pub const AUTHORIZATION: &str = "Authorization";
pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_MD5: &str = "Content-MD5";
pub const CONTENT_TYPE: &str = "Content-Type";
pub const DATE: &str = "Date";
pub const EXPIRES: &str = "Expires";
pub const USER_AGENT: &str = "User-Agent";
pub const X_QS_HEADER_PREFIX: &str = "x-qs-";

/// Reserved header param holding user metadata that is flattened into
/// top-level headers.
pub const METADATA_PARAM_KEY: &str = "XQSMetaData";

/// Body param that carries a raw string payload instead of json fields.
pub const BODY_PARAM_KEY: &str = "Body";

// Placeholders in request path templates.
pub const BUCKET_PLACEHOLDER: &str = "<bucket-name>";
pub const OBJECT_PLACEHOLDER: &str = "<object-key>";

// Api names that change how a request is built.
pub const API_DELETE_MULTIPLE_OBJECTS: &str = "DeleteMultipleObjects";
pub const API_UPLOAD_MULTIPART: &str = "UploadMultipart";

// Query keys of presigned urls.
pub const QUERY_ACCESS_KEY_ID: &str = "access_key_id";
pub const QUERY_EXPIRES: &str = "expires";
pub const QUERY_SIGNATURE: &str = "signature";

// Env values used in qingstor services.
pub const QINGSTOR_ACCESS_KEY_ID: &str = "QINGSTOR_ACCESS_KEY_ID";
pub const QINGSTOR_SECRET_ACCESS_KEY: &str = "QINGSTOR_SECRET_ACCESS_KEY";
pub const QINGSTOR_ENDPOINT: &str = "QINGSTOR_ENDPOINT";
pub const QINGSTOR_ZONE: &str = "QINGSTOR_ZONE";
pub const QINGSTOR_URL_STYLE: &str = "QINGSTOR_URL_STYLE";
pub const QINGSTOR_ADDITIONAL_USER_AGENT: &str = "QINGSTOR_ADDITIONAL_USER_AGENT";

pub const DEFAULT_ENDPOINT: &str = "https://qingstor.com";

/// AsciiSet for object keys and non-ascii header values.
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', '~'
///   and the path safe symbols `/ : @ ! $ & ' ( ) * + , ; =`.
/// - `%` is always encoded, so decoding gives back the original bytes.
pub static ASCII_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/')
    .remove(b':')
    .remove(b'@')
    .remove(b'!')
    .remove(b'$')
    .remove(b'&')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')')
    .remove(b'*')
    .remove(b'+')
    .remove(b',')
    .remove(b';')
    .remove(b'=');

/// AsciiSet for query keys and values.
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', '~'.
pub static QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');
