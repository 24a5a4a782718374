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

use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use qingstor_sign_core::{utils::Redact, Context, Error, Result};

use crate::constants::*;

/// UrlStyle decides where the bucket name goes in the request url.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UrlStyle {
    /// `scheme://{zone}.{host}/{bucket}/{object}`
    #[default]
    PathStyle,
    /// `scheme://{bucket}.{zone}.{host}/{object}`
    VirtualHostStyle,
}

impl FromStr for UrlStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "path_style" => Ok(UrlStyle::PathStyle),
            "virtual_host_style" => Ok(UrlStyle::VirtualHostStyle),
            v => Err(Error::config_invalid(format!(
                "url style must be path_style or virtual_host_style, got {v}"
            ))),
        }
    }
}

impl Display for UrlStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            UrlStyle::PathStyle => f.write_str("path_style"),
            UrlStyle::VirtualHostStyle => f.write_str("virtual_host_style"),
        }
    }
}

/// Config carries the environment shared by every request built for
/// QingStor.
///
/// A `Config` is only read while building requests, so one value can be
/// shared by reference across any number of builders.
#[derive(Clone)]
pub struct Config {
    /// Endpoint in `scheme://host[:port]` form.
    ///
    /// The endpoint must contain `://` exactly once, zone and bucket
    /// subdomains are inserted right after it.
    ///
    /// `endpoint` will be loaded from
    ///
    /// - this field if it's not the default
    /// - env value: [`QINGSTOR_ENDPOINT`]
    pub endpoint: String,
    /// `zone` will be loaded from
    ///
    /// - this field if it's not empty
    /// - env value: [`QINGSTOR_ZONE`]
    pub zone: String,
    /// `url_style` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`QINGSTOR_URL_STYLE`]
    ///
    /// Unset means [`UrlStyle::PathStyle`].
    pub url_style: Option<UrlStyle>,
    /// `access_key_id` will be loaded from
    ///
    /// - this field if it's not empty
    /// - env value: [`QINGSTOR_ACCESS_KEY_ID`]
    pub access_key_id: String,
    /// `secret_access_key` will be loaded from
    ///
    /// - this field if it's not empty
    /// - env value: [`QINGSTOR_SECRET_ACCESS_KEY`]
    pub secret_access_key: String,
    /// `additional_user_agent` will be loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`QINGSTOR_ADDITIONAL_USER_AGENT`]
    pub additional_user_agent: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            zone: String::new(),
            url_style: None,
            access_key_id: String::new(),
            secret_access_key: String::new(),
            additional_user_agent: None,
        }
    }
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set zone
    pub fn with_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = zone.into();
        self
    }

    /// Set url_style
    pub fn with_url_style(mut self, url_style: UrlStyle) -> Self {
        self.url_style = Some(url_style);
        self
    }

    /// Set access_key_id
    pub fn with_access_key_id(mut self, access_key_id: impl Into<String>) -> Self {
        self.access_key_id = access_key_id.into();
        self
    }

    /// Set secret_access_key
    pub fn with_secret_access_key(mut self, secret_access_key: impl Into<String>) -> Self {
        self.secret_access_key = secret_access_key.into();
        self
    }

    /// Set additional_user_agent
    pub fn with_additional_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.additional_user_agent = Some(user_agent.into());
        self
    }

    /// The url style in effect, path style if unset.
    pub fn url_style(&self) -> UrlStyle {
        self.url_style.unwrap_or_default()
    }

    /// Load config from env.
    ///
    /// Values already set on this config win over the environment.
    pub fn from_env(mut self, ctx: &Context) -> Result<Self> {
        if self.endpoint == DEFAULT_ENDPOINT {
            if let Some(v) = ctx.env_var(QINGSTOR_ENDPOINT) {
                self.endpoint = v;
            }
        }
        if self.zone.is_empty() {
            if let Some(v) = ctx.env_var(QINGSTOR_ZONE) {
                self.zone = v;
            }
        }
        if self.url_style.is_none() {
            if let Some(v) = ctx.env_var(QINGSTOR_URL_STYLE) {
                self.url_style = Some(v.parse()?);
            }
        }
        if self.access_key_id.is_empty() {
            if let Some(v) = ctx.env_var(QINGSTOR_ACCESS_KEY_ID) {
                self.access_key_id = v;
            }
        }
        if self.secret_access_key.is_empty() {
            if let Some(v) = ctx.env_var(QINGSTOR_SECRET_ACCESS_KEY) {
                self.secret_access_key = v;
            }
        }
        if let Some(v) = ctx.env_var(QINGSTOR_ADDITIONAL_USER_AGENT) {
            self.additional_user_agent.get_or_insert(v);
        }

        Ok(self)
    }
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("endpoint", &self.endpoint)
            .field("zone", &self.zone)
            .field("url_style", &self.url_style)
            .field("access_key_id", &Redact::from(&self.access_key_id))
            .field("secret_access_key", &Redact::from(&self.secret_access_key))
            .field("additional_user_agent", &self.additional_user_agent)
            .finish()
    }
}
