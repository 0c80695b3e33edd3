//! reqwest（blocking）による Network 実装

use crate::domain::{ShellRequest, ShellResponse};
use crate::ports::outbound::Network;
use common::error::Error;
use reqwest::Method;

pub struct ReqwestNetwork {
    client: reqwest::blocking::Client,
}

impl ReqwestNetwork {
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
        }
    }
}

impl Default for ReqwestNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl Network for ReqwestNetwork {
    fn fetch(&self, request: &ShellRequest) -> Result<ShellResponse, Error> {
        let method = Method::from_bytes(request.method.to_ascii_uppercase().as_bytes())
            .map_err(|e| Error::invalid_argument(format!("Invalid method '{}': {}", request.method, e)))?;
        let mut builder = self.client.request(method, request.url.clone());
        if request.bypass_cache {
            builder = builder
                .header("Cache-Control", "no-cache")
                .header("Pragma", "no-cache");
        }

        let response = builder
            .send()
            .map_err(|e| Error::http(format!("Fetch failed for {}: {}", request.url, e)))?;

        let status = response.status().as_u16();
        let headers: Vec<(String, String)> = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .bytes()
            .map_err(|e| Error::http(format!("Failed to read response from {}: {}", request.url, e)))?;

        Ok(ShellResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}
