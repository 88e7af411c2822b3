// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request signing.
//!
//! The signature is the hex digest of the shared secret followed by every
//! parameter as `name + value`, names in lexical order, no separators.

use md5::{Digest, Md5};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Call parameters. Ordered by name, which is the signing order.
pub type Params = BTreeMap<String, String>;

/// One-way hash used for signatures.
pub trait Digester: Send + Sync {
    /// Lowercase hex digest of `input`.
    fn digest_hex(&self, input: &str) -> String;
}

/// MD5, as required by the service.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Digester;

impl Digester for Md5Digester {
    fn digest_hex(&self, input: &str) -> String {
        hex::encode(Md5::digest(input.as_bytes()))
    }
}

/// Concatenates `name + value` for every parameter in name order.
pub fn concatenate(params: &Params) -> String {
    params.iter().fold(String::new(), |mut acc, (name, value)| {
        acc.push_str(name);
        acc.push_str(value);
        acc
    })
}

/// Signs parameter sets with the application's shared secret.
#[derive(Clone)]
pub struct Signer {
    secret: String,
    digester: Arc<dyn Digester>,
}

impl Signer {
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_digester(secret, Arc::new(Md5Digester))
    }

    pub fn with_digester(secret: impl Into<String>, digester: Arc<dyn Digester>) -> Self {
        Signer { secret: secret.into(), digester }
    }

    /// Signature for `params`. Any existing `api_sig` entry must already be
    /// absent.
    pub fn sign(&self, params: &Params) -> String {
        let mut input = self.secret.clone();
        input.push_str(&concatenate(params));
        self.digester.digest_hex(&input)
    }
}

impl std::fmt::Debug for Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signer").field("secret", &"<redacted>").finish()
    }
}
