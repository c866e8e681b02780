// Copyright 2026 The Passgate Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Signature verification against PEM-encoded public keys.

use aws_lc_rs::signature::{
    RsaPublicKeyComponents, UnparsedPublicKey, ECDSA_P256_SHA256_ASN1,
    RSA_PKCS1_2048_8192_SHA256,
};
use log::debug;

use crate::error::{Error, Result};
use crate::{base64_decode, base64_encode};

/// Verification primitive used by the authentication flow.
///
/// Implementations take the stored PEM public key, the raw signature bytes,
/// and the signed data, and report a plain boolean. Failures of any kind -
/// unparsable key, wrong key type, invalid signature - collapse to `false`
/// so that callers cannot distinguish them.
pub trait SignatureVerifier {
    fn verify(&self, public_key_pem: &str, signature: &[u8], data: &[u8]) -> bool;
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, public_key_pem: &str, signature: &[u8], data: &[u8]) -> bool {
        (**self).verify(public_key_pem, signature, data)
    }
}

/// Default [`SignatureVerifier`] backed by `aws-lc-rs`.
///
/// The key type is taken from the SubjectPublicKeyInfo algorithm identifier
/// inside the PEM: EC keys verify as ECDSA P-256/SHA-256 with ASN.1
/// signatures, RSA keys as PKCS#1 v1.5 with SHA-256. These are the wire
/// formats WebAuthn authenticators produce for ES256 and RS256.
pub struct PemVerifier;

impl SignatureVerifier for PemVerifier {
    fn verify(&self, public_key_pem: &str, signature: &[u8], data: &[u8]) -> bool {
        match verify_pem_signature(public_key_pem, signature, data) {
            Ok(()) => true,
            Err(err) => {
                debug!("signature rejected: {err}");
                false
            }
        }
    }
}

fn verify_pem_signature(public_key_pem: &str, signature: &[u8], data: &[u8]) -> Result<()> {
    let der = pem_to_der(public_key_pem)?;
    match parse_spki(&der)? {
        SpkiKey::EcP256(point) => UnparsedPublicKey::new(&ECDSA_P256_SHA256_ASN1, point)
            .verify(data, signature)
            .map_err(|_| Error::Verification),
        SpkiKey::Rsa { n, e } => RsaPublicKeyComponents { n, e }
            .verify(&RSA_PKCS1_2048_8192_SHA256, data, signature)
            .map_err(|_| Error::Verification),
    }
}

/// Wraps SubjectPublicKeyInfo DER bytes into a "PUBLIC KEY" PEM document.
///
/// The base64 body is wrapped at 64 columns, matching what OpenSSL-family
/// tooling emits.
pub fn public_key_to_pem(der: &[u8]) -> String {
    let encoded = base64_encode(der);
    let mut pem = String::from("-----BEGIN PUBLIC KEY-----\n");
    let mut start = 0;
    while start < encoded.len() {
        let end = usize::min(start + 64, encoded.len());
        pem.push_str(&encoded[start..end]);
        pem.push('\n');
        start = end;
    }
    pem.push_str("-----END PUBLIC KEY-----\n");
    pem
}

/// Strips the PEM markers and decodes the base64 body.
pub(crate) fn pem_to_der(pem: &str) -> Result<Vec<u8>> {
    let mut body = String::new();
    let mut inside = false;
    for line in pem.lines() {
        let line = line.trim();
        if line.starts_with("-----BEGIN") {
            inside = true;
        } else if line.starts_with("-----END") {
            inside = false;
        } else if inside {
            body.push_str(line);
        }
    }
    if body.is_empty() {
        return Err(Error::Pem);
    }
    base64_decode(&body)
}

/// Public key material extracted from a SubjectPublicKeyInfo structure.
enum SpkiKey<'a> {
    /// Uncompressed SEC1 point (`0x04 || x || y`).
    EcP256(&'a [u8]),
    /// RSA modulus and exponent, sign bytes stripped.
    Rsa { n: &'a [u8], e: &'a [u8] },
}

const OID_EC_PUBLIC_KEY: &[u8] = &[0x2a, 0x86, 0x48, 0xce, 0x3d, 0x02, 0x01];
const OID_RSA_ENCRYPTION: &[u8] = &[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x01];

const TAG_SEQUENCE: u8 = 0x30;
const TAG_OID: u8 = 0x06;
const TAG_BIT_STRING: u8 = 0x03;
const TAG_INTEGER: u8 = 0x02;

/// Minimal DER cursor. Only the shapes appearing in SubjectPublicKeyInfo
/// documents are supported.
struct Der<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Der<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(Error::Der("truncated"))?;
        let out = &self.buf[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn byte(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn length(&mut self) -> Result<usize> {
        let first = self.byte()?;
        if first < 0x80 {
            return Ok(first as usize);
        }
        let count = (first & 0x7f) as usize;
        if count == 0 || count > 4 {
            return Err(Error::Der("unsupported length encoding"));
        }
        let mut len = 0usize;
        for _ in 0..count {
            len = (len << 8) | self.byte()? as usize;
        }
        Ok(len)
    }

    /// Reads one element, checking its tag, and returns the content bytes.
    fn element(&mut self, tag: u8) -> Result<&'a [u8]> {
        if self.byte()? != tag {
            return Err(Error::Der("unexpected tag"));
        }
        let len = self.length()?;
        self.take(len)
    }
}

fn parse_spki(der: &[u8]) -> Result<SpkiKey<'_>> {
    let mut outer = Der::new(der);
    let mut spki = Der::new(outer.element(TAG_SEQUENCE)?);
    let mut algorithm = Der::new(spki.element(TAG_SEQUENCE)?);
    let oid = algorithm.element(TAG_OID)?;
    let bits = spki.element(TAG_BIT_STRING)?;
    // Leading octet of a BIT STRING counts unused bits; key material is
    // always octet-aligned.
    if bits.first() != Some(&0) {
        return Err(Error::Der("unexpected unused bits"));
    }
    let key = &bits[1..];

    if oid == OID_EC_PUBLIC_KEY {
        if key.len() != 65 || key[0] != 0x04 {
            return Err(Error::Der("not an uncompressed P-256 point"));
        }
        Ok(SpkiKey::EcP256(key))
    } else if oid == OID_RSA_ENCRYPTION {
        let mut rsa = Der::new(key);
        let mut sequence = Der::new(rsa.element(TAG_SEQUENCE)?);
        let n = trim_sign_byte(sequence.element(TAG_INTEGER)?);
        let e = trim_sign_byte(sequence.element(TAG_INTEGER)?);
        Ok(SpkiKey::Rsa { n, e })
    } else {
        Err(Error::Der("unsupported key type"))
    }
}

/// Drops the single leading zero DER uses to keep positive integers
/// positive.
fn trim_sign_byte(integer: &[u8]) -> &[u8] {
    if integer.len() > 1 && integer[0] == 0x00 {
        &integer[1..]
    } else {
        integer
    }
}
