//! Cipher variants and the transform applied to every outgoing payload.

use base64::{
    engine::general_purpose::{STANDARD, URL_SAFE},
    Engine as _,
};
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use rand::seq::IndexedRandom;
use rand::Rng;

use super::key::CipherKey;

const NONCE_LEN: usize = 24;
const FALLBACK_TAG: &str = "FALLBACK: ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherVariant {
    Plain,
    Base64,
    Base64Url,
    Binary,
    Hex,
    Rot13,
    Sealed,
    Mixed,
}

impl CipherVariant {
    pub const ALL: [CipherVariant; 8] = [
        CipherVariant::Plain,
        CipherVariant::Base64,
        CipherVariant::Base64Url,
        CipherVariant::Binary,
        CipherVariant::Hex,
        CipherVariant::Rot13,
        CipherVariant::Sealed,
        CipherVariant::Mixed,
    ];

    /// Literal prefix of the variant's output; `Plain` carries none
    pub fn tag(&self) -> &'static str {
        match self {
            CipherVariant::Plain => "",
            CipherVariant::Base64 => "BASE64: ",
            CipherVariant::Base64Url => "B64URL: ",
            CipherVariant::Binary => "BINARY: ",
            CipherVariant::Hex => "HEX: ",
            CipherVariant::Rot13 => "ROT13: ",
            CipherVariant::Sealed => "XCHACHA: ",
            CipherVariant::Mixed => "MIXED: ",
        }
    }

    /// Pick one variant uniformly at random
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&CipherVariant::Plain)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    Uniform,
    Fixed(CipherVariant),
}

#[derive(Clone)]
pub struct CipherEngine {
    key: CipherKey,
    selection: Selection,
}

impl CipherEngine {
    pub fn new(key: CipherKey) -> Self {
        Self {
            key,
            selection: Selection::Uniform,
        }
    }

    /// Engine that always applies `variant`
    pub fn fixed(key: CipherKey, variant: CipherVariant) -> Self {
        Self {
            key,
            selection: Selection::Fixed(variant),
        }
    }

    /// Transform `text` with a freshly selected variant. Never fails.
    pub fn transform(&self, text: &str) -> String {
        let variant = match self.selection {
            Selection::Uniform => CipherVariant::random(&mut rand::rng()),
            Selection::Fixed(variant) => variant,
        };
        self.transform_with(variant, text)
    }

    pub fn transform_with(&self, variant: CipherVariant, text: &str) -> String {
        let body = match variant {
            CipherVariant::Plain => return text.to_string(),
            CipherVariant::Base64 => STANDARD.encode(text.as_bytes()),
            CipherVariant::Base64Url => URL_SAFE.encode(text.as_bytes()),
            CipherVariant::Binary => to_binary(text),
            CipherVariant::Hex => to_hex(text),
            CipherVariant::Rot13 => rot13(text),
            CipherVariant::Sealed => match self.seal(text) {
                Ok(armored) => armored,
                Err(e) => {
                    log::debug!("Sealed transform failed, falling back: {e}");
                    return format!("{FALLBACK_TAG}{text}");
                }
            },
            CipherVariant::Mixed => STANDARD.encode(mixed_half(text).as_bytes()),
        };
        format!("{}{body}", variant.tag())
    }

    fn seal(&self, text: &str) -> anyhow::Result<String> {
        let cipher = XChaCha20Poly1305::new(Key::from_slice(self.key.as_bytes()));
        let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, text.as_bytes())
            .map_err(|e| anyhow::anyhow!("encryption failed: {e}"))?;

        let mut framed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        framed.extend_from_slice(nonce.as_slice());
        framed.extend_from_slice(&ciphertext);
        Ok(URL_SAFE.encode(framed))
    }

    /// Reverse a sealed payload, with or without its `XCHACHA: ` tag
    pub fn open(&self, armored: &str) -> anyhow::Result<String> {
        let body = armored
            .strip_prefix(CipherVariant::Sealed.tag())
            .unwrap_or(armored);
        let framed = URL_SAFE.decode(body.trim())?;
        if framed.len() < NONCE_LEN {
            anyhow::bail!("sealed payload too short ({} bytes)", framed.len());
        }
        let (nonce, ciphertext) = framed.split_at(NONCE_LEN);

        let cipher = XChaCha20Poly1305::new(Key::from_slice(self.key.as_bytes()));
        let plaintext = cipher
            .decrypt(XNonce::from_slice(nonce), ciphertext)
            .map_err(|e| anyhow::anyhow!("decryption failed: {e}"))?;
        Ok(String::from_utf8(plaintext)?)
    }
}

fn to_binary(text: &str) -> String {
    text.chars()
        .map(|c| format!("{:08b}", c as u32))
        .collect::<Vec<_>>()
        .join(" ")
}

fn to_hex(text: &str) -> String {
    text.as_bytes().iter().map(|b| format!("{b:02x}")).collect()
}

fn rot13(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            'a'..='z' => (((c as u8 - b'a') + 13) % 26 + b'a') as char,
            'A'..='Z' => (((c as u8 - b'A') + 13) % 26 + b'A') as char,
            _ => c,
        })
        .collect()
}

/// First half of the text by character count, followed by an ellipsis
fn mixed_half(text: &str) -> String {
    let half = text.chars().count() / 2;
    let mut out: String = text.chars().take(half).collect();
    out.push_str("...");
    out
}
