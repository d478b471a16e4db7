//! The wallet credential record and its secret key wrapper.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::ConstantTimeEq;

/// Secret key material of a wallet.
///
/// The value is zeroized on drop, redacted from `Debug` output and compared in
/// constant time. It is persisted in plaintext by [`crate::CredentialStore`].
pub struct PrivateKey(SecretString);

impl PrivateKey {
    /// Wraps key material.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(SecretString::from(key.into()))
    }

    /// Returns the key material. Treat this as sensitive.
    #[must_use]
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }

    /// Length of the key in bytes. This is the only property of the key that
    /// may be logged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expose_secret().len()
    }

    /// Returns `true` if the key is the empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PrivateKey([REDACTED; {} bytes])", self.len())
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.expose_secret()
            .as_bytes()
            .ct_eq(other.expose_secret().as_bytes())
            .into()
    }
}

impl Eq for PrivateKey {}

impl Serialize for PrivateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.expose_secret())
    }
}

impl<'de> Deserialize<'de> for PrivateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// A wallet's address and private key, stored and read as one record.
///
/// Serialized as `{"address": "...", "privateKey": "..."}`. A degraded record
/// without a key omits `privateKey`. Only a JSON object is accepted when
/// reading; any other shape, or an object carrying any other field, is
/// rejected.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletCredential {
    address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key: Option<PrivateKey>,
}

const FIELDS: &[&str] = &["address", "privateKey"];

impl<'de> Deserialize<'de> for WalletCredential {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CredentialVisitor)
    }
}

/// Reads the record from a map only. Sequences and scalars fall through to
/// serde's `invalid_type` error.
struct CredentialVisitor;

impl<'de> Visitor<'de> for CredentialVisitor {
    type Value = WalletCredential;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a wallet credential object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut address: Option<String> = None;
        let mut private_key: Option<Option<PrivateKey>> = None;

        while let Some(field) = map.next_key::<String>()? {
            match field.as_str() {
                "address" => {
                    if address.is_some() {
                        return Err(de::Error::duplicate_field("address"));
                    }
                    address = Some(map.next_value()?);
                }
                "privateKey" => {
                    if private_key.is_some() {
                        return Err(de::Error::duplicate_field("privateKey"));
                    }
                    private_key = Some(map.next_value()?);
                }
                other => return Err(de::Error::unknown_field(other, FIELDS)),
            }
        }

        Ok(WalletCredential {
            address: address.ok_or_else(|| de::Error::missing_field("address"))?,
            private_key: private_key.flatten(),
        })
    }
}

impl WalletCredential {
    /// Creates a credential from an address and its private key.
    #[must_use]
    pub fn new(address: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            private_key: Some(PrivateKey::new(private_key)),
        }
    }

    /// Creates a degraded credential that carries no private key.
    #[must_use]
    pub fn address_only(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            private_key: None,
        }
    }

    /// The public wallet address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The private key, if the record carries one.
    #[must_use]
    pub const fn private_key(&self) -> Option<&PrivateKey> {
        self.private_key.as_ref()
    }

    /// Length of the private key in bytes, `0` for a degraded record.
    #[must_use]
    pub fn private_key_len(&self) -> usize {
        self.private_key.as_ref().map_or(0, PrivateKey::len)
    }
}
