//! Wire form of signed authorizations.

use serde::{Deserialize, Serialize};

/// A recoverable signature with its validity deadline, as submitted to
/// permit, holder-proof, and new-lock operations.
///
/// `v` carries the recovery id in its Ethereum form (27 or 28); `r` and `s`
/// are the two ECDSA scalars. The deadline is an absolute Unix timestamp and
/// is always part of the signed payload itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Signature {
    pub v: u8,
    #[serde(with = "scalar_hex")]
    pub r: [u8; 32],
    #[serde(with = "scalar_hex")]
    pub s: [u8; 32],
    pub deadline: u64,
}

mod scalar_hex {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<[u8; 32], D::Error> {
        let text = String::deserialize(deserializer)?;
        let payload = text.strip_prefix("0x").unwrap_or(&text);
        let decoded = hex::decode(payload).map_err(serde::de::Error::custom)?;
        decoded
            .try_into()
            .map_err(|_| serde::de::Error::custom("signature scalar must be 32 bytes"))
    }
}
