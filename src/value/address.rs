//=====================================================
// File: value/address.rs
//=====================================================
// Author: ZobieLabs
// License: Duality Public License (DPL v1.0)
// Goal: 20-byte contract/account addresses
// Objective: Normalise hex addresses so comparisons ignore letter case and
//            display them in mixed-case checksum form
//=====================================================

use std::fmt;
use std::str::FromStr;

use sha3::{Digest, Keccak256};

use crate::interpreter::{ScenarioError, ScenarioResult};

pub const ADDRESS_BYTES: usize = 20;

/// A 20-byte address. Parsing normalises the hex text, so two spellings
/// that differ only in letter case are the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    pub const ZERO: Address = Address([0u8; ADDRESS_BYTES]);

    pub fn from_bytes(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Address(bytes)
    }

    pub fn parse(text: &str) -> ScenarioResult<Self> {
        let invalid = |why: &str| ScenarioError::invalid(format!("`{text}` is not an address: {why}"));
        let digits = text
            .strip_prefix("0x")
            .or_else(|| text.strip_prefix("0X"))
            .ok_or_else(|| invalid("missing 0x prefix"))?;
        if digits.len() != ADDRESS_BYTES * 2 {
            return Err(invalid("expected 40 hex digits"));
        }
        let decoded = hex::decode(digits).map_err(|err| invalid(&err.to_string()))?;
        let mut bytes = [0u8; ADDRESS_BYTES];
        bytes.copy_from_slice(&decoded);
        Ok(Address(bytes))
    }

    /// Cheap syntactic check used by literal parsing.
    pub fn looks_like(text: &str) -> bool {
        Address::parse(text).is_ok()
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; ADDRESS_BYTES]
    }

    //Function: to_checksum
    //Purpose: Mixed-case checksum spelling (EIP-55)
    //Inputs: none
    //Returns: String with `0x` prefix
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256::digest(lower.as_bytes());
        let mut out = String::with_capacity(2 + lower.len());
        out.push_str("0x");
        for (index, ch) in lower.chars().enumerate() {
            let byte = hash[index / 2];
            let nibble = if index % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if nibble >= 8 {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl FromStr for Address {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_case_is_normalised() {
        let upper = Address::parse("0xABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap();
        let lower = Address::parse("0xabcdef0123456789abcdef0123456789abcdef01").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.to_string(), lower.to_string());
    }

    #[test]
    fn displays_checksum_spelling() {
        for spelled in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
            "0x52908400098527886E0F7030069857D2E4169EE7",
            "0xde709f2102306220921060314715629080e2fb77",
            "0x000000000000000000000000000000000000dEaD",
        ] {
            let parsed = Address::parse(&spelled.to_ascii_lowercase()).unwrap();
            assert_eq!(parsed.to_string(), spelled);
        }
    }

    #[test]
    fn rejects_bad_lengths_and_digits() {
        assert!(Address::parse("0x1234").is_err());
        assert!(Address::parse("abcdef0123456789abcdef0123456789abcdef01").is_err());
        assert!(Address::parse("0xzzcdef0123456789abcdef0123456789abcdef01").is_err());
        assert!(Address::ZERO.is_zero());
    }
}

//=====================================================
// End of file
//=====================================================
