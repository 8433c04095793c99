// Copyright (c) 2024 Botho Foundation

//! Output locking scripts.
//!
//! The only script shape in use is a threshold: `0xff 0xfe t`, "at least t
//! of the output's keys must sign".

use crate::constants::SCRIPT_THRESHOLD_MAX;
use displaydoc::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

const OPERATOR_CMP: u8 = 0xff;
const OPERATOR_SUM: u8 = 0xfe;

/// An error which can occur when checking a script.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ScriptError {
    /// Malformed script of {0} bytes
    Malformed(usize),

    /// Threshold {0} is outside 1..=64
    InvalidThreshold(u8),

    /// Threshold {0} exceeds the {1} available keys
    NotEnoughKeys(u8, usize),
}

impl std::error::Error for ScriptError {}

/// Raw script bytes as they appear on the wire.
#[derive(Clone, Default, Eq, Hash, PartialEq)]
pub struct Script(Vec<u8>);

impl Script {
    /// `0xff 0xfe threshold`.
    pub fn new_threshold(threshold: u8) -> Self {
        Self(vec![OPERATOR_CMP, OPERATOR_SUM, threshold])
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The threshold, if the script has the threshold shape.
    pub fn threshold(&self) -> Result<u8, ScriptError> {
        match self.0[..] {
            [OPERATOR_CMP, OPERATOR_SUM, t] => {
                if t == 0 || t > SCRIPT_THRESHOLD_MAX {
                    Err(ScriptError::InvalidThreshold(t))
                } else {
                    Ok(t)
                }
            }
            _ => Err(ScriptError::Malformed(self.0.len())),
        }
    }

    /// Check the shape and that `keys` keys can meet the threshold.
    pub fn validate(&self, keys: usize) -> Result<(), ScriptError> {
        let t = self.threshold()?;
        if (t as usize) > keys {
            return Err(ScriptError::NotEnoughKeys(t, keys));
        }
        Ok(())
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&hex::encode(&self.0))
    }
}

impl fmt::Debug for Script {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Script({self})")
    }
}

impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Script {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map(Script).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_threshold_script() {
        let script = Script::new_threshold(3);
        assert_eq!(script.as_bytes(), &[0xff, 0xfe, 0x03]);
        assert_eq!(script.to_string(), "fffe03");
        assert_matches!(script.validate(2), Err(ScriptError::NotEnoughKeys(3, 2)));
        assert_matches!(script.validate(5), Ok(()));
        assert_matches!(script.validate(3), Ok(()));
    }

    #[test]
    fn test_malformed_scripts() {
        assert_matches!(
            Script::from_bytes(vec![0xff, 0xfe]).threshold(),
            Err(ScriptError::Malformed(2))
        );
        assert_matches!(
            Script::from_bytes(vec![0xfe, 0xff, 1]).threshold(),
            Err(ScriptError::Malformed(3))
        );
        assert_matches!(
            Script::new_threshold(0).validate(1),
            Err(ScriptError::InvalidThreshold(0))
        );
        assert_matches!(
            Script::new_threshold(65).validate(100),
            Err(ScriptError::InvalidThreshold(65))
        );
        assert_matches!(Script::new_threshold(64).validate(64), Ok(()));
    }

    #[test]
    fn test_json_hex() {
        let script = Script::new_threshold(1);
        let json = serde_json::to_string(&script).unwrap();
        assert_eq!(json, "\"fffe01\"");
        assert_eq!(serde_json::from_str::<Script>(&json).unwrap(), script);
    }
}
