// Copyright (c) 2024 Botho Foundation

use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of an output, one byte on the wire.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum OutputType {
    /// A plain output locked by a threshold script.
    #[default]
    Script = 0x00,
    WithdrawalSubmit = 0xa1,
    WithdrawalFuel = 0xa2,
    NodePledge = 0xa3,
    NodeAccept = 0xa4,
    NodeRemove = 0xa6,
    DomainAccept = 0xa7,
    DomainRemove = 0xa8,
    WithdrawalClaim = 0xa9,
    NodeCancel = 0xaa,
    CustodianUpdateNodes = 0xb1,
    CustodianSlashNodes = 0xb2,
}

impl OutputType {
    pub fn is_withdrawal(&self) -> bool {
        matches!(
            self,
            OutputType::WithdrawalSubmit | OutputType::WithdrawalFuel | OutputType::WithdrawalClaim
        )
    }
}

/// The byte did not name a known output type.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownOutputType(pub u8);

impl fmt::Display for UnknownOutputType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown output type 0x{:02x}", self.0)
    }
}

impl std::error::Error for UnknownOutputType {}

impl TryFrom<u8> for OutputType {
    type Error = UnknownOutputType;

    fn try_from(src: u8) -> Result<Self, Self::Error> {
        Ok(match src {
            0x00 => OutputType::Script,
            0xa1 => OutputType::WithdrawalSubmit,
            0xa2 => OutputType::WithdrawalFuel,
            0xa3 => OutputType::NodePledge,
            0xa4 => OutputType::NodeAccept,
            0xa6 => OutputType::NodeRemove,
            0xa7 => OutputType::DomainAccept,
            0xa8 => OutputType::DomainRemove,
            0xa9 => OutputType::WithdrawalClaim,
            0xaa => OutputType::NodeCancel,
            0xb1 => OutputType::CustodianUpdateNodes,
            0xb2 => OutputType::CustodianSlashNodes,
            other => return Err(UnknownOutputType(other)),
        })
    }
}

impl From<OutputType> for u8 {
    fn from(src: OutputType) -> u8 {
        src as u8
    }
}
