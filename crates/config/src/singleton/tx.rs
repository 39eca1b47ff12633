//! Decoding of pre-EIP-2718 signed transactions.

use alloy_core::{
    primitives::{Address, Bytes, U256},
    rlp::{self, Decodable, EMPTY_STRING_CODE, Header},
};

use crate::ConfigError;

/// A signed legacy transaction: `rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: u64,
    pub gas_price: u128,
    pub gas_limit: u64,
    /// `None` for contract creation.
    pub to: Option<Address>,
    pub value: U256,
    pub input: Bytes,
    pub v: u64,
    pub r: U256,
    pub s: U256,
}

impl LegacyTransaction {
    /// Decode a raw signed transaction. Trailing bytes are rejected.
    pub fn decode(raw: &[u8]) -> Result<Self, ConfigError> {
        let buf = &mut &raw[..];

        let header = Header::decode(buf)?;
        if !header.list {
            return Err(rlp::Error::UnexpectedString.into());
        }
        if buf.len() != header.payload_length {
            return Err(rlp::Error::UnexpectedLength.into());
        }

        let tx = Self {
            nonce: u64::decode(buf)?,
            gas_price: u128::decode(buf)?,
            gas_limit: u64::decode(buf)?,
            to: decode_to(buf)?,
            value: U256::decode(buf)?,
            input: Bytes::decode(buf)?,
            v: u64::decode(buf)?,
            r: U256::decode(buf)?,
            s: U256::decode(buf)?,
        };

        if !buf.is_empty() {
            return Err(rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: header.payload_length - buf.len(),
            }
            .into());
        }

        Ok(tx)
    }

    /// The EIP-155 chain id the signature is bound to, if any.
    pub fn chain_id(&self) -> Option<u64> {
        (self.v >= 35).then(|| (self.v - 35) / 2)
    }

    pub fn is_contract_creation(&self) -> bool {
        self.to.is_none()
    }
}

fn decode_to(buf: &mut &[u8]) -> Result<Option<Address>, rlp::Error> {
    match buf.first() {
        Some(&EMPTY_STRING_CODE) => {
            *buf = &buf[1..];
            Ok(None)
        }
        Some(_) => Address::decode(buf).map(Some),
        None => Err(rlp::Error::InputTooShort),
    }
}
