// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::fmt;
use std::sync::Arc;

use crate::TypesError;
use crate::proto;

/// A transaction message.
///
/// Messages are opaque to verification: they only need to serialize deterministically
/// in each supported sign mode.
pub trait Msg: fmt::Debug + Send + Sync {
    /// Protobuf type URL used when the message is packed into an `Any`.
    fn type_url(&self) -> &str;

    /// Route name used as the `type` tag in the legacy JSON encoding.
    fn amino_name(&self) -> &str;

    /// Canonical protobuf encoding of the message body.
    fn encode_proto(&self) -> Result<Vec<u8>, TypesError>;

    /// JSON value of the message body for the legacy encoding. Object key order does not
    /// matter; keys are sorted before the sign bytes are produced.
    fn to_legacy_json(&self) -> Result<serde_json::Value, TypesError>;

    fn to_any(&self) -> Result<proto::Any, TypesError> {
        Ok(proto::Any {
            type_url: self.type_url().to_string(),
            value: self.encode_proto()?,
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coin {
    pub denom: String,
    pub amount: u128,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }
}

/// Transaction fee. Passed through into the sign bytes, never interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fee {
    pub amount: Vec<Coin>,
    pub gas_limit: u64,
    /// Account paying the fee, if not the first signer (else empty)
    pub payer: String,
    /// Account granting the fee allowance (else empty)
    pub granter: String,
}

impl Fee {
    pub fn new(amount: Vec<Coin>, gas_limit: u64) -> Self {
        Self {
            amount,
            gas_limit,
            ..Default::default()
        }
    }

    pub fn to_proto(&self) -> proto::Fee {
        proto::Fee {
            amount: self
                .amount
                .iter()
                .map(|coin| proto::Coin {
                    denom: coin.denom.clone(),
                    amount: coin.amount.to_string(),
                })
                .collect(),
            gas_limit: self.gas_limit,
            payer: self.payer.clone(),
            granter: self.granter.clone(),
        }
    }
}

/// The transaction fields covered by a signature.
#[derive(Clone, Debug, Default)]
pub struct Tx {
    pub messages: Vec<Arc<dyn Msg>>,
    pub fee: Fee,
    pub memo: String,
    /// Block height after which the transaction is no longer valid (0 if unset)
    pub timeout_height: u64,
}

impl Tx {
    pub fn new(messages: Vec<Arc<dyn Msg>>, fee: Fee, memo: impl Into<String>) -> Self {
        Self {
            messages,
            fee,
            memo: memo.into(),
            timeout_height: 0,
        }
    }

    pub fn with_timeout_height(mut self, timeout_height: u64) -> Self {
        self.timeout_height = timeout_height;
        self
    }
}
