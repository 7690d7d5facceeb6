// Copyright 2019-2024 ChainSafe Systems
// SPDX-License-Identifier: Apache-2.0, MIT

use std::sync::Arc;

use prost::Message;

use crate::{Coin, Fee, Msg, Tx, TypesError};

pub const TEST_CHAIN_ID: &str = "test-chain";
pub const TEST_MEMO: &str = "testmemo";
pub const TEST_TIMEOUT_HEIGHT: u64 = 10;

#[derive(Clone, PartialEq, ::prost::Message)]
struct TestMsgBody {
    #[prost(string, repeated, tag = "1")]
    signers: Vec<String>,
}

/// Message that only names its signers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestMsg {
    pub signers: Vec<String>,
}

impl TestMsg {
    pub fn new<S: Into<String>>(signers: impl IntoIterator<Item = S>) -> Self {
        Self {
            signers: signers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Msg for TestMsg {
    fn type_url(&self) -> &str {
        "/testpb.TestMsg"
    }

    fn amino_name(&self) -> &str {
        "cosmos-sdk/Test"
    }

    fn encode_proto(&self) -> Result<Vec<u8>, TypesError> {
        Ok(TestMsgBody {
            signers: self.signers.clone(),
        }
        .encode_to_vec())
    }

    fn to_legacy_json(&self) -> Result<serde_json::Value, TypesError> {
        Ok(serde_json::json!({ "signers": self.signers }))
    }
}

/// Fee of 150 atom with a 50000 gas limit.
pub fn create_test_fee() -> Fee {
    Fee::new(vec![Coin::new("atom", 150)], 50_000)
}

/// Transaction with one [`TestMsg`] naming `signers`, the test fee, memo and timeout.
pub fn create_test_tx<S: Into<String>>(signers: impl IntoIterator<Item = S>) -> Tx {
    let msg: Arc<dyn Msg> = Arc::new(TestMsg::new(signers));
    Tx::new(vec![msg], create_test_fee(), TEST_MEMO).with_timeout_height(TEST_TIMEOUT_HEIGHT)
}
