//! Generated from `TestApiClientV1.Models`.
#![allow(unused_imports)]

use serde::{Deserialize, Serialize};
use super::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "id")]
    pub id: i32,

    #[serde(rename = "choice", default, skip_serializing_if = "Option::is_none")]
    pub choice: Option<Vec<ChoiceOneOf>>,
}
