//! Generated from `TestApiClientV1.Models`.
#![allow(unused_imports)]

use serde::{Deserialize, Serialize};
use super::*;

/// Variant of [`ChoiceOneOf`].
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct choiceB {
    #[serde(rename = "y", default, skip_serializing_if = "Option::is_none")]
    pub y: Option<i32>,
}
