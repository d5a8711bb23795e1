//! Generated from `TestApiClientV1.Models`.
#![allow(unused_imports)]

use serde::{Deserialize, Serialize};
use super::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "label", default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(rename = "parent", default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Node>>,

    #[serde(rename = "children", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Node>>,
}
