//! Generated from `TestApiClientV1.Models`.
#![allow(unused_imports)]

use super::*;

/// One of [`choiceA`], [`choiceB`].
///
/// Decoded structurally by the impls of the `ChoiceOneOfCodec` unit.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceOneOf {
    choiceA(choiceA),
    choiceB(choiceB),
}

impl From<choiceA> for ChoiceOneOf {
    fn from(value: choiceA) -> Self {
        ChoiceOneOf::choiceA(value)
    }
}

impl From<choiceB> for ChoiceOneOf {
    fn from(value: choiceB) -> Self {
        ChoiceOneOf::choiceB(value)
    }
}
