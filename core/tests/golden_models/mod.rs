#![allow(unused_imports)]

pub mod question;
pub mod node;
pub mod choice_one_of;
pub mod choice_a;
pub mod choice_b;
pub mod choice_one_of_codec;

pub use question::*;
pub use node::*;
pub use choice_one_of::*;
pub use choice_a::*;
pub use choice_b::*;
pub use choice_one_of_codec::*;
