#![allow(dead_code)]

pub mod services;
pub mod strategies;

pub use services::*;
pub use strategies::*;
