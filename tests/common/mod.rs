#![allow(dead_code)]

pub mod filter_test_helpers;
