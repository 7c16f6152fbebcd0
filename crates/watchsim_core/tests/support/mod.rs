#![allow(dead_code)]

pub mod invariants;
