// crates/shared-kernel/src/utils/mod.rs

mod test_utils;

#[cfg(test)]
pub(crate) use test_utils::*;
