//! Library surface behind the `sv-wallet` CLI binary, split out so
//! integration tests can exercise wallet storage and command plumbing
//! without going through a subprocess.

pub mod commands;
pub mod secmem;
pub mod storage;
