pub mod app;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod index_block;
pub mod io;
pub mod signal;
pub mod structured;

#[cfg(test)]
pub mod test_utils;
