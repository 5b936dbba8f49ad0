//! Integration tests for termreplay

mod cli_test;
mod decode_test;
mod export_test;
mod helpers;
mod playback_test;
