//! Shared plumbing for the tweet graph binaries
//!
//! A tweet word dump goes in (one CSV row per word occurrence), a Gephi-ready
//! cooccurrence graph comes out, along with a refreshed category seed file.
//! The binaries stay thin; everything they share lives here.


#[macro_use] extern crate log;
extern crate farmhash;
extern crate hash_hasher;
pub mod errors;
pub mod farm;
pub mod stream;
pub mod csv;
pub mod dict;
pub mod graph;
