//! This crate provides a compressed binary trie that performs route lookups on a forwarding
//! information base (FIB). A FIB is a set of `(prefix, output interface)` entries; a lookup tells
//! which output interface to use for a given IP address, and how many trie nodes were visited to
//! find it. The trie is meant for measuring hardware-style lookups, so every lookup reports its
//! number of node accesses.
//!
//! # Description of the Tree
//!
//! Each node stores a prefix, an output interface, the index of the address bit it tests, and
//! two optional children. Nodes live in a single table and reference their children by index.
//! The trie is used in three phases:
//!
//! 1. **Insertion** walks the bits of a prefix from the most significant one, creating a node for
//!    every level that does not exist yet. The node reached after the last bit is marked as a
//!    route. The very first route becomes the root.
//! 2. **Compression** removes every node that holds no route and has exactly one child. The
//!    remaining nodes still test their own bit, so lookups skip over the removed levels.
//! 3. **Search** follows the address bits from the root. Among the routes visited on the way that
//!    cover the address, the one with the highest output interface wins. Interface `0` means that
//!    no route matched.
//!
//! Once compressed, the trie is not modified any more, and lookups only need `&self`.
//!
//! The width of the addresses is taken from the representation of the [`Prefix`] type. With the
//! `ipnet` feature (enabled by default), [`ipnet::Ipv4Net`] can be used directly, and the [`io`]
//! module reads forwarding tables and packet traces in text format.
//!
//! ```
//! # use route_lookup::*;
//! # use ipnet::Ipv4Net;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut trie: RouteTrie<Ipv4Net> = RouteTrie::new();
//! trie.insert("0.0.0.0/0".parse()?, 1)?;
//! trie.insert("10.0.0.0/8".parse()?, 2)?;
//! trie.insert("10.1.0.0/16".parse()?, 3)?;
//! let removed = trie.compress();
//! assert!(removed > 0);
//!
//! let lookup = trie.search(u32::from_be_bytes([10, 1, 2, 3]));
//! assert_eq!(lookup.interface, 3);
//! assert_eq!(trie.search(u32::from_be_bytes([10, 2, 2, 3])).interface, 2);
//! assert_eq!(trie.search(u32::from_be_bytes([192, 168, 0, 1])).interface, 1);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]

mod error;
mod fmt;
mod prefix;
#[cfg(test)]
mod fuzzing;

#[cfg(feature = "ipnet")]
pub mod io;
pub mod trie;

pub use error::Error;
pub use prefix::Prefix;
pub use trie::{Lookup, RouteTrie};
