//! Longest-prefix-match lookups.

use super::*;
use crate::prefix::is_addr_bit_set;

/// Result of a single lookup.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Lookup {
    /// Output interface of the best matching route, or `0` if no route matches.
    pub interface: u32,
    /// Number of nodes entered below the root while walking the trie.
    pub accesses: u32,
}

impl Lookup {
    /// Returns `true` if no route matched the address.
    pub fn is_miss(&self) -> bool {
        self.interface == 0
    }
}

impl<P> RouteTrie<P>
where
    P: Prefix,
{
    /// Look up the output interface for `addr`.
    ///
    /// The walk starts at the root and follows the address bit tested by each node. Among all
    /// routes visited on the way that cover the address, the one with the highest output
    /// interface wins. The walk ends when the required child is missing, or when reaching a node
    /// without children, so it enters at most `P::width()` nodes below the root.
    ///
    /// Searching an empty trie returns `interface: 0` and `accesses: 0`.
    ///
    /// ```
    /// # use route_lookup::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: RouteTrie<Ipv4Net> = RouteTrie::new();
    /// assert_eq!(trie.search(0), Lookup { interface: 0, accesses: 0 });
    /// trie.insert("10.0.0.0/8".parse()?, 1)?;
    /// trie.insert("10.1.0.0/16".parse()?, 2)?;
    /// trie.compress();
    /// assert_eq!(trie.search(u32::from_be_bytes([10, 1, 2, 3])).interface, 2);
    /// assert_eq!(trie.search(u32::from_be_bytes([10, 2, 2, 3])).interface, 1);
    /// assert!(trie.search(u32::from_be_bytes([11, 0, 0, 1])).is_miss());
    /// # Ok(())
    /// # }
    /// ```
    pub fn search(&self, addr: P::R) -> Lookup {
        let mut result = Lookup::default();
        let Some(mut idx) = self.root else {
            return result;
        };
        let width = P::width();
        loop {
            let node = &self.table[idx];
            if node.is_out && node.prefix.covers(addr) {
                result.interface = result.interface.max(node.out_interface);
            }
            if node.bit_id >= width {
                break;
            }
            let next = if is_addr_bit_set(addr, node.bit_id) {
                node.right
            } else {
                node.left
            };
            match next {
                Some(child) => {
                    idx = child;
                    result.accesses += 1;
                }
                None => break,
            }
        }
        result
    }
}
