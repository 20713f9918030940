//! Level-skipping compression of the route trie.

use super::*;

impl<P> RouteTrie<P>
where
    P: Prefix + Clone,
{
    /// Compress the trie in place by removing every node that has exactly one child and holds no
    /// route. The child takes the place of the removed node and remembers how many levels were
    /// removed above it. Returns the number of removed nodes.
    ///
    /// Every surviving node keeps the bit it tests, so compression never changes the interface
    /// found by a lookup. Addresses that follow a route's path usually need fewer accesses.
    ///
    /// ```
    /// # use route_lookup::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: RouteTrie<Ipv4Net> = RouteTrie::new();
    /// trie.insert("0.0.0.0/0".parse()?, 1)?;
    /// trie.insert("10.1.0.0/16".parse()?, 2)?;
    /// assert_eq!(trie.node_count(), 17);
    /// let addr = u32::from_be_bytes([10, 1, 2, 3]);
    /// assert_eq!(trie.search(addr), Lookup { interface: 2, accesses: 16 });
    ///
    /// assert_eq!(trie.compress(), 15);
    /// assert_eq!(trie.node_count(), 2);
    /// assert_eq!(trie.search(addr), Lookup { interface: 2, accesses: 1 });
    /// # Ok(())
    /// # }
    /// ```
    pub fn compress(&mut self) -> usize {
        let before = self.node_count();
        if let Some(root) = self.root {
            self.root = Some(self.compress_slot(root));
        }
        let after = self.node_count();
        log::debug!("compressed the trie from {before} to {after} nodes");
        before - after
    }

    /// Compress the subtree stored in a slot that currently holds `idx`, and return the node that
    /// holds the slot afterwards.
    fn compress_slot(&mut self, mut idx: usize) -> usize {
        loop {
            let node = &self.table[idx];
            let child = match (node.left, node.right) {
                (Some(child), None) | (None, Some(child)) if !node.is_out => child,
                _ => break,
            };
            let skip = node.skip.saturating_add(1);
            self.table[child].skip = skip;
            self.free_node(idx);
            idx = child;
        }

        if let Some(left) = self.table[idx].left {
            let left = self.compress_slot(left);
            self.table[idx].left = Some(left);
        }
        if let Some(right) = self.table[idx].right {
            let right = self.compress_slot(right);
            self.table[idx].right = Some(right);
        }
        idx
    }
}
