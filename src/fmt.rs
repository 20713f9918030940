//! Formatting implementation for the RouteTrie

use std::fmt::{Debug, Formatter, Result};

use crate::trie::Node;
use crate::RouteTrie;

impl<P: Debug> Debug for RouteTrie<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self.root {
            Some(root) => DebugRouteTrie(self, root).fmt(f),
            None => f.write_str("{}"),
        }
    }
}

struct DebugRouteTrie<'a, P>(&'a RouteTrie<P>, usize);

/// Label of a single node: the prefix, the bit it tests, and the interface if it holds a route.
struct DebugNode<'a, P>(&'a Node<P>);

impl<P: Debug> Debug for DebugNode<'_, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let node = self.0;
        node.prefix.fmt(f)?;
        write!(f, " @{}", node.bit_id)?;
        if node.skip > 0 {
            write!(f, " +{}", node.skip)?;
        }
        if node.is_out {
            write!(f, " => {}", node.out_interface)?;
        }
        Ok(())
    }
}

impl<P: Debug> Debug for DebugRouteTrie<'_, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let trie = self.0;
        let node = &trie.table[self.1];
        let label = DebugNode(node);
        match (node.left, node.right) {
            (None, None) => label.fmt(f),
            (Some(left), None) => f
                .debug_map()
                .entry(&label, &(Self(trie, left), ()))
                .finish(),
            (None, Some(right)) => f
                .debug_map()
                .entry(&label, &((), Self(trie, right)))
                .finish(),
            (Some(left), Some(right)) => f
                .debug_map()
                .entry(&label, &(Self(trie, left), Self(trie, right)))
                .finish(),
        }
    }
}
