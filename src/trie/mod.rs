//! Implementation of the route trie.

use crate::{Error, Prefix};

mod compress;
mod search;

pub use search::Lookup;

/// Binary trie over the prefixes of a forwarding table, walked one address bit per level.
///
/// The trie is built once by calling [`RouteTrie::insert`] for every route, then compressed once
/// with [`RouteTrie::compress`], and finally queried with [`RouteTrie::search`]. Lookups take
/// `&self`, so a compressed trie can be shared among threads.
#[derive(Clone)]
pub struct RouteTrie<P> {
    pub(crate) table: Vec<Node<P>>,
    free: Vec<usize>,
    pub(crate) root: Option<usize>,
}

impl<P> Default for RouteTrie<P> {
    fn default() -> Self {
        Self {
            table: Vec::new(),
            free: Vec::new(),
            root: None,
        }
    }
}

impl<P> RouteTrie<P>
where
    P: Prefix + Clone,
{
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an (uncompressed) trie from a sequence of routes, inserted in order.
    ///
    /// ```
    /// # use route_lookup::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let routes: Vec<(Ipv4Net, u32)> = vec![("10.0.0.0/8".parse()?, 1), ("10.1.0.0/16".parse()?, 2)];
    /// let trie = RouteTrie::from_routes(routes)?;
    /// assert_eq!(trie.search(u32::from_be_bytes([10, 1, 2, 3])).interface, 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_routes<I>(routes: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (P, u32)>,
    {
        let mut trie = Self::new();
        for (prefix, out_interface) in routes {
            trie.insert(prefix, out_interface)?;
        }
        Ok(trie)
    }

    /// Insert a route into the trie. The trie grows by one node for every bit of `prefix` that is
    /// not yet represented by the path from the root. Inserting a prefix that is already present
    /// replaces its output interface.
    ///
    /// Fails if the prefix is longer than the address width, or if a new node cannot be
    /// allocated. A rejected prefix leaves the trie unchanged.
    ///
    /// ```
    /// # use route_lookup::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: RouteTrie<Ipv4Net> = RouteTrie::new();
    /// trie.insert("0.0.0.0/0".parse()?, 1)?;
    /// trie.insert("128.0.0.0/1".parse()?, 2)?;
    /// assert_eq!(trie.node_count(), 2);
    /// assert_eq!(trie.search(u32::from_be_bytes([200, 0, 0, 0])).interface, 2);
    /// assert_eq!(trie.search(u32::from_be_bytes([10, 0, 0, 0])).interface, 1);
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(&mut self, prefix: P, out_interface: u32) -> Result<(), Error> {
        log::trace!(
            "insert {}/{} -> {}",
            prefix.binary_string(),
            prefix.prefix_len(),
            out_interface
        );
        let width = P::width();
        if prefix.prefix_len() > width {
            return Err(Error::PrefixLength {
                len: prefix.prefix_len(),
                width,
            });
        }
        let Some(root) = self.root else {
            let root = self.new_node(prefix, out_interface)?;
            self.table[root].is_out = true;
            self.root = Some(root);
            return Ok(());
        };

        // the first route of the trie sits at the root, no matter its length.
        let root_node = &mut self.table[root];
        if root_node.is_out && root_node.prefix.eq(&prefix) {
            root_node.out_interface = out_interface;
            return Ok(());
        }

        let mut idx = root;
        for bit in 0..prefix.prefix_len() {
            self.table[idx].bit_id = bit;
            let right = prefix.is_bit_set(bit);
            idx = match self.get_child(idx, right) {
                Some(child) => child,
                None => {
                    let child = self.new_node(prefix.clone(), out_interface)?;
                    self.set_child(idx, child, right);
                    child
                }
            };
        }

        if idx == root {
            return self.install_default(root, prefix, out_interface);
        }

        let node = &mut self.table[idx];
        node.prefix = prefix;
        node.out_interface = out_interface;
        node.is_out = true;
        Ok(())
    }

    /// Number of nodes currently in the trie.
    pub fn node_count(&self) -> usize {
        self.table.len() - self.free.len()
    }

    /// Returns `true` if the trie contains no routes.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Destroy all nodes of the trie by a post-order traversal and return how many nodes were
    /// released. Every node reachable from the root is released exactly once. Calling `clear` on
    /// an empty trie does nothing.
    ///
    /// ```
    /// # use route_lookup::*;
    /// # use ipnet::Ipv4Net;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie: RouteTrie<Ipv4Net> = RouteTrie::new();
    /// trie.insert("192.168.0.0/23".parse()?, 1)?;
    /// trie.insert("192.168.1.0/24".parse()?, 2)?;
    /// let nodes = trie.node_count();
    /// assert_eq!(trie.clear(), nodes);
    /// assert!(trie.is_empty());
    /// assert_eq!(trie.clear(), 0);
    /// # Ok(())
    /// # }
    /// ```
    pub fn clear(&mut self) -> usize {
        let mut released = 0;
        if let Some(root) = self.root.take() {
            released = self.release_subtree(root);
        }
        debug_assert_eq!(self.node_count(), 0);
        self.table.clear();
        self.free.clear();
        released
    }
}

/// Private function implementations
impl<P> RouteTrie<P>
where
    P: Prefix + Clone,
{
    /// Install a zero-length prefix at the root. If the root holds the first inserted route, that
    /// route is moved to its own position in the trie so it stays reachable.
    fn install_default(&mut self, root: usize, prefix: P, out_interface: u32) -> Result<(), Error> {
        let node = &mut self.table[root];
        let displaced = if node.is_out && !node.prefix.eq(&prefix) {
            Some((node.prefix.clone(), node.out_interface))
        } else {
            None
        };
        node.prefix = prefix;
        node.out_interface = out_interface;
        node.is_out = true;
        if let Some((prefix, out_interface)) = displaced {
            log::debug!(
                "moving route {}/{} away from the root to make room for the default route",
                prefix.binary_string(),
                prefix.prefix_len()
            );
            self.insert(prefix, out_interface)?;
        }
        Ok(())
    }

    /// release all nodes of the subtree rooted at `idx` (children before their parent).
    fn release_subtree(&mut self, idx: usize) -> usize {
        let mut released = 0;
        if let Some(left) = self.table[idx].left.take() {
            released += self.release_subtree(left);
        }
        if let Some(right) = self.table[idx].right.take() {
            released += self.release_subtree(right);
        }
        self.free_node(idx);
        released + 1
    }

    /// Get the child of a node, either to the left or the right
    #[inline(always)]
    pub(crate) fn get_child(&self, idx: usize, right: bool) -> Option<usize> {
        if right {
            self.table[idx].right
        } else {
            self.table[idx].left
        }
    }

    /// set the child of a node (either to the left or the right), and return the index of the old child.
    #[inline(always)]
    fn set_child(&mut self, idx: usize, child: usize, right: bool) -> Option<usize> {
        if right {
            self.table[idx].right.replace(child)
        } else {
            self.table[idx].left.replace(child)
        }
    }

    /// insert a new node into the table and return its index.
    #[inline(always)]
    fn new_node(&mut self, prefix: P, out_interface: u32) -> Result<usize, Error> {
        let node = Node::new(prefix, out_interface);
        if let Some(idx) = self.free.pop() {
            self.table[idx] = node;
            Ok(idx)
        } else {
            self.table.try_reserve(1)?;
            let idx = self.table.len();
            self.table.push(node);
            Ok(idx)
        }
    }

    /// hand a node back to the free list. Its children must already be detached or moved.
    #[inline(always)]
    fn free_node(&mut self, idx: usize) {
        let node = &mut self.table[idx];
        node.left = None;
        node.right = None;
        node.is_out = false;
        self.free.push(idx);
    }
}

/// A node of the route trie.
#[derive(Clone)]
pub(crate) struct Node<P> {
    /// Prefix of the route that created (or was installed at) this node.
    pub(crate) prefix: P,
    pub(crate) out_interface: u32,
    /// Bit of the address that selects the child. Equal to the address width for nodes without
    /// children.
    pub(crate) bit_id: u8,
    /// Number of levels removed directly above this node during compression.
    pub(crate) skip: u8,
    /// Whether this node holds an inserted route rather than only leading to deeper nodes.
    pub(crate) is_out: bool,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl<P: Prefix> Node<P> {
    fn new(prefix: P, out_interface: u32) -> Self {
        Self {
            prefix,
            out_interface,
            bit_id: P::width(),
            skip: 0,
            is_out: false,
            left: None,
            right: None,
        }
    }
}
