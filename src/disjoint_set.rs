//! Union-find over integer-like keys.
//!
//! Keys that were never mentioned are singleton classes; they are created
//! lazily the first time [`DisjointSet::find`] sees them.

use std::hash::Hash;

use hashbrown::HashMap;

#[derive(Debug, Clone)]
pub struct DisjointSet<K = usize> {
    // a key is a representative iff it is its own parent
    parent: HashMap<K, K>,
    // only kept for representatives
    size: HashMap<K, usize>,
}

impl<K: Copy + Eq + Hash> DisjointSet<K> {
    pub fn new() -> Self {
        DisjointSet {
            parent: HashMap::new(),
            size: HashMap::new(),
        }
    }

    /// Representative of the class containing `x`.
    ///
    /// Every node visited on the way up is re-pointed at the root.
    pub fn find(&mut self, x: K) -> K {
        let mut root = x;
        loop {
            match self.parent.get(&root) {
                Some(&p) if p != root => root = p,
                Some(_) => break,
                None => {
                    // only reachable for x itself: parents always exist
                    self.parent.insert(root, root);
                    self.size.insert(root, 1);
                    return root;
                }
            }
        }

        let mut node = x;
        while node != root {
            let next = self.parent.insert(node, root).unwrap_or(root);
            node = next;
        }

        root
    }

    /// Merge the classes of `x` and `y`, returning the new representative.
    ///
    /// The larger class absorbs the smaller one; on a tie the class of `x`
    /// wins.
    pub fn union(&mut self, x: K, y: K) -> K {
        let rx = self.find(x);
        let ry = self.find(y);
        if rx == ry {
            return rx;
        }

        let sx = self.size.get(&rx).copied().unwrap_or(1);
        let sy = self.size.get(&ry).copied().unwrap_or(1);
        let (root, child) = if sx >= sy { (rx, ry) } else { (ry, rx) };

        self.parent.insert(child, root);
        self.size.remove(&child);
        self.size.insert(root, sx + sy);
        root
    }

    pub fn same_set(&mut self, x: K, y: K) -> bool {
        self.find(x) == self.find(y)
    }

    /// Number of elements in the class of `x`.
    pub fn size_of(&mut self, x: K) -> usize {
        let root = self.find(x);
        self.size.get(&root).copied().unwrap_or(1)
    }

    /// Number of keys seen so far.
    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }

    pub fn clear(&mut self) {
        self.parent.clear();
        self.size.clear();
    }
}

impl<K: Copy + Eq + Hash> Default for DisjointSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
