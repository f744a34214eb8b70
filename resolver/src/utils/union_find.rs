/// Disjoint sets over the dense indices `0..len`.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parents: Vec<usize>,
    sets: usize,
}

impl UnionFind {
    pub fn new(len: usize) -> Self {
        Self {
            parents: (0..len).collect(),
            sets: len,
        }
    }

    pub fn find(&mut self, index: usize) -> usize {
        let mut root = index;
        while self.parents[root] != root {
            root = self.parents[root];
        }
        let mut current = index;
        while self.parents[current] != root {
            let next = self.parents[current];
            self.parents[current] = root;
            current = next;
        }
        root
    }

    /// Merge the sets holding `a` and `b`. Returns `false` when they were already merged.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (root_a, root_b) = (self.find(a), self.find(b));
        if root_a == root_b {
            return false;
        }
        // Keep the smaller index as the root so that roots are deterministic
        let (keep, absorb) = if root_a < root_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        self.parents[absorb] = keep;
        self.sets -= 1;
        true
    }

    /// The number of disjoint sets remaining.
    pub fn set_count(&self) -> usize {
        self.sets
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_find() {
        let mut sets = UnionFind::new(4);
        assert_eq!(sets.set_count(), 4);
        assert!(sets.union(3, 1));
        assert!(sets.union(1, 2));
        assert!(!sets.union(2, 3));
        assert_eq!(sets.find(3), 1);
        assert_eq!(sets.set_count(), 2);
        assert_ne!(sets.find(0), sets.find(2));
    }
}
