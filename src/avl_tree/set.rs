use crate::avl_tree::node::Node;
use crate::avl_tree::tree;
use serde::de::{Deserialize, Deserializer, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeSeq, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::marker::PhantomData;

/// An ordered set implemented using an avl tree.
///
/// An avl tree is a self-balancing binary search tree that maintains the invariant that the
/// heights of the two child subtrees of any node differ by at most one. Every key in the set is
/// unique with respect to its total order.
///
/// # Examples
/// ```
/// use balanced_collections::avl_tree::AvlSet;
///
/// let mut set = AvlSet::new();
/// set.insert(0);
/// set.insert(3);
///
/// assert_eq!(set.len(), 2);
///
/// assert_eq!(set.min(), Some(&0));
/// assert_eq!(set.max(), Some(&3));
///
/// assert!(set.remove(&0));
/// assert!(!set.remove(&1));
/// ```
pub struct AvlSet<T> {
    tree: tree::Tree<T>,
    len: usize,
}

impl<T> AvlSet<T> {
    /// Constructs a new, empty `AvlSet<T>`.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// ```
    pub fn new() -> Self {
        AvlSet { tree: None, len: 0 }
    }

    /// Inserts a key into the set. Returns `true` if the key was not in the set, and `false`
    /// otherwise. Inserting a key that already exists in the set is a no-op and does not replace
    /// the stored key.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// assert!(set.insert(1));
    /// assert!(set.contains(&1));
    /// assert!(!set.insert(1));
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn insert(&mut self, key: T) -> bool
    where
        T: Ord,
    {
        let inserted = tree::insert(&mut self.tree, key);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Removes a key from the set. Returns `true` if the key was in the set, and `false`
    /// otherwise. Removing a key that is not in the set is a no-op.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert!(set.remove(&1));
    /// assert!(!set.remove(&1));
    /// ```
    pub fn remove<V>(&mut self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        let removed = tree::remove(&mut self.tree, key);
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Checks if a key exists in the set.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert!(!set.contains(&0));
    /// assert!(set.contains(&1));
    /// ```
    pub fn contains<V>(&self, key: &V) -> bool
    where
        T: Borrow<V>,
        V: Ord + ?Sized,
    {
        tree::get(&self.tree, key).is_some()
    }

    /// Returns the number of elements in the set.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert_eq!(set.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let set: AvlSet<u32> = AvlSet::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clears the set, removing all values.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.clear();
    /// assert_eq!(set.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree = None;
        self.len = 0;
    }

    /// Returns the minimum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T>
    where
        T: Ord,
    {
        tree::min(&self.tree)
    }

    /// Returns the maximum key of the set. Returns `None` if the set is empty.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(3);
    /// assert_eq!(set.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T>
    where
        T: Ord,
    {
        tree::max(&self.tree)
    }

    /// Returns the key at the root of the tree. Returns `None` if the set is empty. Rotations may
    /// restructure the tree, so the root key is not stable across inserts and removes.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.insert(3);
    /// assert_eq!(set.root(), Some(&2));
    /// ```
    pub fn root(&self) -> Option<&T> {
        self.tree.as_ref().map(|node| &node.key)
    }

    /// Returns an iterator over the set. The iterator will yield keys in ascending order using
    /// in-order traversal.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(3);
    ///
    /// let mut iterator = set.iter();
    /// assert_eq!(iterator.next(), Some(&1));
    /// assert_eq!(iterator.next(), Some(&3));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlSetIter<T> {
        AvlSetIter {
            current: &self.tree,
            stack: Vec::new(),
        }
    }

    /// Returns a vector of references to the keys in the set in ascending order. The length of
    /// the vector is equal to the number of elements in the set.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(5);
    /// set.insert(2);
    /// set.insert(10);
    /// assert_eq!(set.to_vec(), vec![&2, &5, &10]);
    /// ```
    pub fn to_vec(&self) -> Vec<&T> {
        self.iter().collect()
    }

    /// Recounts the nodes reachable from the root and checks that the count matches the tracked
    /// number of elements. Intended for validating the set in tests; runs a full traversal.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// assert!(set.check_size_invariant());
    /// ```
    pub fn check_size_invariant(&self) -> bool {
        tree::count(&self.tree) == self.len
    }

    /// Checks that the heights of the two child subtrees of every node differ by at most one.
    /// Intended for validating the set in tests; runs a full traversal.
    ///
    /// # Examples
    /// ```
    /// use balanced_collections::avl_tree::AvlSet;
    ///
    /// let mut set = AvlSet::new();
    /// set.insert(1);
    /// set.insert(2);
    /// set.insert(3);
    /// assert!(set.check_balance_invariant());
    /// ```
    pub fn check_balance_invariant(&self) -> bool {
        tree::is_balanced(&self.tree)
    }
}

impl<T> IntoIterator for AvlSet<T> {
    type IntoIter = AvlSetIntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            current: self.tree,
            stack: Vec::new(),
        }
    }
}

impl<'a, T> IntoIterator for &'a AvlSet<T>
where
    T: 'a,
{
    type IntoIter = AvlSetIter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields owned keys.
pub struct AvlSetIntoIter<T> {
    current: tree::Tree<T>,
    stack: Vec<Node<T>>,
}

impl<T> Iterator for AvlSetIntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(mut node) = self.current.take() {
            self.current = node.left.take();
            self.stack.push(*node);
        }
        self.stack.pop().map(|node| {
            let Node { key, right, .. } = node;
            self.current = right;
            key
        })
    }
}

/// An iterator for `AvlSet<T>`.
///
/// This iterator traverses the elements of the set in-order and yields immutable references.
pub struct AvlSetIter<'a, T>
where
    T: 'a,
{
    current: &'a tree::Tree<T>,
    stack: Vec<&'a Node<T>>,
}

impl<'a, T> Iterator for AvlSetIter<'a, T>
where
    T: 'a,
{
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(ref node) = self.current {
            self.current = &node.left;
            self.stack.push(node);
        }
        self.stack.pop().map(|node| {
            self.current = &node.right;
            &node.key
        })
    }
}

impl<T> Default for AvlSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AvlSet<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T> fmt::Display for AvlSet<T>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut iter = self.iter();
        if let Some(key) = iter.next() {
            write!(f, "{}", key)?;
            for key in iter {
                write!(f, " {}", key)?;
            }
        }
        Ok(())
    }
}

impl<T> PartialEq for AvlSet<T>
where
    T: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(x, y)| x == y)
    }
}

impl<T> Eq for AvlSet<T> where T: Eq {}

impl<T> Hash for AvlSet<T>
where
    T: Hash,
{
    fn hash<H>(&self, state: &mut H)
    where
        H: Hasher,
    {
        self.len.hash(state);
        for key in self {
            key.hash(state);
        }
    }
}

impl<T> FromIterator<T> for AvlSet<T>
where
    T: Ord,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = AvlSet::new();
        set.extend(iter);
        set
    }
}

impl<T> Extend<T> for AvlSet<T>
where
    T: Ord,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<T> Serialize for AvlSet<T>
where
    T: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.len()))?;
        for key in self {
            seq.serialize_element(key)?;
        }
        seq.end()
    }
}

struct AvlSetVisitor<T> {
    marker: PhantomData<T>,
}

impl<'de, T> Visitor<'de> for AvlSetVisitor<T>
where
    T: Deserialize<'de> + Ord,
{
    type Value = AvlSet<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a sequence of keys")
    }

    fn visit_seq<S>(self, mut access: S) -> Result<Self::Value, S::Error>
    where
        S: SeqAccess<'de>,
    {
        let mut set = AvlSet::new();
        while let Some(key) = access.next_element()? {
            set.insert(key);
        }
        Ok(set)
    }
}

impl<'de, T> Deserialize<'de> for AvlSet<T>
where
    T: Deserialize<'de> + Ord,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_seq(AvlSetVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AvlSet;
    use serde_test::{assert_tokens, Token};
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash<T>(set: &AvlSet<T>) -> u64
    where
        T: Hash,
    {
        let mut hasher = DefaultHasher::new();
        set.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn test_len_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn test_is_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert!(set.is_empty());
    }

    #[test]
    fn test_min_max_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.min(), None);
        assert_eq!(set.max(), None);
    }

    #[test]
    fn test_root_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.root(), None);
    }

    #[test]
    fn test_iter_empty() {
        let set: AvlSet<u32> = AvlSet::new();
        assert_eq!(set.iter().next(), None);
    }

    #[test]
    fn test_insert() {
        let mut set = AvlSet::new();
        assert!(set.insert(1));
        assert!(set.contains(&1));
    }

    #[test]
    fn test_insert_existing() {
        let mut set = AvlSet::new();
        assert!(set.insert(1));
        assert!(!set.insert(1));
        assert_eq!(set.len(), 1);
        assert_eq!(set.to_vec(), vec![&1]);
    }

    #[test]
    fn test_insert_rotate_left() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(2);
        set.insert(3);

        assert_eq!(set.root(), Some(&2));
        assert!(set.check_balance_invariant());
        assert!(set.check_size_invariant());
    }

    #[test]
    fn test_insert_rotate_right() {
        let mut set = AvlSet::new();
        set.insert(3);
        set.insert(2);
        set.insert(1);

        assert_eq!(set.root(), Some(&2));
        assert!(set.check_balance_invariant());
        assert!(set.check_size_invariant());
    }

    #[test]
    fn test_insert_rotate_right_left() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(2);

        assert_eq!(set.root(), Some(&2));
        assert!(set.check_balance_invariant());
        assert!(set.check_size_invariant());
    }

    #[test]
    fn test_insert_rotate_left_right() {
        let mut set = AvlSet::new();
        set.insert(3);
        set.insert(1);
        set.insert(2);

        assert_eq!(set.root(), Some(&2));
        assert!(set.check_balance_invariant());
        assert!(set.check_size_invariant());
    }

    #[test]
    fn test_remove() {
        let mut set = AvlSet::new();
        set.insert(1);
        assert!(set.remove(&1));
        assert!(!set.contains(&1));
        assert!(set.is_empty());
    }

    #[test]
    fn test_remove_missing() {
        let mut set = AvlSet::new();
        assert!(!set.remove(&1));
        set.insert(1);
        assert!(!set.remove(&0));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_remove_root() {
        let mut set = AvlSet::new();
        set.insert(5);
        set.insert(2);
        set.insert(10);

        assert_eq!(set.len(), 3);
        assert_eq!(set.to_vec(), vec![&2, &5, &10]);
        assert_eq!(set.min(), Some(&2));
        assert_eq!(set.max(), Some(&10));

        assert!(set.remove(&5));
        assert_eq!(set.len(), 2);
        assert_eq!(set.to_vec(), vec![&2, &10]);
        assert!(set.check_balance_invariant());
        assert!(set.check_size_invariant());
        assert!(!set.remove(&5));
    }

    #[test]
    fn test_remove_node_with_left_child() {
        let mut set = AvlSet::new();
        set.insert(2);
        set.insert(1);

        assert!(set.remove(&2));
        assert_eq!(set.root(), Some(&1));
        assert_eq!(set.to_vec(), vec![&1]);
    }

    #[test]
    fn test_remove_node_with_right_child() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(2);

        assert!(set.remove(&1));
        assert_eq!(set.root(), Some(&2));
        assert_eq!(set.to_vec(), vec![&2]);
    }

    #[test]
    fn test_remove_node_with_two_children() {
        let mut set = AvlSet::new();
        set.insert(2);
        set.insert(1);
        set.insert(3);

        assert!(set.remove(&2));
        assert_eq!(set.root(), Some(&3));
        assert_eq!(set.to_vec(), vec![&1, &3]);
        assert!(set.check_balance_invariant());
        assert!(set.check_size_invariant());
    }

    #[test]
    fn test_min_max() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(3);
        set.insert(5);

        assert_eq!(set.min(), Some(&1));
        assert_eq!(set.max(), Some(&5));
    }

    #[test]
    fn test_clear() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(2);
        set.clear();

        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
        assert_eq!(set.iter().next(), None);
    }

    #[test]
    fn test_check_invariants() {
        let mut set = AvlSet::new();
        for key in 0..10 {
            set.insert(key);
            assert!(set.check_balance_invariant());
            assert!(set.check_size_invariant());
        }
        for key in 0..10 {
            assert!(set.remove(&key));
            assert!(set.check_balance_invariant());
            assert!(set.check_size_invariant());
        }
    }

    #[test]
    fn test_into_iter() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.into_iter().collect::<Vec<u32>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_iter() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.insert(5);
        set.insert(3);

        assert_eq!(set.iter().collect::<Vec<&u32>>(), vec![&1, &3, &5]);
    }

    #[test]
    fn test_to_vec() {
        let mut set = AvlSet::new();
        set.insert(5);
        set.insert(2);
        set.insert(10);

        assert_eq!(set.to_vec(), vec![&2, &5, &10]);
    }

    #[test]
    fn test_eq() {
        let mut first = AvlSet::new();
        for key in vec![7, 3, 9, 1] {
            first.insert(key);
        }

        let mut second = AvlSet::new();
        for key in vec![1, 3, 7, 9] {
            second.insert(key);
        }

        assert_eq!(first, second);
        assert_eq!(hash(&first), hash(&second));
    }

    #[test]
    fn test_ne() {
        let mut first = AvlSet::new();
        for key in vec![7, 3, 9, 1] {
            first.insert(key);
        }

        let mut second = AvlSet::new();
        for key in vec![1, 3, 7, 9] {
            second.insert(key);
        }

        second.remove(&7);

        assert_ne!(first, second);
        assert_ne!(hash(&first), hash(&second));
    }

    #[test]
    fn test_display() {
        let mut set = AvlSet::new();
        set.insert(5);
        set.insert(2);
        set.insert(10);

        assert_eq!(set.to_string(), "2 5 10");
        set.clear();
        assert_eq!(set.to_string(), "");
    }

    #[test]
    fn test_debug() {
        let mut set = AvlSet::new();
        set.insert(2);
        set.insert(1);

        assert_eq!(format!("{:?}", set), "{1, 2}");
    }

    #[test]
    fn test_from_iter() {
        let set: AvlSet<u32> = vec![5, 2, 10, 2].into_iter().collect();

        assert_eq!(set.len(), 3);
        assert_eq!(set.to_vec(), vec![&2, &5, &10]);
    }

    #[test]
    fn test_extend() {
        let mut set = AvlSet::new();
        set.insert(1);
        set.extend(vec![5, 2, 10]);

        assert_eq!(set.len(), 4);
        assert_eq!(set.to_vec(), vec![&1, &2, &5, &10]);
    }

    #[test]
    fn test_serde() {
        let mut set = AvlSet::new();
        set.insert(2);
        set.insert(1);
        set.insert(3);

        assert_tokens(
            &set,
            &[
                Token::Seq { len: Some(3) },
                Token::I32(1),
                Token::I32(2),
                Token::I32(3),
                Token::SeqEnd,
            ],
        );
    }
}
