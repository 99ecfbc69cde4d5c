use crate::arena::Handle;
use crate::avl_tree::tree;
use crate::bst::tree::Tree;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;

/// An ordered map implemented by an AVL tree.
///
/// An AVL tree is a self-balancing binary search tree that maintains the
/// invariant that the heights of the two child subtrees of any node differ by
/// at most one. Every node stores its balance factor, and insertions and
/// removals restore the invariant by walking from the edit point toward the
/// root, rotating where the factor overflows.
///
/// # Examples
/// ```
/// use ordered_collections::avl_tree::AvlMap;
///
/// let mut map = AvlMap::new();
/// map.insert(0, 1);
/// map.insert(3, 4);
///
/// assert_eq!(map.get(&0), Some(&1));
/// assert_eq!(map.get(&1), None);
/// assert_eq!(map.len(), 2);
///
/// assert_eq!(map.min(), Some(&0));
/// assert_eq!(map.ceil(&2), Some(&3));
///
/// *map.get_mut(&0).unwrap() = 2;
/// assert_eq!(map.remove(&0), Some((0, 2)));
/// assert_eq!(map.remove(&1), None);
/// ```
pub struct AvlMap<T, U> {
    tree: Tree<T, U>,
}

impl<T, U> AvlMap<T, U>
where
    T: Ord,
{
    /// Constructs a new, empty `AvlMap<T, U>`.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// ```
    pub fn new() -> Self {
        AvlMap { tree: Tree::new() }
    }

    /// Inserts a key-value pair into the map. If the key already exists in
    /// the map, it will return and replace the old key-value pair; the tree
    /// structure and all balance factors are left untouched in that case.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some((1, 1)));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<(T, U)> {
        tree::insert(&mut self.tree, key, value).map(|entry| (entry.key, entry.value))
    }

    /// Removes a key-value pair from the map, rebalancing the tree along the
    /// path from the removal point to the root. If the key exists in the map,
    /// it will return the associated key-value pair. Otherwise it will return
    /// `None` and leave the map untouched.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<(T, U)> {
        tree::remove(&mut self.tree, key).map(|entry| (entry.key, entry.value))
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert!(!map.contains_key(&0));
    /// assert!(map.contains_key(&1));
    /// ```
    pub fn contains_key(&self, key: &T) -> bool {
        self.tree.find_node(key).is_some()
    }

    /// Returns an immutable reference to the value associated with a
    /// particular key. It will return `None` if the key does not exist in the
    /// map.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.get(&0), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// ```
    pub fn get(&self, key: &T) -> Option<&U> {
        self.tree
            .find_node(key)
            .map(move |curr| &self.tree.arena[curr].entry.value)
    }

    /// Returns a mutable reference to the value associated with a particular
    /// key. Returns `None` if such a key does not exist.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// *map.get_mut(&1).unwrap() = 2;
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn get_mut(&mut self, key: &T) -> Option<&mut U> {
        match self.tree.find_node(key) {
            Some(curr) => Some(&mut self.tree.arena[curr].entry.value),
            None => None,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Returns `true` if the map is empty.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let map: AvlMap<u32, u32> = AvlMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Clears the map, removing all entries.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.clear();
    /// assert_eq!(map.is_empty(), true);
    /// ```
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns a key in the map that is greater than or equal to a particular
    /// key. Returns `None` if such a key does not exist.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.ceil(&0), Some(&1));
    /// assert_eq!(map.ceil(&2), None);
    /// ```
    pub fn ceil(&self, key: &T) -> Option<&T> {
        self.tree
            .ceil_node(key)
            .map(move |curr| &self.tree.arena[curr].entry.key)
    }

    /// Returns a key in the map that is less than or equal to a particular
    /// key. Returns `None` if such a key does not exist.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.floor(&0), None);
    /// assert_eq!(map.floor(&2), Some(&1));
    /// ```
    pub fn floor(&self, key: &T) -> Option<&T> {
        self.tree
            .floor_node(key)
            .map(move |curr| &self.tree.arena[curr].entry.key)
    }

    /// Returns the minimum key of the map. Returns `None` if the map is
    /// empty.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.min(), Some(&1));
    /// ```
    pub fn min(&self) -> Option<&T> {
        self.tree
            .min_node()
            .map(move |curr| &self.tree.arena[curr].entry.key)
    }

    /// Returns the maximum key of the map. Returns `None` if the map is
    /// empty.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.tree
            .max_node()
            .map(move |curr| &self.tree.arena[curr].entry.key)
    }

    /// Independently verifies that every node satisfies the height-balance
    /// invariant, recomputing subtree heights from scratch rather than
    /// trusting the balance factors the mutating operations maintain.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// for key in 0..100 {
    ///     map.insert(key, key);
    /// }
    /// assert!(map.is_balanced());
    /// ```
    pub fn is_balanced(&self) -> bool {
        self.tree.is_balanced()
    }

    /// Returns an iterator positioned at the entry with the given key, or an
    /// exhausted iterator if the key does not exist in the map. Advancing the
    /// iterator yields the remaining entries in ascending key order.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.insert(3, 3);
    ///
    /// let mut iterator = map.find(&2);
    /// assert_eq!(iterator.next(), Some((&2, &2)));
    /// assert_eq!(iterator.next(), Some((&3, &3)));
    /// assert_eq!(iterator.next(), None);
    ///
    /// assert_eq!(map.find(&4).next(), None);
    /// ```
    pub fn find(&self, key: &T) -> AvlMapIter<'_, T, U> {
        AvlMapIter {
            tree: &self.tree,
            next: self.tree.find_node(key),
        }
    }

    /// Returns an iterator over the map. The iterator will yield key-value
    /// pairs using in-order traversal.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::avl_tree::AvlMap;
    ///
    /// let mut map = AvlMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&3, &3)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> AvlMapIter<'_, T, U> {
        AvlMapIter {
            tree: &self.tree,
            next: self.tree.min_node(),
        }
    }
}

impl<'a, T, U> Index<&'a T> for AvlMap<T, U>
where
    T: Ord,
{
    type Output = U;

    fn index(&self, key: &T) -> &Self::Output {
        self.get(key).expect("Error: key not found.")
    }
}

impl<T, U> IntoIterator for AvlMap<T, U>
where
    T: Ord,
{
    type IntoIter = AvlMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        AvlMapIntoIter { tree: self.tree }
    }
}

impl<'a, T, U> IntoIterator for &'a AvlMap<T, U>
where
    T: 'a + Ord,
    U: 'a,
{
    type IntoIter = AvlMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `AvlMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields owned
/// entries. It splices the minimum off the tree without rebalancing, since
/// the balance invariant no longer matters for a tree being consumed.
pub struct AvlMapIntoIter<T, U> {
    tree: Tree<T, U>,
}

impl<T, U> Iterator for AvlMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        let min = self.tree.min_node()?;
        let (entry, _, _) = self.tree.splice_out(min);
        Some((entry.key, entry.value))
    }
}

/// An iterator for `AvlMap<T, U>`.
///
/// This iterator walks the tree in-order through parent links and yields
/// immutable references.
pub struct AvlMapIter<'a, T, U> {
    tree: &'a Tree<T, U>,
    next: Option<Handle>,
}

impl<'a, T, U> Iterator for AvlMapIter<'a, T, U> {
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        let curr = self.next?;
        self.next = self.tree.successor(curr);
        let entry = &self.tree.arena[curr].entry;
        Some((&entry.key, &entry.value))
    }
}

impl<T, U> Default for AvlMap<T, U>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> Debug for AvlMap<T, U>
where
    T: Ord + Debug,
    U: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq for AvlMap<T, U>
where
    T: Ord,
    U: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, U> Eq for AvlMap<T, U>
where
    T: Ord,
    U: Eq,
{
}

impl<T, U> Serialize for AvlMap<T, U>
where
    T: Ord + Serialize,
    U: Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct AvlMapVisitor<T, U> {
    marker: PhantomData<fn() -> AvlMap<T, U>>,
}

impl<'de, T, U> Visitor<'de> for AvlMapVisitor<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    type Value = AvlMap<T, U>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut map = AvlMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, T, U> Deserialize<'de> for AvlMap<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(AvlMapVisitor {
            marker: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::AvlMap;
    use serde_test::{assert_tokens, Token};

    fn assert_node<T, U>(map: &AvlMap<T, U>, key: T, balance: i8)
    where
        T: Ord,
    {
        let curr = map.tree.find_node(&key).expect("node should exist");
        assert_eq!(map.tree.arena[curr].balance, balance);
    }

    fn root_key<T, U>(map: &AvlMap<T, U>) -> &T
    where
        T: Ord,
    {
        let root = map.tree.root.expect("tree should not be empty");
        &map.tree.arena[root].entry.key
    }

    #[test]
    fn test_len_empty() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        assert_eq!(map.len(), 0);
        assert!(map.is_empty());
        assert!(map.is_balanced());
    }

    #[test]
    fn test_min_max_empty() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        assert_eq!(map.min(), None);
        assert_eq!(map.max(), None);
    }

    #[test]
    fn test_single_node_boundary() {
        let mut map = AvlMap::new();
        assert_eq!(map.insert(1, 1), None);
        assert_eq!(map.len(), 1);
        assert!(map.is_balanced());

        assert_eq!(map.remove(&1), Some((1, 1)));
        assert!(map.is_empty());
        assert_eq!(map.tree.root, None);
    }

    #[test]
    fn test_insert_replace() {
        let mut map = AvlMap::new();
        let ret_1 = map.insert(1, 1);
        let ret_2 = map.insert(1, 3);
        assert_eq!(map.get(&1), Some(&3));
        assert_eq!(ret_1, None);
        assert_eq!(ret_2, Some((1, 1)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_insert_replace_preserves_shape() {
        let mut map = AvlMap::new();
        map.insert(2, 2);
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(4, 4);

        let root_before = map.tree.root;
        assert_eq!(map.insert(3, 30), Some((3, 3)));

        assert_eq!(map.tree.root, root_before);
        assert_node(&map, 2, 1);
        assert_node(&map, 1, 0);
        assert_node(&map, 3, 1);
        assert_node(&map, 4, 0);
        assert_eq!(map.get(&3), Some(&30));
    }

    #[test]
    fn test_insert_zig_zig_rotation() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        map.insert(2, 2);
        map.insert(3, 3);

        assert_eq!(*root_key(&map), 2);
        assert_node(&map, 1, 0);
        assert_node(&map, 2, 0);
        assert_node(&map, 3, 0);
        assert!(map.is_balanced());
    }

    #[test]
    fn test_insert_zig_zag_rotation() {
        let mut map = AvlMap::new();
        map.insert(3, 3);
        map.insert(1, 1);
        map.insert(2, 2);

        assert_eq!(*root_key(&map), 2);
        assert_node(&map, 1, 0);
        assert_node(&map, 2, 0);
        assert_node(&map, 3, 0);
        assert!(map.is_balanced());
    }

    #[test]
    fn test_remove_root_swaps_with_predecessor() {
        let mut map = AvlMap::new();
        for key in [4, 2, 6, 1, 3, 5, 7].iter() {
            map.insert(*key, *key);
        }
        assert!(map.is_balanced());

        assert_eq!(map.remove(&4), Some((4, 4)));
        assert_eq!(*root_key(&map), 3);
        assert!(map.is_balanced());
        assert_eq!(
            map.iter().map(|pair| *pair.0).collect::<Vec<u32>>(),
            vec![1, 2, 3, 5, 6, 7],
        );
    }

    #[test]
    fn test_remove_absent() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        map.insert(2, 2);
        assert_eq!(map.remove(&3), None);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&1), Some(&1));
        assert_eq!(map.get(&2), Some(&2));
    }

    #[test]
    fn test_remove_single_rotation_preserving_height() {
        // removing 5 overloads the root while its left child is perfectly
        // balanced; the fix-up rotates once, leaves asymmetric factors, and
        // stops
        let mut map = AvlMap::new();
        for key in [4, 2, 5, 1, 3].iter() {
            map.insert(*key, *key);
        }

        assert_eq!(map.remove(&5), Some((5, 5)));
        assert_eq!(*root_key(&map), 2);
        assert_node(&map, 2, 1);
        assert_node(&map, 4, -1);
        assert_node(&map, 1, 0);
        assert_node(&map, 3, 0);
        assert!(map.is_balanced());
    }

    #[test]
    fn test_remove_propagates_to_root() {
        let mut map = AvlMap::new();
        for key in [4, 2, 6, 1, 3, 5, 7, 8].iter() {
            map.insert(*key, *key);
        }

        // removing from the shallow side forces a fix-up past the subtree
        map.remove(&1);
        map.remove(&3);
        map.remove(&2);
        assert!(map.is_balanced());
        assert_eq!(
            map.iter().map(|pair| *pair.0).collect::<Vec<u32>>(),
            vec![4, 5, 6, 7, 8],
        );
    }

    #[test]
    fn test_get_mut() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        {
            let value = map.get_mut(&1);
            *value.unwrap() = 3;
        }
        assert_eq!(map.get(&1), Some(&3));
    }

    #[test]
    fn test_index() {
        let mut map = AvlMap::new();
        map.insert(1, 2);
        assert_eq!(map[&1], 2);
    }

    #[test]
    #[should_panic]
    fn test_index_absent() {
        let map: AvlMap<u32, u32> = AvlMap::new();
        let _ = map[&1];
    }

    #[test]
    fn test_min_max() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.min(), Some(&1));
        assert_eq!(map.max(), Some(&5));
    }

    #[test]
    fn test_floor_ceil() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        assert_eq!(map.floor(&0), None);
        assert_eq!(map.floor(&2), Some(&1));
        assert_eq!(map.floor(&4), Some(&3));
        assert_eq!(map.floor(&6), Some(&5));

        assert_eq!(map.ceil(&0), Some(&1));
        assert_eq!(map.ceil(&2), Some(&3));
        assert_eq!(map.ceil(&4), Some(&5));
        assert_eq!(map.ceil(&6), None);
    }

    #[test]
    fn test_ascending_inserts_stay_balanced() {
        let mut map = AvlMap::new();
        for key in 0..256 {
            map.insert(key, key);
            assert!(map.is_balanced());
        }
        assert_eq!(map.len(), 256);
        assert_eq!(map.min(), Some(&0));
        assert_eq!(map.max(), Some(&255));
    }

    #[test]
    fn test_round_trip_to_empty() {
        let mut map = AvlMap::new();
        for key in 0..64 {
            map.insert(key, key);
        }
        for key in (0..64).rev() {
            assert_eq!(map.remove(&key), Some((key, key)));
            assert!(map.is_balanced());
        }
        assert!(map.is_empty());
        assert_eq!(map.tree.root, None);
    }

    #[test]
    fn test_find() {
        let mut map = AvlMap::new();
        map.insert(1, 1);
        map.insert(3, 3);
        map.insert(5, 5);

        let mut iterator = map.find(&3);
        assert_eq!(iterator.next(), Some((&3, &3)));
        assert_eq!(iterator.next(), Some((&5, &5)));
        assert_eq!(iterator.next(), None);

        assert_eq!(map.find(&2).next(), None);
    }

    #[test]
    fn test_into_iter() {
        let mut map = AvlMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.into_iter().collect::<Vec<(u32, u32)>>(),
            vec![(1, 2), (3, 4), (5, 6)],
        );
    }

    #[test]
    fn test_iter() {
        let mut map = AvlMap::new();
        map.insert(1, 2);
        map.insert(5, 6);
        map.insert(3, 4);

        assert_eq!(
            map.iter().collect::<Vec<(&u32, &u32)>>(),
            vec![(&1, &2), (&3, &4), (&5, &6)],
        );
    }

    #[test]
    fn test_serde() {
        let mut map = AvlMap::new();
        map.insert(1u32, 2u32);
        map.insert(3, 4);

        assert_tokens(
            &map,
            &[
                Token::Map { len: Some(2) },
                Token::U32(1),
                Token::U32(2),
                Token::U32(3),
                Token::U32(4),
                Token::MapEnd,
            ],
        );
    }
}
