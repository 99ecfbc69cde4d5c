use crate::arena::Handle;
use crate::bst::tree::{Insertion, Tree};
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;
use std::fmt::Debug;
use std::marker::PhantomData;
use std::ops::Index;

/// An ordered map implemented by an unbalanced binary search tree.
///
/// The tree makes no attempt to stay balanced: operations are proportional to
/// the height of the tree, which degenerates to the number of entries under
/// ordered insertion. Keys must be unique; inserting an existing key
/// overwrites its value in place. Use [`AvlMap`](crate::avl_tree::AvlMap) for
/// guaranteed logarithmic height.
///
/// # Examples
/// ```
/// use ordered_collections::bst::BstMap;
///
/// let mut map = BstMap::new();
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
/// assert_eq!(map.remove(&0), None);
/// ```
pub struct BstMap<T, U> {
    tree: Tree<T, U>,
}

impl<T, U> BstMap<T, U>
where
    T: Ord,
{
    /// Constructs a new, empty `BstMap<T, U>`.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::bst::BstMap;
    ///
    /// let map: BstMap<u32, u32> = BstMap::new();
    /// ```
    pub fn new() -> Self {
        BstMap { tree: Tree::new() }
    }

    /// Inserts a key-value pair into the map. If the key already exists in
    /// the map, it will return and replace the old key-value pair without
    /// changing the shape of the tree.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
    /// assert_eq!(map.insert(1, 1), None);
    /// assert_eq!(map.get(&1), Some(&1));
    /// assert_eq!(map.insert(1, 2), Some((1, 1)));
    /// assert_eq!(map.get(&1), Some(&2));
    /// ```
    pub fn insert(&mut self, key: T, value: U) -> Option<(T, U)> {
        match self.tree.insert_leaf(key, value) {
            Insertion::Added(_) => None,
            Insertion::Replaced(entry) => Some((entry.key, entry.value)),
        }
    }

    /// Removes a key-value pair from the map. If the key exists in the map,
    /// it will return the associated key-value pair. Otherwise it will return
    /// `None` and leave the map untouched.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
    /// map.insert(1, 1);
    /// assert_eq!(map.remove(&1), Some((1, 1)));
    /// assert_eq!(map.remove(&1), None);
    /// ```
    pub fn remove(&mut self, key: &T) -> Option<(T, U)> {
        let curr = self.tree.find_node(key)?;
        if self.tree.arena[curr].left.is_some() && self.tree.arena[curr].right.is_some() {
            let pred = match self.tree.predecessor(curr) {
                Some(pred) => pred,
                None => unreachable!(),
            };
            self.tree.swap_positions(curr, pred);
        }
        let (entry, _, _) = self.tree.splice_out(curr);
        Some((entry.key, entry.value))
    }

    /// Checks if a key exists in the map.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
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
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
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
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
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
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
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
    /// use ordered_collections::bst::BstMap;
    ///
    /// let map: BstMap<u32, u32> = BstMap::new();
    /// assert!(map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.tree.len() == 0
    }

    /// Clears the map, removing all entries.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
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
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
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
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
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
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
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
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert_eq!(map.max(), Some(&3));
    /// ```
    pub fn max(&self) -> Option<&T> {
        self.tree
            .max_node()
            .map(move |curr| &self.tree.arena[curr].entry.key)
    }

    /// Independently verifies that every node of the tree satisfies the
    /// height-balance invariant of an AVL tree, recomputing subtree heights
    /// from scratch. An unbalanced map offers no such guarantee; this is an
    /// oracle, not an operation the map maintains.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
    /// map.insert(1, 1);
    /// map.insert(2, 2);
    /// map.insert(3, 3);
    /// assert!(!map.is_balanced());
    /// ```
    pub fn is_balanced(&self) -> bool {
        self.tree.is_balanced()
    }

    /// Checks that every root-to-leaf path of the tree has the same length.
    /// Trivially true for the empty map.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
    /// map.insert(2, 2);
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    /// assert!(map.equal_paths());
    ///
    /// map.insert(4, 4);
    /// assert!(!map.equal_paths());
    /// ```
    pub fn equal_paths(&self) -> bool {
        self.tree.equal_paths()
    }

    /// Returns an iterator positioned at the entry with the given key, or an
    /// exhausted iterator if the key does not exist in the map. Advancing the
    /// iterator yields the remaining entries in ascending key order.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
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
    pub fn find(&self, key: &T) -> BstMapIter<'_, T, U> {
        BstMapIter {
            tree: &self.tree,
            next: self.tree.find_node(key),
        }
    }

    /// Returns an iterator over the map. The iterator will yield key-value
    /// pairs using in-order traversal.
    ///
    /// # Examples
    /// ```
    /// use ordered_collections::bst::BstMap;
    ///
    /// let mut map = BstMap::new();
    /// map.insert(1, 1);
    /// map.insert(3, 3);
    ///
    /// let mut iterator = map.iter();
    /// assert_eq!(iterator.next(), Some((&1, &1)));
    /// assert_eq!(iterator.next(), Some((&3, &3)));
    /// assert_eq!(iterator.next(), None);
    /// ```
    pub fn iter(&self) -> BstMapIter<'_, T, U> {
        BstMapIter {
            tree: &self.tree,
            next: self.tree.min_node(),
        }
    }
}

impl<'a, T, U> Index<&'a T> for BstMap<T, U>
where
    T: Ord,
{
    type Output = U;

    fn index(&self, key: &T) -> &Self::Output {
        self.get(key).expect("Error: key not found.")
    }
}

impl<T, U> IntoIterator for BstMap<T, U>
where
    T: Ord,
{
    type IntoIter = BstMapIntoIter<T, U>;
    type Item = (T, U);

    fn into_iter(self) -> Self::IntoIter {
        BstMapIntoIter { tree: self.tree }
    }
}

impl<'a, T, U> IntoIterator for &'a BstMap<T, U>
where
    T: 'a + Ord,
    U: 'a,
{
    type IntoIter = BstMapIter<'a, T, U>;
    type Item = (&'a T, &'a U);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An owning iterator for `BstMap<T, U>`.
///
/// This iterator traverses the elements of the map in-order and yields owned
/// entries.
pub struct BstMapIntoIter<T, U> {
    tree: Tree<T, U>,
}

impl<T, U> Iterator for BstMapIntoIter<T, U> {
    type Item = (T, U);

    fn next(&mut self) -> Option<Self::Item> {
        // the minimum never has a left child, so no swap is needed
        let min = self.tree.min_node()?;
        let (entry, _, _) = self.tree.splice_out(min);
        Some((entry.key, entry.value))
    }
}

/// An iterator for `BstMap<T, U>`.
///
/// This iterator walks the tree in-order through parent links and yields
/// immutable references.
pub struct BstMapIter<'a, T, U> {
    tree: &'a Tree<T, U>,
    next: Option<Handle>,
}

impl<'a, T, U> Iterator for BstMapIter<'a, T, U> {
    type Item = (&'a T, &'a U);

    fn next(&mut self) -> Option<Self::Item> {
        let curr = self.next?;
        self.next = self.tree.successor(curr);
        let entry = &self.tree.arena[curr].entry;
        Some((&entry.key, &entry.value))
    }
}

impl<T, U> Default for BstMap<T, U>
where
    T: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, U> Debug for BstMap<T, U>
where
    T: Ord + Debug,
    U: Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<T, U> PartialEq for BstMap<T, U>
where
    T: Ord,
    U: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T, U> Eq for BstMap<T, U>
where
    T: Ord,
    U: Eq,
{
}

impl<T, U> Serialize for BstMap<T, U>
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

struct BstMapVisitor<T, U> {
    marker: PhantomData<fn() -> BstMap<T, U>>,
}

impl<'de, T, U> Visitor<'de> for BstMapVisitor<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    type Value = BstMap<T, U>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut map = BstMap::new();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

impl<'de, T, U> Deserialize<'de> for BstMap<T, U>
where
    T: Deserialize<'de> + Ord,
    U: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(BstMapVisitor {
            marker: PhantomData,
        })
    }
}
