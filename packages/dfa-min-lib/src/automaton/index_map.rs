use petgraph::graph::{IndexType, NodeIndex};

/// Keys of a compact index space, e.g. node indices of a graph or positions
/// in a table.
pub trait IndexMapKey: Copy {
    fn new(index: usize) -> Self;
    fn index(self) -> usize;
}

impl<T: IndexType> IndexMapKey for NodeIndex<T> {
    fn new(index: usize) -> Self {
        NodeIndex::new(index)
    }

    fn index(self) -> usize {
        NodeIndex::index(self)
    }
}

impl IndexMapKey for usize {
    fn new(index: usize) -> Self {
        index
    }

    fn index(self) -> usize {
        self
    }
}

/// A map over a compact index space backed by a `Vec`. Every key below the
/// capacity passed to [`IndexMap::new`] can be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMap<K: IndexMapKey, V> {
    data: Vec<Option<V>>,
    _marker: std::marker::PhantomData<K>,
}

impl<K: IndexMapKey, V> IndexMap<K, V> {
    pub fn new(capacity: usize) -> Self {
        IndexMap {
            data: std::iter::repeat_with(|| None).take(capacity).collect(),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn contains_key(&self, key: K) -> bool {
        matches!(self.data.get(key.index()), Some(Some(_)))
    }

    pub fn get(&self, key: K) -> Option<&V> {
        self.data.get(key.index()).and_then(|v| v.as_ref())
    }

    /// Inserts a value, returning the previous one.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.data[key.index()].replace(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> {
        self.data
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.as_ref().map(|v| (K::new(i), v)))
    }
}

/// A set over a compact index space backed by a `Vec<bool>`. Iteration is in
/// ascending index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSet<K: IndexMapKey> {
    data: Vec<bool>,
    len: usize,
    _marker: std::marker::PhantomData<K>,
}

impl<K: IndexMapKey> IndexSet<K> {
    pub fn new(capacity: usize) -> Self {
        IndexSet {
            data: vec![false; capacity],
            len: 0,
            _marker: std::marker::PhantomData,
        }
    }

    pub fn contains(&self, key: K) -> bool {
        self.data.get(key.index()).copied().unwrap_or(false)
    }

    /// Inserts the key, returning `true` if it was not present before.
    pub fn insert(&mut self, key: K) -> bool {
        let slot = &mut self.data[key.index()];
        if *slot {
            return false;
        }
        *slot = true;
        self.len += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.data
            .iter()
            .enumerate()
            .filter(|(_, present)| **present)
            .map(|(i, _)| K::new(i))
    }

    pub fn to_vec(&self) -> Vec<K> {
        self.iter().collect()
    }
}
