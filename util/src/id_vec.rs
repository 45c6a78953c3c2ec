use std::marker::PhantomData;

/// Vec wrapper that uses typed indexes.
#[derive(Debug, Hash, PartialEq, Eq, Clone)]
pub struct IdVec<K, V> {
    vec: Vec<V>,
    _phantom: PhantomData<K>,
}

impl<K, V> Default for IdVec<K, V> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<K, V> IdVec<K, V> {
    fn new(vec: Vec<V>) -> Self {
        Self {
            vec,
            _phantom: PhantomData,
        }
    }

    /// Create a new `IdVec` with the given capacity.
    pub fn with_capacity(cap: usize) -> Self {
        Self::new(Vec::with_capacity(cap))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    /// Iterate through values in id order.
    pub fn iter(&self) -> std::slice::Iter<'_, V> {
        self.vec.iter()
    }

    /// View the values as a plain slice, in id order.
    pub fn as_slice(&self) -> &[V] {
        &self.vec
    }
}

impl<K, V> From<Vec<V>> for IdVec<K, V> {
    fn from(vec: Vec<V>) -> Self {
        Self::new(vec)
    }
}

impl<K: Into<usize>, V> IdVec<K, V> {
    /// Get the value with id `k`. Panics if `k` was not issued by this `IdVec`.
    #[inline]
    pub fn get(&self, k: K) -> &V {
        &self.vec[k.into()]
    }

    /// Get the value with id `k`, or `None` if it is out of range.
    #[inline]
    pub fn try_get(&self, k: K) -> Option<&V> {
        self.vec.get(k.into())
    }
}

impl<K: From<usize>, V> IdVec<K, V> {
    /// Push `v` into the underlying vec, and return an id that can be used to retrieve it later.
    #[inline]
    pub fn push(&mut self, v: V) -> K {
        let id = self.vec.len().into();
        self.vec.push(v);
        id
    }

    /// Iterate through `(id, value)` pairs in id order.
    pub fn enumerate(&self) -> impl Iterator<Item = (K, &V)> {
        self.vec.iter().enumerate().map(|(i, v)| (i.into(), v))
    }

    /// Iterate through all ids issued so far.
    pub fn ids(&self) -> impl Iterator<Item = K> {
        (0..self.vec.len()).map(K::from)
    }
}
