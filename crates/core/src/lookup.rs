//! Read outcome distinguishing a miss from a cached null

/// Result of a cache read.
///
/// `Miss` means nothing was found (or a read failure was swallowed by the
/// error policy). `Hit(None)` means the store holds an explicit null for the
/// key, and `Hit(Some(v))` carries the cached value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Lookup<V> {
    #[default]
    Miss,
    Hit(Option<V>),
}

impl<V> Lookup<V> {
    /// A hit carrying a value
    pub fn hit(value: V) -> Self {
        Lookup::Hit(Some(value))
    }

    /// A hit on a cached null
    pub fn null() -> Self {
        Lookup::Hit(None)
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, Lookup::Hit(_))
    }

    pub fn is_miss(&self) -> bool {
        matches!(self, Lookup::Miss)
    }

    /// Borrow the cached value, if the lookup hit a non-null entry
    pub fn value(&self) -> Option<&V> {
        match self {
            Lookup::Hit(Some(value)) => Some(value),
            _ => None,
        }
    }

    /// Take the cached value, flattening misses and cached nulls to `None`
    pub fn into_value(self) -> Option<V> {
        match self {
            Lookup::Hit(value) => value,
            Lookup::Miss => None,
        }
    }

    pub fn as_ref(&self) -> Lookup<&V> {
        match self {
            Lookup::Miss => Lookup::Miss,
            Lookup::Hit(value) => Lookup::Hit(value.as_ref()),
        }
    }

    pub fn map<U, F>(self, f: F) -> Lookup<U>
    where
        F: FnOnce(V) -> U,
    {
        match self {
            Lookup::Miss => Lookup::Miss,
            Lookup::Hit(value) => Lookup::Hit(value.map(f)),
        }
    }
}

impl<V> From<Option<Option<V>>> for Lookup<V> {
    fn from(wrapper: Option<Option<V>>) -> Self {
        match wrapper {
            Some(value) => Lookup::Hit(value),
            None => Lookup::Miss,
        }
    }
}

impl<V> From<Lookup<V>> for Option<Option<V>> {
    fn from(lookup: Lookup<V>) -> Self {
        match lookup {
            Lookup::Hit(value) => Some(value),
            Lookup::Miss => None,
        }
    }
}
