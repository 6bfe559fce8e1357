use std::hash::Hash;
use std::ops::Index;

use hashbrown::HashMap;

/// Integer types a [`Pool`] can hand out as ids.
pub trait PoolId: Copy + Eq + Hash {
    fn from_index(index: usize) -> Self;
    fn index(self) -> usize;
}

macro_rules! pool_id {
    ($($t:ty),*) => {
        $(
            impl PoolId for $t {
                fn from_index(index: usize) -> Self {
                    <$t>::try_from(index).expect("pool id space exhausted")
                }

                fn index(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

pool_id!(u8, u16, u32, usize);

/// Interning table: every distinct value gets a dense id, handed out in
/// insertion order starting at zero.
#[derive(Debug, Clone)]
pub struct Pool<T, I> {
    items: Vec<T>,
    ids: HashMap<T, I>,
}

impl<T, I> Pool<T, I>
where
    T: Clone + Eq + Hash,
    I: PoolId,
{
    pub fn new() -> Self {
        Pool {
            items: Vec::new(),
            ids: HashMap::new(),
        }
    }

    pub fn get(&self, id: I) -> Option<&T> {
        self.items.get(id.index())
    }

    pub fn lookup(&self, item: &T) -> Option<I> {
        self.ids.get(item).copied()
    }

    /// Id of `item`, interning a clone of it if it is new.
    pub fn add_ref(&mut self, item: &T) -> I {
        if let Some(&id) = self.ids.get(item) {
            return id;
        }

        let id = I::from_index(self.items.len());
        self.items.push(item.clone());
        self.ids.insert(item.clone(), id);
        id
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.ids.clear();
    }
}

impl<T, I> Default for Pool<T, I>
where
    T: Clone + Eq + Hash,
    I: PoolId,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, I: PoolId> Index<I> for Pool<T, I> {
    type Output = T;

    fn index(&self, id: I) -> &T {
        &self.items[id.index()]
    }
}
