use std::ops::Deref;

use arrayvec::ArrayVec;

/// Insertion ordered set with a fixed inline capacity.
///
/// Used for queue family indices where the maximum number of elements is known at compile time
/// (one per queue role). Going over capacity is a bug at the call site and panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundedSet<T, const N: usize> {
  items: ArrayVec<T, N>,
}

impl<T: PartialEq, const N: usize> BoundedSet<T, N> {
  pub const fn new() -> Self {
    Self {
      items: ArrayVec::new_const(),
    }
  }

  /// Appends `value` if it is not already present.
  ///
  /// Returns `false` if the value was already in the set.
  /// Panics if a new value doesn't fit.
  pub fn insert(&mut self, value: T) -> bool {
    if self.items.contains(&value) {
      return false;
    }
    if self.items.is_full() {
      panic!("BoundedSet capacity ({}) exceeded", N);
    }
    self.items.push(value);
    true
  }

  pub fn as_slice(&self) -> &[T] {
    self.items.as_slice()
  }

  pub const fn capacity(&self) -> usize {
    N
  }
}

impl<T: PartialEq, const N: usize> Default for BoundedSet<T, N> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T, const N: usize> Deref for BoundedSet<T, N> {
  type Target = [T];

  fn deref(&self) -> &Self::Target {
    &self.items
  }
}

impl<T: PartialEq, const N: usize> FromIterator<T> for BoundedSet<T, N> {
  fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
    let mut set = Self::new();
    for value in iter {
      set.insert(value);
    }
    set
  }
}
