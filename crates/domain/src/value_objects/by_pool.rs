use crate::enums::PoolId;
use crate::error::{RebalanceError, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::{Index, IndexMut};

/// One value per pool, stored in canonical [`PoolId`] order.
///
/// Parallel per-pool sequences (rates, weights, target units) are carried in
/// this type so positional correspondence cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByPool<T>([T; PoolId::COUNT]);

impl<T> ByPool<T> {
    pub fn from_fn(mut f: impl FnMut(PoolId) -> T) -> Self {
        Self(std::array::from_fn(|i| f(PoolId::ALL[i])))
    }

    pub fn try_from_fn<E>(
        mut f: impl FnMut(PoolId) -> std::result::Result<T, E>,
    ) -> std::result::Result<Self, E>
    where
        E: From<RebalanceError>,
    {
        let mut values = Vec::with_capacity(PoolId::COUNT);
        for pool in PoolId::ALL {
            values.push(f(pool)?);
        }
        Self::try_from_vec(values).map_err(E::from)
    }

    /// Wraps a sequence already laid out in canonical order.
    pub fn try_from_vec(values: Vec<T>) -> Result<Self> {
        let actual = values.len();
        values
            .try_into()
            .map(Self)
            .map_err(|_| RebalanceError::LengthMismatch {
                expected: PoolId::COUNT,
                actual,
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (PoolId, &T)> {
        PoolId::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> &[T] {
        &self.0
    }

    pub fn map<U>(&self, mut f: impl FnMut(PoolId, &T) -> U) -> ByPool<U> {
        ByPool::from_fn(|pool| f(pool, &self.0[pool.index()]))
    }

    pub fn into_vec(self) -> Vec<T> {
        self.0.into()
    }
}

impl<T> Index<PoolId> for ByPool<T> {
    type Output = T;

    fn index(&self, pool: PoolId) -> &T {
        &self.0[pool.index()]
    }
}

impl<T> IndexMut<PoolId> for ByPool<T> {
    fn index_mut(&mut self, pool: PoolId) -> &mut T {
        &mut self.0[pool.index()]
    }
}

// Serialized as an ordered map keyed by pool label.
impl<T: Serialize> Serialize for ByPool<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(PoolId::COUNT))?;
        for (pool, value) in self.iter() {
            map.serialize_entry(pool.label(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_vec_checks_length() {
        let ok = ByPool::try_from_vec(vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(ok[PoolId::Stader], 6);
        assert_eq!(ok[PoolId::StakeWise], 3);

        let err = ByPool::try_from_vec(vec![1, 2]).unwrap_err();
        assert_eq!(
            err,
            RebalanceError::LengthMismatch {
                expected: 6,
                actual: 2
            }
        );
    }

    #[test]
    fn test_iter_follows_canonical_order() {
        let labels = ByPool::from_fn(|pool| pool.label());
        let order: Vec<_> = labels.iter().map(|(pool, _)| pool).collect();
        assert_eq!(order, PoolId::ALL.to_vec());
    }

    #[test]
    fn test_try_from_fn_short_circuits() {
        let result: Result<ByPool<u8>> = ByPool::try_from_fn(|pool| {
            if pool == PoolId::Frax {
                Err(RebalanceError::StalePrice { pool })
            } else {
                Ok(0)
            }
        });
        assert_eq!(
            result.unwrap_err(),
            RebalanceError::StalePrice {
                pool: PoolId::Frax
            }
        );
    }

    #[test]
    fn test_serializes_as_labelled_map() {
        let values = ByPool::from_fn(|pool| pool.index());
        let json = serde_json::to_string(&values).unwrap();
        assert!(json.starts_with("{\"Lido\":0,\"Rocketpool\":1,\"StakeWise\":2"));
    }
}
