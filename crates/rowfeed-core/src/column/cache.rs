//! Process-wide cache of automatic column mappings.
//!
//! Each record type owns one `OnceLock` slot, keyed by `TypeId` and never
//! invalidated or replaced. The map lock is held only to fetch or insert a
//! slot, so `Record::describe` may itself request other types' automatic
//! mappings. Concurrent first callers for the same type block on the slot
//! and then observe the completed mapping.

use crate::{column::Columns, traits::Record};
use std::{
    any::{Any, TypeId, type_name},
    collections::BTreeMap,
    sync::{Arc, Mutex, OnceLock, PoisonError},
};

type MappingCache = BTreeMap<TypeId, Arc<dyn Any + Send + Sync>>;
type Slot<T> = OnceLock<Columns<T>>;

static CACHE: OnceLock<Mutex<MappingCache>> = OnceLock::new();

pub(super) fn automatic<T: Record>() -> Columns<T> {
    slot::<T>()
        .get_or_init(|| {
            let columns = Columns::from_vec(T::describe());
            tracing::debug!(
                record = type_name::<T>(),
                columns = columns.len(),
                "built automatic column mapping"
            );

            columns
        })
        .clone()
}

fn slot<T: Record>() -> Arc<Slot<T>> {
    let cache = CACHE.get_or_init(|| Mutex::new(BTreeMap::new()));

    // Slots are only ever inserted whole, so a poisoned lock still guards a
    // consistent map.
    let mut guard = cache.lock().unwrap_or_else(PoisonError::into_inner);

    let entry = guard
        .entry(TypeId::of::<T>())
        .or_insert_with(|| Arc::new(Slot::<T>::new()) as Arc<dyn Any + Send + Sync>);

    match Arc::clone(entry).downcast::<Slot<T>>() {
        Ok(slot) => slot,
        Err(_) => unreachable!("mapping cache entry keyed by the wrong TypeId"),
    }
}

#[cfg(test)]
pub(super) fn is_cached<T: Record>() -> bool {
    CACHE.get().is_some_and(|cache| {
        cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.downcast_ref::<Slot<T>>())
            .is_some_and(|slot| slot.get().is_some())
    })
}
