#![allow(private_interfaces)]

use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;

use crate::component::{Component, ComponentStorage, SparseSet};
use crate::entity::Entity;

pub(crate) type StorageMap = HashMap<TypeId, Box<dyn ComponentStorage>>;

/// Trait implemented for view parameter types (`&T`, `&mut T`, and tuples
/// of those).
///
/// # Safety
///
/// Implementors must report exactly the component types they access, and a
/// component type must not appear more than once in a tuple that borrows it
/// mutably; `fetch` hands out references into the storage map under that
/// assumption.
pub unsafe trait WorldQuery {
    type Item<'w>;

    /// The TypeIds of the components this query accesses, in listed order.
    /// The first entry anchors iteration.
    fn type_ids() -> Vec<TypeId>;

    /// Create empty storages for every listed component type that has none
    /// yet.
    fn register(storages: &mut StorageMap);

    /// Fetch the item for a given entity from the storages map, or `None`
    /// if the entity lacks any listed component.
    ///
    /// # Safety
    ///
    /// The caller must visit each entity at most once per iteration and
    /// uphold the `&` vs `&mut` aliasing rules across the listed types.
    unsafe fn fetch<'w>(storages: &'w StorageMap, entity: Entity) -> Option<Self::Item<'w>>;
}

unsafe impl<T: Component> WorldQuery for &T {
    type Item<'w> = &'w T;

    fn type_ids() -> Vec<TypeId> {
        vec![TypeId::of::<T>()]
    }

    fn register(storages: &mut StorageMap) {
        storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()));
    }

    unsafe fn fetch<'w>(storages: &'w StorageMap, entity: Entity) -> Option<Self::Item<'w>> {
        let storage = storages.get(&TypeId::of::<T>())?;
        let sparse = storage.as_any().downcast_ref::<SparseSet<T>>()?;
        sparse.get(entity)
    }
}

unsafe impl<T: Component> WorldQuery for &mut T {
    type Item<'w> = &'w mut T;

    fn type_ids() -> Vec<TypeId> {
        vec![TypeId::of::<T>()]
    }

    fn register(storages: &mut StorageMap) {
        storages
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()));
    }

    unsafe fn fetch<'w>(storages: &'w StorageMap, entity: Entity) -> Option<Self::Item<'w>> {
        let storage = storages.get(&TypeId::of::<T>())?;
        // We need a mutable reference. The caller guarantees aliasing safety.
        let storage_ptr = storage.as_ref() as *const dyn ComponentStorage as *mut dyn ComponentStorage;
        let sparse = (*storage_ptr).as_any_mut().downcast_mut::<SparseSet<T>>()?;
        sparse.get_mut(entity)
    }
}

macro_rules! impl_world_query_tuple {
    ($($name:ident),+) => {
        #[allow(non_snake_case)]
        unsafe impl<$($name: WorldQuery),+> WorldQuery for ($($name,)+) {
            type Item<'w> = ($($name::Item<'w>,)+);

            fn type_ids() -> Vec<TypeId> {
                let mut ids = Vec::new();
                $(ids.extend($name::type_ids());)+
                ids
            }

            fn register(storages: &mut StorageMap) {
                $($name::register(storages);)+
            }

            unsafe fn fetch<'w>(
                storages: &'w StorageMap,
                entity: Entity,
            ) -> Option<Self::Item<'w>> {
                Some(($($name::fetch(storages, entity)?,)+))
            }
        }
    };
}

impl_world_query_tuple!(A);
impl_world_query_tuple!(A, B);
impl_world_query_tuple!(A, B, C);
impl_world_query_tuple!(A, B, C, D);
impl_world_query_tuple!(A, B, C, D, E);
impl_world_query_tuple!(A, B, C, D, E, F);
impl_world_query_tuple!(A, B, C, D, E, F, G);
impl_world_query_tuple!(A, B, C, D, E, F, G, H);

/// Iterator returned by [`World::view`](crate::World::view). Yields
/// `(Entity, Q::Item)` for each entity of the first listed type's storage
/// that also carries every other listed component.
///
/// Candidates are snapshotted from the anchor storage when the view is
/// created; the borrow on the world prevents structural mutation while the
/// iterator is live.
pub struct QueryIter<'w, Q: WorldQuery> {
    pub(crate) storages: &'w StorageMap,
    pub(crate) candidates: Vec<Entity>,
    pub(crate) position: usize,
    pub(crate) _marker: PhantomData<Q>,
}

impl<'w, Q: WorldQuery> Iterator for QueryIter<'w, Q> {
    type Item = (Entity, Q::Item<'w>);

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.candidates.len() {
            let entity = self.candidates[self.position];
            self.position += 1;

            // Safety: each candidate is visited at most once, so the
            // references handed out for distinct entities never alias.
            if let Some(item) = unsafe { Q::fetch(self.storages, entity) } {
                return Some((entity, item));
            }
        }
        None
    }
}
