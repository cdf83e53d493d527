use std::marker::PhantomData;

use crate::component::{Component, SparseSet};
use crate::entity::Entity;
use crate::error::EcsError;
use crate::query::{QueryIter, StorageMap, WorldQuery};
use crate::resource::Resources;

/// The central ECS container. Owns all entities, components, and resources.
///
/// Entity ids are handed out monotonically and never reused; component
/// storages are created lazily per type; resources are per-world singletons
/// (two worlds never share state).
pub struct World {
    next_entity: u32,
    components: StorageMap,
    resources: Resources,
}

impl World {
    pub fn new() -> Self {
        Self {
            next_entity: 0,
            components: StorageMap::new(),
            resources: Resources::new(),
        }
    }

    // ---- Entity management ----

    /// Create a new entity with no components.
    ///
    /// Ids increase from 0 with no upper bound check; exhausting the id
    /// space is not handled.
    pub fn create(&mut self) -> Entity {
        let entity = Entity::new(self.next_entity);
        self.next_entity += 1;
        entity
    }

    /// Reset the entity counter to 0 and drop every component storage.
    ///
    /// Resources are unaffected.
    pub fn clear_entities(&mut self) {
        self.next_entity = 0;
        self.components.clear();
    }

    // ---- Component management ----

    fn storage_mut<T: Component>(&mut self) -> &mut SparseSet<T> {
        self.components
            .entry(std::any::TypeId::of::<T>())
            .or_insert_with(|| Box::new(SparseSet::<T>::new()))
            .as_any_mut()
            .downcast_mut::<SparseSet<T>>()
            .expect("component type mismatch")
    }

    /// Insert a component on an entity, replacing any existing component of
    /// the same type.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) {
        self.storage_mut::<T>().insert(entity, component);
    }

    /// The sparse-set storage for a component type.
    ///
    /// An empty storage is created on first request, so even a read-only
    /// query of a never-used type mutates the internal map; this method is
    /// not side-effect-free and takes `&mut self` accordingly.
    pub fn components<T: Component>(&mut self) -> &SparseSet<T> {
        self.storage_mut::<T>()
    }

    /// Mutable access to the sparse-set storage for a component type,
    /// creating it if absent.
    pub fn components_mut<T: Component>(&mut self) -> &mut SparseSet<T> {
        self.storage_mut::<T>()
    }

    // ---- Views ----

    /// Iterate entities that carry every component in the pattern.
    ///
    /// Iteration walks the storage of the FIRST listed type and filters on
    /// membership in the rest, so cost is proportional to the first type's
    /// population; list the narrowest component first when it matters.
    /// Storages for all listed types are created if absent. Components
    /// requested as `&mut T` may be mutated through the yielded item;
    /// structural mutation (insert/erase) is prevented for the duration of
    /// the borrow.
    ///
    /// # Example
    /// ```ignore
    /// for (entity, (pos, vel)) in world.view::<(&mut Position, &Velocity)>() {
    ///     pos.0 += vel.0;
    /// }
    /// ```
    pub fn view<Q: WorldQuery>(&mut self) -> QueryIter<'_, Q> {
        Q::register(&mut self.components);

        let candidates = match Q::type_ids().first() {
            Some(anchor) => self
                .components
                .get(anchor)
                .map(|storage| storage.entities().to_vec())
                .unwrap_or_default(),
            None => Vec::new(),
        };

        QueryIter {
            storages: &self.components,
            candidates,
            position: 0,
            _marker: PhantomData,
        }
    }

    // ---- Resources ----

    /// Insert a singleton resource, replacing any previous value of the
    /// same type. Exactly one value per type is ever live.
    pub fn insert_resource<T: Send + Sync + 'static>(&mut self, value: T) {
        self.resources.insert(value);
    }

    /// An immutable reference to the resource of type `T`.
    ///
    /// Looking up a type that was never added is a caller error and reports
    /// [`EcsError::ResourceNotFound`].
    pub fn resource<T: Send + Sync + 'static>(&self) -> Result<&T, EcsError> {
        self.resources
            .get::<T>()
            .ok_or(EcsError::ResourceNotFound(std::any::type_name::<T>()))
    }

    /// A mutable reference to the resource of type `T`.
    pub fn resource_mut<T: Send + Sync + 'static>(&mut self) -> Result<&mut T, EcsError> {
        self.resources
            .get_mut::<T>()
            .ok_or(EcsError::ResourceNotFound(std::any::type_name::<T>()))
    }

    /// Whether a resource of type `T` has been added.
    pub fn contains_resource<T: Send + Sync + 'static>(&self) -> bool {
        self.resources.contains::<T>()
    }

    /// Remove a resource, returning it if it existed.
    pub fn remove_resource<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.resources.remove::<T>()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct WindowSize {
        width: u32,
        height: u32,
    }

    #[test]
    fn create_hands_out_increasing_ids() {
        let mut world = World::new();
        let e0 = world.create();
        let e1 = world.create();
        assert_eq!(e0.index(), 0);
        assert_eq!(e1.index(), e0.index() + 1);
    }

    #[test]
    fn insert_component_is_present() {
        let mut world = World::new();
        let entity = world.create();
        world.insert(entity, Position { x: 1.0, y: 2.0 });

        let positions = world.components::<Position>();
        assert!(positions.contains(entity));
        assert_eq!(positions[entity], Position { x: 1.0, y: 2.0 });
    }

    #[test]
    fn querying_unused_type_creates_empty_storage() {
        let mut world = World::new();
        let positions = world.components::<Position>();
        assert!(positions.is_empty());
    }

    #[test]
    fn component_types_use_separate_storages() {
        let mut world = World::new();
        let entity = world.create();
        world.insert(entity, Position { x: 1.0, y: 2.0 });
        world.insert(entity, Velocity { dx: 0.5, dy: -0.5 });

        assert!(world.components::<Position>().contains(entity));
        assert!(world.components::<Velocity>().contains(entity));
        world.components_mut::<Velocity>().erase(entity);
        assert!(world.components::<Position>().contains(entity));
        assert!(!world.components::<Velocity>().contains(entity));
    }

    #[test]
    fn clear_entities_resets_counter_and_drops_storages() {
        let mut world = World::new();
        let entity = world.create();
        world.insert(entity, Position { x: 1.0, y: 1.0 });
        world.insert_resource(7u32);

        world.clear_entities();

        assert_eq!(world.create().index(), 0);
        assert!(world.components::<Position>().is_empty());
        // Resources persist across an entity clear.
        assert_eq!(world.resource::<u32>(), Ok(&7));
    }

    #[test]
    fn resource_round_trip() {
        let mut world = World::new();
        world.insert_resource(WindowSize {
            width: 800,
            height: 600,
        });
        assert_eq!(
            world.resource::<WindowSize>(),
            Ok(&WindowSize {
                width: 800,
                height: 600
            })
        );
        world.resource_mut::<WindowSize>().unwrap().width = 1024;
        assert_eq!(world.resource::<WindowSize>().unwrap().width, 1024);
    }

    #[test]
    fn missing_resource_is_an_error() {
        let world = World::new();
        assert_eq!(
            world.resource::<WindowSize>(),
            Err(EcsError::ResourceNotFound(std::any::type_name::<
                WindowSize,
            >()))
        );
    }

    #[test]
    fn resource_overwrite_keeps_last_value() {
        let mut world = World::new();
        world.insert_resource(WindowSize {
            width: 100,
            height: 100,
        });
        world.insert_resource(WindowSize {
            width: 200,
            height: 200,
        });
        assert_eq!(world.resource::<WindowSize>().unwrap().width, 200);
        assert!(world.remove_resource::<WindowSize>().is_some());
        // Exactly one value was live.
        assert!(!world.contains_resource::<WindowSize>());
    }

    #[test]
    fn worlds_do_not_share_resources() {
        let mut world1 = World::new();
        let world2 = World::new();
        world1.insert_resource(1u32);
        assert!(world1.contains_resource::<u32>());
        assert!(!world2.contains_resource::<u32>());
    }

    #[test]
    fn view_visits_entities_with_all_components() {
        let mut world = World::new();
        let e0 = world.create();
        let e1 = world.create();
        let e2 = world.create();
        world.insert(e0, Position { x: 1.0, y: 0.0 });
        world.insert(e0, Velocity { dx: 1.0, dy: 0.0 });
        world.insert(e1, Position { x: 2.0, y: 0.0 });
        world.insert(e2, Velocity { dx: 3.0, dy: 0.0 });

        let matched: Vec<_> = world
            .view::<(&Position, &Velocity)>()
            .map(|(entity, _)| entity)
            .collect();
        assert_eq!(matched, vec![e0]);
    }

    #[test]
    fn view_visits_each_entity_exactly_once() {
        let mut world = World::new();
        let e0 = world.create();
        let e1 = world.create();
        world.insert(e0, Position { x: 1.0, y: 2.0 });
        world.insert(e1, Position { x: 3.0, y: 4.0 });

        let mut visited: Vec<_> = world
            .view::<&Position>()
            .map(|(entity, pos)| (entity.index(), *pos))
            .collect();
        visited.sort_by_key(|(index, _)| *index);
        assert_eq!(
            visited,
            vec![
                (0, Position { x: 1.0, y: 2.0 }),
                (1, Position { x: 3.0, y: 4.0 }),
            ]
        );

        world.components_mut::<Position>().erase(e0);
        let remaining: Vec<_> = world.view::<&Position>().map(|(entity, _)| entity).collect();
        assert_eq!(remaining, vec![e1]);
    }

    #[test]
    fn view_mutates_components_in_place() {
        let mut world = World::new();
        for i in 0..3 {
            let entity = world.create();
            world.insert(
                entity,
                Position {
                    x: i as f32,
                    y: 0.0,
                },
            );
            world.insert(entity, Velocity { dx: 1.0, dy: 2.0 });
        }

        for (_, (pos, vel)) in world.view::<(&mut Position, &Velocity)>() {
            pos.x += vel.dx;
            pos.y += vel.dy;
        }

        for (entity, pos) in world.view::<&Position>() {
            assert_eq!(pos.x, entity.index() as f32 + 1.0);
            assert_eq!(pos.y, 2.0);
        }
    }

    #[test]
    fn view_registers_missing_storages() {
        let mut world = World::new();
        let entity = world.create();
        world.insert(entity, Position { x: 0.0, y: 0.0 });

        // Velocity storage does not exist yet; the view creates it empty and
        // therefore matches nothing.
        assert_eq!(world.view::<(&Position, &Velocity)>().count(), 0);
        assert!(world.components::<Velocity>().is_empty());
    }
}
