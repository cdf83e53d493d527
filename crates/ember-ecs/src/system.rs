use crate::error::EcsError;
use crate::world::World;

/// A unit of app behavior, invoked with exclusive access to the world.
///
/// Systems report failure through their return value; the enclosing
/// schedule stops at the first error.
pub trait System: Send + Sync {
    fn run(&mut self, world: &mut World) -> Result<(), EcsError>;
}

/// Blanket implementation so plain functions and closures can be used as
/// systems.
impl<F> System for F
where
    F: FnMut(&mut World) -> Result<(), EcsError> + Send + Sync,
{
    fn run(&mut self, world: &mut World) -> Result<(), EcsError> {
        (self)(world)
    }
}

/// An ordered list of systems for one lifecycle phase.
pub struct Schedule {
    systems: Vec<Box<dyn System>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Append a system; returns `&mut Self` for chained registration.
    pub fn add_system<S: System + 'static>(&mut self, system: S) -> &mut Self {
        self.systems.push(Box::new(system));
        self
    }

    /// Run every system in registration order, synchronously.
    ///
    /// A failing system aborts the remaining systems of this run; the world
    /// is left exactly as the failing system left it.
    pub fn run(&mut self, world: &mut World) -> Result<(), EcsError> {
        for system in &mut self.systems {
            system.run(world)?;
        }
        Ok(())
    }

    /// Number of registered systems.
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Marker {
        has_run: bool,
    }

    fn spawn_one(world: &mut World) -> Result<(), EcsError> {
        let entity = world.create();
        world.insert(entity, Marker { has_run: true });
        Ok(())
    }

    fn spawn_two(world: &mut World) -> Result<(), EcsError> {
        for _ in 0..2 {
            let entity = world.create();
            world.insert(entity, Marker { has_run: true });
        }
        Ok(())
    }

    #[test]
    fn systems_run_sequentially() {
        let mut schedule = Schedule::new();
        schedule.add_system(spawn_one).add_system(spawn_two);
        assert_eq!(schedule.len(), 2);

        let mut world = World::new();
        schedule.run(&mut world).unwrap();
        assert_eq!(world.components::<Marker>().len(), 3);
    }

    #[test]
    fn registration_order_is_execution_order() {
        let mut world = World::new();
        world.insert_resource(Vec::<u32>::new());

        let mut schedule = Schedule::new();
        for i in 1..=3u32 {
            schedule.add_system(move |world: &mut World| {
                world.resource_mut::<Vec<u32>>()?.push(i);
                Ok(())
            });
        }

        schedule.run(&mut world).unwrap();
        assert_eq!(world.resource::<Vec<u32>>(), Ok(&vec![1, 2, 3]));
    }

    #[test]
    fn later_systems_observe_earlier_writes() {
        let mut world = World::new();
        world.insert_resource(Option::<f32>::None);

        let mut schedule = Schedule::new();
        schedule
            .add_system(|world: &mut World| {
                let entity = world.create();
                world.insert(entity, 42.0f32);
                Ok(())
            })
            .add_system(|world: &mut World| {
                let observed = world.components::<f32>().get(Entity::from_raw(0)).copied();
                *world.resource_mut::<Option<f32>>()? = observed;
                Ok(())
            });

        schedule.run(&mut world).unwrap();
        assert_eq!(world.resource::<Option<f32>>(), Ok(&Some(42.0)));
    }

    #[test]
    fn failure_aborts_remaining_systems_without_rollback() {
        let mut world = World::new();
        world.insert_resource(0u32);

        let mut schedule = Schedule::new();
        schedule
            .add_system(|world: &mut World| {
                *world.resource_mut::<u32>()? += 1;
                Ok(())
            })
            .add_system(|world: &mut World| {
                // Fails after mutating: the write must stick.
                *world.resource_mut::<u32>()? += 10;
                world.resource::<String>().map(|_| ())
            })
            .add_system(|world: &mut World| {
                *world.resource_mut::<u32>()? += 100;
                Ok(())
            });

        let err = schedule.run(&mut world).unwrap_err();
        assert!(matches!(err, EcsError::ResourceNotFound(_)));
        assert_eq!(world.resource::<u32>(), Ok(&11));
    }
}
