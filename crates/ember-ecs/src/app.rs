use tracing::debug;

use crate::error::EcsError;
use crate::system::{Schedule, System};
use crate::world::World;

/// Lifecycle phases of an [`App`]. A closed set: startup runs once, update
/// repeats until the platform reports stop, shutdown runs once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Startup,
    Update,
    Shutdown,
}

const PHASE_COUNT: usize = 3;

/// The seam to the platform collaborator (window, input, pacing).
///
/// The app core makes no assumption about what the platform is; it only
/// requires a resource that can advance its internal state once per update
/// iteration and report whether the loop should stop. The surrounding
/// application registers a concrete implementation as an ordinary world
/// resource.
pub trait Platform: Send + Sync + 'static {
    /// Advance platform state once (e.g. pump an event queue).
    fn poll(&mut self);

    /// Whether the update loop should stop.
    fn should_quit(&self) -> bool;
}

/// Owns a [`World`] and one [`Schedule`] per lifecycle phase, and drives
/// them through the startup / update / shutdown state machine.
pub struct App {
    world: World,
    schedules: [Schedule; PHASE_COUNT],
}

impl App {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            schedules: [Schedule::new(), Schedule::new(), Schedule::new()],
        }
    }

    /// The world this app drives.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Register a system for a phase; returns `&mut Self` for chaining.
    pub fn add_system<S: System + 'static>(&mut self, phase: Phase, system: S) -> &mut Self {
        self.schedules[phase as usize].add_system(system);
        self
    }

    /// Insert a resource into the world; returns `&mut Self` for chaining.
    pub fn insert_resource<R: Send + Sync + 'static>(&mut self, value: R) -> &mut Self {
        self.world.insert_resource(value);
        self
    }

    /// Drive the app to completion against the platform resource `P`.
    ///
    /// Runs the startup schedule once, then alternates polling the platform
    /// and running the update schedule until the platform reports stop, then
    /// runs the shutdown schedule once. The platform must have been
    /// registered as a resource before calling this; a missing platform is
    /// [`EcsError::ResourceNotFound`]. A failing system propagates out
    /// immediately, leaving the remaining schedules unexecuted.
    pub fn run<P: Platform>(&mut self) -> Result<(), EcsError> {
        debug!("startup phase");
        self.schedules[Phase::Startup as usize].run(&mut self.world)?;

        let mut iterations = 0u64;
        loop {
            let platform = self.world.resource_mut::<P>()?;
            platform.poll();
            if platform.should_quit() {
                break;
            }
            self.schedules[Phase::Update as usize].run(&mut self.world)?;
            iterations += 1;
        }
        debug!(iterations, "update phase finished");

        debug!("shutdown phase");
        self.schedules[Phase::Shutdown as usize].run(&mut self.world)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
