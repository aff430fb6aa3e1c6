//! Async terrain generation system.
//!
//! Offloads a whole generation pass (synthesis → smoothing → assembly) to a
//! private, bounded [`rayon`] thread pool so it does not stall the main
//! thread.  One task is one sequential pass — the grid itself is never split
//! across threads.  The pool is limited to [`MAX_GENERATION_THREADS`]
//! concurrent tasks; excess requests are queued and run in order rather than
//! spawning unbounded OS threads.  When a task finishes the buffers are
//! uploaded to [`Assets<Mesh>`] and the entity receives [`TerrainReady`].
//!
//! # Usage
//! ```rust,ignore
//! commands.spawn(PendingTerrain::new(TerrainConfig::default()));
//!
//! // Later, query for TerrainReady to consume the mesh handle.
//! ```

use std::sync::{
    Arc, Mutex, OnceLock,
    atomic::{AtomicBool, Ordering},
    mpsc,
};

use bevy::{
    asset::Assets,
    ecs::{
        component::Component,
        entity::Entity,
        system::{Commands, Query, ResMut},
    },
    mesh::Mesh,
    prelude::Handle,
};

use crate::{
    mesh::{MeshBuffers, buffers_to_mesh},
    terrain::{TerrainBuilder, TerrainConfig, TerrainError},
};

/// Maximum number of terrain generation tasks that run concurrently.
///
/// Additional tasks are queued inside the rayon pool rather than spawning new
/// OS threads, bounding both CPU and memory usage.
const MAX_GENERATION_THREADS: usize = 4;

/// Returns the library-private rayon thread pool used for terrain generation.
///
/// Isolated from the application's global rayon pool so terrain work does not
/// starve unrelated parallel workloads and the concurrency cap is enforced
/// regardless of the calling application's rayon configuration.
fn gen_pool() -> &'static rayon::ThreadPool {
    static POOL: OnceLock<rayon::ThreadPool> = OnceLock::new();
    POOL.get_or_init(|| {
        rayon::ThreadPoolBuilder::new()
            .num_threads(MAX_GENERATION_THREADS)
            .thread_name(|i| format!("terrain-gen-{i}"))
            .build()
            .expect("failed to build terrain generation thread pool")
    })
}

/// Spawned onto an entity to request background terrain generation.
///
/// The constructor submits one `generate()` pass to the private [`gen_pool`]
/// rayon pool.  Because a pass is a monolithic blocking computation with no
/// yield points, Bevy's `AsyncComputeTaskPool` would let it starve other
/// tasks on that executor; a dedicated pool avoids the problem while bounding
/// OS thread and memory usage.  [`poll_terrain_tasks`] non-blockingly checks
/// for completion each frame using [`mpsc::Receiver::try_recv`].
///
/// Dropping `PendingTerrain` (e.g. when the entity is despawned) sets an
/// atomic cancellation flag.  Tasks that have not yet started will see the
/// flag and exit without doing any work.
#[derive(Component)]
pub struct PendingTerrain {
    // Wrapped in Mutex so the struct is Sync, which Bevy's Component bound requires.
    pub(crate) rx: Mutex<mpsc::Receiver<Result<MeshBuffers, TerrainError>>>,
    /// Set to `true` on drop; the background task checks this before starting.
    cancelled: Arc<AtomicBool>,
}

impl Drop for PendingTerrain {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }
}

impl PendingTerrain {
    /// Spawn a background generation pass for the given configuration.
    pub fn new(config: TerrainConfig) -> Self {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let (tx, rx) = mpsc::sync_channel(1);
        gen_pool().spawn(move || {
            // Skip the entire computation if the entity was already despawned.
            if !flag.load(Ordering::Relaxed) {
                tx.send(TerrainBuilder::new(config).generate()).ok();
            }
        });
        Self {
            rx: Mutex::new(rx),
            cancelled,
        }
    }
}

/// Added to the entity by [`poll_terrain_tasks`] when generation is complete.
#[derive(Component)]
pub struct TerrainReady(pub Handle<Mesh>);

/// Bevy system — polls pending generation tasks and uploads finished buffers.
pub fn poll_terrain_tasks(
    mut commands: Commands,
    tasks: Query<(Entity, &PendingTerrain)>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    for (entity, pending) in &tasks {
        let poll = pending
            .rx
            .lock()
            .expect("terrain thread poisoned")
            .try_recv();
        match poll {
            Ok(Ok(buffers)) => {
                let handle = meshes.add(buffers_to_mesh(buffers));
                commands
                    .entity(entity)
                    .remove::<PendingTerrain>()
                    .insert(TerrainReady(handle));
            }
            Ok(Err(e)) => {
                bevy::log::error!("Terrain generation failed: {e}");
                commands.entity(entity).remove::<PendingTerrain>();
            }
            Err(mpsc::TryRecvError::Disconnected) => {
                bevy::log::error!("Terrain generation thread panicked");
                commands.entity(entity).remove::<PendingTerrain>();
            }
            Err(mpsc::TryRecvError::Empty) => {}
        }
    }
}
