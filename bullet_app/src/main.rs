//! Bullet hell demo for the spawn pool runtime
//!
//! Fires pooled bullets every frame, recycles them with timers, and bursts
//! pooled sparks periodically. Runs headless for a fixed number of frames
//! and logs pool statistics.
//!
//! Usage: `bullet_demo [config.toml|config.ron]`

use rand::prelude::*;
use spawn_pool::config::ConfigError;
use spawn_pool::foundation::logging;
use spawn_pool::prelude::*;
use thiserror::Error;

// Simulation constants
const FRAME_COUNT: u32 = 240;
const DEFAULT_FPS: u32 = 60;
const BULLET_LIFETIME: f32 = 0.35; // Seconds before a bullet is handed back
const SPARK_LIFETIME: f32 = 0.2;
const SPARK_BURST: usize = 6;
const SPARK_INTERVAL: u32 = 30; // Frames between spark bursts
const DEFAULT_CONFIG: &str = "bullet_app/config/pools.toml";

#[derive(Error, Debug)]
enum AppError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// Bullet state reset every time the pool hands the bullet out
#[derive(Debug, Default)]
struct Bullet {
    generation: u32,
}

impl PoolObject for Bullet {
    fn on_object_spawn(&mut self) {
        self.generation += 1;
    }
}

impl Behaviour for Bullet {
    fn as_pool_object(&mut self) -> Option<&mut dyn PoolObject> {
        Some(self)
    }
}

/// Spark effect that counts how often it was shown
#[derive(Debug, Default)]
struct Spark {
    shown: u32,
}

impl PoolObject for Spark {
    fn on_object_spawn(&mut self) {
        self.shown += 1;
        log::trace!("Spark shown {} times", self.shown);
    }
}

impl Behaviour for Spark {
    fn as_pool_object(&mut self) -> Option<&mut dyn PoolObject> {
        Some(self)
    }

    fn on_despawn(&mut self) {
        log::trace!("Spark hidden");
    }
}

fn build_world() -> SceneWorld {
    let mut world = SceneWorld::new();
    world.register_prefab(Prefab::new("bullet").with_behaviour(Bullet::default));
    world.register_prefab(Prefab::new("spark").with_behaviour(Spark::default));
    world.register_prefab(
        Prefab::new("asteroid")
            .with_transform(Transform::from_position_rotation(
                Vec3::new(0.0, 0.0, -50.0),
                Quat::from_euler_angles(0.0, 0.3, 0.0),
            )),
    );
    world
}

fn load_config() -> Result<RuntimeConfig, AppError> {
    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    match RuntimeConfig::load_from_file(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
            eprintln!("Config '{path}' not found, using built-in pools");
            Ok(RuntimeConfig::default()
                .with_pool(PoolConfig::new("bullet", "bullet", 24))
                .with_pool(PoolConfig::new("spark", "spark", 16)))
        }
        Err(err) => Err(err.into()),
    }
}

fn fire_bullet(runtime: &mut Runtime<SceneWorld>, rng: &mut impl Rng) {
    let position = Vec3::new(rng.gen_range(-10.0..10.0), 0.0, rng.gen_range(-2.0..2.0));
    let rotation = Quat::from_euler_angles(0.0, rng.gen_range(-0.5..0.5), 0.0);

    if let Some(bullet) = runtime.acquire_at("bullet", position, rotation) {
        runtime.schedule_after(move |world: &mut SceneWorld| world.despawn(bullet), BULLET_LIFETIME);
    }
}

fn burst_sparks(runtime: &mut Runtime<SceneWorld>, rng: &mut impl Rng) {
    let origin = Vec3::new(rng.gen_range(-5.0..5.0), rng.gen_range(0.0..3.0), 0.0);
    for _ in 0..SPARK_BURST {
        let Some(spark) = runtime.acquire_at("spark", origin, Quat::identity()) else {
            break;
        };
        runtime.schedule_after(move |world: &mut SceneWorld| world.despawn(spark), SPARK_LIFETIME);
    }
}

/// Whether `frame` is the first frame of a simulated second at `fps`
fn starts_simulated_second(frame: u32, fps: u32) -> bool {
    frame % fps.max(1) == 0
}

fn main() -> Result<(), AppError> {
    let config = load_config()?;
    logging::init_with_level(&config.engine.log_level);

    let fps = config.engine.target_fps.unwrap_or(DEFAULT_FPS).max(1);
    let delta_time = 1.0 / fps as f32;
    log::info!("Running {} frames at {} fps", FRAME_COUNT, fps);

    let mut runtime = Runtime::from_config(build_world(), &config)?;
    let mut rng = rand::thread_rng();

    for frame in 0..FRAME_COUNT {
        fire_bullet(&mut runtime, &mut rng);

        if frame % SPARK_INTERVAL == 0 {
            burst_sparks(&mut runtime, &mut rng);
        }

        // Mid-run resizing: more bullets, then retire the spark pool entirely
        if frame == FRAME_COUNT / 2 {
            runtime.grow("bullet", 8);
        }
        if frame == FRAME_COUNT - SPARK_INTERVAL {
            let removed = runtime.shrink("spark", usize::MAX);
            log::info!("Retired spark pool ({} instances)", removed);
        }

        runtime.advance(delta_time);

        if starts_simulated_second(frame, fps) {
            log::debug!(
                "frame {}: {} active objects, {} timers pending",
                frame,
                runtime.host().active_count(),
                runtime.timers().pending_count()
            );
        }
    }

    let stats = runtime.pools().stats().clone();
    log::info!(
        "Pools: {} | instances: {} | acquired: {} | created: {} | destroyed: {}",
        stats.active_pools,
        stats.total_instances,
        stats.total_acquired,
        stats.total_created,
        stats.total_destroyed
    );

    if let Some(pool) = runtime.pools().pool("bullet") {
        let generations: u32 = pool
            .entities()
            .filter_map(|id| runtime.host().object(id))
            .filter_map(|object| object.behaviour::<Bullet>())
            .map(|bullet| bullet.generation)
            .sum();
        log::info!("Bullet pool of {} served {} spawns", pool.len(), generations);
    }

    let world = runtime.shutdown();
    log::info!("Shut down with {} objects left", world.object_count());
    Ok(())
}
