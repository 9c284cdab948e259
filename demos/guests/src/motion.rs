//! Velocity demo: one system writes, another reads, a third spawns once.

use bridge_guest::{GuestModule, PathQuery, SpawnBatch};
use demo_components::{Name, Velocity};
use glam::Vec3;
use tracing::info;

pub const ACCELERATE_SYSTEM: &str = "accelerate";
pub const PRINT_VELOCITY_SYSTEM: &str = "print-velocity";
pub const SPAWN_SYSTEM: &str = "spawn-once";

/// Fixed increment applied per tick; there is no delta time.
pub const ACCELERATION: Vec3 = Vec3::new(0.0, 0.0, 1.0);

/// Accelerates every `Velocity`, prints named velocities and spawns one extra
/// mover on its first tick.
#[must_use]
pub fn motion_guest() -> GuestModule {
    GuestModule::new("motion", |ctx| {
        ctx.register::<Velocity>()?;
        ctx.register::<Name>()?;

        ctx.add_system(
            ACCELERATE_SYSTEM,
            [PathQuery::new().component_of::<Velocity>()],
            |call| {
                let velocities = call.decode_column::<Velocity>(0, 0)?;
                for (entity, mut velocity) in velocities {
                    velocity.linear += ACCELERATION;
                    call.set(entity, &velocity)?;
                }
                Ok(())
            },
        )?;

        ctx.add_system(
            PRINT_VELOCITY_SYSTEM,
            [PathQuery::new().component_of::<Velocity>().component_of::<Name>()],
            |call| {
                let velocities = call.decode_column::<Velocity>(0, 0)?;
                let names = call.decode_column::<Name>(0, 1)?;
                for ((entity, velocity), (_, name)) in velocities.into_iter().zip(names) {
                    info!(
                        entity = entity.id(),
                        name = name.value.as_str(),
                        x = velocity.linear.x,
                        y = velocity.linear.y,
                        z = velocity.linear.z,
                        "velocity"
                    );
                }
                Ok(())
            },
        )?;

        let mut spawned = false;
        ctx.add_system(SPAWN_SYSTEM, Vec::new(), move |call| {
            if !spawned {
                let batch = SpawnBatch::new().with(&Velocity::new(0.0, 1.0, 0.0))?;
                let entity = call.spawn(batch)?;
                info!(entity = entity.id(), "spawned mover");
                spawned = true;
            }
            Ok(())
        })?;

        ctx.spawn(
            SpawnBatch::new()
                .with(&Velocity::new(1.0, 0.0, 0.0))?
                .with(&Name::new("mover"))?,
        )?;
        Ok(())
    })
}
