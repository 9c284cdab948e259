use bridge_guest::{GuestModule, PathQuery, SpawnBatch};
use demo_components::{FirstComponent, SecondComponent};
use tracing::info;

pub const PRINT_FIRST_SYSTEM: &str = "print-first-component-system";

/// Registers `FirstComponent` and `SecondComponent`, spawns one
/// `FirstComponent { first: 18 }` and logs every `FirstComponent` each tick.
#[must_use]
pub fn simple_guest() -> GuestModule {
    GuestModule::new("simple", |ctx| {
        ctx.register::<FirstComponent>()?;
        ctx.register::<SecondComponent>()?;

        ctx.add_system(
            PRINT_FIRST_SYSTEM,
            [PathQuery::new().component_of::<FirstComponent>()],
            |call| {
                for (entity, component) in call.decode_column::<FirstComponent>(0, 0)? {
                    info!(entity = entity.id(), first = component.first, "first component");
                }
                Ok(())
            },
        )?;

        ctx.spawn(SpawnBatch::new().with(&FirstComponent { first: 18 })?)?;
        Ok(())
    })
}
