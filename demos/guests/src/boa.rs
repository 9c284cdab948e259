use bridge_guest::{GuestModule, PathQuery, SpawnBatch};
use demo_components::Boa;
use tracing::info;

pub const BOA_SYSTEM: &str = "s";

/// Registers `Boa`, spawns `Boa { kind: "Boa" }` and reads it back each tick.
#[must_use]
pub fn boa_guest() -> GuestModule {
    GuestModule::new("boa", |ctx| {
        ctx.register::<Boa>()?;
        ctx.add_system(BOA_SYSTEM, [PathQuery::new().component_of::<Boa>()], |call| {
            for (entity, boa) in call.decode_column::<Boa>(0, 0)? {
                info!(entity = entity.id(), kind = boa.kind.as_str(), "boa");
            }
            Ok(())
        })?;
        ctx.spawn(SpawnBatch::new().with(&Boa::new("Boa"))?)?;
        Ok(())
    })
}
