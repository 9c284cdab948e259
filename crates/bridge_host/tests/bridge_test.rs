//! End-to-end scenarios: a host driving guests built with the guest SDK.

use std::sync::{Arc, Mutex};

use bridge_component::{BridgeError, ComponentTypeId, GuestError, QueryDescriptor, QueryResultEntry, SerializedComponent};
use bridge_guest::{GuestModule, PathQuery, SpawnBatch};
use bridge_host::{ComponentRegistry, GuestState, Host, HostConfig, HostError, InvocationOutcome};
use demo_components::{Boa, FirstComponent, SecondComponent, Velocity};

fn host_with(registry: &Arc<ComponentRegistry>) -> Host {
    Host::new(Arc::clone(registry), HostConfig::default())
}

fn new_host() -> Host {
    host_with(&Arc::new(ComponentRegistry::new()))
}

#[test]
fn boa_end_to_end() {
    let seen: Arc<Mutex<Vec<QueryResultEntry>>> = Arc::default();
    let sink = Arc::clone(&seen);

    let guest = GuestModule::new("boa", move |ctx| {
        ctx.register::<Boa>()?;
        ctx.add_system("s", [PathQuery::new().component("Boa")], move |call| {
            sink.lock().unwrap().extend(call.query(0)?.iter().cloned());
            Ok(())
        })?;
        ctx.spawn(SpawnBatch::new().with(&Boa::new("Boa"))?)?;
        Ok(())
    });

    let mut host = new_host();
    host.load(Box::new(guest)).unwrap();
    assert_eq!(host.registry().resolve("Boa"), Some(ComponentTypeId(0)));

    let report = host.tick();
    assert_eq!(report.invoked_systems(), ["s"]);

    let rows = seen.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].components.len(), 1);
    assert_eq!(rows[0].components[0].id, ComponentTypeId(0));
    assert_eq!(rows[0].components[0].decode::<Boa>().unwrap(), Boa::new("Boa"));
}

#[test]
fn demo_boa_guest_reads_its_spawn() {
    let mut host = new_host();
    host.load(Box::new(demo_guests::boa_guest())).unwrap();

    let report = host.tick();
    let invocation = report.invocation(demo_guests::BOA_SYSTEM).unwrap();
    assert_eq!(invocation.rows, vec![1]);
    assert!(invocation.outcome.is_completed());
}

#[test]
fn registry_is_shared_between_guests() {
    let registry = Arc::new(ComponentRegistry::new());
    let mut host = host_with(&registry);
    host.load(Box::new(demo_guests::simple_guest())).unwrap();
    host.load(Box::new(demo_guests::boa_guest())).unwrap();

    let first = registry.resolve("demo::FirstComponent").unwrap();
    let second = registry.resolve("demo::SecondComponent").unwrap();
    let boa = registry.resolve("Boa").unwrap();
    assert_eq!((first, second, boa), (ComponentTypeId(0), ComponentTypeId(1), ComponentTypeId(2)));
    for id in [first, second, boa] {
        let path = registry.path_of(id).unwrap();
        assert_eq!(registry.resolve(&path), Some(id));
    }
}

#[test]
fn hosts_on_threads_agree_on_ids() {
    let registry = Arc::new(ComponentRegistry::new());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let registry = Arc::clone(&registry);
            scope.spawn(move || {
                let mut host = host_with(&registry);
                host.load(Box::new(demo_guests::motion_guest())).unwrap();
                host.load(Box::new(demo_guests::simple_guest())).unwrap();
                host.tick();
            });
        }
    });

    assert_eq!(registry.len(), 4);
    let ids: Vec<u32> = ["demo::Velocity", "demo::Name", "demo::FirstComponent", "demo::SecondComponent"]
        .iter()
        .map(|path| registry.resolve(path).unwrap().0)
        .collect();
    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, [0, 1, 2, 3]);
}

#[test]
fn rows_follow_query_order() {
    let seen: Arc<Mutex<Vec<Vec<ComponentTypeId>>>> = Arc::default();
    let sink = Arc::clone(&seen);

    let guest = GuestModule::new("order", move |ctx| {
        let first = ctx.register::<FirstComponent>()?;
        let second = ctx.register::<SecondComponent>()?;
        ctx.register::<Boa>()?;
        ctx.add_system(
            "pairs",
            [PathQuery::new()
                .component_of::<SecondComponent>()
                .component_of::<FirstComponent>()
                .with_of::<Boa>()],
            move |call| {
                for row in call.query(0)? {
                    sink.lock().unwrap().push(row.components.iter().map(|c| c.id).collect());
                }
                Ok(())
            },
        )?;
        ctx.spawn(
            SpawnBatch::new()
                .with(&FirstComponent { first: 1 })?
                .with(&SecondComponent { second: 2 })?
                .with(&Boa::new("Boa"))?,
        )?;
        // No Boa: must not match.
        ctx.spawn(
            SpawnBatch::new()
                .with(&FirstComponent { first: 3 })?
                .with(&SecondComponent { second: 4 })?,
        )?;
        assert_ne!(first, second);
        Ok(())
    });

    let mut host = new_host();
    host.load(Box::new(guest)).unwrap();
    host.tick();

    let first = host.registry().resolve("demo::FirstComponent").unwrap();
    let second = host.registry().resolve("demo::SecondComponent").unwrap();
    assert_eq!(*seen.lock().unwrap(), vec![vec![second, first]]);
}

#[test]
fn one_row_list_per_query_in_declaration_order() {
    let seen: Arc<Mutex<Vec<Vec<usize>>>> = Arc::default();
    let sink = Arc::clone(&seen);

    let guest = GuestModule::new("multi", move |ctx| {
        ctx.register::<FirstComponent>()?;
        ctx.register::<SecondComponent>()?;
        ctx.register::<Boa>()?;
        ctx.add_system(
            "multi",
            [
                PathQuery::new().component_of::<SecondComponent>(),
                PathQuery::new()
                    .component_of::<FirstComponent>()
                    .without_of::<SecondComponent>(),
                PathQuery::new().component_of::<FirstComponent>(),
                PathQuery::new().component_of::<Boa>(),
            ],
            move |call| {
                sink.lock().unwrap().push(call.queries().iter().map(Vec::len).collect());
                let lone = call.decode_column::<FirstComponent>(1, 0)?;
                if lone.len() != 1 || lone[0].1.first != 1 {
                    return Err(GuestError::failed("wrong row in second query"));
                }
                Ok(())
            },
        )?;
        ctx.spawn(SpawnBatch::new().with(&FirstComponent { first: 1 })?)?;
        ctx.spawn(
            SpawnBatch::new()
                .with(&FirstComponent { first: 2 })?
                .with(&SecondComponent { second: 2 })?,
        )?;
        Ok(())
    });

    let mut host = new_host();
    host.load(Box::new(guest)).unwrap();
    let report = host.tick();

    let invocation = report.invocation("multi").unwrap();
    assert!(invocation.outcome.is_completed());
    assert_eq!(invocation.rows, vec![1, 1, 2, 0]);
    assert_eq!(*seen.lock().unwrap(), vec![vec![1, 1, 2, 0]]);
}

#[test]
fn unsatisfiable_query_fails_setup() {
    let guest = GuestModule::new("contradiction", |ctx| {
        ctx.register::<Boa>()?;
        ctx.add_system("never", [PathQuery::new().component("Boa").without("Boa")], |_| Ok(()))?;
        Ok(())
    });

    let mut host = new_host();
    let err = host.load(Box::new(guest)).unwrap_err();
    match err {
        HostError::Setup { source: GuestError::Host(BridgeError::UnsatisfiableQuery { id }), .. } => {
            assert_eq!(id, ComponentTypeId(0));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(host.systems().is_empty());
}

#[test]
fn host_checks_raw_descriptors() {
    let results: Arc<Mutex<Vec<Result<(), BridgeError>>>> = Arc::default();
    let sink = Arc::clone(&results);

    let guest = GuestModule::new("raw", move |ctx| {
        let boa = ctx.register::<Boa>()?;
        let mut out = sink.lock().unwrap();
        out.push(ctx.host().register_system("bad", vec![QueryDescriptor::new().with(boa).without(boa)]));
        out.push(ctx.host().register_system("ghost", vec![QueryDescriptor::new().component(ComponentTypeId(42))]));
        out.push(ctx.host().register_system("ok", vec![QueryDescriptor::new().component(boa)]));
        out.push(ctx.host().register_system("ok", Vec::new()));
        Ok(())
    });

    let mut host = new_host();
    host.load(Box::new(guest)).unwrap();

    let results = results.lock().unwrap();
    assert_eq!(results[0], Err(BridgeError::UnsatisfiableQuery { id: ComponentTypeId(0) }));
    assert_eq!(results[1], Err(BridgeError::UnknownComponentId(ComponentTypeId(42))));
    assert_eq!(results[2], Ok(()));
    assert!(matches!(results[3], Err(BridgeError::DuplicateSystemName { ref name, .. }) if name == "ok"));
    assert_eq!(host.systems().len(), 1);
}

#[test]
fn spawn_with_unregistered_id_creates_nothing() {
    let outcome: Arc<Mutex<Option<Result<(), BridgeError>>>> = Arc::default();
    let sink = Arc::clone(&outcome);

    let guest = GuestModule::new("atomic", move |ctx| {
        let boa = ctx.register::<Boa>()?;
        let result = ctx.spawn_serialized(vec![
            SerializedComponent::new(boa, r#"{"kind":"Boa"}"#),
            SerializedComponent::new(ComponentTypeId(99), "{}"),
        ]);
        *sink.lock().unwrap() = Some(result.map(|_| ()));
        Ok(())
    });

    let mut host = new_host();
    host.load(Box::new(guest)).unwrap();

    assert_eq!(
        *outcome.lock().unwrap(),
        Some(Err(BridgeError::UnregisteredSpawnComponent(ComponentTypeId(99))))
    );
    assert_eq!(host.world().entity_count(), 0);
}

#[test]
fn failing_system_does_not_block_the_next() {
    let ran_b = Arc::new(Mutex::new(0usize));
    let counter = Arc::clone(&ran_b);

    let guest = GuestModule::new("mixed", move |ctx| {
        ctx.register::<Boa>()?;
        ctx.add_system("A", [PathQuery::new().component("Boa")], |call| {
            // Boa values do not decode as FirstComponent.
            call.decode_column::<FirstComponent>(0, 0)?;
            Ok(())
        })?;
        ctx.add_system("B", [PathQuery::new().component("Boa")], move |call| {
            call.decode_column::<Boa>(0, 0)?;
            *counter.lock().unwrap() += 1;
            Ok(())
        })?;
        ctx.spawn(SpawnBatch::new().with(&Boa::new("Boa"))?)?;
        Ok(())
    });

    let mut host = new_host();
    let id = host.load(Box::new(guest)).unwrap();
    let report = host.tick();

    assert_eq!(report.invoked_systems(), ["A", "B"]);
    assert!(matches!(
        report.invocation("A").unwrap().outcome,
        InvocationOutcome::Failed { decode_error: true, .. }
    ));
    assert!(report.invocation("B").unwrap().outcome.is_completed());
    assert_eq!(*ran_b.lock().unwrap(), 1);
    assert_eq!(host.guest_state(id), Some(GuestState::Ready));
}

#[test]
fn motion_guest_writes_through_the_host() {
    let mut host = new_host();
    host.load(Box::new(demo_guests::motion_guest())).unwrap();
    let velocity = host.registry().resolve("demo::Velocity").unwrap();
    assert_eq!(host.world().entity_count(), 1);

    let report = host.tick();
    assert_eq!(report.failure_count(), 0);
    assert_eq!(
        report.invoked_systems(),
        [
            demo_guests::ACCELERATE_SYSTEM,
            demo_guests::PRINT_VELOCITY_SYSTEM,
            demo_guests::SPAWN_SYSTEM
        ]
    );
    assert_eq!(report.invocation(demo_guests::SPAWN_SYSTEM).unwrap().spawned, 1);
    assert_eq!(host.world().entity_count(), 2);

    host.tick();
    let rows = host.world().query(&QueryDescriptor::new().component(velocity));
    let mut velocities: Vec<Velocity> = rows
        .iter()
        .map(|row| row.components[0].decode::<Velocity>().unwrap())
        .collect();
    velocities.sort_by(|a, b| a.linear.x.total_cmp(&b.linear.x));

    // The setup spawn was accelerated twice, the tick-one spawn once.
    assert_eq!(velocities[0], Velocity::new(0.0, 1.0, 1.0));
    assert_eq!(velocities[1], Velocity::new(1.0, 0.0, 2.0));
}

#[test]
fn late_registration_is_opt_in() {
    fn late_guest() -> GuestModule {
        GuestModule::new("late", |ctx| {
            ctx.add_system("register-late", Vec::new(), |call| {
                call.register_path("Late")?;
                Ok(())
            })
        })
    }

    let mut strict = new_host();
    strict.load(Box::new(late_guest())).unwrap();
    let report = strict.tick();
    assert_eq!(report.failure_count(), 1);
    assert!(strict.registry().resolve("Late").is_none());

    let config = HostConfig::new().with_late_registration(true);
    let mut relaxed = Host::new(Arc::new(ComponentRegistry::new()), config);
    relaxed.load(Box::new(late_guest())).unwrap();
    let report = relaxed.tick();
    assert_eq!(report.failure_count(), 0);
    assert!(relaxed.registry().resolve("Late").is_some());
}
