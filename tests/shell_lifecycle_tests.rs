// Shell-surface lifecycle integration tests
//
// Exercises the engine end to end the way the dispatch layer would drive
// it: surface creation, role assignment, destruction cascades and the
// at-most-one-role invariant, across both destruction orderings.

use vitrine::{ClientId, Role, ShellEngine, ShellError};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn surface_role_switch_and_teardown() {
    init_logging();
    let mut engine = ShellEngine::default();
    let client = ClientId(1);

    // Create surface S1 and give it a shell surface.
    let s1 = engine.create_surface(client);
    let shell = engine.create_shell_surface(client, s1).unwrap().unwrap();
    assert_eq!(engine.lookup(s1), Some(shell));
    assert_eq!(engine.role(shell), Some(&Role::None));

    // Toplevel, then fullscreen: the role switches, it never reverts.
    engine.set_toplevel(shell);
    assert_eq!(engine.role(shell), Some(&Role::Toplevel));

    engine.set_fullscreen(shell, 1, 60_000);
    assert_eq!(
        engine.role(shell),
        Some(&Role::Fullscreen {
            method: 1,
            framerate: 60_000
        })
    );

    // Destroy S1: the shell surface becomes unreachable.
    engine.surface_destroyed(s1);
    assert_eq!(engine.lookup(s1), None);
    assert_eq!(engine.role(shell), None);
}

#[test]
fn at_most_one_shell_surface_per_surface() {
    init_logging();
    let mut engine = ShellEngine::default();
    let client = ClientId(1);

    let surface = engine.create_surface(client);
    let first = engine.create_shell_surface(client, surface).unwrap().unwrap();

    assert_eq!(
        engine.create_shell_surface(client, surface),
        Err(ShellError::AlreadyHasRole { surface })
    );
    assert_eq!(engine.lookup(surface), Some(first));

    // After the first one is explicitly destroyed, the surface is free for
    // a new shell surface again.
    engine.shell_resource_destroyed(first);
    assert!(engine.create_shell_surface(client, surface).is_ok());
}

#[test]
fn destruction_order_does_not_matter() {
    init_logging();
    let mut engine = ShellEngine::default();
    let client = ClientId(1);

    // Surface dies first, shell-surface wire object second.
    let s1 = engine.create_surface(client);
    let sh1 = engine.create_shell_surface(client, s1).unwrap().unwrap();
    engine.surface_destroyed(s1);
    engine.shell_resource_destroyed(sh1);
    assert_eq!(engine.lookup(s1), None);

    // Shell-surface wire object first, surface second.
    let s2 = engine.create_surface(client);
    let sh2 = engine.create_shell_surface(client, s2).unwrap().unwrap();
    engine.shell_resource_destroyed(sh2);
    assert!(engine.surfaces().is_alive(s2)); // surface outlives its role
    engine.surface_destroyed(s2);
    assert_eq!(engine.lookup(s2), None);
    assert!(!engine.surfaces().is_alive(s2));
}

#[test]
fn no_shell_surface_for_a_dead_surface() {
    init_logging();
    let mut engine = ShellEngine::default();
    let client = ClientId(1);

    // The surface is torn down server-side before the client's create
    // request is processed: the request is dropped, and the dead surface
    // id never resolves to a shell surface.
    let s1 = engine.create_surface(client);
    engine.surface_destroyed(s1);

    assert_eq!(engine.create_shell_surface(client, s1), Ok(None));
    assert_eq!(engine.lookup(s1), None);
}

#[test]
fn transient_parent_must_be_live_and_distinct() {
    init_logging();
    let mut engine = ShellEngine::default();
    let client = ClientId(1);

    let parent = engine.create_surface(client);
    let child = engine.create_surface(client);
    let shell = engine.create_shell_surface(client, child).unwrap().unwrap();

    assert_eq!(
        engine.set_transient(shell, child, 0, 0, 0),
        Err(ShellError::InvalidParent { parent: child })
    );

    assert_eq!(engine.set_transient(shell, parent, 32, 16, 1), Ok(()));
    assert_eq!(
        engine.role(shell),
        Some(&Role::Transient {
            parent,
            offset: (32, 16),
            flags: 1
        })
    );

    engine.surface_destroyed(parent);
    assert_eq!(
        engine.set_transient(shell, parent, 0, 0, 0),
        Err(ShellError::InvalidParent { parent })
    );
}

#[test]
fn popup_serial_gating_through_the_engine() {
    init_logging();
    let mut engine = ShellEngine::default();
    let client = ClientId(1);

    let parent = engine.create_surface(client);
    let child = engine.create_surface(client);
    let shell = engine.create_shell_surface(client, child).unwrap().unwrap();
    let seat = engine.register_seat(client);

    engine.input_dispatched(seat, 5);
    assert_eq!(engine.set_popup(shell, seat, 5, parent, 4, 8, 0), Ok(()));

    // The seat moved on to serial 6; serial 5 is now history.
    engine.input_dispatched(seat, 6);
    assert_eq!(
        engine.set_popup(shell, seat, 5, parent, 4, 8, 0),
        Err(ShellError::StaleSerial {
            seat,
            requested: 5,
            current: Some(6)
        })
    );
}

#[test]
fn title_defaults_empty_and_round_trips() {
    init_logging();
    let mut engine = ShellEngine::default();
    let client = ClientId(1);

    let surface = engine.create_surface(client);
    let shell = engine.create_shell_surface(client, surface).unwrap().unwrap();

    assert_eq!(engine.title(shell), Some(""));
    engine.set_title(shell, "X");
    assert_eq!(engine.title(shell), Some("X"));

    assert_eq!(engine.class(shell), Some(""));
    engine.set_class(shell, "org.example.hmi");
    assert_eq!(engine.class(shell), Some("org.example.hmi"));
}
