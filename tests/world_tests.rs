//! SimWorld validation tests
//!
//! These validate scenario construction and the per-tick ordering of
//! input, traffic and controlled vehicles.

use road_sensor_sim::simulation::{
    ControlSource, Direction, FnPolicy, InputEvent, Road, ScenarioConfig, SensorConfig,
    SimWorld,
};

fn empty_world() -> SimWorld {
    SimWorld::new(Road::new(0.0, 300.0, 3).expect("valid road"))
}

#[test]
fn test_default_scenario_layout() {
    let world = SimWorld::create_test_world_with_seed(7);
    let scenario = ScenarioConfig::default();

    assert_eq!(world.controlled().count(), scenario.agent_count);
    assert_eq!(world.traffic().count(), scenario.traffic_count);
    assert_eq!(world.tick_count(), 0);
    assert_eq!(world.damaged_count(), 0);

    // Traffic starts ahead of the agents and inside the road
    let agent_y = world.best_agent().expect("scenario has an agent").position().y;
    for car in world.traffic() {
        assert!(car.position().y < agent_y);
        assert!(car.position().x > world.road.left && car.position().x < world.road.right);
    }
}

#[test]
fn test_seeded_scenarios_are_reproducible() {
    let a = SimWorld::create_test_world_with_seed(42);
    let b = SimWorld::create_test_world_with_seed(42);
    let positions = |world: &SimWorld| {
        world
            .vehicles()
            .iter()
            .map(|v| v.position())
            .collect::<Vec<_>>()
    };
    assert_eq!(positions(&a), positions(&b));
}

#[test]
fn test_seeded_runs_are_deterministic() {
    let mut a = SimWorld::create_test_world_with_seed(3);
    let mut b = SimWorld::create_test_world_with_seed(3);
    for _ in 0..300 {
        a.tick();
        b.tick();
    }
    for (va, vb) in a.vehicles().iter().zip(b.vehicles()) {
        assert_eq!(va.position(), vb.position());
        assert_eq!(va.is_damaged(), vb.is_damaged());
    }
}

#[test]
fn test_invalid_scenarios_are_rejected() {
    let no_drivers = ScenarioConfig {
        agent_count: 0,
        manual_player: false,
        ..ScenarioConfig::default()
    };
    assert!(SimWorld::from_scenario(&no_drivers).is_err());

    let no_lanes = ScenarioConfig {
        lane_count: 0,
        ..ScenarioConfig::default()
    };
    assert!(SimWorld::from_scenario(&no_lanes).is_err());

    let no_rays = ScenarioConfig {
        sensors: SensorConfig {
            ray_count: 0,
            ..SensorConfig::default()
        },
        ..ScenarioConfig::default()
    };
    assert!(SimWorld::from_scenario(&no_rays).is_err());
}

#[test]
fn test_lanes_must_fit_a_vehicle() {
    let default_width = ScenarioConfig::default().road_width;
    for lane_count in [6, 7, 10] {
        let crowded = ScenarioConfig {
            lane_count,
            seed: Some(1),
            ..ScenarioConfig::default()
        };
        let err = SimWorld::from_scenario(&crowded)
            .err()
            .expect("lanes no wider than a vehicle should be rejected");
        assert!(
            format!("{:#}", err).contains("wide"),
            "unexpected error for {} lanes: {:#}",
            lane_count,
            err
        );
    }

    // Many lanes are fine once the road is widened to match
    let wide = ScenarioConfig {
        lane_count: 10,
        road_width: default_width / 3.0 * 10.0,
        seed: Some(1),
        ..ScenarioConfig::default()
    };
    let mut world = SimWorld::from_scenario(&wide).expect("wide road should build");
    assert_eq!(world.damaged_count(), 0);
    world.tick();
    assert_eq!(world.damaged_count(), 0, "no vehicle should spawn wrecked");
}

#[test]
fn test_input_applies_at_next_tick() {
    let mut world = empty_world();
    let player = world
        .add_manual(1, 0.0, SensorConfig::default())
        .expect("valid player");

    world.push_input(InputEvent::Pressed(Direction::Forward));
    world.push_input(InputEvent::Pressed(Direction::Forward));
    assert!(!world.vehicle(player).unwrap().controls().forward);

    world.tick();
    let car = world.vehicle(player).unwrap();
    assert!(car.controls().forward);
    assert!(car.speed() > 0.0);
    assert!(world.input.is_empty());

    world.push_input(InputEvent::Released(Direction::Forward));
    world.tick();
    assert!(!world.vehicle(player).unwrap().controls().forward);
}

#[test]
fn test_traffic_moves_at_constant_forward() {
    let mut world = empty_world();
    let car = world.add_traffic(0, -200.0).expect("valid traffic");
    for _ in 0..100 {
        world.tick();
    }
    let car = world.vehicle(car).unwrap();
    assert_eq!(car.control_source(), ControlSource::ConstantForward);
    assert!(car.position().y < -200.0);
    assert!(car.speed() <= road_sensor_sim::simulation::TRAFFIC_MAX_SPEED);
    assert!(!car.is_damaged());
}

#[test]
fn test_agent_senses_traffic_ahead() {
    let mut world = empty_world();
    let idle = FnPolicy::new(|_: &[f64]| [0.0, 0.0, 0.0, 0.0]);
    let agent = world
        .add_autonomous(
            1,
            0.0,
            SensorConfig {
                ray_count: 3,
                ..SensorConfig::default()
            },
            Box::new(idle),
        )
        .expect("valid agent");
    world.add_traffic(1, -100.0).expect("valid traffic");

    world.tick();

    let agent = world.vehicle(agent).unwrap();
    let centre = agent.readings()[1].expect("traffic is straight ahead");
    // Traffic rear edge sits at about y = -75 after its first move
    assert!(centre.offset > 0.4 && centre.offset < 0.6, "offset {}", centre.offset);
}

#[test]
fn test_agent_crashing_into_traffic_is_damaged() {
    let mut world = empty_world();
    let rush = FnPolicy::new(|_: &[f64]| [1.0, 0.0, 0.0, 0.0]);
    world
        .add_autonomous(1, 0.0, SensorConfig::default(), Box::new(rush))
        .expect("valid agent");
    world.add_traffic(1, -150.0).expect("valid traffic");

    for _ in 0..1000 {
        world.tick();
    }

    assert_eq!(world.damaged_count(), 1);
    let agent = world.controlled().next().unwrap();
    assert!(agent.is_damaged());
    assert!(world.traffic().all(|v| !v.is_damaged()));
}

#[test]
fn test_traffic_ignores_other_vehicles() {
    let mut world = empty_world();
    // Two traffic cars overlapping: they only test against the borders
    world.add_traffic(1, 0.0).expect("valid traffic");
    world.add_traffic(1, 10.0).expect("valid traffic");
    world.tick();
    assert_eq!(world.damaged_count(), 0);
}

#[test]
fn test_best_agent_prefers_intact_vehicles() {
    let mut world = SimWorld::new(Road::new(0.0, 100.0, 1).expect("valid road"));
    let idle = || Box::new(FnPolicy::new(|_: &[f64]| [0.0, 0.0, 0.0, 0.0]));
    let intact = world
        .add_autonomous(0, 0.0, SensorConfig::default(), idle())
        .expect("valid agent");
    let wrecked = world
        .spawn(
            road_sensor_sim::simulation::Point::new(world.road.left, -500.0),
            Default::default(),
            ControlSource::Autonomous,
            Some(SensorConfig::default()),
            Some(idle()),
        )
        .expect("valid agent");

    world.tick();
    assert!(world.vehicle(wrecked).unwrap().is_damaged());
    assert_eq!(world.best_agent().map(|v| v.id), Some(intact));
}

#[test]
fn test_reflex_agents_keep_running() {
    let mut world = SimWorld::create_test_world_with_seed(11);
    for _ in 0..500 {
        world.tick();
    }
    assert_eq!(world.tick_count(), 500);
    for agent in world.controlled() {
        assert_eq!(agent.readings().len(), SensorConfig::default().ray_count);
        assert_eq!(agent.policy_kind(), Some("reflex"));
    }
}
