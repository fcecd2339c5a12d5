use pfield::simulation::collisions::{resolve_collisions, resolve_pair};
use pfield::simulation::effects::{EffectKind, MAX_LIVE_EFFECTS};
use pfield::simulation::engine::Engine;
use pfield::simulation::forces::{radial_impulse, ForceContext, ForceSet, InteractionMode, PointerInteraction};
use pfield::simulation::input::SharedInput;
use pfield::simulation::params::Parameters;
use pfield::simulation::simulator::Simulator;
use pfield::simulation::states::{DragState, Field, NVec2, Particle, ParticleId, SizeClass};
use pfield::{Scenario, ScenarioConfig};

const W: f64 = 800.0;
const H: f64 = 600.0;

/// Engine with no startup schedule and no small-viewport shrink
pub fn test_engine(max_particles: usize) -> Engine {
    Engine {
        max_particles,
        small_viewport_width: 0.0,
        small_viewport_max_particles: max_particles,
        spawn_interval: 0.3,
        initial_spawn_count: 0,
    }
}

/// Seeded simulator over an 800x600 viewport, plus the input handle feeding it
pub fn test_sim(max_particles: usize) -> (Simulator, SharedInput) {
    let input = SharedInput::new(NVec2::new(W, H));
    let sim = Simulator::new(
        test_engine(max_particles),
        Parameters::default(),
        input.clone(),
        input.clone(),
        Some(42),
    );
    (sim, input)
}

pub fn particle(id: u32, size: SizeClass, x: [f64; 2], v: [f64; 2]) -> Particle {
    Particle::new(ParticleId(id), size, NVec2::new(x[0], x[1]), NVec2::new(v[0], v[1]))
}

fn assert_close(a: f64, b: f64, tol: f64) {
    assert!((a - b).abs() < tol, "expected {b}, got {a}");
}

fn assert_in_bounds(sim: &Simulator) {
    let bounds = sim.viewport();
    for p in sim.particles() {
        let d = p.diameter();
        assert!(p.x.x >= 0.0 && p.x.x <= bounds.x - d, "x out of bounds: {:?}", p);
        assert!(p.x.y >= 0.0 && p.x.y <= bounds.y - d, "y out of bounds: {:?}", p);
    }
}

// ==================================================================================
// Size classes
// ==================================================================================

#[test]
fn size_class_table() {
    let masses: Vec<f64> = SizeClass::ALL.iter().map(|s| s.mass()).collect();
    assert_eq!(masses, vec![8.0, 15.0, 25.0, 35.0]);
    assert_eq!(SizeClass::Medium.radius(), 7.5);
}

#[test]
fn size_class_weighted_draw() {
    assert_eq!(SizeClass::from_unit(0.0), SizeClass::Small);
    assert_eq!(SizeClass::from_unit(0.39), SizeClass::Small);
    assert_eq!(SizeClass::from_unit(0.5), SizeClass::Medium);
    assert_eq!(SizeClass::from_unit(0.85), SizeClass::Large);
    assert_eq!(SizeClass::from_unit(0.95), SizeClass::ExtraLarge);
}

// ==================================================================================
// Collision tests
// ==================================================================================

#[test]
fn equal_mass_head_on_swaps_velocities() {
    let mut a = particle(0, SizeClass::Medium, [100.0, 100.0], [2.0, 0.0]);
    let mut b = particle(1, SizeClass::Medium, [108.0, 100.0], [-2.0, 0.0]);

    assert!(resolve_pair(&mut a, &mut b));

    assert_close(a.v.x, -2.0, 1e-12);
    assert_close(b.v.x, 2.0, 1e-12);
    assert_close(a.v.y, 0.0, 1e-12);
    assert_close(b.v.y, 0.0, 1e-12);
}

#[test]
fn collision_conserves_momentum() {
    let mut a = particle(0, SizeClass::Small, [100.0, 100.0], [3.0, 1.0]);
    let mut b = particle(1, SizeClass::ExtraLarge, [90.0, 95.0], [-1.0, 0.5]);

    let before = a.mass() * a.v + b.mass() * b.v;
    assert!(resolve_pair(&mut a, &mut b));
    let after = a.mass() * a.v + b.mass() * b.v;

    assert!((after - before).norm() < 1e-9, "momentum changed: {:?} -> {:?}", before, after);
}

#[test]
fn collision_separates_overlap() {
    let mut a = particle(0, SizeClass::Medium, [100.0, 100.0], [1.0, 0.0]);
    let mut b = particle(1, SizeClass::Medium, [108.0, 100.0], [-1.0, 0.0]);

    resolve_pair(&mut a, &mut b);

    let gap = (a.center() - b.center()).norm();
    assert_close(gap, a.radius() + b.radius(), 1e-9);
}

#[test]
fn separating_pair_is_left_alone() {
    let mut a = particle(0, SizeClass::Medium, [100.0, 100.0], [-2.0, 0.0]);
    let mut b = particle(1, SizeClass::Medium, [108.0, 100.0], [2.0, 0.0]);

    assert!(!resolve_pair(&mut a, &mut b));
    assert_eq!(a.v, NVec2::new(-2.0, 0.0));
    assert_eq!(b.x, NVec2::new(108.0, 100.0));
}

#[test]
fn coincident_centres_are_skipped() {
    let mut a = particle(0, SizeClass::Large, [50.0, 50.0], [1.0, 0.0]);
    let mut b = particle(1, SizeClass::Large, [50.0, 50.0], [-1.0, 0.0]);

    assert!(!resolve_pair(&mut a, &mut b));
}

#[test]
fn pair_pass_skips_dragged_members() {
    let mut field = Field {
        particles: vec![
            particle(0, SizeClass::Medium, [100.0, 100.0], [2.0, 0.0]),
            particle(1, SizeClass::Medium, [108.0, 100.0], [-2.0, 0.0]),
        ],
        t: 0.0,
    };
    field.particles[1].drag = pfield::DragState::Dragging {
        offset: NVec2::zeros(),
        fling: NVec2::zeros(),
    };

    let contacts = resolve_collisions(&mut field);

    assert!(contacts.is_empty());
    assert_eq!(field.particles[0].v, NVec2::new(2.0, 0.0));
}

// ==================================================================================
// Force tests
// ==================================================================================

fn pointer_force(mode: InteractionMode, pointer: NVec2, p: &Particle) -> NVec2 {
    let forces = ForceSet::new().with(PointerInteraction {
        radius: 150.0,
        max_force: 0.5,
    });
    let field = Field {
        particles: vec![p.clone()],
        t: 0.0,
    };
    let mut out = vec![NVec2::zeros(); 1];
    forces.accumulate(&ForceContext { pointer: Some(pointer), mode }, &field, &mut out);
    out[0]
}

#[test]
fn repulsion_pushes_away_with_linear_falloff() {
    let p = particle(0, SizeClass::Medium, [92.5, 92.5], [0.0, 0.0]); // centre (100, 100)
    let f = pointer_force(InteractionMode::Repulsion, NVec2::new(175.0, 100.0), &p);

    // d = 75 -> 0.5 * (150 - 75) / 150 = 0.25, pointing to -x
    assert_close(f.x, -0.25, 1e-12);
    assert_close(f.y, 0.0, 1e-12);
}

#[test]
fn attraction_pulls_toward_pointer() {
    let p = particle(0, SizeClass::Medium, [92.5, 92.5], [0.0, 0.0]);
    let f = pointer_force(InteractionMode::Attraction, NVec2::new(100.0, 130.0), &p);

    assert!(f.y > 0.0 && f.x.abs() < 1e-12, "not toward pointer: {:?}", f);
}

#[test]
fn pointer_out_of_range_or_on_centre_has_no_effect() {
    let p = particle(0, SizeClass::Medium, [92.5, 92.5], [0.0, 0.0]);

    assert_eq!(pointer_force(InteractionMode::Repulsion, NVec2::new(400.0, 100.0), &p), NVec2::zeros());
    assert_eq!(pointer_force(InteractionMode::Repulsion, NVec2::new(100.0, 100.0), &p), NVec2::zeros());
}

#[test]
fn toggling_mode_twice_restores_force_direction() {
    let p = particle(0, SizeClass::Large, [200.0, 200.0], [0.0, 0.0]);
    let pointer = NVec2::new(250.0, 180.0);
    let mode = InteractionMode::Repulsion;

    let original = pointer_force(mode, pointer, &p);
    let flipped = pointer_force(mode.toggled(), pointer, &p);
    let restored = pointer_force(mode.toggled().toggled(), pointer, &p);

    assert!((original + flipped).norm() < 1e-12, "single toggle should flip the sign");
    assert_eq!(original, restored);

    let (mut sim, _input) = test_sim(5);
    let start = sim.mode();
    sim.toggle_interaction_mode();
    assert_ne!(sim.mode(), start);
    sim.toggle_interaction_mode();
    assert_eq!(sim.mode(), start);
}

#[test]
fn radial_impulse_scales_with_distance() {
    let mut field = Field {
        particles: vec![
            particle(0, SizeClass::Medium, [292.5, 192.5], [0.0, 0.0]), // centre (300, 200), d = 100
            particle(1, SizeClass::Medium, [592.5, 192.5], [0.0, 0.0]), // d = 400
        ],
        t: 0.0,
    };

    let pushed = radial_impulse(&mut field, NVec2::new(200.0, 200.0), 200.0, 3.0);

    assert_eq!(pushed, 1);
    assert_close(field.particles[0].v.x, 1.5, 1e-12);
    assert_eq!(field.particles[1].v, NVec2::zeros());
}

#[test]
fn radial_impulse_clamps_negative_radius() {
    let mut field = Field {
        particles: vec![particle(0, SizeClass::Small, [100.0, 100.0], [0.0, 0.0])],
        t: 0.0,
    };

    assert_eq!(radial_impulse(&mut field, NVec2::new(101.0, 101.0), -50.0, 3.0), 0);
    assert_eq!(field.particles[0].v, NVec2::zeros());
}

#[test]
fn radial_impulse_skips_particle_centred_on_the_pulse() {
    let mut field = Field {
        particles: vec![particle(0, SizeClass::Medium, [192.5, 192.5], [1.0, -1.0])], // centre (200, 200)
        t: 0.0,
    };

    assert_eq!(radial_impulse(&mut field, NVec2::new(200.0, 200.0), 200.0, 3.0), 0);
    assert_eq!(field.particles[0].v, NVec2::new(1.0, -1.0));
}

// ==================================================================================
// Simulator tests
// ==================================================================================

#[test]
fn free_particle_integrates_damps_and_falls() {
    let (mut sim, _input) = test_sim(5);
    let id = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(400.0, 300.0)), Some(NVec2::new(1.0, 0.0))).unwrap();

    sim.tick(1.0 / 60.0);

    let p = sim.particle(id).unwrap();
    assert_eq!(p.x, NVec2::new(401.0, 300.0));
    assert_close(p.v.x, 0.995, 1e-12);
    assert_close(p.v.y, 0.005, 1e-12);
}

#[test]
fn boundary_bounce_clamps_and_damps() {
    let (mut sim, _input) = test_sim(5);
    let id = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(0.5, 300.0)), Some(NVec2::new(-2.0, 0.0))).unwrap();

    sim.tick(1.0 / 60.0);

    let p = sim.particle(id).unwrap();
    assert_eq!(p.x.x, 0.0);
    // reflected with restitution, then damped
    assert_close(p.v.x, 2.0 * 0.8 * 0.995, 1e-12);
}

#[test]
fn settled_particle_gets_a_kick() {
    let (mut sim, _input) = test_sim(5);
    let id = sim.spawn(Some(SizeClass::Small), Some(NVec2::new(400.0, 300.0)), Some(NVec2::zeros())).unwrap();

    sim.tick(1.0 / 60.0);

    let v = sim.particle(id).unwrap().v;
    assert_ne!(v, NVec2::new(0.0, 0.005));
    assert!(v.x.abs() <= 0.1 && (v.y - 0.005).abs() <= 0.1);
}

#[test]
fn particles_stay_in_bounds() {
    let (mut sim, input) = test_sim(15);
    for i in 0..25 {
        let v = NVec2::new(((i * 7) % 11) as f64 * 3.0 - 15.0, ((i * 5) % 13) as f64 * 3.0 - 18.0);
        sim.spawn(None, None, Some(v));
    }

    for frame in 0..3000 {
        let t = frame as f64 * 0.01;
        input.set_pointer(Some(NVec2::new(400.0 + 300.0 * t.cos(), 300.0 + 200.0 * t.sin())));
        if frame % 500 == 0 {
            sim.toggle_interaction_mode();
            sim.click(NVec2::new(400.0, 300.0));
        }
        sim.tick(1.0 / 60.0);
        assert_in_bounds(&sim);
    }
}

#[test]
fn spawn_at_hard_cap_is_noop() {
    let (mut sim, _input) = test_sim(3);
    assert_eq!(sim.engine().hard_cap(), 6);

    for _ in 0..6 {
        assert!(sim.spawn(None, None, None).is_some());
    }
    assert!(sim.spawn(Some(SizeClass::Small), Some(NVec2::new(10.0, 10.0)), None).is_none());
    assert!(sim.double_click(NVec2::new(500.0, 500.0)).is_none());
    assert_eq!(sim.len(), 6);
}

#[test]
fn double_click_spawns_at_point_up_to_hard_cap() {
    let (mut sim, _input) = test_sim(2);
    let at = NVec2::new(300.0, 300.0);

    let id = sim.double_click(at).unwrap();
    let p = sim.particle(id).unwrap();
    assert!((p.center() - at).norm() < 1e-9);
    assert!(p.v.x.abs() <= 4.0 && p.v.y.abs() <= 4.0);
    assert!(sim.effects().iter().any(|e| e.kind == EffectKind::Ripple));

    // On top of an existing particle -> ignored
    assert!(sim.double_click(at).is_none());

    let spots = [NVec2::new(100.0, 100.0), NVec2::new(200.0, 500.0), NVec2::new(600.0, 100.0), NVec2::new(700.0, 500.0)];
    let created = spots.iter().filter(|&&s| sim.double_click(s).is_some()).count();
    assert_eq!(created, 3);
    assert_eq!(sim.len(), 4);
}

#[test]
fn dragged_particle_is_untouched_by_tick() {
    let (mut sim, input) = test_sim(5);
    let dragged = sim.spawn(Some(SizeClass::Large), Some(NVec2::new(300.0, 300.0)), Some(NVec2::new(3.0, -1.0))).unwrap();
    // Overlapping free neighbour heading straight into it
    sim.spawn(Some(SizeClass::Large), Some(NVec2::new(310.0, 300.0)), Some(NVec2::new(-3.0, 0.0)));

    assert!(sim.begin_drag(dragged, NVec2::new(310.0, 310.0)));
    input.set_pointer(Some(NVec2::new(330.0, 320.0)));

    for _ in 0..120 {
        sim.tick(1.0 / 60.0);
        let p = sim.particle(dragged).unwrap();
        assert_eq!(p.x, NVec2::new(300.0, 300.0));
        assert_eq!(p.v, NVec2::zeros());
        assert!(p.is_dragging());
    }
}

#[test]
fn drag_release_flings_with_pointer_velocity() {
    let (mut sim, _input) = test_sim(5);
    let id = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(100.0, 100.0)), Some(NVec2::new(5.0, 5.0))).unwrap();

    assert!(sim.begin_drag(id, NVec2::new(107.5, 107.5)));
    assert_eq!(sim.particle(id).unwrap().v, NVec2::zeros());

    sim.update_drag(id, NVec2::new(117.5, 107.5));
    assert_eq!(sim.particle(id).unwrap().x, NVec2::new(110.0, 100.0));
    sim.update_drag(id, NVec2::new(127.5, 107.5));
    assert_eq!(sim.particle(id).unwrap().x, NVec2::new(120.0, 100.0));

    sim.end_drag(id);

    let p = sim.particle(id).unwrap();
    assert!(!p.is_dragging());
    // (120 - 100) * 0.5
    assert_eq!(p.v, NVec2::new(10.0, 0.0));
    assert!(sim.effects().iter().any(|e| matches!(e.kind, EffectKind::Trail { .. })));
    assert!(sim.effects().iter().any(|e| e.kind == EffectKind::Ripple));
}

#[test]
fn drag_operations_ignore_unknown_or_free_particles() {
    let (mut sim, _input) = test_sim(5);
    let id = sim.spawn(Some(SizeClass::Small), Some(NVec2::new(50.0, 50.0)), Some(NVec2::new(1.0, 1.0))).unwrap();

    assert!(!sim.begin_drag(ParticleId(999), NVec2::new(0.0, 0.0)));
    sim.update_drag(id, NVec2::new(300.0, 300.0));
    sim.end_drag(id);

    let p = sim.particle(id).unwrap();
    assert_eq!(p.x, NVec2::new(50.0, 50.0));
    assert_eq!(p.v, NVec2::new(1.0, 1.0));
}

#[test]
fn click_in_empty_space_repels_neighbours() {
    let (mut sim, _input) = test_sim(5);
    let id = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(292.5, 192.5)), Some(NVec2::zeros())).unwrap();

    // On the particle itself -> nothing
    assert_eq!(sim.click(NVec2::new(300.0, 200.0)), 0);

    assert_eq!(sim.click(NVec2::new(200.0, 200.0)), 1);
    assert_close(sim.particle(id).unwrap().v.x, 1.5, 1e-12);
}

#[test]
fn pause_freezes_and_resume_continues() {
    let (mut sim, _input) = test_sim(5);
    let id = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(400.0, 300.0)), Some(NVec2::new(2.0, 0.0))).unwrap();

    sim.pause();
    assert!(!sim.is_running());
    for _ in 0..10 {
        sim.tick(1.0 / 60.0);
    }
    assert_eq!(sim.particle(id).unwrap().x, NVec2::new(400.0, 300.0));
    assert_eq!(sim.time(), 0.0);

    sim.resume();
    sim.tick(1.0 / 60.0);
    assert_eq!(sim.particle(id).unwrap().x, NVec2::new(402.0, 300.0));
}

#[test]
fn resize_reclamps_into_new_viewport() {
    let (mut sim, input) = test_sim(5);
    let id = sim.spawn(Some(SizeClass::Large), Some(NVec2::new(700.0, 500.0)), Some(NVec2::zeros())).unwrap();

    input.set_viewport(NVec2::new(400.0, 300.0));
    sim.resize();

    assert_eq!(sim.particle(id).unwrap().x, NVec2::new(375.0, 275.0));
    assert_in_bounds(&sim);
}

#[test]
fn startup_spawns_are_staggered() {
    let input = SharedInput::new(NVec2::new(W, H));
    let mut engine = test_engine(5);
    engine.initial_spawn_count = 5;
    let mut sim = Simulator::new(engine, Parameters::default(), input.clone(), input, Some(1));

    sim.tick(0.0);
    assert_eq!(sim.len(), 1);
    sim.tick(0.29);
    assert_eq!(sim.len(), 1);
    sim.tick(0.02);
    assert_eq!(sim.len(), 2);
    sim.tick(10.0);
    assert_eq!(sim.len(), 5);
    assert_eq!(sim.pending_spawns(), 0);
}

#[test]
fn small_viewport_lowers_particle_cap() {
    let input = SharedInput::new(NVec2::new(600.0, 800.0));
    let mut engine = test_engine(15);
    engine.small_viewport_width = 768.0;
    engine.small_viewport_max_particles = 8;
    engine.initial_spawn_count = 15;

    let sim = Simulator::new(engine, Parameters::default(), input.clone(), input, Some(1));

    assert_eq!(sim.engine().max_particles, 8);
    assert_eq!(sim.engine().hard_cap(), 16);
    assert_eq!(sim.pending_spawns(), 8);
}

#[test]
fn effects_expire_with_the_clock() {
    let (mut sim, _input) = test_sim(5);
    sim.click(NVec2::new(100.0, 100.0));
    sim.toggle_interaction_mode();
    assert_eq!(sim.effects().len(), 2);

    sim.tick(0.7);
    assert_eq!(sim.effects().len(), 1);
    assert!(matches!(sim.effects()[0].kind, EffectKind::ModeIndicator(InteractionMode::Attraction)));

    sim.tick(1.5);
    assert!(sim.effects().is_empty());
}

#[test]
fn glow_tracks_pointer_proximity() {
    let (mut sim, input) = test_sim(5);
    let near = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(392.5, 292.5)), Some(NVec2::new(0.0, 0.0))).unwrap();
    let far = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(50.0, 50.0)), Some(NVec2::new(0.0, 0.0))).unwrap();

    input.set_pointer(Some(NVec2::new(475.0, 300.0)));
    sim.tick(1.0 / 60.0);

    assert_close(sim.particle(near).unwrap().glow, 0.5, 1e-9);
    assert_eq!(sim.particle(far).unwrap().glow, 0.0);
}

#[test]
fn teardown_clears_everything() {
    let (mut sim, _input) = test_sim(5);
    sim.spawn(None, None, None);
    sim.click(NVec2::new(10.0, 10.0));

    sim.teardown();

    assert!(sim.is_empty());
    assert!(sim.effects().is_empty());
    assert!(!sim.is_running());
}

#[test]
fn stats_sum_momentum_and_energy() {
    let (mut sim, _input) = test_sim(5);
    sim.spawn(Some(SizeClass::Small), Some(NVec2::new(10.0, 10.0)), Some(NVec2::new(1.0, 0.0)));
    sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(200.0, 10.0)), Some(NVec2::new(0.0, 2.0)));

    let stats = sim.stats();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.momentum, NVec2::new(8.0, 30.0));
    assert_close(stats.kinetic_energy, 0.5 * 8.0 + 0.5 * 15.0 * 4.0, 1e-12);
}

#[test]
fn hit_test_prefers_the_smaller_particle_drawn_on_top() {
    let (mut sim, _input) = test_sim(5);
    let small = sim.spawn(Some(SizeClass::Small), Some(NVec2::new(100.0, 100.0)), Some(NVec2::zeros())).unwrap();
    // Spawned later and overlapping the small one, centre (107.5, 107.5)
    let large = sim.spawn(Some(SizeClass::ExtraLarge), Some(NVec2::new(90.0, 90.0)), Some(NVec2::zeros())).unwrap();

    assert_eq!(sim.particle_at(NVec2::new(104.0, 104.0)), Some(small));
    assert_eq!(sim.particle_at(NVec2::new(115.0, 115.0)), Some(large));
    assert_eq!(sim.particle_at(NVec2::new(400.0, 400.0)), None);

    // Equal sizes: the later one is on top
    let first = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(300.0, 300.0)), Some(NVec2::zeros())).unwrap();
    let second = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(305.0, 300.0)), Some(NVec2::zeros())).unwrap();
    assert_ne!(first, second);
    assert_eq!(sim.particle_at(NVec2::new(310.0, 307.5)), Some(second));
}

#[test]
fn effects_stay_bounded_when_the_clock_stalls() {
    let (mut sim, input) = test_sim(5);
    let id = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(100.0, 100.0)), Some(NVec2::zeros())).unwrap();
    sim.toggle_interaction_mode();
    assert!(sim.begin_drag(id, NVec2::new(107.5, 107.5)));

    for i in 0..1000 {
        let at = NVec2::new(107.5 + (i % 200) as f64, 107.5 + (i % 50) as f64);
        input.set_pointer(Some(at));
        sim.update_drag(id, at);
        sim.tick(0.0);
        assert!(sim.effects().len() <= MAX_LIVE_EFFECTS);
    }

    assert_eq!(sim.effects().len(), MAX_LIVE_EFFECTS);
    // Trails are evicted before the mode banner
    assert!(sim.effects().iter().any(|e| matches!(e.kind, EffectKind::ModeIndicator(_))));
}

// ==================================================================================
// Non-finite input
// ==================================================================================

#[test]
fn negative_or_nan_dt_skips_the_frame() {
    let (mut sim, _input) = test_sim(5);
    let id = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(400.0, 300.0)), Some(NVec2::new(1.0, 0.0))).unwrap();
    sim.click(NVec2::new(100.0, 100.0));
    let effects = sim.effects().len();

    for dt in [f64::NAN, -5.0, f64::INFINITY, f64::NEG_INFINITY] {
        sim.tick(dt);
    }

    assert_eq!(sim.time(), 0.0);
    assert_eq!(sim.effects().len(), effects);
    let p = sim.particle(id).unwrap();
    assert_eq!(p.x, NVec2::new(400.0, 300.0));
    assert_eq!(p.v, NVec2::new(1.0, 0.0));
}

#[test]
fn spawn_replaces_non_finite_position_and_velocity() {
    let (mut sim, _input) = test_sim(5);
    let nan = NVec2::new(f64::NAN, 10.0);
    let inf = NVec2::new(0.0, f64::INFINITY);

    let id = sim.spawn(Some(SizeClass::Large), Some(nan), Some(inf)).unwrap();

    let p = sim.particle(id).unwrap();
    assert!(p.x.iter().all(|c| c.is_finite()));
    assert!(p.v.iter().all(|c| c.is_finite()));
    // initial_speed 2 → each axis in [-1, 1)
    assert!(p.v.x.abs() <= 1.0 && p.v.y.abs() <= 1.0);
    assert_in_bounds(&sim);
}

#[test]
fn pointer_operations_ignore_nan_coordinates() {
    let (mut sim, _input) = test_sim(5);
    let nan = NVec2::new(f64::NAN, f64::NAN);
    let id = sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(100.0, 100.0)), Some(NVec2::new(1.0, 1.0))).unwrap();

    assert!(!sim.begin_drag(id, nan));
    assert!(!sim.particle(id).unwrap().is_dragging());
    assert_eq!(sim.apply_impulse(nan, 200.0, 3.0), 0);
    assert_eq!(sim.click(nan), 0);
    assert!(sim.double_click(nan).is_none());

    assert!(sim.begin_drag(id, NVec2::new(107.5, 107.5)));
    sim.update_drag(id, nan);
    sim.update_drag(id, NVec2::new(f64::INFINITY, 107.5));

    let p = sim.particle(id).unwrap();
    assert_eq!(p.x, NVec2::new(100.0, 100.0));
    assert_eq!(p.drag, DragState::Dragging { offset: NVec2::new(7.5, 7.5), fling: NVec2::zeros() });
    assert_eq!(sim.len(), 1);
    assert!(sim.effects().is_empty());
}

#[test]
fn nan_pointer_acts_like_no_pointer() {
    let (mut with_nan, nan_input) = test_sim(5);
    let (mut without, _input) = test_sim(5);
    for sim in [&mut with_nan, &mut without] {
        sim.spawn(Some(SizeClass::Medium), Some(NVec2::new(392.5, 292.5)), Some(NVec2::new(0.5, 0.0)));
    }

    nan_input.set_pointer(Some(NVec2::new(f64::NAN, 300.0)));
    for _ in 0..10 {
        with_nan.tick(1.0 / 60.0);
        without.tick(1.0 / 60.0);
    }

    let (a, b) = (&with_nan.particles()[0], &without.particles()[0]);
    assert_eq!(a.x, b.x);
    assert_eq!(a.v, b.v);
    assert_eq!(a.glow, 0.0);
    assert!(with_nan.effects().is_empty());
}

// ==================================================================================
// Scenario tests
// ==================================================================================

#[test]
fn scenario_from_yaml_places_explicit_particles() {
    let yaml = r#"
engine:
  max_particles: 4
  attraction_mode: true
  seed: 3
  viewport: [ 1024.0, 768.0 ]
particles:
  - size: medium
    x: [ 100.0, 100.0 ]
    v: [ 2.0, 0.0 ]
  - size: large
    x: [ 300.0, 100.0 ]
"#;
    let cfg = ScenarioConfig::from_yaml_str(yaml).unwrap();
    let mut scenario = Scenario::build_scenario(cfg);

    assert_eq!(scenario.simulator.len(), 2);
    assert_eq!(scenario.simulator.mode(), InteractionMode::Attraction);
    // Configured mode is not announced like a toggle
    assert!(scenario.simulator.effects().is_empty());
    assert_eq!(scenario.simulator.pending_spawns(), 0);
    assert_eq!(scenario.simulator.particles()[0].v, NVec2::new(2.0, 0.0));

    // The shared handle drives the simulator's viewport
    scenario.input.set_viewport(NVec2::new(200.0, 150.0));
    scenario.simulator.resize();
    assert_in_bounds(&scenario.simulator);
}
