use bevy::input::touch::{Touch, Touches};
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::math::primitives::Circle;
use bevy::window::{PrimaryWindow, WindowOccluded, WindowResized};

use crate::simulation::effects::{EffectKind, RIPPLE_RADIUS};
use crate::simulation::forces::InteractionMode;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{NVec2, ParticleId, SizeClass};

/// Component tagging each circle with the particle it draws
#[derive(Component)]
struct ParticleSprite(pub ParticleId);

/// Pointer bookkeeping between frames
#[derive(Resource, Default)]
struct PointerTracker {
    dragging: Option<ParticleId>,
    last_click: Option<(f64, NVec2)>,
    last_cursor: Option<NVec2>,
    touch: Option<(u64, ParticleId)>, // finger id and the particle it holds
}

/// Two presses closer than this (seconds, pixels) count as a double-click
const DOUBLE_CLICK_TIME: f64 = 0.3;
const DOUBLE_CLICK_SLOP: f64 = 6.0;

pub fn run_2d(scenario: Scenario) {
    let viewport = scenario.simulator.viewport();
    ::log::info!("run_2d: starting Bevy 2D viewer, {:.0}x{:.0}", viewport.x, viewport.y);

    App::new()
        .insert_resource(scenario)
        .init_resource::<PointerTracker>()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "pfield".into(),
                        resolution: (viewport.x as f32, viewport.y as f32).into(),
                        ..Default::default()
                    }),
                    ..Default::default()
                })
                // The binary owns the global logger
                .disable::<LogPlugin>(),
        )
        .add_systems(Startup, setup_camera_system)
        .add_systems(
            Update,
            (
                window_events_system,
                pointer_input_system,
                touch_input_system,
                keyboard_input_system,
                physics_step_system,
                sync_sprites_system,
                draw_effects_system,
            )
                .chain(),
        )
        .run();
}

fn setup_camera_system(mut commands: Commands) {
    commands.spawn(Camera2dBundle::default());
}

/// Resize → reclamp, occlusion → pause/resume
fn window_events_system(
    mut scenario: ResMut<Scenario>,
    mut resized: EventReader<WindowResized>,
    mut occluded: EventReader<WindowOccluded>,
) {
    if let Some(ev) = resized.read().last() {
        scenario.input.set_viewport(NVec2::new(ev.width as f64, ev.height as f64));
        scenario.simulator.resize();
    }
    if let Some(ev) = occluded.read().last() {
        if ev.occluded {
            scenario.simulator.pause();
        } else {
            scenario.simulator.resume();
        }
    }
}

fn pointer_input_system(
    mut scenario: ResMut<Scenario>,
    mut tracker: ResMut<PointerTracker>,
    windows: Query<&Window, With<PrimaryWindow>>,
    buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };

    // Window cursor coordinates are already top-left origin, y down
    let cursor = window.cursor_position().map(|c| NVec2::new(c.x as f64, c.y as f64));
    scenario.input.set_pointer(cursor);

    if buttons.just_pressed(MouseButton::Left) {
        if let Some(at) = cursor {
            match scenario.simulator.particle_at(at) {
                Some(id) => {
                    if scenario.simulator.begin_drag(id, at) {
                        tracker.dragging = Some(id);
                    }
                }
                None => {
                    let now = time.elapsed_seconds_f64();
                    scenario.simulator.click(at);
                    let is_double = matches!(
                        tracker.last_click,
                        Some((t, p)) if now - t < DOUBLE_CLICK_TIME && (p - at).norm() < DOUBLE_CLICK_SLOP
                    );
                    if is_double {
                        scenario.simulator.double_click(at);
                        tracker.last_click = None;
                    } else {
                        tracker.last_click = Some((now, at));
                    }
                }
            }
        }
    }

    if let Some(id) = tracker.dragging {
        if buttons.pressed(MouseButton::Left) {
            if let Some(at) = cursor.filter(|at| tracker.last_cursor != Some(*at)) {
                scenario.simulator.update_drag(id, at);
            }
        } else {
            scenario.simulator.end_drag(id);
            tracker.dragging = None;
        }
    }

    tracker.last_cursor = cursor;
}

/// Touch mirrors the mouse drag: the first finger down on a particle grabs it,
/// and lifting (or cancelling) that finger flings it.
fn touch_input_system(mut scenario: ResMut<Scenario>, mut tracker: ResMut<PointerTracker>, touches: Res<Touches>) {
    // Any finger on the screen steers the pointer force
    if let Some(touch) = touches.iter().next() {
        scenario.input.set_pointer(Some(touch_point(touch)));
    }

    if tracker.touch.is_none() {
        if let Some(touch) = touches.iter_just_pressed().next() {
            let at = touch_point(touch);
            if let Some(id) = scenario.simulator.particle_at(at) {
                if scenario.simulator.begin_drag(id, at) {
                    tracker.touch = Some((touch.id(), id));
                }
            }
        }
    }

    let Some((finger, id)) = tracker.touch else {
        return;
    };
    match touches.get_pressed(finger) {
        Some(touch) if !touches.just_released(finger) && !touches.just_canceled(finger) => {
            let at = touch_point(touch);
            scenario.input.set_pointer(Some(at));
            if touch.delta() != Vec2::ZERO {
                scenario.simulator.update_drag(id, at);
            }
        }
        _ => {
            scenario.simulator.end_drag(id);
            tracker.touch = None;
        }
    }
}

fn keyboard_input_system(mut scenario: ResMut<Scenario>, keys: Res<ButtonInput<KeyCode>>) {
    if keys.just_pressed(KeyCode::Space) {
        scenario.simulator.toggle_interaction_mode();
    }
}

fn physics_step_system(mut scenario: ResMut<Scenario>, time: Res<Time>) {
    scenario.simulator.tick(time.delta_seconds_f64());
}

/// Spawn circles for new particles, move and tint the existing ones
fn sync_sprites_system(
    mut commands: Commands,
    scenario: Res<Scenario>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut query: Query<(Entity, &ParticleSprite, &mut Transform, &Handle<ColorMaterial>)>,
) {
    let sim = &scenario.simulator;
    let viewport = sim.viewport();
    let mode = sim.mode();
    let mut drawn = Vec::with_capacity(sim.len());

    for (entity, ParticleSprite(id), mut transform, material) in &mut query {
        let Some(p) = sim.particle(*id) else {
            commands.entity(entity).despawn();
            continue;
        };
        transform.translation = to_world(p.center(), viewport).extend(depth(p.size));
        if let Some(m) = materials.get_mut(material) {
            m.color = particle_color(p.size, p.glow, mode, p.is_dragging());
        }
        drawn.push(*id);
    }

    for p in sim.particles().iter().filter(|p| !drawn.contains(&p.id)) {
        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(p.radius() as f32))),
                material: materials.add(ColorMaterial::from(particle_color(p.size, p.glow, mode, false))),
                transform: Transform::from_translation(to_world(p.center(), viewport).extend(depth(p.size))),
                ..Default::default()
            },
            ParticleSprite(p.id),
        ));
    }
}

fn draw_effects_system(scenario: Res<Scenario>, mut gizmos: Gizmos) {
    let viewport = scenario.simulator.viewport();

    for e in scenario.simulator.effects() {
        let fade = 1.0 - e.progress() as f32;
        let at = to_world(e.at, viewport);
        match e.kind {
            EffectKind::Ripple => {
                let radius = (RIPPLE_RADIUS * e.progress()) as f32;
                gizmos.circle_2d(at, radius.max(1.0), Color::srgba(1.0, 1.0, 1.0, 0.6 * fade));
            }
            EffectKind::Trail { diameter } => {
                gizmos.circle_2d(at, 0.5 * diameter as f32, Color::srgba(0.6, 0.8, 1.0, 0.5 * fade));
            }
            EffectKind::PointerTrail => {
                gizmos.circle_2d(at, 3.0, Color::srgba(1.0, 1.0, 1.0, 0.4 * fade));
            }
            EffectKind::ModeIndicator(mode) => {
                // Badge in the top-right corner
                let corner = to_world(NVec2::new(viewport.x - 40.0, 40.0), viewport);
                let [r, g, b] = mode_tint(mode);
                gizmos.circle_2d(corner, 14.0, Color::srgba(r, g, b, fade));
            }
        }
    }
}

// Touch positions share the cursor's window coordinates
fn touch_point(touch: &Touch) -> NVec2 {
    let p = touch.position();
    NVec2::new(p.x as f64, p.y as f64)
}

/// Screen pixels (top-left origin, y down) to world units (centre origin, y up)
fn to_world(p: NVec2, viewport: NVec2) -> Vec2 {
    Vec2::new((p.x - 0.5 * viewport.x) as f32, (0.5 * viewport.y - p.y) as f32)
}

// Larger particles draw underneath smaller ones
fn depth(size: SizeClass) -> f32 {
    1.0 - size.radius() as f32 * 0.01
}

fn mode_tint(mode: InteractionMode) -> [f32; 3] {
    match mode {
        InteractionMode::Attraction => [0.3, 0.5, 1.0],
        InteractionMode::Repulsion => [1.0, 0.35, 0.3],
    }
}

fn particle_color(size: SizeClass, glow: f64, mode: InteractionMode, dragging: bool) -> Color {
    if dragging {
        return Color::srgb(1.0, 0.9, 0.4);
    }
    let base = match size {
        SizeClass::Small => [0.85, 0.85, 0.95],
        SizeClass::Medium => [0.7, 0.75, 0.95],
        SizeClass::Large => [0.55, 0.65, 0.9],
        SizeClass::ExtraLarge => [0.45, 0.55, 0.85],
    };
    let tint = mode_tint(mode);
    let k = (glow.clamp(0.0, 1.0) * 0.7) as f32;
    Color::srgb(
        base[0] + (tint[0] - base[0]) * k,
        base[1] + (tint[1] - base[1]) * k,
        base[2] + (tint[2] - base[2]) * k,
    )
}
