use bevy::math::primitives::{Cuboid, Sphere};
use bevy::prelude::*;

use crate::simulation::render::NullRender;
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{Body, System};

/// Component tagging each sphere with its body's stable id. Ids survive the
/// index reshuffle that follows a cull, so the entity keeps tracking the same
/// body.
#[derive(Component)]
struct BodyMarker {
    id: u64,
}

/// World-space → screen-space scaling factor for positions and radii
const SCALE3D: f32 = 1.0;

/// Distance of the camera from the origin along +Z
const CAMERA_DISTANCE: f32 = 1500.0;

/// Viewer entrypoint: one physics tick per frame, spheres synced afterwards.
pub fn run_3d(scenario: Scenario) {
    println!(
        "run_3d: starting Bevy 3D viewer with {} bodies",
        scenario.system.bodies.len()
    );

    App::new()
        .insert_resource(scenario)
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_3d)
        .add_systems(
            Update,
            (keyboard_control, physics_step_3d, rebuild_on_reset, sync_transforms_3d).chain(),
        )
        .run();
}

/// Startup system: spawn camera, light, axes, and one sphere per body
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario>,
) {
    // Simple 3D camera looking at the origin
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.0, 0.0, 0.0)), // pure black
            ..Default::default()
        },
        transform: Transform::from_xyz(200.0, 150.0, CAMERA_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    // Basic point light
    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 1500.0,
            range: 1000.0,
            ..Default::default()
        },
        transform: Transform::from_xyz(100.0, 100.0, CAMERA_DISTANCE),
        ..Default::default()
    });

    spawn_axes(&mut commands, &mut meshes, &mut materials);

    spawn_body_entities(&mut commands, &mut meshes, &mut materials, &scenario.system);
}

/// Spawn one unit sphere per body; radius is applied through the transform
/// scale so merge growth shows up without a mesh rebuild.
fn spawn_body_entities(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    system: &System,
) {
    for b in system.bodies.iter() {
        let radius_screen = (b.radius as f32).max(0.02) * SCALE3D;

        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Sphere::new(1.0).mesh()),
                material: materials.add(StandardMaterial {
                    base_color: color_of(b),
                    unlit: true,
                    ..Default::default()
                }),
                transform: Transform::from_xyz(
                    (b.x.x as f32) * SCALE3D,
                    (b.x.y as f32) * SCALE3D,
                    (b.x.z as f32) * SCALE3D,
                )
                .with_scale(Vec3::splat(radius_screen)),
                ..Default::default()
            },
            BodyMarker { id: b.id },
        ));
    }
}

/// Space toggles the pause flag; R restarts the scenario with a fresh
/// placement.
fn keyboard_control(keys: Res<ButtonInput<KeyCode>>, mut scenario: ResMut<Scenario>) {
    if keys.just_pressed(KeyCode::Space) {
        scenario.system.paused = !scenario.system.paused;
    }
    if keys.just_pressed(KeyCode::KeyR) {
        scenario.start_over();
    }
}

/// Per-frame physics tick; dt comes from the frame clock.
fn physics_step_3d(time: Res<Time>, mut scenario: ResMut<Scenario>) {
    let dt = time.delta_seconds() as f64;
    scenario.advance(dt, &mut NullRender);
}

/// After a reset the whole body set is new, so tear down every sphere and
/// respawn from the fresh system.
fn rebuild_on_reset(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario>,
    query: Query<Entity, With<BodyMarker>>,
    mut seen_generation: Local<u64>,
) {
    if scenario.system.generation == *seen_generation {
        return;
    }
    *seen_generation = scenario.system.generation;

    for entity in &query {
        commands.entity(entity).despawn();
    }
    spawn_body_entities(&mut commands, &mut meshes, &mut materials, &scenario.system);
}

/// Sync sphere transforms and colors from the committed physics state.
/// Entities whose body has been culled are despawned here, one frame after
/// the body's final draw.
fn sync_transforms_3d(
    mut commands: Commands,
    scenario: Res<Scenario>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut query: Query<(Entity, &BodyMarker, &mut Transform, &Handle<StandardMaterial>)>,
) {
    let bodies = &scenario.system.bodies;

    for (entity, marker, mut transform, mat_handle) in &mut query {
        let Some(b) = bodies.iter().find(|b| b.id == marker.id) else {
            commands.entity(entity).despawn();
            continue;
        };

        transform.translation = Vec3::new(
            (b.x.x as f32) * SCALE3D,
            (b.x.y as f32) * SCALE3D,
            (b.x.z as f32) * SCALE3D,
        );
        transform.scale = Vec3::splat((b.radius as f32).max(0.02) * SCALE3D);

        if let Some(mat) = materials.get_mut(mat_handle) {
            mat.base_color = color_of(b);
        }
    }
}

/// Map a body's opaque color tag to a display color. The central body (tag 0)
/// stays white; other tags cycle a small fixed palette.
fn color_of(b: &Body) -> Color {
    match b.color % 7 {
        0 => Color::srgb(1.0, 1.0, 1.0),
        1 => Color::srgb(0.9, 0.4, 0.2),
        2 => Color::srgb(0.3, 0.6, 0.9),
        3 => Color::srgb(0.5, 0.8, 0.3),
        4 => Color::srgb(0.8, 0.7, 0.2),
        5 => Color::srgb(0.7, 0.3, 0.8),
        _ => Color::srgb(0.4, 0.8, 0.8),
    }
}

// =========================================================================================
// Draw 3D axes for visual reference
// =========================================================================================

fn spawn_axes(commands: &mut Commands, meshes: &mut Assets<Mesh>, materials: &mut Assets<StandardMaterial>) {
    // Axis length and thickness, in *world* units
    let axis_len = 1000.0 * SCALE3D;
    let axis_thickness = 1.0 * SCALE3D;

    // X axis: red, along +X/-X
    commands.spawn(PbrBundle {
        mesh: meshes.add(Cuboid::new(axis_len, axis_thickness, axis_thickness).mesh()),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.0, 0.0), // red
            unlit: true,
            ..Default::default()
        }),
        // Cuboid is centered at its transform origin, so this puts it crossing the world origin
        transform: Transform::from_xyz(0.0, 0.0, 0.0),
        ..Default::default()
    });

    // Y axis: green, along +Y/-Y
    commands.spawn(PbrBundle {
        mesh: meshes.add(Cuboid::new(axis_thickness, axis_len, axis_thickness).mesh()),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.0, 1.0, 0.0), // green
            unlit: true,
            ..Default::default()
        }),
        transform: Transform::from_xyz(0.0, 0.0, 0.0),
        ..Default::default()
    });

    // Z axis: blue, along +Z/-Z
    commands.spawn(PbrBundle {
        mesh: meshes.add(Cuboid::new(axis_thickness, axis_thickness, axis_len).mesh()),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.0, 0.0, 1.0), // blue
            unlit: true,
            ..Default::default()
        }),
        transform: Transform::from_xyz(0.0, 0.0, 0.0),
        ..Default::default()
    });
}
