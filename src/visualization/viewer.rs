use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::simulation::scenario::Simulation;
use crate::simulation::states::{NVec3, Species};

/// Component tagging each sphere with its particle index into Simulation.system.particles
#[derive(Component)]
struct ParticleIndex(pub usize);

/// Marks the orbiting camera
#[derive(Component)]
struct OrbitCamera;

/// Spherical camera position around the origin
#[derive(Resource)]
struct OrbitState {
    radius: f32,
    theta: f32,
    phi: f32,
}

impl Default for OrbitState {
    fn default() -> Self {
        Self {
            radius: 50.0,
            theta: std::f32::consts::FRAC_PI_4,
            phi: std::f32::consts::FRAC_PI_4,
        }
    }
}

impl OrbitState {
    fn position(&self) -> Vec3 {
        Vec3::new(
            self.radius * self.phi.sin() * self.theta.cos(),
            self.radius * self.phi.cos(),
            self.radius * self.phi.sin() * self.theta.sin(),
        )
    }
}

/// Plane the held particle slides on while the button is down
#[derive(Resource, Default)]
struct DragPlane {
    plane: Option<(Vec3, Vec3)>, // (point, normal)
}

#[derive(Resource, Default)]
struct Paused(bool);

/// Radians of orbit per pixel of mouse motion
const ROTATION_SPEED: f32 = 0.005;
const MIN_RADIUS: f32 = 10.0;
const MAX_RADIUS: f32 = 100.0;
const PHI_MARGIN: f32 = 0.1;

/// Start the bevy 3D viewer on `simulation`
pub fn run_3d(simulation: Simulation) {
    App::new()
        .insert_resource(simulation)
        .insert_resource(ClearColor(Color::srgb(0.1, 0.1, 0.1)))
        .insert_resource(AmbientLight {
            color: Color::srgb(0.25, 0.25, 0.25),
            brightness: 300.0,
        })
        .init_resource::<OrbitState>()
        .init_resource::<DragPlane>()
        .init_resource::<Paused>()
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_3d)
        .add_systems(
            Update,
            (keyboard_controls, orbit_camera, pointer_drag, physics_step_3d, sync_transforms_3d, draw_bounds).chain(),
        )
        .run();
}

/// Startup system: spawn camera, lights, and one sphere per particle
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    simulation: Res<Simulation>,
    orbit: Res<OrbitState>,
) {
    info!("viewer: {} particles, bounds {}", simulation.system.len(), simulation.parameters.bounds);

    commands.spawn((
        Camera3dBundle {
            transform: Transform::from_translation(orbit.position()).looking_at(Vec3::ZERO, Vec3::Y),
            ..Default::default()
        },
        OrbitCamera,
    ));

    for (illuminance, dir) in [(8000.0, Vec3::new(1.0, 1.0, 1.0)), (4000.0, Vec3::new(-1.0, -1.0, -1.0))] {
        commands.spawn(DirectionalLightBundle {
            directional_light: DirectionalLight {
                illuminance,
                ..Default::default()
            },
            transform: Transform::from_translation(dir).looking_at(Vec3::ZERO, Vec3::Y),
            ..Default::default()
        });
    }

    let radius = simulation.parameters.particle_radius as f32;
    let sphere = meshes.add(Sphere::new(radius).mesh().uv(32, 32));
    let red = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.0, 0.0),
        perceptual_roughness: 0.3,
        ..Default::default()
    });
    let blue = materials.add(StandardMaterial {
        base_color: Color::srgb(0.0, 0.0, 1.0),
        perceptual_roughness: 0.3,
        ..Default::default()
    });

    for view in simulation.snapshot() {
        let material = match view.species {
            Species::A => red.clone(),
            Species::B => blue.clone(),
        };
        commands.spawn((
            PbrBundle {
                mesh: sphere.clone(),
                material,
                transform: Transform::from_translation(to_render(&view.position)),
                ..Default::default()
            },
            ParticleIndex(view.index),
        ));
    }
}

/// Space pauses, R re-seeds the particles
fn keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    mut paused: ResMut<Paused>,
    mut simulation: ResMut<Simulation>,
    mut drag_plane: ResMut<DragPlane>,
) {
    if keys.just_pressed(KeyCode::Space) {
        paused.0 = !paused.0;
        info!("paused: {}", paused.0);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        drag_plane.plane = None;
        simulation.reset(None);
    }
}

/// Right button orbits, wheel zooms
fn orbit_camera(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    mut wheel: EventReader<MouseWheel>,
    mut orbit: ResMut<OrbitState>,
    mut camera: Query<&mut Transform, With<OrbitCamera>>,
) {
    let mut changed = false;

    if buttons.pressed(MouseButton::Right) {
        for ev in motion.read() {
            orbit.theta -= ev.delta.x * ROTATION_SPEED;
            orbit.phi = (orbit.phi + ev.delta.y * ROTATION_SPEED)
                .clamp(PHI_MARGIN, std::f32::consts::PI - PHI_MARGIN);
            changed = true;
        }
    } else {
        motion.clear();
    }

    for ev in wheel.read() {
        orbit.radius = (orbit.radius - ev.y).clamp(MIN_RADIUS, MAX_RADIUS);
        changed = true;
    }

    if changed {
        for mut transform in &mut camera {
            *transform = Transform::from_translation(orbit.position()).looking_at(Vec3::ZERO, Vec3::Y);
        }
    }
}

/// Left button picks the nearest sphere under the cursor and drags it on a
/// camera-facing plane through the pick point
fn pointer_drag(
    buttons: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera: Query<(&Camera, &GlobalTransform), With<OrbitCamera>>,
    simulation: Res<Simulation>,
    mut drag_plane: ResMut<DragPlane>,
) {
    if buttons.just_released(MouseButton::Left) {
        drag_plane.plane = None;
        simulation.end_drag();
        return;
    }

    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Some(ray) = camera.viewport_to_world(camera_transform, cursor) else {
        return;
    };
    let origin = ray.origin;
    let dir: Vec3 = *ray.direction;

    if buttons.just_pressed(MouseButton::Left) {
        let radius = simulation.parameters.particle_radius as f32;
        let hit = simulation
            .snapshot()
            .iter()
            .filter_map(|view| {
                ray_sphere(origin, dir, to_render(&view.position), radius).map(|t| (view.index, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((index, t)) = hit {
            let point = origin + dir * t;
            let normal = (camera_transform.translation() - point).normalize_or_zero();
            drag_plane.plane = Some((point, normal));
            simulation.begin_drag(index, to_sim(point));
        }
        return;
    }

    if buttons.pressed(MouseButton::Left) {
        if let Some((point, normal)) = drag_plane.plane {
            if let Some(t) = ray_plane(origin, dir, point, normal) {
                simulation.update_drag(to_sim(origin + dir * t));
            }
        }
    }
}

/// Per-frame physics for the simulation
fn physics_step_3d(mut simulation: ResMut<Simulation>, paused: Res<Paused>, time: Res<Time>) {
    if paused.0 {
        return;
    }
    simulation.advance_for(time.delta_seconds_f64());
}

fn sync_transforms_3d(simulation: Res<Simulation>, mut query: Query<(&ParticleIndex, &mut Transform)>) {
    let particles = simulation.particles();
    for (ParticleIndex(i), mut transform) in &mut query {
        if let Some(p) = particles.get(*i) {
            transform.translation = to_render(&p.x);
        }
    }
}

/// Cells per side of the floor grid
const GRID_CELLS: u32 = 20;

/// Wireframe of the bounding cube and a floor grid through the origin
fn draw_bounds(mut gizmos: Gizmos, simulation: Res<Simulation>) {
    let half = simulation.parameters.bounds as f32;
    let color = Color::srgb(0.25, 0.25, 0.25);
    gizmos.cuboid(Transform::from_scale(Vec3::splat(2.0 * half)), color);

    let step = 2.0 * half / GRID_CELLS as f32;
    for k in 0..=GRID_CELLS {
        let c = -half + k as f32 * step;
        gizmos.line(Vec3::new(c, 0.0, -half), Vec3::new(c, 0.0, half), color);
        gizmos.line(Vec3::new(-half, 0.0, c), Vec3::new(half, 0.0, c), color);
    }
}

fn to_render(x: &NVec3) -> Vec3 {
    Vec3::new(x.x as f32, x.y as f32, x.z as f32)
}

fn to_sim(v: Vec3) -> NVec3 {
    NVec3::new(v.x as f64, v.y as f64, v.z as f64)
}

/// Nearest non-negative ray parameter hitting the sphere, `dir` normalized
fn ray_sphere(origin: Vec3, dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = origin - center;
    let b = oc.dot(dir);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    [-b - sq, -b + sq].into_iter().find(|t| *t >= 0.0)
}

fn ray_plane(origin: Vec3, dir: Vec3, point: Vec3, normal: Vec3) -> Option<f32> {
    let denom = normal.dot(dir);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (point - origin).dot(normal) / denom;
    (t >= 0.0).then_some(t)
}
