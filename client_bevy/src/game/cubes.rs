use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use letterfall_core::body::{BodyId, BodyStore};
use letterfall_core::config::SimulationConfig;
use letterfall_core::physics::{BodyReadback, PhysicsBackend};
use letterfall_core::pose::Pose;

use crate::constants::{color_from_hex, Colors};

use super::{LetterScene, Settings, UpdateSet};

pub struct CubesPlugin;

/// Rapier side of a cube. Its transform is the physics pose.
#[derive(Component, Debug, Clone, Copy)]
pub(crate) struct CubeBody {
    pub(crate) id: BodyId,
}

/// Rendered side of a cube. Its transform is the visual pose.
#[derive(Component, Debug, Clone, Copy)]
pub(crate) struct CubeVisual {
    pub(crate) id: BodyId,
}

/// Entities of every cube pair, indexed by `BodyId`.
#[derive(Resource, Default)]
pub(crate) struct CubeField {
    bodies: Vec<Entity>,
    visuals: Vec<Entity>,
}

impl CubeField {
    pub(crate) fn len(&self) -> usize {
        self.bodies.len()
    }

    fn body(&self, id: BodyId) -> Option<Entity> {
        self.bodies.get(id.0).copied()
    }
}

#[derive(Resource)]
pub(crate) struct CubeAssets {
    mesh: Handle<Mesh>,
    material: Handle<StandardMaterial>,
}

#[cfg(test)]
impl CubeAssets {
    pub(crate) fn for_tests() -> Self {
        Self {
            mesh: Handle::default(),
            material: Handle::default(),
        }
    }
}

type CubeBodyQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Transform,
        &'static mut Velocity,
        &'static mut Sleeping,
        Has<RigidBodyDisabled>,
    ),
    With<CubeBody>,
>;

/// The cube field's Rapier bodies as seen by the core.
///
/// Sleep is `RigidBodyDisabled`: the body leaves the step entirely and its
/// transform goes stale until the next wake.
#[derive(SystemParam)]
pub(crate) struct RapierCubes<'w, 's> {
    commands: Commands<'w, 's>,
    field: Res<'w, CubeField>,
    bodies: CubeBodyQuery<'w, 's>,
}

impl PhysicsBackend for RapierCubes<'_, '_> {
    fn sleep(&mut self, id: BodyId) {
        let Some(entity) = self.field.body(id) else {
            return;
        };
        if let Ok((_, mut velocity, _, _)) = self.bodies.get_mut(entity) {
            *velocity = Velocity::zero();
        }
        self.commands.entity(entity).insert(RigidBodyDisabled);
    }

    fn wake(&mut self, id: BodyId, pose: Pose, velocity: Option<Vec3>) {
        let Some(entity) = self.field.body(id) else {
            return;
        };
        if let Ok((mut transform, mut body_velocity, mut sleeping, _)) = self.bodies.get_mut(entity) {
            transform.translation = pose.translation;
            transform.rotation = pose.rotation;
            if let Some(linvel) = velocity {
                body_velocity.linvel = linvel;
            }
            sleeping.sleeping = false;
        }
        self.commands.entity(entity).remove::<RigidBodyDisabled>();
    }
}

impl BodyReadback for RapierCubes<'_, '_> {
    fn is_sleeping(&self, id: BodyId) -> bool {
        self.field
            .body(id)
            .and_then(|entity| self.bodies.get(entity).ok())
            .is_none_or(|(_, _, sleeping, disabled)| disabled || sleeping.sleeping)
    }

    fn pose(&self, id: BodyId) -> Option<Pose> {
        let entity = self.field.body(id)?;
        let (transform, _, _, _) = self.bodies.get(entity).ok()?;
        Some(Pose::new(transform.translation, transform.rotation))
    }
}

impl Plugin for CubesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CubeField>()
            .add_systems(Startup, (setup_cube_assets, spawn_initial_cubes).chain())
            .add_systems(Update, sync_cube_visuals.in_set(UpdateSet::Visuals));
    }
}

fn setup_cube_assets(
    mut commands: Commands,
    settings: Res<Settings>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let size = settings.config.cube_size;
    commands.insert_resource(CubeAssets {
        mesh: meshes.add(Cuboid::new(size, size, size)),
        material: materials.add(StandardMaterial {
            base_color: color_from_hex(Colors::CUBE),
            ..default()
        }),
    });
}

fn spawn_initial_cubes(
    mut commands: Commands,
    settings: Res<Settings>,
    scene: Res<LetterScene>,
    assets: Res<CubeAssets>,
    mut field: ResMut<CubeField>,
) {
    spawn_cube_field(&mut commands, &settings.config, &scene.sim.bodies, &assets, &mut field);
}

/// One Rapier body and one mesh per cube, both starting at the store's pose.
pub(crate) fn spawn_cube_field(
    commands: &mut Commands,
    config: &SimulationConfig,
    store: &BodyStore,
    assets: &CubeAssets,
    field: &mut CubeField,
) {
    let half = config.cube_size * 0.5;
    field.bodies.clear();
    field.visuals.clear();

    for body in store.iter() {
        let transform = Transform::from_translation(body.visual.translation)
            .with_rotation(body.visual.rotation);

        let physics = commands
            .spawn((
                RigidBody::Dynamic,
                Collider::cuboid(half, half, half),
                ColliderMassProperties::Mass(config.cube_mass),
                Friction::coefficient(config.friction),
                Restitution::coefficient(config.restitution),
                Velocity::zero(),
                Sleeping::default(),
                transform,
                CubeBody { id: body.id },
            ))
            .id();
        let visual = commands
            .spawn((
                Mesh3d(assets.mesh.clone()),
                MeshMaterial3d(assets.material.clone()),
                transform,
                CubeVisual { id: body.id },
            ))
            .id();

        field.bodies.push(physics);
        field.visuals.push(visual);
    }
}

/// Removes every cube pair from the world.
pub(crate) fn despawn_cube_field(commands: &mut Commands, field: &mut CubeField) {
    for entity in field.bodies.drain(..).chain(field.visuals.drain(..)) {
        commands.entity(entity).despawn();
    }
}

fn sync_cube_visuals(
    time: Res<Time>,
    mut scene: ResMut<LetterScene>,
    rapier: RapierCubes,
    mut q_visuals: Query<(&CubeVisual, &mut Transform), Without<CubeBody>>,
) {
    let now = time.elapsed_secs_f64();
    scene.sim.sync(now, &rapier);

    for (visual, mut transform) in &mut q_visuals {
        let Some(body) = scene.sim.bodies.get(visual.id) else {
            continue;
        };
        transform.translation = body.visual.translation;
        transform.rotation = body.visual.rotation;
    }
}
