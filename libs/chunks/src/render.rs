use bevy::prelude::*;
use glam::{IVec2, Vec2, Vec3};
use std::fmt;

use crate::content::{ContentBackend, Placement};
use crate::streaming::{StreamAction, StreamingController};
use crate::types::{ContentDescriptor, ContentShape};

/// Root entity of a materialized chunk. Ground tile and object are its children.
#[derive(Component, Clone, Copy, Debug)]
pub struct ChunkRoot {
    pub cell: IVec2,
}

#[derive(Component, Clone, Copy, Debug)]
pub struct ChunkObject {
    pub catalog_index: usize,
}

#[derive(Component)]
pub struct ChunkGround;

#[derive(Resource)]
pub struct ChunkStreamer(pub StreamingController<Entity>);

/// Set by the root game crate to indicate where the tracked point is (XZ plane).
#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct TrackedPositionXz(pub Vec2);

#[derive(Resource, Default, Clone, Copy, Debug)]
pub struct StreamingStats {
    pub center: Option<IVec2>,
    pub live_chunks: usize,
    pub spawned_total: u64,
    pub despawned_total: u64,
}

impl StreamingStats {
    fn record(&mut self, actions: &[StreamAction]) {
        for action in actions {
            match action {
                StreamAction::Spawned(_) => self.spawned_total += 1,
                StreamAction::Despawned(_) => self.despawned_total += 1,
            }
        }
    }
}

pub struct ObjectAssets {
    pub mesh: Handle<Mesh>,
    pub material: Handle<StandardMaterial>,
}

/// Meshes and materials for every catalog entry, in catalog order.
#[derive(Resource)]
pub struct ContentAssets {
    pub objects: Vec<ObjectAssets>,
    pub ground_mesh: Handle<Mesh>,
    pub ground_material: Handle<StandardMaterial>,
}

#[derive(Debug)]
pub struct MaterializeError {
    pub name: String,
    pub catalog_index: usize,
}

impl fmt::Display for MaterializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no render assets for content '{}' (catalog index {})",
            self.name, self.catalog_index
        )
    }
}

impl std::error::Error for MaterializeError {}

pub fn setup_content_assets(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    streamer: Res<ChunkStreamer>,
) {
    let params = streamer.0.params();

    let objects = params
        .catalog()
        .iter()
        .map(|descriptor| {
            let (r, g, b) = descriptor.color_srgb;
            ObjectAssets {
                mesh: meshes.add(mesh_for_shape(&descriptor.shape)),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(r, g, b),
                    perceptual_roughness: 0.9,
                    ..default()
                }),
            }
        })
        .collect();

    // Slightly inset so chunk borders stay visible.
    let ground_size = params.chunk_size() * 0.98;
    let ground_mesh = meshes.add(Plane3d::default().mesh().size(ground_size, ground_size));
    let ground_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.32, 0.52, 0.28),
        perceptual_roughness: 1.0,
        ..default()
    });

    info!(
        "chunk streaming ready: chunk_size={} window={} salt={} catalog={}",
        params.chunk_size(),
        params.window_size(),
        params.salt(),
        params.catalog().len()
    );

    commands.insert_resource(ContentAssets {
        objects,
        ground_mesh,
        ground_material,
    });
}

fn mesh_for_shape(shape: &ContentShape) -> Mesh {
    match shape {
        ContentShape::Cuboid { size } => Cuboid::new(size.0, size.1, size.2).into(),
        ContentShape::Sphere { radius } => Sphere::new(*radius).into(),
        ContentShape::Cylinder { radius, height } => Cylinder::new(*radius, *height).into(),
    }
}

/// Materializes chunks as entity hierarchies through `Commands`.
pub struct EntityBackend<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    assets: &'a ContentAssets,
}

impl<'a, 'w, 's> EntityBackend<'a, 'w, 's> {
    pub fn new(commands: &'a mut Commands<'w, 's>, assets: &'a ContentAssets) -> Self {
        Self { commands, assets }
    }
}

impl ContentBackend for EntityBackend<'_, '_, '_> {
    type Handle = Entity;
    type Error = MaterializeError;

    fn materialize(
        &mut self,
        descriptor: &ContentDescriptor,
        placement: &Placement,
    ) -> Result<Entity, MaterializeError> {
        let Some(object) = self.assets.objects.get(placement.catalog_index) else {
            return Err(MaterializeError {
                name: descriptor.name.clone(),
                catalog_index: placement.catalog_index,
            });
        };

        let origin = Vec3::new(placement.chunk_origin.x, 0.0, placement.chunk_origin.y);
        let offset = placement.local_offset();
        let local = Vec3::new(offset.x, descriptor.shape.height() * 0.5, offset.y);

        let ground_mesh = self.assets.ground_mesh.clone();
        let ground_material = self.assets.ground_material.clone();
        let object_mesh = object.mesh.clone();
        let object_material = object.material.clone();

        let root = self
            .commands
            .spawn((
                ChunkRoot {
                    cell: placement.cell,
                },
                Transform::from_translation(origin),
                Visibility::default(),
            ))
            .with_children(|parent| {
                parent.spawn((
                    ChunkGround,
                    Mesh3d(ground_mesh),
                    MeshMaterial3d(ground_material),
                    Transform::default(),
                ));
                parent.spawn((
                    ChunkObject {
                        catalog_index: placement.catalog_index,
                    },
                    Name::new(descriptor.name.clone()),
                    Mesh3d(object_mesh),
                    MeshMaterial3d(object_material),
                    Transform::from_translation(local),
                ));
            })
            .id();

        Ok(root)
    }

    fn destroy(&mut self, handle: Entity) {
        self.commands.entity(handle).despawn();
    }
}

pub fn stream_chunks(
    mut commands: Commands,
    assets: Option<Res<ContentAssets>>,
    mut streamer: ResMut<ChunkStreamer>,
    tracked: Res<TrackedPositionXz>,
    mut stats: ResMut<StreamingStats>,
    mut exit: MessageWriter<AppExit>,
) {
    let Some(assets) = assets else {
        return;
    };

    let mut backend = EntityBackend::new(&mut commands, &assets);
    match streamer.0.tick(tracked.0, &mut backend) {
        Ok(actions) => {
            stats.record(&actions);
            stats.center = streamer.0.center();
            stats.live_chunks = streamer.0.index().len();
        }
        Err(e) => {
            error!("{e}");
            exit.write(AppExit::error());
        }
    }
}
