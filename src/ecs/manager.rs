//! Entity registry backed by a standalone `bevy_ecs` world.

use std::any::{type_name, TypeId};

use bevy::ecs::component::Component;
use bevy::ecs::entity::Entity;
use bevy::ecs::query::QueryFilter;
use bevy::ecs::world::{Mut, World};
use bevy::log::debug;

use super::components::{EntityKind, Tag, Transform};
use super::error::EntityError;

/// Owns every entity and component of a run.
///
/// Each entity gets a [`Transform`] and a [`Tag`] at creation; everything else
/// is attached afterwards. Bevy's generational ids mean a destroyed entity can
/// never be confused with a later one that reuses its slot.
#[derive(Default)]
pub struct EntityManager {
    world: World,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity at the origin.
    pub fn create_entity(&mut self, kind: EntityKind, name: impl Into<String>) -> Entity {
        self.spawn_at(kind, name, Transform::default())
    }

    /// Create an entity with an explicit transform.
    pub fn spawn_at(&mut self, kind: EntityKind, name: impl Into<String>, transform: Transform) -> Entity {
        let name = name.into();
        let entity = self.world.spawn((Tag { kind, name }, transform)).id();
        debug!("Created {:?} entity {:?}", kind, entity);
        entity
    }

    /// Attach a component, replacing any existing one of the same type.
    pub fn attach<C: Component>(&mut self, entity: Entity, component: C) -> Result<(), EntityError> {
        if !self.contains(entity) {
            return Err(EntityError::Missing(entity));
        }
        self.world.entity_mut(entity).insert(component);
        Ok(())
    }

    /// Remove a component, returning it if it was present.
    ///
    /// `Transform` and `Tag` stay attached for the entity's whole life; only
    /// [`destroy`](Self::destroy) removes them.
    pub fn detach<C: Component>(&mut self, entity: Entity) -> Result<Option<C>, EntityError> {
        if !self.contains(entity) {
            return Err(EntityError::Missing(entity));
        }
        let id = TypeId::of::<C>();
        if id == TypeId::of::<Transform>() || id == TypeId::of::<Tag>() {
            return Err(EntityError::Required(entity, type_name::<C>()));
        }
        Ok(self.world.entity_mut(entity).take::<C>())
    }

    pub fn get<C: Component>(&self, entity: Entity) -> Option<&C> {
        if !self.contains(entity) {
            return None;
        }
        self.world.get::<C>(entity)
    }

    pub fn get_mut<C: Component>(&mut self, entity: Entity) -> Option<Mut<'_, C>> {
        if !self.contains(entity) {
            return None;
        }
        self.world.get_mut::<C>(entity)
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.world.entities().contains(entity)
    }

    /// Entities matching a query filter, e.g. `query::<(With<Enemy>, With<Health>)>()`.
    pub fn query<F: QueryFilter>(&mut self) -> Vec<Entity> {
        let mut state = self.world.query_filtered::<Entity, F>();
        state.iter(&self.world).collect()
    }

    /// Entities created with the given kind.
    pub fn of_kind(&mut self, kind: EntityKind) -> Vec<Entity> {
        let mut state = self.world.query::<(Entity, &Tag)>();
        state
            .iter(&self.world)
            .filter(|(_, tag)| tag.kind == kind)
            .map(|(entity, _)| entity)
            .collect()
    }

    /// Remove an entity and all of its components. Returns false if it was already gone.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.contains(entity) {
            debug!("Destroy skipped, {:?} already gone", entity);
            return false;
        }
        self.world.despawn(entity)
    }

    /// Destroy every entity.
    pub fn clear(&mut self) {
        self.world.clear_entities();
    }

    pub fn len(&self) -> usize {
        self.world.entities().len() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read access for systems that walk several components at once.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access for systems running multi-component queries.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
