//! Spatial partition of the world into fixed-size chunks, each holding at most one zone.

use bevy::log::debug;
use bevy::math::{IVec2, Vec2};
use std::collections::BTreeMap;

use super::builder::Zone;

/// Grid coordinate of a chunk. Chunk `(0, 0)` spans world `[0, size)` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ChunkCoord {
    pub x: i32,
    pub y: i32,
}

impl ChunkCoord {
    pub const ORIGIN: ChunkCoord = ChunkCoord { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Chebyshev distance, the number of chunk "rings" between two coords.
    pub fn distance(self, other: ChunkCoord) -> u32 {
        (self.x - other.x).unsigned_abs().max((self.y - other.y).unsigned_abs())
    }

    /// Ring around the origin this chunk belongs to.
    pub fn ring(self) -> u32 {
        self.distance(Self::ORIGIN)
    }
}

impl From<IVec2> for ChunkCoord {
    fn from(v: IVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Tracks which chunks are active and owns their zones.
#[derive(Debug)]
pub struct ChunkManager {
    chunk_size: Vec2,
    load_radius: u32,
    active: BTreeMap<ChunkCoord, Zone>,
}

impl ChunkManager {
    pub fn new(chunk_size: Vec2, load_radius: u32) -> Self {
        Self {
            chunk_size,
            load_radius,
            active: BTreeMap::new(),
        }
    }

    pub fn chunk_size(&self) -> Vec2 {
        self.chunk_size
    }

    pub fn load_radius(&self) -> u32 {
        self.load_radius
    }

    /// Chunk containing a world position.
    pub fn coord_for(&self, position: Vec2) -> ChunkCoord {
        (position / self.chunk_size).floor().as_ivec2().into()
    }

    /// Every chunk within the load radius of `center`, nearest first, ties by ascending coord.
    pub fn required_chunks(&self, center: Vec2) -> Vec<ChunkCoord> {
        let origin = self.coord_for(center);
        let r = self.load_radius as i32;
        let mut coords: Vec<ChunkCoord> = (-r..=r)
            .flat_map(|dx| (-r..=r).map(move |dy| ChunkCoord::new(origin.x + dx, origin.y + dy)))
            .collect();
        coords.sort_by_key(|c| (c.distance(origin), *c));
        coords
    }

    /// Install a zone for `coord` unless one is already active.
    ///
    /// `build` runs only for inactive chunks. Returns whether a zone was installed.
    pub fn ensure_active<E>(
        &mut self,
        coord: ChunkCoord,
        build: impl FnOnce(ChunkCoord) -> Result<Zone, E>,
    ) -> Result<bool, E> {
        if self.active.contains_key(&coord) {
            return Ok(false);
        }
        let zone = build(coord)?;
        debug!("Activated chunk ({}, {}) with zone '{}'", coord.x, coord.y, zone.name());
        self.active.insert(coord, zone);
        Ok(true)
    }

    /// Install an already-built zone if the slot is free.
    pub fn install_fallback(&mut self, coord: ChunkCoord, zone: Zone) -> bool {
        if self.active.contains_key(&coord) {
            return false;
        }
        self.active.insert(coord, zone);
        true
    }

    pub fn deactivate(&mut self, coord: ChunkCoord) -> Option<Zone> {
        let zone = self.active.remove(&coord);
        if zone.is_some() {
            debug!("Deactivated chunk ({}, {})", coord.x, coord.y);
        }
        zone
    }

    /// Active chunks not in `required`, in ascending order.
    pub fn stale_chunks(&self, required: &[ChunkCoord]) -> Vec<ChunkCoord> {
        self.active
            .keys()
            .filter(|coord| !required.contains(coord))
            .copied()
            .collect()
    }

    pub fn is_active(&self, coord: ChunkCoord) -> bool {
        self.active.contains_key(&coord)
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<&Zone> {
        self.active.get(&coord)
    }

    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Zone> {
        self.active.get_mut(&coord)
    }

    pub fn active_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.active.keys().copied()
    }

    pub fn active_zones(&self) -> impl Iterator<Item = &Zone> {
        self.active.values()
    }

    /// Deactivate everything, returning the zones in coord order.
    pub fn clear(&mut self) -> Vec<Zone> {
        std::mem::take(&mut self.active).into_values().collect()
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::Rect;
    use std::cell::Cell;

    fn manager(radius: u32) -> ChunkManager {
        ChunkManager::new(Vec2::splat(320.0), radius)
    }

    fn empty(coord: ChunkCoord) -> Zone {
        Zone::empty(coord, Rect::default())
    }

    #[test]
    fn coord_for_floors_negative_positions() {
        let chunks = manager(1);
        assert_eq!(chunks.coord_for(Vec2::new(0.0, 0.0)), ChunkCoord::new(0, 0));
        assert_eq!(chunks.coord_for(Vec2::new(319.9, 320.0)), ChunkCoord::new(0, 1));
        assert_eq!(chunks.coord_for(Vec2::new(-0.1, -320.0)), ChunkCoord::new(-1, -1));
        assert_eq!(chunks.coord_for(Vec2::new(-320.1, 0.0)), ChunkCoord::new(-2, 0));
    }

    #[test]
    fn required_chunks_are_nearest_first_with_ascending_ties() {
        let chunks = manager(1);
        let required = chunks.required_chunks(Vec2::new(10.0, 10.0));
        assert_eq!(required.len(), 9);
        assert_eq!(required[0], ChunkCoord::new(0, 0));
        assert_eq!(required[1], ChunkCoord::new(-1, -1));
        assert_eq!(required[2], ChunkCoord::new(-1, 0));
        assert_eq!(required[8], ChunkCoord::new(1, 1));
        assert_eq!(required, chunks.required_chunks(Vec2::new(300.0, 1.0)));
    }

    #[test]
    fn activation_is_idempotent() {
        let mut chunks = manager(1);
        let builds = Cell::new(0);
        let build = |coord| -> Result<Zone, ()> {
            builds.set(builds.get() + 1);
            Ok(empty(coord))
        };

        assert_eq!(chunks.ensure_active(ChunkCoord::ORIGIN, build), Ok(true));
        assert_eq!(chunks.ensure_active(ChunkCoord::ORIGIN, build), Ok(false));
        assert_eq!(builds.get(), 1);
        assert_eq!(chunks.len(), 1);
        assert!(!chunks.install_fallback(ChunkCoord::ORIGIN, empty(ChunkCoord::ORIGIN)));
    }

    #[test]
    fn failed_build_leaves_chunk_inactive() {
        let mut chunks = manager(1);
        let result = chunks.ensure_active(ChunkCoord::new(2, 2), |_| Err("boom"));
        assert_eq!(result, Err("boom"));
        assert!(!chunks.is_active(ChunkCoord::new(2, 2)));
    }

    #[test]
    fn stale_chunks_are_those_out_of_range() {
        let mut chunks = manager(0);
        for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(3, 0), ChunkCoord::new(-2, 1)] {
            chunks.install_fallback(coord, empty(coord));
        }
        let required = chunks.required_chunks(Vec2::new(5.0, 5.0));
        assert_eq!(required, vec![ChunkCoord::ORIGIN]);
        assert_eq!(chunks.stale_chunks(&required), vec![ChunkCoord::new(-2, 1), ChunkCoord::new(3, 0)]);
        assert!(chunks.deactivate(ChunkCoord::new(3, 0)).is_some());
        assert!(chunks.deactivate(ChunkCoord::new(3, 0)).is_none());
        assert_eq!(chunks.clear().len(), 2);
    }

    #[test]
    fn ring_is_chebyshev_distance_from_origin() {
        assert_eq!(ChunkCoord::new(0, 0).ring(), 0);
        assert_eq!(ChunkCoord::new(-1, 1).ring(), 1);
        assert_eq!(ChunkCoord::new(2, -1).ring(), 2);
    }
}
