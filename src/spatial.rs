//! Per-group nearest-neighbor index, rebuilt from scratch every frame.

use crate::entity::{Entity, EntityId};
use rstar::{primitives::GeomWithData, RTree};

/// What the tree stores next to each point: the entity id and the position
/// the entity had in the group when the index was built.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Slot {
    id: EntityId,
    order: usize,
}

type IndexedPoint = GeomWithData<[f32; 2], Slot>;

/// Result of a nearest-neighbor query
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub id: EntityId,
    /// Insertion position, which is the entity's slot in its group at build time
    pub slot: usize,
    pub position: [f32; 2],
    pub distance: f32,
}

/// Read-only snapshot of one group's positions
#[derive(Debug, Default)]
pub struct SpatialIndex {
    tree: RTree<IndexedPoint>,
}

impl SpatialIndex {
    /// Bulk-load an index from `(id, point)` pairs. Insertion order is kept
    /// for tie-breaking.
    pub fn build<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (EntityId, [f32; 2])>,
    {
        let points: Vec<IndexedPoint> = points
            .into_iter()
            .enumerate()
            .map(|(order, (id, point))| GeomWithData::new(point, Slot { id, order }))
            .collect();

        SpatialIndex {
            tree: RTree::bulk_load(points),
        }
    }

    /// Index the hit box centers of a group, in group order
    pub fn from_entities(entities: &[Entity]) -> Self {
        Self::build(entities.iter().map(|e| (e.id, e.center())))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Closest point to `point` by Euclidean distance. Among points at the
    /// same distance the one inserted first wins. An empty index yields `None`.
    pub fn nearest(&self, point: [f32; 2]) -> Option<Neighbor> {
        let mut candidates = self.tree.nearest_neighbor_iter_with_distance_2(&point);
        let (mut best, best_dist_sq) = candidates.next()?;

        for (candidate, dist_sq) in candidates {
            if dist_sq > best_dist_sq {
                break;
            }
            if candidate.data.order < best.data.order {
                best = candidate;
            }
        }

        Some(Neighbor {
            id: best.data.id,
            slot: best.data.order,
            position: *best.geom(),
            distance: best_dist_sq.sqrt(),
        })
    }

    /// Insertion slots of every point within `radius` of `point`, ascending
    pub fn within(&self, point: [f32; 2], radius: f32) -> Vec<usize> {
        let mut slots: Vec<usize> = self
            .tree
            .locate_within_distance(point, radius * radius)
            .map(|p| p.data.order)
            .collect();
        slots.sort_unstable();
        slots
    }
}
