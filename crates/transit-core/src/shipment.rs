//! Shipments: item stacks committed to a route toward a destination.

use crate::id::{ShipmentId, WorldId};
use crate::item::ItemStack;
use serde::{Deserialize, Serialize};

/// A block coordinate within a world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The neighbouring position across `side`.
    pub fn offset(self, side: Side) -> Self {
        let (dx, dy, dz) = side.delta();
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }
}

/// World + block coordinate. Shipments are grouped by this key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DestinationKey {
    pub world: WorldId,
    pub pos: BlockPos,
}

impl DestinationKey {
    pub const fn new(world: WorldId, pos: BlockPos) -> Self {
        Self { world, pos }
    }
}

/// A face of a block. Inventories may expose different slots per face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Side {
    pub const ALL: [Side; 6] = [
        Side::Down,
        Side::Up,
        Side::North,
        Side::South,
        Side::West,
        Side::East,
    ];

    pub fn opposite(self) -> Side {
        match self {
            Side::Down => Side::Up,
            Side::Up => Side::Down,
            Side::North => Side::South,
            Side::South => Side::North,
            Side::West => Side::East,
            Side::East => Side::West,
        }
    }

    fn delta(self) -> (i32, i32, i32) {
        match self {
            Side::Down => (0, -1, 0),
            Side::Up => (0, 1, 0),
            Side::North => (0, 0, -1),
            Side::South => (0, 0, 1),
            Side::West => (-1, 0, 0),
            Side::East => (1, 0, 0),
        }
    }
}

/// Routing classification of a shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathKind {
    /// No usable route. Shipments in this state must not be tracked as in flight.
    None,
    /// Heading to the destination that requested it.
    Active,
    /// Any other route, e.g. returning to its origin after a rejection.
    Home,
}

/// An item stack travelling toward a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shipment {
    pub id: ShipmentId,
    pub stack: ItemStack,
    pub destination: BlockPos,
    /// The face of the destination the route enters through.
    pub side: Side,
    pub has_path: bool,
    pub path_kind: PathKind,
}

impl Shipment {
    /// Whether the registry should be tracking this shipment.
    pub fn is_routed(&self) -> bool {
        self.has_path && self.path_kind != PathKind::None
    }
}
