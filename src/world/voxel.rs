use glam::{IVec2, IVec3, Vec3};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// World-space address of a single voxel.
///
/// Coordinates are unbounded signed integers; chunk-local decomposition uses
/// arithmetic shifts so negative coordinates floor toward negative infinity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VoxelAddress(pub IVec3);

impl Serialize for VoxelAddress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.0.x, self.0.y, self.0.z).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VoxelAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let (x, y, z) = <(i32, i32, i32)>::deserialize(deserializer)?;
        Ok(VoxelAddress(IVec3::new(x, y, z)))
    }
}

impl VoxelAddress {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self(IVec3::new(x, y, z))
    }

    /// Voxel containing a floating-point world position. Floors each
    /// component, so -0.3 lands in voxel -1, not 0.
    pub fn from_world(pos: Vec3) -> Self {
        Self(IVec3::new(
            pos.x.floor() as i32,
            pos.y.floor() as i32,
            pos.z.floor() as i32,
        ))
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn y(&self) -> i32 {
        self.0.y
    }

    pub fn z(&self) -> i32 {
        self.0.z
    }

    /// Key of the chunk column owning this voxel.
    pub fn column(&self) -> IVec2 {
        IVec2::new(self.0.x >> 4, self.0.z >> 4)
    }

    /// Vertical index of the sub-chunk owning this voxel.
    pub fn sub_chunk(&self) -> i32 {
        self.0.y >> 4
    }

    /// World position of the voxel's center.
    pub fn center(&self) -> Vec3 {
        Vec3::new(
            self.0.x as f32 + 0.5,
            self.0.y as f32 + 0.5,
            self.0.z as f32 + 0.5,
        )
    }

    pub fn min_corner(&self) -> Vec3 {
        Vec3::new(self.0.x as f32, self.0.y as f32, self.0.z as f32)
    }

    pub fn neighbor(&self, face: Face) -> Self {
        Self(self.0 + face.offset())
    }

    /// Stable 64-bit key: 26 bits per horizontal axis, 12 bits vertical.
    /// Collision-free within ±33M horizontally and ±2048 vertically, which
    /// covers the grid's build limits with room to spare.
    pub fn pack(&self) -> u64 {
        ((self.0.x as u64 & 0x3ff_ffff) << 38)
            | ((self.0.z as u64 & 0x3ff_ffff) << 12)
            | (self.0.y as u64 & 0xfff)
    }
}

impl From<IVec3> for VoxelAddress {
    fn from(vec: IVec3) -> Self {
        Self(vec)
    }
}

impl From<VoxelAddress> for IVec3 {
    fn from(addr: VoxelAddress) -> Self {
        addr.0
    }
}

/// The six axis-aligned voxel faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Down,
    Up,
    North,
    South,
    West,
    East,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Down,
        Face::Up,
        Face::North,
        Face::South,
        Face::West,
        Face::East,
    ];

    pub fn offset(&self) -> IVec3 {
        match self {
            Face::Down => IVec3::new(0, -1, 0),
            Face::Up => IVec3::new(0, 1, 0),
            Face::North => IVec3::new(0, 0, -1),
            Face::South => IVec3::new(0, 0, 1),
            Face::West => IVec3::new(-1, 0, 0),
            Face::East => IVec3::new(1, 0, 0),
        }
    }
}
