use crate::world::block::BlockId;
use crate::world::voxel::VoxelAddress;
use glam::IVec2;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub const SUB_CHUNK_SIZE: u32 = 16;
pub const SUB_CHUNK_VOLUME: usize = (SUB_CHUNK_SIZE * SUB_CHUNK_SIZE * SUB_CHUNK_SIZE) as usize;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Voxel ({0}, {1}, {2}) is outside the world's build limits")]
    OutOfBounds(i32, i32, i32),
}

/// 16x16x16 cube of block ids. Absent sub-chunks in a column are the
/// canonical empty placeholder and are never allocated by reads.
#[derive(Debug, Clone)]
pub struct SubChunk {
    blocks: Box<[u16; SUB_CHUNK_VOLUME]>,
}

impl SubChunk {
    pub fn new() -> Self {
        Self {
            blocks: Box::new([0; SUB_CHUNK_VOLUME]),
        }
    }

    fn index(x: u32, y: u32, z: u32) -> usize {
        (x + y * SUB_CHUNK_SIZE + z * SUB_CHUNK_SIZE * SUB_CHUNK_SIZE) as usize
    }

    /// Local coordinates, 0..16 each.
    pub fn get(&self, x: u32, y: u32, z: u32) -> BlockId {
        BlockId(self.blocks[Self::index(x, y, z)])
    }

    pub fn set(&mut self, x: u32, y: u32, z: u32, id: BlockId) {
        self.blocks[Self::index(x, y, z)] = id.0;
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|&b| b == 0)
    }
}

impl Default for SubChunk {
    fn default() -> Self {
        Self::new()
    }
}

/// Vertical stack of sub-chunks keyed by `y >> 4`. Sparse: only sub-chunks
/// that have been written to exist.
#[derive(Debug, Clone, Default)]
pub struct ChunkColumn {
    coord: IVec2,
    sub_chunks: HashMap<i32, SubChunk>,
}

impl ChunkColumn {
    pub fn new(coord: IVec2) -> Self {
        Self {
            coord,
            sub_chunks: HashMap::new(),
        }
    }

    pub fn coord(&self) -> IVec2 {
        self.coord
    }

    pub fn sub_chunk(&self, index: i32) -> Option<&SubChunk> {
        self.sub_chunks.get(&index)
    }

    /// Allocates the sub-chunk if missing.
    pub fn sub_chunk_mut(&mut self, index: i32) -> &mut SubChunk {
        self.sub_chunks.entry(index).or_default()
    }

    pub fn has_sub_chunk(&self, index: i32) -> bool {
        self.sub_chunks.contains_key(&index)
    }
}

/// Paged voxel storage: chunk columns keyed by `(x >> 4, z >> 4)`, shared
/// behind `Arc<RwLock>` so a traversal cursor can hold the resolved column
/// without re-walking the map.
pub struct VoxelGrid {
    columns: RwLock<HashMap<IVec2, Arc<RwLock<ChunkColumn>>>>,
    min_y: i32,
    max_y: i32, // exclusive
}

impl VoxelGrid {
    pub fn new(min_y: i32, max_y: i32) -> Self {
        Self {
            columns: RwLock::new(HashMap::new()),
            min_y,
            max_y,
        }
    }

    pub fn in_bounds(&self, addr: VoxelAddress) -> bool {
        addr.y() >= self.min_y && addr.y() < self.max_y
    }

    pub fn column(&self, key: IVec2) -> Option<Arc<RwLock<ChunkColumn>>> {
        self.columns.read().get(&key).cloned()
    }

    pub fn column_or_create(&self, key: IVec2) -> Arc<RwLock<ChunkColumn>> {
        self.columns
            .write()
            .entry(key)
            .or_insert_with(|| Arc::new(RwLock::new(ChunkColumn::new(key))))
            .clone()
    }

    pub fn column_count(&self) -> usize {
        self.columns.read().len()
    }

    /// Removes a column from the grid. Any live cursor must be invalidated
    /// by the caller afterwards.
    pub fn unload_column(&self, key: IVec2) -> bool {
        self.columns.write().remove(&key).is_some()
    }

    /// Air for missing columns and sub-chunks.
    pub fn block_at(&self, addr: VoxelAddress) -> BlockId {
        let Some(column) = self.column(addr.column()) else {
            return BlockId::AIR;
        };
        let column = column.read();
        column.sub_chunk(addr.sub_chunk()).map_or(BlockId::AIR, |s| {
            s.get(
                (addr.x() & 0xf) as u32,
                (addr.y() & 0xf) as u32,
                (addr.z() & 0xf) as u32,
            )
        })
    }

    pub fn set_block(&self, addr: VoxelAddress, id: BlockId) -> Result<(), GridError> {
        if !self.in_bounds(addr) {
            return Err(GridError::OutOfBounds(addr.x(), addr.y(), addr.z()));
        }
        let column = self.column_or_create(addr.column());
        let mut column = column.write();
        column.sub_chunk_mut(addr.sub_chunk()).set(
            (addr.x() & 0xf) as u32,
            (addr.y() & 0xf) as u32,
            (addr.z() & 0xf) as u32,
            id,
        );
        Ok(())
    }
}

impl Default for VoxelGrid {
    fn default() -> Self {
        Self::new(0, 256)
    }
}
