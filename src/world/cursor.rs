use crate::world::block::BlockId;
use crate::world::chunk::{ChunkColumn, VoxelGrid};
use glam::IVec2;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cursor over a [`VoxelGrid`] that caches the last-resolved chunk column and
/// sub-chunk index. Consecutive lookups at spatially coherent addresses skip
/// the column map entirely.
///
/// One cursor belongs to one traversal. After any structural mutation of the
/// grid outside the cursor's knowledge (column unload, reload), the owner must
/// call [`invalidate`](Self::invalidate); the cursor cannot detect it.
pub struct SubChunkCursor<'g> {
    grid: &'g VoxelGrid,
    column: Option<Arc<RwLock<ChunkColumn>>>,
    column_key: IVec2,
    sub_y: i32,
    sub_valid: bool,
    on_change: Option<Box<dyn FnMut()>>,
}

impl<'g> SubChunkCursor<'g> {
    pub fn new(grid: &'g VoxelGrid) -> Self {
        Self {
            grid,
            column: None,
            column_key: IVec2::ZERO,
            sub_y: 0,
            sub_valid: false,
            on_change: None,
        }
    }

    /// Points the cursor at the voxel `(x, y, z)`.
    ///
    /// The column is re-fetched only when `(x >> 4, z >> 4)` differs from the
    /// cached key; the sub-chunk is re-resolved only when the column changed
    /// or `y >> 4` differs. Returns `false` without error when the column is
    /// missing (and `create` is off) or the addressed sub-chunk is empty.
    /// With `create` on, missing structures are allocated; off is strictly
    /// read-only.
    pub fn move_to(&mut self, x: i32, y: i32, z: i32, create: bool) -> bool {
        let column_key = IVec2::new(x >> 4, z >> 4);
        if self.column.is_none() || self.column_key != column_key {
            self.column_key = column_key;
            self.sub_valid = false;
            self.column = if create {
                Some(self.grid.column_or_create(column_key))
            } else {
                self.grid.column(column_key)
            };
            if self.column.is_none() {
                return false;
            }
        }

        let sub_y = y >> 4;
        if !self.sub_valid || self.sub_y != sub_y {
            self.sub_y = sub_y;
            let Some(column) = &self.column else {
                return false;
            };
            let present = if create {
                column.write().sub_chunk_mut(sub_y);
                true
            } else {
                column.read().has_sub_chunk(sub_y)
            };
            self.sub_valid = present;
            if !present {
                return false;
            }
            if let Some(callback) = &mut self.on_change {
                callback();
            }
        }

        true
    }

    /// Reads the block at the coordinates last passed to a successful
    /// [`move_to`](Self::move_to). Air when nothing is resolved.
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> BlockId {
        let Some(column) = &self.column else {
            return BlockId::AIR;
        };
        if !self.sub_valid {
            return BlockId::AIR;
        }
        let column = column.read();
        column.sub_chunk(y >> 4).map_or(BlockId::AIR, |s| {
            s.get((x & 0xf) as u32, (y & 0xf) as u32, (z & 0xf) as u32)
        })
    }

    /// Writes through the resolved sub-chunk. Only valid after `move_to`
    /// with `create` returned `true`.
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        let Some(column) = &self.column else {
            return;
        };
        if !self.sub_valid {
            return;
        }
        column
            .write()
            .sub_chunk_mut(y >> 4)
            .set((x & 0xf) as u32, (y & 0xf) as u32, (z & 0xf) as u32, id);
    }

    /// Installs the sub-chunk-change listener, replacing any previous one.
    /// Fired once per resolved sub-chunk identity change, not per `move_to`.
    pub fn on_sub_chunk_change(&mut self, callback: impl FnMut() + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Drops the cached column and sub-chunk identity.
    pub fn invalidate(&mut self) {
        self.column = None;
        self.sub_valid = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::voxel::VoxelAddress;
    use std::cell::Cell;
    use std::rc::Rc;

    fn change_counter(cursor: &mut SubChunkCursor<'_>) -> Rc<Cell<u32>> {
        let counter = Rc::new(Cell::new(0));
        let c = counter.clone();
        cursor.on_sub_chunk_change(move || c.set(c.get() + 1));
        counter
    }

    #[test]
    fn resolves_only_existing_sub_chunks_read_only() {
        let grid = VoxelGrid::default();
        grid.set_block(VoxelAddress::new(1, 1, 1), BlockId(9)).unwrap();

        let mut cursor = SubChunkCursor::new(&grid);
        assert!(cursor.move_to(1, 1, 1, false));
        assert_eq!(cursor.block_at(1, 1, 1), BlockId(9));
        // Same column, empty sub-chunk above.
        assert!(!cursor.move_to(1, 200, 1, false));
        // Missing column.
        assert!(!cursor.move_to(100, 1, 100, false));
        assert_eq!(grid.column_count(), 1);
    }

    #[test]
    fn create_allocates_missing_structures() {
        let grid = VoxelGrid::default();
        let mut cursor = SubChunkCursor::new(&grid);
        assert!(cursor.move_to(40, 80, 40, true));
        cursor.set_block_at(40, 80, 40, BlockId(3));
        assert_eq!(grid.block_at(VoxelAddress::new(40, 80, 40)), BlockId(3));
        assert_eq!(grid.column_count(), 1);
    }

    #[test]
    fn listener_fires_once_per_sub_chunk_change() {
        let grid = VoxelGrid::default();
        for y in [0, 16] {
            grid.set_block(VoxelAddress::new(0, y, 0), BlockId(1)).unwrap();
        }

        let mut cursor = SubChunkCursor::new(&grid);
        let fired = change_counter(&mut cursor);

        // Fifteen moves inside one sub-chunk: one change.
        for y in 0..15 {
            assert!(cursor.move_to(0, y, 0, false));
        }
        assert_eq!(fired.get(), 1);

        // Crossing into the next sub-chunk: one more.
        assert!(cursor.move_to(0, 16, 0, false));
        assert_eq!(fired.get(), 2);

        // Back again.
        assert!(cursor.move_to(0, 0, 0, false));
        assert_eq!(fired.get(), 3);
    }

    #[test]
    fn replacing_the_listener_discards_the_old_one() {
        let grid = VoxelGrid::default();
        grid.set_block(VoxelAddress::new(0, 0, 0), BlockId(1)).unwrap();

        let mut cursor = SubChunkCursor::new(&grid);
        let first = change_counter(&mut cursor);
        let second = change_counter(&mut cursor);

        assert!(cursor.move_to(0, 0, 0, false));
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn invalidate_forces_a_fresh_resolve() {
        let grid = VoxelGrid::default();
        let addr = VoxelAddress::new(2, 2, 2);
        grid.set_block(addr, BlockId(5)).unwrap();

        let mut cursor = SubChunkCursor::new(&grid);
        assert!(cursor.move_to(2, 2, 2, false));

        // The grid mutates behind the cursor's back.
        grid.unload_column(addr.column());
        cursor.invalidate();
        assert!(!cursor.move_to(2, 2, 2, false));
    }

    #[test]
    fn failed_resolve_retries_on_the_next_call() {
        let grid = VoxelGrid::default();
        let mut cursor = SubChunkCursor::new(&grid);
        assert!(!cursor.move_to(0, 0, 0, false));

        // A failed resolve caches nothing, so the next call sees new data.
        grid.set_block(VoxelAddress::new(0, 0, 0), BlockId(1)).unwrap();
        assert!(cursor.move_to(0, 0, 0, false));
    }
}
