use crate::material::{DataValue, Material};
use core::ops::Index;

pub const CHUNK_SIZE: usize = 16;
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;

/// Contents of one cell: material and its data value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Voxel {
    pub material: Material,
    pub data: DataValue,
}

impl Voxel {
    pub const AIR: Voxel = Voxel {
        material: Material::Air,
        data: 0,
    };

    pub const fn new(material: Material, data: DataValue) -> Self {
        Self { material, data }
    }
}

#[inline]
const fn idx(x: usize, y: usize, z: usize) -> usize {
    x + y * CHUNK_SIZE + z * CHUNK_SIZE * CHUNK_SIZE
}

#[derive(Clone)]
pub struct Chunk {
    voxels: Box<[Voxel; CHUNK_VOLUME]>,
    /// Cells that are not air
    solid_count: u32,
}

impl Chunk {
    pub fn new_filled(fill: Voxel) -> Self {
        let solid_count = if fill.material.is_air() {
            0
        } else {
            CHUNK_VOLUME as u32
        };
        Self {
            voxels: Box::new([fill; CHUNK_VOLUME]),
            solid_count,
        }
    }

    pub fn new_empty() -> Self {
        Self::new_filled(Voxel::AIR)
    }

    /// Writes a voxel and returns the one it replaced.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, z: usize, v: Voxel) -> Voxel {
        let slot = &mut self.voxels[idx(x, y, z)];
        let old = std::mem::replace(slot, v);
        match (old.material.is_air(), v.material.is_air()) {
            (true, false) => self.solid_count += 1,
            (false, true) => self.solid_count -= 1,
            _ => {}
        }
        old
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize, z: usize) -> Voxel {
        self.voxels[idx(x, y, z)]
    }

    pub fn is_empty(&self) -> bool {
        self.solid_count == 0
    }

    pub fn solid_count(&self) -> u32 {
        self.solid_count
    }
}

impl Index<(usize, usize, usize)> for Chunk {
    type Output = Voxel;
    fn index(&self, i: (usize, usize, usize)) -> &Self::Output {
        &self.voxels[idx(i.0, i.1, i.2)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_count_tracks_writes() {
        let mut chunk = Chunk::new_empty();
        assert!(chunk.is_empty());

        let stone = Voxel::new(Material::Stone, 0);
        assert_eq!(chunk.set(1, 2, 3, stone), Voxel::AIR);
        assert_eq!(chunk.solid_count(), 1);

        // Solid over solid leaves the count alone
        chunk.set(1, 2, 3, Voxel::new(Material::Dirt, 2));
        assert_eq!(chunk.solid_count(), 1);
        assert_eq!(chunk[(1, 2, 3)], Voxel::new(Material::Dirt, 2));

        chunk.set(1, 2, 3, Voxel::AIR);
        assert!(chunk.is_empty());
    }

    #[test]
    fn test_filled_chunk() {
        let chunk = Chunk::new_filled(Voxel::new(Material::Sand, 0));
        assert_eq!(chunk.solid_count(), CHUNK_VOLUME as u32);
        assert_eq!(chunk.get(15, 15, 15).material, Material::Sand);
    }
}
