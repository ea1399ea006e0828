//! Material tags for grid cells
//!
//! Every cell carries a `Material` plus an 8-bit data value (the sub-variant).
//! Liquids come in still and flowing forms; flood fills treat the two forms of
//! the same liquid as one body.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sub-variant of a material (orientation, colour, liquid level...)
pub type DataValue = u8;

/// Material of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Air,
    Stone,
    Dirt,
    Grass,
    Cobblestone,
    Wood,
    Planks,
    Sand,
    Gravel,
    Glass,
    Wool,
    Ice,
    /// Flowing water
    Water,
    /// Still water
    StationaryWater,
    /// Flowing lava
    Lava,
    /// Still lava
    StationaryLava,
}

impl Material {
    pub const ALL: [Material; 16] = [
        Material::Air,
        Material::Stone,
        Material::Dirt,
        Material::Grass,
        Material::Cobblestone,
        Material::Wood,
        Material::Planks,
        Material::Sand,
        Material::Gravel,
        Material::Glass,
        Material::Wool,
        Material::Ice,
        Material::Water,
        Material::StationaryWater,
        Material::Lava,
        Material::StationaryLava,
    ];

    /// Lower-case name used in messages and configuration
    pub fn name(self) -> &'static str {
        match self {
            Material::Air => "air",
            Material::Stone => "stone",
            Material::Dirt => "dirt",
            Material::Grass => "grass",
            Material::Cobblestone => "cobblestone",
            Material::Wood => "wood",
            Material::Planks => "planks",
            Material::Sand => "sand",
            Material::Gravel => "gravel",
            Material::Glass => "glass",
            Material::Wool => "wool",
            Material::Ice => "ice",
            Material::Water => "water",
            Material::StationaryWater => "stationary_water",
            Material::Lava => "lava",
            Material::StationaryLava => "stationary_lava",
        }
    }

    #[inline]
    pub fn is_air(self) -> bool {
        self == Material::Air
    }

    #[inline]
    pub fn is_liquid(self) -> bool {
        self.liquid_counterpart().is_some()
    }

    /// The other form of the same liquid: still <-> flowing.
    ///
    /// Only water and lava are paired.
    pub fn liquid_counterpart(self) -> Option<Material> {
        match self {
            Material::Water => Some(Material::StationaryWater),
            Material::StationaryWater => Some(Material::Water),
            Material::Lava => Some(Material::StationaryLava),
            Material::StationaryLava => Some(Material::Lava),
            _ => None,
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a material name is not recognised
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown material '{0}'")]
pub struct UnknownMaterial(pub String);

impl FromStr for Material {
    type Err = UnknownMaterial;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Material::ALL
            .iter()
            .copied()
            .find(|m| m.name() == wanted)
            .ok_or(UnknownMaterial(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_liquid_pairs_are_symmetric() {
        for m in Material::ALL {
            if let Some(other) = m.liquid_counterpart() {
                assert_eq!(other.liquid_counterpart(), Some(m));
            }
        }
        assert_eq!(Material::Stone.liquid_counterpart(), None);
        assert!(!Material::Ice.is_liquid());
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("stone".parse::<Material>(), Ok(Material::Stone));
        assert_eq!(
            "Stationary_Water".parse::<Material>(),
            Ok(Material::StationaryWater)
        );
        assert!("unobtainium".parse::<Material>().is_err());
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Material::StationaryLava).unwrap();
        assert_eq!(json, "\"stationary_lava\"");
        let back: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Material::StationaryLava);
    }
}
