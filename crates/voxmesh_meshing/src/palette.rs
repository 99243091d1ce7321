//! Colour and material lookup tables supplied by a loader.
//!
//! Voxels only carry indices. The palette maps a colour index to a U
//! coordinate on a one-texel-high palette strip; exporters read the
//! material table to build their own material definitions.

use crate::error::{checked_index, MeshResult};

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// Red component (0-255).
    pub r: u8,
    /// Green component (0-255).
    pub g: u8,
    /// Blue component (0-255).
    pub b: u8,
    /// Alpha component (0-255).
    pub a: u8,
}

impl Rgba {
    /// Creates a colour from components.
    #[inline]
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates from packed little-endian RGBA (`0xAABBGGRR`).
    #[inline]
    #[must_use]
    pub const fn from_packed(packed: u32) -> Self {
        Self {
            r: (packed & 0xFF) as u8,
            g: ((packed >> 8) & 0xFF) as u8,
            b: ((packed >> 16) & 0xFF) as u8,
            a: ((packed >> 24) & 0xFF) as u8,
        }
    }

    /// Returns as normalized float array [r, g, b, a].
    #[inline]
    #[must_use]
    pub fn as_float(&self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}

/// Surface properties for one material index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteMaterial {
    /// 0.0 = opaque, 1.0 = fully transparent.
    pub transparency: f32,
    /// Surface roughness (0.0 = mirror).
    pub roughness: f32,
    /// 0.0 = dielectric, 1.0 = metal.
    pub metallic: f32,
    /// Emission strength multiplier on the base colour.
    pub emission: f32,
}

impl PaletteMaterial {
    /// Material 0: plain diffuse surface.
    pub const DEFAULT: Self = Self::solid(1.0);

    /// Creates an opaque diffuse material.
    #[must_use]
    pub const fn solid(roughness: f32) -> Self {
        Self {
            transparency: 0.0,
            roughness,
            metallic: 0.0,
            emission: 0.0,
        }
    }

    /// Creates a glass-like material.
    #[must_use]
    pub const fn glass(transparency: f32) -> Self {
        Self {
            transparency,
            roughness: 0.05,
            metallic: 0.0,
            emission: 0.0,
        }
    }

    /// Creates a metallic material.
    #[must_use]
    pub const fn metal(roughness: f32) -> Self {
        Self {
            transparency: 0.0,
            roughness,
            metallic: 1.0,
            emission: 0.0,
        }
    }

    /// Creates an emissive material.
    #[must_use]
    pub const fn emissive(emission: f32) -> Self {
        Self {
            transparency: 0.0,
            roughness: 1.0,
            metallic: 0.0,
            emission,
        }
    }

    /// Returns true if light passes through the surface.
    #[inline]
    #[must_use]
    pub fn is_transparent(&self) -> bool {
        self.transparency > 0.0
    }
}

impl Default for PaletteMaterial {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Ordered colour and material tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Palette {
    /// Colours, addressed by voxel colour index.
    pub colors: Vec<Rgba>,
    /// Materials, addressed by voxel material index.
    pub materials: Vec<PaletteMaterial>,
}

impl Palette {
    /// Creates an empty palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a palette from a colour table with no materials.
    #[must_use]
    pub fn from_colors(colors: Vec<Rgba>) -> Self {
        Self {
            colors,
            materials: Vec::new(),
        }
    }

    /// Interns a colour, returning the index of an equal existing entry if any.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeshError::IndexOverflow`] if the colour table is full.
    pub fn intern_color(&mut self, color: Rgba) -> MeshResult<u32> {
        if let Some(i) = self.colors.iter().position(|&c| c == color) {
            return checked_index(i, "colour");
        }
        let index = checked_index(self.colors.len(), "colour")?;
        self.colors.push(color);
        Ok(index)
    }

    /// Appends a material, returning its index.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeshError::IndexOverflow`] if the material table is full.
    pub fn push_material(&mut self, material: PaletteMaterial) -> MeshResult<u32> {
        let index = checked_index(self.materials.len(), "material")?;
        self.materials.push(material);
        Ok(index)
    }

    /// Colour at `index`.
    #[must_use]
    pub fn color(&self, index: u32) -> Option<Rgba> {
        self.colors.get(index as usize).copied()
    }

    /// Material at `index`, falling back to [`PaletteMaterial::DEFAULT`].
    #[must_use]
    pub fn material(&self, index: u32) -> PaletteMaterial {
        self.materials
            .get(index as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Width of the palette strip in texels (at least 1).
    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.colors.len().max(1)
    }

    /// U coordinate of the centre of texel `index`.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn u_coordinate(&self, index: u32) -> f32 {
        (index as f32 + 0.5) / self.width() as f32
    }

    /// UV for a face of colour `index`. V is fixed at the strip's centre line.
    #[inline]
    #[must_use]
    pub fn uv(&self, index: u32) -> [f32; 2] {
        [self.u_coordinate(index), 0.5]
    }
}
