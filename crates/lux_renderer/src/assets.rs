//! Material storage.
//!
//! Primitives refer to materials by [`MaterialId`]; the table lives in
//! [`Assets`] next to the texture arena and is read-only during rendering.

use std::fmt;

use lux_core::Textures;

use crate::material::Material;

/// Index of a material in an [`Assets`] table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(u32);

impl MaterialId {
    /// Geometry that carries no material, e.g. light-set shapes used only for
    /// sampling directions.
    pub const NONE: MaterialId = MaterialId(u32::MAX);

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

impl Default for MaterialId {
    fn default() -> Self {
        Self::NONE
    }
}

/// Textures and materials shared by every primitive in a scene.
#[derive(Default)]
pub struct Assets {
    pub textures: Textures,
    materials: Vec<Box<dyn Material>>,
}

impl Assets {
    pub fn new(textures: Textures) -> Self {
        Self {
            textures,
            materials: Vec::new(),
        }
    }

    pub fn add_material(&mut self, material: impl Material + 'static) -> MaterialId {
        let id = MaterialId(self.materials.len() as u32);
        self.materials.push(Box::new(material));
        id
    }

    /// Resolve `id`. [`MaterialId::NONE`] and unknown ids resolve to `None`.
    pub fn material(&self, id: MaterialId) -> Option<&dyn Material> {
        self.materials.get(id.index()).map(|m| m.as_ref())
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }
}

impl fmt::Debug for Assets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assets")
            .field("textures", &self.textures.len())
            .field("materials", &self.materials.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Dielectric;

    #[test]
    fn test_material_lookup() {
        let mut assets = Assets::default();
        let glass = assets.add_material(Dielectric::new(1.5));

        assert!(assets.material(glass).is_some());
        assert!(assets.material(MaterialId::NONE).is_none());
        assert!(MaterialId::default().is_none());
        assert_eq!(assets.material_count(), 1);
    }
}
