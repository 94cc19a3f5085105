//! Scene geometry: mesh shapes and their materials.
//!
//! A [`Model`] is a collection of [`MeshShape`]s and [`Material`]s, usually
//! loaded from a single OBJ file. The render pipeline only ever sees the flat
//! arrays; loading is a convenience on top.

use std::fmt;
use std::path::Path;

/// Errors produced while loading a model from disk.
#[derive(Debug)]
pub enum LoadError {
    /// The OBJ geometry could not be read or parsed.
    Obj(tobj::LoadError),
    /// The OBJ referenced a material library that could not be read or parsed.
    Material(tobj::LoadError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Obj(e) => write!(f, "failed to load OBJ geometry: {e}"),
            LoadError::Material(e) => write!(f, "failed to load OBJ materials: {e}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Obj(e) | LoadError::Material(e) => Some(e),
        }
    }
}

impl From<tobj::LoadError> for LoadError {
    fn from(e: tobj::LoadError) -> Self {
        LoadError::Obj(e)
    }
}

/// Surface description for one shape. Only the diffuse color is used.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    /// Diffuse RGB, each channel in [0, 1].
    pub diffuse: [f32; 3],
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::from("default"),
            diffuse: [0.8, 0.8, 0.8],
        }
    }
}

impl Material {
    pub fn new(name: impl Into<String>, diffuse: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            diffuse,
        }
    }
}

/// One indexed triangle mesh.
///
/// `positions` and `normals` are flat xyz triples sharing one index space;
/// `indices` holds three vertex indices per triangle.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshShape {
    pub name: String,
    pub positions: Vec<f32>,
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    /// Index into the owning model's materials; `None` means [`Material::default`].
    pub material_id: Option<usize>,
}

impl MeshShape {
    pub fn new(
        name: impl Into<String>,
        positions: Vec<f32>,
        normals: Vec<f32>,
        indices: Vec<u32>,
        material_id: Option<usize>,
    ) -> Self {
        Self {
            name: name.into(),
            positions,
            normals,
            indices,
            material_id,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A named set of shapes and the materials they reference.
#[derive(Clone, Debug, Default)]
pub struct Model {
    name: String,
    shapes: Vec<MeshShape>,
    materials: Vec<Material>,
}

impl Model {
    /// Create a new empty model with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            shapes: Vec::new(),
            materials: Vec::new(),
        }
    }

    /// Load a model from an OBJ file (and its MTL library, if any).
    ///
    /// Faces are triangulated and positions/normals are re-indexed to share a
    /// single index. Shapes without normals get zero normals.
    pub fn from_obj<P: AsRef<Path> + fmt::Debug>(path: P) -> Result<Self, LoadError> {
        let name = path
            .as_ref()
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (models, materials) = tobj::load_obj(&path, &tobj::GPU_LOAD_OPTIONS)?;
        let materials = materials.map_err(LoadError::Material)?;

        let shapes = models
            .into_iter()
            .map(|m| {
                let mesh = m.mesh;
                let normals = if mesh.normals.len() == mesh.positions.len() {
                    mesh.normals
                } else {
                    log::warn!("shape {:?} has no per-vertex normals; using zero normals", m.name);
                    vec![0.0; mesh.positions.len()]
                };
                MeshShape::new(m.name, mesh.positions, normals, mesh.indices, mesh.material_id)
            })
            .collect::<Vec<_>>();

        let materials = materials
            .into_iter()
            .map(|m| {
                let diffuse = m.diffuse.unwrap_or(Material::default().diffuse);
                Material::new(m.name, diffuse)
            })
            .collect::<Vec<_>>();

        log::debug!(
            "loaded model {:?}: {} shapes, {} materials",
            name,
            shapes.len(),
            materials.len()
        );

        Ok(Self {
            name,
            shapes,
            materials,
        })
    }

    /// Get the model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn shapes(&self) -> &[MeshShape] {
        &self.shapes
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Get a shape by name.
    pub fn shape(&self, name: &str) -> Option<&MeshShape> {
        self.shapes.iter().find(|s| s.name == name)
    }

    pub fn add_shape(&mut self, shape: MeshShape) {
        self.shapes.push(shape);
    }

    /// Adds a material and returns its index for use as a shape's `material_id`.
    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }
}
