use std::{io::Cursor, path::Path};

use binrw::{BinRead, BinReaderExt};
use strum::FromRepr;

use crate::{
    error::FormatError,
    format::{ilff::IlffReader, CVector2f, CVector3f, FourCC},
    util::file::map_file,
};

// Chunk tags are four-character codes stored reversed: `HSEM` reads "MESH".

// Render model header
pub const K_CHUNK_HSEM: FourCC = FourCC(*b"HSEM");
// Render geometry totals
pub const K_CHUNK_D3DR: FourCC = FourCC(*b"D3DR");
// Render submesh descriptors
pub const K_CHUNK_DNER: FourCC = FourCC(*b"DNER");
// Render vertex buffer
pub const K_CHUNK_XTRV: FourCC = FourCC(*b"XTRV");
// Render face buffer
pub const K_CHUNK_ECAF: FourCC = FourCC(*b"ECAF");
// Magic point list
pub const K_CHUNK_XTVM: FourCC = FourCC(*b"XTVM");
// Attachment points
pub const K_CHUNK_ATTA: FourCC = FourCC(*b"ATTA");
// Bone names
pub const K_CHUNK_MANB: FourCC = FourCC(*b"MANB");
// Glow sprites
pub const K_CHUNK_WOLG: FourCC = FourCC(*b"WOLG");
// Portal descriptors
pub const K_CHUNK_TROP: FourCC = FourCC(*b"TROP");
// Portal vertex buffer
pub const K_CHUNK_XVTP: FourCC = FourCC(*b"XVTP");
// Portal face buffer
pub const K_CHUNK_CFTP: FourCC = FourCC(*b"CFTP");
// Lightmap page data
pub const K_CHUNK_PMTL: FourCC = FourCC(*b"PMTL");
// Texture animations
pub const K_CHUNK_TXAN: FourCC = FourCC(*b"TXAN");
// Collision totals
pub const K_CHUNK_HSMC: FourCC = FourCC(*b"HSMC");
// Collision vertex buffer
pub const K_CHUNK_XTVC: FourCC = FourCC(*b"XTVC");
// Collision face buffer
pub const K_CHUNK_ECFC: FourCC = FourCC(*b"ECFC");
// Collision materials
pub const K_CHUNK_TAMC: FourCC = FourCC(*b"TAMC");
// Collision spheres
pub const K_CHUNK_HPSC: FourCC = FourCC(*b"HPSC");
// Shadow submesh extents
pub const K_CHUNK_SEMS: FourCC = FourCC(*b"SEMS");
// Shadow vertex buffer
pub const K_CHUNK_XTVS: FourCC = FourCC(*b"XTVS");
// Shadow face buffer
pub const K_CHUNK_CAFS: FourCC = FourCC(*b"CAFS");
// Shadow edge buffer
pub const K_CHUNK_EGDE: FourCC = FourCC(*b"EGDE");

/// Record layout discriminant stored in the `HSEM` header.
///
/// The value read there selects the layout of every variant-dependent chunk
/// in the same file. A fourth vertex layout (value 2, normals plus two UV
/// sets) exists in the format but is never selected by a known header, so it
/// is rejected here.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, FromRepr)]
#[repr(u32)]
pub enum ModelVariant {
    /// Static geometry with one UV set.
    Standard = 0,
    /// Bone-weighted geometry with a third texture coordinate.
    Skinned = 1,
    /// Level geometry with a lightmap UV set and no normals.
    Lightmapped = 3,
}

impl ModelVariant {
    pub fn from_raw(value: u32) -> Result<Self, FormatError> {
        Self::from_repr(value).ok_or(FormatError::UnknownVariant(value))
    }

    fn has_normals(self) -> bool { self != ModelVariant::Lightmapped }

    fn vertex_stride(self) -> usize {
        match self {
            ModelVariant::Standard => 32,
            ModelVariant::Skinned => 40,
            ModelVariant::Lightmapped => 28,
        }
    }

    fn summary_stride(self) -> usize {
        match self {
            ModelVariant::Standard => 36,
            ModelVariant::Skinned => 40,
            ModelVariant::Lightmapped => 44,
        }
    }

    fn summary_reserved(self) -> usize {
        match self {
            ModelVariant::Standard => 5,
            ModelVariant::Skinned => 4,
            ModelVariant::Lightmapped => 6,
        }
    }

    fn submesh_stride(self) -> usize {
        match self {
            ModelVariant::Standard | ModelVariant::Skinned => 32,
            ModelVariant::Lightmapped => 28,
        }
    }
}

/// Layout table applied to `DNER` records when the model variant is
/// [`ModelVariant::Skinned`].
///
/// Known skinned models decode with the standard table; whether the two
/// layouts are intentionally identical is unconfirmed, so a strict mode is
/// available for callers that want to reject such files instead.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum SkinnedSubmeshMode {
    #[default]
    SharedWithStandard,
    Rejected,
}

/// `HSEM` chunk: one per file, carrying the layout discriminant and the
/// aggregate counts for every other section.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct ModelHeader {
    pub version: f32,
    pub date: [u32; 7],
    pub model_type: u32,
    pub reserved0: [u32; 3],
    pub bounds: [f32; 12],
    pub render_face_count: u32,
    pub render_vertex_count: u32,
    pub render_buffer_size: u32,
    pub collision_face_count: u32,
    pub collision_vertex_count: u32,
    pub collision_buffer_size: u32,
    pub radius: f32,
    pub magic_point_count: u16,
    pub attachment_count: u16,
    pub portal_vertex_count: u16,
    pub portal_face_count: u16,
    pub portal_count: u16,
    pub bone_count: u16,
    pub glow_count: u16,
    pub reserved1: [u8; 38],
}

impl ModelHeader {
    /// Layout variant governing every variant-dependent chunk in this file.
    pub fn variant(&self) -> Result<ModelVariant, FormatError> {
        ModelVariant::from_raw(self.model_type)
    }
}

/// `D3DR` chunk: geometry totals for the render model.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little, import(variant: ModelVariant))]
pub struct GeometrySummary {
    pub unk: u32,
    #[br(if(variant == ModelVariant::Lightmapped))]
    pub lightmap_count: Option<u32>,
    pub face_count: u32,
    pub mesh_count: u32,
    #[br(if(variant == ModelVariant::Skinned))]
    pub vertex_count_0: Option<u32>,
    #[br(if(variant == ModelVariant::Skinned))]
    pub vertex_count_1: Option<u32>,
    pub vertex_count: u32,
    #[br(count = variant.summary_reserved())]
    pub reserved: Vec<u32>,
}

/// `DNER` chunk: one record per submesh.
///
/// `face_count` drives the face-range derivation; the texture fields are
/// indices the host resolves by name lookup.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little, import(variant: ModelVariant))]
pub struct SubmeshDescriptor {
    pub opacity: u8,
    pub shininess: u8,
    pub color: u8,
    pub opacity_detail: u8,
    pub origin: CVector3f,
    pub offset_index: u16,
    pub face_count: u16,
    pub vertex_offset: u16,
    pub vertex_count: u16,
    pub diffuse_texture: i16,
    #[br(if(variant != ModelVariant::Lightmapped))]
    pub detail: Option<SubmeshDetail>,
    #[br(if(variant == ModelVariant::Lightmapped))]
    pub lightmap: Option<i16>,
}

/// Bump and reflection slots present outside the lightmapped layout.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct SubmeshDetail {
    pub bump_texture: i16,
    pub reflection_texture: i16,
    pub reflection_detail: u8,
    pub bump_detail: u8,
}

/// `XTRV` chunk: one render vertex.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little, import(variant: ModelVariant))]
pub struct Vertex {
    pub position: CVector3f,
    #[br(if(variant.has_normals()))]
    pub normal: Option<CVector3f>,
    pub uv: CVector2f,
    /// Third texture coordinate, skinned models only.
    #[br(if(variant == ModelVariant::Skinned))]
    pub w: Option<f32>,
    #[br(if(variant == ModelVariant::Skinned))]
    pub group: Option<u16>,
    #[br(if(variant == ModelVariant::Skinned))]
    pub bone: Option<u16>,
    /// Lightmap UV set, lightmapped models only.
    #[br(if(variant == ModelVariant::Lightmapped))]
    pub uv2: Option<CVector2f>,
}

/// `ECAF` chunk: three vertex indices in stored order. Winding is left to
/// the caller.
#[derive(BinRead, Copy, Clone, Debug, Eq, PartialEq)]
#[br(little)]
pub struct Face {
    pub a: u16,
    pub b: u16,
    pub c: u16,
}

/// `XTVC` chunk: one collision vertex.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little, import(variant: ModelVariant))]
pub struct CollisionVertex {
    pub position: CVector3f,
    #[br(if(variant == ModelVariant::Skinned))]
    pub bone: Option<u32>,
    #[br(if(variant != ModelVariant::Lightmapped))]
    pub reserved: Option<u32>,
    /// Unused in current files.
    #[br(if(variant == ModelVariant::Standard))]
    pub radius: Option<f32>,
    #[br(if(variant == ModelVariant::Lightmapped))]
    pub uv2: Option<CVector2f>,
}

/// `ECFC` chunk: one collision triangle.
#[derive(BinRead, Copy, Clone, Debug, Eq, PartialEq)]
#[br(little)]
pub struct CollisionFace {
    pub a: u16,
    pub b: u16,
    pub c: u16,
    pub material: u16,
    pub lightmap: u16,
    pub reserved: u16,
}

/// `XTVM` chunk: marker points such as attachment anchors.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct MagicPoint {
    pub position: CVector3f,
    pub reserved: i32,
}

/// `ATTA` chunk: named attachment point with a 3x3 orientation.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct Attachment {
    #[br(map = fixed_string)]
    pub name: String,
    pub position: CVector3f,
    pub orientation: [f32; 9],
    pub reserved: u32,
    pub node: i32,
}

/// `MANB` chunk: one fixed-width bone name per bone.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct BoneName {
    #[br(map = fixed_string)]
    pub name: String,
}

#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct Glow {
    pub position: CVector3f,
    pub size: f32,
    pub color: [f32; 3],
    pub reserved: u32,
}

/// `TROP` chunk: portal extents into the portal vertex and face buffers.
#[derive(BinRead, Copy, Clone, Debug, Eq, PartialEq)]
#[br(little)]
pub struct Portal {
    pub vertex_offset: u32,
    pub vertex_count: u32,
    pub face_offset: u32,
    pub face_count: u32,
    pub id: u32,
}

#[derive(BinRead, Copy, Clone, Debug, Eq, PartialEq)]
#[br(little)]
pub struct PortalFace {
    pub a: u32,
    pub b: u32,
    pub c: u32,
}

/// `HSMC` chunk: two banks of collision totals.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct CollisionSummary {
    pub primary: CollisionCounts,
    pub secondary: CollisionCounts,
}

#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct CollisionCounts {
    pub face_count: u32,
    pub vertex_count: u32,
    pub material_count: u32,
    pub sphere_count: u32,
    pub reserved: [u32; 4],
}

/// `TAMC` chunk: per-material collision response data.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct CollisionMaterial {
    pub opacity: f32,
    pub portal: u16,
    pub diffuse_texture: i16,
    pub unk0: u16,
    pub unk1: u16,
    pub material: i16,
    pub reserved: u16,
}

/// `HPSC` chunk: bounding sphere over a run of collision geometry.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct CollisionSphere {
    pub position: CVector3f,
    pub radius: f32,
    pub unk: [u16; 4],
}

/// `PMTL` chunk: per-lightmap page data.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct LightmapInfo {
    pub unk: [u16; 4],
}

#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct TextureAnimation {
    pub unk0: u32,
    pub unk1: u32,
}

/// `SEMS` chunk: per-submesh extents into the shadow buffers.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct ShadowSubmesh {
    pub face_offset: u32,
    pub vertex_offset: u32,
    pub edge_offset: u32,
    pub face_count: u32,
    pub vertex_count: u32,
    pub edge_count: u32,
    pub index: i32,
}

/// `CAFS` chunk: shadow triangle with its precomputed plane normal.
#[derive(BinRead, Clone, Debug, PartialEq)]
#[br(little)]
pub struct ShadowFace {
    pub a: u32,
    pub b: u32,
    pub c: u32,
    pub reserved: u32,
    pub normal: CVector3f,
}

#[derive(BinRead, Copy, Clone, Debug, Eq, PartialEq)]
#[br(little)]
pub struct ShadowEdge {
    pub a: u32,
    pub b: u32,
}

fn fixed_string(raw: [u8; 16]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).into_owned()
}

fn decode_records<T, F>(data: &[u8], stride: usize, mut read_one: F) -> Result<Vec<T>, FormatError>
where F: FnMut(&mut Cursor<&[u8]>) -> binrw::BinResult<T> {
    if data.len() % stride != 0 {
        return Err(FormatError::SizeMismatch { stride, len: data.len() });
    }
    let mut reader = Cursor::new(data);
    let mut records = Vec::with_capacity(data.len() / stride);
    for _ in 0..data.len() / stride {
        records.push(read_one(&mut reader)?);
    }
    Ok(records)
}

fn decode_record<T, F>(data: &[u8], stride: usize, mut read_one: F) -> Result<T, FormatError>
where F: FnMut(&mut Cursor<&[u8]>) -> binrw::BinResult<T> {
    if data.len() != stride {
        return Err(FormatError::SizeMismatch { stride, len: data.len() });
    }
    Ok(read_one(&mut Cursor::new(data))?)
}

/// Decode the `HSEM` model header.
pub fn decode_header(data: &[u8]) -> Result<ModelHeader, FormatError> {
    decode_record(data, 176, |r| r.read_le())
}

pub fn decode_geometry_summary(
    data: &[u8],
    variant: ModelVariant,
) -> Result<GeometrySummary, FormatError> {
    decode_record(data, variant.summary_stride(), |r| r.read_le_args((variant,)))
}

pub fn decode_submesh_descriptors(
    data: &[u8],
    variant: ModelVariant,
    mode: SkinnedSubmeshMode,
) -> Result<Vec<SubmeshDescriptor>, FormatError> {
    let table = match (variant, mode) {
        (ModelVariant::Skinned, SkinnedSubmeshMode::SharedWithStandard) => ModelVariant::Standard,
        (ModelVariant::Skinned, SkinnedSubmeshMode::Rejected) => {
            return Err(FormatError::UnknownVariant(variant as u32))
        }
        (variant, _) => variant,
    };
    decode_records(data, table.submesh_stride(), |r| r.read_le_args((table,)))
}

pub fn decode_vertices(data: &[u8], variant: ModelVariant) -> Result<Vec<Vertex>, FormatError> {
    decode_records(data, variant.vertex_stride(), |r| r.read_le_args((variant,)))
}

pub fn decode_faces(data: &[u8]) -> Result<Vec<Face>, FormatError> {
    decode_records(data, 6, |r| r.read_le())
}

pub fn decode_collision_vertices(
    data: &[u8],
    variant: ModelVariant,
) -> Result<Vec<CollisionVertex>, FormatError> {
    decode_records(data, 20, |r| r.read_le_args((variant,)))
}

pub fn decode_collision_faces(data: &[u8]) -> Result<Vec<CollisionFace>, FormatError> {
    decode_records(data, 12, |r| r.read_le())
}

pub fn decode_magic_points(data: &[u8]) -> Result<Vec<MagicPoint>, FormatError> {
    decode_records(data, 16, |r| r.read_le())
}

pub fn decode_attachments(data: &[u8]) -> Result<Vec<Attachment>, FormatError> {
    decode_records(data, 72, |r| r.read_le())
}

pub fn decode_bone_names(data: &[u8]) -> Result<Vec<BoneName>, FormatError> {
    decode_records(data, 16, |r| r.read_le())
}

pub fn decode_glows(data: &[u8]) -> Result<Vec<Glow>, FormatError> {
    decode_records(data, 32, |r| r.read_le())
}

pub fn decode_portals(data: &[u8]) -> Result<Vec<Portal>, FormatError> {
    decode_records(data, 20, |r| r.read_le())
}

pub fn decode_portal_vertices(data: &[u8]) -> Result<Vec<CVector3f>, FormatError> {
    decode_records(data, 12, |r| r.read_le())
}

pub fn decode_portal_faces(data: &[u8]) -> Result<Vec<PortalFace>, FormatError> {
    decode_records(data, 12, |r| r.read_le())
}

pub fn decode_collision_summary(data: &[u8]) -> Result<CollisionSummary, FormatError> {
    decode_record(data, 64, |r| r.read_le())
}

pub fn decode_collision_materials(data: &[u8]) -> Result<Vec<CollisionMaterial>, FormatError> {
    decode_records(data, 16, |r| r.read_le())
}

pub fn decode_collision_spheres(data: &[u8]) -> Result<Vec<CollisionSphere>, FormatError> {
    decode_records(data, 24, |r| r.read_le())
}

pub fn decode_lightmap_info(data: &[u8]) -> Result<Vec<LightmapInfo>, FormatError> {
    decode_records(data, 8, |r| r.read_le())
}

pub fn decode_texture_animations(data: &[u8]) -> Result<Vec<TextureAnimation>, FormatError> {
    decode_records(data, 8, |r| r.read_le())
}

pub fn decode_shadow_submeshes(data: &[u8]) -> Result<Vec<ShadowSubmesh>, FormatError> {
    decode_records(data, 28, |r| r.read_le())
}

pub fn decode_shadow_vertices(data: &[u8]) -> Result<Vec<CVector3f>, FormatError> {
    decode_records(data, 12, |r| r.read_le())
}

pub fn decode_shadow_faces(data: &[u8]) -> Result<Vec<ShadowFace>, FormatError> {
    decode_records(data, 28, |r| r.read_le())
}

pub fn decode_shadow_edges(data: &[u8]) -> Result<Vec<ShadowEdge>, FormatError> {
    decode_records(data, 8, |r| r.read_le())
}

/// Half-open face range owned by one submesh.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FaceRange {
    pub start: usize,
    pub count: usize,
}

impl FaceRange {
    pub fn end(self) -> usize { self.start + self.count }
}

/// Associate the flat `ECAF` face list with its owning submeshes.
///
/// Faces are stored grouped by submesh in descriptor order; the i-th submesh
/// owns `face_count` faces starting where the previous submesh ended. The
/// file stores no explicit link, so this accumulation is the only mapping.
pub fn derive_submesh_face_ranges(submeshes: &[SubmeshDescriptor]) -> Vec<FaceRange> {
    let mut start = 0usize;
    submeshes
        .iter()
        .map(|submesh| {
            let range = FaceRange { start, count: submesh.face_count as usize };
            start = range.end();
            range
        })
        .collect()
}

/// Fully decoded render model.
#[derive(Clone, Debug)]
pub struct ModelData {
    pub header: ModelHeader,
    pub summary: GeometrySummary,
    pub submeshes: Vec<SubmeshDescriptor>,
    pub face_ranges: Vec<FaceRange>,
    pub vertices: Vec<Vertex>,
    pub faces: Vec<Face>,
    pub magic_points: Vec<MagicPoint>,
    pub attachments: Vec<Attachment>,
    pub bone_names: Vec<BoneName>,
    pub glows: Vec<Glow>,
    pub lightmaps: Vec<LightmapInfo>,
    pub texture_animations: Vec<TextureAnimation>,
    pub portals: Option<PortalData>,
    pub collision: Option<CollisionData>,
}

#[derive(Clone, Debug)]
pub struct PortalData {
    pub portals: Vec<Portal>,
    pub vertices: Vec<CVector3f>,
    pub faces: Vec<PortalFace>,
}

#[derive(Clone, Debug)]
pub struct CollisionData {
    pub summary: Option<CollisionSummary>,
    pub vertices: Vec<CollisionVertex>,
    pub faces: Vec<CollisionFace>,
    pub materials: Vec<CollisionMaterial>,
    pub spheres: Vec<CollisionSphere>,
}

/// Fully decoded shadow model.
#[derive(Clone, Debug)]
pub struct ShadowData {
    pub submeshes: Vec<ShadowSubmesh>,
    pub vertices: Vec<CVector3f>,
    pub faces: Vec<ShadowFace>,
    pub edges: Vec<ShadowEdge>,
}

/// A decoded model file of either family.
#[derive(Clone, Debug)]
pub enum MefModel {
    Render(ModelData),
    Shadow(ShadowData),
}

fn require<'a>(reader: &IlffReader<'a>, tag: FourCC) -> Result<&'a [u8], FormatError> {
    reader.read(tag, false).ok_or(FormatError::MissingChunk(tag))
}

fn optional<'a, T>(
    reader: &IlffReader<'a>,
    tag: FourCC,
    decode: impl FnOnce(&'a [u8]) -> Result<Vec<T>, FormatError>,
) -> Result<Vec<T>, FormatError> {
    match reader.read(tag, false) {
        Some(data) => decode(data),
        None => Ok(Vec::new()),
    }
}

impl ModelData {
    pub fn read(reader: &IlffReader) -> Result<Self, FormatError> {
        let header = decode_header(require(reader, K_CHUNK_HSEM)?)?;
        let variant = header.variant()?;
        let summary = decode_geometry_summary(require(reader, K_CHUNK_D3DR)?, variant)?;
        let submeshes = decode_submesh_descriptors(
            require(reader, K_CHUNK_DNER)?,
            variant,
            SkinnedSubmeshMode::default(),
        )?;
        let vertices = decode_vertices(require(reader, K_CHUNK_XTRV)?, variant)?;
        let faces = decode_faces(require(reader, K_CHUNK_ECAF)?)?;

        let face_ranges = derive_submesh_face_ranges(&submeshes);
        if let Some(end) = face_ranges.last().map(|range| range.end()) {
            if end > faces.len() {
                return Err(FormatError::FaceRangeOutOfBounds { end, total: faces.len() });
            }
        }
        log::debug!(
            "decoded {variant:?} model: {} submeshes, {} vertices, {} faces",
            submeshes.len(),
            vertices.len(),
            faces.len()
        );

        let collision = match reader.read(K_CHUNK_XTVC, false) {
            Some(data) => Some(CollisionData {
                summary: reader
                    .read(K_CHUNK_HSMC, false)
                    .map(decode_collision_summary)
                    .transpose()?,
                vertices: decode_collision_vertices(data, variant)?,
                faces: decode_collision_faces(require(reader, K_CHUNK_ECFC)?)?,
                materials: optional(reader, K_CHUNK_TAMC, decode_collision_materials)?,
                spheres: optional(reader, K_CHUNK_HPSC, decode_collision_spheres)?,
            }),
            None => None,
        };
        let portals = match reader.read(K_CHUNK_TROP, false) {
            Some(data) => Some(PortalData {
                portals: decode_portals(data)?,
                vertices: optional(reader, K_CHUNK_XVTP, decode_portal_vertices)?,
                faces: optional(reader, K_CHUNK_CFTP, decode_portal_faces)?,
            }),
            None => None,
        };

        Ok(Self {
            header,
            summary,
            submeshes,
            face_ranges,
            vertices,
            faces,
            magic_points: optional(reader, K_CHUNK_XTVM, decode_magic_points)?,
            attachments: optional(reader, K_CHUNK_ATTA, decode_attachments)?,
            bone_names: optional(reader, K_CHUNK_MANB, decode_bone_names)?,
            glows: optional(reader, K_CHUNK_WOLG, decode_glows)?,
            lightmaps: optional(reader, K_CHUNK_PMTL, decode_lightmap_info)?,
            texture_animations: optional(reader, K_CHUNK_TXAN, decode_texture_animations)?,
            portals,
            collision,
        })
    }
}

impl ShadowData {
    pub fn read(reader: &IlffReader) -> Result<Self, FormatError> {
        let submeshes = decode_shadow_submeshes(require(reader, K_CHUNK_SEMS)?)?;
        let vertices = decode_shadow_vertices(require(reader, K_CHUNK_XTVS)?)?;
        let faces = decode_shadow_faces(require(reader, K_CHUNK_CAFS)?)?;
        let edges = decode_shadow_edges(require(reader, K_CHUNK_EGDE)?)?;
        log::debug!(
            "decoded shadow model: {} submeshes, {} vertices, {} faces, {} edges",
            submeshes.len(),
            vertices.len(),
            faces.len(),
            edges.len()
        );
        Ok(Self { submeshes, vertices, faces, edges })
    }
}

impl MefModel {
    /// Decode whichever model family the container holds.
    ///
    /// A file carries either the render header or the shadow header; the tag
    /// that is present selects the record family.
    pub fn read(reader: &IlffReader) -> Result<Self, FormatError> {
        if reader.find(K_CHUNK_HSEM) {
            Ok(Self::Render(ModelData::read(reader)?))
        } else if reader.find(K_CHUNK_SEMS) {
            Ok(Self::Shadow(ShadowData::read(reader)?))
        } else {
            Err(FormatError::MissingChunk(K_CHUNK_HSEM))
        }
    }

    /// Memory-map and decode a model file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FormatError> {
        let data = map_file(path)?;
        let reader = IlffReader::new(&data)?;
        Self::read(&reader)
    }
}
