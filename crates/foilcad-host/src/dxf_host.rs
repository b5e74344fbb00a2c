//! 基于DXF图纸的宿主
//!
//! 把一个DXF文件当作宿主中的零件文档：
//! - 三个固定参考平面：XY / XZ / YZ
//! - 草图对应图层，每个草图记住自己所在的参考平面
//! - 样条以拟合点形式写入 `SPLINE` 实体
//!
//! 宿主单位为米。新建图纸以米为单位；已有图纸保持原单位，拟合点写入前
//! 换算到图纸单位。新建的草图和曲线先保存在内存中，调用 [`DxfHost::save`]
//! 时才写入图纸。

use crate::host::{
    CadHost, CurveId, DocumentId, DocumentInfo, DocumentKind, HostError, PlaneId, PlaneInfo,
    SketchId, SketchInfo, SplineRequest,
};
use dxf::enums::{AcadVersion, Units};
use std::path::{Path, PathBuf};

const DOCUMENT_ID: DocumentId = DocumentId(1);

/// 默认图层，不作为草图
const DEFAULT_LAYER: &str = "0";

/// `SPLINE` 实体和 `$INSUNITS` 需要的最低版本
const MIN_VERSION: AcadVersion = AcadVersion::R2000;

/// 每个图纸单位对应的米数，无单位图纸按米处理
fn metres_per_unit(units: Units) -> Option<f64> {
    let factor = match units {
        Units::Unitless | Units::Meters => 1.0,
        Units::Millimeters => 1e-3,
        Units::Centimeters => 1e-2,
        Units::Decimeters => 1e-1,
        Units::Kilometers => 1e3,
        Units::Microns => 1e-6,
        Units::Inches => 0.0254,
        Units::Feet => 0.3048,
        Units::Yards => 0.9144,
        _ => return None,
    };
    Some(factor)
}

/// 参考平面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchPlane {
    Xy,
    Xz,
    Yz,
}

impl SketchPlane {
    pub const ALL: [SketchPlane; 3] = [SketchPlane::Xy, SketchPlane::Xz, SketchPlane::Yz];

    pub fn id(&self) -> PlaneId {
        match self {
            SketchPlane::Xy => PlaneId(1),
            SketchPlane::Xz => PlaneId(2),
            SketchPlane::Yz => PlaneId(3),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SketchPlane::Xy => "Top (XY)",
            SketchPlane::Xz => "Front (XZ)",
            SketchPlane::Yz => "Right (YZ)",
        }
    }

    pub fn from_id(id: PlaneId) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id() == id)
    }

    /// 草图内二维坐标 → 模型空间三维坐标
    pub fn to_model(&self, u: f64, v: f64) -> dxf::Point {
        match self {
            SketchPlane::Xy => dxf::Point::new(u, v, 0.0),
            SketchPlane::Xz => dxf::Point::new(u, 0.0, v),
            SketchPlane::Yz => dxf::Point::new(0.0, u, v),
        }
    }
}

#[derive(Debug, Clone)]
struct Sketch {
    id: SketchId,
    name: String,
    plane: SketchPlane,
    /// 图层已存在于图纸中
    persisted: bool,
}

/// 尚未写入图纸的样条
#[derive(Debug, Clone)]
pub struct PendingSpline {
    pub id: CurveId,
    pub sketch: SketchId,
    pub layer: String,
    pub degree: i32,
    pub fit_points: Vec<dxf::Point>,
}

/// DXF宿主
pub struct DxfHost {
    path: Option<PathBuf>,
    drawing: dxf::Drawing,
    /// 宿主单位（米）→ 图纸单位
    unit_scale: f64,
    sketches: Vec<Sketch>,
    pending: Vec<PendingSpline>,
    next_id: u64,
}

impl Default for DxfHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DxfHost {
    /// 没有打开任何文档的宿主
    pub fn new() -> Self {
        Self {
            path: None,
            drawing: dxf::Drawing::new(),
            unit_scale: 1.0,
            sketches: Vec::new(),
            pending: Vec::new(),
            next_id: 0,
        }
    }

    /// 打开DXF文件作为活动文档，文件不存在时新建空图纸
    ///
    /// 低于 R2000 的图纸保存时升级到 R2000；单位无法换算为米的图纸被拒绝。
    pub fn open(path: &Path) -> Result<Self, HostError> {
        let drawing = if path.exists() {
            let mut drawing =
                dxf::Drawing::load_file(path).map_err(|e| HostError::Dxf(e.to_string()))?;
            if drawing.header.version < MIN_VERSION {
                tracing::warn!(
                    "{} is a {:?} drawing, it will be saved as {:?}",
                    path.display(),
                    drawing.header.version,
                    MIN_VERSION
                );
                drawing.header.version = MIN_VERSION;
            }
            drawing
        } else {
            tracing::info!("{} does not exist, starting a new drawing", path.display());
            let mut drawing = dxf::Drawing::new();
            drawing.header.version = MIN_VERSION;
            drawing.header.default_drawing_units = Units::Meters;
            drawing
        };

        let units = drawing.header.default_drawing_units;
        let metres = metres_per_unit(units).ok_or_else(|| {
            HostError::Rejected(format!("unsupported drawing units {:?}", units))
        })?;

        let mut host = Self {
            path: Some(path.to_path_buf()),
            drawing,
            unit_scale: 1.0 / metres,
            sketches: Vec::new(),
            pending: Vec::new(),
            next_id: 0,
        };

        let layers: Vec<String> = host
            .drawing
            .layers()
            .map(|layer| layer.name.clone())
            .filter(|name| name != DEFAULT_LAYER)
            .collect();
        for name in layers {
            let id = host.allocate_sketch_id();
            host.sketches.push(Sketch {
                id,
                name,
                plane: SketchPlane::Xy,
                persisted: true,
            });
        }

        tracing::info!(
            "Opened {} with {} sketches",
            path.display(),
            host.sketches.len()
        );

        Ok(host)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn drawing(&self) -> &dxf::Drawing {
        &self.drawing
    }

    /// 图纸单位
    pub fn units(&self) -> Units {
        self.drawing.header.default_drawing_units
    }

    /// 尚未保存的样条
    pub fn pending_splines(&self) -> &[PendingSpline] {
        &self.pending
    }

    /// 把新建的草图和样条写入图纸并保存到原路径
    pub fn save(&mut self) -> Result<PathBuf, HostError> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| HostError::Rejected("no document is open".to_string()))?;
        self.save_as(&path)?;
        Ok(path)
    }

    pub fn save_as(&mut self, path: &Path) -> Result<(), HostError> {
        self.flush();
        self.drawing
            .save_file(path)
            .map_err(|e| HostError::Dxf(e.to_string()))?;

        tracing::info!("Saved drawing to {}", path.display());
        Ok(())
    }

    fn flush(&mut self) {
        for sketch in self.sketches.iter_mut().filter(|s| !s.persisted) {
            let mut layer = dxf::tables::Layer::default();
            layer.name = sketch.name.clone();
            self.drawing.add_layer(layer);
            sketch.persisted = true;
        }

        for pending in self.pending.drain(..) {
            let mut spline = dxf::entities::Spline::default();
            spline.degree_of_curve = pending.degree;
            spline.fit_points = pending.fit_points;

            let mut entity = dxf::entities::Entity::new(dxf::entities::EntityType::Spline(spline));
            entity.common.layer = pending.layer;
            self.drawing.add_entity(entity);
        }
    }

    fn allocate_sketch_id(&mut self) -> SketchId {
        self.next_id += 1;
        SketchId(self.next_id)
    }

    fn check_document(&self, doc: DocumentId) -> Result<(), HostError> {
        if self.path.is_none() || doc != DOCUMENT_ID {
            return Err(HostError::NotFound {
                kind: "Document",
                id: doc.0,
            });
        }
        Ok(())
    }

    fn sketch(&self, id: SketchId) -> Result<&Sketch, HostError> {
        self.sketches
            .iter()
            .find(|s| s.id == id)
            .ok_or(HostError::NotFound {
                kind: "Sketch",
                id: id.0,
            })
    }
}

impl CadHost for DxfHost {
    fn active_document(&mut self) -> Result<Option<DocumentInfo>, HostError> {
        Ok(self.path.as_ref().map(|path| DocumentInfo {
            id: DOCUMENT_ID,
            name: path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            kind: DocumentKind::Part,
        }))
    }

    fn reference_planes(&mut self, doc: DocumentId) -> Result<Vec<PlaneInfo>, HostError> {
        self.check_document(doc)?;
        Ok(SketchPlane::ALL
            .iter()
            .map(|p| PlaneInfo {
                id: p.id(),
                name: p.name().to_string(),
            })
            .collect())
    }

    fn sketches(&mut self, doc: DocumentId) -> Result<Vec<SketchInfo>, HostError> {
        self.check_document(doc)?;
        Ok(self
            .sketches
            .iter()
            .map(|s| SketchInfo {
                id: s.id,
                name: s.name.clone(),
                plane: s.plane.id(),
            })
            .collect())
    }

    fn create_sketch(
        &mut self,
        doc: DocumentId,
        plane: PlaneId,
        name: &str,
    ) -> Result<SketchId, HostError> {
        self.check_document(doc)?;
        let plane = SketchPlane::from_id(plane).ok_or(HostError::NotFound {
            kind: "Plane",
            id: plane.0,
        })?;
        if name.is_empty() || name == DEFAULT_LAYER {
            return Err(HostError::Rejected(format!("invalid sketch name '{}'", name)));
        }
        if self.sketches.iter().any(|s| s.name.eq_ignore_ascii_case(name)) {
            return Err(HostError::Rejected(format!("sketch '{}' already exists", name)));
        }

        let id = self.allocate_sketch_id();
        self.sketches.push(Sketch {
            id,
            name: name.to_string(),
            plane,
            persisted: false,
        });
        tracing::debug!("Created sketch '{}' on {}", name, plane.name());
        Ok(id)
    }

    fn delete_sketch(&mut self, sketch: SketchId) -> Result<(), HostError> {
        if self.sketch(sketch)?.persisted {
            return Err(HostError::Rejected(format!(
                "sketch {} is already saved in the drawing",
                sketch
            )));
        }
        self.sketches.retain(|s| s.id != sketch);
        self.pending.retain(|p| p.sketch != sketch);
        Ok(())
    }

    fn add_spline_by_points(
        &mut self,
        sketch: SketchId,
        request: &SplineRequest,
    ) -> Result<CurveId, HostError> {
        let target = self.sketch(sketch)?;
        if request.points.len() % 2 != 0 {
            return Err(HostError::Rejected(
                "point buffer must hold x,y pairs".to_string(),
            ));
        }
        if request.order < 2 || request.point_count() < request.order as usize {
            return Err(HostError::Rejected(format!(
                "spline of order {} needs at least {} points, got {}",
                request.order,
                request.order.max(2),
                request.point_count()
            )));
        }

        let scale = self.unit_scale;
        let fit_points = request
            .points
            .chunks_exact(2)
            .map(|xy| target.plane.to_model(xy[0] * scale, xy[1] * scale))
            .collect();
        let layer = target.name.clone();

        self.next_id += 1;
        let id = CurveId(self.next_id);
        self.pending.push(PendingSpline {
            id,
            sketch,
            layer,
            degree: request.order as i32 - 1,
            fit_points,
        });
        Ok(id)
    }
}
