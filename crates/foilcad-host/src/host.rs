//! CAD宿主自动化接口
//!
//! 宿主的对象模型由宿主厂商决定，这里只保留导入翼型需要的调用：
//! 枚举参考平面与草图、新建草图、按点创建样条。
//!
//! 远程调用可能因宿主繁忙被拒绝，这类错误由 [`HostError::is_transient`]
//! 标识，调用方通过 [`crate::retry::RetryingHost`] 显式重试。

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! host_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

host_id!(
    /// 宿主文档句柄
    DocumentId
);
host_id!(
    /// 参考平面句柄
    PlaneId
);
host_id!(
    /// 草图句柄
    SketchId
);
host_id!(
    /// 曲线句柄
    CurveId
);

/// 文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Part,
    SheetMetal,
    Assembly,
    Draft,
}

impl DocumentKind {
    /// 只有零件类文档可以在参考平面上建草图
    pub fn supports_sketches(&self) -> bool {
        matches!(self, DocumentKind::Part | DocumentKind::SheetMetal)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub id: DocumentId,
    pub name: String,
    pub kind: DocumentKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaneInfo {
    pub id: PlaneId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SketchInfo {
    pub id: SketchId,
    pub name: String,
    pub plane: PlaneId,
}

/// 按点创建样条的请求
#[derive(Debug, Clone, PartialEq)]
pub struct SplineRequest {
    /// 样条阶数
    pub order: u32,
    /// 展平的坐标 `[x0, y0, x1, y1, ...]`，宿主单位
    pub points: Vec<f64>,
}

impl SplineRequest {
    pub fn point_count(&self) -> usize {
        self.points.len() / 2
    }
}

/// 宿主调用错误
#[derive(Error, Debug)]
pub enum HostError {
    /// 宿主正忙，拒绝了本次调用
    #[error("Host is busy: {0}")]
    Busy(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: u64 },

    #[error("Host rejected call: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DXF error: {0}")]
    Dxf(String),
}

impl HostError {
    /// 可以原样重试的错误
    pub fn is_transient(&self) -> bool {
        matches!(self, HostError::Busy(_))
    }
}

/// CAD宿主
///
/// 所有方法都是一次远程调用，实现方把自身的“繁忙”信号映射为
/// [`HostError::Busy`]。
pub trait CadHost {
    /// 当前活动文档，没有打开文档时返回 `None`
    fn active_document(&mut self) -> Result<Option<DocumentInfo>, HostError>;

    fn reference_planes(&mut self, doc: DocumentId) -> Result<Vec<PlaneInfo>, HostError>;

    fn sketches(&mut self, doc: DocumentId) -> Result<Vec<SketchInfo>, HostError>;

    /// 在参考平面上新建一个空草图
    fn create_sketch(
        &mut self,
        doc: DocumentId,
        plane: PlaneId,
        name: &str,
    ) -> Result<SketchId, HostError>;

    /// 删除草图及其中的全部曲线
    fn delete_sketch(&mut self, sketch: SketchId) -> Result<(), HostError>;

    /// 在草图中按点创建一条样条
    fn add_spline_by_points(
        &mut self,
        sketch: SketchId,
        request: &SplineRequest,
    ) -> Result<CurveId, HostError>;
}

impl<H: CadHost + ?Sized> CadHost for &mut H {
    fn active_document(&mut self) -> Result<Option<DocumentInfo>, HostError> {
        (**self).active_document()
    }

    fn reference_planes(&mut self, doc: DocumentId) -> Result<Vec<PlaneInfo>, HostError> {
        (**self).reference_planes(doc)
    }

    fn sketches(&mut self, doc: DocumentId) -> Result<Vec<SketchInfo>, HostError> {
        (**self).sketches(doc)
    }

    fn create_sketch(
        &mut self,
        doc: DocumentId,
        plane: PlaneId,
        name: &str,
    ) -> Result<SketchId, HostError> {
        (**self).create_sketch(doc, plane, name)
    }

    fn delete_sketch(&mut self, sketch: SketchId) -> Result<(), HostError> {
        (**self).delete_sketch(sketch)
    }

    fn add_spline_by_points(
        &mut self,
        sketch: SketchId,
        request: &SplineRequest,
    ) -> Result<CurveId, HostError> {
        (**self).add_spline_by_points(sketch, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_busy_is_transient() {
        assert!(HostError::Busy("call rejected".into()).is_transient());
        assert!(!HostError::Rejected("bad argument".into()).is_transient());
        assert!(!HostError::NotFound { kind: "Sketch", id: 3 }.is_transient());
    }

    #[test]
    fn test_document_kind_sketches() {
        assert!(DocumentKind::Part.supports_sketches());
        assert!(DocumentKind::SheetMetal.supports_sketches());
        assert!(!DocumentKind::Draft.supports_sketches());
        assert!(!DocumentKind::Assembly.supports_sketches());
    }

    #[test]
    fn test_spline_request_point_count() {
        let request = SplineRequest {
            order: 3,
            points: vec![0.0, 0.0, 1.0, 0.5, 2.0, 0.0],
        };
        assert_eq!(request.point_count(), 3);
    }
}
