//! 导入会话
//!
//! 会话持有当前加载的翼型、来源文件和导入设置，显式传给变换与提交流程。
//!
//! 一次导入要么在宿主文档中新建恰好一条样条，要么不改变文档：
//! 所有前置条件和变换都在第一次修改宿主之前完成；如果样条创建失败，
//! 本次导入新建的草图会被删除。

use crate::host::{
    CadHost, CurveId, DocumentInfo, DocumentKind, HostError, PlaneInfo, SketchId, SketchInfo,
    SplineRequest,
};
use crate::retry::RetryingHost;
use foilcad_core::math::BoundingBox2;
use foilcad_core::parser::{self, ParseError};
use foilcad_core::profile::AerofoilProfile;
use foilcad_core::transform::{TransformError, TransformSettings};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 默认样条阶数
pub const DEFAULT_SPLINE_ORDER: u32 = 3;

/// 未指定名称时新建草图的名称
pub const DEFAULT_SKETCH_NAME: &str = "Aerofoil";

/// 导入错误
#[derive(Error, Debug)]
pub enum ImportError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("No aerofoil profile loaded")]
    NoProfile,

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("Spline order {order} is invalid for {points} points")]
    InvalidOrder { order: u32, points: usize },

    #[error("No document is open in the host")]
    NoDocument,

    #[error("Active document is a {0:?} document, a part document is required")]
    WrongDocumentKind(DocumentKind),

    #[error("Target not found: {0}")]
    TargetNotFound(String),

    #[error("Host call failed: {0}")]
    Host(#[from] HostError),
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 文件内容无法解析为翼型
    Format,
    /// 导入条件不满足，未做任何修改
    Precondition,
    /// 宿主调用失败
    Host,
}

impl ImportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::Parse(ParseError::Io { .. }) => ErrorCategory::Precondition,
            ImportError::Parse(_) => ErrorCategory::Format,
            ImportError::Host(_) => ErrorCategory::Host,
            _ => ErrorCategory::Precondition,
        }
    }
}

/// 导入目标
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportTarget {
    /// 写入已有草图
    Sketch(String),
    /// 在参考平面上新建草图
    Plane(String),
}

impl Default for ImportTarget {
    fn default() -> Self {
        ImportTarget::Plane("Top (XY)".to_string())
    }
}

impl std::fmt::Display for ImportTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportTarget::Sketch(name) => write!(f, "sketch '{}'", name),
            ImportTarget::Plane(name) => write!(f, "plane '{}'", name),
        }
    }
}

/// 导入设置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub transform: TransformSettings,
    pub target: ImportTarget,
    /// 新建草图的名称，缺省时使用翼型名称
    pub sketch_name: Option<String>,
    pub spline_order: u32,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            transform: TransformSettings::default(),
            target: ImportTarget::default(),
            sketch_name: None,
            spline_order: DEFAULT_SPLINE_ORDER,
        }
    }
}

/// 活动文档中的可选目标
#[derive(Debug, Clone, Serialize)]
pub struct TargetListing {
    pub document: DocumentInfo,
    pub planes: Vec<PlaneInfo>,
    pub sketches: Vec<SketchInfo>,
}

/// 导入结果
#[derive(Debug, Clone)]
pub struct ImportReport {
    pub document: String,
    pub sketch: SketchId,
    pub sketch_name: String,
    /// 草图是否由本次导入新建
    pub created_sketch: bool,
    pub curve: CurveId,
    pub point_count: usize,
    /// 宿主单位下的包围盒
    pub bounding_box: BoundingBox2,
}

enum ResolvedTarget {
    Sketch(SketchInfo),
    Plane { plane: PlaneInfo, sketch_name: String },
}

/// 导入会话
#[derive(Debug, Default)]
pub struct ImportSession {
    profile: Option<AerofoilProfile>,
    source: Option<PathBuf>,
    settings: ImportSettings,
}

impl ImportSession {
    pub fn new(settings: ImportSettings) -> Self {
        Self {
            profile: None,
            source: None,
            settings,
        }
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ImportSettings {
        &mut self.settings
    }

    pub fn profile(&self) -> Option<&AerofoilProfile> {
        self.profile.as_ref()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 加载翼型文件，替换当前翼型
    ///
    /// 解析失败时清空当前翼型。
    pub fn load_profile(&mut self, path: &Path) -> Result<&AerofoilProfile, ImportError> {
        match parser::parse_file(path) {
            Ok(profile) => {
                self.source = Some(path.to_path_buf());
                let profile: &AerofoilProfile = self.profile.insert(profile);
                Ok(profile)
            }
            Err(err) => {
                self.clear_profile();
                tracing::error!("Failed to load {}: {}", path.display(), err);
                Err(err.into())
            }
        }
    }

    pub fn set_profile(&mut self, profile: AerofoilProfile) {
        self.profile = Some(profile);
        self.source = None;
    }

    pub fn clear_profile(&mut self) {
        self.profile = None;
        self.source = None;
    }

    /// 变换后的翼型（宿主单位），不访问宿主
    pub fn preview(&self) -> Result<AerofoilProfile, ImportError> {
        let profile = self.loaded_profile()?;
        Ok(self.settings.transform.apply(profile)?)
    }

    /// 列出活动文档的参考平面和草图
    pub fn list_targets<H: CadHost>(
        &self,
        host: &mut RetryingHost<H>,
    ) -> Result<TargetListing, ImportError> {
        let document = host
            .call("active_document", |h| h.active_document())?
            .ok_or(ImportError::NoDocument)?;
        let planes = host.call("reference_planes", |h| h.reference_planes(document.id))?;
        let sketches = host.call("sketches", |h| h.sketches(document.id))?;

        Ok(TargetListing {
            document,
            planes,
            sketches,
        })
    }

    /// 把变换后的翼型作为一条样条导入宿主
    pub fn import<H: CadHost>(
        &self,
        host: &mut RetryingHost<H>,
    ) -> Result<ImportReport, ImportError> {
        let profile = self.loaded_profile()?;
        let transformed = self.settings.transform.apply(profile)?;

        let order = self.settings.spline_order;
        if order < 2 || transformed.len() < order as usize {
            return Err(ImportError::InvalidOrder {
                order,
                points: transformed.len(),
            });
        }

        let document = host
            .call("active_document", |h| h.active_document())?
            .ok_or(ImportError::NoDocument)?;
        if !document.kind.supports_sketches() {
            return Err(ImportError::WrongDocumentKind(document.kind));
        }

        let target = self.resolve_target(host, &document, profile)?;

        let request = SplineRequest {
            order,
            points: transformed.to_flat_buffer(),
        };

        let (sketch, sketch_name, created_sketch) = match target {
            ResolvedTarget::Sketch(info) => (info.id, info.name, false),
            ResolvedTarget::Plane { plane, sketch_name } => {
                let id = host.call("create_sketch", |h| {
                    h.create_sketch(document.id, plane.id, &sketch_name)
                })?;
                tracing::info!("Created sketch '{}' on {}", sketch_name, plane.name);
                (id, sketch_name, true)
            }
        };

        let curve = match host.call("add_spline_by_points", |h| {
            h.add_spline_by_points(sketch, &request)
        }) {
            Ok(curve) => curve,
            Err(err) => {
                if created_sketch {
                    rollback_sketch(host, sketch, &sketch_name);
                }
                return Err(err.into());
            }
        };

        tracing::info!(
            "Imported {} points into sketch '{}' of {}",
            transformed.len(),
            sketch_name,
            document.name
        );

        Ok(ImportReport {
            document: document.name,
            sketch,
            sketch_name,
            created_sketch,
            curve,
            point_count: transformed.len(),
            bounding_box: transformed.bounding_box(),
        })
    }

    fn loaded_profile(&self) -> Result<&AerofoilProfile, ImportError> {
        self.profile
            .as_ref()
            .filter(|p| !p.is_empty())
            .ok_or(ImportError::NoProfile)
    }

    fn resolve_target<H: CadHost>(
        &self,
        host: &mut RetryingHost<H>,
        document: &DocumentInfo,
        profile: &AerofoilProfile,
    ) -> Result<ResolvedTarget, ImportError> {
        let sketches = host.call("sketches", |h| h.sketches(document.id))?;

        match &self.settings.target {
            ImportTarget::Sketch(name) => sketches
                .into_iter()
                .find(|s| s.name.eq_ignore_ascii_case(name))
                .map(ResolvedTarget::Sketch)
                .ok_or_else(|| ImportError::TargetNotFound(self.settings.target.to_string())),
            ImportTarget::Plane(name) => {
                let planes = host.call("reference_planes", |h| h.reference_planes(document.id))?;
                let plane = planes
                    .into_iter()
                    .find(|p| plane_matches(&p.name, name))
                    .ok_or_else(|| ImportError::TargetNotFound(self.settings.target.to_string()))?;

                let base = self
                    .settings
                    .sketch_name
                    .as_deref()
                    .or(profile.name())
                    .unwrap_or(DEFAULT_SKETCH_NAME);
                let sketch_name = unique_name(base, &sketches);

                Ok(ResolvedTarget::Plane { plane, sketch_name })
            }
        }
    }
}

/// 平面名称匹配，也接受括号中的简称，如 `xy` 匹配 `Top (XY)`
fn plane_matches(plane_name: &str, wanted: &str) -> bool {
    if plane_name.eq_ignore_ascii_case(wanted) {
        return true;
    }
    plane_name
        .split_once('(')
        .and_then(|(_, rest)| rest.strip_suffix(')'))
        .is_some_and(|short| short.eq_ignore_ascii_case(wanted))
}

fn unique_name(base: &str, existing: &[SketchInfo]) -> String {
    let taken = |name: &str| existing.iter().any(|s| s.name.eq_ignore_ascii_case(name));
    if !taken(base) {
        return base.to_string();
    }
    (2..)
        .map(|n| format!("{} ({})", base, n))
        .find(|name| !taken(name))
        .unwrap_or_else(|| base.to_string())
}

fn rollback_sketch<H: CadHost>(host: &mut RetryingHost<H>, sketch: SketchId, name: &str) {
    match host.call("delete_sketch", |h| h.delete_sketch(sketch)) {
        Ok(()) => tracing::warn!("Spline creation failed, removed sketch '{}'", name),
        Err(err) => tracing::warn!("Failed to remove sketch '{}' after error: {}", name, err),
    }
}
