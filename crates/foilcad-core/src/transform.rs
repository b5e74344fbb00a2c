//! 二维仿射变换
//!
//! 导入前对翼型依次执行：缩放 → 镜像 → 旋转 → 平移。
//! 每一步都可单独启用，顺序固定。各步合成为一个齐次矩阵后作用于全部点，
//! 输入轮廓不被修改。
//!
//! 宽度和平移量以显示单位（毫米）给出，换算到宿主单位（米）时除以
//! [`DISPLAY_UNITS_PER_HOST_UNIT`]。

use crate::math::{display_to_host, Point2, DISPLAY_UNITS_PER_HOST_UNIT, EPSILON};
use crate::profile::AerofoilProfile;
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 变换错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Target width must be positive, got {0}")]
    NonPositiveWidth(f64),

    #[error("Y scale factor must be positive, got {0}")]
    NonPositiveYScale(f64),

    #[error("Profile has no extent along X, cannot scale to a width")]
    DegenerateExtent,

    #[error("Invalid {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },
}

/// 二维仿射变换（3x3齐次矩阵）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    pub matrix: Matrix3<f64>,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    pub fn translation(dx: f64, dy: f64) -> Self {
        Self {
            matrix: Matrix3::new_translation(&nalgebra::Vector2::new(dx, dy)),
        }
    }

    /// 绕原点旋转（弧度，逆时针为正）
    pub fn rotation(angle: f64) -> Self {
        Self {
            matrix: Matrix3::new_rotation(angle),
        }
    }

    /// 绕原点顺时针旋转（角度）
    pub fn rotation_clockwise_degrees(degrees: f64) -> Self {
        Self::rotation(-degrees.to_radians())
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self {
            matrix: Matrix3::new_nonuniform_scaling(&nalgebra::Vector2::new(sx, sy)),
        }
    }

    pub fn mirror(mirror: Mirror) -> Self {
        match mirror {
            Mirror::None => Self::identity(),
            Mirror::Horizontal => Self::scale(-1.0, 1.0),
            Mirror::Vertical => Self::scale(1.0, -1.0),
        }
    }

    /// 先应用 `self`，再应用 `next`
    pub fn then(&self, next: &Transform2D) -> Self {
        Self {
            matrix: next.matrix * self.matrix,
        }
    }

    pub fn apply(&self, point: &Point2) -> Point2 {
        let v = self.matrix * Vector3::new(point.x, point.y, 1.0);
        Point2::new(v.x, v.y)
    }

    pub fn is_identity(&self) -> bool {
        (self.matrix - Matrix3::identity()).abs().max() < EPSILON
    }
}

/// 镜像方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mirror {
    #[default]
    None,
    /// 关于竖直轴镜像：x 取反
    Horizontal,
    /// 关于水平轴镜像：y 取反
    Vertical,
}

/// 缩放设置
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleSettings {
    /// 目标弦长（显示单位），等比缩放
    pub width: Option<f64>,
    /// Y方向缩放系数（无单位），改变相对厚度
    pub y_factor: Option<f64>,
}

/// 平移量（显示单位）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Translation {
    pub dx: f64,
    pub dy: f64,
}

/// 变换设置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformSettings {
    pub scale: ScaleSettings,
    pub mirror: Mirror,
    /// 顺时针旋转角度
    pub rotate_degrees: Option<f64>,
    pub translate: Option<Translation>,
}

impl TransformSettings {
    /// 校验参数，不需要轮廓
    pub fn validate(&self) -> Result<(), TransformError> {
        if let Some(width) = self.scale.width {
            finite("width", width)?;
            if width <= 0.0 {
                return Err(TransformError::NonPositiveWidth(width));
            }
        }
        if let Some(factor) = self.scale.y_factor {
            finite("y scale", factor)?;
            if factor <= 0.0 {
                return Err(TransformError::NonPositiveYScale(factor));
            }
        }
        if let Some(angle) = self.rotate_degrees {
            finite("rotation angle", angle)?;
        }
        if let Some(t) = self.translate {
            finite("x offset", t.dx)?;
            finite("y offset", t.dy)?;
        }
        Ok(())
    }

    /// 针对给定轮廓合成变换矩阵
    pub fn to_transform(&self, profile: &AerofoilProfile) -> Result<Transform2D, TransformError> {
        self.validate()?;

        let mut transform = Transform2D::identity();

        if let Some(width) = self.scale.width {
            let extent = profile.extent_x();
            if extent < EPSILON {
                return Err(TransformError::DegenerateExtent);
            }
            let factor = display_to_host(width) / extent;
            transform = transform.then(&Transform2D::scale(factor, factor));
        }
        if let Some(factor) = self.scale.y_factor {
            transform = transform.then(&Transform2D::scale(1.0, factor));
        }

        transform = transform.then(&Transform2D::mirror(self.mirror));

        if let Some(angle) = self.rotate_degrees {
            transform = transform.then(&Transform2D::rotation_clockwise_degrees(angle));
        }

        if let Some(t) = self.translate {
            transform = transform.then(&Transform2D::translation(
                t.dx / DISPLAY_UNITS_PER_HOST_UNIT,
                t.dy / DISPLAY_UNITS_PER_HOST_UNIT,
            ));
        }

        Ok(transform)
    }

    /// 生成变换后的新轮廓
    pub fn apply(&self, profile: &AerofoilProfile) -> Result<AerofoilProfile, TransformError> {
        let transform = self.to_transform(profile)?;
        if transform.is_identity() {
            return Ok(profile.clone());
        }

        tracing::debug!("Applying transform {:?} to {} points", self, profile.len());
        Ok(profile.map_points(|p| transform.apply(p)))
    }
}

fn finite(name: &'static str, value: f64) -> Result<(), TransformError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TransformError::InvalidParameter { name, value })
    }
}
