//! 翼型轮廓
//!
//! 翼型轮廓是一条有序的二维点序列，描述机翼截面的外形。
//! 点的顺序即描线顺序，不可重排。

use crate::math::{BoundingBox2, Point2};
use serde::{Deserialize, Serialize};

/// 翼型轮廓
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AerofoilProfile {
    /// 文件中的翼型名称（第一行非坐标文本）
    name: Option<String>,
    points: Vec<Point2>,
}

impl AerofoilProfile {
    pub fn new(points: Vec<Point2>) -> Self {
        Self { name: None, points }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points(self.points.iter().copied())
    }

    /// X方向跨度（弦长方向）
    pub fn extent_x(&self) -> f64 {
        self.bounding_box().width()
    }

    /// Y方向跨度（厚度方向）
    pub fn extent_y(&self) -> f64 {
        self.bounding_box().height()
    }

    /// 首尾点在容差内重合时视为闭合曲线
    pub fn is_closed(&self, tolerance: f64) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 2 => {
                (first - last).norm() <= tolerance
            }
            _ => false,
        }
    }

    /// 对每个点应用映射，生成新的轮廓（名称保留）
    pub fn map_points(&self, f: impl Fn(&Point2) -> Point2) -> Self {
        Self {
            name: self.name.clone(),
            points: self.points.iter().map(f).collect(),
        }
    }

    /// 展平为 `[x0, y0, x1, y1, ...]`，宿主样条接口使用该布局
    pub fn to_flat_buffer(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }
}

impl From<Vec<Point2>> for AerofoilProfile {
    fn from(points: Vec<Point2>) -> Self {
        Self::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::EPSILON;

    fn diamond() -> AerofoilProfile {
        AerofoilProfile::new(vec![
            Point2::new(1.0, 0.0),
            Point2::new(0.5, 0.1),
            Point2::new(0.0, 0.0),
            Point2::new(0.5, -0.05),
            Point2::new(1.0, 0.0),
        ])
    }

    #[test]
    fn test_extents() {
        let profile = diamond();
        assert!((profile.extent_x() - 1.0).abs() < EPSILON);
        assert!((profile.extent_y() - 0.15).abs() < EPSILON);
    }

    #[test]
    fn test_is_closed() {
        assert!(diamond().is_closed(1e-9));

        let open = AerofoilProfile::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.5)]);
        assert!(!open.is_closed(1e-9));
        assert!(!AerofoilProfile::default().is_closed(1e-9));
    }

    #[test]
    fn test_flat_buffer_order() {
        let profile = AerofoilProfile::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.5)]);
        assert_eq!(profile.to_flat_buffer(), vec![0.0, 0.0, 1.0, 0.5]);
    }

    #[test]
    fn test_map_points_keeps_name() {
        let profile = diamond().with_name("NACA 0012");
        let moved = profile.map_points(|p| Point2::new(p.x + 1.0, p.y));
        assert_eq!(moved.name(), Some("NACA 0012"));
        assert_eq!(moved.points()[2], Point2::new(1.0, 0.0));
        // 原轮廓不变
        assert_eq!(profile.points()[2], Point2::new(0.0, 0.0));
    }
}
