//! foilcad 核心库
//!
//! 读取翼型坐标文件（`.dat`），并在提交给CAD宿主之前对点序列做二维仿射变换。
//!
//! # 流程
//!
//! 文件 → [`parser`] → [`AerofoilProfile`] → [`transform`] → 展平的坐标缓冲区
//!
//! # 示例
//!
//! ```rust
//! use foilcad_core::prelude::*;
//!
//! let profile = parse_dat("0.000000 0.000000\n1.000000 0.500000\n").unwrap();
//! let settings = TransformSettings {
//!     translate: Some(Translation { dx: 1000.0, dy: 0.0 }),
//!     ..Default::default()
//! };
//! let moved = settings.apply(&profile).unwrap();
//! assert_eq!(moved.to_flat_buffer(), vec![1.0, 0.0, 2.0, 0.5]);
//! ```

pub mod math;
pub mod parser;
pub mod profile;
pub mod transform;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::math::{BoundingBox2, Point2, Vector2, DISPLAY_UNITS_PER_HOST_UNIT, EPSILON};
    pub use crate::parser::{parse_dat, parse_file, ParseError};
    pub use crate::profile::AerofoilProfile;
    pub use crate::transform::{
        Mirror, ScaleSettings, Transform2D, TransformError, TransformSettings, Translation,
    };
}
