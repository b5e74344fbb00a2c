//! 导入设置
//!
//! 设置文件为TOML格式，结构与 [`ImportSettings`] 一致：
//!
//! ```toml
//! spline_order = 3
//! sketch_name = "Root rib"
//!
//! [target]
//! plane = "Front (XZ)"
//!
//! [transform]
//! mirror = "vertical"
//! rotate_degrees = 2.0
//!
//! [transform.scale]
//! width = 250.0
//!
//! [transform.translate]
//! dx = 0.0
//! dy = -12.5
//! ```
//!
//! 命令行参数覆盖文件中的值。

use std::path::Path;

use anyhow::{Context, Result};
use foilcad_core::transform::Translation;
use foilcad_host::{ImportSettings, ImportTarget};

use crate::cli::ImportArgs;

pub fn load(path: &Path) -> Result<ImportSettings> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file {}", path.display()))?;
    let settings: ImportSettings = toml::from_str(&text)
        .with_context(|| format!("Invalid settings file {}", path.display()))?;
    tracing::debug!("Loaded settings from {}: {:?}", path.display(), settings);
    Ok(settings)
}

/// 设置文件（如有）叠加命令行参数
pub fn resolve(args: &ImportArgs) -> Result<ImportSettings> {
    let mut settings = match &args.settings {
        Some(path) => load(path)?,
        None => ImportSettings::default(),
    };
    apply_overrides(&mut settings, args);
    Ok(settings)
}

fn apply_overrides(settings: &mut ImportSettings, args: &ImportArgs) {
    if let Some(name) = &args.sketch {
        settings.target = ImportTarget::Sketch(name.clone());
    }
    if let Some(name) = &args.plane {
        settings.target = ImportTarget::Plane(name.clone());
    }
    if let Some(name) = &args.sketch_name {
        settings.sketch_name = Some(name.clone());
    }
    if let Some(order) = args.order {
        settings.spline_order = order;
    }

    let transform = &mut settings.transform;
    if let Some(width) = args.width {
        transform.scale.width = Some(width);
    }
    if let Some(factor) = args.y_scale {
        transform.scale.y_factor = Some(factor);
    }
    if let Some(mirror) = args.mirror {
        transform.mirror = mirror.into();
    }
    if let Some(angle) = args.rotate {
        transform.rotate_degrees = Some(angle);
    }
    if args.dx.is_some() || args.dy.is_some() {
        let base = transform.translate.unwrap_or_default();
        transform.translate = Some(Translation {
            dx: args.dx.unwrap_or(base.dx),
            dy: args.dy.unwrap_or(base.dy),
        });
    }
}
