//! 翼型坐标文件解析器
//!
//! 支持的 `.dat` 布局：
//! - Selig 格式：单段坐标，从后缘绕过前缘回到后缘
//! - Lednicer 格式：上、下表面两段，均从前缘开始，以空行分隔
//!
//! 每个坐标行是两个以空白分隔的带符号小数，小数点后恰好六位：
//!
//! ```text
//! NACA 2412
//!   1.000000  0.001300
//!   0.950000  0.011400
//! ```
//!
//! 不匹配的行（标题、点数行等）被忽略。

use crate::math::Point2;
use crate::profile::AerofoilProfile;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static COORDINATE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([-+]?\d+\.\d{6})\s+([-+]?\d+\.\d{6})\s*$")
        .expect("coordinate pattern is valid")
});

/// 解析错误
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid format: expected one or two coordinate segments, found {0}")]
    SegmentCount(usize),

    #[error(
        "Invalid format: segments start at different points ({:.6}, {:.6}) and ({:.6}, {:.6})",
        .first.x, .first.y, .second.x, .second.y
    )]
    MismatchedLeadingPoints { first: Point2, second: Point2 },
}

/// 从文件解析翼型
pub fn parse_file(path: &Path) -> Result<AerofoilProfile, ParseError> {
    let text = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let profile = parse_dat(&text)?;

    tracing::info!(
        "Parsed {} points from {}{}",
        profile.len(),
        path.display(),
        profile.name().map(|n| format!(" ({})", n)).unwrap_or_default()
    );

    Ok(profile)
}

/// 解析 `.dat` 文本内容
///
/// 没有任何坐标段时返回空轮廓；导入时再作为“未加载翼型”处理。
pub fn parse_dat(text: &str) -> Result<AerofoilProfile, ParseError> {
    let mut segments = split_segments(text)
        .into_iter()
        .map(|segment| extract_points(&segment))
        .filter(|points| !points.is_empty())
        .collect::<Vec<_>>();

    let points = match segments.len() {
        0 => {
            tracing::warn!("No coordinate lines found");
            Vec::new()
        }
        1 => segments.remove(0),
        2 => {
            let second = segments.remove(1);
            let first = segments.remove(0);
            join_half_curves(first, second)?
        }
        n => return Err(ParseError::SegmentCount(n)),
    };

    let profile = AerofoilProfile::new(points);
    Ok(match title_line(text) {
        Some(title) => profile.with_name(title),
        None => profile,
    })
}

/// 按空行把文本切分为段
fn split_segments(text: &str) -> Vec<Vec<&str>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

fn extract_points(lines: &[&str]) -> Vec<Point2> {
    lines.iter().filter_map(|line| parse_coordinate_line(line)).collect()
}

fn parse_coordinate_line(line: &str) -> Option<Point2> {
    let caps = COORDINATE_LINE.captures(line)?;
    let x = caps[1].parse::<f64>().ok()?;
    let y = caps[2].parse::<f64>().ok()?;
    Some(Point2::new(x, y))
}

/// 拼接上下两个半曲线
///
/// 两段共用首点（前缘）。第一段去掉共用首点后反转，接在第二段之前，
/// 得到一条从第一段末端经前缘到第二段末端的连续曲线。
fn join_half_curves(first: Vec<Point2>, second: Vec<Point2>) -> Result<Vec<Point2>, ParseError> {
    if first[0] != second[0] {
        return Err(ParseError::MismatchedLeadingPoints {
            first: first[0],
            second: second[0],
        });
    }

    let mut points = Vec::with_capacity(first.len() + second.len() - 1);
    points.extend(first.into_iter().skip(1).rev());
    points.extend(second);
    Ok(points)
}

/// 第一行非空且非坐标的文本作为翼型名称
fn title_line(text: &str) -> Option<String> {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .filter(|line| parse_coordinate_line(line).is_none())
        .map(str::to_string)
}
