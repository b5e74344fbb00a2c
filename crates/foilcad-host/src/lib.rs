//! foilcad 宿主接口
//!
//! 把变换后的翼型作为样条曲线提交到CAD宿主：
//! - [`host::CadHost`]: 宿主自动化调用的类型化接口
//! - [`retry::RetryingHost`]: 宿主繁忙时的有界重试
//! - [`dxf_host::DxfHost`]: 基于DXF图纸的宿主实现
//! - [`session::ImportSession`]: 导入会话状态与导入流程

pub mod dxf_host;
pub mod host;
pub mod retry;
pub mod session;

#[cfg(test)]
mod mock;

pub use dxf_host::DxfHost;
pub use host::{
    CadHost, CurveId, DocumentId, DocumentInfo, DocumentKind, HostError, PlaneId, PlaneInfo,
    SketchId, SketchInfo, SplineRequest,
};
pub use retry::{RetryPolicy, RetryingHost};
pub use session::{
    ErrorCategory, ImportError, ImportReport, ImportSession, ImportSettings, ImportTarget,
    TargetListing,
};
