//! # Infrastructure Common
//!
//! 这个 crate 提供了字段注入基础设施的公共错误类型和类型元数据。
//!
//! ## 核心内容
//!
//! - [`ConfigError`] - 配置加载错误
//! - [`BindingError`] - 注入绑定错误
//! - [`TypeInfo`] - 类型元数据与绑定键渲染
//!
//! ## 设计原则
//!
//! - 基于 Rust 类型系统的编译时安全
//! - 显式传递配置，不依赖全局状态

pub mod errors;
pub mod metadata;

pub use errors::*;
pub use metadata::*;
