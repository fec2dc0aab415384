//! # Configuration Abstractions
//!
//! 绑定配置抽象层，定义绑定配置的数据结构和读取接口。
//!
//! ## 核心接口
//!
//! - [`Properties`] - 有序键值集合
//! - [`BindingSource`] - 绑定配置源接口
//! - [`SourceFormat`] - 配置文件格式

pub mod properties;
pub mod source;

pub use properties::*;
pub use source::*;
