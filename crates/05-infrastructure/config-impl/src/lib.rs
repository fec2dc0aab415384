//! # Configuration Implementation
//!
//! 绑定配置的具体实现，提供属性文件解析和各种配置源。
//!
//! ## 主要组件
//!
//! - [`parse_properties`] - 属性文件解析器
//! - [`PropertiesFileSource`] - 属性文件配置源
//! - [`JsonFileSource`] - JSON 配置源
//! - [`TomlFileSource`] - TOML 配置源
//! - [`InlineSource`] - 内存配置源
//! - [`validate_bindings`] - 绑定配置验证

pub mod parser;
pub mod providers;
pub mod validation;

pub use parser::*;
pub use providers::*;
pub use validation::*;
