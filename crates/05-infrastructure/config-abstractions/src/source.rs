//! 绑定配置源抽象接口

use crate::properties::Properties;
use infrastructure_common::ConfigError;
use std::path::Path;

/// 绑定配置源 trait
///
/// 定义从不同数据源读取「字段类型 -> 实现类型」绑定的统一接口
pub trait BindingSource: Send + Sync {
    /// 读取全部绑定
    fn load(&self) -> Result<Properties, ConfigError>;

    /// 获取配置源名称
    fn name(&self) -> &str;

    /// 配置源对应的文件路径（内存配置源返回 `None`）
    fn location(&self) -> Option<&Path> {
        None
    }
}

impl<S: BindingSource + ?Sized> BindingSource for Box<S> {
    fn load(&self) -> Result<Properties, ConfigError> {
        (**self).load()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn location(&self) -> Option<&Path> {
        (**self).location()
    }
}

/// 绑定配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `key=value` 属性文件
    Properties,
    /// JSON 对象
    Json,
    /// TOML 表
    Toml,
}

impl SourceFormat {
    /// 根据文件扩展名判断格式，未知扩展名按属性文件处理
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            Some("json") => Self::Json,
            Some("toml") => Self::Toml,
            _ => Self::Properties,
        }
    }
}
