//! 实现绑定表
//!
//! 保存「字段契约类型 -> 实现类型」的映射，构建后不可变

use chrono::{DateTime, Utc};
use config_abstractions::{BindingSource, Properties};
use config_impl::validate_bindings;
use indexmap::IndexMap;
use infrastructure_common::{normalize_type_path, ConfigError};
use serde::Serialize;
use tracing::{debug, info};

/// 单条绑定
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    /// 配置中书写的绑定键（已去除首尾空白）
    pub key: String,
    /// 实现类型名称（已去除首尾空白）
    pub implementation: String,
}

/// 实现绑定表
///
/// 键在比较前会规范化，`org.example.Logger` 与 `org::example::Logger` 是同一个键；
/// 重复的键以最后一次出现为准。
#[derive(Debug, Clone, Serialize)]
pub struct ImplementationRegistry {
    bindings: IndexMap<String, Binding>,
    source_name: String,
    loaded_at: DateTime<Utc>,
}

impl ImplementationRegistry {
    /// 从属性集合创建绑定表
    pub fn from_properties(properties: Properties, source_name: impl Into<String>) -> Self {
        let mut bindings = IndexMap::with_capacity(properties.len());

        for (key, implementation) in properties {
            let binding = Binding {
                key: key.trim().to_string(),
                implementation: implementation.trim().to_string(),
            };
            if let Some(previous) = bindings.insert(normalize_type_path(&key), binding) {
                debug!("绑定键重复，覆盖: {} -> {}", previous.key, previous.implementation);
            }
        }

        Self {
            bindings,
            source_name: source_name.into(),
            loaded_at: Utc::now(),
        }
    }

    /// 从配置源加载绑定表
    pub fn load(source: &dyn BindingSource) -> Result<Self, ConfigError> {
        let properties = source.load()?;
        let registry = Self::from_properties(properties, source.name());

        match source.location() {
            Some(path) => info!(
                "加载绑定配置: {} ({}), 共 {} 项",
                source.name(),
                path.display(),
                registry.len()
            ),
            None => info!("加载绑定配置: {}, 共 {} 项", source.name(), registry.len()),
        }

        Ok(registry)
    }

    /// 创建空绑定表
    pub fn empty() -> Self {
        Self::from_properties(Properties::new(), "empty")
    }

    /// 查找绑定键对应的实现类型名称
    pub fn get(&self, key: &str) -> Option<&str> {
        self.bindings
            .get(&normalize_type_path(key))
            .map(|binding| binding.implementation.as_str())
    }

    /// 检查绑定键是否存在
    pub fn contains(&self, key: &str) -> bool {
        self.bindings.contains_key(&normalize_type_path(key))
    }

    /// 绑定数量
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// 按配置顺序遍历绑定
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.values()
    }

    /// 配置源名称
    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    /// 加载时间
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// 验证每个绑定键和实现名称都是合法的类型路径
    pub fn validate(&self) -> Result<(), ConfigError> {
        let properties: Properties = self
            .iter()
            .map(|binding| (binding.key.clone(), binding.implementation.clone()))
            .collect();
        validate_bindings(&properties)
    }
}

impl Default for ImplementationRegistry {
    fn default() -> Self {
        Self::empty()
    }
}
