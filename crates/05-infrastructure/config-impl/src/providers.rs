//! 绑定配置源实现

use crate::parser::parse_properties;
use config_abstractions::{BindingSource, Properties, SourceFormat};
use infrastructure_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 默认的绑定配置资源名称
pub const DEFAULT_RESOURCE_NAME: &str = "config.properties";

/// 读取配置文件内容
fn read_file(path: &Path) -> Result<String, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError { source: e })
}

/// 属性文件配置源
#[derive(Debug, Clone)]
pub struct PropertiesFileSource {
    file_path: PathBuf,
}

impl PropertiesFileSource {
    /// 创建新的属性文件配置源
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
        }
    }

    /// 在指定目录中定位默认资源 `config.properties`
    pub fn resource<P: AsRef<Path>>(dir: P) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_RESOURCE_NAME))
    }

    /// 获取文件路径
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

impl BindingSource for PropertiesFileSource {
    fn load(&self) -> Result<Properties, ConfigError> {
        debug!("加载属性配置文件: {}", self.file_path.display());
        let content = read_file(&self.file_path)?;
        let properties = parse_properties(&content)?;
        debug!("属性配置文件加载完成，共 {} 项", properties.len());
        Ok(properties)
    }

    fn name(&self) -> &str {
        "PropertiesFileSource"
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.file_path)
    }
}

/// JSON 配置源
///
/// 顶层必须是对象，嵌套对象的键以 `.` 拼接展开，叶子必须是字符串。
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    file_path: PathBuf,
}

impl JsonFileSource {
    /// 创建新的 JSON 配置源
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
        }
    }

    /// 递归展开嵌套对象
    fn flatten(
        object: &serde_json::Map<String, serde_json::Value>,
        prefix: &str,
        properties: &mut Properties,
    ) -> Result<(), ConfigError> {
        for (key, value) in object {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            match value {
                serde_json::Value::String(s) => {
                    properties.insert(full_key, s.clone());
                }
                serde_json::Value::Object(nested) => Self::flatten(nested, &full_key, properties)?,
                other => {
                    return Err(ConfigError::parse_error(
                        0,
                        format!("绑定 {} 的值必须是字符串，实际为 {}", full_key, other),
                    ))
                }
            }
        }
        Ok(())
    }
}

impl BindingSource for JsonFileSource {
    fn load(&self) -> Result<Properties, ConfigError> {
        debug!("加载 JSON 配置文件: {}", self.file_path.display());
        let content = read_file(&self.file_path)?;

        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| ConfigError::parse_error(e.line(), e.to_string()))?;
        let serde_json::Value::Object(object) = value else {
            return Err(ConfigError::parse_error(1, "JSON 配置的顶层必须是对象"));
        };

        let mut properties = Properties::new();
        Self::flatten(&object, "", &mut properties)?;
        debug!("JSON 配置文件加载完成，共 {} 项", properties.len());
        Ok(properties)
    }

    fn name(&self) -> &str {
        "JsonFileSource"
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.file_path)
    }
}

/// TOML 配置源
///
/// 嵌套表的键以 `.` 拼接展开，例如 `[org.example]` 下的 `Logger`
/// 展开为 `org.example.Logger`。
#[derive(Debug, Clone)]
pub struct TomlFileSource {
    file_path: PathBuf,
}

impl TomlFileSource {
    /// 创建新的 TOML 配置源
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            file_path: path.as_ref().to_path_buf(),
        }
    }

    /// 递归展开嵌套表
    fn flatten(
        table: &toml::Table,
        prefix: &str,
        properties: &mut Properties,
    ) -> Result<(), ConfigError> {
        for (key, value) in table {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            match value {
                toml::Value::String(s) => {
                    properties.insert(full_key, s.clone());
                }
                toml::Value::Table(nested) => Self::flatten(nested, &full_key, properties)?,
                other => {
                    return Err(ConfigError::parse_error(
                        0,
                        format!(
                            "绑定 {} 的值必须是字符串，实际为 {}",
                            full_key,
                            other.type_str()
                        ),
                    ))
                }
            }
        }
        Ok(())
    }
}

impl BindingSource for TomlFileSource {
    fn load(&self) -> Result<Properties, ConfigError> {
        debug!("加载 TOML 配置文件: {}", self.file_path.display());
        let content = read_file(&self.file_path)?;

        let table: toml::Table = toml::from_str(&content).map_err(|e| {
            let line = e
                .span()
                .map(|span| content[..span.start].matches('\n').count() + 1)
                .unwrap_or(0);
            ConfigError::parse_error(line, e.message())
        })?;

        let mut properties = Properties::new();
        Self::flatten(&table, "", &mut properties)?;
        debug!("TOML 配置文件加载完成，共 {} 项", properties.len());
        Ok(properties)
    }

    fn name(&self) -> &str {
        "TomlFileSource"
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.file_path)
    }
}

/// 内存属性配置源
///
/// 直接解析给定的属性文本，常用于测试和嵌入式默认配置。
#[derive(Debug, Clone, Default)]
pub struct InlineSource {
    content: String,
}

impl InlineSource {
    /// 创建新的内存配置源
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

impl BindingSource for InlineSource {
    fn load(&self) -> Result<Properties, ConfigError> {
        parse_properties(&self.content)
    }

    fn name(&self) -> &str {
        "InlineSource"
    }
}

/// 根据文件扩展名创建配置源
pub fn file_source<P: AsRef<Path>>(path: P) -> Box<dyn BindingSource> {
    let path = path.as_ref();
    match SourceFormat::from_path(path) {
        SourceFormat::Json => Box::new(JsonFileSource::new(path)),
        SourceFormat::Toml => Box::new(TomlFileSource::new(path)),
        SourceFormat::Properties => Box::new(PropertiesFileSource::new(path)),
    }
}
