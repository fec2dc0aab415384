//! 错误类型定义

use thiserror::Error;

/// 配置加载错误类型
///
/// 只会在构建注入器时出现，注入器无法在没有绑定表的情况下存在。
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置文件读取失败: {source}")]
    FileReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("配置解析失败 (第 {line} 行): {message}")]
    ParseError { line: usize, message: String },

    #[error("配置验证失败: {errors:?}")]
    ValidationFailed { errors: Vec<String> },
}

impl ConfigError {
    /// 创建解析错误
    pub fn parse_error(line: usize, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }
}

/// 字段赋值错误类型
///
/// 由生成的 `Injectable::assign` 实现返回。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    #[error("字段不存在或未标记注入: {field}")]
    UnknownField { field: String },

    #[error("实例类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch { expected: String, actual: String },
}

/// 实现实例化失败的具体原因
#[derive(Error, Debug)]
pub enum InstantiationCause {
    #[error("找不到实现类型: {implementation}")]
    ImplementationNotFound { implementation: String },

    #[error("实现类型没有无参构造器: {implementation}")]
    NoDefaultConstructor { implementation: String },

    #[error("构造器执行失败: {implementation}, 原因: {source}")]
    ConstructorFailed {
        implementation: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("实现类型 {implementation} 不能赋值给 {expected}")]
    TypeMismatch {
        implementation: String,
        expected: String,
    },

    #[error("字段赋值失败: {0}")]
    Assignment(#[from] AssignError),
}

/// 构造器执行时发生 panic
///
/// panic 在构造器边界被捕获，作为 [`InstantiationCause::ConstructorFailed`] 的来源返回。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("构造器 panic: {message}")]
pub struct ConstructorPanicked {
    message: String,
}

impl ConstructorPanicked {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// panic 消息
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 依赖绑定错误类型
///
/// 注入过程中的任何绑定失败都会中止本次注入。
/// 在失败字段之前已经赋值的字段保持新值，不会回滚。
#[derive(Error, Debug)]
pub enum BindingError {
    #[error("没有为 {type_name} 配置实现 (字段 {field})")]
    UnresolvedBinding {
        field: &'static str,
        type_name: String,
    },

    #[error("字段 {field} 注入失败 ({type_name} -> {implementation}): {cause}")]
    InstantiationFailure {
        field: &'static str,
        type_name: String,
        implementation: String,
        #[source]
        cause: InstantiationCause,
    },
}

impl BindingError {
    /// 出错的字段名称
    pub fn field(&self) -> &'static str {
        match self {
            Self::UnresolvedBinding { field, .. } | Self::InstantiationFailure { field, .. } => {
                field
            }
        }
    }

    /// 出错字段的绑定键
    pub fn type_name(&self) -> &str {
        match self {
            Self::UnresolvedBinding { type_name, .. }
            | Self::InstantiationFailure { type_name, .. } => type_name,
        }
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    BindingError {
        #[from]
        source: BindingError,
    },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type BindingResult<T> = Result<T, BindingError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
