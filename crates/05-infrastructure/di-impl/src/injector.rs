//! 字段注入器
//!
//! 根据绑定表为 `Injectable` 目标的标记字段创建实现实例并赋值。

use crate::catalog::ImplementationCatalog;
use crate::registry::ImplementationRegistry;
use config_abstractions::BindingSource;
use config_impl::PropertiesFileSource;
use di_abstractions::{ImplementationProvider, Injectable, InjectionPoint};
use infrastructure_common::{BindingError, ConfigError, InfrastructureResult, InstantiationCause};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 字段注入器
///
/// 构建时一次性加载绑定表，之后不再重新加载。注入器本身不保存任何
/// 注入过的实例，每次注入都会为每个标记字段创建新实例。
///
/// 注入器是 `Send + Sync` 的，可以在多个线程中同时为不同目标注入。
pub struct Injector {
    registry: ImplementationRegistry,
    provider: Arc<dyn ImplementationProvider>,
}

impl Injector {
    /// 默认绑定配置资源名称
    pub const DEFAULT_RESOURCE_NAME: &'static str = config_impl::DEFAULT_RESOURCE_NAME;

    /// 从配置源加载绑定表并创建注入器
    pub fn new<P>(source: &dyn BindingSource, provider: P) -> Result<Self, ConfigError>
    where
        P: ImplementationProvider + 'static,
    {
        let registry = ImplementationRegistry::load(source)?;
        Ok(Self::from_registry(registry, provider))
    }

    /// 从目录下的 `config.properties` 创建注入器
    pub fn from_resource_dir<D, P>(dir: D, provider: P) -> Result<Self, ConfigError>
    where
        D: AsRef<Path>,
        P: ImplementationProvider + 'static,
    {
        Self::new(&PropertiesFileSource::resource(dir), provider)
    }

    /// 使用已加载的绑定表创建注入器
    pub fn from_registry<P>(registry: ImplementationRegistry, provider: P) -> Self
    where
        P: ImplementationProvider + 'static,
    {
        Self {
            registry,
            provider: Arc::new(provider),
        }
    }

    /// 创建注入器构建器
    pub fn builder() -> InjectorBuilder {
        InjectorBuilder::new()
    }

    /// 绑定表
    pub fn registry(&self) -> &ImplementationRegistry {
        &self.registry
    }

    /// 实现提供者
    pub fn provider(&self) -> &dyn ImplementationProvider {
        self.provider.as_ref()
    }

    /// 为目标的所有标记字段注入实现
    ///
    /// 字段按声明顺序处理，遇到第一个失败即返回错误。
    /// 失败之前已经赋值的字段保持新值。
    pub fn inject<'a, T: Injectable>(&self, target: &'a mut T) -> Result<&'a mut T, BindingError> {
        let points = T::injection_points();
        debug!(
            "开始注入: {} ({} 个注入点)",
            std::any::type_name::<T>(),
            points.len()
        );

        for point in &points {
            let implementation = self.lookup(point).map_err(log_failure)?;

            let instance = self
                .provider
                .instantiate(implementation, point)
                .map_err(|cause| failure(point, implementation, cause))
                .map_err(log_failure)?;

            target
                .assign(point.field_name(), instance)
                .map_err(|cause| failure(point, implementation, cause.into()))
                .map_err(log_failure)?;

            debug!(
                "字段注入完成: {}.{} <- {}",
                std::any::type_name::<T>(),
                point.field_name(),
                implementation
            );
        }

        Ok(target)
    }

    /// 检查目标类型的所有注入点都能被满足，不创建任何实例
    ///
    /// 返回全部失败而不是第一个。
    pub fn verify<T: Injectable>(&self) -> Result<(), Vec<BindingError>> {
        let errors: Vec<_> = T::injection_points()
            .iter()
            .filter_map(|point| {
                self.lookup(point)
                    .and_then(|implementation| {
                        self.provider
                            .check(implementation, point)
                            .map_err(|cause| failure(point, implementation, cause))
                    })
                    .err()
            })
            .collect();

        if errors.is_empty() {
            debug!("注入点检查通过: {}", std::any::type_name::<T>());
            Ok(())
        } else {
            for error in &errors {
                warn!("注入点检查失败: {}", error);
            }
            Err(errors)
        }
    }

    fn lookup(&self, point: &InjectionPoint) -> Result<&str, BindingError> {
        self.registry
            .get(point.binding_key())
            .ok_or_else(|| BindingError::UnresolvedBinding {
                field: point.field_name(),
                type_name: point.binding_key().to_string(),
            })
    }
}

impl std::fmt::Debug for Injector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Injector")
            .field("registry", &self.registry)
            .field("provider", &self.provider.name())
            .finish()
    }
}

fn failure(
    point: &InjectionPoint,
    implementation: &str,
    cause: InstantiationCause,
) -> BindingError {
    BindingError::InstantiationFailure {
        field: point.field_name(),
        type_name: point.binding_key().to_string(),
        implementation: implementation.to_string(),
        cause,
    }
}

fn log_failure(error: BindingError) -> BindingError {
    warn!("注入失败: {}", error);
    error
}

/// 注入器构建器
pub struct InjectorBuilder {
    source: Option<Box<dyn BindingSource>>,
    catalog: ImplementationCatalog,
    provider: Option<Arc<dyn ImplementationProvider>>,
    strict: bool,
}

impl InjectorBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            catalog: ImplementationCatalog::new(),
            provider: None,
            strict: false,
        }
    }

    /// 指定绑定配置源
    pub fn with_source<S>(mut self, source: S) -> Self
    where
        S: BindingSource + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// 使用目录下的 `config.properties`
    pub fn with_resource_dir<D: AsRef<Path>>(self, dir: D) -> Self {
        self.with_source(PropertiesFileSource::resource(dir))
    }

    /// 替换实现目录
    pub fn with_catalog(mut self, catalog: ImplementationCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// 使用自定义实现提供者，替代实现目录
    pub fn with_provider<P>(mut self, provider: P) -> Self
    where
        P: ImplementationProvider + 'static,
    {
        self.provider = Some(Arc::new(provider));
        self
    }

    /// 向实现目录注册实现
    pub fn register_implementations<F>(mut self, register: F) -> Self
    where
        F: FnOnce(&mut ImplementationCatalog),
    {
        register(&mut self.catalog);
        self
    }

    /// 严格模式：构建时验证绑定语法，并检查每个实现名称都已注册
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// 构建注入器
    pub fn build(self) -> InfrastructureResult<Injector> {
        let source: Box<dyn BindingSource> = match self.source {
            Some(source) => source,
            None => Box::new(PropertiesFileSource::new(PathBuf::from(
                Injector::DEFAULT_RESOURCE_NAME,
            ))),
        };

        let registry = ImplementationRegistry::load(source.as_ref())?;

        let provider: Arc<dyn ImplementationProvider> = match self.provider {
            Some(provider) => provider,
            None => Arc::new(self.catalog),
        };

        if self.strict {
            validate(&registry, provider.as_ref())?;
        }

        info!(
            "注入器构建完成: {} 项绑定, 提供者 {}",
            registry.len(),
            provider.name()
        );

        Ok(Injector { registry, provider })
    }
}

impl Default for InjectorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn validate(
    registry: &ImplementationRegistry,
    provider: &dyn ImplementationProvider,
) -> Result<(), ConfigError> {
    let mut errors = match registry.validate() {
        Ok(()) => Vec::new(),
        Err(ConfigError::ValidationFailed { errors }) => errors,
        Err(other) => return Err(other),
    };

    errors.extend(
        registry
            .iter()
            .filter(|binding| !provider.contains(&binding.implementation))
            .map(|binding| format!("未注册的实现: {} -> {}", binding.key, binding.implementation)),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        warn!("绑定配置验证失败: {} 个问题", errors.len());
        Err(ConfigError::ValidationFailed { errors })
    }
}
