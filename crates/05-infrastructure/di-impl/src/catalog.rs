//! 实现目录
//!
//! 启动时显式注册的「实现名称 -> 无参构造器 + 可转换契约」表，
//! 绑定表中的实现名称在这里解析为真实类型。

use di_abstractions::{
    contract_cast, default_constructor, fallible_constructor, BoxError, ContractCast,
    ImplementationProvider, InjectionPoint, InstanceConstructor, ProvidedInstance,
};
use infrastructure_common::{normalize_type_path, InstantiationCause, TypeInfo};
use std::any::TypeId;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, warn};

/// 已注册的实现
pub struct Implementation {
    name: String,
    type_info: TypeInfo,
    constructor: Option<InstanceConstructor>,
    casts: HashMap<TypeId, (TypeInfo, ContractCast)>,
}

impl Implementation {
    /// 实现名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 具体类型信息
    pub fn type_info(&self) -> &TypeInfo {
        &self.type_info
    }

    /// 是否有无参构造器
    pub fn has_default_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// 是否能转换为指定契约
    pub fn provides(&self, contract: TypeId) -> bool {
        self.casts.contains_key(&contract)
    }

    /// 可转换的契约类型
    pub fn contracts(&self) -> impl Iterator<Item = &TypeInfo> {
        self.casts.values().map(|(info, _)| info)
    }
}

impl std::fmt::Debug for Implementation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Implementation")
            .field("name", &self.name)
            .field("type_info", &self.type_info)
            .field("has_default_constructor", &self.has_default_constructor())
            .field("contracts", &self.contracts().map(|info| info.name).collect::<Vec<_>>())
            .finish()
    }
}

/// 实现注册器
///
/// 由 [`ImplementationCatalog`] 的注册方法返回，用于声明实现可以赋值给哪些契约。
pub struct ImplementationBuilder<'a, T> {
    entry: &'a mut Implementation,
    _marker: PhantomData<fn() -> T>,
}

impl<'a, T> ImplementationBuilder<'a, T>
where
    T: Send + Sync + 'static,
{
    /// 声明实现可以赋值给契约 `C`
    ///
    /// `cast` 通常就是一次 unsized 转换，例如 `|logger| logger as Arc<dyn Logger>`。
    pub fn provides<C>(self, cast: impl Fn(Arc<T>) -> Arc<C> + Send + Sync + 'static) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let contract = TypeInfo::of::<C>();
        debug!("实现 {} 提供契约 {}", self.entry.name, contract.name);
        self.entry
            .casts
            .insert(contract.id, (contract, contract_cast::<T, C, _>(cast)));
        self
    }

    /// 实现名称
    pub fn name(&self) -> &str {
        &self.entry.name
    }
}

/// 实现目录
#[derive(Default)]
pub struct ImplementationCatalog {
    entries: HashMap<String, Implementation>,
}

impl ImplementationCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 以完整类型路径为名称注册实现，使用 `Default` 作为无参构造器
    pub fn register<T>(&mut self) -> ImplementationBuilder<'_, T>
    where
        T: Default + Send + Sync + 'static,
    {
        self.insert::<T>(std::any::type_name::<T>().to_string(), Some(default_constructor::<T>()))
    }

    /// 以指定名称注册实现，使用 `Default` 作为无参构造器
    pub fn register_named<T>(&mut self, name: impl Into<String>) -> ImplementationBuilder<'_, T>
    where
        T: Default + Send + Sync + 'static,
    {
        self.insert::<T>(name.into(), Some(default_constructor::<T>()))
    }

    /// 以指定名称注册实现，使用可失败的无参构造函数
    pub fn register_with<T, F, E>(
        &mut self,
        name: impl Into<String>,
        constructor: F,
    ) -> ImplementationBuilder<'_, T>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, E> + Send + Sync + 'static,
        E: Into<BoxError>,
    {
        self.insert::<T>(name.into(), Some(fallible_constructor::<T, F, E>(constructor)))
    }

    /// 声明一个没有无参构造器的类型
    ///
    /// 类型可以被名称解析，但不能被注入器实例化，
    /// 对应需要构造参数或只能作为抽象存在的类型。
    pub fn declare<T>(&mut self, name: impl Into<String>) -> ImplementationBuilder<'_, T>
    where
        T: Send + Sync + 'static,
    {
        self.insert::<T>(name.into(), None)
    }

    fn insert<T>(
        &mut self,
        name: String,
        constructor: Option<InstanceConstructor>,
    ) -> ImplementationBuilder<'_, T>
    where
        T: Send + Sync + 'static,
    {
        let type_info = TypeInfo::of::<T>();
        let mut casts = HashMap::new();
        casts.insert(
            type_info.id,
            (type_info.clone(), contract_cast::<T, T, _>(|instance| instance)),
        );

        debug!("注册实现: {} ({})", name, type_info.name);
        let implementation = Implementation {
            name,
            type_info,
            constructor,
            casts,
        };

        let entry = match self.entries.entry(normalize_type_path(&implementation.name)) {
            Entry::Occupied(mut occupied) => {
                warn!("实现重复注册，覆盖: {}", implementation.name);
                occupied.insert(implementation);
                occupied.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(implementation),
        };

        ImplementationBuilder {
            entry,
            _marker: PhantomData,
        }
    }

    /// 按名称查找实现
    pub fn get(&self, name: &str) -> Option<&Implementation> {
        self.entries.get(&normalize_type_path(name))
    }

    /// 检查实现是否已注册
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// 已注册的实现名称
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.entries.values().map(Implementation::name).collect();
        names.sort_unstable();
        names
    }

    /// 实现数量
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 解析实现并检查能否用于注入点
    fn resolve(
        &self,
        implementation: &str,
        point: &InjectionPoint,
    ) -> Result<(&InstanceConstructor, &ContractCast), InstantiationCause> {
        let entry = self
            .get(implementation)
            .ok_or_else(|| InstantiationCause::ImplementationNotFound {
                implementation: implementation.to_string(),
            })?;

        let constructor =
            entry
                .constructor
                .as_ref()
                .ok_or_else(|| InstantiationCause::NoDefaultConstructor {
                    implementation: implementation.to_string(),
                })?;

        let (_, cast) = entry.casts.get(&point.contract().id).ok_or_else(|| {
            InstantiationCause::TypeMismatch {
                implementation: implementation.to_string(),
                expected: point.contract().name.to_string(),
            }
        })?;

        Ok((constructor, cast))
    }
}

impl std::fmt::Debug for ImplementationCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImplementationCatalog")
            .field("implementations", &self.names())
            .finish()
    }
}

impl ImplementationProvider for ImplementationCatalog {
    fn contains(&self, implementation: &str) -> bool {
        ImplementationCatalog::contains(self, implementation)
    }

    fn check(&self, implementation: &str, point: &InjectionPoint) -> Result<(), InstantiationCause> {
        self.resolve(implementation, point).map(|_| ())
    }

    fn instantiate(
        &self,
        implementation: &str,
        point: &InjectionPoint,
    ) -> Result<ProvidedInstance, InstantiationCause> {
        let (constructor, cast) = self.resolve(implementation, point)?;

        let instance = constructor().map_err(|source| InstantiationCause::ConstructorFailed {
            implementation: implementation.to_string(),
            source,
        })?;

        cast(instance).ok_or_else(|| InstantiationCause::TypeMismatch {
            implementation: implementation.to_string(),
            expected: point.contract().name.to_string(),
        })
    }

    fn name(&self) -> &str {
        "ImplementationCatalog"
    }
}
