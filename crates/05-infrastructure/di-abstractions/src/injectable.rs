//! 可注入目标抽象接口
//!
//! 提供字段注入点描述以及字段赋值的核心抽象

use infrastructure_common::{AssignError, TypeInfo};
use std::any::Any;
use std::borrow::Cow;
use std::sync::Arc;

/// 可注入目标 trait
///
/// 通常由 `#[derive(AutoInjectable)]` 生成：每个标记了 `#[auto_inject]`
/// 的字段对应一个注入点，`assign` 负责把实例写入对应字段。
/// 只包含类型自身声明的字段，不会递归进入嵌套结构体。
pub trait Injectable {
    /// 获取注入点列表，按字段声明顺序排列
    fn injection_points() -> Vec<InjectionPoint>
    where
        Self: Sized;

    /// 把实例写入指定字段
    fn assign(&mut self, field: &str, instance: ProvidedInstance) -> Result<(), AssignError>;
}

/// 注入点
///
/// 描述一个需要注入的字段：字段名、字段声明的契约类型以及用于查找绑定的键。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionPoint {
    field_name: &'static str,
    contract: TypeInfo,
    binding_key: Cow<'static, str>,
}

impl InjectionPoint {
    /// 为契约类型 `C` 创建注入点，绑定键为 `C` 的完整类型路径
    pub fn of<C: ?Sized + 'static>(field_name: &'static str) -> Self {
        let contract = TypeInfo::of::<C>();
        let binding_key = Cow::Owned(contract.binding_key());
        Self {
            field_name,
            contract,
            binding_key,
        }
    }

    /// 覆盖绑定键
    pub fn with_key(mut self, key: &'static str) -> Self {
        self.binding_key = Cow::Borrowed(key);
        self
    }

    /// 字段名称
    pub fn field_name(&self) -> &'static str {
        self.field_name
    }

    /// 字段声明的契约类型
    pub fn contract(&self) -> &TypeInfo {
        &self.contract
    }

    /// 绑定键
    pub fn binding_key(&self) -> &str {
        &self.binding_key
    }
}

/// 待写入字段的实例
///
/// 内部保存一个 `Arc<C>`，`C` 为字段的契约类型。
pub struct ProvidedInstance {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
}

impl ProvidedInstance {
    /// 包装共享实例
    pub fn new<C>(instance: Arc<C>) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
    {
        Self {
            value: Box::new(instance),
            type_name: std::any::type_name::<Arc<C>>(),
        }
    }

    /// 实例的类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 取出 `Arc<C>`，类型不符时返回 `AssignError::TypeMismatch`
    pub fn into_shared<C>(self) -> Result<Arc<C>, AssignError>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let actual = self.type_name;
        self.value
            .downcast::<Arc<C>>()
            .map(|instance| *instance)
            .map_err(|_| AssignError::TypeMismatch {
                expected: std::any::type_name::<Arc<C>>().to_string(),
                actual: actual.to_string(),
            })
    }
}

impl std::fmt::Debug for ProvidedInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProvidedInstance")
            .field("type_name", &self.type_name)
            .finish()
    }
}
