//! 实现工厂类型
//!
//! 提供无参构造器和契约转换函数的类型定义

use crate::injectable::ProvidedInstance;
use infrastructure_common::ConstructorPanicked;
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// 装箱的构造错误
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 类型擦除后的共享实例
pub type SharedInstance = Arc<dyn Any + Send + Sync>;

/// 无参构造器
pub type InstanceConstructor = Arc<dyn Fn() -> Result<SharedInstance, BoxError> + Send + Sync>;

/// 契约转换函数
///
/// 把具体类型的实例转换为某个契约的 `Arc<C>` 并包装为 [`ProvidedInstance`]；
/// 实例不是预期的具体类型时返回 `None`。
pub type ContractCast = Arc<dyn Fn(SharedInstance) -> Option<ProvidedInstance> + Send + Sync>;

/// 执行构造函数，panic 转换为 [`ConstructorPanicked`] 错误
fn guarded<T, F>(constructor: F) -> Result<T, BoxError>
where
    F: FnOnce() -> Result<T, BoxError>,
{
    catch_unwind(AssertUnwindSafe(constructor))
        .unwrap_or_else(|payload| Err(Box::new(panic_error(payload)) as BoxError))
}

fn panic_error(payload: Box<dyn Any + Send>) -> ConstructorPanicked {
    let message = match payload.downcast::<String>() {
        Ok(message) => *message,
        Err(payload) => payload
            .downcast_ref::<&'static str>()
            .map(|message| message.to_string())
            .unwrap_or_else(|| "未知 panic".to_string()),
    };
    ConstructorPanicked::new(message)
}

/// 创建基于 `Default` 的无参构造器
///
/// `Default` 实现中的 panic 会作为构造错误返回。
pub fn default_constructor<T>() -> InstanceConstructor
where
    T: Default + Send + Sync + 'static,
{
    Arc::new(|| guarded(|| Ok(Arc::new(T::default()) as SharedInstance)))
}

/// 包装一个可失败的无参构造函数
///
/// 返回的错误和 panic 都作为构造错误返回。
pub fn fallible_constructor<T, F, E>(constructor: F) -> InstanceConstructor
where
    T: Send + Sync + 'static,
    F: Fn() -> Result<T, E> + Send + Sync + 'static,
    E: Into<BoxError>,
{
    Arc::new(move || {
        guarded(|| {
            constructor()
                .map(|instance| Arc::new(instance) as SharedInstance)
                .map_err(Into::into)
        })
    })
}

/// 创建契约转换函数
pub fn contract_cast<T, C, F>(cast: F) -> ContractCast
where
    T: Send + Sync + 'static,
    C: ?Sized + Send + Sync + 'static,
    F: Fn(Arc<T>) -> Arc<C> + Send + Sync + 'static,
{
    Arc::new(move |instance: SharedInstance| {
        instance
            .downcast::<T>()
            .ok()
            .map(|typed| ProvidedInstance::new(cast(typed)))
    })
}
