//! 实现提供者抽象接口
//!
//! 按名称查找实现类型，检查其能否赋值给注入点并创建实例

use crate::injectable::{InjectionPoint, ProvidedInstance};
use infrastructure_common::InstantiationCause;

/// 实现提供者 trait
pub trait ImplementationProvider: Send + Sync {
    /// 检查是否知道指定名称的实现
    fn contains(&self, implementation: &str) -> bool;

    /// 不创建实例，检查实现能否用于注入点
    ///
    /// 依次检查实现是否存在、是否有无参构造器、能否转换为注入点的契约类型。
    fn check(&self, implementation: &str, point: &InjectionPoint) -> Result<(), InstantiationCause>;

    /// 创建实例并转换为注入点的契约类型
    fn instantiate(
        &self,
        implementation: &str,
        point: &InjectionPoint,
    ) -> Result<ProvidedInstance, InstantiationCause>;

    /// 获取提供者名称
    fn name(&self) -> &str {
        "ImplementationProvider"
    }
}
