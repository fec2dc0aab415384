//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义字段注入的核心接口。
//!
//! ## 核心接口
//!
//! - [`AutoInjectable`] - 派生宏，读取字段上的 `#[auto_inject]` 标记
//! - [`Injectable`] - 可注入目标接口
//! - [`InjectionPoint`] - 注入点描述
//! - [`ImplementationProvider`] - 实现提供者接口
//!
//! ## 标记字段
//!
//! 标记字段必须声明为 `Option<Arc<C>>`，`C` 为契约类型（通常是
//! `dyn Trait`，trait 需要 `Send + Sync`）。默认绑定键是 `C` 的完整类型路径，
//! 可以用 `#[auto_inject(key = "org.example.Logger")]` 覆盖。
//!
//! ```ignore
//! use di_abstractions::AutoInjectable;
//! use std::sync::Arc;
//!
//! pub trait Logger: Send + Sync {
//!     fn log(&self, message: &str);
//! }
//!
//! #[derive(Default, AutoInjectable)]
//! pub struct CheckoutService {
//!     #[auto_inject]
//!     logger: Option<Arc<dyn Logger>>,
//!     retries: u32,
//! }
//! ```

pub mod factory;
pub mod injectable;
pub mod provider;

pub use factory::*;
pub use injectable::*;
pub use provider::*;

pub use component_macros::AutoInjectable;
pub use infrastructure_common::{AssignError, ConstructorPanicked, InstantiationCause, TypeInfo};
