//! # Dependency Injection Implementation
//!
//! 字段注入的具体实现。
//!
//! ## 主要组件
//!
//! - [`ImplementationRegistry`] - 从配置加载的「契约类型 -> 实现类型」绑定表
//! - [`ImplementationCatalog`] - 启动时注册的实现目录
//! - [`Injector`] - 字段注入器
//! - [`InjectorBuilder`] - 注入器构建器
//!
//! ## 使用示例
//!
//! ```ignore
//! use di_impl::Injector;
//! use std::sync::Arc;
//!
//! let injector = Injector::builder()
//!     .with_resource_dir("resources")
//!     .register_implementations(|catalog| {
//!         catalog
//!             .register_named::<ConsoleLogger>("org.example.ConsoleLogger")
//!             .provides::<dyn Logger>(|logger| logger as Arc<dyn Logger>);
//!     })
//!     .strict(true)
//!     .build()?;
//!
//! let mut service = CheckoutService::default();
//! injector.inject(&mut service)?;
//! ```

pub mod catalog;
pub mod injector;
pub mod registry;

pub use catalog::*;
pub use injector::*;
pub use registry::*;
