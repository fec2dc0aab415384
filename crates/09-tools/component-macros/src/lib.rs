//! # Component Macros
//!
//! 这个 crate 提供了字段注入使用的过程宏。
//!
//! ## 核心宏
//!
//! - [`AutoInjectable`] - 字段注入派生宏
//!
//! ## 使用示例
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
//!     #[auto_inject(key = "org.example.PaymentGateway")]
//!     gateway: Option<Arc<dyn PaymentGateway>>,
//! }
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod injectable;
mod utils;

// Re-exports are not allowed in proc-macro crates

/// 字段注入派生宏
///
/// 为结构体实现 `di_abstractions::Injectable`。每个带有 `#[auto_inject]`
/// 标记的字段按声明顺序生成一个注入点，未标记的字段不受影响。
///
/// # 参数
///
/// - `key = "org.example.Logger"` - 自定义绑定键（默认为字段契约类型的完整路径）
///
/// # 约束
///
/// - 只支持具名字段的结构体
/// - 标记字段必须声明为 `Option<Arc<T>>`
#[proc_macro_derive(AutoInjectable, attributes(auto_inject))]
pub fn derive_auto_injectable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    injectable::derive_auto_injectable_impl(input)
}
