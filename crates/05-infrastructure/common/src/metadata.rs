//! 元数据定义
//!
//! 提供类型元数据以及绑定键的渲染和规范化

use std::any::TypeId;

/// 类型信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInfo {
    /// 完整类型名称（`std::any::type_name` 的输出）
    pub name: &'static str,
    /// 类型ID
    pub id: TypeId,
}

impl TypeInfo {
    /// 从类型获取类型信息
    ///
    /// 支持 trait 对象等非 `Sized` 类型。
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: std::any::type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        let path = self.binding_path();
        let path = path.split('<').next().unwrap_or(path);
        path.rsplit("::").next().unwrap_or(path)
    }

    /// 渲染绑定键
    ///
    /// 去掉 `dyn ` 前缀和 `+ Send`/`+ Sync` 等附加约束，
    /// 例如 `dyn demo::Logger + Send` 渲染为 `demo::Logger`。
    pub fn binding_key(&self) -> String {
        self.binding_path().to_string()
    }

    fn binding_path(&self) -> &'static str {
        let name = self.name.trim();
        match name.strip_prefix("dyn ") {
            Some(object) => strip_top_level_bounds(object),
            None => name,
        }
    }
}

/// 去掉顶层的 `+ Bound`，泛型参数内部的约束保持不变
fn strip_top_level_bounds(object: &str) -> &str {
    let mut depth = 0usize;
    let mut previous = ' ';
    for (index, c) in object.char_indices() {
        match c {
            '<' | '(' | '[' => depth += 1,
            // `->` 不是泛型括号
            '>' if previous == '-' => {}
            '>' | ')' | ']' => depth = depth.saturating_sub(1),
            '+' if depth == 0 => return object[..index].trim(),
            _ => {}
        }
        previous = c;
    }
    object.trim()
}

/// 规范化类型路径
///
/// 去除首尾空白，并把 `.` 分隔符统一为 `::`，
/// 使 `org.example.Logger` 与 `org::example::Logger` 视为同一个键。
pub fn normalize_type_path(path: &str) -> String {
    path.trim().replace('.', "::")
}
