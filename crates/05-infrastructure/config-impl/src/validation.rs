//! 绑定配置验证

use config_abstractions::Properties;
use infrastructure_common::ConfigError;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

/// 类型路径格式：以 `.` 或 `::` 分隔的标识符序列
static TYPE_PATH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(?:(?:\.|::)[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("类型路径正则必须有效")
});

/// 检查字符串是否为合法的类型路径
///
/// 允许带泛型参数，例如 `demo.Wrapper<u8>` 或 `demo::Pair<a::A, b::B<u8>>`，
/// 这与 `std::any::type_name` 对泛型类型的输出一致。
pub fn is_type_path(candidate: &str) -> bool {
    let candidate = candidate.trim();
    match candidate.find('<') {
        None => TYPE_PATH.is_match(candidate),
        Some(open) => {
            let Some(inner) = candidate[open + 1..].strip_suffix('>') else {
                return false;
            };
            TYPE_PATH.is_match(&candidate[..open])
                && split_generic_arguments(inner)
                    .is_some_and(|args| args.into_iter().all(is_type_path))
        }
    }
}

/// 按顶层逗号切分泛型参数，括号不配对时返回 `None`
fn split_generic_arguments(inner: &str) -> Option<Vec<&str>> {
    let mut args = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (index, c) in inner.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                args.push(&inner[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return None;
    }
    args.push(&inner[start..]);
    Some(args)
}

/// 验证绑定集合
///
/// 每个键和值都必须是合法的类型路径。返回所有问题而不是第一个。
pub fn validate_bindings(properties: &Properties) -> Result<(), ConfigError> {
    let mut errors = Vec::new();

    for (key, value) in properties.iter() {
        if !is_type_path(key) {
            errors.push(format!("绑定键不是合法的类型路径: '{}'", key));
        }
        if value.trim().is_empty() {
            errors.push(format!("绑定 {} 的实现类型为空", key));
        } else if !is_type_path(value) {
            errors.push(format!("绑定 {} 的实现类型不是合法的类型路径: '{}'", key, value));
        }
    }

    if errors.is_empty() {
        debug!("绑定配置验证通过，共 {} 项", properties.len());
        Ok(())
    } else {
        warn!("绑定配置验证失败: {:?}", errors);
        Err(ConfigError::ValidationFailed { errors })
    }
}
