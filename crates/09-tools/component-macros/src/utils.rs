//! 宏工具函数

use syn::{Field, LitStr, Meta, Result, Type};

/// 从类型中提取第一个泛型参数
pub fn extract_generic_type(ty: &Type) -> Option<&Type> {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                if let Some(syn::GenericArgument::Type(inner_type)) = args.args.first() {
                    return Some(inner_type);
                }
            }
        }
    }
    None
}

/// 检查类型路径的最后一段是否为指定名称
fn last_segment_is(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(type_path) if type_path.qself.is_none() => type_path
            .path
            .segments
            .last()
            .map(|segment| segment.ident == name)
            .unwrap_or(false),
        _ => false,
    }
}

/// 检查类型是否为 Option<T>
pub fn is_option_type(ty: &Type) -> bool {
    last_segment_is(ty, "Option")
}

/// 检查类型是否为 Arc<T>
pub fn is_arc_type(ty: &Type) -> bool {
    last_segment_is(ty, "Arc")
}

/// 提取 `Option<Arc<C>>` 中的契约类型 `C`
pub fn extract_contract_type(ty: &Type) -> Option<&Type> {
    if !is_option_type(ty) {
        return None;
    }
    let shared = extract_generic_type(ty)?;
    if !is_arc_type(shared) {
        return None;
    }
    extract_generic_type(shared)
}

/// 注入标记参数
#[derive(Debug, Default)]
pub struct MarkerArgs {
    /// 覆盖的绑定键
    pub key: Option<LitStr>,
}

/// 解析字段上的 `#[auto_inject]` 标记
///
/// 字段没有标记时返回 `Ok(None)`。
pub fn parse_marker(field: &Field, marker: &str) -> Result<Option<MarkerArgs>> {
    let mut found: Option<MarkerArgs> = None;

    for attr in &field.attrs {
        if !attr.path().is_ident(marker) {
            continue;
        }
        if found.is_some() {
            return Err(syn::Error::new_spanned(attr, format!("重复的 #[{}] 标记", marker)));
        }

        let mut args = MarkerArgs::default();
        match &attr.meta {
            Meta::Path(_) => {}
            Meta::List(_) => {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("key") {
                        let key: LitStr = meta.value()?.parse()?;
                        if key.value().trim().is_empty() {
                            return Err(syn::Error::new_spanned(&key, "绑定键不能为空"));
                        }
                        args.key = Some(key);
                        Ok(())
                    } else {
                        Err(meta.error(format!("未知的 {} 参数，支持: key", marker)))
                    }
                })?;
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new_spanned(
                    attr,
                    format!("请使用 #[{}(key = \"...\")] 指定绑定键", marker),
                ));
            }
        }
        found = Some(args);
    }

    Ok(found)
}
