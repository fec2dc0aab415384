//! 属性文件解析器
//!
//! 遵循 Java `Properties.load` 的文本格式：
//!
//! - 自然行以 `\n`、`\r` 或 `\r\n` 结束，行首空白被忽略
//! - 空行和以 `#`、`!` 开头的行是注释
//! - 以奇数个反斜杠结尾的行与下一行拼接，下一行的行首空白被丢弃
//! - 键在第一个未转义的 `=`、`:` 或空白处结束，分隔符两侧的空白被跳过
//! - 支持 `\t \n \r \f \uXXXX` 转义，其余 `\x` 解析为 `x`
//!
//! 值末尾的空白在解析时保留。

use config_abstractions::Properties;
use infrastructure_common::ConfigError;
use tracing::debug;

const FORM_FEED: char = '\u{000C}';

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | FORM_FEED)
}

/// 解析属性文本
pub fn parse_properties(input: &str) -> Result<Properties, ConfigError> {
    let mut properties = Properties::new();

    for (line_number, logical) in logical_lines(input) {
        let (key, value) = split_key_value(&logical, line_number)?;
        if let Some(previous) = properties.insert(key.clone(), value) {
            debug!("属性键重复，覆盖旧值: {} (旧值 {})", key, previous);
        }
    }

    Ok(properties)
}

/// 按 `\n`、`\r`、`\r\n` 切分自然行
fn natural_lines(input: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let bytes = input.as_bytes();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&input[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&input[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < bytes.len() {
        lines.push(&input[start..]);
    }

    lines
}

fn ends_with_odd_backslashes(line: &str) -> bool {
    line.chars().rev().take_while(|&c| c == '\\').count() % 2 == 1
}

/// 合并续行，跳过空行和注释行，返回 (起始行号, 逻辑行)
fn logical_lines(input: &str) -> Vec<(usize, String)> {
    let mut result = Vec::new();
    let mut lines = natural_lines(input).into_iter().enumerate();

    while let Some((index, raw)) = lines.next() {
        let trimmed = raw.trim_start_matches(is_blank);
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        let mut logical = trimmed.to_string();
        while ends_with_odd_backslashes(&logical) {
            logical.pop();
            match lines.next() {
                Some((_, next)) => logical.push_str(next.trim_start_matches(is_blank)),
                None => break,
            }
        }

        result.push((index + 1, logical));
    }

    result
}

fn split_key_value(line: &str, line_number: usize) -> Result<(String, String), ConfigError> {
    let chars: Vec<char> = line.chars().collect();
    let mut index = 0;
    let mut escaped = false;

    while index < chars.len() {
        let c = chars[index];
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '=' || c == ':' || is_blank(c) {
            break;
        }
        index += 1;
    }
    let key_end = index;

    while index < chars.len() && is_blank(chars[index]) {
        index += 1;
    }
    if index < chars.len() && (chars[index] == '=' || chars[index] == ':') {
        index += 1;
        while index < chars.len() && is_blank(chars[index]) {
            index += 1;
        }
    }

    let key = unescape(&chars[..key_end], line_number)?;
    let value = unescape(&chars[index..], line_number)?;
    Ok((key, value))
}

fn unescape(chars: &[char], line_number: usize) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(chars.len());
    let mut index = 0;

    while index < chars.len() {
        let c = chars[index];
        index += 1;
        if c != '\\' {
            output.push(c);
            continue;
        }

        let Some(&escaped) = chars.get(index) else {
            break;
        };
        index += 1;

        match escaped {
            't' => output.push('\t'),
            'n' => output.push('\n'),
            'r' => output.push('\r'),
            'f' => output.push(FORM_FEED),
            'u' => {
                let unit = read_code_unit(chars, index, line_number)?;
                index += 4;
                if (0xD800..0xDC00).contains(&unit) {
                    let low = match (chars.get(index).copied(), chars.get(index + 1).copied()) {
                        (Some('\\'), Some('u')) => read_code_unit(chars, index + 2, line_number)?,
                        _ => {
                            return Err(ConfigError::parse_error(
                                line_number,
                                format!("不成对的代理项 \\u{unit:04X}"),
                            ))
                        }
                    };
                    index += 6;
                    let decoded = char::decode_utf16([unit, low])
                        .next()
                        .and_then(Result::ok)
                        .ok_or_else(|| {
                            ConfigError::parse_error(
                                line_number,
                                format!("无效的代理项对 \\u{unit:04X}\\u{low:04X}"),
                            )
                        })?;
                    output.push(decoded);
                } else {
                    let decoded = char::from_u32(u32::from(unit)).ok_or_else(|| {
                        ConfigError::parse_error(
                            line_number,
                            format!("不成对的代理项 \\u{unit:04X}"),
                        )
                    })?;
                    output.push(decoded);
                }
            }
            other => output.push(other),
        }
    }

    Ok(output)
}

fn read_code_unit(chars: &[char], start: usize, line_number: usize) -> Result<u16, ConfigError> {
    let digits: String = chars.iter().skip(start).take(4).collect();
    if digits.chars().count() != 4 {
        return Err(ConfigError::parse_error(
            line_number,
            "格式错误的 \\uxxxx 转义",
        ));
    }
    u16::from_str_radix(&digits, 16).map_err(|_| {
        ConfigError::parse_error(
            line_number,
            format!("格式错误的 \\uxxxx 转义: \\u{digits}"),
        )
    })
}
