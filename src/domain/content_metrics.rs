//! 内容统计
//!
//! 从章节的标记文本计算字数与字符数：
//! 1. 去除标签（行内标签直接去掉，块级标签替换为空白）
//! 2. 解码常见 HTML 实体
//! 3. CJK 字符逐字计为一个词，其余按空白分词

/// 行内标签去掉后不产生词边界
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "bdi", "bdo", "cite", "code", "em", "i", "kbd", "mark", "q", "ruby", "rt",
    "rp", "s", "samp", "small", "span", "strong", "sub", "sup", "time", "u", "var", "wbr",
];

/// 实体最大长度（不含 `&` 和 `;`）
const MAX_ENTITY_LEN: usize = 10;

/// 内容统计结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentMetrics {
    pub word_count: u32,
    pub char_count: u32,
}

/// 计算内容统计
pub fn measure(content: &str) -> ContentMetrics {
    let text = strip_markup(content);

    let mut word_count: u32 = 0;
    let mut char_count: u32 = 0;
    let mut in_word = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            in_word = false;
            continue;
        }

        char_count = char_count.saturating_add(1);

        if is_cjk(ch) {
            word_count = word_count.saturating_add(1);
            in_word = false;
        } else if ch.is_alphanumeric() && !in_word {
            word_count = word_count.saturating_add(1);
            in_word = true;
        }
    }

    ContentMetrics {
        word_count,
        char_count,
    }
}

/// 去除标记，返回纯文本
pub fn strip_markup(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut closer = CloseFinder::new(content);
    let mut rest = content;

    while let Some(ch) = rest.chars().next() {
        let offset = content.len() - rest.len();
        match ch {
            '<' => {
                let close = || closer.find_from(offset + 1).map(|at| at - offset);
                if let Some((tag_len, inline)) = parse_tag(rest, close) {
                    if !inline {
                        out.push(' ');
                    }
                    rest = &rest[tag_len..];
                    continue;
                }
            }
            '&' => {
                if let Some((entity_len, decoded)) = parse_entity(rest) {
                    out.push(decoded);
                    rest = &rest[entity_len..];
                    continue;
                }
            }
            _ => {}
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    out
}

/// 记住上一次找到的 `>`，未闭合的 `<` 不会重复扫描剩余文本
struct CloseFinder<'a> {
    text: &'a str,
    found: Option<usize>,
    exhausted: bool,
}

impl<'a> CloseFinder<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            found: None,
            exhausted: false,
        }
    }

    /// `from` 之后（含）第一个 `>` 的绝对位置
    fn find_from(&mut self, from: usize) -> Option<usize> {
        if self.exhausted {
            return None;
        }
        if let Some(at) = self.found.filter(|at| *at >= from) {
            return Some(at);
        }
        match self.text.get(from..).and_then(|tail| tail.find('>')) {
            Some(i) => {
                self.found = Some(from + i);
                self.found
            }
            None => {
                self.exhausted = true;
                None
            }
        }
    }
}

/// 解析以 `<` 开头的标签，返回（字节长度，是否行内标签）
///
/// `<` 后不是字母、`/` 或 `!` 时按普通文本处理，例如 `a < b`。
/// `close` 给出 `>` 相对 `s` 的位置。
fn parse_tag(s: &str, close: impl FnOnce() -> Option<usize>) -> Option<(usize, bool)> {
    let after = s.get(1..)?;
    let first = after.chars().next()?;
    if !(first.is_ascii_alphabetic() || first == '/' || first == '!') {
        return None;
    }

    let end = close()?;
    let name: String = after
        .trim_start_matches('/')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    Some((end + 1, INLINE_TAGS.contains(&name.as_str())))
}

/// 解析以 `&` 开头的实体，返回（字节长度，解码字符）
///
/// 只在 `MAX_ENTITY_LEN + 1` 字节内查找 `;`
fn parse_entity(s: &str) -> Option<(usize, char)> {
    let window = s.as_bytes().get(1..)?;
    let window = &window[..window.len().min(MAX_ENTITY_LEN + 1)];
    let semi = window.iter().position(|&b| b == b';')? + 1;
    let name = &s[1..semi];

    let decoded = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" | "#39" => '\'',
        "nbsp" => ' ',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?
        }
    };

    Some((semi + 1, decoded))
}

/// 中日文字符（逐字计词）
#[inline]
fn is_cjk(ch: char) -> bool {
    matches!(ch,
        '\u{3040}'..='\u{309F}'   // 平假名
        | '\u{30A0}'..='\u{30FF}' // 片假名
        | '\u{3400}'..='\u{4DBF}' // 扩展 A
        | '\u{4E00}'..='\u{9FFF}' // 基本汉字
        | '\u{F900}'..='\u{FAFF}' // 兼容汉字
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(content: &str) -> (u32, u32) {
        let m = measure(content);
        (m.word_count, m.char_count)
    }

    #[test]
    fn test_simple_paragraph() {
        assert_eq!(counts("<p>Hello</p>"), (1, 5));
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(counts(""), (0, 0));
        assert_eq!(counts("<p></p><br/>"), (0, 0));
    }

    #[test]
    fn test_block_tags_separate_words() {
        assert_eq!(counts("<p>one</p><p>two</p>"), (2, 6));
    }

    #[test]
    fn test_inline_tags_do_not_split_words() {
        assert_eq!(counts("<p>Hello <b>wor</b>ld</p>"), (2, 10));
    }

    #[test]
    fn test_cjk_counts_each_character() {
        assert_eq!(counts("<p>你好，世界</p>"), (4, 5));
        assert_eq!(counts("中文abc"), (3, 5));
    }

    #[test]
    fn test_hangul_uses_spaces() {
        assert_eq!(counts("<p>안녕 하세요</p>"), (2, 5));
    }

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(counts("a&nbsp;&amp;&nbsp;b"), (2, 3));
        assert_eq!(strip_markup("&lt;p&gt; &#65;&#x42;"), "<p> AB");
    }

    #[test]
    fn test_literal_angle_bracket() {
        assert_eq!(strip_markup("x < y"), "x < y");
        assert_eq!(counts("x < y"), (2, 3));
    }

    #[test]
    fn test_unterminated_entity_is_text() {
        assert_eq!(strip_markup("fish & chips"), "fish & chips");
    }

    #[test]
    fn test_entity_longer_than_limit_is_text() {
        assert_eq!(strip_markup("&abcdefghijk;"), "&abcdefghijk;");
        assert_eq!(strip_markup("&#x1F600;"), "\u{1F600}");
    }

    #[test]
    fn test_tag_closed_far_away() {
        // 只有末尾一个 `>`：整段是一个未知标签
        let mut content = "<a".repeat(1000);
        content.push('>');
        assert_eq!(counts(&content), (0, 0));
        assert_eq!(counts("<p>x</p>y<z"), (2, 4));
    }

    #[test]
    fn test_unterminated_markup_scans_in_linear_time() {
        for unit in ["<a", "&a"] {
            let content = unit.repeat(500_000);
            let started = std::time::Instant::now();
            let metrics = measure(&content);
            assert!(
                started.elapsed() < std::time::Duration::from_secs(5),
                "{} x 500000 took {:?}",
                unit,
                started.elapsed()
            );
            assert_eq!(metrics.char_count, 1_000_000);
            assert_eq!(metrics.word_count, 1);
        }
    }
}
