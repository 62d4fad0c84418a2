/// Token估算器，用于估算提示词文本的token数量
///
/// 中英文按不同的字符/token比例估算，其他字符按英文规则处理。
pub struct TokenEstimator {
    /// 英文字符的平均token比例（字符数/token数）
    english_char_per_token: f64,
    /// 中文字符的平均token比例
    chinese_char_per_token: f64,
    /// 基础token开销（系统prompt等）
    base_token_overhead: usize,
}

impl Default for TokenEstimator {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenEstimator {
    pub fn new() -> Self {
        // 基于GPT系列模型的经验值
        Self {
            english_char_per_token: 4.0,
            chinese_char_per_token: 1.5,
            base_token_overhead: 50,
        }
    }

    /// 估算文本的token数量
    pub fn estimate_tokens(&self, text: &str) -> usize {
        let character_count = text.chars().count();
        let chinese_char_count = self.count_chinese_chars(text);
        let english_char_count = self.count_english_chars(text);
        let other_char_count = character_count - chinese_char_count - english_char_count;

        let chinese_tokens =
            (chinese_char_count as f64 / self.chinese_char_per_token).ceil() as usize;
        let english_tokens =
            (english_char_count as f64 / self.english_char_per_token).ceil() as usize;
        // 其他字符按英文规则计算
        let other_tokens = if other_char_count > 0 {
            (other_char_count as f64 / self.english_char_per_token).ceil() as usize
        } else {
            0
        };

        chinese_tokens + english_tokens + other_tokens + self.base_token_overhead
    }

    /// 估算多个文本片段的总token数量
    pub fn estimate_total_tokens(&self, texts: &[&str]) -> usize {
        texts.iter().map(|text| self.estimate_tokens(text)).sum()
    }

    /// 检查文本是否超过token限制
    pub fn exceeds_limit(&self, text: &str, limit: usize) -> bool {
        self.estimate_tokens(text) > limit
    }

    /// 将token预算折算为保守的字符数上限（按英文比例）
    pub fn chars_for_budget(&self, token_budget: usize) -> usize {
        (token_budget as f64 * self.english_char_per_token) as usize
    }

    /// 计算中文字符数量
    fn count_chinese_chars(&self, text: &str) -> usize {
        text.chars().filter(|c| self.is_chinese_char(*c)).count()
    }

    /// 计算英文字符数量
    fn count_english_chars(&self, text: &str) -> usize {
        text.chars()
            .filter(|c| {
                c.is_ascii_alphabetic()
                    || c.is_ascii_whitespace()
                    || c.is_ascii_digit()
                    || c.is_ascii_punctuation()
            })
            .count()
    }

    /// 判断是否为中文字符
    fn is_chinese_char(&self, c: char) -> bool {
        matches!(c as u32,
            0x4E00..=0x9FFF |  // CJK统一汉字
            0x3400..=0x4DBF |  // CJK扩展A
            0x20000..=0x2A6DF | // CJK扩展B
            0x2A700..=0x2B73F | // CJK扩展C
            0x2B740..=0x2B81F | // CJK扩展D
            0x2B820..=0x2CEAF | // CJK扩展E
            0x2CEB0..=0x2EBEF | // CJK扩展F
            0x30000..=0x3134F   // CJK扩展G
        )
    }
}
