use rand::Rng;

/// URL 安全字符集
const URL_SAFE_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// 生成指定长度的 URL 安全随机串
pub fn generate_random_code(length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..URL_SAFE_CHARSET.len());
            URL_SAFE_CHARSET[idx] as char
        })
        .collect()
}

/// 密码重置令牌，43 个字符约等于 32 字节熵
pub fn generate_reset_token() -> String {
    generate_random_code(43)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_token_is_url_safe() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 43);
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        assert_ne!(token, generate_reset_token());
    }
}
