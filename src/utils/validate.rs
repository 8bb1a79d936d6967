use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static COUNTRY_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z]{2,3}$").expect("Invalid country code regex"));

const WEAK_PASSWORDS: [&str; 9] = [
    "password",
    "12345678",
    "123456789",
    "qwerty123",
    "admin123",
    "password1",
    "senha123",
    "abcd1234",
    "mudar123",
];

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email.trim()) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 名称不能为空，且不超过 200 字符
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err("Name is required");
    }
    if trimmed.chars().count() > 200 {
        return Err("Name must be at most 200 characters");
    }
    Ok(())
}

/// 国家代码：2~3 个字母
pub fn validate_country_code(code: &str) -> Result<(), &'static str> {
    if !COUNTRY_CODE_RE.is_match(code) {
        return Err("Country code must be 2 or 3 letters");
    }
    Ok(())
}

/// 验证密码是否符合安全策略，返回所有未满足的规则
///
/// - 至少 8 个字符
/// - 包含大写字母、小写字母和数字
/// - 不是常见弱密码
pub fn password_violations(password: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("Password must contain at least one uppercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("Password must contain at least one lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("Password must contain at least one digit");
    }
    if WEAK_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("Password is too common, please choose a stronger password");
    }

    errors
}

pub fn validate_password(password: &str) -> Result<(), String> {
    let errors = password_violations(password);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("dev@acme.com.br").is_ok());
        assert!(validate_email(" dev@acme.io ").is_ok());
        assert!(validate_email("dev@acme").is_err());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_name() {
        assert!(validate_name("Acme Ltda").is_ok());
        assert_eq!(validate_name("   "), Err("Name is required"));
        assert!(validate_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_country_code() {
        assert!(validate_country_code("BR").is_ok());
        assert!(validate_country_code("PRT").is_ok());
        assert!(validate_country_code("BRAZ").is_err());
        assert!(validate_country_code("B1").is_err());
    }

    #[test]
    fn test_strong_password() {
        assert!(validate_password("SecureP@ss1").is_ok());
        assert!(validate_password("Entrega2025").is_ok());
    }

    #[test]
    fn test_password_rules() {
        let errors = password_violations("ab1");
        assert!(errors.contains(&"Password must be at least 8 characters long"));
        assert!(errors.contains(&"Password must contain at least one uppercase letter"));

        let errors = password_violations("ENTREGA2025");
        assert_eq!(
            errors,
            vec!["Password must contain at least one lowercase letter"]
        );

        // 常见密码即使满足字符规则也会单独报告
        let errors = password_violations("ABCD1234");
        assert_eq!(
            errors,
            vec![
                "Password must contain at least one lowercase letter",
                "Password is too common, please choose a stronger password",
            ]
        );

        let errors = password_violations("AbcdEfgh");
        assert_eq!(errors, vec!["Password must contain at least one digit"]);
    }

    #[test]
    fn test_common_password() {
        let err = validate_password("Senha123").unwrap_err();
        assert!(err.contains("too common"));
    }
}
