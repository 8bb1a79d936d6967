//! 密码重置与欢迎邮件投递
//!
//! 真实的 SMTP 投递不在服务端内实现，部署方可以实现 [`Mailer`] 接入自己的邮件通道。

use async_trait::async_trait;
use tracing::info;

use crate::errors::Result;
use crate::models::auth::AccountType;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// 发送重置链接；失败时调用方会作废刚生成的令牌
    async fn send_password_reset(
        &self,
        email: &str,
        account_type: AccountType,
        reset_link: &str,
    ) -> Result<()>;

    /// 付款开通的学生账号，链接用于首次设置密码
    async fn send_welcome(&self, email: &str, name: &str, setup_link: &str) -> Result<()>;
}

/// 把邮件链接写入日志
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_password_reset(
        &self,
        email: &str,
        account_type: AccountType,
        reset_link: &str,
    ) -> Result<()> {
        info!(
            "Password reset requested for {} account {}: {}",
            account_type, email, reset_link
        );
        Ok(())
    }

    async fn send_welcome(&self, email: &str, name: &str, setup_link: &str) -> Result<()> {
        info!("Welcome email for {} <{}>: {}", name, email, setup_link);
        Ok(())
    }
}

/// 拼接前端重置页面链接
pub fn build_reset_link(base_url: &str, token: &str) -> String {
    let separator = if base_url.contains('?') { '&' } else { '?' };
    format!("{base_url}{separator}token={token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_reset_link() {
        assert_eq!(
            build_reset_link("http://localhost:5173/reset-password", "abc"),
            "http://localhost:5173/reset-password?token=abc"
        );
        assert_eq!(
            build_reset_link("http://app/reset?lang=pt", "abc"),
            "http://app/reset?lang=pt&token=abc"
        );
    }

    #[tokio::test]
    async fn test_log_mailer_succeeds() {
        let mailer = LogMailer;
        let result = mailer
            .send_password_reset("ana@example.com", AccountType::Student, "http://x?token=t")
            .await;
        assert!(result.is_ok());

        let result = mailer
            .send_welcome("ana@example.com", "Ana", "http://x?token=t")
            .await;
        assert!(result.is_ok());
    }
}
