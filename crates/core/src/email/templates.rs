//! Outbound email templates.

use super::html_escape;

/// A renderable email
pub trait EmailTemplate {
    /// Subject line
    fn subject(&self) -> String;
    /// HTML body
    fn body_html(&self) -> String;
    /// Plain text body (fallback for clients that reject HTML)
    fn body_text(&self) -> String;
}

/// Password reset email carrying a six-digit one-time code
pub struct PasswordResetEmailTemplate {
    /// Recipient's display name
    pub name: String,
    /// The one-time code
    pub otp: String,
    /// Code lifetime in minutes, shown to the reader
    pub ttl_minutes: u64,
}

impl EmailTemplate for PasswordResetEmailTemplate {
    fn subject(&self) -> String {
        "Your password reset code".to_string()
    }

    fn body_html(&self) -> String {
        let name = html_escape(&self.name);
        let otp = html_escape(&self.otp);
        format!(
            "<html><body>\
             <p>Hi {name},</p>\
             <p>Use this code to reset your password:</p>\
             <p style=\"font-size:24px;font-weight:bold;letter-spacing:4px\">{otp}</p>\
             <p>The code expires in {ttl} minutes. If you did not request a reset, \
             you can ignore this email.</p>\
             </body></html>",
            ttl = self.ttl_minutes,
        )
    }

    fn body_text(&self) -> String {
        format!(
            "Hi {},\n\n\
             Use this code to reset your password: {}\n\n\
             The code expires in {} minutes. If you did not request a reset, \
             you can ignore this email.\n",
            self.name, self.otp, self.ttl_minutes,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn template() -> PasswordResetEmailTemplate {
        PasswordResetEmailTemplate {
            name: "Ada".to_string(),
            otp: "123456".to_string(),
            ttl_minutes: 5,
        }
    }

    #[test]
    fn test_both_bodies_contain_the_code() {
        let t = template();
        assert!(t.body_html().contains("123456"));
        assert!(t.body_text().contains("123456"));
    }

    #[test]
    fn test_bodies_mention_expiry() {
        let t = template();
        assert!(t.body_html().contains("5 minutes"));
        assert!(t.body_text().contains("5 minutes"));
    }

    #[test]
    fn test_html_body_escapes_name() {
        let t = PasswordResetEmailTemplate {
            name: "<script>alert(1)</script>".to_string(),
            otp: "123456".to_string(),
            ttl_minutes: 5,
        };
        assert!(!t.body_html().contains("<script>"));
        assert!(t.body_html().contains("&lt;script&gt;"));
    }
}
