//! Outbound email: transport abstraction and the templates rendered into it.

pub mod service;
pub mod templates;

pub use service::{EmailSender, EmailService, MockEmailSender, SmtpEmailService};
pub use templates::{EmailTemplate, PasswordResetEmailTemplate};

/// Escape text interpolated into an HTML email body
pub fn html_escape(input: &str) -> String {
    input.chars().fold(String::with_capacity(input.len()), |mut out, c| {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            other => out.push(other),
        }
        out
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(html_escape("Ada Lovelace 1815"), "Ada Lovelace 1815");
        assert_eq!(html_escape(""), "");
    }

    #[test]
    fn test_markup_is_neutralized() {
        assert_eq!(html_escape("<b>\"hi\"</b>"), "&lt;b&gt;&quot;hi&quot;&lt;/b&gt;");
        assert_eq!(html_escape("a'&'b"), "a&#x27;&amp;&#x27;b");
    }

    #[test]
    fn test_already_escaped_input_escapes_again() {
        assert_eq!(html_escape("&lt;"), "&amp;lt;");
    }
}
