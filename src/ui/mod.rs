//! Server-rendered pages for the password reset flow.
//!
//! Four small forms and confirmations; plain string templates keep the
//! surface free of a template engine.

/// Shared page shell
fn render_page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, 'Helvetica Neue', Arial, sans-serif;
            background-color: #f5f5f5;
            margin: 0;
        }}
        .card {{
            max-width: 400px;
            margin: 80px auto;
            background: #ffffff;
            border-radius: 8px;
            box-shadow: 0 2px 8px rgba(0, 0, 0, 0.06);
            padding: 32px 24px;
        }}
        h1 {{
            font-size: 20px;
            margin: 0 0 16px;
            color: #111827;
        }}
        p {{
            color: #374151;
            line-height: 1.6;
        }}
        input {{
            width: 100%;
            box-sizing: border-box;
            padding: 10px;
            margin: 8px 0 16px;
            border: 1px solid #d1d5db;
            border-radius: 6px;
        }}
        button {{
            background: #2563eb;
            color: white;
            border: none;
            border-radius: 6px;
            padding: 10px 24px;
            font-weight: 500;
            cursor: pointer;
        }}
    </style>
</head>
<body>
    <div class="card">
        <h1>{title}</h1>
{body}
    </div>
</body>
</html>"#,
        title = title,
        body = body,
    )
}

/// Form asking for the account email
pub fn render_forgot_password_page() -> String {
    render_page(
        "Forgot Password",
        r#"        <p>Enter your account email and we'll send you a reset link.</p>
        <form method="post" action="/password/forgot-password">
            <input type="email" name="email" placeholder="you@example.com" required>
            <button type="submit">Send Reset Link</button>
        </form>"#,
    )
}

/// Confirmation that the link went out
pub fn render_link_sent_page(email: &str) -> String {
    let body = format!(
        r#"        <p>A password reset link has been sent to <strong>{email}</strong>.</p>
        <p>The link expires in 10 minutes.</p>"#,
        email = html_escape(email),
    );
    render_page("Link Sent", &body)
}

/// Form for choosing a new password; posts back to its own URL
pub fn render_reset_password_page(email: &str) -> String {
    let body = format!(
        r#"        <p>Choose a new password for <strong>{email}</strong>.</p>
        <form method="post">
            <input type="password" name="password" placeholder="New password" required>
            <button type="submit">Reset Password</button>
        </form>"#,
        email = html_escape(email),
    );
    render_page("Reset Password", &body)
}

pub fn render_reset_success_page() -> String {
    render_page(
        "Password Reset",
        r#"        <p>Your password has been changed. You can now log in with it.</p>"#,
    )
}

/// Escape HTML special characters
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("<script>"), "&lt;script&gt;");
        assert_eq!(html_escape("a&b"), "a&amp;b");
    }

    #[test]
    fn test_forgot_password_page_posts_to_flow() {
        let html = render_forgot_password_page();
        assert!(html.contains(r#"action="/password/forgot-password""#));
        assert!(html.contains(r#"name="email""#));
    }

    #[test]
    fn test_reset_page_shows_email() {
        let html = render_reset_password_page("alice@example.com");
        assert!(html.contains("alice@example.com"));
        assert!(html.contains(r#"name="password""#));
    }

    #[test]
    fn test_pages_escape_user_data() {
        let html = render_link_sent_page("<script>alert(1)</script>@x.com");
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
