//! Outbound email.
//!
//! Handlers talk to a `Mailer` trait object so the SMTP transport can be
//! swapped out in tests. Send failures propagate to the caller; there
//! are no retries.

mod email;

pub use email::{render_reset_email_html, render_reset_email_text, SmtpMailer};

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Mailer: Send + Sync {
    /// Send a message with HTML and plain text bodies
    async fn send(&self, to: &str, subject: &str, html_body: &str, text_body: &str) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub struct SentEmail {
        pub to: String,
        pub subject: String,
        pub html_body: String,
        pub text_body: String,
    }

    /// Captures sent mail; optionally fails every send.
    #[derive(Default)]
    pub struct MockMailer {
        pub fail: bool,
        sent: Mutex<Vec<SentEmail>>,
    }

    impl MockMailer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                sent: Mutex::new(Vec::new()),
            }
        }

        pub fn sent(&self) -> Vec<SentEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for MockMailer {
        async fn send(
            &self,
            to: &str,
            subject: &str,
            html_body: &str,
            text_body: &str,
        ) -> Result<()> {
            if self.fail {
                anyhow::bail!("SMTP transport unavailable");
            }
            self.sent.lock().unwrap().push(SentEmail {
                to: to.to_string(),
                subject: subject.to_string(),
                html_body: html_body.to_string(),
                text_body: text_body.to_string(),
            });
            Ok(())
        }
    }
}
