//! Transactional email for account and subscription events.
//!
//! Uses SMTP via lettre for delivery with Askama HTML templates.

use askama::Template;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// HTML template for the post-signup welcome email.
#[derive(Template)]
#[template(path = "email/welcome.html")]
struct WelcomeEmailHtml<'a> {
    username: &'a str,
    menu_url: &'a str,
}

/// Plain text template for the post-signup welcome email.
#[derive(Template)]
#[template(path = "email/welcome.txt")]
struct WelcomeEmailText<'a> {
    username: &'a str,
    menu_url: &'a str,
}

/// HTML template for the subscription activation receipt.
#[derive(Template)]
#[template(path = "email/subscription_activated.html")]
struct SubscriptionActivatedHtml<'a> {
    plan_label: &'a str,
    end_date: &'a str,
}

/// Plain text template for the subscription activation receipt.
#[derive(Template)]
#[template(path = "email/subscription_activated.txt")]
struct SubscriptionActivatedText<'a> {
    plan_label: &'a str,
    end_date: &'a str,
}

/// HTML template for the pre-expiry warning.
#[derive(Template)]
#[template(path = "email/expiry_warning.html")]
struct ExpiryWarningHtml<'a> {
    days_left: i64,
    renew_url: &'a str,
}

/// Plain text template for the pre-expiry warning.
#[derive(Template)]
#[template(path = "email/expiry_warning.txt")]
struct ExpiryWarningText<'a> {
    days_left: i64,
    renew_url: &'a str,
}

/// HTML template for the post-expiry downgrade notice.
#[derive(Template)]
#[template(path = "email/subscription_expired.html")]
struct SubscriptionExpiredHtml<'a> {
    renew_url: &'a str,
}

/// Plain text template for the post-expiry downgrade notice.
#[derive(Template)]
#[template(path = "email/subscription_expired.txt")]
struct SubscriptionExpiredText<'a> {
    renew_url: &'a str,
}

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email service for sending transactional emails.
#[derive(Clone)]
pub struct EmailService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
    base_url: String,
}

impl EmailService {
    /// Create a new email service from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if SMTP relay setup fails.
    pub fn new(config: &EmailConfig, base_url: &str) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            mailer,
            from_address: config.from_address.clone(),
            base_url: base_url.to_owned(),
        })
    }

    /// Send a welcome email after successful registration.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_welcome(
        &self,
        to: &str,
        username: &str,
        menu_url: &str,
    ) -> Result<(), EmailError> {
        let html = WelcomeEmailHtml { username, menu_url }.render()?;
        let text = WelcomeEmailText { username, menu_url }.render()?;

        self.send_multipart_email(to, "Welcome to Menulane", &text, &html)
            .await
    }

    /// Send the receipt after a charge is applied.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_subscription_activated(
        &self,
        to: &str,
        plan_label: &str,
        end_date: &str,
    ) -> Result<(), EmailError> {
        let html = SubscriptionActivatedHtml {
            plan_label,
            end_date,
        }
        .render()?;
        let text = SubscriptionActivatedText {
            plan_label,
            end_date,
        }
        .render()?;

        self.send_multipart_email(to, "Your Menulane Pro subscription is active", &text, &html)
            .await
    }

    /// Warn that a subscription expires within a few days.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_expiry_warning(&self, to: &str, days_left: i64) -> Result<(), EmailError> {
        let renew_url = format!("{}/account/billing", self.base_url);
        let html = ExpiryWarningHtml {
            days_left,
            renew_url: &renew_url,
        }
        .render()?;
        let text = ExpiryWarningText {
            days_left,
            renew_url: &renew_url,
        }
        .render()?;

        self.send_multipart_email(to, "Your Menulane Pro subscription expires soon", &text, &html)
            .await
    }

    /// Notify that a lapsed subscription was downgraded to free.
    ///
    /// # Errors
    ///
    /// Returns error if email fails to send or template fails to render.
    pub async fn send_subscription_expired(&self, to: &str) -> Result<(), EmailError> {
        let renew_url = format!("{}/account/billing", self.base_url);
        let html = SubscriptionExpiredHtml {
            renew_url: &renew_url,
        }
        .render()?;
        let text = SubscriptionExpiredText {
            renew_url: &renew_url,
        }
        .render()?;

        self.send_multipart_email(to, "Your Menulane Pro subscription has expired", &text, &html)
            .await
    }

    /// Send a multipart email with both plain text and HTML versions.
    async fn send_multipart_email(
        &self,
        to: &str,
        subject: &str,
        text_body: &str,
        html_body: &str,
    ) -> Result<(), EmailError> {
        let email = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(to.to_string()))?)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(text_body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(html_body.to_string()),
                    ),
            )?;

        self.mailer.send(email).await?;

        tracing::info!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}
