use argus_core::notify::error::NotifyError;
use argus_core::notify::port::{Delivery, Notifier};
use async_trait::async_trait;
use lettre::message::{Mailbox, Message, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{debug, warn};

/// Environment variable holding the SMTP username (also used as sender).
pub const USER_ENV: &str = "EMAIL_USER";
/// Environment variable holding the SMTP password or app password.
pub const PASS_ENV: &str = "EMAIL_PASS";

/// SMTP login pair.
#[derive(Clone)]
pub struct SmtpCredentials {
    pub user: String,
    pub password: String,
}

impl SmtpCredentials {
    /// # Summary
    /// Reads credentials from `EMAIL_USER` / `EMAIL_PASS`.
    ///
    /// # Returns
    /// * `None` when either variable is missing or empty.
    pub fn from_env() -> Option<Self> {
        let user = std::env::var(USER_ENV).ok().filter(|v| !v.is_empty())?;
        let password = std::env::var(PASS_ENV).ok().filter(|v| !v.is_empty())?;
        Some(Self { user, password })
    }
}

/// An authenticated transport plus the sender mailbox.
struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

/// # Summary
/// A notifier implementation that sends messages via SMTP (e.g., Gmail).
///
/// # Invariants
/// - Without credentials every call is a logged no-op returning `Delivery::Skipped`.
/// - The `AsyncSmtpTransport` is reused for multiple notifications.
pub struct EmailNotifier {
    mailer: Option<Mailer>,
}

impl EmailNotifier {
    /// # Summary
    /// Creates a new `EmailNotifier`.
    ///
    /// # Logic
    /// 1. Without credentials, builds a disabled notifier.
    /// 2. Otherwise configures an implicit-TLS relay on `host:port` with login,
    ///    and uses the login as the sender address.
    ///
    /// # Arguments
    /// * `host` - The SMTP server host (e.g., "smtp.gmail.com").
    /// * `port` - The SMTP port (465 for implicit TLS).
    /// * `credentials` - Login pair, if configured.
    ///
    /// # Returns
    /// * A new instance of `EmailNotifier` or `NotifyError::Config`.
    pub fn new(
        host: &str,
        port: u16,
        credentials: Option<SmtpCredentials>,
    ) -> Result<Self, NotifyError> {
        let Some(creds) = credentials else {
            return Ok(Self::disabled());
        };

        let from: Mailbox = creds
            .user
            .parse()
            .map_err(|e| NotifyError::Config(format!("Invalid from address: {}", e)))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| NotifyError::Config(format!("Invalid SMTP host: {}", e)))?
            .port(port)
            .credentials(Credentials::new(creds.user, creds.password))
            .build();

        Ok(Self {
            mailer: Some(Mailer { transport, from }),
        })
    }

    /// Same as [`EmailNotifier::new`] with credentials taken from the environment.
    pub fn from_env(host: &str, port: u16) -> Result<Self, NotifyError> {
        Self::new(host, port, SmtpCredentials::from_env())
    }

    /// A notifier that never sends anything.
    pub fn disabled() -> Self {
        Self { mailer: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    /// # Summary
    /// Sends a plain-text notification email.
    ///
    /// # Logic
    /// 1. Returns `Skipped` when credentials are not configured.
    /// 2. Builds the message with the subject and content.
    /// 3. Sends it through the configured SMTP transport.
    ///
    /// # Arguments
    /// * `to` - The recipient's email address.
    /// * `subject` - The subject line of the email.
    /// * `content` - The body content of the email.
    ///
    /// # Returns
    /// * `Ok(Delivery::Sent)` once the server accepted the message.
    /// * `Ok(Delivery::Skipped)` when credentials are missing.
    /// * `Err(NotifyError)` if the address is invalid or SMTP fails.
    async fn notify(&self, to: &str, subject: &str, content: &str) -> Result<Delivery, NotifyError> {
        let Some(mailer) = &self.mailer else {
            warn!(subject, "Email credentials not set, skipping notification");
            return Ok(Delivery::Skipped);
        };

        let email = Message::builder()
            .from(mailer.from.clone())
            .to(to
                .parse()
                .map_err(|e| NotifyError::Config(format!("Invalid to address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(content.to_string())
            .map_err(|e| NotifyError::Platform(format!("Failed to build email: {}", e)))?;

        mailer
            .transport
            .send(email)
            .await
            .map_err(|e| NotifyError::Network(format!("SMTP error: {}", e)))?;

        debug!(to, subject, "Email sent");
        Ok(Delivery::Sent)
    }
}
