use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct NewsletterRequest {
    pub email: Option<String>,
}
