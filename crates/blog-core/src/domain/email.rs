/// Outgoing plain-text email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    /// Compose the "recommend this post" message sent by the share form.
    pub fn recommendation(
        post_title: &str,
        post_url: &str,
        sender_name: &str,
        comments: &str,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            to: vec![to.into()],
            subject: format!("{sender_name} recommends you read {post_title}"),
            body: format!(
                "Read {post_title} at {post_url}\n\n{sender_name}'s comments: {comments}"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendation_embeds_url_and_comments() {
        let message = EmailMessage::recommendation(
            "Hello Rust",
            "http://localhost:8080/2024/3/1/hello-rust/",
            "Ann",
            "Worth a read",
            "blog@example.com",
            "bob@example.com",
        );

        assert_eq!(message.subject, "Ann recommends you read Hello Rust");
        assert_eq!(message.to, vec!["bob@example.com".to_string()]);
        assert!(
            message
                .body
                .starts_with("Read Hello Rust at http://localhost:8080/2024/3/1/hello-rust/")
        );
        assert!(message.body.ends_with("Ann's comments: Worth a read"));
    }
}
