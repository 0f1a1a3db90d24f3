//! Prompts for Google Business Profile content.

use super::client::{OpenAiError, TextGenerator};

const POST_TEMPERATURE: f32 = 0.7;
const REPLY_TEMPERATURE: f32 = 0.5;

pub async fn draft_post(
    generator: &impl TextGenerator,
    business: &str,
    topic: &str,
) -> Result<String, OpenAiError> {
    generator
        .generate(&post_prompt(business, topic), POST_TEMPERATURE)
        .await
}

pub async fn draft_reply(
    generator: &impl TextGenerator,
    business: &str,
    review_text: &str,
) -> Result<String, OpenAiError> {
    generator
        .generate(&reply_prompt(business, review_text), REPLY_TEMPERATURE)
        .await
}

fn post_prompt(business: &str, topic: &str) -> String {
    format!(
        "Write a 90-120 word Google Business Profile post for \"{business}\". Topic: {topic}. \
         Tone: friendly and local. Include a light call-to-action."
    )
}

fn reply_prompt(business: &str, review_text: &str) -> String {
    format!(
        "Write a courteous 60-80 word reply from \"{business}\" to this Google review. \
         Personalize, thank them, and invite them back.\n\nReview: {review_text}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockGenerator {
        calls: Mutex<Vec<(String, f32)>>,
    }

    impl TextGenerator for MockGenerator {
        async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, OpenAiError> {
            self.calls
                .lock()
                .unwrap()
                .push((prompt.to_string(), temperature));
            Ok("drafted".to_string())
        }
    }

    #[tokio::test]
    async fn draft_post_uses_post_prompt() {
        let mock = MockGenerator::default();
        let text = draft_post(&mock, "Test Cafe", "new autumn menu").await.unwrap();
        assert_eq!(text, "drafted");

        let calls = mock.calls.lock().unwrap();
        let (prompt, temperature) = &calls[0];
        assert!(prompt.starts_with("Write a 90-120 word Google Business Profile post for \"Test Cafe\"."));
        assert!(prompt.contains("Topic: new autumn menu."));
        assert!(prompt.ends_with("Include a light call-to-action."));
        assert_eq!(*temperature, POST_TEMPERATURE);
    }

    #[tokio::test]
    async fn draft_reply_embeds_review() {
        let mock = MockGenerator::default();
        draft_reply(&mock, "Test Cafe", "Great flat white!").await.unwrap();

        let calls = mock.calls.lock().unwrap();
        let (prompt, temperature) = &calls[0];
        assert!(prompt.contains("reply from \"Test Cafe\""));
        assert!(prompt.ends_with("\n\nReview: Great flat white!"));
        assert_eq!(*temperature, REPLY_TEMPERATURE);
    }
}
