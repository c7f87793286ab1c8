use super::engine::TeraEngine;
use tera::Context;

pub const NO_CONTEXT_PLACEHOLDER: &str = "No context yet.";
pub const NO_FEEDBACK_PLACEHOLDER: &str = "No feedback yet.";

pub const POST_WRITER_SYSTEM_PROMPT: &str = "\
You are a seasoned AI engineer and thought leader writing for LinkedIn. \
Your audience is fellow engineers and researchers.";

const REFINE_TOPIC_TEMPLATE: &str = "\
Rewrite the following request for a LinkedIn post as one clear, complete sentence \
describing what the post should be about. Reply with that sentence only.

Request: {{ raw_topic }}";

const POST_TEMPLATE: &str = "\
Your task is to generate a LinkedIn post based on the user's topic.

Here is the information you have:
- User's Topic: {{ topic }}
- Research Context: {{ context }}
- Previous Human Feedback for revision: {{ feedback }}

Instructions:
1. Write from the perspective of a practitioner who has recently worked with the topic. \
Keep the tone grounded; avoid marketing language and boasting.
2. Share insight, not a summary: analysis of recent developments, practical challenges, \
and how the topic connects to wider industry trends.
3. Use industry terminology correctly while staying clear and concise.
4. If the topic needs current data, call `web_search`. If the topic references a web page, \
call `fetch_url`. Request at most one tool at a time.
5. If feedback is present, revise the previous post to incorporate it.
6. Include relevant professional hashtags. Do not use markdown bold; LinkedIn does not render it.
7. Never ask readers for their opinions or invite them to share experiences.
8. Output the post text only, without a feedback or research section.";

const SUMMARY_TEMPLATE: &str = "\
Summarize the following web page text in under {{ word_cap }} words. Keep concrete facts, \
numbers and names. Reply with the summary only.

{{ text }}";

const REFINE_TOPIC_NAME: &str = "refine_topic";
const POST_NAME: &str = "linkedin_post";
const SUMMARY_NAME: &str = "summary";

/// Renders every prompt the workflow sends to the model.
pub struct PromptBuilder {
    engine: TeraEngine,
}

impl PromptBuilder {
    pub fn new() -> anyhow::Result<Self> {
        let mut engine = TeraEngine::new();
        engine.add_template(REFINE_TOPIC_NAME, REFINE_TOPIC_TEMPLATE)?;
        engine.add_template(POST_NAME, POST_TEMPLATE)?;
        engine.add_template(SUMMARY_NAME, SUMMARY_TEMPLATE)?;
        Ok(Self { engine })
    }

    pub fn refine_topic(&self, raw_topic: &str) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("raw_topic", raw_topic.trim());
        self.engine.render(REFINE_TOPIC_NAME, &ctx)
    }

    /// Build the drafting prompt. Blank context or feedback is replaced by a placeholder.
    pub fn post(&self, topic: &str, context: &str, feedback: &str) -> anyhow::Result<String> {
        let or_placeholder = |value: &str, placeholder: &'static str| {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                placeholder.to_string()
            } else {
                trimmed.to_string()
            }
        };

        let mut ctx = Context::new();
        ctx.insert("topic", topic.trim());
        ctx.insert("context", &or_placeholder(context, NO_CONTEXT_PLACEHOLDER));
        ctx.insert("feedback", &or_placeholder(feedback, NO_FEEDBACK_PLACEHOLDER));
        self.engine.render(POST_NAME, &ctx)
    }

    pub fn summary(&self, text: &str, word_cap: usize) -> anyhow::Result<String> {
        let mut ctx = Context::new();
        ctx.insert("text", text);
        ctx.insert("word_cap", &word_cap);
        self.engine.render(SUMMARY_NAME, &ctx)
    }
}
