//! Orchestration of one critique session.

use std::sync::Arc;

use critique_core::{
    CritiqueConfig, CritiqueFormat, GenerationOptions, IdentityDocument, IntakeRecord, Role,
};
use critique_gateway::{complete_or_failure_text, stream_or_report, GenerationGateway};
use critique_prompt::review::find_evaluative_terms;
use critique_prompt::{
    build_followup_prompt, build_intake_prompt, review_output, ComplianceReport,
    FOLLOWUP_HISTORY_TURNS,
};
use critique_session::ConversationContext;
use futures::stream::{BoxStream, StreamExt};

/// Runs structured critiques and follow-ups against a generation gateway.
///
/// The runner holds no session state of its own; every call takes the
/// caller's [`ConversationContext`], so one runner can serve many sessions.
pub struct CritiqueRunner<G> {
    identity: Arc<IdentityDocument>,
    gateway: G,
    model: String,
    options: GenerationOptions,
    format: CritiqueFormat,
}

impl<G: GenerationGateway> CritiqueRunner<G> {
    pub fn new(identity: Arc<IdentityDocument>, gateway: G, config: &CritiqueConfig) -> Self {
        Self {
            identity,
            gateway,
            model: config.model.clone(),
            options: config.generation_options(),
            format: config.schema,
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Generate one structured critique and record it in the session.
    ///
    /// Always returns text: a failed generation yields the failure message,
    /// which is recorded like any other result.
    pub async fn critique(&self, ctx: &mut ConversationContext, intake: IntakeRecord) -> String {
        let prompt = build_intake_prompt(&self.identity, &intake, self.format);
        tracing::info!(
            session_id = %ctx.id(),
            stage = %intake.stage,
            model = %self.model,
            prompt_chars = prompt.len(),
            "Generating critique"
        );

        let outcome =
            complete_or_failure_text(&self.gateway, &prompt, &self.model, &self.options).await;
        if let Some(report) = self.review(&outcome).filter(|r| !r.is_compliant()) {
            tracing::warn!(
                session_id = %ctx.id(),
                missing = ?report.missing_headings,
                repeated = ?report.repeated_headings,
                evaluative = ?report.evaluative_terms,
                "Critique deviates from the output schema"
            );
        }
        let result = outcome.unwrap_or_else(|failure| failure);

        ctx.record_result(intake, result.clone());
        result
    }

    /// Schema findings for a generated critique. Failure text is not reviewed.
    fn review(&self, outcome: &std::result::Result<String, String>) -> Option<ComplianceReport> {
        let text = outcome.as_ref().ok()?;
        Some(review_output(self.format, text))
    }

    /// Start a follow-up reply as a stream of fragments.
    ///
    /// The user's message is appended to the turn log before the prompt is
    /// built, so it appears in the history window as well. The caller is
    /// responsible for appending the assistant turn once the stream ends;
    /// [`follow_up`](Self::follow_up) does both.
    pub async fn follow_up_stream(
        &self,
        ctx: &mut ConversationContext,
        message: &str,
    ) -> BoxStream<'static, String> {
        ctx.append_turn(Role::User, message);

        let prompt = build_followup_prompt(
            &self.identity,
            ctx.recent_window(FOLLOWUP_HISTORY_TURNS),
            ctx.last_intake(),
            ctx.last_result(),
            message,
        );
        tracing::info!(
            session_id = %ctx.id(),
            turns = ctx.turns().len(),
            grounded = ctx.last_result().is_some(),
            prompt_chars = prompt.len(),
            "Generating follow-up"
        );

        stream_or_report(&self.gateway, &prompt, &self.model, &self.options).await
    }

    /// Answer a follow-up message, passing each fragment to `on_fragment`
    /// as it arrives. The full reply is appended as an assistant turn and returned.
    pub async fn follow_up<F>(
        &self,
        ctx: &mut ConversationContext,
        message: &str,
        mut on_fragment: F,
    ) -> String
    where
        F: FnMut(&str),
    {
        let mut fragments = self.follow_up_stream(ctx, message).await;

        let mut reply = String::new();
        while let Some(fragment) = fragments.next().await {
            on_fragment(&fragment);
            reply.push_str(&fragment);
        }

        let evaluative = find_evaluative_terms(&reply);
        if !evaluative.is_empty() {
            tracing::warn!(
                session_id = %ctx.id(),
                terms = ?evaluative,
                "Follow-up uses evaluative language"
            );
        }

        ctx.append_turn(Role::Assistant, reply.clone());
        reply
    }
}
