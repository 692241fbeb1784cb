//! Filtering participant decorator
//!
//! [`FilteredParticipant`] wraps another participant and narrows what it sees:
//! before every turn the transcript is passed through a [`MessageFilter`] and
//! only the surviving messages reach the inner participant. The inner
//! participant is invoked even when nothing survives; it decides on its own
//! how to answer with no context.
//!
//! Attribution of the produced messages is fixed at construction, see
//! [`Attribution`].

use crate::ports::participant::{Participant, TurnError};
use async_trait::async_trait;
use roundtable_domain::{FilterSpec, Message, MessageDraft, MessageFilter, SourceId};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which source the wrapper's output is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribution {
    /// Keep the inner participant's source (default)
    #[default]
    Inner,
    /// Re-tag every draft with the wrapper's name
    Wrapper,
}

/// Participant decorator applying a message filter
pub struct FilteredParticipant {
    name: SourceId,
    inner: Box<dyn Participant>,
    filter: MessageFilter,
    attribution: Attribution,
}

impl FilteredParticipant {
    /// Wrap `inner` under a new registration name.
    ///
    /// Output keeps the inner participant's source; use
    /// [`with_attribution`](Self::with_attribution) to change that.
    pub fn new(name: SourceId, inner: Box<dyn Participant>, spec: FilterSpec) -> Self {
        Self {
            name,
            inner,
            filter: MessageFilter::new(spec),
            attribution: Attribution::default(),
        }
    }

    pub fn with_attribution(mut self, attribution: Attribution) -> Self {
        self.attribution = attribution;
        self
    }

    pub fn attribution(&self) -> Attribution {
        self.attribution
    }

    pub fn inner(&self) -> &dyn Participant {
        self.inner.as_ref()
    }

    /// The context the inner participant would receive for `context`
    pub fn visible(&self, context: &[Message]) -> Vec<Message> {
        self.filter.visible(context)
    }
}

#[async_trait]
impl Participant for FilteredParticipant {
    fn name(&self) -> &SourceId {
        &self.name
    }

    fn output_source(&self) -> &SourceId {
        match self.attribution {
            Attribution::Inner => self.inner.output_source(),
            Attribution::Wrapper => &self.name,
        }
    }

    fn description(&self) -> &str {
        self.inner.description()
    }

    async fn take_turn(&self, context: &[Message]) -> Result<Vec<MessageDraft>, TurnError> {
        let visible = self.filter.visible(context);
        debug!(
            "{} sees {} of {} messages",
            self.name,
            visible.len(),
            context.len()
        );

        let drafts = self.inner.take_turn(&visible).await?;

        Ok(match self.attribution {
            Attribution::Inner => drafts,
            Attribution::Wrapper => drafts
                .into_iter()
                .map(|d| d.with_source(self.name.clone()))
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_domain::Transcript;
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<Vec<String>>>>;

    fn src(id: &str) -> SourceId {
        id.parse().unwrap()
    }

    /// Records every context it is given and answers with a fixed reply
    struct RecordingParticipant {
        name: SourceId,
        reply: String,
        seen: Seen,
    }

    impl RecordingParticipant {
        fn new(name: &str, reply: &str, seen: Seen) -> Self {
            Self {
                name: src(name),
                reply: reply.to_string(),
                seen,
            }
        }
    }

    #[async_trait]
    impl Participant for RecordingParticipant {
        fn name(&self) -> &SourceId {
            &self.name
        }

        fn description(&self) -> &str {
            "records its context"
        }

        async fn take_turn(&self, context: &[Message]) -> Result<Vec<MessageDraft>, TurnError> {
            self.seen
                .lock()
                .unwrap()
                .push(context.iter().map(|m| m.content().to_string()).collect());
            Ok(vec![MessageDraft::new(self.name.clone(), self.reply.clone())])
        }
    }

    struct FailingParticipant {
        name: SourceId,
    }

    #[async_trait]
    impl Participant for FailingParticipant {
        fn name(&self) -> &SourceId {
            &self.name
        }

        async fn take_turn(&self, _context: &[Message]) -> Result<Vec<MessageDraft>, TurnError> {
            Err(TurnError::Failed("model unavailable".to_string()))
        }
    }

    fn transcript() -> Transcript {
        let mut transcript = Transcript::new();
        transcript.append(MessageDraft::new(src("user"), "我叫张伟，今年18岁"));
        transcript.append(MessageDraft::new(src("name_agent"), "张伟"));
        transcript
    }

    fn filtered_age_agent(reply: &str) -> (FilteredParticipant, Seen) {
        let seen = Seen::default();
        let participant = FilteredParticipant::new(
            src("filter_age_agent"),
            Box::new(RecordingParticipant::new("age_agent", reply, seen.clone())),
            FilterSpec::latest_from([src("name_agent")]).unwrap(),
        );
        (participant, seen)
    }

    #[tokio::test]
    async fn test_inner_sees_only_filtered_context() {
        let (participant, seen) = filtered_age_agent("无法确定年龄");
        let drafts = participant.take_turn(transcript().messages()).await.unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![vec!["张伟".to_string()]]);
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].content, "无法确定年龄");
    }

    #[tokio::test]
    async fn test_inner_attribution_is_default() {
        let (participant, _) = filtered_age_agent("18");
        assert_eq!(participant.attribution(), Attribution::Inner);

        let drafts = participant.take_turn(transcript().messages()).await.unwrap();
        assert_eq!(drafts[0].source, "age_agent");
        assert_eq!(participant.name(), &src("filter_age_agent"));
        assert_eq!(participant.output_source(), &src("age_agent"));
    }

    #[tokio::test]
    async fn test_wrapper_attribution_retags() {
        let participant = filtered_age_agent("18").0.with_attribution(Attribution::Wrapper);
        let drafts = participant.take_turn(transcript().messages()).await.unwrap();
        assert_eq!(drafts[0].source, "filter_age_agent");
        assert_eq!(participant.output_source(), &src("filter_age_agent"));
    }

    #[tokio::test]
    async fn test_empty_visible_still_invokes_inner() {
        let (participant, seen) = filtered_age_agent("没有可用信息");
        let mut transcript = Transcript::new();
        transcript.append(MessageDraft::new(src("user"), "我叫张伟，今年18岁"));

        let drafts = participant.take_turn(transcript.messages()).await.unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![Vec::<String>::new()]);
        assert_eq!(drafts[0].content, "没有可用信息");
    }

    #[tokio::test]
    async fn test_inner_failure_propagates() {
        let participant = FilteredParticipant::new(
            src("filtered"),
            Box::new(FailingParticipant { name: src("inner") }),
            FilterSpec::latest_from([src("user")]).unwrap(),
        );
        let error = participant.take_turn(transcript().messages()).await.unwrap_err();
        assert!(matches!(error, TurnError::Failed(_)));
    }

    #[test]
    fn test_visible_and_description_delegate() {
        let (participant, seen) = filtered_age_agent("18");
        let visible = participant.visible(transcript().messages());
        assert_eq!(visible.len(), 1);
        assert_eq!(participant.description(), "records its context");
        assert!(seen.lock().unwrap().is_empty());
        assert_eq!(participant.inner().name(), &src("age_agent"));
    }
}
