//! Round-robin group chat use case
//!
//! [`RoundRobinCoordinator`] owns the transcript of one conversation and
//! hands out turns to its participants in registration order, wrapping
//! around after the last one. After every turn the termination condition is
//! evaluated; the configured step bound ends the run otherwise.
//!
//! Turns are strictly sequential: the coordinator awaits each participant to
//! completion before moving the cursor, and only the coordinator appends to
//! the transcript.

use crate::config::CoordinatorConfig;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::participant::{Participant, TurnError};
use crate::ports::progress::{ChatProgressNotifier, NoProgress};
use roundtable_domain::{
    ConfigError, CoordinatorState, Message, MessageDraft, RunOutcome, RunStatus, SourceId,
    TerminationCondition, TerminationContext, Transcript,
};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Errors that can occur while coordinating a run
#[derive(Error, Debug)]
pub enum CoordinatorError {
    #[error("Participant '{participant}' failed: {source}")]
    ParticipantFailed {
        participant: SourceId,
        #[source]
        source: TurnError,
    },

    #[error("Run has not started")]
    NotStarted,

    #[error("Run already started; reset the coordinator first")]
    AlreadyStarted,

    #[error("Coordinator is terminated; reset it before running again")]
    AlreadyTerminated,

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),
}

impl CoordinatorError {
    /// The participant whose turn failed, if any
    pub fn participant(&self) -> Option<&SourceId> {
        match self {
            CoordinatorError::ParticipantFailed { participant, .. } => Some(participant),
            _ => None,
        }
    }
}

/// Result of a single [`RoundRobinCoordinator::step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// More turns will follow
    Continue,
    /// The run reached a terminal status
    Finished(RunStatus),
}

/// Cycles turns across participants over a shared transcript
pub struct RoundRobinCoordinator {
    participants: Vec<Box<dyn Participant>>,
    termination: TerminationCondition,
    config: CoordinatorConfig,
    progress: Arc<dyn ChatProgressNotifier>,
    logger: Arc<dyn ConversationLogger>,
    cancellation: CancellationToken,
    transcript: Transcript,
    state: CoordinatorState,
    status: Option<RunStatus>,
    task_len: usize,
    steps: usize,
    started_at: Option<Instant>,
    elapsed_at_finish: Duration,
}

impl RoundRobinCoordinator {
    /// Register participants in turn order.
    ///
    /// Fails when the roster is empty or two participants share a name.
    /// Registration names and output sources share one namespace, so a
    /// filtered wrapper cannot speak as another registered participant.
    pub fn new(
        participants: Vec<Box<dyn Participant>>,
        termination: TerminationCondition,
    ) -> Result<Self, ConfigError> {
        if participants.is_empty() {
            return Err(ConfigError::NoParticipants);
        }

        let mut names = HashSet::new();
        for participant in &participants {
            let mut claimed = vec![participant.name()];
            if participant.output_source() != participant.name() {
                claimed.push(participant.output_source());
            }
            for name in claimed {
                if !names.insert(name) {
                    return Err(ConfigError::DuplicateParticipant(name.to_string()));
                }
            }
        }

        Ok(Self {
            participants,
            termination,
            config: CoordinatorConfig::default(),
            progress: Arc::new(NoProgress),
            logger: Arc::new(NoConversationLogger),
            cancellation: CancellationToken::new(),
            transcript: Transcript::new(),
            state: CoordinatorState::initial(),
            status: None,
            task_len: 0,
            steps: 0,
            started_at: None,
            elapsed_at_finish: Duration::ZERO,
        })
    }

    // ==================== Builder Methods ====================

    pub fn with_config(mut self, config: CoordinatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn with_max_steps(self, max_steps: usize) -> Result<Self, ConfigError> {
        let config = self.config.clone().with_max_steps(max_steps);
        self.with_config(config)
    }

    pub fn with_turn_timeout(mut self, timeout: Duration) -> Self {
        self.config.turn_timeout = Some(timeout);
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ChatProgressNotifier>) -> Self {
        self.progress = progress;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Cancellation is checked between turns, never during one.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    // ==================== Accessors ====================

    pub fn state(&self) -> CoordinatorState {
        self.state
    }

    /// The transcript so far; preserved after a failed turn
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn status(&self) -> Option<&RunStatus> {
        self.status.as_ref()
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    pub fn termination(&self) -> &TerminationCondition {
        &self.termination
    }

    pub fn participant_names(&self) -> Vec<SourceId> {
        self.participants.iter().map(|p| p.name().clone()).collect()
    }

    /// Snapshot of a finished run; `None` while running or after a failure
    pub fn outcome(&self) -> Option<RunOutcome> {
        self.status.clone().map(|status| self.build_outcome(status))
    }

    // ==================== Lifecycle ====================

    /// Build a task message attributed to the configured task source
    pub fn task_message(&self, content: impl Into<String>) -> MessageDraft {
        MessageDraft::new(self.config.task_source.clone(), content)
    }

    /// Run a conversation for a single text task
    pub async fn run_task(
        &mut self,
        content: impl Into<String>,
    ) -> Result<RunOutcome, CoordinatorError> {
        let task = self.task_message(content);
        self.run([task]).await
    }

    /// Append the task and take turns until the run reaches a terminal status.
    ///
    /// A participant failure halts the run with an error; the partial
    /// transcript stays available through [`transcript`](Self::transcript).
    pub async fn run(
        &mut self,
        task: impl IntoIterator<Item = MessageDraft>,
    ) -> Result<RunOutcome, CoordinatorError> {
        self.begin(task)?;
        loop {
            if let Some(status) = &self.status {
                return Ok(self.build_outcome(status.clone()));
            }
            self.step().await?;
        }
    }

    /// Append the task messages and start the clock.
    ///
    /// The termination condition is checked once here without consuming a
    /// step, so a task that already satisfies it ends the run immediately.
    pub fn begin(
        &mut self,
        task: impl IntoIterator<Item = MessageDraft>,
    ) -> Result<(), CoordinatorError> {
        if self.state.is_terminated() {
            return Err(CoordinatorError::AlreadyTerminated);
        }
        if self.started_at.is_some() {
            return Err(CoordinatorError::AlreadyStarted);
        }

        self.started_at = Some(Instant::now());
        let names = self.participant_names();
        info!(
            "Starting round-robin run with {} participants (max {} steps, stop on {})",
            names.len(),
            self.config.max_steps,
            self.termination
        );
        self.progress.on_run_start(&names);

        let appended = self.transcript.append_all(task);
        for message in appended {
            self.progress.on_message(message);
        }
        self.task_len = self.transcript.len();

        self.logger.log(ConversationEvent::new(
            "run_started",
            json!({
                "participants": names.iter().map(|n| n.as_str()).collect::<Vec<_>>(),
                "termination": self.termination.to_string(),
                "max_steps": self.config.max_steps,
                "task": self.transcript.messages(),
            }),
        ));

        if let Some(reason) = self.check_termination() {
            info!("Task already satisfies the termination condition: {}", reason);
            self.finish(RunStatus::Completed { reason });
        }
        Ok(())
    }

    /// Take exactly one turn.
    pub async fn step(&mut self) -> Result<StepOutcome, CoordinatorError> {
        if self.started_at.is_none() {
            return Err(CoordinatorError::NotStarted);
        }
        let cursor = match self.state {
            CoordinatorState::Running { cursor } => cursor,
            CoordinatorState::Terminated => return Err(CoordinatorError::AlreadyTerminated),
        };

        if self.cancellation.is_cancelled() {
            info!("Run cancelled before turn {}", self.steps + 1);
            return Ok(self.finish(RunStatus::Cancelled));
        }

        let step = self.steps + 1;
        let participant = self.participants[cursor].as_ref();
        let name = participant.name().clone();
        debug!("Turn {}: {}", step, name);
        self.progress.on_turn_start(&name, step);

        let result = Self::invoke(
            participant,
            self.transcript.messages(),
            self.config.turn_timeout,
        )
        .await;

        let drafts = match result {
            Ok(drafts) => drafts,
            Err(error) => {
                warn!("Participant {} failed on turn {}: {}", name, step, error);
                self.progress.on_turn_failed(&name, &error);
                self.logger.log(ConversationEvent::new(
                    "turn_failed",
                    json!({
                        "participant": name.as_str(),
                        "step": step,
                        "error": error.to_string(),
                    }),
                ));
                self.state = CoordinatorState::Terminated;
                return Err(CoordinatorError::ParticipantFailed {
                    participant: name,
                    source: error,
                });
            }
        };

        self.steps = step;
        let appended = self.transcript.append_all(drafts);
        let produced = appended.len();
        for message in appended {
            self.progress.on_message(message);
            self.logger.log(Self::message_event(message));
        }
        self.progress.on_turn_complete(&name, step, produced);
        self.state = self.state.advance(self.participants.len());

        if let Some(reason) = self.check_termination() {
            info!("Run completed after {} turns: {}", step, reason);
            return Ok(self.finish(RunStatus::Completed { reason }));
        }
        if self.steps >= self.config.max_steps {
            info!(
                "Step bound of {} reached without meeting the termination condition",
                self.config.max_steps
            );
            return Ok(self.finish(RunStatus::TerminationNotReached { steps: self.steps }));
        }
        Ok(StepOutcome::Continue)
    }

    /// Discard the transcript and return to the initial state
    pub fn reset(&mut self) {
        debug!("Resetting coordinator");
        self.transcript = Transcript::new();
        self.state = CoordinatorState::initial();
        self.status = None;
        self.task_len = 0;
        self.steps = 0;
        self.started_at = None;
        self.elapsed_at_finish = Duration::ZERO;
    }

    // ==================== Internal ====================

    async fn invoke(
        participant: &dyn Participant,
        context: &[Message],
        timeout: Option<Duration>,
    ) -> Result<Vec<MessageDraft>, TurnError> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, participant.take_turn(context))
                .await
                .unwrap_or(Err(TurnError::TimedOut(limit))),
            None => participant.take_turn(context).await,
        }
    }

    fn check_termination(&self) -> Option<String> {
        let ctx = TerminationContext::new(&self.transcript)
            .with_turns_taken(self.steps)
            .with_elapsed(self.elapsed());
        self.termination.check(&ctx)
    }

    fn elapsed(&self) -> Duration {
        self.started_at
            .map(|started| started.elapsed())
            .unwrap_or_default()
    }

    fn finish(&mut self, status: RunStatus) -> StepOutcome {
        self.state = CoordinatorState::Terminated;
        self.elapsed_at_finish = self.elapsed();
        self.progress.on_run_complete(&status);
        self.logger.log(ConversationEvent::new(
            "run_finished",
            json!({
                "status": &status,
                "steps": self.steps,
                "messages": self.transcript.len(),
                "elapsed_ms": self.elapsed_at_finish.as_millis() as u64,
            }),
        ));
        self.status = Some(status.clone());
        StepOutcome::Finished(status)
    }

    fn build_outcome(&self, status: RunStatus) -> RunOutcome {
        RunOutcome {
            status,
            transcript: self.transcript.clone(),
            task_len: self.task_len,
            steps: self.steps,
            elapsed_ms: self.elapsed_at_finish.as_millis() as u64,
        }
    }

    fn message_event(message: &Message) -> ConversationEvent {
        ConversationEvent::new(
            "message",
            json!({
                "source": message.source().as_str(),
                "sequence": message.sequence_number(),
                "content": message.content(),
            }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::participants::{Attribution, FilteredParticipant};
    use crate::ports::conversation_logger::ConversationEvent;
    use async_trait::async_trait;
    use roundtable_domain::FilterSpec;
    use std::sync::Mutex;

    fn src(id: &str) -> SourceId {
        id.parse().unwrap()
    }

    type Log = Arc<Mutex<Vec<String>>>;

    /// Answers with a fixed reply and records its turns in a shared log
    struct MockParticipant {
        name: SourceId,
        replies: Vec<String>,
        log: Log,
        contexts: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl MockParticipant {
        fn new(name: &str, replies: &[&str], log: &Log) -> Self {
            Self {
                name: src(name),
                replies: replies.iter().map(|r| r.to_string()).collect(),
                log: log.clone(),
                contexts: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl Participant for MockParticipant {
        fn name(&self) -> &SourceId {
            &self.name
        }

        async fn take_turn(&self, context: &[Message]) -> Result<Vec<MessageDraft>, TurnError> {
            self.log.lock().unwrap().push(self.name.to_string());
            self.contexts
                .lock()
                .unwrap()
                .push(context.iter().map(|m| m.content().to_string()).collect());
            Ok(self
                .replies
                .iter()
                .map(|r| MessageDraft::new(self.name.clone(), r.clone()))
                .collect())
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
            Err(TurnError::Failed("connection reset".to_string()))
        }
    }

    struct SlowParticipant {
        name: SourceId,
        delay: Duration,
    }

    #[async_trait]
    impl Participant for SlowParticipant {
        fn name(&self) -> &SourceId {
            &self.name
        }

        async fn take_turn(&self, _context: &[Message]) -> Result<Vec<MessageDraft>, TurnError> {
            tokio::time::sleep(self.delay).await;
            Ok(vec![MessageDraft::new(self.name.clone(), "late")])
        }
    }

    #[derive(Default)]
    struct RecordingProgress {
        events: Mutex<Vec<String>>,
    }

    impl ChatProgressNotifier for RecordingProgress {
        fn on_run_start(&self, participants: &[SourceId]) {
            self.events
                .lock()
                .unwrap()
                .push(format!("start:{}", participants.len()));
        }

        fn on_turn_start(&self, participant: &SourceId, step: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("turn:{}:{}", step, participant));
        }

        fn on_message(&self, message: &Message) {
            self.events
                .lock()
                .unwrap()
                .push(format!("message:{}", message.source()));
        }

        fn on_turn_complete(&self, participant: &SourceId, _step: usize, produced: usize) {
            self.events
                .lock()
                .unwrap()
                .push(format!("done:{}:{}", participant, produced));
        }

        fn on_turn_failed(&self, participant: &SourceId, _error: &TurnError) {
            self.events
                .lock()
                .unwrap()
                .push(format!("failed:{}", participant));
        }

        fn on_run_complete(&self, status: &RunStatus) {
            self.events
                .lock()
                .unwrap()
                .push(format!("end:{}", status.is_completed()));
        }
    }

    #[derive(Default)]
    struct RecordingLogger {
        events: Mutex<Vec<(&'static str, serde_json::Value)>>,
    }

    impl ConversationLogger for RecordingLogger {
        fn log(&self, event: ConversationEvent) {
            self.events
                .lock()
                .unwrap()
                .push((event.event_type, event.payload));
        }
    }

    fn three_participants(log: &Log) -> Vec<Box<dyn Participant>> {
        vec![
            Box::new(MockParticipant::new("a", &["from a"], log)),
            Box::new(MockParticipant::new("b", &["from b"], log)),
            Box::new(MockParticipant::new("c", &["from c"], log)),
        ]
    }

    #[tokio::test]
    async fn test_visits_participants_in_registration_order() {
        let log = Log::default();
        let mut coordinator =
            RoundRobinCoordinator::new(three_participants(&log), TerminationCondition::never())
                .unwrap()
                .with_max_steps(7)
                .unwrap();

        let outcome = coordinator.run_task("go").await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            vec!["a", "b", "c", "a", "b", "c", "a"]
        );
        assert_eq!(outcome.steps, 7);
        assert_eq!(coordinator.state(), CoordinatorState::Terminated);
    }

    #[tokio::test]
    async fn test_filtered_age_agent_sees_only_name() {
        let log = Log::default();
        let name_agent = MockParticipant::new("name_agent", &["张伟"], &log);
        let age_agent = MockParticipant::new("age_agent", &["无法确定年龄"], &log);
        let age_contexts = age_agent.contexts.clone();

        let filtered = FilteredParticipant::new(
            src("filter_age_agent"),
            Box::new(age_agent),
            FilterSpec::latest_from([src("name_agent")]).unwrap(),
        );

        let mut coordinator = RoundRobinCoordinator::new(
            vec![Box::new(name_agent), Box::new(filtered)],
            TerminationCondition::source_match([src("age_agent")]),
        )
        .unwrap();

        let outcome = coordinator.run_task("我叫张伟，今年18岁").await.unwrap();

        assert_eq!(*age_contexts.lock().unwrap(), vec![vec!["张伟".to_string()]]);
        assert_eq!(
            outcome.status,
            RunStatus::Completed {
                reason: "'age_agent' answered".to_string()
            }
        );
        let sources: Vec<&str> = outcome
            .transcript
            .iter()
            .map(|m| m.source().as_str())
            .collect();
        assert_eq!(sources, vec!["user", "name_agent", "age_agent"]);
        assert_eq!(outcome.final_reply().unwrap().content(), "无法确定年龄");
    }

    #[tokio::test]
    async fn test_step_bound_reports_termination_not_reached() {
        let log = Log::default();
        let mut coordinator = RoundRobinCoordinator::new(
            vec![
                Box::new(MockParticipant::new("primary", &["draft"], &log)),
                Box::new(MockParticipant::new("critic", &["try again"], &log)),
            ],
            TerminationCondition::text_mention("APPROVE"),
        )
        .unwrap();

        let outcome = coordinator.run_task("请用 yoda 风格说一句关于学习的名言。").await.unwrap();

        assert_eq!(outcome.status, RunStatus::TerminationNotReached { steps: 10 });
        assert_eq!(outcome.steps, 10);
        assert_eq!(outcome.transcript.len(), 11);
        assert_eq!(outcome.replies().len(), 10);
    }

    #[tokio::test]
    async fn test_turns_without_messages_still_count() {
        let log = Log::default();
        let mut coordinator = RoundRobinCoordinator::new(
            vec![Box::new(MockParticipant::new("silent", &[], &log))],
            TerminationCondition::MaxTurns(3),
        )
        .unwrap();

        let outcome = coordinator.run_task("anyone?").await.unwrap();
        assert!(outcome.status.is_completed());
        assert_eq!(outcome.steps, 3);
        assert_eq!(outcome.transcript.len(), 1);
    }

    #[tokio::test]
    async fn test_task_can_satisfy_termination() {
        let log = Log::default();
        let mut coordinator =
            RoundRobinCoordinator::new(three_participants(&log), TerminationCondition::MaxMessages(1))
                .unwrap();

        let outcome = coordinator.run_task("stop right away").await.unwrap();
        assert_eq!(outcome.steps, 0);
        assert!(log.lock().unwrap().is_empty());
        assert!(outcome.status.is_completed());
    }

    #[tokio::test]
    async fn test_task_mentioning_stop_text_ends_before_first_turn() {
        let log = Log::default();
        let mut coordinator = RoundRobinCoordinator::new(
            three_participants(&log),
            TerminationCondition::text_mention("APPROVE"),
        )
        .unwrap();

        let outcome = coordinator.run_task("say APPROVE").await.unwrap();
        assert_eq!(
            outcome.status,
            RunStatus::Completed {
                reason: "Text 'APPROVE' mentioned by user".to_string()
            }
        );
        assert_eq!(outcome.steps, 0);
        assert_eq!(outcome.transcript.len(), 1);
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_participant_failure_halts_run_and_keeps_transcript() {
        let log = Log::default();
        let mut coordinator = RoundRobinCoordinator::new(
            vec![
                Box::new(MockParticipant::new("a", &["one", "two"], &log)),
                Box::new(FailingParticipant { name: src("broken") }),
                Box::new(MockParticipant::new("c", &["never"], &log)),
            ],
            TerminationCondition::never(),
        )
        .unwrap();

        let error = coordinator.run_task("task").await.unwrap_err();

        assert_eq!(error.participant(), Some(&src("broken")));
        assert!(matches!(
            error,
            CoordinatorError::ParticipantFailed {
                source: TurnError::Failed(_),
                ..
            }
        ));
        assert_eq!(coordinator.state(), CoordinatorState::Terminated);
        assert_eq!(coordinator.transcript().len(), 3);
        assert_eq!(coordinator.steps(), 1);
        assert!(coordinator.outcome().is_none());
        assert_eq!(*log.lock().unwrap(), vec!["a"]);

        assert!(matches!(
            coordinator.step().await,
            Err(CoordinatorError::AlreadyTerminated)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_turn_timeout_is_a_failure() {
        let mut coordinator = RoundRobinCoordinator::new(
            vec![Box::new(SlowParticipant {
                name: src("slow"),
                delay: Duration::from_secs(120),
            })],
            TerminationCondition::never(),
        )
        .unwrap()
        .with_turn_timeout(Duration::from_secs(30));

        let error = coordinator.run_task("task").await.unwrap_err();
        match error {
            CoordinatorError::ParticipantFailed { participant, source } => {
                assert_eq!(participant, "slow");
                assert!(source.is_timeout());
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(coordinator.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_cancellation_between_turns() {
        let log = Log::default();
        let token = CancellationToken::new();
        let mut coordinator =
            RoundRobinCoordinator::new(three_participants(&log), TerminationCondition::never())
                .unwrap()
                .with_cancellation(token.clone());

        coordinator.begin([coordinator.task_message("task")]).unwrap();
        assert_eq!(coordinator.step().await.unwrap(), StepOutcome::Continue);

        token.cancel();
        assert_eq!(
            coordinator.step().await.unwrap(),
            StepOutcome::Finished(RunStatus::Cancelled)
        );
        assert_eq!(coordinator.steps(), 1);
        assert_eq!(coordinator.outcome().unwrap().status, RunStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_lifecycle_errors_and_reset() {
        let log = Log::default();
        let mut coordinator =
            RoundRobinCoordinator::new(three_participants(&log), TerminationCondition::MaxTurns(2))
                .unwrap();

        assert!(matches!(
            coordinator.step().await,
            Err(CoordinatorError::NotStarted)
        ));

        coordinator.begin([coordinator.task_message("first")]).unwrap();
        assert!(matches!(
            coordinator.begin([coordinator.task_message("again")]),
            Err(CoordinatorError::AlreadyStarted)
        ));

        while coordinator.status().is_none() {
            coordinator.step().await.unwrap();
        }
        assert!(matches!(
            coordinator.run_task("third").await,
            Err(CoordinatorError::AlreadyTerminated)
        ));

        coordinator.reset();
        assert_eq!(coordinator.state(), CoordinatorState::initial());
        assert!(coordinator.transcript().is_empty());

        let outcome = coordinator.run_task("fresh").await.unwrap();
        assert_eq!(outcome.transcript.messages()[0].content(), "fresh");
        assert_eq!(outcome.steps, 2);
        assert_eq!(*log.lock().unwrap(), vec!["a", "b", "a", "b"]);
    }

    #[test]
    fn test_roster_validation() {
        let log = Log::default();
        assert_eq!(
            RoundRobinCoordinator::new(Vec::new(), TerminationCondition::never()).err(),
            Some(ConfigError::NoParticipants)
        );

        let duplicated: Vec<Box<dyn Participant>> = vec![
            Box::new(MockParticipant::new("a", &["x"], &log)),
            Box::new(MockParticipant::new("a", &["y"], &log)),
        ];
        assert_eq!(
            RoundRobinCoordinator::new(duplicated, TerminationCondition::never()).err(),
            Some(ConfigError::DuplicateParticipant("a".to_string()))
        );

        let impersonating: Vec<Box<dyn Participant>> = vec![
            Box::new(MockParticipant::new("a", &["x"], &log)),
            Box::new(FilteredParticipant::new(
                src("filter_a"),
                Box::new(MockParticipant::new("a", &["y"], &log)),
                FilterSpec::latest_from([src("user")]).unwrap(),
            )),
        ];
        assert_eq!(
            RoundRobinCoordinator::new(impersonating, TerminationCondition::never()).err(),
            Some(ConfigError::DuplicateParticipant("a".to_string()))
        );

        let retagged: Vec<Box<dyn Participant>> = vec![
            Box::new(MockParticipant::new("a", &["x"], &log)),
            Box::new(
                FilteredParticipant::new(
                    src("filter_a"),
                    Box::new(MockParticipant::new("a", &["y"], &log)),
                    FilterSpec::latest_from([src("user")]).unwrap(),
                )
                .with_attribution(Attribution::Wrapper),
            ),
        ];
        assert!(RoundRobinCoordinator::new(retagged, TerminationCondition::never()).is_ok());

        let coordinator =
            RoundRobinCoordinator::new(three_participants(&log), TerminationCondition::never())
                .unwrap();
        assert_eq!(
            coordinator.with_max_steps(0).err(),
            Some(ConfigError::InvalidMaxSteps)
        );
    }

    #[tokio::test]
    async fn test_progress_and_logger_receive_events() {
        let log = Log::default();
        let progress = Arc::new(RecordingProgress::default());
        let logger = Arc::new(RecordingLogger::default());

        let mut coordinator = RoundRobinCoordinator::new(
            vec![
                Box::new(MockParticipant::new("a", &["hello"], &log)),
                Box::new(MockParticipant::new("b", &["bye"], &log)),
            ],
            TerminationCondition::source_match([src("b")]),
        )
        .unwrap()
        .with_progress(progress.clone())
        .with_logger(logger.clone());

        coordinator.run_task("task").await.unwrap();

        assert_eq!(
            *progress.events.lock().unwrap(),
            vec![
                "start:2",
                "message:user",
                "turn:1:a",
                "message:a",
                "done:a:1",
                "turn:2:b",
                "message:b",
                "done:b:1",
                "end:true",
            ]
        );

        let events = logger.events.lock().unwrap();
        let types: Vec<&str> = events.iter().map(|(t, _)| *t).collect();
        assert_eq!(types, vec!["run_started", "message", "message", "run_finished"]);
        assert_eq!(events[0].1["participants"], json!(["a", "b"]));
        assert_eq!(events[1].1["content"], "hello");
        assert_eq!(events[3].1["status"]["status"], "completed");
    }
}
