//! Interview orchestration service
//!
//! Walks each capability's fixed priority list over the availability-gated
//! candidate set, attempts providers in order, trips the single-strike
//! breaker on failure, records usage on success, and degrades to the
//! deterministic fallback content where one is defined.

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use domain::{
    Capability, Codename, DomainError, FALLBACK_MODEL, ResponseEvaluation, fallback_evaluation,
    fallback_question,
};
use tracing::{debug, info, instrument, warn};

use crate::context::InterviewContext;
use crate::error::ApplicationError;
use crate::ports::{
    CreditStorePort, EvaluationPort, QuestionGeneratorPort, SpeechSynthesisPort, TranscriptionPort,
};
use crate::services::UsageTracker;

/// A generated question together with how it was produced
#[derive(Debug, Clone)]
pub struct QuestionOutcome {
    /// The question text
    pub question: String,
    /// Codename of the provider that served it, or `"Fallback"`
    pub used_model: String,
    /// Whether the question came from the canned fallback list
    pub fallback: bool,
    /// Evaluation of the previous answer, when one was submitted alongside
    pub evaluation: Option<ResponseEvaluation>,
}

/// Result of a speech synthesis request
#[derive(Debug, Clone)]
pub enum SpeechOutcome {
    /// A provider produced audio
    Synthesized {
        /// URL or data URL of the audio
        audio_url: String,
        /// Codename of the provider that served it
        used_model: String,
    },
    /// No provider could synthesize; the client should use browser-side TTS
    BrowserFallback,
}

/// Result of a transcription request
#[derive(Debug, Clone)]
pub struct TranscriptOutcome {
    /// The transcribed text
    pub transcript: String,
    /// Codename of the provider that served it
    pub used_model: String,
}

/// A response evaluation together with how it was produced
#[derive(Debug, Clone)]
pub struct EvaluationOutcome {
    /// The scores and feedback
    pub evaluation: ResponseEvaluation,
    /// Codename of the provider that served it, or `"Fallback"`
    pub used_model: String,
    /// Whether the fixed fallback evaluation was served
    pub fallback: bool,
}

/// One row of the model status report
#[derive(Debug, Clone)]
pub struct ModelStatusEntry {
    /// Provider codename
    pub codename: Codename,
    /// Human-readable provider name
    pub name: String,
    /// Whether the provider is currently eligible
    pub credit_status: bool,
    /// Requests made in the current daily window
    pub daily_usage: u64,
    /// Tokens used in the current monthly window
    pub monthly_usage: u64,
    /// Daily request limit
    pub daily_limit: u64,
    /// Monthly token limit
    pub monthly_limit: u64,
}

/// The registered provider adapters, looked up by codename.
///
/// Registration order is irrelevant; routing order always comes from
/// [`Capability::candidates`].
#[derive(Default)]
pub struct ProviderRoster {
    question: Vec<Arc<dyn QuestionGeneratorPort>>,
    synthesis: Vec<Arc<dyn SpeechSynthesisPort>>,
    transcription: Vec<Arc<dyn TranscriptionPort>>,
    evaluation: Vec<Arc<dyn EvaluationPort>>,
}

impl ProviderRoster {
    /// Empty roster
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a question generation adapter
    #[must_use]
    pub fn with_question_generator(mut self, adapter: Arc<dyn QuestionGeneratorPort>) -> Self {
        self.question.push(adapter);
        self
    }

    /// Register a speech synthesis adapter
    #[must_use]
    pub fn with_speech_synthesizer(mut self, adapter: Arc<dyn SpeechSynthesisPort>) -> Self {
        self.synthesis.push(adapter);
        self
    }

    /// Register a transcription adapter
    #[must_use]
    pub fn with_transcriber(mut self, adapter: Arc<dyn TranscriptionPort>) -> Self {
        self.transcription.push(adapter);
        self
    }

    /// Register an evaluation adapter
    #[must_use]
    pub fn with_evaluator(mut self, adapter: Arc<dyn EvaluationPort>) -> Self {
        self.evaluation.push(adapter);
        self
    }

    fn question_generator(&self, codename: Codename) -> Option<&Arc<dyn QuestionGeneratorPort>> {
        self.question.iter().find(|a| a.codename() == codename)
    }

    fn speech_synthesizer(&self, codename: Codename) -> Option<&Arc<dyn SpeechSynthesisPort>> {
        self.synthesis.iter().find(|a| a.codename() == codename)
    }

    fn transcriber(&self, codename: Codename) -> Option<&Arc<dyn TranscriptionPort>> {
        self.transcription.iter().find(|a| a.codename() == codename)
    }

    fn evaluator(&self, codename: Codename) -> Option<&Arc<dyn EvaluationPort>> {
        self.evaluation.iter().find(|a| a.codename() == codename)
    }
}

/// Routes interview requests across the provider adapters
pub struct InterviewOrchestrator {
    store: Arc<dyn CreditStorePort>,
    roster: ProviderRoster,
    tracker: UsageTracker,
}

impl InterviewOrchestrator {
    /// Create an orchestrator over the given store and adapters
    #[must_use]
    pub fn new(store: Arc<dyn CreditStorePort>, roster: ProviderRoster) -> Self {
        let tracker = UsageTracker::new(store.clone());
        Self {
            store,
            roster,
            tracker,
        }
    }

    /// Generate the next interview question.
    ///
    /// Degrades to the canned question list when no provider is eligible or
    /// every eligible provider failed. When the context carries the answer to
    /// the previous question, an evaluation is attached opportunistically;
    /// its failure never fails the question.
    #[instrument(skip(self, context), fields(session = %context.session()))]
    pub async fn generate_question(
        &self,
        context: &InterviewContext,
    ) -> Result<QuestionOutcome, ApplicationError> {
        let mut outcome = match self.attempt_generation(context).await {
            Ok(outcome) => outcome,
            Err(err) if err.is_degradable() => {
                warn!(error = %err, "serving fallback question");
                QuestionOutcome {
                    question: fallback_question(context.question_number_or_first()).to_string(),
                    used_model: FALLBACK_MODEL.to_string(),
                    fallback: true,
                    evaluation: None,
                }
            }
            Err(err) => return Err(err),
        };

        if context.user_response.is_some() {
            match self.evaluate_response(context).await {
                Ok(eval) => outcome.evaluation = Some(eval.evaluation),
                Err(err) => warn!(error = %err, "opportunistic evaluation failed"),
            }
        }

        Ok(outcome)
    }

    /// Synthesize speech for the context's text.
    ///
    /// Never hard-fails on provider trouble; the defined degradation is
    /// browser-side synthesis on the client.
    #[instrument(skip(self, context))]
    pub async fn generate_speech(
        &self,
        context: &InterviewContext,
    ) -> Result<SpeechOutcome, ApplicationError> {
        let text = context.text.as_deref().ok_or_else(|| {
            DomainError::InvalidContext("text is required for speech synthesis".to_string())
        })?;

        match self
            .attempt_synthesis(context, text, context.voice.as_deref())
            .await
        {
            Ok(outcome) => Ok(outcome),
            Err(err) if err.is_degradable() => {
                warn!(error = %err, "deferring to browser synthesis");
                Ok(SpeechOutcome::BrowserFallback)
            }
            Err(err) => Err(err),
        }
    }

    /// Transcribe the context's base64 audio.
    ///
    /// Transcription has no fallback; unavailability surfaces to the caller.
    /// The payload is decoded before any candidate is selected, so a bad
    /// request is rejected per-request and never counts against a provider.
    #[instrument(skip(self, context), fields(session = %context.session()))]
    pub async fn transcribe_audio(
        &self,
        context: &InterviewContext,
    ) -> Result<TranscriptOutcome, ApplicationError> {
        let audio = context.audio.as_deref().ok_or_else(|| {
            DomainError::InvalidContext("audio is required for transcription".to_string())
        })?;
        let audio = decode_audio(audio)?;
        self.attempt_transcription(&audio, context).await
    }

    /// Evaluate the candidate response carried in the context.
    ///
    /// Degrades to the fixed fallback evaluation; only store failures
    /// propagate.
    #[instrument(skip(self, context), fields(session = %context.session()))]
    pub async fn evaluate_response(
        &self,
        context: &InterviewContext,
    ) -> Result<EvaluationOutcome, ApplicationError> {
        match self.attempt_evaluation(context).await {
            Ok(outcome) => Ok(outcome),
            Err(err) if err.is_degradable() => {
                warn!(error = %err, "serving fallback evaluation");
                Ok(EvaluationOutcome {
                    evaluation: fallback_evaluation(),
                    used_model: FALLBACK_MODEL.to_string(),
                    fallback: true,
                })
            }
            Err(err) => Err(err),
        }
    }

    /// Current eligibility of every provider, in [`Codename::ALL`] order
    #[instrument(skip(self))]
    pub async fn model_status(&self) -> Result<Vec<ModelStatusEntry>, ApplicationError> {
        let now = Utc::now();
        let mut records = self.store.list_providers().await?;
        for record in &mut records {
            let outcome = record.evaluate(now);
            if outcome.changed {
                self.store.save_provider(record).await?;
            }
        }
        records.sort_by_key(|r| Codename::ALL.iter().position(|c| *c == r.codename));
        Ok(records
            .into_iter()
            .map(|r| ModelStatusEntry {
                codename: r.codename,
                name: r.codename.label().to_string(),
                credit_status: r.credit_status,
                daily_usage: r.daily_usage,
                monthly_usage: r.monthly_usage,
                daily_limit: r.daily_limit,
                monthly_limit: r.monthly_limit,
            })
            .collect())
    }

    /// Candidates for a capability that pass the availability gate, in
    /// priority order. Gate changes are persisted before routing continues.
    async fn eligible(&self, capability: Capability) -> Result<Vec<Codename>, ApplicationError> {
        let candidates = capability.candidates();
        let mut records = self.store.get_providers(candidates).await?;
        let now = Utc::now();

        let mut eligible = Vec::new();
        let mut unavailable = Vec::new();
        for &codename in candidates {
            let Some(record) = records.iter_mut().find(|r| r.codename == codename) else {
                warn!(provider = %codename, "provider record missing from store");
                unavailable.push(codename);
                continue;
            };
            let outcome = record.evaluate(now);
            if outcome.changed {
                if let Some(reason) = outcome.newly_exhausted {
                    warn!(provider = %codename, %reason, "provider exhausted");
                }
                self.store.save_provider(record).await?;
            }
            if outcome.eligible {
                eligible.push(codename);
            } else {
                unavailable.push(codename);
            }
        }

        if eligible.is_empty() {
            return Err(ApplicationError::NoProvidersAvailable {
                capability,
                unavailable,
            });
        }
        Ok(eligible)
    }

    /// Flip the provider off after a failed call. Best effort: a store
    /// failure here must not mask the routing decision already made.
    async fn trip_breaker(&self, codename: Codename) {
        if let Err(err) = self.store.disable_provider(codename, Utc::now()).await {
            warn!(provider = %codename, error = %err, "failed to disable provider");
        }
    }

    /// Record a successful call. Best effort, same as the breaker.
    async fn record_success(&self, codename: Codename, context: &InterviewContext, tokens: u64) {
        if let Err(err) = self
            .tracker
            .track(codename, context.session(), 1, tokens)
            .await
        {
            warn!(provider = %codename, error = %err, "failed to record usage");
        }
    }

    async fn attempt_generation(
        &self,
        context: &InterviewContext,
    ) -> Result<QuestionOutcome, ApplicationError> {
        let capability = Capability::QuestionGeneration;
        let mut attempted = Vec::new();
        for codename in self.eligible(capability).await? {
            let Some(adapter) = self.roster.question_generator(codename) else {
                debug!(provider = %codename, "no adapter registered");
                continue;
            };
            if !adapter.is_configured() {
                debug!(provider = %codename, "adapter not configured, skipping");
                continue;
            }
            match adapter.generate(context).await {
                Ok(generated) => {
                    info!(provider = %codename, "question generated");
                    self.record_success(codename, context, generated.tokens_used.unwrap_or(0))
                        .await;
                    return Ok(QuestionOutcome {
                        question: generated.text,
                        used_model: codename.as_str().to_string(),
                        fallback: false,
                        evaluation: None,
                    });
                }
                Err(err) => {
                    warn!(provider = %codename, error = %err, "generation failed");
                    self.trip_breaker(codename).await;
                    attempted.push(codename);
                }
            }
        }
        Err(Self::exhausted_error(capability, attempted))
    }

    async fn attempt_synthesis(
        &self,
        context: &InterviewContext,
        text: &str,
        voice: Option<&str>,
    ) -> Result<SpeechOutcome, ApplicationError> {
        let capability = Capability::SpeechSynthesis;
        let mut attempted = Vec::new();
        for codename in self.eligible(capability).await? {
            let Some(adapter) = self.roster.speech_synthesizer(codename) else {
                debug!(provider = %codename, "no adapter registered");
                continue;
            };
            if !adapter.is_configured() {
                debug!(provider = %codename, "adapter not configured, skipping");
                continue;
            }
            match adapter.synthesize(text, voice).await {
                Ok(speech) => {
                    info!(provider = %codename, "speech synthesized");
                    self.record_success(codename, context, 0).await;
                    return Ok(SpeechOutcome::Synthesized {
                        audio_url: speech.audio_url,
                        used_model: codename.as_str().to_string(),
                    });
                }
                Err(err) => {
                    warn!(provider = %codename, error = %err, "synthesis failed");
                    self.trip_breaker(codename).await;
                    attempted.push(codename);
                }
            }
        }
        Err(Self::exhausted_error(capability, attempted))
    }

    async fn attempt_transcription(
        &self,
        audio: &[u8],
        context: &InterviewContext,
    ) -> Result<TranscriptOutcome, ApplicationError> {
        let capability = Capability::Transcription;
        let mut attempted = Vec::new();
        for codename in self.eligible(capability).await? {
            let Some(adapter) = self.roster.transcriber(codename) else {
                debug!(provider = %codename, "no adapter registered");
                continue;
            };
            if !adapter.is_configured() {
                debug!(provider = %codename, "adapter not configured, skipping");
                continue;
            }
            match adapter.transcribe(audio).await {
                Ok(transcript) => {
                    info!(provider = %codename, "audio transcribed");
                    self.record_success(codename, context, 0).await;
                    return Ok(TranscriptOutcome {
                        transcript: transcript.text,
                        used_model: codename.as_str().to_string(),
                    });
                }
                Err(err) => {
                    warn!(provider = %codename, error = %err, "transcription failed");
                    self.trip_breaker(codename).await;
                    attempted.push(codename);
                }
            }
        }
        Err(Self::exhausted_error(capability, attempted))
    }

    async fn attempt_evaluation(
        &self,
        context: &InterviewContext,
    ) -> Result<EvaluationOutcome, ApplicationError> {
        let capability = Capability::Evaluation;
        let mut attempted = Vec::new();
        for codename in self.eligible(capability).await? {
            let Some(adapter) = self.roster.evaluator(codename) else {
                debug!(provider = %codename, "no adapter registered");
                continue;
            };
            if !adapter.is_configured() {
                debug!(provider = %codename, "adapter not configured, skipping");
                continue;
            }
            match adapter.evaluate(context).await {
                Ok(evaluation) => {
                    info!(provider = %codename, "response evaluated");
                    self.record_success(codename, context, 0).await;
                    return Ok(EvaluationOutcome {
                        evaluation,
                        used_model: codename.as_str().to_string(),
                        fallback: false,
                    });
                }
                Err(err) => {
                    warn!(provider = %codename, error = %err, "evaluation failed");
                    self.trip_breaker(codename).await;
                    attempted.push(codename);
                }
            }
        }
        Err(Self::exhausted_error(capability, attempted))
    }

    /// Loop-exhaustion error. When nothing was even attempted (adapters
    /// missing or unconfigured) the candidate set was effectively empty.
    fn exhausted_error(capability: Capability, attempted: Vec<Codename>) -> ApplicationError {
        if attempted.is_empty() {
            ApplicationError::NoProvidersAvailable {
                capability,
                unavailable: capability.candidates().to_vec(),
            }
        } else {
            ApplicationError::AllProvidersFailed {
                capability,
                attempted,
            }
        }
    }
}

/// Decode the client's base64 audio payload, tolerating a data-URL prefix
fn decode_audio(audio_base64: &str) -> Result<Vec<u8>, DomainError> {
    let payload = audio_base64
        .split_once("base64,")
        .map_or(audio_base64, |(_, rest)| rest);
    let audio = BASE64
        .decode(payload.trim())
        .map_err(|e| DomainError::InvalidContext(format!("audio is not valid base64: {e}")))?;
    if audio.is_empty() {
        return Err(DomainError::InvalidContext(
            "audio payload is empty".to_string(),
        ));
    }
    Ok(audio)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration};
    use domain::{EvaluationScores, FALLBACK_QUESTIONS, ProviderRecord, UsageRecord};

    use crate::ports::{
        GeneratedQuestion, ProviderAdapter, ProviderError, StoreError, SynthesizedSpeech,
        Transcript,
    };

    use super::*;

    struct FakeStore {
        records: Mutex<Vec<ProviderRecord>>,
        reverse_reads: bool,
        disabled: Mutex<Vec<Codename>>,
        usage: Mutex<Vec<(Codename, u64, u64)>>,
        log: Mutex<Vec<UsageRecord>>,
    }

    impl FakeStore {
        fn with(records: Vec<ProviderRecord>) -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(records),
                reverse_reads: false,
                disabled: Mutex::new(Vec::new()),
                usage: Mutex::new(Vec::new()),
                log: Mutex::new(Vec::new()),
            })
        }

        fn with_reversed_reads(records: Vec<ProviderRecord>) -> Arc<Self> {
            Arc::new(Self {
                records: Mutex::new(records),
                reverse_reads: true,
                disabled: Mutex::new(Vec::new()),
                usage: Mutex::new(Vec::new()),
                log: Mutex::new(Vec::new()),
            })
        }

        fn record(&self, codename: Codename) -> ProviderRecord {
            self.records
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.codename == codename)
                .cloned()
                .unwrap()
        }
    }

    #[async_trait]
    impl CreditStorePort for FakeStore {
        async fn list_providers(&self) -> Result<Vec<ProviderRecord>, StoreError> {
            let mut records = self.records.lock().unwrap().clone();
            if self.reverse_reads {
                records.reverse();
            }
            Ok(records)
        }

        async fn get_providers(
            &self,
            codenames: &[Codename],
        ) -> Result<Vec<ProviderRecord>, StoreError> {
            let mut records: Vec<ProviderRecord> = self
                .records
                .lock()
                .unwrap()
                .iter()
                .filter(|r| codenames.contains(&r.codename))
                .cloned()
                .collect();
            if self.reverse_reads {
                records.reverse();
            }
            Ok(records)
        }

        async fn save_provider(&self, record: &ProviderRecord) -> Result<(), StoreError> {
            let mut records = self.records.lock().unwrap();
            match records.iter_mut().find(|r| r.codename == record.codename) {
                Some(slot) => *slot = record.clone(),
                None => records.push(record.clone()),
            }
            Ok(())
        }

        async fn disable_provider(
            &self,
            codename: Codename,
            now: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            self.disabled.lock().unwrap().push(codename);
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|r| r.codename == codename)
                .ok_or(StoreError::NotFound(codename))?;
            record.credit_status = false;
            record.last_checked = now;
            Ok(())
        }

        async fn add_usage(
            &self,
            codename: Codename,
            requests_made: u64,
            tokens_used: u64,
            _now: DateTime<Utc>,
        ) -> Result<(), StoreError> {
            self.usage
                .lock()
                .unwrap()
                .push((codename, requests_made, tokens_used));
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|r| r.codename == codename)
                .ok_or(StoreError::NotFound(codename))?;
            record.daily_usage += requests_made;
            record.monthly_usage += tokens_used;
            Ok(())
        }

        async fn insert_usage_record(&self, record: &UsageRecord) -> Result<(), StoreError> {
            self.log.lock().unwrap().push(record.clone());
            Ok(())
        }

        async fn reset_all(&self, now: DateTime<Utc>) -> Result<(), StoreError> {
            for record in self.records.lock().unwrap().iter_mut() {
                record.reset(now);
            }
            Ok(())
        }
    }

    struct FakeGenerator {
        codename: Codename,
        configured: bool,
        fail: bool,
        calls: AtomicUsize,
    }

    impl FakeGenerator {
        fn ok(codename: Codename) -> Arc<Self> {
            Arc::new(Self {
                codename,
                configured: true,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(codename: Codename) -> Arc<Self> {
            Arc::new(Self {
                codename,
                configured: true,
                fail: true,
                calls: AtomicUsize::new(0),
            })
        }

        fn unconfigured(codename: Codename) -> Arc<Self> {
            Arc::new(Self {
                codename,
                configured: false,
                fail: false,
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ProviderAdapter for FakeGenerator {
        fn codename(&self) -> Codename {
            self.codename
        }

        fn is_configured(&self) -> bool {
            self.configured
        }
    }

    #[async_trait]
    impl QuestionGeneratorPort for FakeGenerator {
        async fn generate(
            &self,
            _context: &InterviewContext,
        ) -> Result<GeneratedQuestion, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Api {
                    status: 500,
                    message: "upstream down".to_string(),
                });
            }
            Ok(GeneratedQuestion {
                text: format!("{} asks: why Rust?", self.codename),
                tokens_used: Some(120),
            })
        }
    }

    struct FakeSynthesizer {
        codename: Codename,
        fail: bool,
    }

    impl ProviderAdapter for FakeSynthesizer {
        fn codename(&self) -> Codename {
            self.codename
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    #[async_trait]
    impl SpeechSynthesisPort for FakeSynthesizer {
        async fn synthesize(
            &self,
            _text: &str,
            _voice: Option<&str>,
        ) -> Result<SynthesizedSpeech, ProviderError> {
            if self.fail {
                return Err(ProviderError::Http("connect timeout".to_string()));
            }
            Ok(SynthesizedSpeech {
                audio_url: format!("https://audio.example/{}.mp3", self.codename),
            })
        }
    }

    struct FakeTranscriber {
        fail: bool,
    }

    impl ProviderAdapter for FakeTranscriber {
        fn codename(&self) -> Codename {
            Codename::Echo
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    #[async_trait]
    impl TranscriptionPort for FakeTranscriber {
        async fn transcribe(&self, _audio: &[u8]) -> Result<Transcript, ProviderError> {
            if self.fail {
                return Err(ProviderError::Api {
                    status: 503,
                    message: "overloaded".to_string(),
                });
            }
            Ok(Transcript {
                text: "I enjoy solving hard problems.".to_string(),
            })
        }
    }

    struct FakeEvaluator {
        fail: bool,
    }

    impl ProviderAdapter for FakeEvaluator {
        fn codename(&self) -> Codename {
            Codename::Athena
        }

        fn is_configured(&self) -> bool {
            true
        }
    }

    #[async_trait]
    impl EvaluationPort for FakeEvaluator {
        async fn evaluate(
            &self,
            _context: &InterviewContext,
        ) -> Result<ResponseEvaluation, ProviderError> {
            if self.fail {
                return Err(ProviderError::MalformedResponse("not json".to_string()));
            }
            Ok(ResponseEvaluation {
                scores: EvaluationScores {
                    clarity: 8,
                    confidence: 6,
                    content: 9,
                    tone: 7,
                },
                feedback: "Strong content, slow down a little.".to_string(),
            })
        }
    }

    fn seed() -> Vec<ProviderRecord> {
        let now = Utc::now();
        Codename::ALL
            .iter()
            .map(|&c| ProviderRecord::new(c, 100, 1_000_000, now))
            .collect()
    }

    fn seed_disabled(off: &[Codename]) -> Vec<ProviderRecord> {
        let mut records = seed();
        for record in &mut records {
            if off.contains(&record.codename) {
                record.credit_status = false;
            }
        }
        records
    }

    #[tokio::test]
    async fn priority_order_ignores_store_read_order() {
        let store = FakeStore::with_reversed_reads(seed());
        let orion = FakeGenerator::ok(Codename::Orion);
        let titan = FakeGenerator::ok(Codename::Titan);
        let nova = FakeGenerator::ok(Codename::Nova);
        let roster = ProviderRoster::new()
            .with_question_generator(orion.clone())
            .with_question_generator(titan.clone())
            .with_question_generator(nova.clone());
        let orchestrator = InterviewOrchestrator::new(store, roster);

        let outcome = orchestrator
            .generate_question(&InterviewContext::default())
            .await
            .unwrap();

        assert_eq!(outcome.used_model, "Orion");
        assert!(!outcome.fallback);
        assert_eq!(orion.calls(), 1);
        assert_eq!(titan.calls(), 0);
        assert_eq!(nova.calls(), 0);
    }

    #[tokio::test]
    async fn failure_trips_breaker_and_falls_through_to_next() {
        let store = FakeStore::with(seed());
        let orion = FakeGenerator::failing(Codename::Orion);
        let titan = FakeGenerator::ok(Codename::Titan);
        let roster = ProviderRoster::new()
            .with_question_generator(orion)
            .with_question_generator(titan)
            .with_question_generator(FakeGenerator::ok(Codename::Nova));
        let orchestrator = InterviewOrchestrator::new(store.clone(), roster);

        let outcome = orchestrator
            .generate_question(&InterviewContext::default())
            .await
            .unwrap();

        assert_eq!(outcome.used_model, "Titan");
        assert_eq!(*store.disabled.lock().unwrap(), vec![Codename::Orion]);
        assert!(!store.record(Codename::Orion).credit_status);
        // usage only for the provider that served the call
        let usage = store.usage.lock().unwrap();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0], (Codename::Titan, 1, 120));
    }

    #[tokio::test]
    async fn tripped_provider_stays_off_for_the_next_request() {
        let store = FakeStore::with(seed());
        let orion = FakeGenerator::failing(Codename::Orion);
        let titan = FakeGenerator::ok(Codename::Titan);
        let roster = ProviderRoster::new()
            .with_question_generator(orion.clone())
            .with_question_generator(titan);
        let orchestrator = InterviewOrchestrator::new(store, roster);

        let ctx = InterviewContext::default();
        orchestrator.generate_question(&ctx).await.unwrap();
        let second = orchestrator.generate_question(&ctx).await.unwrap();

        assert_eq!(second.used_model, "Titan");
        assert_eq!(orion.calls(), 1, "tripped provider must not be retried");
    }

    #[tokio::test]
    async fn only_remaining_candidate_serves_the_request() {
        let store = FakeStore::with(seed_disabled(&[Codename::Orion, Codename::Titan]));
        let roster = ProviderRoster::new()
            .with_question_generator(FakeGenerator::ok(Codename::Orion))
            .with_question_generator(FakeGenerator::ok(Codename::Titan))
            .with_question_generator(FakeGenerator::ok(Codename::Nova));
        let orchestrator = InterviewOrchestrator::new(store, roster);

        let outcome = orchestrator
            .generate_question(&InterviewContext::default())
            .await
            .unwrap();

        assert_eq!(outcome.used_model, "Nova");
    }

    #[tokio::test]
    async fn all_disabled_serves_canned_question_without_usage() {
        let store = FakeStore::with(seed_disabled(&[
            Codename::Orion,
            Codename::Titan,
            Codename::Nova,
        ]));
        let roster = ProviderRoster::new()
            .with_question_generator(FakeGenerator::ok(Codename::Orion))
            .with_question_generator(FakeGenerator::ok(Codename::Titan))
            .with_question_generator(FakeGenerator::ok(Codename::Nova));
        let orchestrator = InterviewOrchestrator::new(store.clone(), roster);

        let ctx = InterviewContext {
            question_number: Some(1),
            ..InterviewContext::default()
        };
        let outcome = orchestrator.generate_question(&ctx).await.unwrap();

        assert_eq!(outcome.used_model, "Fallback");
        assert!(outcome.fallback);
        assert_eq!(outcome.question, FALLBACK_QUESTIONS[0]);
        assert!(store.usage.lock().unwrap().is_empty());
        assert!(store.log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn fallback_question_follows_question_number() {
        let store = FakeStore::with(seed_disabled(&[
            Codename::Orion,
            Codename::Titan,
            Codename::Nova,
        ]));
        let orchestrator = InterviewOrchestrator::new(store, ProviderRoster::new());

        let ctx = InterviewContext {
            question_number: Some(7),
            ..InterviewContext::default()
        };
        let outcome = orchestrator.generate_question(&ctx).await.unwrap();
        assert_eq!(outcome.question, FALLBACK_QUESTIONS[1]);
    }

    #[tokio::test]
    async fn all_failing_degrades_to_fallback_after_tripping_each() {
        let store = FakeStore::with(seed());
        let roster = ProviderRoster::new()
            .with_question_generator(FakeGenerator::failing(Codename::Orion))
            .with_question_generator(FakeGenerator::failing(Codename::Titan))
            .with_question_generator(FakeGenerator::failing(Codename::Nova));
        let orchestrator = InterviewOrchestrator::new(store.clone(), roster);

        let outcome = orchestrator
            .generate_question(&InterviewContext::default())
            .await
            .unwrap();

        assert_eq!(outcome.used_model, "Fallback");
        assert_eq!(
            *store.disabled.lock().unwrap(),
            vec![Codename::Orion, Codename::Titan, Codename::Nova]
        );
    }

    #[tokio::test]
    async fn unconfigured_adapter_is_skipped_without_breaker_trip() {
        let store = FakeStore::with(seed());
        let orion = FakeGenerator::unconfigured(Codename::Orion);
        let roster = ProviderRoster::new()
            .with_question_generator(orion.clone())
            .with_question_generator(FakeGenerator::ok(Codename::Titan));
        let orchestrator = InterviewOrchestrator::new(store.clone(), roster);

        let outcome = orchestrator
            .generate_question(&InterviewContext::default())
            .await
            .unwrap();

        assert_eq!(outcome.used_model, "Titan");
        assert_eq!(orion.calls(), 0);
        assert!(store.disabled.lock().unwrap().is_empty());
        assert!(store.record(Codename::Orion).credit_status);
    }

    #[tokio::test]
    async fn gate_disables_over_limit_provider_before_routing() {
        let store = FakeStore::with(seed());
        store
            .records
            .lock()
            .unwrap()
            .iter_mut()
            .find(|r| r.codename == Codename::Orion)
            .unwrap()
            .daily_usage = 100;
        let orion = FakeGenerator::ok(Codename::Orion);
        let roster = ProviderRoster::new()
            .with_question_generator(orion.clone())
            .with_question_generator(FakeGenerator::ok(Codename::Titan));
        let orchestrator = InterviewOrchestrator::new(store.clone(), roster);

        let outcome = orchestrator
            .generate_question(&InterviewContext::default())
            .await
            .unwrap();

        assert_eq!(outcome.used_model, "Titan");
        assert_eq!(orion.calls(), 0);
        assert!(!store.record(Codename::Orion).credit_status);
    }

    #[tokio::test]
    async fn elapsed_daily_window_restores_eligibility() {
        let two_days_ago = Utc::now() - Duration::days(2);
        let mut records = seed();
        let orion = &mut records[0];
        orion.daily_usage = 150;
        orion.credit_status = false;
        orion.last_reset_daily = two_days_ago;
        let store = FakeStore::with(records);
        let roster =
            ProviderRoster::new().with_question_generator(FakeGenerator::ok(Codename::Orion));
        let orchestrator = InterviewOrchestrator::new(store.clone(), roster);

        let outcome = orchestrator
            .generate_question(&InterviewContext::default())
            .await
            .unwrap();

        assert_eq!(outcome.used_model, "Orion");
        // usage increment from this call lands on the zeroed counter
        assert_eq!(store.record(Codename::Orion).daily_usage, 1);
    }

    #[tokio::test]
    async fn opportunistic_evaluation_rides_along_with_the_question() {
        let store = FakeStore::with(seed());
        let roster = ProviderRoster::new()
            .with_question_generator(FakeGenerator::ok(Codename::Orion))
            .with_evaluator(Arc::new(FakeEvaluator { fail: false }));
        let orchestrator = InterviewOrchestrator::new(store, roster);

        let ctx = InterviewContext {
            user_response: Some("I shipped a search service.".to_string()),
            ..InterviewContext::default()
        };
        let outcome = orchestrator.generate_question(&ctx).await.unwrap();

        assert_eq!(outcome.used_model, "Orion");
        let eval = outcome.evaluation.unwrap();
        assert_eq!(eval.scores.content, 9);
    }

    #[tokio::test]
    async fn evaluation_degrades_to_fixed_scores() {
        let store = FakeStore::with(seed_disabled(&[Codename::Athena]));
        let roster = ProviderRoster::new().with_evaluator(Arc::new(FakeEvaluator { fail: false }));
        let orchestrator = InterviewOrchestrator::new(store, roster);

        let ctx = InterviewContext {
            user_response: Some("answer".to_string()),
            ..InterviewContext::default()
        };
        let outcome = orchestrator.evaluate_response(&ctx).await.unwrap();

        assert!(outcome.fallback);
        assert_eq!(outcome.used_model, "Fallback");
        assert_eq!(outcome.evaluation.scores.clarity, 7);
        assert_eq!(outcome.evaluation.scores.tone, 7);
    }

    #[tokio::test]
    async fn failing_evaluator_trips_breaker_and_degrades() {
        let store = FakeStore::with(seed());
        let roster = ProviderRoster::new().with_evaluator(Arc::new(FakeEvaluator { fail: true }));
        let orchestrator = InterviewOrchestrator::new(store.clone(), roster);

        let outcome = orchestrator
            .evaluate_response(&InterviewContext::default())
            .await
            .unwrap();

        assert!(outcome.fallback);
        assert_eq!(*store.disabled.lock().unwrap(), vec![Codename::Athena]);
    }

    #[tokio::test]
    async fn synthesis_prefers_vox_then_aether() {
        let store = FakeStore::with(seed());
        let roster = ProviderRoster::new()
            .with_speech_synthesizer(Arc::new(FakeSynthesizer {
                codename: Codename::Vox,
                fail: true,
            }))
            .with_speech_synthesizer(Arc::new(FakeSynthesizer {
                codename: Codename::Aether,
                fail: false,
            }));
        let orchestrator = InterviewOrchestrator::new(store.clone(), roster);

        let ctx = InterviewContext {
            text: Some("Tell me about yourself.".to_string()),
            ..InterviewContext::default()
        };
        let outcome = orchestrator.generate_speech(&ctx).await.unwrap();

        match outcome {
            SpeechOutcome::Synthesized {
                used_model,
                audio_url,
            } => {
                assert_eq!(used_model, "Aether");
                assert!(audio_url.contains("Aether"));
            }
            SpeechOutcome::BrowserFallback => panic!("expected synthesized audio"),
        }
        assert_eq!(*store.disabled.lock().unwrap(), vec![Codename::Vox]);
    }

    #[tokio::test]
    async fn synthesis_defers_to_browser_when_all_fail() {
        let store = FakeStore::with(seed());
        let roster = ProviderRoster::new()
            .with_speech_synthesizer(Arc::new(FakeSynthesizer {
                codename: Codename::Vox,
                fail: true,
            }))
            .with_speech_synthesizer(Arc::new(FakeSynthesizer {
                codename: Codename::Aether,
                fail: true,
            }));
        let orchestrator = InterviewOrchestrator::new(store, roster);

        let ctx = InterviewContext {
            text: Some("hello".to_string()),
            ..InterviewContext::default()
        };
        let outcome = orchestrator.generate_speech(&ctx).await.unwrap();
        assert!(matches!(outcome, SpeechOutcome::BrowserFallback));
    }

    #[tokio::test]
    async fn synthesis_without_text_is_rejected() {
        let store = FakeStore::with(seed());
        let orchestrator = InterviewOrchestrator::new(store, ProviderRoster::new());

        let result = orchestrator
            .generate_speech(&InterviewContext::default())
            .await;
        assert!(matches!(result, Err(ApplicationError::Domain(_))));
    }

    #[tokio::test]
    async fn transcription_unavailability_surfaces_as_error() {
        let store = FakeStore::with(seed_disabled(&[Codename::Echo]));
        let roster = ProviderRoster::new().with_transcriber(Arc::new(FakeTranscriber {
            fail: false,
        }));
        let orchestrator = InterviewOrchestrator::new(store, roster);

        let ctx = InterviewContext {
            audio: Some("aGVsbG8=".to_string()),
            ..InterviewContext::default()
        };
        let err = orchestrator.transcribe_audio(&ctx).await.unwrap_err();

        match err {
            ApplicationError::NoProvidersAvailable {
                capability,
                unavailable,
            } => {
                assert_eq!(capability, Capability::Transcription);
                assert_eq!(unavailable, vec![Codename::Echo]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn invalid_audio_is_rejected_without_touching_the_breaker() {
        let store = FakeStore::with(seed());
        let roster = ProviderRoster::new().with_transcriber(Arc::new(FakeTranscriber {
            fail: false,
        }));
        let orchestrator = InterviewOrchestrator::new(store.clone(), roster);

        let ctx = InterviewContext {
            audio: Some("not base64 at all!!".to_string()),
            ..InterviewContext::default()
        };
        let err = orchestrator.transcribe_audio(&ctx).await.unwrap_err();

        // a bad payload is the client's error; Echo keeps its credit
        assert!(matches!(err, ApplicationError::Domain(_)));
        assert!(store.disabled.lock().unwrap().is_empty());
        assert!(store.usage.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_audio_payload_is_rejected() {
        let store = FakeStore::with(seed());
        let roster = ProviderRoster::new().with_transcriber(Arc::new(FakeTranscriber {
            fail: false,
        }));
        let orchestrator = InterviewOrchestrator::new(store.clone(), roster);

        let ctx = InterviewContext {
            audio: Some(String::new()),
            ..InterviewContext::default()
        };
        let err = orchestrator.transcribe_audio(&ctx).await.unwrap_err();

        assert!(matches!(err, ApplicationError::Domain(_)));
        assert!(store.disabled.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn data_url_audio_payload_is_accepted() {
        let store = FakeStore::with(seed());
        let roster = ProviderRoster::new().with_transcriber(Arc::new(FakeTranscriber {
            fail: false,
        }));
        let orchestrator = InterviewOrchestrator::new(store, roster);

        let ctx = InterviewContext {
            audio: Some("data:audio/webm;base64,aGVsbG8=".to_string()),
            ..InterviewContext::default()
        };
        let outcome = orchestrator.transcribe_audio(&ctx).await.unwrap();
        assert_eq!(outcome.used_model, "Echo");
    }

    #[tokio::test]
    async fn transcription_success_reports_echo() {
        let store = FakeStore::with(seed());
        let roster = ProviderRoster::new().with_transcriber(Arc::new(FakeTranscriber {
            fail: false,
        }));
        let orchestrator = InterviewOrchestrator::new(store.clone(), roster);

        let ctx = InterviewContext {
            audio: Some("aGVsbG8=".to_string()),
            ..InterviewContext::default()
        };
        let outcome = orchestrator.transcribe_audio(&ctx).await.unwrap();

        assert_eq!(outcome.used_model, "Echo");
        assert!(!outcome.transcript.is_empty());
        assert_eq!(store.usage.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn model_status_is_reported_in_canonical_order() {
        let store = FakeStore::with_reversed_reads(seed_disabled(&[Codename::Vox]));
        let orchestrator = InterviewOrchestrator::new(store, ProviderRoster::new());

        let status = orchestrator.model_status().await.unwrap();

        let order: Vec<Codename> = status.iter().map(|e| e.codename).collect();
        assert_eq!(order, Codename::ALL.to_vec());
        let vox = status.iter().find(|e| e.codename == Codename::Vox).unwrap();
        assert!(!vox.credit_status);
        assert!(status
            .iter()
            .filter(|e| e.codename != Codename::Vox)
            .all(|e| e.credit_status));
    }
}
