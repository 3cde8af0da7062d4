//! Nullable classifier — scripted vision verdicts for testing.

use async_trait::async_trait;
use kerb_types::FacilityType;
use kerb_vision::{Classification, Classifier, ClassifierError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// What the nullable classifier should answer on a call.
#[derive(Clone, Debug)]
pub enum ClassifierReply {
    /// A valid facility of the given type.
    Valid(FacilityType),
    /// A content rejection with the given reason.
    Invalid(String),
    /// A transport-level failure (not a content judgment).
    Error,
}

/// A classifier that answers from a script, then repeats its default reply.
///
/// Counts calls so tests can assert the classifier was (or was not) reached.
pub struct NullClassifier {
    script: Mutex<VecDeque<ClassifierReply>>,
    default: ClassifierReply,
    calls: AtomicUsize,
}

impl NullClassifier {
    /// Always answer with the same reply.
    pub fn always(reply: ClassifierReply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            default: reply,
            calls: AtomicUsize::new(0),
        }
    }

    /// Always classify as a valid facility of `facility_type`.
    pub fn always_valid(facility_type: FacilityType) -> Self {
        Self::always(ClassifierReply::Valid(facility_type))
    }

    /// Answer from `replies` in order, then fall back to `default`.
    pub fn scripted(
        replies: impl IntoIterator<Item = ClassifierReply>,
        default: ClassifierReply,
    ) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            default,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of classify calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn reply_to_classification(reply: ClassifierReply) -> Result<Classification, ClassifierError> {
        match reply {
            ClassifierReply::Valid(facility_type) => Ok(Classification {
                is_valid: true,
                facility_type: Some(facility_type),
                condition_notes: Some("facility in good condition".to_string()),
                confidence: 0.95,
                raw_details: serde_json::json!({
                    "is_valid": true,
                    "facility_type": facility_type.as_str(),
                    "confidence": 0.95,
                }),
            }),
            ClassifierReply::Invalid(reason) => Ok(Classification {
                is_valid: false,
                facility_type: None,
                condition_notes: Some(reason.clone()),
                confidence: 0.9,
                raw_details: serde_json::json!({
                    "is_valid": false,
                    "condition": reason,
                }),
            }),
            ClassifierReply::Error => Err(ClassifierError::Transport("injected failure".into())),
        }
    }
}

#[async_trait]
impl Classifier for NullClassifier {
    async fn classify(&self, _image: &[u8]) -> Result<Classification, ClassifierError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default.clone());
        Self::reply_to_classification(reply)
    }
}
