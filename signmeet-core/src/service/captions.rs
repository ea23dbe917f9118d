//! Caption pipeline: classification result -> confidence gate ->
//! persist -> room broadcast.
//!
//! The classifier call is awaited without holding any room lock; membership
//! is only snapshotted after the caption is accepted. Classifier failures
//! degrade to a zero-confidence result. A caption must be attributable, so
//! an unknown participant after the gate is a hard error.

use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::connections::ConnectionSessionTable;
use super::hub::MessageHub;
use super::registry::RoomRegistry;
use crate::classifier::{Classification, Classifier};
use crate::events::ServerEvent;
use crate::models::{Caption, ParticipantId, RoomId};
use crate::storage::{Storage, RECENT_CAPTIONS_LIMIT};
use crate::{Error, Result};

/// Minimum confidence (exclusive) for a prediction to become a caption.
/// The single quality gate keeping low-confidence noise out of rooms.
pub const CONFIDENCE_THRESHOLD: f64 = 0.7;

/// Outcome returned to the predict caller
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub predicted_text: Option<String>,
    pub confidence: f64,
}

pub struct CaptionPipeline {
    registry: Arc<RoomRegistry>,
    connections: Arc<ConnectionSessionTable>,
    hub: Arc<MessageHub>,
    storage: Arc<dyn Storage>,
    classifier: Arc<dyn Classifier>,
}

impl CaptionPipeline {
    pub fn new(
        registry: Arc<RoomRegistry>,
        connections: Arc<ConnectionSessionTable>,
        hub: Arc<MessageHub>,
        storage: Arc<dyn Storage>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            registry,
            connections,
            hub,
            storage,
            classifier,
        }
    }

    #[must_use]
    pub fn model_loaded(&self) -> bool {
        self.classifier.is_loaded()
    }

    /// Run one frame through the pipeline. Returns the prediction outcome;
    /// only gated-accept results create and broadcast a caption.
    pub async fn predict(
        &self,
        image_data: &str,
        room_id: &RoomId,
        participant_id: &ParticipantId,
    ) -> Result<Prediction> {
        let image = decode_image_data(image_data)?;

        let classification = match self.classifier.classify(&image).await {
            Ok(classification) => classification,
            Err(e) => {
                warn!(error = %e, "Classifier failed, treating as zero-confidence");
                Classification::none()
            }
        };

        let confidence = classification.confidence;
        let Some(label) = classification.label else {
            return Ok(Prediction {
                predicted_text: None,
                confidence,
            });
        };

        if confidence <= CONFIDENCE_THRESHOLD {
            debug!(
                room_id = %room_id,
                label = %label,
                confidence,
                "Prediction below confidence threshold, rejected"
            );
            return Ok(Prediction {
                predicted_text: None,
                confidence,
            });
        }

        let participant = self.registry.participant(participant_id).ok_or_else(|| {
            Error::NotFound(format!("Participant {participant_id} not found"))
        })?;

        let caption = Caption::new(label.clone(), participant.name, room_id.clone(), confidence);

        if let Err(e) = self.storage.save_caption(&caption).await {
            warn!(caption_id = %caption.id, error = %e, "Failed to persist caption");
        }

        let targets = self.connections.connections_in(room_id);
        let sent = self
            .hub
            .broadcast(&targets, None, &ServerEvent::NewCaption(caption.clone()));

        info!(
            room_id = %room_id,
            caption_id = %caption.id,
            label = %label,
            confidence,
            sent,
            "Caption broadcast"
        );

        Ok(Prediction {
            predicted_text: Some(label),
            confidence,
        })
    }

    /// Most recent captions for a room, newest first
    pub async fn recent_captions(&self, room_id: &RoomId) -> Result<Vec<Caption>> {
        self.storage
            .list_recent_captions(room_id, RECENT_CAPTIONS_LIMIT)
            .await
    }
}

/// Decode a base64 frame, tolerating a `data:image/...;base64,` prefix.
fn decode_image_data(image_data: &str) -> Result<Vec<u8>> {
    let encoded = match image_data.split_once(',') {
        Some((_, rest)) => rest,
        None => image_data,
    };
    BASE64
        .decode(encoded)
        .map_err(|e| Error::InvalidInput(format!("Invalid image data: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::NullClassifier;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;

    struct FixedClassifier {
        label: &'static str,
        confidence: f64,
    }

    #[async_trait]
    impl Classifier for FixedClassifier {
        async fn classify(&self, _image: &[u8]) -> Result<Classification> {
            Ok(Classification {
                label: Some(self.label.to_string()),
                confidence: self.confidence,
            })
        }
    }

    struct FailingClassifier;

    #[async_trait]
    impl Classifier for FailingClassifier {
        async fn classify(&self, _image: &[u8]) -> Result<Classification> {
            Err(Error::Classifier("inference backend down".to_string()))
        }
    }

    struct Fixture {
        registry: Arc<RoomRegistry>,
        connections: Arc<ConnectionSessionTable>,
        hub: Arc<MessageHub>,
        storage: Arc<MemoryStorage>,
    }

    impl Fixture {
        fn new() -> Self {
            let storage = Arc::new(MemoryStorage::new());
            Self {
                registry: Arc::new(RoomRegistry::new(storage.clone(), 6)),
                connections: Arc::new(ConnectionSessionTable::new()),
                hub: Arc::new(MessageHub::new()),
                storage,
            }
        }

        fn pipeline(&self, classifier: Arc<dyn Classifier>) -> CaptionPipeline {
            CaptionPipeline::new(
                self.registry.clone(),
                self.connections.clone(),
                self.hub.clone(),
                self.storage.clone(),
                classifier,
            )
        }
    }

    fn frame() -> String {
        format!("data:image/jpeg;base64,{}", BASE64.encode(b"frame"))
    }

    #[tokio::test]
    async fn test_low_confidence_rejected() {
        let fixture = Fixture::new();
        let room = fixture.registry.create_room("Demo".to_string(), None).await;
        let alice = fixture
            .registry
            .join_room(&room.id, "Alice".to_string())
            .await
            .unwrap();

        let conn = crate::models::ConnectionId::from_string("conn1".to_string());
        let mut rx = fixture.hub.register(&conn);
        fixture.connections.bind(&conn, room.id.clone(), None);

        let pipeline = fixture.pipeline(Arc::new(FixedClassifier {
            label: "hello",
            confidence: 0.69,
        }));

        let prediction = pipeline.predict(&frame(), &room.id, &alice.id).await.unwrap();
        assert!(prediction.predicted_text.is_none());
        assert!((prediction.confidence - 0.69).abs() < f64::EPSILON);

        // No caption created, nothing broadcast
        assert_eq!(fixture.storage.caption_count(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_threshold_is_exclusive() {
        let fixture = Fixture::new();
        let room = fixture.registry.create_room("Demo".to_string(), None).await;
        let alice = fixture
            .registry
            .join_room(&room.id, "Alice".to_string())
            .await
            .unwrap();

        let pipeline = fixture.pipeline(Arc::new(FixedClassifier {
            label: "hello",
            confidence: CONFIDENCE_THRESHOLD,
        }));

        let prediction = pipeline.predict(&frame(), &room.id, &alice.id).await.unwrap();
        assert!(prediction.predicted_text.is_none());
        assert_eq!(fixture.storage.caption_count(), 0);
    }

    #[tokio::test]
    async fn test_accepted_prediction_persists_and_broadcasts_once() {
        let fixture = Fixture::new();
        let room = fixture.registry.create_room("Demo".to_string(), None).await;
        let alice = fixture
            .registry
            .join_room(&room.id, "Alice".to_string())
            .await
            .unwrap();

        let conn_a = crate::models::ConnectionId::from_string("a".to_string());
        let conn_b = crate::models::ConnectionId::from_string("b".to_string());
        let mut rx_a = fixture.hub.register(&conn_a);
        let mut rx_b = fixture.hub.register(&conn_b);
        fixture.connections.bind(&conn_a, room.id.clone(), None);
        fixture.connections.bind(&conn_b, room.id.clone(), None);

        let pipeline = fixture.pipeline(Arc::new(FixedClassifier {
            label: "hello",
            confidence: 0.71,
        }));

        let prediction = pipeline.predict(&frame(), &room.id, &alice.id).await.unwrap();
        assert_eq!(prediction.predicted_text.as_deref(), Some("hello"));

        assert_eq!(fixture.storage.caption_count(), 1);
        let recent = pipeline.recent_captions(&room.id).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].text, "hello");
        assert_eq!(recent[0].participant_name, "Alice");

        // Exactly one new_caption per connection in the room
        for rx in [&mut rx_a, &mut rx_b] {
            match rx.try_recv().unwrap() {
                ServerEvent::NewCaption(caption) => assert_eq!(caption.text, "hello"),
                other => panic!("unexpected event: {other:?}"),
            }
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn test_unknown_participant_is_hard_error() {
        let fixture = Fixture::new();
        let room = fixture.registry.create_room("Demo".to_string(), None).await;

        let pipeline = fixture.pipeline(Arc::new(FixedClassifier {
            label: "hello",
            confidence: 0.9,
        }));

        let result = pipeline
            .predict(&frame(), &room.id, &ParticipantId::new())
            .await;
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert_eq!(fixture.storage.caption_count(), 0);
    }

    #[tokio::test]
    async fn test_classifier_failure_degrades_to_zero_confidence() {
        let fixture = Fixture::new();
        let room = fixture.registry.create_room("Demo".to_string(), None).await;
        let alice = fixture
            .registry
            .join_room(&room.id, "Alice".to_string())
            .await
            .unwrap();

        let pipeline = fixture.pipeline(Arc::new(FailingClassifier));
        let prediction = pipeline.predict(&frame(), &room.id, &alice.id).await.unwrap();
        assert!(prediction.predicted_text.is_none());
        assert!(prediction.confidence.abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_null_classifier_never_captions() {
        let fixture = Fixture::new();
        let room = fixture.registry.create_room("Demo".to_string(), None).await;
        let alice = fixture
            .registry
            .join_room(&room.id, "Alice".to_string())
            .await
            .unwrap();

        let pipeline = fixture.pipeline(Arc::new(NullClassifier));
        assert!(!pipeline.model_loaded());

        let prediction = pipeline.predict(&frame(), &room.id, &alice.id).await.unwrap();
        assert!(prediction.predicted_text.is_none());
        assert_eq!(fixture.storage.caption_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_image_data() {
        let fixture = Fixture::new();
        let room = fixture.registry.create_room("Demo".to_string(), None).await;
        let alice = fixture
            .registry
            .join_room(&room.id, "Alice".to_string())
            .await
            .unwrap();

        let pipeline = fixture.pipeline(Arc::new(NullClassifier));
        let result = pipeline
            .predict("data:image/jpeg;base64,@@not-base64@@", &room.id, &alice.id)
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }
}
