use std::sync::Arc;

use crate::error::Result;
use crate::model::notification::{NewNotification, NotificationType};
use crate::store::NotificationSink;
use crate::utils::clock::Clock;

/// Fire-and-forget event emission. Events land in the append-only
/// notification log; delivery to people is the dispatcher's problem.
pub struct Notifier {
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn NotificationSink>, clock: Arc<dyn Clock>) -> Self {
        Self { sink, clock }
    }

    pub async fn dispatch(
        &self,
        recipient_id: u64,
        notification_type: NotificationType,
        message: String,
    ) -> Result<()> {
        tracing::info!(
            recipient_id,
            kind = %notification_type,
            %message,
            "notification event"
        );
        self.sink
            .append(
                NewNotification {
                    recipient_id,
                    notification_type,
                    message,
                },
                self.clock.now(),
            )
            .await?;
        Ok(())
    }
}
