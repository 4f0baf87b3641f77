//! Test doubles shared by the use case tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use meetly_shared::time::ManualClock;

use crate::domain::{
    ConnectionId, MessagePushError, MessagePusher, ParticipantId, PusherChannel, RoomId,
    ServerEvent,
};

/// MessagePusher that records every delivery instead of sending it
#[derive(Default)]
pub struct RecordingPusher {
    deliveries: Mutex<Vec<(ConnectionId, ServerEvent)>>,
    registered: Mutex<Vec<ConnectionId>>,
}

impl RecordingPusher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Events delivered to `client_id`, in delivery order
    pub fn events_for(&self, client_id: &ConnectionId) -> Vec<ServerEvent> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .filter(|(target, _)| target == client_id)
            .map(|(_, event)| event.clone())
            .collect()
    }

    /// Recipients of every delivered event named `name`
    pub fn recipients_of(&self, name: &str) -> Vec<ConnectionId> {
        self.deliveries
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, event)| event.name() == name)
            .map(|(target, _)| target.clone())
            .collect()
    }

    pub fn delivery_count(&self) -> usize {
        self.deliveries.lock().unwrap().len()
    }

    pub fn clear(&self) {
        self.deliveries.lock().unwrap().clear();
    }

    pub fn is_registered(&self, client_id: &ConnectionId) -> bool {
        self.registered.lock().unwrap().contains(client_id)
    }
}

#[async_trait]
impl MessagePusher for RecordingPusher {
    async fn register_client(&self, client_id: ConnectionId, _sender: PusherChannel) {
        self.registered.lock().unwrap().push(client_id);
    }

    async fn unregister_client(&self, client_id: &ConnectionId) {
        self.registered.lock().unwrap().retain(|id| id != client_id);
    }

    async fn push_to(
        &self,
        client_id: &ConnectionId,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        self.deliveries
            .lock()
            .unwrap()
            .push((client_id.clone(), event.clone()));
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        event: &ServerEvent,
    ) -> Result<(), MessagePushError> {
        let mut deliveries = self.deliveries.lock().unwrap();
        for target in targets {
            deliveries.push((target, event.clone()));
        }
        Ok(())
    }
}

pub fn conn(id: &str) -> ConnectionId {
    ConnectionId::new(id.to_string()).unwrap()
}

pub fn room(id: &str) -> RoomId {
    RoomId::new(id.to_string()).unwrap()
}

pub fn participant(id: &str) -> ParticipantId {
    ParticipantId::new(id.to_string()).unwrap()
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(1_700_000_000_000))
}
